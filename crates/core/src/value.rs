//! Parameter value kinds
//!
//! Every option a binding declares carries one of a closed set of value
//! types. `ParamValue` is the holder stored in a descriptor; `ParamKind` is
//! its tag and owns the per-kind facts (type tag, printable type name,
//! serializability).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag for a supported parameter value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    Flag,
    Int,
    Double,
    String,
    StringVector,
    IntVector,
    Matrix,
    Labels,
    Model,
}

impl ParamKind {
    pub const ALL: [ParamKind; 9] = [
        ParamKind::Flag,
        ParamKind::Int,
        ParamKind::Double,
        ParamKind::String,
        ParamKind::StringVector,
        ParamKind::IntVector,
        ParamKind::Matrix,
        ParamKind::Labels,
        ParamKind::Model,
    ];

    /// Runtime type tag. Models are tagged by their own model type name
    /// instead, so this returns the generic placeholder for them.
    pub fn type_tag(&self) -> &'static str {
        match self {
            ParamKind::Flag => "bool",
            ParamKind::Int => "int",
            ParamKind::Double => "double",
            ParamKind::String => "std::string",
            ParamKind::StringVector => "std::vector<std::string>",
            ParamKind::IntVector => "std::vector<int>",
            ParamKind::Matrix => "arma::mat",
            ParamKind::Labels => "arma::Row<size_t>",
            ParamKind::Model => "model",
        }
    }

    /// Human-readable type name used in listings
    pub fn printable_type(&self) -> &'static str {
        match self {
            ParamKind::Flag => "bool",
            ParamKind::Int => "int",
            ParamKind::Double => "double",
            ParamKind::String => "string",
            ParamKind::StringVector => "vector<string>",
            ParamKind::IntVector => "vector<int>",
            ParamKind::Matrix => "matrix",
            ParamKind::Labels => "unsigned row",
            ParamKind::Model => "model",
        }
    }

    /// Only trained models round-trip through a serialized archive
    pub fn is_serializable(&self) -> bool {
        matches!(self, ParamKind::Model)
    }

    /// Matrices, label rows and models are handed to a binding as file names
    pub fn is_file_backed(&self) -> bool {
        matches!(self, ParamKind::Matrix | ParamKind::Labels | ParamKind::Model)
    }

    /// Parse a manifest kind name ("int", "matrix", "model", ...)
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "flag" | "bool" => Some(ParamKind::Flag),
            "int" => Some(ParamKind::Int),
            "double" | "float" => Some(ParamKind::Double),
            "string" => Some(ParamKind::String),
            "string_vector" | "vector<string>" => Some(ParamKind::StringVector),
            "int_vector" | "vector<int>" => Some(ParamKind::IntVector),
            "matrix" => Some(ParamKind::Matrix),
            "labels" | "unsigned_row" => Some(ParamKind::Labels),
            "model" => Some(ParamKind::Model),
            _ => None,
        }
    }

    /// Zero value for the kind. Models need their type name.
    pub fn zero_value(&self, model_type: &str) -> ParamValue {
        match self {
            ParamKind::Flag => ParamValue::Flag(false),
            ParamKind::Int => ParamValue::Int(0),
            ParamKind::Double => ParamValue::Double(0.0),
            ParamKind::String => ParamValue::String(String::new()),
            ParamKind::StringVector => ParamValue::StringVector(Vec::new()),
            ParamKind::IntVector => ParamValue::IntVector(Vec::new()),
            ParamKind::Matrix => ParamValue::Matrix(Matrix::default()),
            ParamKind::Labels => ParamValue::Labels(Vec::new()),
            ParamKind::Model => ParamValue::Model(ModelHandle::empty(model_type)),
        }
    }
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.printable_type())
    }
}

/// Dense column-major matrix of doubles
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Zero-filled `rows` x `cols` matrix, or None if the element count
    /// overflows `usize`.
    pub fn zeros(rows: usize, cols: usize) -> Option<Self> {
        let len = rows.checked_mul(cols)?;
        Some(Self { rows, cols, data: vec![0.0; len] })
    }

    /// Build from column vectors. Returns None if the columns are ragged.
    pub fn from_columns(columns: &[Vec<f64>]) -> Option<Self> {
        let rows = columns.first().map(|c| c.len()).unwrap_or(0);
        if columns.iter().any(|c| c.len() != rows) {
            return None;
        }
        let data = columns.iter().flatten().copied().collect();
        Some(Self { rows, cols: columns.len(), data })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.data.get(col * self.rows + row).copied()
    }

    pub fn transpose(&self) -> Self {
        let mut data = Vec::with_capacity(self.data.len());
        for r in 0..self.rows {
            for c in 0..self.cols {
                data.push(self.data[c * self.rows + r]);
            }
        }
        Self { rows: self.cols, cols: self.rows, data }
    }
}

/// Handle to a trained model. The payload is opaque to the registry; the
/// binding that owns the model type is responsible for its contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelHandle {
    pub model_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

impl ModelHandle {
    /// A model slot with nothing loaded yet
    pub fn empty(model_type: impl Into<String>) -> Self {
        Self { model_type: model_type.into(), payload: None }
    }

    pub fn new(model_type: impl Into<String>, payload: serde_json::Value) -> Self {
        Self { model_type: model_type.into(), payload: Some(payload) }
    }

    pub fn is_loaded(&self) -> bool {
        self.payload.is_some()
    }
}

/// The value holder carried by every descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ParamValue {
    Flag(bool),
    Int(i64),
    Double(f64),
    String(String),
    StringVector(Vec<String>),
    IntVector(Vec<i64>),
    Matrix(Matrix),
    Labels(Vec<usize>),
    Model(ModelHandle),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            ParamValue::Flag(_) => ParamKind::Flag,
            ParamValue::Int(_) => ParamKind::Int,
            ParamValue::Double(_) => ParamKind::Double,
            ParamValue::String(_) => ParamKind::String,
            ParamValue::StringVector(_) => ParamKind::StringVector,
            ParamValue::IntVector(_) => ParamKind::IntVector,
            ParamValue::Matrix(_) => ParamKind::Matrix,
            ParamValue::Labels(_) => ParamKind::Labels,
            ParamValue::Model(_) => ParamKind::Model,
        }
    }

    /// Runtime type tag of the held value
    pub fn type_name(&self) -> String {
        match self {
            ParamValue::Model(m) => m.model_type.clone(),
            other => other.kind().type_tag().to_string(),
        }
    }

    /// Parse a textual default for the given kind (manifest and CLI input).
    /// Vectors are comma-separated; matrix, label and model values cannot be
    /// given inline.
    pub fn parse(kind: ParamKind, text: &str) -> Result<Self, String> {
        let text = text.trim();
        match kind {
            ParamKind::Flag => match text {
                "true" | "1" => Ok(ParamValue::Flag(true)),
                "false" | "0" | "" => Ok(ParamValue::Flag(false)),
                _ => Err(format!("'{}' is not a boolean", text)),
            },
            ParamKind::Int => text
                .parse()
                .map(ParamValue::Int)
                .map_err(|_| format!("'{}' is not an integer", text)),
            ParamKind::Double => text
                .parse()
                .map(ParamValue::Double)
                .map_err(|_| format!("'{}' is not a number", text)),
            ParamKind::String => Ok(ParamValue::String(text.to_string())),
            ParamKind::StringVector => Ok(ParamValue::StringVector(
                split_list(text).map(str::to_string).collect(),
            )),
            ParamKind::IntVector => split_list(text)
                .map(|s| s.parse().map_err(|_| format!("'{}' is not an integer", s)))
                .collect::<Result<Vec<_>, _>>()
                .map(ParamValue::IntVector),
            ParamKind::Matrix | ParamKind::Labels | ParamKind::Model => Err(format!(
                "{} values are loaded from files and have no inline form",
                kind
            )),
        }
    }
}

fn split_list(text: &str) -> impl Iterator<Item = &str> {
    text.split(',').map(str::trim).filter(|s| !s.is_empty())
}
