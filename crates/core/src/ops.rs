//! Per-type parameter operations
//!
//! Every supported value type implements `ParamType`. The fixed operation
//! set a binding front-end can ask for is `ParamOp`; `apply` answers one of
//! them for a descriptor by matching on its value.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::descriptor::ParamData;
use crate::value::{Matrix, ModelHandle, ParamKind, ParamValue};

/// A Rust type that can be held by a parameter
pub trait ParamType: Clone + Sized {
    const KIND: ParamKind;

    fn into_value(self) -> ParamValue;

    /// Borrow the concrete value out of a holder of the same kind
    fn from_value(value: &ParamValue) -> Option<&Self>;

    /// Form shown in listings and documentation
    fn printable(&self) -> String;

    /// Form written on a command line
    fn command_line(&self) -> String {
        self.printable()
    }
}

impl ParamType for bool {
    const KIND: ParamKind = ParamKind::Flag;

    fn into_value(self) -> ParamValue {
        ParamValue::Flag(self)
    }

    fn from_value(value: &ParamValue) -> Option<&Self> {
        match value {
            ParamValue::Flag(v) => Some(v),
            _ => None,
        }
    }

    fn printable(&self) -> String {
        self.to_string()
    }
}

impl ParamType for i64 {
    const KIND: ParamKind = ParamKind::Int;

    fn into_value(self) -> ParamValue {
        ParamValue::Int(self)
    }

    fn from_value(value: &ParamValue) -> Option<&Self> {
        match value {
            ParamValue::Int(v) => Some(v),
            _ => None,
        }
    }

    fn printable(&self) -> String {
        self.to_string()
    }
}

impl ParamType for f64 {
    const KIND: ParamKind = ParamKind::Double;

    fn into_value(self) -> ParamValue {
        ParamValue::Double(self)
    }

    fn from_value(value: &ParamValue) -> Option<&Self> {
        match value {
            ParamValue::Double(v) => Some(v),
            _ => None,
        }
    }

    fn printable(&self) -> String {
        self.to_string()
    }
}

impl ParamType for String {
    const KIND: ParamKind = ParamKind::String;

    fn into_value(self) -> ParamValue {
        ParamValue::String(self)
    }

    fn from_value(value: &ParamValue) -> Option<&Self> {
        match value {
            ParamValue::String(v) => Some(v),
            _ => None,
        }
    }

    fn printable(&self) -> String {
        format!("'{}'", self)
    }

    fn command_line(&self) -> String {
        self.clone()
    }
}

impl ParamType for Vec<String> {
    const KIND: ParamKind = ParamKind::StringVector;

    fn into_value(self) -> ParamValue {
        ParamValue::StringVector(self)
    }

    fn from_value(value: &ParamValue) -> Option<&Self> {
        match value {
            ParamValue::StringVector(v) => Some(v),
            _ => None,
        }
    }

    fn printable(&self) -> String {
        let items: Vec<String> = self.iter().map(|s| format!("'{}'", s)).collect();
        format!("[{}]", items.join(", "))
    }

    fn command_line(&self) -> String {
        self.join(",")
    }
}

impl ParamType for Vec<i64> {
    const KIND: ParamKind = ParamKind::IntVector;

    fn into_value(self) -> ParamValue {
        ParamValue::IntVector(self)
    }

    fn from_value(value: &ParamValue) -> Option<&Self> {
        match value {
            ParamValue::IntVector(v) => Some(v),
            _ => None,
        }
    }

    fn printable(&self) -> String {
        let items: Vec<String> = self.iter().map(|v| v.to_string()).collect();
        format!("[{}]", items.join(", "))
    }

    fn command_line(&self) -> String {
        let items: Vec<String> = self.iter().map(|v| v.to_string()).collect();
        items.join(",")
    }
}

impl ParamType for Matrix {
    const KIND: ParamKind = ParamKind::Matrix;

    fn into_value(self) -> ParamValue {
        ParamValue::Matrix(self)
    }

    fn from_value(value: &ParamValue) -> Option<&Self> {
        match value {
            ParamValue::Matrix(v) => Some(v),
            _ => None,
        }
    }

    fn printable(&self) -> String {
        format!("{}x{} matrix", self.rows(), self.cols())
    }
}

impl ParamType for Vec<usize> {
    const KIND: ParamKind = ParamKind::Labels;

    fn into_value(self) -> ParamValue {
        ParamValue::Labels(self)
    }

    fn from_value(value: &ParamValue) -> Option<&Self> {
        match value {
            ParamValue::Labels(v) => Some(v),
            _ => None,
        }
    }

    fn printable(&self) -> String {
        format!("{}-element row", self.len())
    }
}

impl ParamType for ModelHandle {
    const KIND: ParamKind = ParamKind::Model;

    fn into_value(self) -> ParamValue {
        ParamValue::Model(self)
    }

    fn from_value(value: &ParamValue) -> Option<&Self> {
        match value {
            ParamValue::Model(v) => Some(v),
            _ => None,
        }
    }

    fn printable(&self) -> String {
        if self.is_loaded() {
            format!("{} model", self.model_type)
        } else {
            String::new()
        }
    }
}

impl ParamValue {
    pub fn printable(&self) -> String {
        match self {
            ParamValue::Flag(v) => v.printable(),
            ParamValue::Int(v) => v.printable(),
            ParamValue::Double(v) => v.printable(),
            ParamValue::String(v) => v.printable(),
            ParamValue::StringVector(v) => v.printable(),
            ParamValue::IntVector(v) => v.printable(),
            ParamValue::Matrix(v) => v.printable(),
            ParamValue::Labels(v) => v.printable(),
            ParamValue::Model(v) => v.printable(),
        }
    }

    pub fn command_line(&self) -> String {
        match self {
            ParamValue::Flag(v) => v.command_line(),
            ParamValue::Int(v) => v.command_line(),
            ParamValue::Double(v) => v.command_line(),
            ParamValue::String(v) => v.command_line(),
            ParamValue::StringVector(v) => v.command_line(),
            ParamValue::IntVector(v) => v.command_line(),
            ParamValue::Matrix(v) => v.command_line(),
            ParamValue::Labels(v) => v.command_line(),
            ParamValue::Model(v) => v.command_line(),
        }
    }
}

/// The closed set of operations a binding front-end dispatches per type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ParamOp {
    DefaultParam,
    GetParam,
    GetPrintableParam,
    GetPrintableParamName,
    GetPrintableParamValue,
    GetPrintableType,
    IsSerializable,
}

impl ParamOp {
    pub const ALL: [ParamOp; 7] = [
        ParamOp::DefaultParam,
        ParamOp::GetParam,
        ParamOp::GetPrintableParam,
        ParamOp::GetPrintableParamName,
        ParamOp::GetPrintableParamValue,
        ParamOp::GetPrintableType,
        ParamOp::IsSerializable,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ParamOp::DefaultParam => "DefaultParam",
            ParamOp::GetParam => "GetParam",
            ParamOp::GetPrintableParam => "GetPrintableParam",
            ParamOp::GetPrintableParamName => "GetPrintableParamName",
            ParamOp::GetPrintableParamValue => "GetPrintableParamValue",
            ParamOp::GetPrintableType => "GetPrintableType",
            ParamOp::IsSerializable => "IsSerializable",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ParamOp::ALL.into_iter().find(|op| op.name() == name)
    }
}

impl fmt::Display for ParamOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of applying a `ParamOp`
#[derive(Debug, Clone, PartialEq)]
pub enum OpOutput {
    Value(ParamValue),
    Text(String),
    Flag(bool),
}

impl OpOutput {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            OpOutput::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            OpOutput::Flag(b) => Some(*b),
            _ => None,
        }
    }
}

/// Printable default value. File-backed kinds have no inline default.
pub fn default_param(data: &ParamData) -> String {
    if data.default.kind().is_file_backed() {
        return String::new();
    }
    data.default.printable()
}

/// Option name as typed on a command line
pub fn printable_param_name(data: &ParamData) -> String {
    if data.kind().is_file_backed() {
        format!("--{}_file", data.name)
    } else {
        format!("--{}", data.name)
    }
}

/// Option value as typed on a command line
pub fn printable_param_value(data: &ParamData) -> String {
    if data.kind().is_file_backed() {
        return data.source.clone().unwrap_or_default();
    }
    data.value.command_line()
}

pub fn printable_type(data: &ParamData) -> String {
    match data.kind() {
        ParamKind::Model => data.tname.clone(),
        kind => kind.printable_type().to_string(),
    }
}

pub fn apply(op: ParamOp, data: &ParamData) -> OpOutput {
    match op {
        ParamOp::DefaultParam => OpOutput::Text(default_param(data)),
        ParamOp::GetParam => OpOutput::Value(data.value.clone()),
        ParamOp::GetPrintableParam => OpOutput::Text(data.value.printable()),
        ParamOp::GetPrintableParamName => OpOutput::Text(printable_param_name(data)),
        ParamOp::GetPrintableParamValue => OpOutput::Text(printable_param_value(data)),
        ParamOp::GetPrintableType => OpOutput::Text(printable_type(data)),
        ParamOp::IsSerializable => OpOutput::Flag(data.kind().is_serializable()),
    }
}
