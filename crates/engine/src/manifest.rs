//! Binding manifests
//!
//! A TOML description of one or more bindings and their options, declared
//! into a registry in one pass per binding.
//!
//! ```toml
//! [[binding]]
//! name = "HMMTrain"
//! description = "Train a hidden Markov model."
//!
//! [[binding.param]]
//! name = "states"
//! kind = "int"
//! alias = "n"
//! description = "Number of hidden states."
//! ```

use std::path::Path;

use serde::Deserialize;

use bindparam_config::RegistrySettings;
use bindparam_core::{ParamData, ParamKind, ParamValue};

use crate::declare::parse_alias;
use crate::error::ManifestError;
use crate::registry::Registry;

#[derive(Debug, Clone, Deserialize)]
pub struct BindingManifest {
    #[serde(default, rename = "binding")]
    pub bindings: Vec<BindingSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BindingSpec {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "param")]
    pub params: Vec<ParamSpec>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParamSpec {
    pub name: String,
    pub kind: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub default: Option<toml::Value>,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_true")]
    pub input: bool,
    #[serde(default)]
    pub no_transpose: bool,
    /// Model type name; required for `kind = "model"`
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub cpp_type: Option<String>,
}

fn default_true() -> bool {
    true
}

impl BindingManifest {
    pub fn from_toml(input: &str) -> Result<Self, ManifestError> {
        let manifest: BindingManifest =
            toml::from_str(input).map_err(|e| ManifestError::Parse(e.to_string()))?;
        Ok(manifest)
    }

    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| ManifestError::Io(format!("{}: {}", path.display(), e)))?;
        Self::from_toml(&input)
    }

    pub fn binding(&self, name: &str) -> Option<&BindingSpec> {
        self.bindings.iter().find(|b| b.name == name)
    }

    /// Declare every binding into `registry`
    pub fn declare_into(&self, registry: &mut Registry) -> Result<(), ManifestError> {
        for binding in &self.bindings {
            let params = binding
                .params
                .iter()
                .map(|p| p.to_param_data(&binding.name))
                .collect::<Result<Vec<_>, _>>()?;
            registry.binding(&binding.name).params(params).commit()?;
        }
        Ok(())
    }

    /// A new registry holding every binding of the manifest
    pub fn build_registry(&self, settings: RegistrySettings) -> Result<Registry, ManifestError> {
        let mut registry = Registry::with_settings(settings);
        self.declare_into(&mut registry)?;
        Ok(registry)
    }
}

impl ParamSpec {
    pub fn to_param_data(&self, binding: &str) -> Result<ParamData, ManifestError> {
        let invalid = |reason: String| ManifestError::InvalidParam {
            binding: binding.to_string(),
            param: self.name.clone(),
            reason,
        };

        let kind = ParamKind::parse(&self.kind)
            .ok_or_else(|| invalid(format!("unknown kind '{}'", self.kind)))?;

        let model_type = match (kind, &self.model_type) {
            (ParamKind::Model, Some(t)) if !t.trim().is_empty() => t.trim().to_string(),
            (ParamKind::Model, _) => return Err(invalid("model parameters need a model_type".into())),
            _ => String::new(),
        };

        let value = match &self.default {
            None => kind.zero_value(&model_type),
            Some(v) => default_value(kind, v).map_err(invalid)?,
        };

        let mut data = ParamData::from_value(&self.name, &self.description, value);
        data.alias = parse_alias(&self.name, &self.alias)?;
        if let Some(cpp_type) = &self.cpp_type {
            data.cpp_type = cpp_type.clone();
        }
        data.required = self.required;
        data.input = self.input;
        data.no_transpose = self.no_transpose;
        Ok(data)
    }
}

/// Convert a TOML default into a value of `kind`
fn default_value(kind: ParamKind, value: &toml::Value) -> Result<ParamValue, String> {
    use toml::Value;

    let mismatch = || format!("default {} is not a valid {}", value, kind);
    match (kind, value) {
        (ParamKind::Flag, Value::Boolean(b)) => Ok(ParamValue::Flag(*b)),
        (ParamKind::Int, Value::Integer(i)) => Ok(ParamValue::Int(*i)),
        (ParamKind::Double, Value::Float(f)) => Ok(ParamValue::Double(*f)),
        (ParamKind::Double, Value::Integer(i)) => Ok(ParamValue::Double(*i as f64)),
        (ParamKind::String, Value::String(s)) => Ok(ParamValue::String(s.clone())),
        (ParamKind::StringVector, Value::Array(items)) => items
            .iter()
            .map(|v| v.as_str().map(str::to_string).ok_or_else(mismatch))
            .collect::<Result<Vec<_>, _>>()
            .map(ParamValue::StringVector),
        (ParamKind::IntVector, Value::Array(items)) => items
            .iter()
            .map(|v| v.as_integer().ok_or_else(mismatch))
            .collect::<Result<Vec<_>, _>>()
            .map(ParamValue::IntVector),
        (ParamKind::Matrix | ParamKind::Labels | ParamKind::Model, _) => {
            Err(format!("{} parameters cannot have an inline default", kind))
        }
        _ => Err(mismatch()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;

    const PERCEPTRON: &str = r#"
[[binding]]
name = "Perceptron"
description = "Single-layer perceptron classifier."

[[binding.param]]
name = "training"
kind = "matrix"
alias = "t"
description = "A matrix containing the training set."

[[binding.param]]
name = "max_iterations"
kind = "int"
alias = "n"
default = 1000
description = "Maximum number of iterations the perceptron is to be run."

[[binding.param]]
name = "output_model"
kind = "model"
model_type = "PerceptronModel"
input = false
description = "Output for trained perceptron model."
"#;

    #[test]
    fn test_parse_and_declare() {
        let manifest = BindingManifest::from_toml(PERCEPTRON).unwrap();
        assert_eq!(manifest.bindings.len(), 1);
        let reg = manifest.build_registry(RegistrySettings::default()).unwrap();

        let snap = reg.snapshot("Perceptron").unwrap();
        assert_eq!(snap.names(), vec!["max_iterations", "output_model", "training"]);
        assert_eq!(snap.get("max_iterations").unwrap().value, ParamValue::Int(1000));
        let model = snap.get("output_model").unwrap();
        assert!(!model.input);
        assert_eq!(model.tname, "PerceptronModel");
    }

    #[test]
    fn test_double_accepts_integer_default() {
        let spec = ParamSpec {
            name: "tolerance".into(),
            kind: "double".into(),
            description: String::new(),
            alias: String::new(),
            default: Some(toml::Value::Integer(1)),
            required: false,
            input: true,
            no_transpose: false,
            model_type: None,
            cpp_type: None,
        };
        assert_eq!(spec.to_param_data("HMMTrain").unwrap().value, ParamValue::Double(1.0));
    }

    #[test]
    fn test_bad_entries() {
        let unknown_kind = "[[binding]]\nname = \"B\"\n[[binding.param]]\nname = \"x\"\nkind = \"tensor\"\n";
        let reg_err = BindingManifest::from_toml(unknown_kind)
            .unwrap()
            .build_registry(RegistrySettings::default())
            .unwrap_err();
        assert!(matches!(reg_err, ManifestError::InvalidParam { .. }));

        let no_model_type = "[[binding]]\nname = \"B\"\n[[binding.param]]\nname = \"m\"\nkind = \"model\"\n";
        let err = BindingManifest::from_toml(no_model_type)
            .unwrap()
            .build_registry(RegistrySettings::default())
            .unwrap_err();
        assert!(err.to_string().contains("model_type"));

        let bad_default = "[[binding]]\nname = \"B\"\n[[binding.param]]\nname = \"n\"\nkind = \"int\"\ndefault = \"ten\"\n";
        assert!(BindingManifest::from_toml(bad_default)
            .unwrap()
            .build_registry(RegistrySettings::default())
            .is_err());
    }

    #[test]
    fn test_duplicate_param_in_manifest() {
        let dup = r#"
[[binding]]
name = "B"
[[binding.param]]
name = "seed"
kind = "int"
[[binding.param]]
name = "seed"
kind = "int"
"#;
        let err = BindingManifest::from_toml(dup)
            .unwrap()
            .build_registry(RegistrySettings::default())
            .unwrap_err();
        assert!(matches!(err, ManifestError::Registry(RegistryError::DuplicateIdentifier { .. })));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(BindingManifest::from_toml("[[binding]\n"), Err(ManifestError::Parse(_))));
    }
}
