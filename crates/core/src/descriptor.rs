//! Parameter descriptors
//!
//! A `ParamData` describes one named, typed option of a binding: its
//! identifier and alias, documentation, the value it currently holds and the
//! flags that govern validation and snapshotting.

use serde::{Deserialize, Serialize};

use crate::ops::ParamType;
use crate::value::{ParamKind, ParamValue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamData {
    /// Unique name within a binding's parameter set
    pub name: String,

    /// Single-character short form
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<char>,

    pub desc: String,

    /// Runtime type tag (see `ParamValue::type_name`)
    pub tname: String,

    /// Implementation-level type spelling, used by code-generating bindings
    pub cpp_type: String,

    /// Current value, initialised to the declared default
    pub value: ParamValue,

    /// Value at declaration time
    pub default: ParamValue,

    pub required: bool,
    pub input: bool,
    pub persistent: bool,
    pub no_transpose: bool,

    /// Set when the user supplies the option
    pub was_passed: bool,

    /// Set once a file-backed value has been read in
    pub loaded: bool,

    /// File a file-backed value was read from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl ParamData {
    /// Describe an input option holding `default`
    pub fn new<T: ParamType>(name: impl Into<String>, desc: impl Into<String>, default: T) -> Self {
        Self::from_value(name, desc, default.into_value())
    }

    pub fn from_value(name: impl Into<String>, desc: impl Into<String>, default: ParamValue) -> Self {
        let tname = default.type_name();
        Self {
            name: name.into(),
            alias: None,
            desc: desc.into(),
            cpp_type: tname.clone(),
            tname,
            value: default.clone(),
            default,
            required: false,
            input: true,
            persistent: false,
            no_transpose: false,
            was_passed: false,
            loaded: false,
            source: None,
        }
    }

    pub fn with_alias(mut self, alias: char) -> Self {
        self.alias = Some(alias);
        self
    }

    pub fn with_cpp_type(mut self, cpp_type: impl Into<String>) -> Self {
        self.cpp_type = cpp_type.into();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark as an output option (written by the binding, read by the caller)
    pub fn output(mut self) -> Self {
        self.input = false;
        self
    }

    pub fn no_transpose(mut self) -> Self {
        self.no_transpose = true;
        self
    }

    pub fn kind(&self) -> ParamKind {
        self.value.kind()
    }

    /// Put the value and runtime flags back to their declared state
    pub fn reset(&mut self) {
        self.value = self.default.clone();
        self.was_passed = false;
        self.loaded = false;
        self.source = None;
    }
}
