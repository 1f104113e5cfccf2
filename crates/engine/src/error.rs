use std::fmt;

use bindparam_core::ParamKind;

#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// Identifier is empty or contains characters a command line can't carry.
    InvalidIdentifier { identifier: String, reason: String },
    /// Alias is longer than one character or not alphanumeric.
    InvalidAlias { identifier: String, alias: String },
    /// Identifier declared twice for one binding.
    DuplicateIdentifier { binding: String, identifier: String },
    /// Alias already taken by another identifier of the binding.
    DuplicateAlias { binding: String, alias: char, existing: String, identifier: String },
    /// Operation requested for a type that was never installed.
    UnknownType { type_name: String },
    /// Operation name outside the fixed operation set.
    UnknownOperation(String),
    /// No parameter with this identifier in the active set.
    UnknownParam(String),
    /// Value kind doesn't match the declared kind.
    KindMismatch { identifier: String, expected: String, found: String },
    /// Strict restore of a binding that was never stored.
    UnknownBinding(String),
    /// Required inputs not passed.
    MissingRequired(Vec<String>),
}

impl RegistryError {
    pub(crate) fn kind_mismatch(identifier: &str, expected: ParamKind, found: ParamKind) -> Self {
        Self::KindMismatch {
            identifier: identifier.to_string(),
            expected: expected.printable_type().to_string(),
            found: found.printable_type().to_string(),
        }
    }
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidIdentifier { identifier, reason } => {
                write!(f, "invalid parameter identifier '{identifier}': {reason}")
            }
            Self::InvalidAlias { identifier, alias } => {
                write!(f, "parameter '{identifier}': invalid alias '{alias}' (must be one alphanumeric character)")
            }
            Self::DuplicateIdentifier { binding, identifier } => {
                write!(f, "binding '{binding}': parameter '{identifier}' declared more than once")
            }
            Self::DuplicateAlias { binding, alias, existing, identifier } => {
                write!(f, "binding '{binding}': alias '-{alias}' of '{identifier}' is already used by '{existing}'")
            }
            Self::UnknownType { type_name } => {
                write!(f, "no operations installed for type '{type_name}'")
            }
            Self::UnknownOperation(name) => write!(f, "unknown parameter operation '{name}'"),
            Self::UnknownParam(identifier) => write!(f, "unknown parameter '{identifier}'"),
            Self::KindMismatch { identifier, expected, found } => {
                write!(f, "parameter '{identifier}' holds {expected}, not {found}")
            }
            Self::UnknownBinding(name) => write!(f, "no stored settings for binding '{name}'"),
            Self::MissingRequired(names) => {
                let flags: Vec<String> = names.iter().map(|n| format!("--{n}")).collect();
                write!(f, "required option(s) not specified: {}", flags.join(", "))
            }
        }
    }
}

impl std::error::Error for RegistryError {}

#[derive(Debug)]
pub enum ManifestError {
    /// TOML parse / deserialization error.
    Parse(String),
    /// IO error (file read, etc.).
    Io(String),
    /// A parameter entry can't be turned into a descriptor.
    InvalidParam { binding: String, param: String, reason: String },
    /// Declaring the manifest's bindings failed.
    Registry(RegistryError),
}

impl fmt::Display for ManifestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "manifest parse error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
            Self::InvalidParam { binding, param, reason } => {
                write!(f, "binding '{binding}', parameter '{param}': {reason}")
            }
            Self::Registry(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ManifestError {}

impl From<RegistryError> for ManifestError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}
