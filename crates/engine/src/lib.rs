//! `bindparam-engine` — the parameter registry bindings declare into.
//!
//! A `Registry` holds the active parameter set, a snapshot cache keyed by
//! binding name, and the table of installed types. Bindings declare options
//! one at a time (`Registry::declare`) or in one pass (`Registry::binding`),
//! then execute against a context restored from their snapshot.

pub mod declare;
pub mod error;
pub mod exec;
pub mod manifest;
pub mod param_set;
pub mod registry;
pub mod types;

pub use bindparam_config::{DuplicatePolicy, RegistrySettings};
pub use declare::{parse_alias, BindingBuilder};
pub use error::{ManifestError, RegistryError};
pub use manifest::BindingManifest;
pub use param_set::ParamSet;
pub use registry::Registry;
pub use types::TypeTable;
