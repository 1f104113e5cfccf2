//! Type table
//!
//! Records which runtime type tags have had their operation set installed,
//! and dispatches `ParamOp`s by type tag. The operations themselves live in
//! `bindparam_core::ops`; a tag only becomes dispatchable once a declaration
//! of that type has gone through the registry.

use std::collections::{BTreeMap, BTreeSet};

use bindparam_core::ops::{self, OpOutput, ParamOp};
use bindparam_core::{ParamData, ParamKind};

use crate::error::RegistryError;

#[derive(Debug, Clone, PartialEq)]
pub struct TypeEntry {
    pub kind: ParamKind,
    pub ops: BTreeSet<ParamOp>,
}

#[derive(Debug, Clone, Default)]
pub struct TypeTable {
    entries: BTreeMap<String, TypeEntry>,
}

impl TypeTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the full operation set for `type_name`. Installing a tag
    /// twice replaces the entry with an identical one.
    pub fn install(&mut self, type_name: &str, kind: ParamKind) {
        let entry = TypeEntry {
            kind,
            ops: ParamOp::ALL.into_iter().collect(),
        };
        if self.entries.insert(type_name.to_string(), entry).is_none() {
            log::debug!("installed {} operations for type '{}'", ParamOp::ALL.len(), type_name);
        }
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    pub fn entry(&self, type_name: &str) -> Option<&TypeEntry> {
        self.entries.get(type_name)
    }

    pub fn type_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Find the operation for (`type_name`, `op`)
    pub fn lookup(&self, type_name: &str, op: ParamOp) -> Result<ParamKind, RegistryError> {
        match self.entries.get(type_name) {
            Some(entry) if entry.ops.contains(&op) => Ok(entry.kind),
            _ => Err(RegistryError::UnknownType { type_name: type_name.to_string() }),
        }
    }

    /// Same as `lookup`, with the operation given by name
    pub fn lookup_named(&self, type_name: &str, op_name: &str) -> Result<ParamKind, RegistryError> {
        let op = ParamOp::from_name(op_name)
            .ok_or_else(|| RegistryError::UnknownOperation(op_name.to_string()))?;
        self.lookup(type_name, op)
    }

    /// Apply `op` to `data` through the entry for the descriptor's type tag
    pub fn dispatch(&self, op: ParamOp, data: &ParamData) -> Result<OpOutput, RegistryError> {
        let kind = self.lookup(&data.tname, op)?;
        if kind != data.kind() {
            return Err(RegistryError::kind_mismatch(&data.name, kind, data.kind()));
        }
        Ok(ops::apply(op, data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_is_idempotent() {
        let mut table = TypeTable::new();
        table.install("int", ParamKind::Int);
        table.install("int", ParamKind::Int);
        assert_eq!(table.len(), 1);
        assert_eq!(table.entry("int").map(|e| e.ops.len()), Some(ParamOp::ALL.len()));
    }

    #[test]
    fn test_unknown_type_fails() {
        let table = TypeTable::new();
        let p = ParamData::new("seed", "Random seed.", 0i64);
        assert_eq!(
            table.dispatch(ParamOp::GetPrintableType, &p),
            Err(RegistryError::UnknownType { type_name: "int".into() })
        );
    }

    #[test]
    fn test_lookup_by_name() {
        let mut table = TypeTable::new();
        table.install("double", ParamKind::Double);
        assert_eq!(table.lookup_named("double", "IsSerializable"), Ok(ParamKind::Double));
        assert_eq!(
            table.lookup_named("double", "Serialize"),
            Err(RegistryError::UnknownOperation("Serialize".into()))
        );
        assert!(table.lookup_named("float", "GetParam").is_err());
    }

    #[test]
    fn test_dispatch_checks_kind_against_tag() {
        let mut table = TypeTable::new();
        table.install("int", ParamKind::Int);
        let mut p = ParamData::new("tolerance", "Tolerance.", 0.5);
        p.tname = "int".into();
        assert!(matches!(
            table.dispatch(ParamOp::GetParam, &p),
            Err(RegistryError::KindMismatch { .. })
        ));
    }
}
