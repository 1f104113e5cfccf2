//! Settings registry
//!
//! A `Registry` is the context every binding declares into and executes
//! against. It holds the active parameter set, a snapshot cache keyed by
//! binding name, and the type table. Callers own their registry; there is no
//! process-wide instance.
//!
//! Lifecycle:
//! - `restore(name)` replaces the active set with the stored snapshot for
//!   `name` (empty when nothing was stored)
//! - `store(name)` copies the active set into the cache under `name`
//! - `clear()` empties the active set
//!
//! Persistent parameters (`verbose`, `help`, ...) take no part in any of the
//! three: they are never stored, restore leaves them in place, and clear
//! keeps them.

use std::collections::BTreeMap;

use bindparam_config::{DuplicatePolicy, RegistrySettings};
use bindparam_core::ops::{OpOutput, ParamOp};
use bindparam_core::ParamData;

use crate::error::RegistryError;
use crate::param_set::ParamSet;
use crate::types::TypeTable;

#[derive(Debug, Clone, Default)]
pub struct Registry {
    settings: RegistrySettings,
    active: ParamSet,
    snapshots: BTreeMap<String, ParamSet>,
    types: TypeTable,
    /// Binding the active set was last restored from
    current: String,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: RegistrySettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &RegistrySettings {
        &self.settings
    }

    /// Parameters currently being assembled or consumed
    pub fn active(&self) -> &ParamSet {
        &self.active
    }

    pub(crate) fn active_mut(&mut self) -> &mut ParamSet {
        &mut self.active
    }

    pub fn types(&self) -> &TypeTable {
        &self.types
    }

    /// Binding the active set was last restored from ("" if none)
    pub fn current_binding(&self) -> &str {
        &self.current
    }

    pub fn snapshot(&self, binding: &str) -> Option<&ParamSet> {
        self.snapshots.get(binding)
    }

    /// Names of all stored bindings, sorted
    pub fn bindings(&self) -> Vec<&str> {
        self.snapshots.keys().map(String::as_str).collect()
    }

    pub fn is_persistent(&self, identifier: &str) -> bool {
        self.settings.is_persistent(identifier)
    }

    /// Copy the non-persistent part of the active set into the cache
    pub fn store(&mut self, binding: &str) {
        let snapshot = self.active.filtered(|p| !p.persistent);
        log::debug!("storing {} parameter(s) for binding '{}'", snapshot.len(), binding);
        self.snapshots.insert(binding.to_string(), snapshot);
    }

    /// Load the snapshot for `binding` into the active set. A binding that
    /// was never stored leaves only the persistent parameters.
    pub fn restore(&mut self, binding: &str) {
        let mut active = self.active.filtered(|p| p.persistent);
        match self.snapshots.get(binding) {
            Some(snapshot) => {
                for data in snapshot.iter() {
                    active.merge(binding, data.clone());
                }
            }
            None => log::debug!("no stored settings for binding '{}', starting empty", binding),
        }
        self.active = active;
        self.current = binding.to_string();
    }

    /// Like `restore`, but a binding that was never stored is an error
    pub fn restore_strict(&mut self, binding: &str) -> Result<(), RegistryError> {
        if !self.snapshots.contains_key(binding) {
            return Err(RegistryError::UnknownBinding(binding.to_string()));
        }
        self.restore(binding);
        Ok(())
    }

    /// Empty the active set, keeping persistent parameters
    pub fn clear(&mut self) {
        self.active = self.active.filtered(|p| p.persistent);
        self.current.clear();
    }

    /// Drop a stored binding entirely
    pub fn forget(&mut self, binding: &str) -> Option<ParamSet> {
        self.snapshots.remove(binding)
    }

    /// Validate `data`, install its type's operations and add it to the
    /// active set on behalf of `binding`
    pub(crate) fn add(&mut self, binding: &str, mut data: ParamData) -> Result<(), RegistryError> {
        validate_identifier(&data.name)?;
        if let Some(alias) = data.alias {
            if !alias.is_ascii_alphanumeric() {
                return Err(RegistryError::InvalidAlias {
                    identifier: data.name.clone(),
                    alias: alias.to_string(),
                });
            }
        }

        data.persistent = self.settings.is_persistent(&data.name);
        data.was_passed = false;
        data.loaded = false;

        if data.persistent {
            self.claim_alias_across_snapshots(&data)?;
        }

        self.types.install(&data.tname, data.kind());
        log::debug!("binding '{}': declaring {} '{}'", binding, data.kind(), data.name);
        self.active.insert(binding, data, self.settings.duplicate_policy)?;
        Ok(())
    }

    /// Persistent parameters join every binding on restore, so their alias
    /// must be free in every stored snapshot too.
    fn claim_alias_across_snapshots(&mut self, data: &ParamData) -> Result<(), RegistryError> {
        let policy = self.settings.duplicate_policy;
        for (binding, snapshot) in self.snapshots.iter_mut() {
            let Some((alias, existing)) = snapshot.alias_clash(data) else {
                continue;
            };
            if policy == DuplicatePolicy::Reject {
                return Err(RegistryError::DuplicateAlias {
                    binding: binding.clone(),
                    alias,
                    existing,
                    identifier: data.name.clone(),
                });
            }
            log::warn!("binding '{}': alias -{} moves from '{}' to '{}'", binding, alias, existing, data.name);
            snapshot.clear_alias(&existing);
        }
        Ok(())
    }

    /// Apply `op` to the active parameter `identifier`
    pub fn dispatch(&self, identifier: &str, op: ParamOp) -> Result<OpOutput, RegistryError> {
        let data = self
            .active
            .get(identifier)
            .ok_or_else(|| RegistryError::UnknownParam(identifier.to_string()))?;
        self.types.dispatch(op, data)
    }

    /// String-keyed dispatch: (`type_name`, `op_name`) applied to `identifier`.
    /// Fails if the type tag was never installed, even if the parameter exists.
    pub fn dispatch_named(
        &self,
        type_name: &str,
        op_name: &str,
        identifier: &str,
    ) -> Result<OpOutput, RegistryError> {
        let kind = self.types.lookup_named(type_name, op_name)?;
        let data = self
            .active
            .get(identifier)
            .ok_or_else(|| RegistryError::UnknownParam(identifier.to_string()))?;
        if kind != data.kind() {
            return Err(RegistryError::kind_mismatch(identifier, kind, data.kind()));
        }
        let op = ParamOp::from_name(op_name)
            .ok_or_else(|| RegistryError::UnknownOperation(op_name.to_string()))?;
        self.types.dispatch(op, data)
    }
}

/// Identifiers are what a command line carries: lowercase ASCII letters,
/// digits and underscores, starting with a letter.
pub fn validate_identifier(identifier: &str) -> Result<(), RegistryError> {
    let invalid = |reason: &str| RegistryError::InvalidIdentifier {
        identifier: identifier.to_string(),
        reason: reason.to_string(),
    };

    let first = identifier.chars().next().ok_or_else(|| invalid("identifier cannot be empty"))?;
    if !first.is_ascii_lowercase() {
        return Err(invalid("must start with a lowercase letter"));
    }
    if !identifier
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
    {
        return Err(invalid("can only contain lowercase letters, digits and underscores"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn states() -> ParamData {
        ParamData::new("states", "Number of hidden states.", 0i64).with_alias('n')
    }

    fn verbose() -> ParamData {
        ParamData::new("verbose", "Display informational messages.", false).with_alias('v')
    }

    #[test]
    fn test_store_clear_restore() {
        let mut reg = Registry::new();
        reg.add("HMMTrain", states()).unwrap();
        reg.store("HMMTrain");
        reg.clear();
        assert!(reg.active().is_empty());

        reg.restore("HMMTrain");
        assert!(reg.active().contains("states"));
        assert_eq!(reg.current_binding(), "HMMTrain");
    }

    #[test]
    fn test_restore_unknown_binding_is_empty() {
        let mut reg = Registry::new();
        reg.add("HMMTrain", states()).unwrap();
        reg.restore("NeverStored");
        assert!(reg.active().is_empty());
        assert_eq!(reg.restore_strict("NeverStored"), Err(RegistryError::UnknownBinding("NeverStored".into())));
    }

    #[test]
    fn test_persistent_survives_clear_and_restore() {
        let mut reg = Registry::new();
        reg.add("HMMTrain", verbose()).unwrap();
        reg.add("HMMTrain", states()).unwrap();
        reg.store("HMMTrain");

        // Persistent parameters are not part of the snapshot
        assert!(!reg.snapshot("HMMTrain").unwrap().contains("verbose"));

        reg.clear();
        assert_eq!(reg.active().names(), vec!["verbose"]);
        reg.restore("Perceptron");
        assert_eq!(reg.active().names(), vec!["verbose"]);
    }

    #[test]
    fn test_add_sets_persistent_flag() {
        let mut reg = Registry::new();
        reg.add("HMMTrain", verbose()).unwrap();
        reg.add("HMMTrain", states()).unwrap();
        assert!(reg.active().get("verbose").unwrap().persistent);
        assert!(!reg.active().get("states").unwrap().persistent);
    }

    #[test]
    fn test_add_rejects_bad_identifiers_and_aliases() {
        let mut reg = Registry::new();
        for bad in ["", "States", "1states", "num-states"] {
            let p = ParamData::new(bad, "", 0i64);
            assert!(matches!(reg.add("B", p), Err(RegistryError::InvalidIdentifier { .. })), "{:?}", bad);
        }
        let p = ParamData::new("states", "", 0i64).with_alias('-');
        assert!(matches!(reg.add("B", p), Err(RegistryError::InvalidAlias { .. })));
    }

    #[test]
    fn test_dispatch_by_identifier() {
        let mut reg = Registry::new();
        reg.add("HMMTrain", states()).unwrap();
        assert_eq!(
            reg.dispatch("states", ParamOp::GetPrintableParamName).unwrap().as_text(),
            Some("--states")
        );
        assert_eq!(reg.dispatch("seed", ParamOp::GetParam), Err(RegistryError::UnknownParam("seed".into())));
    }

    #[test]
    fn test_dispatch_named_unknown_type() {
        let mut reg = Registry::new();
        reg.add("HMMTrain", states()).unwrap();
        assert_eq!(
            reg.dispatch_named("double", "GetPrintableType", "states"),
            Err(RegistryError::UnknownType { type_name: "double".into() })
        );
        assert_eq!(
            reg.dispatch_named("int", "GetPrintableType", "states").unwrap().as_text(),
            Some("int")
        );
    }

    #[test]
    fn test_persistent_alias_checked_against_snapshots() {
        let mut reg = Registry::new();
        let vectors = ParamData::new("vectors", "Vectors to cluster.", Vec::<i64>::new()).with_alias('v');
        reg.add("KMeans", vectors).unwrap();
        reg.store("KMeans");
        reg.clear();

        let err = reg.add("HMMTrain", verbose()).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateAlias {
                binding: "KMeans".into(),
                alias: 'v',
                existing: "vectors".into(),
                identifier: "verbose".into(),
            }
        );
        assert!(reg.active().is_empty());
    }

    #[test]
    fn test_persistent_alias_overwrite_clears_snapshot_alias() {
        let settings = RegistrySettings {
            duplicate_policy: DuplicatePolicy::Overwrite,
            ..Default::default()
        };
        let mut reg = Registry::with_settings(settings);
        let vectors = ParamData::new("vectors", "Vectors to cluster.", Vec::<i64>::new()).with_alias('v');
        reg.add("KMeans", vectors).unwrap();
        reg.store("KMeans");
        reg.clear();

        reg.add("HMMTrain", verbose()).unwrap();
        assert_eq!(reg.snapshot("KMeans").unwrap().get("vectors").unwrap().alias, None);

        reg.restore("KMeans");
        assert_eq!(reg.active().by_alias('v').map(|p| p.name.as_str()), Some("verbose"));
    }
}
