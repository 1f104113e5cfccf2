//! Parameter sets
//!
//! One binding's parameters, keyed by identifier, with an alias index kept
//! in step. Used for both the active set and stored snapshots.

use std::collections::BTreeMap;

use bindparam_config::DuplicatePolicy;
use bindparam_core::ParamData;

use crate::error::RegistryError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamSet {
    params: BTreeMap<String, ParamData>,
    aliases: BTreeMap<char, String>,
}

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a descriptor on behalf of `binding`.
    ///
    /// Re-declaring a persistent parameter replaces it. Any other identifier
    /// clash, and every alias clash, is resolved by `policy`. Returns the
    /// descriptor that was replaced, if any.
    pub fn insert(
        &mut self,
        binding: &str,
        data: ParamData,
        policy: DuplicatePolicy,
    ) -> Result<Option<ParamData>, RegistryError> {
        let redeclared_persistent = self
            .params
            .get(&data.name)
            .map(|existing| existing.persistent && data.persistent);

        if redeclared_persistent == Some(false) && policy == DuplicatePolicy::Reject {
            return Err(RegistryError::DuplicateIdentifier {
                binding: binding.to_string(),
                identifier: data.name.clone(),
            });
        }

        if let Some((alias, existing)) = self.alias_clash(&data) {
            if policy == DuplicatePolicy::Reject {
                return Err(RegistryError::DuplicateAlias {
                    binding: binding.to_string(),
                    alias,
                    existing,
                    identifier: data.name.clone(),
                });
            }
            self.take_alias(binding, alias, &existing, &data.name);
        }

        let replaced = self.put(data);
        if let Some(old) = &replaced {
            if !old.persistent {
                log::warn!("binding '{}': parameter '{}' redeclared, last declaration wins", binding, old.name);
            }
        }
        Ok(replaced)
    }

    /// Add a descriptor restored from a snapshot. An alias already held by
    /// another parameter moves to the restored one.
    pub(crate) fn merge(&mut self, binding: &str, data: ParamData) {
        if let Some((alias, existing)) = self.alias_clash(&data) {
            self.take_alias(binding, alias, &existing, &data.name);
        }
        self.put(data);
    }

    /// Alias of `data` and the other parameter that already holds it
    pub(crate) fn alias_clash(&self, data: &ParamData) -> Option<(char, String)> {
        let alias = data.alias?;
        self.aliases
            .get(&alias)
            .filter(|owner| **owner != data.name)
            .map(|owner| (alias, owner.clone()))
    }

    fn take_alias(&mut self, binding: &str, alias: char, existing: &str, identifier: &str) {
        log::warn!("binding '{}': alias -{} moves from '{}' to '{}'", binding, alias, existing, identifier);
        self.clear_alias(existing);
    }

    /// Drop the alias of `identifier`, if it has one
    pub(crate) fn clear_alias(&mut self, identifier: &str) {
        if let Some(data) = self.params.get_mut(identifier) {
            if let Some(alias) = data.alias.take() {
                if self.aliases.get(&alias).map(String::as_str) == Some(identifier) {
                    self.aliases.remove(&alias);
                }
            }
        }
    }

    /// Insert without duplicate checks, keeping the alias index consistent
    pub(crate) fn put(&mut self, data: ParamData) -> Option<ParamData> {
        let replaced = self.params.remove(&data.name);
        if let Some(alias) = replaced.as_ref().and_then(|old| old.alias) {
            if self.aliases.get(&alias) == Some(&data.name) {
                self.aliases.remove(&alias);
            }
        }
        if let Some(alias) = data.alias {
            self.aliases.insert(alias, data.name.clone());
        }
        self.params.insert(data.name.clone(), data);
        replaced
    }

    pub fn get(&self, identifier: &str) -> Option<&ParamData> {
        self.params.get(identifier)
    }

    pub fn get_mut(&mut self, identifier: &str) -> Option<&mut ParamData> {
        self.params.get_mut(identifier)
    }

    /// Look a parameter up by its single-character alias
    pub fn by_alias(&self, alias: char) -> Option<&ParamData> {
        self.aliases.get(&alias).and_then(|name| self.params.get(name))
    }

    pub fn remove(&mut self, identifier: &str) -> Option<ParamData> {
        let removed = self.params.remove(identifier)?;
        if let Some(alias) = removed.alias {
            if self.aliases.get(&alias).map(String::as_str) == Some(identifier) {
                self.aliases.remove(&alias);
            }
        }
        Some(removed)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.params.contains_key(identifier)
    }

    /// Descriptors in identifier order
    pub fn iter(&self) -> impl Iterator<Item = &ParamData> {
        self.params.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut ParamData> {
        self.params.values_mut()
    }

    pub fn names(&self) -> Vec<&str> {
        self.params.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Split off the descriptors that satisfy `keep`
    pub(crate) fn filtered(&self, keep: impl Fn(&ParamData) -> bool) -> ParamSet {
        let mut out = ParamSet::new();
        for data in self.params.values().filter(|d| keep(d)) {
            out.put(data.clone());
        }
        out
    }
}
