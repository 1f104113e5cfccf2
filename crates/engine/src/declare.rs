//! Parameter declaration
//!
//! Two ways in. `Registry::declare` registers one option for a binding and
//! leaves the registry as it found it: restore the binding's snapshot, add
//! the option, store the snapshot, clear. Repeated calls for one binding
//! accumulate. `Registry::binding` collects a whole binding's options and
//! commits them in a single pass; a failed commit leaves the stored snapshot
//! untouched.

use bindparam_core::ParamData;

use crate::error::RegistryError;
use crate::registry::Registry;

impl Registry {
    /// Declare one option for `binding`.
    ///
    /// Global options (`verbose`, `copy_all_inputs`) skip the restore step;
    /// persistent options skip the store step. The active set is cleared
    /// afterwards either way.
    pub fn declare(&mut self, binding: &str, data: ParamData) -> Result<(), RegistryError> {
        let persistent = self.settings().is_persistent(&data.name);
        let global = self.settings().is_global(&data.name);

        if !global {
            self.restore(binding);
        }
        let result = self.add(binding, data);
        if result.is_ok() && !persistent {
            self.store(binding);
        }
        self.clear();
        result
    }

    /// Start collecting options for `binding`
    pub fn binding(&mut self, name: &str) -> BindingBuilder<'_> {
        BindingBuilder {
            registry: self,
            name: name.to_string(),
            params: Vec::new(),
        }
    }
}

pub struct BindingBuilder<'a> {
    registry: &'a mut Registry,
    name: String,
    params: Vec<ParamData>,
}

impl BindingBuilder<'_> {
    pub fn param(mut self, data: ParamData) -> Self {
        self.params.push(data);
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = ParamData>) -> Self {
        self.params.extend(params);
        self
    }

    /// Add every collected option on top of the binding's existing snapshot
    /// and store the result. Returns the number of options added.
    pub fn commit(self) -> Result<usize, RegistryError> {
        let BindingBuilder { registry, name, params } = self;
        let count = params.len();

        let before = registry.clone();
        registry.restore(&name);
        for data in params {
            if let Err(e) = registry.add(&name, data) {
                *registry = before;
                registry.clear();
                return Err(e);
            }
        }
        registry.store(&name);
        registry.clear();
        log::debug!("binding '{}': committed {} option(s)", name, count);
        Ok(count)
    }
}

/// Parse an alias as bindings spell it: empty for none, else one character
pub fn parse_alias(identifier: &str, alias: &str) -> Result<Option<char>, RegistryError> {
    let mut chars = alias.chars();
    match (chars.next(), chars.next()) {
        (None, _) => Ok(None),
        (Some(c), None) if c.is_ascii_alphanumeric() => Ok(Some(c)),
        _ => Err(RegistryError::InvalidAlias {
            identifier: identifier.to_string(),
            alias: alias.to_string(),
        }),
    }
}
