//! Binding execution
//!
//! What a binding's main routine (or a test driving it) does with the
//! active set once its options are restored: set inputs, read values back,
//! check what was passed, and reset between runs.

use bindparam_core::{ParamData, ParamKind, ParamType, ParamValue};

use crate::error::RegistryError;
use crate::registry::Registry;

impl Registry {
    /// A fresh execution context for `binding`: a copy of this registry with
    /// the binding's snapshot restored into the active set.
    pub fn execution(&self, binding: &str) -> Result<Registry, RegistryError> {
        let mut ctx = self.clone();
        if self.settings().strict_restore {
            ctx.restore_strict(binding)?;
        } else {
            ctx.restore(binding);
        }
        Ok(ctx)
    }

    /// Clear and restore `binding` again, discarding values set since
    pub fn reset_settings(&mut self, binding: &str) {
        self.clear();
        self.restore(binding);
    }

    fn param_mut(&mut self, identifier: &str) -> Result<&mut ParamData, RegistryError> {
        self.active_mut()
            .get_mut(identifier)
            .ok_or_else(|| RegistryError::UnknownParam(identifier.to_string()))
    }

    pub fn param(&self, identifier: &str) -> Result<&ParamData, RegistryError> {
        self.active()
            .get(identifier)
            .ok_or_else(|| RegistryError::UnknownParam(identifier.to_string()))
    }

    /// Resolve a single-character alias to its parameter
    pub fn param_by_alias(&self, alias: char) -> Result<&ParamData, RegistryError> {
        self.active()
            .by_alias(alias)
            .ok_or_else(|| RegistryError::UnknownParam(format!("-{}", alias)))
    }

    /// Set a value as if the user passed it
    pub fn set_input_param<T: ParamType>(&mut self, identifier: &str, value: T) -> Result<(), RegistryError> {
        self.set_input_value(identifier, value.into_value())
    }

    pub fn set_input_value(&mut self, identifier: &str, value: ParamValue) -> Result<(), RegistryError> {
        let data = self.param_mut(identifier)?;
        check_assignable(data, &value)?;
        data.value = value;
        data.was_passed = true;
        Ok(())
    }

    /// Parse `text` as the parameter's kind and set it as passed
    pub fn set_input_text(&mut self, identifier: &str, text: &str) -> Result<(), RegistryError> {
        let kind = self.param(identifier)?.kind();
        let value = ParamValue::parse(kind, text).map_err(|reason| RegistryError::KindMismatch {
            identifier: identifier.to_string(),
            expected: kind.printable_type().to_string(),
            found: reason,
        })?;
        self.set_input_value(identifier, value)
    }

    /// Write a result into an output parameter
    pub fn set_output_param<T: ParamType>(&mut self, identifier: &str, value: T) -> Result<(), RegistryError> {
        let value = value.into_value();
        let data = self.param_mut(identifier)?;
        check_assignable(data, &value)?;
        data.value = value;
        Ok(())
    }

    /// Typed read of a parameter's current value
    pub fn get_param<T: ParamType>(&self, identifier: &str) -> Result<&T, RegistryError> {
        let data = self.param(identifier)?;
        T::from_value(&data.value)
            .ok_or_else(|| RegistryError::kind_mismatch(identifier, data.kind(), T::KIND))
    }

    pub fn param_value(&self, identifier: &str) -> Result<&ParamValue, RegistryError> {
        Ok(&self.param(identifier)?.value)
    }

    /// Whether the user passed `identifier`
    pub fn has_param(&self, identifier: &str) -> Result<bool, RegistryError> {
        Ok(self.param(identifier)?.was_passed)
    }

    pub fn set_passed(&mut self, identifier: &str) -> Result<(), RegistryError> {
        self.param_mut(identifier)?.was_passed = true;
        Ok(())
    }

    pub fn set_unpassed(&mut self, identifier: &str) -> Result<(), RegistryError> {
        self.param_mut(identifier)?.was_passed = false;
        Ok(())
    }

    /// Forget which options were passed, keeping their values
    pub fn reset_passed(&mut self) {
        for data in self.active_mut().iter_mut() {
            data.was_passed = false;
        }
    }

    /// Record that a file-backed value was read from `source`
    pub fn mark_loaded(&mut self, identifier: &str, source: &str) -> Result<(), RegistryError> {
        let data = self.param_mut(identifier)?;
        if !data.kind().is_file_backed() {
            return Err(RegistryError::KindMismatch {
                identifier: identifier.to_string(),
                expected: "file-backed value".to_string(),
                found: data.kind().printable_type().to_string(),
            });
        }
        data.loaded = true;
        data.source = Some(source.to_string());
        Ok(())
    }

    /// Error naming every required input that was not passed
    pub fn check_required(&self) -> Result<(), RegistryError> {
        let missing: Vec<String> = self
            .active()
            .iter()
            .filter(|p| p.required && p.input && !p.was_passed)
            .map(|p| p.name.clone())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(RegistryError::MissingRequired(missing))
        }
    }

    pub fn input_params(&self) -> Vec<&ParamData> {
        self.active().iter().filter(|p| p.input).collect()
    }

    pub fn output_params(&self) -> Vec<&ParamData> {
        self.active().iter().filter(|p| !p.input).collect()
    }
}

fn check_assignable(data: &ParamData, value: &ParamValue) -> Result<(), RegistryError> {
    if data.kind() != value.kind() {
        return Err(RegistryError::kind_mismatch(&data.name, data.kind(), value.kind()));
    }
    if data.kind() == ParamKind::Model && data.tname != value.type_name() {
        return Err(RegistryError::KindMismatch {
            identifier: data.name.clone(),
            expected: data.tname.clone(),
            found: value.type_name(),
        });
    }
    Ok(())
}
