//! Registry of checks available to the engine.

use std::collections::HashMap;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::check::{Check, CheckSource};
use crate::checks::builtin_checks;
use crate::error::PluginError;
use crate::plugin::discover_plugins;

/// Checks indexed by name, in registration order.
///
/// Registration is first-wins: built-in checks are registered before
/// plugins, so a plugin never shadows a built-in of the same name.
#[derive(Debug, Default)]
pub struct CheckRegistry {
    checks: Vec<Box<dyn Check>>,
    index: HashMap<String, usize>,
}

impl CheckRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding only the built-in checks.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for check in builtin_checks() {
            registry.register(Box::new(check));
        }
        registry
    }

    /// Built-in checks followed by the plugins found in `dirs`.
    pub fn with_plugins(dirs: &[PathBuf]) -> Result<Self, PluginError> {
        let mut registry = Self::builtin();
        for plugin in discover_plugins(dirs)? {
            registry.register(Box::new(plugin));
        }
        debug!(checks = registry.len(), "check registry ready");
        Ok(registry)
    }

    /// Register a check; returns false when the name is already taken.
    pub fn register(&mut self, check: Box<dyn Check>) -> bool {
        let name = check.name().to_string();
        if let Some(&existing) = self.index.get(&name) {
            warn!(
                check = %name,
                kept = %self.checks[existing].source(),
                ignored = %check.source(),
                "check name already registered"
            );
            return false;
        }
        self.index.insert(name, self.checks.len());
        self.checks.push(check);
        true
    }

    /// Get a check by name.
    pub fn get(&self, name: &str) -> Option<&dyn Check> {
        self.index.get(name).map(|&idx| self.checks[idx].as_ref())
    }

    /// Names and sources of every registered check.
    pub fn available_checks(&self) -> Vec<(&str, CheckSource)> {
        self.checks
            .iter()
            .map(|check| (check.name(), check.source()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Check> {
        self.checks.iter().map(AsRef::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use crate::check::BuiltinCheck;
    use ffc_model::TestCaseResult;

    use super::*;

    #[test]
    fn builtin_registry_lists_reference_checks_in_order() {
        let registry = CheckRegistry::builtin();
        let names: Vec<&str> = registry.iter().map(Check::name).collect();
        assert_eq!(names[0], "check_dates");
        assert!(names.contains(&"check_special_characters"));
        assert_eq!(registry.len(), 9);
        assert!(
            registry
                .available_checks()
                .iter()
                .all(|(_, source)| *source == CheckSource::Builtin)
        );
    }

    #[test]
    fn first_registration_wins() {
        let mut registry = CheckRegistry::builtin();
        let shadow = BuiltinCheck::new("check_dates", |_| Ok(TestCaseResult::new("shadow")));
        assert!(!registry.register(Box::new(shadow)));
        assert_eq!(registry.len(), 9);
        assert!(registry.get("check_dates").is_some());
        assert!(registry.get("check_nothing").is_none());
    }
}
