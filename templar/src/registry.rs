//! Registry of template factories, keyed by template unit.
//!
//! A template unit is a file in the template tree; its name is the file's
//! path relative to the tree root with separators replaced by `.` and the
//! extension dropped (`bean/value/observable_value.rs` becomes
//! `bean.value.observable_value`). Each unit contributes any number of
//! factories, every one of which builds a [`Profile`].

use std::collections::BTreeMap;
use std::fmt;

use crate::target::Profile;

/// Builds one profile.
pub type TemplateFactory = Box<dyn Fn() -> Profile + Send + Sync>;

/// A factory registered under a unit.
pub struct RegisteredTemplate {
    /// Name used in logs and failure reports.
    pub name: String,
    factory: TemplateFactory,
}

impl RegisteredTemplate {
    /// Invoke the factory.
    pub fn build(&self) -> Profile {
        (self.factory)()
    }
}

impl fmt::Debug for RegisteredTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisteredTemplate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A registry of template factories.
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    units: BTreeMap<String, Vec<RegisteredTemplate>>,
}

impl TemplateRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a factory under `unit`. The driver runs the factories of
    /// one unit ordered by name.
    pub fn register<F>(&mut self, unit: impl Into<String>, name: impl Into<String>, factory: F)
    where
        F: Fn() -> Profile + Send + Sync + 'static,
    {
        self.units
            .entry(unit.into())
            .or_default()
            .push(RegisteredTemplate {
                name: name.into(),
                factory: Box::new(factory),
            });
    }

    /// Factories registered for `unit`.
    pub fn get(&self, unit: &str) -> Option<&[RegisteredTemplate]> {
        self.units.get(unit).map(Vec::as_slice)
    }

    /// Whether `unit` has at least one factory.
    pub fn contains(&self, unit: &str) -> bool {
        self.units.contains_key(unit)
    }

    /// All unit names in sorted order.
    pub fn units(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }

    /// Get the number of registered units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Check if the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut registry = TemplateRegistry::new();
        registry.register("bean.value", "first", || Profile::new("first"));
        registry.register("bean.value", "second", || Profile::new("second"));
        registry.register("util", "util", || Profile::new("util"));

        assert_eq!(registry.len(), 2);
        assert!(registry.contains("util"));
        assert!(!registry.contains("bean"));

        let templates = registry.get("bean.value").unwrap();
        let names: Vec<_> = templates.iter().map(|t| t.build().name).collect();
        assert_eq!(names, vec!["first", "second"]);
    }

    #[test]
    fn test_units_are_sorted() {
        let mut registry = TemplateRegistry::new();
        registry.register("zeta", "z", || Profile::new("z"));
        registry.register("alpha", "a", || Profile::new("a"));

        assert_eq!(registry.units().collect::<Vec<_>>(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_empty_registry() {
        let registry = TemplateRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get("anything").is_none());
    }
}
