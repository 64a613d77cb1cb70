//! Compiled-in templates.
//!
//! Every template unit is a file below this directory and registers its
//! factories under the unit name derived from its path, so the directory
//! doubles as the template tree the binary is pointed at. `mod.rs` files
//! carry shared definitions only and are excluded from discovery.

use convert_case::{Case, Casing};

use templar::{PrimitiveType, TemplateRegistry};

pub mod bean;
pub mod util;

/// Build module receiving the generated sources.
pub const MODULE_BASE: &str = "kraton-base";

/// Version stamped into `@since` tags.
pub const VERSION: &str = "1.0.0";

pub const AUTHOR: &str = "Kraton Contributors";

pub const COPYRIGHT_HEADER: &str = "\
/*
 * Copyright (c) Kraton Contributors.
 * Licensed under the BSD 3-Clause License.
 *
 * This file was generated. Do not edit it by hand.
 */";

/// Primitive types the value and function families are generated for.
pub const VALUE_TYPES: [PrimitiveType; 8] = PrimitiveType::ALL;

/// Java type name from space separated words, e.g. `["int", "to",
/// "long", "function"]` becomes `IntToLongFunction`.
pub fn type_name(words: &[&str]) -> String {
    words.join(" ").to_case(Case::Pascal)
}

/// Registry holding every compiled-in template.
pub fn registry() -> TemplateRegistry {
    let mut registry = TemplateRegistry::new();
    registry.register(
        bean::value::observable_value::UNIT,
        "observable_value",
        bean::value::observable_value::profile,
    );
    registry.register(
        bean::value::writable_value::UNIT,
        "writable_value",
        bean::value::writable_value::profile,
    );
    registry.register(
        util::function::from_to_function::UNIT,
        "from_to_function",
        util::function::from_to_function::profile,
    );
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_name() {
        assert_eq!(type_name(&["observable", "int", "value"]), "ObservableIntValue");
        assert_eq!(type_name(&["char", "to", "boolean", "function"]), "CharToBooleanFunction");
    }

    #[test]
    fn test_registry_units() {
        let registry = registry();
        assert_eq!(
            registry.units().collect::<Vec<_>>(),
            vec![
                "bean.value.observable_value",
                "bean.value.writable_value",
                "util.function.from_to_function",
            ]
        );
    }
}
