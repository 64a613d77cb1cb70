//! Import statements: ordering, wildcard collapse and grouping.

use std::cmp::Ordering;
use std::fmt;

use crate::types::TypeRef;

/// Namespace families that sort after all other imports, in this order.
pub const STANDARD_FAMILIES: [&str; 2] = ["java.", "javax."];

/// A single import statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Import {
    pub package_name: String,
    /// Imported name, or `*` for a wildcard import.
    pub qualifier: String,
    pub is_static: bool,
}

impl Import {
    pub fn new(package_name: impl Into<String>, qualifier: impl Into<String>) -> Self {
        Self {
            package_name: package_name.into(),
            qualifier: qualifier.into(),
            is_static: false,
        }
    }

    /// `import <package>.*;`
    pub fn wildcard(package_name: impl Into<String>) -> Self {
        Self::new(package_name, "*")
    }

    /// `import static <owner>.<member>;`
    pub fn static_member(owner: impl Into<String>, member: impl Into<String>) -> Self {
        Self {
            is_static: true,
            ..Self::new(owner, member)
        }
    }

    /// Import of a named type.
    pub fn for_type(ty: &TypeRef) -> Self {
        Self::new(ty.package_name(), ty.simple_name())
    }

    pub fn is_wildcard(&self) -> bool {
        self.qualifier == "*"
    }

    /// Group index: 0 for everything outside the standard families, then
    /// one group per standard family.
    pub fn family(&self) -> usize {
        STANDARD_FAMILIES
            .iter()
            .position(|family| {
                self.package_name.starts_with(family)
                    || format!("{}.", self.package_name) == *family
            })
            .map_or(0, |i| i + 1)
    }

    /// Whether this wildcard import makes `other` redundant.
    pub fn subsumes(&self, other: &Import) -> bool {
        self.is_wildcard()
            && !other.is_wildcard()
            && self.is_static == other.is_static
            && self.package_name == other.package_name
    }

    fn sort_key(&self) -> (usize, bool, &str, bool, &str) {
        (
            self.family(),
            self.is_static,
            &self.package_name,
            !self.is_wildcard(),
            &self.qualifier,
        )
    }
}

impl Ord for Import {
    fn cmp(&self, other: &Self) -> Ordering {
        self.sort_key().cmp(&other.sort_key())
    }
}

impl PartialOrd for Import {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keyword = if self.is_static { "import static" } else { "import" };
        write!(f, "{keyword} {}.{};", self.package_name, self.qualifier)
    }
}

/// Sort, deduplicate and collapse imports covered by a wildcard.
pub fn normalize(mut imports: Vec<Import>) -> Vec<Import> {
    imports.sort();
    imports.dedup();

    let mut kept: Vec<Import> = Vec::with_capacity(imports.len());
    for import in imports {
        // Wildcards sort before the specific imports of their package.
        let covered = kept.iter().rev().any(|prior| prior.subsumes(&import));
        if !covered {
            kept.push(import);
        }
    }
    kept
}

/// Write normalized imports, one per line, with a blank line between
/// families.
pub fn write_imports(imports: &[Import], out: &mut String) {
    let mut previous: Option<usize> = None;
    for import in imports {
        let family = import.family();
        if previous.is_some_and(|p| p != family) {
            out.push('\n');
        }
        previous = Some(family);
        out.push_str(&import.to_string());
        out.push('\n');
    }
}
