//! Output units: type declarations, the files that hold them, and the
//! profiles that group files produced by one template.

use std::path::{Path, PathBuf};

use crate::import::Import;
use crate::member::{Member, Modifiers, TypeParameter};
use crate::types::{Annotation, TypeRef};

/// Language emitted when a target does not say otherwise.
pub const DEFAULT_LANGUAGE: &str = "java";

/// Source set a target belongs to when not specified.
pub const DEFAULT_KIND: &str = "main";

/// Whether a declaration is a class or an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Interface,
}

impl TypeKind {
    /// Keyword introducing the declaration.
    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Class => "class",
            TypeKind::Interface => "interface",
        }
    }
}

/// A class or interface declaration, top-level or nested.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    pub kind: TypeKind,
    pub name: String,
    pub modifiers: Modifiers,
    pub type_parameters: Vec<TypeParameter>,
    /// Extended class. Ignored for interfaces, which list supertypes in
    /// `interfaces`.
    pub super_type: Option<TypeRef>,
    pub interfaces: Vec<TypeRef>,
    pub members: Vec<Member>,
    pub annotations: Vec<Annotation>,
    /// Category tag used when this declaration is a nested member.
    pub category: String,
    pub documentation: String,
    pub since: String,
    pub see: Vec<String>,
    pub authors: Vec<String>,
}

impl TypeDecl {
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Class, name.into())
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(TypeKind::Interface, name.into())
    }

    fn new(kind: TypeKind, name: String) -> Self {
        Self {
            kind,
            name,
            modifiers: Modifiers::empty(),
            type_parameters: Vec::new(),
            super_type: None,
            interfaces: Vec::new(),
            members: Vec::new(),
            annotations: Vec::new(),
            category: String::new(),
            documentation: String::new(),
            since: String::new(),
            see: Vec::new(),
            authors: Vec::new(),
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn type_param(mut self, parameter: TypeParameter) -> Self {
        self.type_parameters.push(parameter);
        self
    }

    pub fn extends(mut self, super_type: TypeRef) -> Self {
        self.super_type = Some(super_type);
        self
    }

    pub fn implements(mut self, interface: TypeRef) -> Self {
        self.interfaces.push(interface);
        self
    }

    pub fn member(mut self, member: impl Into<Member>) -> Self {
        self.members.push(member.into());
        self
    }

    pub fn annotated(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn in_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn documented(mut self, documentation: impl Into<String>) -> Self {
        self.documentation = documentation.into();
        self
    }

    pub fn since(mut self, since: impl Into<String>) -> Self {
        self.since = since.into();
        self
    }

    pub fn see(mut self, reference: impl Into<String>) -> Self {
        self.see.push(reference.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.authors.push(author.into());
        self
    }

    /// The type this declaration introduces, parametrized by its own type
    /// variables.
    pub fn as_type(&self, package_name: &str) -> TypeRef {
        let base = TypeRef::named(self.name.clone(), package_name);
        if self.type_parameters.is_empty() {
            base
        } else {
            TypeRef::parametrized(base, self.type_parameters.iter().map(|p| p.as_type()))
        }
    }
}

/// One generated source file.
#[derive(Debug, Clone)]
pub struct Target {
    /// File stem; the file is `<file_name>.<extension>`.
    pub file_name: String,
    pub language: String,
    pub package_name: String,
    /// Build module the file belongs to, relative to the output root.
    pub module_name: String,
    /// Source set, reported in logs.
    pub kind: String,
    /// Overrides the file extension, which defaults to the language name.
    pub extension: Option<String>,
    /// Text placed verbatim at the top of the file.
    pub header: String,
    /// Imports in addition to the ones inferred from the declaration.
    pub imports: Vec<Import>,
    pub decl: TypeDecl,
}

impl Target {
    /// A Java source file holding `decl`.
    pub fn java(
        module_name: impl Into<String>,
        package_name: impl Into<String>,
        decl: TypeDecl,
    ) -> Self {
        Self {
            file_name: decl.name.clone(),
            language: DEFAULT_LANGUAGE.to_string(),
            package_name: package_name.into(),
            module_name: module_name.into(),
            kind: DEFAULT_KIND.to_string(),
            extension: None,
            header: String::new(),
            imports: Vec::new(),
            decl,
        }
    }

    pub fn with_header(mut self, header: impl Into<String>) -> Self {
        self.header = header.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn import(mut self, import: Import) -> Self {
        self.imports.push(import);
        self
    }

    pub fn extension(&self) -> &str {
        self.extension.as_deref().unwrap_or(&self.language)
    }

    /// The type declared by this file.
    pub fn as_type(&self) -> TypeRef {
        self.decl.as_type(&self.package_name)
    }

    /// Location of the generated file:
    /// `<root>/<module>/src/<generated_dir>/<language>/<package path>/<file>.<ext>`.
    pub fn output_path(&self, root: &Path, generated_dir: &str) -> PathBuf {
        let mut path = root.join(&self.module_name).join("src").join(generated_dir);
        path.push(&self.language);
        for segment in self.package_name.split('.').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.push(format!("{}.{}", self.file_name, self.extension()));
        path
    }
}

/// The set of targets one template factory produces.
#[derive(Debug, Clone)]
pub struct Profile {
    pub name: String,
    pub targets: Vec<Target>,
}

impl Profile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            targets: Vec::new(),
        }
    }

    pub fn target(mut self, target: Target) -> Self {
        self.targets.push(target);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_layout() {
        let target = Target::java("kraton-core", "io.kraton.bean.value", TypeDecl::interface("ObservableValue"));
        let path = target.output_path(Path::new("/out"), "generated");

        assert_eq!(
            path,
            PathBuf::from("/out/kraton-core/src/generated/java/io/kraton/bean/value/ObservableValue.java")
        );
    }

    #[test]
    fn test_extension_override() {
        let target = Target::java("m", "a", TypeDecl::class("Foo")).with_extension("jav");
        assert_eq!(target.extension(), "jav");
        assert!(target
            .output_path(Path::new("root"), "gen")
            .ends_with("a/Foo.jav"));
    }

    #[test]
    fn test_as_type_includes_type_parameters() {
        let decl = TypeDecl::interface("Value").type_param(TypeParameter::new("T", ""));
        assert_eq!(decl.as_type("pkg").to_string(), "Value<T>");
        assert_eq!(decl.as_type("pkg").package_name(), "pkg");
    }
}
