//! Renders a [`Target`] into the full text of its source file.
//!
//! The renderer lays out a type body: members in [`order_members`] order,
//! a divider block in front of each new labelled section, a blank line
//! after every member except between adjacent fields. Syntax is delegated
//! to the [`Emitter`] registered for the target's language.

use crate::doc::DocLayout;
use crate::emit::{Emitter, JavaEmitter};
use crate::error::RenderError;
use crate::import::{normalize, Import};
use crate::member::{order_members, Member, OrderedMember};
use crate::target::{Target, TypeDecl};
use crate::types::TypeRef;

/// Total width of a section divider line.
pub const DIVIDER_WIDTH: usize = 160;

/// Default indentation unit.
pub const DEFAULT_INDENT: &str = "    ";

/// Renders targets through a set of language emitters.
pub struct Renderer {
    emitters: Vec<Box<dyn Emitter>>,
    indent: String,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(DocLayout::default(), DEFAULT_INDENT)
    }
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field(
                "languages",
                &self.emitters.iter().map(|e| e.language()).collect::<Vec<_>>(),
            )
            .field("indent", &self.indent)
            .finish()
    }
}

impl Renderer {
    /// Create a renderer with the built-in emitters.
    pub fn new(layout: DocLayout, indent: impl Into<String>) -> Self {
        let indent = indent.into();
        Self {
            emitters: vec![Box::new(JavaEmitter::new(layout, indent.clone()))],
            indent,
        }
    }

    /// Register an additional emitter. A later emitter for the same
    /// language takes precedence.
    pub fn with_emitter(mut self, emitter: Box<dyn Emitter>) -> Self {
        self.emitters.insert(0, emitter);
        self
    }

    /// Render the complete file text of `target`.
    pub fn render(&self, target: &Target) -> Result<String, RenderError> {
        let emitter = self
            .emitters
            .iter()
            .find(|e| e.language() == target.language)
            .ok_or_else(|| RenderError::UnsupportedLanguage {
                language: target.language.clone(),
                target: target.file_name.clone(),
            })?;

        let imports = collect_imports(emitter.as_ref(), target);

        let mut out = String::with_capacity(4096);
        emitter.write_preamble(target, &imports, &mut out);
        self.render_decl(emitter.as_ref(), &target.decl, false, "", &mut out)?;
        Ok(out)
    }

    fn render_decl(
        &self,
        emitter: &dyn Emitter,
        decl: &TypeDecl,
        is_member: bool,
        indent: &str,
        out: &mut String,
    ) -> Result<(), RenderError> {
        emitter.write_type_header(decl, is_member, indent, out)?;

        let ordered = order_members(&decl.members)?;
        if ordered.is_empty() {
            out.push_str("}\n");
            return Ok(());
        }
        out.push_str("\n\n");

        let sub_indent = format!("{indent}{}", self.indent);
        for (i, entry) in ordered.iter().enumerate() {
            if starts_section(&ordered, i) {
                write_divider(emitter.line_comment(), entry.label(), &sub_indent, out);
            }

            match entry.member {
                Member::Field(field) => emitter.write_field(field, decl, &sub_indent, out)?,
                Member::Method(method) => emitter.write_method(method, decl, &sub_indent, out)?,
                Member::Type(nested) => self.render_decl(emitter, nested, true, &sub_indent, out)?,
            }

            let field_run = matches!(entry.member, Member::Field(_))
                && ordered
                    .get(i + 1)
                    .is_some_and(|next| matches!(next.member, Member::Field(_)))
                && !starts_section(&ordered, i + 1);
            if !field_run {
                out.push('\n');
            }
        }

        out.push_str(indent);
        out.push_str("}\n");
        Ok(())
    }
}

/// Whether the member at `index` opens a new labelled section.
fn starts_section(ordered: &[OrderedMember<'_>], index: usize) -> bool {
    let Some(entry) = ordered.get(index) else {
        return false;
    };
    let label = entry.label();
    !label.is_empty() && (index == 0 || ordered[index - 1].label() != label)
}

/// Write the three-line divider block announcing section `label`.
fn write_divider(comment: &str, label: &str, indent: &str, out: &mut String) {
    let lead = indent.chars().count() + comment.chars().count() + 1;
    let rule = "#".repeat(DIVIDER_WIDTH.saturating_sub(lead));
    let header_fill = "#".repeat(DIVIDER_WIDTH.saturating_sub(lead + 3 + label.chars().count()));

    let rule_line = format!("{indent}{comment} {rule}\n");
    out.push_str(&rule_line);
    out.push_str(&format!("{indent}{comment} # {label} {header_fill}\n"));
    out.push_str(&rule_line);
    out.push('\n');
}

/// Explicit imports plus every named type the declaration tree references
/// that the emitter cannot resolve implicitly.
fn collect_imports(emitter: &dyn Emitter, target: &Target) -> Vec<Import> {
    let mut referenced = Vec::new();
    collect_decl_types(&target.decl, &mut referenced);

    let mut imports = target.imports.clone();
    imports.extend(
        referenced
            .into_iter()
            .filter(|ty| emitter.needs_import(ty, &target.package_name))
            .map(Import::for_type),
    );
    normalize(imports)
}

fn collect_decl_types<'a>(decl: &'a TypeDecl, out: &mut Vec<&'a TypeRef>) {
    if let Some(super_type) = &decl.super_type {
        super_type.collect_named(out);
    }
    for ty in &decl.interfaces {
        ty.collect_named(out);
    }
    for param in &decl.type_parameters {
        if let Some(bound) = &param.bound {
            bound.collect_named(out);
        }
    }
    for annotation in &decl.annotations {
        annotation.ty.collect_named(out);
    }

    for member in &decl.members {
        match member {
            Member::Field(field) => {
                field.ty.collect_named(out);
                for annotation in &field.annotations {
                    annotation.ty.collect_named(out);
                }
            }
            Member::Method(method) => {
                if let Some(return_type) = &method.return_type {
                    return_type.collect_named(out);
                }
                for param in &method.parameters {
                    param.ty.collect_named(out);
                    for annotation in &param.annotations {
                        annotation.ty.collect_named(out);
                    }
                }
                for param in &method.type_parameters {
                    if let Some(bound) = &param.bound {
                        bound.collect_named(out);
                    }
                }
                for annotation in &method.annotations {
                    annotation.ty.collect_named(out);
                }
            }
            Member::Type(nested) => collect_decl_types(nested, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::{Field, Method, Modifiers, Parameter};
    use crate::types::PrimitiveType;

    fn renderer() -> Renderer {
        Renderer::default()
    }

    #[test]
    fn test_divider_width() {
        let mut out = String::new();
        write_divider("//", "State", "    ", &mut out);
        let lines: Vec<&str> = out.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].len(), DIVIDER_WIDTH);
        assert_eq!(lines[1].len(), DIVIDER_WIDTH);
        assert!(lines[1].starts_with("    // # State ###"));
        assert_eq!(lines[0], lines[2]);
        assert_eq!(lines[3], "");
    }

    #[test]
    fn test_divider_with_long_label_does_not_underflow() {
        let mut out = String::new();
        let label = "x".repeat(200);
        write_divider("//", &label, "", &mut out);
        assert!(out.contains(&format!("// # {label} \n")));
    }

    #[test]
    fn test_empty_type() {
        let target = Target::java("m", "a.b", TypeDecl::interface("Marker").with_modifiers(Modifiers::PUBLIC));
        let text = renderer().render(&target).unwrap();
        assert_eq!(text, "package a.b;\n\npublic interface Marker {}\n");
    }

    #[test]
    fn test_sections_and_separation() {
        let decl = TypeDecl::class("Point")
            .with_modifiers(Modifiers::PUBLIC | Modifiers::FINAL)
            .member(Method::new(PrimitiveType::Int, "x").with_modifiers(Modifiers::PUBLIC).with_body("return x;").in_category("1_Accessors"))
            .member(Field::new(PrimitiveType::Int, "x").with_modifiers(Modifiers::PRIVATE).in_category("0_State"))
            .member(Field::new(PrimitiveType::Int, "y").with_modifiers(Modifiers::PRIVATE).in_category("0_State"));
        let target = Target::java("m", "geo", decl);

        let text = renderer().render(&target).unwrap();
        let rule = format!("    // {}", "#".repeat(153));

        let expected = format!(
            "package geo;\n\n\
             public final class Point {{\n\n\
             {rule}\n    // # State {}\n{rule}\n\n\
             \x20   private int x;\n\
             \x20   private int y;\n\n\
             {rule}\n    // # Accessors {}\n{rule}\n\n\
             \x20   public int x() {{\n        return x;\n    }}\n\n\
             }}\n",
            "#".repeat(145),
            "#".repeat(141),
        );
        assert_eq!(text, expected);
    }

    #[test]
    fn test_uncategorised_members_have_no_divider() {
        let decl = TypeDecl::class("C")
            .member(Method::new(TypeRef::Void, "a").with_body(""))
            .member(Method::new(TypeRef::Void, "b").with_body(""));
        let text = renderer().render(&Target::java("m", "p", decl)).unwrap();

        assert!(!text.contains("# "));
        assert!(text.ends_with("    void a() {}\n\n    void b() {}\n\n}\n"));
    }

    #[test]
    fn test_imports_are_inferred() {
        let list = TypeRef::parametrized(
            TypeRef::named("List", "java.util"),
            [TypeRef::named("Listener", "io.kraton.event")],
        );
        let decl = TypeDecl::class("Holder")
            .member(Field::new(list, "listeners"))
            .member(Field::new(TypeRef::named("String", "java.lang"), "name"))
            .member(Field::new(TypeRef::named("Sibling", "p"), "sibling"))
            .member(
                Method::new(TypeRef::Void, "set")
                    .param(Parameter::new(TypeRef::named("Map", "java.util"), "map", "")),
            );

        let text = renderer().render(&Target::java("m", "p", decl)).unwrap();
        assert!(text.starts_with(
            "package p;\n\nimport io.kraton.event.Listener;\n\nimport java.util.List;\nimport java.util.Map;\n\nclass Holder {"
        ));
    }

    #[test]
    fn test_nested_type_is_indented() {
        let inner = TypeDecl::class("Inner")
            .with_modifiers(Modifiers::STATIC)
            .member(Field::new(PrimitiveType::Int, "v"));
        let decl = TypeDecl::class("Outer").member(inner);

        let text = renderer().render(&Target::java("m", "p", decl)).unwrap();
        assert!(text.contains("    static class Inner {\n\n        int v;\n\n    }\n\n}\n"));
    }

    #[test]
    fn test_unsupported_language() {
        let mut target = Target::java("m", "p", TypeDecl::class("C"));
        target.language = "kotlin".to_string();

        let err = renderer().render(&target).unwrap_err();
        assert!(matches!(err, RenderError::UnsupportedLanguage { .. }));
    }

    #[test]
    fn test_header_is_emitted_first() {
        let target = Target::java("m", "p", TypeDecl::class("C")).with_header("/* generated */\n");
        let text = renderer().render(&target).unwrap();
        assert!(text.starts_with("/* generated */\npackage p;\n\nclass C {}"));
    }
}
