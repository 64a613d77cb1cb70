//! Java source emitter.
//!
//! Implements [`Emitter`] for `.java` files. Besides syntax this is where
//! modifier legality lives: a modifier that cannot appear in a declaration
//! context fails the render, a modifier that is implied by the context is
//! dropped with a warning.

use crate::doc::{DocBlock, DocLayout};
use crate::emit::traits::Emitter;
use crate::error::RenderError;
use crate::import::{write_imports, Import};
use crate::member::{Field, Method, Modifiers, Parameter, TypeParameter};
use crate::target::{Target, TypeDecl, TypeKind};
use crate::types::{Annotation, TypeRef, JAVA_LANG};

const KEYWORDS: [(Modifiers, &str); 11] = [
    (Modifiers::PUBLIC, "public"),
    (Modifiers::PROTECTED, "protected"),
    (Modifiers::PRIVATE, "private"),
    (Modifiers::ABSTRACT, "abstract"),
    (Modifiers::STATIC, "static"),
    (Modifiers::FINAL, "final"),
    (Modifiers::TRANSIENT, "transient"),
    (Modifiers::VOLATILE, "volatile"),
    (Modifiers::SYNCHRONIZED, "synchronized"),
    (Modifiers::NATIVE, "native"),
    (Modifiers::STRICTFP, "strictfp"),
];

/// Java source emitter.
#[derive(Debug, Clone)]
pub struct JavaEmitter {
    layout: DocLayout,
    indent: String,
}

impl Default for JavaEmitter {
    fn default() -> Self {
        Self::new(DocLayout::default(), "    ")
    }
}

impl JavaEmitter {
    /// Create an emitter using `layout` for doc comments and `indent` as one
    /// level of method body indentation.
    pub fn new(layout: DocLayout, indent: impl Into<String>) -> Self {
        Self {
            layout,
            indent: indent.into(),
        }
    }

    fn write_body(&self, body: Option<&str>, indent: &str, out: &mut String) {
        let Some(body) = body else {
            out.push_str(";\n");
            return;
        };

        let body = body.trim_matches('\n');
        if body.is_empty() {
            out.push_str(" {}\n");
            return;
        }

        out.push_str(" {\n");
        for line in body.lines() {
            if !line.trim().is_empty() {
                out.push_str(indent);
                out.push_str(&self.indent);
                out.push_str(line);
            }
            out.push('\n');
        }
        out.push_str(indent);
        out.push_str("}\n");
    }
}

impl Emitter for JavaEmitter {
    fn language(&self) -> &'static str {
        "java"
    }

    fn line_comment(&self) -> &'static str {
        "//"
    }

    fn needs_import(&self, ty: &TypeRef, package: &str) -> bool {
        let ty_package = ty.package_name();
        matches!(ty, TypeRef::Named { .. })
            && !ty_package.is_empty()
            && ty_package != JAVA_LANG
            && ty_package != package
    }

    fn write_preamble(&self, target: &Target, imports: &[Import], out: &mut String) {
        let header = target.header.trim_end_matches('\n');
        if !header.is_empty() {
            out.push_str(header);
            out.push('\n');
        }

        if !target.package_name.is_empty() {
            out.push_str("package ");
            out.push_str(&target.package_name);
            out.push_str(";\n\n");
        }

        if !imports.is_empty() {
            write_imports(imports, out);
            out.push('\n');
        }
    }

    fn write_type_header(
        &self,
        decl: &TypeDecl,
        is_member: bool,
        indent: &str,
        out: &mut String,
    ) -> Result<(), RenderError> {
        let doc = DocBlock {
            documentation: &decl.documentation,
            type_parameters: &decl.type_parameters,
            see: &decl.see,
            authors: &decl.authors,
            since: &decl.since,
        };
        push_comment(out, self.layout.declaration_comment(&doc, indent));
        write_annotations(&decl.annotations, indent, out);

        let modifiers = match decl.kind {
            TypeKind::Class => class_modifiers(decl, is_member)?,
            TypeKind::Interface => interface_modifiers(decl, is_member)?,
        };

        out.push_str(indent);
        out.push_str(&modifiers);
        out.push_str(decl.kind.keyword());
        out.push(' ');
        out.push_str(&decl.name);
        out.push_str(&type_parameters(&decl.type_parameters));

        match decl.kind {
            TypeKind::Class => {
                if let Some(super_type) = &decl.super_type {
                    out.push_str(" extends ");
                    out.push_str(&super_type.to_string());
                }
                if !decl.interfaces.is_empty() {
                    out.push_str(" implements ");
                    out.push_str(&join(&decl.interfaces));
                }
            }
            TypeKind::Interface => {
                if decl.super_type.is_some() {
                    tracing::warn!(
                        interface = %decl.name,
                        "ignoring super class of interface; list supertypes as interfaces"
                    );
                }
                if !decl.interfaces.is_empty() {
                    out.push_str(" extends ");
                    out.push_str(&join(&decl.interfaces));
                }
            }
        }

        out.push_str(" {");
        Ok(())
    }

    fn write_field(
        &self,
        field: &Field,
        owner: &TypeDecl,
        indent: &str,
        out: &mut String,
    ) -> Result<(), RenderError> {
        let modifiers = match owner.kind {
            TypeKind::Class => class_field_modifiers(field)?,
            TypeKind::Interface => interface_field_modifiers(field)?,
        };

        let doc = DocBlock {
            documentation: &field.documentation,
            see: &field.see,
            since: &field.since,
            ..DocBlock::default()
        };
        push_comment(out, self.layout.declaration_comment(&doc, indent));
        write_annotations(&field.annotations, indent, out);

        out.push_str(indent);
        out.push_str(&modifiers);
        out.push_str(&field.ty.to_string());
        out.push(' ');
        out.push_str(&field.name);
        if let Some(value) = &field.value {
            out.push_str(" = ");
            out.push_str(value);
        }
        out.push_str(";\n");
        Ok(())
    }

    fn write_method(
        &self,
        method: &Method,
        owner: &TypeDecl,
        indent: &str,
        out: &mut String,
    ) -> Result<(), RenderError> {
        let modifiers = match owner.kind {
            TypeKind::Class => class_method_modifiers(method, owner)?,
            TypeKind::Interface => interface_method_modifiers(method)?,
        };

        push_comment(out, self.layout.method_comment(method, indent));
        write_annotations(&method.annotations, indent, out);

        out.push_str(indent);
        out.push_str(&modifiers);
        if !method.type_parameters.is_empty() {
            out.push_str(&type_parameters(&method.type_parameters));
            out.push(' ');
        }
        if let Some(return_type) = &method.return_type {
            out.push_str(&return_type.to_string());
            out.push(' ');
        }
        out.push_str(&method.name);
        out.push('(');
        out.push_str(
            &method
                .parameters
                .iter()
                .map(parameter)
                .collect::<Vec<_>>()
                .join(", "),
        );
        out.push(')');

        self.write_body(method.body.as_deref(), indent, out);
        Ok(())
    }
}

// =============================================================================
// Modifier rules
// =============================================================================

/// Accumulates the modifier keywords of one declaration.
struct ModifierWriter<'a> {
    flags: Modifiers,
    context: &'static str,
    name: &'a str,
    out: String,
}

impl<'a> ModifierWriter<'a> {
    fn new(flags: Modifiers, context: &'static str, name: &'a str) -> Result<Self, RenderError> {
        let writer = Self {
            flags,
            context,
            name,
            out: String::new(),
        };

        let visibility = flags & (Modifiers::PUBLIC | Modifiers::PROTECTED | Modifiers::PRIVATE);
        if visibility.bits().count_ones() > 1 {
            let second = KEYWORDS
                .iter()
                .filter(|(flag, _)| visibility.contains(*flag))
                .nth(1)
                .map_or("private", |(_, keyword)| *keyword);
            return Err(writer.illegal(second));
        }

        Ok(writer)
    }

    fn has(&self, flag: Modifiers) -> bool {
        self.flags.contains(flag)
    }

    fn emit(&mut self, keyword: &str) {
        self.out.push_str(keyword);
        self.out.push(' ');
    }

    fn illegal(&self, keyword: &'static str) -> RenderError {
        RenderError::illegal_modifier(keyword, self.context, self.name)
    }

    fn redundant(&self, keyword: &str) {
        tracing::warn!(
            modifier = keyword,
            context = self.context,
            name = self.name,
            "redundant modifier dropped"
        );
    }

    /// Fail if any of `flags` is set.
    fn reject(&self, flags: Modifiers) -> Result<(), RenderError> {
        match KEYWORDS
            .iter()
            .find(|(flag, _)| flags.contains(*flag) && self.has(*flag))
        {
            Some(&(_, keyword)) => Err(self.illegal(keyword)),
            None => Ok(()),
        }
    }

    fn finish(self) -> String {
        self.out
    }
}

fn class_modifiers(decl: &TypeDecl, is_member: bool) -> Result<String, RenderError> {
    let mut w = ModifierWriter::new(decl.modifiers, "class", &decl.name)?;
    let is_abstract = w.has(Modifiers::ABSTRACT);

    if w.has(Modifiers::PUBLIC) {
        w.emit("public");
    }
    for (flag, keyword) in [(Modifiers::PROTECTED, "protected"), (Modifiers::PRIVATE, "private")] {
        if w.has(flag) {
            if !is_member {
                return Err(w.illegal(keyword));
            }
            w.emit(keyword);
        }
    }
    if is_abstract {
        w.emit("abstract");
    }
    if w.has(Modifiers::STATIC) {
        if !is_member {
            return Err(w.illegal("static"));
        }
        w.emit("static");
    }
    if w.has(Modifiers::FINAL) {
        if is_abstract {
            return Err(w.illegal("final"));
        }
        w.emit("final");
    }
    w.reject(
        Modifiers::TRANSIENT
            | Modifiers::VOLATILE
            | Modifiers::SYNCHRONIZED
            | Modifiers::NATIVE
            | Modifiers::STRICTFP,
    )?;

    Ok(w.finish())
}

fn interface_modifiers(decl: &TypeDecl, is_member: bool) -> Result<String, RenderError> {
    let mut w = ModifierWriter::new(decl.modifiers, "interface", &decl.name)?;

    if w.has(Modifiers::PUBLIC) {
        w.emit("public");
    }
    for (flag, keyword) in [(Modifiers::PROTECTED, "protected"), (Modifiers::PRIVATE, "private")] {
        if w.has(flag) {
            if !is_member {
                return Err(w.illegal(keyword));
            }
            w.emit(keyword);
        }
    }
    if w.has(Modifiers::ABSTRACT) {
        w.redundant("abstract");
    }
    if w.has(Modifiers::STATIC) {
        if !is_member {
            return Err(w.illegal("static"));
        }
        w.redundant("static");
    }
    w.reject(
        Modifiers::FINAL
            | Modifiers::TRANSIENT
            | Modifiers::VOLATILE
            | Modifiers::SYNCHRONIZED
            | Modifiers::NATIVE
            | Modifiers::STRICTFP,
    )?;

    Ok(w.finish())
}

fn class_field_modifiers(field: &Field) -> Result<String, RenderError> {
    let mut w = ModifierWriter::new(field.modifiers, "field", &field.name)?;
    let is_final = w.has(Modifiers::FINAL);

    for (flag, keyword) in [
        (Modifiers::PUBLIC, "public"),
        (Modifiers::PROTECTED, "protected"),
        (Modifiers::PRIVATE, "private"),
    ] {
        if w.has(flag) {
            w.emit(keyword);
        }
    }
    w.reject(Modifiers::ABSTRACT)?;
    if w.has(Modifiers::STATIC) {
        w.emit("static");
    }
    if is_final {
        w.emit("final");
    }
    if w.has(Modifiers::TRANSIENT) {
        w.emit("transient");
    }
    if w.has(Modifiers::VOLATILE) {
        if is_final {
            return Err(w.illegal("volatile"));
        }
        w.emit("volatile");
    }
    w.reject(Modifiers::SYNCHRONIZED | Modifiers::NATIVE | Modifiers::STRICTFP)?;

    Ok(w.finish())
}

fn interface_field_modifiers(field: &Field) -> Result<String, RenderError> {
    let w = ModifierWriter::new(field.modifiers, "interface field", &field.name)?;

    if w.has(Modifiers::PUBLIC) {
        w.redundant("public");
    }
    w.reject(Modifiers::PROTECTED | Modifiers::PRIVATE | Modifiers::ABSTRACT)?;
    if w.has(Modifiers::STATIC) {
        w.redundant("static");
    }
    if w.has(Modifiers::FINAL) {
        w.redundant("final");
    }
    w.reject(
        Modifiers::TRANSIENT
            | Modifiers::VOLATILE
            | Modifiers::SYNCHRONIZED
            | Modifiers::NATIVE
            | Modifiers::STRICTFP,
    )?;

    Ok(w.finish())
}

fn class_method_modifiers(method: &Method, owner: &TypeDecl) -> Result<String, RenderError> {
    let context = if method.is_constructor() {
        "constructor"
    } else {
        "method"
    };
    let mut w = ModifierWriter::new(method.modifiers, context, &method.name)?;
    let is_abstract = w.has(Modifiers::ABSTRACT);

    if method.is_constructor() {
        w.reject(
            Modifiers::ABSTRACT
                | Modifiers::STATIC
                | Modifiers::FINAL
                | Modifiers::SYNCHRONIZED
                | Modifiers::NATIVE
                | Modifiers::STRICTFP,
        )?;
    }

    if w.has(Modifiers::PUBLIC) {
        w.emit("public");
    }
    if w.has(Modifiers::PROTECTED) {
        w.emit("protected");
    }
    if w.has(Modifiers::PRIVATE) {
        if is_abstract {
            return Err(w.illegal("private"));
        }
        w.emit("private");
    }
    if is_abstract {
        if method.body.is_some() {
            return Err(RenderError::AbstractWithBody {
                method: method.name.clone(),
            });
        }
        if !owner.modifiers.contains(Modifiers::ABSTRACT) {
            return Err(w.illegal("abstract"));
        }
        w.emit("abstract");
    }
    for (flag, keyword) in [(Modifiers::STATIC, "static"), (Modifiers::FINAL, "final")] {
        if w.has(flag) {
            if is_abstract {
                return Err(w.illegal(keyword));
            }
            w.emit(keyword);
        }
    }
    w.reject(Modifiers::TRANSIENT | Modifiers::VOLATILE)?;
    for (flag, keyword) in [
        (Modifiers::SYNCHRONIZED, "synchronized"),
        (Modifiers::NATIVE, "native"),
        (Modifiers::STRICTFP, "strictfp"),
    ] {
        if w.has(flag) {
            if is_abstract {
                return Err(w.illegal(keyword));
            }
            w.emit(keyword);
        }
    }

    Ok(w.finish())
}

fn interface_method_modifiers(method: &Method) -> Result<String, RenderError> {
    let mut w = ModifierWriter::new(method.modifiers, "interface method", &method.name)?;
    let is_static = w.has(Modifiers::STATIC);
    let is_private = w.has(Modifiers::PRIVATE);

    if method.is_constructor() {
        return Err(RenderError::illegal_modifier(
            "constructor",
            "interface",
            &method.name,
        ));
    }

    if w.has(Modifiers::PUBLIC) {
        w.redundant("public");
    }
    w.reject(Modifiers::PROTECTED)?;
    if is_private {
        if method.body.is_none() {
            return Err(w.illegal("private"));
        }
        w.emit("private");
    }
    if w.has(Modifiers::ABSTRACT) {
        if is_static || is_private {
            return Err(w.illegal("abstract"));
        }
        if method.body.is_some() {
            return Err(RenderError::AbstractWithBody {
                method: method.name.clone(),
            });
        }
        w.redundant("abstract");
    }
    if is_static {
        w.emit("static");
    }
    w.reject(Modifiers::FINAL | Modifiers::TRANSIENT | Modifiers::VOLATILE)?;
    if method.body.is_some() && !is_static && !is_private {
        w.emit("default");
    }
    w.reject(Modifiers::SYNCHRONIZED | Modifiers::NATIVE)?;
    if w.has(Modifiers::STRICTFP) {
        if method.body.is_none() {
            return Err(w.illegal("strictfp"));
        }
        w.emit("strictfp");
    }

    Ok(w.finish())
}

// =============================================================================
// Helpers
// =============================================================================

fn push_comment(out: &mut String, comment: String) {
    if !comment.is_empty() {
        out.push_str(&comment);
        out.push('\n');
    }
}

fn write_annotations(annotations: &[Annotation], indent: &str, out: &mut String) {
    for annotation in annotations {
        out.push_str(indent);
        out.push_str(&annotation.to_string());
        out.push('\n');
    }
}

fn type_parameters(parameters: &[TypeParameter]) -> String {
    if parameters.is_empty() {
        return String::new();
    }

    let rendered = parameters
        .iter()
        .map(|p| match &p.bound {
            Some(bound) => format!("{} extends {bound}", p.name),
            None => p.name.clone(),
        })
        .collect::<Vec<_>>();
    format!("<{}>", rendered.join(", "))
}

fn parameter(param: &Parameter) -> String {
    let mut rendered = String::new();
    for annotation in &param.annotations {
        rendered.push_str(&annotation.to_string());
        rendered.push(' ');
    }
    rendered.push_str(&param.ty.to_string());
    rendered.push(' ');
    rendered.push_str(&param.name);
    rendered
}

fn join(types: &[TypeRef]) -> String {
    types
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveType;

    fn emitter() -> JavaEmitter {
        JavaEmitter::default()
    }

    fn field_text(field: &Field, owner: &TypeDecl) -> Result<String, RenderError> {
        let mut out = String::new();
        emitter().write_field(field, owner, "    ", &mut out)?;
        Ok(out)
    }

    fn method_text(method: &Method, owner: &TypeDecl) -> Result<String, RenderError> {
        let mut out = String::new();
        emitter().write_method(method, owner, "    ", &mut out)?;
        Ok(out)
    }

    #[test]
    fn test_field_with_value_and_doc() {
        let field = Field::new(PrimitiveType::Int, "count")
            .with_modifiers(Modifiers::PRIVATE | Modifiers::STATIC | Modifiers::FINAL)
            .with_value("0")
            .documented("Number of entries.");

        let text = field_text(&field, &TypeDecl::class("Counter")).unwrap();
        assert_eq!(
            text,
            "    /** Number of entries. */\n    private static final int count = 0;\n"
        );
    }

    #[test]
    fn test_interface_field_drops_redundant_modifiers() {
        let field = Field::new(PrimitiveType::Int, "SIZE")
            .with_modifiers(Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL)
            .with_value("32");

        let text = field_text(&field, &TypeDecl::interface("Sized")).unwrap();
        assert_eq!(text, "    int SIZE = 32;\n");
    }

    #[test]
    fn test_volatile_final_field_is_illegal() {
        let field = Field::new(PrimitiveType::Int, "x")
            .with_modifiers(Modifiers::FINAL | Modifiers::VOLATILE);

        let err = field_text(&field, &TypeDecl::class("C")).unwrap_err();
        assert!(matches!(
            err,
            RenderError::IllegalModifier {
                modifier: "volatile",
                ..
            }
        ));
    }

    #[test]
    fn test_conflicting_visibility_is_illegal() {
        let field =
            Field::new(PrimitiveType::Int, "x").with_modifiers(Modifiers::PUBLIC | Modifiers::PRIVATE);
        assert!(field_text(&field, &TypeDecl::class("C")).is_err());
    }

    #[test]
    fn test_method_body_is_indented() {
        let method = Method::new(PrimitiveType::Int, "get")
            .with_modifiers(Modifiers::PUBLIC)
            .with_body("\nreturn this.value;\n");

        let text = method_text(&method, &TypeDecl::class("Box")).unwrap();
        assert_eq!(
            text,
            "    public int get() {\n        return this.value;\n    }\n"
        );
    }

    #[test]
    fn test_empty_body_renders_braces() {
        let method = Method::constructor("Box").with_body("");
        let text = method_text(&method, &TypeDecl::class("Box")).unwrap();
        assert_eq!(text, "    Box() {}\n");
    }

    #[test]
    fn test_interface_method_with_body_is_default() {
        let method = Method::new(TypeRef::Void, "reset")
            .param(Parameter::new(PrimitiveType::Int, "value", ""))
            .with_body("set(value);");

        let text = method_text(&method, &TypeDecl::interface("Value")).unwrap();
        assert_eq!(
            text,
            "    default void reset(int value) {\n        set(value);\n    }\n"
        );
    }

    #[test]
    fn test_interface_static_method_is_not_default() {
        let method = Method::new(PrimitiveType::Int, "zero")
            .with_modifiers(Modifiers::STATIC)
            .with_body("return 0;");

        let text = method_text(&method, &TypeDecl::interface("Value")).unwrap();
        assert!(text.starts_with("    static int zero()"));
    }

    #[test]
    fn test_abstract_method_with_body_fails() {
        let owner = TypeDecl::class("Base").with_modifiers(Modifiers::ABSTRACT);
        let method = Method::new(TypeRef::Void, "run")
            .with_modifiers(Modifiers::ABSTRACT)
            .with_body("");

        let err = method_text(&method, &owner).unwrap_err();
        assert!(matches!(err, RenderError::AbstractWithBody { .. }));
    }

    #[test]
    fn test_abstract_method_requires_abstract_class() {
        let method = Method::new(TypeRef::Void, "run").with_modifiers(Modifiers::ABSTRACT);
        let err = method_text(&method, &TypeDecl::class("Concrete")).unwrap_err();
        assert!(matches!(
            err,
            RenderError::IllegalModifier {
                modifier: "abstract",
                ..
            }
        ));
    }

    #[test]
    fn test_generic_method_signature() {
        let method = Method::new(TypeRef::generic("R"), "map")
            .type_param(TypeParameter::new("R", ""))
            .param(Parameter::new(
                TypeRef::parametrized(
                    TypeRef::named("Function", "java.util.function"),
                    [TypeRef::generic("T"), TypeRef::generic("R")],
                ),
                "mapper",
                "",
            ));

        let text = method_text(&method, &TypeDecl::interface("Value")).unwrap();
        assert_eq!(text, "    <R> R map(Function<T, R> mapper);\n");
    }

    #[test]
    fn test_top_level_static_class_is_illegal() {
        let decl = TypeDecl::class("Outer").with_modifiers(Modifiers::STATIC);
        let mut out = String::new();
        assert!(emitter()
            .write_type_header(&decl, false, "", &mut out)
            .is_err());

        let mut out = String::new();
        emitter()
            .write_type_header(&decl, true, "    ", &mut out)
            .unwrap();
        assert_eq!(out, "    static class Outer {");
    }

    #[test]
    fn test_interface_header_lists_supertypes() {
        let decl = TypeDecl::interface("WritableValue")
            .with_modifiers(Modifiers::PUBLIC)
            .type_param(TypeParameter::new("T", "the type of the value"))
            .implements(TypeRef::parametrized(
                TypeRef::named("ObservableValue", "io.kraton.bean.value"),
                [TypeRef::generic("T")],
            ))
            .annotated(Annotation::functional_interface());

        let mut out = String::new();
        emitter()
            .write_type_header(&decl, false, "", &mut out)
            .unwrap();
        assert_eq!(
            out,
            "/** @param <T> the type of the value */\n@FunctionalInterface\npublic interface WritableValue<T> extends ObservableValue<T> {"
        );
    }

    #[test]
    fn test_undocumented_generic_type_header_has_no_comment() {
        let decl = TypeDecl::interface("Value")
            .with_modifiers(Modifiers::PUBLIC)
            .type_param(TypeParameter::new("T", ""));

        let mut out = String::new();
        emitter()
            .write_type_header(&decl, false, "", &mut out)
            .unwrap();
        assert_eq!(out, "public interface Value<T> {");
    }

    #[test]
    fn test_needs_import() {
        let e = emitter();
        assert!(e.needs_import(&TypeRef::named("List", "java.util"), "a.b"));
        assert!(!e.needs_import(&TypeRef::named("String", JAVA_LANG), "a.b"));
        assert!(!e.needs_import(&TypeRef::named("Local", "a.b"), "a.b"));
        assert!(!e.needs_import(&TypeRef::Primitive(PrimitiveType::Int), "a.b"));
    }
}
