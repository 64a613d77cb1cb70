//! Documentation comment layout.
//!
//! Free text in templates is written the way it reads best in Rust source:
//! paragraphs separated by blank lines, block tags inline. [`DocLayout`]
//! turns that into a conventionally laid out doc comment. Block tags start
//! on their own line, top-level blocks get a blank line before them, plain
//! text paragraphs become `<p>` blocks, and every line carries the comment
//! prefix.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::member::{Method, TypeParameter};

/// Marker documenting that a member inherits its documentation.
pub const INHERIT_DOC: &str = "{@inheritDoc}";

/// Leading character that forces the comment prefix onto a line.
pub const PREFIX_MARKER: char = '\u{FFFF}';

/// Block-level tags recognised by default.
pub const DEFAULT_BLOCK_TAGS: &[&str] = &[
    "div", "h1", "h2", "h3", "h4", "h5", "h6", "code", "table", "thead", "tfoot", "tbody", "td",
    "tr", "ul", "li", "ol", "dl", "dt", "dd",
];

/// Tags that belong to an enclosing block and get no blank line before
/// them.
pub const DEFAULT_CHILD_TAGS: &[&str] = &["tr", "thead", "tfoot", "tbody", "li", "dt", "dd"];

static BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]+$").expect("blank line pattern is valid"));

static PARAGRAPH: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\n(?:\n?[ \t]*\S[^\n]*)+").expect("paragraph pattern is valid")
});

/// Configured doc comment layout engine.
#[derive(Debug, Clone)]
pub struct DocLayout {
    block_tag: Regex,
    child_tag: Regex,
}

impl Default for DocLayout {
    fn default() -> Self {
        // The default tag lists are plain identifiers, escaping cannot fail.
        Self::new(DEFAULT_BLOCK_TAGS, DEFAULT_CHILD_TAGS).expect("default doc tags are valid")
    }
}

/// Documentation attached to a type or field declaration.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocBlock<'a> {
    pub documentation: &'a str,
    pub type_parameters: &'a [TypeParameter],
    pub see: &'a [String],
    pub authors: &'a [String],
    pub since: &'a str,
}

impl<'a> DocBlock<'a> {
    /// Documentation text without any metadata.
    pub fn text(documentation: &'a str) -> Self {
        Self {
            documentation,
            ..Self::default()
        }
    }

    fn has_metadata(&self) -> bool {
        any_documented(self.type_parameters)
            || !self.see.is_empty()
            || !self.authors.is_empty()
            || !self.since.is_empty()
    }
}

impl DocLayout {
    /// Build a layout engine for the given block and child tag names.
    pub fn new<S: AsRef<str>>(block_tags: &[S], child_tags: &[S]) -> Result<Self, regex::Error> {
        let block = alternation(block_tags);
        let child = alternation(child_tags);

        Ok(Self {
            block_tag: Regex::new(&format!(r"</?(?:{block})(?:\s[^>]+)?>"))?,
            child_tag: Regex::new(&format!(r"^<(?:{child})>$"))?,
        })
    }

    /// Lay out free documentation text, prefixing continuation lines with
    /// `prefix`. The first line carries no prefix; the caller places it.
    pub fn cleanup(&self, text: &str, prefix: &str) -> String {
        let dom = BLANK_LINES.replace_all(text.trim(), "");
        let mut out = String::with_capacity(dom.len() + 16);
        self.layout_dom(&dom, prefix, &mut out);
        apply_prefix(&out, prefix)
    }

    /// Doc comment for a type or field declaration, or an empty string when
    /// there is nothing to document.
    pub fn declaration_comment(&self, doc: &DocBlock<'_>, indent: &str) -> String {
        let line_prefix = format!("{indent} * ");

        if !doc.has_metadata() {
            if doc.documentation.trim().is_empty() {
                return String::new();
            }
            return wrap_comment(&self.cleanup(doc.documentation, &line_prefix), indent);
        }

        let mut sb = if doc.documentation.is_empty() {
            String::new()
        } else {
            self.cleanup(doc.documentation, &line_prefix)
        };

        write_type_parameters(&mut sb, doc.type_parameters, indent);

        if !doc.see.is_empty() {
            separate(&mut sb, indent);
            for reference in doc.see {
                next_line(&mut sb, indent);
                sb.push_str("@see ");
                sb.push_str(reference);
            }
        }

        if !doc.authors.is_empty() {
            separate(&mut sb, indent);
            for author in doc.authors {
                next_line(&mut sb, indent);
                sb.push_str("@author ");
                sb.push_str(author);
            }
        }

        if !doc.since.is_empty() {
            if !sb.is_empty() {
                if doc.authors.is_empty() {
                    sb.push_str(&format!("\n{indent} *\n{indent} * "));
                } else {
                    sb.push_str(&format!("\n{indent} * "));
                }
            }
            sb.push_str("@since ");
            sb.push_str(doc.since);
        }

        wrap_comment(&sb, indent)
    }

    /// Doc comment for a method, or an empty string when neither the method
    /// nor its parameters are documented.
    pub fn method_comment(&self, method: &Method, indent: &str) -> String {
        let documentation = method.documentation.as_str();
        let no_metadata = method.return_doc.is_empty()
            && method.throws.is_empty()
            && method.see.is_empty()
            && method.since.is_empty()
            && !any_documented(&method.type_parameters);

        if no_metadata {
            if documentation.is_empty()
                && method.parameters.iter().all(|p| p.documentation.is_empty())
            {
                return String::new();
            }
            if method.parameters.is_empty() {
                return self.declaration_comment(&DocBlock::text(documentation), indent);
            }
        }

        let mut sb = if documentation.is_empty() {
            String::new()
        } else {
            self.cleanup(documentation, &format!("{indent} * "))
        };

        let inherits = documentation == INHERIT_DOC;
        let print_params = method.parameters.iter().any(|p| {
            if inherits {
                !p.documentation.is_empty()
            } else {
                p.documentation != INHERIT_DOC
            }
        });

        if print_params {
            let alignment = method
                .parameters
                .iter()
                .map(|p| p.name.chars().count())
                .max()
                .unwrap_or(0);
            let multiline = format!("{indent} *{}", " ".repeat(" @param ".len() + alignment + 1));

            separate(&mut sb, indent);
            for param in &method.parameters {
                next_line(&mut sb, indent);
                sb.push_str("@param ");
                sb.push_str(&param.name);
                sb.push_str(&" ".repeat(alignment - param.name.chars().count() + 1));
                sb.push_str(&self.cleanup(&param.documentation, &multiline));
            }
        }

        write_type_parameters(&mut sb, &method.type_parameters, indent);

        if !method.return_doc.is_empty() {
            if !sb.is_empty() {
                sb.push_str(&format!("\n{indent} *\n{indent} * "));
            }
            sb.push_str("@return ");
            sb.push_str(&self.cleanup(&method.return_doc, &format!("{indent} *         ")));
        }

        if !method.throws.is_empty() {
            separate(&mut sb, indent);
            for (exception, condition) in &method.throws {
                next_line(&mut sb, indent);
                sb.push_str("@throws ");
                sb.push_str(exception.simple_name());
                if !condition.is_empty() {
                    sb.push(' ');
                    sb.push_str(condition);
                }
            }
        }

        if !method.see.is_empty() {
            separate(&mut sb, indent);
            for reference in &method.see {
                next_line(&mut sb, indent);
                sb.push_str("@see ");
                sb.push_str(reference);
            }
        }

        if !method.since.is_empty() {
            if !sb.is_empty() {
                sb.push_str(&format!("\n{indent} *\n{indent} * "));
            }
            sb.push_str("@since ");
            sb.push_str(&method.since);
        }

        wrap_comment(&sb, indent)
    }

    fn layout_dom(&self, dom: &str, prefix: &str, out: &mut String) {
        let tags: Vec<_> = self.block_tag.find_iter(dom).collect();

        // (tag, tag start, text following the tag)
        let mut fragments: Vec<(&str, usize, &str)> = Vec::with_capacity(tags.len() + 1);
        match tags.first() {
            Some(first) if first.start() == 0 => {}
            first => {
                let end = first.map_or(dom.len(), |m| m.start());
                fragments.push(("", 0, &dom[..end]));
            }
        }
        for (i, tag) in tags.iter().enumerate() {
            let end = tags.get(i + 1).map_or(dom.len(), |next| next.start());
            fragments.push((tag.as_str(), tag.start(), &dom[tag.end()..end]));
        }

        for (tag, start, text) in fragments {
            let closing = tag.starts_with("</");
            if !tag.is_empty() {
                if starts_new_line(dom, start) {
                    if !closing && !self.child_tag.is_match(tag) {
                        out.push('\n');
                        out.push_str(prefix);
                    }
                    out.push('\n');
                    out.push_str(prefix);
                }
                out.push_str(tag);
            }

            let text = text.trim();
            if !text.is_empty() {
                layout_text(text, prefix, closing, out);
            }
        }
    }
}

fn alternation<S: AsRef<str>>(tags: &[S]) -> String {
    tags.iter()
        .map(|tag| regex::escape(tag.as_ref()))
        .collect::<Vec<_>>()
        .join("|")
}

/// Whether only whitespace separates `index` from a preceding line break.
fn starts_new_line(dom: &str, index: usize) -> bool {
    for c in dom[..index].chars().rev() {
        if c == '\n' {
            return true;
        }
        if !c.is_whitespace() {
            return false;
        }
    }
    false
}

/// Split text into paragraphs. The first paragraph stays inline unless
/// `force_paragraph` is set; every later one becomes a `<p>` block.
fn layout_text(text: &str, prefix: &str, force_paragraph: bool, out: &mut String) {
    let mut to: Option<usize> = None;

    for paragraph in PARAGRAPH.find_iter(text) {
        let from = paragraph.start();
        if to.is_none() && from > 0 {
            append_first(&text[..from], prefix, force_paragraph, out);
        }
        to = Some(paragraph.end());
        append_paragraph(paragraph.as_str(), prefix, out);
    }

    match to {
        None => append_first(text, prefix, force_paragraph, out),
        Some(end) if end < text.len() => append_paragraph(&text[end..], prefix, out),
        Some(_) => {}
    }
}

fn append_first(text: &str, prefix: &str, force_paragraph: bool, out: &mut String) {
    if force_paragraph {
        append_paragraph(text, prefix, out);
    } else {
        out.push_str(text);
    }
}

fn append_paragraph(text: &str, prefix: &str, out: &mut String) {
    out.push('\n');
    out.push_str(prefix);
    out.push('\n');
    out.push_str(prefix);
    out.push_str("<p>");
    out.push_str(text.trim());
    out.push_str("</p>");
}

/// Replace the leading indentation of every line with `prefix`. Lines that
/// start with [`PREFIX_MARKER`] are always prefixed; indented lines that
/// already continue a comment (`*`) are left alone.
fn apply_prefix(text: &str, prefix: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        if let Some(rest) = line.strip_prefix(PREFIX_MARKER) {
            out.push_str(prefix);
            out.push_str(rest);
            continue;
        }
        let content = line.trim_start_matches([' ', '\t']);
        if content.len() < line.len() && !content.starts_with('*') {
            out.push_str(prefix);
            out.push_str(content);
        } else {
            out.push_str(line);
        }
    }
    out
}

/// Wrap laid-out text in comment delimiters.
fn any_documented(params: &[TypeParameter]) -> bool {
    params.iter().any(|p| !p.documentation.is_empty())
}

/// Undocumented type parameters get no `@param <T>` line.
fn write_type_parameters(sb: &mut String, params: &[TypeParameter], indent: &str) {
    if !any_documented(params) {
        return;
    }
    separate(sb, indent);
    for param in params.iter().filter(|p| !p.documentation.is_empty()) {
        next_line(sb, indent);
        sb.push_str(&format!("@param <{}> {}", param.name, param.documentation));
    }
}

fn wrap_comment(body: &str, indent: &str) -> String {
    if body.contains('\n') {
        format!("{indent}/**\n{indent} * {body}\n{indent} */")
    } else {
        format!("{indent}/** {body} */")
    }
}

fn separate(sb: &mut String, indent: &str) {
    if !sb.is_empty() {
        sb.push('\n');
        sb.push_str(indent);
        sb.push_str(" *");
    }
}

fn next_line(sb: &mut String, indent: &str) {
    if !sb.is_empty() {
        sb.push('\n');
        sb.push_str(indent);
        sb.push_str(" * ");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::Parameter;
    use crate::types::{PrimitiveType, TypeRef};

    const PREFIX: &str = " * ";

    fn layout() -> DocLayout {
        DocLayout::default()
    }

    #[test]
    fn test_single_paragraph_stays_inline() {
        assert_eq!(layout().cleanup("  Returns the value.  ", PREFIX), "Returns the value.");
    }

    #[test]
    fn test_second_paragraph_becomes_p_block() {
        let out = layout().cleanup("First.\n\nSecond.", PREFIX);
        assert_eq!(out, "First.\n * \n * <p>Second.</p>");
    }

    #[test]
    fn test_block_tag_on_new_line_gets_blank_line() {
        let out = layout().cleanup("Intro.\n<ul>\n<li>one</li>\n</ul>", PREFIX);
        assert_eq!(out, "Intro.\n * \n * <ul>\n * <li>one</li>\n * </ul>");
    }

    #[test]
    fn test_inline_tag_stays_on_line() {
        let out = layout().cleanup("See <code>x</code> here.", PREFIX);
        assert_eq!(out, "See<code>x</code>\n * \n * <p>here.</p>");
    }

    #[test]
    fn test_text_after_closing_tag_is_forced_into_paragraph() {
        let out = layout().cleanup("<div>body</div>\ntail", PREFIX);
        assert_eq!(out, "<div>body</div>\n * \n * <p>tail</p>");
    }

    #[test]
    fn test_whitespace_only_lines_are_emptied() {
        let out = layout().cleanup("a\n   \n\nb", PREFIX);
        assert_eq!(out, "a\n * \n * <p>b</p>");
    }

    #[test]
    fn test_indented_lines_get_prefix() {
        let out = layout().cleanup("a\n    b", PREFIX);
        assert_eq!(out, "a\n * b");
    }

    #[test]
    fn test_prefix_marker_forces_prefix() {
        let out = layout().cleanup("a\n\u{FFFF}b", PREFIX);
        assert_eq!(out, "a\n * b");
    }

    #[test]
    fn test_paragraphs_and_blocks_without_prefix() {
        let text = "Intro text.\n\nMore text.\n<ul>\n<li>one</li>\n</ul>";
        assert_eq!(
            layout().cleanup(text, ""),
            "Intro text.\n\n<p>More text.</p>\n\n<ul>\n<li>one</li>\n</ul>"
        );
    }

    #[test]
    fn test_custom_tags() {
        let layout = DocLayout::new(&["section", "item"], &["item"]).unwrap();
        let out = layout.cleanup("a\n<section>\n<item>x\n<table>", PREFIX);
        assert_eq!(out, "a\n * \n * <section>\n * <item>x\n<table>");
    }

    #[test]
    fn test_declaration_comment_single_line() {
        let out = layout().declaration_comment(&DocBlock::text("A value."), "    ");
        assert_eq!(out, "    /** A value. */");
    }

    #[test]
    fn test_declaration_comment_empty_is_omitted() {
        assert_eq!(layout().declaration_comment(&DocBlock::text("  "), ""), "");
    }

    #[test]
    fn test_declaration_comment_with_metadata() {
        let params = vec![TypeParameter::new("T", "the value type")];
        let authors = vec!["Jane".to_string()];
        let doc = DocBlock {
            documentation: "A value.",
            type_parameters: &params,
            authors: &authors,
            since: "1.0",
            ..DocBlock::default()
        };

        let out = layout().declaration_comment(&doc, "");
        assert_eq!(
            out,
            "/**\n * A value.\n *\n * @param <T> the value type\n *\n * @author Jane\n * @since 1.0\n */"
        );
    }

    #[test]
    fn test_since_without_authors_gets_blank_line() {
        let doc = DocBlock {
            documentation: "A value.",
            since: "2.0",
            ..DocBlock::default()
        };
        let out = layout().declaration_comment(&doc, "");
        assert_eq!(out, "/**\n * A value.\n *\n * @since 2.0\n */");
    }

    #[test]
    fn test_method_comment_aligns_parameters() {
        let method = Method::new(PrimitiveType::Int, "clamp")
            .documented("Clamps a value.")
            .param(Parameter::new(PrimitiveType::Int, "value", "the value"))
            .param(Parameter::new(PrimitiveType::Int, "max", "upper bound"))
            .returns("the clamped value");

        let out = layout().method_comment(&method, "    ");
        assert_eq!(
            out,
            "    /**\n     * Clamps a value.\n     *\n     * @param value the value\n     * @param max   upper bound\n     *\n     * @return the clamped value\n     */"
        );
    }

    #[test]
    fn test_method_comment_empty() {
        let method = Method::new(TypeRef::Void, "run")
            .param(Parameter::new(PrimitiveType::Int, "x", ""));
        assert_eq!(layout().method_comment(&method, ""), "");
    }

    #[test]
    fn test_undocumented_generic_method_has_no_comment() {
        let method = Method::new(TypeRef::generic("R"), "map")
            .type_param(TypeParameter::new("R", ""))
            .param(Parameter::new(TypeRef::generic("T"), "value", ""));
        assert_eq!(layout().method_comment(&method, "    "), "");
    }

    #[test]
    fn test_undocumented_generic_type_has_no_comment() {
        let params = vec![TypeParameter::new("T", "")];
        let doc = DocBlock {
            type_parameters: &params,
            ..DocBlock::default()
        };
        assert_eq!(layout().declaration_comment(&doc, ""), "");
    }

    #[test]
    fn test_only_documented_type_parameters_are_listed() {
        let method = Method::new(TypeRef::generic("R"), "map")
            .documented("Maps the value.")
            .type_param(TypeParameter::new("T", ""))
            .type_param(TypeParameter::new("R", "the result type"));

        let out = layout().method_comment(&method, "");
        assert_eq!(
            out,
            "/**\n * Maps the value.\n *\n * @param <R> the result type\n */"
        );
    }

    #[test]
    fn test_method_comment_inherit_doc_skips_params() {
        let method = Method::new(TypeRef::Void, "run")
            .documented(INHERIT_DOC)
            .param(Parameter::new(PrimitiveType::Int, "x", ""));
        assert_eq!(layout().method_comment(&method, ""), "/** {@inheritDoc} */");
    }

    #[test]
    fn test_method_comment_throws_and_since() {
        let method = Method::new(TypeRef::Void, "add")
            .documented("Adds a listener.")
            .throws(
                TypeRef::named("NullPointerException", "java.lang"),
                "if {@code listener} is {@code null}",
            )
            .since("3.0");

        let out = layout().method_comment(&method, "");
        assert_eq!(
            out,
            "/**\n * Adds a listener.\n *\n * @throws NullPointerException if {@code listener} is {@code null}\n *\n * @since 3.0\n */"
        );
    }
}
