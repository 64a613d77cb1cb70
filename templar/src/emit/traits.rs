//! Emitter trait definition.
//!
//! The renderer owns the language-agnostic parts of a generated file: member
//! order, section dividers, blank-line separation and nesting. Everything
//! that depends on the target language's syntax goes through [`Emitter`].

use crate::error::RenderError;
use crate::import::Import;
use crate::member::{Field, Method};
use crate::target::{Target, TypeDecl};
use crate::types::TypeRef;

/// Trait for language emitters.
///
/// Implement this trait to add support for another output language. Every
/// `write_*` method appends complete lines, each terminated by `\n`, except
/// [`Emitter::write_type_header`], which stops right after the opening brace.
pub trait Emitter: Send + Sync {
    /// Language name, matched against [`Target::language`].
    fn language(&self) -> &'static str;

    /// Token starting a line comment, used for section dividers.
    fn line_comment(&self) -> &'static str;

    /// Whether referencing `ty` from a file in `package` requires an import.
    fn needs_import(&self, ty: &TypeRef, package: &str) -> bool;

    /// Write everything that precedes the top-level declaration.
    fn write_preamble(&self, target: &Target, imports: &[Import], out: &mut String);

    /// Write documentation, annotations and the declaration line of a type,
    /// ending with the opening brace.
    fn write_type_header(
        &self,
        decl: &TypeDecl,
        is_member: bool,
        indent: &str,
        out: &mut String,
    ) -> Result<(), RenderError>;

    /// Write a field declaration.
    fn write_field(
        &self,
        field: &Field,
        owner: &TypeDecl,
        indent: &str,
        out: &mut String,
    ) -> Result<(), RenderError>;

    /// Write a method or constructor declaration including its body.
    fn write_method(
        &self,
        method: &Method,
        owner: &TypeDecl,
        indent: &str,
        out: &mut String,
    ) -> Result<(), RenderError>;
}
