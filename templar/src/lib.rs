//! # templar
//!
//! Incremental source generator for programmatically defined Java types.
//!
//! Templates are plain Rust functions that build a [`Profile`]: a set of
//! [`Target`] files, each holding one type declaration assembled from
//! fields, methods and nested types. The [`Generator`] discovers template
//! units on disk, builds their profiles, renders them in parallel and only
//! writes files whose content actually changed.
//!
//! ## Architecture
//!
//! - [`types`] - Type references, annotations and primitive conversions
//! - [`member`] - Fields, methods, modifiers and member ordering
//! - [`target`] - Type declarations, output files and profiles
//! - [`import`] - Import normalization and grouping
//! - [`doc`] - Documentation comment layout
//! - [`emit`] - Language emitters
//! - [`render`] - Target rendering
//! - [`registry`] - Template factory registry
//! - [`scanner`] - Template unit discovery
//! - [`writer`] - Diff-before-write file output
//! - [`driver`] - Parallel generation runs
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use templar::{Field, Generator, Modifiers, PrimitiveType, Profile, Target, TemplateRegistry, TypeDecl};
//!
//! let mut registry = TemplateRegistry::new();
//! registry.register("geo.point", "point", || {
//!     let decl = TypeDecl::class("Point")
//!         .with_modifiers(Modifiers::PUBLIC)
//!         .member(Field::new(PrimitiveType::Int, "x").with_modifiers(Modifiers::PRIVATE));
//!     Profile::new("point").target(Target::java("geo", "io.example.geo", decl))
//! });
//!
//! let summary = Generator::new(registry)
//!     .run(Path::new("templates"), Path::new("."))
//!     .expect("generation failed");
//! println!("{} file(s) written", summary.written());
//! ```

pub mod doc;
pub mod driver;
pub mod emit;
pub mod error;
pub mod import;
pub mod member;
pub mod registry;
pub mod render;
pub mod scanner;
pub mod target;
pub mod types;
pub mod writer;

// Re-export main types for convenience
pub use doc::{DocBlock, DocLayout};
pub use driver::{FileReport, Generator, GeneratorOptions, ProfileFailure, RunSummary};
pub use emit::{Emitter, JavaEmitter};
pub use error::{
    DiscoveryError, DiscoveryWarning, GenerateError, GenerateResult, RenderError, WriteError,
};
pub use import::Import;
pub use member::{Category, Field, Member, Method, Modifiers, Parameter, TypeParameter};
pub use registry::TemplateRegistry;
pub use render::Renderer;
pub use scanner::{TemplateScanner, TemplateUnit};
pub use target::{Profile, Target, TypeDecl, TypeKind};
pub use types::{cast, convert, larger, smaller, Annotation, PrimitiveType, TypeRef};
pub use writer::{IncrementalWriter, WriteOutcome};
