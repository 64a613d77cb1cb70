//! Language emitters.
//!
//! This module defines the [`Emitter`] trait the renderer drives and the
//! emitters available out of the box.

pub mod java;
pub mod traits;

pub use java::JavaEmitter;
pub use traits::Emitter;
