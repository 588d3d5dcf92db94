//! Core data types shared by the adapters and the engine.
//!
//! ## Module Structure
//!
//! - `observation`: Extracted `{key, value}` pairs and per-document batches
//! - `source`: Source code location types

pub mod observation;
pub mod source;

pub use observation::{DocumentBatch, SourceKind, TranslationObservation};
pub use source::{LineIndex, SourceLocation};
