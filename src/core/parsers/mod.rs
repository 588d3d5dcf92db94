//! Source document parsers.
//!
//! - `html`: tolerant HTML template reader (quick-xml events into a small element tree)
//! - `script`: JavaScript/TypeScript parser (uses swc for AST generation)

pub mod html;
pub mod script;
