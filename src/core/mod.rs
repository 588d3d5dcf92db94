//! Core extraction engine.
//!
//! A build runs strictly in this order:
//!
//! 1. **Extraction**: adapters turn each markup or script document into an
//!    ordered batch of observations (`extract`, on top of `parsers`)
//! 2. **Normalization**: batches are filtered, validated and flattened in
//!    discovery order (`normalize`)
//! 3. **Merge**: observations are folded into the catalog (`merge`)
//! 4. **Diff**: the catalog is compared with the baseline (`diff`)
//! 5. **Write**: the catalog is serialized and named (`writer`)
//! 6. **Index**: output files are indexed by language and namespace (`index`)
//!
//! `pipeline` runs the steps in this order. All state for one build lives in
//! a `BuildContext`.

pub mod catalog;
pub mod context;
pub mod data;
pub mod diff;
pub mod extract;
pub mod file_scanner;
pub mod index;
pub mod merge;
pub mod normalize;
pub mod parsers;
pub mod pipeline;
pub mod writer;

pub use catalog::{Catalog, CatalogConflict, CatalogNode, FlatCatalog};
pub use context::BuildContext;
pub use data::{DocumentBatch, LineIndex, SourceKind, SourceLocation, TranslationObservation};
pub use diff::DiffReport;
pub use index::OutputIndex;
pub use merge::DuplicateValueIndex;
