//! Glean - i18next translation key extractor
//!
//! Glean is a CLI tool and library that extracts translation keys and their
//! default values from HTML templates and JavaScript/TypeScript sources,
//! merges them into one hierarchical catalog, diffs that catalog against a
//! previously published baseline, and writes an index of localized files.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (arguments, commands, reporting)
//! - `config`: Configuration file loading and parsing
//! - `core`: Extraction, merge, diff and index engine
//! - `issues`: Issue type definitions and reporting
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod utils;
