//! Heuristic, line-oriented extraction of HTTP endpoints and functions
//!
//! No syntax trees are built. Each source line is matched against a closed
//! set of per-framework idioms (see [`idioms`]), and function references are
//! counted by whole-word search over the enclosing file.

pub mod common;
pub mod idioms;
mod extractor;
mod references;

pub use common::{CodeEndpoint, CodeFunction, CodeItem, Framework, HttpMethod, ReferenceSite};
pub use extractor::{Extractor, FileExtraction, LineExtraction};
pub use idioms::{Idiom, IdiomMatch, Recognizer};
pub use references::find_references;
