//! Document model types.
//!
//! This module defines the intermediate representation that bridges
//! DOCX reading and section extraction: an ordered stream of [`Block`]s
//! read from the document, and the [`Section`]s the extractor builds
//! from them.

mod block;
mod document;
mod section;
mod table;

pub use block::Block;
pub use document::{Document, Metadata};
pub use section::{Fragment, Section, PARAGRAPH_SEPARATOR, PREAMBLE_TITLE};
pub use table::Table;
