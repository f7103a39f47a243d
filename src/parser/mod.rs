//! DOCX parsing module.

mod docx;
mod options;
mod styles;
mod xml;

pub use docx::DocxParser;
pub use options::{ErrorMode, ParseOptions};
