//! Markdown module for Markdown PDF Forge
//!
//! Handles the two views of the document source:
//! - Line classification feeding the PDF layout
//! - HTML preview rendering

pub mod classify;
pub mod preview;

pub use classify::{classify_document, extract_title, BlockKind};
pub use preview::PreviewRenderer;
