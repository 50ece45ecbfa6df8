//! PDF module for Markdown PDF Forge
//!
//! Turns markdown source into a paginated PDF:
//! - Helvetica metrics and WinAnsi encoding
//! - Word wrapping to the content width
//! - Line-by-line page layout
//! - PDF serialization

pub mod font;
pub mod layout;
pub mod wrap;
pub mod writer;

pub use layout::layout_document;
pub use writer::render_pdf;
