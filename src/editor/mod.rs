//! Editor module for Markdown PDF Forge
//!
//! Contains the text buffer backing the editor session (using ropey).

pub mod buffer;

pub use buffer::TextBuffer;
