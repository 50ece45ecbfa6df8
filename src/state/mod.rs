//! State management module for Markdown PDF Forge
//!
//! - `editor_session`: the single-document session driving preview and export

mod editor_session;

pub use editor_session::*;
