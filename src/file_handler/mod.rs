//! File handler module for Markdown PDF Forge
//!
//! Handles all file system operations including:
//! - Reading markdown input with encoding detection
//! - Atomic writes for generated documents

pub mod io;

pub use io::*;
