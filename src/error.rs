//! Error types for Markdown PDF Forge
//!
//! This module defines all custom error types used throughout the application.
//! Error types are organized by category for clear error handling and user-friendly messages.

use std::path::PathBuf;
use thiserror::Error;

/// Main application error type encompassing all error categories
#[derive(Error, Debug)]
pub enum AppError {
    /// Input file errors
    #[error(transparent)]
    FileIO(#[from] FileError),

    /// PDF export errors
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Input file errors
#[derive(Error, Debug)]
pub enum FileError {
    /// File not found at specified path
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// File is too large to load into the editor
    #[error("File too large: {path} ({size} bytes, max {max_size} bytes)")]
    TooLarge {
        path: PathBuf,
        size: u64,
        max_size: u64,
    },

    /// Error reading file
    #[error("Could not read file: {path}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error loading configuration file
    #[error("Could not load configuration: {0}")]
    LoadError(String),

    /// Error parsing configuration
    #[error("Invalid configuration format: {0}")]
    ParseError(String),

    /// Configuration directory error
    #[error("Could not access configuration directory")]
    DirectoryError,
}

/// Page layout errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    /// Page geometry leaves no room for content
    #[error("Invalid page geometry: {reason}")]
    InvalidGeometry { reason: String },
}

/// Errors raised while producing or delivering a PDF
#[derive(Error, Debug)]
pub enum ExportError {
    /// Layout pass failed
    #[error(transparent)]
    Layout(#[from] LayoutError),

    /// Error writing the generated document
    #[error("Could not write PDF: {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error preparing the output directory
    #[error("Could not prepare output directory: {path}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for operations that can fail with AppError
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for file operations
pub type FileResult<T> = Result<T, FileError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type alias for layout operations
pub type LayoutResult<T> = Result<T, LayoutError>;

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;

impl FileError {
    /// Create a user-friendly error message suitable for display
    pub fn user_message(&self) -> String {
        match self {
            FileError::NotFound(_) => {
                "The file could not be found. It may have been moved or deleted.".to_string()
            }
            FileError::TooLarge { max_size, .. } => {
                format!(
                    "This file is too large to open. Maximum file size is {} bytes.",
                    max_size
                )
            }
            _ => self.to_string(),
        }
    }
}

impl ExportError {
    /// The single failure text shown to the user for any export error
    pub fn user_message(&self) -> String {
        "There was an error generating the PDF. Please try again.".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_error_display() {
        let err = FileError::NotFound(PathBuf::from("/test/file.md"));
        assert!(err.to_string().contains("/test/file.md"));
    }

    #[test]
    fn test_file_error_user_message() {
        let err = FileError::TooLarge {
            path: PathBuf::from("/test/file.md"),
            size: 20,
            max_size: 10,
        };
        assert!(err.user_message().contains("10 bytes"));
    }

    #[test]
    fn test_export_error_from_layout_error() {
        let layout = LayoutError::InvalidGeometry {
            reason: "margin too large".to_string(),
        };
        let export: ExportError = layout.into();
        assert!(matches!(export, ExportError::Layout(_)));
        assert!(export.to_string().contains("margin too large"));
    }

    #[test]
    fn test_export_error_user_message_is_generic() {
        let err = ExportError::Write {
            path: PathBuf::from("/out/doc.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert!(!err.user_message().contains("disk full"));
    }

    #[test]
    fn test_app_error_from_export_error() {
        let err: AppError = ExportError::from(LayoutError::InvalidGeometry {
            reason: "x".to_string(),
        })
        .into();
        assert!(matches!(err, AppError::Export(_)));
    }
}
