//! File I/O operations with encoding detection and atomic writes
//!
//! Provides safe file reading and writing with:
//! - UTF-8 BOM detection and lossy fallback for invalid input
//! - Atomic writes so a failed export never leaves a partial PDF
//! - File size limits

use crate::config::MAX_FILE_SIZE;
use crate::error::{ExportError, ExportResult, FileError, FileResult};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Detected encoding of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileEncoding {
    /// UTF-8 without BOM
    #[default]
    Utf8,
    /// UTF-8 with BOM
    Utf8Bom,
    /// Invalid UTF-8 (lossy conversion used)
    Unknown,
}

/// Result of reading a file
#[derive(Debug, Clone)]
pub struct FileReadResult {
    /// The file content as a string
    pub content: String,
    /// Detected encoding
    pub encoding: FileEncoding,
    /// Original file size in bytes
    pub size_bytes: u64,
    /// Whether lossy conversion was used
    pub lossy: bool,
}

/// Detect file encoding from raw bytes
fn detect_encoding(bytes: &[u8]) -> FileEncoding {
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return FileEncoding::Utf8Bom;
    }
    if std::str::from_utf8(bytes).is_ok() {
        FileEncoding::Utf8
    } else {
        FileEncoding::Unknown
    }
}

/// Decode bytes to string based on detected encoding
fn decode_content(bytes: &[u8], encoding: FileEncoding) -> (String, bool) {
    let content = match encoding {
        FileEncoding::Utf8Bom => &bytes[3..],
        FileEncoding::Utf8 | FileEncoding::Unknown => bytes,
    };
    match std::str::from_utf8(content) {
        Ok(s) => (s.to_string(), false),
        Err(_) => (String::from_utf8_lossy(content).to_string(), true),
    }
}

/// Read a file with encoding detection
pub async fn read_file(path: impl AsRef<Path>) -> FileResult<FileReadResult> {
    let path = path.as_ref();
    let path_buf = path.to_path_buf();

    if !path.exists() {
        return Err(FileError::NotFound(path_buf));
    }

    let metadata = tokio::fs::metadata(path).await.map_err(|e| FileError::ReadError {
        path: path_buf.clone(),
        source: e,
    })?;

    let size_bytes = metadata.len();
    if size_bytes > MAX_FILE_SIZE {
        return Err(FileError::TooLarge {
            path: path_buf,
            size: size_bytes,
            max_size: MAX_FILE_SIZE,
        });
    }

    let bytes = tokio::fs::read(path).await.map_err(|e| FileError::ReadError {
        path: path_buf.clone(),
        source: e,
    })?;

    let encoding = detect_encoding(&bytes);
    let (content, lossy) = decode_content(&bytes, encoding);

    Ok(FileReadResult {
        content,
        encoding,
        size_bytes,
        lossy,
    })
}

/// Write bytes to a file using atomic write
///
/// The target is either fully written or left untouched.
pub async fn write_file_atomic(path: impl AsRef<Path>, content: &[u8]) -> ExportResult<()> {
    let path = path.as_ref();
    let path_buf = path.to_path_buf();

    // Generate temp filename in same directory
    let parent = path.parent().unwrap_or(Path::new("."));
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "file".to_string());

    let timestamp = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);

    let temp_path = parent.join(format!(".{}.{}.tmp", filename, timestamp));

    let write_result = async {
        let mut file = tokio::fs::File::create(&temp_path).await?;
        tokio::io::AsyncWriteExt::write_all(&mut file, content).await?;
        tokio::io::AsyncWriteExt::flush(&mut file).await?;
        file.sync_all().await?;
        Ok::<(), std::io::Error>(())
    }
    .await;

    if let Err(e) = write_result {
        // Clean up temp file on failure
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(ExportError::Write {
            path: path_buf,
            source: e,
        });
    }

    if let Err(e) = tokio::fs::rename(&temp_path, path).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(ExportError::Write {
            path: path_buf,
            source: e,
        });
    }

    Ok(())
}

/// Ensure a directory exists, creating it and its parents if needed
pub async fn ensure_dir(path: impl AsRef<Path>) -> ExportResult<PathBuf> {
    let path = path.as_ref();
    if !path.is_dir() {
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| ExportError::Directory {
                path: path.to_path_buf(),
                source: e,
            })?;
    }
    Ok(path.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_encoding_utf8() {
        assert_eq!(detect_encoding("Hello, world!".as_bytes()), FileEncoding::Utf8);
    }

    #[test]
    fn test_detect_encoding_utf8_bom() {
        let bytes = [0xEF, 0xBB, 0xBF, b'H', b'i'];
        assert_eq!(detect_encoding(&bytes), FileEncoding::Utf8Bom);
        assert_eq!(decode_content(&bytes, FileEncoding::Utf8Bom), ("Hi".to_string(), false));
    }

    #[test]
    fn test_decode_invalid_is_lossy() {
        let bytes = [b'a', 0xFF, b'b'];
        let encoding = detect_encoding(&bytes);
        assert_eq!(encoding, FileEncoding::Unknown);
        let (content, lossy) = decode_content(&bytes, encoding);
        assert!(lossy);
        assert_eq!(content, "a\u{FFFD}b");
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_file(dir.path().join("nope.md")).await;
        assert!(matches!(result, Err(FileError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_read_file_strips_bom() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        std::fs::write(&path, b"\xEF\xBB\xBF# Title\n").unwrap();
        let result = read_file(&path).await.unwrap();
        assert_eq!(result.content, "# Title\n");
        assert_eq!(result.encoding, FileEncoding::Utf8Bom);
        assert_eq!(result.size_bytes, 11);
    }

    #[tokio::test]
    async fn test_write_file_atomic_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pdf");
        write_file_atomic(&path, b"%PDF-1.7").await.unwrap();

        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-1.7");
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[tokio::test]
    async fn test_write_into_missing_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.pdf");
        let result = write_file_atomic(&path, b"x").await;
        assert!(matches!(result, Err(ExportError::Write { .. })));
    }

    #[tokio::test]
    async fn test_ensure_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir(&nested).await.unwrap();
        assert!(nested.is_dir());
    }
}
