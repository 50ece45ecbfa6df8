//! Text buffer implementation using ropey
//!
//! Holds the document source being edited. Edits replace the content
//! wholesale; every replacement bumps the buffer version.

use ropey::Rope;

/// Text buffer wrapping ropey::Rope with additional metadata
#[derive(Debug, Clone)]
pub struct TextBuffer {
    /// The underlying rope data structure, always LF-normalized
    rope: Rope,

    /// Version number, incremented on each change
    version: u64,
}

impl TextBuffer {
    /// Create an empty text buffer
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            version: 0,
        }
    }

    /// Create a buffer from a string
    pub fn from_str(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.load(text);
        buffer
    }

    fn load(&mut self, text: &str) {
        // Normalize to LF internally
        let normalized = text.replace("\r\n", "\n");
        self.rope = Rope::from_str(&normalized);
    }

    /// Replace the entire buffer contents
    pub fn set_content(&mut self, text: &str) {
        self.load(text);
        self.version += 1;
    }

    /// Get the current version number
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Owned copy of the LF-normalized contents
    pub fn snapshot(&self) -> String {
        self.rope.to_string()
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}
