//! Line classification for PDF layout
//!
//! Each source line is matched against a fixed list of prefixes and the first
//! match decides its block kind. There is no grammar and no nesting: a
//! heading inside a blockquote is just a blockquote.

use regex::Regex;
use std::sync::OnceLock;

/// Glyph prepended to bullet items
pub const BULLET_GLYPH: &str = "\u{2022} ";

/// Block kind of a single source line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Heading1,
    Heading2,
    Heading3,
    Bullet,
    Blockquote,
    /// Blank line or `---` rule: vertical space only
    Spacer,
    Paragraph,
}

impl BlockKind {
    /// Whether the kind's text is reflowed to the content width
    pub fn wraps(&self) -> bool {
        matches!(
            self,
            BlockKind::Bullet | BlockKind::Blockquote | BlockKind::Paragraph
        )
    }
}

/// A classified line with its marker removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedLine {
    pub kind: BlockKind,
    /// Visible text; empty for spacers
    pub text: String,
}

impl ClassifiedLine {
    fn new(kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

struct Patterns {
    h1: Regex,
    h2: Regex,
    h3: Regex,
    bullet: Regex,
    quote: Regex,
    strong: Regex,
    emphasis: Regex,
    code: Regex,
    title: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        h1: Regex::new(r"^#\s+").expect("valid regex"),
        h2: Regex::new(r"^##\s+").expect("valid regex"),
        h3: Regex::new(r"^###\s+").expect("valid regex"),
        bullet: Regex::new(r"^[-*]\s+").expect("valid regex"),
        quote: Regex::new(r"^>\s+").expect("valid regex"),
        strong: Regex::new(r"\*\*([^*]+)\*\*").expect("valid regex"),
        emphasis: Regex::new(r"\*([^*]+)\*").expect("valid regex"),
        code: Regex::new(r"`(.*?)`").expect("valid regex"),
        title: Regex::new(r"(?m)^#\s+(.+)$").expect("valid regex"),
    })
}

/// Classify one line (without its line terminator)
///
/// Whitespace-only lines are spacers, so every line maps to some kind.
pub fn classify_line(line: &str) -> ClassifiedLine {
    let p = patterns();

    if line.starts_with("# ") {
        return ClassifiedLine::new(BlockKind::Heading1, p.h1.replace(line, ""));
    }
    if line.starts_with("## ") {
        return ClassifiedLine::new(BlockKind::Heading2, p.h2.replace(line, ""));
    }
    if line.starts_with("### ") {
        return ClassifiedLine::new(BlockKind::Heading3, p.h3.replace(line, ""));
    }
    if line.starts_with("- ") || line.starts_with("* ") {
        let text = format!("{}{}", BULLET_GLYPH, p.bullet.replace(line, ""));
        return ClassifiedLine::new(BlockKind::Bullet, text);
    }
    if line.starts_with("> ") {
        return ClassifiedLine::new(BlockKind::Blockquote, p.quote.replace(line, ""));
    }

    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed == "---" {
        return ClassifiedLine::new(BlockKind::Spacer, "");
    }

    ClassifiedLine::new(BlockKind::Paragraph, strip_inline_markers(line))
}

/// Remove `**strong**`, `*emphasis*` and `` `code` `` markers, keeping the inner text
pub fn strip_inline_markers(text: &str) -> String {
    let p = patterns();
    let text = p.strong.replace_all(text, "$1");
    let text = p.emphasis.replace_all(&text, "$1");
    p.code.replace_all(&text, "$1").into_owned()
}

/// Split a document into lines and classify each one
///
/// Yields `(source line index, classified line)` in source order.
pub fn classify_document(source: &str) -> Vec<(usize, ClassifiedLine)> {
    source
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .map(classify_line)
        .enumerate()
        .collect()
}

/// Text of the first level-1 heading anywhere in the document
pub fn extract_title(source: &str) -> Option<String> {
    patterns()
        .title
        .captures(source)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
