//! Editor session
//!
//! Owns the markdown buffer, the preview theme and the export controller.
//! The preview and exports always read the buffer as it is at that moment.

use crate::config::{Config, ThemePreference, DEFAULT_TITLE};
use crate::editor::TextBuffer;
use crate::export::{derive_title, ArtifactSink, ExportController, ExportOutcome};
use crate::markdown::PreviewRenderer;
use crate::message::Notifier;

/// Document the session starts with
pub const SAMPLE_DOCUMENT: &str = "# Welcome to Markdown PDF Forge

Start typing your markdown content here! You can use all standard markdown features.

## Features

- **Bold text** and *italic text*
- Lists with items
- [Links](https://example.com)
- Code blocks and `inline code`

### Code Example

```javascript
function hello() {
  console.log(\"Hello, World!\");
}
```

### Task List

- [x] Create markdown editor
- [x] Add live preview
- [ ] Export to PDF
- [ ] Share with others

> This is a blockquote. Great for highlighting important information!

---

Happy writing! \u{1f680}
";

/// A single-document editing session
#[derive(Debug)]
pub struct EditorSession {
    buffer: TextBuffer,
    theme: ThemePreference,
    default_title: String,
    preview: PreviewRenderer,
    exporter: ExportController,
}

impl EditorSession {
    /// Create a session holding the sample document
    pub fn new(default_title: impl Into<String>, theme: ThemePreference) -> Self {
        let default_title = default_title.into();
        Self {
            buffer: TextBuffer::from_str(SAMPLE_DOCUMENT),
            theme,
            exporter: ExportController::new(default_title.clone()),
            default_title,
            preview: PreviewRenderer::new(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.export.default_title.clone(), config.ui.theme)
    }

    /// Replace the whole buffer
    pub fn set_text(&mut self, text: &str) {
        self.buffer.set_content(text);
    }

    /// Owned copy of the current buffer
    pub fn text(&self) -> String {
        self.buffer.snapshot()
    }

    /// Bumped on every edit
    pub fn version(&self) -> u64 {
        self.buffer.version()
    }

    pub fn theme(&self) -> ThemePreference {
        self.theme
    }

    /// Flip between light and dark
    pub fn toggle_theme(&mut self) -> ThemePreference {
        self.theme = self.theme.toggled();
        log::debug!("Theme switched to {:?}", self.theme);
        self.theme
    }

    /// Title derived from the current buffer
    pub fn title(&self) -> String {
        derive_title(&self.text(), &self.default_title)
    }

    /// Full HTML preview page for the current buffer
    pub fn preview_html(&self) -> String {
        let source = self.text();
        let title = derive_title(&source, &self.default_title);
        self.preview.render_page(&source, &title, self.theme)
    }

    /// Whether the export trigger should be disabled
    pub fn is_exporting(&self) -> bool {
        self.exporter.is_busy()
    }

    /// Export a snapshot of the buffer as a PDF
    pub async fn export<S, N>(&self, sink: &mut S, notifier: &mut N) -> ExportOutcome
    where
        S: ArtifactSink,
        N: Notifier,
    {
        self.exporter.export(self.text(), sink, notifier).await
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE, ThemePreference::default())
    }
}
