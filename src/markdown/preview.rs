//! Markdown Preview Rendering
//!
//! The live preview is produced by pulldown-cmark with the GFM table,
//! strikethrough and task-list extensions. Rendering never fails; malformed
//! markdown simply renders as text.

use crate::config::ThemePreference;
use pulldown_cmark::{html, Options, Parser};

/// Markdown preview renderer
#[derive(Debug, Clone)]
pub struct PreviewRenderer {
    /// Parser options
    options: Options,
}

impl PreviewRenderer {
    pub fn new() -> Self {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);
        options.insert(Options::ENABLE_TASKLISTS);

        Self { options }
    }

    /// Render markdown to an HTML fragment
    pub fn render_html(&self, markdown: &str) -> String {
        let parser = Parser::new_ext(markdown, self.options);
        let mut html_output = String::new();
        html::push_html(&mut html_output, parser);
        html_output
    }

    /// Render markdown to a standalone HTML page styled for the theme
    pub fn render_page(&self, markdown: &str, title: &str, theme: ThemePreference) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <meta name="generator" content="Markdown PDF Forge">
    <title>{}</title>
    <style>{}</style>
</head>
<body>
    <article class="markdown-body">
{}
    </article>
</body>
</html>"#,
            escape_html(title),
            styles(theme),
            self.render_html(markdown)
        )
    }
}

impl Default for PreviewRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn styles(theme: ThemePreference) -> String {
    let palette = match theme {
        ThemePreference::Dark => {
            r#"
        :root {
            --color-bg: #0d1117;
            --color-text: #c9d1d9;
            --color-link: #58a6ff;
            --color-code-bg: #161b22;
            --color-border: #30363d;
            --color-blockquote: #8b949e;
        }"#
        }
        ThemePreference::Light => {
            r#"
        :root {
            --color-bg: #ffffff;
            --color-text: #24292e;
            --color-link: #0366d6;
            --color-code-bg: #f6f8fa;
            --color-border: #e1e4e8;
            --color-blockquote: #6a737d;
        }"#
        }
    };

    format!(
        r#"{}

        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
            line-height: 1.6;
            color: var(--color-text);
            background-color: var(--color-bg);
            max-width: 900px;
            margin: 0 auto;
            padding: 2rem;
        }}

        .markdown-body a {{ color: var(--color-link); }}

        .markdown-body code, .markdown-body pre {{
            background-color: var(--color-code-bg);
            border-radius: 6px;
            font-family: "SFMono-Regular", Consolas, "Liberation Mono", Menlo, monospace;
        }}

        .markdown-body pre {{ padding: 16px; overflow: auto; }}

        .markdown-body blockquote {{
            margin: 16px 0;
            padding: 0 1em;
            color: var(--color-blockquote);
            border-left: .25em solid var(--color-border);
        }}

        .markdown-body table {{ border-collapse: collapse; }}

        .markdown-body th, .markdown-body td {{
            padding: 6px 13px;
            border: 1px solid var(--color-border);
        }}

        .markdown-body hr {{ border: 0; border-top: 1px solid var(--color-border); }}
    "#,
        palette
    )
}
