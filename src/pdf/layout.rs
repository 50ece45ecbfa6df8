//! Page layout engine
//!
//! Walks classified source lines top to bottom, keeping a single vertical
//! cursor in millimetres from the top edge of the current page. The page
//! break check runs once per line, before anything is drawn. A block that is
//! taller than the space left is not re-checked while its wrapped lines are
//! placed, so it can run past the bottom margin.

use super::font::{FontSlant, FontVariant, FontWeight};
use super::wrap::wrap_text;
use crate::config::{PageGeometry, PT_PER_MM};
use crate::error::LayoutResult;
use crate::markdown::{classify_document, BlockKind};

/// Height of one wrapped line, used to advance the cursor
pub const LINE_HEIGHT_MM: f32 = 6.0;

/// Space added after every block
pub const BLOCK_SPACING_MM: f32 = 2.0;

/// Advance for blank lines and rules
pub const SPACER_ADVANCE_MM: f32 = 6.0;

/// Extra left indent for bullet items
pub const BULLET_INDENT_MM: f32 = 5.0;

/// Extra left indent for blockquotes, also taken off their wrap width
pub const QUOTE_INDENT_MM: f32 = 10.0;

/// Baseline distance between wrapped lines of one block, as a multiple of the font size
pub const LINE_HEIGHT_FACTOR: f32 = 1.15;

/// Font size, weight and slant of a run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size_pt: f32,
    pub weight: FontWeight,
    pub slant: FontSlant,
}

impl TextStyle {
    const fn new(size_pt: f32, weight: FontWeight, slant: FontSlant) -> Self {
        Self {
            size_pt,
            weight,
            slant,
        }
    }

    /// Style for a block kind; spacers draw nothing and have none
    pub fn for_kind(kind: BlockKind) -> Option<Self> {
        let style = match kind {
            BlockKind::Heading1 => Self::new(20.0, FontWeight::Bold, FontSlant::Normal),
            BlockKind::Heading2 => Self::new(16.0, FontWeight::Bold, FontSlant::Normal),
            BlockKind::Heading3 => Self::new(14.0, FontWeight::Bold, FontSlant::Normal),
            BlockKind::Bullet | BlockKind::Paragraph => {
                Self::new(12.0, FontWeight::Normal, FontSlant::Normal)
            }
            BlockKind::Blockquote => Self::new(12.0, FontWeight::Normal, FontSlant::Italic),
            BlockKind::Spacer => return None,
        };
        Some(style)
    }

    pub fn variant(&self) -> FontVariant {
        FontVariant::from_style(self.weight, self.slant)
    }

    /// Baseline-to-baseline distance in millimetres
    pub fn leading_mm(&self) -> f32 {
        self.size_pt * LINE_HEIGHT_FACTOR / PT_PER_MM
    }
}

/// A single line of text placed on a page
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// Left edge, millimetres from the left page edge
    pub x: f32,
    /// Baseline, millimetres from the top page edge
    pub y: f32,
    pub text: String,
    pub style: TextStyle,
}

/// Runs drawn on one page, in drawing order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaidOutPage {
    pub runs: Vec<TextRun>,
}

/// Where a source line ended up
#[derive(Debug, Clone, PartialEq)]
pub struct BlockPlacement {
    /// Zero-based line index in the source
    pub source_line: usize,
    pub kind: BlockKind,
    /// Zero-based page index
    pub page: usize,
    /// Cursor position when the block was placed
    pub y: f32,
    /// Number of runs drawn for the block
    pub sub_lines: usize,
}

/// Result of laying out a whole document
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutPlan {
    pub geometry: PageGeometry,
    pub pages: Vec<LaidOutPage>,
    pub placements: Vec<BlockPlacement>,
}

impl LayoutPlan {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

struct Cursor {
    page: usize,
    y: f32,
}

/// Lay out a markdown source on pages of the given geometry
pub fn layout_document(source: &str, geometry: &PageGeometry) -> LayoutResult<LayoutPlan> {
    geometry.validate()?;

    let margin = geometry.margin;
    let content_width = geometry.content_width();
    let bottom = geometry.printable_bottom();

    let mut pages = vec![LaidOutPage::default()];
    let mut placements = Vec::new();
    let mut cursor = Cursor { page: 0, y: margin };

    for (source_line, line) in classify_document(source) {
        if cursor.y > bottom {
            pages.push(LaidOutPage::default());
            cursor.page += 1;
            cursor.y = margin;
        }

        let block_top = cursor.y;
        let mut sub_lines = 0;

        match TextStyle::for_kind(line.kind) {
            None => cursor.y += SPACER_ADVANCE_MM,
            Some(style) if !line.kind.wraps() => {
                pages[cursor.page].runs.push(TextRun {
                    x: margin,
                    y: cursor.y,
                    text: line.text,
                    style,
                });
                sub_lines = 1;
                cursor.y += heading_advance(line.kind);
            }
            Some(style) => {
                let (x, width) = match line.kind {
                    BlockKind::Bullet => (margin + BULLET_INDENT_MM, content_width),
                    BlockKind::Blockquote => {
                        (margin + QUOTE_INDENT_MM, content_width - QUOTE_INDENT_MM)
                    }
                    _ => (margin, content_width),
                };
                let wrapped = wrap_text(&line.text, style.variant(), style.size_pt, width);
                sub_lines = wrapped.len();
                let leading = style.leading_mm();
                let runs = &mut pages[cursor.page].runs;
                for (i, text) in wrapped.into_iter().enumerate() {
                    runs.push(TextRun {
                        x,
                        y: cursor.y + i as f32 * leading,
                        text,
                        style,
                    });
                }
                cursor.y += sub_lines as f32 * LINE_HEIGHT_MM;
            }
        }

        cursor.y += BLOCK_SPACING_MM;

        placements.push(BlockPlacement {
            source_line,
            kind: line.kind,
            page: cursor.page,
            y: block_top,
            sub_lines,
        });
    }

    log::debug!(
        "Laid out {} lines on {} page(s)",
        placements.len(),
        pages.len()
    );

    Ok(LayoutPlan {
        geometry: *geometry,
        pages,
        placements,
    })
}

fn heading_advance(kind: BlockKind) -> f32 {
    match kind {
        BlockKind::Heading1 => 15.0,
        BlockKind::Heading2 => 12.0,
        BlockKind::Heading3 => 10.0,
        _ => LINE_HEIGHT_MM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LayoutError;

    fn a4() -> PageGeometry {
        PageGeometry::a4()
    }

    #[test]
    fn test_title_and_paragraph_single_page() {
        let plan = layout_document("# Title\n\nSome text here.", &a4()).unwrap();
        assert_eq!(plan.page_count(), 1);

        let first = &plan.pages[0].runs[0];
        assert_eq!(first.text, "Title");
        assert_eq!(first.style.size_pt, 20.0);
        assert_eq!(first.style.weight, FontWeight::Bold);
        assert_eq!(first.x, 20.0);
        assert_eq!(first.y, 20.0);

        let ys: Vec<f32> = plan.placements.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![20.0, 37.0, 45.0]);
    }

    #[test]
    fn test_heading_advances() {
        let plan = layout_document("# A\n## B\n### C\nD", &a4()).unwrap();
        let ys: Vec<f32> = plan.placements.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![20.0, 37.0, 51.0, 63.0]);
        let sizes: Vec<f32> = plan.pages[0].runs.iter().map(|r| r.style.size_pt).collect();
        assert_eq!(sizes, vec![20.0, 16.0, 14.0, 12.0]);
    }

    #[test]
    fn test_spacers_draw_nothing() {
        let plan = layout_document("\n---\n   \n", &a4()).unwrap();
        assert!(plan.pages[0].runs.is_empty());
        assert_eq!(plan.placements.len(), 4);
        for placement in &plan.placements {
            assert_eq!(placement.kind, BlockKind::Spacer);
            assert_eq!(placement.sub_lines, 0);
        }
        let ys: Vec<f32> = plan.placements.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![20.0, 28.0, 36.0, 44.0]);
    }

    #[test]
    fn test_indents_and_styles() {
        let plan = layout_document("- item\n> quote\nplain", &a4()).unwrap();
        let runs = &plan.pages[0].runs;
        assert_eq!(runs[0].x, 25.0);
        assert_eq!(runs[0].text, "\u{2022} item");
        assert_eq!(runs[1].x, 30.0);
        assert_eq!(runs[1].style.slant, FontSlant::Italic);
        assert_eq!(runs[2].x, 20.0);
        assert_eq!(runs[2].style.slant, FontSlant::Normal);
    }

    #[test]
    fn test_wrapped_paragraph_advances_per_sub_line() {
        let long = "word ".repeat(80);
        let source = format!("{}\nafter", long.trim_end());
        let plan = layout_document(&source, &a4()).unwrap();

        let para = &plan.placements[0];
        assert!(para.sub_lines > 1);
        let expected = 20.0 + para.sub_lines as f32 * LINE_HEIGHT_MM + BLOCK_SPACING_MM;
        assert!((plan.placements[1].y - expected).abs() < 1e-4);

        let leading = TextStyle::for_kind(BlockKind::Paragraph).unwrap().leading_mm();
        let runs = &plan.pages[0].runs;
        assert!((runs[1].y - runs[0].y - leading).abs() < 1e-4);
    }

    #[test]
    fn test_page_break_boundary() {
        // Each single-line paragraph advances 6 + 2 mm from y = 20; the cursor
        // passes 277 after line 32.
        let source = vec!["line"; 40].join("\n");
        let plan = layout_document(&source, &a4()).unwrap();
        assert_eq!(plan.page_count(), 2);

        let last_on_first = &plan.placements[32];
        assert_eq!(last_on_first.page, 0);
        assert_eq!(last_on_first.y, 276.0);

        let first_on_second = &plan.placements[33];
        assert_eq!(first_on_second.page, 1);
        assert_eq!(first_on_second.y, 20.0);

        assert_eq!(plan.pages[0].runs.len(), 33);
        assert_eq!(plan.pages[1].runs.len(), 7);
    }

    #[test]
    fn test_tall_block_not_rechecked_mid_wrap() {
        let huge = "word ".repeat(3000);
        let plan = layout_document(huge.trim_end(), &a4()).unwrap();
        assert_eq!(plan.page_count(), 1);
        let last = plan.pages[0].runs.last().unwrap();
        assert!(last.y > a4().printable_bottom());
    }

    #[test]
    fn test_layout_is_deterministic() {
        let source = "# Doc\n\n- a\n- b\n> q\n\nSome **text** with `code`.\n".repeat(20);
        let first = layout_document(&source, &a4()).unwrap();
        let second = layout_document(&source, &a4()).unwrap();
        assert_eq!(first.page_count(), second.page_count());
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_document() {
        let plan = layout_document("", &a4()).unwrap();
        assert_eq!(plan.page_count(), 1);
        assert!(plan.pages[0].runs.is_empty());
        assert_eq!(plan.placements.len(), 1);
    }

    #[test]
    fn test_invalid_geometry() {
        let geometry = PageGeometry {
            width: 40.0,
            height: 297.0,
            margin: 20.0,
        };
        assert!(matches!(
            layout_document("text", &geometry),
            Err(LayoutError::InvalidGeometry { .. })
        ));
    }
}
