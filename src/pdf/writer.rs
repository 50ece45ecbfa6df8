//! Serialize a layout plan to PDF bytes

use super::font::{encode_winansi, FontVariant};
use super::layout::{LaidOutPage, LayoutPlan};
use crate::config::PT_PER_MM;
use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

/// zlib level for content streams
const COMPRESSION_LEVEL: u8 = 6;

/// Build a PDF document from a finished layout
///
/// All pages share the four Helvetica base fonts; nothing is embedded.
pub fn render_pdf(plan: &LayoutPlan, title: &str) -> Vec<u8> {
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let info_id = alloc();
    let font_refs: Vec<(FontVariant, Ref)> = FontVariant::ALL
        .iter()
        .map(|variant| (*variant, alloc()))
        .collect();
    let page_refs: Vec<(Ref, Ref)> = plan.pages.iter().map(|_| (alloc(), alloc())).collect();

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_refs.iter().map(|(page_id, _)| *page_id))
        .count(page_refs.len() as i32);

    for (variant, font_id) in &font_refs {
        pdf.type1_font(*font_id)
            .base_font(Name(variant.base_font().as_bytes()))
            .encoding_predefined(Name(b"WinAnsiEncoding"));
    }

    let (width_pt, height_pt) = plan.geometry.size_pt();
    let mut lossy = false;

    for (page, (page_id, content_id)) in plan.pages.iter().zip(&page_refs) {
        let (raw, replaced) = page_content(page, height_pt);
        lossy |= replaced;
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(&raw, COMPRESSION_LEVEL);
        pdf.stream(*content_id, &compressed)
            .filter(Filter::FlateDecode);

        let mut page_writer = pdf.page(*page_id);
        page_writer
            .media_box(Rect::new(0.0, 0.0, width_pt, height_pt))
            .parent(pages_id)
            .contents(*content_id);
        {
            let mut resources = page_writer.resources();
            let mut fonts = resources.fonts();
            for (variant, font_id) in &font_refs {
                fonts.pair(Name(variant.resource_name().as_bytes()), *font_id);
            }
        }
    }

    let producer = format!("{} {}", crate::APP_NAME, env!("CARGO_PKG_VERSION"));
    pdf.document_info(info_id)
        .title(TextStr(title))
        .producer(TextStr(&producer));

    if lossy {
        log::warn!("Some characters have no WinAnsi glyph and were replaced with '?'");
    }

    pdf.finish()
}

/// Uncompressed content stream for one page, plus whether text was replaced
fn page_content(page: &LaidOutPage, height_pt: f32) -> (Vec<u8>, bool) {
    let mut content = Content::new();
    let mut lossy = false;

    for run in &page.runs {
        let (bytes, replaced) = encode_winansi(&run.text);
        lossy |= replaced;
        content
            .begin_text()
            .set_font(
                Name(run.style.variant().resource_name().as_bytes()),
                run.style.size_pt,
            )
            .next_line(run.x * PT_PER_MM, height_pt - run.y * PT_PER_MM)
            .show(Str(&bytes))
            .end_text();
    }

    (content.finish(), lossy)
}
