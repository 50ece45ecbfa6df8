//! Built-in Helvetica metrics and WinAnsi text encoding
//!
//! The document uses the PDF standard Helvetica family, so nothing is
//! embedded. Widths come from the Adobe AFM files, in 1/1000 em.

use crate::config::PT_PER_MM;

/// Weight of a font variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontWeight {
    Normal,
    Bold,
}

/// Slant of a font variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontSlant {
    Normal,
    Italic,
}

/// One of the four Helvetica variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontVariant {
    Regular,
    Bold,
    Oblique,
    BoldOblique,
}

impl FontVariant {
    /// All variants, in resource order
    pub const ALL: [FontVariant; 4] = [
        FontVariant::Regular,
        FontVariant::Bold,
        FontVariant::Oblique,
        FontVariant::BoldOblique,
    ];

    pub fn from_style(weight: FontWeight, slant: FontSlant) -> Self {
        match (weight, slant) {
            (FontWeight::Normal, FontSlant::Normal) => FontVariant::Regular,
            (FontWeight::Bold, FontSlant::Normal) => FontVariant::Bold,
            (FontWeight::Normal, FontSlant::Italic) => FontVariant::Oblique,
            (FontWeight::Bold, FontSlant::Italic) => FontVariant::BoldOblique,
        }
    }

    /// PostScript name of the standard font
    pub fn base_font(&self) -> &'static str {
        match self {
            FontVariant::Regular => "Helvetica",
            FontVariant::Bold => "Helvetica-Bold",
            FontVariant::Oblique => "Helvetica-Oblique",
            FontVariant::BoldOblique => "Helvetica-BoldOblique",
        }
    }

    /// Name of the font in each page's resource dictionary
    pub fn resource_name(&self) -> &'static str {
        match self {
            FontVariant::Regular => "F1",
            FontVariant::Bold => "F2",
            FontVariant::Oblique => "F3",
            FontVariant::BoldOblique => "F4",
        }
    }

    fn is_bold(&self) -> bool {
        matches!(self, FontVariant::Bold | FontVariant::BoldOblique)
    }
}

// Printable ASCII 0x20..=0x7E. Oblique variants share the upright widths.
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Width used for characters outside printable ASCII
const FALLBACK_WIDTH: u16 = 556;

/// Advance width of a character in 1/1000 em
pub fn glyph_width(variant: FontVariant, ch: char) -> u16 {
    let table = if variant.is_bold() {
        &HELVETICA_BOLD_WIDTHS
    } else {
        &HELVETICA_WIDTHS
    };
    match ch {
        // Drawn as a space by `encode_winansi`
        '\t' => table[0],
        ' '..='~' => table[ch as usize - 0x20],
        '\u{2022}' => 350,
        '\u{2013}' => 556,
        '\u{2014}' => 1000,
        '\u{2026}' => 1000,
        '\u{a0}' => 278,
        _ => FALLBACK_WIDTH,
    }
}

/// Width of a string in millimetres at the given point size
pub fn text_width_mm(text: &str, variant: FontVariant, size_pt: f32) -> f32 {
    let units: u32 = text.chars().map(|ch| u32::from(glyph_width(variant, ch))).sum();
    units as f32 / 1000.0 * size_pt / PT_PER_MM
}

/// Encode text as WinAnsi (Windows-1252) bytes
///
/// Returns the bytes and whether any character had to be replaced with `?`.
pub fn encode_winansi(text: &str) -> (Vec<u8>, bool) {
    let mut lossy = false;
    let bytes = text
        .chars()
        .map(|ch| {
            winansi_byte(ch).unwrap_or_else(|| {
                lossy = true;
                b'?'
            })
        })
        .collect();
    (bytes, lossy)
}

fn winansi_byte(ch: char) -> Option<u8> {
    let byte = match ch {
        '\t' => b' ',
        ' '..='~' => ch as u8,
        '\u{a0}'..='\u{ff}' => ch as u32 as u8,
        '\u{20ac}' => 0x80,
        '\u{201a}' => 0x82,
        '\u{0192}' => 0x83,
        '\u{201e}' => 0x84,
        '\u{2026}' => 0x85,
        '\u{2020}' => 0x86,
        '\u{2021}' => 0x87,
        '\u{02c6}' => 0x88,
        '\u{2030}' => 0x89,
        '\u{0160}' => 0x8a,
        '\u{2039}' => 0x8b,
        '\u{0152}' => 0x8c,
        '\u{017d}' => 0x8e,
        '\u{2018}' => 0x91,
        '\u{2019}' => 0x92,
        '\u{201c}' => 0x93,
        '\u{201d}' => 0x94,
        '\u{2022}' => 0x95,
        '\u{2013}' => 0x96,
        '\u{2014}' => 0x97,
        '\u{02dc}' => 0x98,
        '\u{2122}' => 0x99,
        '\u{0161}' => 0x9a,
        '\u{203a}' => 0x9b,
        '\u{0153}' => 0x9c,
        '\u{017e}' => 0x9e,
        '\u{0178}' => 0x9f,
        _ => return None,
    };
    Some(byte)
}
