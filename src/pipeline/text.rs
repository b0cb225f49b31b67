//! Text helpers: truncation, WinAnsi encoding and Helvetica metrics.
//!
//! Labels are drawn with the PDF standard 14 fonts (Helvetica and
//! Helvetica-Bold), so nothing is embedded and every viewer has them. The
//! price for that is the single-byte WinAnsi encoding: Latin-1 text such as
//! "Código" or "Açúcar" prints correctly, anything outside cp1252 is shown
//! as `?`.

use tracing::warn;

/// The two faces used by the layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontFace {
    Regular,
    Bold,
}

impl FontFace {
    /// PostScript name of the standard font.
    pub fn base_font(&self) -> &'static str {
        match self {
            FontFace::Regular => "Helvetica",
            FontFace::Bold => "Helvetica-Bold",
        }
    }
}

/// First `max` characters of `s` (Unicode scalar values, not bytes).
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Encode `s` for a Type 1 font using `WinAnsiEncoding`.
///
/// Control characters become spaces; characters cp1252 cannot represent
/// become `?`.
pub fn encode_winansi(s: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(s.len());
    let mut replaced = 0usize;
    for ch in s.chars() {
        match winansi_byte(ch) {
            Some(b) => out.push(b),
            None if ch.is_control() => out.push(b' '),
            None => {
                replaced += 1;
                out.push(b'?');
            }
        }
    }
    if replaced > 0 {
        warn!("{} character(s) not representable in WinAnsi: {:?}", replaced, s);
    }
    out
}

fn winansi_byte(ch: char) -> Option<u8> {
    let cp = ch as u32;
    match cp {
        0x20..=0x7E | 0xA0..=0xFF => Some(cp as u8),
        _ => match ch {
            '€' => Some(0x80),
            '‚' => Some(0x82),
            'ƒ' => Some(0x83),
            '„' => Some(0x84),
            '…' => Some(0x85),
            '†' => Some(0x86),
            '‡' => Some(0x87),
            'ˆ' => Some(0x88),
            '‰' => Some(0x89),
            'Š' => Some(0x8A),
            '‹' => Some(0x8B),
            'Œ' => Some(0x8C),
            'Ž' => Some(0x8E),
            '‘' => Some(0x91),
            '’' => Some(0x92),
            '“' => Some(0x93),
            '”' => Some(0x94),
            '•' => Some(0x95),
            '–' => Some(0x96),
            '—' => Some(0x97),
            '˜' => Some(0x98),
            '™' => Some(0x99),
            'š' => Some(0x9A),
            '›' => Some(0x9B),
            'œ' => Some(0x9C),
            'ž' => Some(0x9E),
            'Ÿ' => Some(0x9F),
            _ => None,
        },
    }
}

// Advance widths (1/1000 em) for U+0020..=U+007E, from the Adobe AFM files.
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

/// Width used for characters outside printable ASCII.
const FALLBACK_WIDTH: u16 = 556;

fn char_width(face: FontFace, ch: char) -> u16 {
    let table = match face {
        FontFace::Regular => &HELVETICA_WIDTHS,
        FontFace::Bold => &HELVETICA_BOLD_WIDTHS,
    };
    let cp = ch as u32;
    if (0x20..=0x7E).contains(&cp) {
        table[(cp - 0x20) as usize]
    } else {
        FALLBACK_WIDTH
    }
}

/// Width of `s` in points when set in `face` at `size`.
pub fn text_width(s: &str, face: FontFace, size: f32) -> f32 {
    let units: u32 = s.chars().map(|c| char_width(face, c) as u32).sum();
    units as f32 * size / 1000.0
}

/// Greedy word wrap to `max_width` points. Words wider than a whole line
/// are broken between characters.
pub fn wrap_text(s: &str, face: FontFace, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    if max_width <= 0.0 {
        return lines;
    }
    let mut current = String::new();

    for word in s.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width(&candidate, face, size) <= max_width {
            current = candidate;
            continue;
        }
        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if text_width(word, face, size) <= max_width {
            current = word.to_string();
            continue;
        }
        for ch in word.chars() {
            current.push(ch);
            if text_width(&current, face, size) > max_width && current.chars().count() > 1 {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(ch);
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
