//! Glyph metrics and encoding for the standard 14 Helvetica faces.
//!
//! Widths come from the Adobe Core 14 AFM files, in 1/1000 em. Only the
//! characters WinAnsiEncoding can represent are listed; printpdf encodes
//! built-in font text as WinAnsi, so anything else is drawn as `?`.

/// Built-in font face used for a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Regular,
    Bold,
}

/// Helvetica, U+0020..=U+007E.
const HELVETICA_ASCII: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

/// Helvetica-Bold, U+0020..=U+007E.
const HELVETICA_BOLD_ASCII: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0..?
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // P.._
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // `..o
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // p..~
];

/// Helvetica, U+00A0..=U+00FF.
const HELVETICA_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333, // nbsp..¯
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611, // °..¿
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // À..Ï
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // Ð..ß
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278, // à..ï
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500, // ð..ÿ
];

/// Helvetica-Bold, U+00A0..=U+00FF.
const HELVETICA_BOLD_LATIN1: [u16; 96] = [
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333, // nbsp..¯
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611, // °..¿
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278, // À..Ï
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611, // Ð..ß
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278, // à..ï
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556, // ð..ÿ
];

/// Characters WinAnsi places at 0x80..=0x9F, with (regular, bold) widths.
const WIN_ANSI_EXTRAS: [(char, u16, u16); 27] = [
    ('\u{20AC}', 556, 556),  // €
    ('\u{201A}', 222, 278),  // ‚
    ('\u{0192}', 556, 556),  // ƒ
    ('\u{201E}', 333, 500),  // „
    ('\u{2026}', 1000, 1000), // …
    ('\u{2020}', 556, 556),  // †
    ('\u{2021}', 556, 556),  // ‡
    ('\u{02C6}', 333, 333),  // ˆ
    ('\u{2030}', 1000, 1000), // ‰
    ('\u{0160}', 667, 667),  // Š
    ('\u{2039}', 333, 333),  // ‹
    ('\u{0152}', 1000, 1000), // Œ
    ('\u{017D}', 611, 611),  // Ž
    ('\u{2018}', 222, 278),  // ‘
    ('\u{2019}', 222, 278),  // ’
    ('\u{201C}', 333, 500),  // “
    ('\u{201D}', 333, 500),  // ”
    ('\u{2022}', 350, 350),  // •
    ('\u{2013}', 556, 556),  // –
    ('\u{2014}', 1000, 1000), // —
    ('\u{02DC}', 333, 333),  // ˜
    ('\u{2122}', 1000, 1000), // ™
    ('\u{0161}', 500, 556),  // š
    ('\u{203A}', 333, 333),  // ›
    ('\u{0153}', 944, 944),  // œ
    ('\u{017E}', 500, 500),  // ž
    ('\u{0178}', 667, 667),  // Ÿ
];

const REPLACEMENT: char = '?';

/// Advance width of `c` in 1/1000 em, or `None` if WinAnsi cannot encode it.
#[must_use]
pub fn char_width(c: char, face: Face) -> Option<u16> {
    let code = u32::from(c);
    let (ascii, latin1) = match face {
        Face::Regular => (&HELVETICA_ASCII, &HELVETICA_LATIN1),
        Face::Bold => (&HELVETICA_BOLD_ASCII, &HELVETICA_BOLD_LATIN1),
    };

    match code {
        0x20..=0x7E => Some(ascii[(code - 0x20) as usize]),
        0xA0..=0xFF => Some(latin1[(code - 0xA0) as usize]),
        _ => WIN_ANSI_EXTRAS
            .iter()
            .find(|(extra, _, _)| *extra == c)
            .map(|&(_, regular, bold)| match face {
                Face::Regular => regular,
                Face::Bold => bold,
            }),
    }
}

/// Whether the built-in fonts can draw `c`.
#[must_use]
pub fn is_encodable(c: char) -> bool {
    char_width(c, Face::Regular).is_some()
}

/// Replace every character WinAnsi cannot encode with `?`.
#[must_use]
pub fn encodable_text(text: &str) -> String {
    text.chars()
        .map(|c| if is_encodable(c) { c } else { REPLACEMENT })
        .collect()
}

/// Advance of `c` in 1/1000 em as drawn: characters that cannot be encoded
/// measure as the `?` that replaces them.
#[must_use]
pub fn advance(c: char, face: Face) -> u32 {
    char_width(c, face)
        .or_else(|| char_width(REPLACEMENT, face))
        .map_or(0, u32::from)
}

/// Width of `text` in 1/1000 em.
#[must_use]
pub fn text_units(text: &str, face: Face) -> u32 {
    text.chars().map(|c| advance(c, face)).sum()
}

/// Width of `text` in points at `size`.
#[must_use]
pub fn text_width(text: &str, face: Face, size: f32) -> f32 {
    text_units(text, face) as f32 * size / 1000.0
}
