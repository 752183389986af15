//! Font: 8-pixel-tall proportional glyphs for printable ASCII.
//!
//! Glyphs are stored column-major, one byte per column, bit 0 at the top.
//! Blank columns on either side of a glyph are trimmed when it is laid out,
//! so `i` is narrower than `W`.

use unicode_segmentation::UnicodeSegmentation;

/// Height of every glyph in pixels.
pub const GLYPH_HEIGHT: usize = 8;

/// Width of a glyph with no lit columns (space).
pub const SPACE_WIDTH: usize = 2;

/// Blank columns after every glyph.
pub const GLYPH_SPACING: usize = 1;

const FIRST: char = ' ';
const LAST: char = '~';

/// Drawn for characters the table does not cover.
static FALLBACK: [u8; 5] = [0x7F, 0x41, 0x41, 0x41, 0x7F];

/// 5x8 glyphs for U+0020..=U+007E.
#[rustfmt::skip]
static GLYPHS: [[u8; 5]; 95] = [
    [0x00, 0x00, 0x00, 0x00, 0x00], // ' '
    [0x00, 0x00, 0x5F, 0x00, 0x00], // '!'
    [0x00, 0x07, 0x00, 0x07, 0x00], // '"'
    [0x14, 0x7F, 0x14, 0x7F, 0x14], // '#'
    [0x24, 0x2A, 0x7F, 0x2A, 0x12], // '$'
    [0x23, 0x13, 0x08, 0x64, 0x62], // '%'
    [0x36, 0x49, 0x56, 0x20, 0x50], // '&'
    [0x00, 0x08, 0x07, 0x03, 0x00], // '\''
    [0x00, 0x1C, 0x22, 0x41, 0x00], // '('
    [0x00, 0x41, 0x22, 0x1C, 0x00], // ')'
    [0x2A, 0x1C, 0x7F, 0x1C, 0x2A], // '*'
    [0x08, 0x08, 0x3E, 0x08, 0x08], // '+'
    [0x00, 0x80, 0x70, 0x30, 0x00], // ','
    [0x08, 0x08, 0x08, 0x08, 0x08], // '-'
    [0x00, 0x00, 0x60, 0x60, 0x00], // '.'
    [0x20, 0x10, 0x08, 0x04, 0x02], // '/'
    [0x3E, 0x51, 0x49, 0x45, 0x3E], // '0'
    [0x00, 0x42, 0x7F, 0x40, 0x00], // '1'
    [0x72, 0x49, 0x49, 0x49, 0x46], // '2'
    [0x21, 0x41, 0x49, 0x4D, 0x33], // '3'
    [0x18, 0x14, 0x12, 0x7F, 0x10], // '4'
    [0x27, 0x45, 0x45, 0x45, 0x39], // '5'
    [0x3C, 0x4A, 0x49, 0x49, 0x31], // '6'
    [0x41, 0x21, 0x11, 0x09, 0x07], // '7'
    [0x36, 0x49, 0x49, 0x49, 0x36], // '8'
    [0x46, 0x49, 0x49, 0x29, 0x1E], // '9'
    [0x00, 0x00, 0x14, 0x00, 0x00], // ':'
    [0x00, 0x40, 0x34, 0x00, 0x00], // ';'
    [0x00, 0x08, 0x14, 0x22, 0x41], // '<'
    [0x14, 0x14, 0x14, 0x14, 0x14], // '='
    [0x00, 0x41, 0x22, 0x14, 0x08], // '>'
    [0x02, 0x01, 0x59, 0x09, 0x06], // '?'
    [0x3E, 0x41, 0x5D, 0x59, 0x4E], // '@'
    [0x7C, 0x12, 0x11, 0x12, 0x7C], // 'A'
    [0x7F, 0x49, 0x49, 0x49, 0x36], // 'B'
    [0x3E, 0x41, 0x41, 0x41, 0x22], // 'C'
    [0x7F, 0x41, 0x41, 0x41, 0x3E], // 'D'
    [0x7F, 0x49, 0x49, 0x49, 0x41], // 'E'
    [0x7F, 0x09, 0x09, 0x09, 0x01], // 'F'
    [0x3E, 0x41, 0x41, 0x51, 0x73], // 'G'
    [0x7F, 0x08, 0x08, 0x08, 0x7F], // 'H'
    [0x00, 0x41, 0x7F, 0x41, 0x00], // 'I'
    [0x20, 0x40, 0x41, 0x3F, 0x01], // 'J'
    [0x7F, 0x08, 0x14, 0x22, 0x41], // 'K'
    [0x7F, 0x40, 0x40, 0x40, 0x40], // 'L'
    [0x7F, 0x02, 0x1C, 0x02, 0x7F], // 'M'
    [0x7F, 0x04, 0x08, 0x10, 0x7F], // 'N'
    [0x3E, 0x41, 0x41, 0x41, 0x3E], // 'O'
    [0x7F, 0x09, 0x09, 0x09, 0x06], // 'P'
    [0x3E, 0x41, 0x51, 0x21, 0x5E], // 'Q'
    [0x7F, 0x09, 0x19, 0x29, 0x46], // 'R'
    [0x26, 0x49, 0x49, 0x49, 0x32], // 'S'
    [0x03, 0x01, 0x7F, 0x01, 0x03], // 'T'
    [0x3F, 0x40, 0x40, 0x40, 0x3F], // 'U'
    [0x1F, 0x20, 0x40, 0x20, 0x1F], // 'V'
    [0x3F, 0x40, 0x38, 0x40, 0x3F], // 'W'
    [0x63, 0x14, 0x08, 0x14, 0x63], // 'X'
    [0x03, 0x04, 0x78, 0x04, 0x03], // 'Y'
    [0x61, 0x59, 0x49, 0x4D, 0x43], // 'Z'
    [0x00, 0x7F, 0x41, 0x41, 0x41], // '['
    [0x02, 0x04, 0x08, 0x10, 0x20], // '\\'
    [0x00, 0x41, 0x41, 0x41, 0x7F], // ']'
    [0x04, 0x02, 0x01, 0x02, 0x04], // '^'
    [0x40, 0x40, 0x40, 0x40, 0x40], // '_'
    [0x00, 0x03, 0x07, 0x08, 0x00], // '`'
    [0x20, 0x54, 0x54, 0x78, 0x40], // 'a'
    [0x7F, 0x28, 0x44, 0x44, 0x38], // 'b'
    [0x38, 0x44, 0x44, 0x44, 0x28], // 'c'
    [0x38, 0x44, 0x44, 0x28, 0x7F], // 'd'
    [0x38, 0x54, 0x54, 0x54, 0x18], // 'e'
    [0x00, 0x08, 0x7E, 0x09, 0x02], // 'f'
    [0x18, 0xA4, 0xA4, 0x9C, 0x78], // 'g'
    [0x7F, 0x08, 0x04, 0x04, 0x78], // 'h'
    [0x00, 0x44, 0x7D, 0x40, 0x00], // 'i'
    [0x20, 0x40, 0x40, 0x3D, 0x00], // 'j'
    [0x7F, 0x10, 0x28, 0x44, 0x00], // 'k'
    [0x00, 0x41, 0x7F, 0x40, 0x00], // 'l'
    [0x7C, 0x04, 0x78, 0x04, 0x78], // 'm'
    [0x7C, 0x08, 0x04, 0x04, 0x78], // 'n'
    [0x38, 0x44, 0x44, 0x44, 0x38], // 'o'
    [0xFC, 0x18, 0x24, 0x24, 0x18], // 'p'
    [0x18, 0x24, 0x24, 0x18, 0xFC], // 'q'
    [0x7C, 0x08, 0x04, 0x04, 0x08], // 'r'
    [0x48, 0x54, 0x54, 0x54, 0x24], // 's'
    [0x04, 0x04, 0x3F, 0x44, 0x24], // 't'
    [0x3C, 0x40, 0x40, 0x20, 0x7C], // 'u'
    [0x1C, 0x20, 0x40, 0x20, 0x1C], // 'v'
    [0x3C, 0x40, 0x30, 0x40, 0x3C], // 'w'
    [0x44, 0x28, 0x10, 0x28, 0x44], // 'x'
    [0x4C, 0x90, 0x90, 0x90, 0x7C], // 'y'
    [0x44, 0x64, 0x54, 0x4C, 0x44], // 'z'
    [0x00, 0x08, 0x36, 0x41, 0x00], // '{'
    [0x00, 0x00, 0x77, 0x00, 0x00], // '|'
    [0x00, 0x41, 0x36, 0x08, 0x00], // '}'
    [0x02, 0x01, 0x02, 0x04, 0x02], // '~'
];

/// Whether `c` has a real glyph (as opposed to the fallback box).
pub const fn has_glyph(c: char) -> bool {
    c >= FIRST && c <= LAST
}

/// Columns of the glyph for `c`, trimmed of blank edges.
///
/// A glyph with no lit columns comes back as [`SPACE_WIDTH`] blank columns.
pub fn glyph(c: char) -> &'static [u8] {
    const BLANK: [u8; SPACE_WIDTH] = [0; SPACE_WIDTH];

    let columns: &'static [u8] = if has_glyph(c) {
        &GLYPHS[c as usize - FIRST as usize]
    } else {
        &FALLBACK
    };

    let Some(start) = columns.iter().position(|&col| col != 0) else {
        return &BLANK;
    };
    // A non-blank column exists, so rposition finds one too.
    let end = columns.iter().rposition(|&col| col != 0).unwrap_or(start);
    &columns[start..=end]
}

/// Glyph for one grapheme cluster: the glyph of its first character.
///
/// Combining marks ride along on the base character.
pub fn grapheme_glyph(grapheme: &str) -> &'static [u8] {
    const NOTHING: &[u8] = &[];
    grapheme.chars().next().map_or(NOTHING, glyph)
}

/// Call `emit` with every column of `text` laid out left to right,
/// including the spacing column after each glyph.
pub fn layout(text: &str, mut emit: impl FnMut(u8)) {
    for grapheme in text.graphemes(true) {
        for &column in grapheme_glyph(grapheme) {
            emit(column);
        }
        for _ in 0..GLYPH_SPACING {
            emit(0);
        }
    }
}

/// Width in pixels of `text` as laid out by [`layout`].
pub fn rendered_width(text: &str) -> usize {
    text.graphemes(true)
        .map(|g| grapheme_glyph(g).len() + GLYPH_SPACING)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_covers_printable_ascii() {
        assert_eq!(GLYPHS.len(), (LAST as usize) - (FIRST as usize) + 1);
        assert!(has_glyph('A'));
        assert!(has_glyph('~'));
        assert!(!has_glyph('\u{7f}'));
        assert!(!has_glyph('é'));
    }

    #[test]
    fn test_proportional_trim() {
        assert_eq!(glyph('i'), &[0x44, 0x7D, 0x40]);
        assert_eq!(glyph('W').len(), 5);
        assert_eq!(glyph('!'), &[0x5F]);
    }

    #[test]
    fn test_space_has_fixed_width() {
        assert_eq!(glyph(' '), &[0, 0]);
        assert_eq!(rendered_width(" "), SPACE_WIDTH + GLYPH_SPACING);
    }

    #[test]
    fn test_unsupported_char_uses_fallback() {
        assert_eq!(glyph('€'), &FALLBACK);
    }

    #[test]
    fn test_combining_mark_uses_base_glyph() {
        // "e" followed by a combining acute accent is one grapheme.
        assert_eq!(rendered_width("e\u{301}"), rendered_width("e"));
    }

    #[test]
    fn test_layout_matches_width() {
        let text = "Hi, World!";
        let mut columns = Vec::new();
        layout(text, |c| columns.push(c));
        assert_eq!(columns.len(), rendered_width(text));
        // "H" is five columns then a blank spacer.
        assert_eq!(&columns[..6], &[0x7F, 0x08, 0x08, 0x08, 0x7F, 0x00]);
    }
}
