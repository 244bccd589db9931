/// Minimal 4x5 bitmap font for control labels and the logo. Each glyph is 4
/// pixels wide, 5 rows tall. Bits are MSB-left within each u8 (only top 4 bits used).
const GLYPHS: &[(&[u8; 5], u8)] = &[
    (&[0x60, 0x90, 0xF0, 0x90, 0x90], b'A'),
    (&[0xE0, 0x90, 0xE0, 0x90, 0xE0], b'B'),
    (&[0x70, 0x80, 0x80, 0x80, 0x70], b'C'),
    (&[0xE0, 0x90, 0x90, 0x90, 0xE0], b'D'),
    (&[0xF0, 0x80, 0xE0, 0x80, 0xF0], b'E'),
    (&[0x80, 0x80, 0x80, 0x80, 0xF0], b'L'),
    (&[0x60, 0x90, 0x90, 0x90, 0x60], b'O'),
    (&[0xE0, 0x90, 0xE0, 0x80, 0x80], b'P'),
    (&[0xE0, 0x90, 0xE0, 0xA0, 0x90], b'R'),
    (&[0x70, 0x80, 0x60, 0x10, 0xE0], b'S'),
    (&[0xE0, 0x40, 0x40, 0x40, 0x40], b'T'),
    (&[0x90, 0x90, 0xF0, 0xF0, 0x90], b'W'),
    (&[0x90, 0x90, 0x60, 0x40, 0x40], b'Y'),
    (&[0xF0, 0x10, 0x60, 0x80, 0xF0], b'Z'),
];

pub const GLYPH_W: usize = 4;
pub const GLYPH_H: usize = 5;

const BLANK: [u8; 5] = [0x00; 5];

fn glyph_for(ch: u8) -> &'static [u8; 5] {
    GLYPHS
        .iter()
        .find(|&&(_, c)| c == ch.to_ascii_uppercase())
        .map_or(&BLANK, |&(data, _)| data)
}

/// Width in font pixels of `text`, with one pixel between glyphs.
pub fn text_width(text: &str) -> usize {
    let n = text.len();
    if n == 0 { 0 } else { n * (GLYPH_W + 1) - 1 }
}

/// Lit font pixels of `text` as (x, y), origin at the top-left of the first glyph.
pub fn text_pixels(text: &str) -> Vec<(usize, usize)> {
    let mut lit = Vec::new();
    for (ci, ch) in text.bytes().enumerate() {
        let glyph = glyph_for(ch);
        let gx = ci * (GLYPH_W + 1);
        for (row, &bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_W {
                if bits & (0x80 >> col) != 0 {
                    lit.push((gx + col, row));
                }
            }
        }
    }
    lit
}
