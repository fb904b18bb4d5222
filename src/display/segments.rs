//! # Segment Patterns
//!
//! Maps ASCII characters to 7-segment bit patterns.
//!
//! ## Bit Layout
//!
//! ```text
//!      a            bit 0 = a   bit 4 = e
//!    f   b          bit 1 = b   bit 5 = f
//!      g            bit 2 = c   bit 6 = g
//!    e   c          bit 3 = d   bit 7 = dp (never set)
//!      d
//! ```
//!
//! Only digits, space, `-`, `A`, `C` and `d` have glyphs. Every other
//! character, including bytes outside 7-bit ASCII, maps to 0 (all segments
//! off).

/// Number of entries in the table (7-bit ASCII)
const TABLE_SIZE: usize = 128;

/// Characters with a defined glyph
const GLYPHS: &[(u8, u8)] = &[
    (b'0', 0x3F),
    (b'1', 0x06),
    (b'2', 0x5B),
    (b'3', 0x4F),
    (b'4', 0x66),
    (b'5', 0x6D),
    (b'6', 0x7D),
    (b'7', 0x07),
    (b'8', 0x7F),
    (b'9', 0x6F),
    (b' ', 0x00),
    (b'-', 0x40), // g only
    (b'A', 0x77),
    (b'C', 0x39),
    (b'd', 0x5E),
];

/// Fixed character → segment pattern lookup.
///
/// Built once and shared by reference; lookups never modify it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentTable {
    patterns: [u8; TABLE_SIZE],
}

impl SegmentTable {
    pub fn new() -> Self {
        let mut patterns = [0u8; TABLE_SIZE];
        for &(ch, pattern) in GLYPHS {
            patterns[ch as usize] = pattern;
        }
        Self { patterns }
    }

    /// Pattern for `ch`, or 0 if it has no glyph.
    pub fn pattern(&self, ch: u8) -> u8 {
        self.patterns.get(ch as usize).copied().unwrap_or(0)
    }

}

impl Default for SegmentTable {
    fn default() -> Self {
        Self::new()
    }
}
