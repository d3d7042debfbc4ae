//! Mapping characters to glyph identifiers.

use crate::raw::tables::cmap::Cmap4;
use crate::GlyphId;

/// Maps codepoints in the basic multilingual plane to glyph identifiers.
///
/// The map is materialized once from a format 4 subtable so lookups
/// during layout are a plain index. Codepoints the font does not cover
/// map to [`GlyphId::NOTDEF`].
#[derive(Clone, Debug)]
pub struct CharToGlyphMap {
    map: Vec<GlyphId>,
}

impl CharToGlyphMap {
    pub(crate) fn new(subtable: &Cmap4) -> Self {
        let mut map = vec![GlyphId::NOTDEF; 0x10000];
        let segments = subtable.start_code().iter().zip(subtable.end_code());
        for (index, (start, end)) in segments.enumerate() {
            // Loop in u32: the 0xFFFF sentinel segment would otherwise
            // never terminate.
            for codepoint in start.get() as u32..=end.get() as u32 {
                if let Some(gid) = subtable.segment_glyph_id(index, codepoint as u16) {
                    map[codepoint as usize] = gid;
                }
            }
        }
        Self { map }
    }

    /// Returns the glyph identifier for the given character.
    pub fn glyph_for_char(&self, ch: impl Into<u32>) -> GlyphId {
        self.map
            .get(ch.into() as usize)
            .copied()
            .unwrap_or(GlyphId::NOTDEF)
    }

    /// Iterates over all codepoints mapped to a glyph other than notdef,
    /// in ascending codepoint order.
    pub fn mappings(&self) -> impl Iterator<Item = (u32, GlyphId)> + '_ {
        self.map
            .iter()
            .enumerate()
            .filter(|(_, gid)| **gid != GlyphId::NOTDEF)
            .map(|(codepoint, gid)| (codepoint as u32, *gid))
    }
}
