//! Complete font binaries assembled from individual tables.
//!
//! The canonical font built by [`test_font`] has four glyphs:
//!
//! - glyph 0: empty
//! - glyph 1, 'A': a triangle of three on-curve points
//! - glyph 2, 'B': a closed contour mixing on and off curve points
//! - glyph 3, 'C': a composite of glyphs 1 and 2

use ttf_types::Tag;

use crate::bebuffer::BeBuffer;
use crate::be_buffer;

pub const UNITS_PER_EM: u16 = 1000;
pub const NUM_GLYPHS: u16 = 4;
pub const ASCENDER: i16 = 800;
pub const DESCENDER: i16 = -200;
pub const LINE_GAP: i16 = 90;
pub const FULL_NAME: &str = "Teikna Test";

/// Assembles a font binary from tables.
///
/// The table directory is sorted, table checksums are computed, and the
/// checksum adjustment in the head table (if present) is patched.
#[derive(Default)]
pub struct FontBuilder {
    tables: Vec<(Tag, Vec<u8>)>,
}

impl FontBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Add a table. Tables may be added in any order.
    pub fn add(mut self, tag: &[u8; 4], data: &[u8]) -> Self {
        self.tables.push((Tag::new(tag), data.to_vec()));
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        self.tables.sort_by_key(|(tag, _)| *tag);
        let num_tables = self.tables.len() as u16;
        let entry_selector = num_tables.ilog2() as u16;
        let search_range = (1 << entry_selector) * 16;
        let range_shift = num_tables * 16 - search_range;

        let mut directory = BeBuffer::new()
            .push(0x00010000u32)
            .push(num_tables)
            .push(search_range)
            .push(entry_selector)
            .push(range_shift);
        let mut offset = (12 + 16 * self.tables.len()) as u32;
        let mut head_offset = None;
        for (tag, table) in &self.tables {
            if *tag == Tag::new(b"head") {
                head_offset = Some(offset as usize);
            }
            directory = directory
                .push(*tag)
                .push(checksum(table))
                .push(offset)
                .push(table.len() as u32);
            offset += padded(table.len()) as u32;
        }

        let mut font = directory.to_vec();
        for (_, table) in &self.tables {
            font.extend_from_slice(table);
            font.resize(padded(font.len()), 0);
        }

        if let Some(pos) = head_offset {
            let adjustment = 0xB1B0AFBAu32.wrapping_sub(checksum(&font));
            font[pos + 8..pos + 12].copy_from_slice(&adjustment.to_be_bytes());
        }
        font
    }
}

fn padded(len: usize) -> usize {
    (len + 3) & !3
}

fn checksum(data: &[u8]) -> u32 {
    let mut sum = 0u32;
    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        sum = sum.wrapping_add(u32::from_be_bytes(chunk.try_into().unwrap()));
    }
    let mut tail = [0u8; 4];
    tail[..chunks.remainder().len()].copy_from_slice(chunks.remainder());
    sum.wrapping_add(u32::from_be_bytes(tail))
}

pub fn head() -> BeBuffer {
    be_buffer! {
        0x00010000u32,  // version
        0x00010000u32,  // font revision
        0u32,           // checksum adjustment, patched by the builder
        0x5F0F3CF5u32,  // magic number
        0x0003u16,      // flags
        UNITS_PER_EM,
        3650000000i64,  // created
        3650000000i64,  // modified
        50i16,          // x min
        0i16,           // y min
        800i16,         // x max
        400i16,         // y max
        0u16,           // mac style
        9u16,           // lowest rec ppem
        2i16,           // font direction hint
        0i16,           // index to loc format: short
        0i16            // glyph data format
    }
}

pub fn maxp() -> BeBuffer {
    be_buffer! {
        0x00010000u32,  // version
        NUM_GLYPHS,
        4u16,   // max points
        1u16,   // max contours
        7u16,   // max composite points
        2u16,   // max composite contours
        2u16,   // max zones
        0u16,   // max twilight points
        0u16,   // max storage
        0u16,   // max function defs
        0u16,   // max instruction defs
        0u16,   // max stack elements
        0u16,   // max size of instructions
        2u16,   // max component elements
        1u16    // max component depth
    }
}

pub fn hhea() -> BeBuffer {
    be_buffer! {
        0x00010000u32,  // version
        ASCENDER,
        DESCENDER,
        LINE_GAP,
        600u16,     // advance width max
        0i16,       // min left side bearing
        50i16,      // min right side bearing
        780i16,     // x max extent
        1i16,       // caret slope rise
        0i16,       // caret slope run
        0i16,       // caret offset
        [0i16, 0, 0, 0],    // reserved
        0i16,       // metric data format
        3u16        // number of h metrics
    }
}

pub fn hmtx() -> BeBuffer {
    be_buffer! {
        [500u16, 0],    // glyph 0: advance, lsb
        [600u16, 50],   // glyph 1
        [550u16, 40],   // glyph 2
        30u16           // glyph 3: bare lsb, advance comes from glyph 2
    }
}

/// A format 4 cmap mapping 'A'..='C' to glyphs 1..=3.
pub fn cmap() -> BeBuffer {
    be_buffer! {
        0u16,   // version
        1u16,   // num tables
        [3u16, 1],  // windows platform, unicode bmp encoding
        12u32,      // subtable offset

        4u16,   // format
        32u16,  // length
        0u16,   // language
        4u16,   // seg count x2
        4u16,   // search range
        1u16,   // entry selector
        0u16,   // range shift
        [0x43u16, 0xFFFF],  // end codes
        0u16,               // reserved pad
        [0x41u16, 0xFFFF],  // start codes
        [-64i16, 1],        // id deltas
        [0u16, 0]           // id range offsets
    }
}

/// Short offsets for the four glyphs of [`glyf`], with the end sentinel.
pub fn loca() -> BeBuffer {
    be_buffer! {
        [0u16, 0, 12, 24, 36]
    }
}

pub fn glyf() -> BeBuffer {
    be_buffer! {
        // glyph 1: triangle (50, 0), (450, 0), (250, 400)
        1i16,   // number of contours
        50i16,  // x min
        0i16,   // y min
        450i16, // x max
        400i16, // y max
        [2u16], // end pts of contours
        0u16,   // instruction length
        0x33u8, // on curve, short positive x, y unchanged
        0x21u8, // on curve, word x, y unchanged
        0x01u8, // on curve, word x and y
        50u8,   // x deltas
        [400i16, -200],
        400i16, // y delta

        // glyph 2: contour (100, 0) on, (100, 300) off, (300, 300) on,
        // (300, 0) off
        1i16,   // number of contours
        100i16, // x min
        0i16,   // y min
        300i16, // x max
        300i16, // y max
        [3u16], // end pts of contours
        0u16,   // instruction length
        0x33u8, // on curve, short positive x, y unchanged
        0x10u8, // off curve, x unchanged, word y
        0x33u8, // on curve, short positive x, y unchanged
        0x10u8, // off curve, x unchanged, word y
        [100u8, 200],   // x deltas
        [300i16, -300], // y deltas

        // glyph 3: composite of glyphs 1 and 2
        -1i16,  // number of contours
        50i16,  // x min
        0i16,   // y min
        800i16, // x max
        400i16, // y max
        0x0022u16,  // xy args, more components
        1u16,       // glyph id
        [0u8, 0],   // byte offsets
        0x0003u16,  // word xy args
        2u16,       // glyph id
        500i16,     // x offset
        0i16        // y offset
    }
}

/// A kern table with the horizontal pairs (1, 2) -50 and (2, 3) 30.
pub fn kern() -> BeBuffer {
    be_buffer! {
        0u16,   // version
        1u16,   // n tables
        0u16,       // subtable version
        26u16,      // length
        0x0001u16,  // coverage: horizontal, format 0
        2u16,       // n pairs
        12u16,      // search range
        1u16,       // entry selector
        0u16,       // range shift
        [1u16, 2],  // pair: left, right
        -50i16,     //       value
        [2u16, 3],
        30i16
    }
}

/// A name table with a family name and a full name.
pub fn name() -> BeBuffer {
    be_buffer! {
        0u16,   // version
        2u16,   // count
        30u16,  // storage offset
        [3u16, 1],  // family name record: platform, encoding
        0x409u16,   // language
        1u16,       // name id
        12u16,      // length
        0u16,       // string offset
        [3u16, 1],  // full name record
        0x409u16,   // language
        4u16,       // name id
        22u16,      // length
        12u16,      // string offset
        // "Teikna" in UTF-16BE
        [0x0054u16, 0x0065, 0x0069, 0x006B, 0x006E, 0x0061],
        // "Teikna Test" in UTF-16BE
        [0x0054u16, 0x0065, 0x0069, 0x006B, 0x006E, 0x0061, 0x0020, 0x0054, 0x0065, 0x0073, 0x0074]
    }
}

/// A complete font with outlines, metrics, kerning, a character map and
/// names.
pub fn test_font() -> Vec<u8> {
    FontBuilder::new()
        .add(b"head", &head())
        .add(b"maxp", &maxp())
        .add(b"hhea", &hhea())
        .add(b"hmtx", &hmtx())
        .add(b"cmap", &cmap())
        .add(b"loca", &loca())
        .add(b"glyf", &glyf())
        .add(b"kern", &kern())
        .add(b"name", &name())
        .build()
}

/// Same as [`test_font`], but with no character map.
pub fn font_without_cmap() -> Vec<u8> {
    FontBuilder::new()
        .add(b"head", &head())
        .add(b"maxp", &maxp())
        .add(b"hhea", &hhea())
        .add(b"hmtx", &hmtx())
        .add(b"loca", &loca())
        .add(b"glyf", &glyf())
        .build()
}

/// Same as [`test_font`], but loca is missing its end sentinel, so the
/// composite glyph has no resolvable range.
pub fn font_with_short_loca() -> Vec<u8> {
    let loca = be_buffer! {
        [0u16, 0, 12, 24]
    };
    FontBuilder::new()
        .add(b"head", &head())
        .add(b"maxp", &maxp())
        .add(b"hhea", &hhea())
        .add(b"hmtx", &hmtx())
        .add(b"cmap", &cmap())
        .add(b"loca", &loca)
        .add(b"glyf", &glyf())
        .build()
}

/// Same as [`test_font`], but glyph 3's start offset equals the end
/// sentinel, marking it unusable. Glyph 2's range swallows the leftover
/// composite bytes as trailing junk.
pub fn font_with_sentinel_loca() -> Vec<u8> {
    let loca = be_buffer! {
        [0u16, 0, 12, 36, 36]
    };
    FontBuilder::new()
        .add(b"head", &head())
        .add(b"maxp", &maxp())
        .add(b"hhea", &hhea())
        .add(b"hmtx", &hmtx())
        .add(b"cmap", &cmap())
        .add(b"loca", &loca)
        .add(b"glyf", &glyf())
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_layout() {
        let font = test_font();
        assert_eq!(&font[..4], &[0x00, 0x01, 0x00, 0x00]);
        assert_eq!(u16::from_be_bytes([font[4], font[5]]), 9);
        // tags are sorted
        let tags = (0..9)
            .map(|i| {
                let rec = 12 + i * 16;
                Tag::new(&font[rec..rec + 4].try_into().unwrap())
            })
            .collect::<Vec<_>>();
        let mut sorted = tags.clone();
        sorted.sort();
        assert_eq!(tags, sorted);
    }

    #[test]
    fn tables_are_padded() {
        let font = test_font();
        for i in 0..9 {
            let rec = 12 + i * 16;
            let offset = u32::from_be_bytes(font[rec + 8..rec + 12].try_into().unwrap());
            assert_eq!(offset % 4, 0);
        }
    }

    #[test]
    fn whole_font_checksum() {
        // with the adjustment patched in, the font sums to the magic value
        let font = test_font();
        assert_eq!(checksum(&font), 0xB1B0AFBA);
    }

    #[test]
    fn checksum_tail_padding() {
        assert_eq!(checksum(&[0, 0, 0, 1, 0, 0, 0, 1]), 2);
        assert_eq!(checksum(&[0x80, 0x00, 0x00, 0x00, 0x80, 0x00, 0x00, 0x00]), 0);
        assert_eq!(checksum(&[1]), 0x01000000);
    }
}
