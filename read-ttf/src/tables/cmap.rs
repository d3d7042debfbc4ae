//! The [cmap (Character to Glyph Index Mapping)][cmap] table
//!
//! [cmap]: https://docs.microsoft.com/en-us/typography/opentype/spec/cmap

use std::ops::Range;

use crate::{table_provider::TopLevelTable, FontData, FontRead, ReadError};
use types::{BigEndian, FixedSize, GlyphId, Tag};

const WINDOWS_PLATFORM: u16 = 3;
const UNICODE_BMP_ENCODING: u16 = 1;

/// The [cmap] table.
///
/// [cmap]: https://docs.microsoft.com/en-us/typography/opentype/spec/cmap
#[derive(Clone)]
pub struct Cmap<'a> {
    version: u16,
    encoding_records: &'a [EncodingRecord],
    data: FontData<'a>,
}

/// Identifies a particular encoding and the offset of its subtable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C)]
pub struct EncodingRecord {
    /// Platform identifier.
    pub platform_id: BigEndian<u16>,
    /// Platform specific encoding identifier.
    pub encoding_id: BigEndian<u16>,
    /// Offset of the subtable from the beginning of the table.
    pub subtable_offset: BigEndian<u32>,
}

impl EncodingRecord {
    pub fn platform_id(&self) -> u16 {
        self.platform_id.get()
    }

    pub fn encoding_id(&self) -> u16 {
        self.encoding_id.get()
    }

    pub fn subtable_offset(&self) -> u32 {
        self.subtable_offset.get()
    }
}

impl FixedSize for EncodingRecord {
    const RAW_BYTE_LEN: usize = u16::RAW_BYTE_LEN + u16::RAW_BYTE_LEN + u32::RAW_BYTE_LEN;
}

impl TopLevelTable for Cmap<'_> {
    const TAG: Tag = Tag::new(b"cmap");
}

impl<'a> FontRead<'a> for Cmap<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version = cursor.read()?;
        let num_tables: u16 = cursor.read()?;
        let encoding_records = cursor.read_array(num_tables as usize)?;
        Ok(Cmap {
            version,
            encoding_records,
            data,
        })
    }
}

impl<'a> Cmap<'a> {
    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn encoding_records(&self) -> &'a [EncodingRecord] {
        self.encoding_records
    }

    /// Returns the format 4 subtable for the Windows Unicode BMP encoding.
    ///
    /// Only the (platform 3, encoding 1) record is considered, and only
    /// when its subtable has format 4.
    pub fn unicode_bmp(&self) -> Option<Cmap4<'a>> {
        let record = self.encoding_records.iter().find(|record| {
            record.platform_id() == WINDOWS_PLATFORM
                && record.encoding_id() == UNICODE_BMP_ENCODING
        })?;
        let data = self.data.split_off(record.subtable_offset() as usize)?;
        Cmap4::read(data).ok()
    }

    /// Map a codepoint to a nominal glyph identifier.
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        self.unicode_bmp()?.map_codepoint(codepoint)
    }
}

/// A [format 4](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-4-segment-mapping-to-delta-values)
/// subtable: segment mapping to delta values.
#[derive(Clone)]
pub struct Cmap4<'a> {
    length: u16,
    language: u16,
    seg_count_x2: u16,
    end_code: &'a [BigEndian<u16>],
    start_code: &'a [BigEndian<u16>],
    id_delta: &'a [BigEndian<i16>],
    id_range_offsets: &'a [BigEndian<u16>],
    glyph_id_array: &'a [BigEndian<u16>],
}

impl<'a> FontRead<'a> for Cmap4<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let format: u16 = cursor.read()?;
        if format != 4 {
            return Err(ReadError::InvalidFormat(format as i64));
        }
        let length = cursor.read()?;
        let language = cursor.read()?;
        let seg_count_x2: u16 = cursor.read()?;
        let seg_count = seg_count_x2 as usize / 2;
        // search range, entry selector and range shift are derivable
        cursor.advance_by(3 * u16::RAW_BYTE_LEN);
        let end_code = cursor.read_array(seg_count)?;
        // reserved padding
        cursor.advance::<u16>();
        let start_code = cursor.read_array(seg_count)?;
        let id_delta = cursor.read_array(seg_count)?;
        let id_range_offsets = cursor.read_array(seg_count)?;
        let glyph_id_array = cursor.read_array(cursor.remaining_bytes() / u16::RAW_BYTE_LEN)?;
        Ok(Cmap4 {
            length,
            language,
            seg_count_x2,
            end_code,
            start_code,
            id_delta,
            id_range_offsets,
            glyph_id_array,
        })
    }
}

impl<'a> Cmap4<'a> {
    pub fn length(&self) -> u16 {
        self.length
    }

    pub fn language(&self) -> u16 {
        self.language
    }

    /// Twice the number of segments.
    pub fn seg_count_x2(&self) -> u16 {
        self.seg_count_x2
    }

    /// End codepoint for each segment, in increasing order. The last
    /// segment ends at 0xFFFF.
    pub fn end_code(&self) -> &'a [BigEndian<u16>] {
        self.end_code
    }

    /// Start codepoint for each segment.
    pub fn start_code(&self) -> &'a [BigEndian<u16>] {
        self.start_code
    }

    /// Delta added to codepoints in segments that map arithmetically.
    pub fn id_delta(&self) -> &'a [BigEndian<i16>] {
        self.id_delta
    }

    /// For each segment, 0 for delta mapping or a byte offset into
    /// [glyph_id_array](Self::glyph_id_array).
    pub fn id_range_offsets(&self) -> &'a [BigEndian<u16>] {
        self.id_range_offsets
    }

    pub fn glyph_id_array(&self) -> &'a [BigEndian<u16>] {
        self.glyph_id_array
    }

    /// Maps a codepoint to a nominal glyph identifier.
    ///
    /// Returns `None` when the codepoint is not covered by any segment.
    /// A covered codepoint whose stored glyph is zero maps to
    /// [`GlyphId::NOTDEF`].
    pub fn map_codepoint(&self, codepoint: impl Into<u32>) -> Option<GlyphId> {
        let codepoint = codepoint.into();
        if codepoint > 0xFFFF {
            return None;
        }
        let codepoint = codepoint as u16;
        let mut lo = 0;
        let mut hi = self.seg_count_x2 as usize / 2;
        while lo < hi {
            let i = (lo + hi) / 2;
            let start_code = self.start_code.get(i)?.get();
            if codepoint < start_code {
                hi = i;
            } else if codepoint > self.end_code.get(i)?.get() {
                lo = i + 1;
            } else {
                return self.lookup_glyph_id(codepoint, i, start_code);
            }
        }
        None
    }

    /// Does the final phase of glyph id lookup.
    ///
    /// A glyph id array entry of zero stays zero: the delta is only added
    /// to entries that name a real glyph.
    fn lookup_glyph_id(&self, codepoint: u16, index: usize, start_code: u16) -> Option<GlyphId> {
        let delta = self.id_delta.get(index)?.get() as i32;
        let range_offset = self.id_range_offsets.get(index)?.get() as usize;
        if range_offset == 0 {
            return Some(GlyphId::new((codepoint as i32 + delta) as u16));
        }
        // The offset is in bytes, relative to the location of the range
        // offset entry itself.
        let mut offset = range_offset / 2 + (codepoint - start_code) as usize;
        offset = offset.saturating_sub(self.id_range_offsets.len() - index);
        let gid = self.glyph_id_array.get(offset)?.get();
        if gid == 0 {
            return Some(GlyphId::NOTDEF);
        }
        Some(GlyphId::new((gid as i32 + delta) as u16))
    }

    /// Maps a codepoint through the segment at the given index.
    ///
    /// The caller is responsible for picking a segment that covers the
    /// codepoint. Useful for consumers that walk segments in file order
    /// rather than searching.
    pub fn segment_glyph_id(&self, index: usize, codepoint: u16) -> Option<GlyphId> {
        let start_code = self.start_code.get(index)?.get();
        self.lookup_glyph_id(codepoint, index, start_code)
    }

    /// Returns an iterator over all (codepoint, glyph identifier) pairs
    /// covered by the subtable.
    ///
    /// Codepoints that a segment covers but maps to zero are yielded with
    /// [`GlyphId::NOTDEF`]; only codepoints whose array references fall
    /// outside the subtable are skipped.
    pub fn iter(&self) -> Cmap4Iter<'a> {
        Cmap4Iter::new(self.clone())
    }

    /// The codepoints covered by the segment at the given index, as a
    /// non-inclusive range.
    fn code_range(&self, index: usize) -> Option<Range<u32>> {
        let start = self.start_code.get(index)?.get() as u32;
        let end = self.end_code.get(index)?.get() as u32;
        Some(start..end + 1)
    }
}

/// An iterator over the codepoints and glyph identifiers of a format 4
/// subtable.
#[derive(Clone)]
pub struct Cmap4Iter<'a> {
    subtable: Cmap4<'a>,
    cur_range: Range<u32>,
    cur_start_code: u16,
    cur_range_ix: usize,
}

impl<'a> Cmap4Iter<'a> {
    fn new(subtable: Cmap4<'a>) -> Self {
        let cur_range = subtable.code_range(0).unwrap_or_default();
        let cur_start_code = cur_range.start as u16;
        Self {
            subtable,
            cur_range,
            cur_start_code,
            cur_range_ix: 0,
        }
    }
}

impl Iterator for Cmap4Iter<'_> {
    type Item = (u32, GlyphId);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(codepoint) = self.cur_range.next() {
                let Some(glyph_id) = self.subtable.lookup_glyph_id(
                    codepoint as u16,
                    self.cur_range_ix,
                    self.cur_start_code,
                ) else {
                    continue;
                };
                return Some((codepoint, glyph_id));
            } else {
                self.cur_range_ix += 1;
                let next_range = self.subtable.code_range(self.cur_range_ix)?;
                // Segments should be in order and non-overlapping, but
                // fonts exist that repeat a segment. Start from the later
                // of the two start codes so no codepoint is emitted twice.
                self.cur_range = next_range.start.max(self.cur_range.end)..next_range.end;
                self.cur_start_code = next_range.start as u16;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttf_test_data::{be_buffer, bebuffer::BeBuffer};

    // Three segments: a delta mapped run, a glyph id array mapped pair
    // and the final sentinel.
    fn basic_cmap4() -> BeBuffer {
        be_buffer! {
            4u16,       // format
            48u16,      // length
            0u16,       // language
            6u16,       // seg count x2
            0u16,       // search range, unused
            0u16,       // entry selector, unused
            0u16,       // range shift, unused
            [0x22u16, 0x42, 0xFFFF],    // end codes
            0u16,       // reserved pad
            [0x20u16, 0x41, 0xFFFF],    // start codes
            [-31i16, 0, 1],             // id deltas
            [0u16, 4, 0],               // id range offsets
            [5u16, 0]   // glyph id array
        }
    }

    #[test]
    fn delta_mapped_segment() {
        let buf = basic_cmap4();
        let cmap4 = Cmap4::read(FontData::new(&buf)).unwrap();
        assert_eq!(cmap4.map_codepoint(0x20u32), Some(GlyphId::new(1)));
        assert_eq!(cmap4.map_codepoint(0x21u32), Some(GlyphId::new(2)));
        assert_eq!(cmap4.map_codepoint(0x22u32), Some(GlyphId::new(3)));
    }

    #[test]
    fn array_mapped_segment() {
        let buf = basic_cmap4();
        let cmap4 = Cmap4::read(FontData::new(&buf)).unwrap();
        assert_eq!(cmap4.map_codepoint(0x41u32), Some(GlyphId::new(5)));
        // covered, but the array stores zero
        assert_eq!(cmap4.map_codepoint(0x42u32), Some(GlyphId::NOTDEF));
    }

    #[test]
    fn uncovered_codepoints() {
        let buf = basic_cmap4();
        let cmap4 = Cmap4::read(FontData::new(&buf)).unwrap();
        assert_eq!(cmap4.map_codepoint(0x1Fu32), None);
        assert_eq!(cmap4.map_codepoint(0x43u32), None);
        assert_eq!(cmap4.map_codepoint(0x10001u32), None);
    }

    #[test]
    fn iter_materializes_covered_codepoints() {
        let buf = basic_cmap4();
        let cmap4 = Cmap4::read(FontData::new(&buf)).unwrap();
        let mappings = cmap4.iter().collect::<Vec<_>>();
        assert_eq!(
            mappings,
            [
                (0x20, GlyphId::new(1)),
                (0x21, GlyphId::new(2)),
                (0x22, GlyphId::new(3)),
                (0x41, GlyphId::new(5)),
                (0x42, GlyphId::NOTDEF),
                (0xFFFF, GlyphId::NOTDEF),
            ]
        );
    }

    #[test]
    fn iter_skips_repeated_segments() {
        // two identical segments covering [6, 64]
        let buf = be_buffer! {
            4u16,       // format
            0u16,       // length, unused
            0u16,       // language
            4u16,       // seg count x2
            0u16,       // search range, unused
            0u16,       // entry selector, unused
            0u16,       // range shift, unused
            [64u16, 64],    // end codes
            0u16,           // reserved pad
            [6u16, 6],      // start codes
            [0i16, 0],      // id deltas
            [0u16, 0]       // id range offsets
        };
        let cmap4 = Cmap4::read(FontData::new(&buf)).unwrap();
        let mappings = cmap4.iter().collect::<Vec<_>>();
        assert_eq!(mappings.len(), 59);
        assert_eq!(mappings[0], (6, GlyphId::new(6)));
        assert_eq!(mappings[58], (64, GlyphId::new(64)));
    }

    #[test]
    fn rejects_other_formats() {
        let buf = be_buffer! {
            6u16,   // format
            0u16,   // length
            0u16    // language
        };
        assert!(matches!(
            Cmap4::read(FontData::new(&buf)),
            Err(ReadError::InvalidFormat(6))
        ));
    }

    fn cmap_with_records(records: &[(u16, u16)], subtable: &BeBuffer) -> Vec<u8> {
        let subtable_start = 4 + records.len() * 8;
        let mut buf = BeBuffer::new().push(0u16).push(records.len() as u16);
        for (platform_id, encoding_id) in records {
            buf = buf
                .push(*platform_id)
                .push(*encoding_id)
                .push(subtable_start as u32);
        }
        let mut data = buf.to_vec();
        data.extend_from_slice(subtable);
        data
    }

    #[test]
    fn selects_windows_unicode_bmp() {
        let data = cmap_with_records(&[(0, 3), (3, 1)], &basic_cmap4());
        let cmap = Cmap::read(FontData::new(&data)).unwrap();
        assert_eq!(cmap.encoding_records().len(), 2);
        assert!(cmap.unicode_bmp().is_some());
        assert_eq!(cmap.map_codepoint(0x41u32), Some(GlyphId::new(5)));
    }

    #[test]
    fn no_windows_unicode_record() {
        let data = cmap_with_records(&[(1, 0)], &basic_cmap4());
        let cmap = Cmap::read(FontData::new(&data)).unwrap();
        assert!(cmap.unicode_bmp().is_none());
        assert_eq!(cmap.map_codepoint(0x41u32), None);
    }

    #[test]
    fn windows_record_with_wrong_format() {
        let not_format4 = be_buffer! {
            12u16,  // format
            0u16,   // reserved
            0u32    // length
        };
        let data = cmap_with_records(&[(3, 1)], &not_format4);
        let cmap = Cmap::read(FontData::new(&data)).unwrap();
        assert!(cmap.unicode_bmp().is_none());
    }
}
