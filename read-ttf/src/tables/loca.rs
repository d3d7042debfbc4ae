//! The [loca (Index to Location)][loca] table
//!
//! [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca

use std::ops::Range;

use crate::{
    read::{FontRead, FontReadWithArgs, ReadArgs, ReadError},
    table_provider::TopLevelTable,
    FontData,
};
use types::{BigEndian, GlyphId, Tag};

/// The [loca] table.
///
/// The short variant stores offsets divided by two; [`Loca::get_raw`]
/// undoes the scaling so callers always see byte offsets into `glyf`.
///
/// [loca]: https://docs.microsoft.com/en-us/typography/opentype/spec/loca
#[derive(Clone)]
pub enum Loca<'a> {
    Short(&'a [BigEndian<u16>]),
    Long(&'a [BigEndian<u32>]),
}

impl TopLevelTable for Loca<'_> {
    const TAG: Tag = Tag::new(b"loca");
}

impl<'a> Loca<'a> {
    pub fn read(data: FontData<'a>, is_long: bool) -> Result<Self, ReadError> {
        Self::read_with_args(data, &is_long)
    }

    /// The number of glyphs covered by this table.
    ///
    /// The table stores one offset more than the number of glyphs, the
    /// extra one serving as the end sentinel for the last glyph.
    pub fn len(&self) -> usize {
        match self {
            Loca::Short(data) => data.len().saturating_sub(1),
            Loca::Long(data) => data.len().saturating_sub(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Attempt to return the byte offset for a given offset index.
    pub fn get_raw(&self, idx: usize) -> Option<u32> {
        match self {
            Loca::Short(data) => data.get(idx).map(|x| x.get() as u32 * 2),
            Loca::Long(data) => data.get(idx).map(|x| x.get()),
        }
    }

    /// The byte range within `glyf` holding the data for the given glyph.
    ///
    /// Returns `None` when either offset is missing, including the case
    /// where `gid` is the last glyph and the table lacks its end sentinel.
    pub fn span(&self, gid: GlyphId) -> Option<Range<u32>> {
        let idx = gid.to_usize();
        let start = self.get_raw(idx)?;
        let end = self.get_raw(idx + 1)?;
        Some(start..end)
    }

    /// Resolve the outline data for the given glyph.
    ///
    /// Returns `Ok(None)` for an empty glyph, one whose start and end
    /// offsets are equal.
    pub fn get_glyf(
        &self,
        gid: GlyphId,
        glyf: &super::glyf::Glyf<'a>,
    ) -> Result<Option<super::glyf::Glyph<'a>>, ReadError> {
        let span = self.span(gid).ok_or(ReadError::OutOfBounds)?;
        if span.start == span.end {
            return Ok(None);
        }
        let data = glyf
            .offset_data()
            .slice(span.start as usize..span.end as usize)
            .ok_or(ReadError::OutOfBounds)?;
        super::glyf::Glyph::read(data).map(Some)
    }
}

impl ReadArgs for Loca<'_> {
    type Args = bool;
}

impl<'a> FontReadWithArgs<'a> for Loca<'a> {
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self, ReadError> {
        let is_long = *args;
        if is_long {
            data.read_array(0..data.len()).map(Loca::Long)
        } else {
            data.read_array(0..data.len()).map(Loca::Short)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::glyf::{Glyf, Glyph};
    use super::*;
    use ttf_test_data::{be_buffer, bebuffer::BeBuffer};

    #[test]
    fn short_offsets_are_doubled() {
        let buf = be_buffer! {
            [0u16, 10, 10, 24]
        };
        let loca = Loca::read(FontData::new(&buf), false).unwrap();
        assert_eq!(loca.len(), 3);
        assert_eq!(loca.get_raw(0), Some(0));
        assert_eq!(loca.get_raw(1), Some(20));
        assert_eq!(loca.get_raw(3), Some(48));
        assert_eq!(loca.get_raw(4), None);
        assert_eq!(loca.span(GlyphId::new(2)), Some(20..48));
    }

    #[test]
    fn long_offsets_pass_through() {
        let buf = be_buffer! {
            [0u32, 20, 20, 48]
        };
        let loca = Loca::read(FontData::new(&buf), true).unwrap();
        assert_eq!(loca.get_raw(1), Some(20));
        assert_eq!(loca.span(GlyphId::new(1)), Some(20..20));
    }

    #[test]
    fn odd_length_rejected() {
        let data = [0u8, 0, 0];
        assert_eq!(
            Loca::read(FontData::new(&data), false).map(|_| ()),
            Err(ReadError::InvalidArrayLen)
        );
    }

    fn triangle_glyf() -> BeBuffer {
        be_buffer! {
            1i16,       // number of contours
            10i16,      // x min
            20i16,      // y min
            60i16,      // x max
            70i16,      // y max
            [2u16],     // end pts of contours
            0u16,       // instruction length
            [0x37u8, 0x33, 0x27],   // flags
            [10u8, 50, 25],         // x deltas
            [20u8, 50]              // y deltas
        }
    }

    #[test]
    fn resolves_glyph_data() {
        let glyf_data = triangle_glyf();
        let glyf = Glyf::read(FontData::new(&glyf_data)).unwrap();
        // 22 bytes of glyph data, stored as 11 in the short format
        let loca_data = be_buffer! { [0u16, 11] };
        let loca = Loca::read(FontData::new(&loca_data), false).unwrap();

        let glyph = loca.get_glyf(GlyphId::new(0), &glyf).unwrap().unwrap();
        assert!(matches!(glyph, Glyph::Simple(_)));
        assert_eq!(glyph.number_of_contours(), 1);
    }

    #[test]
    fn equal_offsets_mean_empty_glyph() {
        let glyf_data = triangle_glyf();
        let glyf = Glyf::read(FontData::new(&glyf_data)).unwrap();
        let loca_data = be_buffer! { [0u16, 0, 11] };
        let loca = Loca::read(FontData::new(&loca_data), false).unwrap();

        assert!(loca.get_glyf(GlyphId::new(0), &glyf).unwrap().is_none());
        assert!(loca.get_glyf(GlyphId::new(1), &glyf).unwrap().is_some());
    }

    #[test]
    fn missing_end_sentinel() {
        let glyf_data = triangle_glyf();
        let glyf = Glyf::read(FontData::new(&glyf_data)).unwrap();
        let loca_data = be_buffer! { [0u16, 11] };
        let loca = Loca::read(FontData::new(&loca_data), false).unwrap();

        // glyph 1 would need a third offset as its end sentinel
        assert!(matches!(
            loca.get_glyf(GlyphId::new(1), &glyf),
            Err(ReadError::OutOfBounds)
        ));
    }

    #[test]
    fn offset_past_end_of_glyf() {
        let glyf_data = triangle_glyf();
        let glyf = Glyf::read(FontData::new(&glyf_data)).unwrap();
        let loca_data = be_buffer! { [0u32, 100] };
        let loca = Loca::read(FontData::new(&loca_data), true).unwrap();

        assert!(matches!(
            loca.get_glyf(GlyphId::new(0), &glyf),
            Err(ReadError::OutOfBounds)
        ));
    }
}
