//! The [hmtx (Horizontal Metrics)][hmtx] table
//!
//! [hmtx]: https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx

use crate::{table_provider::TopLevelTable, FontData, FontReadWithArgs, ReadArgs, ReadError};
use types::{BigEndian, FWord, FixedSize, GlyphId, Tag, UfWord};

/// The advance width and left side bearing for a single glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C)]
pub struct LongMetric {
    /// Advance width, in font design units.
    pub advance: BigEndian<UfWord>,
    /// Glyph left side bearing, in font design units.
    pub side_bearing: BigEndian<FWord>,
}

impl LongMetric {
    pub fn advance(&self) -> UfWord {
        self.advance.get()
    }

    pub fn side_bearing(&self) -> FWord {
        self.side_bearing.get()
    }
}

impl FixedSize for LongMetric {
    const RAW_BYTE_LEN: usize = UfWord::RAW_BYTE_LEN + FWord::RAW_BYTE_LEN;
}

/// The [hmtx] table.
///
/// Fonts in which many glyphs share one advance width (such as monospace
/// fonts) store that advance only once: glyphs past `number_of_h_metrics`
/// carry a bare side bearing and reuse the last stored advance.
///
/// [hmtx]: https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hmtx<'a> {
    h_metrics: &'a [LongMetric],
    left_side_bearings: &'a [BigEndian<FWord>],
}

impl TopLevelTable for Hmtx<'_> {
    const TAG: Tag = Tag::new(b"hmtx");
}

impl ReadArgs for Hmtx<'_> {
    /// (number_of_h_metrics from `hhea`, num_glyphs from `maxp`)
    type Args = (u16, u16);
}

impl<'a> FontReadWithArgs<'a> for Hmtx<'a> {
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self, ReadError> {
        let (number_of_h_metrics, num_glyphs) = *args;
        let mut cursor = data.cursor();
        let h_metrics = cursor.read_array(number_of_h_metrics as usize)?;
        let remainder = num_glyphs.saturating_sub(number_of_h_metrics) as usize;
        let left_side_bearings = cursor.read_array(remainder)?;
        Ok(Hmtx {
            h_metrics,
            left_side_bearings,
        })
    }
}

impl<'a> Hmtx<'a> {
    /// The paired advance and side bearing records.
    pub fn h_metrics(&self) -> &'a [LongMetric] {
        self.h_metrics
    }

    /// Side bearings for the glyphs past `number_of_h_metrics`.
    pub fn left_side_bearings(&self) -> &'a [BigEndian<FWord>] {
        self.left_side_bearings
    }

    /// Returns the advance width for the given glyph identifier.
    pub fn advance(&self, glyph_id: GlyphId) -> Option<UfWord> {
        self.h_metrics
            .get(glyph_id.to_usize())
            .or_else(|| self.h_metrics.last())
            .map(|metric| metric.advance())
    }

    /// Returns the left side bearing for the given glyph identifier.
    pub fn side_bearing(&self, glyph_id: GlyphId) -> Option<FWord> {
        let ix = glyph_id.to_usize();
        self.h_metrics
            .get(ix)
            .map(|metric| metric.side_bearing())
            .or_else(|| {
                self.left_side_bearings
                    .get(ix.checked_sub(self.h_metrics.len())?)
                    .map(|sb| sb.get())
            })
    }
}
