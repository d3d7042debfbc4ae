//! The [hhea (Horizontal Header)][hhea] table
//!
//! [hhea]: https://docs.microsoft.com/en-us/typography/opentype/spec/hhea

use crate::{table_provider::TopLevelTable, FontData, FontRead, ReadError};
use types::{FWord, Fixed, FixedSize, Tag, UfWord};

/// The [hhea] table.
///
/// [hhea]: https://docs.microsoft.com/en-us/typography/opentype/spec/hhea
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hhea {
    version: Fixed,
    ascender: FWord,
    descender: FWord,
    line_gap: FWord,
    advance_width_max: UfWord,
    min_left_side_bearing: FWord,
    min_right_side_bearing: FWord,
    x_max_extent: FWord,
    caret_slope_rise: i16,
    caret_slope_run: i16,
    caret_offset: i16,
    metric_data_format: i16,
    number_of_h_metrics: u16,
}

impl TopLevelTable for Hhea {
    const TAG: Tag = Tag::new(b"hhea");
}

impl<'a> FontRead<'a> for Hhea {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version = cursor.read()?;
        let ascender = cursor.read()?;
        let descender = cursor.read()?;
        let line_gap = cursor.read()?;
        let advance_width_max = cursor.read()?;
        let min_left_side_bearing = cursor.read()?;
        let min_right_side_bearing = cursor.read()?;
        let x_max_extent = cursor.read()?;
        let caret_slope_rise = cursor.read()?;
        let caret_slope_run = cursor.read()?;
        let caret_offset = cursor.read()?;
        // four reserved fields
        cursor.advance_by(4 * i16::RAW_BYTE_LEN);
        let metric_data_format = cursor.read()?;
        let number_of_h_metrics = cursor.read()?;
        Ok(Hhea {
            version,
            ascender,
            descender,
            line_gap,
            advance_width_max,
            min_left_side_bearing,
            min_right_side_bearing,
            x_max_extent,
            caret_slope_rise,
            caret_slope_run,
            caret_offset,
            metric_data_format,
            number_of_h_metrics,
        })
    }
}

impl Hhea {
    /// Version number of the horizontal header table, set to (1, 0).
    pub fn version(&self) -> Fixed {
        self.version
    }

    /// Typographic ascent.
    pub fn ascender(&self) -> FWord {
        self.ascender
    }

    /// Typographic descent, typically negative.
    pub fn descender(&self) -> FWord {
        self.descender
    }

    /// Typographic line gap.
    pub fn line_gap(&self) -> FWord {
        self.line_gap
    }

    /// Maximum advance width in the `hmtx` table.
    pub fn advance_width_max(&self) -> UfWord {
        self.advance_width_max
    }

    /// Minimum left side bearing in the `hmtx` table.
    pub fn min_left_side_bearing(&self) -> FWord {
        self.min_left_side_bearing
    }

    /// Minimum right side bearing.
    pub fn min_right_side_bearing(&self) -> FWord {
        self.min_right_side_bearing
    }

    /// Maximum of `lsb + (x_max - x_min)` across all glyphs.
    pub fn x_max_extent(&self) -> FWord {
        self.x_max_extent
    }

    /// Used to calculate the slope of the cursor; 1 for vertical.
    pub fn caret_slope_rise(&self) -> i16 {
        self.caret_slope_rise
    }

    /// 0 for a vertical caret.
    pub fn caret_slope_run(&self) -> i16 {
        self.caret_slope_run
    }

    /// Amount by which a slanted highlight on a glyph should be shifted.
    pub fn caret_offset(&self) -> i16 {
        self.caret_offset
    }

    /// 0 for current format.
    pub fn metric_data_format(&self) -> i16 {
        self.metric_data_format
    }

    /// Number of long metric entries in the `hmtx` table.
    pub fn number_of_h_metrics(&self) -> u16 {
        self.number_of_h_metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttf_test_data::{be_buffer, bebuffer::BeBuffer};

    #[test]
    fn smoke_test() {
        let buf = be_buffer! {
            (Fixed::from_f64(1.0)),     // version
            (FWord::new(800)),          // ascender
            (FWord::new(-200)),         // descender
            (FWord::new(90)),           // line gap
            (UfWord::new(1432)),        // advance width max
            (FWord::new(-93)),          // min left side bearing
            (FWord::new(-70)),          // min right side bearing
            (FWord::new(1365)),         // x max extent
            1i16,                       // caret slope rise
            0i16,                       // caret slope run
            0i16,                       // caret offset
            [0i16, 0, 0, 0],            // reserved
            0i16,                       // metric data format
            258u16                      // number of h metrics
        };
        let hhea = Hhea::read(FontData::new(&buf)).unwrap();
        assert_eq!(hhea.version(), Fixed::from_f64(1.0));
        assert_eq!(hhea.ascender(), FWord::new(800));
        assert_eq!(hhea.descender(), FWord::new(-200));
        assert_eq!(hhea.line_gap(), FWord::new(90));
        assert_eq!(hhea.advance_width_max(), UfWord::new(1432));
        assert_eq!(hhea.caret_slope_rise(), 1);
        assert_eq!(hhea.number_of_h_metrics(), 258);
    }

    #[test]
    fn truncated() {
        let buf = be_buffer! {
            (Fixed::from_f64(1.0)),     // version
            (FWord::new(800))           // ascender, rest missing
        };
        assert_eq!(
            Hhea::read(FontData::new(&buf)),
            Err(ReadError::OutOfBounds)
        );
    }
}
