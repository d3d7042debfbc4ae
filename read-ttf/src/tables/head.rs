//! The [head (Font Header)][head] table
//!
//! [head]: https://docs.microsoft.com/en-us/typography/opentype/spec/head

use crate::{table_provider::TopLevelTable, FontData, FontRead, ReadError};
use types::{Fixed, LongDateTime, Tag};

/// The expected value of the `magic_number` field.
const MAGIC: u32 = 0x5F0F3CF5;

/// The [head] table.
///
/// All fields are fixed size, so the table is decoded up front.
///
/// [head]: https://docs.microsoft.com/en-us/typography/opentype/spec/head
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Head {
    version: Fixed,
    font_revision: Fixed,
    checksum_adjustment: u32,
    magic_number: u32,
    flags: u16,
    units_per_em: u16,
    created: LongDateTime,
    modified: LongDateTime,
    x_min: i16,
    y_min: i16,
    x_max: i16,
    y_max: i16,
    mac_style: u16,
    lowest_rec_ppem: u16,
    font_direction_hint: i16,
    index_to_loc_format: i16,
    glyph_data_format: i16,
}

impl TopLevelTable for Head {
    const TAG: Tag = Tag::new(b"head");
}

impl<'a> FontRead<'a> for Head {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version = cursor.read()?;
        let font_revision = cursor.read()?;
        let checksum_adjustment = cursor.read()?;
        let magic_number: u32 = cursor.read()?;
        if magic_number != MAGIC {
            return Err(ReadError::MalformedData("wrong magic number in head"));
        }
        let flags = cursor.read()?;
        let units_per_em = cursor.read()?;
        let created = cursor.read()?;
        let modified = cursor.read()?;
        let x_min = cursor.read()?;
        let y_min = cursor.read()?;
        let x_max = cursor.read()?;
        let y_max = cursor.read()?;
        let mac_style = cursor.read()?;
        let lowest_rec_ppem = cursor.read()?;
        let font_direction_hint = cursor.read()?;
        let index_to_loc_format: i16 = cursor.read()?;
        if !matches!(index_to_loc_format, 0 | 1) {
            return Err(ReadError::MalformedData("invalid indexToLocFormat in head"));
        }
        let glyph_data_format = cursor.read()?;
        Ok(Head {
            version,
            font_revision,
            checksum_adjustment,
            magic_number,
            flags,
            units_per_em,
            created,
            modified,
            x_min,
            y_min,
            x_max,
            y_max,
            mac_style,
            lowest_rec_ppem,
            font_direction_hint,
            index_to_loc_format,
            glyph_data_format,
        })
    }
}

impl Head {
    /// Version number of the font header table, set to (1, 0).
    pub fn version(&self) -> Fixed {
        self.version
    }

    /// Set by font manufacturer.
    pub fn font_revision(&self) -> Fixed {
        self.font_revision
    }

    /// A checksum over the entire font file.
    pub fn checksum_adjustment(&self) -> u32 {
        self.checksum_adjustment
    }

    /// Set to 0x5F0F3CF5.
    pub fn magic_number(&self) -> u32 {
        self.magic_number
    }

    /// Layout flags; bit 0 means the font has a baseline at y = 0.
    pub fn flags(&self) -> u16 {
        self.flags
    }

    /// The design grid size. Glyph coordinates are expressed in these units.
    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// Creation time, in seconds since 12:00 midnight, January 1, 1904, UTC.
    pub fn created(&self) -> LongDateTime {
        self.created
    }

    /// Modification time, in seconds since 12:00 midnight, January 1,
    /// 1904, UTC.
    pub fn modified(&self) -> LongDateTime {
        self.modified
    }

    /// Minimum x coordinate across all glyph bounding boxes.
    pub fn x_min(&self) -> i16 {
        self.x_min
    }

    /// Minimum y coordinate across all glyph bounding boxes.
    pub fn y_min(&self) -> i16 {
        self.y_min
    }

    /// Maximum x coordinate across all glyph bounding boxes.
    pub fn x_max(&self) -> i16 {
        self.x_max
    }

    /// Maximum y coordinate across all glyph bounding boxes.
    pub fn y_max(&self) -> i16 {
        self.y_max
    }

    /// Bold, italic and similar style bits.
    pub fn mac_style(&self) -> u16 {
        self.mac_style
    }

    /// Smallest readable size in pixels.
    pub fn lowest_rec_ppem(&self) -> u16 {
        self.lowest_rec_ppem
    }

    /// Deprecated; set to 2.
    pub fn font_direction_hint(&self) -> i16 {
        self.font_direction_hint
    }

    /// 0 for short `loca` offsets, 1 for long.
    pub fn index_to_loc_format(&self) -> i16 {
        self.index_to_loc_format
    }

    /// 0 for the current glyph data format.
    pub fn glyph_data_format(&self) -> i16 {
        self.glyph_data_format
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ttf_test_data::{be_buffer, bebuffer::BeBuffer};

    fn head_bytes(magic: u32, loc_format: i16) -> BeBuffer {
        be_buffer! {
            (Fixed::from_f64(1.0)),     // version
            (Fixed::from_f64(2.5)),     // font revision
            0xDEADBEEFu32,              // checksum adjustment
            (magic),                    // magic number
            0b0000_0000_0000_0011u16,   // flags
            1000u16,                    // units per em
            (LongDateTime::new(3894716640)),    // created
            (LongDateTime::new(3894716700)),    // modified
            -193i16,                    // x min
            -454i16,                    // y min
            1849i16,                    // x max
            1061i16,                    // y max
            0u16,                       // mac style
            9u16,                       // lowest rec ppem
            2i16,                       // font direction hint
            (loc_format),               // index to loc format
            0i16                        // glyph data format
        }
    }

    #[test]
    fn smoke_test() {
        let buf = head_bytes(MAGIC, 0);
        let head = Head::read(FontData::new(&buf)).unwrap();
        assert_eq!(head.version(), Fixed::from_f64(1.0));
        assert_eq!(head.font_revision(), Fixed::from_f64(2.5));
        assert_eq!(head.checksum_adjustment(), 0xDEADBEEF);
        assert_eq!(head.units_per_em(), 1000);
        assert_eq!(head.created(), LongDateTime::new(3894716640));
        assert_eq!(head.x_min(), -193);
        assert_eq!(head.y_max(), 1061);
        assert_eq!(head.lowest_rec_ppem(), 9);
        assert_eq!(head.index_to_loc_format(), 0);
    }

    #[test]
    fn rejects_bad_magic() {
        let buf = head_bytes(0x12345678, 0);
        assert_eq!(
            Head::read(FontData::new(&buf)),
            Err(ReadError::MalformedData("wrong magic number in head"))
        );
    }

    #[test]
    fn rejects_bad_loc_format() {
        let buf = head_bytes(MAGIC, 7);
        assert_eq!(
            Head::read(FontData::new(&buf)),
            Err(ReadError::MalformedData("invalid indexToLocFormat in head"))
        );
    }

    #[test]
    fn incomplete_data() {
        let buf = head_bytes(MAGIC, 0);
        let short = &buf[..20];
        assert_eq!(
            Head::read(FontData::new(short)),
            Err(ReadError::OutOfBounds)
        );
    }
}
