//! The [kern (Kerning)][kern] table
//!
//! [kern]: https://docs.microsoft.com/en-us/typography/opentype/spec/kern

use crate::{table_provider::TopLevelTable, FontData, FontRead, ReadError};
use types::{BigEndian, FWord, FixedSize, Tag};

/// The size of a subtable header: version, length and coverage.
const SUBTABLE_HEADER_LEN: usize = 3 * u16::RAW_BYTE_LEN;

/// The [kern] table.
///
/// Only version 0 tables are supported. The version 1 layout used on
/// older Apple platforms has an incompatible header.
///
/// [kern]: https://docs.microsoft.com/en-us/typography/opentype/spec/kern
#[derive(Clone)]
pub struct Kern<'a> {
    n_tables: u16,
    subtable_data: FontData<'a>,
}

impl TopLevelTable for Kern<'_> {
    const TAG: Tag = Tag::new(b"kern");
}

impl<'a> FontRead<'a> for Kern<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version: u16 = cursor.read()?;
        if version != 0 {
            return Err(ReadError::InvalidFormat(version as i64));
        }
        let n_tables = cursor.read()?;
        let subtable_data = cursor.remaining().ok_or(ReadError::OutOfBounds)?;
        Ok(Kern {
            n_tables,
            subtable_data,
        })
    }
}

impl<'a> Kern<'a> {
    /// The number of subtables the table declares.
    pub fn n_tables(&self) -> u16 {
        self.n_tables
    }

    /// An iterator over the subtables.
    ///
    /// Iteration ends early if a subtable header is truncated or declares
    /// a length that does not cover its own header.
    pub fn subtables(&self) -> SubtableIter<'a> {
        SubtableIter {
            data: self.subtable_data,
            remaining: self.n_tables as usize,
        }
    }
}

/// A subtable header along with the payload it describes.
#[derive(Clone)]
pub struct Subtable<'a> {
    version: u16,
    length: u16,
    coverage: u16,
    data: FontData<'a>,
}

impl<'a> Subtable<'a> {
    pub fn version(&self) -> u16 {
        self.version
    }

    /// Length of the subtable in bytes, including the header.
    pub fn length(&self) -> u16 {
        self.length
    }

    /// Coverage flags in the low byte, subtable format in the high byte.
    pub fn coverage(&self) -> u16 {
        self.coverage
    }

    /// `true` if the subtable holds horizontal kerning data.
    pub fn is_horizontal(&self) -> bool {
        self.coverage & 1 != 0
    }

    pub fn format(&self) -> u8 {
        (self.coverage >> 8) as u8
    }

    /// The subtable as an ordered list of kerning pairs, if it has
    /// format 0.
    pub fn format0(&self) -> Option<Subtable0<'a>> {
        if self.format() != 0 {
            return None;
        }
        Subtable0::read(self.data).ok()
    }
}

pub struct SubtableIter<'a> {
    data: FontData<'a>,
    remaining: usize,
}

impl<'a> Iterator for SubtableIter<'a> {
    type Item = Subtable<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let mut cursor = self.data.cursor();
        let version = cursor.read().ok()?;
        let length: u16 = cursor.read().ok()?;
        let coverage = cursor.read().ok()?;
        let data = self.data.slice(SUBTABLE_HEADER_LEN..length as usize)?;
        self.data = self.data.split_off(length as usize)?;
        Some(Subtable {
            version,
            length,
            coverage,
            data,
        })
    }
}

/// A [format 0](https://docs.microsoft.com/en-us/typography/opentype/spec/kern#format-0)
/// subtable: ordered list of kerning pairs.
#[derive(Clone)]
pub struct Subtable0<'a> {
    n_pairs: u16,
    pairs: &'a [KernPair],
}

impl<'a> FontRead<'a> for Subtable0<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let n_pairs: u16 = cursor.read()?;
        // search range, entry selector and range shift are derivable
        cursor.advance_by(3 * u16::RAW_BYTE_LEN);
        let pairs = cursor.read_array(n_pairs as usize)?;
        Ok(Subtable0 { n_pairs, pairs })
    }
}

impl<'a> Subtable0<'a> {
    pub fn n_pairs(&self) -> u16 {
        self.n_pairs
    }

    /// The kerning pairs, sorted by the combination of left and right
    /// glyph identifiers.
    pub fn pairs(&self) -> &'a [KernPair] {
        self.pairs
    }
}

/// A single kerning pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C)]
pub struct KernPair {
    /// Glyph identifier of the left hand glyph.
    pub left: BigEndian<u16>,
    /// Glyph identifier of the right hand glyph.
    pub right: BigEndian<u16>,
    /// Kerning value, in font units.
    pub value: BigEndian<FWord>,
}

impl KernPair {
    pub fn left(&self) -> u16 {
        self.left.get()
    }

    pub fn right(&self) -> u16 {
        self.right.get()
    }

    pub fn value(&self) -> FWord {
        self.value.get()
    }
}

impl FixedSize for KernPair {
    const RAW_BYTE_LEN: usize = 2 * u16::RAW_BYTE_LEN + FWord::RAW_BYTE_LEN;
}
