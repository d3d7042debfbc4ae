//! Reading TrueType tables
//!
//! This crate provides memory safe zero-allocation parsing of font files.
//! It is unopinionated, and attempts to provide raw access to the underlying
//! font data as it is described in the [TrueType reference manual][spec],
//! limited to the tables required for extracting glyph outlines and
//! horizontal metrics.
//!
//! [spec]: https://developer.apple.com/fonts/TrueType-Reference-Manual/

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod font_data;
mod read;
mod table_provider;

pub mod tables;

pub use font_data::FontData;
pub use read::{FontRead, FontReadWithArgs, ReadArgs, ReadError};
pub use table_provider::TableProvider;

/// Public re-export of the ttf-types crate.
pub extern crate ttf_types as types;

use types::{
    BigEndian, FixedSize, Tag, CFF_SFNT_VERSION, TRUE_SFNT_VERSION, TTC_HEADER_TAG,
    TT_SFNT_VERSION,
};

/// Record for a table in the table directory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C)]
pub struct TableRecord {
    /// Table identifier.
    pub tag: BigEndian<Tag>,
    /// Checksum for the table.
    pub checksum: BigEndian<u32>,
    /// Offset from the beginning of the font data.
    pub offset: BigEndian<u32>,
    /// Length of the table.
    pub length: BigEndian<u32>,
}

impl FixedSize for TableRecord {
    const RAW_BYTE_LEN: usize =
        Tag::RAW_BYTE_LEN + u32::RAW_BYTE_LEN + u32::RAW_BYTE_LEN + u32::RAW_BYTE_LEN;
}

/// The sfnt header at the start of a font file.
///
/// This provides the records used to locate the top level tables in the
/// rest of the file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TableDirectory<'a> {
    sfnt_version: u32,
    search_range: u16,
    entry_selector: u16,
    range_shift: u16,
    table_records: &'a [TableRecord],
}

impl<'a> FontRead<'a> for TableDirectory<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let sfnt_version: u32 = cursor.read()?;
        let num_tables: u16 = cursor.read()?;
        let search_range: u16 = cursor.read()?;
        let entry_selector: u16 = cursor.read()?;
        let range_shift: u16 = cursor.read()?;
        let table_records = cursor.read_array(num_tables as usize)?;
        Ok(TableDirectory {
            sfnt_version,
            search_range,
            entry_selector,
            range_shift,
            table_records,
        })
    }
}

impl<'a> TableDirectory<'a> {
    /// 0x00010000 for TrueType outlines, 'OTTO' for CFF, 'true' for
    /// legacy Apple fonts.
    pub fn sfnt_version(&self) -> u32 {
        self.sfnt_version
    }

    /// Number of tables in the directory.
    pub fn num_tables(&self) -> u16 {
        self.table_records.len() as u16
    }

    /// Maximum power of 2 less than or equal to numTables, times 16.
    pub fn search_range(&self) -> u16 {
        self.search_range
    }

    /// Log2 of the maximum power of 2 less than or equal to numTables.
    pub fn entry_selector(&self) -> u16 {
        self.entry_selector
    }

    /// numTables times 16, minus searchRange.
    pub fn range_shift(&self) -> u16 {
        self.range_shift
    }

    /// The records for the tables in the font.
    pub fn table_records(&self) -> &'a [TableRecord] {
        self.table_records
    }

    /// Strictly sorted, so fonts with duplicate tags take the scan path
    /// in [`FontRef::table_data`] and the first record wins.
    fn is_sorted(&self) -> bool {
        self.table_records
            .windows(2)
            .all(|recs| recs[0].tag.get() < recs[1].tag.get())
    }
}

/// Reference to an in-memory font.
#[derive(Clone)]
pub struct FontRef<'a> {
    data: FontData<'a>,
    /// The table directory of this font.
    pub table_directory: TableDirectory<'a>,
    // Whether the table directory has records in sorted order, determining
    // whether we can use binary search when looking for a table.
    table_directory_sorted: bool,
}

impl<'a> FontRef<'a> {
    /// Creates a new reference to an in-memory font backed by the given data.
    ///
    /// The data must begin with a table directory. Font collections are not
    /// supported and are rejected with [`ReadError::InvalidTtc`].
    pub fn new(data: &'a [u8]) -> Result<Self, ReadError> {
        let data = FontData::new(data);
        if let Ok(tag) = data.read_at::<Tag>(0) {
            if tag == TTC_HEADER_TAG {
                return Err(ReadError::InvalidTtc(tag));
            }
        }
        Self::with_table_directory(data, TableDirectory::read(data)?)
    }

    /// Returns the data for the table with the specified tag, if present.
    pub fn table_data(&self, tag: Tag) -> Option<FontData<'a>> {
        let records = self.table_directory.table_records();
        match self.table_directory_sorted {
            true => records
                .binary_search_by(|rec| rec.tag.get().cmp(&tag))
                .ok()
                .map(|idx| &records[idx]),
            false => records.iter().find(|rec| rec.tag.get() == tag),
        }
        .and_then(|record| {
            let start = record.offset.get() as usize;
            let end = start.checked_add(record.length.get() as usize)?;
            self.data.slice(start..end)
        })
    }

    fn with_table_directory(
        data: FontData<'a>,
        table_directory: TableDirectory<'a>,
    ) -> Result<Self, ReadError> {
        if [TT_SFNT_VERSION, CFF_SFNT_VERSION, TRUE_SFNT_VERSION]
            .contains(&table_directory.sfnt_version())
        {
            let table_directory_sorted = table_directory.is_sorted();
            Ok(FontRef {
                data,
                table_directory,
                table_directory_sorted,
            })
        } else {
            Err(ReadError::InvalidSfnt(table_directory.sfnt_version()))
        }
    }
}

impl<'a> TableProvider<'a> for FontRef<'a> {
    fn data_for_tag(&self, tag: Tag) -> Option<FontData<'a>> {
        self.table_data(tag)
    }
}

#[cfg(test)]
mod tests {
    use ttf_test_data::{be_buffer, bebuffer::BeBuffer};
    use types::{Tag, TRUE_SFNT_VERSION, TTC_HEADER_TAG, TT_SFNT_VERSION};

    use crate::{FontRef, ReadError};

    #[test]
    fn rejects_collections() {
        let data = be_buffer! {
            (TTC_HEADER_TAG),   // ttcf
            0x00010000u32,      // version
            2u32                // num fonts
        };
        assert!(matches!(
            FontRef::new(&data),
            Err(ReadError::InvalidTtc(tag)) if tag == TTC_HEADER_TAG
        ));
    }

    #[test]
    fn rejects_unknown_magic() {
        let data = be_buffer! {
            0xDEADBEEFu32,  // not a real sfnt version
            0u16,           // num tables
            0u16,           // search range
            0u16,           // entry selector
            0u16            // range shift
        };
        assert!(matches!(
            FontRef::new(&data),
            Err(ReadError::InvalidSfnt(0xDEADBEEF))
        ));
    }

    #[test]
    fn accepts_legacy_apple_magic() {
        let data = be_buffer! {
            (TRUE_SFNT_VERSION),
            0u16,           // num tables
            0u16,           // search range
            0u16,           // entry selector
            0u16            // range shift
        };
        let font = FontRef::new(&data).unwrap();
        assert_eq!(font.table_directory.sfnt_version(), TRUE_SFNT_VERSION);
    }

    #[test]
    fn sorted_table_directory() {
        let cmap_data = [1u8, 2, 3, 4];
        let glyf_data = [5u8, 6, 7, 8, 9, 10];

        let font_data = be_buffer! {
            (TT_SFNT_VERSION),
            2u16,    // num tables
            32u16,   // search range
            1u16,    // entry selector
            0u16,    // range shift

            (Tag::new(b"cmap")),
            0u32,    // checksum
            44u32,   // offset
            (cmap_data.len() as u32),

            (Tag::new(b"glyf")),
            0u32,    // checksum
            48u32,   // offset
            (glyf_data.len() as u32)
        };

        let mut full_font = font_data.to_vec();
        full_font.extend_from_slice(&cmap_data);
        full_font.extend_from_slice(&glyf_data);

        let font = FontRef::new(&full_font).unwrap();

        assert!(font.table_directory_sorted);
        assert_eq!(font.table_directory.num_tables(), 2);
        assert_eq!(
            font.table_data(Tag::new(b"cmap")).unwrap().as_bytes(),
            &cmap_data
        );
        assert_eq!(
            font.table_data(Tag::new(b"glyf")).unwrap().as_bytes(),
            &glyf_data
        );
        assert!(font.table_data(Tag::new(b"loca")).is_none());
    }

    #[test]
    fn unsorted_table_directory() {
        let glyf_data = [5u8, 6, 7, 8, 9, 10];
        let cmap_data = [1u8, 2, 3, 4];

        let font_data = be_buffer! {
            (TT_SFNT_VERSION),
            2u16,    // num tables
            32u16,   // search range
            1u16,    // entry selector
            0u16,    // range shift

            (Tag::new(b"glyf")),
            0u32,    // checksum
            44u32,   // offset
            (glyf_data.len() as u32),

            (Tag::new(b"cmap")),
            0u32,    // checksum
            50u32,   // offset
            (cmap_data.len() as u32)
        };

        let mut full_font = font_data.to_vec();
        full_font.extend_from_slice(&glyf_data);
        full_font.extend_from_slice(&cmap_data);

        let font = FontRef::new(&full_font).unwrap();

        assert!(!font.table_directory_sorted);
        assert_eq!(
            font.table_data(Tag::new(b"glyf")).unwrap().as_bytes(),
            &glyf_data
        );
        assert_eq!(
            font.table_data(Tag::new(b"cmap")).unwrap().as_bytes(),
            &cmap_data
        );
    }

    #[test]
    fn table_length_out_of_bounds() {
        let font_data = be_buffer! {
            (TT_SFNT_VERSION),
            1u16,    // num tables
            16u16,   // search range
            0u16,    // entry selector
            0u16,    // range shift

            (Tag::new(b"head")),
            0u32,    // checksum
            28u32,   // offset
            400u32   // length, past the end of the data
        };
        let font = FontRef::new(&font_data).unwrap();
        assert!(font.table_data(Tag::new(b"head")).is_none());
    }
}
