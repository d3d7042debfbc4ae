//! The [name (Naming)](https://docs.microsoft.com/en-us/typography/opentype/spec/name) table

use crate::{table_provider::TopLevelTable, FontData, FontRead, ReadError};
use types::{BigEndian, FixedSize, NameId, Tag};

/// The [name](https://docs.microsoft.com/en-us/typography/opentype/spec/name) table.
#[derive(Clone)]
pub struct Name<'a> {
    version: u16,
    count: u16,
    storage_offset: u16,
    name_records: &'a [NameRecord],
    data: FontData<'a>,
}

impl TopLevelTable for Name<'_> {
    const TAG: Tag = Tag::new(b"name");
}

impl<'a> FontRead<'a> for Name<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version = cursor.read()?;
        let count: u16 = cursor.read()?;
        let storage_offset = cursor.read()?;
        let name_records = cursor.read_array(count as usize)?;
        // version 1 language tag records follow the name records and are
        // not needed to resolve strings
        Ok(Name {
            version,
            count,
            storage_offset,
            name_records,
            data,
        })
    }
}

impl<'a> Name<'a> {
    pub fn version(&self) -> u16 {
        self.version
    }

    pub fn count(&self) -> u16 {
        self.count
    }

    /// Offset of the string storage area from the start of the table.
    pub fn storage_offset(&self) -> u16 {
        self.storage_offset
    }

    pub fn name_records(&self) -> &'a [NameRecord] {
        self.name_records
    }

    /// The FontData containing the encoded name strings.
    pub fn string_data(&self) -> FontData<'a> {
        self.data
            .split_off(self.storage_offset as usize)
            .unwrap_or_default()
    }

    /// Returns the best record for the given identifier, decoded.
    ///
    /// Windows platform records in the Unicode BMP encoding are preferred;
    /// otherwise the first record with a decodable encoding wins.
    pub fn string_for_id(&self, name_id: NameId) -> Option<NameString<'a>> {
        let mut candidates = self
            .name_records
            .iter()
            .filter(|record| record.name_id() == name_id);
        let record = candidates
            .clone()
            .find(|record| record.platform_id() == 3 && record.encoding_id() == 1)
            .or_else(|| {
                candidates.find(|record| {
                    Encoding::new(record.platform_id(), record.encoding_id()) != Encoding::Unknown
                })
            })?;
        record.string(self.string_data()).ok()
    }
}

/// Identifies a string in the storage area and how it is encoded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, bytemuck::AnyBitPattern)]
#[repr(C)]
pub struct NameRecord {
    /// Platform identifier.
    pub platform_id: BigEndian<u16>,
    /// Platform specific encoding identifier.
    pub encoding_id: BigEndian<u16>,
    /// Language identifier.
    pub language_id: BigEndian<u16>,
    /// Name identifier.
    pub name_id: BigEndian<NameId>,
    /// Length of the string, in bytes.
    pub length: BigEndian<u16>,
    /// Offset of the string from the start of the storage area.
    pub string_offset: BigEndian<u16>,
}

impl NameRecord {
    pub fn platform_id(&self) -> u16 {
        self.platform_id.get()
    }

    pub fn encoding_id(&self) -> u16 {
        self.encoding_id.get()
    }

    pub fn language_id(&self) -> u16 {
        self.language_id.get()
    }

    pub fn name_id(&self) -> NameId {
        self.name_id.get()
    }

    pub fn length(&self) -> u16 {
        self.length.get()
    }

    pub fn string_offset(&self) -> u16 {
        self.string_offset.get()
    }

    /// Return a type that can decode the string data for this name entry.
    pub fn string<'a>(&self, data: FontData<'a>) -> Result<NameString<'a>, ReadError> {
        let start = self.string_offset() as usize;
        let end = start + self.length() as usize;
        let data = data
            .as_bytes()
            .get(start..end)
            .ok_or(ReadError::OutOfBounds)?;
        let encoding = Encoding::new(self.platform_id(), self.encoding_id());
        Ok(NameString { data, encoding })
    }
}

impl FixedSize for NameRecord {
    const RAW_BYTE_LEN: usize = 5 * u16::RAW_BYTE_LEN + NameId::RAW_BYTE_LEN;
}

/// Entry for a name in the naming table.
///
/// This provides an iterator over characters.
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct NameString<'a> {
    data: &'a [u8],
    encoding: Encoding,
}

impl<'a> NameString<'a> {
    /// An iterator over the `char`s in this name.
    pub fn chars(&self) -> CharIter<'a> {
        CharIter {
            data: self.data,
            encoding: self.encoding,
            pos: 0,
        }
    }
}

impl<'a> IntoIterator for NameString<'a> {
    type Item = char;
    type IntoIter = CharIter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.chars()
    }
}

impl std::fmt::Display for NameString<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for c in self.chars() {
            c.fmt(f)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for NameString<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "\"{self}\"")
    }
}

/// An iterator over the chars of a name record.
#[derive(Clone)]
pub struct CharIter<'a> {
    data: &'a [u8],
    encoding: Encoding,
    pos: usize,
}

impl CharIter<'_> {
    fn bump_u16(&mut self) -> Option<u16> {
        let result = self
            .data
            .get(self.pos..self.pos + 2)
            .map(|x| u16::from_be_bytes(x.try_into().unwrap()))?;
        self.pos += 2;
        Some(result)
    }

    fn bump_u8(&mut self) -> Option<u8> {
        let result = self.data.get(self.pos)?;
        self.pos += 1;
        Some(*result)
    }
}

impl Iterator for CharIter<'_> {
    type Item = char;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.data.len() {
            return None;
        }
        let rep = core::char::REPLACEMENT_CHARACTER;
        let raw_c = match self.encoding {
            Encoding::Utf16Be => {
                let c1 = self.bump_u16()? as u32;
                if (0xD800..0xDC00).contains(&c1) {
                    let Some(c2) = self.bump_u16() else {
                        return Some(rep);
                    };
                    ((c1 & 0x3FF) << 10) + (c2 as u32 & 0x3FF) + 0x10000
                } else {
                    c1
                }
            }
            Encoding::MacRoman => {
                let c = self.bump_u8()?;
                MacRomanMapping.decode(c) as u32
            }
            _ => return None,
        };
        Some(std::char::from_u32(raw_c).unwrap_or(rep))
    }
}

/// The encoding used by the name table.
#[derive(Copy, Clone, PartialEq, Eq)]
pub enum Encoding {
    Utf16Be,
    MacRoman,
    Unknown,
}

impl Encoding {
    /// Determine the coding from the platform and encoding id.
    pub fn new(platform_id: u16, encoding_id: u16) -> Encoding {
        match (platform_id, encoding_id) {
            (0, _) => Encoding::Utf16Be,
            (1, 0) => Encoding::MacRoman,
            (3, 0) => Encoding::Utf16Be,
            (3, 1) => Encoding::Utf16Be,
            (3, 10) => Encoding::Utf16Be,
            _ => Encoding::Unknown,
        }
    }
}

/// A helper for decoding Mac OS Roman encoded strings.
pub struct MacRomanMapping;

impl MacRomanMapping {
    const START_REMAP: u8 = 128;

    /// Convert from a mac-roman encoded byte to a `char`
    pub fn decode(self, raw: u8) -> char {
        if raw < Self::START_REMAP {
            raw as char
        } else {
            let idx = raw - Self::START_REMAP;
            char::from_u32(MAC_ROMAN_DECODE[idx as usize] as u32).unwrap()
        }
    }
}

/// a lookup table for the Mac Roman encoding. this matches the values 128..=255
/// to specific unicode values.
#[rustfmt::skip]
static MAC_ROMAN_DECODE: [u16; 128] = [
    196, 197, 199, 201, 209, 214, 220, 225, 224, 226, 228, 227, 229, 231, 233,
    232, 234, 235, 237, 236, 238, 239, 241, 243, 242, 244, 246, 245, 250, 249,
    251, 252, 8224, 176, 162, 163, 167, 8226, 182, 223, 174, 169, 8482, 180,
    168, 8800, 198, 216, 8734, 177, 8804, 8805, 165, 181, 8706, 8721, 8719,
    960, 8747, 170, 186, 937, 230, 248, 191, 161, 172, 8730, 402, 8776, 8710,
    171, 187, 8230, 160, 192, 195, 213, 338, 339, 8211, 8212, 8220, 8221, 8216,
    8217, 247, 9674, 255, 376, 8260, 8364, 8249, 8250, 64257, 64258, 8225, 183,
    8218, 8222, 8240, 194, 202, 193, 203, 200, 205, 206, 207, 204, 211, 212,
    63743, 210, 218, 219, 217, 305, 710, 732, 175, 728, 729, 730, 184, 733,
    731, 711,
];

#[cfg(test)]
mod tests {
    use super::*;
    use ttf_test_data::be_buffer;

    fn sample_name() -> Vec<u8> {
        let buf = be_buffer! {
            0u16,   // version
            2u16,   // count
            30u16,  // storage offset: 6 byte header + two 12 byte records
            // mac record for the full name
            [1u16, 0],  // platform, encoding
            0u16,       // language
            4u16,       // name id
            6u16,       // length
            0u16,       // string offset
            // windows record for the full name
            [3u16, 1],      // platform, encoding
            0x409u16,       // language
            4u16,           // name id
            22u16,          // length
            6u16,           // string offset
            // storage: "Müller" in mac-roman
            [0x4Du8, 0x9F, 0x6C, 0x6C, 0x65, 0x72],
            // storage: "Teikna Sans" in UTF-16BE
            [0x0054u16, 0x0065, 0x0069, 0x006B, 0x006E, 0x0061, 0x0020, 0x0053, 0x0061, 0x006E, 0x0073]
        };
        buf.to_vec()
    }

    #[test]
    fn smoke_test() {
        let data = sample_name();
        let name = Name::read(FontData::new(&data)).unwrap();
        assert_eq!(name.version(), 0);
        assert_eq!(name.count(), 2);
        assert_eq!(name.name_records().len(), 2);
        assert_eq!(name.name_records()[1].language_id(), 0x409);
        assert_eq!(name.name_records()[1].name_id(), NameId::FULL_NAME);
    }

    #[test]
    fn prefers_windows_unicode() {
        let data = sample_name();
        let name = Name::read(FontData::new(&data)).unwrap();
        let full_name = name.string_for_id(NameId::FULL_NAME).unwrap();
        assert_eq!(full_name.to_string(), "Teikna Sans");
    }

    #[test]
    fn decodes_mac_roman() {
        let data = sample_name();
        let name = Name::read(FontData::new(&data)).unwrap();
        let record = name.name_records()[0];
        let string = record.string(name.string_data()).unwrap();
        assert_eq!(string.to_string(), "Müller");
    }

    #[test]
    fn missing_name_id() {
        let data = sample_name();
        let name = Name::read(FontData::new(&data)).unwrap();
        assert!(name.string_for_id(NameId::POSTSCRIPT_NAME).is_none());
    }

    #[test]
    fn string_out_of_bounds() {
        let mut data = sample_name();
        // truncate into the storage area
        data.truncate(34);
        let name = Name::read(FontData::new(&data)).unwrap();
        let record = name.name_records()[1];
        assert!(matches!(
            record.string(name.string_data()),
            Err(ReadError::OutOfBounds)
        ));
    }

    #[test]
    fn surrogate_pairs() {
        let chars = CharIter {
            // MUSICAL SYMBOL G CLEF (U+1D11E)
            data: &[0xD8, 0x34, 0xDD, 0x1E],
            encoding: Encoding::Utf16Be,
            pos: 0,
        };
        assert!(chars.eq(['𝄞'].into_iter()));
    }

    #[test]
    fn lone_surrogate_at_end() {
        let chars = CharIter {
            data: &[0x00, 0x41, 0xD8, 0x00],
            encoding: Encoding::Utf16Be,
            pos: 0,
        };
        assert!(chars.eq(['A', std::char::REPLACEMENT_CHARACTER].into_iter()));
    }
}
