//! Traits for interpreting font data

use types::Tag;

use crate::font_data::FontData;

/// A type that can be parsed from raw table data.
///
/// This trait is implemented for all supported tables, and provides the
/// basic mechanism by which we turn sequences of bytes into types.
///
/// Reading is cheap: implementations validate the fixed-size header and
/// record that offsets stay within the provided data, but they do not
/// walk variable-size content (such as glyph point streams) up front.
/// Malformed content in those regions is reported when it is accessed.
pub trait FontRead<'a>: Sized {
    /// Read an instance of `Self` from the provided data, performing
    /// validation.
    fn read(data: FontData<'a>) -> Result<Self, ReadError>;
}

/// A trait for types that require external data in order to be constructed.
///
/// You should not need to implement this trait directly; it is implemented
/// alongside [`FontReadWithArgs`].
pub trait ReadArgs {
    type Args: Copy;
}

/// A trait for tables that require external input.
///
/// This is used for tables where the length or interpretation of the data
/// is stored somewhere other than the table itself, such as `hmtx` (which
/// needs counts from `hhea` and `maxp`) and `loca` (which needs the format
/// flag from `head`).
pub trait FontReadWithArgs<'a>: Sized + ReadArgs {
    /// read an item, using the provided args
    fn read_with_args(data: FontData<'a>, args: &Self::Args) -> Result<Self, ReadError>;
}

// a blanket impl so that the same codepaths can instantiate tables
// regardless of whether they take arguments
impl<'a, T: FontRead<'a>> ReadArgs for T {
    type Args = ();
}

impl<'a, T: FontRead<'a>> FontReadWithArgs<'a> for T {
    fn read_with_args(data: FontData<'a>, _: &Self::Args) -> Result<Self, ReadError> {
        Self::read(data)
    }
}

/// An error that occurs when reading font data
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadError {
    OutOfBounds,
    // i64 is flexible enough to store any value we might encounter
    InvalidFormat(i64),
    InvalidSfnt(u32),
    InvalidTtc(Tag),
    InvalidArrayLen,
    TableIsMissing(Tag),
    MalformedData(&'static str),
}

impl std::fmt::Display for ReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReadError::OutOfBounds => write!(f, "An offset was out of bounds"),
            ReadError::InvalidFormat(x) => write!(f, "Invalid format '{x}'"),
            ReadError::InvalidSfnt(x) => write!(f, "Invalid sfnt version '{x:08X}'"),
            ReadError::InvalidTtc(tag) => write!(f, "Invalid ttc tag {tag}"),
            ReadError::InvalidArrayLen => {
                write!(f, "Specified array length not a multiple of item size")
            }
            ReadError::TableIsMissing(tag) => write!(f, "the {tag} table is missing"),
            ReadError::MalformedData(msg) => write!(f, "Malformed data: '{msg}'"),
        }
    }
}

impl std::error::Error for ReadError {}
