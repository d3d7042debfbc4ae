//! raw font bytes

use std::ops::{Range, RangeBounds};

use types::{FixedSize, Scalar};

use crate::read::{FontReadWithArgs, ReadError};

/// A reference to raw binary font data.
///
/// This is a wrapper around a byte slice, that provides convenience methods
/// for parsing and validating that data.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontData<'a> {
    bytes: &'a [u8],
}

/// A cursor for validating bytes during parsing.
///
/// This type improves the ergonomics of parsing sequential fields: each
/// read advances the position, and out of bounds reads are reported as
/// errors instead of panicking.
#[derive(Clone)]
pub(crate) struct Cursor<'a> {
    pos: usize,
    data: FontData<'a>,
}

impl<'a> FontData<'a> {
    /// Empty data, useful for some tests and examples
    pub const EMPTY: FontData<'static> = FontData { bytes: &[] };

    /// Create a new `FontData` with the provided bytes.
    pub const fn new(bytes: &'a [u8]) -> Self {
        FontData { bytes }
    }

    /// The length of the data, in bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` if the data has a length of zero bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns self[pos..], or `None` if the position is out of bounds.
    pub fn split_off(&self, pos: usize) -> Option<FontData<'a>> {
        self.bytes.get(pos..).map(|bytes| FontData { bytes })
    }

    /// Returns the data in the provided range, or `None` if any part of the
    /// range is out of bounds.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Option<FontData<'a>> {
        let bounds = (range.start_bound().cloned(), range.end_bound().cloned());
        self.bytes.get(bounds).map(|bytes| FontData { bytes })
    }

    /// Read a scalar at the provided location in the data.
    pub fn read_at<T: Scalar>(&self, offset: usize) -> Result<T, ReadError> {
        self.bytes
            .get(offset..)
            .and_then(T::read)
            .ok_or(ReadError::OutOfBounds)
    }

    /// Read a type that requires external arguments, from the provided range.
    pub fn read_with_args<T>(&self, range: Range<usize>, args: &T::Args) -> Result<T, ReadError>
    where
        T: FontReadWithArgs<'a>,
    {
        self.slice(range)
            .ok_or(ReadError::OutOfBounds)
            .and_then(|data| T::read_with_args(data, args))
    }

    fn check_in_bounds(&self, offset: usize) -> Result<(), ReadError> {
        if offset <= self.bytes.len() {
            Ok(())
        } else {
            Err(ReadError::OutOfBounds)
        }
    }

    /// Interpret the bytes in the provided range as a slice of `T`.
    ///
    /// The range must be fully in bounds, and its length must be a multiple
    /// of the size of `T`. All of our record types have alignment one, so
    /// the cast itself cannot fail on alignment.
    pub fn read_array<T: bytemuck::AnyBitPattern + FixedSize>(
        &self,
        range: Range<usize>,
    ) -> Result<&'a [T], ReadError> {
        let bytes = self.bytes.get(range).ok_or(ReadError::OutOfBounds)?;
        if bytes.len() % T::RAW_BYTE_LEN != 0 {
            return Err(ReadError::InvalidArrayLen);
        }
        bytemuck::try_cast_slice(bytes).map_err(|_| ReadError::InvalidArrayLen)
    }

    pub(crate) fn cursor(&self) -> Cursor<'a> {
        Cursor {
            pos: 0,
            data: *self,
        }
    }

    /// Return the data as a byte slice
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }
}

impl<'a> Cursor<'a> {
    pub(crate) fn advance<T: Scalar>(&mut self) {
        self.pos += T::RAW_BYTE_LEN;
    }

    pub(crate) fn advance_by(&mut self, n_bytes: usize) {
        self.pos += n_bytes;
    }

    /// Read a scalar and advance the cursor.
    pub(crate) fn read<T: Scalar>(&mut self) -> Result<T, ReadError> {
        let temp = self.data.read_at(self.pos);
        self.pos += T::RAW_BYTE_LEN;
        temp
    }

    /// Read an array of `n_elems` and advance the cursor.
    pub(crate) fn read_array<T: bytemuck::AnyBitPattern + FixedSize>(
        &mut self,
        n_elems: usize,
    ) -> Result<&'a [T], ReadError> {
        let len = n_elems * T::RAW_BYTE_LEN;
        let temp = self.data.read_array(self.pos..self.pos + len);
        self.pos += len;
        temp
    }

    /// The current position, or an error if we are out of bounds.
    pub(crate) fn position(&self) -> Result<usize, ReadError> {
        self.data.check_in_bounds(self.pos).map(|_| self.pos)
    }

    /// The number of bytes remaining after the current position.
    pub(crate) fn remaining_bytes(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// The data after the current position, or `None` if we are out of
    /// bounds.
    pub(crate) fn remaining(self) -> Option<FontData<'a>> {
        self.data.split_off(self.pos)
    }
}

#[cfg(test)]
mod tests {
    use types::{BigEndian, FWord, Tag};

    use super::*;

    #[test]
    fn read_at_scalars() {
        let data = FontData::new(&[0x00, 0x02, 0xff, 0xfe, b'g', b'l', b'y', b'f']);
        assert_eq!(data.read_at::<u16>(0).unwrap(), 2);
        assert_eq!(data.read_at::<i16>(2).unwrap(), -2);
        assert_eq!(data.read_at::<Tag>(4).unwrap(), Tag::new(b"glyf"));
        assert_eq!(data.read_at::<u32>(6), Err(ReadError::OutOfBounds));
    }

    #[test]
    fn slicing() {
        let data = FontData::new(&[0, 1, 2, 3, 4]);
        assert_eq!(data.split_off(2).unwrap().as_bytes(), &[2, 3, 4]);
        assert_eq!(data.slice(1..3).unwrap().as_bytes(), &[1, 2]);
        assert_eq!(data.slice(..2).unwrap().as_bytes(), &[0, 1]);
        assert!(data.split_off(6).is_none());
        assert!(data.slice(3..9).is_none());
    }

    #[test]
    fn array_cast() {
        let data = FontData::new(&[0x00, 0x01, 0x00, 0x02, 0x00, 0x03]);
        let array = data.read_array::<BigEndian<u16>>(0..6).unwrap();
        let values = array.iter().map(|x| x.get()).collect::<Vec<_>>();
        assert_eq!(values, [1, 2, 3]);
        assert_eq!(
            data.read_array::<BigEndian<u32>>(0..6),
            Err(ReadError::InvalidArrayLen)
        );
    }

    #[test]
    fn cursor_walk() {
        let data = FontData::new(&[0x00, 0x05, 0xff, 0xf6, 0x00, 0x01, 0x00, 0x02]);
        let mut cursor = data.cursor();
        assert_eq!(cursor.read::<u16>().unwrap(), 5);
        assert_eq!(cursor.read::<FWord>().unwrap(), FWord::new(-10));
        let rest = cursor.read_array::<BigEndian<u16>>(2).unwrap();
        assert_eq!(rest[1].get(), 2);
        assert_eq!(cursor.remaining_bytes(), 0);
        assert!(cursor.read::<u8>().is_err());
        assert!(cursor.position().is_err());
    }
}
