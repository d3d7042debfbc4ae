//! types for working with raw big-endian bytes

/// A trait for types with a known, constant size when encoded in a font.
pub trait FixedSize: Sized {
    /// The raw size of this type, in bytes.
    const RAW_BYTE_LEN: usize;
}

/// A trait for font scalars.
///
/// This is an internal trait for encoding and decoding big-endian bytes.
///
/// You do not need to implement this trait directly; it is an implemention
/// detail of the [`BigEndian`] wrapper.
pub trait Scalar: Copy {
    /// The raw byte representation of this type.
    type Raw: Copy + AsRef<[u8]> + for<'a> TryFrom<&'a [u8]>;

    /// Create an instance of this type from raw big-endian bytes
    fn from_raw(raw: Self::Raw) -> Self;

    /// Encode this type as raw big-endian bytes
    fn to_raw(self) -> Self::Raw;

    /// Attempt to read a scalar from the front of a slice.
    ///
    /// Returns `None` if the slice is shorter than the raw size of the
    /// scalar. Extra bytes at the end are ignored.
    #[inline]
    fn read(slice: &[u8]) -> Option<Self> {
        slice
            .get(..std::mem::size_of::<Self::Raw>())
            .and_then(|bytes| bytes.try_into().ok())
            .map(Self::from_raw)
    }
}

/// A wrapper around raw big-endian bytes for some type.
#[derive(Clone, Copy)]
#[repr(transparent)]
pub struct BigEndian<T: Scalar>(pub(crate) T::Raw);

// SAFETY: BigEndian<T> is a transparent wrapper around T::Raw, which is
// always a plain byte array with an alignment of one, and byte arrays are
// valid for any bit pattern.
unsafe impl<T: Scalar + 'static> bytemuck::Zeroable for BigEndian<T> where
    T::Raw: bytemuck::Zeroable
{
}

// SAFETY: same reasoning as the Zeroable impl above.
unsafe impl<T: Scalar + 'static> bytemuck::AnyBitPattern for BigEndian<T> where
    T::Raw: bytemuck::AnyBitPattern
{
}

impl<T: Scalar> BigEndian<T> {
    /// Create a new `BigEndian` encoding the provided value.
    pub fn new(value: T) -> Self {
        Self(value.to_raw())
    }

    /// Read a copy of this type from raw bytes.
    pub fn get(self) -> T {
        T::from_raw(self.0)
    }

    /// Set the value, overwriting the bytes.
    pub fn set(&mut self, value: T) {
        self.0 = value.to_raw();
    }

    /// The raw big-endian bytes of this value.
    pub fn be_bytes(&self) -> &[u8] {
        self.0.as_ref()
    }
}

impl<T: Scalar> FixedSize for T {
    const RAW_BYTE_LEN: usize = std::mem::size_of::<T::Raw>();
}

impl<T: Scalar> FixedSize for BigEndian<T> {
    const RAW_BYTE_LEN: usize = std::mem::size_of::<T::Raw>();
}

/// An internal macro for implementing the `Scalar` trait on newtypes.
#[macro_export]
macro_rules! newtype_scalar {
    ($name:ident, $raw:ty) => {
        impl $crate::Scalar for $name {
            type Raw = $raw;
            fn to_raw(self) -> $raw {
                self.0.to_raw()
            }

            fn from_raw(raw: $raw) -> Self {
                Self($crate::Scalar::from_raw(raw))
            }
        }
    };
}

macro_rules! int_scalar {
    ($ty:ty, $raw:ty) => {
        impl crate::raw::Scalar for $ty {
            type Raw = $raw;
            fn to_raw(self) -> $raw {
                self.to_be_bytes()
            }

            fn from_raw(raw: $raw) -> $ty {
                Self::from_be_bytes(raw)
            }
        }
    };
}

int_scalar!(u8, [u8; 1]);
int_scalar!(i8, [u8; 1]);
int_scalar!(u16, [u8; 2]);
int_scalar!(i16, [u8; 2]);
int_scalar!(u32, [u8; 4]);
int_scalar!(i32, [u8; 4]);
int_scalar!(i64, [u8; 8]);
int_scalar!(crate::Uint24, [u8; 3]);

impl<T: Scalar + PartialEq> PartialEq for BigEndian<T> {
    fn eq(&self, other: &Self) -> bool {
        self.get() == other.get()
    }
}

impl<T: Scalar + Eq> Eq for BigEndian<T> {}

impl<T: std::fmt::Debug + Scalar> std::fmt::Debug for BigEndian<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.get().fmt(f)
    }
}

impl<T: std::fmt::Display + Scalar> std::fmt::Display for BigEndian<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.get().fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_ints() {
        assert_eq!(0xab12_u16, BigEndian::new(0xab12_u16).get());
        assert_eq!(-1234_i16, BigEndian::new(-1234_i16).get());
        assert_eq!(0xdead_beef_u32, BigEndian::new(0xdead_beef_u32).get());
    }

    #[test]
    fn read_from_slice() {
        let bytes = [0xde, 0xad, 0xbe, 0xef];
        assert_eq!(u16::read(&bytes), Some(0xdead));
        assert_eq!(u32::read(&bytes), Some(0xdead_beef));
        assert_eq!(u32::read(&bytes[1..]), None);
        assert_eq!(i64::read(&bytes), None);
    }

    #[test]
    fn cast_byte_slices() {
        let bytes = [0x00u8, 0x01, 0x00, 0x02, 0x00, 0x03];
        let array: &[BigEndian<u16>] = bytemuck::cast_slice(&bytes);
        let values: Vec<u16> = array.iter().map(|be| be.get()).collect();
        assert_eq!(values, [1, 2, 3]);
    }
}
