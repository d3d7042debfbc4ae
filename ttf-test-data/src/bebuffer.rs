//! A buffer for assembling big-endian binary test data.

use std::collections::HashMap;
use std::ops::Deref;

use ttf_types::Scalar;

/// A big-endian byte buffer, for assembling font data by hand.
///
/// Positions of interest can be labelled with a tag while the buffer is
/// built, and patched afterwards when the final layout is known.
#[derive(Debug, Default, Clone)]
pub struct BeBuffer {
    data: Vec<u8>,
    tagged_locations: HashMap<String, usize>,
}

impl BeBuffer {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Write any scalar to the end of this buffer.
    pub fn push(mut self, item: impl Scalar) -> Self {
        self.data.extend_from_slice(item.to_raw().as_ref());
        self
    }

    /// Write any scalar to the end of this buffer, labelling its position
    /// with the provided tag.
    pub fn push_with_tag(mut self, item: impl Scalar, tag: &str) -> Self {
        self.tagged_locations.insert(tag.to_string(), self.data.len());
        self.data.extend_from_slice(item.to_raw().as_ref());
        self
    }

    /// Write multiple scalars to the end of this buffer.
    pub fn extend<T: Scalar>(mut self, iter: impl IntoIterator<Item = T>) -> Self {
        for item in iter {
            self.data.extend_from_slice(item.to_raw().as_ref());
        }
        self
    }

    /// The position of the item with the given tag.
    ///
    /// Panics if the tag is unknown.
    pub fn offset_for(&self, tag: &str) -> usize {
        *self
            .tagged_locations
            .get(tag)
            .unwrap_or_else(|| panic!("no tag {tag:?} in buffer"))
    }

    /// Overwrite the previously written value at the tagged position.
    pub fn write_at<T: Scalar>(&mut self, tag: &str, value: T) {
        let pos = self.offset_for(tag);
        let raw = value.to_raw();
        let bytes = raw.as_ref();
        self.data[pos..pos + bytes.len()].copy_from_slice(bytes);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}

impl Deref for BeBuffer {
    type Target = [u8];
    fn deref(&self) -> &Self::Target {
        &self.data
    }
}

/// Constructs a [`BeBuffer`] from a sequence of big-endian values.
///
/// Each entry is a scalar, an array of scalars, or a scalar labelled with
/// a tag for later patching: `{0u32: "loca_offset"}`.
#[macro_export]
macro_rules! be_buffer {
    (@inner $buffer:ident) => {};
    (@inner $buffer:ident, ) => {};
    (@inner $buffer:ident, {$value:tt: $tag:expr} $($rest:tt)*) => {
        $buffer = $buffer.push_with_tag($value, $tag);
        $crate::be_buffer!(@inner $buffer $($rest)*);
    };
    (@inner $buffer:ident, [$($value:expr),* $(,)?] $($rest:tt)*) => {
        $buffer = $buffer.extend([$($value),*]);
        $crate::be_buffer!(@inner $buffer $($rest)*);
    };
    (@inner $buffer:ident, $value:expr $(, $($rest:tt)*)?) => {
        $buffer = $buffer.push($value);
        $crate::be_buffer!(@inner $buffer $(, $($rest)*)?);
    };
    ($($tokens:tt)*) => {{
        #[allow(unused_mut)]
        let mut buffer = $crate::bebuffer::BeBuffer::new();
        $crate::be_buffer!(@inner buffer, $($tokens)*);
        buffer
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_extend() {
        let buf = BeBuffer::new()
            .push(1u16)
            .push(-2i16)
            .extend([0x01020304u32]);
        assert_eq!(buf.as_slice(), &[0, 1, 0xFF, 0xFE, 1, 2, 3, 4]);
    }

    #[test]
    fn macro_entries() {
        let buf = be_buffer! {
            1u16,           // plain scalar
            [2u16, 3],      // array
            -80i16,         // signed scalar
            (2u8 + 3)       // parenthesized expression
        };
        assert_eq!(buf.as_slice(), &[0, 1, 0, 2, 0, 3, 0xFF, 0xB0, 5]);
    }

    #[test]
    fn tagged_positions() {
        let mut buf = be_buffer! {
            0xFFu8,
            {0u32: "major"},
            [1u16, 2]
        };
        assert_eq!(buf.offset_for("major"), 1);
        buf.write_at("major", 0xAABBCCDDu32);
        assert_eq!(buf.as_slice(), &[0xFF, 0xAA, 0xBB, 0xCC, 0xDD, 0, 1, 0, 2]);
    }
}
