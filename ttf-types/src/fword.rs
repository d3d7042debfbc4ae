//! 16-bit signed and unsigned quantities in font design units

/// A 16-bit signed quantity in font design units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FWord(i16);

impl FWord {
    /// Construct a new `FWord` from font units.
    pub const fn new(raw: i16) -> Self {
        Self(raw)
    }

    /// The value in font units, as an i16.
    pub const fn to_i16(self) -> i16 {
        self.0
    }
}

/// A 16-bit unsigned quantity in font design units.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UfWord(u16);

impl UfWord {
    /// Construct a new `UfWord` from font units.
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    /// The value in font units, as a u16.
    pub const fn to_u16(self) -> u16 {
        self.0
    }
}

crate::newtype_scalar!(FWord, [u8; 2]);
crate::newtype_scalar!(UfWord, [u8; 2]);

impl std::fmt::Display for FWord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::fmt::Display for UfWord {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
