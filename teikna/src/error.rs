//! Error types associated with tessellation.

use std::fmt;

pub use read_ttf::ReadError;

/// Errors that may occur when tessellating a font.
///
/// Damage confined to a single glyph is not an error: the glyph is
/// marked invalid and reported through the build diagnostics instead.
#[derive(Clone, Debug)]
pub enum DrawError {
    /// The font has no character map this crate can use.
    NoUsableCmap,
    /// The sampling step was outside the half-open unit interval.
    InvalidStep(f32),
    /// Error occurred when reading font data.
    Read(ReadError),
}

impl From<ReadError> for DrawError {
    fn from(e: ReadError) -> Self {
        Self::Read(e)
    }
}

impl fmt::Display for DrawError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::NoUsableCmap => {
                write!(f, "No usable character map is available for the given font")
            }
            Self::InvalidStep(step) => {
                write!(f, "Invalid sampling step {step}, must be in (0, 1]")
            }
            Self::Read(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for DrawError {}
