//! The [maxp (Maximum Profile)][maxp] table
//!
//! [maxp]: https://docs.microsoft.com/en-us/typography/opentype/spec/maxp

use crate::{table_provider::TopLevelTable, FontData, FontRead, ReadError};
use types::Tag;

const VERSION_0_5: u32 = 0x00005000;
const VERSION_1_0: u32 = 0x00010000;

/// The [maxp] table.
///
/// [maxp]: https://docs.microsoft.com/en-us/typography/opentype/spec/maxp
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Maxp {
    version: u32,
    num_glyphs: u16,
    profile: Option<MaxpProfile>,
}

/// The additional limits stored in version 1.0 of the [`Maxp`] table.
///
/// Version 0.5, used by CFF fonts, carries only the glyph count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MaxpProfile {
    /// Maximum points in a non-composite glyph.
    pub max_points: u16,
    /// Maximum contours in a non-composite glyph.
    pub max_contours: u16,
    /// Maximum points in a composite glyph.
    pub max_composite_points: u16,
    /// Maximum contours in a composite glyph.
    pub max_composite_contours: u16,
    /// 1 if instructions do not use the twilight zone, 2 otherwise.
    pub max_zones: u16,
    /// Maximum points used in the twilight zone.
    pub max_twilight_points: u16,
    /// Number of Storage Area locations.
    pub max_storage: u16,
    /// Number of FDEFs.
    pub max_function_defs: u16,
    /// Number of IDEFs.
    pub max_instruction_defs: u16,
    /// Maximum stack depth across all programs in the font.
    pub max_stack_elements: u16,
    /// Maximum byte count for glyph instructions.
    pub max_size_of_instructions: u16,
    /// Maximum number of components at the top level of a composite glyph.
    pub max_component_elements: u16,
    /// Maximum level of recursion; 1 for simple components.
    pub max_component_depth: u16,
}

impl TopLevelTable for Maxp {
    const TAG: Tag = Tag::new(b"maxp");
}

impl<'a> FontRead<'a> for Maxp {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let version: u32 = cursor.read()?;
        let num_glyphs = cursor.read()?;
        let profile = match version {
            VERSION_0_5 => None,
            VERSION_1_0 => Some(MaxpProfile {
                max_points: cursor.read()?,
                max_contours: cursor.read()?,
                max_composite_points: cursor.read()?,
                max_composite_contours: cursor.read()?,
                max_zones: cursor.read()?,
                max_twilight_points: cursor.read()?,
                max_storage: cursor.read()?,
                max_function_defs: cursor.read()?,
                max_instruction_defs: cursor.read()?,
                max_stack_elements: cursor.read()?,
                max_size_of_instructions: cursor.read()?,
                max_component_elements: cursor.read()?,
                max_component_depth: cursor.read()?,
            }),
            other => return Err(ReadError::InvalidFormat(other as i64)),
        };
        Ok(Maxp {
            version,
            num_glyphs,
            profile,
        })
    }
}

impl Maxp {
    /// 0x00005000 or 0x00010000.
    pub fn version(&self) -> u32 {
        self.version
    }

    /// The number of glyphs in the font.
    pub fn num_glyphs(&self) -> u16 {
        self.num_glyphs
    }

    /// The version 1.0 limits, if present.
    pub fn profile(&self) -> Option<&MaxpProfile> {
        self.profile.as_ref()
    }
}
