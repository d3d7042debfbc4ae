//! The [glyf (Glyph Data)][glyf] table
//!
//! [glyf]: https://docs.microsoft.com/en-us/typography/opentype/spec/glyf

use crate::{
    font_data::Cursor, table_provider::TopLevelTable, FontData, FontRead, ReadError,
};
use types::{BigEndian, F2Dot14, GlyphId, Scalar, Tag};

/// The [glyf] table.
///
/// The table itself is an undifferentiated blob of glyph data; individual
/// glyphs are located with the offsets in the `loca` table.
///
/// [glyf]: https://docs.microsoft.com/en-us/typography/opentype/spec/glyf
#[derive(Clone, Debug)]
pub struct Glyf<'a> {
    data: FontData<'a>,
}

impl TopLevelTable for Glyf<'_> {
    const TAG: Tag = Tag::new(b"glyf");
}

impl<'a> FontRead<'a> for Glyf<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        Ok(Glyf { data })
    }
}

impl<'a> Glyf<'a> {
    /// The raw table data. Offsets from the `loca` table index into this.
    pub fn offset_data(&self) -> FontData<'a> {
        self.data
    }
}

macro_rules! field_getter {
    ($field:ident, $ty:ty) => {
        pub fn $field(&self) -> $ty {
            match self {
                Self::Simple(glyph) => glyph.$field(),
                Self::Composite(glyph) => glyph.$field(),
            }
        }
    };
}

/// A simple or composite glyph.
#[derive(Clone)]
pub enum Glyph<'a> {
    Simple(SimpleGlyph<'a>),
    Composite(CompositeGlyph<'a>),
}

impl<'a> FontRead<'a> for Glyph<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let number_of_contours: i16 = data.read_at(0)?;
        if number_of_contours >= 0 {
            SimpleGlyph::read(data).map(Glyph::Simple)
        } else {
            CompositeGlyph::read(data).map(Glyph::Composite)
        }
    }
}

impl<'a> Glyph<'a> {
    field_getter!(number_of_contours, i16);
    field_getter!(x_min, i16);
    field_getter!(y_min, i16);
    field_getter!(x_max, i16);
    field_getter!(y_max, i16);
}

/// A glyph whose outline is stored directly as contours of points.
#[derive(Clone)]
pub struct SimpleGlyph<'a> {
    number_of_contours: i16,
    x_min: i16,
    y_min: i16,
    x_max: i16,
    y_max: i16,
    end_pts_of_contours: &'a [BigEndian<u16>],
    instructions: &'a [u8],
    glyph_data: &'a [u8],
}

impl<'a> FontRead<'a> for SimpleGlyph<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let number_of_contours: i16 = cursor.read()?;
        if number_of_contours < 0 {
            return Err(ReadError::InvalidFormat(number_of_contours as i64));
        }
        let x_min = cursor.read()?;
        let y_min = cursor.read()?;
        let x_max = cursor.read()?;
        let y_max = cursor.read()?;
        let end_pts_of_contours = cursor.read_array(number_of_contours as usize)?;
        let instruction_length: u16 = cursor.read()?;
        let instructions = cursor.read_array(instruction_length as usize)?;
        let glyph_data = cursor.remaining().ok_or(ReadError::OutOfBounds)?.as_bytes();
        Ok(SimpleGlyph {
            number_of_contours,
            x_min,
            y_min,
            x_max,
            y_max,
            end_pts_of_contours,
            instructions,
            glyph_data,
        })
    }
}

impl<'a> SimpleGlyph<'a> {
    pub fn number_of_contours(&self) -> i16 {
        self.number_of_contours
    }

    /// Minimum x for coordinate data.
    pub fn x_min(&self) -> i16 {
        self.x_min
    }

    /// Minimum y for coordinate data.
    pub fn y_min(&self) -> i16 {
        self.y_min
    }

    /// Maximum x for coordinate data.
    pub fn x_max(&self) -> i16 {
        self.x_max
    }

    /// Maximum y for coordinate data.
    pub fn y_max(&self) -> i16 {
        self.y_max
    }

    /// The highest point index in each contour, in increasing order.
    pub fn end_pts_of_contours(&self) -> &'a [BigEndian<u16>] {
        self.end_pts_of_contours
    }

    /// The TrueType interpreter instructions for this glyph.
    pub fn instructions(&self) -> &'a [u8] {
        self.instructions
    }

    /// The raw flag and coordinate data following the instructions.
    pub fn glyph_data(&self) -> &'a [u8] {
        self.glyph_data
    }

    /// Returns the total number of points.
    pub fn num_points(&self) -> usize {
        self.end_pts_of_contours
            .last()
            .map(|last| last.get() as usize + 1)
            .unwrap_or(0)
    }

    /// Returns an iterator over the points in the glyph.
    ///
    /// Flags are run length encoded and coordinates are stored as deltas,
    /// so the iterator decodes as it goes. A malformed point stream ends
    /// the iteration early; callers that need to distinguish this case
    /// should compare the yielded count against [num_points](Self::num_points).
    pub fn points(&self) -> impl Iterator<Item = CurvePoint> + 'a + Clone {
        self.points_impl()
            .unwrap_or_else(|| PointIter::new(&[], &[], &[]))
    }

    fn points_impl(&self) -> Option<PointIter<'a>> {
        let end_points = self.end_pts_of_contours;
        let n_points = end_points.last()?.get().checked_add(1)?;
        let data = self.glyph_data;
        let lens = resolve_coords_len(data, n_points).ok()?;
        let total_len = lens.flags + lens.x_coords + lens.y_coords;
        if data.len() < total_len as usize {
            return None;
        }

        let (flags, data) = data.split_at(lens.flags as usize);
        let (x_coords, y_coords) = data.split_at(lens.x_coords as usize);

        Some(PointIter::new(flags, x_coords, y_coords))
    }
}

/// Point with an associated on-curve flag in a simple glyph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CurvePoint {
    /// X coordinate.
    pub x: i16,
    /// Y coordinate.
    pub y: i16,
    /// True if this is an on-curve point.
    pub on_curve: bool,
}

impl CurvePoint {
    /// Construct a new `CurvePoint`
    pub fn new(x: i16, y: i16, on_curve: bool) -> Self {
        Self { x, y, on_curve }
    }

    /// Convenience method to construct an on-curve point
    pub fn on_curve(x: i16, y: i16) -> Self {
        Self::new(x, y, true)
    }

    /// Convenience method to construct an off-curve point
    pub fn off_curve(x: i16, y: i16) -> Self {
        Self::new(x, y, false)
    }
}

#[derive(Clone)]
struct PointIter<'a> {
    flags: Cursor<'a>,
    x_coords: Cursor<'a>,
    y_coords: Cursor<'a>,
    flag_repeats: u8,
    cur_flags: SimpleGlyphFlags,
    cur_x: i16,
    cur_y: i16,
}

impl<'a> Iterator for PointIter<'a> {
    type Item = CurvePoint;
    fn next(&mut self) -> Option<Self::Item> {
        self.advance_flags()?;
        self.advance_points();
        let is_on_curve = self.cur_flags.contains(SimpleGlyphFlags::ON_CURVE_POINT);
        Some(CurvePoint::new(self.cur_x, self.cur_y, is_on_curve))
    }
}

impl<'a> PointIter<'a> {
    fn new(flags: &'a [u8], x_coords: &'a [u8], y_coords: &'a [u8]) -> Self {
        Self {
            flags: FontData::new(flags).cursor(),
            x_coords: FontData::new(x_coords).cursor(),
            y_coords: FontData::new(y_coords).cursor(),
            flag_repeats: 0,
            cur_flags: SimpleGlyphFlags::empty(),
            cur_x: 0,
            cur_y: 0,
        }
    }

    fn advance_flags(&mut self) -> Option<()> {
        if self.flag_repeats == 0 {
            self.cur_flags = SimpleGlyphFlags::from_bits_truncate(self.flags.read().ok()?);
            self.flag_repeats = self
                .cur_flags
                .contains(SimpleGlyphFlags::REPEAT_FLAG)
                .then(|| self.flags.read().ok())
                .flatten()
                .unwrap_or(0)
                + 1;
        }
        self.flag_repeats -= 1;
        Some(())
    }

    fn advance_points(&mut self) {
        let x_short = self.cur_flags.contains(SimpleGlyphFlags::X_SHORT_VECTOR);
        let x_same_or_pos = self
            .cur_flags
            .contains(SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR);
        let y_short = self.cur_flags.contains(SimpleGlyphFlags::Y_SHORT_VECTOR);
        let y_same_or_pos = self
            .cur_flags
            .contains(SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR);

        let delta_x = match (x_short, x_same_or_pos) {
            (true, false) => -(self.x_coords.read::<u8>().unwrap_or(0) as i16),
            (true, true) => self.x_coords.read::<u8>().unwrap_or(0) as i16,
            (false, false) => self.x_coords.read::<i16>().unwrap_or(0),
            _ => 0,
        };

        let delta_y = match (y_short, y_same_or_pos) {
            (true, false) => -(self.y_coords.read::<u8>().unwrap_or(0) as i16),
            (true, true) => self.y_coords.read::<u8>().unwrap_or(0) as i16,
            (false, false) => self.y_coords.read::<i16>().unwrap_or(0),
            _ => 0,
        };

        self.cur_x = self.cur_x.wrapping_add(delta_x);
        self.cur_y = self.cur_y.wrapping_add(delta_y);
    }
}

/// Resolves the lengths of the flag and coordinate arrays.
///
/// The lengths depend on the flag runs, so we have to process all of the
/// flags to find them.
fn resolve_coords_len(data: &[u8], points_total: u16) -> Result<FieldLengths, ReadError> {
    let mut cursor = FontData::new(data).cursor();
    let mut flags_left = u32::from(points_total);
    let mut x_coords_len = 0u32;
    let mut y_coords_len = 0u32;
    while flags_left > 0 {
        let flags: SimpleGlyphFlags = cursor.read()?;

        // The number of times the flag repeats, including the first.
        let repeats = if flags.contains(SimpleGlyphFlags::REPEAT_FLAG) {
            let repeats: u8 = cursor.read()?;
            u32::from(repeats) + 1
        } else {
            1
        };

        if repeats > flags_left {
            return Err(ReadError::MalformedData("repeat count too large in glyf"));
        }

        if flags.contains(SimpleGlyphFlags::X_SHORT_VECTOR) {
            x_coords_len += repeats;
        } else if !flags.contains(SimpleGlyphFlags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR) {
            x_coords_len += repeats * 2;
        }

        if flags.contains(SimpleGlyphFlags::Y_SHORT_VECTOR) {
            y_coords_len += repeats;
        } else if !flags.contains(SimpleGlyphFlags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR) {
            y_coords_len += repeats * 2;
        }

        flags_left -= repeats;
    }

    Ok(FieldLengths {
        flags: cursor.position()? as u32,
        x_coords: x_coords_len,
        y_coords: y_coords_len,
    })
}

struct FieldLengths {
    flags: u32,
    x_coords: u32,
    y_coords: u32,
}

/// Flags for a point in a simple glyph.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct SimpleGlyphFlags(u8);

impl SimpleGlyphFlags {
    /// Bit 0: point is on the curve.
    pub const ON_CURVE_POINT: Self = Self(0x01);

    /// Bit 1: the x coordinate delta is one byte.
    pub const X_SHORT_VECTOR: Self = Self(0x02);

    /// Bit 2: the y coordinate delta is one byte.
    pub const Y_SHORT_VECTOR: Self = Self(0x04);

    /// Bit 3: the next byte is a repeat count for this flag.
    pub const REPEAT_FLAG: Self = Self(0x08);

    /// Bit 4: for a short x delta, the sign; otherwise, x is unchanged.
    pub const X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR: Self = Self(0x10);

    /// Bit 5: for a short y delta, the sign; otherwise, y is unchanged.
    pub const Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR: Self = Self(0x20);

    const MASK: u8 = 0x3F;

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Creates flags from the given bits, discarding the reserved ones.
    pub const fn from_bits_truncate(bits: u8) -> Self {
        Self(bits & Self::MASK)
    }

    /// Returns true if all of the bits in `other` are set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for SimpleGlyphFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl std::fmt::Debug for SimpleGlyphFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "SimpleGlyphFlags({:#04x})", self.0)
    }
}

impl Scalar for SimpleGlyphFlags {
    type Raw = [u8; 1];

    fn from_raw(raw: Self::Raw) -> Self {
        Self(raw[0])
    }

    fn to_raw(self) -> Self::Raw {
        [self.0]
    }
}

/// A glyph assembled from transformed copies of other glyphs.
#[derive(Clone)]
pub struct CompositeGlyph<'a> {
    number_of_contours: i16,
    x_min: i16,
    y_min: i16,
    x_max: i16,
    y_max: i16,
    component_data: &'a [u8],
}

impl<'a> FontRead<'a> for CompositeGlyph<'a> {
    fn read(data: FontData<'a>) -> Result<Self, ReadError> {
        let mut cursor = data.cursor();
        let number_of_contours: i16 = cursor.read()?;
        if number_of_contours >= 0 {
            return Err(ReadError::InvalidFormat(number_of_contours as i64));
        }
        let x_min = cursor.read()?;
        let y_min = cursor.read()?;
        let x_max = cursor.read()?;
        let y_max = cursor.read()?;
        let component_data = cursor.remaining().ok_or(ReadError::OutOfBounds)?.as_bytes();
        Ok(CompositeGlyph {
            number_of_contours,
            x_min,
            y_min,
            x_max,
            y_max,
            component_data,
        })
    }
}

impl<'a> CompositeGlyph<'a> {
    pub fn number_of_contours(&self) -> i16 {
        self.number_of_contours
    }

    /// Minimum x for coordinate data.
    pub fn x_min(&self) -> i16 {
        self.x_min
    }

    /// Minimum y for coordinate data.
    pub fn y_min(&self) -> i16 {
        self.y_min
    }

    /// Maximum x for coordinate data.
    pub fn x_max(&self) -> i16 {
        self.x_max
    }

    /// Maximum y for coordinate data.
    pub fn y_max(&self) -> i16 {
        self.y_max
    }

    /// Returns an iterator over the components of the composite glyph.
    ///
    /// Iteration stops at the first component without the
    /// `MORE_COMPONENTS` flag, or early if the data is malformed.
    pub fn components(&self) -> impl Iterator<Item = Component> + 'a + Clone {
        ComponentIter {
            done: false,
            cursor: FontData::new(self.component_data).cursor(),
        }
    }
}

/// A reference to another glyph. Part of [CompositeGlyph].
#[derive(Clone, Debug)]
pub struct Component {
    /// Component flags.
    pub flags: CompositeGlyphFlags,
    /// Glyph identifier.
    pub glyph: GlyphId,
    /// Anchor for component placement.
    pub anchor: Anchor,
    /// Component transformation matrix.
    pub transform: Transform,
}

/// Anchor position for a composite component.
#[derive(Clone, Copy, Debug)]
pub enum Anchor {
    /// An offset in font units.
    Offset { x: i16, y: i16 },
    /// Align a numbered point in the base glyph with one in the component.
    Point { base: u16, component: u16 },
}

/// Transform for a composite component.
#[derive(Clone, Debug)]
pub struct Transform {
    /// X scale factor.
    pub xx: F2Dot14,
    /// YX skew factor.
    pub yx: F2Dot14,
    /// XY skew factor.
    pub xy: F2Dot14,
    /// Y scale factor.
    pub yy: F2Dot14,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            xx: F2Dot14::from_f32(1.0),
            yx: F2Dot14::from_f32(0.0),
            xy: F2Dot14::from_f32(0.0),
            yy: F2Dot14::from_f32(1.0),
        }
    }
}

#[derive(Clone)]
struct ComponentIter<'a> {
    done: bool,
    cursor: Cursor<'a>,
}

impl Iterator for ComponentIter<'_> {
    type Item = Component;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let flags: CompositeGlyphFlags = self.cursor.read().ok()?;
        let glyph = self.cursor.read::<GlyphId>().ok()?;
        let args_are_words = flags.contains(CompositeGlyphFlags::ARG_1_AND_2_ARE_WORDS);
        let args_are_xy_values = flags.contains(CompositeGlyphFlags::ARGS_ARE_XY_VALUES);
        let anchor = match (args_are_xy_values, args_are_words) {
            (true, true) => Anchor::Offset {
                x: self.cursor.read().ok()?,
                y: self.cursor.read().ok()?,
            },
            (true, false) => Anchor::Offset {
                x: self.cursor.read::<i8>().ok()? as _,
                y: self.cursor.read::<i8>().ok()? as _,
            },
            (false, true) => Anchor::Point {
                base: self.cursor.read().ok()?,
                component: self.cursor.read().ok()?,
            },
            (false, false) => Anchor::Point {
                base: self.cursor.read::<u8>().ok()? as _,
                component: self.cursor.read::<u8>().ok()? as _,
            },
        };
        let mut transform = Transform::default();
        if flags.contains(CompositeGlyphFlags::WE_HAVE_A_SCALE) {
            transform.xx = self.cursor.read().ok()?;
            transform.yy = transform.xx;
        } else if flags.contains(CompositeGlyphFlags::WE_HAVE_AN_X_AND_Y_SCALE) {
            transform.xx = self.cursor.read().ok()?;
            transform.yy = self.cursor.read().ok()?;
        } else if flags.contains(CompositeGlyphFlags::WE_HAVE_A_TWO_BY_TWO) {
            transform.xx = self.cursor.read().ok()?;
            transform.yx = self.cursor.read().ok()?;
            transform.xy = self.cursor.read().ok()?;
            transform.yy = self.cursor.read().ok()?;
        }
        self.done = !flags.contains(CompositeGlyphFlags::MORE_COMPONENTS);

        Some(Component {
            flags,
            glyph,
            anchor,
            transform,
        })
    }
}

/// Flags for a component in a composite glyph.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct CompositeGlyphFlags(u16);

impl CompositeGlyphFlags {
    /// Bit 0: the arguments are 16-bit.
    pub const ARG_1_AND_2_ARE_WORDS: Self = Self(0x0001);

    /// Bit 1: the arguments are an x and y offset rather than point numbers.
    pub const ARGS_ARE_XY_VALUES: Self = Self(0x0002);

    /// Bit 2: round the offset to the pixel grid when rasterizing.
    pub const ROUND_XY_TO_GRID: Self = Self(0x0004);

    /// Bit 3: a single scale applies to both x and y.
    pub const WE_HAVE_A_SCALE: Self = Self(0x0008);

    /// Bit 5: at least one more component follows this one.
    pub const MORE_COMPONENTS: Self = Self(0x0020);

    /// Bit 6: separate scales for x and y.
    pub const WE_HAVE_AN_X_AND_Y_SCALE: Self = Self(0x0040);

    /// Bit 7: a full 2x2 transformation matrix.
    pub const WE_HAVE_A_TWO_BY_TWO: Self = Self(0x0080);

    /// Bit 8: instructions follow the last component.
    pub const WE_HAVE_INSTRUCTIONS: Self = Self(0x0100);

    /// Bit 9: use this component's metrics for the composite glyph.
    pub const USE_MY_METRICS: Self = Self(0x0200);

    /// Bit 10: the composed contours overlap.
    pub const OVERLAP_COMPOUND: Self = Self(0x0400);

    /// Bit 11: the component offset is scaled by the transform.
    pub const SCALED_COMPONENT_OFFSET: Self = Self(0x0800);

    /// Bit 12: the component offset is not scaled by the transform.
    pub const UNSCALED_COMPONENT_OFFSET: Self = Self(0x1000);

    const MASK: u16 = 0x1FEF;

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Creates flags from the given bits, discarding the reserved ones.
    pub const fn from_bits_truncate(bits: u16) -> Self {
        Self(bits & Self::MASK)
    }

    /// Returns true if all of the bits in `other` are set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for CompositeGlyphFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl std::fmt::Debug for CompositeGlyphFlags {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "CompositeGlyphFlags({:#06x})", self.0)
    }
}

impl Scalar for CompositeGlyphFlags {
    type Raw = [u8; 2];

    fn from_raw(raw: Self::Raw) -> Self {
        Self(u16::from_be_bytes(raw))
    }

    fn to_raw(self) -> Self::Raw {
        self.0.to_be_bytes()
    }
}
