//! Decoded glyph outlines, owned and independent of the font data.
//!
//! The raw table views in [`read_ttf::tables::glyf`] stay zero-copy;
//! this module walks their point and component streams once and builds
//! owned segment lists the tessellation phases can consume without
//! touching the font bytes again.

use read_ttf::tables::glyf::{
    Anchor, CompositeGlyph, CompositeGlyphFlags, CurvePoint, Glyf, Glyph, SimpleGlyph,
};
use read_ttf::tables::loca::Loca;

use crate::{GlyphId, Point};

/// A single outline segment with explicit end points.
///
/// Consecutive segments in a contour share an end point, and the last
/// segment ends where the contour started.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Segment {
    /// A straight line from the first point to the second.
    Line(Point<f32>, Point<f32>),
    /// A quadratic Bézier: start, control, end.
    Quad(Point<f32>, Point<f32>, Point<f32>),
}

/// A closed loop of segments.
pub type Contour = Vec<Segment>;

/// A transformed reference to another glyph in a composite.
#[derive(Clone, Debug, PartialEq)]
pub struct Component {
    /// The referenced glyph.
    pub glyph: GlyphId,
    /// Linear transform `[xx, yx, xy, yy]` applied to component points.
    pub transform: [f32; 4],
    /// Translation applied after the linear transform. Already scaled
    /// when the component requests a scaled offset.
    pub offset: Point<f32>,
    /// The raw component flags.
    pub flags: CompositeGlyphFlags,
}

/// The decoded form of one glyph.
#[derive(Clone, Debug, PartialEq)]
pub enum GlyphBody {
    /// A glyph with no outline.
    Empty,
    /// Contours decoded from a simple glyph.
    Simple(Vec<Contour>),
    /// Components referencing other glyphs.
    Composite(Vec<Component>),
}

/// An owned glyph outline, immutable after decoding.
#[derive(Clone, Debug, PartialEq)]
pub struct OutlineGlyph {
    body: GlyphBody,
    is_invalid: bool,
}

impl OutlineGlyph {
    pub(crate) fn new(body: GlyphBody, is_invalid: bool) -> Self {
        OutlineGlyph { body, is_invalid }
    }

    pub fn body(&self) -> &GlyphBody {
        &self.body
    }

    /// True when the glyph could not be decoded. Invalid glyphs keep an
    /// empty body and a diagnostic is recorded for them.
    pub fn is_invalid(&self) -> bool {
        self.is_invalid
    }
}

/// Decodes the outline of every glyph in the font.
///
/// The returned vector is index-aligned with glyph identifiers. Damage
/// confined to one glyph marks that glyph invalid and appends a
/// diagnostic; it never fails the decode as a whole.
pub fn decode_glyphs(
    loca: &Loca,
    glyf: &Glyf,
    num_glyphs: u16,
    diagnostics: &mut Vec<String>,
) -> Vec<OutlineGlyph> {
    let sentinel = loca.get_raw(loca.len());
    (0..num_glyphs)
        .map(|gid| {
            let gid = GlyphId::new(gid);
            match decode_glyph(loca, glyf, gid, sentinel) {
                Ok(body) => OutlineGlyph::new(body, false),
                Err(message) => {
                    crate::record_diagnostic(diagnostics, format!("Glyph {gid}: {message}"));
                    OutlineGlyph::new(GlyphBody::Empty, true)
                }
            }
        })
        .collect()
}

fn decode_glyph(
    loca: &Loca,
    glyf: &Glyf,
    gid: GlyphId,
    sentinel: Option<u32>,
) -> Result<GlyphBody, String> {
    // A glyph whose start offset equals the table's end sentinel points
    // at the logical end of the glyph data. Checked before the empty
    // span rule: such a glyph is broken, not empty.
    let start = loca.get_raw(gid.to_usize());
    if start.is_some() && start == sentinel && gid.to_usize() < loca.len() {
        return Err("start offset equals the loca end sentinel".into());
    }
    match loca.get_glyf(gid, glyf) {
        Ok(None) => Ok(GlyphBody::Empty),
        Ok(Some(Glyph::Simple(glyph))) => simple_body(&glyph),
        Ok(Some(Glyph::Composite(glyph))) => composite_body(&glyph),
        Err(e) => Err(e.to_string()),
    }
}

fn simple_body(glyph: &SimpleGlyph) -> Result<GlyphBody, String> {
    let points = glyph.points().collect::<Vec<_>>();
    if points.len() != glyph.num_points() {
        return Err(format!(
            "point data ends early ({} of {} points)",
            points.len(),
            glyph.num_points()
        ));
    }
    let mut contours = Vec::with_capacity(glyph.number_of_contours() as usize);
    let mut start = 0usize;
    for end in glyph.end_pts_of_contours() {
        let end = end.get() as usize;
        let contour_points = points
            .get(start..=end)
            .ok_or("contour end points out of range")?;
        contours.push(build_contour(contour_points));
        start = end + 1;
    }
    Ok(GlyphBody::Simple(contours))
}

/// Builds the segment list for one closed contour.
///
/// The walk starts at the first on curve point, wrapping past the end
/// of the point list when the contour leads with off curve points. Two
/// consecutive off curve points imply an on curve point at their
/// midpoint. The final segment always ends at the walk's start point.
fn build_contour(points: &[CurvePoint]) -> Contour {
    let mut segments = Contour::new();
    if points.is_empty() {
        return segments;
    }
    let (start, walk_from, walk_len) = match points.iter().position(|p| p.on_curve) {
        Some(ix) => (as_point(&points[ix]), ix + 1, points.len() - 1),
        // No on curve points at all: the contour starts at the implied
        // midpoint between its last and first points.
        None => (
            midpoint(as_point(&points[points.len() - 1]), as_point(&points[0])),
            0,
            points.len(),
        ),
    };
    let mut cur = start;
    let mut pending: Option<Point<f32>> = None;
    for i in 0..walk_len {
        let point = &points[(walk_from + i) % points.len()];
        let p = as_point(point);
        match (point.on_curve, pending.take()) {
            (true, None) => {
                segments.push(Segment::Line(cur, p));
                cur = p;
            }
            (true, Some(ctrl)) => {
                segments.push(Segment::Quad(cur, ctrl, p));
                cur = p;
            }
            (false, None) => pending = Some(p),
            (false, Some(ctrl)) => {
                let mid = midpoint(ctrl, p);
                segments.push(Segment::Quad(cur, ctrl, mid));
                cur = mid;
                pending = Some(p);
            }
        }
    }
    match pending {
        Some(ctrl) => segments.push(Segment::Quad(cur, ctrl, start)),
        None => segments.push(Segment::Line(cur, start)),
    }
    segments
}

fn composite_body(glyph: &CompositeGlyph) -> Result<GlyphBody, String> {
    let mut components = Vec::new();
    for component in glyph.components() {
        let Anchor::Offset { x, y } = component.anchor else {
            return Err("matched point composition is not supported".into());
        };
        let transform = [
            component.transform.xx.to_f32(),
            component.transform.yx.to_f32(),
            component.transform.xy.to_f32(),
            component.transform.yy.to_f32(),
        ];
        let mut offset = Point::new(x as f32, y as f32);
        if component
            .flags
            .contains(CompositeGlyphFlags::SCALED_COMPONENT_OFFSET)
        {
            offset = Point::new(
                transform[0] * offset.x + transform[2] * offset.y,
                transform[1] * offset.x + transform[3] * offset.y,
            );
        }
        components.push(Component {
            glyph: component.glyph,
            transform,
            offset,
            flags: component.flags,
        });
    }
    if components.is_empty() {
        // The component iterator stops early on malformed data, so an
        // empty list means the first record was unreadable.
        return Err("component list ends early".into());
    }
    Ok(GlyphBody::Composite(components))
}

fn as_point(p: &CurvePoint) -> Point<f32> {
    Point::new(p.x as f32, p.y as f32)
}

fn midpoint(a: Point<f32>, b: Point<f32>) -> Point<f32> {
    (a + b) * 0.5
}
