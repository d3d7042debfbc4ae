//! Flattening of outline segments into polylines.

use crate::error::DrawError;
use crate::outline::Segment;
use crate::Point;

/// A closed run of points produced by flattening one contour.
///
/// The last point always repeats the first.
pub type Polyline = Vec<Point<f32>>;

/// Samples quadratic segments at a fixed parameter step.
#[derive(Clone, Copy, Debug)]
pub struct Tessellator {
    step: f32,
}

impl Tessellator {
    /// Creates a tessellator with the given sampling step.
    ///
    /// The step is the parameter increment between samples on a
    /// quadratic segment and must be in `(0, 1]`: a step of 0.1 yields
    /// nine interior samples per curve, a step of 1 keeps only segment
    /// end points. Anything else, NaN included, is rejected with
    /// [`DrawError::InvalidStep`].
    pub fn new(step: f32) -> Result<Self, DrawError> {
        if !(step > 0.0 && step <= 1.0) {
            return Err(DrawError::InvalidStep(step));
        }
        Ok(Self { step })
    }

    pub fn step(&self) -> f32 {
        self.step
    }

    /// Flattens one closed contour into a polyline.
    ///
    /// Each line segment contributes its end point and each quadratic
    /// segment is sampled at `t = step, 2·step, …` up to and including
    /// 1, so shared segment boundaries are emitted once. The polyline
    /// is closed by repeating its first point.
    pub fn tessellate(&self, contour: &[Segment]) -> Polyline {
        let mut polyline = Polyline::new();
        for segment in contour {
            match *segment {
                Segment::Line(_, end) => polyline.push(round_point(end)),
                Segment::Quad(start, ctrl, end) => {
                    for i in 1.. {
                        let t = self.step * i as f32;
                        if t >= 1.0 {
                            break;
                        }
                        polyline.push(round_point(blend(start, ctrl, end, t)));
                    }
                    polyline.push(round_point(end));
                }
            }
        }
        if let Some(&first) = polyline.first() {
            polyline.push(first);
        }
        polyline
    }
}

/// The quadratic Bézier blend, evaluated independently per axis.
fn blend(start: Point<f32>, ctrl: Point<f32>, end: Point<f32>, t: f32) -> Point<f32> {
    let u = 1.0 - t;
    start * (u * u) + ctrl * (2.0 * u * t) + end * (t * t)
}

/// Rounds a coordinate to 4 decimal places, half away from zero.
///
/// Downstream triangulation is sensitive to floating point noise, so
/// every coordinate this crate produces passes through this one rule,
/// whether it comes from sampling a curve or from transforming a
/// composite component.
pub(crate) fn round4(v: f32) -> f32 {
    ((v as f64 * 10000.0).round() / 10000.0) as f32
}

pub(crate) fn round_point(p: Point<f32>) -> Point<f32> {
    p.map(round4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pt(x: f32, y: f32) -> Point<f32> {
        Point::new(x, y)
    }

    #[test]
    fn rejects_out_of_range_steps() {
        for step in [0.0, -0.5, 1.5, f32::NAN] {
            assert!(matches!(
                Tessellator::new(step),
                Err(DrawError::InvalidStep(_))
            ));
        }
        assert!(Tessellator::new(1.0).is_ok());
        assert!(Tessellator::new(0.1).is_ok());
    }

    #[test]
    fn lines_contribute_end_points_only() {
        let tess = Tessellator::new(0.1).unwrap();
        let contour = [
            Segment::Line(pt(0.0, 0.0), pt(60.0, 0.0)),
            Segment::Line(pt(60.0, 0.0), pt(30.0, 50.0)),
            Segment::Line(pt(30.0, 50.0), pt(0.0, 0.0)),
        ];
        assert_eq!(
            tess.tessellate(&contour),
            vec![pt(60.0, 0.0), pt(30.0, 50.0), pt(0.0, 0.0), pt(60.0, 0.0)]
        );
    }

    #[test]
    fn quad_end_points_are_exact() {
        let tess = Tessellator::new(0.3).unwrap();
        let contour = [
            Segment::Line(pt(0.0, 0.0), pt(10.0, 0.0)),
            Segment::Quad(pt(10.0, 0.0), pt(17.0, 13.0), pt(-4.0, 9.0)),
            Segment::Line(pt(-4.0, 9.0), pt(0.0, 0.0)),
        ];
        let polyline = tess.tessellate(&contour);
        // samples at t = 0.3, 0.6, 0.9 and then the exact end point
        assert_eq!(polyline.len(), 7);
        assert_eq!(polyline[0], pt(10.0, 0.0));
        assert_eq!(polyline[4], pt(-4.0, 9.0));
        assert_eq!(polyline[5], pt(0.0, 0.0));
    }

    #[test]
    fn two_lobe_contour_at_half_step() {
        // on/off/on/off: two curves sampled once each at t = 0.5
        let a = pt(0.0, 0.0);
        let b = pt(20.0, 40.0);
        let c = pt(40.0, 0.0);
        let d = pt(20.0, -40.0);
        let contour = [Segment::Quad(a, b, c), Segment::Quad(c, d, a)];
        let tess = Tessellator::new(0.5).unwrap();
        // blend at 0.5 is (start + 2 ctrl + end) / 4
        let m1 = pt(20.0, 20.0);
        let m2 = pt(20.0, -20.0);
        assert_eq!(tess.tessellate(&contour), vec![m1, c, m2, a, m1]);
    }

    #[test]
    fn unit_step_skips_interior_samples() {
        let tess = Tessellator::new(1.0).unwrap();
        let contour = [
            Segment::Quad(pt(0.0, 0.0), pt(5.0, 9.0), pt(10.0, 0.0)),
            Segment::Quad(pt(10.0, 0.0), pt(5.0, -9.0), pt(0.0, 0.0)),
        ];
        assert_eq!(
            tess.tessellate(&contour),
            vec![pt(10.0, 0.0), pt(0.0, 0.0), pt(10.0, 0.0)]
        );
    }

    #[test]
    fn closure_repeats_first_emitted_point() {
        let tess = Tessellator::new(0.25).unwrap();
        let contour = [
            Segment::Quad(pt(0.0, 0.0), pt(8.0, 8.0), pt(16.0, 0.0)),
            Segment::Line(pt(16.0, 0.0), pt(0.0, 0.0)),
        ];
        let polyline = tess.tessellate(&contour);
        assert_eq!(polyline.first(), polyline.last());
        assert_eq!(polyline.len(), 6);
    }

    #[test]
    fn empty_contour_yields_empty_polyline() {
        let tess = Tessellator::new(0.5).unwrap();
        assert!(tess.tessellate(&[]).is_empty());
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        // 0.03125 * 10000 is exactly 312.5
        assert_eq!(round4(0.03125), 0.0313);
        assert_eq!(round4(-0.03125), -0.0313);
        assert_eq!(round4(123.456_789), 123.4568);
        assert_eq!(round4(-2.0), -2.0);
    }

    #[test]
    fn samples_are_rounded() {
        let tess = Tessellator::new(0.3).unwrap();
        let contour = [
            Segment::Quad(pt(0.0, 0.0), pt(1.0, 1.0), pt(0.0, 0.0)),
            Segment::Line(pt(0.0, 0.0), pt(0.0, 0.0)),
        ];
        let polyline = tess.tessellate(&contour);
        // 2 t (1 - t) at the three samples: float error leaves the
        // last one a hair under 0.18, rounding restores it
        assert_eq!(polyline[0], pt(0.42, 0.42));
        assert_eq!(polyline[1], pt(0.48, 0.48));
        assert_eq!(polyline[2], pt(0.18, 0.18));
    }
}
