//! Parallel tessellation of decoded glyphs.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;

use crate::outline::{Component, GlyphBody, OutlineGlyph};
use crate::tess::{round_point, Polyline, Tessellator};
use crate::{record_diagnostic, GlyphId, Point, COMPOSITE_RECURSION_LIMIT};

/// Flattened geometry for a single glyph.
#[derive(Clone, Debug, Default)]
pub(crate) struct GlyphGeometry {
    pub contours: Vec<Polyline>,
    pub is_invalid: bool,
}

impl GlyphGeometry {
    fn invalid() -> Self {
        GlyphGeometry {
            contours: Vec::new(),
            is_invalid: true,
        }
    }
}

/// Shared completion counter for the build callback.
struct Progress<'a> {
    finished: AtomicUsize,
    total: usize,
    callback: Option<&'a (dyn Fn(usize, usize) + Send + Sync)>,
}

impl Progress<'_> {
    fn tick(&self) {
        let finished = self.finished.fetch_add(1, Ordering::AcqRel) + 1;
        if let Some(callback) = self.callback {
            callback(finished, self.total);
        }
    }
}

/// Tessellates every glyph, in parallel.
///
/// Simple and empty glyphs are flattened in one parallel pass.
/// Composites are assembled afterwards in rounds: each round resolves,
/// again in parallel, the composites whose components all have
/// geometry already. A composite still unresolved after
/// [`COMPOSITE_RECURSION_LIMIT`] rounds is nested too deeply, or part
/// of a reference cycle, and is marked invalid.
pub(crate) fn tessellate_glyphs(
    glyphs: &[OutlineGlyph],
    tessellator: Tessellator,
    callback: Option<&(dyn Fn(usize, usize) + Send + Sync)>,
    diagnostics: &mut Vec<String>,
) -> Vec<GlyphGeometry> {
    let progress = Progress {
        finished: AtomicUsize::new(0),
        total: glyphs.len(),
        callback,
    };
    log::debug!("flattening {} glyphs", glyphs.len());
    let mut geometries: Vec<Option<GlyphGeometry>> = glyphs
        .par_iter()
        .map(|glyph| {
            let contours = match glyph.body() {
                GlyphBody::Empty => Vec::new(),
                GlyphBody::Simple(contours) => contours
                    .iter()
                    .map(|contour| tessellator.tessellate(contour))
                    .collect(),
                GlyphBody::Composite(_) => return None,
            };
            progress.tick();
            Some(GlyphGeometry {
                contours,
                is_invalid: glyph.is_invalid(),
            })
        })
        .collect();

    let pending = geometries.iter().filter(|g| g.is_none()).count();
    if pending > 0 {
        log::debug!("assembling {pending} composite glyphs");
        resolve_composites(glyphs, &mut geometries, &progress, diagnostics);
    }
    geometries
        .into_iter()
        .map(|geometry| geometry.unwrap_or_default())
        .collect()
}

fn resolve_composites(
    glyphs: &[OutlineGlyph],
    geometries: &mut [Option<GlyphGeometry>],
    progress: &Progress,
    diagnostics: &mut Vec<String>,
) {
    for _ in 0..COMPOSITE_RECURSION_LIMIT {
        let mut ready: Vec<(usize, &[Component])> = Vec::new();
        let mut invalidated = false;
        for (index, glyph) in glyphs.iter().enumerate() {
            if geometries[index].is_some() {
                continue;
            }
            let GlyphBody::Composite(components) = glyph.body() else {
                continue;
            };
            match readiness(GlyphId::new(index as u16), components, geometries) {
                Readiness::Ready => ready.push((index, components)),
                Readiness::Waiting => {}
                Readiness::Invalid(message) => {
                    record_diagnostic(diagnostics, message);
                    geometries[index] = Some(GlyphGeometry::invalid());
                    progress.tick();
                    invalidated = true;
                }
            }
        }
        if ready.is_empty() {
            if invalidated {
                // Composites waiting on the ones just invalidated can
                // be dealt with in the next round.
                continue;
            }
            break;
        }
        let resolved: Vec<(usize, GlyphGeometry)> = ready
            .par_iter()
            .map(|&(index, components)| {
                let geometry = compose(components, geometries);
                progress.tick();
                (index, geometry)
            })
            .collect();
        for (index, geometry) in resolved {
            geometries[index] = Some(geometry);
        }
    }
    for (index, geometry) in geometries.iter_mut().enumerate() {
        if geometry.is_none() {
            record_diagnostic(
                diagnostics,
                format!(
                    "Recursion limit ({COMPOSITE_RECURSION_LIMIT}) exceeded when assembling \
                     composite glyph {}",
                    GlyphId::new(index as u16)
                ),
            );
            *geometry = Some(GlyphGeometry::invalid());
            progress.tick();
        }
    }
}

enum Readiness {
    Ready,
    Waiting,
    Invalid(String),
}

/// Decides whether a composite can be assembled in the current round.
fn readiness(
    gid: GlyphId,
    components: &[Component],
    geometries: &[Option<GlyphGeometry>],
) -> Readiness {
    for component in components {
        match geometries.get(component.glyph.to_usize()) {
            None => {
                return Readiness::Invalid(format!(
                    "Composite glyph {gid} references out of range glyph {}",
                    component.glyph
                ));
            }
            Some(Some(geometry)) if geometry.is_invalid => {
                return Readiness::Invalid(format!(
                    "Composite glyph {gid} references invalid glyph {}",
                    component.glyph
                ));
            }
            Some(Some(_)) => {}
            Some(None) => return Readiness::Waiting,
        }
    }
    Readiness::Ready
}

fn compose(components: &[Component], geometries: &[Option<GlyphGeometry>]) -> GlyphGeometry {
    let mut contours = Vec::new();
    for component in components {
        // the readiness check has resolved every source already
        let Some(Some(source)) = geometries.get(component.glyph.to_usize()) else {
            continue;
        };
        for polyline in &source.contours {
            contours.push(
                polyline
                    .iter()
                    .map(|&point| round_point(place(component, point)))
                    .collect(),
            );
        }
    }
    GlyphGeometry {
        contours,
        is_invalid: false,
    }
}

/// Applies a component's transform and offset to one source point.
fn place(component: &Component, point: Point<f32>) -> Point<f32> {
    let [xx, yx, xy, yy] = component.transform;
    Point::new(
        xx * point.x + xy * point.y + component.offset.x,
        yx * point.x + yy * point.y + component.offset.y,
    )
}
