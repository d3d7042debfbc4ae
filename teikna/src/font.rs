//! Whole font tessellation.

use crate::charmap::CharToGlyphMap;
use crate::error::DrawError;
use crate::kerning::KerningLookup;
use crate::metrics::FontMetrics;
use crate::raw::{FontRef, TableProvider};
use crate::tess::{Polyline, Tessellator};
use crate::{outline, pipeline, GlyphId};

/// Options for [`TessellatedFont::build`].
pub struct BuildOptions {
    /// Sampling step for quadratic segments, in `(0, 1]`.
    pub step: f32,
    /// Invoked once per finished glyph with the finished and total
    /// counts. Glyphs are processed in parallel, so the callback must
    /// tolerate being called from multiple threads.
    pub progress: Option<Box<dyn Fn(usize, usize) + Send + Sync>>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        BuildOptions {
            step: 0.1,
            progress: None,
        }
    }
}

/// One glyph of a [`TessellatedFont`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TessellatedGlyph {
    /// Horizontal advance, in font units.
    pub advance_width: u16,
    /// Left side bearing, in font units.
    pub left_side_bearing: i16,
    /// True when the glyph could not be processed. Invalid glyphs have
    /// no contours.
    pub is_invalid: bool,
    /// Closed polylines, one per contour, in font units.
    pub contours: Vec<Polyline>,
}

/// A font with every glyph outline flattened to polylines.
///
/// This is the unscaled, character-independent form of the font: all
/// coordinates are in font units and glyphs are addressed by glyph
/// identifier. Use the [charmap](Self::charmap) to get from characters
/// to glyphs and [kerning](Self::kerning) for pair adjustments.
#[derive(Clone, Debug)]
pub struct TessellatedFont {
    metrics: FontMetrics,
    glyphs: Vec<TessellatedGlyph>,
    charmap: CharToGlyphMap,
    kerning: KerningLookup,
    diagnostics: Vec<String>,
}

impl TessellatedFont {
    /// Parses the font and tessellates every glyph.
    ///
    /// Fails on an unusable sampling step, on unparseable font data and
    /// on fonts missing a table this crate requires. Damage confined to
    /// individual glyphs does not fail the build: the affected glyphs
    /// are marked invalid and described in [diagnostics](Self::diagnostics).
    pub fn build(data: &[u8], options: &BuildOptions) -> Result<Self, DrawError> {
        let tessellator = Tessellator::new(options.step)?;
        let font = FontRef::new(data)?;
        let head = font.head()?;
        let num_glyphs = font.maxp()?.num_glyphs();
        let loca = font.loca(None)?;
        let glyf = font.glyf()?;
        let subtable = font.cmap()?.unicode_bmp().ok_or(DrawError::NoUsableCmap)?;
        let charmap = CharToGlyphMap::new(&subtable);
        let hhea = font.hhea().ok();
        let hmtx = font.hmtx().ok();
        let name = font.name().ok();
        let metrics = FontMetrics::new(&head, hhea.as_ref(), name.as_ref());
        let kerning = font
            .kern()
            .ok()
            .map(|kern| KerningLookup::new(&kern))
            .unwrap_or_default();

        let mut diagnostics = Vec::new();
        log::debug!("decoding {num_glyphs} glyph outlines");
        let outlines = outline::decode_glyphs(&loca, &glyf, num_glyphs, &mut diagnostics);
        let geometries = pipeline::tessellate_glyphs(
            &outlines,
            tessellator,
            options.progress.as_deref(),
            &mut diagnostics,
        );
        let glyphs = geometries
            .into_iter()
            .enumerate()
            .map(|(index, geometry)| {
                let gid = GlyphId::new(index as u16);
                TessellatedGlyph {
                    advance_width: hmtx
                        .as_ref()
                        .and_then(|hmtx| hmtx.advance(gid))
                        .map(|advance| advance.to_u16())
                        .unwrap_or_default(),
                    left_side_bearing: hmtx
                        .as_ref()
                        .and_then(|hmtx| hmtx.side_bearing(gid))
                        .map(|bearing| bearing.to_i16())
                        .unwrap_or_default(),
                    is_invalid: geometry.is_invalid,
                    contours: geometry.contours,
                }
            })
            .collect();
        Ok(TessellatedFont {
            metrics,
            glyphs,
            charmap,
            kerning,
            diagnostics,
        })
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    /// All glyphs, indexed by glyph identifier.
    pub fn glyphs(&self) -> &[TessellatedGlyph] {
        &self.glyphs
    }

    pub fn glyph(&self, gid: GlyphId) -> Option<&TessellatedGlyph> {
        self.glyphs.get(gid.to_usize())
    }

    /// The glyph a character maps to, through the charmap.
    pub fn glyph_for_char(&self, ch: impl Into<u32>) -> Option<&TessellatedGlyph> {
        self.glyph(self.charmap.glyph_for_char(ch))
    }

    pub fn charmap(&self) -> &CharToGlyphMap {
        &self.charmap
    }

    pub fn kerning(&self) -> &KerningLookup {
        &self.kerning
    }

    /// Problems encountered while processing individual glyphs.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }
}
