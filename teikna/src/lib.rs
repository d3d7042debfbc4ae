//! Tessellation of TrueType glyph outlines.
//!
//! This crate sits above low level font parsing (provided by
//! [`read-ttf`](read_ttf)) and turns the quadratic curves of a font's
//! glyphs into plain polylines at a caller-chosen resolution. The entry
//! point is [`TessellatedFont::build`], which decodes every glyph in the
//! font, flattens simple outlines in parallel and then assembles
//! composite glyphs from the flattened geometry of their components.
//!
//! Broken glyphs do not abort the build: they are marked invalid, a
//! diagnostic is recorded and the remaining glyphs are processed as
//! usual. Only a missing or malformed required table, an unusable
//! character map or an out-of-range sampling step is fatal.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Expose our "raw" underlying parser crate.
pub extern crate read_ttf as raw;

pub mod outline;

mod charmap;
mod error;
mod font;
mod kerning;
mod metrics;
mod pipeline;
mod tess;

pub use charmap::CharToGlyphMap;
pub use error::DrawError;
pub use font::{BuildOptions, TessellatedFont, TessellatedGlyph};
pub use kerning::KerningLookup;
pub use metrics::FontMetrics;
pub use outline::{Component, Contour, GlyphBody, OutlineGlyph, Segment};
pub use tess::{Polyline, Tessellator};

/// Type for a glyph identifier.
pub type GlyphId = read_ttf::types::GlyphId;

/// Type for a two dimensional point.
pub type Point<T> = read_ttf::types::Point<T>;

/// Limit for nesting depth when assembling composite glyphs.
const COMPOSITE_RECURSION_LIMIT: usize = 5;

/// Records a glyph-local problem without failing the build.
pub(crate) fn record_diagnostic(diagnostics: &mut Vec<String>, message: String) {
    log::warn!("{message}");
    diagnostics.push(message);
}
