//! Font wide metrics and identification.

use crate::raw::tables::{head::Head, hhea::Hhea, name::Name};
use crate::raw::types::NameId;

/// Metrics that apply to the font as a whole.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FontMetrics {
    /// Size of the design grid, in font units per em.
    pub units_per_em: u16,
    /// Smallest size the font is legible at, in pixels per em.
    pub lowest_rec_ppem: u16,
    /// Baseline to baseline distance, in font units.
    pub line_spacing: i32,
    /// The font's full name, empty when it has none.
    pub full_name: String,
}

impl FontMetrics {
    pub(crate) fn new(head: &Head, hhea: Option<&Hhea>, name: Option<&Name>) -> Self {
        // Widened to i32: the three terms are each 16 bit, their sum
        // need not be.
        let line_spacing = hhea
            .map(|hhea| {
                hhea.ascender().to_i16() as i32 - hhea.descender().to_i16() as i32
                    + hhea.line_gap().to_i16() as i32
            })
            .unwrap_or_default();
        let full_name = name
            .and_then(|name| name.string_for_id(NameId::FULL_NAME))
            .map(|name| name.to_string())
            .unwrap_or_default();
        FontMetrics {
            units_per_em: head.units_per_em(),
            lowest_rec_ppem: head.lowest_rec_ppem(),
            line_spacing,
            full_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{FontData, FontRead};
    use ttf_test_data::font;

    #[test]
    fn canonical_metrics() {
        let head_data = font::head();
        let hhea_data = font::hhea();
        let name_data = font::name();
        let head = Head::read(FontData::new(&head_data)).unwrap();
        let hhea = Hhea::read(FontData::new(&hhea_data)).unwrap();
        let name = Name::read(FontData::new(&name_data)).unwrap();
        let metrics = FontMetrics::new(&head, Some(&hhea), Some(&name));
        assert_eq!(
            metrics,
            FontMetrics {
                units_per_em: 1000,
                lowest_rec_ppem: 9,
                line_spacing: 1090,
                full_name: "Teikna Test".into(),
            }
        );
    }

    #[test]
    fn missing_tables_leave_defaults() {
        let head_data = font::head();
        let head = Head::read(FontData::new(&head_data)).unwrap();
        let metrics = FontMetrics::new(&head, None, None);
        assert_eq!(metrics.units_per_em, 1000);
        assert_eq!(metrics.line_spacing, 0);
        assert_eq!(metrics.full_name, "");
    }
}
