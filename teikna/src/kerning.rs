//! Pair kerning lookup.

use std::collections::HashMap;

use crate::raw::tables::kern::Kern;
use crate::GlyphId;

/// Horizontal kerning adjustments collected from a `kern` table.
///
/// Every format 0 pair from every horizontal subtable lands in one
/// map, with later subtables overriding earlier ones.
#[derive(Clone, Debug, Default)]
pub struct KerningLookup {
    pairs: HashMap<u32, i16>,
}

impl KerningLookup {
    pub(crate) fn new(kern: &Kern) -> Self {
        let mut pairs = HashMap::new();
        for subtable in kern.subtables() {
            if !subtable.is_horizontal() {
                continue;
            }
            let Some(format0) = subtable.format0() else {
                continue;
            };
            for pair in format0.pairs() {
                pairs.insert(pack(pair.left(), pair.right()), pair.value().to_i16());
            }
        }
        Self { pairs }
    }

    /// Returns the adjustment to the advance of `left` when it is
    /// followed by `right`, in font units.
    ///
    /// Pairs the font does not kern adjust by zero.
    pub fn adjustment(&self, left: GlyphId, right: GlyphId) -> i16 {
        self.pairs
            .get(&pack(left.to_u16(), right.to_u16()))
            .copied()
            .unwrap_or(0)
    }

    /// An iterator over all kerned pairs, in no particular order.
    pub fn pairs(&self) -> impl Iterator<Item = (GlyphId, GlyphId, i16)> + '_ {
        self.pairs.iter().map(|(key, value)| {
            let (left, right) = unpack(*key);
            (GlyphId::new(left), GlyphId::new(right), *value)
        })
    }

    /// The number of kerned pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

fn pack(left: u16, right: u16) -> u32 {
    (left as u32) << 16 | right as u32
}

fn unpack(key: u32) -> (u16, u16) {
    ((key >> 16) as u16, key as u16)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::{FontData, FontRead};
    use ttf_test_data::be_buffer;

    fn lookup_from(buf: &[u8]) -> KerningLookup {
        KerningLookup::new(&Kern::read(FontData::new(buf)).unwrap())
    }

    #[test]
    fn pair_keys_round_trip() {
        for (left, right) in [(0, 0), (1, 2), (0xABCD, 0x1234), (0xFFFF, 0xFFFF)] {
            assert_eq!(unpack(pack(left, right)), (left, right));
        }
        assert_ne!(pack(1, 2), pack(2, 1));
    }

    #[test]
    fn adjustments_come_from_the_pair_list() {
        let lookup = lookup_from(&ttf_test_data::font::kern());
        assert_eq!(lookup.len(), 2);
        assert_eq!(lookup.adjustment(GlyphId::new(1), GlyphId::new(2)), -50);
        assert_eq!(lookup.adjustment(GlyphId::new(2), GlyphId::new(3)), 30);
    }

    #[test]
    fn unkerned_pairs_adjust_by_zero() {
        let lookup = lookup_from(&ttf_test_data::font::kern());
        assert_eq!(lookup.adjustment(GlyphId::new(2), GlyphId::new(1)), 0);
        assert_eq!(lookup.adjustment(GlyphId::new(9), GlyphId::new(9)), 0);
    }

    #[test]
    fn vertical_and_format_2_subtables_are_skipped() {
        let buf = be_buffer! {
            0u16,   // version
            3u16,   // n tables
            // vertical subtable
            0u16,       // subtable version
            20u16,      // length
            0x0000u16,  // coverage: not horizontal
            1u16,       // n pairs
            0u16,       // search range, unused
            0u16,       // entry selector, unused
            0u16,       // range shift, unused
            [5u16, 6],  // pair
            77i16,
            // horizontal format 2 subtable
            0u16,       // subtable version
            8u16,       // length
            0x0201u16,  // coverage: horizontal, format 2
            0u16,       // opaque payload
            // horizontal format 0 subtable
            0u16,       // subtable version
            20u16,      // length
            0x0001u16,  // coverage: horizontal, format 0
            1u16,       // n pairs
            0u16,       // search range, unused
            0u16,       // entry selector, unused
            0u16,       // range shift, unused
            [5u16, 6],  // pair
            -9i16
        };
        let lookup = lookup_from(&buf);
        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup.adjustment(GlyphId::new(5), GlyphId::new(6)), -9);
    }

    #[test]
    fn later_subtables_override_earlier_ones() {
        let buf = be_buffer! {
            0u16,   // version
            2u16,   // n tables
            0u16,       // subtable version
            20u16,      // length
            0x0001u16,  // coverage: horizontal, format 0
            1u16,       // n pairs
            0u16,       // search range, unused
            0u16,       // entry selector, unused
            0u16,       // range shift, unused
            [1u16, 2],  // pair
            -15i16,
            0u16,       // subtable version
            20u16,      // length
            0x0001u16,  // coverage: horizontal, format 0
            1u16,       // n pairs
            0u16,       // search range, unused
            0u16,       // entry selector, unused
            0u16,       // range shift, unused
            [1u16, 2],  // same pair, new value
            40i16
        };
        let lookup = lookup_from(&buf);
        assert_eq!(lookup.len(), 1);
        assert_eq!(lookup.adjustment(GlyphId::new(1), GlyphId::new(2)), 40);
    }

    #[test]
    fn pairs_iterates_everything() {
        let lookup = lookup_from(&ttf_test_data::font::kern());
        let mut pairs = lookup.pairs().collect::<Vec<_>>();
        pairs.sort();
        assert_eq!(
            pairs,
            [
                (GlyphId::new(1), GlyphId::new(2), -50),
                (GlyphId::new(2), GlyphId::new(3), 30),
            ]
        );
    }
}
