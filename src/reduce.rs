//! Collapse a large set of cluster centers to one color per hue family.

use indexmap::IndexMap;

use crate::category::{HueCategory, categorize};
use crate::convert::HsvColor;

/// Group HSV colors by hue family and keep one representative per family.
///
/// Within a family the two most saturated entries are considered (stable, so
/// among equal saturation the later entry ranks higher) and the brighter of
/// the two wins. On equal brightness the less saturated one of the pair is
/// kept. Families come out in the order their first member appeared.
pub fn reduce_palette(colors: &[HsvColor]) -> Vec<HsvColor> {
    let mut families: IndexMap<HueCategory, Vec<HsvColor>> = IndexMap::new();
    for &color in colors {
        families.entry(categorize(color.hue)).or_default().push(color);
    }

    families
        .into_values()
        .map(|mut members| {
            members.sort_by_key(|c| c.saturation);
            match members.as_slice() {
                [.., runner_up, most_saturated] => {
                    if runner_up.value >= most_saturated.value {
                        *runner_up
                    } else {
                        *most_saturated
                    }
                }
                [only] => *only,
                [] => unreachable!("families are created with one member"),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn identical_inputs_collapse() {
        let colors = vec![HsvColor::new(200, 100, 100); 24];
        assert_eq!(reduce_palette(&colors), vec![HsvColor::new(200, 100, 100)]);
    }

    #[test]
    fn brightest_of_two_most_saturated() {
        let colors = [
            HsvColor::new(0, 50, 250),  // bright but dull, not considered
            HsvColor::new(5, 200, 100), // second most saturated
            HsvColor::new(10, 220, 90), // most saturated, darker
        ];
        assert_eq!(reduce_palette(&colors), vec![HsvColor::new(5, 200, 100)]);
    }

    #[test]
    fn brightness_tie_keeps_runner_up() {
        let colors = [HsvColor::new(120, 220, 90), HsvColor::new(125, 200, 90)];
        assert_eq!(reduce_palette(&colors), vec![HsvColor::new(125, 200, 90)]);
    }

    #[test]
    fn discovery_order() {
        let colors = [
            HsvColor::new(240, 10, 10),
            HsvColor::new(0, 10, 10),
            HsvColor::new(241, 20, 20),
            HsvColor::new(120, 10, 10),
            HsvColor::new(359, 5, 5),
        ];
        let hues: Vec<u16> = reduce_palette(&colors).iter().map(|c| c.hue).collect();
        // blue, red, green; 359 joins red and loses on saturation
        assert_eq!(hues, vec![241, 0, 120]);
    }

    proptest! {
        #[test]
        fn bounded_and_drawn_from_input(
            colors in prop::collection::vec((0u16..=360, any::<u8>(), any::<u8>()), 1..48)
        ) {
            let colors: Vec<HsvColor> = colors.into_iter().map(|(h, s, v)| HsvColor::new(h, s, v)).collect();
            let reduced = reduce_palette(&colors);
            prop_assert!(!reduced.is_empty());
            prop_assert!(reduced.len() <= 12);
            for c in &reduced {
                prop_assert!(colors.contains(c));
            }
            let mut cats: Vec<_> = reduced.iter().map(|c| categorize(c.hue)).collect();
            cats.sort();
            cats.dedup();
            prop_assert_eq!(cats.len(), reduced.len());
        }
    }
}
