//! Twelve 30° hue families.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HueCategory {
    Red,
    Orange,
    Yellow,
    Lime,
    Green,
    GreenCyan,
    Cyan,
    BlueCyan,
    Blue,
    Violet,
    Magenta,
    Rose,
}

impl HueCategory {
    /// Band order, starting at the red band centered on 0°.
    pub const ALL: [HueCategory; 12] = [
        HueCategory::Red,
        HueCategory::Orange,
        HueCategory::Yellow,
        HueCategory::Lime,
        HueCategory::Green,
        HueCategory::GreenCyan,
        HueCategory::Cyan,
        HueCategory::BlueCyan,
        HueCategory::Blue,
        HueCategory::Violet,
        HueCategory::Magenta,
        HueCategory::Rose,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HueCategory::Red => "red",
            HueCategory::Orange => "orange",
            HueCategory::Yellow => "yellow",
            HueCategory::Lime => "lime",
            HueCategory::Green => "green",
            HueCategory::GreenCyan => "green-cyan",
            HueCategory::Cyan => "cyan",
            HueCategory::BlueCyan => "blue-cyan",
            HueCategory::Blue => "blue",
            HueCategory::Violet => "violet",
            HueCategory::Magenta => "magenta",
            HueCategory::Rose => "rose",
        }
    }
}

impl fmt::Display for HueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Map a hue in degrees to its family.
///
/// Upper band edges (15, 45, ..., 345) are inclusive, and anything above 345
/// wraps back to red. Hues past 360 are reduced modulo 360 first.
pub fn categorize(hue: u16) -> HueCategory {
    let hue = hue % 360;
    if hue > 345 {
        return HueCategory::Red;
    }
    // hue 0..=15 -> 0, 16..=45 -> 1, ...
    let band = (hue as usize + 14) / 30;
    HueCategory::ALL[band]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn band_edges() {
        assert_eq!(categorize(0), HueCategory::Red);
        assert_eq!(categorize(15), HueCategory::Red);
        assert_eq!(categorize(16), HueCategory::Orange);
        assert_eq!(categorize(45), HueCategory::Orange);
        assert_eq!(categorize(46), HueCategory::Yellow);
        assert_eq!(categorize(120), HueCategory::Green);
        assert_eq!(categorize(180), HueCategory::Cyan);
        assert_eq!(categorize(240), HueCategory::Blue);
        assert_eq!(categorize(345), HueCategory::Rose);
        assert_eq!(categorize(346), HueCategory::Red);
        assert_eq!(categorize(360), HueCategory::Red);
    }

    #[test]
    fn every_band_is_reachable() {
        for (i, cat) in HueCategory::ALL.iter().enumerate() {
            let center = (i * 30) as u16;
            assert_eq!(categorize(center), *cat);
        }
    }

    #[test]
    fn labels() {
        assert_eq!(HueCategory::GreenCyan.to_string(), "green-cyan");
        assert_eq!(serde_json::to_string(&HueCategory::BlueCyan).unwrap(), "\"blue-cyan\"");
    }

    proptest! {
        #[test]
        fn monotonic_bands(hue in 0u16..=345) {
            let expected = if hue <= 15 { 0 } else { (hue as usize - 16) / 30 + 1 };
            prop_assert_eq!(categorize(hue), HueCategory::ALL[expected]);
        }
    }
}
