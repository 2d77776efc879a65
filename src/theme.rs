//! Color themes
//!
//! Palettes are static and never mutated; a session swaps which one it
//! points at.

use serde::{Deserialize, Serialize};

use crate::sim::Tier;

/// 8-bit RGB color
pub type Rgb = [u8; 3];

/// Spark color (both themes)
pub const SPARK_COLOR: Rgb = [255, 255, 255];

/// Session color theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

/// Full color set for one theme
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    /// Block colors indexed by `Tier as usize`
    pub tiers: [Rgb; 5],
    pub background: Rgb,
    pub paddle: Rgb,
    pub ball: Rgb,
    pub text: Rgb,
    pub text_secondary: Rgb,
    pub grid_line: Rgb,
}

pub const DARK: Palette = Palette {
    tiers: [
        [22, 27, 34],  // #161b22
        [14, 68, 41],  // #0e4429
        [0, 109, 50],  // #006d32
        [38, 166, 65], // #26a641
        [57, 211, 83], // #39d353
    ],
    background: [13, 17, 23],
    paddle: [88, 166, 255],
    ball: [255, 255, 255],
    text: [201, 209, 217],
    text_secondary: [139, 148, 158],
    grid_line: [48, 54, 61],
};

pub const LIGHT: Palette = Palette {
    tiers: [
        [235, 237, 240], // #ebedf0
        [155, 233, 168], // #9be9a8
        [64, 196, 99],   // #40c463
        [48, 161, 78],   // #30a14e
        [33, 110, 57],   // #216e39
    ],
    background: [255, 255, 255],
    paddle: [36, 41, 47],
    ball: [36, 41, 47],
    text: [36, 41, 47],
    text_secondary: [106, 115, 125],
    grid_line: [234, 236, 239],
};

impl Theme {
    pub fn palette(self) -> &'static Palette {
        match self {
            Theme::Dark => &DARK,
            Theme::Light => &LIGHT,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }
}

impl Palette {
    /// Block color for a tier
    #[inline]
    pub fn tier(&self, tier: Tier) -> Rgb {
        self.tiers[tier as usize]
    }
}
