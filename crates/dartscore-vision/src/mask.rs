//! Binary board-color mask.
//!
//! A dartboard is black, white (cream), red, and green. A pixel "counts"
//! for calibration scoring when it falls in one of those four classes under
//! fixed RGB thresholds; everything else is treated as background.

use serde::{Deserialize, Serialize};

/// Thresholds for the four board-color classes.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct BoardColorThresholds {
    /// A pixel is near-black when every channel is below this.
    pub dark_max: u8,
    /// A pixel is near-white when every channel is above this.
    pub light_min: u8,
    /// Red class: R above `red_min`, G and B below `chroma_other_max`.
    pub red_min: u8,
    /// Green class: G above `green_min`, R and B below `chroma_other_max`.
    pub green_min: u8,
    /// Ceiling on the non-dominant channels of the red/green classes.
    pub chroma_other_max: u8,
}

impl Default for BoardColorThresholds {
    fn default() -> Self {
        Self {
            dark_max: 80,
            light_min: 200,
            red_min: 150,
            green_min: 120,
            chroma_other_max: 100,
        }
    }
}

impl BoardColorThresholds {
    /// True when the pixel belongs to any of the four board-color classes.
    #[inline]
    pub fn is_board_color(&self, [r, g, b]: [u8; 3]) -> bool {
        let dark = r < self.dark_max && g < self.dark_max && b < self.dark_max;
        let light = r > self.light_min && g > self.light_min && b > self.light_min;
        let red = r > self.red_min && g < self.chroma_other_max && b < self.chroma_other_max;
        let green = g > self.green_min && r < self.chroma_other_max && b < self.chroma_other_max;
        dark || light || red || green
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_color_classes_count() {
        let t = BoardColorThresholds::default();
        assert!(t.is_board_color([10, 10, 10]), "near-black");
        assert!(t.is_board_color([230, 225, 210]), "near-white");
        assert!(t.is_board_color([200, 40, 40]), "red");
        assert!(t.is_board_color([60, 160, 60]), "green");
    }

    #[test]
    fn background_colors_do_not_count() {
        let t = BoardColorThresholds::default();
        assert!(!t.is_board_color([120, 120, 120]), "mid gray");
        assert!(!t.is_board_color([90, 120, 180]), "blue wall");
        assert!(!t.is_board_color([180, 140, 90]), "wood");
    }

    #[test]
    fn class_boundaries_are_strict() {
        let t = BoardColorThresholds::default();
        assert!(!t.is_board_color([80, 80, 80]));
        assert!(!t.is_board_color([200, 200, 200]));
        assert!(t.is_board_color([79, 79, 79]));
        assert!(t.is_board_color([201, 201, 201]));
    }
}
