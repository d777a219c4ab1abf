//! Standard dartboard wheel layout and the ring/segment classifier.
//!
//! All radial quantities are *normalized*: distance from the board center
//! divided by the outer double-ring radius, so the playable board spans
//! `0.0..=1.0` regardless of how large it appears in the camera frame.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Number of angular sectors on the board.
pub const SECTOR_COUNT: usize = 20;

/// Segment values clockwise from the top sector (the 20).
pub const SEGMENT_VALUES: [u32; SECTOR_COUNT] = [
    20, 1, 18, 4, 13, 6, 10, 15, 2, 17, 3, 19, 7, 16, 8, 11, 14, 9, 12, 5,
];

/// Inner bull radius as a fraction of the outer double-ring radius.
pub const INNER_BULL_FRAC: f32 = 0.04;
/// Outer bull radius as a fraction of the outer double-ring radius.
pub const OUTER_BULL_FRAC: f32 = 0.07;
/// Triple-ring band, inclusive on both ends.
pub const TRIPLE_BAND: (f32, f32) = (0.58, 0.65);
/// Double-ring band, inclusive on both ends.
pub const DOUBLE_BAND: (f32, f32) = (0.95, 1.0);

/// Outcome of a single classified impact.
///
/// `value == 0` always pairs with `multiplier == 1` (a miss).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreResult {
    pub value: u32,
    pub multiplier: u32,
}

impl ScoreResult {
    pub const MISS: ScoreResult = ScoreResult {
        value: 0,
        multiplier: 1,
    };

    pub fn new(value: u32, multiplier: u32) -> Self {
        if value == 0 {
            Self::MISS
        } else {
            Self { value, multiplier }
        }
    }

    /// Points awarded for this throw.
    #[inline]
    pub fn points(&self) -> u32 {
        self.value * self.multiplier
    }
}

/// Segment value for a canonical-frame angle (radians, `atan2` convention).
///
/// Sectors are 18 degrees wide with a half-sector offset so that sector
/// boundaries fall on the wire between adjacent segments.
pub fn sector_value(angle: f32) -> u32 {
    let tau = std::f32::consts::TAU;
    let sector_width = tau / SECTOR_COUNT as f32;
    let shifted = (angle + std::f32::consts::PI + 0.5 * sector_width).rem_euclid(tau);
    let index = ((shifted / sector_width) as usize).min(SECTOR_COUNT - 1);
    SEGMENT_VALUES[index]
}

/// Classify a canonical-frame point into `(value, multiplier)`.
///
/// `radius_x` is the outer double-ring radius of the calibrated board in
/// canonical units. Pure function of its arguments.
pub fn classify(c: Point2<f32>, radius_x: f32) -> ScoreResult {
    let distance = (c.x * c.x + c.y * c.y).sqrt();
    let normalized = distance / radius_x;

    if normalized < INNER_BULL_FRAC {
        return ScoreResult::new(50, 1);
    }
    if normalized < OUTER_BULL_FRAC {
        return ScoreResult::new(25, 1);
    }
    if normalized > 1.0 {
        return ScoreResult::MISS;
    }

    let value = sector_value(c.y.atan2(c.x));

    // The triple/double bands do not tile the radius; the physical board has
    // gap regions between them that score single.
    let multiplier = if (TRIPLE_BAND.0..=TRIPLE_BAND.1).contains(&normalized) {
        3
    } else if (DOUBLE_BAND.0..=DOUBLE_BAND.1).contains(&normalized) {
        2
    } else {
        1
    };

    ScoreResult::new(value, multiplier)
}
