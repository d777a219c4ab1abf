//! Frame-level vision for dartboard scoring: locating the board ellipse in
//! a raw camera frame and spotting dart impacts between consecutive frames.
//!
//! Design idea:
//! - Classify pixels into a binary "board-color" mask (black/white/red/green
//!   under fixed thresholds).
//! - Grid-search ellipse candidates and keep the one whose perimeter is the
//!   most densely board-colored relative to its surroundings.
//! - Compare consecutive frames inside the calibrated region and take the
//!   pixel of maximum change as the impact point.
//!
//! The pipeline in [`pipeline`] wires these into score events for a host.

pub mod calibrate;
pub mod impact;
pub mod mask;
pub mod pipeline;

pub use calibrate::{AutoCalibrator, CalibrationFit, CalibrationSearchParams};
pub use impact::{ImpactDetector, ImpactParams, SearchRegion};
pub use mask::BoardColorThresholds;
pub use pipeline::ScorePipeline;
