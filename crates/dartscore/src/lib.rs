//! High-level facade crate for the `dartscore-*` workspace.
//!
//! This crate provides stable, convenient re-exports of the underlying
//! crates: the geometric scoring core, the vision stage (auto-calibration
//! and impact detection), and the turn-based game session.
//!
//! ## Quickstart
//!
//! ```
//! use dartscore::{GameMode, GameSession, ScorePipeline};
//! use dartscore::core::{RgbFrame, ScoreResult};
//!
//! let mut pipeline = ScorePipeline::default();
//! let frame = RgbFrame::filled(640, 480, [120, 120, 120]);
//! let fit = pipeline.calibrate_from(&frame.view());
//! assert!(fit.fallback); // a featureless frame degrades to the default ellipse
//!
//! let mut session = GameSession::new(2, GameMode::FiveOhOne);
//! session.start();
//! session.register_throw(ScoreResult::new(20, 3));
//! assert_eq!(session.remaining(0), Some(441));
//! ```
//!
//! ## API map
//! - `dartscore::core`: frames, the board wheel, `CalibrationModel`, the
//!   classifier.
//! - `dartscore::vision`: board-color mask, `AutoCalibrator`,
//!   `ImpactDetector`, `ScorePipeline`.
//! - `dartscore::game`: `GameSession`, modes, standings.

pub use dartscore_core as core;
pub use dartscore_game as game;
pub use dartscore_vision as vision;

pub use dartscore_core::{classify, CalibrationModel, ScoreError, ScoreResult};
pub use dartscore_game::{GameMode, GameSession, Standings};
pub use dartscore_vision::{
    AutoCalibrator, CalibrationFit, CalibrationSearchParams, ImpactDetector, ImpactParams,
    ScorePipeline,
};
