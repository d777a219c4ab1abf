//! Core types and utilities for camera-based dartboard scoring.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! depend on any concrete camera backend or image container: frames are
//! plain interleaved RGB byte slices behind [`RgbFrameView`].

mod board;
mod calibration;
mod error;
mod frame;
mod logger;

pub use board::{classify, sector_value, ScoreResult, SEGMENT_VALUES};
pub use board::{
    DOUBLE_BAND, INNER_BULL_FRAC, OUTER_BULL_FRAC, SECTOR_COUNT, TRIPLE_BAND,
};
pub use calibration::CalibrationModel;
pub use error::ScoreError;
pub use frame::{sample_channel_bilinear, RgbFrame, RgbFrameView};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
