/// Errors surfaced by the scoring core.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq)]
pub enum ScoreError {
    /// Scoring was requested before any calibration was installed. Callers
    /// must treat this as "no score", never as a valid miss.
    #[error("scoring requested before calibration")]
    NotCalibrated,
    #[error("invalid calibration model (radius_x={radius_x}, radius_y={radius_y})")]
    InvalidModel { radius_x: f32, radius_y: f32 },
}
