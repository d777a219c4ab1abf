//! Automatic board calibration.
//!
//! The board ellipse is found by a nested grid search rather than a
//! closed-form fit: a coarse scan over candidate centers in the central
//! part of the frame, then sweeps over aspect ratio, rotation, and radius
//! at the best center. Every candidate is scored by sampling its perimeter
//! against the board-color mask; the surroundings of a real board are
//! background-colored, so the score is the perimeter density *minus* the
//! density just outside the ellipse, plus a half-weighted inner-ring term.
//! Ties resolve to the first candidate in sweep order, which keeps the
//! search deterministic and testable.

use dartscore_core::{CalibrationModel, RgbFrameView};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::mask::BoardColorThresholds;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Grids and thresholds of the calibration search.
///
/// The candidate grids are explicit fields so the search space can be
/// tightened or widened without touching the scoring function.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CalibrationSearchParams {
    pub thresholds: BoardColorThresholds,
    /// Candidate centers are `min(width, height) / center_grid_divisor`
    /// pixels apart.
    pub center_grid_divisor: u32,
    /// Fraction of the frame, centered, scanned for the board center.
    pub central_region_frac: f32,
    /// Test-circle radius during the center scan, fraction of the smaller
    /// frame dimension.
    pub test_radius_frac: f32,
    /// Perimeter samples per candidate ellipse.
    pub perimeter_samples: usize,
    /// Inner-ring sample radius, fraction of the candidate radius.
    pub inner_radius_frac: f32,
    /// Weight of an inner-ring hit relative to a perimeter hit.
    pub inner_weight: f32,
    /// Radius factor for the surround ring sampled just outside the
    /// candidate; board-colored pixels there count against the score.
    pub surround_radius_factor: f32,
    /// Aspect-ratio sweep (`radius_y / radius_x`), inclusive.
    pub aspect_min: f32,
    pub aspect_max: f32,
    pub aspect_step: f32,
    /// Rotation sweep, `-rotation_range..=rotation_range` radians.
    pub rotation_range: f32,
    pub rotation_step: f32,
    /// Radius sweep as factors of the test radius, inclusive.
    pub radius_scale_min: f32,
    pub radius_scale_max: f32,
    pub radius_scale_step: f32,
    /// Normalized score below which the search degrades to the default
    /// ellipse instead of trusting the best candidate.
    pub confidence_floor: f32,
    /// Fallback radii as fractions of the frame width/height.
    pub fallback_radius_frac: f32,
}

impl Default for CalibrationSearchParams {
    fn default() -> Self {
        Self {
            thresholds: BoardColorThresholds::default(),
            center_grid_divisor: 12,
            central_region_frac: 0.6,
            test_radius_frac: 0.25,
            perimeter_samples: 64,
            inner_radius_frac: 0.45,
            inner_weight: 0.5,
            surround_radius_factor: 1.15,
            aspect_min: 0.7,
            aspect_max: 1.0,
            aspect_step: 0.05,
            rotation_range: 0.35,
            rotation_step: 0.07,
            radius_scale_min: 0.8,
            radius_scale_max: 1.4,
            radius_scale_step: 0.05,
            confidence_floor: 0.4,
            fallback_radius_frac: 0.3,
        }
    }
}

/// Result of one calibration search.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct CalibrationFit {
    pub model: CalibrationModel,
    /// Normalized candidate score in `..=1.0`; `1.0` means every perimeter
    /// and inner sample was board-colored with a clean surround.
    pub score: f32,
    /// True when the score stayed below the confidence floor and the
    /// default ellipse was installed instead of the best candidate.
    pub fallback: bool,
}

/// Nested-grid-search calibrator. Stateless between calls; every call
/// scores the given frame from scratch.
pub struct AutoCalibrator {
    params: CalibrationSearchParams,
    dirs: Vec<(f32, f32)>,
}

impl AutoCalibrator {
    pub fn new(params: CalibrationSearchParams) -> Self {
        let dirs = unit_directions(params.perimeter_samples.max(8));
        Self { params, dirs }
    }

    pub fn params(&self) -> &CalibrationSearchParams {
        &self.params
    }

    /// Locate the board ellipse in `frame`.
    ///
    /// Never fails: when no candidate clears the confidence floor the
    /// returned fit carries the frame-centered default ellipse with
    /// `fallback = true`.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, frame), fields(width = frame.width, height = frame.height))
    )]
    pub fn calibrate(&self, frame: &RgbFrameView<'_>) -> CalibrationFit {
        let min_dim = frame.width.min(frame.height) as f32;
        let test_radius = min_dim * self.params.test_radius_frac;

        let (center, center_score) = self.scan_centers(frame, test_radius);
        log::debug!(
            "center scan: best ({:.1}, {:.1}) score {:.3}",
            center.x,
            center.y,
            center_score
        );

        let (model, score) = self.refine_at_center(frame, center, test_radius);

        if score < self.params.confidence_floor {
            log::warn!(
                "calibration score {:.3} below floor {:.3}; using default ellipse",
                score,
                self.params.confidence_floor
            );
            return CalibrationFit {
                model: self.default_model(frame),
                score,
                fallback: true,
            };
        }

        log::info!(
            "calibrated: center ({:.1}, {:.1}) rx {:.1} ry {:.1} rot {:.3} score {:.3}",
            model.center.x,
            model.center.y,
            model.radius_x,
            model.radius_y,
            model.rotation,
            score
        );
        CalibrationFit {
            model,
            score,
            fallback: false,
        }
    }

    /// Coarse scan over candidate centers in the central region, scoring a
    /// circle of `test_radius` at each. First candidate reaching the
    /// maximum wins.
    fn scan_centers(&self, frame: &RgbFrameView<'_>, test_radius: f32) -> (Point2<f32>, f32) {
        let w = frame.width as f32;
        let h = frame.height as f32;
        let margin = 0.5 * (1.0 - self.params.central_region_frac);
        let step = (w.min(h) / self.params.center_grid_divisor.max(1) as f32).max(1.0);

        let x0 = w * margin;
        let x1 = w * (1.0 - margin);
        let y0 = h * margin;
        let y1 = h * (1.0 - margin);

        let mut best = (Point2::new(0.5 * w, 0.5 * h), f32::MIN);
        let mut y = y0;
        while y <= y1 {
            let mut x = x0;
            while x <= x1 {
                let center = Point2::new(x, y);
                let score =
                    self.score_ellipse(frame, center, test_radius, test_radius, 0.0);
                if score > best.1 {
                    best = (center, score);
                }
                x += step;
            }
            y += step;
        }
        best
    }

    /// Sweep aspect ratio, rotation, and radius at a fixed center, keeping
    /// the first argmax in sweep order.
    fn refine_at_center(
        &self,
        frame: &RgbFrameView<'_>,
        center: Point2<f32>,
        test_radius: f32,
    ) -> (CalibrationModel, f32) {
        let p = &self.params;
        let n_aspect = steps_inclusive(p.aspect_min, p.aspect_max, p.aspect_step);
        let n_rot = steps_inclusive(-p.rotation_range, p.rotation_range, p.rotation_step);
        let n_scale = steps_inclusive(p.radius_scale_min, p.radius_scale_max, p.radius_scale_step);

        let mut best_score = f32::MIN;
        let mut best = (test_radius, test_radius, 0.0f32);

        for ai in 0..n_aspect {
            let aspect = p.aspect_min + ai as f32 * p.aspect_step;
            for ri in 0..n_rot {
                let rotation = -p.rotation_range + ri as f32 * p.rotation_step;
                for si in 0..n_scale {
                    let rx = test_radius * (p.radius_scale_min + si as f32 * p.radius_scale_step);
                    let ry = rx * aspect;
                    let score = self.score_ellipse(frame, center, rx, ry, rotation);
                    if score > best_score {
                        best_score = score;
                        best = (rx, ry, rotation);
                    }
                }
            }
        }

        let (rx, ry, rotation) = best;
        // radii come from strictly positive sweeps, so this cannot fail
        let model = CalibrationModel::new(center, rx, ry, rotation)
            .unwrap_or_else(|_| self.default_model(frame));
        (model, best_score)
    }

    /// Normalized mask score of one ellipse candidate.
    ///
    /// Perimeter hits count `+1`, hits on the surround ring just outside
    /// count `-1`, inner-ring hits count `+inner_weight`. Dividing by the
    /// maximum attainable sum keeps the confidence floor comparable across
    /// sample counts. A uniformly board-colored frame nets out at
    /// `inner_weight / (1 + inner_weight)`, below any sensible floor.
    fn score_ellipse(
        &self,
        frame: &RgbFrameView<'_>,
        center: Point2<f32>,
        rx: f32,
        ry: f32,
        rotation: f32,
    ) -> f32 {
        let p = &self.params;
        let (sin_r, cos_r) = rotation.sin_cos();
        let mut score = 0.0f32;

        for &(ux, uy) in &self.dirs {
            let sample = |radius_x: f32, radius_y: f32| -> bool {
                let ex = radius_x * ux;
                let ey = radius_y * uy;
                let px = center.x + ex * cos_r - ey * sin_r;
                let py = center.y + ex * sin_r + ey * cos_r;
                p.thresholds
                    .is_board_color(frame.get_rgb(px.round() as i32, py.round() as i32))
            };

            if sample(rx, ry) {
                score += 1.0;
            }
            if sample(rx * p.surround_radius_factor, ry * p.surround_radius_factor) {
                score -= 1.0;
            }
            if sample(rx * p.inner_radius_frac, ry * p.inner_radius_frac) {
                score += p.inner_weight;
            }
        }

        score / (self.dirs.len() as f32 * (1.0 + p.inner_weight))
    }

    /// Frame-centered default used when no candidate clears the floor.
    fn default_model(&self, frame: &RgbFrameView<'_>) -> CalibrationModel {
        let w = frame.width as f32;
        let h = frame.height as f32;
        let frac = self.params.fallback_radius_frac;
        CalibrationModel {
            center: Point2::new(0.5 * w, 0.5 * h),
            radius_x: w * frac,
            radius_y: h * frac,
            rotation: 0.0,
        }
    }
}

fn unit_directions(samples: usize) -> Vec<(f32, f32)> {
    let step = std::f32::consts::TAU / samples as f32;
    (0..samples)
        .map(|k| {
            let (sin_t, cos_t) = (k as f32 * step).sin_cos();
            (cos_t, sin_t)
        })
        .collect()
}

fn steps_inclusive(min: f32, max: f32, step: f32) -> usize {
    if step <= 0.0 || max < min {
        return 1;
    }
    ((max - min) / step).round() as usize + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dartscore_core::RgbFrame;

    const GRAY_WALL: [u8; 3] = [120, 120, 120];
    const BOARD_BLACK: [u8; 3] = [20, 20, 20];

    /// Gray background with a dark board disc painted at the given center.
    fn board_frame(cx: f32, cy: f32, radius: f32) -> RgbFrame {
        let mut frame = RgbFrame::filled(240, 180, GRAY_WALL);
        frame.fill_ellipse(cx, cy, radius, radius, 0.0, BOARD_BLACK);
        frame
    }

    #[test]
    fn uniform_black_frame_falls_back_to_default() {
        let frame = RgbFrame::filled(240, 180, [0, 0, 0]);
        let calibrator = AutoCalibrator::new(CalibrationSearchParams::default());
        let fit = calibrator.calibrate(&frame.view());

        assert!(fit.fallback);
        assert_eq!(fit.model.center, nalgebra::Point2::new(120.0, 90.0));
        assert_eq!(fit.model.radius_x, 240.0 * 0.3);
        assert_eq!(fit.model.radius_y, 180.0 * 0.3);
        assert_eq!(fit.model.rotation, 0.0);
    }

    #[test]
    fn uniform_white_frame_falls_back_to_default() {
        let frame = RgbFrame::filled(240, 180, [255, 255, 255]);
        let calibrator = AutoCalibrator::new(CalibrationSearchParams::default());
        assert!(calibrator.calibrate(&frame.view()).fallback);
    }

    #[test]
    fn recovers_center_of_painted_board() {
        // Board radius just above the test radius (0.25 * 180 = 45) so the
        // perimeter lands on board color and the surround ring on the wall.
        let frame = board_frame(118.0, 92.0, 48.0);
        let params = CalibrationSearchParams::default();
        let calibrator = AutoCalibrator::new(params);
        let fit = calibrator.calibrate(&frame.view());

        assert!(!fit.fallback);
        assert!(fit.score > params.confidence_floor);
        let grid_step = 180.0 / params.center_grid_divisor as f32;
        assert!((fit.model.center.x - 118.0).abs() <= grid_step);
        assert!((fit.model.center.y - 92.0).abs() <= grid_step);
    }

    #[test]
    fn recovered_ellipse_hugs_board_painted_on_a_grid_point() {
        // (123, 96) is a candidate of the coarse center grid (margin 48/36,
        // step 15), so the refinement runs with a perfectly centered sweep
        // and a full-score candidate exists: perimeter inside the disc,
        // surround ring on the wall.
        let frame = board_frame(123.0, 96.0, 48.0);
        let calibrator = AutoCalibrator::new(CalibrationSearchParams::default());
        let fit = calibrator.calibrate(&frame.view());

        assert!(!fit.fallback);
        assert_eq!(fit.model.center, nalgebra::Point2::new(123.0, 96.0));
        assert_relative_eq!(fit.score, 1.0, epsilon = 1e-5);
        assert!(fit.model.radius_x <= 48.0 + 1.0);
        assert!(fit.model.radius_y <= 48.0 + 1.0);
    }

    #[test]
    fn tie_break_is_deterministic() {
        let frame = board_frame(120.0, 90.0, 48.0);
        let calibrator = AutoCalibrator::new(CalibrationSearchParams::default());
        let a = calibrator.calibrate(&frame.view());
        let b = calibrator.calibrate(&frame.view());
        assert_eq!(a.model, b.model);
        assert_eq!(a.score, b.score);
    }

    #[test]
    fn steps_inclusive_covers_both_ends() {
        assert_eq!(steps_inclusive(0.7, 1.0, 0.05), 7);
        assert_eq!(steps_inclusive(-0.35, 0.35, 0.07), 11);
        assert_eq!(steps_inclusive(1.0, 1.0, 0.1), 1);
        assert_eq!(steps_inclusive(1.0, 0.5, 0.1), 1);
    }
}
