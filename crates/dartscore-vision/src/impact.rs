//! Frame-difference impact detection.
//!
//! Compares consecutive frames inside a bounding square around the
//! calibrated ellipse and reports the pixel of maximum summed per-channel
//! change, provided it clears a fixed noise threshold. This is a
//! maximum-change-point detector, not a blob centroid: cheap, tolerant of
//! partial occlusion, and unable to tell two simultaneous large changes
//! apart (it reports whichever pixel changed most).

use dartscore_core::{CalibrationModel, RgbFrame, RgbFrameView};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// Tunables of the impact detector.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ImpactParams {
    /// Minimum summed |dR|+|dG|+|dB| for a pixel to qualify as an impact.
    pub noise_threshold: u32,
    /// Scan stride in pixels; 1 is exhaustive.
    pub stride: usize,
    /// Bounding square side as a multiple of `2 * max(radius_x, radius_y)`.
    pub region_scale: f32,
}

impl Default for ImpactParams {
    fn default() -> Self {
        Self {
            noise_threshold: 30,
            stride: 2,
            region_scale: 1.2,
        }
    }
}

/// Pixel rectangle scanned for changes, clipped to the frame.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SearchRegion {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

/// Stateful detector holding the previous frame of the comparison pair.
///
/// Frames must be processed in order from a single owner; the stored
/// previous frame is replaced on every processed pair.
pub struct ImpactDetector {
    params: ImpactParams,
    previous: Option<RgbFrame>,
}

impl ImpactDetector {
    pub fn new(params: ImpactParams) -> Self {
        Self {
            params,
            previous: None,
        }
    }

    pub fn params(&self) -> &ImpactParams {
        &self.params
    }

    /// Forget the stored previous frame.
    ///
    /// Called at game start so the transition into a fresh game does not
    /// register as an impact.
    pub fn reset(&mut self) {
        self.previous = None;
    }

    /// Bounding square around the calibrated ellipse, clipped to a
    /// `width x height` frame. Exposed for overlay rendering.
    pub fn search_region(
        &self,
        model: &CalibrationModel,
        width: usize,
        height: usize,
    ) -> SearchRegion {
        let half = model.radius_x.max(model.radius_y) * self.params.region_scale;
        SearchRegion {
            x0: ((model.center.x - half).floor() as i32).max(0),
            y0: ((model.center.y - half).floor() as i32).max(0),
            x1: ((model.center.x + half).ceil() as i32).min(width as i32),
            y1: ((model.center.y + half).ceil() as i32).min(height as i32),
        }
    }

    /// Compare `frame` against the stored previous frame and return the
    /// point of maximum change, if it clears the noise threshold.
    ///
    /// The first call after construction or [`ImpactDetector::reset`] only
    /// seeds the comparison and returns `None`.
    pub fn detect(
        &mut self,
        frame: &RgbFrameView<'_>,
        model: &CalibrationModel,
    ) -> Option<Point2<f32>> {
        let Some(prev) = self.previous.take() else {
            self.previous = Some(frame.to_owned_frame());
            return None;
        };

        let region = self.search_region(model, frame.width, frame.height);
        let stride = self.params.stride.max(1);

        let mut max_diff = 0u32;
        let mut max_at: Option<(i32, i32)> = None;

        let prev_view = prev.view();
        let mut y = region.y0;
        while y < region.y1 {
            let mut x = region.x0;
            while x < region.x1 {
                let a = prev_view.get_rgb(x, y);
                let b = frame.get_rgb(x, y);
                let diff = a
                    .iter()
                    .zip(b.iter())
                    .map(|(&pa, &pb)| pa.abs_diff(pb) as u32)
                    .sum::<u32>();
                if diff > max_diff {
                    max_diff = diff;
                    max_at = Some((x, y));
                }
                x += stride as i32;
            }
            y += stride as i32;
        }

        self.previous = Some(frame.to_owned_frame());

        if max_diff <= self.params.noise_threshold {
            return None;
        }
        let (x, y) = max_at?;
        log::debug!("impact candidate at ({x}, {y}), diff {max_diff}");
        Some(Point2::new(x as f32, y as f32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dartscore_core::RgbFrame;

    fn model() -> CalibrationModel {
        CalibrationModel::new(Point2::new(100.0, 75.0), 50.0, 45.0, 0.0).unwrap()
    }

    fn base_frame() -> RgbFrame {
        RgbFrame::filled(200, 150, [120, 120, 120])
    }

    #[test]
    fn first_frame_only_seeds() {
        let mut det = ImpactDetector::new(ImpactParams::default());
        assert_eq!(det.detect(&base_frame().view(), &model()), None);
    }

    #[test]
    fn identical_frames_yield_none() {
        let mut det = ImpactDetector::new(ImpactParams::default());
        let frame = base_frame();
        assert_eq!(det.detect(&frame.view(), &model()), None);
        assert_eq!(det.detect(&frame.view(), &model()), None);
    }

    #[test]
    fn changed_block_inside_region_is_located() {
        let mut det = ImpactDetector::new(ImpactParams::default());
        let frame = base_frame();
        assert_eq!(det.detect(&frame.view(), &model()), None);

        let mut changed = frame.clone();
        changed.fill_rect(90, 70, 110, 90, [250, 120, 120]);
        let hit = det.detect(&changed.view(), &model()).expect("impact");
        assert!(hit.x >= 90.0 && hit.x < 110.0, "x {}", hit.x);
        assert!(hit.y >= 70.0 && hit.y < 90.0, "y {}", hit.y);
    }

    #[test]
    fn change_below_noise_threshold_is_ignored() {
        let mut det = ImpactDetector::new(ImpactParams::default());
        let frame = base_frame();
        det.detect(&frame.view(), &model());

        // 10 per channel = 30 summed, not strictly above the threshold
        let mut changed = frame.clone();
        changed.fill_rect(95, 70, 105, 80, [130, 130, 130]);
        assert_eq!(det.detect(&changed.view(), &model()), None);
    }

    #[test]
    fn change_outside_region_is_ignored() {
        let mut det = ImpactDetector::new(ImpactParams::default());
        let frame = base_frame();
        det.detect(&frame.view(), &model());

        // region is x in [40, 160), y in [15, 135); paint the far corner
        let mut changed = frame.clone();
        changed.fill_rect(170, 140, 200, 150, [255, 255, 255]);
        assert_eq!(det.detect(&changed.view(), &model()), None);
    }

    #[test]
    fn reset_clears_the_stored_frame() {
        let mut det = ImpactDetector::new(ImpactParams::default());
        let frame = base_frame();
        det.detect(&frame.view(), &model());
        det.reset();

        let mut changed = frame.clone();
        changed.fill_rect(95, 70, 105, 80, [255, 255, 255]);
        // first call after reset only seeds again
        assert_eq!(det.detect(&changed.view(), &model()), None);
    }

    #[test]
    fn region_is_clipped_to_frame_bounds() {
        let det = ImpactDetector::new(ImpactParams::default());
        let m = CalibrationModel::new(Point2::new(10.0, 10.0), 50.0, 40.0, 0.0).unwrap();
        let region = det.search_region(&m, 200, 150);
        assert_eq!(region, SearchRegion { x0: 0, y0: 0, x1: 70, y1: 70 });
    }
}
