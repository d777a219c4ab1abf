//! Frame-to-score pipeline.
//!
//! Owns the current calibration, the impact detector, and a single
//! registered score consumer. The host feeds frames in capture order;
//! every detected impact is transformed, classified, and emitted through
//! the callback. Manual score entry bypasses this pipeline entirely and
//! goes straight to the game session.

use dartscore_core::{classify, CalibrationModel, RgbFrameView, ScoreError, ScoreResult};

use crate::calibrate::{AutoCalibrator, CalibrationFit, CalibrationSearchParams};
use crate::impact::{ImpactDetector, ImpactParams, SearchRegion};

type ScoreCallback = Box<dyn FnMut(ScoreResult) + Send>;

pub struct ScorePipeline {
    calibrator: AutoCalibrator,
    detector: ImpactDetector,
    calibration: Option<CalibrationModel>,
    on_score: Option<ScoreCallback>,
}

impl Default for ScorePipeline {
    fn default() -> Self {
        Self::new(
            CalibrationSearchParams::default(),
            ImpactParams::default(),
        )
    }
}

impl ScorePipeline {
    pub fn new(search: CalibrationSearchParams, impact: ImpactParams) -> Self {
        Self {
            calibrator: AutoCalibrator::new(search),
            detector: ImpactDetector::new(impact),
            calibration: None,
            on_score: None,
        }
    }

    /// Currently installed calibration, if any.
    pub fn calibration(&self) -> Option<&CalibrationModel> {
        self.calibration.as_ref()
    }

    /// Install a calibration produced elsewhere (manual calibration).
    ///
    /// The model is replaced as a whole; there is no partial update.
    pub fn set_calibration(&mut self, model: CalibrationModel) {
        self.calibration = Some(model);
    }

    /// Run the auto-calibration search on `frame` and install the result.
    pub fn calibrate_from(&mut self, frame: &RgbFrameView<'_>) -> CalibrationFit {
        let fit = self.calibrator.calibrate(frame);
        self.calibration = Some(fit.model);
        fit
    }

    /// Register the score consumer, replacing any prior one.
    pub fn on_score(&mut self, callback: impl FnMut(ScoreResult) + Send + 'static) {
        self.on_score = Some(Box::new(callback));
    }

    /// Forget the frame-comparison state (used at game start so the
    /// transition does not register as an impact).
    pub fn reset_frame_comparison(&mut self) {
        self.detector.reset();
    }

    /// Detection region for overlay rendering.
    pub fn search_region(&self, width: usize, height: usize) -> Option<SearchRegion> {
        let model = self.calibration.as_ref()?;
        Some(self.detector.search_region(model, width, height))
    }

    /// Process the next captured frame.
    ///
    /// Returns the score of a detected impact (also emitted through the
    /// registered callback), `Ok(None)` when nothing changed enough, and
    /// [`ScoreError::NotCalibrated`] before any calibration is installed —
    /// an uncalibrated frame must not be read as a miss.
    pub fn process_frame(
        &mut self,
        frame: &RgbFrameView<'_>,
    ) -> Result<Option<ScoreResult>, ScoreError> {
        let model = self.calibration.ok_or(ScoreError::NotCalibrated)?;

        let Some(impact) = self.detector.detect(frame, &model) else {
            return Ok(None);
        };

        let canonical = model.canonical(impact);
        let score = classify(canonical, model.radius_x);
        log::info!(
            "impact at ({:.0}, {:.0}) scored {}x{}",
            impact.x,
            impact.y,
            score.value,
            score.multiplier
        );
        if let Some(cb) = self.on_score.as_mut() {
            cb(score);
        }
        Ok(Some(score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dartscore_core::RgbFrame;
    use nalgebra::Point2;
    use std::sync::{Arc, Mutex};

    fn calibrated_pipeline() -> ScorePipeline {
        let mut pipeline = ScorePipeline::default();
        pipeline.set_calibration(
            CalibrationModel::new(Point2::new(100.0, 75.0), 60.0, 60.0, 0.0).unwrap(),
        );
        pipeline
    }

    #[test]
    fn uncalibrated_frame_is_an_error_not_a_miss() {
        let mut pipeline = ScorePipeline::default();
        let frame = RgbFrame::filled(200, 150, [120, 120, 120]);
        assert_eq!(
            pipeline.process_frame(&frame.view()),
            Err(ScoreError::NotCalibrated)
        );
    }

    #[test]
    fn impact_near_center_scores_a_bull() {
        let mut pipeline = calibrated_pipeline();
        let frame = RgbFrame::filled(200, 150, [120, 120, 120]);
        assert_eq!(pipeline.process_frame(&frame.view()), Ok(None));

        let mut changed = frame.clone();
        changed.fill_rect(99, 74, 102, 77, [255, 255, 255]);
        let score = pipeline
            .process_frame(&changed.view())
            .unwrap()
            .expect("impact");
        assert_eq!(score, ScoreResult::new(50, 1));
    }

    #[test]
    fn registering_a_callback_replaces_the_prior_one() {
        let mut pipeline = calibrated_pipeline();
        let first = Arc::new(Mutex::new(0u32));
        let second = Arc::new(Mutex::new(0u32));

        let f = Arc::clone(&first);
        pipeline.on_score(move |_| *f.lock().unwrap() += 1);
        let s = Arc::clone(&second);
        pipeline.on_score(move |_| *s.lock().unwrap() += 1);

        let frame = RgbFrame::filled(200, 150, [120, 120, 120]);
        pipeline.process_frame(&frame.view()).unwrap();
        let mut changed = frame.clone();
        changed.fill_rect(99, 74, 102, 77, [255, 255, 255]);
        pipeline.process_frame(&changed.view()).unwrap();

        assert_eq!(*first.lock().unwrap(), 0);
        assert_eq!(*second.lock().unwrap(), 1);
    }

    #[test]
    fn reset_frame_comparison_reseeds() {
        let mut pipeline = calibrated_pipeline();
        let frame = RgbFrame::filled(200, 150, [120, 120, 120]);
        pipeline.process_frame(&frame.view()).unwrap();

        pipeline.reset_frame_comparison();
        let mut changed = frame.clone();
        changed.fill_rect(99, 74, 102, 77, [255, 255, 255]);
        // first frame after reset only seeds, even though it differs
        assert_eq!(pipeline.process_frame(&changed.view()), Ok(None));
    }
}
