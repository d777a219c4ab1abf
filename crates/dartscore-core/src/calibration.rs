//! The calibrated board ellipse and the image-to-canonical transform.

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

/// Ellipse fitted to the board's outer double ring in image space.
///
/// Only calibration operations (manual set or the auto-search) produce new
/// models; scoring paths treat a model as immutable. Replacing a model is
/// always a whole-value assignment, never a field-by-field update.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CalibrationModel {
    pub center: Point2<f32>,
    pub radius_x: f32,
    pub radius_y: f32,
    /// Rotation of the ellipse's x axis, radians, counter-clockwise.
    pub rotation: f32,
}

impl CalibrationModel {
    /// Build a model, rejecting degenerate radii.
    pub fn new(
        center: Point2<f32>,
        radius_x: f32,
        radius_y: f32,
        rotation: f32,
    ) -> Result<Self, ScoreError> {
        if !(radius_x > 0.0 && radius_y > 0.0) {
            return Err(ScoreError::InvalidModel { radius_x, radius_y });
        }
        Ok(Self {
            center,
            radius_x,
            radius_y,
            rotation,
        })
    }

    /// Map an image point into the canonical frame: board centered at the
    /// origin as a circle of radius `radius_x`.
    ///
    /// Translate by `-center`, rotate by `-rotation`, then stretch y by
    /// `radius_x / radius_y` to undo the ellipse's aspect.
    pub fn canonical(&self, p: Point2<f32>) -> Point2<f32> {
        let dx = p.x - self.center.x;
        let dy = p.y - self.center.y;
        let (sin_r, cos_r) = self.rotation.sin_cos();
        let x = dx * cos_r + dy * sin_r;
        let y = -dx * sin_r + dy * cos_r;
        Point2::new(x, y * self.radius_x / self.radius_y)
    }

    /// Image-space point on the ellipse at parameter angle `t` (radians).
    ///
    /// Inverse of [`CalibrationModel::canonical`] restricted to the outer
    /// ring; used by overlay rendering and tests.
    pub fn point_on_outer_ring(&self, t: f32) -> Point2<f32> {
        let (sin_t, cos_t) = t.sin_cos();
        let ex = self.radius_x * cos_t;
        let ey = self.radius_y * sin_t;
        let (sin_r, cos_r) = self.rotation.sin_cos();
        Point2::new(
            self.center.x + ex * cos_r - ey * sin_r,
            self.center.y + ex * sin_r + ey * cos_r,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rejects_degenerate_radii() {
        assert!(CalibrationModel::new(Point2::new(0.0, 0.0), 0.0, 10.0, 0.0).is_err());
        assert!(CalibrationModel::new(Point2::new(0.0, 0.0), 10.0, -1.0, 0.0).is_err());
        assert!(CalibrationModel::new(Point2::new(0.0, 0.0), 10.0, 10.0, 0.0).is_ok());
    }

    #[test]
    fn identity_model_maps_rim_point_to_radius() {
        let model =
            CalibrationModel::new(Point2::new(320.0, 240.0), 100.0, 100.0, 0.0).unwrap();
        let c = model.canonical(Point2::new(420.0, 240.0));
        assert_relative_eq!(c.x, 100.0, epsilon = 1e-4);
        assert_relative_eq!(c.y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn canonical_undoes_rotation_and_aspect() {
        let model =
            CalibrationModel::new(Point2::new(100.0, 80.0), 60.0, 40.0, 0.5).unwrap();
        for k in 0..12 {
            let t = k as f32 * std::f32::consts::TAU / 12.0;
            let p = model.point_on_outer_ring(t);
            let c = model.canonical(p);
            let norm = (c.x * c.x + c.y * c.y).sqrt();
            assert_relative_eq!(norm, model.radius_x, epsilon = 1e-3);
        }
    }

    #[test]
    fn serde_round_trip() {
        let model =
            CalibrationModel::new(Point2::new(12.5, 8.25), 30.0, 24.0, -0.2).unwrap();
        let json = serde_json::to_string(&model).unwrap();
        let back: CalibrationModel = serde_json::from_str(&json).unwrap();
        assert_eq!(model, back);
    }
}
