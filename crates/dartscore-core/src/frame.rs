/// Borrowed view over an interleaved RGB frame.
///
/// `data` is row-major with 3 bytes per pixel, `len = width * height * 3`.
#[derive(Clone, Copy, Debug)]
pub struct RgbFrameView<'a> {
    pub width: usize,
    pub height: usize,
    pub data: &'a [u8],
}

/// Owned RGB frame, convertible to [`RgbFrameView`] for processing.
#[derive(Clone, Debug, PartialEq)]
pub struct RgbFrame {
    pub width: usize,
    pub height: usize,
    pub data: Vec<u8>,
}

impl<'a> RgbFrameView<'a> {
    /// Pixel at `(x, y)`, zero outside the frame bounds.
    #[inline]
    pub fn get_rgb(&self, x: i32, y: i32) -> [u8; 3] {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return [0, 0, 0];
        }
        let idx = (y as usize * self.width + x as usize) * 3;
        [self.data[idx], self.data[idx + 1], self.data[idx + 2]]
    }

    pub fn to_owned_frame(&self) -> RgbFrame {
        RgbFrame {
            width: self.width,
            height: self.height,
            data: self.data.to_vec(),
        }
    }
}

impl RgbFrame {
    /// Allocate a frame filled with a uniform color.
    pub fn filled(width: usize, height: usize, rgb: [u8; 3]) -> Self {
        let mut data = Vec::with_capacity(width * height * 3);
        for _ in 0..width * height {
            data.extend_from_slice(&rgb);
        }
        Self {
            width,
            height,
            data,
        }
    }

    #[inline]
    pub fn view(&self) -> RgbFrameView<'_> {
        RgbFrameView {
            width: self.width,
            height: self.height,
            data: &self.data,
        }
    }

    #[inline]
    pub fn set_rgb(&mut self, x: i32, y: i32, rgb: [u8; 3]) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 3;
        self.data[idx..idx + 3].copy_from_slice(&rgb);
    }

    /// Paint an axis-aligned rectangle, clipped to the frame.
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, rgb: [u8; 3]) {
        for y in y0..y1 {
            for x in x0..x1 {
                self.set_rgb(x, y, rgb);
            }
        }
    }

    /// Paint a filled, rotated ellipse. Used to synthesize board frames in
    /// tests and demos.
    pub fn fill_ellipse(
        &mut self,
        cx: f32,
        cy: f32,
        rx: f32,
        ry: f32,
        rotation: f32,
        rgb: [u8; 3],
    ) {
        let extent = rx.max(ry).ceil() as i32 + 1;
        let (sin_r, cos_r) = rotation.sin_cos();
        for y in (cy as i32 - extent)..=(cy as i32 + extent) {
            for x in (cx as i32 - extent)..=(cx as i32 + extent) {
                let dx = x as f32 - cx;
                let dy = y as f32 - cy;
                // inverse-rotate into the ellipse's own axes
                let ex = dx * cos_r + dy * sin_r;
                let ey = -dx * sin_r + dy * cos_r;
                let q = (ex / rx).powi(2) + (ey / ry).powi(2);
                if q <= 1.0 {
                    self.set_rgb(x, y, rgb);
                }
            }
        }
    }
}

/// Bilinear sample of one channel (`0..3`) at a subpixel position.
#[inline]
pub fn sample_channel_bilinear(src: &RgbFrameView<'_>, x: f32, y: f32, channel: usize) -> f32 {
    let x0 = x.floor() as i32;
    let y0 = y.floor() as i32;
    let fx = x - x0 as f32;
    let fy = y - y0 as f32;

    let p00 = src.get_rgb(x0, y0)[channel] as f32;
    let p10 = src.get_rgb(x0 + 1, y0)[channel] as f32;
    let p01 = src.get_rgb(x0, y0 + 1)[channel] as f32;
    let p11 = src.get_rgb(x0 + 1, y0 + 1)[channel] as f32;

    let a = p00 + fx * (p10 - p00);
    let b = p01 + fx * (p11 - p01);
    a + fy * (b - a)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn get_rgb_zero_padded_outside_bounds() {
        let frame = RgbFrame::filled(4, 3, [10, 20, 30]);
        let view = frame.view();
        assert_eq!(view.get_rgb(0, 0), [10, 20, 30]);
        assert_eq!(view.get_rgb(-1, 0), [0, 0, 0]);
        assert_eq!(view.get_rgb(4, 0), [0, 0, 0]);
        assert_eq!(view.get_rgb(0, 3), [0, 0, 0]);
    }

    #[test]
    fn fill_ellipse_paints_center_not_corner() {
        let mut frame = RgbFrame::filled(40, 40, [0, 0, 0]);
        frame.fill_ellipse(20.0, 20.0, 10.0, 6.0, 0.0, [200, 0, 0]);
        let view = frame.view();
        assert_eq!(view.get_rgb(20, 20), [200, 0, 0]);
        // inside rx on the x axis, outside ry on the y axis
        assert_eq!(view.get_rgb(28, 20), [200, 0, 0]);
        assert_eq!(view.get_rgb(20, 28), [0, 0, 0]);
        assert_eq!(view.get_rgb(0, 0), [0, 0, 0]);
    }

    #[test]
    fn bilinear_interpolates_between_pixels() {
        let mut frame = RgbFrame::filled(2, 1, [0, 0, 0]);
        frame.set_rgb(1, 0, [100, 0, 0]);
        let view = frame.view();
        let mid = sample_channel_bilinear(&view, 0.5, 0.0, 0);
        assert!((mid - 50.0).abs() < 1e-3);
    }
}
