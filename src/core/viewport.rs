/// Size of the drawing area in CSS pixels plus the capped device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, device_pixel_ratio: f32, max_pixel_ratio: f32) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
            pixel_ratio: capped_pixel_ratio(device_pixel_ratio, max_pixel_ratio),
        }
    }

    /// Apply a window size change. The newest size always wins.
    pub fn resize(&mut self, width: f32, height: f32, device_pixel_ratio: f32, max_pixel_ratio: f32) {
        *self = Self::new(width, height, device_pixel_ratio, max_pixel_ratio);
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Backing-store size in device pixels, never smaller than 1x1.
    pub fn render_size(&self) -> (u32, u32) {
        let w = (self.width * self.pixel_ratio).floor() as u32;
        let h = (self.height * self.pixel_ratio).floor() as u32;
        (w.max(1), h.max(1))
    }
}

#[inline]
pub fn capped_pixel_ratio(device_pixel_ratio: f32, max_pixel_ratio: f32) -> f32 {
    if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
        device_pixel_ratio.min(max_pixel_ratio)
    } else {
        1.0
    }
}
