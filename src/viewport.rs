//! Viewport bookkeeping: logical canvas size and device pixel ratio.
//!
//! The viewport tracks the window's logical dimensions plus the device pixel
//! ratio, clamped to [`MAX_PIXEL_RATIO`]. The render surface is sized to the
//! logical dimensions scaled by the clamped ratio, so high-density displays
//! render at native sharpness without paying for ratios beyond 2.

/// Upper bound for the device pixel ratio applied to the render surface.
pub const MAX_PIXEL_RATIO: f64 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Logical width in pixels.
    pub width: u32,
    /// Logical height in pixels.
    pub height: u32,
    /// Device pixel ratio, already clamped to [`MAX_PIXEL_RATIO`].
    pub pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, scale_factor: f64) -> Self {
        Self {
            width,
            height,
            pixel_ratio: scale_factor.clamp(0.0, MAX_PIXEL_RATIO),
        }
    }

    /// Recompute all three dimensions from a resize signal.
    pub fn resize(&mut self, width: u32, height: u32, scale_factor: f64) {
        self.width = width;
        self.height = height;
        self.pixel_ratio = scale_factor.clamp(0.0, MAX_PIXEL_RATIO);
    }

    /// Aspect ratio used by the camera projection.
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Physical size of the render surface: logical size times the clamped
    /// pixel ratio, never below one pixel per axis.
    pub fn render_size(&self) -> (u32, u32) {
        let scale = |v: u32| ((v as f64 * self.pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}
