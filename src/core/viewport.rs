/// Drawing area inside the window, in physical pixels
///
/// The drawing area is inset from every window edge by the body margin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Viewport for a window of `window_width` x `window_height` with `margin`
    /// on every side: `(W - 2M, H - 2M)`
    pub fn from_window(window_width: u32, window_height: u32, margin: u32) -> Self {
        Self {
            x: margin,
            y: margin,
            width: window_width.saturating_sub(margin.saturating_mul(2)),
            height: window_height.saturating_sub(margin.saturating_mul(2)),
        }
    }

    /// Width over height, `None` while the viewport has no area
    pub fn aspect(&self) -> Option<f32> {
        if self.is_empty() {
            None
        } else {
            Some(self.width as f32 / self.height as f32)
        }
    }

    /// True when the window is minimized or smaller than the margins
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}
