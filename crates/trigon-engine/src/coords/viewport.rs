/// Rendering viewport in physical pixels.
///
/// Follows the GL convention: `(x, y)` is the bottom-left corner of the
/// viewport, measured from the bottom-left corner of the target.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Viewport covering a whole surface of the given size.
    #[inline]
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Maps an NDC position to window coordinates (bottom-left origin, +Y up).
    ///
    /// `xw = x + (ndc_x + 1) * width / 2`, `yw = y + (ndc_y + 1) * height / 2`.
    #[inline]
    pub fn ndc_to_window(self, ndc_x: f32, ndc_y: f32) -> (f32, f32) {
        let xw = self.x as f32 + (ndc_x + 1.0) * 0.5 * self.width as f32;
        let yw = self.y as f32 + (ndc_y + 1.0) * 0.5 * self.height as f32;
        (xw, yw)
    }

    /// Same mapping as [`ndc_to_window`](Self::ndc_to_window) but with a top-left
    /// origin (+Y down) for a target `target_height` pixels tall.
    ///
    /// This is the row order of texture readbacks.
    #[inline]
    pub fn ndc_to_target(self, ndc_x: f32, ndc_y: f32, target_height: u32) -> (f32, f32) {
        let (xw, yw) = self.ndc_to_window(ndc_x, ndc_y);
        (xw, target_height as f32 - yw)
    }

    /// Converts to a top-left-origin rect `(x, y, w, h)` for a target
    /// `target_height` pixels tall.
    ///
    /// Not clamped: a viewport larger than the target keeps its full extent
    /// (and `y` may go negative), so the NDC mapping is unchanged and geometry
    /// outside the target is clipped by the rasterizer.
    #[inline]
    pub fn to_target_rect(self, target_height: u32) -> (f32, f32, f32, f32) {
        let top = target_height as f32 - (self.y as f32 + self.height as f32);
        (self.x as f32, top, self.width as f32, self.height as f32)
    }

    /// Whether any pixel of a `target_width` x `target_height` target lies
    /// inside the viewport.
    pub fn covers_target(self, target_width: u32, target_height: u32) -> bool {
        !self.is_empty() && self.x < target_width && self.y < target_height
    }
}
