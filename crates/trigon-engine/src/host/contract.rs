use anyhow::{Context, Result};

use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget, Renderer};

/// Lifecycle callbacks a surface host drives.
///
/// Order guaranteed by the host:
/// - `on_surface_created` once, after the GPU context exists
/// - `on_surface_changed` right after creation and on every size change
/// - `on_draw_frame` once per display refresh
pub trait SurfaceRenderer {
    /// An error here is fatal for the surface; the host shuts down.
    fn on_surface_created(&mut self, ctx: &RenderCtx<'_>) -> Result<()>;

    fn on_surface_changed(&mut self, width: u32, height: u32);

    fn on_draw_frame(&mut self, target: &mut RenderTarget<'_>);
}

impl SurfaceRenderer for Renderer {
    fn on_surface_created(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        self.initialize(ctx, Color::BLACK)
            .context("failed to initialize renderer")
    }

    fn on_surface_changed(&mut self, width: u32, height: u32) {
        self.resize(width, height);
    }

    fn on_draw_frame(&mut self, target: &mut RenderTarget<'_>) {
        self.render_frame(target);
    }
}
