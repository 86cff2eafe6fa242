//! Frame rendering.
//!
//! The [`Renderer`] owns the shader program and the mesh buffers and records
//! one pass per frame into a [`RenderTarget`].
//!
//! Convention:
//! - mesh positions are NDC and reach the rasterizer unchanged
//! - the viewport follows the GL convention (bottom-left origin)

mod ctx;
mod error;
pub mod offscreen;
mod renderer;

pub use ctx::{RenderCtx, RenderTarget};
pub use error::RendererError;
pub use offscreen::{OffscreenTarget, Snapshot};
pub use renderer::{FrameOutcome, Renderer};
