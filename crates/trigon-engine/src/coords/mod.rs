//! Viewport geometry.
//!
//! Geometry reaches the GPU in NDC; the viewport maps NDC to physical pixels
//! using the GL convention (bottom-left origin).

mod viewport;

pub use viewport::Viewport;
