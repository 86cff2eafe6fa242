//! Color model shared by the renderer and the surface host.
//!
//! Colors are straight (non-premultiplied) RGBA with channels in `[0, 1]`.

pub mod color;

pub use color::Color;
