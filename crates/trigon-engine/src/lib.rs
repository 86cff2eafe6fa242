//! Trigon engine crate.
//!
//! A rendering core that draws one static, solid-colored mesh, plus the
//! platform + GPU runtime pieces that host it.

pub mod coords;
pub mod device;
pub mod host;
pub mod logging;
pub mod mesh;
pub mod paint;
pub mod render;
pub mod shader;
