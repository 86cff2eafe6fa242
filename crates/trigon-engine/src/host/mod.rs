//! Surface host.
//!
//! The host owns the window, the GPU context and the surface, and forwards the
//! three surface lifecycle events to a [`SurfaceRenderer`] on the event-loop
//! thread. Callbacks never overlap.

mod contract;
mod runtime;

pub use contract::SurfaceRenderer;
pub use runtime::{Runtime, RuntimeConfig};
