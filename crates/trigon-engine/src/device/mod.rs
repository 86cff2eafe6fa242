//! GPU device + surface management.
//!
//! This module is responsible for:
//! - creating the wgpu Instance/Adapter/Device/Queue (windowed or headless)
//! - creating & configuring the Surface (swapchain)
//! - acquiring frames and mapping surface errors to host actions

mod context;
mod error;
mod frame;
mod init;
mod surface;
mod window;

pub use context::GpuContext;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use init::GpuInit;
pub use window::Gpu;
