//! Shader compile + link pipeline.
//!
//! Mirrors the classic two-step program build:
//! - `compile` parses and validates one stage source (WGSL, via naga)
//! - `link` checks that a vertex and a fragment stage fit together and fit the
//!   mesh/uniform layout used by the renderer
//! - `ShaderProgram` turns a linked program into GPU objects
//!
//! Compile and link run on the CPU only, so a bad source is rejected before any
//! GPU object exists.

mod compile;
mod error;
mod link;
mod program;
mod source;

pub use compile::{compile, CompiledStage};
pub use error::{CompileError, LinkError};
pub use link::{link, LinkedProgram};
pub use program::ShaderProgram;
pub use source::{ShaderSources, Stage, FS_ENTRY, VS_ENTRY};
