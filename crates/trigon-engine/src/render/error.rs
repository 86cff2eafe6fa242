use thiserror::Error;

use crate::shader::{CompileError, LinkError};

/// Failure of [`Renderer::initialize`](super::Renderer::initialize).
///
/// Compile and link failures are fatal for the surface: the sources are static,
/// so retrying would fail the same way.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RendererError {
    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("shader program failed to link: {0}")]
    Link(#[from] LinkError),

    #[error("renderer is already initialized")]
    AlreadyInitialized,
}
