use thiserror::Error;

use super::Stage;

/// A stage source rejected by the shader front end.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{stage} shader failed to compile:\n{message}")]
pub struct CompileError {
    pub stage: Stage,
    /// Diagnostic rendered against the offending source.
    pub message: String,
}

/// Two compiled stages that do not form a usable program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("expected a {expected} stage, got a {found} stage")]
    StageMismatch { expected: Stage, found: Stage },

    #[error("{stage} stage has no entry point `{name}`")]
    MissingEntryPoint { stage: Stage, name: &'static str },

    #[error("vertex stage does not write @builtin(position)")]
    MissingPosition,

    #[error("vertex input {0} does not match the mesh layout (@location(0) vec3<f32> or vec4<f32>)")]
    VertexInput(String),

    #[error("fragment input at @location({location}) has no matching vertex output")]
    UnmatchedVarying { location: u32 },

    #[error("fragment stage must write exactly one vec4<f32> to @location(0)")]
    FragmentOutput,

    #[error(
        "{stage} stage binds group {group} binding {binding}; only a vec4<f32> uniform at group 0 binding 0 is provided"
    )]
    ResourceBinding { stage: Stage, group: u32, binding: u32 },
}
