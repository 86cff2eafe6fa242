use std::borrow::Cow;
use std::fmt;

/// Vertex stage entry point name.
pub const VS_ENTRY: &str = "vs_main";

/// Fragment stage entry point name.
pub const FS_ENTRY: &str = "fs_main";

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Stage {
    Vertex,
    Fragment,
}

impl Stage {
    pub(crate) fn naga(self) -> naga::ShaderStage {
        match self {
            Stage::Vertex => naga::ShaderStage::Vertex,
            Stage::Fragment => naga::ShaderStage::Fragment,
        }
    }

    pub(crate) fn entry_point(self) -> &'static str {
        match self {
            Stage::Vertex => VS_ENTRY,
            Stage::Fragment => FS_ENTRY,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Vertex => f.write_str("vertex"),
            Stage::Fragment => f.write_str("fragment"),
        }
    }
}

/// WGSL sources for the two program stages.
///
/// The defaults pass positions through unchanged and fill with the uniform
/// color bound at group 0, binding 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    pub vertex: Cow<'static, str>,
    pub fragment: Cow<'static, str>,
}

impl ShaderSources {
    pub fn new(vertex: impl Into<Cow<'static, str>>, fragment: impl Into<Cow<'static, str>>) -> Self {
        Self {
            vertex: vertex.into(),
            fragment: fragment.into(),
        }
    }
}

impl Default for ShaderSources {
    fn default() -> Self {
        Self::new(
            include_str!("shaders/position.wgsl"),
            include_str!("shaders/solid_color.wgsl"),
        )
    }
}
