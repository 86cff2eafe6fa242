use super::{CompileError, Stage};

/// One stage that parsed and validated cleanly.
#[derive(Debug)]
pub struct CompiledStage {
    stage: Stage,
    source: String,
    module: naga::Module,
}

impl CompiledStage {
    #[inline]
    pub fn stage(&self) -> Stage {
        self.stage
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub(crate) fn module(&self) -> &naga::Module {
        &self.module
    }
}

/// Parses and validates a WGSL source for `stage`.
///
/// Entry points and interfaces are not checked here; that is `link`'s job.
pub fn compile(stage: Stage, source: &str) -> Result<CompiledStage, CompileError> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| CompileError {
        stage,
        message: e.emit_to_string(source),
    })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    );
    validator.validate(&module).map_err(|e| CompileError {
        stage,
        message: e.emit_to_string(source),
    })?;

    log::debug!("compiled {stage} shader ({} entry points)", module.entry_points.len());

    Ok(CompiledStage {
        stage,
        source: source.to_owned(),
        module,
    })
}
