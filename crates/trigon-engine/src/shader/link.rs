use naga::{AddressSpace, Binding, BuiltIn, Handle, Module, Scalar, Type, TypeInner, VectorSize};

use super::{CompiledStage, LinkError, Stage};

/// A vertex + fragment pair whose interfaces agree with each other and with
/// the renderer's buffer and uniform layout.
#[derive(Debug)]
pub struct LinkedProgram {
    vertex: CompiledStage,
    fragment: CompiledStage,
}

impl LinkedProgram {
    #[inline]
    pub fn vertex(&self) -> &CompiledStage {
        &self.vertex
    }

    #[inline]
    pub fn fragment(&self) -> &CompiledStage {
        &self.fragment
    }
}

/// One bound entry point input or output, flattened out of any IO struct.
struct Io {
    binding: Binding,
    ty: TypeInner,
}

const VEC3_F32: TypeInner = TypeInner::Vector {
    size: VectorSize::Tri,
    scalar: Scalar::F32,
};

const VEC4_F32: TypeInner = TypeInner::Vector {
    size: VectorSize::Quad,
    scalar: Scalar::F32,
};

/// Links two compiled stages.
///
/// Checked, in order:
/// - stage kinds and entry points (`vs_main`, `fs_main`)
/// - the vertex stage writes the clip position
/// - vertex inputs fit the mesh layout (`@location(0) vec3<f32>`)
/// - every fragment varying is produced by the vertex stage
/// - the fragment stage writes one `vec4<f32>` color
/// - resource bindings fit the single color uniform
pub fn link(vertex: CompiledStage, fragment: CompiledStage) -> Result<LinkedProgram, LinkError> {
    expect_stage(&vertex, Stage::Vertex)?;
    expect_stage(&fragment, Stage::Fragment)?;

    let vs = entry_point(&vertex)?;
    let fs = entry_point(&fragment)?;

    let vs_inputs = inputs(vertex.module(), vs);
    let vs_outputs = outputs(vertex.module(), vs);
    let fs_inputs = inputs(fragment.module(), fs);
    let fs_outputs = outputs(fragment.module(), fs);

    if !vs_outputs
        .iter()
        .any(|io| matches!(io.binding, Binding::BuiltIn(BuiltIn::Position { .. })))
    {
        return Err(LinkError::MissingPosition);
    }

    for io in &vs_inputs {
        match io.binding {
            Binding::BuiltIn(_) => {}
            // A vec4 input reads the 3-component attribute with w = 1.
            Binding::Location { location: 0, .. } if io.ty == VEC3_F32 || io.ty == VEC4_F32 => {}
            ref other => return Err(LinkError::VertexInput(format!("{other:?}"))),
        }
    }

    for io in &fs_inputs {
        let Binding::Location { location, .. } = io.binding else { continue };
        let produced = vs_outputs.iter().any(|out| {
            matches!(out.binding, Binding::Location { location: l, .. } if l == location)
                && out.ty == io.ty
        });
        if !produced {
            return Err(LinkError::UnmatchedVarying { location });
        }
    }

    let color_outputs: Vec<&Io> = fs_outputs
        .iter()
        .filter(|io| matches!(io.binding, Binding::Location { .. }))
        .collect();
    match color_outputs.as_slice() {
        [only] if matches!(only.binding, Binding::Location { location: 0, .. }) && only.ty == VEC4_F32 => {}
        _ => return Err(LinkError::FragmentOutput),
    }

    check_resources(&vertex)?;
    check_resources(&fragment)?;

    log::debug!("linked {} + {} stages", vertex.stage(), fragment.stage());

    Ok(LinkedProgram { vertex, fragment })
}

fn expect_stage(stage: &CompiledStage, expected: Stage) -> Result<(), LinkError> {
    if stage.stage() == expected {
        Ok(())
    } else {
        Err(LinkError::StageMismatch {
            expected,
            found: stage.stage(),
        })
    }
}

fn entry_point(stage: &CompiledStage) -> Result<&naga::EntryPoint, LinkError> {
    let kind = stage.stage();
    let name = kind.entry_point();
    stage
        .module()
        .entry_points
        .iter()
        .find(|ep| ep.stage == kind.naga() && ep.name == name)
        .ok_or(LinkError::MissingEntryPoint { stage: kind, name })
}

fn check_resources(stage: &CompiledStage) -> Result<(), LinkError> {
    let module = stage.module();
    for (_, var) in module.global_variables.iter() {
        let Some(rb) = var.binding.as_ref() else { continue };
        let ok = var.space == AddressSpace::Uniform
            && rb.group == 0
            && rb.binding == 0
            && module.types[var.ty].inner == VEC4_F32;
        if !ok {
            return Err(LinkError::ResourceBinding {
                stage: stage.stage(),
                group: rb.group,
                binding: rb.binding,
            });
        }
    }
    Ok(())
}

fn inputs(module: &Module, ep: &naga::EntryPoint) -> Vec<Io> {
    let mut out = Vec::new();
    for arg in &ep.function.arguments {
        flatten(module, arg.ty, arg.binding.as_ref(), &mut out);
    }
    out
}

fn outputs(module: &Module, ep: &naga::EntryPoint) -> Vec<Io> {
    let mut out = Vec::new();
    if let Some(result) = ep.function.result.as_ref() {
        flatten(module, result.ty, result.binding.as_ref(), &mut out);
    }
    out
}

fn flatten(module: &Module, ty: Handle<Type>, binding: Option<&Binding>, out: &mut Vec<Io>) {
    let inner = &module.types[ty].inner;
    match binding {
        Some(b) => out.push(Io {
            binding: b.clone(),
            ty: inner.clone(),
        }),
        None => {
            if let TypeInner::Struct { members, .. } = inner {
                for m in members {
                    flatten(module, m.ty, m.binding.as_ref(), out);
                }
            }
        }
    }
}
