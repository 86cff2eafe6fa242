use wgpu::util::DeviceExt;

use crate::coords::Viewport;
use crate::mesh::Mesh;
use crate::paint::Color;
use crate::render::{RenderCtx, RenderTarget, RendererError};
use crate::shader::{compile, link, ShaderProgram, ShaderSources, Stage};

/// What a call to [`Renderer::render_frame`] recorded.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameOutcome {
    /// Cleared and drew the mesh.
    Drawn,
    /// Cleared only; the viewport covers no pixels of the target.
    Cleared,
    /// Nothing recorded; the renderer is not initialized.
    Skipped,
}

/// Draws one static mesh in one solid color.
///
/// Construction is two-phase: [`Renderer::new`] only sets up CPU state, GPU
/// objects are created by [`initialize`](Self::initialize) once a device is live.
/// The renderer is either uninitialized or ready; it never holds a partially
/// built program.
pub struct Renderer {
    mesh: Mesh,
    color: Color,
    sources: ShaderSources,

    clear_color: Color,
    viewport: Viewport,

    gpu: Option<GpuResources>,
    warned_uninitialized: bool,
}

struct GpuResources {
    program: ShaderProgram,
    vertex_buffer: wgpu::Buffer,
    // Kept alongside the bind group that references it.
    _color_ubo: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl Renderer {
    /// Green triangle with the default shaders.
    pub fn new() -> Self {
        Self {
            mesh: Mesh::triangle(),
            color: Color::GREEN,
            sources: ShaderSources::default(),
            clear_color: Color::BLACK,
            viewport: Viewport::default(),
            gpu: None,
            warned_uninitialized: false,
        }
    }

    /// Replaces the shader sources used by the next [`initialize`](Self::initialize).
    pub fn with_shaders(mut self, sources: ShaderSources) -> Self {
        self.sources = sources;
        self
    }

    #[inline]
    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    #[inline]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.gpu.is_some()
    }

    /// The linked program, once initialized.
    pub fn program(&self) -> Option<&ShaderProgram> {
        self.gpu.as_ref().map(|g| &g.program)
    }

    /// Builds the shader program and the mesh/color buffers.
    ///
    /// Call once, after the GPU context exists. On error the renderer stays
    /// uninitialized and [`render_frame`](Self::render_frame) keeps skipping.
    pub fn initialize(
        &mut self,
        ctx: &RenderCtx<'_>,
        clear_color: Color,
    ) -> Result<(), RendererError> {
        if self.gpu.is_some() {
            return Err(RendererError::AlreadyInitialized);
        }

        let vertex = compile(Stage::Vertex, &self.sources.vertex)?;
        let fragment = compile(Stage::Fragment, &self.sources.fragment)?;
        let linked = link(vertex, fragment)?;

        let program = ShaderProgram::new(ctx, &linked);

        let vertex_buffer = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("trigon mesh vbo"),
            contents: self.mesh.as_bytes(),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let color_ubo = ctx.device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("trigon color ubo"),
            contents: bytemuck::bytes_of(&self.color.to_uniform()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("trigon color bind group"),
            layout: program.bind_group_layout(),
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: color_ubo.as_entire_binding(),
            }],
        });

        log::info!(
            "renderer initialized for {:?}: {} vertices, {} bytes of vertex data",
            program.format(),
            self.mesh.vertex_count(),
            self.mesh.as_bytes().len()
        );

        self.clear_color = clear_color;
        self.gpu = Some(GpuResources {
            program,
            vertex_buffer,
            _color_ubo: color_ubo,
            bind_group,
        });

        Ok(())
    }

    /// Sets the viewport to the full surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::full(width, height);
        log::debug!("viewport set to {width}x{height}");
    }

    /// Records one frame: clear, then draw the mesh through the current viewport.
    ///
    /// Recording the same state twice yields the same pixels.
    pub fn render_frame(&mut self, target: &mut RenderTarget<'_>) -> FrameOutcome {
        let Some(gpu) = self.gpu.as_ref() else {
            if !self.warned_uninitialized {
                log::warn!("frame requested before renderer initialization; skipping");
                self.warned_uninitialized = true;
            }
            return FrameOutcome::Skipped;
        };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("trigon frame pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        if !self.viewport.covers_target(target.width, target.height) {
            log::trace!("viewport {:?} covers no pixels; clear only", self.viewport);
            return FrameOutcome::Cleared;
        }

        let (x, y, w, h) = self.viewport.to_target_rect(target.height);
        rpass.set_viewport(x, y, w, h, 0.0, 1.0);
        rpass.set_pipeline(gpu.program.pipeline());
        rpass.set_bind_group(0, &gpu.bind_group, &[]);
        rpass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
        rpass.draw(0..self.mesh.vertex_count(), 0..1);

        log::trace!("drew {} vertices", self.mesh.vertex_count());
        FrameOutcome::Drawn
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}
