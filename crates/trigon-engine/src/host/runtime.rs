use anyhow::{Context, Result};
use ouroboros::self_referencing;

use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize};
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowId};

use crate::device::{Gpu, GpuInit, SurfaceErrorAction};
use crate::render::RenderTarget;

use super::SurfaceRenderer;

/// Window/runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub title: String,
    pub initial_size: LogicalSize<f64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            title: "trigon".to_string(),
            initial_size: LogicalSize::new(800.0, 600.0),
        }
    }
}

/// Entry point for the host.
pub struct Runtime;

impl Runtime {
    /// Opens one window and drives `renderer` until the window closes.
    ///
    /// Returns the fatal error that stopped the loop, if any (for example a
    /// shader that failed to compile).
    pub fn run<R>(config: RuntimeConfig, gpu_init: GpuInit, renderer: R) -> Result<()>
    where
        R: SurfaceRenderer + 'static,
    {
        let event_loop = EventLoop::new().context("failed to create winit EventLoop")?;
        let mut state = HostState::new(config, gpu_init, renderer);

        event_loop
            .run_app(&mut state)
            .context("winit event loop terminated with error")?;

        match state.fatal.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

#[self_referencing]
struct SurfaceEntry {
    window: Window,

    #[borrows(window)]
    #[covariant]
    gpu: Gpu<'this>,
}

struct HostState<R>
where
    R: SurfaceRenderer + 'static,
{
    config: RuntimeConfig,
    gpu_init: GpuInit,
    renderer: R,

    surface: Option<SurfaceEntry>,
    fatal: Option<anyhow::Error>,
}

impl<R> HostState<R>
where
    R: SurfaceRenderer + 'static,
{
    fn new(config: RuntimeConfig, gpu_init: GpuInit, renderer: R) -> Self {
        Self {
            config,
            gpu_init,
            renderer,
            surface: None,
            fatal: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{err:#}");
        if self.fatal.is_none() {
            self.fatal = Some(err);
        }
        event_loop.exit();
    }

    /// Creates the window + GPU surface and runs the created/changed callbacks.
    fn create_surface(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title(self.config.title.clone())
            .with_inner_size(self.config.initial_size);

        let window = event_loop
            .create_window(attrs)
            .context("failed to create window")?;

        let gpu_init = self.gpu_init.clone();
        let entry = SurfaceEntry::try_new(window, |w| pollster::block_on(Gpu::new(w, gpu_init)))
            .context("GPU initialization failed for window")?;

        let size = entry.borrow_gpu().size();
        log::info!(
            "surface ready: {:?} {}x{}",
            entry.borrow_gpu().surface_format(),
            size.width,
            size.height
        );
        entry.with_gpu(|gpu| self.renderer.on_surface_created(&gpu.render_ctx()))?;
        self.renderer.on_surface_changed(size.width, size.height);

        entry.with_window(|w| w.request_redraw());
        self.surface = Some(entry);
        Ok(())
    }

    fn surface_changed(&mut self, new_size: PhysicalSize<u32>) {
        let Some(entry) = self.surface.as_mut() else { return };
        entry.with_gpu_mut(|gpu| gpu.resize(new_size));
        self.renderer.on_surface_changed(new_size.width, new_size.height);
        entry.with_window(|w| w.request_redraw());
    }

    fn draw_frame(&mut self, event_loop: &ActiveEventLoop) {
        // Split borrows to avoid `self` capture inside `ouroboros` closures.
        let (renderer, surface) = (&mut self.renderer, &mut self.surface);
        let Some(entry) = surface.as_mut() else { return };

        let mut action = None;
        entry.with_mut(|fields| {
            let size = fields.gpu.size();
            if size.width == 0 || size.height == 0 {
                return;
            }

            let mut frame = match fields.gpu.begin_frame() {
                Ok(f) => f,
                Err(err) => {
                    action = Some(fields.gpu.handle_surface_error(err));
                    return;
                }
            };

            // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
            {
                let mut target =
                    RenderTarget::new(&mut frame.encoder, &frame.view, frame.width, frame.height);
                renderer.on_draw_frame(&mut target);
            }

            fields.window.pre_present_notify();
            fields.gpu.submit(frame);
        });

        if action == Some(SurfaceErrorAction::Fatal) {
            self.fail(event_loop, anyhow::anyhow!("surface reported a fatal error"));
        }
    }
}

impl<R> ApplicationHandler for HostState<R>
where
    R: SurfaceRenderer + 'static,
{
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        // The surface is created once per process; later resumes reuse it.
        if self.surface.is_some() || self.fatal.is_some() {
            return;
        }

        if let Err(e) = self.create_surface(event_loop) {
            self.fail(event_loop, e);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        if self.fatal.is_some() {
            event_loop.exit();
            return;
        }

        event_loop.set_control_flow(ControlFlow::Wait);

        // Continuous redraw, paced by the present mode.
        if let Some(entry) = self.surface.as_ref() {
            entry.with_window(|w| w.request_redraw());
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let ours = self
            .surface
            .as_ref()
            .is_some_and(|e| e.with_window(|w| w.id()) == window_id);
        if !ours {
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.surface = None;
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => self.surface_changed(new_size),

            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.surface.as_ref().map(|e| e.with_window(|w| w.inner_size())) {
                    self.surface_changed(size);
                }
            }

            WindowEvent::RedrawRequested => self.draw_frame(event_loop),

            _ => {}
        }
    }
}
