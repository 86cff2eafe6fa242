//! Offscreen color target with CPU readback.

use anyhow::{Context, Result};
use std::sync::mpsc;

use crate::render::{RenderCtx, RenderTarget};

/// Format of offscreen targets. Unorm, so readback values are not sRGB-encoded.
pub const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

const BYTES_PER_PIXEL: u32 = 4;

/// Texture that can be rendered into and read back.
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    readback: wgpu::Buffer,
    width: u32,
    height: u32,
    padded_bytes_per_row: u32,
}

/// RGBA8 pixels read back from an [`OffscreenTarget`]. Row 0 is the top row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<[u8; 4]>,
}

impl Snapshot {
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get((y * self.width + x) as usize).copied()
    }

    /// Number of pixels equal to `rgba`.
    pub fn count(&self, rgba: [u8; 4]) -> usize {
        self.pixels.iter().filter(|p| **p == rgba).count()
    }
}

impl OffscreenTarget {
    pub fn new(ctx: &RenderCtx<'_>, width: u32, height: u32) -> Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "offscreen target has zero size");
        anyhow::ensure!(
            ctx.surface_format == OFFSCREEN_FORMAT,
            "offscreen targets are {OFFSCREEN_FORMAT:?}, context uses {:?}",
            ctx.surface_format
        );

        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("trigon offscreen color"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OFFSCREEN_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let padded_bytes_per_row = padded_row_bytes(width);
        let readback = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("trigon offscreen readback"),
            size: padded_bytes_per_row as u64 * height as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Ok(Self {
            texture,
            view,
            readback,
            width,
            height,
            padded_bytes_per_row,
        })
    }

    /// Records `draw` against this target, submits, and reads the result back.
    ///
    /// Blocks until the GPU has finished.
    pub fn render_with<F, T>(&self, ctx: &RenderCtx<'_>, draw: F) -> Result<(T, Snapshot)>
    where
        F: FnOnce(&mut RenderTarget<'_>) -> T,
    {
        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("trigon offscreen encoder"),
            });

        // RenderTarget borrows the encoder; dropped before the copy is recorded.
        let out = {
            let mut target = RenderTarget::new(&mut encoder, &self.view, self.width, self.height);
            draw(&mut target)
        };

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &self.readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(self.padded_bytes_per_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );

        ctx.queue.submit(std::iter::once(encoder.finish()));

        let snapshot = self.read_back(ctx)?;
        Ok((out, snapshot))
    }

    fn read_back(&self, ctx: &RenderCtx<'_>) -> Result<Snapshot> {
        let slice = self.readback.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });

        let mapped = loop {
            ctx.device
                .poll(wgpu::PollType::Poll)
                .context("failed to poll device during readback")?;
            match rx.try_recv() {
                Ok(res) => break res,
                Err(mpsc::TryRecvError::Empty) => std::thread::yield_now(),
                Err(mpsc::TryRecvError::Disconnected) => {
                    anyhow::bail!("readback callback dropped without a result")
                }
            }
        };
        mapped.context("failed to map readback buffer")?;

        let pixels = {
            let data = slice.get_mapped_range();
            let row_bytes = (self.width * BYTES_PER_PIXEL) as usize;
            let mut pixels = Vec::with_capacity((self.width * self.height) as usize);
            for row in data.chunks_exact(self.padded_bytes_per_row as usize) {
                pixels.extend(
                    row[..row_bytes]
                        .chunks_exact(BYTES_PER_PIXEL as usize)
                        .map(|p| [p[0], p[1], p[2], p[3]]),
                );
            }
            pixels
        };
        self.readback.unmap();

        Ok(Snapshot {
            width: self.width,
            height: self.height,
            pixels,
        })
    }
}

/// Row size rounded up to the copy alignment required for texture→buffer copies.
fn padded_row_bytes(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_padded_to_copy_alignment() {
        assert_eq!(padded_row_bytes(1), 256);
        assert_eq!(padded_row_bytes(64), 256);
        assert_eq!(padded_row_bytes(65), 512);
    }

    #[test]
    fn snapshot_pixel_lookup() {
        let snap = Snapshot {
            width: 2,
            height: 2,
            pixels: vec![[1, 0, 0, 255], [2, 0, 0, 255], [3, 0, 0, 255], [4, 0, 0, 255]],
        };
        assert_eq!(snap.pixel(1, 0), Some([2, 0, 0, 255]));
        assert_eq!(snap.pixel(0, 1), Some([3, 0, 0, 255]));
        assert_eq!(snap.pixel(2, 0), None);
        assert_eq!(snap.count([4, 0, 0, 255]), 1);
    }
}
