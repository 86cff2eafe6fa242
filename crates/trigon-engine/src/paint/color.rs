use bytemuck::{Pod, Zeroable};

/// Straight-alpha RGBA color.
///
/// Invariant:
/// - every channel is finite and lies in `[0, 1]` when built through [`Color::new`].
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::from_rgba_unchecked(0.0, 0.0, 0.0, 1.0);
    pub const GREEN: Self = Self::from_rgba_unchecked(0.0, 1.0, 0.0, 1.0);

    /// Creates a color, clamping each channel to `[0, 1]`.
    ///
    /// Non-finite channels collapse to `0.0`.
    #[inline]
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self {
            r: unit(r),
            g: unit(g),
            b: unit(b),
            a: unit(a),
        }
    }

    #[inline]
    const fn from_rgba_unchecked(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn is_opaque(self) -> bool {
        self.a >= 1.0
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Clear value for a render pass load op.
    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }

    /// 16-byte payload matching a WGSL `vec4<f32>` uniform.
    #[inline]
    pub(crate) fn to_uniform(self) -> ColorUniform {
        ColorUniform { rgba: self.to_array() }
    }

    /// Quantizes to 8-bit unorm, as stored in an `Rgba8Unorm` target.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        let q = |c: f32| (c * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

#[inline]
fn unit(c: f32) -> f32 {
    if c.is_finite() { c.clamp(0.0, 1.0) } else { 0.0 }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
pub(crate) struct ColorUniform {
    pub rgba: [f32; 4],
}
