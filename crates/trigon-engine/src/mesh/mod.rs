//! Static vertex data.
//!
//! A [`Mesh`] is a flat list of `f32` coordinates, three per vertex, uploaded
//! verbatim (native byte order) into a GPU vertex buffer.

use thiserror::Error;

/// Number of coordinates per vertex (x, y, z).
pub const COORDS_PER_VERTEX: usize = 3;

/// Byte distance between consecutive vertices.
pub const VERTEX_STRIDE: u64 = (COORDS_PER_VERTEX * std::mem::size_of::<f32>()) as u64;

/// Counter-clockwise triangle: top, bottom-left, bottom-right.
const TRIANGLE_COORDS: [f32; 9] = [
    0.0, 0.622008459, 0.0, // top
    -0.5, -0.311004243, 0.0, // bottom left
    0.5, -0.311004243, 0.0, // bottom right
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MeshError {
    #[error("mesh has no vertices")]
    Empty,
    #[error("coordinate count {0} is not a multiple of 3")]
    PartialVertex(usize),
    #[error("coordinate {index} is not finite ({value})")]
    NonFinite { index: usize, value: f32 },
}

/// Immutable vertex positions.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    coords: Vec<f32>,
}

impl Mesh {
    /// The single triangle drawn by the default renderer.
    pub fn triangle() -> Self {
        Self { coords: TRIANGLE_COORDS.to_vec() }
    }

    /// Builds a mesh from flat `x, y, z` coordinates.
    pub fn from_coords(coords: Vec<f32>) -> Result<Self, MeshError> {
        if coords.is_empty() {
            return Err(MeshError::Empty);
        }
        if coords.len() % COORDS_PER_VERTEX != 0 {
            return Err(MeshError::PartialVertex(coords.len()));
        }
        if let Some((index, &value)) = coords.iter().enumerate().find(|(_, c)| !c.is_finite()) {
            return Err(MeshError::NonFinite { index, value });
        }
        Ok(Self { coords })
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        (self.coords.len() / COORDS_PER_VERTEX) as u32
    }

    #[inline]
    pub fn coords(&self) -> &[f32] {
        &self.coords
    }

    /// Vertex `i` as `[x, y, z]`.
    pub fn vertex(&self, i: usize) -> Option<[f32; 3]> {
        let start = i.checked_mul(COORDS_PER_VERTEX)?;
        let v = self.coords.get(start..start + COORDS_PER_VERTEX)?;
        Some([v[0], v[1], v[2]])
    }

    pub fn vertices(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.coords
            .chunks_exact(COORDS_PER_VERTEX)
            .map(|v| [v[0], v[1], v[2]])
    }

    /// Raw bytes in native byte order, ready for a vertex buffer.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.coords)
    }

    /// Vertex buffer layout: one `Float32x3` position at location 0.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
        wgpu::VertexBufferLayout {
            array_stride: VERTEX_STRIDE,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triangle_has_three_vertices() {
        let m = Mesh::triangle();
        assert_eq!(m.vertex_count(), 3);
        assert_eq!(m.coords().len(), 9);
    }

    #[test]
    fn triangle_vertex_order_is_top_left_right() {
        let m = Mesh::triangle();
        assert_eq!(m.vertex(0), Some([0.0, 0.622008459, 0.0]));
        assert_eq!(m.vertex(1), Some([-0.5, -0.311004243, 0.0]));
        assert_eq!(m.vertex(2), Some([0.5, -0.311004243, 0.0]));
        assert_eq!(m.vertex(3), None);
    }

    #[test]
    fn triangle_winding_is_counter_clockwise() {
        let v: Vec<_> = Mesh::triangle().vertices().collect();
        let area2 = (v[1][0] - v[0][0]) * (v[2][1] - v[0][1])
            - (v[2][0] - v[0][0]) * (v[1][1] - v[0][1]);
        assert!(area2 > 0.0);
    }

    #[test]
    fn bytes_are_native_endian_floats() {
        let m = Mesh::triangle();
        let bytes = m.as_bytes();
        assert_eq!(bytes.len() as u64, VERTEX_STRIDE * 3);
        assert_eq!(&bytes[4..8], &0.622008459f32.to_ne_bytes());
    }

    #[test]
    fn from_coords_rejects_bad_data() {
        assert_eq!(Mesh::from_coords(vec![]), Err(MeshError::Empty));
        assert_eq!(Mesh::from_coords(vec![0.0; 4]), Err(MeshError::PartialVertex(4)));
        assert!(matches!(
            Mesh::from_coords(vec![0.0, f32::INFINITY, 0.0]),
            Err(MeshError::NonFinite { index: 1, .. })
        ));
    }

    #[test]
    fn from_coords_preserves_order() {
        let m = Mesh::from_coords(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m.vertices().collect::<Vec<_>>(), vec![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
    }
}
