//! Vertex type for the quad batch

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Two triangles per filled rectangle
pub const VERTICES_PER_QUAD: usize = 6;

/// Position in logical pixels until the presenter maps it to clip space;
/// straight-alpha color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    const ATTRIBS: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x4];

    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    /// Triangulate a quad given its corners in winding order
    pub fn quad(corners: [Vec2; 4], color: [f32; 4]) -> [Vertex; VERTICES_PER_QUAD] {
        let [a, b, c, d] = corners.map(|p| Vertex::new(p.x, p.y, color));
        [a, b, c, a, c, d]
    }

    /// Same color, position run through `map`
    pub fn with_position(self, map: impl Fn(f32, f32) -> (f32, f32)) -> Self {
        let (x, y) = map(self.position[0], self.position[1]);
        Self::new(x, y, self.color)
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBS,
        }
    }
}
