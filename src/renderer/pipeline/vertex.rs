//! Vertex Input Layouts
//!
//! The CPU-side description of a vertex buffer, registered in the registry's
//! input-layout table next to the vertex program that consumes it.

use bytemuck::{Pod, Zeroable};

/// A renderable vertex-buffer layout.
#[derive(Debug, Clone)]
pub struct VertexLayout {
    pub array_stride: u64,
    pub attributes: Vec<wgpu::VertexAttribute>,
}

impl VertexLayout {
    /// Layout of [`crate::scene::Vertex`]: position, normal, color, uv.
    #[must_use]
    pub fn static_mesh() -> Self {
        Self {
            array_stride: 48,
            attributes: vec![
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 12,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 24,
                    shader_location: 2,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x2,
                    offset: 40,
                    shader_location: 3,
                },
            ],
        }
    }

    /// Layout of [`LineVertex`]: position, color.
    #[must_use]
    pub fn line() -> Self {
        Self {
            array_stride: 28,
            attributes: vec![
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 12,
                    shader_location: 1,
                },
            ],
        }
    }

    /// The wgpu view of this layout, borrowing the attribute list.
    #[must_use]
    pub fn as_wgpu(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.array_stride,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &self.attributes,
        }
    }
}

/// Vertex format of the line, gizmo and editor-helper passes.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 4],
}

impl LineVertex {
    #[must_use]
    pub fn new(position: [f32; 3], color: [f32; 4]) -> Self {
        Self { position, color }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strides_match_vertex_structs() {
        assert_eq!(
            VertexLayout::static_mesh().array_stride,
            std::mem::size_of::<crate::scene::Vertex>() as u64
        );
        assert_eq!(
            VertexLayout::line().array_stride,
            std::mem::size_of::<LineVertex>() as u64
        );
    }
}
