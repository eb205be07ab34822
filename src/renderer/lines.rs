//! Vertex format for the debug wireframe

use bytemuck::{Pod, Zeroable};

use crate::physics::LineSegment;

/// A coloured line-list vertex
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl LineVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<LineVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    /// Two vertices per segment, in segment order
    pub fn from_segments(segments: &[LineSegment]) -> Vec<Self> {
        segments
            .iter()
            .flat_map(|segment| {
                let color = segment.color.into();
                [
                    Self {
                        position: segment.start.into(),
                        color,
                    },
                    Self {
                        position: segment.end.into(),
                        color,
                    },
                ]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_segments_expand_to_vertex_pairs() {
        let segments = [
            LineSegment {
                start: Vec3::ZERO,
                end: Vec3::X,
                color: Vec3::Y,
            },
            LineSegment {
                start: Vec3::ONE,
                end: Vec3::Z,
                color: Vec3::X,
            },
        ];

        let vertices = LineVertex::from_segments(&segments);
        assert_eq!(vertices.len(), 4);
        assert_eq!(vertices[1].position, [1.0, 0.0, 0.0]);
        assert_eq!(vertices[2].color, [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_vertex_stride() {
        assert_eq!(LineVertex::layout().array_stride, 24);
    }
}
