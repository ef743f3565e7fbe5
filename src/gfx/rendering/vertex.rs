//! # Vertex Data Structures
//!
//! GPU-compatible vertex formats for the cell quad and the per-instance cell
//! state.

/// A 2D vertex position in quad-local space.
///
/// The `#[repr(C)]` attribute ensures the struct has a C-compatible memory
/// layout, which is required for GPU buffer operations.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex2D {
    /// 2D position coordinates [x, y], each in [-1, 1]
    pub position: [f32; 2],
}

/// Half-extent of the drawn quad relative to its cell. Values below 1 leave a
/// gutter between neighboring cells.
pub const CELL_EXTENT: f32 = 0.8;

/// Two counter-clockwise triangles covering the cell quad.
pub const CELL_QUAD: [Vertex2D; 6] = [
    Vertex2D { position: [-CELL_EXTENT, -CELL_EXTENT] },
    Vertex2D { position: [ CELL_EXTENT, -CELL_EXTENT] },
    Vertex2D { position: [ CELL_EXTENT,  CELL_EXTENT] },
    Vertex2D { position: [-CELL_EXTENT, -CELL_EXTENT] },
    Vertex2D { position: [ CELL_EXTENT,  CELL_EXTENT] },
    Vertex2D { position: [-CELL_EXTENT,  CELL_EXTENT] },
];

impl Vertex2D {
    /// Returns the vertex buffer layout for wgpu rendering.
    ///
    /// - Attribute 0: Position (Float32x2) at shader location 0
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex2D>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x2,
            }],
        }
    }
}

/// Layout of a cell state buffer read as per-instance vertex data.
///
/// - Attribute 1: State (Uint32) at shader location 1, one per instance
pub fn cell_state_desc() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<u32>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 1,
            format: wgpu::VertexFormat::Uint32,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_is_two_ccw_triangles() {
        for triangle in CELL_QUAD.chunks(3) {
            let [a, b, c] = [triangle[0].position, triangle[1].position, triangle[2].position];
            let signed_area = (b[0] - a[0]) * (c[1] - a[1]) - (c[0] - a[0]) * (b[1] - a[1]);
            assert!(signed_area > 0.0);
        }
    }

    #[test]
    fn test_layout_strides() {
        assert_eq!(Vertex2D::desc().array_stride, 8);
        assert_eq!(cell_state_desc().array_stride, 4);
        assert_eq!(cell_state_desc().step_mode, wgpu::VertexStepMode::Instance);
    }
}
