//! Instanced Cell Rendering
//!
//! Draws every cell of the grid with a single instanced draw call. The
//! current cell buffer is bound directly as the instance buffer, so the frame
//! reads generation N+1 exactly where the compute pass wrote it.
//!
//! Features:
//! - Single draw call for `width * height` instances
//! - No per-frame uploads: geometry is static, state stays on the GPU
//! - Dead cells collapse to zero-area quads
//! - Color is a pure function of cell position

use cgmath::{Vector2, Vector4};
use wgpu::util::DeviceExt;
use wgpu::{BindGroup, Buffer, CommandEncoder, Device, RenderPipeline, TextureView};

use super::vertex::{cell_state_desc, Vertex2D, CELL_QUAD};
use crate::simulation::grid::{GridDimensions, GridState};
use crate::wgpu_utils::{layout_entry, uniform};

const CELLS_SHADER: &str = include_str!("cells.wgsl");

/// Background the grid is drawn over.
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.4,
    a: 1.0,
};

/// Clip-space position of quad vertex `vertex` for cell `instance`.
///
/// Mirrors `vs_main` in `cells.wgsl`.
pub fn cell_vertex_position(
    vertex: [f32; 2],
    instance: u32,
    state: u32,
    dims: GridDimensions,
) -> Vector2<f32> {
    let grid = Vector2::new(dims.width as f32, dims.height as f32);
    let cell = cell_position(instance, dims);
    let state = state as f32;

    let offset = Vector2::new(cell.x / grid.x, cell.y / grid.y) * 2.0;
    Vector2::new(
        (vertex[0] * state + 1.0) / grid.x - 1.0 + offset.x,
        (vertex[1] * state + 1.0) / grid.y - 1.0 + offset.y,
    )
}

/// Fragment color of cell `instance`. Mirrors `fs_main` in `cells.wgsl`.
pub fn cell_color(instance: u32, dims: GridDimensions) -> Vector4<f32> {
    let cell = cell_position(instance, dims);
    let normalized = Vector2::new(cell.x / dims.width as f32, cell.y / dims.height as f32);
    Vector4::new(normalized.x, normalized.y, 1.0 - normalized.x, 1.0)
}

fn cell_position(instance: u32, dims: GridDimensions) -> Vector2<f32> {
    let (x, y) = dims.coordinate(instance as usize);
    Vector2::new(x as f32, y as f32)
}

/// Render pass drawing the current generation.
pub struct FrameRenderer {
    pipeline: RenderPipeline,
    bind_group: BindGroup,
    quad_buffer: Buffer,
    vertex_count: u32,
    instance_count: u32,
}

impl FrameRenderer {
    pub fn new(device: &Device, grid: &GridState, surface_format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Cell Render Shader"),
            source: wgpu::ShaderSource::Wgsl(CELLS_SHADER.into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Cell Render Bind Group Layout"),
            entries: &[layout_entry(0, wgpu::ShaderStages::VERTEX, uniform())],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Cell Render Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: grid.uniforms().binding_resource(),
            }],
        });

        let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Cell Render Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Cell Render Pipeline"),
            layout: Some(&render_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[Vertex2D::desc(), cell_state_desc()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let quad_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cell Quad Vertex Buffer"),
            contents: bytemuck::cast_slice(&CELL_QUAD),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self {
            pipeline,
            bind_group,
            quad_buffer,
            vertex_count: CELL_QUAD.len() as u32,
            instance_count: grid.dims().cell_count() as u32,
        }
    }

    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }

    /// Record a pass that clears `view` and draws the cells of buffer
    /// `current`.
    pub fn encode(
        &self,
        encoder: &mut CommandEncoder,
        view: &TextureView,
        grid: &GridState,
        current: usize,
    ) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Cell Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });

        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_vertex_buffer(0, self.quad_buffer.slice(..));
        render_pass.set_vertex_buffer(1, grid.buffer(current).slice(..));

        // Single draw call for all instances
        render_pass.draw(0..self.vertex_count, 0..self.instance_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims(width: u32, height: u32) -> GridDimensions {
        GridDimensions::new(width, height).unwrap()
    }

    fn approx(a: Vector2<f32>, b: Vector2<f32>) -> bool {
        (a.x - b.x).abs() < 1e-5 && (a.y - b.y).abs() < 1e-5
    }

    #[test]
    fn test_full_quads_tile_clip_space() {
        let dims = dims(4, 2);
        for instance in 0..dims.cell_count() as u32 {
            let (x, y) = dims.coordinate(instance as usize);
            let low = cell_vertex_position([-1.0, -1.0], instance, 1, dims);
            let high = cell_vertex_position([1.0, 1.0], instance, 1, dims);

            let expected_low = Vector2::new(-1.0 + 2.0 * x as f32 / 4.0, -1.0 + 2.0 * y as f32 / 2.0);
            let expected_high = Vector2::new(
                -1.0 + 2.0 * (x + 1) as f32 / 4.0,
                -1.0 + 2.0 * (y + 1) as f32 / 2.0,
            );
            assert!(approx(low, expected_low), "cell {instance} low corner");
            assert!(approx(high, expected_high), "cell {instance} high corner");
        }

        let last = dims.cell_count() as u32 - 1;
        assert!(approx(
            cell_vertex_position([1.0, 1.0], last, 1, dims),
            Vector2::new(1.0, 1.0)
        ));
    }

    #[test]
    fn test_dead_cells_collapse_to_a_point() {
        let dims = dims(8, 8);
        let corners: Vec<_> = CELL_QUAD
            .iter()
            .map(|v| cell_vertex_position(v.position, 9, 0, dims))
            .collect();
        assert!(corners.iter().all(|&c| approx(c, corners[0])));
    }

    #[test]
    fn test_live_cells_stay_inside_their_slot() {
        let dims = dims(8, 8);
        let center = cell_vertex_position([0.0, 0.0], 9, 1, dims);
        for vertex in CELL_QUAD.iter() {
            let corner = cell_vertex_position(vertex.position, 9, 1, dims);
            assert!((corner.x - center.x).abs() <= 1.0 / 8.0 + 1e-6);
            assert!((corner.y - center.y).abs() <= 1.0 / 8.0 + 1e-6);
            assert!(!approx(corner, center));
        }
    }

    #[test]
    fn test_color_is_function_of_position() {
        let dims = dims(4, 4);
        assert_eq!(cell_color(0, dims), Vector4::new(0.0, 0.0, 1.0, 1.0));
        // Cell (2, 1)
        assert_eq!(cell_color(6, dims), Vector4::new(0.5, 0.25, 0.5, 1.0));
        assert_eq!(cell_color(6, dims), cell_color(6, dims));
    }
}
