//! GPU simulation step
//!
//! Compute pipeline that advances one generation. Two bind groups are built up
//! front, one per direction (A→B and B→A), so a step only has to pick the bind
//! group matching the current source buffer.

use wgpu::{BindGroup, BindGroupLayout, CommandEncoder, ComputePipeline, Device};

use crate::wgpu_utils::{layout_entry, storage_buffer_read_only, storage_buffer_read_write, uniform};

use super::grid::GridState;

const LIFE_SHADER: &str = include_str!("life.wgsl");
const TILE_SIZE_TOKEN: &str = "__TILE_SIZE__";

/// Shader source with the workgroup size filled in.
fn life_shader_source(tile_size: u32) -> String {
    LIFE_SHADER.replace(TILE_SIZE_TOKEN, &tile_size.to_string())
}

/// Number of workgroups needed to cover `cells` with tiles of `tile_size`.
#[inline]
pub fn workgroup_count(cells: u32, tile_size: u32) -> u32 {
    cells.div_ceil(tile_size)
}

/// Compute pass producing generation N+1 from generation N.
pub struct SimulationStep {
    pipeline: ComputePipeline,
    // bind_groups[i] reads buffer i and writes buffer 1 - i.
    bind_groups: [BindGroup; 2],
    workgroups: (u32, u32),
}

impl SimulationStep {
    pub fn new(device: &Device, grid: &GridState, tile_size: u32) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Life Compute Shader"),
            source: wgpu::ShaderSource::Wgsl(life_shader_source(tile_size).into()),
        });

        let bind_group_layout = Self::create_bind_group_layout(device);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Life Compute Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Life Compute Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        let bind_groups = [
            Self::create_bind_group(device, &bind_group_layout, grid, 0, "Life Bind Group A->B"),
            Self::create_bind_group(device, &bind_group_layout, grid, 1, "Life Bind Group B->A"),
        ];

        let dims = grid.dims();
        Self {
            pipeline,
            bind_groups,
            workgroups: (
                workgroup_count(dims.width, tile_size),
                workgroup_count(dims.height, tile_size),
            ),
        }
    }

    fn create_bind_group_layout(device: &Device) -> BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Life Compute Bind Group Layout"),
            entries: &[
                layout_entry(0, wgpu::ShaderStages::COMPUTE, uniform()),
                layout_entry(1, wgpu::ShaderStages::COMPUTE, storage_buffer_read_only()),
                layout_entry(2, wgpu::ShaderStages::COMPUTE, storage_buffer_read_write()),
            ],
        })
    }

    fn create_bind_group(
        device: &Device,
        layout: &BindGroupLayout,
        grid: &GridState,
        source: usize,
        label: &str,
    ) -> BindGroup {
        let destination = 1 - source;
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(label),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: grid.uniforms().binding_resource(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: grid.buffer(source).as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: grid.buffer(destination).as_entire_binding(),
                },
            ],
        })
    }

    /// Workgroups dispatched per step along x and y.
    pub fn workgroups(&self) -> (u32, u32) {
        self.workgroups
    }

    /// Record one generation reading buffer `source` and writing the other.
    pub fn encode(&self, encoder: &mut CommandEncoder, source: usize) {
        let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Life Compute Pass"),
            timestamp_writes: None,
        });

        compute_pass.set_pipeline(&self.pipeline);
        compute_pass.set_bind_group(0, &self.bind_groups[source], &[]);
        compute_pass.dispatch_workgroups(self.workgroups.0, self.workgroups.1, 1);
    }
}
