//! Grid state: dimensions, the two ping-pong cell buffers, and seeding.
//!
//! Buffer `0` holds generation 0 after initialization. Buffer `1` is left
//! unseeded; the first step overwrites every cell of it.

use log::{debug, info};
use rand::Rng;
use wgpu::util::DeviceExt;

use crate::config::ConfigError;
use crate::error::{LifeError, Result};
use crate::gfx::GpuContext;
use crate::wgpu_utils::UniformBuffer;

use super::rules::{ALIVE, DEAD};

/// Width and height of the grid, both non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridDimensions {
    pub width: u32,
    pub height: u32,
}

impl GridDimensions {
    pub fn new(width: u32, height: u32) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn square(side: u32) -> Result<Self, ConfigError> {
        Self::new(side, side)
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Byte length of one cell buffer.
    #[inline]
    pub fn buffer_size(&self) -> wgpu::BufferAddress {
        (self.cell_count() * std::mem::size_of::<u32>()) as wgpu::BufferAddress
    }

    /// Row-major index of an in-range cell.
    #[inline]
    pub fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Cell coordinate of a row-major index.
    #[inline]
    pub fn coordinate(&self, index: usize) -> (u32, u32) {
        let width = self.width as usize;
        ((index % width) as u32, (index / width) as u32)
    }

    /// Row-major index of `(x, y)` wrapped onto the torus.
    #[inline]
    pub fn wrapped_index(&self, x: i64, y: i64) -> usize {
        let x = x.rem_euclid(self.width as i64) as u32;
        let y = y.rem_euclid(self.height as i64) as u32;
        self.index(x, y)
    }
}

/// Grid parameters shared by the compute and render shaders.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GridUniforms {
    pub width: u32,
    pub height: u32,
    pub _padding: [u32; 2],
}

impl From<GridDimensions> for GridUniforms {
    fn from(dims: GridDimensions) -> Self {
        Self {
            width: dims.width,
            height: dims.height,
            _padding: [0; 2],
        }
    }
}

/// Draw one uniform sample per cell; a cell is alive iff its draw exceeds
/// `threshold`.
pub fn seed_cells<R: Rng>(rng: &mut R, cell_count: usize, threshold: f32) -> Vec<u32> {
    (0..cell_count)
        .map(|_| {
            if rng.random::<f32>() > threshold {
                ALIVE
            } else {
                DEAD
            }
        })
        .collect()
}

/// GPU-resident grid: dimensions, uniforms and the two cell buffers.
pub struct GridState {
    dims: GridDimensions,
    buffers: [wgpu::Buffer; 2],
    uniforms: UniformBuffer<GridUniforms>,
}

impl GridState {
    /// Allocate both buffers and seed buffer 0 randomly.
    pub fn initialize<R: Rng>(
        ctx: &GpuContext,
        width: u32,
        height: u32,
        threshold: f32,
        rng: &mut R,
    ) -> Result<Self> {
        let dims = GridDimensions::new(width, height)?;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::InvalidSeedDensity(1.0 - threshold).into());
        }
        Self::check_buffer_limits(ctx, dims)?;
        let cells = seed_cells(rng, dims.cell_count(), threshold);
        Self::from_cells(ctx, dims, &cells)
    }

    /// Allocate both buffers with `cells` as generation 0.
    pub fn from_cells(ctx: &GpuContext, dims: GridDimensions, cells: &[u32]) -> Result<Self> {
        if cells.len() != dims.cell_count() {
            return Err(ConfigError::CellCountMismatch {
                expected: dims.cell_count(),
                actual: cells.len(),
            }
            .into());
        }
        Self::check_buffer_limits(ctx, dims)?;

        let live = cells.iter().filter(|&&cell| cell == ALIVE).count();
        info!(
            "Allocating {}x{} grid ({} bytes per buffer, {} live cells)",
            dims.width,
            dims.height,
            dims.buffer_size(),
            live
        );

        let device = &ctx.device;
        device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let usage = wgpu::BufferUsages::STORAGE
            | wgpu::BufferUsages::VERTEX
            | wgpu::BufferUsages::COPY_DST
            | wgpu::BufferUsages::COPY_SRC;

        let buffer_a = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cell State Buffer A"),
            contents: bytemuck::cast_slice(cells),
            usage,
        });
        let buffer_b = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Cell State Buffer B"),
            size: dims.buffer_size(),
            usage,
            mapped_at_creation: false,
        });
        let uniforms = UniformBuffer::new_with_data(device, &GridUniforms::from(dims));

        // Scopes pop innermost first; both must be popped before returning.
        let validation = pollster::block_on(device.pop_error_scope());
        let out_of_memory = pollster::block_on(device.pop_error_scope());
        if let Some(err) = validation.or(out_of_memory) {
            return Err(LifeError::Allocation(err.to_string()));
        }

        Ok(Self {
            dims,
            buffers: [buffer_a, buffer_b],
            uniforms,
        })
    }

    /// Reject grids whose cell buffers exceed what the device can bind.
    fn check_buffer_limits(ctx: &GpuContext, dims: GridDimensions) -> Result<()> {
        let limits = ctx.device.limits();
        let max_size = limits
            .max_buffer_size
            .min(limits.max_storage_buffer_binding_size as wgpu::BufferAddress);
        if dims.buffer_size() > max_size {
            return Err(LifeError::Allocation(format!(
                "{}x{} grid needs {} bytes per cell buffer, device allows {}",
                dims.width,
                dims.height,
                dims.buffer_size(),
                max_size
            )));
        }
        Ok(())
    }

    pub fn dims(&self) -> GridDimensions {
        self.dims
    }

    /// Cell buffer `index` (0 = A, 1 = B).
    pub fn buffer(&self, index: usize) -> &wgpu::Buffer {
        &self.buffers[index]
    }

    pub fn uniforms(&self) -> &UniformBuffer<GridUniforms> {
        &self.uniforms
    }

    /// Copy cell buffer `index` back to the host.
    ///
    /// Blocks until the device has finished all submitted work; diagnostic
    /// use only.
    pub fn read_buffer(&self, ctx: &GpuContext, index: usize) -> Result<Vec<u32>> {
        let size = self.dims.buffer_size();
        let staging_buffer = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Cell State Staging Buffer"),
            size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Cell State Readback Encoder"),
            });
        encoder.copy_buffer_to_buffer(&self.buffers[index], 0, &staging_buffer, 0, size);
        ctx.queue.submit(std::iter::once(encoder.finish()));

        let bytes = ctx.map_read(&staging_buffer)?;
        let cells: Vec<u32> = bytes
            .chunks_exact(std::mem::size_of::<u32>())
            .map(bytemuck::pod_read_unaligned)
            .collect();

        debug!(
            "Read back buffer {} ({} live cells)",
            index,
            cells.iter().filter(|&&cell| cell == ALIVE).count()
        );
        Ok(cells)
    }
}
