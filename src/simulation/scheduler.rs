//! Step scheduler
//!
//! Owns the grid, the compute step and the renderer, and drives one tick at a
//! time. A tick encodes the compute pass (buffer `tick % 2` → the other one)
//! and the render pass (the buffer just written) into a single command buffer,
//! submits it once, and flips the active buffer by incrementing the counter.
//!
//! The parity of the counter is the only synchronization: within a tick the
//! compute pass never reads the buffer it writes, and the render pass only
//! reads after the compute pass in submission order.

use log::{debug, error, info, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::{validate_grid, SimulationConfig};
use crate::error::{LifeError, Result};
use crate::gfx::{FrameRenderer, FrameTarget, GpuContext};

use super::compute::SimulationStep;
use super::grid::{GridDimensions, GridState};
use super::patterns::SeedPattern;
use super::rules::buffer_roles;

pub struct StepScheduler {
    grid: GridState,
    simulation: SimulationStep,
    renderer: FrameRenderer,
    tick: u64,
}

impl StepScheduler {
    /// Seed a grid per `config` and build the pipelines for `format`.
    pub fn new(
        ctx: &GpuContext,
        config: &SimulationConfig,
        format: wgpu::TextureFormat,
    ) -> Result<Self> {
        config.validate()?;

        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        info!(
            "Seeding {} pattern on a {}x{} grid (seed {})",
            config.pattern.as_str(),
            config.grid_size,
            config.grid_size,
            seed
        );
        let mut rng = StdRng::seed_from_u64(seed);

        let threshold = config.seed_threshold();
        let grid = match config.pattern {
            SeedPattern::Random => GridState::initialize(
                ctx,
                config.grid_size,
                config.grid_size,
                threshold,
                &mut rng,
            )?,
            pattern => {
                let dims = GridDimensions::square(config.grid_size)?;
                GridState::from_cells(ctx, dims, &pattern.cells(dims, threshold, &mut rng))?
            }
        };

        Self::with_grid(ctx, grid, config.tile_size, format)
    }

    /// Build the pipelines around an already seeded grid.
    pub fn with_grid(
        ctx: &GpuContext,
        grid: GridState,
        tile_size: u32,
        format: wgpu::TextureFormat,
    ) -> Result<Self> {
        let dims = grid.dims();
        validate_grid(dims.width, dims.height, tile_size)?;

        ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let simulation = SimulationStep::new(&ctx.device, &grid, tile_size);
        let renderer = FrameRenderer::new(&ctx.device, &grid, format);
        if let Some(err) = pollster::block_on(ctx.device.pop_error_scope()) {
            return Err(LifeError::Device(err.to_string()));
        }

        debug!(
            "Pipelines ready: {:?} workgroups of {}x{}, {} instances",
            simulation.workgroups(),
            tile_size,
            tile_size,
            renderer.instance_count()
        );

        Ok(Self {
            grid,
            simulation,
            renderer,
            tick: 0,
        })
    }

    /// Advance one generation and render it to `target`.
    ///
    /// On error the tick counter is left where it was, but the scheduler
    /// should still be dropped: the device rejected work it was given.
    pub fn tick(&mut self, ctx: &GpuContext, target: &mut dyn FrameTarget) -> Result<()> {
        // Acquire first so a failed acquisition leaves the state untouched.
        let frame = target.acquire(ctx)?;

        let (source, destination) = buffer_roles(self.tick);
        debug_assert_ne!(source, destination);

        ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Life Tick Encoder"),
            });

        self.simulation.encode(&mut encoder, source);
        // Draw the generation the compute pass just wrote.
        self.renderer
            .encode(&mut encoder, &frame.view, &self.grid, destination);

        ctx.queue.submit(std::iter::once(encoder.finish()));

        if let Some(err) = pollster::block_on(ctx.device.pop_error_scope()) {
            error!("Tick {} rejected by the device: {}", self.tick + 1, err);
            return Err(LifeError::Device(err.to_string()));
        }

        self.tick += 1;
        debug_assert_eq!(self.active_index(), destination);

        frame.present();
        trace!(
            "Tick {}: buffer {} -> buffer {}",
            self.tick,
            source,
            destination
        );
        Ok(())
    }

    /// Number of completed ticks (= generation of the current buffer).
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Index of the buffer holding the current generation.
    pub fn active_index(&self) -> usize {
        (self.tick % 2) as usize
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    /// Copy the current generation back to the host.
    pub fn read_current(&self, ctx: &GpuContext) -> Result<Vec<u32>> {
        self.grid.read_buffer(ctx, self.active_index())
    }
}
