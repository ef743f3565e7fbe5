//! Simulation system
//!
//! Grid state, the Game of Life rule, the GPU compute step and the scheduler
//! that alternates the ping-pong buffers.

pub mod cadence;
pub mod compute;
pub mod grid;
pub mod patterns;
pub mod rules;
pub mod scheduler;

pub use cadence::TickCadence;
pub use compute::SimulationStep;
pub use grid::{GridDimensions, GridState, GridUniforms};
pub use patterns::SeedPattern;
pub use scheduler::StepScheduler;
