// src/lib.rs
//! GPU Game of Life
//!
//! Conway's Game of Life evolved by a wgpu compute shader and drawn with a
//! single instanced render pass per tick, on two ping-pong cell buffers.

pub mod app;
pub mod config;
pub mod error;
pub mod gfx;
pub mod simulation;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::LifeApp;
pub use config::{ConfigError, SimulationConfig};
pub use error::LifeError;
