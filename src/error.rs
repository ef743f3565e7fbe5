//! Error types for the simulation core.
//!
//! Every error here is fatal for the running simulation: there is no
//! partial-tick recovery, so callers either surface the error or restart.

use crate::config::ConfigError;

/// Fatal errors raised while setting up or driving the simulation.
#[derive(Debug, thiserror::Error)]
pub enum LifeError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("No suitable GPU adapter found: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),

    #[error("Failed to request GPU device: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("Failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("Surface reports no supported texture format for this adapter")]
    IncompatibleSurface,

    #[error("Failed to acquire surface texture: {0}")]
    Surface(#[from] wgpu::SurfaceError),

    #[error("GPU buffer allocation failed: {0}")]
    Allocation(String),

    #[error("GPU device rejected work: {0}")]
    Device(String),

    #[error("Buffer mapping failed: {0}")]
    BufferMap(#[from] wgpu::BufferAsyncError),

    #[error("Window creation failed: {0}")]
    Window(String),

    #[error("Event loop failed: {0}")]
    EventLoop(String),
}

pub type Result<T, E = LifeError> = std::result::Result<T, E>;
