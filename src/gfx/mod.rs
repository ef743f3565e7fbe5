//! # Graphics Module
//!
//! Device ownership, output targets and the instanced cell renderer.
//!
//! ## Architecture Overview
//!
//! - **Context** ([`context`]) - wgpu adapter, device and queue
//! - **Targets** ([`target`]) - window swapchain or offscreen texture to draw into
//! - **Rendering Pipeline** ([`rendering`]) - one instanced draw per frame

pub mod context;
pub mod rendering;
pub mod target;

// Re-export commonly used types
pub use context::GpuContext;
pub use rendering::FrameRenderer;
pub use target::{Frame, FrameTarget, OffscreenTarget, SurfaceTarget};
