// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! Handles the instanced cell pipeline and its vertex formats.

pub mod frame_renderer;
pub mod vertex;

// Re-export main types
pub use frame_renderer::{cell_color, cell_vertex_position, FrameRenderer, CLEAR_COLOR};
pub use vertex::{Vertex2D, CELL_QUAD};
