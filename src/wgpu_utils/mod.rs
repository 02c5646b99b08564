// src/wgpu_utils/mod.rs
//! WGPU utility functions and helpers
//!
//! Binding layout helpers plus the named uniform block shared by every
//! fragment program.

pub mod binding_types;
pub mod uniform_block;
pub mod uniform_buffer;

// Re-export main types
pub use binding_types::*;
pub use uniform_block::{UniformBlock, UniformKind, UniformLayout, UniformValue};
pub use uniform_buffer::UniformBuffer;
