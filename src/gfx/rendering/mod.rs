// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! The shared full-screen geometry and the programs that draw with it.

pub mod programs;
pub mod triangle_strip;

// Re-export main types
pub use programs::{
    AddAndDisplayProgram, BlurDirection, BlurProgram, CornerColours, NextStateProgram,
    RenderProgram, RenderTarget,
};
pub use triangle_strip::TriangleStrip;
