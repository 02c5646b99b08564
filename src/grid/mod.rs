// src/grid/mod.rs
//! Host-side cell grids
//!
//! Grids are the in-memory exchange format between callers and the GPU
//! state: construction, text import/export, pasting and the vertical flip.

pub mod factory;
pub mod grid;
pub mod patterns;
pub mod rules;

// Re-export main types
pub use factory::GridFactory;
pub use grid::{Grid, HorizontalAlign, VerticalAlign};
pub use patterns::Pattern;
