//! # Graphics Module
//!
//! GPU plumbing for the simulation: device acquisition, fixed-size colour
//! textures, and full-screen fragment programs.
//!
//! ## Architecture Overview
//!
//! - **Context** ([`context`]) - Adapter, device and queue, headless or surface-backed
//! - **Resources** ([`resources`]) - RGBA8 textures and the arena that owns them
//! - **Programs** ([`program`]) - Compiled pipelines with named uniforms and sampler slots
//! - **Rendering** ([`rendering`]) - The triangle strip and the four simulation passes
//!
//! Every pass draws the same full-screen strip into one texture while reading
//! others; no pass ever samples the texture it writes.

pub mod context;
pub mod program;
pub mod rendering;
pub mod resources;

// Re-export commonly used types
pub use context::GpuContext;
pub use program::{GpuProgram, ProgramConfig};
pub use resources::{TextureId, TextureResource, TextureStore};
