// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Fixed-size colour textures and the arena that owns them.

pub mod texture_resource;
pub mod texture_store;

// Re-export main types
pub use texture_resource::TextureResource;
pub use texture_store::{TextureId, TextureStore};
