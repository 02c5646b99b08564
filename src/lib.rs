//! Glow Life
//!
//! Conway's Game of Life computed entirely on the GPU with wgpu. The board
//! lives in a texture, one fragment pass computes each generation, and a
//! blur and composite pass pair gives live cells a glow.

pub mod app;
pub mod app_settings;
pub mod error;
pub mod gfx;
pub mod grid;
pub mod performance;
pub mod prelude;
pub mod simulation;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::GlowLifeApp;
pub use error::{LifeError, LifeResult};
pub use simulation::{GameOfLife, LifeConfig};

/// Creates a windowed application from the settings file, if any
pub fn default() -> LifeResult<GlowLifeApp> {
    GlowLifeApp::new(app_settings::AppSettings::load()?)
}
