//! # Glow Life Prelude
//!
//! Commonly used types in one import.
//!
//! ```no_run
//! use glow_life::prelude::*;
//!
//! fn main() -> LifeResult<()> {
//!     let config = LifeConfig::new(320, 240, 4).with_seed(7);
//!     let mut life = GameOfLife::headless(config)?;
//!
//!     life.load_pattern(Pattern::Glider)?;
//!     for _ in 0..4 {
//!         life.calculate_and_render_next_state()?;
//!     }
//!     println!("{}", life.get_state_as_grid()?);
//!     Ok(())
//! }
//! ```

// Re-export core application types
pub use crate::app::GlowLifeApp;
pub use crate::app_settings::AppSettings;
pub use crate::default;
pub use crate::error::{LifeError, LifeResult};

// Re-export the grid layer
pub use crate::grid::{Grid, GridFactory, HorizontalAlign, Pattern, VerticalAlign};

// Re-export simulation framework
pub use crate::simulation::{
    Animator, Command, GameOfLife, LifeConfig, Mode, RenderStyle, Simulation,
};

// Re-export graphics types
pub use crate::gfx::rendering::CornerColours;
pub use crate::gfx::GpuContext;

// Re-export performance tracking
pub use crate::performance::{PerformanceMetrics, PerformanceMonitor};
