// src/simulation/mod.rs
//! Simulation system
//!
//! The GPU engine, the [`GameOfLife`] facade over it, its configuration and
//! commands, and the [`Animator`] that drives it at a target rate.

pub mod animator;
pub mod commands;
pub mod config;
pub mod gpu;
pub mod life;
pub mod traits;

pub use animator::Animator;
pub use commands::Command;
pub use config::{LifeConfig, Mode, RenderStyle};
pub use gpu::{GpuEngine, RenderSettings};
pub use life::GameOfLife;
pub use traits::Simulation;
