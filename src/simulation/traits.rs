//! Core simulation traits
//!
//! Defines what a timed driver such as the
//! [`Animator`](super::animator::Animator) needs from the thing it drives.

use crate::error::LifeResult;

/// Anything that can be advanced one frame at a time
pub trait Simulation {
    /// Advance by one frame and redraw
    fn step(&mut self) -> LifeResult<()>;

    /// Name for logs and window titles
    fn name(&self) -> &str;
}
