//! User intents
//!
//! Input handlers translate key presses and clicks into [`Command`] values
//! and hand them to [`GameOfLife::apply`](super::life::GameOfLife::apply), so
//! the facade never needs to know where a request came from.

use crate::grid::Pattern;
use crate::simulation::config::{Mode, RenderStyle};

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Command {
    /// Fill the board with a fresh random soup
    Randomise,
    /// Kill every cell
    Clear,
    /// Set one cell, counted from the top-left
    SetCell { x: i64, y: i64, alive: bool },
    ToggleWrapping,
    ToggleMutation,
    /// Advance one generation and redraw
    Step,
    /// Redraw without advancing
    Render,
    /// Centre a pattern on an empty board
    LoadPattern(Pattern),
    SetMode(Mode),
    SetRenderStyle(RenderStyle),
    SetGlowFactor(f32),
}

impl Command {
    /// Whether the display must be redrawn once the command has been applied
    ///
    /// `Step` and `Render` draw as part of their own effect.
    pub fn needs_render(&self) -> bool {
        !matches!(
            self,
            Command::ToggleWrapping
                | Command::ToggleMutation
                | Command::SetMode(_)
                | Command::Step
                | Command::Render
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_toggles_do_not_redraw() {
        assert!(!Command::ToggleWrapping.needs_render());
        assert!(!Command::SetMode(Mode::Custom).needs_render());
        assert!(!Command::Step.needs_render());
        assert!(Command::Clear.needs_render());
        assert!(Command::LoadPattern(Pattern::Glider).needs_render());
    }
}
