//! The four passes of a generation
//!
//! Next-State advances the cells; Render colourises them; Blur spreads the
//! colour in one direction; Add-and-Display composites cells and glow onto
//! the display target.

pub mod add_and_display;
pub mod blur;
pub mod next_state;
pub mod render;

pub use add_and_display::AddAndDisplayProgram;
pub use blur::{BlurDirection, BlurProgram};
pub use next_state::NextStateProgram;
pub use render::{CornerColours, RenderProgram, RenderTarget};
