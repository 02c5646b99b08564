//! Simulation configuration
//!
//! [`LifeConfig`] is a plain value: build it with `Default` and the `with_*`
//! methods, then hand it to [`GameOfLife::new`](super::life::GameOfLife::new),
//! which validates it before touching the GPU.

use serde::{Deserialize, Serialize};

use crate::error::{LifeError, LifeResult};
use crate::gfx::rendering::CornerColours;

/// Frame rates offered to the user, in generations per second
pub const TARGET_FRAMERATES: [f32; 15] = [
    0.25, 0.5, 1.0, 2.0, 4.0, 6.0, 8.0, 10.0, 15.0, 20.0, 25.0, 30.0, 40.0, 50.0, 60.0,
];

/// Cells mutated per generation for every 100,000 cells (rounded up)
const MUTATION_CELLS_PER: u64 = 100_000;

/// How the board was populated, which decides whether mutation applies
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Random soup, optionally with random mutation every generation
    #[default]
    Random,
    /// A named pattern centred on an empty board
    Patterns,
    /// A caller-supplied grid
    Custom,
}

/// Which passes produce the displayed image
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RenderStyle {
    /// Colourised cells only
    Simple,
    /// Colourised cells plus a blurred, brightened copy added on top
    #[default]
    Glow,
}

/// Display formats the engine can render into and read back
pub const SUPPORTED_DISPLAY_FORMATS: [wgpu::TextureFormat; 4] = [
    wgpu::TextureFormat::Rgba8Unorm,
    wgpu::TextureFormat::Rgba8UnormSrgb,
    wgpu::TextureFormat::Bgra8Unorm,
    wgpu::TextureFormat::Bgra8UnormSrgb,
];

#[derive(Clone, Debug)]
pub struct LifeConfig {
    /// Display width in pixels
    pub view_width: u32,
    /// Display height in pixels
    pub view_height: u32,
    /// Side of one cell in display pixels
    pub cell_size: u32,
    pub enable_wraparound: bool,
    pub enable_mutation: bool,
    pub mode: Mode,
    pub corner_colours: CornerColours,
    pub dead_colour: [f32; 4],
    /// Blur brightening factor; 1.0 means no brightening
    pub glow_factor: f32,
    pub render_style: RenderStyle,
    pub display_format: wgpu::TextureFormat,
    /// Fixed seed for randomisation and mutation; `None` seeds from the OS
    pub seed: Option<u64>,
    /// Target generations per second for the animator
    pub target_fps: f32,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            view_width: 960,
            view_height: 540,
            cell_size: 4,
            enable_wraparound: true,
            enable_mutation: true,
            mode: Mode::Random,
            corner_colours: CornerColours::default(),
            dead_colour: [0.0, 0.0, 0.0, 1.0],
            glow_factor: 1.5,
            render_style: RenderStyle::Glow,
            display_format: wgpu::TextureFormat::Rgba8Unorm,
            seed: None,
            target_fps: 30.0,
        }
    }
}

impl LifeConfig {
    pub fn new(view_width: u32, view_height: u32, cell_size: u32) -> Self {
        Self {
            view_width,
            view_height,
            cell_size,
            ..Default::default()
        }
    }

    pub fn with_view_size(mut self, width: u32, height: u32) -> Self {
        self.view_width = width;
        self.view_height = height;
        self
    }

    pub fn with_cell_size(mut self, cell_size: u32) -> Self {
        self.cell_size = cell_size;
        self
    }

    pub fn with_wraparound(mut self, enabled: bool) -> Self {
        self.enable_wraparound = enabled;
        self
    }

    pub fn with_mutation(mut self, enabled: bool) -> Self {
        self.enable_mutation = enabled;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_corner_colours(mut self, colours: CornerColours) -> Self {
        self.corner_colours = colours;
        self
    }

    pub fn with_dead_colour(mut self, colour: [f32; 4]) -> Self {
        self.dead_colour = colour;
        self
    }

    pub fn with_glow_factor(mut self, factor: f32) -> Self {
        self.glow_factor = factor;
        self
    }

    pub fn with_render_style(mut self, style: RenderStyle) -> Self {
        self.render_style = style;
        self
    }

    pub fn with_display_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.display_format = format;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_target_fps(mut self, fps: f32) -> Self {
        self.target_fps = fps;
        self
    }

    /// `floor(view_width / cell_size)`
    pub fn state_width(&self) -> u32 {
        self.view_width / self.cell_size.max(1)
    }

    /// `floor(view_height / cell_size)`
    pub fn state_height(&self) -> u32 {
        self.view_height / self.cell_size.max(1)
    }

    pub fn total_cells(&self) -> u64 {
        self.state_width() as u64 * self.state_height() as u64
    }

    pub fn mutation_rate(&self) -> u64 {
        Self::mutation_rate_for(self.total_cells())
    }

    /// Cells mutated per generation: `ceil(0.00001 * total_cells)`
    pub fn mutation_rate_for(total_cells: u64) -> u64 {
        total_cells.div_ceil(MUTATION_CELLS_PER)
    }

    /// Check the configuration describes a buildable simulation
    pub fn validate(&self) -> LifeResult<()> {
        if self.cell_size == 0 {
            return Err(LifeError::config("cell size must be at least 1"));
        }

        if self.view_width == 0 || self.view_height == 0 {
            return Err(LifeError::config(format!(
                "view size {} x {} must be non-zero",
                self.view_width, self.view_height
            )));
        }

        if self.state_width() == 0 || self.state_height() == 0 {
            return Err(LifeError::config(format!(
                "view {} x {} is smaller than one {}-pixel cell",
                self.view_width, self.view_height, self.cell_size
            )));
        }

        if !self.glow_factor.is_finite() || self.glow_factor < 0.0 {
            return Err(LifeError::config(format!(
                "glow factor must be a non-negative number, got {}",
                self.glow_factor
            )));
        }

        if !self.target_fps.is_finite() || self.target_fps <= 0.0 {
            return Err(LifeError::config(format!(
                "target frame rate must be positive, got {}",
                self.target_fps
            )));
        }

        if !SUPPORTED_DISPLAY_FORMATS.contains(&self.display_format) {
            return Err(LifeError::config(format!(
                "unsupported display format {:?}",
                self.display_format
            )));
        }

        let colours = &self.corner_colours;
        let all_colours = [
            colours.top_left,
            colours.top_right,
            colours.bottom_left,
            colours.bottom_right,
            self.dead_colour,
        ];
        if all_colours.iter().flatten().any(|c| !c.is_finite()) {
            return Err(LifeError::config("colours must be finite"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = LifeConfig::default();
        config.validate().unwrap();
        assert_eq!((config.state_width(), config.state_height()), (240, 135));
    }

    #[test]
    fn state_size_rounds_down() {
        let config = LifeConfig::new(103, 50, 10);
        assert_eq!((config.state_width(), config.state_height()), (10, 5));
        assert_eq!(config.total_cells(), 50);
    }

    #[test]
    fn mutation_rate_rounds_up() {
        assert_eq!(LifeConfig::mutation_rate_for(10_000_000), 100);
        assert_eq!(LifeConfig::mutation_rate_for(100_001), 2);
        assert_eq!(LifeConfig::mutation_rate_for(1), 1);
        assert_eq!(LifeConfig::mutation_rate_for(0), 0);
    }

    #[test]
    fn zero_cell_size_is_rejected() {
        let err = LifeConfig::default().with_cell_size(0).validate().unwrap_err();
        assert!(matches!(err, LifeError::InvalidConfig(_)));
    }

    #[test]
    fn view_smaller_than_a_cell_is_rejected() {
        assert!(LifeConfig::new(3, 100, 4).validate().is_err());
    }

    #[test]
    fn negative_glow_is_rejected() {
        assert!(LifeConfig::default().with_glow_factor(-0.5).validate().is_err());
        assert!(LifeConfig::default().with_glow_factor(0.0).validate().is_ok());
    }

    #[test]
    fn unsupported_display_format_is_rejected() {
        let config = LifeConfig::default().with_display_format(wgpu::TextureFormat::R8Unorm);
        assert!(config.validate().is_err());
    }

    #[test]
    fn offered_framerates_are_valid() {
        for fps in TARGET_FRAMERATES {
            LifeConfig::default().with_target_fps(fps).validate().unwrap();
        }
    }
}
