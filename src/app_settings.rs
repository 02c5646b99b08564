//! Settings file for the windowed app
//!
//! Read from `glow-life.toml` in the working directory when present. Every
//! key is optional; missing keys take their defaults.
//!
//! ```toml
//! cell_size = 3
//! render_style = "simple"
//! target_fps = 15.0
//! pattern = "gosper glider gun"
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{LifeError, LifeResult};
use crate::gfx::rendering::CornerColours;
use crate::grid::Pattern;
use crate::simulation::config::{LifeConfig, Mode, RenderStyle};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Window width in pixels
    pub view_width: u32,
    /// Window height in pixels
    pub view_height: u32,
    /// Side of one cell in pixels
    pub cell_size: u32,
    pub wraparound: bool,
    pub mutation: bool,
    pub render_style: RenderStyle,
    /// Blur brightening factor
    pub glow_factor: f32,
    /// Generations per second
    pub target_fps: f32,
    /// Fixed RNG seed for reproducible runs
    pub seed: Option<u64>,
    /// Start from this pattern instead of a random soup
    pub pattern: Option<String>,
    pub corner_colours: CornerColours,
    /// Begin animating as soon as the window opens
    pub start_running: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        let config = LifeConfig::default();
        Self {
            view_width: config.view_width,
            view_height: config.view_height,
            cell_size: config.cell_size,
            wraparound: config.enable_wraparound,
            mutation: config.enable_mutation,
            render_style: config.render_style,
            glow_factor: config.glow_factor,
            target_fps: config.target_fps,
            seed: None,
            pattern: None,
            corner_colours: config.corner_colours,
            start_running: true,
        }
    }
}

impl AppSettings {
    pub const SETTINGS_FILE: &'static str = "glow-life.toml";

    /// Loads the settings file, or returns defaults if it doesn't exist
    pub fn load() -> LifeResult<Self> {
        Self::load_from(Path::new(Self::SETTINGS_FILE))
    }

    pub fn load_from(path: &Path) -> LifeResult<Self> {
        if !path.exists() {
            log::debug!("No {} found, using default settings", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| LifeError::config(format!("{}: {}", path.display(), e)))?;
        let settings = Self::from_toml(&contents)
            .map_err(|e| LifeError::config(format!("{}: {}", path.display(), e)))?;

        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn from_toml(contents: &str) -> LifeResult<Self> {
        toml::from_str(contents).map_err(|e| LifeError::config(e.to_string()))
    }

    /// The starting pattern, if one is named
    pub fn pattern(&self) -> LifeResult<Option<Pattern>> {
        match &self.pattern {
            None => Ok(None),
            Some(name) => Pattern::from_name(name)
                .map(Some)
                .ok_or_else(|| LifeError::config(format!("unknown pattern '{}'", name))),
        }
    }

    /// Simulation configuration described by these settings
    pub fn life_config(&self) -> LifeResult<LifeConfig> {
        let mode = match self.pattern()? {
            Some(_) => Mode::Patterns,
            None => Mode::Random,
        };

        let mut config = LifeConfig::new(self.view_width, self.view_height, self.cell_size)
            .with_wraparound(self.wraparound)
            .with_mutation(self.mutation)
            .with_mode(mode)
            .with_render_style(self.render_style)
            .with_glow_factor(self.glow_factor)
            .with_target_fps(self.target_fps)
            .with_corner_colours(self.corner_colours);

        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(AppSettings::from_toml("").unwrap(), AppSettings::default());
    }

    #[test]
    fn partial_file_overrides_some_keys() {
        let settings = AppSettings::from_toml(
            "cell_size = 8\nrender_style = \"simple\"\nseed = 42\npattern = \"pulsar\"\n",
        )
        .unwrap();

        assert_eq!(settings.cell_size, 8);
        assert_eq!(settings.render_style, RenderStyle::Simple);
        assert_eq!(settings.view_width, 960);

        let config = settings.life_config().unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.mode, Mode::Patterns);
        assert_eq!(config.state_width(), 120);
    }

    #[test]
    fn unknown_pattern_is_a_config_error() {
        let settings = AppSettings::from_toml("pattern = \"toad\"").unwrap();
        assert!(matches!(
            settings.life_config(),
            Err(LifeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn bad_value_type_is_rejected() {
        assert!(AppSettings::from_toml("cell_size = \"big\"").is_err());
    }

    #[test]
    fn missing_file_gives_defaults() {
        let settings = AppSettings::load_from(Path::new("does/not/exist.toml")).unwrap();
        assert_eq!(settings, AppSettings::default());
    }
}
