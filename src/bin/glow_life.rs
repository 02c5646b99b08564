//! Windowed Game of Life with a glow effect
//!
//! Settings are read from `glow-life.toml` in the working directory when it
//! exists. Logging follows `RUST_LOG` and defaults to `info`.

use anyhow::Context;
use glow_life::{app_settings::AppSettings, GlowLifeApp};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = AppSettings::load().context("Failed to load settings")?;
    log::info!(
        "Starting with a {} x {} view and {}-pixel cells",
        settings.view_width,
        settings.view_height,
        settings.cell_size
    );

    let app = GlowLifeApp::new(settings).context("Failed to create application")?;
    app.run().context("Game of Life exited with an error")?;
    Ok(())
}
