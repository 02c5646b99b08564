//! The Game of Life facade
//!
//! [`GameOfLife`] is what a UI talks to. It owns the GPU context and engine,
//! keeps the simulation-wide settings (wraparound, mutation, mode, colours)
//! and turns domain operations into engine calls.

use rand::{rngs::StdRng, SeedableRng};

use crate::error::LifeResult;
use crate::gfx::context::GpuContext;
use crate::gfx::rendering::CornerColours;
use crate::grid::{Grid, GridFactory, HorizontalAlign, Pattern, VerticalAlign};
use crate::simulation::commands::Command;
use crate::simulation::config::{LifeConfig, Mode, RenderStyle};
use crate::simulation::gpu::{GpuEngine, RenderSettings};
use crate::simulation::traits::Simulation;

pub struct GameOfLife {
    context: GpuContext,
    engine: GpuEngine,
    config: LifeConfig,
    rng: StdRng,
    generation: u64,
}

impl GameOfLife {
    /// Builds the engine, populates the board for the configured mode and
    /// renders it once
    ///
    /// Random mode starts from a random soup, every other mode from an empty
    /// board.
    pub fn new(context: GpuContext, config: LifeConfig) -> LifeResult<Self> {
        config.validate()?;

        let engine = GpuEngine::new(&context, &config)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        let mut life = Self {
            context,
            engine,
            config,
            rng,
            generation: 0,
        };

        match life.config.mode {
            Mode::Random => life.randomise_state()?,
            Mode::Patterns | Mode::Custom => life.clear_state()?,
        }
        life.render_state()?;

        Ok(life)
    }

    /// [`new`](Self::new) on a headless context
    pub fn headless(config: LifeConfig) -> LifeResult<Self> {
        let context = pollster::block_on(GpuContext::headless())?;
        Self::new(context, config)
    }

    pub fn context(&self) -> &GpuContext {
        &self.context
    }

    pub fn config(&self) -> &LifeConfig {
        &self.config
    }

    pub fn state_width(&self) -> u32 {
        self.engine.state_size().0
    }

    pub fn state_height(&self) -> u32 {
        self.engine.state_size().1
    }

    pub fn view_width(&self) -> u32 {
        self.engine.view_size().0
    }

    pub fn view_height(&self) -> u32 {
        self.engine.view_size().1
    }

    pub fn total_cells(&self) -> u64 {
        self.config.total_cells()
    }

    pub fn mutation_rate(&self) -> u64 {
        self.config.mutation_rate()
    }

    pub fn is_wrapping(&self) -> bool {
        self.config.enable_wraparound
    }

    pub fn is_mutating(&self) -> bool {
        self.config.enable_mutation
    }

    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    /// Generations computed since the board was last replaced
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn render_style(&self) -> RenderStyle {
        self.config.render_style
    }

    pub fn glow_factor(&self) -> f32 {
        self.config.glow_factor
    }

    pub fn corner_colours(&self) -> CornerColours {
        self.config.corner_colours
    }

    pub fn randomise_state(&mut self) -> LifeResult<()> {
        let (width, height) = (self.state_width() as usize, self.state_height() as usize);
        let grid = GridFactory::create_randomised_with(&mut self.rng, width, height);
        self.set_state_using_grid(&grid)
    }

    pub fn clear_state(&mut self) -> LifeResult<()> {
        let grid =
            GridFactory::create_empty(self.state_width() as usize, self.state_height() as usize);
        self.set_state_using_grid(&grid)
    }

    /// Sets one cell; `(x, y)` counts from the top-left of the board
    pub fn set_cell_state(&mut self, x: i64, y: i64, alive: bool) -> LifeResult<()> {
        self.engine.set_cell(&self.context, x, y, alive)
    }

    pub fn toggle_wrapping(&mut self) {
        self.config.enable_wraparound = !self.config.enable_wraparound;
        log::info!("Wraparound {}", on_off(self.config.enable_wraparound));
    }

    /// Mutation only has an effect in [`Mode::Random`]
    pub fn toggle_mutation(&mut self) {
        self.config.enable_mutation = !self.config.enable_mutation;
        log::info!("Mutation {}", on_off(self.config.enable_mutation));
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.config.mode = mode;
    }

    pub fn set_render_style(&mut self, style: RenderStyle) {
        self.config.render_style = style;
    }

    /// Blur brightening factor; negative values are clamped to zero
    pub fn set_glow_factor(&mut self, factor: f32) {
        self.config.glow_factor = factor.max(0.0);
    }

    pub fn set_corner_colours(&mut self, colours: CornerColours) {
        self.config.corner_colours = colours;
    }

    pub fn set_dead_colour(&mut self, colour: [f32; 4]) {
        self.config.dead_colour = colour;
    }

    /// Advances one generation, then mutates if in Random mode with
    /// mutation enabled
    pub fn calculate_next_state(&mut self) -> LifeResult<()> {
        self.engine
            .step(&self.context, self.config.enable_wraparound)?;

        if self.config.mode == Mode::Random && self.config.enable_mutation {
            self.engine
                .mutate(&self.context, &mut self.rng, self.config.mutation_rate())?;
        }

        self.generation += 1;
        Ok(())
    }

    /// Draws the current state into the engine's display texture
    pub fn render_state(&mut self) -> LifeResult<()> {
        let settings = RenderSettings::from(&self.config);
        self.engine.render(&self.context, &settings)
    }

    /// Draws the current state into `view` (for example a surface texture)
    pub fn render_state_to(&mut self, view: &wgpu::TextureView, size: (u32, u32)) -> LifeResult<()> {
        let settings = RenderSettings::from(&self.config);
        self.engine.render_to(&self.context, view, size, &settings)
    }

    pub fn calculate_and_render_next_state(&mut self) -> LifeResult<()> {
        self.calculate_next_state()?;
        self.render_state()
    }

    pub fn calculate_and_render_next_state_to(
        &mut self,
        view: &wgpu::TextureView,
        size: (u32, u32),
    ) -> LifeResult<()> {
        self.calculate_next_state()?;
        self.render_state_to(view, size)
    }

    pub fn get_state_as_grid(&self) -> LifeResult<Grid> {
        self.engine.read_state(&self.context)
    }

    /// Replaces the board; `grid` must have the state dimensions
    pub fn set_state_using_grid(&mut self, grid: &Grid) -> LifeResult<()> {
        self.engine.write_state(&self.context, grid)?;
        self.generation = 0;
        Ok(())
    }

    /// Clears the board, centres `pattern` on it and enters Patterns mode
    pub fn load_pattern(&mut self, pattern: Pattern) -> LifeResult<()> {
        let board = self.centred_on_empty_board(&pattern.grid()?)?;
        self.set_state_using_grid(&board)?;
        self.config.mode = Mode::Patterns;
        log::info!("Loaded pattern '{}'", pattern.name());
        Ok(())
    }

    /// Centres `grid` on an empty board and enters Custom mode
    pub fn set_custom_grid(&mut self, grid: &Grid) -> LifeResult<()> {
        let board = self.centred_on_empty_board(grid)?;
        self.set_state_using_grid(&board)?;
        self.config.mode = Mode::Custom;
        Ok(())
    }

    fn centred_on_empty_board(&self, grid: &Grid) -> LifeResult<Grid> {
        let mut board =
            GridFactory::create_empty(self.state_width() as usize, self.state_height() as usize);
        board.paste_aligned(grid, HorizontalAlign::Centre, VerticalAlign::Middle)?;
        Ok(board)
    }

    /// RGBA pixels of the engine's display texture, top row first
    pub fn read_display_pixels(&self) -> LifeResult<Vec<u8>> {
        self.engine.read_display_pixels(&self.context)
    }

    /// Applies a user command, redrawing the engine's display when the
    /// board changed
    pub fn apply(&mut self, command: Command) -> LifeResult<()> {
        log::debug!("Applying {:?}", command);

        match command {
            Command::Randomise => self.randomise_state()?,
            Command::Clear => self.clear_state()?,
            Command::SetCell { x, y, alive } => self.set_cell_state(x, y, alive)?,
            Command::ToggleWrapping => self.toggle_wrapping(),
            Command::ToggleMutation => self.toggle_mutation(),
            Command::Step => self.calculate_and_render_next_state()?,
            Command::Render => self.render_state()?,
            Command::LoadPattern(pattern) => self.load_pattern(pattern)?,
            Command::SetMode(mode) => self.set_mode(mode),
            Command::SetRenderStyle(style) => self.set_render_style(style),
            Command::SetGlowFactor(factor) => self.set_glow_factor(factor),
        }

        if command.needs_render() {
            self.render_state()?;
        }
        Ok(())
    }
}

impl Simulation for GameOfLife {
    fn step(&mut self) -> LifeResult<()> {
        self.calculate_and_render_next_state()
    }

    fn name(&self) -> &str {
        "Game of Life"
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LifeError;
    use crate::grid::rules;
    use rand::{rngs::StdRng, SeedableRng};

    /// Opens a simulation, or `None` when the machine has no usable adapter
    fn open(config: LifeConfig) -> Option<GameOfLife> {
        match GameOfLife::headless(config) {
            Ok(life) => Some(life),
            Err(e @ (LifeError::GraphicsUnavailable(_) | LifeError::DeviceRequest(_))) => {
                eprintln!("skipping GPU test: {}", e);
                None
            }
            Err(e) => panic!("failed to open simulation: {}", e),
        }
    }

    /// 16 x 12 board that starts empty and never mutates
    fn custom_config() -> LifeConfig {
        LifeConfig::new(64, 48, 4)
            .with_mode(Mode::Custom)
            .with_seed(11)
    }

    fn assert_close(actual: &[u8], expected: [f32; 4], tolerance: u8) {
        for (i, (&a, e)) in actual.iter().zip(expected).enumerate().take(3) {
            let e = (e.clamp(0.0, 1.0) * 255.0).round() as u8;
            assert!(
                a.abs_diff(e) <= tolerance,
                "channel {} is {}, expected about {}",
                i,
                a,
                e
            );
        }
    }

    #[test]
    fn state_round_trips_through_the_gpu() {
        let Some(mut life) = open(custom_config()) else {
            return;
        };
        let grid = GridFactory::create_randomised_with(&mut StdRng::seed_from_u64(3), 16, 12);

        life.set_state_using_grid(&grid).unwrap();
        assert_eq!(life.get_state_as_grid().unwrap(), grid);
    }

    #[test]
    fn new_board_matches_mode() {
        let Some(life) = open(custom_config()) else {
            return;
        };
        assert_eq!(life.get_state_as_grid().unwrap().live_count(), 0);
        assert_eq!((life.state_width(), life.state_height()), (16, 12));

        let Some(life) = open(custom_config().with_mode(Mode::Random)) else {
            return;
        };
        assert!(life.get_state_as_grid().unwrap().live_count() > 0);
    }

    #[test]
    fn lonely_cell_dies() {
        let Some(mut life) = open(custom_config()) else {
            return;
        };
        life.set_cell_state(3, 3, true).unwrap();
        assert_eq!(life.get_state_as_grid().unwrap().get_cell(3, 3).unwrap(), true);

        life.calculate_next_state().unwrap();
        assert_eq!(life.get_state_as_grid().unwrap().live_count(), 0);
        assert_eq!(life.generation(), 1);
    }

    #[test]
    fn block_is_still() {
        let Some(mut life) = open(custom_config()) else {
            return;
        };
        for (x, y) in [(5, 5), (6, 5), (5, 6), (6, 6)] {
            life.set_cell_state(x, y, true).unwrap();
        }
        let before = life.get_state_as_grid().unwrap();

        for _ in 0..3 {
            life.calculate_next_state().unwrap();
        }
        assert_eq!(life.get_state_as_grid().unwrap(), before);
    }

    #[test]
    fn generations_match_reference_rules() {
        for wrap in [true, false] {
            let Some(mut life) = open(custom_config().with_wraparound(wrap)) else {
                return;
            };
            let mut expected =
                GridFactory::create_randomised_with(&mut StdRng::seed_from_u64(5), 16, 12);
            life.set_state_using_grid(&expected).unwrap();

            for _ in 0..5 {
                life.calculate_next_state().unwrap();
                expected = rules::next_generation(&expected, wrap);
            }
            assert_eq!(
                life.get_state_as_grid().unwrap(),
                expected,
                "wraparound {}",
                wrap
            );
        }
    }

    #[test]
    fn edge_blinker_depends_on_wraparound() {
        for wrap in [true, false] {
            let Some(mut life) = open(custom_config().with_wraparound(wrap)) else {
                return;
            };
            // Vertical blinker on the left edge
            for y in 4..7 {
                life.set_cell_state(0, y, true).unwrap();
            }
            life.calculate_next_state().unwrap();

            let grid = life.get_state_as_grid().unwrap();
            assert_eq!(grid.get_cell(15, 5).unwrap(), wrap);
            assert!(grid.get_cell(1, 5).unwrap());
        }
    }

    #[test]
    fn toggled_wraparound_applies_to_next_step() {
        let Some(mut life) = open(custom_config()) else {
            return;
        };
        life.toggle_wrapping();
        assert!(!life.is_wrapping());

        for y in 4..7 {
            life.set_cell_state(0, y, true).unwrap();
        }
        life.calculate_next_state().unwrap();
        assert!(!life.get_state_as_grid().unwrap().get_cell(15, 5).unwrap());
    }

    #[test]
    fn set_cell_rejects_outside_coords() {
        let Some(mut life) = open(custom_config()) else {
            return;
        };
        for (x, y) in [(-1, 0), (0, -1), (16, 0), (0, 12)] {
            let err = life.set_cell_state(x, y, true).unwrap_err();
            assert!(matches!(err, LifeError::CellOutOfBounds { .. }));
        }
        life.set_cell_state(15, 11, true).unwrap();
        assert!(life.get_state_as_grid().unwrap().get_cell(15, 11).unwrap());
    }

    #[test]
    fn mismatched_grid_is_rejected() {
        let Some(mut life) = open(custom_config()) else {
            return;
        };
        let err = life
            .set_state_using_grid(&GridFactory::create_empty(15, 12))
            .unwrap_err();
        assert!(matches!(
            err,
            LifeError::DimensionMismatch {
                expected_width: 16,
                actual_width: 15,
                ..
            }
        ));
    }

    #[test]
    fn mutation_revives_cells_in_random_mode_only() {
        let Some(mut life) = open(custom_config().with_mode(Mode::Random)) else {
            return;
        };
        assert_eq!(life.mutation_rate(), 1);

        life.clear_state().unwrap();
        life.calculate_next_state().unwrap();
        assert_eq!(life.get_state_as_grid().unwrap().live_count(), 1);

        life.set_mode(Mode::Patterns);
        life.clear_state().unwrap();
        life.calculate_next_state().unwrap();
        assert_eq!(life.get_state_as_grid().unwrap().live_count(), 0);
    }

    #[test]
    fn pattern_is_centred() {
        let Some(mut life) = open(custom_config()) else {
            return;
        };
        life.load_pattern(Pattern::Blinker).unwrap();
        assert_eq!(life.mode(), Mode::Patterns);

        let grid = life.get_state_as_grid().unwrap();
        assert_eq!(grid.live_count(), 3);
        assert_eq!(life.generation(), 0);
    }

    #[test]
    fn dead_board_renders_dead_colour() {
        for style in [RenderStyle::Simple, RenderStyle::Glow] {
            let Some(life) = open(custom_config().with_render_style(style)) else {
                return;
            };
            let pixels = life.read_display_pixels().unwrap();
            assert_eq!(pixels.len(), 64 * 48 * 4);
            assert!(pixels.chunks_exact(4).all(|p| p[..3] == [0, 0, 0]));
        }
    }

    #[test]
    fn live_board_is_shaded_by_corner() {
        let Some(mut life) = open(custom_config().with_render_style(RenderStyle::Simple)) else {
            return;
        };
        let full = GridFactory::create_using_bool_array(vec![true; 16 * 12], 16, 12).unwrap();
        life.set_state_using_grid(&full).unwrap();
        life.render_state().unwrap();

        let pixels = life.read_display_pixels().unwrap();
        let colours = life.corner_colours();
        let top_left = &pixels[..4];
        let bottom_right = &pixels[pixels.len() - 4..];
        assert_close(top_left, colours.top_left, 12);
        assert_close(bottom_right, colours.bottom_right, 12);
    }

    #[test]
    fn glow_is_at_least_as_bright_as_simple() {
        let Some(mut life) = open(custom_config()) else {
            return;
        };
        life.set_cell_state(8, 6, true).unwrap();

        life.set_render_style(RenderStyle::Simple);
        life.render_state().unwrap();
        let simple = life.read_display_pixels().unwrap();

        life.set_render_style(RenderStyle::Glow);
        life.render_state().unwrap();
        let glow = life.read_display_pixels().unwrap();

        let brightness = |p: &[u8]| p.chunks_exact(4).map(|c| c[0] as u64).sum::<u64>();
        assert!(brightness(&glow) > brightness(&simple));
    }

    #[test]
    fn oversized_board_fails_allocation() {
        let Ok(context) = pollster::block_on(GpuContext::headless()) else {
            return;
        };
        let max = context.max_texture_size();

        let config = LifeConfig::new(max + 1, 8, 1).with_mode(Mode::Custom);
        match GameOfLife::new(context, config) {
            Err(LifeError::TextureAllocation { width, .. }) => assert_eq!(width, max + 1),
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("board wider than the texture limit was accepted"),
        }
    }

    #[test]
    fn commands_update_settings() {
        let Some(mut life) = open(custom_config()) else {
            return;
        };
        life.apply(Command::SetGlowFactor(-2.0)).unwrap();
        assert_eq!(life.glow_factor(), 0.0);

        life.apply(Command::ToggleMutation).unwrap();
        assert!(!life.is_mutating());

        life.apply(Command::Step).unwrap();
        assert_eq!(life.generation(), 1);
    }
}
