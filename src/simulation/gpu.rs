//! GPU simulation engine
//!
//! Owns every texture and program of the simulation and sequences them so no
//! pass reads the texture it writes:
//!
//! ```text
//! step:    state --next_state--> temp, then swap(state, temp)
//! glow:    state --render--> render --blur(h)--> temp --blur(v)--> blur
//!          render + blur --add_and_display--> display
//! simple:  state --render--> display
//! ```
//!
//! State texture row 0 holds the bottom row of the board, so grids are
//! flipped exactly once on the way in and once on the way out.

use rand::Rng;

use crate::error::{LifeError, LifeResult};
use crate::gfx::context::GpuContext;
use crate::gfx::rendering::{
    AddAndDisplayProgram, BlurDirection, BlurProgram, CornerColours, NextStateProgram,
    RenderProgram, RenderTarget, TriangleStrip,
};
use crate::gfx::resources::{TextureId, TextureResource, TextureStore};
use crate::grid::{Grid, GridFactory};
use crate::simulation::config::{LifeConfig, RenderStyle};

/// Texel of a live cell
pub const ALIVE_PIXEL: [u8; 4] = [255, 0, 0, 255];
/// Texel of a dead cell
pub const DEAD_PIXEL: [u8; 4] = [0, 0, 0, 255];

/// Whether a texel encodes a live cell (red channel exactly 255)
pub fn is_alive_pixel(pixel: &[u8]) -> bool {
    pixel[0] == 255
}

/// RGBA bytes for `cells` in the order given
pub fn encode_cells(cells: &[bool]) -> Vec<u8> {
    cells
        .iter()
        .flat_map(|&alive| if alive { ALIVE_PIXEL } else { DEAD_PIXEL })
        .collect()
}

/// Grid from RGBA bytes laid out row after row
pub fn decode_pixels(rgba: &[u8], width: usize, height: usize) -> LifeResult<Grid> {
    let expected = width * height * 4;
    if rgba.len() != expected {
        return Err(LifeError::PixelBufferSize {
            expected,
            actual: rgba.len(),
        });
    }

    let cells = rgba.chunks_exact(4).map(is_alive_pixel).collect();
    GridFactory::create_using_bool_array(cells, width, height)
}

/// Visual parameters of a render
#[derive(Clone, Debug)]
pub struct RenderSettings {
    pub style: RenderStyle,
    pub corner_colours: CornerColours,
    pub dead_colour: [f32; 4],
    pub glow_factor: f32,
}

impl From<&LifeConfig> for RenderSettings {
    fn from(config: &LifeConfig) -> Self {
        Self {
            style: config.render_style,
            corner_colours: config.corner_colours,
            dead_colour: config.dead_colour,
            glow_factor: config.glow_factor,
        }
    }
}

enum Display<'a> {
    Own,
    View(&'a wgpu::TextureView, (u32, u32)),
}

/// Double-buffered cell state and the passes that advance and display it
pub struct GpuEngine {
    state_width: u32,
    state_height: u32,
    view_width: u32,
    view_height: u32,
    display_format: wgpu::TextureFormat,

    textures: TextureStore,
    state: TextureId,
    temp: TextureId,
    render: TextureId,
    blur: TextureId,
    display: TextureId,

    strip: TriangleStrip,
    next_state_program: NextStateProgram,
    render_program: RenderProgram,
    display_render_program: RenderProgram,
    blur_program: BlurProgram,
    add_and_display_program: AddAndDisplayProgram,
}

impl GpuEngine {
    /// Allocates all textures and builds all programs
    ///
    /// # Errors
    /// [`LifeError::TextureAllocation`] if the state or view size is not
    /// supported, [`LifeError::ShaderBuild`] if any program fails to build.
    pub fn new(context: &GpuContext, config: &LifeConfig) -> LifeResult<Self> {
        let (state_width, state_height) = (config.state_width(), config.state_height());
        let (view_width, view_height) = (config.view_width, config.view_height);

        for warning in context.warnings((state_width, state_height), (view_width, view_height)) {
            log::warn!("{}", warning);
        }

        let nearest = wgpu::FilterMode::Nearest;
        let mut textures = TextureStore::new();
        let state = textures.insert(TextureResource::blank(
            context,
            "state",
            state_width,
            state_height,
            nearest,
        )?);
        let temp = textures.insert(TextureResource::blank(
            context,
            "temp",
            state_width,
            state_height,
            nearest,
        )?);
        let render = textures.insert(TextureResource::blank(
            context,
            "render",
            state_width,
            state_height,
            nearest,
        )?);
        let blur = textures.insert(TextureResource::blank(
            context,
            "blur",
            state_width,
            state_height,
            wgpu::FilterMode::Linear,
        )?);
        let display = textures.insert(TextureResource::blank_with_format(
            context,
            "display",
            view_width,
            view_height,
            nearest,
            config.display_format,
        )?);

        let engine = Self {
            state_width,
            state_height,
            view_width,
            view_height,
            display_format: config.display_format,
            textures,
            state,
            temp,
            render,
            blur,
            display,
            strip: TriangleStrip::new(&context.device),
            next_state_program: NextStateProgram::new(context)?,
            render_program: RenderProgram::new(context, TextureResource::STATE_FORMAT)?,
            display_render_program: RenderProgram::new(context, config.display_format)?,
            blur_program: BlurProgram::new(context)?,
            add_and_display_program: AddAndDisplayProgram::new(context, config.display_format)?,
        };

        log::info!(
            "GPU engine ready: state {} x {}, view {} x {}",
            state_width,
            state_height,
            view_width,
            view_height
        );

        Ok(engine)
    }

    pub fn state_size(&self) -> (u32, u32) {
        (self.state_width, self.state_height)
    }

    pub fn view_size(&self) -> (u32, u32) {
        (self.view_width, self.view_height)
    }

    pub fn display_format(&self) -> wgpu::TextureFormat {
        self.display_format
    }

    fn state_texture(&self) -> &TextureResource {
        self.textures.get(self.state)
    }

    /// Replaces the whole state with `grid` (top row first)
    pub fn write_state(&self, context: &GpuContext, grid: &Grid) -> LifeResult<()> {
        self.check_dimensions(grid)?;

        let rgba = encode_cells(grid.vertically_flipped().cells());
        self.state_texture().subset(
            &context.queue,
            &rgba,
            0,
            0,
            self.state_width,
            self.state_height,
        )
    }

    /// Reads the whole state back as a grid (top row first)
    pub fn read_state(&self, context: &GpuContext) -> LifeResult<Grid> {
        let rgba = self.state_texture().read_pixels(context)?;
        let bottom_up = decode_pixels(
            &rgba,
            self.state_width as usize,
            self.state_height as usize,
        )?;
        Ok(bottom_up.vertically_flipped())
    }

    /// Sets one cell; `(x, y)` counts from the top-left
    pub fn set_cell(&self, context: &GpuContext, x: i64, y: i64, alive: bool) -> LifeResult<()> {
        let (width, height) = (self.state_width as i64, self.state_height as i64);
        if x < 0 || y < 0 || x >= width || y >= height {
            return Err(LifeError::CellOutOfBounds {
                x,
                y,
                width: width as usize,
                height: height as usize,
            });
        }

        self.write_texel(context, x as u32, (height - 1 - y) as u32, alive)
    }

    fn write_texel(&self, context: &GpuContext, x: u32, y: u32, alive: bool) -> LifeResult<()> {
        let pixel = if alive { ALIVE_PIXEL } else { DEAD_PIXEL };
        self.state_texture()
            .subset(&context.queue, &pixel, x, y, 1, 1)
    }

    /// Forces `count` uniformly chosen cells alive
    pub fn mutate<R: Rng + ?Sized>(
        &self,
        context: &GpuContext,
        rng: &mut R,
        count: u64,
    ) -> LifeResult<()> {
        for _ in 0..count {
            let x = rng.random_range(0..self.state_width);
            let y = rng.random_range(0..self.state_height);
            self.write_texel(context, x, y, true)?;
        }
        Ok(())
    }

    /// Advances one generation
    pub fn step(&mut self, context: &GpuContext, wraparound: bool) -> LifeResult<()> {
        let state = self.textures.get(self.state);
        let temp = self.textures.get(self.temp);
        self.next_state_program
            .run(context, &self.strip, state, temp, wraparound)?;

        std::mem::swap(&mut self.state, &mut self.temp);
        log::debug!("Next state computed");
        Ok(())
    }

    /// Renders the current state into the engine's own display texture
    pub fn render(&mut self, context: &GpuContext, settings: &RenderSettings) -> LifeResult<()> {
        self.render_into(context, Display::Own, settings)
    }

    /// Renders the current state into `view`, which must have the configured
    /// display format and be `size` pixels
    pub fn render_to(
        &mut self,
        context: &GpuContext,
        view: &wgpu::TextureView,
        size: (u32, u32),
        settings: &RenderSettings,
    ) -> LifeResult<()> {
        self.render_into(context, Display::View(view, size), settings)
    }

    fn render_into(
        &mut self,
        context: &GpuContext,
        display: Display<'_>,
        settings: &RenderSettings,
    ) -> LifeResult<()> {
        let (view, size) = match display {
            Display::Own => {
                let own = self.textures.get(self.display);
                (&own.view, (own.width(), own.height()))
            }
            Display::View(view, size) => (view, size),
        };
        let glow_factor = settings.glow_factor.max(0.0);
        let state = self.textures.get(self.state);

        match settings.style {
            RenderStyle::Simple => self.display_render_program.run(
                context,
                &self.strip,
                state,
                RenderTarget {
                    view,
                    width: size.0,
                    height: size.1,
                    flip_y: true,
                },
                &settings.corner_colours,
                settings.dead_colour,
            ),
            RenderStyle::Glow => {
                let render = self.textures.get(self.render);
                let temp = self.textures.get(self.temp);
                let blur = self.textures.get(self.blur);

                self.render_program.run(
                    context,
                    &self.strip,
                    state,
                    RenderTarget {
                        view: &render.view,
                        width: render.width(),
                        height: render.height(),
                        flip_y: false,
                    },
                    &settings.corner_colours,
                    settings.dead_colour,
                )?;

                // temp is free between generations; the next step overwrites it
                self.blur_program.run(
                    context,
                    &self.strip,
                    render,
                    temp,
                    BlurDirection::Horizontal,
                    glow_factor,
                )?;
                self.blur_program.run(
                    context,
                    &self.strip,
                    temp,
                    blur,
                    BlurDirection::Vertical,
                    glow_factor,
                )?;

                self.add_and_display_program
                    .run(context, &self.strip, render, blur, view, size)
            }
        }
    }

    /// Pixels of the engine's display texture, RGBA, top row first
    pub fn read_display_pixels(&self, context: &GpuContext) -> LifeResult<Vec<u8>> {
        let mut pixels = self.textures.get(self.display).read_pixels(context)?;

        if matches!(
            self.display_format,
            wgpu::TextureFormat::Bgra8Unorm | wgpu::TextureFormat::Bgra8UnormSrgb
        ) {
            for pixel in pixels.chunks_exact_mut(4) {
                pixel.swap(0, 2);
            }
        }

        Ok(pixels)
    }

    fn check_dimensions(&self, grid: &Grid) -> LifeResult<()> {
        let (width, height) = (self.state_width as usize, self.state_height as usize);
        if grid.width() != width || grid.height() != height {
            return Err(LifeError::DimensionMismatch {
                expected_width: width,
                expected_height: height,
                actual_width: grid.width(),
                actual_height: grid.height(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells_encode_as_red_or_black() {
        let rgba = encode_cells(&[true, false]);
        assert_eq!(rgba, vec![255, 0, 0, 255, 0, 0, 0, 255]);
    }

    #[test]
    fn only_full_red_is_alive() {
        assert!(is_alive_pixel(&[255, 0, 0, 255]));
        assert!(is_alive_pixel(&[255, 40, 40, 0]));
        assert!(!is_alive_pixel(&[254, 0, 0, 255]));
        assert!(!is_alive_pixel(&[0, 255, 255, 255]));
    }

    #[test]
    fn decode_inverts_encode() {
        let cells = vec![true, false, false, true, true, false];
        let grid = decode_pixels(&encode_cells(&cells), 3, 2).unwrap();
        assert_eq!(grid.cells(), cells.as_slice());
    }

    #[test]
    fn decode_checks_length() {
        let err = decode_pixels(&[0; 12], 2, 2).unwrap_err();
        assert!(matches!(
            err,
            LifeError::PixelBufferSize {
                expected: 16,
                actual: 12
            }
        ));
    }
}
