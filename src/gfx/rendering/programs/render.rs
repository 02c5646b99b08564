use serde::{Deserialize, Serialize};

use crate::error::LifeResult;
use crate::gfx::context::GpuContext;
use crate::gfx::program::{GpuProgram, ProgramConfig};
use crate::gfx::rendering::triangle_strip::TriangleStrip;
use crate::gfx::resources::TextureResource;
use crate::wgpu_utils::UniformKind;

/// RGBA colours of live cells at each corner of the board
///
/// Colours in between are bilinearly interpolated by position.
#[derive(Clone, Copy, PartialEq, Debug, Serialize, Deserialize)]
pub struct CornerColours {
    pub top_left: [f32; 4],
    pub top_right: [f32; 4],
    pub bottom_left: [f32; 4],
    pub bottom_right: [f32; 4],
}

impl Default for CornerColours {
    fn default() -> Self {
        Self {
            top_left: [1.0, 1.0, 0.1, 1.0],
            top_right: [1.0, 0.1, 0.1, 1.0],
            bottom_left: [0.1, 1.0, 0.1, 1.0],
            bottom_right: [0.1, 0.1, 1.0, 1.0],
        }
    }
}

/// Where a render pass writes
pub struct RenderTarget<'a> {
    pub view: &'a wgpu::TextureView,
    pub width: u32,
    pub height: u32,
    /// Target rows run top-down (a display) rather than bottom-up (a state-sized texture)
    pub flip_y: bool,
}

/// Colourises the state: live cells get the interpolated corner colour,
/// dead cells the dead colour
pub struct RenderProgram {
    program: GpuProgram,
}

impl RenderProgram {
    pub fn new(context: &GpuContext, target_format: wgpu::TextureFormat) -> LifeResult<Self> {
        let config = ProgramConfig::new("render", include_str!("shaders/render.wgsl"))
            .with_uniforms(&[
                ("target_dimensions", UniformKind::Vec2),
                ("flip_y", UniformKind::Int),
                ("colour_top_left", UniformKind::Vec4),
                ("colour_top_right", UniformKind::Vec4),
                ("colour_bottom_left", UniformKind::Vec4),
                ("colour_bottom_right", UniformKind::Vec4),
                ("colour_dead", UniformKind::Vec4),
            ])
            .with_sampler_slots(1)
            .with_target_format(target_format);

        Ok(Self {
            program: GpuProgram::new(context, config)?,
        })
    }

    pub fn run(
        &mut self,
        context: &GpuContext,
        strip: &TriangleStrip,
        state: &TextureResource,
        target: RenderTarget<'_>,
        colours: &CornerColours,
        dead_colour: [f32; 4],
    ) -> LifeResult<()> {
        self.program.uniform(
            "target_dimensions",
            [target.width as f32, target.height as f32],
        )?;
        self.program.uniform("flip_y", target.flip_y)?;
        self.program.uniform("colour_top_left", colours.top_left)?;
        self.program.uniform("colour_top_right", colours.top_right)?;
        self.program.uniform("colour_bottom_left", colours.bottom_left)?;
        self.program
            .uniform("colour_bottom_right", colours.bottom_right)?;
        self.program.uniform("colour_dead", dead_colour)?;
        self.program.draw(context, strip, target.view, &[state])
    }
}
