use crate::error::LifeResult;
use crate::gfx::context::GpuContext;
use crate::gfx::program::{GpuProgram, ProgramConfig};
use crate::gfx::rendering::triangle_strip::TriangleStrip;
use crate::gfx::resources::TextureResource;
use crate::wgpu_utils::UniformKind;

/// Axis of a blur pass
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BlurDirection {
    Horizontal,
    Vertical,
}

impl BlurDirection {
    pub fn vector(self) -> [f32; 2] {
        match self {
            BlurDirection::Horizontal => [1.0, 0.0],
            BlurDirection::Vertical => [0.0, 1.0],
        }
    }
}

/// One axis of the separable Gaussian glow
pub struct BlurProgram {
    program: GpuProgram,
}

impl BlurProgram {
    pub fn new(context: &GpuContext) -> LifeResult<Self> {
        let config = ProgramConfig::new("blur", include_str!("shaders/blur.wgsl"))
            .with_uniforms(&[
                ("dimensions", UniformKind::Vec2),
                ("blur_direction", UniformKind::Vec2),
                ("brightening_factor", UniformKind::Float),
            ])
            .with_sampler_slots(1);

        Ok(Self {
            program: GpuProgram::new(context, config)?,
        })
    }

    /// Blurs `input` along `direction` into `output`; a factor of 1.0 leaves
    /// brightness unchanged
    pub fn run(
        &mut self,
        context: &GpuContext,
        strip: &TriangleStrip,
        input: &TextureResource,
        output: &TextureResource,
        direction: BlurDirection,
        brightening_factor: f32,
    ) -> LifeResult<()> {
        self.program.uniform(
            "dimensions",
            [input.width() as f32, input.height() as f32],
        )?;
        self.program.uniform("blur_direction", direction.vector())?;
        self.program
            .uniform("brightening_factor", brightening_factor)?;
        self.program.draw(context, strip, &output.view, &[input])
    }
}
