use crate::error::LifeResult;
use crate::gfx::context::GpuContext;
use crate::gfx::program::{GpuProgram, ProgramConfig};
use crate::gfx::rendering::triangle_strip::TriangleStrip;
use crate::gfx::resources::TextureResource;
use crate::wgpu_utils::UniformKind;

/// Computes the next generation from the current state texture
pub struct NextStateProgram {
    program: GpuProgram,
}

impl NextStateProgram {
    pub fn new(context: &GpuContext) -> LifeResult<Self> {
        let config = ProgramConfig::new("next_state", include_str!("shaders/next_state.wgsl"))
            .with_uniforms(&[
                ("state_dimensions", UniformKind::Vec2),
                ("enable_wraparound", UniformKind::Int),
            ])
            .with_sampler_slots(1);

        Ok(Self {
            program: GpuProgram::new(context, config)?,
        })
    }

    /// Reads `state`, writes the following generation into `next`
    ///
    /// `state` and `next` must be different textures of the same size.
    pub fn run(
        &mut self,
        context: &GpuContext,
        strip: &TriangleStrip,
        state: &TextureResource,
        next: &TextureResource,
        wraparound: bool,
    ) -> LifeResult<()> {
        self.program.uniform(
            "state_dimensions",
            [state.width() as f32, state.height() as f32],
        )?;
        self.program.uniform("enable_wraparound", wraparound)?;
        self.program.draw(context, strip, &next.view, &[state])
    }
}
