use crate::error::LifeResult;
use crate::gfx::context::GpuContext;
use crate::gfx::program::{GpuProgram, ProgramConfig};
use crate::gfx::rendering::triangle_strip::TriangleStrip;
use crate::gfx::resources::TextureResource;
use crate::wgpu_utils::UniformKind;

/// Adds two state-sized textures and scales the sum onto the display
pub struct AddAndDisplayProgram {
    program: GpuProgram,
}

impl AddAndDisplayProgram {
    pub fn new(context: &GpuContext, display_format: wgpu::TextureFormat) -> LifeResult<Self> {
        let config = ProgramConfig::new(
            "add_and_display",
            include_str!("shaders/add_and_display.wgsl"),
        )
        .with_uniforms(&[("view_dimensions", UniformKind::Vec2)])
        .with_sampler_slots(2)
        .with_target_format(display_format);

        Ok(Self {
            program: GpuProgram::new(context, config)?,
        })
    }

    pub fn run(
        &mut self,
        context: &GpuContext,
        strip: &TriangleStrip,
        a: &TextureResource,
        b: &TextureResource,
        display: &wgpu::TextureView,
        view_size: (u32, u32),
    ) -> LifeResult<()> {
        self.program.uniform(
            "view_dimensions",
            [view_size.0 as f32, view_size.1 as f32],
        )?;
        self.program.draw(context, strip, display, &[a, b])
    }
}
