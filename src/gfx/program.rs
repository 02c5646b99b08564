//! Full-screen fragment programs
//!
//! A [`GpuProgram`] is one compiled render pipeline plus everything needed to
//! run it: its named uniform block, the texture/sampler slots it reads and the
//! format of the target it writes. Running a program is always the same
//! draw: the four-vertex triangle strip over the whole target.

use crate::error::{LifeError, LifeResult};
use crate::gfx::context::{error_message, GpuContext};
use crate::gfx::rendering::triangle_strip::{QuadVertex, TriangleStrip};
use crate::gfx::resources::TextureResource;
use crate::wgpu_utils::{
    program_layout_entries, UniformBlock, UniformBuffer, UniformKind, UniformLayout, UniformValue,
    UNIFORM_BINDING,
};

/// Vertex stage and helpers prepended to every fragment source
const VERTEX_SOURCE: &str = include_str!("rendering/programs/shaders/fullscreen.wgsl");

/// Configuration for creating a program
///
/// Defines the fragment shader, uniform block and sampler slots of a
/// full-screen pass, and the colour format it renders into.
#[derive(Debug, Clone)]
pub struct ProgramConfig {
    pub label: String,
    pub fragment_source: String,
    pub uniforms: Vec<(&'static str, UniformKind)>,
    pub sampler_slots: u32,
    pub target_format: wgpu::TextureFormat,
}

impl ProgramConfig {
    /// Creates a new config for the given fragment shader
    ///
    /// # Arguments
    /// * `label` - Program name used in logs and errors
    /// * `fragment_source` - WGSL source containing `fs_main`
    pub fn new(label: &str, fragment_source: &str) -> Self {
        Self {
            label: label.to_string(),
            fragment_source: fragment_source.to_string(),
            uniforms: Vec::new(),
            sampler_slots: 0,
            target_format: TextureResource::STATE_FORMAT,
        }
    }

    /// Declares the uniform block, in WGSL struct order
    pub fn with_uniforms(mut self, uniforms: &[(&'static str, UniformKind)]) -> Self {
        self.uniforms = uniforms.to_vec();
        self
    }

    pub fn with_sampler_slots(mut self, slots: u32) -> Self {
        self.sampler_slots = slots;
        self
    }

    pub fn with_target_format(mut self, format: wgpu::TextureFormat) -> Self {
        self.target_format = format;
        self
    }
}

/// Compiled full-screen pass
pub struct GpuProgram {
    label: String,
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    uniforms: UniformBlock,
    uniform_buffer: UniformBuffer,
    sampler_slots: u32,
    target_format: wgpu::TextureFormat,
}

impl GpuProgram {
    /// Compiles the shader and builds the pipeline
    ///
    /// # Errors
    /// [`LifeError::ShaderBuild`] carrying the compiler or validation
    /// diagnostic if the module or pipeline is rejected.
    pub fn new(context: &GpuContext, config: ProgramConfig) -> LifeResult<Self> {
        let device = &context.device;
        let source = format!("{}\n{}", VERTEX_SOURCE, config.fragment_source);
        let layout = UniformLayout::new(&config.uniforms);

        let (built, error) = context.error_scope(wgpu::ErrorFilter::Validation, || {
            let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(&config.label),
                source: wgpu::ShaderSource::Wgsl(source.into()),
            });

            let bind_group_layout =
                device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some(&format!("{} Bind Group Layout", config.label)),
                    entries: &program_layout_entries(config.sampler_slots),
                });

            let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&format!("{} Layout", config.label)),
                bind_group_layouts: &[&bind_group_layout],
                push_constant_ranges: &[],
            });

            let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(&config.label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs_main"),
                    buffers: &[QuadVertex::desc()],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: config.target_format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleStrip,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },
                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

            (pipeline, bind_group_layout)
        });

        if let Some(e) = error {
            return Err(LifeError::shader(&config.label, error_message(e)));
        }
        let (pipeline, bind_group_layout) = built;

        let uniform_buffer = UniformBuffer::new(device, &config.label, layout.size());
        log::debug!(
            "Built program '{}' ({} uniform bytes, {} sampler slots)",
            config.label,
            layout.size(),
            config.sampler_slots
        );

        Ok(Self {
            uniforms: UniformBlock::new(&config.label, layout),
            label: config.label,
            pipeline,
            bind_group_layout,
            uniform_buffer,
            sampler_slots: config.sampler_slots,
            target_format: config.target_format,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn target_format(&self) -> wgpu::TextureFormat {
        self.target_format
    }

    /// Sets a named uniform for subsequent draws
    pub fn uniform(&mut self, name: &str, value: impl Into<UniformValue>) -> LifeResult<()> {
        self.uniforms.set(name, value.into())
    }

    /// Draws the triangle strip into `target`, reading `inputs` in slot order
    ///
    /// The pass is recorded and submitted on its own so that any validation
    /// error it raises is attributed to this program.
    pub fn draw(
        &mut self,
        context: &GpuContext,
        strip: &TriangleStrip,
        target: &wgpu::TextureView,
        inputs: &[&TextureResource],
    ) -> LifeResult<()> {
        if inputs.len() != self.sampler_slots as usize {
            return Err(LifeError::draw(
                &self.label,
                format!(
                    "expected {} input textures, got {}",
                    self.sampler_slots,
                    inputs.len()
                ),
            ));
        }

        self.uniform_buffer
            .update_content(&context.queue, self.uniforms.bytes());

        let device = &context.device;
        let mut entries = vec![wgpu::BindGroupEntry {
            binding: UNIFORM_BINDING,
            resource: self.uniform_buffer.binding_resource(),
        }];
        for (slot, texture) in inputs.iter().enumerate() {
            entries.extend(texture.bind(slot as u32));
        }

        let ((), error) = context.error_scope(wgpu::ErrorFilter::Validation, || {
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("{} Bind Group", self.label)),
                layout: &self.bind_group_layout,
                entries: &entries,
            });

            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some(&format!("{} Encoder", self.label)),
            });

            {
                let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some(&format!("{} Pass", self.label)),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: target,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });

                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &bind_group, &[]);
                pass.set_vertex_buffer(0, strip.buffer().slice(..));
                pass.draw(0..strip.vertex_count(), 0..1);
            }

            context.queue.submit(std::iter::once(encoder.finish()));
        });

        match error {
            Some(e) => Err(LifeError::draw(&self.label, error_message(e))),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLID_FRAGMENT: &str = r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 0.0, 0.0, 1.0);
}
"#;

    /// Headless context, or `None` when the machine has no usable adapter
    fn context() -> Option<GpuContext> {
        match pollster::block_on(GpuContext::headless()) {
            Ok(context) => Some(context),
            Err(e) => {
                eprintln!("skipping GPU test: {}", e);
                None
            }
        }
    }

    fn solid_program(context: &GpuContext, sampler_slots: u32) -> GpuProgram {
        let config = ProgramConfig::new("solid", SOLID_FRAGMENT)
            .with_uniforms(&[("scale", UniformKind::Float)])
            .with_sampler_slots(sampler_slots);
        GpuProgram::new(context, config).unwrap()
    }

    #[test]
    fn malformed_shader_reports_compiler_message() {
        let Some(context) = context() else {
            return;
        };
        let source = r#"
@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return undefined_colour;
}
"#;

        match GpuProgram::new(&context, ProgramConfig::new("broken", source)) {
            Err(e @ LifeError::ShaderBuild { .. }) => {
                let message = e.to_string();
                assert!(message.contains("broken"), "{}", message);
                assert!(message.contains("undefined_colour"), "{}", message);
            }
            Err(e) => panic!("unexpected error: {}", e),
            Ok(_) => panic!("malformed shader was accepted"),
        }
    }

    #[test]
    fn draw_checks_input_count() {
        let Some(context) = context() else {
            return;
        };
        let strip = TriangleStrip::new(&context.device);
        let mut program = solid_program(&context, 1);
        let target = TextureResource::blank(
            &context,
            "target",
            4,
            4,
            wgpu::FilterMode::Nearest,
        )
        .unwrap();

        let err = program
            .draw(&context, &strip, &target.view, &[])
            .unwrap_err();
        assert!(matches!(err, LifeError::Draw { .. }));
        assert!(err.to_string().contains("expected 1 input textures, got 0"));
    }

    #[test]
    fn draw_into_wrong_format_fails() {
        let Some(context) = context() else {
            return;
        };
        let strip = TriangleStrip::new(&context.device);
        let mut program = solid_program(&context, 1);
        let input =
            TextureResource::blank(&context, "input", 4, 4, wgpu::FilterMode::Nearest).unwrap();
        let target = TextureResource::blank_with_format(
            &context,
            "bgra target",
            4,
            4,
            wgpu::FilterMode::Nearest,
            wgpu::TextureFormat::Bgra8Unorm,
        )
        .unwrap();

        let err = program
            .draw(&context, &strip, &target.view, &[&input])
            .unwrap_err();
        match err {
            LifeError::Draw { program, message } => {
                assert_eq!(program, "solid");
                assert_ne!(message, "Validation Error");
            }
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn matching_draw_succeeds() {
        let Some(context) = context() else {
            return;
        };
        let strip = TriangleStrip::new(&context.device);
        let mut program = solid_program(&context, 1);
        let input =
            TextureResource::blank(&context, "input", 4, 4, wgpu::FilterMode::Nearest).unwrap();
        let target =
            TextureResource::blank(&context, "target", 4, 4, wgpu::FilterMode::Nearest).unwrap();

        program.uniform("scale", 2.0_f32).unwrap();
        program
            .draw(&context, &strip, &target.view, &[&input])
            .unwrap();

        let pixels = target.read_pixels(&context).unwrap();
        assert!(pixels.chunks_exact(4).all(|p| p == [255, 0, 0, 255]));
    }
}
