//! # Full-screen triangle strip
//!
//! Every program draws the same four vertices, covering clip space as a
//! two-triangle strip. The vertex shader reads them through the `quad`
//! attribute at location 0.

use wgpu::util::DeviceExt;

/// A 2D clip-space vertex
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct QuadVertex {
    /// Clip-space position [x, y]
    pub quad: [f32; 2],
}

impl QuadVertex {
    /// Shader location of the `quad` attribute
    pub const LOCATION: u32 = 0;

    /// Returns the vertex buffer layout for wgpu rendering.
    ///
    /// - Attribute 0: `quad` (Float32x2)
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: Self::LOCATION,
                format: wgpu::VertexFormat::Float32x2,
            }],
        }
    }
}

/// Bottom-left, bottom-right, top-left, top-right
pub const STRIP_VERTICES: [QuadVertex; 4] = [
    QuadVertex { quad: [-1.0, -1.0] },
    QuadVertex { quad: [1.0, -1.0] },
    QuadVertex { quad: [-1.0, 1.0] },
    QuadVertex { quad: [1.0, 1.0] },
];

/// Vertex buffer holding [`STRIP_VERTICES`]
pub struct TriangleStrip {
    buffer: wgpu::Buffer,
}

impl TriangleStrip {
    pub fn new(device: &wgpu::Device) -> Self {
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Triangle Strip"),
            contents: bytemuck::cast_slice(&STRIP_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        Self { buffer }
    }

    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    pub fn vertex_count(&self) -> u32 {
        STRIP_VERTICES.len() as u32
    }
}
