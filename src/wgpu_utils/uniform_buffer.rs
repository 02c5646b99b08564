// src/wgpu_utils/uniform_buffer.rs
//! GPU-side storage for a program's uniform block

/// Uniform buffer holding the packed bytes of a [`UniformBlock`]
///
/// [`UniformBlock`]: super::uniform_block::UniformBlock
pub struct UniformBuffer {
    buffer: wgpu::Buffer,
    previous_content: Vec<u8>,
}

impl UniformBuffer {
    /// Create a new uniform buffer of `size` bytes
    pub fn new(device: &wgpu::Device, label: &str, size: u64) -> Self {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("UniformBuffer: {}", label)),
            size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        UniformBuffer {
            buffer,
            previous_content: Vec::new(),
        }
    }

    /// Update buffer content (skips the write when nothing changed)
    pub fn update_content(&mut self, queue: &wgpu::Queue, content: &[u8]) {
        if self.previous_content == content {
            return;
        }
        queue.write_buffer(&self.buffer, 0, content);
        self.previous_content = content.to_vec();
    }

    /// Get binding resource
    pub fn binding_resource(&self) -> wgpu::BindingResource<'_> {
        self.buffer.as_entire_binding()
    }

    /// Get buffer size
    pub fn size(&self) -> u64 {
        self.buffer.size()
    }
}
