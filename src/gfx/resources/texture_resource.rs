//! Texture resource management for wgpu
//!
//! Every texture the simulation touches is a fixed-size 2D colour texture that
//! can be rendered into, sampled, written from the host and read back.

use crate::error::{LifeError, LifeResult};
use crate::gfx::context::GpuContext;
use crate::wgpu_utils::{slot_sampler_binding, slot_texture_binding};

/// Bytes per RGBA8 texel
pub const BYTES_PER_PIXEL: u32 = 4;

/// GPU texture resource containing texture, view, and sampler
///
/// Bundles the three main components needed for texture operations:
/// - Texture: The actual GPU memory allocation
/// - View: Interface for shader access and render attachment
/// - Sampler: Filtering and addressing configuration
pub struct TextureResource {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl TextureResource {
    /// Format of state and intermediate textures
    pub const STATE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Allocates an RGBA8 texture with every texel zero
    ///
    /// Addressing is clamp-to-edge; neighbour wraparound is done in the
    /// shaders so any size works.
    ///
    /// # Arguments
    /// * `context` - Device and queue to allocate on
    /// * `label` - Debug label for the texture
    /// * `width`, `height` - Texture size in texels
    /// * `filter_mode` - Nearest for cell state, Linear for blur targets
    ///
    /// # Errors
    /// [`LifeError::TextureAllocation`] if either dimension is zero or above
    /// the device maximum, or if the device runs out of memory.
    pub fn blank(
        context: &GpuContext,
        label: &str,
        width: u32,
        height: u32,
        filter_mode: wgpu::FilterMode,
    ) -> LifeResult<Self> {
        Self::blank_with_format(context, label, width, height, filter_mode, Self::STATE_FORMAT)
    }

    /// [`blank`](Self::blank) with an explicit colour format
    pub fn blank_with_format(
        context: &GpuContext,
        label: &str,
        width: u32,
        height: u32,
        filter_mode: wgpu::FilterMode,
        format: wgpu::TextureFormat,
    ) -> LifeResult<Self> {
        let max = context.max_texture_size();
        let allocation_error = || LifeError::TextureAllocation { width, height, max };

        if width == 0 || height == 0 || width > max || height > max {
            return Err(allocation_error());
        }

        let device = &context.device;

        // wgpu zero-initialises new textures, so no explicit clear is needed
        let (resource, error) = context.error_scope(wgpu::ErrorFilter::OutOfMemory, || {
            let texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage: wgpu::TextureUsages::RENDER_ATTACHMENT
                    | wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_DST
                    | wgpu::TextureUsages::COPY_SRC,
                view_formats: &[],
            });

            let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

            let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
                label: Some(&format!("{} Sampler", label)),
                address_mode_u: wgpu::AddressMode::ClampToEdge,
                address_mode_v: wgpu::AddressMode::ClampToEdge,
                address_mode_w: wgpu::AddressMode::ClampToEdge,
                mag_filter: filter_mode,
                min_filter: filter_mode,
                mipmap_filter: wgpu::FilterMode::Nearest,
                ..Default::default()
            });

            Self {
                texture,
                view,
                sampler,
            }
        });

        if let Some(e) = error {
            log::error!("Allocating '{}' failed: {}", label, e);
            return Err(allocation_error());
        }

        log::debug!("Allocated texture '{}' ({} x {})", label, width, height);
        Ok(resource)
    }

    pub fn width(&self) -> u32 {
        self.texture.width()
    }

    pub fn height(&self) -> u32 {
        self.texture.height()
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        self.texture.format()
    }

    /// Writes an RGBA8 sub-rectangle whose bottom-left texel is `(x, y)` in
    /// texture memory
    ///
    /// The single-pixel case is the cell-edit path.
    pub fn subset(
        &self,
        queue: &wgpu::Queue,
        rgba: &[u8],
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    ) -> LifeResult<()> {
        let expected = (width * height * BYTES_PER_PIXEL) as usize;
        if rgba.len() != expected {
            return Err(LifeError::PixelBufferSize {
                expected,
                actual: rgba.len(),
            });
        }

        if x + width > self.width() || y + height > self.height() {
            return Err(LifeError::CellOutOfBounds {
                x: (x + width) as i64 - 1,
                y: (y + height) as i64 - 1,
                width: self.width() as usize,
                height: self.height() as usize,
            });
        }

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(BYTES_PER_PIXEL * width),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        Ok(())
    }

    /// Bind group entries placing this texture in sampler slot `slot`
    pub fn bind(&self, slot: u32) -> [wgpu::BindGroupEntry<'_>; 2] {
        [
            wgpu::BindGroupEntry {
                binding: slot_texture_binding(slot),
                resource: wgpu::BindingResource::TextureView(&self.view),
            },
            wgpu::BindGroupEntry {
                binding: slot_sampler_binding(slot),
                resource: wgpu::BindingResource::Sampler(&self.sampler),
            },
        ]
    }

    /// Copies the whole texture back to the host, row 0 first
    pub fn read_pixels(&self, context: &GpuContext) -> LifeResult<Vec<u8>> {
        let (width, height) = (self.width(), self.height());
        let unpadded_bytes_per_row = width * BYTES_PER_PIXEL;
        let padded_bytes_per_row = padded_bytes_per_row(width);

        let staging_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Readback Buffer"),
            size: (padded_bytes_per_row * height) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Readback Encoder"),
            });

        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &staging_buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_bytes_per_row),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );

        context.queue.submit(std::iter::once(encoder.finish()));

        let slice = staging_buffer.slice(..);
        let (tx, rx) = futures::channel::oneshot::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        context
            .device
            .poll(wgpu::PollType::Wait)
            .map_err(|e| LifeError::Readback(e.to_string()))?;

        match futures::executor::block_on(rx) {
            Ok(Ok(())) => {
                let mapped = slice.get_mapped_range();
                let pixels = strip_row_padding(
                    &mapped,
                    unpadded_bytes_per_row as usize,
                    padded_bytes_per_row as usize,
                    height as usize,
                );
                drop(mapped);
                staging_buffer.unmap();
                log::debug!("Read back {} x {} texels", width, height);
                Ok(pixels)
            }
            Ok(Err(e)) => Err(LifeError::Readback(e.to_string())),
            Err(_) => Err(LifeError::Readback("map callback dropped".to_string())),
        }
    }
}

/// Row pitch of a readback buffer, rounded up to the copy alignment
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * BYTES_PER_PIXEL;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

fn strip_row_padding(padded: &[u8], unpadded: usize, pitch: usize, rows: usize) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(unpadded * rows);
    for row in 0..rows {
        let start = row * pitch;
        pixels.extend_from_slice(&padded[start..start + unpadded]);
    }
    pixels
}
