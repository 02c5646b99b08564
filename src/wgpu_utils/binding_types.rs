// src/wgpu_utils/binding_types.rs
//! WGPU binding type utilities for full-screen fragment programs

pub fn uniform() -> wgpu::BindingType {
    wgpu::BindingType::Buffer {
        ty: wgpu::BufferBindingType::Uniform,
        has_dynamic_offset: false,
        min_binding_size: None,
    }
}

pub fn sampler(filtering: wgpu::SamplerBindingType) -> wgpu::BindingType {
    wgpu::BindingType::Sampler(filtering)
}

pub fn texture_2d() -> wgpu::BindingType {
    wgpu::BindingType::Texture {
        sample_type: wgpu::TextureSampleType::Float { filterable: true },
        view_dimension: wgpu::TextureViewDimension::D2,
        multisampled: false,
    }
}

/// Layout entry visible to the fragment stage
pub fn fragment_entry(binding: u32, ty: wgpu::BindingType) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty,
        count: None,
    }
}

/// Binding index of the uniform block
pub const UNIFORM_BINDING: u32 = 0;

/// Binding index of the texture for sampler slot `slot`
///
/// Slot `n` occupies bindings `1 + 2n` (texture) and `2 + 2n` (sampler).
pub fn slot_texture_binding(slot: u32) -> u32 {
    1 + 2 * slot
}

/// Binding index of the sampler for sampler slot `slot`
pub fn slot_sampler_binding(slot: u32) -> u32 {
    2 + 2 * slot
}

/// Layout entries for a uniform block followed by `slots` texture/sampler pairs
pub fn program_layout_entries(slots: u32) -> Vec<wgpu::BindGroupLayoutEntry> {
    let mut entries = vec![fragment_entry(UNIFORM_BINDING, uniform())];

    for slot in 0..slots {
        entries.push(fragment_entry(slot_texture_binding(slot), texture_2d()));
        entries.push(fragment_entry(
            slot_sampler_binding(slot),
            sampler(wgpu::SamplerBindingType::Filtering),
        ));
    }

    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_interleave_texture_and_sampler() {
        let entries = program_layout_entries(2);
        let bindings: Vec<u32> = entries.iter().map(|e| e.binding).collect();

        assert_eq!(bindings, vec![0, 1, 2, 3, 4]);
        assert_eq!(slot_texture_binding(1), 3);
        assert_eq!(slot_sampler_binding(1), 4);
        assert!(matches!(entries[0].ty, wgpu::BindingType::Buffer { .. }));
        assert!(matches!(entries[3].ty, wgpu::BindingType::Texture { .. }));
    }
}
