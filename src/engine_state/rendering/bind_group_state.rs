//! Manages WebGPU bind groups and their layouts.
//!
//! Three groups are shared by the scene pipelines:
//! - group 0: the scene uniform, read by every stage
//! - group 1: both shadow maps and the comparison sampler
//! - group 2: the figure's material uniform

use std::collections::HashMap;

use wgpu::{BindGroup, BindGroupLayout, Device};

use crate::engine_state::buffer_state::BufferState;

use super::{
    instanced_batch::MATERIAL_BUFFER_NAME, scene_resources::SCENE_UNIFORM_BUFFER_NAME, texture,
};

pub const SCENE_BIND_GROUP: &str = "scene_bind_group";
pub const SCENE_BIND_GROUP_LAYOUT: &str = "scene_bind_group_layout";
pub const SHADOW_BIND_GROUP: &str = "shadow_bind_group";
pub const SHADOW_BIND_GROUP_LAYOUT: &str = "shadow_bind_group_layout";
pub const MATERIAL_BIND_GROUP: &str = "material_bind_group";
pub const MATERIAL_BIND_GROUP_LAYOUT: &str = "material_bind_group_layout";

/// Named bind groups and layouts.
pub struct BindGroupState {
    bind_groups: HashMap<&'static str, wgpu::BindGroup>,
    bind_group_layouts: HashMap<&'static str, wgpu::BindGroupLayout>,
}

impl BindGroupState {
    /// Creates every group. The scene uniform and material buffers must already be
    /// registered in `buffer_state`.
    pub fn new(
        device: &Device,
        buffer_state: &BufferState,
        key_shadow_map: &texture::Texture,
        rim_shadow_map: &texture::Texture,
        shadow_sampler: &wgpu::Sampler,
    ) -> Self {
        let mut bind_groups = HashMap::new();
        let mut bind_group_layouts = HashMap::new();

        let (scene_bind_group, scene_bind_group_layout) = Self::generate_uniform_bindgroups(
            device,
            buffer_state,
            SCENE_UNIFORM_BUFFER_NAME,
            wgpu::ShaderStages::VERTEX_FRAGMENT,
            SCENE_BIND_GROUP,
            SCENE_BIND_GROUP_LAYOUT,
        );
        bind_groups.insert(SCENE_BIND_GROUP, scene_bind_group);
        bind_group_layouts.insert(SCENE_BIND_GROUP_LAYOUT, scene_bind_group_layout);

        let (shadow_bind_group, shadow_bind_group_layout) = Self::generate_shadow_bindgroups(
            device,
            key_shadow_map,
            rim_shadow_map,
            shadow_sampler,
        );
        bind_groups.insert(SHADOW_BIND_GROUP, shadow_bind_group);
        bind_group_layouts.insert(SHADOW_BIND_GROUP_LAYOUT, shadow_bind_group_layout);

        let (material_bind_group, material_bind_group_layout) = Self::generate_uniform_bindgroups(
            device,
            buffer_state,
            MATERIAL_BUFFER_NAME,
            wgpu::ShaderStages::FRAGMENT,
            MATERIAL_BIND_GROUP,
            MATERIAL_BIND_GROUP_LAYOUT,
        );
        bind_groups.insert(MATERIAL_BIND_GROUP, material_bind_group);
        bind_group_layouts.insert(MATERIAL_BIND_GROUP_LAYOUT, material_bind_group_layout);

        Self {
            bind_groups,
            bind_group_layouts,
        }
    }

    /// # Panics
    /// Panics if no bind group with the given name exists
    pub fn get_bind_group(&self, name: &'static str) -> &wgpu::BindGroup {
        match self.bind_groups.get(name) {
            Some(bind_group) => bind_group,
            None => panic!("Bind group '{}' is not registered", name),
        }
    }

    /// # Panics
    /// Panics if no bind group layout with the given name exists
    pub fn get_bind_group_layout(&self, name: &'static str) -> &wgpu::BindGroupLayout {
        match self.bind_group_layouts.get(name) {
            Some(layout) => layout,
            None => panic!("Bind group layout '{}' is not registered", name),
        }
    }

    fn generate_uniform_bindgroups(
        device: &Device,
        buffer_state: &BufferState,
        buffer_name: &'static str,
        visibility: wgpu::ShaderStages,
        group_label: &'static str,
        layout_label: &'static str,
    ) -> (BindGroup, BindGroupLayout) {
        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some(layout_label),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer_state.get_entire_binding(buffer_name),
            }],
            label: Some(group_label),
        });

        (bind_group, layout)
    }

    /// Creates the group that lets the main pass sample both shadow maps.
    fn generate_shadow_bindgroups(
        device: &Device,
        key_shadow_map: &texture::Texture,
        rim_shadow_map: &texture::Texture,
        sampler: &wgpu::Sampler,
    ) -> (BindGroup, BindGroupLayout) {
        let depth_entry = |binding| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Depth,
            },
            count: None,
        };

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                depth_entry(0),
                depth_entry(1),
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
            label: Some(SHADOW_BIND_GROUP_LAYOUT),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&key_shadow_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&rim_shadow_map.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(sampler),
                },
            ],
            label: Some(SHADOW_BIND_GROUP),
        });

        (bind_group, layout)
    }
}
