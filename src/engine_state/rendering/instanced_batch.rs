//! Instanced rendering of the voxel figure.
//!
//! The figure is one draw call: the shared cube from [`super::vertex`] drawn once per
//! voxel, with each instance carrying its own offset, scale and colour.
//!
//! [`InstancedBatch`] is the CPU side and never touches the GPU. [`BatchResources`]
//! uploads a batch through the [`BufferState`] registry and owns the resulting buffers
//! until it is released or dropped.

use log::{info, warn};
use wgpu::util::BufferInitDescriptor;

use crate::{
    config::FigureConfig,
    core::StSystem,
    engine_state::{buffer_state::BufferState, voxels::Voxel},
    error::BatchError,
};

use super::vertex::{cube_indices, cube_vertices};

pub const CUBE_VERTEX_BUFFER_NAME: &str = "voxel_cube_vertex_buffer";
pub const CUBE_INDEX_BUFFER_NAME: &str = "voxel_cube_index_buffer";
pub const INSTANCE_BUFFER_NAME: &str = "voxel_instance_buffer";
pub const MATERIAL_BUFFER_NAME: &str = "voxel_material_buffer";

/// Per-instance data as the vertex shader reads it.
///
/// # Memory Layout
/// - Offset: [f32; 3] (12 bytes)
/// - Scale: [f32; 3] (12 bytes)
/// - Color: [f32; 4] linear RGBA (16 bytes)
///
/// Total size: 40 bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceRaw {
    pub offset: [f32; 3],
    pub scale: [f32; 3],
    pub color: [f32; 4],
}

impl InstanceRaw {
    const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![2 => Float32x3, 3 => Float32x3, 4 => Float32x4];

    pub fn from_voxel(voxel: &Voxel) -> Self {
        Self {
            offset: voxel.position.into(),
            scale: voxel.scale.to_vec3(),
            color: voxel.color.rgb().to_linear_rgba(1.0),
        }
    }

    /// Instance buffer layout.
    ///
    /// # Shader Attributes
    /// - `location = 2`: offset (vec3<f32>)
    /// - `location = 3`: scale (vec3<f32>)
    /// - `location = 4`: color (vec4<f32>)
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<InstanceRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Surface response of the figure's shared material.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub roughness: f32,
    pub metalness: f32,
    /// 1.0 when the figure receives shadows
    pub receive_shadow: f32,
    _padding: f32,
}

impl MaterialUniform {
    pub fn new(roughness: f32, metalness: f32, receive_shadow: bool) -> Self {
        Self {
            roughness,
            metalness,
            receive_shadow: if receive_shadow { 1.0 } else { 0.0 },
            _padding: 0.0,
        }
    }
}

impl Default for MaterialUniform {
    fn default() -> Self {
        let figure = FigureConfig::default();
        Self::new(figure.roughness, figure.metalness, figure.receive_shadow)
    }
}

/// The figure's instances, packed and bounded by a declared capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct InstancedBatch {
    capacity: usize,
    instances: Vec<InstanceRaw>,
    material: MaterialUniform,
}

impl InstancedBatch {
    /// Packs `voxels` into a batch that may hold at most `capacity` instances.
    ///
    /// Fails rather than truncating when the voxels do not fit.
    pub fn new(capacity: usize, voxels: &[Voxel]) -> Result<Self, BatchError> {
        if voxels.len() > capacity {
            return Err(BatchError::CapacityExceeded {
                requested: voxels.len(),
                capacity,
            });
        }

        Ok(Self {
            capacity,
            ..Self::for_voxels(voxels)
        })
    }

    /// A batch whose capacity is exactly the number of voxels.
    pub fn for_voxels(voxels: &[Voxel]) -> Self {
        Self {
            capacity: voxels.len(),
            instances: voxels.iter().map(InstanceRaw::from_voxel).collect(),
            material: MaterialUniform::default(),
        }
    }

    pub fn with_material(mut self, config: &FigureConfig) -> Self {
        self.material =
            MaterialUniform::new(config.roughness, config.metalness, config.receive_shadow);
        self
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn instance_count(&self) -> u32 {
        self.instances.len() as u32
    }

    pub fn instances(&self) -> &[InstanceRaw] {
        &self.instances
    }

    pub fn material(&self) -> MaterialUniform {
        self.material
    }
}

/// GPU buffers backing one mounted batch.
///
/// The buffers live in the shared [`BufferState`]; this handle only remembers that it
/// owns them. [`BatchResources::release`] destroys them and is also run on drop.
pub struct BatchResources {
    buffer_state: StSystem<BufferState>,
    instance_count: u32,
    index_count: u32,
    released: bool,
}

impl BatchResources {
    /// Uploads the cube, the instances and the material uniform.
    pub fn mount(buffer_state: StSystem<BufferState>, batch: &InstancedBatch) -> Self {
        let indices = cube_indices();
        {
            let mut buffers = buffer_state.get_mut();

            buffers.create_buffer_init(
                CUBE_VERTEX_BUFFER_NAME,
                BufferInitDescriptor {
                    label: Some(CUBE_VERTEX_BUFFER_NAME),
                    contents: bytemuck::cast_slice(&cube_vertices()),
                    usage: wgpu::BufferUsages::VERTEX,
                },
            );
            buffers.create_buffer_init(
                CUBE_INDEX_BUFFER_NAME,
                BufferInitDescriptor {
                    label: Some(CUBE_INDEX_BUFFER_NAME),
                    contents: bytemuck::cast_slice(&indices),
                    usage: wgpu::BufferUsages::INDEX,
                },
            );

            // Sized to the declared capacity; only the populated prefix is drawn
            let mut instances = batch.instances().to_vec();
            instances.resize(batch.capacity().max(1), bytemuck::Zeroable::zeroed());
            buffers.create_buffer_init(
                INSTANCE_BUFFER_NAME,
                BufferInitDescriptor {
                    label: Some(INSTANCE_BUFFER_NAME),
                    contents: bytemuck::cast_slice(&instances),
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                },
            );
            buffers.create_buffer_init(
                MATERIAL_BUFFER_NAME,
                BufferInitDescriptor {
                    label: Some(MATERIAL_BUFFER_NAME),
                    contents: bytemuck::bytes_of(&batch.material()),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                },
            );
        }

        info!(
            "Voxel batch mounted: {} instances, capacity {}",
            batch.instance_count(),
            batch.capacity()
        );

        Self {
            buffer_state,
            instance_count: batch.instance_count(),
            index_count: indices.len() as u32,
            released: false,
        }
    }

    pub fn instance_count(&self) -> u32 {
        if self.released {
            0
        } else {
            self.instance_count
        }
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    /// Records the figure draw into `render_pass`. Nothing is drawn after release.
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.instance_count() == 0 {
            return;
        }

        let buffers = self.buffer_state.get();
        render_pass.set_vertex_buffer(0, buffers.get_buffer(CUBE_VERTEX_BUFFER_NAME).slice(..));
        render_pass.set_vertex_buffer(1, buffers.get_buffer(INSTANCE_BUFFER_NAME).slice(..));
        render_pass.set_index_buffer(
            buffers.get_buffer(CUBE_INDEX_BUFFER_NAME).slice(..),
            wgpu::IndexFormat::Uint16,
        );
        render_pass.draw_indexed(0..self.index_count(), 0, 0..self.instance_count());
    }

    /// Destroys the batch's GPU buffers. Repeated calls do nothing.
    pub fn release(&mut self) {
        if self.released {
            return;
        }

        match self.buffer_state.try_get_mut() {
            Ok(mut buffers) => {
                for name in [
                    CUBE_VERTEX_BUFFER_NAME,
                    CUBE_INDEX_BUFFER_NAME,
                    INSTANCE_BUFFER_NAME,
                    MATERIAL_BUFFER_NAME,
                ] {
                    buffers.destroy_buffer(name);
                }
                self.released = true;
                info!("Voxel batch released");
            }
            Err(_) => warn!("Buffer registry busy, voxel batch release deferred"),
        }
    }
}

impl Drop for BatchResources {
    fn drop(&mut self) {
        self.release();
    }
}

#[cfg(test)]
mod tests {
    use crate::engine_state::voxels::{build_voxel_boy, PaletteColor, CUBE_SIZE};

    use super::*;

    #[test]
    fn builder_output_fits_its_own_batch() {
        let voxels = build_voxel_boy();
        let batch = InstancedBatch::for_voxels(&voxels);

        assert!(batch.capacity() >= voxels.len());
        assert_eq!(batch.instance_count() as usize, voxels.len());
    }

    #[test]
    fn exceeding_capacity_is_an_error() {
        let voxels = build_voxel_boy();
        let result = InstancedBatch::new(voxels.len() - 1, &voxels);

        assert_eq!(
            result,
            Err(BatchError::CapacityExceeded {
                requested: voxels.len(),
                capacity: voxels.len() - 1,
            })
        );
    }

    #[test]
    fn spare_capacity_is_allowed() {
        let voxels = build_voxel_boy();
        let batch = InstancedBatch::new(256, &voxels).unwrap();

        assert_eq!(batch.capacity(), 256);
        assert_eq!(batch.instance_count() as usize, voxels.len());
    }

    #[test]
    fn instances_follow_voxel_order() {
        let voxels = build_voxel_boy();
        let batch = InstancedBatch::for_voxels(&voxels);

        for (voxel, instance) in voxels.iter().zip(batch.instances()) {
            let offset: [f32; 3] = (voxel.grid * CUBE_SIZE).into();
            assert_eq!(instance.offset, offset);
            assert_eq!(instance.scale, voxel.scale.to_vec3());
            assert_eq!(instance.color, voxel.color.rgb().to_linear_rgba(1.0));
        }
    }

    #[test]
    fn shirt_instances_are_blue_in_linear_space() {
        let shirt = PaletteColor::Shirt.rgb().to_linear_rgba(1.0);
        assert!(shirt[2] > shirt[0] && shirt[2] > shirt[1]);
        assert_eq!(shirt[3], 1.0);
    }

    #[test]
    fn default_material_matches_figure_config() {
        let material = InstancedBatch::for_voxels(&build_voxel_boy()).material();

        assert_eq!(material.roughness, 0.45);
        assert_eq!(material.metalness, 0.05);
        assert_eq!(material.receive_shadow, 1.0);
    }
}
