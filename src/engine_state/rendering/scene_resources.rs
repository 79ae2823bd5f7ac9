//! GPU buffers for everything in the scene except the figure: the scene uniform, the
//! shared ground quad, and the sparkle instances.

use log::{info, warn};
use wgpu::util::BufferInitDescriptor;

use crate::{
    core::StSystem,
    engine_state::{buffer_state::BufferState, scene::SceneGraph},
};

use super::{
    scene_uniform::SceneUniform,
    vertex::{GROUND_QUAD, GROUND_QUAD_INDICES},
};

pub const SCENE_UNIFORM_BUFFER_NAME: &str = "scene_uniform_buffer";
pub const QUAD_VERTEX_BUFFER_NAME: &str = "ground_quad_vertex_buffer";
pub const QUAD_INDEX_BUFFER_NAME: &str = "ground_quad_index_buffer";
pub const SPARKLE_BUFFER_NAME: &str = "sparkle_instance_buffer";

const BUFFER_NAMES: [&str; 4] = [
    SCENE_UNIFORM_BUFFER_NAME,
    QUAD_VERTEX_BUFFER_NAME,
    QUAD_INDEX_BUFFER_NAME,
    SPARKLE_BUFFER_NAME,
];

pub struct SceneResources {
    buffer_state: StSystem<BufferState>,
    sparkle_count: u32,
    released: bool,
}

impl SceneResources {
    /// Creates the scene buffers from the attached graph.
    pub fn mount(buffer_state: StSystem<BufferState>, graph: &SceneGraph) -> Self {
        let sparkles = graph
            .sparkles()
            .map(|field| field.particles.clone())
            .unwrap_or_default();
        // A zero-sized vertex buffer cannot be bound
        let sparkle_contents = if sparkles.is_empty() {
            vec![bytemuck::Zeroable::zeroed()]
        } else {
            sparkles.clone()
        };

        {
            let mut buffers = buffer_state.get_mut();

            buffers.create_buffer_init(
                SCENE_UNIFORM_BUFFER_NAME,
                BufferInitDescriptor {
                    label: Some(SCENE_UNIFORM_BUFFER_NAME),
                    contents: bytemuck::bytes_of(&SceneUniform::default()),
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                },
            );
            buffers.create_buffer_init(
                QUAD_VERTEX_BUFFER_NAME,
                BufferInitDescriptor {
                    label: Some(QUAD_VERTEX_BUFFER_NAME),
                    contents: bytemuck::cast_slice(&GROUND_QUAD),
                    usage: wgpu::BufferUsages::VERTEX,
                },
            );
            buffers.create_buffer_init(
                QUAD_INDEX_BUFFER_NAME,
                BufferInitDescriptor {
                    label: Some(QUAD_INDEX_BUFFER_NAME),
                    contents: bytemuck::cast_slice(&GROUND_QUAD_INDICES),
                    usage: wgpu::BufferUsages::INDEX,
                },
            );
            buffers.create_buffer_init(
                SPARKLE_BUFFER_NAME,
                BufferInitDescriptor {
                    label: Some(SPARKLE_BUFFER_NAME),
                    contents: bytemuck::cast_slice(&sparkle_contents),
                    usage: wgpu::BufferUsages::VERTEX,
                },
            );
        }

        Self {
            buffer_state,
            sparkle_count: sparkles.len() as u32,
            released: false,
        }
    }

    pub fn sparkle_count(&self) -> u32 {
        if self.released {
            0
        } else {
            self.sparkle_count
        }
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    pub fn buffer_state(&self) -> &StSystem<BufferState> {
        &self.buffer_state
    }

    pub fn write_uniform(&self, uniform: &SceneUniform) {
        if self.released {
            return;
        }
        self.buffer_state
            .get()
            .write_pod(SCENE_UNIFORM_BUFFER_NAME, std::slice::from_ref(uniform));
    }

    /// Destroys the scene buffers. Repeated calls do nothing.
    pub fn release(&mut self) {
        if self.released {
            return;
        }

        match self.buffer_state.try_get_mut() {
            Ok(mut buffers) => {
                let destroyed = BUFFER_NAMES
                    .iter()
                    .filter(|name| buffers.destroy_buffer(name))
                    .count();
                self.released = true;
                info!("Scene buffers released ({} destroyed)", destroyed);
            }
            Err(_) => warn!("Buffer registry busy, scene buffer release deferred"),
        }
    }
}

impl Drop for SceneResources {
    fn drop(&mut self) {
        self.release();
    }
}
