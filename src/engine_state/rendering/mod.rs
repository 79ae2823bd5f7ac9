//! Rendering system for the scene.
//!
//! This module owns the WebGPU surface and everything drawn into it: the instanced
//! voxel batch, the scene buffers and uniform, the shadow maps and the pipelines.

use log::{error, warn};
use pipeline_manager::PipelineManager;
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};

use crate::core::StSystem;

use super::{buffer_state::BufferState, scene::SceneGraph};

mod bind_group_state;
pub mod instanced_batch;
mod pipeline_manager;
pub mod scene_resources;
pub mod scene_uniform;
mod texture;
pub mod vertex;

pub use instanced_batch::{BatchResources, InstancedBatch};
pub use scene_resources::SceneResources;
pub use scene_uniform::SceneUniform;

/// Manages the surface and the per-frame render.
///
/// This struct is the main entry point for all rendering operations.
pub struct SceneRenderer {
    /// The WebGPU surface being rendered to
    pub surface: Surface<'static>,
    /// Configuration for the surface (size, format, etc.)
    pub surface_config: SurfaceConfiguration,
    pub device: StSystem<Device>,
    pub queue: StSystem<Queue>,
    pipeline_manager: PipelineManager,
}

impl SceneRenderer {
    /// Creates the renderer.
    ///
    /// The scene and batch buffers must already be mounted in `buffer_state`, since the
    /// bind groups reference them.
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: StSystem<Device>,
        queue: StSystem<Queue>,
        buffer_state: StSystem<BufferState>,
        graph: &SceneGraph,
        msaa_samples: u32,
    ) -> Self {
        let pipeline_manager = PipelineManager::new(
            device.clone(),
            &surface_config,
            buffer_state,
            graph,
            msaa_samples,
        );

        Self {
            surface,
            surface_config,
            device,
            queue,
            pipeline_manager,
        }
    }

    /// Handles window resize events.
    ///
    /// A zero-sized window (minimised) keeps the old configuration; the surface cannot
    /// be configured with a zero extent.
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }

        self.surface_config.width = size.width;
        self.surface_config.height = size.height;

        self.reconfigure();
        self.pipeline_manager
            .resize(&self.device.get(), &self.surface_config);
    }

    fn reconfigure(&self) {
        self.surface.configure(&self.device.get(), &self.surface_config);
    }

    /// Renders a new frame.
    ///
    /// A lost or outdated surface is reconfigured and a timed-out frame is skipped.
    /// Only unrecoverable surface errors are returned.
    pub fn render(
        &mut self,
        graph: &SceneGraph,
        batch: &BatchResources,
        scene_resources: &SceneResources,
    ) -> Result<(), wgpu::SurfaceError> {
        let result = {
            let device = self.device.get();
            let queue = self.queue.get();
            self.pipeline_manager.render(
                &self.surface,
                &device,
                &queue,
                graph,
                batch,
                scene_resources,
            )
        };

        match result {
            Ok(()) => Ok(()),
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                warn!("Surface lost or outdated, reconfiguring");
                self.reconfigure();
                Ok(())
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Surface timed out, skipping frame");
                Ok(())
            }
            Err(err) => {
                error!("Unrecoverable surface error: {}", err);
                Err(err)
            }
        }
    }

    pub fn sample_count(&self) -> u32 {
        self.pipeline_manager.sample_count()
    }
}
