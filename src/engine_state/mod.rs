//! # Engine State Module
//!
//! The core module that owns the scene and everything needed to draw it.
//!
//! ## Key Components
//!
//! * `EngineState` - The main state container
//! * `buffer_state` - Named registry of GPU buffers
//! * `camera_state` - Orbit camera and projection
//! * `rendering` - Instanced batch, scene buffers, pipelines and passes
//! * `scene` - Scene graph, scene context and the idle float
//! * `voxels` - The figure's voxel model and palette
//!
//! ## Lifecycle
//!
//! `EngineState::new` builds the voxel model, mounts the batch, attaches the scene
//! context and creates the renderer. `EngineState::unmount` reverses the mount in
//! order: detach the scene, release the batch, destroy the scene buffers. It runs on
//! close, on Escape, and again from `Drop`, where it does nothing the second time.

use log::{debug, info, warn};
use rendering::{BatchResources, InstancedBatch, SceneRenderer, SceneResources, SceneUniform};
use scene::{IdleFloat, SceneContext, SceneGraph};
use wgpu::{Device, Queue, Surface, SurfaceConfiguration};
use voxels::{PaletteColor, Voxel};
use winit::event::MouseButton;

use crate::{
    application_state::input_state::ProcessedInputState, config::SceneConfig, core::StSystem,
    error::EngineError,
};

use camera_state::CameraState;

pub mod buffer_state;
pub mod camera_state;
pub mod rendering;
pub mod scene;
pub mod voxels;

/// Orbit input gathered for one frame.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct OrbitActions {
    /// Pointer delta in pixels while the left button is held
    pub rotate: Option<(f64, f64)>,
    /// Wheel steps; positive moves the camera in
    pub zoom: f32,
}

impl OrbitActions {
    /// Translates the processed input state into orbit actions.
    ///
    /// Dragging with the left button rotates and the wheel zooms.
    pub fn from_input(input: &ProcessedInputState) -> Self {
        let dragging = input.get_mouse_button_state(MouseButton::Left).is_active();

        Self {
            rotate: input.get_mouse_delta().filter(|_| dragging),
            zoom: input.get_scroll_delta(),
        }
    }
}

/// The main state container.
///
/// This struct maintains references to all subsystems and coordinates their
/// interactions. It handles input, advances the camera and the idle float, and renders.
pub struct EngineState {
    /// Camera state managing position, orientation and movement
    pub camera_state: CameraState,
    /// Orbit input waiting for the next `process_input`
    pub orbit_actions: OrbitActions,
    /// Buffer state for managing GPU buffers
    pub buffer_state: StSystem<buffer_state::BufferState>,
    pub renderer: SceneRenderer,
    pub graph: SceneGraph,
    scene_context: SceneContext,
    batch: BatchResources,
    scene_resources: SceneResources,
    idle_float: IdleFloat,
    /// Seconds since mount, advanced by `process_input`
    elapsed: f32,
}

impl EngineState {
    /// Creates a new engine state with the scene mounted.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Batch`] if the figure does not fit in its instanced batch.
    pub fn new(
        surface: Surface<'static>,
        surface_config: SurfaceConfiguration,
        device: Device,
        queue: Queue,
        config: &SceneConfig,
    ) -> Result<Self, EngineError> {
        let device = StSystem::new(Box::new(device));
        let queue = StSystem::new(Box::new(queue));
        let buffer_state = StSystem::new(Box::new(buffer_state::BufferState::new(
            device.clone(),
            queue.clone(),
        )));

        let voxels = voxels::build_voxel_boy();
        let batch =
            InstancedBatch::new(voxels.len(), &voxels)?.with_material(&config.figure);
        let batch = BatchResources::mount(buffer_state.clone(), &batch);

        let mut graph = SceneGraph::new();
        let scene_context = SceneContext::attach(&mut graph, config, voxels.len());
        let scene_resources = SceneResources::mount(buffer_state.clone(), &graph);

        let camera_state =
            CameraState::new(config, surface_config.width, surface_config.height);

        let renderer = SceneRenderer::new(
            surface,
            surface_config,
            device,
            queue,
            buffer_state.clone(),
            &graph,
            config.canvas.msaa_samples,
        );

        info!(
            "Scene mounted: {} voxels, {}x multisampling",
            voxels.len(),
            renderer.sample_count()
        );
        debug!(
            "{} buffers, {} bytes allocated",
            buffer_state.get().buffer_count(),
            buffer_state.get().get_total_allocated_memory()
        );
        log_palette_usage(&voxels);

        Ok(Self {
            camera_state,
            orbit_actions: OrbitActions::default(),
            buffer_state,
            renderer,
            graph,
            scene_context,
            batch,
            scene_resources,
            idle_float: IdleFloat::new(&config.float),
            elapsed: 0.0,
        })
    }

    /// Resizes the rendering surface when the window size changes
    pub fn resize_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) {
        if size.width == 0 || size.height == 0 {
            return;
        }
        self.renderer.resize_surface(size);
        self.camera_state.resize(size.width, size.height);
    }

    /// Renders the current frame.
    ///
    /// Does nothing once the scene is unmounted.
    ///
    /// # Errors
    ///
    /// Returns the surface error when the frame cannot be presented and the surface
    /// cannot recover.
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if !self.is_mounted() {
            return Ok(());
        }

        let uniform =
            SceneUniform::build(&self.graph, &self.camera_state.camera_uniform, self.elapsed);
        self.scene_resources.write_uniform(&uniform);

        self.renderer
            .render(&self.graph, &self.batch, &self.scene_resources)
    }

    /// Advances the camera and the idle float by the time elapsed since the last frame.
    pub fn process_input(&mut self, wait_duration: web_time::Duration) {
        let actions = std::mem::take(&mut self.orbit_actions);
        self.camera_state.intake_actions(&actions);
        self.camera_state.update();

        self.elapsed += wait_duration.as_secs_f32();
        let float = self.idle_float.transform_at(self.elapsed);
        self.scene_context.set_figure_float(&mut self.graph, float);
    }

    /// Sets the input commands for the next `process_input`.
    pub fn set_input_commands(&mut self, input: ProcessedInputState) {
        self.orbit_actions = OrbitActions::from_input(&input);
    }

    pub fn is_mounted(&self) -> bool {
        self.scene_context.is_attached()
    }

    /// Tears the scene down: detach the context, release the batch, destroy the scene
    /// buffers. Calling it again does nothing.
    pub fn unmount(&mut self) {
        if !self.is_mounted() {
            return;
        }

        self.scene_context.detach(&mut self.graph);
        self.batch.release();
        self.scene_resources.release();

        if !self.graph.is_empty() {
            warn!("{} scene nodes outlived the scene context", self.graph.len());
        }
        info!(
            "Scene unmounted, {} buffers remain",
            self.buffer_state.get().buffer_count()
        );
    }
}

fn log_palette_usage(voxels: &[Voxel]) {
    for color in PaletteColor::ALL {
        let count = voxels.iter().filter(|voxel| voxel.color == color).count();
        debug!("{:>12}: {} voxels", color.name(), count);
    }
}

impl Drop for EngineState {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::application_state::input_state::RawInputState;

    fn input(left: RawInputState, delta: Option<(f64, f64)>, scroll: f32) -> ProcessedInputState {
        ProcessedInputState {
            mouse_button_states: HashMap::from([(MouseButton::Left, left)]),
            mouse_delta: delta,
            scroll_delta: scroll,
        }
    }

    #[test]
    fn drag_with_left_button_rotates() {
        let actions = OrbitActions::from_input(&input(RawInputState::Held, Some((4.0, -2.0)), 0.0));

        assert_eq!(actions.rotate, Some((4.0, -2.0)));
        assert_eq!(actions.zoom, 0.0);
    }

    #[test]
    fn pointer_motion_without_button_does_not_rotate() {
        let actions =
            OrbitActions::from_input(&input(RawInputState::NotPressed, Some((4.0, -2.0)), 1.5));

        assert_eq!(actions.rotate, None);
        assert_eq!(actions.zoom, 1.5);
    }
}
