//! # Camera State Management
//!
//! The orbit camera: controller state, projection, and the camera block of the scene
//! uniform.
//!
//! ## Core Components
//! - `OrbitController`: damped orbit around the figure's torso, clamped in distance and
//!   polar angle
//! - `Projection`: perspective projection, resized with the surface
//! - `CameraUniform`: view-projection and eye position for the shaders

use cgmath::{Deg, Point3};

use crate::config::SceneConfig;

use super::OrbitActions;

pub mod camera;
pub mod orbit_controller;

pub use orbit_controller::OrbitController;

/// Owns everything the camera needs from frame to frame.
pub struct CameraState {
    pub controller: OrbitController,
    pub projection: camera::Projection,
    pub camera_uniform: camera::CameraUniform,
    /// Surface height in pixels, used to scale drag input
    viewport_height: f32,
}

impl CameraState {
    pub fn new(config: &SceneConfig, width: u32, height: u32) -> Self {
        let controller = OrbitController::new(Point3::from(config.camera.position), &config.orbit);
        let projection = camera::Projection::new(
            width,
            height,
            Deg(config.camera.fov_degrees),
            config.camera.near,
            config.camera.far,
        );

        let mut camera_uniform = camera::CameraUniform::new();
        camera_uniform.update_view_proj_and_pos(&controller, &projection);

        Self {
            controller,
            projection,
            camera_uniform,
            viewport_height: height.max(1) as f32,
        }
    }

    /// Queues this frame's drag and wheel input on the controller.
    pub fn intake_actions(&mut self, actions: &OrbitActions) {
        if let Some((delta_x, delta_y)) = actions.rotate {
            self.controller
                .rotate(delta_x as f32, delta_y as f32, self.viewport_height);
        }
        if actions.zoom != 0.0 {
            self.controller.zoom(actions.zoom);
        }
    }

    /// Advances the controller one frame and refreshes the uniform.
    ///
    /// Returns `true` if the camera moved.
    pub fn update(&mut self) -> bool {
        let moved = self.controller.update();
        if moved {
            self.camera_uniform
                .update_view_proj_and_pos(&self.controller, &self.projection);
        }
        moved
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.projection.resize(width, height);
        self.viewport_height = height.max(1) as f32;
        self.camera_uniform
            .update_view_proj_and_pos(&self.controller, &self.projection);
    }
}
