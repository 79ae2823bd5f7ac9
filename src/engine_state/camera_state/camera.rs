//! # Camera Implementation
//!
//! Projection handling and the GPU-facing camera data.
//!
//! ## Key Components
//! - `Projection`: perspective projection settings, resized with the surface
//! - `CameraUniform`: packed view-projection and eye position for the shaders

use cgmath::*;

use super::orbit_controller::OrbitController;

/// Transformation matrix to convert from OpenGL's clip space to WGPU's.
///
/// cgmath produces OpenGL-style projections with NDC depth in [-1, 1]; WGPU expects
/// depth in [0, 1]. The matrix scales Z by one half and shifts it by one half.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Perspective projection parameters.
#[derive(Debug, Clone)]
pub struct Projection {
    /// Aspect ratio (width / height)
    aspect: f32,
    /// Vertical field of view in radians
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    /// Creates a new projection.
    ///
    /// # Arguments
    /// * `width` - Viewport width in pixels
    /// * `height` - Viewport height in pixels
    /// * `fovy` - Vertical field of view (any type convertible to `Rad<f32>`)
    /// * `znear` - Near clipping plane distance
    /// * `zfar` - Far clipping plane distance
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: aspect_ratio(width, height),
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    /// Updates the aspect ratio for a resized viewport.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    #[cfg(test)]
    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    /// Projection matrix in WGPU clip space.
    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// A minimised window reports a zero height; keep the last sane ratio instead of dividing by zero.
fn aspect_ratio(width: u32, height: u32) -> f32 {
    width.max(1) as f32 / height.max(1) as f32
}

/// View matrix looking from the orbit eye at its target.
pub fn view_matrix(controller: &OrbitController) -> Matrix4<f32> {
    Matrix4::look_at_rh(controller.eye(), controller.target(), Vector3::unit_y())
}

/// Camera data as laid out in the scene uniform.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    // cgmath types are not Pod, so matrices travel as column arrays
    pub view_proj: [[f32; 4]; 4],
    pub position: [f32; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        Self {
            view_proj: Matrix4::identity().into(),
            position: [0.0; 4],
        }
    }

    /// Refreshes the view-projection matrix and eye position.
    pub fn update_view_proj_and_pos(
        &mut self,
        controller: &OrbitController,
        projection: &Projection,
    ) {
        let view_proj = projection.calc_matrix() * view_matrix(controller);
        self.view_proj = view_proj.into();

        let eye = controller.eye();
        self.position = [eye.x, eye.y, eye.z, 1.0];
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}
