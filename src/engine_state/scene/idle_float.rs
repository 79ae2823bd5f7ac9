//! Idle float: the slow bob and sway applied to the figure's group.
//!
//! The motion is a pure function of elapsed time. Nothing accumulates between frames,
//! so remounting or pausing and resuming picks up exactly where the clock says.

use cgmath::{Matrix4, Rad, Vector3};

use crate::config::FloatConfig;

/// A group transform: translation followed by an XYZ-ordered rotation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupTransform {
    pub translation: Vector3<f32>,
    /// Euler angles in radians, applied in X, Y, Z order
    pub rotation: Vector3<f32>,
}

impl GroupTransform {
    pub const IDENTITY: GroupTransform = GroupTransform {
        translation: Vector3::new(0.0, 0.0, 0.0),
        rotation: Vector3::new(0.0, 0.0, 0.0),
    };

    /// A pure rotation about +Y.
    pub fn yaw(angle: f32) -> Self {
        Self {
            translation: Vector3::new(0.0, 0.0, 0.0),
            rotation: Vector3::new(0.0, angle, 0.0),
        }
    }

    pub fn matrix(&self) -> Matrix4<f32> {
        Matrix4::from_translation(self.translation)
            * Matrix4::from_angle_x(Rad(self.rotation.x))
            * Matrix4::from_angle_y(Rad(self.rotation.y))
            * Matrix4::from_angle_z(Rad(self.rotation.z))
    }
}

impl Default for GroupTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Idle float parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct IdleFloat {
    speed: f32,
    rotation_intensity: f32,
    float_intensity: f32,
    range: [f32; 2],
    time_offset: f32,
}

impl IdleFloat {
    pub fn new(config: &FloatConfig) -> Self {
        Self {
            speed: config.speed,
            rotation_intensity: config.rotation_intensity,
            float_intensity: config.float_intensity,
            range: config.floating_range,
            time_offset: config.time_offset,
        }
    }

    /// The float transform at `elapsed` seconds since mount.
    pub fn transform_at(&self, elapsed: f32) -> GroupTransform {
        let t = (self.time_offset + elapsed) / 4.0 * self.speed;
        let (sin_t, cos_t) = t.sin_cos();

        let rotation = Vector3::new(
            cos_t / 8.0 * self.rotation_intensity,
            sin_t / 8.0 * self.rotation_intensity,
            sin_t / 20.0 * self.rotation_intensity,
        );

        let bob = map_linear(sin_t / 10.0, -0.1, 0.1, self.range[0], self.range[1]);

        GroupTransform {
            translation: Vector3::new(0.0, bob * self.float_intensity, 0.0),
            rotation,
        }
    }

    /// Lowest and highest float offsets the figure can reach.
    #[cfg(test)]
    pub fn height_bounds(&self) -> (f32, f32) {
        let a = self.range[0] * self.float_intensity;
        let b = self.range[1] * self.float_intensity;
        (a.min(b), a.max(b))
    }
}

fn map_linear(x: f32, a1: f32, a2: f32, b1: f32, b2: f32) -> f32 {
    b1 + (x - a1) * (b2 - b1) / (a2 - a1)
}
