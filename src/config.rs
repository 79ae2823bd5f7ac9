//! # Scene Configuration
//!
//! Every tunable constant of the scene, grouped by the part of the scene it drives.
//! `SceneConfig::default()` is the one configuration the application ships with; there
//! is no file, environment or command-line source. The structs derive `serde` so the
//! effective configuration can be logged as JSON at start-up.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

/// Root configuration consumed by the engine state and the scene context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SceneConfig {
    pub canvas: CanvasConfig,
    pub camera: CameraConfig,
    pub orbit: OrbitConfig,
    pub environment: EnvironmentConfig,
    pub lights: LightRigConfig,
    pub ground: GroundConfig,
    pub contact_shadow: ContactShadowConfig,
    pub sparkles: SparklesConfig,
    pub float: FloatConfig,
    pub figure: FigureConfig,
}

impl SceneConfig {
    /// Serialises the configuration for the start-up debug log.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Rendering surface options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanvasConfig {
    pub shadows: bool,
    /// MSAA sample count; 1 disables anti-aliasing
    pub msaa_samples: u32,
    /// Request `COPY_SRC` on the surface so frames can be captured
    pub preserve_drawing_buffer: bool,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            shadows: true,
            msaa_samples: 4,
            preserve_drawing_buffer: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [6.0, 6.5, 9.0],
            fov_degrees: 35.0,
            near: 0.1,
            far: 50.0,
        }
    }
}

/// Orbit control clamps and damping. Angles are in radians.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrbitConfig {
    pub target: [f32; 3],
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            target: [0.0, 4.2, 0.0],
            enable_damping: true,
            damping_factor: 0.1,
            min_distance: 6.0,
            max_distance: 14.0,
            min_polar_angle: PI / 4.0,
            max_polar_angle: 3.0 * PI / 5.0,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
        }
    }
}

/// Background, fog and image-based light preset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub background: u32,
    pub fog_color: u32,
    pub fog_near: f32,
    pub fog_far: f32,
    pub preset: EnvironmentPreset,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            background: 0x060711,
            fog_color: 0x060711,
            fog_near: 12.0,
            fog_far: 30.0,
            preset: EnvironmentPreset::Dawn,
        }
    }
}

/// Approximations of the image-based lighting presets as a sky/ground hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnvironmentPreset {
    Dawn,
    Night,
    Studio,
}

impl EnvironmentPreset {
    /// Returns `(sky, ground, intensity)` for the hemisphere light.
    pub fn hemisphere(self) -> (u32, u32, f32) {
        match self {
            EnvironmentPreset::Dawn => (0xffb58a, 0x3b3050, 0.35),
            EnvironmentPreset::Night => (0x2b3a66, 0x05060c, 0.2),
            EnvironmentPreset::Studio => (0xffffff, 0x808080, 0.5),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LightRigConfig {
    pub ambient_color: u32,
    pub ambient_intensity: f32,
    pub key_color: u32,
    pub key_intensity: f32,
    pub key_position: [f32; 3],
    pub key_shadow_map_size: u32,
    /// Half extent of the key light's orthographic shadow frustum
    pub key_shadow_extent: f32,
    pub rim_color: u32,
    pub rim_intensity: f32,
    pub rim_position: [f32; 3],
    pub rim_angle: f32,
    pub rim_penumbra: f32,
    pub rim_shadow_map_size: u32,
}

impl Default for LightRigConfig {
    fn default() -> Self {
        Self {
            ambient_color: 0xffffff,
            ambient_intensity: 0.5,
            key_color: 0xffffff,
            key_intensity: 1.4,
            key_position: [6.0, 12.0, 8.0],
            key_shadow_map_size: 2048,
            key_shadow_extent: 8.0,
            rim_color: 0xffffff,
            rim_intensity: 1.0,
            rim_position: [-6.0, 9.0, -4.0],
            rim_angle: PI / 4.4,
            rim_penumbra: 0.45,
            rim_shadow_map_size: 512,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroundConfig {
    pub size: f32,
    pub color: u32,
    pub roughness: f32,
    pub metalness: f32,
    pub height: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            size: 30.0,
            color: 0x0b0e1d,
            roughness: 1.0,
            metalness: 0.0,
            height: -0.01,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactShadowConfig {
    pub height: f32,
    pub scale: f32,
    pub opacity: f32,
    pub blur: f32,
    /// Height above the disc at which casters stop darkening it
    pub far: f32,
}

impl Default for ContactShadowConfig {
    fn default() -> Self {
        Self {
            height: -0.01,
            scale: 12.0,
            opacity: 0.35,
            blur: 2.5,
            far: 9.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparklesConfig {
    pub count: u32,
    pub size: f32,
    pub speed: f32,
    pub opacity: f32,
    pub color: u32,
    pub extent: [f32; 3],
    /// Seed for particle placement, fixed so every mount looks the same
    pub seed: u64,
}

impl Default for SparklesConfig {
    fn default() -> Self {
        Self {
            count: 80,
            size: 2.0,
            speed: 0.2,
            opacity: 0.3,
            color: 0x7c9bff,
            extent: [10.0, 6.0, 10.0],
            seed: 0x5eed,
        }
    }
}

/// Idle float wrapper around the figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloatConfig {
    pub speed: f32,
    pub rotation_intensity: f32,
    pub float_intensity: f32,
    pub floating_range: [f32; 2],
    pub time_offset: f32,
}

impl Default for FloatConfig {
    fn default() -> Self {
        Self {
            speed: 1.6,
            rotation_intensity: 0.3,
            float_intensity: 0.8,
            floating_range: [0.1, 0.4],
            time_offset: 0.0,
        }
    }
}

/// Group transform and material of the instanced figure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FigureConfig {
    pub yaw: f32,
    pub roughness: f32,
    pub metalness: f32,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            yaw: PI / 8.0,
            roughness: 0.45,
            metalness: 0.05,
            cast_shadow: true,
            receive_shadow: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_orbit_clamps_are_ordered() {
        let orbit = OrbitConfig::default();

        assert!(orbit.min_distance < orbit.max_distance);
        assert!(orbit.min_polar_angle < orbit.max_polar_angle);
        assert!(orbit.target[1] > 0.0);
    }

    #[test]
    fn json_dump_contains_section_names() {
        let json = SceneConfig::default().to_json().unwrap();

        assert!(json.contains("\"orbit\""));
        assert!(json.contains("\"sparkles\""));
        assert!(json.contains("\"Dawn\""));
    }

    #[test]
    fn fog_starts_before_it_ends() {
        let environment = EnvironmentConfig::default();
        assert!(environment.fog_near < environment.fog_far);
    }
}
