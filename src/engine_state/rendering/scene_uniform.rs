//! The per-frame scene uniform.
//!
//! Built on the CPU from the [`SceneGraph`] and the camera every frame, then written
//! into one uniform buffer shared by every pipeline. A node that is not in the graph
//! contributes zeros, so detached lights stop lighting immediately.
//!
//! Every field is a `vec4` or `mat4` so the struct matches WGSL uniform layout without
//! manual padding.

use cgmath::{ortho, perspective, InnerSpace, Matrix4, Rad, SquareMatrix, Vector3};

use crate::{
    color::Rgb,
    engine_state::{
        camera_state::camera::{CameraUniform, OPENGL_TO_WGPU_MATRIX},
        scene::scene_graph::{DirectionalLight, SceneGraph, SpotLight},
    },
};

/// Near plane shared by both shadow projections.
const SHADOW_NEAR: f32 = 0.5;
/// Far plane of the rim light's shadow projection.
const RIM_SHADOW_FAR: f32 = 40.0;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    pub model: [[f32; 4]; 4],
    pub key_view_proj: [[f32; 4]; 4],
    pub rim_view_proj: [[f32; 4]; 4],
    /// Linear colour times intensity
    pub ambient: [f32; 4],
    pub key_color: [f32; 4],
    /// Unit vector toward the key light; w is 1 when it casts shadows
    pub key_direction: [f32; 4],
    pub rim_color: [f32; 4],
    /// w is 1 when the rim light casts shadows
    pub rim_position: [f32; 4],
    /// Unit spot axis from the light toward its target
    pub rim_direction: [f32; 4],
    /// x: cosine of the outer cone edge, y: cosine of the inner edge
    pub rim_cone: [f32; 4],
    /// w is 1 when fog is enabled
    pub fog_color: [f32; 4],
    /// x: near, y: far
    pub fog_params: [f32; 4],
    pub env_sky: [f32; 4],
    pub env_ground: [f32; 4],
    /// w is 1 when the ground is present
    pub ground_color: [f32; 4],
    /// x: size, y: height, z: roughness, w: metalness
    pub ground_params: [f32; 4],
    /// x: height, y: scale, z: opacity, w: far
    pub contact_params: [f32; 4],
    /// x: blur, y: 1 when the disc is present
    pub contact_extra: [f32; 4],
    /// Linear colour; w is opacity
    pub sparkle_color: [f32; 4],
    /// x: size, y: speed, z: time in seconds, w: 1 when present
    pub sparkle_params: [f32; 4],
    /// x: 1 when the ground samples the shadow maps
    pub ground_flags: [f32; 4],
}

impl SceneUniform {
    pub fn build(graph: &SceneGraph, camera: &CameraUniform, time: f32) -> Self {
        let mut uniform = Self::zeroed_with_identity();
        uniform.view_proj = camera.view_proj;
        uniform.camera_position = camera.position;

        if let Some(figure) = graph.figure() {
            uniform.model = figure.model_matrix().into();
        }

        let ambient = graph.ambient_lights().fold([0.0f32; 4], |sum, light| {
            let c = light.color.scaled(light.intensity);
            [sum[0] + c[0], sum[1] + c[1], sum[2] + c[2], sum[3] + c[3]]
        });
        uniform.ambient = ambient;

        if let Some(key) = graph.directional_light() {
            let direction = (key.position - key.target).normalize();
            uniform.key_color = key.color.scaled(key.intensity);
            uniform.key_direction = [
                direction.x,
                direction.y,
                direction.z,
                flag(key.cast_shadow),
            ];
            uniform.key_view_proj = key_light_view_proj(key).into();
        }

        if let Some(rim) = graph.spot_light() {
            let axis = (rim.target - rim.position).normalize();
            let (outer, inner) = rim.cone_cosines();
            uniform.rim_color = rim.color.scaled(rim.intensity);
            uniform.rim_position = [
                rim.position.x,
                rim.position.y,
                rim.position.z,
                flag(rim.cast_shadow),
            ];
            uniform.rim_direction = [axis.x, axis.y, axis.z, 0.0];
            uniform.rim_cone = [outer, inner, 0.0, 0.0];
            uniform.rim_view_proj = rim_light_view_proj(rim).into();
        }

        if let Some(fog) = graph.fog {
            uniform.fog_color = fog.color.to_linear_rgba(1.0);
            uniform.fog_params = [fog.near, fog.far, 0.0, 0.0];
        }

        if let Some(environment) = graph.environment() {
            let (sky, ground, intensity) = environment.preset.hemisphere();
            uniform.env_sky = Rgb::from_hex(sky).scaled(intensity);
            uniform.env_ground = Rgb::from_hex(ground).scaled(intensity);
        }

        if let Some(ground) = graph.ground() {
            uniform.ground_color = ground.color.to_linear_rgba(1.0);
            uniform.ground_params = [
                ground.size,
                ground.height,
                ground.roughness,
                ground.metalness,
            ];
            uniform.ground_flags = [flag(ground.receive_shadow), 0.0, 0.0, 0.0];
        }

        if let Some(contact) = graph.contact_shadow() {
            uniform.contact_params = [contact.height, contact.scale, contact.opacity, contact.far];
            uniform.contact_extra = [contact.blur, 1.0, 0.0, 0.0];
        }

        if let Some(sparkles) = graph.sparkles() {
            uniform.sparkle_color = sparkles.color.to_linear_rgba(sparkles.opacity);
            uniform.sparkle_params = [sparkles.size, sparkles.speed, time, 1.0];
        }

        uniform
    }

    fn zeroed_with_identity() -> Self {
        let identity: [[f32; 4]; 4] = Matrix4::<f32>::identity().into();
        Self {
            model: identity,
            key_view_proj: identity,
            rim_view_proj: identity,
            ..<Self as bytemuck::Zeroable>::zeroed()
        }
    }
}

impl Default for SceneUniform {
    fn default() -> Self {
        Self::zeroed_with_identity()
    }
}

fn flag(value: bool) -> f32 {
    if value {
        1.0
    } else {
        0.0
    }
}

/// Orthographic projection from the key light, covering the figure and the ground
/// around it.
pub fn key_light_view_proj(light: &DirectionalLight) -> Matrix4<f32> {
    let distance = (light.position - light.target).magnitude();
    let up = up_for(light.position - light.target);
    let view = Matrix4::look_at_rh(light.position, light.target, up);
    let e = light.shadow_extent;
    OPENGL_TO_WGPU_MATRIX * ortho(-e, e, -e, e, SHADOW_NEAR, distance * 2.0) * view
}

/// Perspective projection from the rim light, spanning the full cone.
pub fn rim_light_view_proj(light: &SpotLight) -> Matrix4<f32> {
    let up = up_for(light.position - light.target);
    let view = Matrix4::look_at_rh(light.position, light.target, up);
    let fovy = Rad((light.angle * 2.0).min(std::f32::consts::PI - 0.01));
    OPENGL_TO_WGPU_MATRIX * perspective(fovy, 1.0, SHADOW_NEAR, RIM_SHADOW_FAR) * view
}

fn up_for(direction: Vector3<f32>) -> Vector3<f32> {
    if direction.normalize().y.abs() > 0.99 {
        Vector3::unit_z()
    } else {
        Vector3::unit_y()
    }
}

#[cfg(test)]
mod tests {
    use cgmath::Point3;

    use crate::{
        config::SceneConfig,
        engine_state::scene::{scene_graph::GroundPlane, GroupTransform, SceneContext, SceneNode},
    };

    use super::*;

    /// Transforms a world point with a light's view-projection into shadow-map clip space.
    fn to_light_clip(view_proj: Matrix4<f32>, point: Point3<f32>) -> Vector3<f32> {
        let clip = view_proj * point.to_homogeneous();
        clip.truncate() / clip.w
    }

    fn attached_graph() -> (SceneGraph, SceneContext) {
        let mut graph = SceneGraph::new();
        let context = SceneContext::attach(&mut graph, &SceneConfig::default(), 119);
        (graph, context)
    }

    #[test]
    fn attached_scene_fills_every_block() {
        let (graph, _context) = attached_graph();
        let uniform = SceneUniform::build(&graph, &CameraUniform::new(), 1.5);

        assert_eq!(uniform.ambient[3], 0.5);
        assert_eq!(uniform.key_color[3], 1.4);
        assert_eq!(uniform.key_direction[3], 1.0);
        assert_eq!(uniform.rim_color[3], 1.0);
        assert_eq!(uniform.fog_params[0], 12.0);
        assert_eq!(uniform.ground_params[0], 30.0);
        assert_eq!(uniform.contact_extra[1], 1.0);
        assert_eq!(uniform.sparkle_params, [2.0, 0.2, 1.5, 1.0]);
        assert!(uniform.env_sky[3] > 0.0);
    }

    #[test]
    fn detached_lights_contribute_nothing() {
        let (mut graph, mut context) = attached_graph();
        context.detach(&mut graph);

        let uniform = SceneUniform::build(&graph, &CameraUniform::new(), 0.0);

        assert_eq!(uniform.ambient, [0.0; 4]);
        assert_eq!(uniform.key_color, [0.0; 4]);
        assert_eq!(uniform.rim_color, [0.0; 4]);
        assert_eq!(uniform.fog_color, [0.0; 4]);
        assert_eq!(uniform.sparkle_params[3], 0.0);
        let identity: [[f32; 4]; 4] = Matrix4::<f32>::identity().into();
        assert_eq!(uniform.model, identity);
    }

    #[test]
    fn key_direction_points_at_the_light() {
        let (graph, _context) = attached_graph();
        let uniform = SceneUniform::build(&graph, &CameraUniform::new(), 0.0);
        let direction = Vector3::new(
            uniform.key_direction[0],
            uniform.key_direction[1],
            uniform.key_direction[2],
        );

        assert!((direction.magnitude() - 1.0).abs() < 1e-5);
        assert!(direction.dot(Vector3::new(6.0, 12.0, 8.0).normalize()) > 0.9999);
    }

    #[test]
    fn figure_stays_inside_both_shadow_frusta() {
        let (graph, _context) = attached_graph();
        let key = key_light_view_proj(graph.directional_light().unwrap());
        let rim = rim_light_view_proj(graph.spot_light().unwrap());

        // Feet, torso and top of the head
        for point in [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 2.4, 0.0),
            Point3::new(0.0, 5.5, 0.0),
        ] {
            for view_proj in [key, rim] {
                let ndc = to_light_clip(view_proj, point);
                assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0, "{:?}", ndc);
                assert!(ndc.z >= 0.0 && ndc.z <= 1.0, "{:?}", ndc);
            }
        }
    }

    #[test]
    fn model_matrix_tracks_the_figure_float() {
        let (mut graph, context) = attached_graph();
        let float = GroupTransform {
            translation: Vector3::new(0.0, 0.3, 0.0),
            rotation: Vector3::new(0.0, 0.0, 0.0),
        };
        context.set_figure_float(&mut graph, float);

        let uniform = SceneUniform::build(&graph, &CameraUniform::new(), 0.0);
        assert!((uniform.model[3][1] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn ground_receive_flag_reaches_the_shader() {
        let (graph, _context) = attached_graph();
        let uniform = SceneUniform::build(&graph, &CameraUniform::new(), 0.0);
        assert_eq!(uniform.ground_flags[0], 1.0);

        let mut graph = SceneGraph::new();
        let mut ground = GroundPlane::from_config(&SceneConfig::default().ground);
        ground.receive_shadow = false;
        graph.add(SceneNode::Ground(ground));

        let uniform = SceneUniform::build(&graph, &CameraUniform::new(), 0.0);
        assert_eq!(uniform.ground_color[3], 1.0);
        assert_eq!(uniform.ground_flags[0], 0.0);
    }
}
