//! Retained scene graph.
//!
//! A flat registry of scene nodes addressed by handle, plus the two scene-wide
//! settings (background and fog). The renderer reads the graph every frame; nothing
//! is drawn or lit unless its node is present.

use std::collections::BTreeMap;

use cgmath::Point3;

use crate::{
    color::Rgb,
    config::{ContactShadowConfig, EnvironmentPreset, GroundConfig, SparklesConfig},
};

use super::idle_float::GroupTransform;

/// Opaque handle to a node in a [`SceneGraph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeHandle(u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: Rgb,
    pub near: f32,
    pub far: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AmbientLight {
    pub color: Rgb,
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    pub color: Rgb,
    pub intensity: f32,
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub cast_shadow: bool,
    pub shadow_map_size: u32,
    /// Half extent of the orthographic shadow frustum
    pub shadow_extent: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpotLight {
    pub color: Rgb,
    pub intensity: f32,
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    /// Half-angle of the cone in radians
    pub angle: f32,
    /// Fraction of the cone that fades out, in [0, 1]
    pub penumbra: f32,
    pub cast_shadow: bool,
    pub shadow_map_size: u32,
}

impl SpotLight {
    /// Cosines of the outer and inner cone edges.
    pub fn cone_cosines(&self) -> (f32, f32) {
        let outer = self.angle.cos();
        let inner = (self.angle * (1.0 - self.penumbra.clamp(0.0, 1.0))).cos();
        (outer, inner)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroundPlane {
    pub size: f32,
    pub color: Rgb,
    pub roughness: f32,
    pub metalness: f32,
    pub height: f32,
    pub receive_shadow: bool,
}

impl GroundPlane {
    pub fn from_config(config: &GroundConfig) -> Self {
        Self {
            size: config.size,
            color: Rgb::from_hex(config.color),
            roughness: config.roughness,
            metalness: config.metalness,
            height: config.height,
            receive_shadow: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactShadow {
    pub height: f32,
    pub scale: f32,
    pub opacity: f32,
    pub blur: f32,
    pub far: f32,
}

impl ContactShadow {
    pub fn from_config(config: &ContactShadowConfig) -> Self {
        Self {
            height: config.height,
            scale: config.scale,
            opacity: config.opacity,
            blur: config.blur,
            far: config.far,
        }
    }
}

/// One decorative particle.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Sparkle {
    pub position: [f32; 3],
    /// Animation phase in radians
    pub phase: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SparkleField {
    pub particles: Vec<Sparkle>,
    pub size: f32,
    pub speed: f32,
    pub opacity: f32,
    pub color: Rgb,
}

impl SparkleField {
    /// Scatters `count` particles uniformly in a box of `extent` centred on the origin.
    ///
    /// Placement is seeded, so every mount produces the same field.
    pub fn from_config(config: &SparklesConfig) -> Self {
        let mut rng = fastrand::Rng::with_seed(config.seed);
        let [ex, ey, ez] = config.extent;
        let particles = (0..config.count)
            .map(|_| Sparkle {
                position: [
                    (rng.f32() - 0.5) * ex,
                    (rng.f32() - 0.5) * ey,
                    (rng.f32() - 0.5) * ez,
                ],
                phase: rng.f32() * std::f32::consts::TAU,
            })
            .collect();

        Self {
            particles,
            size: config.size,
            speed: config.speed,
            opacity: config.opacity,
            color: Rgb::from_hex(config.color),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentLight {
    pub preset: EnvironmentPreset,
}

/// The instanced figure as seen by the scene: its instance count and group transform.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureNode {
    pub instance_count: usize,
    /// Fixed yaw of the figure group
    pub base: GroupTransform,
    /// Idle float wrapper, refreshed every frame
    pub float: GroupTransform,
    pub cast_shadow: bool,
    pub receive_shadow: bool,
}

impl FigureNode {
    pub fn model_matrix(&self) -> cgmath::Matrix4<f32> {
        self.float.matrix() * self.base.matrix()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SceneNode {
    Ambient(AmbientLight),
    Directional(DirectionalLight),
    Spot(SpotLight),
    Ground(GroundPlane),
    ContactShadow(ContactShadow),
    Sparkles(SparkleField),
    Environment(EnvironmentLight),
    Figure(FigureNode),
}

#[derive(Debug, Default)]
pub struct SceneGraph {
    next_handle: u32,
    nodes: BTreeMap<NodeHandle, SceneNode>,
    pub background: Option<Rgb>,
    pub fog: Option<Fog>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, node: SceneNode) -> NodeHandle {
        let handle = NodeHandle(self.next_handle);
        self.next_handle += 1;
        self.nodes.insert(handle, node);
        handle
    }

    pub fn remove(&mut self, handle: NodeHandle) -> Option<SceneNode> {
        self.nodes.remove(&handle)
    }

    #[cfg(test)]
    pub fn get(&self, handle: NodeHandle) -> Option<&SceneNode> {
        self.nodes.get(&handle)
    }

    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut SceneNode> {
        self.nodes.get_mut(&handle)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &SceneNode> {
        self.nodes.values()
    }

    pub fn ambient_lights(&self) -> impl Iterator<Item = &AmbientLight> {
        self.nodes().filter_map(|node| match node {
            SceneNode::Ambient(light) => Some(light),
            _ => None,
        })
    }

    pub fn directional_light(&self) -> Option<&DirectionalLight> {
        self.nodes().find_map(|node| match node {
            SceneNode::Directional(light) => Some(light),
            _ => None,
        })
    }

    pub fn spot_light(&self) -> Option<&SpotLight> {
        self.nodes().find_map(|node| match node {
            SceneNode::Spot(light) => Some(light),
            _ => None,
        })
    }

    pub fn ground(&self) -> Option<&GroundPlane> {
        self.nodes().find_map(|node| match node {
            SceneNode::Ground(ground) => Some(ground),
            _ => None,
        })
    }

    pub fn contact_shadow(&self) -> Option<&ContactShadow> {
        self.nodes().find_map(|node| match node {
            SceneNode::ContactShadow(shadow) => Some(shadow),
            _ => None,
        })
    }

    pub fn sparkles(&self) -> Option<&SparkleField> {
        self.nodes().find_map(|node| match node {
            SceneNode::Sparkles(field) => Some(field),
            _ => None,
        })
    }

    pub fn environment(&self) -> Option<&EnvironmentLight> {
        self.nodes().find_map(|node| match node {
            SceneNode::Environment(environment) => Some(environment),
            _ => None,
        })
    }

    pub fn figure(&self) -> Option<&FigureNode> {
        self.nodes().find_map(|node| match node {
            SceneNode::Figure(figure) => Some(figure),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handles_are_not_reused_after_removal() {
        let mut graph = SceneGraph::new();
        let first = graph.add(SceneNode::Environment(EnvironmentLight {
            preset: EnvironmentPreset::Dawn,
        }));
        graph.remove(first);

        let second = graph.add(SceneNode::Environment(EnvironmentLight {
            preset: EnvironmentPreset::Night,
        }));

        assert_ne!(first, second);
        assert!(graph.get(first).is_none());
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn sparkle_field_is_seeded_and_bounded() {
        let config = SparklesConfig::default();
        let a = SparkleField::from_config(&config);
        let b = SparkleField::from_config(&config);

        assert_eq!(a, b);
        assert_eq!(a.particles.len(), 80);
        for sparkle in &a.particles {
            assert!(sparkle.position[0].abs() <= 5.0);
            assert!(sparkle.position[1].abs() <= 3.0);
            assert!(sparkle.position[2].abs() <= 5.0);
        }
    }

    #[test]
    fn spot_cone_inner_edge_lies_inside_outer() {
        let spot = SpotLight {
            color: Rgb::WHITE,
            intensity: 1.0,
            position: Point3::new(-6.0, 9.0, -4.0),
            target: Point3::new(0.0, 0.0, 0.0),
            angle: std::f32::consts::PI / 4.4,
            penumbra: 0.45,
            cast_shadow: true,
            shadow_map_size: 512,
        };

        let (outer, inner) = spot.cone_cosines();
        assert!(inner > outer);
    }
}
