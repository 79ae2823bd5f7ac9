//! # Scene
//!
//! The retained part of the scene: the node registry, the context that installs and
//! removes the figure's surroundings, and the idle float that moves the figure.
//!
//! `SceneContext::attach` and `SceneContext::detach` bracket the scene's lifetime.
//! Every node the context adds is remembered by handle so that detaching restores the
//! graph to the size it had before the attach.

use cgmath::Point3;
use log::info;

use crate::{color::Rgb, config::SceneConfig};

pub mod idle_float;
pub mod scene_graph;

pub use idle_float::{GroupTransform, IdleFloat};
pub use scene_graph::{NodeHandle, SceneGraph, SceneNode};

use scene_graph::{
    AmbientLight, ContactShadow, DirectionalLight, EnvironmentLight, FigureNode, Fog,
    GroundPlane, SparkleField, SpotLight,
};

/// Handles to everything one attach installed.
#[derive(Debug)]
pub struct SceneContext {
    handles: Vec<NodeHandle>,
    figure: Option<NodeHandle>,
    attached: bool,
}

impl SceneContext {
    /// Installs background, fog, lights, ground, decorations and the figure node.
    pub fn attach(graph: &mut SceneGraph, config: &SceneConfig, figure_instances: usize) -> Self {
        let lights = &config.lights;
        let origin = Point3::new(0.0, 0.0, 0.0);

        graph.background = Some(Rgb::from_hex(config.environment.background));
        graph.fog = Some(Fog {
            color: Rgb::from_hex(config.environment.fog_color),
            near: config.environment.fog_near,
            far: config.environment.fog_far,
        });

        let mut handles = vec![
            graph.add(SceneNode::Ambient(AmbientLight {
                color: Rgb::from_hex(lights.ambient_color),
                intensity: lights.ambient_intensity,
            })),
            graph.add(SceneNode::Directional(DirectionalLight {
                color: Rgb::from_hex(lights.key_color),
                intensity: lights.key_intensity,
                position: Point3::from(lights.key_position),
                target: origin,
                cast_shadow: config.canvas.shadows,
                shadow_map_size: lights.key_shadow_map_size,
                shadow_extent: lights.key_shadow_extent,
            })),
            graph.add(SceneNode::Spot(SpotLight {
                color: Rgb::from_hex(lights.rim_color),
                intensity: lights.rim_intensity,
                position: Point3::from(lights.rim_position),
                target: origin,
                angle: lights.rim_angle,
                penumbra: lights.rim_penumbra,
                cast_shadow: config.canvas.shadows,
                shadow_map_size: lights.rim_shadow_map_size,
            })),
            graph.add(SceneNode::Ground(GroundPlane::from_config(&config.ground))),
            graph.add(SceneNode::Sparkles(SparkleField::from_config(&config.sparkles))),
            graph.add(SceneNode::ContactShadow(ContactShadow::from_config(
                &config.contact_shadow,
            ))),
            graph.add(SceneNode::Environment(EnvironmentLight {
                preset: config.environment.preset,
            })),
        ];

        let figure = graph.add(SceneNode::Figure(FigureNode {
            instance_count: figure_instances,
            base: GroupTransform::yaw(config.figure.yaw),
            float: GroupTransform::IDENTITY,
            cast_shadow: config.figure.cast_shadow,
            receive_shadow: config.figure.receive_shadow,
        }));
        handles.push(figure);

        info!("Scene attached with {} nodes", handles.len());

        Self {
            handles,
            figure: Some(figure),
            attached: true,
        }
    }

    /// Removes every node this context installed and clears background and fog.
    ///
    /// Returns the number of nodes removed. Calling it again does nothing and returns 0.
    pub fn detach(&mut self, graph: &mut SceneGraph) -> usize {
        if !self.attached {
            return 0;
        }

        let removed = self
            .handles
            .drain(..)
            .filter(|handle| graph.remove(*handle).is_some())
            .count();
        self.figure = None;
        graph.background = None;
        graph.fog = None;
        self.attached = false;

        info!("Scene detached, {} nodes removed", removed);
        removed
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Replaces the figure's idle float transform for this frame.
    pub fn set_figure_float(&self, graph: &mut SceneGraph, float: GroupTransform) {
        let Some(handle) = self.figure else {
            return;
        };
        if let Some(SceneNode::Figure(figure)) = graph.get_mut(handle) {
            figure.float = float;
        }
    }
}
