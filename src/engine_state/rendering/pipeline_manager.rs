//! Manages the render pipelines and per-frame passes.
//!
//! # Passes
//!
//! Each frame records, in order:
//! 1. the key light shadow pass (orthographic, depth only)
//! 2. the rim light shadow pass (perspective, depth only)
//! 3. the main pass into the multisampled target, resolved into the surface:
//!    ground, contact-shadow disc, voxel figure, sparkles
//!
//! A draw is skipped when the scene node it belongs to is not in the graph. Both shadow
//! passes run every frame so their maps are cleared even when nothing casts into them.

use log::debug;
use wgpu::{Device, Queue, RenderPipeline, Surface, SurfaceConfiguration, TextureFormat};

use crate::{
    core::StSystem,
    engine_state::{
        buffer_state::BufferState,
        scene::{scene_graph::Sparkle, SceneGraph},
    },
};

use super::{
    bind_group_state::{
        BindGroupState, MATERIAL_BIND_GROUP, MATERIAL_BIND_GROUP_LAYOUT, SCENE_BIND_GROUP,
        SCENE_BIND_GROUP_LAYOUT, SHADOW_BIND_GROUP, SHADOW_BIND_GROUP_LAYOUT,
    },
    instanced_batch::{BatchResources, InstanceRaw},
    scene_resources::{
        SceneResources, QUAD_INDEX_BUFFER_NAME, QUAD_VERTEX_BUFFER_NAME, SPARKLE_BUFFER_NAME,
    },
    texture::{self, Texture},
    vertex::{Vertex, GROUND_QUAD_INDICES},
};

const SCENE_SHADER: &str = include_str!("shaders/scene.wgsl");
const SHADOW_SHADER: &str = include_str!("shaders/shadow.wgsl");

const SPARKLE_ATTRIBUTES: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32];

fn sparkle_desc<'a>() -> wgpu::VertexBufferLayout<'a> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Sparkle>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &SPARKLE_ATTRIBUTES,
    }
}

/// How a surface pipeline blends and writes depth.
#[derive(Clone, Copy)]
enum SurfaceKind {
    Opaque { cull: Option<wgpu::Face> },
    AlphaBlended,
    Additive,
}

pub struct PipelineManager {
    pub bind_group_state: BindGroupState,
    depth_texture: Texture,
    /// `None` when multisampling is off and the main pass draws straight to the surface
    msaa_texture: Option<Texture>,
    key_shadow_map: Texture,
    rim_shadow_map: Texture,
    sample_count: u32,

    key_shadow_pipeline: RenderPipeline,
    rim_shadow_pipeline: RenderPipeline,
    ground_pipeline: RenderPipeline,
    contact_pipeline: RenderPipeline,
    voxel_pipeline: RenderPipeline,
    sparkle_pipeline: RenderPipeline,
}

impl PipelineManager {
    /// Builds every pipeline and target.
    ///
    /// The scene uniform and the figure's material buffer must already exist in
    /// `buffer_state`. Shadow map sizes come from the attached lights; a missing light
    /// gets a 1×1 placeholder.
    pub fn new(
        device: StSystem<Device>,
        config: &SurfaceConfiguration,
        buffer_state: StSystem<BufferState>,
        graph: &SceneGraph,
        requested_samples: u32,
    ) -> Self {
        let device = device.get();
        let sample_count = supported_sample_count(requested_samples);

        let key_size = graph.directional_light().map_or(1, |light| light.shadow_map_size);
        let rim_size = graph.spot_light().map_or(1, |light| light.shadow_map_size);
        let key_shadow_map = Texture::create_shadow_map(&device, key_size, "Key Shadow Map");
        let rim_shadow_map = Texture::create_shadow_map(&device, rim_size, "Rim Shadow Map");
        let shadow_sampler = texture::create_shadow_sampler(&device);

        let bind_group_state = BindGroupState::new(
            &device,
            &buffer_state.get(),
            &key_shadow_map,
            &rim_shadow_map,
            &shadow_sampler,
        );

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_SHADER.into()),
        });
        let shadow_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Shadow Shader"),
            source: wgpu::ShaderSource::Wgsl(SHADOW_SHADER.into()),
        });

        let main_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[
                bind_group_state.get_bind_group_layout(SCENE_BIND_GROUP_LAYOUT),
                bind_group_state.get_bind_group_layout(SHADOW_BIND_GROUP_LAYOUT),
                bind_group_state.get_bind_group_layout(MATERIAL_BIND_GROUP_LAYOUT),
            ],
            push_constant_ranges: &[],
        });
        let shadow_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Shadow Pipeline Layout"),
            bind_group_layouts: &[bind_group_state.get_bind_group_layout(SCENE_BIND_GROUP_LAYOUT)],
            push_constant_ranges: &[],
        });

        let figure_buffers = [Vertex::desc(), InstanceRaw::desc()];
        let quad_buffers = [Vertex::desc()];
        let sparkle_buffers = [sparkle_desc()];

        let shadow_pipeline = |vs_entry: &'static str| {
            create_shadow_pipeline(
                &device,
                &shadow_layout,
                &shadow_shader,
                vs_entry,
                &figure_buffers,
            )
        };
        let key_shadow_pipeline = shadow_pipeline("vs_shadow_key");
        let rim_shadow_pipeline = shadow_pipeline("vs_shadow_rim");

        let surface_pipeline = |desc: SurfacePipelineDescriptor| {
            create_surface_pipeline(
                &device,
                &main_layout,
                &scene_shader,
                desc,
                config.format,
                sample_count,
            )
        };

        let ground_pipeline = surface_pipeline(SurfacePipelineDescriptor {
            label: "Ground Pipeline",
            vs_entry: "vs_ground",
            fs_entry: "fs_ground",
            buffers: &quad_buffers,
            kind: SurfaceKind::Opaque { cull: None },
        });
        let contact_pipeline = surface_pipeline(SurfacePipelineDescriptor {
            label: "Contact Shadow Pipeline",
            vs_entry: "vs_contact",
            fs_entry: "fs_contact",
            buffers: &quad_buffers,
            kind: SurfaceKind::AlphaBlended,
        });
        let voxel_pipeline = surface_pipeline(SurfacePipelineDescriptor {
            label: "Voxel Pipeline",
            vs_entry: "vs_voxel",
            fs_entry: "fs_voxel",
            buffers: &figure_buffers,
            kind: SurfaceKind::Opaque {
                cull: Some(wgpu::Face::Back),
            },
        });
        let sparkle_pipeline = surface_pipeline(SurfacePipelineDescriptor {
            label: "Sparkle Pipeline",
            vs_entry: "vs_sparkle",
            fs_entry: "fs_sparkle",
            buffers: &sparkle_buffers,
            kind: SurfaceKind::Additive,
        });

        let depth_texture =
            Texture::create_depth_texture(&device, config, sample_count, "DEPTH TEXTURE");
        let msaa_texture = (sample_count > 1)
            .then(|| Texture::create_msaa_texture(&device, config, sample_count, "MSAA TEXTURE"));

        debug!("Pipelines built with {}x multisampling", sample_count);

        Self {
            bind_group_state,
            depth_texture,
            msaa_texture,
            key_shadow_map,
            rim_shadow_map,
            sample_count,
            key_shadow_pipeline,
            rim_shadow_pipeline,
            ground_pipeline,
            contact_pipeline,
            voxel_pipeline,
            sparkle_pipeline,
        }
    }

    /// Renders one frame to `surface`.
    ///
    /// Surface acquisition errors are returned untouched for the caller to classify.
    pub fn render(
        &mut self,
        surface: &Surface,
        device: &Device,
        queue: &Queue,
        graph: &SceneGraph,
        batch: &BatchResources,
        scene_resources: &SceneResources,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = surface.get_current_texture()?;
        let frame_view = frame.texture.create_view(&Default::default());

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });

        let (key_casts, rim_casts) = shadow_casters(graph, !batch.is_released());
        self.shadow_pass(
            &mut encoder,
            &self.key_shadow_map,
            &self.key_shadow_pipeline,
            key_casts.then_some(batch),
            "Key Shadow Pass",
        );
        self.shadow_pass(
            &mut encoder,
            &self.rim_shadow_map,
            &self.rim_shadow_pipeline,
            rim_casts.then_some(batch),
            "Rim Shadow Pass",
        );

        {
            let clear = graph
                .background
                .map_or(wgpu::Color::BLACK, |background| background.to_wgpu());
            let (view, resolve_target) = match &self.msaa_texture {
                Some(msaa) => (&msaa.view, Some(&frame_view)),
                None => (&frame_view, None),
            };

            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: if resolve_target.is_some() {
                            wgpu::StoreOp::Discard
                        } else {
                            wgpu::StoreOp::Store
                        },
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            rpass.set_bind_group(0, self.bind_group_state.get_bind_group(SCENE_BIND_GROUP), &[]);
            rpass.set_bind_group(1, self.bind_group_state.get_bind_group(SHADOW_BIND_GROUP), &[]);
            rpass.set_bind_group(2, self.bind_group_state.get_bind_group(MATERIAL_BIND_GROUP), &[]);

            let has_ground = graph.ground().is_some();
            let has_contact = graph.contact_shadow().is_some();
            if !scene_resources.is_released() && (has_ground || has_contact) {
                let buffers = scene_resources.buffer_state().get();
                rpass.set_vertex_buffer(0, buffers.get_buffer(QUAD_VERTEX_BUFFER_NAME).slice(..));
                rpass.set_index_buffer(
                    buffers.get_buffer(QUAD_INDEX_BUFFER_NAME).slice(..),
                    wgpu::IndexFormat::Uint16,
                );
                let quad_indices = GROUND_QUAD_INDICES.len() as u32;

                if has_ground {
                    rpass.set_pipeline(&self.ground_pipeline);
                    rpass.draw_indexed(0..quad_indices, 0, 0..1);
                }
                if has_contact {
                    rpass.set_pipeline(&self.contact_pipeline);
                    rpass.draw_indexed(0..quad_indices, 0, 0..1);
                }
            }

            if graph.figure().is_some() {
                rpass.set_pipeline(&self.voxel_pipeline);
                batch.draw(&mut rpass);
            }

            let sparkle_count = scene_resources.sparkle_count();
            if graph.sparkles().is_some() && sparkle_count > 0 {
                let buffers = scene_resources.buffer_state().get();
                rpass.set_pipeline(&self.sparkle_pipeline);
                rpass.set_vertex_buffer(0, buffers.get_buffer(SPARKLE_BUFFER_NAME).slice(..));
                rpass.draw(0..6, 0..sparkle_count);
            }
        }

        queue.submit([encoder.finish()]);
        frame.present();
        Ok(())
    }

    /// Clears `target` to the far plane, then draws `casters` into it if there are any.
    fn shadow_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        target: &Texture,
        pipeline: &RenderPipeline,
        casters: Option<&BatchResources>,
        label: &str,
    ) {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &target.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        });
        let Some(batch) = casters else {
            return;
        };
        rpass.set_pipeline(pipeline);
        rpass.set_bind_group(0, self.bind_group_state.get_bind_group(SCENE_BIND_GROUP), &[]);
        batch.draw(&mut rpass);
    }

    /// Recreates the size-dependent targets after the surface changed size.
    pub fn resize(&mut self, device: &Device, config: &SurfaceConfiguration) {
        self.depth_texture =
            Texture::create_depth_texture(device, config, self.sample_count, "DEPTH TEXTURE");
        if self.msaa_texture.is_some() {
            self.msaa_texture = Some(Texture::create_msaa_texture(
                device,
                config,
                self.sample_count,
                "MSAA TEXTURE",
            ));
        }
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }
}

/// Whether the figure is drawn into the key and rim shadow maps this frame.
///
/// A map receives the figure only when the figure casts, its light casts, and the
/// figure's batch still has buffers to draw.
fn shadow_casters(graph: &SceneGraph, figure_drawable: bool) -> (bool, bool) {
    let figure_casts = figure_drawable && graph.figure().is_some_and(|figure| figure.cast_shadow);
    let key = figure_casts && graph.directional_light().is_some_and(|light| light.cast_shadow);
    let rim = figure_casts && graph.spot_light().is_some_and(|light| light.cast_shadow);
    (key, rim)
}

/// WebGPU guarantees 1 and 4 samples for renderable formats; anything else falls back.
fn supported_sample_count(requested: u32) -> u32 {
    if requested >= 4 {
        4
    } else {
        1
    }
}

struct SurfacePipelineDescriptor<'a> {
    label: &'static str,
    vs_entry: &'static str,
    fs_entry: &'static str,
    buffers: &'a [wgpu::VertexBufferLayout<'static>],
    kind: SurfaceKind,
}

fn create_surface_pipeline(
    device: &Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    desc: SurfacePipelineDescriptor,
    format: TextureFormat,
    sample_count: u32,
) -> RenderPipeline {
    let (blend, depth_write_enabled, depth_compare, cull_mode) = match desc.kind {
        SurfaceKind::Opaque { cull } => (
            wgpu::BlendState::REPLACE,
            true,
            wgpu::CompareFunction::Less,
            cull,
        ),
        SurfaceKind::AlphaBlended => (
            wgpu::BlendState::ALPHA_BLENDING,
            false,
            wgpu::CompareFunction::LessEqual,
            None,
        ),
        SurfaceKind::Additive => {
            let add = wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            };
            (
                wgpu::BlendState {
                    color: add,
                    alpha: add,
                },
                false,
                wgpu::CompareFunction::LessEqual,
                None,
            )
        }
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(desc.label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(desc.vs_entry),
            compilation_options: Default::default(),
            buffers: desc.buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some(desc.fs_entry),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(blend),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: Texture::DEPTH_FORMAT,
            depth_write_enabled,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: sample_count,
            ..Default::default()
        },
        multiview: None,
        cache: None,
    })
}

fn create_shadow_pipeline(
    device: &Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    vs_entry: &str,
    buffers: &[wgpu::VertexBufferLayout],
) -> RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(vs_entry),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some(vs_entry),
            compilation_options: Default::default(),
            buffers,
        },
        fragment: None,
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: Texture::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::LessEqual,
            stencil: wgpu::StencilState::default(),
            // Slope-scaled bias against shadow acne
            bias: wgpu::DepthBiasState {
                constant: 2,
                slope_scale: 2.0,
                clamp: 0.0,
            },
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

#[cfg(test)]
mod tests {
    use crate::{config::SceneConfig, engine_state::scene::SceneContext};

    use super::*;

    fn attached_graph(config: &SceneConfig) -> SceneGraph {
        let mut graph = SceneGraph::new();
        SceneContext::attach(&mut graph, config, 119);
        graph
    }

    #[test]
    fn figure_casts_into_both_maps_by_default() {
        let graph = attached_graph(&SceneConfig::default());
        assert_eq!(shadow_casters(&graph, true), (true, true));
    }

    #[test]
    fn released_batch_casts_nothing() {
        let graph = attached_graph(&SceneConfig::default());
        assert_eq!(shadow_casters(&graph, false), (false, false));
    }

    #[test]
    fn non_casting_figure_leaves_maps_empty() {
        let mut config = SceneConfig::default();
        config.figure.cast_shadow = false;
        let graph = attached_graph(&config);

        assert_eq!(shadow_casters(&graph, true), (false, false));
    }

    #[test]
    fn lights_without_shadows_leave_maps_empty() {
        let mut config = SceneConfig::default();
        config.canvas.shadows = false;
        let graph = attached_graph(&config);

        assert_eq!(shadow_casters(&graph, true), (false, false));
    }

    #[test]
    fn detached_scene_casts_nothing() {
        let mut graph = SceneGraph::new();
        let mut context = SceneContext::attach(&mut graph, &SceneConfig::default(), 119);
        context.detach(&mut graph);

        assert_eq!(shadow_casters(&graph, true), (false, false));
    }

    #[test]
    fn sample_count_falls_back_to_guaranteed_values() {
        assert_eq!(supported_sample_count(4), 4);
        assert_eq!(supported_sample_count(8), 4);
        assert_eq!(supported_sample_count(2), 1);
        assert_eq!(supported_sample_count(0), 1);
    }

    #[test]
    fn sparkle_layout_matches_particle_size() {
        let layout = sparkle_desc();
        assert_eq!(layout.array_stride, 16);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
    }
}
