//! # Graphics Resources Builder
//!
//! This module handles the creation of the graphics resources required by the
//! application. It provides platform-agnostic interfaces for initializing WebGPU and
//! handing the result back to the event loop.
//!
//! The main components are:
//! - `Graphics`: Holds all graphics-related resources
//! - `GraphicsBuilder`: Helper for asynchronous graphics initialization
//! - `MaybeGraphics`: Represents the various states of graphics initialization

use std::future::Future;
use std::sync::Arc;

use log::{error, info};
use wgpu::{Adapter, Device, Instance, Queue, Surface, SurfaceConfiguration};
use winit::{
    event_loop::{ActiveEventLoop, EventLoopProxy},
    window::Window,
};

use crate::{config::CanvasConfig, error::GraphicsError, page::PageMetadata};

/// What the builder sends back to the event loop.
pub type GraphicsResult = Result<Graphics, GraphicsError>;

/// Contains all graphics-related resources required by the application.
#[allow(dead_code)]
pub struct Graphics {
    pub window: Arc<Window>,
    pub instance: Instance,
    pub surface: Surface<'static>,
    pub surface_config: SurfaceConfiguration,
    pub adapter: Adapter,
    pub device: Device,
    pub queue: Queue,
    /// MSAA sample count the surface format supports, at most the requested one
    pub sample_count: u32,
    pub is_surface_configured: bool,
}

fn create_window(event_loop: &ActiveEventLoop) -> Result<Arc<Window>, GraphicsError> {
    #[allow(unused_mut)]
    let mut window_attrs = Window::default_attributes().with_title(PageMetadata::TITLE);

    #[cfg(target_family = "wasm")]
    {
        use winit::platform::web::WindowAttributesExtWebSys;

        match crate::page::canvas_element() {
            Some(canvas) => window_attrs = window_attrs.with_canvas(Some(canvas)),
            None => {
                log::warn!("Canvas '{}' not found, appending a new one", crate::page::CANVAS_ID);
                window_attrs = window_attrs.with_append(true);
            }
        }
    }

    Ok(Arc::new(event_loop.create_window(window_attrs)?))
}

/// Asynchronously creates and initializes all required graphics resources.
///
/// The window and surface are created immediately; adapter and device requests run
/// inside the returned future.
fn create_graphics(
    event_loop: &ActiveEventLoop,
    canvas: CanvasConfig,
) -> impl Future<Output = GraphicsResult> + 'static {
    // Backends::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        #[cfg(not(target_family = "wasm"))]
        backends: wgpu::Backends::PRIMARY,
        #[cfg(target_family = "wasm")]
        backends: wgpu::Backends::GL | wgpu::Backends::BROWSER_WEBGPU,
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
    });

    let window_and_surface = create_window(event_loop).and_then(|window| {
        let surface = instance.create_surface(window.clone())?;
        Ok((window, surface))
    });

    async move {
        let (window, surface) = window_and_surface?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|err| GraphicsError::Adapter(err.to_string()))?;

        let required_limits = if cfg!(target_family = "wasm") {
            wgpu::Limits::downlevel_webgl2_defaults()
        } else {
            wgpu::Limits::default()
        };

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits,
                label: None,
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await?;

        let info = adapter.get_info();
        info!("Graphics acquired: {} ({:?})", info.name, info.backend);

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .ok_or(GraphicsError::UnsupportedSurface)?;
        let present_mode = surface_caps
            .present_modes
            .first()
            .copied()
            .ok_or(GraphicsError::UnsupportedSurface)?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .ok_or(GraphicsError::UnsupportedSurface)?;

        // COPY_SRC keeps frames readable for captures
        let mut usage = wgpu::TextureUsages::RENDER_ATTACHMENT;
        let can_copy = surface_caps.usages.contains(wgpu::TextureUsages::COPY_SRC);
        if canvas.preserve_drawing_buffer && can_copy {
            usage |= wgpu::TextureUsages::COPY_SRC;
        }

        let surface_config = wgpu::SurfaceConfiguration {
            usage,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let format_features = adapter.get_texture_format_features(surface_format);
        let sample_count = if format_features
            .flags
            .sample_count_supported(canvas.msaa_samples)
        {
            canvas.msaa_samples
        } else {
            1
        };

        // The web canvas may still be zero-sized; it is configured on its first resize
        let is_surface_configured = size.width > 0 && size.height > 0;
        if is_surface_configured {
            surface.configure(&device, &surface_config);
        }

        Ok(Graphics {
            window,
            instance,
            surface,
            surface_config,
            adapter,
            device,
            queue,
            sample_count,
            is_surface_configured,
        })
    }
}

/// Helper struct for managing the asynchronous initialization of graphics resources.
pub struct GraphicsBuilder {
    event_loop_proxy: Option<EventLoopProxy<GraphicsResult>>,
    canvas: CanvasConfig,
}

/// Represents the possible states of the graphics initialization process.
pub enum MaybeGraphics {
    /// State during asynchronous graphics initialization
    Builder(GraphicsBuilder),

    /// State when graphics resources are ready but the surface is not yet configured
    Graphics(Graphics),

    /// State after graphics resources have been moved to another owner
    Moved,
}

impl GraphicsBuilder {
    /// Creates a new GraphicsBuilder with the specified event loop proxy.
    pub fn new(event_loop_proxy: EventLoopProxy<GraphicsResult>, canvas: CanvasConfig) -> Self {
        Self {
            event_loop_proxy: Some(event_loop_proxy),
            canvas,
        }
    }

    /// Starts graphics initialization and sends the result back through the proxy.
    ///
    /// Runs at most once; later calls return immediately.
    pub fn build_and_send(&mut self, event_loop: &ActiveEventLoop) {
        let Some(event_loop_proxy) = self.event_loop_proxy.take() else {
            // event_loop_proxy is already spent - we already constructed Graphics
            return;
        };

        let gfx_fut = create_graphics(event_loop, self.canvas.clone());

        #[cfg(target_family = "wasm")]
        {
            wasm_bindgen_futures::spawn_local(async move {
                let gfx = gfx_fut.await;
                if event_loop_proxy.send_event(gfx).is_err() {
                    error!("Event loop closed before graphics were ready");
                }
            });
        }

        #[cfg(not(target_family = "wasm"))]
        {
            let gfx = pollster::block_on(gfx_fut);
            if event_loop_proxy.send_event(gfx).is_err() {
                error!("Event loop closed before graphics were ready");
            }
        }
    }
}
