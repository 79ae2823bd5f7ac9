//! # Application State Management
//!
//! This module handles the application's state management, including:
//! - Window and graphics initialization
//! - Input handling
//! - Application lifecycle events
//! - The transition from initialization to the running scene

pub mod graphics_resources_builder;
pub mod input_manager;
pub mod input_state;

use std::sync::Arc;

use graphics_resources_builder::{Graphics, GraphicsBuilder, GraphicsResult, MaybeGraphics};
use input_manager::InputManager;
use log::error;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoopProxy},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{config::SceneConfig, engine_state::EngineState, error::EngineError};

/// The main application state container that manages the application's lifecycle.
///
/// This struct holds the current state of the application, including graphics
/// resources, input handling, and window management. It implements
/// `ApplicationHandler` to handle window and device events.
pub struct ApplicationState {
    /// The current graphics state, which may be initializing, ready, or moved
    pub graphics: MaybeGraphics,

    /// The initialized application state, if the application has started
    pub state: Option<InitializedApplicationState>,

    /// Cached window size for web platforms during initialization
    pub web_window_size: Option<PhysicalSize<u32>>,

    config: SceneConfig,

    /// The error that stopped the event loop, handed back by [`crate::run`]
    error: Option<EngineError>,
}

/// Represents the fully initialized and running state of the application.
pub struct InitializedApplicationState {
    /// The scene and its renderer
    pub engine_state: EngineState,

    /// Handle to the application window
    pub window: Arc<Window>,

    /// Manages input state and event processing
    pub input_manager: InputManager,

    /// Timestamp of the last frame for delta time calculations
    pub last_wait_time: web_time::Instant,
}

fn is_exit_request(event: &WindowEvent) -> bool {
    matches!(
        event,
        WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event: KeyEvent {
                    state: ElementState::Pressed,
                    physical_key: PhysicalKey::Code(KeyCode::Escape),
                    ..
                },
                ..
            }
    )
}

impl ApplicationState {
    pub fn new(event_loop_proxy: EventLoopProxy<GraphicsResult>, config: SceneConfig) -> Self {
        Self {
            graphics: MaybeGraphics::Builder(GraphicsBuilder::new(
                event_loop_proxy,
                config.canvas.clone(),
            )),
            state: None,
            web_window_size: None,
            config,
            error: None,
        }
    }

    /// Takes the error that stopped the event loop, if any.
    pub fn take_error(&mut self) -> Option<EngineError> {
        self.error.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: EngineError) {
        error!("{}", err);
        #[cfg(target_family = "wasm")]
        crate::page::show_fallback(&err);

        if let Some(state) = &mut self.state {
            state.engine_state.unmount();
        }
        self.error = Some(err);
        event_loop.exit();
    }

    /// Handles window resize events during the initialization phase.
    ///
    /// Configures the surface and starts the scene once the canvas has a size.
    fn resized(&mut self, event_loop: &ActiveEventLoop, size: PhysicalSize<u32>) {
        let MaybeGraphics::Graphics(gfx) = &mut self.graphics else {
            return;
        };
        if size.width == 0 || size.height == 0 {
            return;
        }

        gfx.surface_config.width = size.width;
        gfx.surface_config.height = size.height;
        gfx.surface.configure(&gfx.device, &gfx.surface_config);
        gfx.is_surface_configured = true;

        self.initialize_application_state(event_loop);
    }

    /// Initializes the application state with the required graphics resources.
    ///
    /// This moves the graphics into a new `EngineState`, which mounts the scene.
    fn initialize_application_state(&mut self, event_loop: &ActiveEventLoop) {
        let MaybeGraphics::Graphics(gfx) =
            std::mem::replace(&mut self.graphics, MaybeGraphics::Moved)
        else {
            return;
        };
        let Graphics {
            window,
            surface,
            surface_config,
            device,
            queue,
            sample_count,
            ..
        } = gfx;

        let mut config = self.config.clone();
        config.canvas.msaa_samples = sample_count;

        match EngineState::new(surface, surface_config, device, queue, &config) {
            Ok(engine_state) => {
                self.state = Some(InitializedApplicationState {
                    engine_state,
                    window,
                    input_manager: InputManager::new(),
                    last_wait_time: web_time::Instant::now(),
                });
            }
            Err(err) => self.fail(event_loop, err),
        }
    }
}

impl ApplicationHandler<GraphicsResult> for ApplicationState {
    /// Handles window-related events such as resize, focus changes, and input events.
    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(state) = &mut self.state {
            let input_manager = &mut state.input_manager;
            let engine_state = &mut state.engine_state;

            if is_exit_request(&event) {
                engine_state.unmount();
                event_loop.exit();
                return;
            }

            input_manager.intake_input(&event);

            match event {
                WindowEvent::Resized(size) => {
                    engine_state.resize_surface(size);
                }
                WindowEvent::Focused(is_focused) => {
                    if !is_focused {
                        input_manager.reset_inputs();
                    }
                }
                WindowEvent::RedrawRequested => {
                    if let Err(err) = engine_state.render() {
                        self.fail(event_loop, err.into());
                    }
                }
                _ => (),
            }
        } else {
            match event {
                WindowEvent::Resized(size) => {
                    self.web_window_size = Some(size);
                    self.resized(event_loop, size);
                }
                event if is_exit_request(&event) => event_loop.exit(),
                _ => (),
            }
        }
    }

    /// Handles raw pointer motion for orbit dragging.
    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let Some(state) = &mut self.state {
            if let DeviceEvent::MouseMotion { delta } = event {
                state.input_manager.intake_mouse_motion(delta);
            }
        }
    }

    /// Starts graphics initialization the first time the application is resumed.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if let MaybeGraphics::Builder(builder) = &mut self.graphics {
            builder.build_and_send(event_loop);
        }
    }

    /// Receives the graphics initialization result.
    ///
    /// Failure is terminal: the error is logged, shown on the page on the web, and the
    /// event loop exits.
    fn user_event(&mut self, event_loop: &ActiveEventLoop, graphics: GraphicsResult) {
        let graphics = match graphics {
            Ok(graphics) => graphics,
            Err(err) => {
                self.graphics = MaybeGraphics::Moved;
                self.fail(event_loop, err.into());
                return;
            }
        };

        let is_surface_configured = graphics.is_surface_configured;
        self.graphics = MaybeGraphics::Graphics(graphics);

        if is_surface_configured {
            self.initialize_application_state(event_loop);
        } else if let Some(size) = self.web_window_size {
            self.resized(event_loop, size);
        }
    }

    /// Called before the event loop goes to sleep.
    ///
    /// Hands this frame's input to the engine, advances the camera and idle float, and
    /// requests the next redraw.
    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &mut self.state {
            if !state.engine_state.is_mounted() {
                return;
            }

            let now = web_time::Instant::now();
            let wait_dt = now - state.last_wait_time;

            if let Some(processed_input) = state.input_manager.get_and_reset_processed_input() {
                state.engine_state.set_input_commands(processed_input);
            }

            state.engine_state.process_input(wait_dt);
            state.last_wait_time = now;

            state.window.request_redraw();
        }
    }
}
