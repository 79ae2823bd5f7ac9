#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Boy
//!
//! A small wgpu scene: a voxel boy built from instanced cubes, floating above a
//! glowing ground under a three-light rig, with an orbit camera.
//!
//! Runs natively and on the web (WebGPU or WebGL2) from the same code.
//!
//! ## Key Modules
//!
//! * `application_state` - Window, graphics initialization, input and event loop
//! * `core` - Single-threaded shared containers for the GPU systems
//! * `engine_state` - Voxel model, scene graph, camera and renderer
//! * `config` - Every scene constant, in one serialisable struct
//!
//! ## Usage
//!
//! ```ignore
//! // Native application
//! fn main() {
//!     if let Err(err) = voxel_boy::run() {
//!         eprintln!("{err}");
//!         std::process::exit(1);
//!     }
//! }
//! ```
//!
//! On the web the exported `run_web` is called from JavaScript once the page holding
//! `<canvas id="wgpu-canvas">` has loaded.

use application_state::ApplicationState;
#[cfg(target_family = "wasm")]
use wasm_bindgen::prelude::wasm_bindgen;

use log::{debug, info, warn};
use winit::event_loop::EventLoop;

mod application_state;
pub mod color;
pub mod config;
mod core;
mod engine_state;
pub mod error;
pub mod page;

use application_state::graphics_resources_builder::GraphicsResult;
use config::SceneConfig;
pub use error::EngineError;

fn init_logger() {
    cfg_if::cfg_if! {
        if #[cfg(target_family = "wasm")] {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            if console_log::init_with_level(log::Level::Info).is_err() {
                return;
            }
        } else {
            let mut log_builder = env_logger::Builder::new();
            if log_builder
                .target(env_logger::Target::Stdout)
                .parse_env("RUST_LOG")
                .try_init()
                .is_err()
            {
                return;
            }
        }
    }

    info!("Logger initialized");
}

fn log_config(config: &SceneConfig) {
    match config.to_json() {
        Ok(json) => debug!("Scene configuration: {}", json),
        Err(err) => warn!("Scene configuration could not be serialised: {}", err),
    }
}

/// Opens the window and runs the scene until it is closed.
///
/// # Errors
///
/// Returns the error that stopped the scene: no usable graphics context, a figure that
/// does not fit its batch, an event loop failure, or an unrecoverable surface error.
#[cfg(not(target_family = "wasm"))]
pub fn run() -> Result<(), EngineError> {
    init_logger();
    page::log_page_content();

    let config = SceneConfig::default();
    log_config(&config);

    let event_loop = EventLoop::<GraphicsResult>::with_user_event().build()?;
    let mut state = ApplicationState::new(event_loop.create_proxy(), config);

    event_loop.run_app(&mut state)?;

    match state.take_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Web entry point, called from JavaScript.
#[cfg(target_family = "wasm")]
#[wasm_bindgen]
pub fn run_web() {
    use winit::platform::web::EventLoopExtWebSys;

    init_logger();
    page::set_document_title();

    let config = SceneConfig::default();
    log_config(&config);

    let event_loop = match EventLoop::<GraphicsResult>::with_user_event().build() {
        Ok(event_loop) => event_loop,
        Err(err) => {
            let err = EngineError::from(err);
            log::error!("{}", err);
            page::show_fallback(&err);
            return;
        }
    };

    let state = ApplicationState::new(event_loop.create_proxy(), config);
    event_loop.spawn_app(state);
}
