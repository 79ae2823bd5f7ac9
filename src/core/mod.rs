//! # Core Module
//!
//! Shared-ownership containers used by the render thread.
//!
//! Everything in the scene runs on the event loop thread, so the containers here are
//! `Rc`-based and never cross threads.
//!
//! ## Key Components
//! - `StResource`: reference-counted plain data behind an `RwLock`
//! - `StSystem`: reference-counted boxed system behind a `RefCell`, used for the GPU
//!   device, queue and buffer registry

pub mod st_resource;
pub mod st_system;

pub use st_resource::StResource;
pub use st_system::StSystem;
