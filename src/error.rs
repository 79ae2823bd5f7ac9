//! Error types for the scene.
//!
//! Start-up can fail because the GPU context cannot be acquired or because the voxel
//! batch does not fit in its declared instancing capacity. A running frame can only
//! fail terminally when the surface runs out of memory.

use thiserror::Error;

/// The instanced batch could not hold every voxel.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BatchError {
    #[error(
        "instanced batch capacity exceeded: {requested} instances requested, capacity is {capacity}"
    )]
    CapacityExceeded { requested: usize, capacity: usize },
}

/// The rendering surface or its GPU context could not be created.
#[derive(Debug, Error)]
pub enum GraphicsError {
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("failed to create rendering surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error("no compatible graphics adapter: {0}")]
    Adapter(String),
    #[error("failed to open graphics device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("surface does not support any format or present mode for this adapter")]
    UnsupportedSurface,
}

/// Top-level error returned by [`crate::run`].
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Graphics(#[from] GraphicsError),
    #[error(transparent)]
    Batch(#[from] BatchError),
    #[error("event loop failure: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("frame could not be presented: {0}")]
    Frame(#[from] wgpu::SurfaceError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_error_names_both_counts() {
        let err = BatchError::CapacityExceeded {
            requested: 120,
            capacity: 119,
        };

        let message = err.to_string();
        assert!(message.contains("120"));
        assert!(message.contains("119"));
    }

    #[test]
    fn batch_error_converts_into_engine_error() {
        let err: EngineError = BatchError::CapacityExceeded {
            requested: 2,
            capacity: 1,
        }
        .into();

        assert!(matches!(err, EngineError::Batch(_)));
    }
}
