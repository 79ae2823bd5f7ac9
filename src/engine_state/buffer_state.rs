//! # Buffer State Module
//!
//! A registry of every GPU buffer the scene allocates, keyed by a static name.
//!
//! ## Key Features
//!
//! * Named buffers so the camera, scene uniform, instance data and ground geometry can
//!   be shared between the pipeline, the bind groups and the scene resources
//! * Bounds-checked writes
//! * Explicit destruction, used when the figure batch or the scene is unmounted
//! * Allocation analytics, logged on unmount to confirm nothing is left behind
//!
//! The bookkeeping lives in [`BufferLedger`], which holds no GPU handles and is unit
//! tested on its own.

use std::collections::HashMap;

use bytemuck::NoUninit;
use log::debug;
use wgpu::{util::DeviceExt, Buffer, Device, Queue};

use crate::core::{StResource, StSystem};

/// Analytics data for a GPU buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferAnalytics {
    /// Total memory allocated for the buffer in bytes
    pub allocated_memory: u64,
    /// High-water mark of written bytes
    pub used_memory: u64,
    /// Number of times the buffer has been written to
    pub times_written: u64,
}

/// Allocation bookkeeping for named buffers.
#[derive(Debug, Default)]
pub struct BufferLedger {
    entries: HashMap<&'static str, BufferAnalytics>,
}

impl BufferLedger {
    /// Registers a freshly allocated buffer.
    pub fn record_allocation(&mut self, buffer_name: &'static str, size: u64, initialised: bool) {
        self.entries.insert(
            buffer_name,
            BufferAnalytics {
                allocated_memory: size,
                used_memory: if initialised { size } else { 0 },
                times_written: u64::from(initialised),
            },
        );
    }

    /// Records a write of `len` bytes at `offset`.
    ///
    /// # Panics
    ///
    /// Panics if the buffer is unknown or the write would exceed its allocation.
    pub fn record_write(&mut self, buffer_name: &'static str, offset: u64, len: u64) {
        let Some(analytics) = self.entries.get_mut(buffer_name) else {
            panic!("Buffer '{}' is not registered", buffer_name);
        };

        if offset + len > analytics.allocated_memory {
            panic!(
                "Buffer write out of bounds for buffer name '{}'",
                buffer_name
            );
        }

        analytics.used_memory = analytics.used_memory.max(offset + len);
        analytics.times_written += 1;
    }

    /// Forgets a buffer. Returns `false` if it was not registered.
    pub fn record_release(&mut self, buffer_name: &'static str) -> bool {
        self.entries.remove(buffer_name).is_some()
    }

    pub fn total_allocated_memory(&self) -> u64 {
        self.entries.values().map(|a| a.allocated_memory).sum()
    }

    #[cfg(test)]
    pub fn get(&self, buffer_name: &'static str) -> Option<&BufferAnalytics> {
        self.entries.get(buffer_name)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Central registry for GPU buffers.
///
/// # Examples
///
/// ```ignore
/// buffer_state.create_buffer_init(
///     INSTANCE_BUFFER_NAME,
///     wgpu::util::BufferInitDescriptor {
///         label: Some(INSTANCE_BUFFER_NAME),
///         contents: bytemuck::cast_slice(batch.instances()),
///         usage: wgpu::BufferUsages::VERTEX,
///     },
/// );
///
/// // On unmount
/// buffer_state.destroy_buffer(INSTANCE_BUFFER_NAME);
/// ```
pub struct BufferState {
    /// Reference to the GPU device
    pub device: StSystem<Device>,
    /// Reference to the GPU command queue
    pub queue: StSystem<Queue>,
    /// Map of buffer names to buffer objects
    buffers: HashMap<&'static str, Buffer>,
    /// Allocation bookkeeping, shared so analytics can be read while buffers are borrowed
    ledger: StResource<BufferLedger>,
}

impl BufferState {
    pub fn new(device: StSystem<Device>, queue: StSystem<Queue>) -> Self {
        Self {
            device,
            queue,
            buffers: HashMap::new(),
            ledger: StResource::new(BufferLedger::default()),
        }
    }

    /// Creates a buffer initialised with data. An existing buffer with the same name is
    /// destroyed first.
    pub fn create_buffer_init(
        &mut self,
        buffer_name: &'static str,
        init_descriptor: wgpu::util::BufferInitDescriptor,
    ) {
        self.destroy_buffer(buffer_name);
        let size = init_descriptor.contents.len() as u64;
        let buffer = self.device.get().create_buffer_init(&init_descriptor);

        self.buffers.insert(buffer_name, buffer);
        self.ledger
            .get_mut()
            .record_allocation(buffer_name, size, true);
    }

    /// Writes raw bytes to a buffer.
    ///
    /// # Panics
    ///
    /// Panics if the buffer does not exist or if the write would exceed buffer bounds
    pub fn write_buffer(
        &self,
        buffer_name: &'static str,
        offset: wgpu::BufferAddress,
        data: &[u8],
    ) {
        let buffer = self.get_buffer(buffer_name);
        self.ledger
            .get_mut()
            .record_write(buffer_name, offset, data.len() as u64);

        self.queue.get().write_buffer(buffer, offset, data);
    }

    /// Writes a slice of plain-old-data values at offset zero.
    pub fn write_pod<T: NoUninit>(&self, buffer_name: &'static str, data: &[T]) {
        self.write_buffer(buffer_name, 0, bytemuck::cast_slice(data));
    }

    /// Destroys a buffer and frees its GPU memory. Unknown names are ignored, so
    /// releasing twice is harmless.
    pub fn destroy_buffer(&mut self, buffer_name: &'static str) -> bool {
        let Some(buffer) = self.buffers.remove(buffer_name) else {
            return false;
        };

        buffer.destroy();
        self.ledger.get_mut().record_release(buffer_name);
        debug!("Destroyed buffer '{}'", buffer_name);
        true
    }

    /// # Panics
    ///
    /// Panics if the buffer does not exist
    pub fn get_buffer(&self, buffer_name: &'static str) -> &Buffer {
        match self.buffers.get(buffer_name) {
            Some(buffer) => buffer,
            None => panic!("Buffer '{}' is not registered", buffer_name),
        }
    }

    /// # Panics
    ///
    /// Panics if the buffer does not exist
    pub fn get_entire_binding(&self, buffer_name: &'static str) -> wgpu::BindingResource<'_> {
        self.get_buffer(buffer_name).as_entire_binding()
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn get_total_allocated_memory(&self) -> u64 {
        self.ledger.get().total_allocated_memory()
    }}
