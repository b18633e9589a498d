//! Buffer Management
//!
//! [`BufferManager`] owns the named per-frame constant buffers created once
//! at renderer initialization; passes look them up by key and the renderer
//! updates them through queue writes. [`DynamicUniformBuffer`] and
//! [`DynamicVertexBuffer`] cover the per-object cases where the amount of
//! data varies frame to frame.

use bytemuck::Pod;
use rustc_hash::FxHashMap;

/// Alignment of dynamic uniform-buffer offsets.
pub const UNIFORM_ALIGN: u64 = 256;

/// Named constant-buffer store.
#[derive(Default)]
pub struct BufferManager {
    buffers: FxHashMap<String, wgpu::Buffer>,
}

impl BufferManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffers: FxHashMap::default(),
        }
    }

    /// Creates (or replaces) the uniform buffer registered under `key`, sized
    /// for one `T`.
    pub fn create_uniform<T: Pod>(&mut self, device: &wgpu::Device, key: &str) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(key),
            size: std::mem::size_of::<T>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        self.buffers.insert(key.to_string(), buffer);
    }

    /// Writes `value` into the buffer registered under `key`.
    pub fn update<T: Pod>(&self, queue: &wgpu::Queue, key: &str, value: &T) {
        if let Some(buffer) = self.buffers.get(key) {
            queue.write_buffer(buffer, 0, bytemuck::bytes_of(value));
        } else {
            log::warn!("Constant buffer '{key}' was never created, dropping update");
        }
    }

    /// The buffer registered under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&wgpu::Buffer> {
        self.buffers.get(key)
    }
}

/// A growable uniform buffer addressed with dynamic offsets, one 256-byte
/// slot per object.
pub struct DynamicUniformBuffer {
    label: &'static str,
    buffer: Option<wgpu::Buffer>,
    capacity: u32,
}

impl DynamicUniformBuffer {
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            buffer: None,
            capacity: 0,
        }
    }

    /// Grows the buffer to hold at least `slots` entries. Returns `true` when
    /// the underlying buffer was recreated and dependent bind groups must be
    /// rebuilt.
    pub fn ensure(&mut self, device: &wgpu::Device, slots: u32) -> bool {
        let needed = slots.max(1);
        if self.buffer.is_some() && needed <= self.capacity {
            return false;
        }
        let capacity = needed.next_power_of_two();
        self.buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(self.label),
            size: u64::from(capacity) * UNIFORM_ALIGN,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.capacity = capacity;
        true
    }

    /// Writes one entry into its slot.
    pub fn write<T: Pod>(&self, queue: &wgpu::Queue, slot: u32, value: &T) {
        if let Some(buffer) = &self.buffer {
            queue.write_buffer(
                buffer,
                u64::from(slot) * UNIFORM_ALIGN,
                bytemuck::bytes_of(value),
            );
        }
    }

    /// Dynamic offset of a slot, passed to `set_bind_group`.
    #[must_use]
    pub fn offset(slot: u32) -> u32 {
        slot * UNIFORM_ALIGN as u32
    }

    /// Binding resource covering one entry of type `T` at offset zero.
    #[must_use]
    pub fn binding<T: Pod>(&self) -> Option<wgpu::BindingResource<'_>> {
        let buffer = self.buffer.as_ref()?;
        Some(wgpu::BindingResource::Buffer(wgpu::BufferBinding {
            buffer,
            offset: 0,
            size: wgpu::BufferSize::new(std::mem::size_of::<T>() as u64),
        }))
    }
}

/// A growable vertex buffer refilled every frame.
pub struct DynamicVertexBuffer {
    label: &'static str,
    buffer: Option<wgpu::Buffer>,
    capacity: u64,
}

impl DynamicVertexBuffer {
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            buffer: None,
            capacity: 0,
        }
    }

    /// Uploads `data`, growing the buffer when needed.
    pub fn upload(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, data: &[u8]) {
        if data.is_empty() {
            return;
        }
        let needed = data.len() as u64;
        if self.buffer.is_none() || self.capacity < needed {
            let capacity = needed.next_power_of_two();
            self.buffer = Some(device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: capacity,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.capacity = capacity;
        }
        if let Some(buffer) = &self.buffer {
            queue.write_buffer(buffer, 0, data);
        }
    }

    /// The current buffer, if anything was ever uploaded.
    #[must_use]
    pub fn buffer(&self) -> Option<&wgpu::Buffer> {
        self.buffer.as_ref()
    }
}
