//! GPU buffers that grow when the data outgrows them.
//!
//! The particle field rewrites every position each frame; the buffer keeps
//! its allocation across frames and only reallocates when the point count
//! rises above capacity.

use std::marker::PhantomData;

use wgpu::util::DeviceExt;

const MIN_CAPACITY: usize = 64;

/// A GPU buffer that grows by doubling. Never shrinks.
pub struct DynamicBuffer {
    buffer: wgpu::Buffer,
    capacity: usize,
    len: usize,
    usage: wgpu::BufferUsages,
    label: String,
}

impl DynamicBuffer {
    /// Empty buffer with at least `initial_capacity` bytes.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        initial_capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        let capacity = initial_capacity.max(MIN_CAPACITY);
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size: capacity as u64,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            buffer,
            capacity,
            len: 0,
            usage,
            label: label.to_owned(),
        }
    }

    /// Buffer initialized from `data`.
    pub fn new_with_data<T: bytemuck::Pod>(
        device: &wgpu::Device,
        label: &str,
        data: &[T],
        usage: wgpu::BufferUsages,
    ) -> Self {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        // Storage bindings reject zero-sized buffers.
        let buffer = if bytes.len() < MIN_CAPACITY {
            let mut padded = bytes.to_vec();
            padded.resize(MIN_CAPACITY, 0);
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: &padded,
                usage: usage | wgpu::BufferUsages::COPY_DST,
            })
        } else {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytes,
                usage: usage | wgpu::BufferUsages::COPY_DST,
            })
        };

        Self {
            buffer,
            capacity: bytes.len().max(MIN_CAPACITY),
            len: bytes.len(),
            usage,
            label: label.to_owned(),
        }
    }

    /// Overwrite the contents, reallocating if `data` does not fit.
    ///
    /// Returns `true` if the buffer was reallocated (bind groups that
    /// reference it must be recreated).
    pub fn write<T: bytemuck::Pod>(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        let bytes: &[u8] = bytemuck::cast_slice(data);
        let needed = bytes.len();

        let reallocated = if needed > self.capacity {
            let new_capacity = grown_capacity(self.capacity, needed);
            self.buffer.destroy();
            self.buffer = device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(&self.label),
                size: new_capacity as u64,
                usage: self.usage | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            });
            log::debug!(
                "{}: grew {} -> {} bytes",
                self.label,
                self.capacity,
                new_capacity
            );
            self.capacity = new_capacity;
            true
        } else {
            false
        };

        if needed > 0 {
            queue.write_buffer(&self.buffer, 0, bytes);
        }
        self.len = needed;
        reallocated
    }

    /// Release the GPU allocation now instead of when the handle drops.
    pub fn destroy(&self) {
        self.buffer.destroy();
    }

    /// Underlying wgpu buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        &self.buffer
    }

    /// Bytes written by the last [`write`](Self::write).
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the last write was empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated size in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Capacity after growing to hold `needed` bytes: double the request, and
/// at least 1 KiB more than before.
fn grown_capacity(current: usize, needed: usize) -> usize {
    (needed * 2).max(current + 1024)
}

/// [`DynamicBuffer`] that counts items of `T` instead of bytes.
pub struct TypedBuffer<T> {
    inner: DynamicBuffer,
    count: usize,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> TypedBuffer<T> {
    /// Empty buffer with room for `capacity` items.
    pub fn with_capacity(
        device: &wgpu::Device,
        label: &str,
        capacity: usize,
        usage: wgpu::BufferUsages,
    ) -> Self {
        Self {
            inner: DynamicBuffer::new(
                device,
                label,
                std::mem::size_of::<T>() * capacity,
                usage,
            ),
            count: 0,
            _marker: PhantomData,
        }
    }

    /// Buffer initialized from `data`.
    pub fn new_with_data(
        device: &wgpu::Device,
        label: &str,
        data: &[T],
        usage: wgpu::BufferUsages,
    ) -> Self {
        Self {
            inner: DynamicBuffer::new_with_data(device, label, data, usage),
            count: data.len(),
            _marker: PhantomData,
        }
    }

    /// Overwrite the contents. Returns `true` on reallocation.
    pub fn write(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[T],
    ) -> bool {
        self.count = data.len();
        self.inner.write(device, queue, data)
    }

    /// Release the GPU allocation.
    pub fn destroy(&self) {
        self.inner.destroy();
    }

    /// Underlying wgpu buffer.
    pub fn buffer(&self) -> &wgpu::Buffer {
        self.inner.buffer()
    }

    /// Items written by the last write.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Whether the buffer holds no items.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Items that fit without reallocating.
    pub fn capacity(&self) -> usize {
        self.inner.capacity() / std::mem::size_of::<T>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn growth_doubles_large_requests() {
        assert_eq!(grown_capacity(64, 10_000), 20_000);
    }

    #[test]
    fn growth_adds_at_least_a_kilobyte() {
        assert_eq!(grown_capacity(4096, 4100), 8200);
        assert_eq!(grown_capacity(64, 65), 1088);
    }
}
