use alloc::vec;
use alloc::vec::Vec;

use crate::canvas::{Canvas, Pixel};
use crate::geometry::{Area, ByteOrder};

/// Number of frame buffers the render port alternates between
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Buffering {
    Single,
    #[default]
    Double,
}

impl Buffering {
    pub const fn count(self) -> usize {
        match self {
            Buffering::Single => 1,
            Buffering::Double => 2,
        }
    }
}

/// Fixed-capacity RGB565 strip buffer in panel byte order
#[derive(Debug)]
pub struct FrameBuffer {
    bytes: Vec<u8>,
    len: usize,
}

impl FrameBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity],
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn capacity_pixels(&self) -> usize {
        self.bytes.len() / 2
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes of the last loaded area.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Copies `area` out of the canvas, encoding each pixel in `order`.
    /// Returns false and leaves the buffer empty when the area does not fit.
    pub fn load<P: Pixel>(&mut self, canvas: &Canvas<P>, area: Area, order: ByteOrder) -> bool {
        let needed = area.pixel_count() * 2;
        let size = canvas.size();
        if needed > self.bytes.len() || area.right() > size.width || area.bottom() > size.height {
            self.len = 0;
            return false;
        }
        let mut chunks = self.bytes[..needed].chunks_exact_mut(2);
        for y in area.y..area.bottom() {
            for (pixel, chunk) in canvas.row(area.x, y, area.width).iter().zip(&mut chunks) {
                chunk.copy_from_slice(&order.encode(pixel.to_rgb565()));
            }
        }
        self.len = needed;
        true
    }
}

/// Idle frame buffers owned by the render port
#[derive(Debug)]
pub struct BufferPool {
    free: heapless::Vec<FrameBuffer, 2>,
    buffer_bytes: usize,
}

impl BufferPool {
    pub fn new(buffering: Buffering, buffer_bytes: usize) -> Self {
        let mut free = heapless::Vec::new();
        for _ in 0..buffering.count() {
            let _ = free.push(FrameBuffer::new(buffer_bytes));
        }
        Self { free, buffer_bytes }
    }

    pub fn buffer_bytes(&self) -> usize {
        self.buffer_bytes
    }

    pub fn available(&self) -> usize {
        self.free.len()
    }

    pub fn take(&mut self) -> Option<FrameBuffer> {
        self.free.pop()
    }

    /// Returns a buffer once the transport is done with it.
    pub fn give(&mut self, buffer: FrameBuffer) {
        if self.free.push(buffer).is_err() {
            log::warn!("buffer pool full, releasing surplus frame buffer");
        }
    }
}
