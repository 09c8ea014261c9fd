//! Fixed ring of reusable NV21 buffers
//!
//! The producer writes each accepted frame into the next slot, so a reader of
//! the previous frame is never overwritten until two more frames have been
//! accepted. Slots are reallocated only when the frame size changes or when a
//! reader is still holding the slot's last frame.

use crate::types::{nv21_size, FrameBuffer};
use std::sync::Arc;

/// Number of backing buffers in the ring
pub const RING_SIZE: usize = 3;

#[derive(Default)]
struct RingSlot {
    buffer: Option<FrameBuffer>,
    dims: Option<(u32, u32)>,
}

/// Round-robin arena of frame buffers, owned by the producer
pub struct FrameRing {
    slots: [RingSlot; RING_SIZE],
    index: usize,
    reallocations: u64,
}

impl FrameRing {
    pub fn new() -> Self {
        FrameRing {
            slots: Default::default(),
            index: 0,
            reallocations: 0,
        }
    }

    /// Index of the slot the next accepted frame will be written to
    pub fn index(&self) -> usize {
        self.index
    }

    /// Take the current slot's buffer for writing a `width x height` frame.
    ///
    /// The old buffer is reused when it has the right size and no reader holds
    /// it; otherwise a zeroed buffer of `nv21_size(width, height)` is allocated.
    /// The buffer must come back through [`commit`](Self::commit) or
    /// [`restore`](Self::restore).
    pub fn checkout(&mut self, width: u32, height: u32) -> Vec<u8> {
        let need = nv21_size(width, height);
        let slot = &mut self.slots[self.index];

        let reusable = slot
            .buffer
            .take()
            .and_then(|buffer| Arc::try_unwrap(buffer).ok())
            .filter(|buffer| buffer.len() == need && slot.dims == Some((width, height)));

        match reusable {
            Some(buffer) => buffer,
            None => {
                log::debug!(
                    "Allocating ring slot {} for {}x{} ({} bytes)",
                    self.index,
                    width,
                    height,
                    need
                );
                slot.dims = Some((width, height));
                self.reallocations += 1;
                vec![0u8; need]
            }
        }
    }

    /// Store a filled buffer in the current slot and advance the ring.
    /// Returns the shared handle for publishing.
    pub fn commit(&mut self, buffer: Vec<u8>) -> FrameBuffer {
        let shared = Arc::new(buffer);
        self.slots[self.index].buffer = Some(Arc::clone(&shared));
        self.index = (self.index + 1) % RING_SIZE;
        shared
    }

    /// Return an unused buffer to the current slot without advancing
    pub fn restore(&mut self, buffer: Vec<u8>) {
        self.slots[self.index].buffer = Some(Arc::new(buffer));
    }

    /// Number of buffers allocated since creation
    pub fn reallocations(&self) -> u64 {
        self.reallocations
    }
}

impl Default for FrameRing {
    fn default() -> Self {
        Self::new()
    }
}
