//! Turns a raw TCP byte stream into a sequence of whole frames.

use danejoe_wire::{FrameHeader, HEADER_LEN};

/// Buffers arbitrary byte chunks and yields complete, header-validated
/// frames in arrival order.
///
/// Recovery policy on a bad header (magic or version mismatch): the
/// buffer and the cached header are both cleared. There is no byte-level
/// resync search — a framing error costs the bytes buffered so far, and
/// assembly starts fresh on the next `push`.
#[derive(Default)]
pub struct FrameAssembler {
    buffer: Vec<u8>,
    cached_header: Option<FrameHeader>,
}

impl FrameAssembler {
    /// Starts an assembler with an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        FrameAssembler::default()
    }

    /// Appends freshly read bytes to the internal buffer.
    pub fn push(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Pops one complete frame (header bytes included) if enough data has
    /// accumulated, otherwise `None`. Call repeatedly after each `push` to
    /// drain every frame that became ready.
    pub fn pop_frame(&mut self) -> Option<Vec<u8>> {
        if self.cached_header.is_none() {
            if self.buffer.len() < HEADER_LEN {
                return None;
            }
            match FrameHeader::decode(&self.buffer) {
                Ok(header) => self.cached_header = Some(header),
                Err(err) => {
                    tracing::warn!(error = %err, "frame assembler: bad header, resetting stream");
                    self.buffer.clear();
                    self.cached_header = None;
                    return None;
                }
            }
        }

        let header = self.cached_header.as_ref().expect("cached above");
        let total_len = HEADER_LEN + header.body_length as usize;
        if self.buffer.len() < total_len {
            return None;
        }

        let frame: Vec<u8> = self.buffer.drain(0..total_len).collect();
        self.cached_header = None;
        Some(frame)
    }

    /// Number of bytes currently buffered but not yet part of a popped
    /// frame.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.buffer.len()
    }
}
