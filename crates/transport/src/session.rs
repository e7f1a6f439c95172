//! One non-blocking TCP connection: frame assembly on ingress, a
//! pending-write buffer on egress.

use std::io::{self, Read, Write};

use danejoe_protocol::FrameAssembler;

use crate::error::TransportError;

/// Default chunk size `read()` uses per individual `read(2)` call.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 1024;

/// One logical connection. Generic over the underlying stream so tests can
/// substitute an in-memory duplex pipe instead of a real `TcpStream`.
pub struct TransportSession<S> {
    stream: S,
    assembler: FrameAssembler,
    read_chunk_size: usize,
    pending_write: Vec<u8>,
}

impl<S: Read + Write> TransportSession<S> {
    /// Wraps an already-connected, non-blocking stream.
    #[must_use]
    pub fn new(stream: S) -> Self {
        TransportSession::with_read_chunk_size(stream, DEFAULT_READ_CHUNK_SIZE)
    }

    /// Same as [`TransportSession::new`] with an explicit read chunk size.
    #[must_use]
    pub fn with_read_chunk_size(stream: S, read_chunk_size: usize) -> Self {
        TransportSession {
            stream,
            assembler: FrameAssembler::new(),
            read_chunk_size,
            pending_write: Vec::new(),
        }
    }

    /// Reads repeatedly in `read_chunk_size` chunks until the kernel
    /// returns `WouldBlock`, pushing every chunk into the frame assembler
    /// and draining every frame that became ready.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Closed`] on a zero-length read (graceful
    /// peer close) or [`TransportError::Io`] for any other I/O error.
    /// `WouldBlock` is not an error; it ends the read loop successfully.
    pub fn read(&mut self) -> Result<Vec<Vec<u8>>, TransportError> {
        let mut ready_frames = Vec::new();
        let mut buf = vec![0u8; self.read_chunk_size];
        loop {
            match self.stream.read(&mut buf) {
                Ok(0) => return Err(TransportError::Closed),
                Ok(n) => {
                    self.assembler.push(&buf[..n]);
                    while let Some(frame) = self.assembler.pop_frame() {
                        ready_frames.push(frame);
                    }
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    tracing::warn!(error = %e, "transport: read error, closing session");
                    return Err(TransportError::Io(e));
                }
            }
        }
        Ok(ready_frames)
    }

    /// Queues `frame_bytes` for sending, then writes as much of the
    /// pending buffer as the kernel will accept immediately. Residual
    /// bytes (including bytes queued before this call) remain pending.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] on any I/O error other than
    /// `WouldBlock`.
    pub fn write(&mut self, frame_bytes: &[u8]) -> Result<(), TransportError> {
        self.pending_write.extend_from_slice(frame_bytes);
        self.flush_pending()
    }

    /// Attempts to drain the pending-write buffer without queueing
    /// anything new. Call when the reactor reports writable readiness.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Io`] on any I/O error other than
    /// `WouldBlock`.
    pub fn flush_pending(&mut self) -> Result<(), TransportError> {
        while !self.pending_write.is_empty() {
            match self.stream.write(&self.pending_write) {
                Ok(0) => {
                    tracing::warn!("transport: write returned 0, closing session");
                    return Err(TransportError::Closed);
                }
                Ok(n) => {
                    self.pending_write.drain(0..n);
                }
                Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => break,
                Err(e) => {
                    tracing::warn!(error = %e, "transport: write error, closing session");
                    return Err(TransportError::Io(e));
                }
            }
        }
        Ok(())
    }

    /// `true` while bytes remain queued for the kernel, used to decide
    /// whether the reactor should arm writable interest.
    #[must_use]
    pub fn has_pending_write(&self) -> bool {
        !self.pending_write.is_empty()
    }

    /// Borrows the underlying stream, e.g. to register it with a reactor.
    pub fn inner(&self) -> &S {
        &self.stream
    }

    /// Mutably borrows the underlying stream.
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.stream
    }
}
