//! Matches outgoing requests to their eventual response, or times them out.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::time::{Duration, Instant};

use danejoe_transport::TransportSession;

/// Reference TTL a pending entry survives without a matching response.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

struct Pending<M> {
    metadata: M,
    registered_at: Instant,
}

/// Tracks in-flight requests by a monotonic `u64` id.
///
/// `M` is whatever context the caller wants echoed back alongside the
/// response — for [`crate::BlockScheduler`] this is the task's event
/// source. The correlator itself is transport-agnostic; it only owns id
/// allocation, the pending-entry map, and the TTL sweep.
pub struct Correlator<M> {
    next_request_id: u64,
    pending: HashMap<u64, Pending<M>>,
    ttl: Duration,
}

impl<M> Default for Correlator<M> {
    fn default() -> Self {
        Correlator::new()
    }
}

impl<M> Correlator<M> {
    /// Creates a correlator with the reference 60-second TTL.
    #[must_use]
    pub fn new() -> Self {
        Correlator::with_ttl(DEFAULT_TTL)
    }

    /// Creates a correlator with an explicit TTL.
    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Correlator {
            next_request_id: 0,
            pending: HashMap::new(),
            ttl,
        }
    }

    /// Allocates a request id, asks `build_payload` to encode a frame
    /// carrying that id, writes it to `session`, and remembers `metadata`
    /// until a matching [`Correlator::on_response`] or TTL sweep.
    ///
    /// # Errors
    ///
    /// Returns the transport error if the write fails. No mapping is
    /// stored in that case.
    pub fn send_request<S: Read + Write>(
        &mut self,
        session: &mut TransportSession<S>,
        metadata: M,
        build_payload: impl FnOnce(u64) -> Vec<u8>,
    ) -> Result<u64, danejoe_transport::TransportError> {
        let request_id = self.next_request_id;
        let payload = build_payload(request_id);
        session.write(&payload)?;
        self.next_request_id += 1;
        self.pending.insert(
            request_id,
            Pending {
                metadata,
                registered_at: Instant::now(),
            },
        );
        Ok(request_id)
    }

    /// Resolves `request_id` to its stored metadata, if any. The entry is
    /// consumed either way it is found — a second call for the same id
    /// always returns `None`, matching the "erase on match" policy.
    ///
    /// Returns `None` with a `tracing::warn!` if there is no pending
    /// entry (unknown id, already resolved, or swept for age).
    pub fn on_response(&mut self, request_id: u64) -> Option<M> {
        match self.pending.remove(&request_id) {
            Some(entry) => Some(entry.metadata),
            None => {
                tracing::warn!(request_id, "correlator: response for unknown request id");
                None
            }
        }
    }

    /// Drops entries older than the configured TTL. Call once per timer
    /// tick. Returns the number of entries swept.
    pub fn sweep_expired(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let before = self.pending.len();
        self.pending
            .retain(|_, entry| now.duration_since(entry.registered_at) < ttl);
        before - self.pending.len()
    }

    /// Number of requests still awaiting a response.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[derive(Default)]
    struct SinkStream {
        written: Vec<u8>,
    }

    impl Read for SinkStream {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::WouldBlock, "empty"))
        }
    }

    impl Write for SinkStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.written.extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn ids_are_allocated_in_order_and_resolve_once() {
        let mut correlator: Correlator<&'static str> = Correlator::new();
        let mut session = TransportSession::new(SinkStream::default());
        let first = correlator
            .send_request(&mut session, "alpha", |id| vec![id as u8])
            .unwrap();
        let second = correlator
            .send_request(&mut session, "beta", |id| vec![id as u8])
            .unwrap();
        assert_eq!(first, 0);
        assert_eq!(second, 1);
        assert_eq!(correlator.on_response(first), Some("alpha"));
        assert_eq!(correlator.on_response(first), None);
        assert_eq!(correlator.pending_count(), 1);
    }

    #[test]
    fn unknown_response_is_dropped() {
        let mut correlator: Correlator<&'static str> = Correlator::new();
        assert_eq!(correlator.on_response(42), None);
    }

    #[test]
    fn sweep_drops_only_expired_entries() {
        let mut correlator: Correlator<&'static str> = Correlator::with_ttl(Duration::from_secs(1));
        let mut session = TransportSession::new(SinkStream::default());
        correlator
            .send_request(&mut session, "alpha", |id| vec![id as u8])
            .unwrap();
        let later = Instant::now() + Duration::from_secs(2);
        assert_eq!(correlator.sweep_expired(later), 1);
        assert_eq!(correlator.pending_count(), 0);
    }
}
