#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `danejoe-transport` is the non-blocking I/O layer: one
//! [`TransportSession`] per TCP connection, plus [`Endpoint`] parsing for
//! turning a `danejoe://host:port` argument into something `TcpStream`
//! can dial.
//!
//! # Design
//!
//! The session itself never blocks and never spawns threads; it is driven
//! entirely by the caller's reactor (`danejoe-cli`'s `mio::Poll` loop)
//! calling `read()`/`write()`/`flush_pending()` in response to readiness
//! events. `TransportSession` is generic over its stream type so unit
//! tests exercise it against an in-memory duplex pipe instead of a real
//! socket.
//!
//! # Invariants
//!
//! - The session itself is single-threaded; callers must not reenter
//!   `read`/`write` for the same session concurrently.
//! - `has_pending_write()` is the sole signal for whether the reactor
//!   should arm writable interest.

mod endpoint;
mod error;
mod session;

pub use endpoint::{Endpoint, DEFAULT_PORT};
pub use error::TransportError;
pub use session::{TransportSession, DEFAULT_READ_CHUNK_SIZE};
