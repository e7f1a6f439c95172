#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `danejoe-scheduler` is the part of the client that turns one enqueued
//! download task into a sequence of `/block` requests and applies their
//! responses to a destination file. It sits on top of
//! [`danejoe_protocol`], [`danejoe_transport`], and [`danejoe_store`] and
//! has no knowledge of how those requests actually get onto the wire
//! beyond calling [`danejoe_transport::TransportSession::write`].
//!
//! # Design
//!
//! [`Correlator`] and [`BlockScheduler`] are deliberately separate:
//! the correlator only allocates request ids and remembers who asked,
//! the scheduler only knows about tasks and blocks. A caller (the event
//! loop in `danejoe-cli`) wires the two together once per tick.
//!
//! # Invariants
//!
//! - A task's destination file is owned by its [`TaskPending`] entry;
//!   no other part of the process holds a handle to it.
//! - `task_completed` firing exactly once per task is enforced by the
//!   `count_by_task_and_state(.., Waiting) == 0` check happening only
//!   on the transition into that state, not on every response.
//!
//! # Errors
//!
//! Setup operations (`on_task_enqueue`, `on_block_request`) return
//! `Result` for failures the caller can act on. `on_block_response`
//! never does: a disk or store failure there is local to the one
//! block and is recorded as that block's `Failed` state.

mod block_scheduler;
mod correlator;
mod error;
mod task_pending;

pub use block_scheduler::{BlockScheduler, DEFAULT_BLOCK_REQUEST_INTERVAL_MS};
pub use correlator::{Correlator, DEFAULT_TTL};
pub use error::SchedulerError;
pub use task_pending::TaskPending;
