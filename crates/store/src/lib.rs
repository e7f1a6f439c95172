#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `danejoe-store` defines the record types the scheduler manipulates
//! ([`TaskEntity`], [`BlockEntity`], [`ClientFileEntity`]) and the
//! persistence traits ([`BlockStore`], [`TaskStore`], [`FileStore`]) it
//! depends on. The relational schema behind those traits is intentionally
//! out of scope; [`in_memory`] provides a reference implementation for
//! tests and the single-process demo.
//!
//! # Invariants
//!
//! - `TaskEntity::task_id` is always `≥ 1` and monotonically assigned.
//! - `BlockEntity::block_id` is store-assigned; callers never choose it.
//! - For a task's blocks sorted by offset, `offset_i + block_size_i ==
//!   offset_{i+1}`, and the last block ends at the file's total size.
//!   Maintaining this is the caller's responsibility; the store does not
//!   validate it.

mod entity;
mod error;
mod in_memory;
mod traits;

pub use entity::{BlockEntity, BlockState, ClientFileEntity, Operation, TaskEntity, TaskState};
pub use error::StoreError;
pub use in_memory::{InMemoryBlockStore, InMemoryFileStore, InMemoryTaskStore};
pub use traits::{BlockStore, FileStore, TaskStore};
