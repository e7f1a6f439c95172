//! Splits a file size into contiguous, store-ready blocks.

use danejoe_store::{BlockEntity, TaskState};

/// Default block size when the caller does not override it (1 MiB).
pub const DEFAULT_BLOCK_BYTES: i64 = 1024 * 1024;

/// Splits `file_size` bytes into blocks of at most `block_bytes`, the
/// last one shorter if `file_size` does not divide evenly. `task_id` and
/// `block_id` are left at placeholder values; the caller's store
/// assigns real ids on insert.
///
/// # Panics
///
/// Panics if `block_bytes <= 0`; callers must validate CLI input before
/// calling this.
#[must_use]
pub fn split_into_blocks(file_id: i64, file_size: i64, block_bytes: i64) -> Vec<BlockEntity> {
    assert!(block_bytes > 0, "block_bytes must be positive");
    let mut blocks = Vec::new();
    let mut offset = 0;
    while offset < file_size {
        let remaining = file_size - offset;
        let block_size = if remaining >= block_bytes { block_bytes } else { remaining };
        blocks.push(BlockEntity {
            block_id: -1,
            task_id: -1,
            file_id,
            offset,
            block_size,
            state: TaskState::Waiting,
            start_time: None,
            end_time: None,
        });
        offset += block_size;
    }
    blocks
}
