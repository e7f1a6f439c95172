//! The scheduler's in-memory record for one active task.

use std::fs::File;

use danejoe_store::TaskEntity;
use danejoe_transport::Endpoint;

/// Schedule-time state for one task, owned exclusively by
/// [`crate::BlockScheduler`]. Dropping the entry (on cancel) drops
/// `dest_file` and releases the underlying descriptor.
pub struct TaskPending<M> {
    /// Caller-supplied origin of the enqueue, echoed back through the
    /// [`crate::Correlator`] alongside each block's response.
    pub event_source: M,
    /// Server this task's blocks are fetched from.
    pub endpoint: Endpoint,
    /// The task record as enqueued.
    pub task_entity: TaskEntity,
    /// Whether block dispatch is currently suspended for this task.
    pub is_paused: bool,
    /// Destination file handle, opened lazily on the first block write.
    pub dest_file: Option<File>,
}

impl<M> TaskPending<M> {
    /// Starts tracking `task_entity`, unpaused, with no file open yet.
    #[must_use]
    pub fn new(event_source: M, endpoint: Endpoint, task_entity: TaskEntity) -> Self {
        TaskPending {
            event_source,
            endpoint,
            task_entity,
            is_paused: false,
            dest_file: None,
        }
    }
}
