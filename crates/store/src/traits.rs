//! Abstract persistence interfaces. The scheduler only ever depends on
//! these traits; concrete storage (SQL, files, whatever) lives outside
//! this workspace.

use crate::entity::{BlockEntity, BlockState, ClientFileEntity, TaskEntity};
use crate::error::StoreError;

/// CRUD over [`BlockEntity`] records.
pub trait BlockStore {
    /// All blocks belonging to `task_id`, in no particular order.
    fn get_by_task(&self, task_id: i64) -> Result<Vec<BlockEntity>, StoreError>;
    /// A single block by its store-assigned id.
    fn get_by_id(&self, block_id: i64) -> Result<BlockEntity, StoreError>;
    /// Count of `task_id`'s blocks currently in `state`.
    fn count_by_task_and_state(&self, task_id: i64, state: BlockState) -> Result<usize, StoreError>;
    /// Persists changes to an existing block.
    fn update(&mut self, block: &BlockEntity) -> Result<(), StoreError>;
    /// Inserts a new block, assigning its `block_id`.
    fn add(&mut self, block: BlockEntity) -> Result<BlockEntity, StoreError>;
}

/// CRUD over [`TaskEntity`] records.
pub trait TaskStore {
    /// A single task by id.
    fn get_by_id(&self, task_id: i64) -> Result<TaskEntity, StoreError>;
    /// Inserts a new task, assigning `task_id = max(existing) + 1`.
    fn add(&mut self, task: TaskEntity) -> Result<TaskEntity, StoreError>;
    /// Persists changes to an existing task.
    fn update(&mut self, task: &TaskEntity) -> Result<(), StoreError>;
    /// The highest `task_id` currently stored, or 0 if empty.
    fn max_task_id(&self) -> i64;
}

/// CRUD over [`ClientFileEntity`] records.
pub trait FileStore {
    /// A single file by id.
    fn get_by_id(&self, file_id: i64) -> Result<ClientFileEntity, StoreError>;
    /// A single file by its MD5 checksum.
    fn get_by_md5(&self, md5_code: &str) -> Result<ClientFileEntity, StoreError>;
    /// Inserts a new file record.
    fn add(&mut self, file: ClientFileEntity) -> Result<ClientFileEntity, StoreError>;
    /// Persists changes to an existing file record.
    fn update(&mut self, file: &ClientFileEntity) -> Result<(), StoreError>;
}
