//! `Vec`-backed reference implementations of the store traits, for tests
//! and the single-process demo. Not meant for production use (no
//! durability, no concurrent access).

use crate::entity::{BlockEntity, BlockState, ClientFileEntity, TaskEntity};
use crate::error::StoreError;
use crate::traits::{BlockStore, FileStore, TaskStore};

/// In-memory [`BlockStore`].
#[derive(Default)]
pub struct InMemoryBlockStore {
    blocks: Vec<BlockEntity>,
    next_id: i64,
}

impl InMemoryBlockStore {
    /// Starts an empty store.
    #[must_use]
    pub fn new() -> Self {
        InMemoryBlockStore::default()
    }
}

impl BlockStore for InMemoryBlockStore {
    fn get_by_task(&self, task_id: i64) -> Result<Vec<BlockEntity>, StoreError> {
        Ok(self
            .blocks
            .iter()
            .filter(|b| b.task_id == task_id)
            .cloned()
            .collect())
    }

    fn get_by_id(&self, block_id: i64) -> Result<BlockEntity, StoreError> {
        self.blocks
            .iter()
            .find(|b| b.block_id == block_id)
            .cloned()
            .ok_or(StoreError::NotFound(block_id))
    }

    fn count_by_task_and_state(&self, task_id: i64, state: BlockState) -> Result<usize, StoreError> {
        Ok(self
            .blocks
            .iter()
            .filter(|b| b.task_id == task_id && b.state == state)
            .count())
    }

    fn update(&mut self, block: &BlockEntity) -> Result<(), StoreError> {
        let existing = self
            .blocks
            .iter_mut()
            .find(|b| b.block_id == block.block_id)
            .ok_or(StoreError::NotFound(block.block_id))?;
        *existing = block.clone();
        Ok(())
    }

    fn add(&mut self, mut block: BlockEntity) -> Result<BlockEntity, StoreError> {
        self.next_id += 1;
        block.block_id = self.next_id;
        self.blocks.push(block.clone());
        Ok(block)
    }
}

/// In-memory [`TaskStore`].
#[derive(Default)]
pub struct InMemoryTaskStore {
    tasks: Vec<TaskEntity>,
}

impl InMemoryTaskStore {
    /// Starts an empty store.
    #[must_use]
    pub fn new() -> Self {
        InMemoryTaskStore::default()
    }
}

impl TaskStore for InMemoryTaskStore {
    fn get_by_id(&self, task_id: i64) -> Result<TaskEntity, StoreError> {
        self.tasks
            .iter()
            .find(|t| t.task_id == task_id)
            .cloned()
            .ok_or(StoreError::NotFound(task_id))
    }

    fn add(&mut self, mut task: TaskEntity) -> Result<TaskEntity, StoreError> {
        task.task_id = self.max_task_id() + 1;
        self.tasks.push(task.clone());
        Ok(task)
    }

    fn update(&mut self, task: &TaskEntity) -> Result<(), StoreError> {
        let existing = self
            .tasks
            .iter_mut()
            .find(|t| t.task_id == task.task_id)
            .ok_or(StoreError::NotFound(task.task_id))?;
        *existing = task.clone();
        Ok(())
    }

    fn max_task_id(&self) -> i64 {
        self.tasks.iter().map(|t| t.task_id).max().unwrap_or(0)
    }
}

/// In-memory [`FileStore`].
#[derive(Default)]
pub struct InMemoryFileStore {
    files: Vec<ClientFileEntity>,
    next_id: i64,
}

impl InMemoryFileStore {
    /// Starts an empty store.
    #[must_use]
    pub fn new() -> Self {
        InMemoryFileStore::default()
    }
}

impl FileStore for InMemoryFileStore {
    fn get_by_id(&self, file_id: i64) -> Result<ClientFileEntity, StoreError> {
        self.files
            .iter()
            .find(|f| f.file_id == file_id)
            .cloned()
            .ok_or(StoreError::NotFound(file_id))
    }

    fn get_by_md5(&self, md5_code: &str) -> Result<ClientFileEntity, StoreError> {
        self.files
            .iter()
            .find(|f| f.md5_code == md5_code)
            .cloned()
            .ok_or(StoreError::NotFound(-1))
    }

    fn add(&mut self, mut file: ClientFileEntity) -> Result<ClientFileEntity, StoreError> {
        self.next_id += 1;
        file.file_id = self.next_id;
        self.files.push(file.clone());
        Ok(file)
    }

    fn update(&mut self, file: &ClientFileEntity) -> Result<(), StoreError> {
        let existing = self
            .files
            .iter_mut()
            .find(|f| f.file_id == file.file_id)
            .ok_or(StoreError::NotFound(file.file_id))?;
        *existing = file.clone();
        Ok(())
    }
}
