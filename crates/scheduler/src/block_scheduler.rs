//! Drives block requests for enqueued tasks and applies their responses.

use std::collections::{HashMap, VecDeque};
use std::fs::{self, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::time::SystemTime;

use danejoe_protocol::{build_block_request, BlockRequestFields, BlockResponse};
use danejoe_store::{BlockEntity, BlockState, BlockStore, TaskEntity, TaskState, TaskStore};
use danejoe_transport::{Endpoint, TransportSession};

use crate::correlator::Correlator;
use crate::error::SchedulerError;
use crate::task_pending::TaskPending;

/// Default pacing between dispatched block requests.
pub const DEFAULT_BLOCK_REQUEST_INTERVAL_MS: u64 = 30;

/// Dispatches block requests for every enqueued task and writes arriving
/// block payloads to their destination files.
///
/// `M` is the caller-supplied event source type threaded through
/// [`TaskPending`] and the [`Correlator`]; it is opaque to the scheduler
/// itself. `B`/`T` are the block and task stores the scheduler persists
/// progress to.
pub struct BlockScheduler<M, B, T> {
    task_pending: HashMap<i64, TaskPending<M>>,
    block_request_queue: VecDeque<BlockRequestFields>,
    block_request_interval_ms: u64,
    block_store: B,
    task_store: T,
    completed_tasks: Vec<i64>,
}

impl<M, B: BlockStore, T: TaskStore> BlockScheduler<M, B, T> {
    /// Builds a scheduler with the reference 30ms dispatch pacing.
    #[must_use]
    pub fn new(block_store: B, task_store: T) -> Self {
        BlockScheduler {
            task_pending: HashMap::new(),
            block_request_queue: VecDeque::new(),
            block_request_interval_ms: DEFAULT_BLOCK_REQUEST_INTERVAL_MS,
            block_store,
            task_store,
            completed_tasks: Vec::new(),
        }
    }

    /// The pacing timer interval an event loop should drive
    /// [`BlockScheduler::on_block_request`] at.
    #[must_use]
    pub fn block_request_interval_ms(&self) -> u64 {
        self.block_request_interval_ms
    }

    /// Number of requests currently queued for dispatch.
    #[must_use]
    pub fn queued_request_count(&self) -> usize {
        self.block_request_queue.len()
    }

    /// Task ids that reached `Completed` since the last call. Draining
    /// this is how a caller learns `task_completed` fired, in place of
    /// a signal/slot connection.
    pub fn take_completed_tasks(&mut self) -> Vec<i64> {
        std::mem::take(&mut self.completed_tasks)
    }

    /// Starts tracking `task`, fetching its blocks from the block store
    /// and queuing one request per block in ascending offset order.
    /// Replaces any existing `TaskPending` for the same task id; queued
    /// requests from the prior entry remain queued and still dispatch
    /// (the dispatcher only checks `task_pending` membership, not which
    /// enqueue produced the entry).
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Store`] if fetching the task's blocks
    /// fails.
    pub fn on_task_enqueue(
        &mut self,
        event_source: M,
        endpoint: Endpoint,
        task: TaskEntity,
    ) -> Result<(), SchedulerError> {
        let task_id = task.task_id;
        let mut blocks = self.block_store.get_by_task(task_id)?;
        blocks.sort_by_key(|block| block.offset);

        self.task_pending
            .insert(task_id, TaskPending::new(event_source, endpoint, task));

        if blocks.is_empty() {
            self.complete_empty_task(task_id);
            return Ok(());
        }
        for block in blocks {
            self.block_request_queue.push_back(BlockRequestFields {
                block_id: block.block_id,
                file_id: block.file_id,
                task_id: block.task_id,
                offset: block.offset,
                block_size: block.block_size,
            });
        }
        Ok(())
    }

    /// Inserts `task` and `blocks` into the backing stores (assigning
    /// their ids), then enqueues the task exactly as
    /// [`BlockScheduler::on_task_enqueue`] would. For a caller that has
    /// just learned a file's size from a `/download` response and has
    /// no store-assigned records yet.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Store`] if inserting the task or any
    /// block fails.
    pub fn seed_and_enqueue(
        &mut self,
        event_source: M,
        endpoint: Endpoint,
        task: TaskEntity,
        blocks: Vec<BlockEntity>,
    ) -> Result<TaskEntity, SchedulerError> {
        let stored_task = self.task_store.add(task)?;
        let mut stored_blocks = Vec::with_capacity(blocks.len());
        for mut block in blocks {
            block.task_id = stored_task.task_id;
            stored_blocks.push(self.block_store.add(block)?);
        }
        stored_blocks.sort_by_key(|block| block.offset);

        self.task_pending.insert(
            stored_task.task_id,
            TaskPending::new(event_source, endpoint, stored_task.clone()),
        );
        if stored_blocks.is_empty() {
            self.complete_empty_task(stored_task.task_id);
            return Ok(stored_task);
        }
        for block in stored_blocks {
            self.block_request_queue.push_back(BlockRequestFields {
                block_id: block.block_id,
                file_id: block.file_id,
                task_id: block.task_id,
                offset: block.offset,
                block_size: block.block_size,
            });
        }
        Ok(stored_task)
    }

    /// Drops the task's in-memory schedule and its destination file
    /// handle. Queued requests for the task are left in place; the
    /// dispatcher discards them once they no longer find a pending
    /// entry. Persisted block records are untouched.
    pub fn on_task_cancel(&mut self, task_id: i64) {
        self.task_pending.remove(&task_id);
    }

    /// Toggles whether `task_id`'s requests are held back by the
    /// dispatcher. A no-op for an unknown or already-completed task.
    pub fn on_task_paused(&mut self, task_id: i64, paused: bool) {
        if let Some(pending) = self.task_pending.get_mut(&task_id) {
            pending.is_paused = paused;
        }
    }

    /// One dispatcher tick: pops at most one queued request and either
    /// drops it (unknown task), re-queues it at the tail (paused task),
    /// or publishes it through `correlator` and `session`.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::Transport`] if writing the request to
    /// `session` fails. The request is not re-queued in that case.
    pub fn on_block_request<S: Read + Write>(
        &mut self,
        correlator: &mut Correlator<M>,
        session: &mut TransportSession<S>,
    ) -> Result<(), SchedulerError>
    where
        M: Clone,
    {
        let Some(transfer) = self.block_request_queue.pop_front() else {
            return Ok(());
        };
        let Some(pending) = self.task_pending.get(&transfer.task_id) else {
            tracing::debug!(
                task_id = transfer.task_id,
                "scheduler: dropping queued request, task no longer tracked"
            );
            return Ok(());
        };
        if pending.is_paused {
            self.block_request_queue.push_back(transfer);
            return Ok(());
        }

        let event_source = pending.event_source.clone();
        correlator.send_request(session, event_source, |request_id| {
            build_block_request(transfer, request_id)
        })?;
        Ok(())
    }

    /// Applies one block response: writes its payload to the task's
    /// destination file, marks the block `Completed` (or `Failed` on any
    /// disk error), and marks the owning task `Completed` once no blocks
    /// remain `Waiting`.
    ///
    /// Every failure path here is local: an unknown task or block, a
    /// disk error, or a store error is logged and the function returns,
    /// per the "no error short-circuits the event loop" policy.
    pub fn on_block_response(&mut self, response: BlockResponse) {
        let Some(pending) = self.task_pending.get_mut(&response.task_id) else {
            tracing::warn!(
                task_id = response.task_id,
                "scheduler: block response for untracked task"
            );
            return;
        };

        let mut block_entity = match self.block_store.get_by_id(response.block_id) {
            Ok(block) => block,
            Err(error) => {
                tracing::warn!(block_id = response.block_id, %error, "scheduler: block response for unknown block");
                return;
            }
        };

        if let Err(()) = open_dest_file_if_needed(pending) {
            block_entity.state = BlockState::Failed;
            let _ = self.block_store.update(&block_entity);
            return;
        }
        let file = pending
            .dest_file
            .as_mut()
            .expect("dest_file opened by open_dest_file_if_needed");

        if let Err(error) = file.seek(SeekFrom::Start(response.offset as u64)) {
            tracing::warn!(%error, block_id = response.block_id, "scheduler: failed to seek destination file");
            block_entity.state = BlockState::Failed;
            let _ = self.block_store.update(&block_entity);
            return;
        }

        if response.block_size < 0 || response.block_size as usize > response.data.len() {
            tracing::warn!(
                block_id = response.block_id,
                block_size = response.block_size,
                data_len = response.data.len(),
                "scheduler: response payload shorter than declared block_size"
            );
            block_entity.state = BlockState::Failed;
            let _ = self.block_store.update(&block_entity);
            return;
        }

        let mut remaining = response.block_size as usize;
        let mut written = 0usize;
        while remaining > 0 {
            match file.write(&response.data[written..written + remaining]) {
                Ok(0) => {
                    tracing::warn!(block_id = response.block_id, "scheduler: write returned 0 bytes");
                    block_entity.state = BlockState::Failed;
                    let _ = self.block_store.update(&block_entity);
                    return;
                }
                Ok(n) => {
                    written += n;
                    remaining -= n;
                }
                Err(error) => {
                    tracing::warn!(%error, block_id = response.block_id, "scheduler: failed to write block data");
                    block_entity.state = BlockState::Failed;
                    let _ = self.block_store.update(&block_entity);
                    return;
                }
            }
        }
        if let Err(error) = file.flush() {
            tracing::warn!(%error, block_id = response.block_id, "scheduler: failed to flush destination file");
            block_entity.state = BlockState::Failed;
            let _ = self.block_store.update(&block_entity);
            return;
        }

        block_entity.state = BlockState::Completed;
        block_entity.end_time = Some(SystemTime::now());
        if let Err(error) = self.block_store.update(&block_entity) {
            tracing::warn!(%error, "scheduler: failed to persist completed block");
            return;
        }

        let waiting = match self
            .block_store
            .count_by_task_and_state(response.task_id, TaskState::Waiting)
        {
            Ok(count) => count,
            Err(error) => {
                tracing::warn!(%error, "scheduler: failed to count waiting blocks");
                return;
            }
        };
        if waiting == 0 {
            self.complete_task(response.task_id);
        }
    }

    /// A task enqueued with no blocks at all (an empty file) has nothing
    /// to wait on; touches its destination file into existence and
    /// completes it immediately instead of waiting for a response that
    /// will never arrive.
    fn complete_empty_task(&mut self, task_id: i64) {
        if let Some(pending) = self.task_pending.get_mut(&task_id) {
            let _ = open_dest_file_if_needed(pending);
        }
        self.complete_task(task_id);
    }

    fn complete_task(&mut self, task_id: i64) {
        let mut task_entity = match self.task_store.get_by_id(task_id) {
            Ok(task) => task,
            Err(error) => {
                tracing::warn!(%error, task_id, "scheduler: failed to load task for completion");
                return;
            }
        };
        task_entity.end_time = Some(SystemTime::now());
        task_entity.state = TaskState::Completed;
        match self.task_store.update(&task_entity) {
            Ok(()) => self.completed_tasks.push(task_id),
            Err(error) => tracing::warn!(%error, task_id, "scheduler: failed to persist completed task"),
        }
    }
}

fn open_dest_file_if_needed<M>(pending: &mut TaskPending<M>) -> Result<(), ()> {
    if pending.dest_file.is_some() {
        return Ok(());
    }
    let path = std::path::Path::new(&pending.task_entity.saved_path);
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            if let Err(error) = fs::create_dir_all(parent) {
                tracing::warn!(%error, path = %parent.display(), "scheduler: failed to create destination directory");
                return Err(());
            }
        }
    }
    match OpenOptions::new().read(true).write(true).create(true).open(path) {
        Ok(file) => {
            pending.dest_file = Some(file);
            Ok(())
        }
        Err(error) => {
            tracing::warn!(%error, path = %path.display(), "scheduler: failed to open destination file");
            Err(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use danejoe_store::{BlockEntity, InMemoryBlockStore, InMemoryTaskStore, Operation};
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

    fn dest_path(dir: &tempfile::TempDir, name: &str) -> String {
        dir.path().join(name).to_string_lossy().into_owned()
    }

    fn sample_task(task_id: i64, saved_path: String) -> TaskEntity {
        TaskEntity {
            task_id,
            file_id: 1,
            saved_path,
            source_url: "danejoe://example.com".to_string(),
            operation: Operation::Download,
            state: TaskState::Waiting,
            start_time: None,
            end_time: None,
        }
    }

    fn sample_block(block_id: i64, task_id: i64, offset: i64, block_size: i64) -> BlockEntity {
        BlockEntity {
            block_id,
            task_id,
            file_id: 1,
            offset,
            block_size,
            state: TaskState::Waiting,
            start_time: None,
            end_time: None,
        }
    }

    fn endpoint() -> Endpoint {
        Endpoint::parse("danejoe://example.com:8080").unwrap()
    }

    #[test]
    fn single_block_task_completes_after_one_response() {
        let tmp = tempfile::tempdir().unwrap();
        let path = dest_path(&tmp, "out.bin");

        let mut block_store = InMemoryBlockStore::new();
        let mut task_store = InMemoryTaskStore::new();
        let block = block_store.add(sample_block(-1, 1, 0, 4)).unwrap();
        let task = task_store.add(sample_task(-1, path.clone())).unwrap();
        let task_id = task.task_id;

        let mut scheduler = BlockScheduler::new(block_store, task_store);
        scheduler.on_task_enqueue((), endpoint(), task).unwrap();
        assert_eq!(scheduler.queued_request_count(), 1);

        scheduler.on_block_response(BlockResponse {
            block_id: block.block_id,
            file_id: 1,
            task_id,
            offset: 0,
            block_size: 4,
            data: vec![1, 2, 3, 4],
        });

        assert_eq!(scheduler.take_completed_tasks(), vec![task_id]);
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn multi_block_task_completes_once_all_waiting_blocks_clear() {
        let tmp = tempfile::tempdir().unwrap();
        let path = dest_path(&tmp, "out.bin");

        let mut block_store = InMemoryBlockStore::new();
        let mut task_store = InMemoryTaskStore::new();
        let b0 = block_store.add(sample_block(-1, 1, 0, 2)).unwrap();
        let b1 = block_store.add(sample_block(-1, 1, 2, 2)).unwrap();
        let task = task_store.add(sample_task(-1, path.clone())).unwrap();
        let task_id = task.task_id;

        let mut scheduler = BlockScheduler::new(block_store, task_store);
        scheduler.on_task_enqueue((), endpoint(), task).unwrap();

        scheduler.on_block_response(BlockResponse {
            block_id: b1.block_id,
            file_id: 1,
            task_id,
            offset: 2,
            block_size: 2,
            data: vec![3, 4],
        });
        assert!(scheduler.take_completed_tasks().is_empty());

        scheduler.on_block_response(BlockResponse {
            block_id: b0.block_id,
            file_id: 1,
            task_id,
            offset: 0,
            block_size: 2,
            data: vec![1, 2],
        });
        assert_eq!(scheduler.take_completed_tasks(), vec![task_id]);
        assert_eq!(std::fs::read(&path).unwrap(), vec![1, 2, 3, 4]);
    }

    #[test]
    fn oversized_declared_block_size_fails_the_block_without_panicking() {
        let tmp = tempfile::tempdir().unwrap();
        let path = dest_path(&tmp, "out.bin");

        let mut block_store = InMemoryBlockStore::new();
        let mut task_store = InMemoryTaskStore::new();
        let block = block_store.add(sample_block(-1, 1, 0, 10)).unwrap();
        let task = task_store.add(sample_task(-1, path)).unwrap();
        let task_id = task.task_id;

        let mut scheduler = BlockScheduler::new(block_store, task_store);
        scheduler.on_task_enqueue((), endpoint(), task).unwrap();

        scheduler.on_block_response(BlockResponse {
            block_id: block.block_id,
            file_id: 1,
            task_id,
            offset: 0,
            block_size: 10,
            data: vec![1, 2, 3],
        });

        assert!(scheduler.take_completed_tasks().is_empty());
    }

    #[test]
    fn task_with_no_blocks_completes_immediately_and_touches_the_file() {
        let tmp = tempfile::tempdir().unwrap();
        let path = dest_path(&tmp, "out.bin");

        let block_store = InMemoryBlockStore::new();
        let mut task_store = InMemoryTaskStore::new();
        let task = task_store.add(sample_task(-1, path.clone())).unwrap();
        let task_id = task.task_id;

        let mut scheduler = BlockScheduler::new(block_store, task_store);
        scheduler.on_task_enqueue((), endpoint(), task).unwrap();

        assert_eq!(scheduler.take_completed_tasks(), vec![task_id]);
        assert_eq!(std::fs::read(&path).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn cancel_drops_response_with_no_write() {
        let tmp = tempfile::tempdir().unwrap();
        let path = dest_path(&tmp, "out.bin");

        let mut block_store = InMemoryBlockStore::new();
        let mut task_store = InMemoryTaskStore::new();
        let block = block_store.add(sample_block(-1, 1, 0, 4)).unwrap();
        let task = task_store.add(sample_task(-1, path.clone())).unwrap();
        let task_id = task.task_id;

        let mut scheduler = BlockScheduler::new(block_store, task_store);
        scheduler.on_task_enqueue((), endpoint(), task).unwrap();
        scheduler.on_task_cancel(task_id);

        scheduler.on_block_response(BlockResponse {
            block_id: block.block_id,
            file_id: 1,
            task_id,
            offset: 0,
            block_size: 4,
            data: vec![1, 2, 3, 4],
        });

        assert!(scheduler.take_completed_tasks().is_empty());
        assert!(!std::path::Path::new(&path).exists());
    }

    #[test]
    fn paused_task_requeues_without_dispatching() {
        let mut block_store = InMemoryBlockStore::new();
        let task_store = InMemoryTaskStore::new();
        block_store.add(sample_block(-1, 1, 0, 4)).unwrap();

        let mut scheduler = BlockScheduler::new(block_store, task_store);
        scheduler
            .on_task_enqueue((), endpoint(), sample_task(1, "/tmp/out.bin".to_string()))
            .unwrap();
        scheduler.on_task_paused(1, true);

        let mut correlator: Correlator<()> = Correlator::new();
        let mut session = TransportSession::new(SinkStream::default());
        scheduler.on_block_request(&mut correlator, &mut session).unwrap();

        assert_eq!(scheduler.queued_request_count(), 1);
        assert_eq!(correlator.pending_count(), 0);
        assert!(session.inner().written.is_empty());
    }

    #[test]
    fn unpaused_task_dispatches_through_correlator() {
        let mut block_store = InMemoryBlockStore::new();
        let task_store = InMemoryTaskStore::new();
        block_store.add(sample_block(-1, 1, 0, 4)).unwrap();

        let mut scheduler = BlockScheduler::new(block_store, task_store);
        scheduler
            .on_task_enqueue((), endpoint(), sample_task(1, "/tmp/out.bin".to_string()))
            .unwrap();

        let mut correlator: Correlator<()> = Correlator::new();
        let mut session = TransportSession::new(SinkStream::default());
        scheduler.on_block_request(&mut correlator, &mut session).unwrap();

        assert_eq!(scheduler.queued_request_count(), 0);
        assert_eq!(correlator.pending_count(), 1);
        assert!(!session.inner().written.is_empty());
    }
}
