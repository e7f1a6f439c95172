//! Task, block, and file record types shared by every store implementation.

use std::fmt;
use std::str::FromStr;
use std::time::SystemTime;

/// Lifecycle state shared by [`TaskEntity`] and [`BlockEntity`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum TaskState {
    /// Created, no request emitted yet.
    Waiting,
    /// Reserved for future use; the scheduler never produces this
    /// transition today (see `DESIGN.md`).
    InTransfer,
    /// Finished successfully.
    Completed,
    /// Finished with an unrecoverable error.
    Failed,
    /// Placeholder for a state string the store cannot interpret.
    Unknown,
}

/// Lifecycle state of one [`BlockEntity`]. Same variant set as
/// [`TaskState`], kept as a distinct type since a block and its owning
/// task can be in different states simultaneously.
pub type BlockState = TaskState;

impl fmt::Display for TaskState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TaskState::Waiting => "Waiting",
            TaskState::InTransfer => "InTransfer",
            TaskState::Completed => "Completed",
            TaskState::Failed => "Failed",
            TaskState::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

impl FromStr for TaskState {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Waiting" => TaskState::Waiting,
            "InTransfer" => TaskState::InTransfer,
            "Completed" => TaskState::Completed,
            "Failed" => TaskState::Failed,
            _ => TaskState::Unknown,
        })
    }
}

/// What a task does with its file: only `Download` is exercised by the
/// scheduler, `Upload` is a stub matching the source's scope.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Operation {
    /// Unrecognised or unset.
    Unknown,
    /// Pull a file from the server.
    Download,
    /// Push a file to the server (not implemented; stub variant only).
    Upload,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Operation::Unknown => "Unknown",
            Operation::Download => "Download",
            Operation::Upload => "Upload",
        };
        f.write_str(s)
    }
}

impl FromStr for Operation {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "Download" => Operation::Download,
            "Upload" => Operation::Upload,
            _ => Operation::Unknown,
        })
    }
}

/// A download or upload task: one source URL, one destination file.
#[derive(Clone, Debug, PartialEq)]
pub struct TaskEntity {
    /// Unique, monotonically assigned at creation (`max(existing) + 1`).
    pub task_id: i64,
    /// The file this task transfers.
    pub file_id: i64,
    /// Full absolute destination file path (never a bare directory; see
    /// `DESIGN.md`'s Open Question resolution).
    pub saved_path: String,
    /// Where the file came from.
    pub source_url: String,
    /// Download or upload.
    pub operation: Operation,
    /// Current lifecycle state.
    pub state: TaskState,
    /// When the task was created.
    pub start_time: Option<SystemTime>,
    /// When the task reached a terminal state.
    pub end_time: Option<SystemTime>,
}

/// One contiguous byte range of a task's file.
#[derive(Clone, Debug, PartialEq)]
pub struct BlockEntity {
    /// Store-assigned identifier.
    pub block_id: i64,
    /// Owning task.
    pub task_id: i64,
    /// Owning file.
    pub file_id: i64,
    /// Byte offset within the file.
    pub offset: i64,
    /// Block size; only the final block of a file may be shorter than the
    /// task's configured block size.
    pub block_size: i64,
    /// Current lifecycle state.
    pub state: BlockState,
    /// When the request for this block was first issued.
    pub start_time: Option<SystemTime>,
    /// When this block reached a terminal state.
    pub end_time: Option<SystemTime>,
}

/// Metadata the server returns for a file id.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientFileEntity {
    /// Server-assigned file identifier.
    pub file_id: i64,
    /// Source from the server; usable as a default local file name.
    pub file_name: String,
    /// Total file size in bytes.
    pub file_size: i64,
    /// MD5 checksum; may be empty if the server did not supply one.
    pub md5_code: String,
}
