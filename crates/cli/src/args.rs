//! Command-line surface: a `danejoe://` server, a file id, and a
//! destination path.

use clap::Parser;

use crate::blocks::DEFAULT_BLOCK_BYTES;

/// Downloads one file from a danejoe transfer server.
#[derive(Parser, Debug)]
#[command(name = "danejoe-transfer", about = "Block-scheduled file transfer client")]
pub struct Args {
    /// Server URL, e.g. `danejoe://example.com:8080`.
    pub url: String,
    /// File id to download, as reported by the server.
    pub file_id: i64,
    /// Destination path for the downloaded file.
    pub destination: String,
    /// Block size in bytes requested per `/block` call.
    #[arg(long, default_value_t = DEFAULT_BLOCK_BYTES)]
    pub block_bytes: i64,
    /// Increase log verbosity (repeatable: `-v`, `-vv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
