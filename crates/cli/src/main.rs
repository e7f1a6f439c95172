#![deny(unsafe_code)]

//! Single-threaded event loop: resolves a `danejoe://` endpoint, requests
//! a file's metadata, schedules its blocks, and writes them to disk.

mod args;
mod blocks;
mod error;

use std::net::ToSocketAddrs;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::Parser;
use mio::net::TcpStream;
use mio::{Events, Interest, Poll, Token};

use danejoe_logging::Verbosity;
use danejoe_protocol::{build_download_request, parse_block_response, parse_download_response, parse_response};
use danejoe_scheduler::{BlockScheduler, Correlator};
use danejoe_store::{FileStore, InMemoryBlockStore, InMemoryFileStore, InMemoryTaskStore, Operation, TaskState};
use danejoe_transport::{Endpoint, TransportSession};

use args::Args;
use blocks::split_into_blocks;
use error::CliError;

/// Tags a pending correlator entry with how to interpret its response.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum RequestKind {
    Download,
    Block,
}

const SERVER_TOKEN: Token = Token(0);
const POLL_TIMEOUT: Duration = Duration::from_millis(1000);

fn main() -> ExitCode {
    let args = Args::parse();
    danejoe_logging::init(Verbosity::from_occurrences(args.verbose));

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(%error, "transfer failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), CliError> {
    let endpoint = Endpoint::parse(&args.url).map_err(CliError::InvalidUrl)?;
    let socket_addr = endpoint
        .socket_addr_string()
        .to_socket_addrs()
        .map_err(CliError::Connect)?
        .next()
        .ok_or_else(|| CliError::Connect(std::io::Error::other("no address resolved")))?;

    let mut stream = TcpStream::connect(socket_addr).map_err(CliError::Connect)?;
    let mut poll = Poll::new().map_err(CliError::Reactor)?;
    poll.registry()
        .register(&mut stream, SERVER_TOKEN, Interest::READABLE | Interest::WRITABLE)
        .map_err(CliError::Reactor)?;
    let mut events = Events::with_capacity(16);

    let mut session = TransportSession::new(stream);
    let mut correlator: Correlator<RequestKind> = Correlator::new();
    let mut scheduler: BlockScheduler<RequestKind, InMemoryBlockStore, InMemoryTaskStore> =
        BlockScheduler::new(InMemoryBlockStore::new(), InMemoryTaskStore::new());
    let mut file_store = InMemoryFileStore::new();

    correlator.send_request(&mut session, RequestKind::Download, |request_id| {
        build_download_request(args.file_id, request_id)
    })?;

    let mut task_id: Option<i64> = None;
    let mut last_tick = Instant::now();
    let tick_interval = Duration::from_millis(scheduler.block_request_interval_ms());

    loop {
        poll.poll(&mut events, Some(POLL_TIMEOUT)).map_err(CliError::Reactor)?;

        for event in events.iter() {
            if event.token() != SERVER_TOKEN {
                continue;
            }
            if event.is_readable() {
                let frames = session.read()?;
                for frame in frames {
                    handle_frame(
                        &frame,
                        &args,
                        &endpoint,
                        &mut correlator,
                        &mut scheduler,
                        &mut file_store,
                        &mut task_id,
                    )?;
                }
            }
            if event.is_writable() {
                session.flush_pending()?;
            }
        }

        let now = Instant::now();
        if now.duration_since(last_tick) >= tick_interval {
            last_tick = now;
            scheduler.on_block_request(&mut correlator, &mut session)?;
            correlator.sweep_expired(now);
        }

        for completed in scheduler.take_completed_tasks() {
            if Some(completed) == task_id {
                tracing::info!(task_id = completed, "transfer complete");
                return Ok(());
            }
        }
    }
}

fn handle_frame(
    frame: &[u8],
    args: &Args,
    endpoint: &Endpoint,
    correlator: &mut Correlator<RequestKind>,
    scheduler: &mut BlockScheduler<RequestKind, InMemoryBlockStore, InMemoryTaskStore>,
    file_store: &mut InMemoryFileStore,
    task_id: &mut Option<i64>,
) -> Result<(), CliError> {
    let envelope = parse_response(frame)?;
    let Some(kind) = correlator.on_response(envelope.request_id) else {
        return Ok(());
    };

    match kind {
        RequestKind::Download => {
            let download = parse_download_response(&envelope.body)?;
            tracing::info!(
                file_id = download.file_id,
                file_name = %download.file_name,
                file_size = download.file_size,
                "resolved file metadata"
            );
            let file_record = file_store
                .add(danejoe_store::ClientFileEntity {
                    file_id: download.file_id,
                    file_name: download.file_name,
                    file_size: download.file_size,
                    md5_code: download.md5_code,
                })
                .map_err(danejoe_scheduler::SchedulerError::Store)?;

            let task = danejoe_store::TaskEntity {
                task_id: -1,
                file_id: file_record.file_id,
                saved_path: args.destination.clone(),
                source_url: args.url.clone(),
                operation: Operation::Download,
                state: TaskState::Waiting,
                start_time: Some(std::time::SystemTime::now()),
                end_time: None,
            };
            let blocks = split_into_blocks(file_record.file_id, file_record.file_size, args.block_bytes);
            let stored_task =
                scheduler.seed_and_enqueue(RequestKind::Block, endpoint.clone(), task, blocks)?;
            *task_id = Some(stored_task.task_id);
        }
        RequestKind::Block => {
            let response = parse_block_response(&envelope.body)?;
            scheduler.on_block_response(response);
        }
    }
    Ok(())
}
