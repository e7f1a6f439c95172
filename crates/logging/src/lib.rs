#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `danejoe-logging` bootstraps a single [`tracing_subscriber`] subscriber
//! for the `danejoe-cli` binary, mapping a small `-v`-style repeat-count
//! flag onto the `tracing` level hierarchy the rest of the workspace logs
//! through.
//!
//! # Design
//!
//! There is exactly one entry point, [`init`]; it is not meant to be
//! called more than once per process (a second call is harmless but
//! replaces nothing — `tracing`'s global subscriber can only be set
//! once and a second attempt is silently ignored).
//!
//! # Errors
//!
//! This crate has no fallible operations; subscriber initialization
//! failures (the process already installed one) are swallowed, matching
//! `tracing`'s own `set_global_default` contract.

use tracing_subscriber::EnvFilter;

/// How chatty the subscriber should be, derived from a repeated `-v` flag.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verbosity {
    /// Warnings and errors only.
    Quiet,
    /// Warnings, errors, and high-level progress (`info`).
    Normal,
    /// Adds per-block scheduling detail (`debug`).
    Verbose,
    /// Adds wire-level frame tracing (`trace`).
    Loud,
}

impl Verbosity {
    /// Maps a repeat count of the CLI's `-v` flag (0 = not passed) to a
    /// verbosity level.
    #[must_use]
    pub fn from_occurrences(count: u8) -> Verbosity {
        match count {
            0 => Verbosity::Normal,
            1 => Verbosity::Verbose,
            _ => Verbosity::Loud,
        }
    }

    fn filter_directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Normal => "info",
            Verbosity::Verbose => "debug",
            Verbosity::Loud => "trace",
        }
    }
}

/// Installs a process-wide `tracing` subscriber at `verbosity`,
/// respecting `RUST_LOG` if it is set (it takes precedence over
/// `verbosity`).
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.filter_directive()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
