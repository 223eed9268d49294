//! Error type shared by the line source, the parsers and the executor

use std::io;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by mblaze operations
///
/// A missing message file is never an error: the thread parser marks such
/// messages as virtual and body fetching returns an empty string.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} exited with {status}: {stderr}", status = exit_code_display(.code))]
    Process {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Unsupported status {code:?} for message {path}")]
    UnsupportedStatus { path: String, code: String },

    #[error("Truncated input: record needs {expected} lines, got {got}")]
    TruncatedInput { expected: usize, got: usize },

    #[error("Worker finished without delivering a result")]
    WorkerLost,

    #[error("Failed to start executor: {0}")]
    ExecutorStart(String),
}

fn exit_code_display(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status".to_string(),
    }
}

impl Error {
    /// Whether the error came from running an external program
    pub fn is_process(&self) -> bool {
        matches!(self, Error::Spawn { .. } | Error::Process { .. })
    }
}
