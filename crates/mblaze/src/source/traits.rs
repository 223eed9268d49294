//! Line source trait definition

use crate::error::Result;

/// Trait for running a program and collecting its output lines
///
/// Implementations must be shareable across worker threads since queries
/// are dispatched off the consuming thread.
pub trait LineSource: Send + Sync {
    /// Run `program` with `args`, feeding `input` joined by newlines on stdin.
    ///
    /// Returns stdout split into lines without terminators. Fails when the
    /// program cannot be started or exits with a non-zero status.
    fn run(&self, program: &str, args: &[String], input: &[String]) -> Result<Vec<String>>;
}
