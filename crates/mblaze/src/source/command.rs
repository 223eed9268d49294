//! Process-backed line source

use log::{debug, warn};
use std::io::{self, Write};
use std::process::{Command, Stdio};
use std::thread;
use std::time::Instant;

use super::LineSource;
use crate::error::{Error, Result};

/// Line source that spawns real processes
///
/// Input is written from a separate thread so a program that produces
/// output before draining its stdin cannot deadlock against us.
#[derive(Debug, Clone, Default)]
pub struct CommandSource;

impl CommandSource {
    /// Create a new process-backed source
    pub fn new() -> Self {
        Self
    }
}

impl LineSource for CommandSource {
    fn run(&self, program: &str, args: &[String], input: &[String]) -> Result<Vec<String>> {
        let start = Instant::now();

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::Spawn {
                program: program.to_string(),
                source,
            })?;

        let stdin = child.stdin.take();
        let payload = input.join("\n");
        let writer = thread::spawn(move || -> io::Result<()> {
            if let Some(mut stdin) = stdin {
                stdin.write_all(payload.as_bytes())?;
            }
            Ok(())
        });

        let output = child.wait_with_output()?;

        match writer.join() {
            Ok(Ok(())) => {}
            // The program exited without reading all of its input
            Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
                debug!("{} closed stdin early", program);
            }
            Ok(Err(e)) => return Err(Error::Io(e)),
            Err(_) => return Err(Error::Io(io::Error::other("stdin writer panicked"))),
        }

        if !output.status.success() {
            return Err(Error::Process {
                program: program.to_string(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout).unwrap_or_else(|e| {
            warn!("{} produced invalid UTF-8, decoding lossily", program);
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        });
        let lines = split_lines(&stdout);

        debug!(
            "{} {:?}: {} input lines, {} output lines in {:?}",
            program,
            args,
            input.len(),
            lines.len(),
            start.elapsed()
        );

        Ok(lines)
    }
}

/// Split process output into lines.
///
/// Line terminators (`\n` or `\r\n`) are stripped and a final empty
/// segment after the last terminator is dropped. Whitespace-only lines are
/// kept as-is since a lone space is a meaningful status code.
pub fn split_lines(text: &str) -> Vec<String> {
    text.lines().map(str::to_string).collect()
}
