//! Mblaze query façade

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::config::Tools;
use crate::error::Result;
use crate::models::{Directory, Message};
use crate::source::{CommandSource, LineSource};
use crate::tree::{build_directories, parse_threads};

/// `mscan` format producing one five-line record per message
pub const SCAN_FORMAT: &str = r"%i%R\n%u\n%s\n%f\n%D";

/// Message counts for one directory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryCounts {
    pub total: usize,
    pub unseen: usize,
}

/// Entry point for listing directories and messages through mblaze
///
/// Cheap to clone: clones share the same line source, so a clone can be
/// moved onto a worker thread.
#[derive(Clone)]
pub struct Mblaze {
    source: Arc<dyn LineSource>,
    tools: Tools,
}

impl Mblaze {
    /// Create a façade over the given line source
    pub fn new(source: Arc<dyn LineSource>, tools: Tools) -> Self {
        Self { source, tools }
    }

    /// Create a façade that spawns the configured programs
    pub fn with_commands(tools: Tools) -> Self {
        Self::new(Arc::new(CommandSource::new()), tools)
    }

    /// List the maildirs below `roots` as a merged directory tree
    pub fn list_directories<S: AsRef<str>>(&self, roots: &[S]) -> Result<Vec<Directory>> {
        let mut args = vec!["-a".to_string()];
        args.extend(roots.iter().map(|root| root.as_ref().to_string()));

        let paths = self.source.run(&self.tools.mdirs, &args, &[])?;
        let directories = build_directories(&paths);

        info!(
            "Found {} maildirs under {} roots ({} top-level entries)",
            paths.len(),
            roots.len(),
            directories.len()
        );
        Ok(directories)
    }

    /// Count all messages in a maildir
    pub fn count_total(&self, dir_path: &str) -> Result<usize> {
        let paths = self.source.run(&self.tools.mlist, &[dir_path.to_string()], &[])?;
        Ok(paths.len())
    }

    /// Count unseen messages in a maildir
    pub fn count_unseen(&self, dir_path: &str) -> Result<usize> {
        let args = ["-s".to_string(), dir_path.to_string()];
        let paths = self.source.run(&self.tools.mlist, &args, &[])?;
        Ok(paths.len())
    }

    /// Count both total and unseen messages in a maildir
    pub fn count(&self, dir_path: &str) -> Result<DirectoryCounts> {
        Ok(DirectoryCounts {
            total: self.count_total(dir_path)?,
            unseen: self.count_unseen(dir_path)?,
        })
    }

    /// List the messages of a maildir as conversation threads
    ///
    /// Runs `mlist`, pipes the paths through `mthread -r` and formats the
    /// result with `mscan`.
    pub fn list_messages(&self, dir_path: &str) -> Result<Vec<Message>> {
        let paths = self.source.run(&self.tools.mlist, &[dir_path.to_string()], &[])?;
        let threaded = self.source.run(&self.tools.mthread, &["-r".to_string()], &paths)?;
        let scan_args = ["-f".to_string(), SCAN_FORMAT.to_string()];
        let lines = self.source.run(&self.tools.mscan, &scan_args, &threaded)?;

        let threads = parse_threads(&lines)?;
        debug!(
            "Parsed {} threads ({} messages) in {}",
            threads.len(),
            threads.iter().map(Message::count).sum::<usize>(),
            dir_path
        );
        Ok(threads)
    }

    /// Render a message for display
    ///
    /// Returns an empty string without running anything if the message
    /// file no longer exists.
    pub fn fetch_message_body(&self, msg_path: &str) -> Result<String> {
        if !Path::new(msg_path).exists() {
            debug!("Message {} is gone, nothing to show", msg_path);
            return Ok(String::new());
        }

        let lines = self.source.run(&self.tools.mshow, &[msg_path.to_string()], &[])?;
        Ok(lines.join("\n"))
    }
}
