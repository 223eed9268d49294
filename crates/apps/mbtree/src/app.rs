//! Application state and background dispatch for mbtree

use anyhow::{Context, Result};
use log::{debug, error, info};
use mblaze::{Directory, DirectoryCounts, Executor, Mblaze, Message};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How long one wait on the main queue may block before re-checking
const PUMP_TICK: Duration = Duration::from_millis(100);

/// What the views display
///
/// Updated only by callbacks running on the main thread.
#[derive(Debug, Default)]
pub struct ViewState {
    /// Directory whose messages are (being) listed
    pub selected_directory: Option<String>,
    /// Message whose body is (being) shown
    pub selected_message: Option<String>,
    /// Counts per selectable directory path
    pub counts: HashMap<String, DirectoryCounts>,
    /// Threads of the selected directory
    pub messages: Option<Vec<Message>>,
    /// Body of the selected message
    pub body: Option<String>,
    /// Failures reported by background queries
    pub errors: Vec<String>,
}

/// Root application state
pub struct MbtreeApp {
    mblaze: Mblaze,
    executor: Executor,
    state: Arc<Mutex<ViewState>>,
    /// Callbacks dispatched but not yet run
    outstanding: usize,
}

impl MbtreeApp {
    pub fn new(mblaze: Mblaze, executor: Executor) -> Self {
        Self {
            mblaze,
            executor,
            state: Arc::new(Mutex::new(ViewState::default())),
            outstanding: 0,
        }
    }

    /// Shared view state
    pub fn state(&self) -> &Arc<Mutex<ViewState>> {
        &self.state
    }

    /// List directories below `roots` on a worker and wait for the tree
    pub fn load_directories(&self, roots: Vec<String>) -> Result<Vec<Directory>> {
        let mblaze = self.mblaze.clone();
        let directories = self
            .executor
            .call_worker(move || mblaze.list_directories(&roots))
            .wait()?
            .context("Failed to list directories")?;
        Ok(directories)
    }

    /// Request unseen/total counts for every selectable directory
    pub fn load_counts(&mut self, directories: &[Directory]) {
        for directory in directories {
            for path in directory.leaf_paths() {
                let mblaze = self.mblaze.clone();
                let state = self.state.clone();
                let key = path.to_string();
                let dir_path = key.clone();

                self.outstanding += 1;
                self.executor.call_worker_then(
                    move || mblaze.count(&dir_path),
                    move |result: mblaze::Result<DirectoryCounts>| {
                        let mut state = state.lock().unwrap();
                        match result {
                            Ok(counts) => {
                                state.counts.insert(key, counts);
                            }
                            Err(e) => {
                                error!("Failed to count {}: {}", key, e);
                                state.errors.push(format!("{}: {}", key, e));
                            }
                        }
                    },
                );
            }
        }
    }

    /// Select a directory and request its threads
    ///
    /// Results for a directory that is no longer selected when they arrive
    /// are discarded.
    pub fn select_directory(&mut self, dir_path: &str) {
        {
            let mut state = self.state.lock().unwrap();
            if state.selected_directory.as_deref() == Some(dir_path) {
                return;
            }
            state.selected_directory = Some(dir_path.to_string());
            state.messages = None;
        }

        info!("Listing messages in {}", dir_path);

        let mblaze = self.mblaze.clone();
        let state = self.state.clone();
        let key = dir_path.to_string();
        let dir_path = key.clone();

        self.outstanding += 1;
        self.executor.call_worker_then(
            move || mblaze.list_messages(&dir_path),
            move |result: mblaze::Result<Vec<Message>>| {
                let mut state = state.lock().unwrap();
                if state.selected_directory.as_deref() != Some(key.as_str()) {
                    debug!("Discarding stale message list for {}", key);
                    return;
                }
                match result {
                    Ok(messages) => state.messages = Some(messages),
                    Err(e) => {
                        error!("Failed to list messages in {}: {}", key, e);
                        state.errors.push(format!("{}: {}", key, e));
                    }
                }
            },
        );
    }

    /// Select a message and request its rendered body
    pub fn select_message(&mut self, msg_path: &str) {
        {
            let mut state = self.state.lock().unwrap();
            if state.selected_message.as_deref() == Some(msg_path) {
                return;
            }
            state.selected_message = Some(msg_path.to_string());
            state.body = None;
        }

        let mblaze = self.mblaze.clone();
        let state = self.state.clone();
        let key = msg_path.to_string();
        let msg_path = key.clone();

        self.outstanding += 1;
        self.executor.call_worker_then(
            move || mblaze.fetch_message_body(&msg_path),
            move |result: mblaze::Result<String>| {
                let mut state = state.lock().unwrap();
                if state.selected_message.as_deref() != Some(key.as_str()) {
                    debug!("Discarding stale body for {}", key);
                    return;
                }
                match result {
                    Ok(body) => state.body = Some(body),
                    Err(e) => {
                        error!("Failed to show {}: {}", key, e);
                        state.errors.push(format!("{}: {}", key, e));
                    }
                }
            },
        );
    }

    /// Run main-thread callbacks until every dispatched request has reported back
    pub fn pump(&mut self) {
        while self.outstanding > 0 {
            let ran = self.executor.wait_main(PUMP_TICK);
            self.outstanding = self.outstanding.saturating_sub(ran);
        }
    }

    /// Stop the executor
    pub fn shutdown(self) {
        let dropped = self.executor.stop();
        if dropped > 0 {
            debug!("{} callbacks dropped at shutdown", dropped);
        }
    }
}
