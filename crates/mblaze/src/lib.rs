//! Mblaze crate - Directory and thread listings for maildirs via mblaze
//!
//! This crate drives the mblaze command-line tools and turns their line
//! output into trees a front-end can display:
//! - Domain models (Directory, Message, Status)
//! - Line sources for running the tools (real processes or scripted)
//! - Directory tree building and thread parsing
//! - Query façade composing the above
//! - Executor for running blocking queries off the UI thread
//!
//! This crate has zero UI dependencies.

pub mod config;
pub mod error;
pub mod executor;
pub mod models;
pub mod query;
pub mod source;
pub mod tree;

pub use config::{Settings, Tools};
pub use error::{Error, Result};
pub use executor::{Executor, MainHandle, WorkHandle};
pub use models::{Directory, Message, Status};
pub use query::{DirectoryCounts, Mblaze, SCAN_FORMAT};
pub use source::{CommandSource, Invocation, LineSource, ScriptedSource};
pub use tree::{build_directories, parse_threads, parse_threads_with};
