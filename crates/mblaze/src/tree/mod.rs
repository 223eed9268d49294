//! Tree reconstruction from flat tool output
//!
//! Both builders are pure: they take lines and return freshly owned trees.

mod directories;
mod threads;

pub use directories::{build_directories, split_segments};
pub use threads::{RECORD_LINES, parse_depth, parse_threads, parse_threads_with};
