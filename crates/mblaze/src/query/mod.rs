//! Query API for front-end consumption
//!
//! Composes the line source with the tree builders. Every call blocks on
//! external processes and returns a freshly built tree.

mod service;

pub use service::{DirectoryCounts, Mblaze, SCAN_FORMAT};
