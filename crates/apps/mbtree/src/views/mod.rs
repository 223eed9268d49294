//! Plain-text views for mbtree

mod directories;
mod threads;

pub use directories::render_directories;
pub use threads::{render_body, render_threads};
