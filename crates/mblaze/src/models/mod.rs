//! Domain models for mail directories and threaded messages

mod directory;
mod message;

pub use directory::Directory;
pub use message::{Message, Status};
