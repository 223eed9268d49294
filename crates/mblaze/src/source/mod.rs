//! Line-stream sources
//!
//! Every query runs an external program and consumes its stdout as lines.
//! The trait lets the query façade run against real processes or against
//! scripted replies in tests.

mod command;
mod scripted;
mod traits;

pub use command::{CommandSource, split_lines};
pub use scripted::{Invocation, ScriptedSource};
pub use traits::LineSource;
