//! Message model representing a node in a conversation thread

use serde::{Deserialize, Serialize};

/// Display status of a message
///
/// The first four come from the single-character status column of the
/// scan output. `Virtual` is never read from input: it marks a message
/// whose file no longer exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Seen,
    Flagged,
    Unseen,
    Trashed,
    Virtual,
}

impl Status {
    /// Map a scan status code to a status.
    ///
    /// Returns `None` for unknown codes and for the virtual code, which is
    /// only meaningful for messages whose file is gone.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            " " => Some(Status::Seen),
            "*" => Some(Status::Flagged),
            "." => Some(Status::Unseen),
            "x" => Some(Status::Trashed),
            _ => None,
        }
    }

    /// Whether the code is one the scan tool may emit, virtual included
    pub fn is_known_code(code: &str) -> bool {
        code == Status::Virtual.code() || Status::from_code(code).is_some()
    }

    /// The scan status code for this status
    pub fn code(&self) -> &'static str {
        match self {
            Status::Seen => " ",
            Status::Flagged => "*",
            Status::Unseen => ".",
            Status::Trashed => "x",
            Status::Virtual => "v",
        }
    }

    /// Icon name shown next to messages with this status
    pub fn icon(&self) -> &'static str {
        match self {
            Status::Seen => "file",
            Status::Flagged => "flag",
            Status::Unseen => "mail",
            Status::Trashed => "trash",
            Status::Virtual => "eye-off",
        }
    }
}

/// A message and its replies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Filesystem path of the message, unique within a listing
    pub path: String,
    /// Display status
    pub status: Status,
    /// Subject line, verbatim from the scan output
    pub subject: String,
    /// Sender, verbatim from the scan output
    pub sender: String,
    /// Date, verbatim from the scan output
    pub date: String,
    /// Replies, in input order
    #[serde(default)]
    pub children: Vec<Message>,
}

impl Message {
    /// Number of messages in this subtree, including this one
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(Message::count).sum::<usize>()
    }
}
