//! Thread parsing
//!
//! `mscan` prints one record of five lines per message:
//!
//! ```text
//! <depth prefix><path>
//! <status code>
//! <subject>
//! <sender>
//! <date>
//! ```
//!
//! The depth prefix is either one space per nesting level, or for deep
//! threads `..N..` where the depth is `N - 1`. Records arrive in thread
//! order, so a message at depth `d` is a reply to the last message seen at
//! depth `d - 1`.

use std::path::Path;

use crate::error::{Error, Result};
use crate::models::{Message, Status};

/// Number of lines making up one message record
pub const RECORD_LINES: usize = 5;

/// Sentinel starting an explicit numeric depth marker
const DEPTH_SENTINEL: &str = "..";

/// Parse scan records into a thread forest, checking message files on disk.
pub fn parse_threads<I, S>(lines: I) -> Result<Vec<Message>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    parse_threads_with(lines, |path| Path::new(path).exists())
}

/// Parse scan records into a thread forest using `exists` to decide
/// whether a message file is still present.
///
/// Messages whose file is missing are marked [`Status::Virtual`]. Depth
/// jumps deeper than the current thread are clamped to the deepest
/// available parent. Any malformed record fails the whole call.
pub fn parse_threads_with<I, S, F>(lines: I, exists: F) -> Result<Vec<Message>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
    F: Fn(&str) -> bool,
{
    let mut lines = lines.into_iter();
    let mut roots: Vec<Message> = Vec::new();
    let mut anchors: Vec<usize> = Vec::new();

    loop {
        let mut record: Vec<String> = Vec::with_capacity(RECORD_LINES);
        for line in lines.by_ref().take(RECORD_LINES) {
            record.push(line.as_ref().to_string());
        }

        match record.len() {
            0 => break,
            RECORD_LINES => {}
            got => {
                return Err(Error::TruncatedInput {
                    expected: RECORD_LINES,
                    got,
                });
            }
        }

        let (depth, message) = parse_record(record, &exists)?;
        insert(&mut roots, &mut anchors, depth, message);
    }

    Ok(roots)
}

/// Split the first record line into its depth and the message path
pub fn parse_depth(line: &str) -> (usize, &str) {
    if let Some(rest) = line.strip_prefix(DEPTH_SENTINEL) {
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        let depth = rest[..digits]
            .parse::<usize>()
            .map(|n| n.saturating_sub(1))
            .unwrap_or(0);
        let rest = &rest[digits..];
        let path = rest
            .strip_prefix(DEPTH_SENTINEL)
            .or_else(|| rest.strip_prefix('.'))
            .unwrap_or(rest);
        return (depth, path);
    }

    let path = line.trim_start_matches(' ');
    (line.len() - path.len(), path)
}

/// Resolve the status of a message, overriding it when the file is gone
fn resolve_status(path: &str, code: &str, exists: &impl Fn(&str) -> bool) -> Result<Status> {
    let unsupported = || Error::UnsupportedStatus {
        path: path.to_string(),
        code: code.to_string(),
    };

    if !exists(path) {
        return if Status::is_known_code(code) {
            Ok(Status::Virtual)
        } else {
            Err(unsupported())
        };
    }

    Status::from_code(code).ok_or_else(unsupported)
}

fn parse_record(record: Vec<String>, exists: &impl Fn(&str) -> bool) -> Result<(usize, Message)> {
    let [first, code, subject, sender, date]: [String; RECORD_LINES] = record
        .try_into()
        .map_err(|record: Vec<String>| Error::TruncatedInput {
            expected: RECORD_LINES,
            got: record.len(),
        })?;

    let (depth, path) = parse_depth(&first);
    let status = resolve_status(path, &code, exists)?;

    Ok((
        depth,
        Message {
            path: path.to_string(),
            status,
            subject,
            sender,
            date,
            children: Vec::new(),
        },
    ))
}

/// Append `message` at `depth` below the most recent message of each level.
///
/// `anchors` holds the child index taken at each level to reach the last
/// inserted message, so `anchors.len()` is the deepest level a new message
/// can attach to. Deeper requests are clamped to it.
fn insert(roots: &mut Vec<Message>, anchors: &mut Vec<usize>, depth: usize, message: Message) {
    anchors.truncate(depth);

    let mut siblings = roots;
    for &index in anchors.iter() {
        siblings = &mut siblings[index].children;
    }

    anchors.push(siblings.len());
    siblings.push(message);
}
