//! Thread list view and message body

use mblaze::Message;
use std::fmt::Write;

const INDENT: &str = "  ";

/// Width of the status icon column
const ICON_WIDTH: usize = 8;

/// Render threads with replies indented under their parent
///
/// Each line ends with the message path, ready to pass to `mbtree show`.
pub fn render_threads(threads: &[Message]) -> String {
    let mut out = String::new();
    for thread in threads {
        render_message(&mut out, thread, 0);
    }
    out
}

fn render_message(out: &mut String, message: &Message, depth: usize) {
    let _ = writeln!(
        out,
        "{:<width$}{}{}  {}  {}  {}",
        message.status.icon(),
        INDENT.repeat(depth),
        message.subject,
        message.sender,
        message.date,
        message.path,
        width = ICON_WIDTH,
    );
    for reply in &message.children {
        render_message(out, reply, depth + 1);
    }
}

/// Message body, with a placeholder when there is nothing to show
pub fn render_body(body: &str) -> String {
    if body.is_empty() {
        "(message not available)\n".to_string()
    } else if body.ends_with('\n') {
        body.to_string()
    } else {
        format!("{}\n", body)
    }
}
