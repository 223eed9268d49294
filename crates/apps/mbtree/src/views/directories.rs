//! Directory tree view - one line per node with unseen/total counts

use mblaze::{Directory, DirectoryCounts};
use std::collections::HashMap;
use std::fmt::Write;

const INDENT: &str = "  ";

/// Render the directory forest, indenting children under their parent
///
/// Selectable directories show `unseen/total` when counts are known and
/// `?` when counting failed.
pub fn render_directories(
    directories: &[Directory],
    counts: &HashMap<String, DirectoryCounts>,
) -> String {
    let mut out = String::new();
    for root in directories {
        root.walk(&mut |dir, depth| {
            let _ = write!(out, "{}{}", INDENT.repeat(depth), dir.name);
            if let Some(path) = dir.path.as_deref() {
                match counts.get(path) {
                    Some(c) => {
                        let _ = write!(out, " ({}/{})", c.unseen, c.total);
                    }
                    None => out.push_str(" (?)"),
                }
            }
            out.push('\n');
        });
    }
    out
}
