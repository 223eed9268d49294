//! Directory model representing a node in the mail folder tree

use serde::{Deserialize, Serialize};

/// A mail folder, or a structural grouping of folders
///
/// Nodes whose `path` is set are selectable maildirs (leaves). A leaf may
/// still have children when both `a` and `a/b` are maildirs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    /// Display name: a single path segment, or a collapsed chain like `a/b/c`
    pub name: String,
    /// Full path of the maildir when this node is selectable
    #[serde(default)]
    pub path: Option<String>,
    /// Child directories in first-seen order
    #[serde(default)]
    pub children: Vec<Directory>,
}

impl Directory {
    /// Create a structural (non-selectable) directory node
    pub fn group(name: impl Into<String>, children: Vec<Directory>) -> Self {
        Self {
            name: name.into(),
            path: None,
            children,
        }
    }

    /// Create a selectable directory node
    pub fn leaf(name: impl Into<String>, path: impl Into<String>, children: Vec<Directory>) -> Self {
        Self {
            name: name.into(),
            path: Some(path.into()),
            children,
        }
    }

    /// Whether this node is an actual maildir rather than an intermediate grouping
    pub fn is_leaf(&self) -> bool {
        self.path.is_some()
    }

    /// Visit this node and all descendants depth-first, parents before children
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Directory, usize)) {
        self.walk_at(0, visit);
    }

    fn walk_at<'a>(&'a self, depth: usize, visit: &mut impl FnMut(&'a Directory, usize)) {
        visit(self, depth);
        for child in &self.children {
            child.walk_at(depth + 1, visit);
        }
    }

    /// Paths of all selectable directories in this subtree, in display order
    pub fn leaf_paths(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        self.walk(&mut |dir, _| {
            if let Some(path) = dir.path.as_deref() {
                paths.push(path);
            }
        });
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_and_group() {
        let dir = Directory::group("Mail", vec![Directory::leaf("INBOX", "Mail/INBOX", vec![])]);
        assert!(!dir.is_leaf());
        assert!(dir.children[0].is_leaf());
    }

    #[test]
    fn test_leaf_paths_in_display_order() {
        let tree = Directory::leaf(
            "a",
            "a",
            vec![
                Directory::leaf("b", "a/b", vec![]),
                Directory::group("c", vec![Directory::leaf("d", "a/c/d", vec![])]),
            ],
        );
        assert_eq!(tree.leaf_paths(), vec!["a", "a/b", "a/c/d"]);
    }

    #[test]
    fn test_walk_reports_depth() {
        let tree = Directory::group("x", vec![Directory::leaf("y", "x/y", vec![])]);
        let mut seen = Vec::new();
        tree.walk(&mut |dir, depth| seen.push((dir.name.clone(), depth)));
        assert_eq!(seen, vec![("x".to_string(), 0), ("y".to_string(), 1)]);
    }
}
