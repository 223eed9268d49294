//! Directory tree building
//!
//! Turns the flat list of maildir paths printed by `mdirs` into a merged
//! tree. Each path becomes a single-branch chain, sibling chains with the
//! same name are merged, and structural nodes with a single child are
//! folded into that child (`a` → `b` → `c` displays as `a/b/c`).

use crate::models::Directory;

/// Separator between path segments
const SEPARATOR: char = '/';

/// Build the directory tree for the given maildir paths.
///
/// Roots and children keep the order in which their names were first
/// seen. Duplicate paths collapse into a single node.
pub fn build_directories<I, S>(paths: I) -> Vec<Directory>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let chains = paths.into_iter().filter_map(|path| chain(path.as_ref()));
    merge(chains).into_iter().map(collapse).collect()
}

/// Split a path into its segments.
///
/// An absolute path keeps `/` as its first segment. Empty segments (from
/// doubled or trailing separators) are dropped.
pub fn split_segments(path: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    if path.starts_with(SEPARATOR) {
        segments.push("/");
    }
    segments.extend(path.split(SEPARATOR).filter(|segment| !segment.is_empty()));
    segments
}

/// Join a parent name and a child name for display
fn join_segment(parent: &str, child: &str) -> String {
    if parent.ends_with(SEPARATOR) {
        format!("{}{}", parent, child)
    } else {
        format!("{}{}{}", parent, SEPARATOR, child)
    }
}

/// Build the single-branch chain for one path; only the deepest node is a leaf
fn chain(path: &str) -> Option<Directory> {
    let segments = split_segments(path);
    let (last, ancestors) = segments.split_last()?;

    let leaf = Directory::leaf(*last, path, Vec::new());
    Some(
        ancestors
            .iter()
            .rev()
            .fold(leaf, |child, name| Directory::group(*name, vec![child])),
    )
}

/// Accumulated state for one name while merging siblings
struct Group {
    name: String,
    path: Option<String>,
    children: Vec<Directory>,
}

/// Merge sibling directories by name, recursively.
///
/// Groups are kept in a vector so the first-seen order of names is the
/// output order.
fn merge(directories: impl IntoIterator<Item = Directory>) -> Vec<Directory> {
    let mut groups: Vec<Group> = Vec::new();

    for directory in directories {
        match groups.iter_mut().find(|group| group.name == directory.name) {
            Some(group) => {
                if group.path.is_none() {
                    group.path = directory.path;
                }
                group.children.extend(directory.children);
            }
            None => groups.push(Group {
                name: directory.name,
                path: directory.path,
                children: directory.children,
            }),
        }
    }

    groups
        .into_iter()
        .map(|group| Directory {
            name: group.name,
            path: group.path,
            children: merge(group.children),
        })
        .collect()
}

/// Fold single-child structural nodes into their child, from root to leaves
fn collapse(mut directory: Directory) -> Directory {
    while !directory.is_leaf() && directory.children.len() == 1 {
        let Some(child) = directory.children.pop() else {
            break;
        };
        directory = Directory {
            name: join_segment(&directory.name, &child.name),
            path: child.path,
            children: child.children,
        };
    }

    directory.children = directory.children.into_iter().map(collapse).collect();
    directory
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Flatten a tree into (full display name, is_leaf) pairs
    fn flatten(directories: &[Directory]) -> Vec<(String, bool)> {
        fn visit(prefix: Option<&str>, dir: &Directory, out: &mut Vec<(String, bool)>) {
            let name = match prefix {
                Some(prefix) => join_segment(prefix, &dir.name),
                None => dir.name.clone(),
            };
            out.push((name.clone(), dir.is_leaf()));
            for child in &dir.children {
                visit(Some(&name), child, out);
            }
        }

        let mut out = Vec::new();
        for dir in directories {
            visit(None, dir, &mut out);
        }
        out
    }

    #[test]
    fn test_split_segments() {
        assert_eq!(split_segments("a/b/c"), vec!["a", "b", "c"]);
        assert_eq!(split_segments("/home/mail"), vec!["/", "home", "mail"]);
        assert_eq!(split_segments("a//b/"), vec!["a", "b"]);
        assert!(split_segments("").is_empty());
    }

    #[test]
    fn test_single_path_collapses() {
        let tree = build_directories(["x/y/z"]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "x/y/z");
        assert!(tree[0].is_leaf());
        assert_eq!(tree[0].path.as_deref(), Some("x/y/z"));
        assert!(tree[0].children.is_empty());
    }

    #[test]
    fn test_single_segment() {
        let tree = build_directories(["a"]);
        assert_eq!(tree, vec![Directory::leaf("a", "a", vec![])]);
    }

    #[test]
    fn test_leaf_parent_does_not_collapse() {
        let tree = build_directories(["a", "a/b"]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "a");
        assert!(tree[0].is_leaf());
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].name, "b");
        assert!(tree[0].children[0].is_leaf());
    }

    #[test]
    fn test_duplicates_merge() {
        let tree = build_directories(["a/b", "a/b", "a/b"]);
        assert_eq!(tree, build_directories(["a/b"]));
    }

    #[test]
    fn test_shared_prefix_is_collapsed_above_branch() {
        let tree = build_directories(["mail/work/inbox", "mail/work/sent"]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "mail/work");
        assert!(!tree[0].is_leaf());
        let names: Vec<_> = tree[0].children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["inbox", "sent"]);
    }

    #[test]
    fn test_collapse_below_branch() {
        let tree = build_directories(["r/a/x/y", "r/b"]);
        assert_eq!(tree[0].name, "r");
        assert_eq!(tree[0].children[0].name, "a/x/y");
        assert_eq!(tree[0].children[0].path.as_deref(), Some("r/a/x/y"));
        assert_eq!(tree[0].children[1].name, "b");
    }

    #[test]
    fn test_first_seen_order() {
        let tree = build_directories(["z/1", "a/1", "z/2"]);
        let names: Vec<_> = tree.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a/1"]);
        let children: Vec<_> = tree[0].children.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(children, vec!["1", "2"]);
    }

    #[test]
    fn test_absolute_paths() {
        let tree = build_directories(["/home/u/Mail/INBOX", "/home/u/Mail/Sent"]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].name, "/home/u/Mail");
        assert_eq!(tree[0].children[0].path.as_deref(), Some("/home/u/Mail/INBOX"));
    }

    #[test]
    fn test_leaf_path_kept_when_seen_after_group() {
        let tree = build_directories(["a/b", "a"]);
        assert!(tree[0].is_leaf());
        assert_eq!(tree[0].path.as_deref(), Some("a"));
    }

    #[test]
    fn test_empty_paths_are_skipped() {
        let tree = build_directories(["", "a", ""]);
        assert_eq!(tree, vec![Directory::leaf("a", "a", vec![])]);
    }

    #[test]
    fn test_no_structural_single_child_remains() {
        let tree = build_directories(["a/b/c/d", "a/b/e", "f/g", "f/g/h/i"]);
        fn check(dir: &Directory) {
            assert!(dir.is_leaf() || dir.children.len() != 1, "{} not collapsed", dir.name);
            dir.children.iter().for_each(check);
        }
        tree.iter().for_each(check);
    }

    #[test]
    fn test_order_independent_names() {
        let paths = ["a/b/c", "a/d", "e", "a/b", "e/f/g"];
        let mut expected = flatten(&build_directories(paths));
        expected.sort();

        let mut reversed: Vec<_> = paths.to_vec();
        reversed.reverse();
        let mut actual = flatten(&build_directories(reversed));
        actual.sort();

        assert_eq!(actual, expected);
    }
}
