use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

use super::listing::{DirLister, Listing};
use crate::error::{Result, TreeError};
use crate::render::EntryRenderer;

/// One directory being emitted: its children and how far we got.
struct Frame {
    dir: PathBuf,
    entries: Vec<OsString>,
    idx: usize,
    prefix: String,
}

impl Frame {
    fn new(dir: PathBuf, entries: Vec<OsString>, prefix: String) -> Self {
        Self {
            dir,
            entries,
            idx: 0,
            prefix,
        }
    }
}

/// A directory whose line was already handed out and whose children have
/// not been read yet.
struct PendingDescent {
    dir: PathBuf,
    prefix: String,
}

/// Lazy, depth-first, pre-order sequence of rendered tree lines.
///
/// Each call to `next` performs at most one directory listing plus one
/// classification query. Dropping the iterator stops the traversal.
pub struct TreeWalk<'a> {
    lister: &'a dyn DirLister,
    renderer: &'a EntryRenderer,
    stack: Vec<Frame>,
    pending: Option<PendingDescent>,
}

/// Start a traversal of `root` with an empty prefix.
///
/// The root is listed immediately, so a missing or unreadable root is
/// reported here and no lines are ever produced for it.
pub fn walk<'a>(
    lister: &'a dyn DirLister,
    renderer: &'a EntryRenderer,
    root: &Path,
) -> Result<TreeWalk<'a>> {
    walk_with_prefix(lister, renderer, root, String::new())
}

/// Like [`walk`], with every produced line starting with `prefix`.
pub fn walk_with_prefix<'a>(
    lister: &'a dyn DirLister,
    renderer: &'a EntryRenderer,
    root: &Path,
    prefix: String,
) -> Result<TreeWalk<'a>> {
    let entries = match lister.list(root) {
        Listing::Entries(entries) => entries,
        Listing::NotFound => {
            return Err(TreeError::PathNotFound {
                path: root.to_path_buf(),
            })
        }
        Listing::Inaccessible(source) => {
            return Err(TreeError::Inaccessible {
                path: root.to_path_buf(),
                source,
            })
        }
    };
    debug!(root = %root.display(), children = entries.len(), "starting traversal");

    Ok(TreeWalk {
        lister,
        renderer,
        stack: vec![Frame::new(root.to_path_buf(), entries, prefix)],
        pending: None,
    })
}

impl TreeWalk<'_> {
    /// Read the children of a directory whose line was just produced.
    /// Failures below the root only drop that subtree.
    fn descend(&mut self, pending: PendingDescent) {
        match self.lister.list(&pending.dir) {
            Listing::Entries(entries) => {
                trace!(dir = %pending.dir.display(), children = entries.len(), "descending");
                if !entries.is_empty() {
                    self.stack
                        .push(Frame::new(pending.dir, entries, pending.prefix));
                }
            }
            Listing::NotFound => {
                debug!(dir = %pending.dir.display(), "directory vanished before listing, skipped");
            }
            Listing::Inaccessible(err) => {
                warn!(dir = %pending.dir.display(), error = %err, "cannot list directory, subtree skipped");
            }
        }
    }
}

impl Iterator for TreeWalk<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if let Some(pending) = self.pending.take() {
            self.descend(pending);
        }

        loop {
            let frame = self.stack.last_mut()?;
            if frame.idx >= frame.entries.len() {
                self.stack.pop();
                continue;
            }

            let idx = frame.idx;
            frame.idx += 1;
            let is_last = idx + 1 == frame.entries.len();
            let name = &frame.entries[idx];
            let path = frame.dir.join(name);
            let display_name = name.to_string_lossy();
            let is_dir = self.lister.is_dir(&path);

            let line = self
                .renderer
                .render(&frame.prefix, &display_name, is_last, is_dir);

            if is_dir {
                self.pending = Some(PendingDescent {
                    prefix: self.renderer.child_prefix(&frame.prefix, is_last),
                    dir: path,
                });
            }
            return Some(line);
        }
    }
}

impl std::iter::FusedIterator for TreeWalk<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DirHighlight, UNICODE_CHARS};
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::io;

    /// Directories map to child names; anything absent is a file.
    #[derive(Default)]
    struct FakeFs {
        dirs: HashMap<PathBuf, Vec<&'static str>>,
        denied: Vec<PathBuf>,
        listed: RefCell<Vec<PathBuf>>,
    }

    impl FakeFs {
        fn dir(mut self, path: &str, children: &[&'static str]) -> Self {
            self.dirs.insert(PathBuf::from(path), children.to_vec());
            self
        }

        fn denied(mut self, path: &str) -> Self {
            self.denied.push(PathBuf::from(path));
            self
        }
    }

    impl DirLister for FakeFs {
        fn list(&self, path: &Path) -> Listing {
            self.listed.borrow_mut().push(path.to_path_buf());
            if self.denied.iter().any(|d| d == path) {
                return Listing::Inaccessible(io::Error::from(io::ErrorKind::PermissionDenied));
            }
            match self.dirs.get(path) {
                Some(children) => Listing::Entries(children.iter().map(OsString::from).collect()),
                None => Listing::NotFound,
            }
        }

        fn is_dir(&self, path: &Path) -> bool {
            self.dirs.contains_key(path) || self.denied.iter().any(|d| d == path)
        }
    }

    fn renderer() -> EntryRenderer {
        EntryRenderer::new(&UNICODE_CHARS, DirHighlight::markers("[", "]"))
    }

    #[test]
    fn child_listing_waits_for_next_pull() {
        let fs = FakeFs::default().dir("r", &["a"]).dir("r/a", &["x"]);
        let r = renderer();
        let mut walk = walk(&fs, &r, Path::new("r")).unwrap();

        assert_eq!(walk.next().as_deref(), Some("\u{2514}\u{2500}\u{2500}\u{2500}[a]"));
        assert_eq!(fs.listed.borrow().len(), 1, "r/a must not be listed yet");

        assert_eq!(walk.next().as_deref(), Some("    \u{2514}\u{2500}\u{2500}\u{2500}x"));
        assert_eq!(fs.listed.borrow().len(), 2);
        assert_eq!(walk.next(), None);
        assert_eq!(walk.next(), None);
    }

    #[test]
    fn abandoned_walk_lists_nothing_more() {
        let fs = FakeFs::default()
            .dir("r", &["a", "b"])
            .dir("r/a", &["x"])
            .dir("r/b", &["y"]);
        let r = renderer();
        let first: Vec<String> = walk(&fs, &r, Path::new("r")).unwrap().take(1).collect();
        assert_eq!(first.len(), 1);
        assert_eq!(*fs.listed.borrow(), vec![PathBuf::from("r")]);
    }

    #[test]
    fn denied_subdirectory_is_emitted_once() {
        let fs = FakeFs::default().dir("r", &["locked", "z"]).denied("r/locked");
        let r = renderer();
        let lines: Vec<String> = walk(&fs, &r, Path::new("r")).unwrap().collect();
        assert_eq!(
            lines,
            vec![
                "\u{251c}\u{2500}\u{2500}\u{2500}[locked]".to_string(),
                "\u{2514}\u{2500}\u{2500}\u{2500}z".to_string(),
            ]
        );
    }

    #[test]
    fn root_errors_are_distinguished() {
        let fs = FakeFs::default().denied("locked");
        let r = renderer();
        assert!(matches!(
            walk(&fs, &r, Path::new("missing")),
            Err(TreeError::PathNotFound { .. })
        ));
        assert!(matches!(
            walk(&fs, &r, Path::new("locked")),
            Err(TreeError::Inaccessible { .. })
        ));
    }

    #[test]
    fn explicit_prefix_is_inherited() {
        let fs = FakeFs::default().dir("r", &["f"]);
        let r = renderer();
        let lines: Vec<String> = walk_with_prefix(&fs, &r, Path::new("r"), "    ".to_string())
            .unwrap()
            .collect();
        assert_eq!(lines, vec!["    \u{2514}\u{2500}\u{2500}\u{2500}f".to_string()]);
    }
}
