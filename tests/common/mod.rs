#![allow(dead_code)]

use dirtree::tree::{DirLister, Listing};
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const LINE: &str = "\u{2502}   ";
pub const MIDDLE: &str = "\u{251c}\u{2500}\u{2500}\u{2500}";
pub const LAST: &str = "\u{2514}\u{2500}\u{2500}\u{2500}";
pub const SPACE: &str = "    ";

/// Create a directory structure from a list of relative paths.
/// Paths ending with '/' create directories; others create empty files.
pub fn create_fixture(paths: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    for p in paths {
        let full = tmp.path().join(p);
        if p.ends_with('/') {
            fs::create_dir_all(&full).unwrap();
        } else {
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&full, "").unwrap();
        }
    }
    tmp
}

/// A rendered line cut into its 4-column units.
#[derive(Debug)]
pub struct ParsedLine {
    pub prefix_units: Vec<String>,
    pub connector: String,
    pub name: String,
}

impl ParsedLine {
    pub fn depth(&self) -> usize {
        self.prefix_units.len()
    }
}

/// Split a line produced with the plain Unicode renderer.
pub fn parse_line(line: &str) -> ParsedLine {
    let chars: Vec<char> = line.chars().collect();
    let mut units = Vec::new();
    let mut pos = 0;
    loop {
        let unit: String = chars[pos..pos + 4].iter().collect();
        if unit == MIDDLE || unit == LAST {
            return ParsedLine {
                prefix_units: units,
                connector: unit,
                name: chars[pos + 4..].iter().collect(),
            };
        }
        assert!(unit == LINE || unit == SPACE, "unexpected unit {unit:?} in {line:?}");
        units.push(unit);
        pos += 4;
    }
}

/// In-memory filesystem with a fixed listing order.
///
/// Paths registered with `dir` are directories; `denied` directories exist
/// but cannot be listed; every other path is a regular file.
#[derive(Default)]
pub struct MockLister {
    dirs: HashMap<PathBuf, Vec<String>>,
    denied: Vec<PathBuf>,
}

impl MockLister {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dir(mut self, path: &str, children: &[&str]) -> Self {
        self.dirs.insert(
            PathBuf::from(path),
            children.iter().map(|c| c.to_string()).collect(),
        );
        self
    }

    pub fn denied(mut self, path: &str) -> Self {
        self.denied.push(PathBuf::from(path));
        self
    }
}

impl DirLister for MockLister {
    fn list(&self, path: &Path) -> Listing {
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
