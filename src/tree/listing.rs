use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::Path;

/// Outcome of listing one directory.
#[derive(Debug)]
pub enum Listing {
    /// Child names in the order the filesystem returned them.
    Entries(Vec<OsString>),
    /// The path does not exist.
    NotFound,
    /// The path exists but could not be listed.
    Inaccessible(io::Error),
}

impl Listing {
    /// Classify an I/O failure from a listing attempt.
    pub fn from_error(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            Listing::NotFound
        } else {
            Listing::Inaccessible(err)
        }
    }
}

/// Filesystem queries the walker needs, so traversal can run against a mock.
pub trait DirLister {
    /// List the immediate children of `path`, unsorted.
    fn list(&self, path: &Path) -> Listing;

    /// Whether `path` refers to a directory (following symlinks).
    fn is_dir(&self, path: &Path) -> bool;
}

/// `DirLister` backed by `std::fs`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDirLister;

impl DirLister for StdDirLister {
    fn list(&self, path: &Path) -> Listing {
        let read_dir = match fs::read_dir(path) {
            Ok(rd) => rd,
            Err(e) => return Listing::from_error(e),
        };

        let mut names = Vec::new();
        for entry in read_dir {
            match entry {
                Ok(entry) => names.push(entry.file_name()),
                // A listing is all-or-nothing.
                Err(e) => return Listing::Inaccessible(e),
            }
        }
        Listing::Entries(names)
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }
}
