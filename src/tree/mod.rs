//! Directory listing and lazy tree traversal.

mod listing;
mod walk;

pub use listing::{DirLister, Listing, StdDirLister};
pub use walk::{walk, walk_with_prefix, TreeWalk};
