#![forbid(unsafe_code)]
//! dirtree — print a directory hierarchy as an indented, connector-decorated text tree.

pub mod cli;
pub mod error;
pub mod logging;
pub mod render;
pub mod shell;
pub mod tree;
