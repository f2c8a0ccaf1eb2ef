use clap::Parser;
use std::path::PathBuf;

use crate::render::{DirHighlight, EntryRenderer, ASCII_CHARS, UNICODE_CHARS};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "dirtree",
    version,
    about = "Print a directory hierarchy as a text tree",
    after_help = "Examples:\n  dirtree            prompt for paths until 'q' is entered\n  dirtree src        print the tree under ./src once\n  dirtree --ascii .  use ASCII connectors"
)]
pub struct Args {
    /// Directory to print once; omit to enter the interactive prompt
    pub path: Option<PathBuf>,

    /// Draw connectors with ASCII characters instead of box-drawing glyphs
    #[arg(long = "ascii")]
    pub ascii: bool,

    /// Disable colored directory names
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// Increase diagnostic logging on stderr (repeatable)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,
}

impl Args {
    /// Enforce invariants after parsing.
    pub fn validated(mut self) -> Self {
        // Respect NO_COLOR env var
        if std::env::var_os("NO_COLOR").is_some() {
            self.no_color = true;
        }
        if self.quiet {
            self.verbose = 0;
        }
        self
    }

    /// Renderer matching the glyph and colour flags.
    pub fn renderer(&self) -> EntryRenderer {
        let chars = if self.ascii {
            &ASCII_CHARS
        } else {
            &UNICODE_CHARS
        };
        let highlight = if self.no_color {
            DirHighlight::none()
        } else {
            DirHighlight::ansi()
        };
        EntryRenderer::new(chars, highlight)
    }
}
