//! Single-entry rendering: connector glyphs and directory highlighting.

use crossterm::style::{Color, ResetColor, SetForegroundColor};
use crossterm::Command;

/// Glyph set used to draw the tree. Every glyph is four display columns wide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderChars {
    /// Ancestor continues below (it was not the last sibling).
    pub line: &'static str,
    /// Another sibling follows at this level.
    pub middle: &'static str,
    /// Final sibling at this level.
    pub last: &'static str,
    /// Ancestor was the last sibling, so nothing continues below it.
    pub space: &'static str,
}

/// Box-drawing glyphs.
pub static UNICODE_CHARS: RenderChars = RenderChars {
    line: "\u{2502}   ",                      // │
    middle: "\u{251c}\u{2500}\u{2500}\u{2500}", // ├───
    last: "\u{2514}\u{2500}\u{2500}\u{2500}",   // └───
    space: "    ",
};

/// Plain ASCII glyphs for terminals without box-drawing support.
pub static ASCII_CHARS: RenderChars = RenderChars {
    line: "|   ",
    middle: "|---",
    last: "\\---",
    space: "    ",
};

impl RenderChars {
    /// Connector drawn in front of an entry name.
    pub fn connector(&self, is_last: bool) -> &'static str {
        if is_last {
            self.last
        } else {
            self.middle
        }
    }

    /// Unit appended to the prefix handed to a directory's children.
    pub fn continuation(&self, is_last: bool) -> &'static str {
        if is_last {
            self.space
        } else {
            self.line
        }
    }
}

const DIR_COLOR: Color = Color::Cyan;

/// Begin/end markers wrapped around directory names.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DirHighlight {
    start: String,
    end: String,
}

impl DirHighlight {
    /// Terminal colour escapes.
    pub fn ansi() -> Self {
        Self {
            start: ansi_string(SetForegroundColor(DIR_COLOR)),
            end: ansi_string(ResetColor),
        }
    }

    /// No markup at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Arbitrary marker pair, e.g. `[` and `]` in tests.
    pub fn markers(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Wrap `text` in the marker pair.
    pub fn emphasize(&self, text: &str) -> String {
        let mut out = String::with_capacity(self.start.len() + text.len() + self.end.len());
        out.push_str(&self.start);
        out.push_str(text);
        out.push_str(&self.end);
        out
    }
}

fn ansi_string(command: impl Command) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = command.write_ansi(&mut out);
    out
}

/// Produces the text of one tree line from its parts.
#[derive(Debug, Clone)]
pub struct EntryRenderer {
    chars: &'static RenderChars,
    highlight: DirHighlight,
}

impl EntryRenderer {
    pub fn new(chars: &'static RenderChars, highlight: DirHighlight) -> Self {
        Self { chars, highlight }
    }

    /// Unicode glyphs without colour; the usual choice in tests.
    pub fn plain() -> Self {
        Self::new(&UNICODE_CHARS, DirHighlight::none())
    }

    /// `prefix + connector + name`, with directory names highlighted.
    pub fn render(&self, prefix: &str, name: &str, is_last: bool, is_directory: bool) -> String {
        let connector = self.chars.connector(is_last);
        let mut line = String::with_capacity(prefix.len() + connector.len() + name.len() + 16);
        line.push_str(prefix);
        line.push_str(connector);
        if is_directory {
            line.push_str(&self.highlight.emphasize(name));
        } else {
            line.push_str(name);
        }
        line
    }

    /// Prefix for the children of an entry rendered with `prefix`.
    pub fn child_prefix(&self, prefix: &str, is_last: bool) -> String {
        let mut next = String::with_capacity(prefix.len() + 4);
        next.push_str(prefix);
        next.push_str(self.chars.continuation(is_last));
        next
    }
}

impl Default for EntryRenderer {
    fn default() -> Self {
        Self::new(&UNICODE_CHARS, DirHighlight::ansi())
    }
}
