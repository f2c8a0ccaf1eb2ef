//! Prompt loop that prints the tree for each path the user enters.

use std::borrow::Cow;
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::TreeError;
use crate::render::EntryRenderer;
use crate::tree::{walk, DirLister};

pub const TITLE: &str = "Tree";
pub const EXIT_HINT: &str = "(In order to exit, enter 'q')";
pub const PROMPT: &str = "Please enter a path: ";
pub const QUIT_COMMAND: &[u8] = b"q";
pub const NOT_FOUND_MESSAGE: &str = "Tree can't find the path specified.";
pub const INVALID_PATH_MESSAGE: &str = "Invalid path specified.";

/// Exit status used when Ctrl-C arrives at the prompt.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// User-facing message for a failed root traversal.
pub fn failure_message(err: &TreeError) -> &'static str {
    match err {
        TreeError::PathNotFound { .. } => NOT_FOUND_MESSAGE,
        TreeError::Inaccessible { .. } => INVALID_PATH_MESSAGE,
    }
}

#[derive(Default)]
struct InterruptState {
    printing: AtomicBool,
    cancelled: AtomicBool,
}

/// Ctrl-C bookkeeping shared between the signal handler and the printer.
#[derive(Clone, Default)]
pub struct Interrupt {
    state: Arc<InterruptState>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Route Ctrl-C through this flag. While a tree is printing the signal
    /// cancels it; otherwise the process exits.
    pub fn install(&self) -> Result<(), ctrlc::Error> {
        let interrupt = self.clone();
        ctrlc::set_handler(move || {
            if interrupt.signal() == SignalAction::Exit {
                std::process::exit(INTERRUPTED_EXIT_CODE);
            }
        })
    }

    /// Record one Ctrl-C and say what the process should do about it.
    pub fn signal(&self) -> SignalAction {
        if self.state.printing.load(Ordering::SeqCst) {
            self.state.cancelled.store(true, Ordering::SeqCst);
            SignalAction::Cancel
        } else {
            SignalAction::Exit
        }
    }

    /// Request cancellation of the tree currently printing.
    pub fn cancel(&self) {
        self.state.cancelled.store(true, Ordering::SeqCst);
    }

    fn printing(&self) -> PrintingGuard<'_> {
        self.state.cancelled.store(false, Ordering::SeqCst);
        self.state.printing.store(true, Ordering::SeqCst);
        PrintingGuard { interrupt: self }
    }

    fn take_cancelled(&self) -> bool {
        self.state.cancelled.swap(false, Ordering::SeqCst)
    }
}

/// Response to Ctrl-C.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalAction {
    /// Stop the tree being printed and return to the prompt.
    Cancel,
    /// Nothing is printing; leave the process.
    Exit,
}

/// Marks the printing window; cleared on drop so an early return or a write
/// error cannot leave Ctrl-C disarmed.
struct PrintingGuard<'a> {
    interrupt: &'a Interrupt,
}

impl Drop for PrintingGuard<'_> {
    fn drop(&mut self) {
        self.interrupt.state.printing.store(false, Ordering::SeqCst);
    }
}

/// How a print run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Printed {
    pub lines: usize,
    /// Ctrl-C stopped the run.
    pub cancelled: bool,
    /// The reader went away (broken pipe).
    pub closed: bool,
}

/// Whether a write failed only because the reading end was closed.
pub fn is_broken_pipe(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::BrokenPipe
}

/// Write each line as it is produced, stopping early on cancellation or
/// when the reader closes the output. No line is pulled once a stop is seen.
pub fn print_lines<W, I>(out: &mut W, lines: I, interrupt: &Interrupt) -> io::Result<Printed>
where
    W: Write,
    I: IntoIterator<Item = String>,
{
    let _guard = interrupt.printing();
    let mut lines = lines.into_iter();
    let mut printed = Printed {
        lines: 0,
        cancelled: false,
        closed: false,
    };
    loop {
        if interrupt.take_cancelled() {
            printed.cancelled = true;
            break;
        }
        let Some(line) = lines.next() else {
            break;
        };
        match writeln!(out, "{line}") {
            Ok(()) => printed.lines += 1,
            Err(e) if is_broken_pipe(&e) => {
                printed.closed = true;
                break;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(printed)
}

/// Path named by one line of input, without its line terminator.
fn entered_path(line: &[u8]) -> Cow<'_, Path> {
    #[cfg(unix)]
    {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;
        Cow::Borrowed(Path::new(OsStr::from_bytes(line)))
    }
    #[cfg(not(unix))]
    {
        match String::from_utf8_lossy(line) {
            Cow::Borrowed(s) => Cow::Borrowed(Path::new(s)),
            Cow::Owned(s) => Cow::Owned(s.into()),
        }
    }
}

fn trim_line_end(mut line: &[u8]) -> &[u8] {
    while let [rest @ .., b'\n' | b'\r'] = line {
        line = rest;
    }
    line
}

/// Interactive prompt loop.
pub struct Shell<'a> {
    lister: &'a dyn DirLister,
    renderer: &'a EntryRenderer,
    interrupt: Interrupt,
}

impl<'a> Shell<'a> {
    pub fn new(lister: &'a dyn DirLister, renderer: &'a EntryRenderer, interrupt: Interrupt) -> Self {
        Self {
            lister,
            renderer,
            interrupt,
        }
    }

    /// Prompt until `q` or end of input.
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, out: &mut W) -> io::Result<()> {
        writeln!(out, "\n{TITLE}\n")?;
        // Raw bytes: a path that is not UTF-8 must not end the session.
        let mut buf = Vec::new();
        loop {
            writeln!(out, "{EXIT_HINT}")?;
            write!(out, "{PROMPT}")?;
            out.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                writeln!(out)?;
                debug!("end of input, leaving prompt");
                break;
            }
            let entered = trim_line_end(&buf);
            if entered == QUIT_COMMAND {
                break;
            }
            self.show(&entered_path(entered), out)?;
        }
        Ok(())
    }

    /// Print the tree for one entered path, or the matching failure message.
    pub fn show<W: Write>(&self, root: &Path, out: &mut W) -> io::Result<()> {
        match walk(self.lister, self.renderer, root) {
            Ok(tree) => {
                let printed = print_lines(out, tree, &self.interrupt)?;
                if printed.closed {
                    return Err(io::Error::from(io::ErrorKind::BrokenPipe));
                }
                if printed.cancelled {
                    info!(root = %root.display(), lines = printed.lines, "traversal cancelled");
                } else {
                    debug!(root = %root.display(), lines = printed.lines, "traversal finished");
                }
            }
            Err(err) => {
                debug!(error = %err, "traversal failed");
                writeln!(out, "{}", failure_message(&err))?;
            }
        }
        out.flush()
    }
}
