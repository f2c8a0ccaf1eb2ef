#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use clap::Parser;
use dirtree::cli::Args;
use dirtree::shell::{self, is_broken_pipe, Interrupt, Shell};
use dirtree::tree::{walk, StdDirLister};
use std::io::{self, Write};

fn main() {
    match run_app() {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("dirtree: {e:#}");
            std::process::exit(1);
        }
    }
}

fn run_app() -> Result<i32> {
    let args = Args::parse().validated();
    dirtree::logging::init(args.verbose, args.quiet);

    let renderer = args.renderer();
    let interrupt = Interrupt::new();
    interrupt
        .install()
        .context("failed to install Ctrl-C handler")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let Some(path) = args.path.as_deref() else {
        let shell = Shell::new(&StdDirLister, &renderer, interrupt);
        return match shell.run(io::stdin().lock(), &mut out) {
            Ok(()) => Ok(0),
            Err(e) if is_broken_pipe(&e) => {
                tracing::debug!("stdout closed, leaving prompt");
                Ok(0)
            }
            Err(e) => Err(e).context("interactive session failed"),
        };
    };

    match walk(&StdDirLister, &renderer, path) {
        Ok(tree) => {
            let printed = shell::print_lines(&mut out, tree, &interrupt)
                .with_context(|| format!("{}: failed to write tree", path.display()))?;
            if printed.closed {
                tracing::debug!(lines = printed.lines, "stdout closed, stopping early");
                return Ok(0);
            }
            match out.flush() {
                Err(e) if !is_broken_pipe(&e) => {
                    return Err(e).context("failed to flush stdout");
                }
                _ => {}
            }
            if printed.cancelled {
                return Ok(shell::INTERRUPTED_EXIT_CODE);
            }
            Ok(0)
        }
        Err(err) => {
            tracing::debug!(error = %err, "traversal failed");
            eprintln!("{}", shell::failure_message(&err));
            Ok(1)
        }
    }
}
