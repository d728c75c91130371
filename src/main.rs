//! Main entry point for the unarc CLI application.
//!
//! A thin consumer of the library: it stages one archive into a destination
//! directory and reports the detected kind.

use anyhow::Result;
use clap::Parser;

use unarc::{ArchiveKind, Cli, LogSink, unarchive};

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let kind = unarchive(&cli.file, &cli.dest, &LogSink)?;

    if !cli.quiet {
        match kind {
            ArchiveKind::File => eprintln!(
                "{}: no archive suffix, nothing extracted",
                cli.file.display()
            ),
            kind => eprintln!("extracted {} as {}", cli.file.display(), kind),
        }
    }

    Ok(())
}
