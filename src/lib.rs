//! # unarc
//!
//! A Rust unarchive utility for staging ZIP, TAR and gzip-compressed TAR
//! archives into a destination directory.
//!
//! The archive format is selected from the file name suffix (`.zip`, `.tar`,
//! `.tar.gz`/`.tgz`). Paths with no recognized suffix are reported as plain
//! files and left untouched, so a caller can funnel every staged file through
//! [`unarchive`] without classifying it first.
//!
//! ## Features
//!
//! - Suffix-based dispatch to ZIP, plain TAR or gzip+TAR extraction
//! - ZIP central-directory parsing with ZIP64 support (STORED and DEFLATE
//!   compression methods)
//! - Sequential ustar stream reader for plain and gzip-compressed TAR
//! - Entry permission bits preserved; missing parent directories created on
//!   demand
//! - Failure events reported through an injected [`ErrorSink`], so the
//!   extraction logic runs without a live logging backend
//!
//! Entry names from the archive are joined to the destination verbatim; an
//! archive carrying `..` path segments can write outside the destination
//! tree. Do not feed archives from untrusted sources to this crate.
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use unarc::{unarchive, NullSink};
//!
//! fn main() -> Result<(), unarc::UnarchiveError> {
//!     let kind = unarchive(Path::new("notes.tar.gz"), Path::new("out"), &NullSink)?;
//!     println!("extracted as {kind}");
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod dispatch;
mod fsutil;
pub mod io;
pub mod report;
pub mod tar;
pub mod zip;

pub use cli::Cli;
pub use dispatch::{ArchiveKind, UnarchiveError, unarchive};
pub use io::{LocalFileReader, ReadAt};
pub use report::{ErrorSink, LogSink, NullSink};
pub use tar::TarExtractor;
pub use zip::{ZipExtractor, ZipFileEntry};
