//! Archive-format dispatch.
//!
//! [`unarchive`] inspects the input path's suffix and routes to the matching
//! decoder pipeline: `.zip` to the ZIP extractor, `.tar` to the TAR
//! extractor, `.tar.gz`/`.tgz` to gzip decompression feeding the TAR
//! extractor. The checks run in that order and the first match wins; the
//! order itself is the tie-break policy. Paths with no recognized suffix are
//! reported as plain files and left untouched.

use std::fmt;
use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use flate2::read::GzDecoder;
use thiserror::Error;

use crate::io::LocalFileReader;
use crate::report::ErrorSink;
use crate::tar::TarExtractor;
use crate::zip::ZipExtractor;

/// Magic bytes at the start of every gzip stream.
const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Decoder pipeline selected for an input path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveKind {
    /// ZIP container
    Zip,
    /// Plain TAR container
    Tar,
    /// gzip-compressed TAR container
    TarGz,
    /// No recognized archive suffix; the input is treated as a plain file
    File,
}

impl ArchiveKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArchiveKind::Zip => "zip",
            ArchiveKind::Tar => "tar",
            ArchiveKind::TarGz => "tgz",
            ArchiveKind::File => "file",
        }
    }
}

impl fmt::Display for ArchiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extraction failure, tagged with the pipeline that was selected and the
/// input path it was selected for.
#[derive(Debug, Error)]
#[error("cannot unarchive {} as {}: {}", .path.display(), .kind, .source)]
pub struct UnarchiveError {
    /// Pipeline selected from the path's suffix
    pub kind: ArchiveKind,
    /// The input path
    pub path: PathBuf,
    #[source]
    pub source: anyhow::Error,
}

/// Extract the archive at `path` into the directory `dest`, selecting the
/// decoder pipeline from the file name suffix.
///
/// Returns the selected [`ArchiveKind`]. A path with no recognized suffix
/// reports [`ArchiveKind::File`] and the filesystem is left untouched; this
/// is not an error. Failures carry the selected kind and the input path.
///
/// Extraction is synchronous and runs to completion or first failure on the
/// calling thread. A failure partway leaves the entries extracted so far on
/// disk.
///
/// Entry names are joined to `dest` verbatim, so an archive naming `..`
/// segments can write outside the destination tree.
pub fn unarchive(
    path: &Path,
    dest: &Path,
    sink: &dyn ErrorSink,
) -> Result<ArchiveKind, UnarchiveError> {
    let name = path.as_os_str().to_string_lossy();

    if name.ends_with(".zip") {
        finish(ArchiveKind::Zip, path, unzip(path, dest, sink))
    } else if name.ends_with(".tar") {
        finish(ArchiveKind::Tar, path, untar(path, dest, sink))
    } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        finish(ArchiveKind::TarGz, path, untar_gz(path, dest, sink))
    } else {
        Ok(ArchiveKind::File)
    }
}

fn finish(
    kind: ArchiveKind,
    path: &Path,
    result: Result<()>,
) -> Result<ArchiveKind, UnarchiveError> {
    match result {
        Ok(()) => Ok(kind),
        Err(source) => Err(UnarchiveError {
            kind,
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn unzip(path: &Path, dest: &Path, sink: &dyn ErrorSink) -> Result<()> {
    let reader = match LocalFileReader::new(path) {
        Ok(reader) => reader,
        Err(err) => {
            sink.error(&format!("cannot read from: {}", path.display()), &err);
            return Err(err);
        }
    };

    ZipExtractor::new(Arc::new(reader)).unpack(dest, sink)
}

fn untar(path: &Path, dest: &Path, sink: &dyn ErrorSink) -> Result<()> {
    let file = open_source(path, sink)?;
    TarExtractor::new(file).unpack(dest)
}

fn untar_gz(path: &Path, dest: &Path, sink: &dyn ErrorSink) -> Result<()> {
    let mut file = open_source(path, sink)?;

    if let Err(err) = check_gzip_magic(&mut file) {
        sink.error(
            &format!("failed to initialize gzip stream for: {}", path.display()),
            &err,
        );
        return Err(err);
    }

    TarExtractor::new(GzDecoder::new(file)).unpack(dest)
}

fn open_source(path: &Path, sink: &dyn ErrorSink) -> Result<File> {
    match File::open(path) {
        Ok(file) => Ok(file),
        Err(err) => {
            let err = anyhow::Error::new(err);
            sink.error(&format!("cannot read from: {}", path.display()), &err);
            Err(err)
        }
    }
}

/// `GzDecoder` reads its header lazily; probe the magic bytes up front so a
/// source that is not gzip fails before any TAR entry is consumed.
fn check_gzip_magic(file: &mut File) -> Result<()> {
    let mut magic = [0u8; 2];
    file.read_exact(&mut magic).context("truncated gzip header")?;
    if magic != GZIP_MAGIC {
        bail!("invalid gzip header");
    }
    file.seek(SeekFrom::Start(0))?;
    Ok(())
}
