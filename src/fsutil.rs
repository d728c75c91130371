//! Filesystem helpers shared by the extractors.

use std::fs::{DirBuilder, File, OpenOptions};
use std::io;
use std::path::Path;

/// Create a directory and any missing ancestors.
///
/// `mode` applies to every directory created along the way; directories that
/// already exist are left as they are. On non-Unix targets the mode is
/// ignored.
pub(crate) fn make_dir(path: &Path, mode: u32) -> io::Result<()> {
    let mut builder = DirBuilder::new();
    builder.recursive(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    builder.create(path)
}

/// Create or truncate a file for writing.
///
/// `mode` applies only when the file is newly created; an existing file is
/// truncated and keeps its permissions. On non-Unix targets the mode is
/// ignored.
pub(crate) fn create_file(path: &Path, mode: u32) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;

    options.open(path)
}
