use std::io::{Cursor, Read, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use flate2::read::DeflateDecoder;

use crate::fsutil::{create_file, make_dir};
use crate::io::ReadAt;
use crate::report::ErrorSink;

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

/// ZIP container extractor.
///
/// Walks the central directory and recreates every entry under a destination
/// directory, in central-directory order.
pub struct ZipExtractor<R: ReadAt> {
    parser: ZipParser<R>,
}

impl<R: ReadAt> ZipExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: ZipParser::new(reader),
        }
    }

    /// List all entries in the archive
    pub fn list_entries(&self) -> Result<Vec<ZipFileEntry>> {
        self.parser.list_entries()
    }

    /// Recreate every entry of the archive under `dest`.
    ///
    /// The destination directory is created at mode 0755 if absent, with any
    /// missing intermediate directories. Entries are processed strictly in
    /// central-directory order; the first failure aborts the extraction and
    /// leaves already-extracted entries on disk.
    pub fn unpack(&self, dest: &Path, sink: &dyn ErrorSink) -> Result<()> {
        if let Err(err) = make_dir(dest, 0o755) {
            let err = anyhow::Error::new(err);
            sink.error("failed to create the extraction destination dir", &err);
            return Err(err);
        }

        for entry in self.list_entries()? {
            self.extract_entry(&entry, dest, sink)?;
        }

        Ok(())
    }

    fn extract_entry(
        &self,
        entry: &ZipFileEntry,
        dest: &Path,
        sink: &dyn ErrorSink,
    ) -> Result<()> {
        let target = dest.join(&entry.file_name);

        if entry.is_directory {
            if let Err(err) = make_dir(&target, entry.mode()) {
                let err = anyhow::Error::new(err);
                sink.error(
                    &format!("failed to create sub directory: {}", target.display()),
                    &err,
                );
                return Err(err);
            }
            return Ok(());
        }

        // Missing ancestors take the entry's own mode here, a quirk of this
        // pipeline kept even though directories usually want 0755.
        if let Some(parent) = target.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(err) = make_dir(parent, entry.mode()) {
                    let err = anyhow::Error::new(err);
                    sink.error(
                        &format!("failed to create parent directory for: {}", target.display()),
                        &err,
                    );
                    return Err(err);
                }
            }
        }

        let data = self.read_entry(entry)?;

        let mut file = create_file(&target, entry.mode())
            .with_context(|| format!("failed to create: {}", target.display()))?;
        file.write_all(&data)
            .with_context(|| format!("failed to write: {}", target.display()))?;

        Ok(())
    }

    /// Read an entry's full content, decompressing if necessary.
    fn read_entry(&self, entry: &ZipFileEntry) -> Result<Vec<u8>> {
        let data_offset = self.parser.data_offset(entry)?;

        let mut compressed = vec![0u8; entry.compressed_size as usize];
        self.parser.reader().read_at(data_offset, &mut compressed)?;

        match entry.compression_method {
            CompressionMethod::Stored => Ok(compressed),
            CompressionMethod::Deflate => {
                let mut data = Vec::with_capacity(entry.uncompressed_size as usize);
                DeflateDecoder::new(Cursor::new(compressed))
                    .read_to_end(&mut data)
                    .with_context(|| format!("failed to inflate: {}", entry.file_name))?;
                Ok(data)
            }
            CompressionMethod::Unknown(method) => {
                bail!(
                    "unsupported compression method {} for: {}",
                    method,
                    entry.file_name
                )
            }
        }
    }
}
