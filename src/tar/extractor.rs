use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::fsutil::{create_file, make_dir};

use super::header::{BLOCK_SIZE, EntryType, TarHeader, is_zero_block};

/// TAR stream extractor.
///
/// Reads entries sequentially from a byte stream positioned at the start of
/// a TAR container and recreates regular files and directories under a
/// destination directory.
pub struct TarExtractor<R: Read> {
    reader: R,
}

impl<R: Read> TarExtractor<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Recreate the archive's entries under `dest`.
    ///
    /// End-of-stream is the normal terminal condition. Directories are
    /// created at mode 0755 regardless of their stored mode; regular files
    /// carry their stored mode. Entries of any other type are skipped. The
    /// first failure aborts the extraction and leaves entries processed so
    /// far on disk.
    pub fn unpack(mut self, dest: &Path) -> Result<()> {
        let mut block = [0u8; BLOCK_SIZE];

        loop {
            if !self.read_header_block(&mut block)? {
                return Ok(());
            }

            // Zero blocks terminate an archive; skip them and let the
            // following read hit end-of-stream.
            if is_zero_block(&block) {
                continue;
            }

            let header = TarHeader::from_block(&block).context("malformed entry header")?;
            self.extract_entry(&header, dest)?;
        }
    }

    /// Read the next 512-byte header block.
    ///
    /// Returns `Ok(false)` on a clean end-of-stream before the first byte of
    /// a block. A stream ending inside a block is a truncation error.
    fn read_header_block(&mut self, block: &mut [u8; BLOCK_SIZE]) -> Result<bool> {
        let mut filled = 0;
        while filled < BLOCK_SIZE {
            let n = self.reader.read(&mut block[filled..])?;
            if n == 0 {
                if filled == 0 {
                    return Ok(false);
                }
                bail!("truncated header block ({filled} of {BLOCK_SIZE} bytes)");
            }
            filled += n;
        }
        Ok(true)
    }

    fn extract_entry(&mut self, header: &TarHeader, dest: &Path) -> Result<()> {
        let target = dest.join(&header.name);

        match header.entry_type {
            EntryType::Directory => {
                // Fixed 0755 on this path; the stored directory mode is
                // deliberately not applied.
                if !target.exists() {
                    make_dir(&target, 0o755).with_context(|| {
                        format!("failed to create directory: {}", target.display())
                    })?;
                }
                self.skip(header.size + header.padding())
            }
            EntryType::Regular => {
                if let Some(parent) = target.parent() {
                    if !parent.as_os_str().is_empty() {
                        make_dir(parent, 0o755).with_context(|| {
                            format!("failed to create parent directory for: {}", target.display())
                        })?;
                    }
                }

                let mut file = create_file(&target, header.mode)
                    .with_context(|| format!("failed to create file: {}", target.display()))?;
                let copied = io::copy(&mut (&mut self.reader).take(header.size), &mut file)
                    .with_context(|| format!("failed to write: {}", target.display()))?;
                if copied != header.size {
                    bail!(
                        "truncated entry data for: {} ({copied} of {} bytes)",
                        target.display(),
                        header.size
                    );
                }
                // one open handle at a time; released before the next entry
                drop(file);

                self.skip(header.padding())
            }
            // symlinks, devices, extension records: no filesystem object,
            // consume the data and move on
            EntryType::Other(_) => self.skip(header.size + header.padding()),
        }
    }

    /// Consume and discard `count` bytes from the stream.
    fn skip(&mut self, count: u64) -> Result<()> {
        let copied = io::copy(&mut (&mut self.reader).take(count), &mut io::sink())?;
        if copied != count {
            bail!("unexpected end of stream");
        }
        Ok(())
    }
}
