mod local;

pub use local::LocalFileReader;

use anyhow::Result;

/// Trait for random access reading from a data source
pub trait ReadAt: Send + Sync {
    /// Fill the buffer with data starting at the specified offset.
    ///
    /// Short reads are an error; the buffer is either filled completely or
    /// the call fails.
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<()>;

    /// Get the total size of the data source
    fn size(&self) -> u64;
}
