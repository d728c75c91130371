//! Fixture builders for the integration tests.
//!
//! Archives are assembled byte by byte so the tests control exactly what is
//! on the wire: local file headers, central directory records and the EOCD
//! for ZIP; 512-byte ustar blocks for TAR. Nothing binary is checked in.

use std::io::Write;

use flate2::Compression;
use flate2::write::{DeflateEncoder, GzEncoder};

/// Incremental ZIP archive builder.
pub struct ZipBuilder {
    data: Vec<u8>,
    central: Vec<u8>,
    entries: u16,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            central: Vec::new(),
            entries: 0,
        }
    }

    /// Add a regular file stored without compression.
    pub fn file(mut self, name: &str, contents: &[u8], mode: u32) -> Self {
        self.add(name, contents, contents, 0, mode, false);
        self
    }

    /// Add a regular file compressed with DEFLATE.
    pub fn file_deflated(mut self, name: &str, contents: &[u8], mode: u32) -> Self {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(contents).unwrap();
        let compressed = encoder.finish().unwrap();
        self.add(name, &compressed, contents, 8, mode, false);
        self
    }

    /// Add a regular file carrying an arbitrary compression method id.
    pub fn file_with_method(mut self, name: &str, raw: &[u8], method: u16, mode: u32) -> Self {
        self.add(name, raw, raw, method, mode, false);
        self
    }

    /// Add a directory entry. `name` must end with `/`.
    pub fn dir(mut self, name: &str, mode: u32) -> Self {
        assert!(name.ends_with('/'), "zip directory names end with '/'");
        self.add(name, b"", b"", 0, mode, true);
        self
    }

    fn add(
        &mut self,
        name: &str,
        stored: &[u8],
        contents: &[u8],
        method: u16,
        mode: u32,
        is_dir: bool,
    ) {
        let lfh_offset = self.data.len() as u32;

        // local file header
        self.data.extend_from_slice(b"PK\x03\x04");
        self.data.extend_from_slice(&20u16.to_le_bytes()); // version needed
        self.data.extend_from_slice(&0u16.to_le_bytes()); // flags
        self.data.extend_from_slice(&method.to_le_bytes());
        self.data.extend_from_slice(&0u16.to_le_bytes()); // mod time
        self.data.extend_from_slice(&0u16.to_le_bytes()); // mod date
        self.data.extend_from_slice(&0u32.to_le_bytes()); // crc32
        self.data
            .extend_from_slice(&(stored.len() as u32).to_le_bytes());
        self.data
            .extend_from_slice(&(contents.len() as u32).to_le_bytes());
        self.data
            .extend_from_slice(&(name.len() as u16).to_le_bytes());
        self.data.extend_from_slice(&0u16.to_le_bytes()); // extra len
        self.data.extend_from_slice(name.as_bytes());
        self.data.extend_from_slice(stored);

        // central directory record, version-made-by flagging a Unix creator
        let file_type = if is_dir { 0o40000u32 } else { 0o100000u32 };
        let external_attrs = (mode | file_type) << 16;

        self.central.extend_from_slice(b"PK\x01\x02");
        self.central
            .extend_from_slice(&((3u16 << 8) | 20).to_le_bytes()); // made by
        self.central.extend_from_slice(&20u16.to_le_bytes()); // version needed
        self.central.extend_from_slice(&0u16.to_le_bytes()); // flags
        self.central.extend_from_slice(&method.to_le_bytes());
        self.central.extend_from_slice(&0u16.to_le_bytes()); // mod time
        self.central.extend_from_slice(&0u16.to_le_bytes()); // mod date
        self.central.extend_from_slice(&0u32.to_le_bytes()); // crc32
        self.central
            .extend_from_slice(&(stored.len() as u32).to_le_bytes());
        self.central
            .extend_from_slice(&(contents.len() as u32).to_le_bytes());
        self.central
            .extend_from_slice(&(name.len() as u16).to_le_bytes());
        self.central.extend_from_slice(&0u16.to_le_bytes()); // extra len
        self.central.extend_from_slice(&0u16.to_le_bytes()); // comment len
        self.central.extend_from_slice(&0u16.to_le_bytes()); // disk number
        self.central.extend_from_slice(&0u16.to_le_bytes()); // internal attrs
        self.central.extend_from_slice(&external_attrs.to_le_bytes());
        self.central.extend_from_slice(&lfh_offset.to_le_bytes());
        self.central.extend_from_slice(name.as_bytes());

        self.entries += 1;
    }

    pub fn build(self) -> Vec<u8> {
        let ZipBuilder {
            mut data,
            central,
            entries,
        } = self;

        let cd_offset = data.len() as u32;
        let cd_size = central.len() as u32;
        data.extend_from_slice(&central);

        // end of central directory
        data.extend_from_slice(b"PK\x05\x06");
        data.extend_from_slice(&0u16.to_le_bytes()); // disk number
        data.extend_from_slice(&0u16.to_le_bytes()); // disk with cd
        data.extend_from_slice(&entries.to_le_bytes());
        data.extend_from_slice(&entries.to_le_bytes());
        data.extend_from_slice(&cd_size.to_le_bytes());
        data.extend_from_slice(&cd_offset.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes()); // comment len
        data
    }
}

/// Overwrite the `n`-th (1-based) local file header signature with junk.
pub fn corrupt_nth_local_header(bytes: &mut [u8], n: usize) {
    let mut seen = 0;
    for i in 0..bytes.len().saturating_sub(4) {
        if &bytes[i..i + 4] == b"PK\x03\x04" {
            seen += 1;
            if seen == n {
                bytes[i..i + 4].copy_from_slice(b"XXXX");
                return;
            }
        }
    }
    panic!("archive has fewer than {n} local headers");
}

/// Incremental TAR archive builder producing 512-byte ustar blocks.
pub struct TarBuilder {
    data: Vec<u8>,
}

impl TarBuilder {
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    pub fn file(mut self, name: &str, contents: &[u8], mode: u32) -> Self {
        self.data
            .extend_from_slice(&header_block(name, mode, contents.len() as u64, b'0', ""));
        self.data.extend_from_slice(contents);
        let padding = (512 - contents.len() % 512) % 512;
        self.data.extend(std::iter::repeat_n(0u8, padding));
        self
    }

    pub fn dir(mut self, name: &str, mode: u32) -> Self {
        self.data
            .extend_from_slice(&header_block(name, mode, 0, b'5', ""));
        self
    }

    pub fn symlink(mut self, name: &str, target: &str) -> Self {
        self.data
            .extend_from_slice(&header_block(name, 0o777, 0, b'2', target));
        self
    }

    /// Append a raw block verbatim, for stream-anomaly tests.
    pub fn raw_block(mut self, block: [u8; 512]) -> Self {
        self.data.extend_from_slice(&block);
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        // end-of-archive marker
        self.data.extend_from_slice(&[0u8; 1024]);
        self.data
    }
}

/// Assemble a single ustar header block with a valid checksum.
pub fn header_block(name: &str, mode: u32, size: u64, typeflag: u8, linkname: &str) -> [u8; 512] {
    let mut block = [0u8; 512];
    block[..name.len()].copy_from_slice(name.as_bytes());
    block[100..107].copy_from_slice(format!("{mode:07o}").as_bytes());
    block[108..115].copy_from_slice(b"0000000"); // uid
    block[116..123].copy_from_slice(b"0000000"); // gid
    block[124..135].copy_from_slice(format!("{size:011o}").as_bytes());
    block[136..147].copy_from_slice(b"00000000000"); // mtime
    block[156] = typeflag;
    block[157..157 + linkname.len()].copy_from_slice(linkname.as_bytes());
    block[257..263].copy_from_slice(b"ustar\0");
    block[263..265].copy_from_slice(b"00");

    // checksum is computed with its own field read as spaces
    block[148..156].copy_from_slice(&[b' '; 8]);
    let sum: u64 = block.iter().map(|&b| b as u64).sum();
    block[148..156].copy_from_slice(format!("{sum:06o}\0 ").as_bytes());
    block
}

/// gzip-compress a byte stream.
pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}
