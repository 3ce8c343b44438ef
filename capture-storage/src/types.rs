//! Common types and protocol constants for the capture storage reader

use bytes::Bytes;

/// Block size in bytes, shared with the downstream chunked-transfer
/// consumer. Changing it changes `total_blocks` for every file and is a
/// protocol-compatibility parameter, not a tuning knob.
pub const BLOCK_SIZE: usize = 512;

/// Maximum number of catalogue entries kept from a single scan.
pub const MAX_CATALOGUE_ENTRIES: usize = 32;

/// Bound on a catalogue entry's full device path in bytes. Entries whose
/// path would exceed this are skipped during the scan.
pub const MAX_PATH_BYTES: usize = 64;

/// Configuration for a storage reader session
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory on the device that holds the capture files
    pub root_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root_dir: String::from("/images"),
        }
    }
}

/// Metadata for a single discovered capture file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogueEntry {
    /// Full device path, e.g. `/images/img_001.jpg`
    pub path: String,
    /// Total file size in bytes
    pub size_bytes: u32,
    /// `ceil(size_bytes / BLOCK_SIZE)`; 0 only for an empty file
    pub total_blocks: u32,
    /// Whole-file Fletcher-16, unset until computed
    pub checksum: Option<u16>,
}

impl CatalogueEntry {
    pub fn new(path: String, size_bytes: u32) -> Self {
        Self {
            path,
            size_bytes,
            total_blocks: size_bytes.div_ceil(BLOCK_SIZE as u32),
            checksum: None,
        }
    }
}

/// Result of a single block read, handed to the transport layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Payload bytes, at most [`BLOCK_SIZE`] long
    pub payload: Bytes,
    /// 0-based block number within the file
    pub block_index: u32,
    /// True iff this is the final block of the file
    pub is_last: bool,
}

impl Block {
    /// Actual byte count in this block. Equals [`BLOCK_SIZE`] for every
    /// block except possibly the last.
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }
}
