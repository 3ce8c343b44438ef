//! Block-granular reader for capture files on a removable block device
//!
//! Stages large binary files (camera captures) from a slow, removable
//! device for a downstream chunked transport. The reader discovers
//! eligible files into a bounded catalogue, hands out fixed-size blocks
//! sequentially or by index, and computes a whole-file Fletcher-16
//! checksum for end-to-end integrity verification.
//!
//! The device itself is an injectable [`BlockDevice`] capability:
//! [`LocalDevice`] maps it onto a host directory, [`MemoryDevice`] is an
//! in-memory fake with fault injection for tests.
//!
//! ```no_run
//! use capture_storage::{LocalDevice, StorageConfig, StorageReader};
//!
//! # fn main() -> capture_storage::Result<()> {
//! let device = LocalDevice::new("/mnt/sdcard");
//! let mut reader = StorageReader::new(device, StorageConfig::default());
//!
//! reader.mount_and_scan()?;
//! reader.open_stream(0)?;
//! while let Some(block) = reader.read_next_block()? {
//!     // hand `block` to the transport layer
//!     if block.is_last {
//!         break;
//!     }
//! }
//! reader.close_stream();
//! reader.unmount();
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod checksum;
pub mod device;
pub mod error;
pub mod storage;
pub mod types;

pub use error::{Result, StorageError};
pub use storage::StorageReader;
pub use types::{BLOCK_SIZE, Block, CatalogueEntry, MAX_CATALOGUE_ENTRIES, StorageConfig};

// Re-export commonly used types
pub use catalog::Catalogue;
pub use checksum::{Fletcher16, fletcher16};
pub use device::{BlockDevice, DirEntry, LocalDevice, MemoryDevice};
