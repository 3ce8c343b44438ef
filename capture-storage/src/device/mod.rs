//! Block device capability consumed by the storage reader
//!
//! The device is an injectable trait so the reader can be driven against
//! an in-memory fake without real hardware. Implementations own the
//! underlying handle; dropping a [`BlockDevice::Handle`] closes it.

mod local;
mod memory;

pub use local::LocalDevice;
pub use memory::MemoryDevice;

use crate::error::Result;
use std::io::{Read, Seek};

/// One entry from a directory listing, before catalogue filtering
#[derive(Debug, Clone)]
pub struct DirEntry {
    /// Bare entry name (no directory component)
    pub name: String,
    /// True for subdirectories, which the catalogue skips
    pub is_dir: bool,
    /// Total size in bytes; 0 for directories
    pub size_bytes: u32,
}

/// Byte-oriented access to a removable block device.
///
/// Every operation blocks the calling context until the device responds;
/// timeouts, if desired, are the implementation's responsibility.
pub trait BlockDevice {
    /// Open file handle. Closing is dropping.
    type Handle: Read + Seek;

    /// Bring the device up. Fails with
    /// [`StorageError::DeviceUnavailable`](crate::StorageError::DeviceUnavailable)
    /// when no device responds.
    fn mount(&mut self) -> Result<()>;

    /// Release the device. Idempotent.
    fn unmount(&mut self);

    /// Enumerate the entries of `root_dir` in device discovery order.
    fn list_entries(&mut self, root_dir: &str) -> Result<Vec<DirEntry>>;

    /// Open a device-absolute path for reading.
    fn open(&mut self, path: &str) -> Result<Self::Handle>;
}
