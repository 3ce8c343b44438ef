//! Block device backed by a host directory
//!
//! Maps device-absolute paths (e.g. `/images/img_001.jpg`) onto a base
//! directory on the host filesystem. Useful for running the reader
//! against real capture files and for tempfile-based integration tests.

use crate::device::{BlockDevice, DirEntry};
use crate::error::{Result, StorageError};
use std::fs::File;
use std::path::PathBuf;
use tracing::{debug, info};

/// Host-directory implementation of [`BlockDevice`]
pub struct LocalDevice {
    base: PathBuf,
    mounted: bool,
}

impl LocalDevice {
    /// Create a device rooted at `base`. Nothing is touched until
    /// [`BlockDevice::mount`] is called.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self {
            base: base.into(),
            mounted: false,
        }
    }

    /// Resolve a device-absolute path below the base directory
    fn resolve(&self, path: &str) -> PathBuf {
        self.base.join(path.trim_start_matches('/'))
    }
}

impl BlockDevice for LocalDevice {
    type Handle = File;

    fn mount(&mut self) -> Result<()> {
        if !self.base.is_dir() {
            return Err(StorageError::DeviceUnavailable);
        }
        self.mounted = true;
        info!("local device mounted at {:?}", self.base);
        Ok(())
    }

    fn unmount(&mut self) {
        if self.mounted {
            self.mounted = false;
            debug!("local device unmounted");
        }
    }

    fn list_entries(&mut self, root_dir: &str) -> Result<Vec<DirEntry>> {
        if !self.mounted {
            return Err(StorageError::NotMounted);
        }

        let dir = self.resolve(root_dir);
        debug!("listing {:?}", dir);

        let mut entries = Vec::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            let metadata = entry.metadata()?;
            let name = entry.file_name().to_string_lossy().into_owned();

            entries.push(DirEntry {
                name,
                is_dir: metadata.is_dir(),
                size_bytes: metadata.len() as u32,
            });
        }

        Ok(entries)
    }

    fn open(&mut self, path: &str) -> Result<Self::Handle> {
        if !self.mounted {
            return Err(StorageError::NotMounted);
        }

        let host_path = self.resolve(path);
        File::open(&host_path).map_err(|source| StorageError::FileOpen {
            path: path.to_string(),
            source,
        })
    }
}
