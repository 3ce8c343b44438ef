//! In-memory block device with fault injection
//!
//! Serves the role real hardware cannot in tests: deterministic listings
//! and reproducible failures. Supported faults: a mount that never
//! succeeds, an open that fails for a named path, and an entry whose
//! advertised size exceeds its stored bytes (the reader then hits a
//! short read on what it believes is a non-final block).

use crate::device::{BlockDevice, DirEntry};
use crate::error::{Result, StorageError};
use std::io::{self, Cursor};

struct MemoryFile {
    name: String,
    data: Vec<u8>,
    is_dir: bool,
    /// Size reported by the listing; differs from `data.len()` only when
    /// simulating a media fault
    reported_size: u32,
}

/// In-memory implementation of [`BlockDevice`]
#[derive(Default)]
pub struct MemoryDevice {
    files: Vec<MemoryFile>,
    mounted: bool,
    fail_mount: bool,
    fail_open: Vec<String>,
}

impl MemoryDevice {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file; listing order follows insertion order.
    #[must_use]
    pub fn with_file(mut self, name: impl Into<String>, data: Vec<u8>) -> Self {
        let reported = data.len() as u32;
        self.files.push(MemoryFile {
            name: name.into(),
            data,
            is_dir: false,
            reported_size: reported,
        });
        self
    }

    /// Add a file whose listing advertises more bytes than are stored,
    /// so reads past the stored bytes come up short.
    #[must_use]
    pub fn with_truncated_file(
        mut self,
        name: impl Into<String>,
        data: Vec<u8>,
        reported_size: u32,
    ) -> Self {
        self.files.push(MemoryFile {
            name: name.into(),
            data,
            is_dir: false,
            reported_size,
        });
        self
    }

    /// Add a subdirectory entry.
    #[must_use]
    pub fn with_dir(mut self, name: impl Into<String>) -> Self {
        self.files.push(MemoryFile {
            name: name.into(),
            data: Vec::new(),
            is_dir: true,
            reported_size: 0,
        });
        self
    }

    /// Make every mount attempt fail.
    #[must_use]
    pub fn failing_mount(mut self) -> Self {
        self.fail_mount = true;
        self
    }

    /// Make opening the given device-absolute path fail.
    #[must_use]
    pub fn failing_open(mut self, path: impl Into<String>) -> Self {
        self.fail_open.push(path.into());
        self
    }

    fn find(&self, path: &str) -> Option<&MemoryFile> {
        let name = path.rsplit('/').next().unwrap_or(path);
        self.files.iter().find(|f| f.name == name && !f.is_dir)
    }
}

impl BlockDevice for MemoryDevice {
    type Handle = Cursor<Vec<u8>>;

    fn mount(&mut self) -> Result<()> {
        if self.fail_mount {
            return Err(StorageError::DeviceUnavailable);
        }
        self.mounted = true;
        Ok(())
    }

    fn unmount(&mut self) {
        self.mounted = false;
    }

    fn list_entries(&mut self, _root_dir: &str) -> Result<Vec<DirEntry>> {
        if !self.mounted {
            return Err(StorageError::NotMounted);
        }

        Ok(self
            .files
            .iter()
            .map(|f| DirEntry {
                name: f.name.clone(),
                is_dir: f.is_dir,
                size_bytes: f.reported_size,
            })
            .collect())
    }

    fn open(&mut self, path: &str) -> Result<Self::Handle> {
        if !self.mounted {
            return Err(StorageError::NotMounted);
        }

        if self.fail_open.iter().any(|p| p == path) {
            return Err(StorageError::FileOpen {
                path: path.to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "injected open failure"),
            });
        }

        let file = self.find(path).ok_or_else(|| StorageError::FileOpen {
            path: path.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "no such entry"),
        })?;

        Ok(Cursor::new(file.data.clone()))
    }
}
