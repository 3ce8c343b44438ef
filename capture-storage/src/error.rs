//! Error types for storage reader operations

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("no block device responded to mount")]
    DeviceUnavailable,

    #[error("scan found no matching files (device left mounted)")]
    NoMatchingFiles,

    #[error("device is not mounted")]
    NotMounted,

    #[error("no stream is open")]
    NoOpenStream,

    #[error("index {index} out of range (limit {limit})")]
    IndexOutOfRange { index: u32, limit: u32 },

    #[error("failed to open {path}")]
    FileOpen {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("seek to offset {offset} failed")]
    Seek {
        offset: u64,
        #[source]
        source: io::Error,
    },

    #[error("short read on block {block}: expected {expected} bytes, got {actual}")]
    ShortRead {
        block: u32,
        expected: usize,
        actual: usize,
    },

    #[error("checksum pass failed for {path}: {detail}")]
    ChecksumFailed { path: String, detail: String },

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;
