//! Block-granular reader over a mounted capture device
//!
//! [`StorageReader`] is the session object: it owns the device, the
//! catalogue built from the last scan, and the single open-stream slot.
//! One logical control flow drives it at a time; every call blocks until
//! the device responds.

use crate::catalog::Catalogue;
use crate::checksum::Fletcher16;
use crate::device::BlockDevice;
use crate::error::{Result, StorageError};
use crate::types::{BLOCK_SIZE, Block, CatalogueEntry, StorageConfig};
use std::io::{Read, Seek, SeekFrom};
use tracing::{debug, info, warn};

/// The currently open file and its sequential cursor
struct Stream<H> {
    handle: H,
    entry_index: usize,
    /// Next block to hand out via `read_next_block`
    cursor: u32,
}

/// Session over one mount cycle of a capture device.
///
/// Lifecycle: `Unmounted → Mounted` ([`mount_and_scan`]) `→
/// Mounted+StreamOpen` ([`open_stream`]) `→ Mounted` ([`close_stream`])
/// `→ Unmounted` ([`unmount`], which force-closes any open stream).
///
/// [`mount_and_scan`]: StorageReader::mount_and_scan
/// [`open_stream`]: StorageReader::open_stream
/// [`close_stream`]: StorageReader::close_stream
/// [`unmount`]: StorageReader::unmount
pub struct StorageReader<D: BlockDevice> {
    device: D,
    config: StorageConfig,
    mounted: bool,
    catalogue: Catalogue,
    stream: Option<Stream<D::Handle>>,
}

impl<D: BlockDevice> StorageReader<D> {
    /// Create an unmounted session over `device`.
    pub fn new(device: D, config: StorageConfig) -> Self {
        Self {
            device,
            config,
            mounted: false,
            catalogue: Catalogue::default(),
            stream: None,
        }
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Mount the device and scan the root directory for capture files.
    ///
    /// Returns the number of catalogued files. Finding zero matching
    /// files is reported as [`StorageError::NoMatchingFiles`] while the
    /// device stays mounted with an empty catalogue, so a later rescan
    /// skips the remount cost. A mount refusal is
    /// [`StorageError::DeviceUnavailable`] and leaves the session
    /// unmounted.
    pub fn mount_and_scan(&mut self) -> Result<usize> {
        if self.mounted {
            warn!("device already mounted, rescanning");
        } else {
            self.device.mount()?;
            self.mounted = true;
        }

        // A rescan replaces the catalogue; any open stream would be
        // left pointing at a stale index.
        self.close_stream();

        let listing = self.device.list_entries(&self.config.root_dir)?;
        self.catalogue = Catalogue::from_listing(&self.config.root_dir, listing);

        if self.catalogue.is_empty() {
            warn!("no matching files in {}", self.config.root_dir);
            return Err(StorageError::NoMatchingFiles);
        }

        info!(
            "found {} file(s) in {}",
            self.catalogue.len(),
            self.config.root_dir
        );
        Ok(self.catalogue.len())
    }

    /// Unmount the device, force-closing any open stream and clearing
    /// the catalogue. Idempotent.
    pub fn unmount(&mut self) {
        self.close_stream();

        if self.mounted {
            self.device.unmount();
            self.mounted = false;
            self.catalogue = Catalogue::default();
            info!("device unmounted");
        }
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    // ── Catalogue ────────────────────────────────────────────────

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    /// Number of files discovered by the last scan
    pub fn entry_count(&self) -> usize {
        self.catalogue.len()
    }

    pub fn entry(&self, index: usize) -> Option<&CatalogueEntry> {
        self.catalogue.get(index)
    }

    // ── Streaming read ───────────────────────────────────────────

    /// Open the catalogue entry at `index` for block-wise reading.
    ///
    /// Closes any previously open stream and resets the sequential
    /// cursor to block 0.
    pub fn open_stream(&mut self, index: usize) -> Result<()> {
        if !self.mounted {
            return Err(StorageError::NotMounted);
        }

        let entry = self
            .catalogue
            .get(index)
            .ok_or(StorageError::IndexOutOfRange {
                index: index as u32,
                limit: self.catalogue.len() as u32,
            })?;
        let path = entry.path.clone();
        let (size_bytes, total_blocks) = (entry.size_bytes, entry.total_blocks);

        self.close_stream();

        let handle = self.device.open(&path)?;
        self.stream = Some(Stream {
            handle,
            entry_index: index,
            cursor: 0,
        });

        info!("opened {path} ({size_bytes} bytes, {total_blocks} blocks)");
        Ok(())
    }

    /// Read the next sequential block.
    ///
    /// `Ok(None)` signals that every block has been consumed; repeated
    /// calls keep returning `Ok(None)` without side effects. A device
    /// that yields fewer bytes than a non-final block needs is a
    /// [`StorageError::ShortRead`] media fault.
    pub fn read_next_block(&mut self) -> Result<Option<Block>> {
        let entry_index = self
            .stream
            .as_ref()
            .ok_or(StorageError::NoOpenStream)?
            .entry_index;
        let (size_bytes, total_blocks) = self.entry_geometry(entry_index)?;

        let Some(stream) = self.stream.as_mut() else {
            return Err(StorageError::NoOpenStream);
        };

        if stream.cursor >= total_blocks {
            return Ok(None);
        }

        let block = read_block(&mut stream.handle, size_bytes, total_blocks, stream.cursor)?;
        stream.cursor += 1;
        Ok(Some(block))
    }

    /// Read one block of the currently open file by index, without
    /// moving the sequential cursor. Used to retransmit a lost block.
    pub fn read_block_at(&mut self, block_index: u32) -> Result<Block> {
        let entry_index = self
            .stream
            .as_ref()
            .ok_or(StorageError::NoOpenStream)?
            .entry_index;
        let (size_bytes, total_blocks) = self.entry_geometry(entry_index)?;

        if block_index >= total_blocks {
            return Err(StorageError::IndexOutOfRange {
                index: block_index,
                limit: total_blocks,
            });
        }

        let Some(stream) = self.stream.as_mut() else {
            return Err(StorageError::NoOpenStream);
        };
        read_block(&mut stream.handle, size_bytes, total_blocks, block_index)
    }

    /// Close the currently open file. Idempotent, safe with no stream
    /// open.
    pub fn close_stream(&mut self) {
        if self.stream.take().is_some() {
            debug!("stream closed");
        }
    }

    pub fn is_stream_open(&self) -> bool {
        self.stream.is_some()
    }

    // ── Checksum ─────────────────────────────────────────────────

    /// Compute the Fletcher-16 checksum of the catalogue entry at
    /// `index`, caching it on the entry.
    ///
    /// Opens an independent read handle; a stream opened via
    /// [`open_stream`](Self::open_stream) is not disturbed. An empty
    /// file legitimately checksums to `Ok(0)` — failure is carried by
    /// the `Err` discriminant, never by the value.
    pub fn compute_checksum(&mut self, index: usize) -> Result<u16> {
        if !self.mounted {
            return Err(StorageError::NotMounted);
        }

        let entry = self
            .catalogue
            .get(index)
            .ok_or(StorageError::IndexOutOfRange {
                index: index as u32,
                limit: self.catalogue.len() as u32,
            })?;

        if let Some(cached) = entry.checksum {
            debug!("checksum cache hit for {}", entry.path);
            return Ok(cached);
        }
        let path = entry.path.clone();

        let handle = self
            .device
            .open(&path)
            .map_err(|e| StorageError::ChecksumFailed {
                path: path.clone(),
                detail: e.to_string(),
            })?;

        let value =
            Fletcher16::digest_reader(handle).map_err(|e| StorageError::ChecksumFailed {
                path: path.clone(),
                detail: e.to_string(),
            })?;

        if let Some(entry) = self.catalogue.get_mut(index) {
            entry.checksum = Some(value);
        }

        debug!("checksum for {path}: {value:#06x}");
        Ok(value)
    }

    // ── Internal ─────────────────────────────────────────────────

    fn entry_geometry(&self, entry_index: usize) -> Result<(u32, u32)> {
        let entry = self
            .catalogue
            .get(entry_index)
            .ok_or(StorageError::NoOpenStream)?;
        Ok((entry.size_bytes, entry.total_blocks))
    }
}

/// Seek to the block's byte offset and read exactly one block.
///
/// The final block requests `BLOCK_SIZE` bytes but the file yields only
/// what remains; that shorter length is expected. EOF before the
/// expected count is a media fault.
fn read_block<H: Read + Seek>(
    handle: &mut H,
    size_bytes: u32,
    total_blocks: u32,
    block_index: u32,
) -> Result<Block> {
    let offset = u64::from(block_index) * BLOCK_SIZE as u64;
    let expected = (u64::from(size_bytes) - offset).min(BLOCK_SIZE as u64) as usize;

    handle
        .seek(SeekFrom::Start(offset))
        .map_err(|source| StorageError::Seek { offset, source })?;

    let mut payload = vec![0u8; expected];
    let mut filled = 0;
    while filled < expected {
        let n = handle.read(&mut payload[filled..])?;
        if n == 0 {
            return Err(StorageError::ShortRead {
                block: block_index,
                expected,
                actual: filled,
            });
        }
        filled += n;
    }

    Ok(Block {
        payload: payload.into(),
        block_index,
        is_last: block_index == total_blocks - 1,
    })
}
