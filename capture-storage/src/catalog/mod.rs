//! Catalogue of capture files discovered on the device

use crate::device::DirEntry;
use crate::types::{CatalogueEntry, MAX_CATALOGUE_ENTRIES, MAX_PATH_BYTES};
use tracing::{debug, warn};

/// File extensions accepted by the scan, compared case-insensitively
const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg"];

/// Entries whose name starts with this marker are skipped
const HIDDEN_MARKER: char = '.';

/// Ordered, bounded list of files eligible for block reading.
///
/// Insertion order is device discovery order. Scanning stops at
/// [`MAX_CATALOGUE_ENTRIES`]; when it does, [`Catalogue::is_truncated`]
/// reports it.
#[derive(Debug, Default)]
pub struct Catalogue {
    entries: Vec<CatalogueEntry>,
    truncated: bool,
}

impl Catalogue {
    /// Build a catalogue from a raw directory listing.
    ///
    /// Filters out subdirectories, hidden names, unaccepted extensions,
    /// and entries whose full path would exceed [`MAX_PATH_BYTES`].
    pub(crate) fn from_listing(root_dir: &str, listing: Vec<DirEntry>) -> Self {
        let mut entries = Vec::new();
        let mut truncated = false;

        for raw in listing {
            if entries.len() >= MAX_CATALOGUE_ENTRIES {
                warn!(
                    "catalogue full ({} entries), remaining files ignored",
                    MAX_CATALOGUE_ENTRIES
                );
                truncated = true;
                break;
            }

            if raw.is_dir || raw.name.starts_with(HIDDEN_MARKER) {
                continue;
            }
            if !has_accepted_extension(&raw.name) {
                continue;
            }

            let path = format!("{}/{}", root_dir.trim_end_matches('/'), raw.name);
            if path.len() > MAX_PATH_BYTES {
                warn!("skipping {}: path exceeds {} bytes", raw.name, MAX_PATH_BYTES);
                continue;
            }

            let entry = CatalogueEntry::new(path, raw.size_bytes);
            debug!(
                "[{}] {} — {} B, {} blocks",
                entries.len(),
                entry.path,
                entry.size_bytes,
                entry.total_blocks
            );
            entries.push(entry);
        }

        Self { entries, truncated }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when the scan stopped because the capacity bound was hit
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn get(&self, index: usize) -> Option<&CatalogueEntry> {
        self.entries.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut CatalogueEntry> {
        self.entries.get_mut(index)
    }

    pub fn entries(&self) -> &[CatalogueEntry] {
        &self.entries
    }
}

fn has_accepted_extension(name: &str) -> bool {
    name.rsplit_once('.').is_some_and(|(stem, ext)| {
        !stem.is_empty()
            && ACCEPTED_EXTENSIONS
                .iter()
                .any(|accepted| ext.eq_ignore_ascii_case(accepted))
    })
}
