//! End-to-end run against real files through the host-directory device

use capture_storage::{
    BLOCK_SIZE, LocalDevice, StorageConfig, StorageError, StorageReader, fletcher16,
};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn test_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 131 % 253) as u8).collect()
}

/// Build an SD-card-like layout: /images with two captures plus noise
/// that the scan must ignore.
fn sd_card_fixture() -> TempDir {
    let base = TempDir::new().expect("tempdir");
    let images = base.path().join("images");
    fs::create_dir(&images).expect("mkdir images");

    fs::write(images.join("img_001.jpg"), test_bytes(1000)).expect("write");
    fs::write(images.join("img_002.JPEG"), test_bytes(512)).expect("write");
    fs::write(images.join("notes.txt"), b"not a capture").expect("write");
    fs::write(images.join(".trashed.jpg"), b"hidden").expect("write");
    fs::create_dir(images.join("thumbs")).expect("mkdir thumbs");

    base
}

fn index_of(reader: &StorageReader<LocalDevice>, name: &str) -> usize {
    (0..reader.entry_count())
        .find(|&i| reader.entry(i).is_some_and(|e| e.path.ends_with(name)))
        .unwrap_or_else(|| panic!("{name} not catalogued"))
}

#[test]
fn scans_only_eligible_captures() {
    let base = sd_card_fixture();
    let mut reader = StorageReader::new(
        LocalDevice::new(base.path()),
        StorageConfig::default(),
    );

    let count = reader.mount_and_scan().expect("mount and scan");
    assert_eq!(count, 2);
    assert!(!reader.catalogue().is_truncated());

    let idx = index_of(&reader, "img_001.jpg");
    let entry = reader.entry(idx).expect("entry");
    assert_eq!(entry.size_bytes, 1000);
    assert_eq!(entry.total_blocks, 2);
}

#[test]
fn round_trips_blocks_and_checksum_from_disk() {
    let base = sd_card_fixture();
    let original = test_bytes(1000);
    let mut reader = StorageReader::new(
        LocalDevice::new(base.path()),
        StorageConfig::default(),
    );
    reader.mount_and_scan().expect("mount and scan");

    let idx = index_of(&reader, "img_001.jpg");
    reader.open_stream(idx).expect("open");

    let mut reassembled = Vec::new();
    while let Some(block) = reader.read_next_block().expect("read") {
        assert!(block.len() <= BLOCK_SIZE);
        reassembled.extend_from_slice(&block.payload);
    }
    assert_eq!(reassembled, original);

    // Retransmit the final partial block
    let last = reader.read_block_at(1).expect("retransmit");
    assert_eq!(last.len(), 488);
    assert!(last.is_last);

    assert_eq!(
        reader.compute_checksum(idx).expect("checksum"),
        fletcher16(&original)
    );

    reader.close_stream();
    reader.unmount();
    assert!(!reader.is_mounted());
}

#[test]
fn missing_base_directory_is_device_unavailable() {
    let mut reader = StorageReader::new(
        LocalDevice::new("/nonexistent/sdcard"),
        StorageConfig::default(),
    );

    assert!(matches!(
        reader.mount_and_scan(),
        Err(StorageError::DeviceUnavailable)
    ));
    assert!(!reader.is_mounted());
}

#[test]
fn empty_image_directory_reports_no_matching_files() {
    let base = TempDir::new().expect("tempdir");
    fs::create_dir(base.path().join("images")).expect("mkdir");

    let mut reader = StorageReader::new(
        LocalDevice::new(base.path()),
        StorageConfig::default(),
    );

    assert!(matches!(
        reader.mount_and_scan(),
        Err(StorageError::NoMatchingFiles)
    ));
    assert!(reader.is_mounted());

    // A file appearing later is picked up by a rescan without remount
    fs::write(base.path().join("images/late.jpg"), test_bytes(10)).expect("write");
    assert_eq!(reader.mount_and_scan().expect("rescan"), 1);
}
