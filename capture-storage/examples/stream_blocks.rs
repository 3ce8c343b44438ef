//! Stream every catalogued capture block by block
//!
//! Points the reader at a host directory standing in for the SD card
//! (layout: `<base>/images/*.jpg`) and walks the full transfer path:
//! mount, scan, per-file block streaming, checksum.
//!
//! Usage: `cargo run --example stream_blocks -- <base-dir>`

use capture_storage::{LocalDevice, StorageConfig, StorageReader};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let base = std::env::args()
        .nth(1)
        .unwrap_or_else(|| String::from("."));

    println!("Capture Block Streaming Example");
    println!("===============================\n");

    let device = LocalDevice::new(&base);
    let mut reader = StorageReader::new(device, StorageConfig::default());

    let count = reader.mount_and_scan()?;
    println!("Found {count} capture(s) under {base}/images\n");

    for index in 0..count {
        let (path, size, blocks) = {
            let entry = reader.entry(index).ok_or("missing entry")?;
            (entry.path.clone(), entry.size_bytes, entry.total_blocks)
        };
        println!("[{index}] {path} — {size} B, {blocks} block(s)");

        reader.open_stream(index)?;
        let mut streamed = 0usize;
        while let Some(block) = reader.read_next_block()? {
            streamed += block.len();
            if block.is_last {
                println!(
                    "    streamed {} block(s), {} bytes total",
                    block.block_index + 1,
                    streamed
                );
            }
        }
        reader.close_stream();

        let checksum = reader.compute_checksum(index)?;
        println!("    fletcher-16: {checksum:#06x}");
    }

    reader.unmount();
    println!("\n✓ Device unmounted");

    Ok(())
}
