//! Fletcher-16 whole-file integrity checksum
//!
//! Two running sums modulo 255, combined into a 16-bit value. Fast,
//! single-pass, and good enough to catch transfer corruption; the
//! gateway recomputes it after reassembling the blocks.

use crate::types::BLOCK_SIZE;
use std::io::{self, Read};

/// Streaming Fletcher-16 hasher
#[derive(Debug, Default, Clone)]
pub struct Fletcher16 {
    s1: u16,
    s2: u16,
}

impl Fletcher16 {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold more bytes into the running sums
    pub fn update(&mut self, data: &[u8]) {
        for &byte in data {
            self.s1 = (self.s1 + u16::from(byte)) % 255;
            self.s2 = (self.s2 + self.s1) % 255;
        }
    }

    /// Current checksum value: `(s2 << 8) | s1`
    pub fn value(&self) -> u16 {
        (self.s2 << 8) | self.s1
    }

    /// Drain `reader` to EOF in [`BLOCK_SIZE`] chunks and return the
    /// checksum of everything read.
    pub fn digest_reader<R: Read>(mut reader: R) -> io::Result<u16> {
        let mut hasher = Self::new();
        let mut buf = [0u8; BLOCK_SIZE];

        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }

        Ok(hasher.value())
    }
}

/// One-shot Fletcher-16 over a byte slice
pub fn fletcher16(data: &[u8]) -> u16 {
    let mut hasher = Fletcher16::new();
    hasher.update(data);
    hasher.value()
}
