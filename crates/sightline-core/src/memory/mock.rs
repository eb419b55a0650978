//! In-memory stand-in for a remote process.

use std::cell::Cell;
use std::collections::HashMap;

use glam::Vec3;

use super::{ReadMemory, RemoteAddr};
use crate::error::{Error, Result};

/// Sparse byte-addressed memory. Reads fail unless every requested byte was
/// written by the builder.
pub struct MockMemoryReader {
    bytes: HashMap<u64, u8>,
    reads: Cell<usize>,
}

impl MockMemoryReader {
    /// Number of `read_bytes` calls served so far, successful or not.
    pub fn read_count(&self) -> usize {
        self.reads.get()
    }
}

impl ReadMemory for MockMemoryReader {
    fn read_bytes(&self, address: RemoteAddr, size: usize) -> Result<Vec<u8>> {
        self.reads.set(self.reads.get() + 1);
        (0..size as u64)
            .map(|i| {
                let addr = address.get().wrapping_add(i);
                self.bytes
                    .get(&addr)
                    .copied()
                    .ok_or_else(|| Error::MemoryReadFailed {
                        address: addr,
                        message: "unmapped".to_string(),
                    })
            })
            .collect()
    }
}

#[derive(Default)]
pub struct MockMemoryBuilder {
    bytes: HashMap<u64, u8>,
}

impl MockMemoryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_bytes(mut self, address: u64, data: &[u8]) -> Self {
        for (i, b) in data.iter().enumerate() {
            self.bytes.insert(address + i as u64, *b);
        }
        self
    }

    pub fn write_i32(self, address: u64, value: i32) -> Self {
        self.write_bytes(address, &value.to_le_bytes())
    }

    pub fn write_u64(self, address: u64, value: u64) -> Self {
        self.write_bytes(address, &value.to_le_bytes())
    }

    pub fn write_f32(self, address: u64, value: f32) -> Self {
        self.write_bytes(address, &value.to_le_bytes())
    }

    pub fn write_vec3(self, address: u64, value: Vec3) -> Self {
        self.write_f32(address, value.x)
            .write_f32(address + 4, value.y)
            .write_f32(address + 8, value.z)
    }

    pub fn write_f32_array(self, address: u64, values: &[f32]) -> Self {
        values
            .iter()
            .enumerate()
            .fold(self, |b, (i, v)| b.write_f32(address + i as u64 * 4, *v))
    }

    pub fn build(self) -> MockMemoryReader {
        MockMemoryReader {
            bytes: self.bytes,
            reads: Cell::new(0),
        }
    }
}
