use std::ops::{Index, IndexMut};

use anyhow::{bail, Result};

/// Total addressable memory size (64 KiB).
pub const MEMORY_SIZE: usize = 0x10000;

/// Flat 64 KiB address space owned by the CPU.
///
/// Every address is a `u16`, so accesses wrap modulo 65536 by construction
/// and can never fall outside the buffer.
pub struct Memory {
    data: Box<[u8]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    /// Create a zero-filled address space.
    pub fn new() -> Self {
        Self {
            data: vec![0; MEMORY_SIZE].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn read(&self, addr: u16) -> u8 {
        self.data[addr as usize]
    }

    #[inline]
    pub fn write(&mut self, addr: u16, value: u8) {
        self.data[addr as usize] = value;
    }

    /// Read a little-endian word (`[addr]` low, `[addr + 1]` high).
    pub fn read_word(&self, addr: u16) -> u16 {
        u16::from_le_bytes([self.read(addr), self.read(addr.wrapping_add(1))])
    }

    /// Write a little-endian word (`[addr]` low, `[addr + 1]` high).
    pub fn write_word(&mut self, addr: u16, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        self.write(addr, lo);
        self.write(addr.wrapping_add(1), hi);
    }

    /// Copy an image verbatim into memory starting at `origin`.
    pub fn load(&mut self, origin: u16, image: &[u8]) -> Result<()> {
        let start = origin as usize;
        let end = start + image.len();
        if end > MEMORY_SIZE {
            bail!(
                "image of {} bytes does not fit at 0x{:04X} (only {} bytes available)",
                image.len(),
                origin,
                MEMORY_SIZE - start
            );
        }
        self.data[start..end].copy_from_slice(image);
        Ok(())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Borrow `len` bytes starting at `start`.
    ///
    /// The range is clamped to the end of the address space.
    pub fn region(&self, start: u16, len: usize) -> &[u8] {
        let start = start as usize;
        let end = (start + len).min(MEMORY_SIZE);
        &self.data[start..end]
    }
}

impl Index<u16> for Memory {
    type Output = u8;

    fn index(&self, addr: u16) -> &u8 {
        &self.data[addr as usize]
    }
}

impl IndexMut<u16> for Memory {
    fn index_mut(&mut self, addr: u16) -> &mut u8 {
        &mut self.data[addr as usize]
    }
}
