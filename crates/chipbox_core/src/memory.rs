use crate::error::{Chip8Error, Result};
use crate::{FONTSET, FONT_ADDRESS, RAM_SIZE, START_ADDRESS};

/// Flat 4 KiB address space with the hex font pre-installed at 0x50.
///
/// Every access is bounds-checked; nothing wraps around the end of memory.
pub struct Memory {
    ram: [u8; RAM_SIZE],
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory {
    pub fn new() -> Self {
        let mut ram = [0; RAM_SIZE];
        let font = FONT_ADDRESS as usize;
        ram[font..font + FONTSET.len()].copy_from_slice(&FONTSET);
        Self { ram }
    }

    /// Copy `bytes` into memory starting at `offset`.
    ///
    /// Nothing is written when the image does not fit. The reserved
    /// interpreter area below 0x200 (font included) is never a valid target.
    pub fn load(&mut self, bytes: &[u8], offset: u16) -> Result<()> {
        let start = offset as usize;
        if offset < START_ADDRESS || start >= RAM_SIZE {
            return Err(Chip8Error::AddressOutOfRange { addr: start });
        }
        let capacity = RAM_SIZE - start;
        if bytes.len() > capacity {
            return Err(Chip8Error::RomTooLarge {
                size: bytes.len(),
                capacity,
            });
        }
        self.ram[start..start + bytes.len()].copy_from_slice(bytes);
        Ok(())
    }

    pub fn read(&self, addr: usize) -> Result<u8> {
        self.ram
            .get(addr)
            .copied()
            .ok_or(Chip8Error::AddressOutOfRange { addr })
    }

    pub fn write(&mut self, addr: usize, value: u8) -> Result<()> {
        let slot = self
            .ram
            .get_mut(addr)
            .ok_or(Chip8Error::AddressOutOfRange { addr })?;
        *slot = value;
        Ok(())
    }

    /// Big-endian 16-bit read: the byte at `addr` is the high byte.
    pub fn read_word(&self, addr: usize) -> Result<u16> {
        let hi = self.read(addr)? as u16;
        let lo = self.read(addr + 1)? as u16;
        Ok(hi << 8 | lo)
    }

    /// `len` bytes starting at `addr`, or the first address past the end.
    pub fn slice(&self, addr: usize, len: usize) -> Result<&[u8]> {
        Self::check_range(addr, len)?;
        Ok(&self.ram[addr..addr + len])
    }

    pub fn slice_mut(&mut self, addr: usize, len: usize) -> Result<&mut [u8]> {
        Self::check_range(addr, len)?;
        Ok(&mut self.ram[addr..addr + len])
    }

    fn check_range(addr: usize, len: usize) -> Result<()> {
        if addr >= RAM_SIZE {
            return Err(Chip8Error::AddressOutOfRange { addr });
        }
        if addr + len > RAM_SIZE {
            return Err(Chip8Error::AddressOutOfRange { addr: RAM_SIZE });
        }
        Ok(())
    }
}
