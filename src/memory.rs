use crate::constants::{GLYPH_SHEET, GLYPH_START, MAX_ROM_SIZE, MEMORY_SIZE, PROGRAM_START};
use crate::error::Fault;

// NB. addresses are usize here so that I + offset can be checked without wrapping

/// # Memory
/// Flat 4K address space.
///
///   0x000-0x04f  unused
///   0x050-0x09f  hexadecimal glyphs
///   0x0a0-0x1ff  unused
///   0x200-0xfff  program
///
/// Every access is bounds checked; anything past 0xFFF is `Fault::Address`.
/// Everything below 0x200 is read-only, so writes there fault as well and the
/// glyphs stay intact.
#[derive(Copy, Clone)]
pub struct Memory {
    bytes: [u8; MEMORY_SIZE],
}

impl Memory {
    /// Zeroed memory with the glyph sheet in place.
    pub fn new() -> Self {
        let mut bytes = [0; MEMORY_SIZE];
        let start = GLYPH_START as usize;
        bytes[start..start + GLYPH_SHEET.len()].copy_from_slice(&GLYPH_SHEET);
        Memory { bytes }
    }

    /// Copy a ROM in verbatim at `PROGRAM_START`.
    pub fn load_rom(&mut self, rom: &[u8]) -> Result<(), Fault> {
        if rom.len() > MAX_ROM_SIZE {
            return Err(Fault::RomTooLarge {
                size: rom.len(),
                max_size: MAX_ROM_SIZE,
            });
        }
        self.slice_mut(PROGRAM_START as usize, rom.len())?
            .copy_from_slice(rom);
        Ok(())
    }

    pub fn read(&self, addr: usize) -> Result<u8, Fault> {
        self.bytes
            .get(addr)
            .copied()
            .ok_or(Fault::Address { address: addr })
    }

    pub fn write(&mut self, addr: usize, value: u8) -> Result<(), Fault> {
        self.slice_mut(addr, 1)?[0] = value;
        Ok(())
    }

    /// Two bytes at `addr` combined big-endian.
    pub fn word(&self, addr: usize) -> Result<u16, Fault> {
        let word = self.slice(addr, 2)?;
        Ok(u16::from(word[0]) << 8 | u16::from(word[1]))
    }

    /// `len` bytes starting at `addr`.
    pub fn slice(&self, addr: usize, len: usize) -> Result<&[u8], Fault> {
        let end = Memory::end_of(addr, len)?;
        Ok(&self.bytes[addr..end])
    }

    /// `len` writable bytes starting at `addr`; the range must lie in the
    /// program area.
    pub fn slice_mut(&mut self, addr: usize, len: usize) -> Result<&mut [u8], Fault> {
        if addr < PROGRAM_START as usize {
            return Err(Fault::Address { address: addr });
        }
        let end = Memory::end_of(addr, len)?;
        Ok(&mut self.bytes[addr..end])
    }

    /// The exclusive end of `addr..addr + len`, or the first address that
    /// falls outside memory.
    fn end_of(addr: usize, len: usize) -> Result<usize, Fault> {
        let end = addr.saturating_add(len);
        if end > MEMORY_SIZE {
            Err(Fault::Address {
                address: addr.max(MEMORY_SIZE),
            })
        } else {
            Ok(end)
        }
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
