/*++

Licensed under the Apache-2.0 license.

File Name:

    memory.rs

Abstract:

    File contains the address-mapped system memory the loader reads PDIs
    from and writes partitions into.

--*/

use crate::memory_layout::*;
use xloader_error::{LoaderError, LoaderResult};

/// One contiguous, address-mapped memory region
#[derive(Debug)]
pub struct MemoryRegion {
    name: &'static str,
    base: u64,
    data: Vec<u8>,
    write_protected: bool,
}

impl MemoryRegion {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn base(&self) -> u64 {
        self.base
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }

    fn contains(&self, addr: u64, len: u64) -> bool {
        addr >= self.base
            && addr
                .checked_add(len)
                .map_or(false, |end| end <= self.base + self.size())
    }
}

/// Address-mapped memory made of non-overlapping regions
#[derive(Debug, Default)]
pub struct SystemMemory {
    regions: Vec<MemoryRegion>,
}

impl SystemMemory {
    /// Creates memory with PMC RAM, OCM, DDR and the PL configuration window
    pub fn with_default_layout() -> Self {
        let mut mem = Self::default();
        for (name, base, size) in [
            ("pmc_ram", PMC_RAM_ORG, PMC_RAM_SIZE),
            ("ocm", OCM_ORG, OCM_SIZE),
            ("ddr", DDR_ORG, DDR_SIZE),
            ("pl", PL_CFRAME_ORG, PL_CFRAME_SIZE),
        ] {
            mem.regions.push(MemoryRegion {
                name,
                base,
                data: vec![0u8; size as usize],
                write_protected: false,
            });
        }
        mem
    }

    /// Maps a zero-filled region.
    ///
    /// # Arguments
    ///
    /// * `name` - Region name
    /// * `base` - First address
    /// * `size` - Size in bytes
    pub fn add_region(&mut self, name: &'static str, base: u64, size: u64) -> LoaderResult<()> {
        let end = base
            .checked_add(size)
            .ok_or(LoaderError::MEMORY_OUT_OF_RANGE)?;
        if self
            .regions
            .iter()
            .any(|r| base < r.base + r.size() && r.base < end)
        {
            Err(LoaderError::MEMORY_REGION_OVERLAP)?;
        }
        self.regions.push(MemoryRegion {
            name,
            base,
            data: vec![0u8; size as usize],
            write_protected: false,
        });
        Ok(())
    }

    /// Marks the region containing `addr` as rejecting writes
    pub fn set_write_protect(&mut self, addr: u64, protect: bool) -> LoaderResult<()> {
        let region = self
            .regions
            .iter_mut()
            .find(|r| r.contains(addr, 1))
            .ok_or(LoaderError::MEMORY_OUT_OF_RANGE)?;
        region.write_protected = protect;
        Ok(())
    }

    pub fn regions(&self) -> &[MemoryRegion] {
        &self.regions
    }

    /// Returns true if `[addr, addr + len)` lies within one region
    pub fn is_valid_range(&self, addr: u64, len: u64) -> bool {
        self.regions.iter().any(|r| r.contains(addr, len))
    }

    fn region_index(&self, addr: u64, len: u64) -> LoaderResult<usize> {
        self.regions
            .iter()
            .position(|r| r.contains(addr, len))
            .ok_or(LoaderError::MEMORY_OUT_OF_RANGE)
    }

    /// Borrows `len` bytes at `addr`
    pub fn slice(&self, addr: u64, len: usize) -> LoaderResult<&[u8]> {
        let idx = self.region_index(addr, len as u64)?;
        let region = &self.regions[idx];
        let start = (addr - region.base) as usize;
        Ok(&region.data[start..start + len])
    }

    /// Mutably borrows `len` bytes at `addr`
    pub fn slice_mut(&mut self, addr: u64, len: usize) -> LoaderResult<&mut [u8]> {
        let idx = self.region_index(addr, len as u64)?;
        let region = &mut self.regions[idx];
        if region.write_protected {
            Err(LoaderError::MEMORY_WRITE_PROTECTED)?;
        }
        let start = (addr - region.base) as usize;
        Ok(&mut region.data[start..start + len])
    }

    pub fn read(&self, addr: u64, buf: &mut [u8]) -> LoaderResult<()> {
        buf.copy_from_slice(self.slice(addr, buf.len())?);
        Ok(())
    }

    pub fn write(&mut self, addr: u64, data: &[u8]) -> LoaderResult<()> {
        self.slice_mut(addr, data.len())?.copy_from_slice(data);
        Ok(())
    }

    pub fn read_u32(&self, addr: u64) -> LoaderResult<u32> {
        let mut word = [0u8; 4];
        self.read(addr, &mut word)?;
        Ok(u32::from_le_bytes(word))
    }

    pub fn write_u32(&mut self, addr: u64, val: u32) -> LoaderResult<()> {
        self.write(addr, &val.to_le_bytes())
    }

    /// Copies `len` bytes between addresses, possibly across regions
    pub fn copy(&mut self, src: u64, dst: u64, len: usize) -> LoaderResult<()> {
        let data = self.slice(src, len)?.to_vec();
        self.write(dst, &data)
    }

    /// Zeroes `len` bytes at `addr` and verifies they read back as zero.
    ///
    /// # Returns
    ///
    /// * `LoaderError::MEMORY_CLEAR_VERIFY_FAIL` if any byte could not be cleared
    pub fn clear(&mut self, addr: u64, len: usize) -> LoaderResult<()> {
        match self.slice_mut(addr, len) {
            Ok(buf) => buf.fill(0),
            Err(_) => Err(LoaderError::MEMORY_CLEAR_VERIFY_FAIL)?,
        }
        if !self.is_zero(addr, len)? {
            Err(LoaderError::MEMORY_CLEAR_VERIFY_FAIL)?;
        }
        Ok(())
    }

    /// Returns true if every byte in the range is zero
    pub fn is_zero(&self, addr: u64, len: usize) -> LoaderResult<bool> {
        Ok(self.slice(addr, len)?.iter().all(|&b| b == 0))
    }
}
