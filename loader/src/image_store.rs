/*++

Licensed under the Apache-2.0 license.

File Name:

    image_store.rs

Abstract:

    File contains the DDR image store. PDIs are packed back to back from
    the start of the store and looked up by id.

--*/

use xloader_drivers::{cprintln, SystemMemory};
use xloader_error::{LoaderError, LoaderResult};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StoredPdi {
    pub id: u32,
    pub addr: u64,
    pub len: u64,
}

pub struct ImageStore {
    base: u64,
    size: u64,
    max_pdis: usize,
    pdis: Vec<StoredPdi>,
}

impl ImageStore {
    pub fn new(base: u64, size: u64, max_pdis: usize) -> Self {
        Self {
            base,
            size,
            max_pdis,
            pdis: Vec::new(),
        }
    }

    pub fn pdis(&self) -> &[StoredPdi] {
        &self.pdis
    }

    fn check_configured(&self) -> LoaderResult<()> {
        if self.size == 0 {
            Err(LoaderError::CMD_PDI_IMG_STORE_CFG_NOT_SET)?;
        }
        Ok(())
    }

    fn used(&self) -> u64 {
        self.pdis.last().map_or(0, |p| p.addr + p.len - self.base)
    }

    /// Address of stored PDI `id`
    pub fn resolve(&self, id: u32) -> LoaderResult<u64> {
        self.check_configured()?;
        self.pdis
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.addr)
            .ok_or(LoaderError::DEVICE_IMG_STORE_PDI_NOT_FOUND)
    }

    /// Remove PDI `id` and close the gap it leaves.
    pub fn remove(&mut self, mem: &mut SystemMemory, id: u32) -> LoaderResult<()> {
        self.check_configured()?;
        if self.pdis.is_empty() {
            Err(LoaderError::CMD_PDI_LIST_EMPTY)?;
        }
        let idx = self
            .pdis
            .iter()
            .position(|p| p.id == id)
            .ok_or(LoaderError::CMD_PDI_ADDR_NOT_FOUND)?;
        let end = self.base + self.used();
        let removed = self.pdis.remove(idx);
        let tail = end - (removed.addr + removed.len);
        if tail > 0 {
            mem.copy(removed.addr + removed.len, removed.addr, tail as usize)?;
        }
        for pdi in self.pdis[idx..].iter_mut() {
            pdi.addr -= removed.len;
        }
        mem.clear(end - removed.len, removed.len as usize)?;
        cprintln!("[xloader] Removed PDI 0x{:08x} from image store", id);
        Ok(())
    }

    /// Reserves room for `len` more bytes of PDI `id` and returns their
    /// address. Data for the most recently stored PDI is appended to it,
    /// any other id starts a new PDI and replaces an older copy.
    fn reserve(&mut self, mem: &mut SystemMemory, id: u32, len: u64) -> LoaderResult<u64> {
        self.check_configured()?;
        let append = self.pdis.last().is_some_and(|p| p.id == id);
        if !append && self.pdis.iter().any(|p| p.id == id) {
            self.remove(mem, id)?;
        }
        if (!append && self.pdis.len() >= self.max_pdis) || self.used() + len > self.size {
            Err(LoaderError::CMD_PDI_IMG_STORE_FULL)?;
        }
        let dst = self.base + self.used();
        match self.pdis.last_mut() {
            Some(last) if append => last.len += len,
            _ => self.pdis.push(StoredPdi { id, addr: dst, len }),
        }
        Ok(dst)
    }

    /// Copy a PDI already in memory into the store.
    ///
    /// # Arguments
    ///
    /// * `mem` - System memory
    /// * `id` - PDI id
    /// * `src` - Address of the PDI
    /// * `len` - PDI length in bytes
    pub fn add(&mut self, mem: &mut SystemMemory, id: u32, src: u64, len: u64) -> LoaderResult<()> {
        if !mem.is_valid_range(src, len) {
            Err(LoaderError::MEMORY_OUT_OF_RANGE)?;
        }
        let append = self.pdis.last().is_some_and(|p| p.id == id);
        if append {
            self.remove(mem, id)?;
        }
        let dst = self.reserve(mem, id, len)?;
        mem.copy(src, dst, len as usize)?;
        cprintln!(
            "[xloader] Added PDI 0x{:08x} to image store at 0x{:x}",
            id,
            dst
        );
        Ok(())
    }

    /// Append `data` to PDI `id`, creating it if it is not the PDI
    /// currently being written
    pub fn write(&mut self, mem: &mut SystemMemory, id: u32, data: &[u8]) -> LoaderResult<()> {
        let len = data.len() as u64;
        let dst = self.reserve(mem, id, len)?;
        if let Err(err) = mem.write(dst, data) {
            match self.pdis.last_mut() {
                Some(last) if last.len > len => last.len -= len,
                _ => {
                    self.pdis.pop();
                }
            }
            Err(err)?;
        }
        Ok(())
    }
}
