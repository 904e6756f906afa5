/*++

Licensed under the Apache-2.0 license.

File Name:

    handoff.rs

Abstract:

    File contains the processor hand-off bookkeeping: deferred hand-offs
    of the PDI being loaded and the ATF hand-off parameter table.

--*/

use crate::platform::CpuHandoff;
use xloader_drivers::SystemMemory;
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::{
    AtfHandoffEntry, AtfHandoffParams, PartitionDevice, PartitionHeader, MAX_HANDOFF_CPUS,
};
use zerocopy::AsBytes;

const ATF_FLAG_EL_MASK: u64 = 0b11;
const ATF_FLAG_CPU_MASK: u64 = 0b111;

/// Hand-offs of the image described by `prtns`; a CPU started by several
/// partitions is entered at the last one
pub fn image_handoffs(img_id: u32, prtns: &[PartitionHeader]) -> Vec<CpuHandoff> {
    let mut handoffs: Vec<CpuHandoff> = Vec::new();
    for ph in prtns.iter().filter(|ph| ph.dstn_cpu() != 0) {
        let handoff = CpuHandoff {
            img_id,
            cpu: ph.dstn_cpu(),
            entry_point: ph.dst_exec_addr,
            a32: ph.is_a32(),
            exception_level: ph.exception_level(),
            trustzone: ph.is_trustzone(),
        };
        match handoffs.iter_mut().find(|h| h.cpu == handoff.cpu) {
            Some(existing) => *existing = handoff,
            None => handoffs.push(handoff),
        }
    }
    handoffs
}

/// Hand-offs postponed until every image of the PDI is loaded
pub struct DelayedHandoffs {
    list: Vec<CpuHandoff>,
    capacity: usize,
}

impl DelayedHandoffs {
    pub fn new(capacity: usize) -> Self {
        Self {
            list: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, handoff: CpuHandoff) -> LoaderResult<()> {
        if self.list.len() >= self.capacity {
            Err(LoaderError::LOADER_DELAY_HANDOFF_LIST_FULL)?;
        }
        self.list.push(handoff);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Hand-offs in the order they were deferred
    pub fn drain(&mut self) -> impl Iterator<Item = CpuHandoff> + '_ {
        self.list.drain(..)
    }
}

/// Entry points of the PS processors, read by the trusted firmware
pub struct AtfHandoff {
    params: AtfHandoffParams,
}

impl Default for AtfHandoff {
    fn default() -> Self {
        Self::new()
    }
}

impl AtfHandoff {
    pub fn new() -> Self {
        Self {
            params: AtfHandoffParams {
                magic: AtfHandoffParams::MAGIC,
                ..Default::default()
            },
        }
    }

    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn entries(&self) -> &[AtfHandoffEntry] {
        &self.params.entries[..self.params.num_entries as usize]
    }

    fn flags(ph: &PartitionHeader) -> u64 {
        let mut flags = (u64::from(ph.exception_level()) & ATF_FLAG_EL_MASK)
            << AtfHandoffEntry::FLAG_EL_SHIFT;
        flags |= (u64::from(ph.dstn_cpu()) & ATF_FLAG_CPU_MASK) << AtfHandoffEntry::FLAG_CPU_SHIFT;
        if ph.is_a32() {
            flags |= AtfHandoffEntry::FLAG_A32;
        }
        if ph.is_trustzone() {
            flags |= AtfHandoffEntry::FLAG_TZ;
        }
        flags
    }

    /// Record a loaded partition.
    ///
    /// Only PS partitions that start a CPU are recorded; a CPU already in
    /// the table gets its entry replaced.
    pub fn update(&mut self, ph: &PartitionHeader) -> LoaderResult<()> {
        if ph.dstn_device() != PartitionDevice::Ps || ph.dstn_cpu() == 0 {
            return Ok(());
        }
        let entry = AtfHandoffEntry {
            entry_point: ph.dst_exec_addr,
            flags: Self::flags(ph),
        };
        let cpu_mask = ATF_FLAG_CPU_MASK << AtfHandoffEntry::FLAG_CPU_SHIFT;
        let num = self.params.num_entries as usize;
        if let Some(existing) = self.params.entries[..num]
            .iter_mut()
            .find(|e| e.flags & cpu_mask == entry.flags & cpu_mask)
        {
            *existing = entry;
            return Ok(());
        }
        if num >= MAX_HANDOFF_CPUS {
            Err(LoaderError::LOADER_NUM_HANDOFF_CPUS_OVERFLOW)?;
        }
        self.params.entries[num] = entry;
        self.params.num_entries += 1;
        Ok(())
    }

    /// Copy the table to memory.
    ///
    /// # Returns
    ///
    /// * Bytes written
    pub fn store(&self, mem: &mut SystemMemory, dst: u64, size: u32) -> LoaderResult<u32> {
        let bytes = self.params.as_bytes();
        if (size as usize) < bytes.len() {
            Err(LoaderError::CMD_INVALID_HANDOFF_PARAM_DEST_SIZE)?;
        }
        mem.write(dst, bytes)?;
        Ok(bytes.len() as u32)
    }
}
