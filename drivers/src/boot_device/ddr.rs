/*++

Licensed under the Apache-2.0 license.

File Name:

    ddr.rs

Abstract:

    File contains the memory-to-memory boot device used for PDIs already
    resident in DDR and for the image store. Non-blocking copies run when
    they are waited on, like a DMA completing in the background.

--*/

use super::{transfer, BootDevice, CopyMode, PendingCopy, Transfer};
use crate::memory::SystemMemory;
use xloader_error::{LoaderError, LoaderResult};

pub struct Ddr {
    name: &'static str,
    initialized: bool,
    pending: PendingCopy,
}

impl Ddr {
    pub fn new() -> Self {
        Self::named("ddr")
    }

    pub fn named(name: &'static str) -> Self {
        Self {
            name,
            initialized: false,
            pending: PendingCopy::default(),
        }
    }
}

impl Default for Ddr {
    fn default() -> Self {
        Self::new()
    }
}

impl BootDevice for Ddr {
    fn name(&self) -> &'static str {
        self.name
    }

    fn init(&mut self, _flags: u32, _poll_retries: u32) -> LoaderResult<()> {
        self.pending.clear();
        self.initialized = true;
        Ok(())
    }

    fn copy(
        &mut self,
        mem: &mut SystemMemory,
        src: u64,
        dst: u64,
        len: u32,
        mode: CopyMode,
    ) -> LoaderResult<()> {
        if !self.initialized {
            Err(LoaderError::DEVICE_NOT_INITIALIZED)?;
        }
        transfer(
            &mut self.pending,
            mem,
            Transfer { src, dst, len },
            mode,
            true,
            |mem, src, buf| {
                mem.read(src, buf)
                    .map_err(|_| LoaderError::DEVICE_COPY_OUT_OF_RANGE)
            },
        )
    }

    fn release(&mut self) -> LoaderResult<()> {
        self.pending.clear();
        self.initialized = false;
        Ok(())
    }
}
