/*++

Licensed under the Apache-2.0 license.

File Name:

    flash.rs

Abstract:

    File contains the QSPI and OSPI flash boot devices.

--*/

use super::{read_medium, transfer, BootDevice, CopyMode, PendingCopy, Transfer};
use crate::memory::SystemMemory;
use crate::wait;
use xloader_error::{LoaderError, LoaderResult};

/// Byte offset between consecutive multiboot images
pub const MULTIBOOT_STRIDE: u64 = 0x8000;
/// Addressable range in 24-bit address mode
pub const QSPI24_MAX_ADDR: u64 = 0x100_0000;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FlashKind {
    Qspi24,
    Qspi32,
    Ospi,
}

/// Serial NOR flash; the image sits at `multiboot * 0x8000`
pub struct Flash {
    kind: FlashKind,
    contents: Vec<u8>,
    base: u64,
    busy_polls: u32,
    initialized: bool,
    pending: PendingCopy,
}

impl Flash {
    pub fn new(kind: FlashKind, contents: Vec<u8>) -> Self {
        Self {
            kind,
            contents,
            base: 0,
            busy_polls: 0,
            initialized: false,
            pending: PendingCopy::default(),
        }
    }

    /// Number of status polls that report busy before the flash is ready
    pub fn with_busy_polls(mut self, polls: u32) -> Self {
        self.busy_polls = polls;
        self
    }

    pub fn contents_mut(&mut self) -> &mut Vec<u8> {
        &mut self.contents
    }
}

impl BootDevice for Flash {
    fn name(&self) -> &'static str {
        match self.kind {
            FlashKind::Qspi24 => "qspi24",
            FlashKind::Qspi32 => "qspi32",
            FlashKind::Ospi => "ospi",
        }
    }

    fn init(&mut self, flags: u32, poll_retries: u32) -> LoaderResult<()> {
        let busy = &mut self.busy_polls;
        wait::until(
            || {
                if *busy == 0 {
                    return true;
                }
                *busy -= 1;
                false
            },
            poll_retries,
        )?;
        self.base = u64::from(flags) * MULTIBOOT_STRIDE;
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
        let offset = self
            .base
            .checked_add(src)
            .ok_or(LoaderError::DEVICE_COPY_OUT_OF_RANGE)?;
        if self.kind == FlashKind::Qspi24 && offset + u64::from(len) > QSPI24_MAX_ADDR {
            Err(LoaderError::DEVICE_QSPI24_ADDR_RANGE)?;
        }
        let contents = &self.contents;
        transfer(
            &mut self.pending,
            mem,
            Transfer {
                src: offset,
                dst,
                len,
            },
            mode,
            false,
            |_, src, buf| read_medium(contents, src, buf),
        )
    }

    fn release(&mut self) -> LoaderResult<()> {
        self.pending.clear();
        self.initialized = false;
        Ok(())
    }
}
