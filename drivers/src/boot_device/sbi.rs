/*++

Licensed under the Apache-2.0 license.

File Name:

    sbi.rs

Abstract:

    File contains the slave boot interface device serving JTAG, SMAP, SBI
    and PCIe. The PDI arrives as a byte stream that can only be consumed
    forward.

--*/

use super::{transfer, BootDevice, CopyMode, PendingCopy, Transfer};
use crate::memory::SystemMemory;
use xloader_error::{LoaderError, LoaderResult};

pub struct Sbi {
    name: &'static str,
    stream: Vec<u8>,
    /// Stream offset of the next unread byte
    pos: u64,
    initialized: bool,
    pending: PendingCopy,
}

impl Sbi {
    /// # Arguments
    ///
    /// * `name` - Interface name, e.g. "jtag" or "smap"
    /// * `stream` - Bytes the host pushes through the interface
    pub fn new(name: &'static str, stream: Vec<u8>) -> Self {
        Self {
            name,
            stream,
            pos: 0,
            initialized: false,
            pending: PendingCopy::default(),
        }
    }

    pub fn position(&self) -> u64 {
        self.pos
    }
}

fn read_forward(stream: &[u8], pos: &mut u64, src: u64, buf: &mut [u8]) -> LoaderResult<()> {
    if src < *pos {
        Err(LoaderError::DEVICE_SBI_BACKWARD_SEEK)?;
    }
    // Bytes between the current position and `src` are drained
    let start = usize::try_from(src).map_err(|_| LoaderError::DEVICE_COPY_OUT_OF_RANGE)?;
    let data = stream
        .get(start..start + buf.len())
        .ok_or(LoaderError::DEVICE_COPY_OUT_OF_RANGE)?;
    buf.copy_from_slice(data);
    *pos = src + buf.len() as u64;
    Ok(())
}

impl BootDevice for Sbi {
    fn name(&self) -> &'static str {
        self.name
    }

    fn init(&mut self, _flags: u32, _poll_retries: u32) -> LoaderResult<()> {
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
        let stream = &self.stream;
        let pos = &mut self.pos;
        transfer(
            &mut self.pending,
            mem,
            Transfer { src, dst, len },
            mode,
            false,
            |_, src, buf| read_forward(stream, pos, src, buf),
        )
    }

    fn release(&mut self) -> LoaderResult<()> {
        self.pending.clear();
        self.initialized = false;
        Ok(())
    }
}
