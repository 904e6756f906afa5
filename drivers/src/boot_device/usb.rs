/*++

Licensed under the Apache-2.0 license.

File Name:

    usb.rs

Abstract:

    File contains the USB DFU boot device. The host downloads the whole
    PDI into a staging buffer, which is then read like memory.

--*/

use super::{read_medium, transfer, BootDevice, CopyMode, PendingCopy, Transfer};
use crate::memory::SystemMemory;
use crate::{cprintln, wait};
use xloader_error::{LoaderError, LoaderResult};

pub struct UsbDfu {
    staging: Vec<u8>,
    /// Length the host announced for the download
    expected_len: usize,
    /// Bytes the host delivers per poll
    bytes_per_poll: usize,
    received: usize,
    initialized: bool,
    pending: PendingCopy,
}

impl UsbDfu {
    /// # Arguments
    ///
    /// * `image` - PDI the host downloads
    /// * `bytes_per_poll` - Download progress per poll
    pub fn new(image: Vec<u8>, bytes_per_poll: usize) -> Self {
        let expected_len = image.len();
        Self {
            staging: image,
            expected_len,
            bytes_per_poll,
            received: 0,
            initialized: false,
            pending: PendingCopy::default(),
        }
    }

    /// Host stops after `len` bytes
    pub fn with_truncated_download(mut self, len: usize) -> Self {
        self.staging.truncate(len);
        self
    }
}

impl BootDevice for UsbDfu {
    fn name(&self) -> &'static str {
        "usb"
    }

    fn init(&mut self, _flags: u32, poll_retries: u32) -> LoaderResult<()> {
        let available = self.staging.len();
        let step = self.bytes_per_poll;
        let received = &mut self.received;
        wait::until(
            || {
                *received = (*received + step).min(available);
                *received == available
            },
            poll_retries,
        )?;
        if self.received != self.expected_len {
            cprintln!("[usb] DFU download incomplete");
            Err(LoaderError::DEVICE_USB_DFU_INCOMPLETE)?;
        }
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
        let staging = &self.staging;
        transfer(
            &mut self.pending,
            mem,
            Transfer { src, dst, len },
            mode,
            false,
            |_, src, buf| read_medium(staging, src, buf),
        )
    }

    fn release(&mut self) -> LoaderResult<()> {
        self.pending.clear();
        self.initialized = false;
        self.received = 0;
        Ok(())
    }
}
