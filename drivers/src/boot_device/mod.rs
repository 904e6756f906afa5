/*++

Licensed under the Apache-2.0 license.

File Name:

    mod.rs

Abstract:

    File contains the boot device contract shared by every transport the
    loader can read a PDI from.

--*/

mod ddr;
mod flash;
mod sbi;
mod sd;
mod usb;

pub use ddr::Ddr;
pub use flash::{Flash, FlashKind};
pub use sbi::Sbi;
pub use sd::SdCard;
pub use usb::UsbDfu;

use crate::memory::SystemMemory;
use xloader_error::{LoaderError, LoaderResult};

/// Copy mode of a device transfer
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CopyMode {
    /// Transfer completes before the call returns
    Blocking,
    /// Transfer is started; its destination must not be read until waited on
    InitiateNonBlocking,
    /// Waits for the transfer started into `dst`
    WaitForNonBlockingDone,
}

/// Boot device contract
pub trait BootDevice: Send {
    fn name(&self) -> &'static str;

    /// Initialize the device.
    ///
    /// # Arguments
    ///
    /// * `flags` - Device specific flags; the raw boot mode nibble and the
    ///   multiboot value for block devices
    /// * `poll_retries` - Bound on device-ready polls
    fn init(&mut self, flags: u32, poll_retries: u32) -> LoaderResult<()>;

    /// Copy `len` bytes at device offset `src` to memory address `dst`.
    fn copy(
        &mut self,
        mem: &mut SystemMemory,
        src: u64,
        dst: u64,
        len: u32,
        mode: CopyMode,
    ) -> LoaderResult<()>;

    fn release(&mut self) -> LoaderResult<()>;
}

/// A non-blocking transfer awaiting its wait call
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Transfer {
    pub src: u64,
    pub dst: u64,
    pub len: u32,
}

/// Tracks the single non-blocking transfer a device may have in flight
#[derive(Debug, Default)]
pub struct PendingCopy {
    pending: Option<Transfer>,
}

impl PendingCopy {
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn start(&mut self, xfer: Transfer) -> LoaderResult<()> {
        if self.pending.is_some() {
            Err(LoaderError::DEVICE_NONBLOCKING_PENDING)?;
        }
        self.pending = Some(xfer);
        Ok(())
    }

    /// Completes the transfer targeting `dst`
    pub fn finish(&mut self, dst: u64) -> LoaderResult<Transfer> {
        match self.pending {
            None => Err(LoaderError::DEVICE_NO_PENDING_COPY),
            Some(xfer) if xfer.dst != dst => Err(LoaderError::DEVICE_WAIT_MISMATCH),
            Some(xfer) => {
                self.pending = None;
                Ok(xfer)
            }
        }
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}

/// Runs a device transfer in any of the copy modes.
///
/// `read` fills a buffer from device offset `src`. Devices that cannot
/// overlap the transfer with compute complete it when it is initiated;
/// `deferred` devices perform it when it is waited on.
pub(crate) fn transfer<F>(
    pending: &mut PendingCopy,
    mem: &mut SystemMemory,
    xfer: Transfer,
    mode: CopyMode,
    deferred: bool,
    mut read: F,
) -> LoaderResult<()>
where
    F: FnMut(&mut SystemMemory, u64, &mut [u8]) -> LoaderResult<()>,
{
    let mut run = |mem: &mut SystemMemory, xfer: Transfer| -> LoaderResult<()> {
        let mut buf = vec![0u8; xfer.len as usize];
        read(mem, xfer.src, &mut buf)?;
        mem.write(xfer.dst, &buf)
    };
    match mode {
        CopyMode::Blocking => {
            if pending.is_pending() {
                Err(LoaderError::DEVICE_NONBLOCKING_PENDING)?;
            }
            run(mem, xfer)
        }
        CopyMode::InitiateNonBlocking => {
            if !mem.is_valid_range(xfer.dst, u64::from(xfer.len)) {
                Err(LoaderError::MEMORY_OUT_OF_RANGE)?;
            }
            pending.start(xfer)?;
            if !deferred {
                if let Err(err) = run(mem, xfer) {
                    pending.clear();
                    Err(err)?;
                }
            }
            Ok(())
        }
        CopyMode::WaitForNonBlockingDone => {
            let started = pending.finish(xfer.dst)?;
            if deferred {
                run(mem, started)?;
            }
            Ok(())
        }
    }
}

/// Bounds-checked read from an in-memory medium
pub(crate) fn read_medium(medium: &[u8], offset: u64, buf: &mut [u8]) -> LoaderResult<()> {
    let start = usize::try_from(offset).map_err(|_| LoaderError::DEVICE_COPY_OUT_OF_RANGE)?;
    let end = start
        .checked_add(buf.len())
        .ok_or(LoaderError::DEVICE_COPY_OUT_OF_RANGE)?;
    let src = medium
        .get(start..end)
        .ok_or(LoaderError::DEVICE_COPY_OUT_OF_RANGE)?;
    buf.copy_from_slice(src);
    Ok(())
}
