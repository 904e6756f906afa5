/*++

Licensed under the Apache-2.0 license.

File Name:

    platform.rs

Abstract:

    File contains the hooks through which the loader reaches the rest of
    the platform: processor hand-off, the PL error handler and the debug
    port controls.

--*/

use xloader_error::LoaderError;
use xloader_image_verify::DeviceIdentity;

/// Request to start a processor on a loaded image
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct CpuHandoff {
    pub img_id: u32,
    /// Destination CPU field of the partition
    pub cpu: u32,
    pub entry_point: u64,
    pub a32: bool,
    pub exception_level: u32,
    pub trustzone: bool,
}

pub trait Platform: Send {
    /// Identity the PDI must target
    fn device_identity(&self) -> DeviceIdentity;

    /// Releases a processor to run from `handoff.entry_point`
    fn handoff(&mut self, handoff: &CpuHandoff);

    /// Called before a failed programmable logic image load is reported
    fn pl_error(&mut self, img_id: u32, err: LoaderError);

    /// Reads and clears the authenticated JTAG interrupt status
    fn take_auth_jtag_irq(&mut self) -> bool;

    /// Opens or closes the debug port
    fn set_debug_access(&mut self, enabled: bool);
}
