/*++

Licensed under the Apache-2.0 license.

File Name:

    device.rs

Abstract:

    File contains the table binding boot sources to boot devices.

--*/

use xloader_drivers::boot_device::Ddr;
use xloader_drivers::BootDevice;
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::PdiSrc;

/// Boot devices of the platform, one per boot source.
///
/// DDR and the image store are memory backed and always present.
pub struct DeviceTable {
    devices: Vec<(PdiSrc, Box<dyn BootDevice>)>,
}

impl Default for DeviceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceTable {
    pub fn new() -> Self {
        Self {
            devices: vec![
                (PdiSrc::Ddr, Box::new(Ddr::new())),
                (PdiSrc::ImageStore, Box::new(Ddr::named("image_store"))),
            ],
        }
    }

    /// Binds `device` to `src`, replacing any earlier binding
    pub fn with(mut self, src: PdiSrc, device: Box<dyn BootDevice>) -> Self {
        self.register(src, device);
        self
    }

    pub fn register(&mut self, src: PdiSrc, device: Box<dyn BootDevice>) {
        match self.devices.iter_mut().find(|(s, _)| *s == src) {
            Some(entry) => entry.1 = device,
            None => self.devices.push((src, device)),
        }
    }

    /// Device bound to `src`
    pub fn get_mut(&mut self, src: PdiSrc) -> LoaderResult<&mut dyn BootDevice> {
        match self.devices.iter_mut().find(|(s, _)| *s == src) {
            Some((_, device)) => Ok(device.as_mut()),
            None => Err(LoaderError::DEVICE_UNSUPPORTED_PDI_SRC),
        }
    }

    pub fn contains(&self, src: PdiSrc) -> bool {
        self.devices.iter().any(|(s, _)| *s == src)
    }
}
