/*++

Licensed under the Apache-2.0 license.

File Name:

    sd.rs

Abstract:

    File contains the SD/eMMC boot device in file-system and raw mode.

--*/

use super::flash::MULTIBOOT_STRIDE;
use super::{read_medium, transfer, BootDevice, CopyMode, PendingCopy, Transfer};
use crate::memory::SystemMemory;
use crate::{cprintln, wait};
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::RawBootMode;

/// Largest `BOOTnnnn.BIN` file number
pub const MAX_FILE_NUM: u32 = 8191;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Opened {
    File(usize),
    Raw(u64),
}

/// SD card or eMMC holding a FAT volume and a raw block area
pub struct SdCard {
    files: Vec<(String, Vec<u8>)>,
    raw: Vec<u8>,
    present: bool,
    detect_polls: u32,
    opened: Option<Opened>,
    pending: PendingCopy,
}

impl SdCard {
    pub fn new() -> Self {
        Self {
            files: Vec::new(),
            raw: Vec::new(),
            present: true,
            detect_polls: 0,
            opened: None,
            pending: PendingCopy::default(),
        }
    }

    pub fn with_file(mut self, name: &str, data: Vec<u8>) -> Self {
        self.files.push((name.to_string(), data));
        self
    }

    pub fn with_raw(mut self, raw: Vec<u8>) -> Self {
        self.raw = raw;
        self
    }

    /// Number of card-detect polls that fail before the card is seen
    pub fn with_detect_polls(mut self, polls: u32) -> Self {
        self.detect_polls = polls;
        self
    }

    /// Empties the card slot
    pub fn with_card_removed(mut self) -> Self {
        self.present = false;
        self
    }

    /// Name of the boot file selected by a multiboot value
    pub fn boot_file_name(multiboot: u32) -> String {
        if multiboot == 0 {
            "BOOT.BIN".to_string()
        } else {
            format!("BOOT{:04}.BIN", multiboot)
        }
    }
}

impl Default for SdCard {
    fn default() -> Self {
        Self::new()
    }
}

impl BootDevice for SdCard {
    fn name(&self) -> &'static str {
        "sd"
    }

    fn init(&mut self, flags: u32, poll_retries: u32) -> LoaderResult<()> {
        let present = self.present;
        let polls = &mut self.detect_polls;
        wait::until(
            || {
                if !present {
                    return false;
                }
                if *polls == 0 {
                    return true;
                }
                *polls -= 1;
                false
            },
            poll_retries,
        )
        .map_err(|_| LoaderError::DEVICE_SD_CARD_NOT_DETECTED)?;

        let multiboot = flags & !RawBootMode::MASK;
        let opened = match RawBootMode::from(flags) {
            RawBootMode::Default | RawBootMode::FileSystem => {
                if multiboot > MAX_FILE_NUM {
                    Err(LoaderError::DEVICE_SD_FILE_NOT_FOUND)?;
                }
                let name = Self::boot_file_name(multiboot);
                let idx = self
                    .files
                    .iter()
                    .position(|(n, _)| *n == name)
                    .ok_or(LoaderError::DEVICE_SD_FILE_NOT_FOUND)?;
                cprintln!("[sd] Opened {}", name.as_str());
                Opened::File(idx)
            }
            RawBootMode::SdRaw | RawBootMode::EmmcBp1 | RawBootMode::EmmcBp2 => {
                Opened::Raw(u64::from(multiboot) * MULTIBOOT_STRIDE)
            }
        };
        self.pending.clear();
        self.opened = Some(opened);
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
        let (medium, offset) = match self.opened {
            None => Err(LoaderError::DEVICE_NOT_INITIALIZED)?,
            Some(Opened::File(idx)) => (&self.files[idx].1, src),
            Some(Opened::Raw(base)) => (
                &self.raw,
                base.checked_add(src)
                    .ok_or(LoaderError::DEVICE_COPY_OUT_OF_RANGE)?,
            ),
        };
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
            |_, src, buf| read_medium(medium, src, buf),
        )
    }

    fn release(&mut self) -> LoaderResult<()> {
        self.pending.clear();
        self.opened = None;
        Ok(())
    }
}
