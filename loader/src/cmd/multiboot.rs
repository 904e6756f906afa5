/*++

Licensed under the Apache-2.0 license.

File Name:

    multiboot.rs

Abstract:

    File contains the UPDATE_MULTIBOOT command, which selects where the
    next boot reads its PDI from.

--*/

use super::arg;
use crate::LoaderState;
use xloader_drivers::cprintln;
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::{PdiSrc, RawBootMode};

/// Flash offsets are counted in 32 KB steps
const MULTIBOOT_OFFSET_STRIDE: u32 = 0x8000;
const MAX_FILE_NUM: u32 = 8192;

const FLASH_TYPE_RAW: u32 = 0;
const FLASH_TYPE_FS: u32 = 1;
const FLASH_TYPE_RAW_BP1: u32 = 2;
const FLASH_TYPE_RAW_BP2: u32 = 3;

pub struct UpdateMultibootCmd;
impl UpdateMultibootCmd {
    fn offset(location: u32) -> LoaderResult<u32> {
        if location % MULTIBOOT_OFFSET_STRIDE != 0 {
            Err(LoaderError::CMD_UNSUPPORTED_MULTIBOOT_OFFSET)?;
        }
        Ok(location / MULTIBOOT_OFFSET_STRIDE)
    }

    /// Multiboot register value for `location` on `src`.
    ///
    /// # Arguments
    ///
    /// * `src` - Boot source
    /// * `flash_type` - Raw, file system or boot partition access
    /// * `location` - Byte offset, or file number for a file system
    fn multiboot_value(src: PdiSrc, flash_type: u32, location: u32) -> LoaderResult<u32> {
        match src {
            PdiSrc::Qspi24 | PdiSrc::Qspi32 | PdiSrc::Ospi => Self::offset(location),
            src if src.is_sd() || src.is_emmc() => match flash_type {
                FLASH_TYPE_RAW => Ok(RawBootMode::SD_RAW | Self::offset(location)?),
                FLASH_TYPE_FS => {
                    if location >= MAX_FILE_NUM {
                        Err(LoaderError::CMD_UNSUPPORTED_FILE_NUM)?;
                    }
                    Ok(RawBootMode::FILE_SYSTEM | location)
                }
                FLASH_TYPE_RAW_BP1 if src.is_emmc() => {
                    Ok(RawBootMode::EMMC_BP1 | Self::offset(location)?)
                }
                FLASH_TYPE_RAW_BP2 if src.is_emmc() => {
                    Ok(RawBootMode::EMMC_BP2 | Self::offset(location)?)
                }
                _ => Err(LoaderError::CMD_UNSUPPORTED_MULTIBOOT_FLASH_TYPE),
            },
            _ => Err(LoaderError::CMD_UNSUPPORTED_MULTIBOOT_PDISRC),
        }
    }

    pub(crate) fn execute(state: &mut LoaderState, payload: &[u32]) -> LoaderResult<Vec<u32>> {
        let word = arg(payload, 0)?;
        let location = arg(payload, 1)?;
        let src = PdiSrc::try_from(word >> 8)
            .map_err(|_| LoaderError::CMD_UNSUPPORTED_MULTIBOOT_PDISRC)?;
        let value = Self::multiboot_value(src, word & 0xFF, location)?;
        state.multiboot = value;
        cprintln!("[xloader] Multiboot set to 0x{:08x}", value);
        Ok(Vec::new())
    }
}
