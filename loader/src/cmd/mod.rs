/*++

Licensed under the Apache-2.0 license.

File Name:

    mod.rs

Abstract:

    File contains the loader command surface: command ids, payload
    helpers and dispatch.

--*/

mod image_info;
mod image_store;
mod load;
mod metaheader;
mod multiboot;

pub use metaheader::{IH_EXPORT_MASK, IHT_EXPORT_MASK, PH_EXPORT_MASK};

use crate::LoaderState;
use image_info::{GetImageInfoCmd, GetImageInfoListCmd, SetImageInfoCmd};
use image_store::{AddImageStorePdiCmd, RemoveImageStorePdiCmd, WriteImageStorePdiCmd};
use load::{GetAtfHandoffParamsCmd, LoadDdrCpyImgCmd, LoadReadBackPdiCmd, LoadSubsystemPdiCmd};
use metaheader::ExtractMetaheaderCmd;
use multiboot::UpdateMultibootCmd;
use xloader_drivers::cprintln_verbose;
use xloader_error::{LoaderError, LoaderResult};

#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct CommandId(pub u32);

impl CommandId {
    pub const FEATURES: Self = Self(0x00);
    pub const LOAD_SUBSYSTEM_PDI: Self = Self(0x01);
    pub const LOAD_DDR_CPY_IMG: Self = Self(0x02);
    pub const GET_IMAGE_INFO: Self = Self(0x03);
    pub const SET_IMAGE_INFO: Self = Self(0x04);
    pub const GET_IMAGE_INFO_LIST: Self = Self(0x05);
    pub const EXTRACT_METAHEADER: Self = Self(0x06);
    pub const LOAD_READBACK_PDI: Self = Self(0x07);
    pub const UPDATE_MULTIBOOT: Self = Self(0x08);
    pub const ADD_IMAGE_STORE_PDI: Self = Self(0x09);
    pub const REMOVE_IMAGE_STORE_PDI: Self = Self(0x0A);
    pub const GET_ATF_HANDOFF_PARAMS: Self = Self(0x0B);
    pub const WRITE_IMAGE_STORE_PDI: Self = Self(0x0D);

    const SUPPORTED: [Self; 13] = [
        Self::FEATURES,
        Self::LOAD_SUBSYSTEM_PDI,
        Self::LOAD_DDR_CPY_IMG,
        Self::GET_IMAGE_INFO,
        Self::SET_IMAGE_INFO,
        Self::GET_IMAGE_INFO_LIST,
        Self::EXTRACT_METAHEADER,
        Self::LOAD_READBACK_PDI,
        Self::UPDATE_MULTIBOOT,
        Self::ADD_IMAGE_STORE_PDI,
        Self::REMOVE_IMAGE_STORE_PDI,
        Self::GET_ATF_HANDOFF_PARAMS,
        Self::WRITE_IMAGE_STORE_PDI,
    ];

    pub fn is_supported(self) -> bool {
        Self::SUPPORTED.contains(&self)
    }
}

impl From<u32> for CommandId {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<CommandId> for u32 {
    fn from(value: CommandId) -> Self {
        value.0
    }
}

/// Payload word `idx`
pub(crate) fn arg(payload: &[u32], idx: usize) -> LoaderResult<u32> {
    payload
        .get(idx)
        .copied()
        .ok_or(LoaderError::CMD_PAYLOAD_TOO_SHORT)
}

/// 64-bit address from the high word at `idx` and the low word after it
pub(crate) fn addr_arg(payload: &[u32], idx: usize) -> LoaderResult<u64> {
    Ok((u64::from(arg(payload, idx)?) << 32) | u64::from(arg(payload, idx + 1)?))
}

fn require_secure(secure: bool) -> LoaderResult<()> {
    if !secure {
        Err(LoaderError::CMD_ACCESS_DENIED)?;
    }
    Ok(())
}

struct FeaturesCmd;
impl FeaturesCmd {
    fn execute(payload: &[u32]) -> LoaderResult<Vec<u32>> {
        let id = CommandId::from(arg(payload, 0)?);
        Ok(vec![u32::from(id.is_supported())])
    }
}

/// Execute command `cmd_id`.
///
/// # Returns
///
/// * Response words following the status word
pub(crate) fn handle_command(
    state: &mut LoaderState,
    cmd_id: u32,
    payload: &[u32],
    secure: bool,
) -> LoaderResult<Vec<u32>> {
    cprintln_verbose!("[cmd] Command 0x{:x}, {} words", cmd_id, payload.len());
    match CommandId::from(cmd_id) {
        CommandId::FEATURES => FeaturesCmd::execute(payload),
        CommandId::LOAD_SUBSYSTEM_PDI => LoadSubsystemPdiCmd::execute(state, payload),
        CommandId::LOAD_DDR_CPY_IMG => LoadDdrCpyImgCmd::execute(state, payload),
        CommandId::GET_IMAGE_INFO => GetImageInfoCmd::execute(state, payload),
        CommandId::SET_IMAGE_INFO => SetImageInfoCmd::execute(payload),
        CommandId::GET_IMAGE_INFO_LIST => GetImageInfoListCmd::execute(state, payload),
        CommandId::EXTRACT_METAHEADER => ExtractMetaheaderCmd::execute(state, payload),
        CommandId::LOAD_READBACK_PDI => {
            require_secure(secure)?;
            LoadReadBackPdiCmd::execute(state, payload)
        }
        CommandId::UPDATE_MULTIBOOT => {
            require_secure(secure)?;
            UpdateMultibootCmd::execute(state, payload)
        }
        CommandId::ADD_IMAGE_STORE_PDI => AddImageStorePdiCmd::execute(state, payload),
        CommandId::REMOVE_IMAGE_STORE_PDI => RemoveImageStorePdiCmd::execute(state, payload),
        CommandId::GET_ATF_HANDOFF_PARAMS => GetAtfHandoffParamsCmd::execute(state, payload),
        CommandId::WRITE_IMAGE_STORE_PDI => WriteImageStorePdiCmd::execute(state, payload),
        _ => Err(LoaderError::CMD_INVALID),
    }
}
