/*++

Licensed under the Apache-2.0 license.

File Name:

    load.rs

Abstract:

    File contains the commands that load PDIs and images, and the ATF
    hand-off parameter query.

--*/

use super::{addr_arg, arg};
use crate::session::ReadbackTarget;
use crate::{orchestrator, restart, LoaderState};
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::{decode_pdi_src, PdiSrc};
use xloader_image_verify::PdiKind;

pub struct LoadSubsystemPdiCmd;
impl LoadSubsystemPdiCmd {
    fn check_src(src_word: u32) -> LoaderResult<()> {
        let (src, _) =
            decode_pdi_src(src_word).map_err(|_| LoaderError::CMD_UNSUPPORTED_SUBSYSTEM_PDISRC)?;
        match src {
            PdiSrc::Qspi24 | PdiSrc::Qspi32 | PdiSrc::Ospi | PdiSrc::Ddr | PdiSrc::ImageStore => {
                Ok(())
            }
            _ => Err(LoaderError::CMD_UNSUPPORTED_SUBSYSTEM_PDISRC),
        }
    }

    pub(crate) fn execute(state: &mut LoaderState, payload: &[u32]) -> LoaderResult<Vec<u32>> {
        let src = arg(payload, 0)?;
        let addr = addr_arg(payload, 1)?;
        Self::check_src(src)?;
        orchestrator::load(state, src, addr, PdiKind::Partial)?;
        Ok(Vec::new())
    }
}

pub struct LoadDdrCpyImgCmd;
impl LoadDdrCpyImgCmd {
    pub(crate) fn execute(state: &mut LoaderState, payload: &[u32]) -> LoaderResult<Vec<u32>> {
        let img_id = arg(payload, 0)?;
        let func_id = payload.get(1).copied();
        restart::restart_image(state, img_id, func_id)?;
        Ok(Vec::new())
    }
}

/// Loads a partial PDI with its PL data sent to a readback buffer
pub struct LoadReadBackPdiCmd;
impl LoadReadBackPdiCmd {
    pub(crate) fn execute(state: &mut LoaderState, payload: &[u32]) -> LoaderResult<Vec<u32>> {
        let src = arg(payload, 0)?;
        let addr = addr_arg(payload, 1)?;
        let dst = addr_arg(payload, 3)?;
        let max_len = u64::from(arg(payload, 5)?);
        if !state.mem.is_valid_range(dst, max_len) {
            Err(LoaderError::MEMORY_OUT_OF_RANGE)?;
        }
        let processed =
            orchestrator::load_readback(state, src, addr, ReadbackTarget::new(dst, max_len))?;
        let processed = u32::try_from(processed).map_err(|_| LoaderError::LOADER_READBACK_BUFFER_OVERFLOW)?;
        Ok(vec![processed])
    }
}

pub struct GetAtfHandoffParamsCmd;
impl GetAtfHandoffParamsCmd {
    pub(crate) fn execute(state: &mut LoaderState, payload: &[u32]) -> LoaderResult<Vec<u32>> {
        let dst = addr_arg(payload, 0)?;
        let size = arg(payload, 2)?;
        let written = state.atf.store(&mut state.mem, dst, size)?;
        Ok(vec![written])
    }
}
