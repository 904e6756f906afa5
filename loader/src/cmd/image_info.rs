/*++

Licensed under the Apache-2.0 license.

File Name:

    image_info.rs

Abstract:

    File contains the image info commands.

--*/

use super::{addr_arg, arg};
use crate::LoaderState;
use xloader_error::LoaderResult;

pub struct GetImageInfoCmd;
impl GetImageInfoCmd {
    pub(crate) fn execute(state: &mut LoaderState, payload: &[u32]) -> LoaderResult<Vec<u32>> {
        let entry = state.image_info.get(arg(payload, 0)?)?;
        Ok(vec![entry.uid, entry.puid, entry.func_id])
    }
}

/// Accepted for compatibility; the table is only written by image loads
pub struct SetImageInfoCmd;
impl SetImageInfoCmd {
    pub(crate) fn execute(_payload: &[u32]) -> LoaderResult<Vec<u32>> {
        Ok(Vec::new())
    }
}

pub struct GetImageInfoListCmd;
impl GetImageInfoListCmd {
    pub(crate) fn execute(state: &mut LoaderState, payload: &[u32]) -> LoaderResult<Vec<u32>> {
        let dst = addr_arg(payload, 0)?;
        let max_entries = arg(payload, 2)?;
        let num = state.image_info.store_list(&mut state.mem, dst, max_entries)?;
        Ok(vec![num])
    }
}
