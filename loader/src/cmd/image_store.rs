/*++

Licensed under the Apache-2.0 license.

File Name:

    image_store.rs

Abstract:

    File contains the image store commands.

--*/

use super::{addr_arg, arg};
use crate::LoaderState;
use xloader_error::LoaderResult;
use zerocopy::AsBytes;

pub struct AddImageStorePdiCmd;
impl AddImageStorePdiCmd {
    pub(crate) fn execute(state: &mut LoaderState, payload: &[u32]) -> LoaderResult<Vec<u32>> {
        let id = arg(payload, 0)?;
        let src = addr_arg(payload, 1)?;
        let len = u64::from(arg(payload, 3)?) * 4;
        state.image_store.add(&mut state.mem, id, src, len)?;
        Ok(Vec::new())
    }
}

pub struct RemoveImageStorePdiCmd;
impl RemoveImageStorePdiCmd {
    pub(crate) fn execute(state: &mut LoaderState, payload: &[u32]) -> LoaderResult<Vec<u32>> {
        state.image_store.remove(&mut state.mem, arg(payload, 0)?)?;
        Ok(Vec::new())
    }
}

/// Appends the payload after the id to the PDI being written
pub struct WriteImageStorePdiCmd;
impl WriteImageStorePdiCmd {
    pub(crate) fn execute(state: &mut LoaderState, payload: &[u32]) -> LoaderResult<Vec<u32>> {
        let id = arg(payload, 0)?;
        let data = &payload[1..];
        state.image_store.write(&mut state.mem, id, data.as_bytes())?;
        Ok(Vec::new())
    }
}
