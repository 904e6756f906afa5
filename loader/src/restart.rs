/*++

Licensed under the Apache-2.0 license.

File Name:

    restart.rs

Abstract:

    File contains image restart: an image loaded earlier in the boot
    session is found again in the PDIs it came from and reloaded.

--*/

use crate::orchestrator::{load_image, open_pdi};
use crate::session::{PdiLocation, PdiSession};
use crate::LoaderState;
use xloader_drivers::{cprintln, ErrorDisplay};
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_verify::MetaHeader;

/// Reload `img_id` from the PDI at `location`.
///
/// # Returns
///
/// * `false` if the PDI cannot be opened or does not hold the image
fn restart_from(
    state: &mut LoaderState,
    mut location: PdiLocation,
    img_id: u32,
    func_id: Option<u32>,
) -> LoaderResult<bool> {
    if let Some(id) = location.store_id {
        match state.image_store.resolve(id) {
            Ok(base) => location.base = base,
            Err(err) => {
                cprintln!(
                    "[xloader] Skipping stored PDI 0x{:08x} for restart: {}",
                    id,
                    ErrorDisplay(err)
                );
                return Ok(false);
            }
        }
    }
    let mut session = PdiSession::new(location, state.config.max_delayed_handoffs);
    let result = match open_pdi(state, &mut session) {
        Ok(meta) => reload(state, &mut session, &meta, img_id, func_id),
        Err(err) => {
            cprintln!(
                "[xloader] Skipping PDI at 0x{:x} for restart: {}",
                location.base,
                ErrorDisplay(err)
            );
            Ok(false)
        }
    };
    let release = state
        .devices
        .get_mut(session.data_src)
        .and_then(|dev| dev.release());
    let found = result?;
    release?;
    Ok(found)
}

fn reload(
    state: &mut LoaderState,
    session: &mut PdiSession,
    meta: &MetaHeader,
    img_id: u32,
    func_id: Option<u32>,
) -> LoaderResult<bool> {
    let Some(idx) = meta.img_hdrs.iter().position(|ih| ih.img_id == img_id) else {
        return Ok(false);
    };
    if let Some(func_id) = func_id {
        if meta.img_hdrs[idx].func_id != func_id {
            Err(LoaderError::LOADER_FUNCTION_ID_MISMATCH)?;
        }
    }
    for h in load_image(state, session, meta, idx)? {
        state.platform.handoff(&h);
    }
    Ok(true)
}

/// Reload image `img_id`.
///
/// PDIs are searched most recent first, the boot PDI last. A PDI that
/// can no longer be read is skipped; a failure to reload the image once
/// found is returned.
///
/// # Arguments
///
/// * `state` - Loader state
/// * `img_id` - Image to reload
/// * `func_id` - Function id the image must carry, if any
pub(crate) fn restart_image(
    state: &mut LoaderState,
    img_id: u32,
    func_id: Option<u32>,
) -> LoaderResult<()> {
    let mut candidates: Vec<PdiLocation> = state.restart.iter_recent().map(|(_, loc)| *loc).collect();
    candidates.extend(state.boot_pdi);

    for location in candidates {
        if restart_from(state, location, img_id, func_id)? {
            cprintln!("[xloader] Restarted image 0x{:08x}", img_id);
            return Ok(());
        }
    }
    cprintln!("[xloader] Image 0x{:08x} not found for restart", img_id);
    Err(LoaderError::LOADER_IMG_ID_NOT_FOUND)
}
