/*++

Licensed under the Apache-2.0 license.

File Name:

    orchestrator.rs

Abstract:

    File contains the PDI load flow: binding the boot device, reading the
    headers, loading each image and handing the processors off.

--*/

use crate::platform::CpuHandoff;
use crate::session::{PdiLocation, PdiSession, ReadbackTarget};
use crate::{handoff, LoaderState};
use xloader_drivers::memory_layout::METAHDR_BUF_ORG;
use xloader_drivers::{cprintln, cprintln_verbose, CopyMode, ErrorDisplay};
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::{
    decode_pdi_src, ImgId, PartitionDevice, PdiSrc, RawBootMode, SbdMode, BOOT_HEADER_BYTE_SIZE,
};
use xloader_image_verify::{
    load_partition, read_boot_header, read_metaheader, MetaHeader, PartitionLoad, PdiKind,
};

/// Resolve where a PDI is read from.
///
/// # Arguments
///
/// * `state` - Loader state
/// * `src_word` - Boot source with its raw-access mode nibble
/// * `addr` - PDI address, or the PDI id for the image store
/// * `kind` - Full or partial PDI
pub(crate) fn locate(
    state: &LoaderState,
    src_word: u32,
    addr: u64,
    kind: PdiKind,
) -> LoaderResult<PdiLocation> {
    let (src, raw) = decode_pdi_src(src_word)?;
    let flags = match (kind, raw) {
        (PdiKind::Full, RawBootMode::Default) => state.multiboot,
        (PdiKind::Full, raw) => u32::from(raw) | (state.multiboot & !RawBootMode::MASK),
        (PdiKind::Partial, raw) => u32::from(raw),
    };
    let (base, store_id) = if src == PdiSrc::ImageStore {
        let id = u32::try_from(addr).map_err(|_| LoaderError::DEVICE_IMG_STORE_PDI_NOT_FOUND)?;
        (state.image_store.resolve(id)?, Some(id))
    } else {
        (addr, None)
    };
    Ok(PdiLocation {
        src,
        flags,
        base,
        kind,
        store_id,
    })
}

/// Switch the session to the secondary boot device named by the table
fn bind_sbd(state: &mut LoaderState, session: &mut PdiSession, meta: &MetaHeader) -> LoaderResult<()> {
    let SbdMode::Device(sbd, raw) = SbdMode::try_from(meta.iht.sbd_mode())? else {
        return Ok(());
    };
    cprintln!(
        "[xloader] Secondary boot device 0x{:x} at 0x{:08x}",
        u32::from(sbd),
        meta.iht.sbd_addr
    );
    if sbd != session.location.src {
        state.devices.get_mut(session.location.src)?.release()?;
    }
    let retries = state.config.poll_retries;
    state.devices.get_mut(sbd)?.init(u32::from(raw), retries)?;
    session.data_src = sbd;
    session.data_base = u64::from(meta.iht.sbd_addr);
    Ok(())
}

/// Bind the boot device and read the PDI's headers.
///
/// A full PDI brings its own boot header, which becomes the session's
/// boot header once it validates.
pub(crate) fn open_pdi(state: &mut LoaderState, session: &mut PdiSession) -> LoaderResult<MetaHeader> {
    let loc = session.location;
    let retries = state.config.poll_retries;
    state.devices.get_mut(loc.src)?.init(loc.flags, retries)?;

    if loc.kind == PdiKind::Full {
        let device = state.devices.get_mut(loc.src)?;
        device.copy(
            &mut state.mem,
            loc.base,
            METAHDR_BUF_ORG,
            BOOT_HEADER_BYTE_SIZE as u32,
            CopyMode::Blocking,
        )?;
        let buf = state.mem.slice_mut(METAHDR_BUF_ORG, BOOT_HEADER_BYTE_SIZE)?;
        state.boot_header = read_boot_header(buf)?;
    }

    let device_id = state.platform.device_identity();
    let bh = state.boot_header;
    let meta = {
        let mut env = state.secure_env(loc.src, &bh)?;
        read_metaheader(&mut env, &device_id, loc.base, loc.kind)?
    };
    session.pdi_id = meta.iht.pdi_id;
    state.progress.pdi_id = meta.iht.pdi_id;

    if loc.kind == PdiKind::Full {
        bind_sbd(state, session, &meta)?;
    }
    Ok(meta)
}

fn load_partitions(
    state: &mut LoaderState,
    session: &mut PdiSession,
    meta: &MetaHeader,
    img_idx: usize,
) -> LoaderResult<()> {
    let bh = state.boot_header;
    for (idx, ph) in meta.image_partitions(img_idx).iter().enumerate() {
        session.prtn_idx = idx;
        state.progress.prtn_idx = idx as u32;
        let dst = match session.readback.as_ref() {
            Some(rb) if ph.dstn_device() == PartitionDevice::Pl => {
                rb.reserve(u64::from(ph.unenc_data_word_len) * 4)?
            }
            _ => ph.dst_load_addr,
        };
        let written = {
            let mut env = state.secure_env(session.data_src, &bh)?;
            let req = PartitionLoad {
                base: session.data_base,
                ph,
                dst,
            };
            load_partition(&mut env, &req)?
        };
        if let Some(rb) = session.readback.as_mut() {
            if ph.dstn_device() == PartitionDevice::Pl {
                rb.processed += written;
            }
        }
        cprintln_verbose!(
            "[xloader] Partition 0x{:08x}: {} bytes to 0x{:x}",
            ph.prtn_id,
            written,
            dst
        );
        state.atf.update(ph)?;
    }
    Ok(())
}

/// Load image `img_idx` of an open PDI.
///
/// # Returns
///
/// * The hand-offs the image asks for
pub(crate) fn load_image(
    state: &mut LoaderState,
    session: &mut PdiSession,
    meta: &MetaHeader,
    img_idx: usize,
) -> LoaderResult<Vec<CpuHandoff>> {
    let ih = meta
        .img_hdrs
        .get(img_idx)
        .ok_or(LoaderError::LOADER_IMG_ID_NOT_FOUND)?;
    let prtns = meta.image_partitions(img_idx);
    if prtns.is_empty() {
        Err(LoaderError::LOADER_NO_PARTITIONS)?;
    }
    session.img_idx = img_idx;
    state.progress.img_idx = img_idx as u32;
    state.image_info.check_parent(ih)?;

    cprintln!(
        "[xloader] Loading image 0x{:08x} ({} partitions)",
        ih.img_id,
        prtns.len()
    );
    if let Err(err) = load_partitions(state, session, meta, img_idx) {
        let pl = ImgId::is_dfx(ih.img_id)
            || prtns
                .iter()
                .any(|ph| ph.dstn_device() == PartitionDevice::Pl);
        if pl {
            state.platform.pl_error(ih.img_id, err);
        }
        Err(err)?;
    }
    state.image_info.upsert(ih)?;
    Ok(handoff::image_handoffs(ih.img_id, prtns))
}

fn hand_off(state: &mut LoaderState, handoffs: &[CpuHandoff]) {
    for h in handoffs {
        cprintln!(
            "[xloader] Handoff CPU {} to 0x{:x}",
            h.cpu,
            h.entry_point
        );
        state.platform.handoff(h);
    }
}

/// Load every image of the session's PDI
fn load_pdi(state: &mut LoaderState, session: &mut PdiSession) -> LoaderResult<()> {
    match session.location.kind {
        PdiKind::Partial => state.crypto.clear_session(),
        PdiKind::Full => state.atf.clear(),
    }
    let meta = open_pdi(state, session)?;
    if session.location.kind == PdiKind::Full {
        state.boot_pdi = Some(session.location);
    }

    for idx in 0..meta.img_hdrs.len() {
        let ih = &meta.img_hdrs[idx];
        if ih.delay_load() {
            cprintln!("[xloader] Deferring load of image 0x{:08x}", ih.img_id);
            continue;
        }
        let handoffs = load_image(state, session, &meta, idx)?;
        if ih.delay_handoff() {
            for h in handoffs {
                session.delayed.push(h)?;
            }
        } else {
            hand_off(state, &handoffs);
        }
    }
    let delayed: Vec<CpuHandoff> = session.delayed.drain().collect();
    hand_off(state, &delayed);

    if session.location.kind == PdiKind::Partial && !session.location.src.is_stream() {
        state.restart.record(session.pdi_id, session.location);
    }
    cprintln!("[xloader] PDI 0x{:08x} loaded", session.pdi_id);
    Ok(())
}

fn run(
    state: &mut LoaderState,
    src_word: u32,
    addr: u64,
    kind: PdiKind,
    readback: Option<ReadbackTarget>,
) -> LoaderResult<PdiSession> {
    let location = locate(state, src_word, addr, kind)?;
    let mut session = PdiSession::new(location, state.config.max_delayed_handoffs);
    session.readback = readback;
    state.progress = Default::default();

    let result = load_pdi(state, &mut session);
    let release = state
        .devices
        .get_mut(session.data_src)
        .and_then(|dev| dev.release());
    if let Err(err) = result {
        cprintln!(
            "[xloader] PDI 0x{:08x} failed at image {} partition {}: {}",
            session.pdi_id,
            session.img_idx,
            session.prtn_idx,
            ErrorDisplay(err)
        );
        Err(err)?;
    }
    release?;
    Ok(session)
}

/// Load a PDI.
///
/// # Arguments
///
/// * `state` - Loader state
/// * `src_word` - Boot source with its raw-access mode nibble
/// * `addr` - PDI address, or the PDI id for the image store
/// * `kind` - Full or partial PDI
pub(crate) fn load(state: &mut LoaderState, src_word: u32, addr: u64, kind: PdiKind) -> LoaderResult<()> {
    run(state, src_word, addr, kind, None).map(|_| ())
}

/// Load a partial PDI with its PL data diverted to `readback`.
///
/// # Returns
///
/// * Bytes written to the readback buffer
pub(crate) fn load_readback(
    state: &mut LoaderState,
    src_word: u32,
    addr: u64,
    readback: ReadbackTarget,
) -> LoaderResult<u64> {
    let session = run(state, src_word, addr, PdiKind::Partial, Some(readback))?;
    Ok(session.readback.map_or(0, |rb| rb.processed))
}
