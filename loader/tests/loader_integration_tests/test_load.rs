// Licensed under the Apache-2.0 license

use crate::common::*;
use xloader::CommandId;
use xloader_drivers::memory_layout::PL_CFRAME_ORG;
use xloader_error::LoaderError;
use xloader_image_types::AtfHandoffParams;
use zerocopy::FromBytes;

#[test]
fn test_partial_pdi_loads_and_hands_off() {
    let pdi = two_image_pdi(0x100);
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();

    loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE).unwrap();

    assert_eq!(loader.read(LOAD_BASE, 0x100), vec![0x11; 0x100]);
    assert_eq!(loader.read(LOAD_BASE + 0x1000, 0x100), vec![0x22; 0x100]);

    let handoffs = loader.handoffs();
    assert_eq!(handoffs.len(), 2);
    assert_eq!(handoffs[0].img_id, APU_IMG);
    assert_eq!(handoffs[0].cpu, 1);
    assert_eq!(handoffs[0].entry_point, LOAD_BASE);
    assert_eq!(handoffs[1].img_id, RPU_IMG);

    let state = loader.ctx.lock().unwrap();
    assert_eq!(state.image_info.len(), 2);
    assert_eq!(state.restart.len(), 1);
    assert_eq!(state.progress.pdi_id, 0x100);
}

#[test]
fn test_delayed_handoff_runs_after_all_images() {
    let mut apu = image(APU_IMG, 1, 0, vec![partition(0x11, LOAD_BASE, PS, 1)]);
    apu.delay_handoff = true;
    let rpu = image(RPU_IMG, 2, 0, vec![partition(0x22, LOAD_BASE + 0x1000, PS, 2)]);
    let pdi = partial_pdi(0x101, vec![apu, rpu]);
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();

    loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE).unwrap();
    assert_eq!(loader.handoff_cpus(), [2, 1]);
}

#[test]
fn test_delay_load_image_is_skipped() {
    let mut apu = image(APU_IMG, 1, 0, vec![partition(0x11, LOAD_BASE, PS, 1)]);
    apu.delay_load = true;
    let rpu = image(RPU_IMG, 2, 0, vec![partition(0x22, LOAD_BASE + 0x1000, PS, 2)]);
    let pdi = partial_pdi(0x102, vec![apu, rpu]);
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();

    loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE).unwrap();
    assert_eq!(loader.read(LOAD_BASE, 0x100), vec![0; 0x100]);
    assert_eq!(loader.handoff_cpus(), [2]);
    assert_eq!(
        loader.cmd(CommandId::GET_IMAGE_INFO, &[APU_IMG]),
        err_code(LoaderError::LOADER_NO_VALID_IMG_FOUND)
    );
}

#[test]
fn test_pl_load_failure_is_reported() {
    let pdi = partial_pdi(
        0x103,
        vec![image(APU_IMG, 1, 0, vec![partition(0x33, 0x7000_0000, PL, 0)])],
    );
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();

    assert_eq!(
        loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE),
        Err(LoaderError::MEMORY_OUT_OF_RANGE)
    );
    assert_eq!(
        loader.pl_errors(),
        [(APU_IMG, LoaderError::MEMORY_OUT_OF_RANGE)]
    );
    assert!(loader.handoffs().is_empty());
    // A failed PDI cannot be restarted from
    assert!(loader.ctx.lock().unwrap().restart.is_empty());
}

#[test]
fn test_ps_load_failure_skips_pl_handler() {
    let pdi = partial_pdi(
        0x104,
        vec![image(APU_IMG, 1, 0, vec![partition(0x11, 0x7000_0000, PS, 1)])],
    );
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();

    assert_eq!(
        loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE),
        Err(LoaderError::MEMORY_OUT_OF_RANGE)
    );
    assert!(loader.pl_errors().is_empty());
}

#[test]
fn test_reconfigurable_image_needs_parent() {
    let pdi = partial_pdi(
        0x105,
        vec![image(PL_IMG, 5, 9, vec![partition(0x33, PL_CFRAME_ORG, PL, 0)])],
    );
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();

    assert_eq!(
        loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE),
        Err(LoaderError::LOADER_IMG_PARENT_NOT_LOADED)
    );
}

#[test]
fn test_parent_reload_invalidates_children() {
    let parent = || image(APU_IMG, 1, 0, vec![partition(0x11, LOAD_BASE, PS, 1)]);
    let child = image(PL_IMG, 2, 1, vec![partition(0x33, PL_CFRAME_ORG, PL, 0)]);
    let first = partial_pdi(0x106, vec![parent(), child]);
    let second = partial_pdi(0x107, vec![parent()]);
    let loader = Fixture::default()
        .with_pdi(PDI_BASE, &first)
        .with_pdi(PDI_BASE_2, &second)
        .build();

    loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE).unwrap();
    assert_eq!(loader.read(PL_CFRAME_ORG, 0x100), vec![0x33; 0x100]);
    assert_eq!(loader.cmd(CommandId::GET_IMAGE_INFO, &[PL_IMG])[0], 0);

    loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE_2).unwrap();
    assert_eq!(
        loader.cmd(CommandId::GET_IMAGE_INFO, &[PL_IMG]),
        err_code(LoaderError::LOADER_NO_VALID_IMG_FOUND)
    );
    assert_eq!(loader.cmd(CommandId::GET_IMAGE_INFO, &[APU_IMG])[0], 0);
}

#[test]
fn test_full_pdi_from_ddr() {
    let pdi = full_pdi(
        0x1,
        vec![image(APU_IMG, 1, 0, vec![partition(0x44, LOAD_BASE, PS, 1)])],
    );
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();

    loader.ctx.load_boot_pdi(SRC_DDR, PDI_BASE).unwrap();
    assert_eq!(loader.read(LOAD_BASE, 0x100), vec![0x44; 0x100]);
    assert_eq!(loader.handoff_cpus(), [1]);

    let state = loader.ctx.lock().unwrap();
    assert!(state.restart.is_empty());
    assert_eq!(state.boot_pdi.map(|loc| loc.base), Some(PDI_BASE));
    assert_ne!(state.boot_header.meta_hdr_ofst, 0);
}

#[test]
fn test_corrupt_pdi_is_rejected() {
    let pdi = two_image_pdi(0x108);
    let mut image = pdi.image.clone();
    // Image header checksum no longer matches
    image[pdi.hdr_ofst + 0x10] ^= 0xFF;
    let loader = Fixture::default().build();
    loader.write(PDI_BASE, &image);

    assert!(loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE).is_err());
    assert!(loader.handoffs().is_empty());
    assert_eq!(loader.read(LOAD_BASE, 0x100), vec![0; 0x100]);
}

#[test]
fn test_atf_handoff_params() {
    let pdi = two_image_pdi(0x109);
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();
    loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE).unwrap();

    let size = std::mem::size_of::<AtfHandoffParams>() as u32;
    let [hi, lo] = addr_words(SCRATCH);
    assert_eq!(
        loader.cmd(CommandId::GET_ATF_HANDOFF_PARAMS, &[hi, lo, size]),
        [0, size]
    );
    let params = AtfHandoffParams::read_from(loader.read(SCRATCH, size as usize).as_slice()).unwrap();
    assert_eq!(params.magic, AtfHandoffParams::MAGIC);
    assert_eq!(params.num_entries, 2);
    assert_eq!(params.entries[0].entry_point, LOAD_BASE);
    assert_eq!(params.entries[1].entry_point, LOAD_BASE + 0x1000);

    assert_eq!(
        loader.cmd(CommandId::GET_ATF_HANDOFF_PARAMS, &[hi, lo, size - 4]),
        err_code(LoaderError::CMD_INVALID_HANDOFF_PARAM_DEST_SIZE)
    );
}

#[test]
fn test_busy_session_is_rejected() {
    let pdi = two_image_pdi(0x10A);
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();

    let guard = loader.ctx.lock().unwrap();
    assert_eq!(
        loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE),
        Err(LoaderError::LOADER_SESSION_BUSY)
    );
    assert_eq!(
        loader.ctx.handle_command(CommandId::FEATURES.0, &[0], true),
        err_code(LoaderError::LOADER_SESSION_BUSY)
    );
    drop(guard);

    loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE).unwrap();
}

#[test]
fn test_poisoned_session_is_rejected() {
    let pdi = two_image_pdi(0x10B);
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        let _guard = loader.ctx.lock().unwrap();
        panic!("operation aborted mid-session");
    }));
    assert!(result.is_err());

    assert_eq!(
        loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE),
        Err(LoaderError::LOADER_SESSION_BUSY)
    );
    assert!(loader.handoffs().is_empty());
}
