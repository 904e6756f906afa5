// Licensed under the Apache-2.0 license

use crate::common::*;
use xloader::CommandId;
use xloader_error::LoaderError;

#[test]
fn test_restart_reloads_image() {
    let pdi = two_image_pdi(0x200);
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();
    loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE).unwrap();
    loader.clear(LOAD_BASE, 0x2000);

    loader.ctx.restart_image(RPU_IMG, None).unwrap();

    assert_eq!(loader.read(LOAD_BASE + 0x1000, 0x100), vec![0x22; 0x100]);
    // Only the requested image comes back
    assert_eq!(loader.read(LOAD_BASE, 0x100), vec![0; 0x100]);
    assert_eq!(loader.handoff_cpus(), [1, 2, 2]);
}

#[test]
fn test_restart_checks_function_id() {
    let pdi = two_image_pdi(0x201);
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();
    loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE).unwrap();

    assert_eq!(
        loader.ctx.restart_image(APU_IMG, Some(0x1234)),
        Err(LoaderError::LOADER_FUNCTION_ID_MISMATCH)
    );
    loader
        .ctx
        .restart_image(APU_IMG, Some(APU_IMG ^ 0xFFFF))
        .unwrap();
}

#[test]
fn test_restart_unknown_image() {
    let pdi = two_image_pdi(0x202);
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();

    // Nothing loaded yet
    assert_eq!(
        loader.ctx.restart_image(APU_IMG, None),
        Err(LoaderError::LOADER_IMG_ID_NOT_FOUND)
    );

    loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE).unwrap();
    assert_eq!(
        loader.ctx.restart_image(0x1C00_00FF, None),
        Err(LoaderError::LOADER_IMG_ID_NOT_FOUND)
    );
}

#[test]
fn test_restart_falls_back_to_boot_pdi() {
    let pdi = full_pdi(
        0x1,
        vec![image(APU_IMG, 1, 0, vec![partition(0x44, LOAD_BASE, PS, 1)])],
    );
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();
    loader.ctx.load_boot_pdi(SRC_DDR, PDI_BASE).unwrap();
    loader.clear(LOAD_BASE, 0x100);

    loader.ctx.restart_image(APU_IMG, None).unwrap();
    assert_eq!(loader.read(LOAD_BASE, 0x100), vec![0x44; 0x100]);
}

#[test]
fn test_restart_prefers_most_recent_pdi() {
    let with_data = |pdi_id: u32, fill: u8| {
        let mut prtn = partition(0x11, LOAD_BASE, PS, 1);
        prtn.data = vec![fill; 0x100];
        partial_pdi(pdi_id, vec![image(APU_IMG, 1, 0, vec![prtn])])
    };
    let loader = Fixture::default()
        .with_pdi(PDI_BASE, &with_data(0x203, 0xA1))
        .with_pdi(PDI_BASE_2, &with_data(0x204, 0xB2))
        .build();
    loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE).unwrap();
    loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE_2).unwrap();
    loader.clear(LOAD_BASE, 0x100);

    loader.ctx.restart_image(APU_IMG, None).unwrap();
    assert_eq!(loader.read(LOAD_BASE, 0x100), vec![0xB2; 0x100]);
}

#[test]
fn test_restart_skips_unreadable_pdi() {
    let first = two_image_pdi(0x205);
    let second = partial_pdi(
        0x206,
        vec![image(0x1C00_0010, 3, 0, vec![partition(0x55, LOAD_BASE + 0x2000, PS, 3)])],
    );
    let loader = Fixture::default()
        .with_pdi(PDI_BASE, &first)
        .with_pdi(PDI_BASE_2, &second)
        .build();
    loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE).unwrap();
    loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE_2).unwrap();

    loader.clear(PDI_BASE_2, second.image.len());
    loader.clear(LOAD_BASE, 0x100);

    loader.ctx.restart_image(APU_IMG, None).unwrap();
    assert_eq!(loader.read(LOAD_BASE, 0x100), vec![0x11; 0x100]);
}

#[test]
fn test_load_ddr_cpy_img_command() {
    let pdi = two_image_pdi(0x207);
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();
    loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE).unwrap();
    loader.clear(LOAD_BASE, 0x100);

    assert_eq!(loader.cmd(CommandId::LOAD_DDR_CPY_IMG, &[APU_IMG]), [0]);
    assert_eq!(loader.read(LOAD_BASE, 0x100), vec![0x11; 0x100]);

    assert_eq!(
        loader.cmd(CommandId::LOAD_DDR_CPY_IMG, &[APU_IMG, 0]),
        err_code(LoaderError::LOADER_FUNCTION_ID_MISMATCH)
    );
    assert_eq!(
        loader.cmd(CommandId::LOAD_DDR_CPY_IMG, &[]),
        err_code(LoaderError::CMD_PAYLOAD_TOO_SHORT)
    );
}
