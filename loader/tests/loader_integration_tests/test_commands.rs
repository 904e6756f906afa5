// Licensed under the Apache-2.0 license

use crate::common::*;
use xloader::CommandId;
use xloader_drivers::memory_layout::PL_CFRAME_ORG;
use xloader_error::LoaderError;
use xloader_image_types::{ImageInfoEntry, IHT_BYTE_SIZE, IH_BYTE_SIZE, PH_BYTE_SIZE};
use zerocopy::FromBytes;

#[test]
fn test_unknown_command() {
    let loader = Fixture::default().build();
    assert_eq!(
        loader.ctx.handle_command(0x0C, &[], true),
        err_code(LoaderError::CMD_INVALID)
    );
    assert_eq!(
        loader.ctx.handle_command(0xFF, &[0, 1, 2], false),
        err_code(LoaderError::CMD_INVALID)
    );
}

#[test]
fn test_features() {
    let loader = Fixture::default().build();
    assert_eq!(
        loader.cmd(CommandId::FEATURES, &[CommandId::EXTRACT_METAHEADER.0]),
        [0, 1]
    );
    assert_eq!(loader.cmd(CommandId::FEATURES, &[0x0C]), [0, 0]);
}

#[test]
fn test_get_image_info() {
    let pdi = two_image_pdi(0x300);
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();
    loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE).unwrap();

    assert_eq!(
        loader.cmd(CommandId::GET_IMAGE_INFO, &[RPU_IMG]),
        [0, 2, 0, RPU_IMG ^ 0xFFFF]
    );
    assert_eq!(
        loader.cmd(CommandId::GET_IMAGE_INFO, &[0]),
        err_code(LoaderError::LOADER_INVALID_IMGID)
    );
    assert_eq!(
        loader.cmd(CommandId::GET_IMAGE_INFO, &[]),
        err_code(LoaderError::CMD_PAYLOAD_TOO_SHORT)
    );
}

#[test]
fn test_set_image_info_is_accepted() {
    let loader = Fixture::default().build();
    assert_eq!(loader.cmd(CommandId::SET_IMAGE_INFO, &[APU_IMG, 1, 0, 0]), [0]);
}

#[test]
fn test_get_image_info_list() {
    let pdi = two_image_pdi(0x301);
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();
    loader.ctx.load_partial_pdi(SRC_DDR, PDI_BASE).unwrap();

    let [hi, lo] = addr_words(SCRATCH);
    assert_eq!(loader.cmd(CommandId::GET_IMAGE_INFO_LIST, &[hi, lo, 4]), [0, 2]);
    let entry_len = std::mem::size_of::<ImageInfoEntry>();
    let first = ImageInfoEntry::read_from(loader.read(SCRATCH, entry_len).as_slice()).unwrap();
    assert_eq!(first.img_id, APU_IMG);
    assert_eq!(first.uid, 1);
    let second =
        ImageInfoEntry::read_from(loader.read(SCRATCH + entry_len as u64, entry_len).as_slice())
            .unwrap();
    assert_eq!(second.img_id, RPU_IMG);

    assert_eq!(
        loader.cmd(CommandId::GET_IMAGE_INFO_LIST, &[hi, lo, 1]),
        err_code(LoaderError::LOADER_INVALID_DEST_IMGINFOTBL_SIZE)
    );
}

#[test]
fn test_update_multiboot() {
    let loader = Fixture::default().build();

    assert_eq!(
        loader
            .ctx
            .handle_command(CommandId::UPDATE_MULTIBOOT.0, &[0x200, 0x10_0000], false),
        err_code(LoaderError::CMD_ACCESS_DENIED)
    );
    assert_eq!(loader.ctx.lock().unwrap().multiboot, 0);

    assert_eq!(loader.cmd(CommandId::UPDATE_MULTIBOOT, &[0x200, 0x10_0000]), [0]);
    assert_eq!(loader.ctx.lock().unwrap().multiboot, 0x20);

    assert_eq!(
        loader.cmd(CommandId::UPDATE_MULTIBOOT, &[0x301, 3]),
        [0]
    );
    assert_eq!(loader.ctx.lock().unwrap().multiboot, 0xF000_0003);

    assert_eq!(
        loader.cmd(CommandId::UPDATE_MULTIBOOT, &[0xF00, 0]),
        err_code(LoaderError::CMD_UNSUPPORTED_MULTIBOOT_PDISRC)
    );
}

#[test]
fn test_load_subsystem_pdi() {
    let pdi = two_image_pdi(0x302);
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();

    let [hi, lo] = addr_words(PDI_BASE);
    assert_eq!(
        loader.cmd(CommandId::LOAD_SUBSYSTEM_PDI, &[SRC_SD0, hi, lo]),
        err_code(LoaderError::CMD_UNSUPPORTED_SUBSYSTEM_PDISRC)
    );
    assert_eq!(loader.cmd(CommandId::LOAD_SUBSYSTEM_PDI, &[SRC_DDR, hi, lo]), [0]);
    assert_eq!(loader.read(LOAD_BASE, 0x100), vec![0x11; 0x100]);
    assert_eq!(loader.handoff_cpus(), [1, 2]);
}

#[test]
fn test_readback_redirects_pl_data() {
    let pdi = partial_pdi(
        0x303,
        vec![image(
            APU_IMG,
            1,
            0,
            vec![
                partition(0x11, LOAD_BASE, PS, 0),
                partition(0x33, PL_CFRAME_ORG, PL, 0),
            ],
        )],
    );
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();
    let [hi, lo] = addr_words(PDI_BASE);
    let [dst_hi, dst_lo] = addr_words(SCRATCH);

    assert_eq!(
        loader.ctx.handle_command(
            CommandId::LOAD_READBACK_PDI.0,
            &[SRC_DDR, hi, lo, dst_hi, dst_lo, 0x1000],
            false
        ),
        err_code(LoaderError::CMD_ACCESS_DENIED)
    );

    assert_eq!(
        loader.cmd(
            CommandId::LOAD_READBACK_PDI,
            &[SRC_DDR, hi, lo, dst_hi, dst_lo, 0x1000]
        ),
        [0, 0x100]
    );
    assert_eq!(loader.read(SCRATCH, 0x100), vec![0x33; 0x100]);
    assert_eq!(loader.read(PL_CFRAME_ORG, 0x100), vec![0; 0x100]);
    // PS partitions still go to their load address
    assert_eq!(loader.read(LOAD_BASE, 0x100), vec![0x11; 0x100]);
}

#[test]
fn test_readback_buffer_overflow() {
    let pdi = partial_pdi(
        0x304,
        vec![image(APU_IMG, 1, 0, vec![partition(0x33, PL_CFRAME_ORG, PL, 0)])],
    );
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();
    let [hi, lo] = addr_words(PDI_BASE);
    let [dst_hi, dst_lo] = addr_words(SCRATCH);

    assert_eq!(
        loader.cmd(
            CommandId::LOAD_READBACK_PDI,
            &[SRC_DDR, hi, lo, dst_hi, dst_lo, 0x80]
        ),
        err_code(LoaderError::LOADER_READBACK_BUFFER_OVERFLOW)
    );
    assert_eq!(
        loader.pl_errors(),
        [(APU_IMG, LoaderError::LOADER_READBACK_BUFFER_OVERFLOW)]
    );
}

fn metaheader_len(images: usize, prtns: usize) -> u32 {
    (IHT_BYTE_SIZE + images * IH_BYTE_SIZE + prtns * PH_BYTE_SIZE) as u32
}

#[test]
fn test_extract_metaheader_of_partial_pdi() {
    let pdi = two_image_pdi(0x305);
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();
    let [hi, lo] = addr_words(PDI_BASE);
    let [dst_hi, dst_lo] = addr_words(SCRATCH);
    let len = metaheader_len(2, 2);

    assert_eq!(
        loader.cmd(
            CommandId::EXTRACT_METAHEADER,
            &[hi, lo, dst_hi, dst_lo, 0x1000]
        ),
        [0, len]
    );
    assert_eq!(loader.read_u32(SCRATCH), pdi.iht.version);
    assert_eq!(loader.read_u32(SCRATCH + 4), 2);
    // Attribute word is withheld, the PDI id is not
    assert_eq!(loader.read_u32(SCRATCH + 7 * 4), 0);
    assert_eq!(loader.read_u32(SCRATCH + 8 * 4), 0x305);
    // Nothing was loaded
    assert!(loader.handoffs().is_empty());

    assert_eq!(
        loader.cmd(
            CommandId::EXTRACT_METAHEADER,
            &[hi, lo, dst_hi, dst_lo, len - 4]
        ),
        err_code(LoaderError::CMD_INVALID_METAHDR_BUFF_SIZE)
    );
}

#[test]
fn test_extract_metaheader_of_full_pdi() {
    let pdi = full_pdi(
        0x1,
        vec![image(APU_IMG, 1, 0, vec![partition(0x44, LOAD_BASE, PS, 1)])],
    );
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();
    let [hi, lo] = addr_words(PDI_BASE);
    let [dst_hi, dst_lo] = addr_words(SCRATCH);

    assert_eq!(
        loader.cmd(
            CommandId::EXTRACT_METAHEADER,
            &[hi, lo, dst_hi, dst_lo, 0x1000]
        ),
        [0, metaheader_len(1, 1)]
    );
    assert_eq!(loader.read_u32(SCRATCH + 4), 1);
}

#[test]
fn test_extract_metaheader_rejects_bad_input() {
    let loader = Fixture::default().build();
    let [hi, lo] = addr_words(PDI_BASE);
    let [dst_hi, dst_lo] = addr_words(SCRATCH);

    assert_eq!(
        loader.cmd(
            CommandId::EXTRACT_METAHEADER,
            &[hi, lo, dst_hi, dst_lo, 0x1000]
        ),
        err_code(LoaderError::CMD_INVALID_PDI_INPUT)
    );
    assert_eq!(
        loader.cmd(
            CommandId::EXTRACT_METAHEADER,
            &[0, 0x7000_0000, dst_hi, dst_lo, 0x1000]
        ),
        err_code(LoaderError::CMD_INVALID_METAHEADER_SRC_ADDR)
    );
}
