// Licensed under the Apache-2.0 license

use crate::common::*;
use xloader::{CommandId, LoaderConfig};
use xloader_error::LoaderError;

const STORE_ID: u32 = 0x77;

fn size_words(pdi: &[u8]) -> u32 {
    pdi.len().div_ceil(4) as u32
}

#[test]
fn test_add_and_load_from_image_store() {
    let pdi = two_image_pdi(0x400);
    let loader = Fixture::default().with_pdi(PDI_BASE, &pdi).build();
    let [hi, lo] = addr_words(PDI_BASE);

    assert_eq!(
        loader.cmd(
            CommandId::ADD_IMAGE_STORE_PDI,
            &[STORE_ID, hi, lo, size_words(&pdi.image)]
        ),
        [0]
    );
    assert_eq!(loader.read(IMAGE_STORE_BASE, pdi.image.len()), pdi.image);

    // The stored copy is what gets loaded
    loader.clear(PDI_BASE, pdi.image.len());
    assert_eq!(
        loader.cmd(CommandId::LOAD_SUBSYSTEM_PDI, &[SRC_IMAGE_STORE, 0, STORE_ID]),
        [0]
    );
    assert_eq!(loader.read(LOAD_BASE, 0x100), vec![0x11; 0x100]);

    // Restart finds the image through the store
    loader.clear(LOAD_BASE, 0x100);
    loader.ctx.restart_image(APU_IMG, None).unwrap();
    assert_eq!(loader.read(LOAD_BASE, 0x100), vec![0x11; 0x100]);
}

#[test]
fn test_write_image_store_pdi_in_pieces() {
    let pdi = two_image_pdi(0x401);
    let loader = Fixture::default().build();

    let words: Vec<u32> = pdi
        .image
        .chunks_exact(4)
        .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
        .collect();
    let (head, tail) = words.split_at(words.len() / 2);
    for piece in [head, tail] {
        let mut payload = vec![STORE_ID];
        payload.extend_from_slice(piece);
        assert_eq!(loader.cmd(CommandId::WRITE_IMAGE_STORE_PDI, &payload), [0]);
    }
    assert_eq!(loader.read(IMAGE_STORE_BASE, pdi.image.len()), pdi.image);

    loader
        .ctx
        .load_partial_pdi(SRC_IMAGE_STORE, u64::from(STORE_ID))
        .unwrap();
    assert_eq!(loader.handoff_cpus(), [1, 2]);
}

#[test]
fn test_remove_image_store_pdi() {
    let first = two_image_pdi(0x402);
    let second = two_image_pdi(0x403);
    let loader = Fixture::default()
        .with_pdi(PDI_BASE, &first)
        .with_pdi(PDI_BASE_2, &second)
        .build();
    let [hi, lo] = addr_words(PDI_BASE);
    let [hi2, lo2] = addr_words(PDI_BASE_2);

    assert_eq!(
        loader.cmd(
            CommandId::REMOVE_IMAGE_STORE_PDI,
            &[STORE_ID]
        ),
        err_code(LoaderError::CMD_PDI_LIST_EMPTY)
    );
    loader.cmd(
        CommandId::ADD_IMAGE_STORE_PDI,
        &[STORE_ID, hi, lo, size_words(&first.image)],
    );
    loader.cmd(
        CommandId::ADD_IMAGE_STORE_PDI,
        &[STORE_ID + 1, hi2, lo2, size_words(&second.image)],
    );

    assert_eq!(loader.cmd(CommandId::REMOVE_IMAGE_STORE_PDI, &[STORE_ID]), [0]);
    // The later PDI moves down into the gap
    assert_eq!(loader.read(IMAGE_STORE_BASE, second.image.len()), second.image);
    assert_eq!(
        loader.ctx.lock().unwrap().image_store.pdis()[0].addr,
        IMAGE_STORE_BASE
    );

    assert_eq!(
        loader.ctx.load_partial_pdi(SRC_IMAGE_STORE, u64::from(STORE_ID)),
        Err(LoaderError::DEVICE_IMG_STORE_PDI_NOT_FOUND)
    );
    assert_eq!(
        loader.cmd(CommandId::REMOVE_IMAGE_STORE_PDI, &[STORE_ID]),
        err_code(LoaderError::CMD_PDI_ADDR_NOT_FOUND)
    );
    loader
        .ctx
        .load_partial_pdi(SRC_IMAGE_STORE, u64::from(STORE_ID + 1))
        .unwrap();
}

#[test]
fn test_image_store_not_configured() {
    let pdi = two_image_pdi(0x404);
    let loader = Fixture {
        config: LoaderConfig::default(),
        ..Default::default()
    }
    .with_pdi(PDI_BASE, &pdi)
    .build();
    let [hi, lo] = addr_words(PDI_BASE);

    assert_eq!(
        loader.cmd(
            CommandId::ADD_IMAGE_STORE_PDI,
            &[STORE_ID, hi, lo, size_words(&pdi.image)]
        ),
        err_code(LoaderError::CMD_PDI_IMG_STORE_CFG_NOT_SET)
    );
    assert_eq!(
        loader.ctx.load_partial_pdi(SRC_IMAGE_STORE, u64::from(STORE_ID)),
        Err(LoaderError::CMD_PDI_IMG_STORE_CFG_NOT_SET)
    );
}

#[test]
fn test_image_store_full() {
    let pdi = two_image_pdi(0x405);
    let loader = Fixture {
        config: LoaderConfig {
            image_store_base: IMAGE_STORE_BASE,
            image_store_size: 0x100,
            ..Default::default()
        },
        ..Default::default()
    }
    .with_pdi(PDI_BASE, &pdi)
    .build();
    let [hi, lo] = addr_words(PDI_BASE);

    assert_eq!(
        loader.cmd(
            CommandId::ADD_IMAGE_STORE_PDI,
            &[STORE_ID, hi, lo, size_words(&pdi.image)]
        ),
        err_code(LoaderError::CMD_PDI_IMG_STORE_FULL)
    );
}

#[test]
fn test_restart_after_image_store_compaction() {
    const OTHER_IMG: u32 = 0x1C00_0009;
    let first = two_image_pdi(0x406);
    let second = partial_pdi(
        0x407,
        vec![image(OTHER_IMG, 9, 0, vec![partition(0x55, LOAD_BASE + 0x2000, PS, 3)])],
    );
    let loader = Fixture::default()
        .with_pdi(PDI_BASE, &first)
        .with_pdi(PDI_BASE_2, &second)
        .build();
    let [hi, lo] = addr_words(PDI_BASE);
    let [hi2, lo2] = addr_words(PDI_BASE_2);

    loader.cmd(
        CommandId::ADD_IMAGE_STORE_PDI,
        &[STORE_ID, hi, lo, size_words(&first.image)],
    );
    loader.cmd(
        CommandId::ADD_IMAGE_STORE_PDI,
        &[STORE_ID + 1, hi2, lo2, size_words(&second.image)],
    );
    loader
        .ctx
        .load_partial_pdi(SRC_IMAGE_STORE, u64::from(STORE_ID + 1))
        .unwrap();

    // The second PDI moves to the start of the store
    assert_eq!(loader.cmd(CommandId::REMOVE_IMAGE_STORE_PDI, &[STORE_ID]), [0]);
    loader.clear(LOAD_BASE + 0x2000, 0x100);

    loader.ctx.restart_image(OTHER_IMG, None).unwrap();
    assert_eq!(loader.read(LOAD_BASE + 0x2000, 0x100), vec![0x55; 0x100]);

    // Gone from the store, so nothing to restart from
    assert_eq!(loader.cmd(CommandId::REMOVE_IMAGE_STORE_PDI, &[STORE_ID + 1]), [0]);
    assert_eq!(
        loader.ctx.restart_image(OTHER_IMG, None),
        Err(LoaderError::LOADER_IMG_ID_NOT_FOUND)
    );
}
