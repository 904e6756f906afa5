// Licensed under the Apache-2.0 license

use crate::common::*;
use xloader::CommandId;
use xloader_drivers::boot_device::{Flash, FlashKind, Sbi, SdCard, UsbDfu};
use xloader_error::LoaderError;
use xloader_image_gen::PdiConfig;
use xloader_image_types::PdiSrc;

const FLASH_STRIDE: usize = 0x8000;

fn boot_pdi() -> xloader_image_gen::GeneratedPdi {
    full_pdi(
        0x1,
        vec![image(APU_IMG, 1, 0, vec![partition(0x44, LOAD_BASE, PS, 1)])],
    )
}

#[test]
fn test_full_pdi_from_flash_multiboot_offset() {
    let pdi = boot_pdi();
    let mut contents = vec![0xFFu8; 2 * FLASH_STRIDE];
    contents.extend_from_slice(&pdi.image);
    let loader = Fixture::default()
        .with_device(
            PdiSrc::Qspi32,
            Box::new(Flash::new(FlashKind::Qspi32, contents).with_busy_polls(3)),
        )
        .build();

    // Nothing at offset zero
    assert!(loader.ctx.load_boot_pdi(SRC_QSPI32, 0).is_err());

    assert_eq!(
        loader.cmd(CommandId::UPDATE_MULTIBOOT, &[SRC_QSPI32 << 8, 2 * FLASH_STRIDE as u32]),
        [0]
    );
    loader.ctx.load_boot_pdi(SRC_QSPI32, 0).unwrap();
    assert_eq!(loader.read(LOAD_BASE, 0x100), vec![0x44; 0x100]);
    assert_eq!(loader.handoff_cpus(), [1]);
}

#[test]
fn test_partial_pdi_from_sd_boot_file() {
    let pdi = two_image_pdi(0x500);
    let loader = Fixture::default()
        .with_device(
            PdiSrc::Sd0,
            Box::new(
                SdCard::new()
                    .with_file(&SdCard::boot_file_name(0), pdi.image.clone())
                    .with_detect_polls(2),
            ),
        )
        .build();

    loader.ctx.load_partial_pdi(SRC_SD0, 0).unwrap();
    assert_eq!(loader.handoff_cpus(), [1, 2]);

    // Block devices can be read again for a restart
    loader.clear(LOAD_BASE, 0x100);
    loader.ctx.restart_image(APU_IMG, None).unwrap();
    assert_eq!(loader.read(LOAD_BASE, 0x100), vec![0x11; 0x100]);
}

#[test]
fn test_sd_card_not_detected() {
    let loader = Fixture::default()
        .with_device(PdiSrc::Sd0, Box::new(SdCard::new().with_card_removed()))
        .build();
    assert_eq!(
        loader.ctx.load_partial_pdi(SRC_SD0, 0),
        Err(LoaderError::DEVICE_SD_CARD_NOT_DETECTED)
    );
}

#[test]
fn test_stream_pdi_is_not_restartable() {
    let pdi = two_image_pdi(0x501);
    let loader = Fixture::default()
        .with_device(PdiSrc::Smap, Box::new(Sbi::new("smap", pdi.image.clone())))
        .build();

    loader.ctx.load_partial_pdi(SRC_SMAP, 0).unwrap();
    assert_eq!(loader.read(LOAD_BASE + 0x1000, 0x100), vec![0x22; 0x100]);
    assert!(loader.ctx.lock().unwrap().restart.is_empty());
    assert_eq!(
        loader.ctx.restart_image(APU_IMG, None),
        Err(LoaderError::LOADER_IMG_ID_NOT_FOUND)
    );
}

#[test]
fn test_usb_download() {
    let pdi = two_image_pdi(0x502);
    let loader = Fixture::default()
        .with_device(PdiSrc::Usb, Box::new(UsbDfu::new(pdi.image.clone(), 0x400)))
        .build();
    loader.ctx.load_partial_pdi(SRC_USB, 0).unwrap();
    assert_eq!(loader.handoff_cpus(), [1, 2]);

    let truncated = Fixture::default()
        .with_device(
            PdiSrc::Usb,
            Box::new(UsbDfu::new(pdi.image.clone(), 0x400).with_truncated_download(0x100)),
        )
        .build();
    assert_eq!(
        truncated.ctx.load_partial_pdi(SRC_USB, 0),
        Err(LoaderError::DEVICE_USB_DFU_INCOMPLETE)
    );
}

#[test]
fn test_unbound_boot_source() {
    let loader = Fixture::default().build();
    assert_eq!(
        loader.ctx.load_partial_pdi(SRC_USB, 0),
        Err(LoaderError::DEVICE_UNSUPPORTED_PDI_SRC)
    );
    assert_eq!(
        loader.ctx.load_partial_pdi(0x4, 0),
        Err(LoaderError::DEVICE_UNSUPPORTED_PDI_SRC)
    );
}

#[test]
fn test_secondary_boot_device() {
    let pdi = generate(&PdiConfig {
        full: true,
        pdi_id: 0x1,
        sbd_mode: 0x12,
        sbd_addr: PDI_BASE as u32,
        images: vec![image(APU_IMG, 1, 0, vec![partition(0x44, LOAD_BASE, PS, 1)])],
        ..Default::default()
    });
    // Headers come from flash, partition data from the secondary device
    let mut flash_copy = pdi.image.clone();
    let data = pdi.prtn_data_ofst[0];
    flash_copy[data..data + 0x100].fill(0xEE);

    let loader = Fixture::default()
        .with_pdi(PDI_BASE, &pdi)
        .with_device(
            PdiSrc::Qspi32,
            Box::new(Flash::new(FlashKind::Qspi32, flash_copy)),
        )
        .build();

    loader.ctx.load_boot_pdi(SRC_QSPI32, 0).unwrap();
    assert_eq!(loader.read(LOAD_BASE, 0x100), vec![0x44; 0x100]);
}
