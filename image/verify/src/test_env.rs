/*++

Licensed under the Apache-2.0 license.

File Name:

    test_env.rs

Abstract:

    File contains an owned platform the unit tests borrow a secure
    environment from.

--*/

use crate::env::{ChunkConfig, SecureEnv};
use xloader_drivers::boot_device::Ddr;
use xloader_drivers::memory_layout::{CHUNK_BUF_ORG, CHUNK_BUF_SIZE, SECURE_CHUNK_SIZE};
use xloader_drivers::{
    BootDevice, CryptoAdapter, FuseBank, KatStatus, KeyVault, NeedsKat, SoftCrypto, SystemMemory,
};
use xloader_image_types::BootHeader;
use zerocopy::FromBytes;

pub(crate) const PUF_SECRET: [u8; 32] = [0x5A; 32];

pub(crate) struct TestPlatform {
    pub mem: SystemMemory,
    pub device: Ddr,
    pub crypto: NeedsKat<Box<dyn CryptoAdapter>>,
    pub fuses: FuseBank,
    pub keys: KeyVault,
    pub red_key_cache: u32,
    pub boot_header: BootHeader,
    pub chunk: ChunkConfig,
}

impl TestPlatform {
    pub fn new() -> Self {
        let mut device = Ddr::new();
        device.init(0, 0).unwrap();
        let mut fuses = FuseBank::default();
        fuses.puf_hd = [0x99; 1544];
        fuses.puf_chash = 0x1234_5678;
        Self {
            mem: SystemMemory::with_default_layout(),
            device,
            crypto: NeedsKat::new(Box::new(SoftCrypto::new(PUF_SECRET)), KatStatus::empty()),
            fuses,
            keys: KeyVault::default(),
            red_key_cache: 0,
            boot_header: BootHeader::new_zeroed(),
            chunk: ChunkConfig {
                base: CHUNK_BUF_ORG,
                region_size: CHUNK_BUF_SIZE,
                chunk_size: SECURE_CHUNK_SIZE,
            },
        }
    }

    pub fn env(&mut self) -> SecureEnv<'_> {
        SecureEnv {
            mem: &mut self.mem,
            device: &mut self.device,
            crypto: &mut self.crypto,
            fuses: &self.fuses,
            keys: &mut self.keys,
            red_key_cache: &mut self.red_key_cache,
            boot_header: &self.boot_header,
            chunk: self.chunk,
        }
    }
}
