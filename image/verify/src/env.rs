/*++

Licensed under the Apache-2.0 license.

File Name:

    env.rs

Abstract:

    File contains the environment the secure processing engine runs in.

--*/

use xloader_drivers::memory_layout::SECURE_CHUNK_OVERHEAD;
use xloader_drivers::{
    BootDevice, CryptoAdapter, FuseBank, KatStatus, KeyVault, NeedsKat, SystemMemory,
};
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::{
    BootHeader, AC_BYTE_SIZE, GCM_TAG_BYTE_SIZE, SECURE_HDR_BYTE_SIZE, SECURE_HDR_TOTAL_BYTE_SIZE,
    SHA3_DIGEST_BYTE_SIZE,
};

/// Placement of the chunk buffers
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChunkConfig {
    /// First byte of the buffer region
    pub base: u64,
    pub region_size: u64,
    /// Secure chunk size; each buffer holds one chunk plus a secure header
    pub chunk_size: u32,
}

impl ChunkConfig {
    /// Size of one chunk buffer
    pub fn slot_size(&self) -> u64 {
        u64::from(self.chunk_size) + u64::from(SECURE_CHUNK_OVERHEAD)
    }

    /// Rejects chunk sizes that cannot hold one encrypted block with its
    /// hash-chain entry, and regions too small for one buffer or one
    /// authentication certificate.
    pub fn validate(&self) -> LoaderResult<()> {
        let min = SECURE_HDR_TOTAL_BYTE_SIZE + SECURE_HDR_BYTE_SIZE + GCM_TAG_BYTE_SIZE;
        let chunk = self.chunk_size as usize;
        if chunk < min + SHA3_DIGEST_BYTE_SIZE || chunk % 64 != 0 {
            Err(LoaderError::SECURE_CHUNK_SIZE_INVALID)?;
        }
        if self.slot_size() > self.region_size || self.region_size < AC_BYTE_SIZE as u64 {
            Err(LoaderError::SECURE_CHUNK_SIZE_INVALID)?;
        }
        Ok(())
    }

    /// Two buffers are used when both fit in the region
    pub fn is_double_buffered(&self) -> bool {
        2 * self.slot_size() <= self.region_size
    }

    /// Address of the buffer that receives chunk `block_num`
    pub fn slot(&self, block_num: u32) -> u64 {
        if self.is_double_buffered() {
            self.base + u64::from(block_num % 2) * self.slot_size()
        } else {
            self.base
        }
    }
}

/// Resources borrowed from the loader for one secure operation
pub struct SecureEnv<'a> {
    pub mem: &'a mut SystemMemory,
    /// Device bound to the current PDI
    pub device: &'a mut dyn BootDevice,
    pub crypto: &'a mut NeedsKat<Box<dyn CryptoAdapter>>,
    pub fuses: &'a FuseBank,
    pub keys: &'a mut KeyVault,
    /// Black key sources already unwrapped in this session
    pub red_key_cache: &'a mut u32,
    /// Boot header of the boot PDI
    pub boot_header: &'a BootHeader,
    pub chunk: ChunkConfig,
}

impl SecureEnv<'_> {
    pub fn is_bh_auth(&self) -> bool {
        self.boot_header.is_bh_auth()
    }
}

/// Runs any outstanding KAT of `kats` and returns the crypto adapter.
///
/// # Arguments
///
/// * `crypto` - KAT-gated crypto adapter
/// * `kats` - Families about to be used
pub fn kat_gated(
    crypto: &mut NeedsKat<Box<dyn CryptoAdapter>>,
    kats: KatStatus,
) -> LoaderResult<&mut dyn CryptoAdapter> {
    xloader_kat::run_kats(crypto, kats)?;
    Ok(&mut **crypto.require(kats)?)
}
