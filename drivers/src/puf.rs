/*++

Licensed under the Apache-2.0 license.

File Name:

    puf.rs

Abstract:

    File contains API for PUF key regeneration. The PUF is modelled as a
    device secret; the regenerated key-encrypting key is bound to the
    helper data, the syndrome hash and the auxiliary value.

--*/

use crate::sha3::Sha3;
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::{AesKey, AES_KEY_BYTE_SIZE};
use zeroize::Zeroize;

/// Helper data used to regenerate the PUF key
pub struct PufHelperData<'a> {
    pub syndrome: &'a [u8],
    pub chash: u32,
    pub aux: u32,
}

pub struct Puf {
    secret: [u8; AES_KEY_BYTE_SIZE],
}

impl Puf {
    pub fn new(secret: [u8; AES_KEY_BYTE_SIZE]) -> Self {
        Self { secret }
    }

    /// Regenerate the PUF key-encrypting key.
    ///
    /// # Arguments
    ///
    /// * `sha3` - SHA3 engine used for the derivation
    /// * `helper` - Helper data from eFuse or the boot header
    ///
    /// # Returns
    ///
    /// * `LoaderError::CRYPTO_PUF_REGENERATION_FAILED` for blank helper data
    pub fn regenerate(&mut self, sha3: &mut Sha3, helper: &PufHelperData) -> LoaderResult<AesKey> {
        if helper.syndrome.iter().all(|&b| b == 0) {
            Err(LoaderError::CRYPTO_PUF_REGENERATION_FAILED)?;
        }
        let mut digest = sha3.sha3_384_digest(&[
            &self.secret,
            helper.syndrome,
            &helper.chash.to_le_bytes(),
            &helper.aux.to_le_bytes(),
        ])?;
        let mut kek = [0u8; AES_KEY_BYTE_SIZE];
        kek.copy_from_slice(&digest[..AES_KEY_BYTE_SIZE]);
        digest.zeroize();
        Ok(kek)
    }
}

impl Drop for Puf {
    fn drop(&mut self) {
        self.secret.zeroize();
    }
}
