/*++

Licensed under the Apache-2.0 license.

File Name:

    aes256gcm_kat.rs

Abstract:

    File contains the Known Answer Tests (KAT) for AES-256-GCM decryption.

--*/

use xloader_drivers::CryptoAdapter;
use xloader_error::{LoaderError, LoaderResult};

// Vector words are stored little-endian, as the engine consumes them:
// key D55455D7 2B247897 0C4BF1CD 1A2D14ED 4D3B0A53 F3C6E1AE AFC2447A 7B534D99
// iv  CCF8E3B9 11F11746 D58C03AF
const KEY: [u8; 32] = [
    0xd7, 0x55, 0x54, 0xd5, 0x97, 0x78, 0x24, 0x2b, 0xcd, 0xf1, 0x4b, 0x0c,
    0xed, 0x14, 0x2d, 0x1a, 0x53, 0x0a, 0x3b, 0x4d, 0xae, 0xe1, 0xc6, 0xf3,
    0x7a, 0x44, 0xc2, 0xaf, 0x99, 0x4d, 0x53, 0x7b,
];
const IV: [u8; 12] = [
    0xb9, 0xe3, 0xf8, 0xcc, 0x46, 0x17, 0xf1, 0x11, 0xaf, 0x03, 0x8c, 0xd5,
];
const CT: [u8; 16] = [
    0xae, 0xc5, 0xec, 0xf9, 0x70, 0xb8, 0xb9, 0x92, 0x31, 0x93, 0x29, 0x31,
    0x56, 0x27, 0x18, 0xc4,
];
const TAG: [u8; 16] = [
    0xe5, 0xb3, 0xcf, 0xc3, 0xca, 0xfb, 0xd4, 0x49, 0xfc, 0x2b, 0x0b, 0xd9,
    0x9b, 0xbe, 0x7d, 0xc8,
];
const PT: [u8; 16] = [
    0xd4, 0xcf, 0x08, 0x90, 0x74, 0xaa, 0x82, 0x38, 0x31, 0x55, 0x63, 0x0d,
    0x47, 0x1f, 0x1c, 0x6c,
];

#[derive(Default, Debug)]
pub struct Aes256GcmKat {}

impl Aes256GcmKat {
    /// This function executes the Known Answer Tests (aka KAT) for AES-256-GCM.
    ///
    /// The ciphertext goes through the streaming interface in two pieces so
    /// the counter carry between updates is covered too.
    ///
    /// # Arguments
    ///
    /// * `crypto` - Crypto adapter
    ///
    /// # Returns
    ///
    /// * `LoaderResult` - Result denoting the KAT outcome.
    pub fn execute(&self, crypto: &mut dyn CryptoAdapter) -> LoaderResult<()> {
        self.decrypt_kat(crypto)
    }

    fn decrypt_kat(&self, crypto: &mut dyn CryptoAdapter) -> LoaderResult<()> {
        let mut data = CT;
        let (head, tail) = data.split_at_mut(5);

        crypto
            .aes_gcm_decrypt_init(&KEY, &IV)
            .and_then(|_| crypto.aes_gcm_decrypt_update(head))
            .and_then(|_| crypto.aes_gcm_decrypt_update(tail))
            .map_err(|_| LoaderError::KAT_AES_GCM_DECRYPT_MISMATCH)?;
        crypto
            .aes_gcm_decrypt_final(&TAG)
            .map_err(|_| LoaderError::KAT_AES_GCM_TAG_MISMATCH)?;

        if data != PT {
            Err(LoaderError::KAT_AES_GCM_DECRYPT_MISMATCH)?;
        }

        Ok(())
    }
}
