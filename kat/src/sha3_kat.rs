/*++

Licensed under the Apache-2.0 license.

File Name:

    sha3_kat.rs

Abstract:

    File contains the Known Answer Tests (KAT) for SHA3-384.

--*/

use xloader_drivers::CryptoAdapter;
use xloader_error::{LoaderError, LoaderResult};

// Message shared with the ECDSA KATs, which verify signatures over its digest
pub(crate) const KAT_MESSAGE: [u8; 32] = [
    0x2f, 0xbf, 0x02, 0x9e, 0xe9, 0xfb, 0xd6, 0x11, 0xc2, 0x4d, 0x81, 0x4e,
    0x6a, 0xff, 0x26, 0x77, 0xc3, 0x5a, 0x83, 0xbc, 0xe5, 0x63, 0x2c, 0xe7,
    0x89, 0x43, 0x6c, 0x68, 0x82, 0xca, 0x1c, 0x71,
];
const EXPECTED_DIGEST: [u8; 48] = [
    0xff, 0x4e, 0x69, 0xa1, 0x4c, 0xbc, 0xbd, 0x93, 0xbe, 0xaa, 0xb1, 0xc4,
    0x7f, 0x57, 0x8b, 0x34, 0x6d, 0x54, 0x88, 0x93, 0xad, 0xed, 0x45, 0xa3,
    0x5f, 0xe1, 0xca, 0x65, 0xb4, 0x56, 0x40, 0x1e, 0xc0, 0x40, 0xe5, 0x67,
    0xd1, 0x61, 0x20, 0xdd, 0x9c, 0x45, 0x89, 0x72, 0x5c, 0x58, 0xbf, 0x02,
];

#[derive(Default, Debug)]
pub struct Sha3Kat {}

impl Sha3Kat {
    /// This function executes the Known Answer Tests (aka KAT) for SHA3-384.
    ///
    /// # Arguments
    ///
    /// * `crypto` - Crypto adapter
    ///
    /// # Returns
    ///
    /// * `LoaderResult` - Result denoting the KAT outcome.
    pub fn execute(&self, crypto: &mut dyn CryptoAdapter) -> LoaderResult<()> {
        self.kat_message(crypto)
    }

    fn kat_message(&self, crypto: &mut dyn CryptoAdapter) -> LoaderResult<()> {
        let digest = crypto
            .sha3_digest(&[&KAT_MESSAGE])
            .map_err(|_| LoaderError::KAT_SHA3_DIGEST_MISMATCH)?;

        if digest != EXPECTED_DIGEST {
            Err(LoaderError::KAT_SHA3_DIGEST_MISMATCH)?;
        }

        Ok(())
    }
}
