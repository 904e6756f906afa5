/*++

Licensed under the Apache-2.0 license.

File Name:

    ecdsa_kat.rs

Abstract:

    File contains the Known Answer Tests (KAT) for ECDSA P-384 and P-521
    signature verification.

--*/

use crate::sha3_kat::KAT_MESSAGE;
use xloader_drivers::{CryptoAdapter, EccCurve, EccPubKey, EccSignature};
use xloader_error::{LoaderError, LoaderResult};

// Both signatures are over SHA3-384(KAT_MESSAGE); coordinates are big-endian
const P384_PUB_KEY_X: [u8; 48] = [
    0x53, 0x20, 0x70, 0xb5, 0xa6, 0x78, 0x5c, 0xc6, 0x1f, 0x5b, 0xd3, 0x08,
    0xda, 0x6a, 0xa5, 0xab, 0xdf, 0xf8, 0x19, 0x88, 0xb6, 0x5e, 0x91, 0x2f,
    0x7a, 0xc6, 0x80, 0x77, 0x20, 0x8b, 0xd3, 0x56, 0x9c, 0x7b, 0xd8, 0x5c,
    0x87, 0xec, 0x02, 0xec, 0x2a, 0x23, 0x33, 0x8a, 0xd7, 0x5b, 0x73, 0x39,
];
const P384_PUB_KEY_Y: [u8; 48] = [
    0x2a, 0xda, 0x1b, 0x44, 0x0e, 0xff, 0xbd, 0xe9, 0xac, 0x52, 0x96, 0x92,
    0x05, 0xaa, 0xbe, 0xb1, 0x31, 0x83, 0xd5, 0xd6, 0x0b, 0xa1, 0xfa, 0x1b,
    0xba, 0xe5, 0x80, 0x42, 0x07, 0xd2, 0x0d, 0x4f, 0x05, 0x7d, 0xa1, 0x3f,
    0x00, 0x51, 0xb9, 0x7f, 0x03, 0xfb, 0x01, 0x27, 0x44, 0x7f, 0x33, 0xcf,
];
const P384_SIGNATURE_R: [u8; 48] = [
    0x06, 0xcf, 0x53, 0xbf, 0xd9, 0xd2, 0x9a, 0x5f, 0x22, 0x49, 0x3d, 0x42,
    0x58, 0x6e, 0x66, 0xd0, 0xb6, 0xe6, 0x97, 0x03, 0xac, 0x7f, 0x24, 0x64,
    0x7b, 0x29, 0x2b, 0xb5, 0xf8, 0x8d, 0x89, 0x1c, 0x5b, 0x7a, 0x13, 0x74,
    0x76, 0x18, 0xcf, 0xca, 0xeb, 0x24, 0x06, 0xca, 0x9f, 0x52, 0x8c, 0xb9,
];
const P384_SIGNATURE_S: [u8; 48] = [
    0x64, 0x5e, 0x28, 0xe7, 0x65, 0xb2, 0xce, 0xf2, 0x50, 0x5d, 0xd8, 0x8c,
    0x9a, 0x88, 0x1d, 0x62, 0xad, 0x69, 0x02, 0x84, 0x01, 0x58, 0x39, 0xa3,
    0x47, 0xeb, 0x49, 0xd7, 0x8d, 0xb2, 0x41, 0xc8, 0x5a, 0x1d, 0x3d, 0x12,
    0xf7, 0x92, 0x23, 0x4c, 0x95, 0xe0, 0xdb, 0xd3, 0x10, 0xb7, 0xea, 0xe2,
];
const P521_PUB_KEY_X: [u8; 66] = [
    0x01, 0x24, 0xbb, 0xcc, 0x7a, 0x26, 0x3b, 0x56, 0x04, 0x48, 0x6e, 0x1a,
    0x1d, 0x5b, 0x75, 0xdc, 0x85, 0xf0, 0xa2, 0xfc, 0xf6, 0x0f, 0xc7, 0xad,
    0xda, 0x27, 0x42, 0x8d, 0x3b, 0x2f, 0x87, 0x0d, 0xff, 0xea, 0x83, 0x3f,
    0x3f, 0x7d, 0x55, 0x90, 0x1a, 0x98, 0x16, 0x84, 0xec, 0xcf, 0xe0, 0x47,
    0xe3, 0x20, 0x88, 0x3e, 0x51, 0x9c, 0xd3, 0x37, 0x04, 0xaa, 0x5d, 0x5c,
    0x3c, 0x7a, 0x77, 0x6a, 0xd6, 0x3e,
];
const P521_PUB_KEY_Y: [u8; 66] = [
    0x01, 0x86, 0x4b, 0x96, 0x68, 0x69, 0x6c, 0x04, 0x86, 0xfc, 0x72, 0x5a,
    0x08, 0x24, 0x35, 0xea, 0xcf, 0xf3, 0x6a, 0xb1, 0x63, 0xd9, 0x82, 0x50,
    0xf4, 0xa7, 0x66, 0xdf, 0x4c, 0xf2, 0xf9, 0x42, 0x13, 0xb4, 0x24, 0xf5,
    0x28, 0x25, 0x19, 0x82, 0x8b, 0x79, 0xe2, 0xac, 0xf0, 0x64, 0x42, 0x29,
    0xe1, 0xdb, 0x72, 0xca, 0x98, 0x4f, 0xfc, 0x1b, 0x75, 0xdd, 0x39, 0xed,
    0xb8, 0xed, 0x7d, 0x89, 0xe5, 0xda,
];
const P521_SIGNATURE_R: [u8; 66] = [
    0x00, 0xb9, 0x2d, 0x3e, 0x3c, 0xa0, 0x90, 0x93, 0x92, 0xa8, 0x45, 0xec,
    0x63, 0x20, 0x03, 0xb3, 0x5c, 0xb7, 0x79, 0x2b, 0x6e, 0x5c, 0xe0, 0x82,
    0xbe, 0x70, 0xa7, 0x19, 0xe3, 0x8f, 0x81, 0x41, 0x52, 0x18, 0x0d, 0x8d,
    0x8c, 0x12, 0x01, 0x23, 0xbe, 0xed, 0x84, 0xa4, 0xc7, 0x3e, 0x9e, 0xbd,
    0x85, 0x28, 0x29, 0xf3, 0xac, 0xbe, 0x49, 0xba, 0xa7, 0x70, 0xbb, 0xfc,
    0xaa, 0xd3, 0xd1, 0x3c, 0xbf, 0x31,
];
const P521_SIGNATURE_S: [u8; 66] = [
    0x01, 0xa0, 0x8a, 0xf5, 0x0d, 0x94, 0x6a, 0x3b, 0x3d, 0x4b, 0xb0, 0x98,
    0x59, 0x42, 0xae, 0x64, 0x22, 0x23, 0xc4, 0xd6, 0xf6, 0xe5, 0xec, 0x1c,
    0xfc, 0x92, 0xc1, 0xb6, 0x14, 0x8b, 0x50, 0xd6, 0xdf, 0x42, 0xdc, 0xd2,
    0xb0, 0x4b, 0x1b, 0xc8, 0x9d, 0x9d, 0xe7, 0x44, 0x55, 0x78, 0xc7, 0x30,
    0x2f, 0x9f, 0x9f, 0x34, 0x3a, 0x5f, 0x85, 0x00, 0x62, 0x68, 0x00, 0xcb,
    0xbf, 0xc6, 0x4b, 0xc8, 0xe5, 0xbb,
];

fn verify_kat(
    crypto: &mut dyn CryptoAdapter,
    curve: EccCurve,
    key: &EccPubKey,
    sig: &EccSignature,
) -> LoaderResult<()> {
    let digest = crypto.sha3_digest(&[&KAT_MESSAGE])?;
    crypto.ecdsa_verify(curve, key, &digest, sig)
}

#[derive(Default, Debug)]
pub struct EcdsaP384Kat {}

impl EcdsaP384Kat {
    /// This function executes the Known Answer Tests (aka KAT) for ECDSA P-384.
    ///
    /// # Arguments
    ///
    /// * `crypto` - Crypto adapter
    ///
    /// # Returns
    ///
    /// * `LoaderResult` - Result denoting the KAT outcome.
    pub fn execute(&self, crypto: &mut dyn CryptoAdapter) -> LoaderResult<()> {
        let key = EccPubKey {
            x: &P384_PUB_KEY_X,
            y: &P384_PUB_KEY_Y,
        };
        let sig = EccSignature {
            r: &P384_SIGNATURE_R,
            s: &P384_SIGNATURE_S,
        };
        verify_kat(crypto, EccCurve::P384, &key, &sig)
            .map_err(|_| LoaderError::KAT_ECDSA_P384_VERIFY_FAILURE)
    }
}

#[derive(Default, Debug)]
pub struct EcdsaP521Kat {}

impl EcdsaP521Kat {
    /// This function executes the Known Answer Tests (aka KAT) for ECDSA P-521.
    pub fn execute(&self, crypto: &mut dyn CryptoAdapter) -> LoaderResult<()> {
        let key = EccPubKey {
            x: &P521_PUB_KEY_X,
            y: &P521_PUB_KEY_Y,
        };
        let sig = EccSignature {
            r: &P521_SIGNATURE_R,
            s: &P521_SIGNATURE_S,
        };
        verify_kat(crypto, EccCurve::P521, &key, &sig)
            .map_err(|_| LoaderError::KAT_ECDSA_P521_VERIFY_FAILURE)
    }
}
