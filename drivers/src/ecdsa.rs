/*++

Licensed under the Apache-2.0 license.

File Name:

    ecdsa.rs

Abstract:

    File contains API for ECDSA signature verification over NIST P-384
    and P-521.

--*/

use signature::hazmat::PrehashVerifier;
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::{ECC_P384_BYTE_SIZE, ECC_P521_BYTE_SIZE};

/// Supported curves
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum EccCurve {
    P384,
    P521,
}

impl EccCurve {
    /// Size in bytes of a coordinate or scalar
    pub fn size(self) -> usize {
        match self {
            EccCurve::P384 => ECC_P384_BYTE_SIZE,
            EccCurve::P521 => ECC_P521_BYTE_SIZE,
        }
    }
}

/// Big-endian affine public key
pub struct EccPubKey<'a> {
    pub x: &'a [u8],
    pub y: &'a [u8],
}

/// Big-endian signature
pub struct EccSignature<'a> {
    pub r: &'a [u8],
    pub s: &'a [u8],
}

fn sec1_point(curve: EccCurve, key: &EccPubKey) -> LoaderResult<Vec<u8>> {
    let len = curve.size();
    if key.x.len() != len || key.y.len() != len {
        Err(LoaderError::CRYPTO_ECDSA_INVALID_KEY)?;
    }
    let mut point = Vec::with_capacity(1 + 2 * len);
    point.push(0x04);
    point.extend_from_slice(key.x);
    point.extend_from_slice(key.y);
    Ok(point)
}

fn raw_signature(curve: EccCurve, sig: &EccSignature) -> LoaderResult<Vec<u8>> {
    let len = curve.size();
    if sig.r.len() != len || sig.s.len() != len {
        Err(LoaderError::CRYPTO_ECDSA_INVALID_SIGNATURE)?;
    }
    Ok([sig.r, sig.s].concat())
}

#[derive(Default)]
pub struct Ecdsa {}

impl Ecdsa {
    pub fn new() -> Self {
        Self {}
    }

    /// Verify a signature over a message digest.
    ///
    /// # Arguments
    ///
    /// * `curve` - Curve of the key
    /// * `pub_key` - Public key
    /// * `digest` - SHA3-384 digest of the signed data
    /// * `signature` - Signature to verify
    ///
    /// # Returns
    ///
    /// * `LoaderError::CRYPTO_ECDSA_VERIFY_FAILURE` if the signature does not verify
    pub fn verify(
        &mut self,
        curve: EccCurve,
        pub_key: &EccPubKey,
        digest: &[u8],
        signature: &EccSignature,
    ) -> LoaderResult<()> {
        let point = sec1_point(curve, pub_key)?;
        let sig = raw_signature(curve, signature)?;
        match curve {
            EccCurve::P384 => {
                let key = p384::ecdsa::VerifyingKey::from_sec1_bytes(&point)
                    .map_err(|_| LoaderError::CRYPTO_ECDSA_INVALID_KEY)?;
                let sig = p384::ecdsa::Signature::from_slice(&sig)
                    .map_err(|_| LoaderError::CRYPTO_ECDSA_INVALID_SIGNATURE)?;
                key.verify_prehash(digest, &sig)
                    .map_err(|_| LoaderError::CRYPTO_ECDSA_VERIFY_FAILURE)?;
            }
            EccCurve::P521 => {
                let key = p521::ecdsa::VerifyingKey::from_sec1_bytes(&point)
                    .map_err(|_| LoaderError::CRYPTO_ECDSA_INVALID_KEY)?;
                let sig = p521::ecdsa::Signature::from_slice(&sig)
                    .map_err(|_| LoaderError::CRYPTO_ECDSA_INVALID_SIGNATURE)?;
                key.verify_prehash(digest, &sig)
                    .map_err(|_| LoaderError::CRYPTO_ECDSA_VERIFY_FAILURE)?;
            }
        }
        Ok(())
    }
}
