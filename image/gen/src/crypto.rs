/*++

Licensed under the Apache-2.0 license.

File Name:

   crypto.rs

Abstract:

    File contains the software crypto backend of the PDI generator.

--*/

use crate::{EccPrivKey, PdiGeneratorCrypto};
use aes_gcm::aead::AeadInPlace;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use anyhow::anyhow;
use p384::ecdsa::signature::hazmat::PrehashSigner;
use p384::ecdsa::{Signature, SigningKey};
use sha3::{Digest, Sha3_384};
use xloader_image_types::*;

#[derive(Default)]
pub struct SoftGenCrypto {}

impl SoftGenCrypto {
    pub fn new() -> Self {
        Self {}
    }
}

fn signing_key(priv_key: &EccPrivKey) -> anyhow::Result<SigningKey> {
    SigningKey::from_slice(priv_key).map_err(|_| anyhow!("Invalid ECDSA P-384 private key"))
}

impl PdiGeneratorCrypto for SoftGenCrypto {
    fn sha3_digest(&self, data: &[&[u8]]) -> anyhow::Result<Sha3Digest> {
        let mut hasher = Sha3_384::new();
        for part in data {
            hasher.update(part);
        }
        let mut digest = [0u8; SHA3_DIGEST_BYTE_SIZE];
        digest.copy_from_slice(&hasher.finalize());
        Ok(digest)
    }

    fn ecdsa384_pub_key(&self, priv_key: &EccPrivKey) -> anyhow::Result<[u8; 2 * ECC_P384_BYTE_SIZE]> {
        let point = signing_key(priv_key)?.verifying_key().to_encoded_point(false);
        let (Some(x), Some(y)) = (point.x(), point.y()) else {
            anyhow::bail!("Public key is the identity point");
        };
        let mut out = [0u8; 2 * ECC_P384_BYTE_SIZE];
        out[..ECC_P384_BYTE_SIZE].copy_from_slice(x);
        out[ECC_P384_BYTE_SIZE..].copy_from_slice(y);
        Ok(out)
    }

    fn ecdsa384_sign(
        &self,
        digest: &Sha3Digest,
        priv_key: &EccPrivKey,
    ) -> anyhow::Result<[u8; 2 * ECC_P384_BYTE_SIZE]> {
        let sig: Signature = signing_key(priv_key)?
            .sign_prehash(digest)
            .map_err(|_| anyhow!("ECDSA signing failed"))?;
        let mut out = [0u8; 2 * ECC_P384_BYTE_SIZE];
        out.copy_from_slice(&sig.to_bytes());
        Ok(out)
    }

    fn aes_gcm_encrypt(
        &self,
        key: &AesKey,
        iv: &AesIv,
        aad: &[u8],
        data: &mut [u8],
    ) -> anyhow::Result<[u8; GCM_TAG_BYTE_SIZE]> {
        let cipher = Aes256Gcm::new(key.into());
        let tag = cipher
            .encrypt_in_place_detached(Nonce::from_slice(iv), aad, data)
            .map_err(|_| anyhow!("AES-GCM encryption failed"))?;
        let mut out = [0u8; GCM_TAG_BYTE_SIZE];
        out.copy_from_slice(&tag);
        Ok(out)
    }
}
