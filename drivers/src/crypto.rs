/*++

Licensed under the Apache-2.0 license.

File Name:

    crypto.rs

Abstract:

    File contains the crypto adapter the secure engine drives, and its
    software implementation over the primitive drivers.

--*/

use crate::aes_gcm::{AesGcm, GcmTag};
use crate::ecdsa::{EccCurve, EccPubKey, EccSignature, Ecdsa};
use crate::puf::{Puf, PufHelperData};
use crate::rsa::{Rsa, RsaPubKey};
use crate::sha3::Sha3;
use xloader_error::LoaderResult;
use xloader_image_types::{AesIv, AesKey, Sha3Digest};

/// One call per primitive consumed by the loader
pub trait CryptoAdapter: Send {
    /// SHA3-384 over the concatenation of `parts`
    fn sha3_digest(&mut self, parts: &[&[u8]]) -> LoaderResult<Sha3Digest>;

    fn rsa_pss_verify(&mut self, key: &RsaPubKey, digest: &[u8], sig: &[u8]) -> LoaderResult<()>;

    /// Raw `data ^ e mod n`, used by the RSA known-answer test
    fn rsa_public_encrypt(&mut self, key: &RsaPubKey, data: &[u8]) -> LoaderResult<Vec<u8>>;

    fn ecdsa_verify(
        &mut self,
        curve: EccCurve,
        key: &EccPubKey,
        digest: &[u8],
        sig: &EccSignature,
    ) -> LoaderResult<()>;

    fn aes_gcm_decrypt_init(&mut self, key: &AesKey, iv: &AesIv) -> LoaderResult<()>;

    fn aes_gcm_update_aad(&mut self, aad: &[u8]) -> LoaderResult<()>;

    /// Decrypts `data` in place
    fn aes_gcm_decrypt_update(&mut self, data: &mut [u8]) -> LoaderResult<()>;

    fn aes_gcm_decrypt_final(&mut self, tag: &GcmTag) -> LoaderResult<()>;

    fn aes_gcm_encrypt(
        &mut self,
        key: &AesKey,
        iv: &AesIv,
        aad: &[u8],
        data: &mut [u8],
    ) -> LoaderResult<GcmTag>;

    fn aes_kek_unwrap(&mut self, kek: &AesKey, iv: &AesIv, black: &AesKey) -> LoaderResult<AesKey>;

    fn puf_regenerate(&mut self, helper: &PufHelperData) -> LoaderResult<AesKey>;
}

/// Crypto adapter backed by the software primitive drivers
pub struct SoftCrypto {
    sha3: Sha3,
    aes: AesGcm,
    rsa: Rsa,
    ecdsa: Ecdsa,
    puf: Puf,
}

impl SoftCrypto {
    /// Create the adapter.
    ///
    /// # Arguments
    ///
    /// * `puf_secret` - Device-unique secret behind the PUF
    pub fn new(puf_secret: AesKey) -> Self {
        Self {
            sha3: Sha3::new(),
            aes: AesGcm::new(),
            rsa: Rsa::new(),
            ecdsa: Ecdsa::new(),
            puf: Puf::new(puf_secret),
        }
    }
}

impl CryptoAdapter for SoftCrypto {
    fn sha3_digest(&mut self, parts: &[&[u8]]) -> LoaderResult<Sha3Digest> {
        self.sha3.sha3_384_digest(parts)
    }

    fn rsa_pss_verify(&mut self, key: &RsaPubKey, digest: &[u8], sig: &[u8]) -> LoaderResult<()> {
        self.rsa.pss_verify(key, digest, sig)
    }

    fn rsa_public_encrypt(&mut self, key: &RsaPubKey, data: &[u8]) -> LoaderResult<Vec<u8>> {
        self.rsa.public_encrypt(key, data)
    }

    fn ecdsa_verify(
        &mut self,
        curve: EccCurve,
        key: &EccPubKey,
        digest: &[u8],
        sig: &EccSignature,
    ) -> LoaderResult<()> {
        self.ecdsa.verify(curve, key, digest, sig)
    }

    fn aes_gcm_decrypt_init(&mut self, key: &AesKey, iv: &AesIv) -> LoaderResult<()> {
        self.aes.decrypt_init(key, iv)
    }

    fn aes_gcm_update_aad(&mut self, aad: &[u8]) -> LoaderResult<()> {
        self.aes.update_aad(aad)
    }

    fn aes_gcm_decrypt_update(&mut self, data: &mut [u8]) -> LoaderResult<()> {
        self.aes.decrypt_update(data)
    }

    fn aes_gcm_decrypt_final(&mut self, tag: &GcmTag) -> LoaderResult<()> {
        self.aes.decrypt_final(tag)
    }

    fn aes_gcm_encrypt(
        &mut self,
        key: &AesKey,
        iv: &AesIv,
        aad: &[u8],
        data: &mut [u8],
    ) -> LoaderResult<GcmTag> {
        self.aes.encrypt(key, iv, aad, data)
    }

    fn aes_kek_unwrap(&mut self, kek: &AesKey, iv: &AesIv, black: &AesKey) -> LoaderResult<AesKey> {
        self.aes.kek_unwrap(kek, iv, black)
    }

    fn puf_regenerate(&mut self, helper: &PufHelperData) -> LoaderResult<AesKey> {
        self.puf.regenerate(&mut self.sha3, helper)
    }
}
