/*++

Licensed under the Apache-2.0 license.

File Name:

    rsa.rs

Abstract:

    File contains API for RSA-4096 public key operations.

--*/

use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Pss, RsaPublicKey};
use sha3::Sha3_384;
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::{RSA_4096_BYTE_SIZE, SHA3_DIGEST_BYTE_SIZE};

/// Big-endian RSA public key
pub struct RsaPubKey<'a> {
    pub modulus: &'a [u8],
    pub exponent: u32,
}

impl<'a> RsaPubKey<'a> {
    fn to_key(&self) -> LoaderResult<RsaPublicKey> {
        if self.modulus.len() != RSA_4096_BYTE_SIZE || self.exponent == 0 {
            Err(LoaderError::CRYPTO_RSA_INVALID_KEY)?;
        }
        RsaPublicKey::new(
            BigUint::from_bytes_be(self.modulus),
            BigUint::from(self.exponent),
        )
        .map_err(|_| LoaderError::CRYPTO_RSA_INVALID_KEY)
    }
}

#[derive(Default)]
pub struct Rsa {}

impl Rsa {
    pub fn new() -> Self {
        Self {}
    }

    /// Verify an RSASSA-PSS signature over a SHA3-384 digest.
    ///
    /// MGF1 uses SHA3-384 and the salt is one digest long.
    ///
    /// # Arguments
    ///
    /// * `pub_key` - Public key
    /// * `digest` - Digest of the signed data
    /// * `signature` - Big-endian signature
    pub fn pss_verify(
        &mut self,
        pub_key: &RsaPubKey,
        digest: &[u8],
        signature: &[u8],
    ) -> LoaderResult<()> {
        let key = pub_key.to_key()?;
        key.verify(
            Pss::new_with_salt::<Sha3_384>(SHA3_DIGEST_BYTE_SIZE),
            digest,
            signature,
        )
        .map_err(|_| LoaderError::CRYPTO_RSA_PSS_VERIFY_FAILURE)
    }

    /// Raw public-key operation `data ^ e mod n`.
    ///
    /// # Returns
    ///
    /// * Result left-padded to the modulus size
    pub fn public_encrypt(&mut self, pub_key: &RsaPubKey, data: &[u8]) -> LoaderResult<Vec<u8>> {
        let key = pub_key.to_key()?;
        let m = BigUint::from_bytes_be(data);
        if &m >= key.n() {
            Err(LoaderError::CRYPTO_RSA_ENCRYPT_FAILURE)?;
        }
        let c = m.modpow(key.e(), key.n()).to_bytes_be();
        let mut out = vec![0u8; RSA_4096_BYTE_SIZE];
        out[RSA_4096_BYTE_SIZE - c.len()..].copy_from_slice(&c);
        Ok(out)
    }
}
