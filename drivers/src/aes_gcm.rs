/*++

Licensed under the Apache-2.0 license.

File Name:

    aes_gcm.rs

Abstract:

    File contains API for AES-256-GCM Cryptography operations. Decryption
    is streamed so a partition can be processed one chunk at a time.

--*/

use aes::Aes256;
use aes_gcm::aead::AeadInPlace;
use aes_gcm::{Aes256Gcm, Nonce};
use cipher::{BlockEncrypt, KeyInit, KeyIvInit, StreamCipher};
use ghash::universal_hash::UniversalHash;
use ghash::GHash;
use subtle::ConstantTimeEq;
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::{AesIv, AesKey, AES_KEY_BYTE_SIZE, GCM_TAG_BYTE_SIZE};
use zeroize::Zeroize;

type Aes256Ctr = ctr::Ctr32BE<Aes256>;

pub type GcmTag = [u8; GCM_TAG_BYTE_SIZE];

const BLOCK_LEN: usize = 16;

/// Pre-counter block `IV || 0^31 || 1`
fn j0(iv: &AesIv) -> [u8; BLOCK_LEN] {
    let mut block = [0u8; BLOCK_LEN];
    block[..12].copy_from_slice(iv);
    block[15] = 1;
    block
}

/// Counter mode keystream starting at inc32(J0)
fn payload_ctr(key: &AesKey, iv: &AesIv) -> Aes256Ctr {
    let mut ctr0 = j0(iv);
    ctr0[15] = 2;
    Aes256Ctr::new(key.into(), (&ctr0).into())
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum GcmPhase {
    Aad,
    Data,
}

struct GcmState {
    cipher: Aes256,
    ctr: Aes256Ctr,
    ghash: GHash,
    j0: [u8; BLOCK_LEN],
    partial: [u8; BLOCK_LEN],
    partial_len: usize,
    aad_len: u64,
    data_len: u64,
    phase: GcmPhase,
}

impl GcmState {
    fn new(key: &AesKey, iv: &AesIv) -> Self {
        let cipher = Aes256::new(key.into());
        let mut h = aes::Block::default();
        cipher.encrypt_block(&mut h);
        Self {
            cipher,
            ctr: payload_ctr(key, iv),
            ghash: GHash::new(&h),
            j0: j0(iv),
            partial: [0u8; BLOCK_LEN],
            partial_len: 0,
            aad_len: 0,
            data_len: 0,
            phase: GcmPhase::Aad,
        }
    }

    /// Absorbs ciphertext into GHASH, holding back any trailing partial block
    fn absorb(&mut self, mut data: &[u8]) {
        if self.partial_len > 0 {
            let take = (BLOCK_LEN - self.partial_len).min(data.len());
            self.partial[self.partial_len..self.partial_len + take].copy_from_slice(&data[..take]);
            self.partial_len += take;
            data = &data[take..];
            if self.partial_len < BLOCK_LEN {
                return;
            }
            self.ghash.update(&[self.partial.into()]);
            self.partial_len = 0;
        }
        let full = data.len() - data.len() % BLOCK_LEN;
        if full > 0 {
            self.ghash.update_padded(&data[..full]);
        }
        let rest = &data[full..];
        self.partial[..rest.len()].copy_from_slice(rest);
        self.partial_len = rest.len();
    }

    fn tag(mut self) -> GcmTag {
        if self.partial_len > 0 {
            self.ghash.update_padded(&self.partial[..self.partial_len]);
        }
        let mut lengths = [0u8; BLOCK_LEN];
        lengths[..8].copy_from_slice(&(self.aad_len * 8).to_be_bytes());
        lengths[8..].copy_from_slice(&(self.data_len * 8).to_be_bytes());
        self.ghash.update(&[lengths.into()]);
        let mut tag: GcmTag = [0u8; GCM_TAG_BYTE_SIZE];
        tag.copy_from_slice(&self.ghash.finalize());

        let mut ek_j0 = aes::Block::from(self.j0);
        self.cipher.encrypt_block(&mut ek_j0);
        for (t, k) in tag.iter_mut().zip(ek_j0.iter()) {
            *t ^= k;
        }
        self.partial.zeroize();
        tag
    }
}

/// AES-256-GCM engine
#[derive(Default)]
pub struct AesGcm {
    state: Option<GcmState>,
}

impl AesGcm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a streamed decryption, discarding any operation in flight.
    ///
    /// # Arguments
    ///
    /// * `key` - AES-256 key
    /// * `iv` - 96-bit IV
    pub fn decrypt_init(&mut self, key: &AesKey, iv: &AesIv) -> LoaderResult<()> {
        self.state = Some(GcmState::new(key, iv));
        Ok(())
    }

    /// Feeds additional authenticated data. Must precede any ciphertext.
    pub fn update_aad(&mut self, aad: &[u8]) -> LoaderResult<()> {
        let state = self
            .state
            .as_mut()
            .ok_or(LoaderError::CRYPTO_AES_GCM_INVALID_STATE)?;
        if state.phase != GcmPhase::Aad || state.aad_len % BLOCK_LEN as u64 != 0 {
            Err(LoaderError::CRYPTO_AES_GCM_INVALID_STATE)?;
        }
        state.ghash.update_padded(aad);
        state.aad_len += aad.len() as u64;
        Ok(())
    }

    /// Decrypts `data` in place.
    ///
    /// # Arguments
    ///
    /// * `data` - Ciphertext on entry, plaintext on return
    pub fn decrypt_update(&mut self, data: &mut [u8]) -> LoaderResult<()> {
        let state = self
            .state
            .as_mut()
            .ok_or(LoaderError::CRYPTO_AES_GCM_INVALID_STATE)?;
        state.phase = GcmPhase::Data;
        state.absorb(data);
        state.ctr.apply_keystream(data);
        state.data_len += data.len() as u64;
        Ok(())
    }

    /// Completes the operation and checks the authentication tag.
    ///
    /// # Returns
    ///
    /// * `LoaderError::CRYPTO_AES_GCM_TAG_MISMATCH` if the tag does not verify
    pub fn decrypt_final(&mut self, tag: &GcmTag) -> LoaderResult<()> {
        let state = self
            .state
            .take()
            .ok_or(LoaderError::CRYPTO_AES_GCM_INVALID_STATE)?;
        let computed = state.tag();
        if !bool::from(computed[..].ct_eq(&tag[..])) {
            Err(LoaderError::CRYPTO_AES_GCM_TAG_MISMATCH)?;
        }
        Ok(())
    }

    /// Encrypts `data` in place in a single operation.
    ///
    /// # Returns
    ///
    /// * `GcmTag` - Authentication tag
    pub fn encrypt(
        &mut self,
        key: &AesKey,
        iv: &AesIv,
        aad: &[u8],
        data: &mut [u8],
    ) -> LoaderResult<GcmTag> {
        let cipher = Aes256Gcm::new(key.into());
        let tag = cipher
            .encrypt_in_place_detached(Nonce::from_slice(iv), aad, data)
            .map_err(|_| LoaderError::CRYPTO_AES_GCM_INVALID_LENGTH)?;
        let mut out = [0u8; GCM_TAG_BYTE_SIZE];
        out.copy_from_slice(&tag);
        Ok(out)
    }

    /// Unwraps a black key with a key-encrypting key.
    ///
    /// The wrapped key is the GCM keystream under (`kek`, `iv`) applied to
    /// the red key, without a tag.
    pub fn kek_unwrap(&mut self, kek: &AesKey, iv: &AesIv, black: &AesKey) -> LoaderResult<AesKey> {
        let mut red = *black;
        payload_ctr(kek, iv).apply_keystream(&mut red);
        if red == [0u8; AES_KEY_BYTE_SIZE] {
            Err(LoaderError::CRYPTO_KEK_UNWRAP_FAILED)?;
        }
        Ok(red)
    }
}
