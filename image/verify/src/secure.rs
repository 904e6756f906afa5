/*++

Licensed under the Apache-2.0 license.

File Name:

    secure.rs

Abstract:

    File contains the secure processing engine. A secure partition is
    streamed through the chunk buffers one chunk at a time; each chunk is
    authenticated or hash-chained, decrypted block by block along the
    secure header key chain, and only then committed to its destination.

--*/

use crate::auth::data_auth;
use crate::env::{kat_gated, ChunkConfig, SecureEnv};
use crate::key_select::resolve_key;
use crate::policy::PolicyChecker;
use subtle::ConstantTimeEq;
use xloader_drivers::{cprintln, CopyMode, KatStatus, KeySlot};
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::{
    AesIv, AuthCertificate, ChecksumType, KeySource, PartitionHeader, SecureHeader, Sha3Digest,
    AC_BYTE_SIZE, GCM_TAG_BYTE_SIZE, SECURE_HDR_BYTE_SIZE, SECURE_HDR_TOTAL_BYTE_SIZE,
    SHA3_DIGEST_BYTE_SIZE, WORD_LEN,
};
use zerocopy::FromBytes;
use zeroize::Zeroize;

/// Request to load one partition
#[derive(Debug, Copy, Clone)]
pub struct PartitionLoad<'a> {
    /// Media offset of the PDI holding the partition
    pub base: u64,
    pub ph: &'a PartitionHeader,
    /// Destination address, normally the partition's load address
    pub dst: u64,
}

/// Per-partition state of the secure processing engine
pub struct SecureParams {
    pub block_num: u32,
    pub is_authenticated: bool,
    pub is_encrypted: bool,
    pub is_checksum: bool,
    ac: Option<AuthCertificate>,
    /// Hash the next chunk must match
    expected_hash: Option<Sha3Digest>,
    /// Register holding the key source key
    key_slot: Option<KeySlot>,
    /// IV of the next secure header or block
    iv: AesIv,
    /// Plaintext length of the next encrypted block
    next_block_len: usize,
    remaining_media: u64,
    remaining_enc: u64,
    remaining_data: u64,
    /// Destination bytes committed so far
    written: u64,
    /// Chunk buffer targeted by an outstanding non-blocking copy
    pending: Option<u64>,
}

fn word_bytes(words: u32) -> u64 {
    u64::from(words) * WORD_LEN as u64
}

fn copy_len(len: u64) -> LoaderResult<u32> {
    u32::try_from(len).map_err(|_| LoaderError::SECURE_CHUNK_LEN_INVALID)
}

/// Decrypt and authenticate a secure header stored at `addr`.
///
/// # Arguments
///
/// * `env` - Secure environment
/// * `key` - Register holding the key
/// * `iv` - IV of the header
/// * `aad` - Optional address and length of additional authenticated data
/// * `addr` - Address of the 48-byte header followed by its tag
pub(crate) fn decrypt_secure_hdr(
    env: &mut SecureEnv,
    key: KeySlot,
    iv: &AesIv,
    aad: Option<(u64, usize)>,
    addr: u64,
) -> LoaderResult<SecureHeader> {
    let mut hdr = [0u8; SECURE_HDR_BYTE_SIZE];
    let mut tag = [0u8; GCM_TAG_BYTE_SIZE];
    env.mem.read(addr, &mut hdr)?;
    env.mem.read(addr + SECURE_HDR_BYTE_SIZE as u64, &mut tag)?;

    let key = env.keys.key(key)?;
    let aes = kat_gated(env.crypto, KatStatus::AES_GCM)?;
    aes.aes_gcm_decrypt_init(key, iv)?;
    if let Some((aad_addr, aad_len)) = aad {
        aes.aes_gcm_update_aad(env.mem.slice(aad_addr, aad_len)?)?;
    }
    aes.aes_gcm_decrypt_update(&mut hdr)?;
    let result = aes
        .aes_gcm_decrypt_final(&tag)
        .map_err(|_| LoaderError::SECURE_GCM_TAG_MISMATCH)
        .and_then(|()| SecureHeader::read_from(&hdr[..]).ok_or(LoaderError::SECURE_CHUNK_LEN_INVALID));
    hdr.zeroize();
    result
}

/// Decrypt `len` bytes at `addr` in place and check the tag that follows.
///
/// The plaintext must not be used unless this returns `Ok`.
pub(crate) fn decrypt_block(
    env: &mut SecureEnv,
    key: KeySlot,
    iv: &AesIv,
    addr: u64,
    len: usize,
) -> LoaderResult<()> {
    let mut tag = [0u8; GCM_TAG_BYTE_SIZE];
    env.mem.read(addr + len as u64, &mut tag)?;

    let key = env.keys.key(key)?;
    let aes = kat_gated(env.crypto, KatStatus::AES_GCM)?;
    aes.aes_gcm_decrypt_init(key, iv)?;
    aes.aes_gcm_decrypt_update(env.mem.slice_mut(addr, len)?)?;
    aes.aes_gcm_decrypt_final(&tag)
        .map_err(|_| LoaderError::SECURE_GCM_TAG_MISMATCH)
}

impl SecureParams {
    fn new(ph: &PartitionHeader) -> LoaderResult<Self> {
        let is_checksum = ChecksumType::try_from(ph.checksum_type())? == ChecksumType::Sha3;
        Ok(Self {
            block_num: 0,
            is_authenticated: ph.is_authenticated(),
            is_encrypted: ph.is_encrypted(),
            is_checksum,
            ac: None,
            expected_hash: None,
            key_slot: None,
            iv: ph.prtn_iv_bytes(),
            next_block_len: 0,
            remaining_media: word_bytes(ph.total_data_word_len),
            remaining_enc: word_bytes(ph.enc_data_word_len),
            remaining_data: word_bytes(ph.unenc_data_word_len),
            written: 0,
            pending: None,
        })
    }

    fn is_secure(&self) -> bool {
        self.is_authenticated || self.is_encrypted || self.is_checksum
    }

    fn is_hashed(&self) -> bool {
        self.is_authenticated || self.is_checksum
    }

    /// Reads the certificate and expected checksum, and resolves the key.
    fn prepare(&mut self, env: &mut SecureEnv, req: &PartitionLoad) -> LoaderResult<()> {
        let ph = req.ph;
        let scratch = env.chunk.base;
        if self.is_authenticated {
            let src = req.base + word_bytes(ph.auth_cert_word_ofst);
            env.device
                .copy(env.mem, src, scratch, AC_BYTE_SIZE as u32, CopyMode::Blocking)?;
            let ac = AuthCertificate::read_from(env.mem.slice(scratch, AC_BYTE_SIZE)?)
                .ok_or(LoaderError::PDI_HEADER_TRUNCATED)?;
            self.ac = Some(ac);
        }
        if self.is_checksum {
            let src = req.base + word_bytes(ph.checksum_word_ofst);
            env.device.copy(
                env.mem,
                src,
                scratch,
                SHA3_DIGEST_BYTE_SIZE as u32,
                CopyMode::Blocking,
            )?;
            let mut hash = [0u8; SHA3_DIGEST_BYTE_SIZE];
            env.mem.read(scratch, &mut hash)?;
            self.expected_hash = Some(hash);
        }
        if self.is_encrypted {
            PolicyChecker::new(env.fuses).verify_revoke_id(ph.enc_revoke_id)?;
            let src = KeySource::try_from(ph.enc_status)?;
            self.key_slot = Some(resolve_key(env, src, &ph.kek_iv_bytes(), ph.puf_hd_in_bh())?);
            kat_gated(env.crypto, KatStatus::AES_GCM)?;
        }
        Ok(())
    }

    /// Media length of chunk `idx` and whether it is the last one
    fn chunk_len(&self, chunk: &ChunkConfig, idx: u32, remaining: u64) -> (u64, bool) {
        let mut cap = u64::from(chunk.chunk_size);
        if idx == 0 && self.is_encrypted {
            cap += SECURE_HDR_TOTAL_BYTE_SIZE as u64;
        }
        if remaining <= cap {
            (remaining, true)
        } else {
            (cap, false)
        }
    }

    fn process(&mut self, env: &mut SecureEnv, src: u64, dst: u64) -> LoaderResult<()> {
        let double = env.chunk.is_double_buffered();
        let mut src = src;
        let (mut len, mut last) = self.chunk_len(&env.chunk, 0, self.remaining_media);
        env.device.copy(
            env.mem,
            src,
            env.chunk.slot(0),
            copy_len(len)?,
            CopyMode::Blocking,
        )?;

        loop {
            let addr = env.chunk.slot(self.block_num);
            let next_src = src + len;
            let remaining_after = self.remaining_media - len;
            let next = if last {
                None
            } else {
                Some(self.chunk_len(&env.chunk, self.block_num + 1, remaining_after))
            };

            if let (true, Some((next_len, _))) = (double, next) {
                let next_addr = env.chunk.slot(self.block_num + 1);
                env.device.copy(
                    env.mem,
                    next_src,
                    next_addr,
                    copy_len(next_len)?,
                    CopyMode::InitiateNonBlocking,
                )?;
                self.pending = Some(next_addr);
            }

            self.process_chunk(env, addr, len as usize, last, dst)?;
            self.remaining_media = remaining_after;

            let Some((next_len, next_last)) = next else {
                break;
            };
            self.block_num += 1;
            let next_addr = env.chunk.slot(self.block_num);
            let mode = if double {
                CopyMode::WaitForNonBlockingDone
            } else {
                CopyMode::Blocking
            };
            env.device
                .copy(env.mem, next_src, next_addr, copy_len(next_len)?, mode)?;
            self.pending = None;
            src = next_src;
            len = next_len;
            last = next_last;
        }

        if self.remaining_data != 0 || self.remaining_enc != 0 {
            Err(LoaderError::SECURE_REM_DATA_SIZE_MISMATCH)?;
        }
        Ok(())
    }

    fn process_chunk(
        &mut self,
        env: &mut SecureEnv,
        addr: u64,
        len: usize,
        last: bool,
        dst: u64,
    ) -> LoaderResult<()> {
        let body = if self.is_hashed() {
            self.verify_chunk_hash(env, addr, len, last)?
        } else {
            len
        };

        if body as u64 > self.remaining_enc {
            Err(LoaderError::SECURE_REM_DATA_SIZE_MISMATCH)?;
        }
        self.remaining_enc -= body as u64;

        let (data_addr, data_len) = if self.is_encrypted {
            self.decrypt_chunk(env, addr, body, last)?
        } else {
            (addr, body)
        };

        if data_len as u64 > self.remaining_data {
            Err(LoaderError::SECURE_REM_DATA_SIZE_MISMATCH)?;
        }
        env.mem.copy(data_addr, dst + self.written, data_len)?;
        self.written += data_len as u64;
        self.remaining_data -= data_len as u64;
        Ok(())
    }

    /// Checks the chunk against the certificate or the hash chain.
    ///
    /// # Returns
    ///
    /// * Length of the chunk without its trailing hash
    fn verify_chunk_hash(
        &mut self,
        env: &mut SecureEnv,
        addr: u64,
        len: usize,
        last: bool,
    ) -> LoaderResult<usize> {
        let bh_auth = env.is_bh_auth();
        let first_auth = self.block_num == 0 && self.is_authenticated;
        let chunk = env.mem.slice(addr, len)?;

        match (first_auth, self.ac.as_ref()) {
            (true, Some(ac)) => {
                let digest = kat_gated(env.crypto, KatStatus::SHA3)?
                    .sha3_digest(&[ac.signed_bytes(), chunk])?;
                data_auth(
                    env.crypto,
                    env.fuses,
                    bh_auth,
                    ac,
                    &digest,
                    &ac.partition_signature,
                    LoaderError::SECURE_PRTN_AUTH_FAIL,
                )?;
            }
            _ => {
                let digest = kat_gated(env.crypto, KatStatus::SHA3)?.sha3_digest(&[chunk])?;
                let expected = self
                    .expected_hash
                    .ok_or(LoaderError::SECURE_PRTN_HASH_COMPARE_FAIL)?;
                if !bool::from(digest[..].ct_eq(&expected[..])) {
                    cprintln!("[secure] Hash mismatch in block {}", self.block_num);
                    Err(LoaderError::SECURE_PRTN_HASH_COMPARE_FAIL)?;
                }
            }
        }

        if last {
            self.expected_hash = None;
            return Ok(len);
        }
        let body = len
            .checked_sub(SHA3_DIGEST_BYTE_SIZE)
            .ok_or(LoaderError::SECURE_CHUNK_LEN_INVALID)?;
        let mut next = [0u8; SHA3_DIGEST_BYTE_SIZE];
        env.mem.read(addr + body as u64, &mut next)?;
        self.expected_hash = Some(next);
        Ok(body)
    }

    /// Takes the next key, IV and length from a decrypted secure header
    fn load_secure_hdr(&mut self, env: &mut SecureEnv, sh: &mut SecureHeader) -> LoaderResult<()> {
        let result = (|| -> LoaderResult<()> {
            let len = word_bytes(sh.next_len) as usize;
            if len % 16 != 0 {
                Err(LoaderError::SECURE_ENC_DATA_NOT_ALIGNED)?;
            }
            env.keys.write_key(KeySlot::KeyUpdate, &sh.key)?;
            self.iv = sh.iv;
            self.next_block_len = len;
            Ok(())
        })();
        sh.zeroize();
        result
    }

    /// Decrypts the chunk body in place.
    ///
    /// # Returns
    ///
    /// * Address and length of the plaintext data
    fn decrypt_chunk(
        &mut self,
        env: &mut SecureEnv,
        addr: u64,
        body: usize,
        last: bool,
    ) -> LoaderResult<(u64, usize)> {
        let mut off = 0usize;
        if self.block_num == 0 {
            if body < SECURE_HDR_TOTAL_BYTE_SIZE {
                Err(LoaderError::SECURE_CHUNK_LEN_INVALID)?;
            }
            let key = self
                .key_slot
                .ok_or(LoaderError::CRYPTO_AES_KEY_NOT_LOADED)?;
            let mut sh = decrypt_secure_hdr(env, key, &self.iv, None, addr)?;
            self.load_secure_hdr(env, &mut sh)?;
            off = SECURE_HDR_TOTAL_BYTE_SIZE;
        }

        let data_len = self.next_block_len;
        if data_len == 0 {
            Err(LoaderError::SECURE_DATA_LEFT_FOR_DECRYPT)?;
        }
        let payload = data_len + if last { 0 } else { SECURE_HDR_BYTE_SIZE };
        if body - off != payload + GCM_TAG_BYTE_SIZE {
            cprintln!(
                "[secure] Block {} carries {} bytes, expected {}",
                self.block_num,
                body - off,
                payload + GCM_TAG_BYTE_SIZE
            );
            Err(LoaderError::SECURE_CHUNK_LEN_INVALID)?;
        }

        let data_addr = addr + off as u64;
        let iv = self.iv;
        decrypt_block(env, KeySlot::KeyUpdate, &iv, data_addr, payload)?;

        if last {
            self.next_block_len = 0;
        } else {
            let mut sh = SecureHeader::read_from(
                env.mem.slice(data_addr + data_len as u64, SECURE_HDR_BYTE_SIZE)?,
            )
            .ok_or(LoaderError::SECURE_CHUNK_LEN_INVALID)?;
            if sh.next_len == 0 {
                sh.zeroize();
                Err(LoaderError::SECURE_DATA_LEFT_FOR_DECRYPT)?;
            }
            self.load_secure_hdr(env, &mut sh)?;
        }
        Ok((data_addr, data_len))
    }

    /// Zeroes the chunk buffers and the block key, and on failure the
    /// destination bytes already committed.
    fn clear_buffers(&mut self, env: &mut SecureEnv, dst: Option<u64>) -> LoaderResult<()> {
        // Drain so the transfer cannot land after the clear
        let drained = match self.pending.take() {
            Some(addr) => env
                .device
                .copy(env.mem, 0, addr, 0, CopyMode::WaitForNonBlockingDone),
            None => Ok(()),
        };
        let slots = if env.chunk.is_double_buffered() {
            2 * env.chunk.slot_size()
        } else {
            env.chunk.slot_size()
        };
        let len = slots.max(AC_BYTE_SIZE as u64).min(env.chunk.region_size);
        let mut result = drained.and(env.mem.clear(env.chunk.base, len as usize));
        if let (Some(dst), true) = (dst, self.written > 0) {
            result = result.and(env.mem.clear(dst, self.written as usize));
        }
        result.and(env.keys.clear_key(KeySlot::KeyUpdate))
    }
}

/// Load one partition through the secure processing engine.
///
/// A partition that is neither authenticated, encrypted nor checksummed
/// is copied straight to its destination.
///
/// # Arguments
///
/// * `env` - Secure environment
/// * `req` - Partition to load
///
/// # Returns
///
/// * Number of bytes written to the destination
pub fn load_partition(env: &mut SecureEnv, req: &PartitionLoad) -> LoaderResult<u64> {
    let ph = req.ph;
    PolicyChecker::new(env.fuses).validate_partition(env.is_bh_auth(), ph)?;

    let mut params = SecureParams::new(ph)?;
    if !env.mem.is_valid_range(req.dst, params.remaining_data) {
        Err(LoaderError::MEMORY_OUT_OF_RANGE)?;
    }
    let src = req.base + word_bytes(ph.data_word_ofst);

    if !params.is_secure() {
        let len = params.remaining_data;
        env.device
            .copy(env.mem, src, req.dst, copy_len(len)?, CopyMode::Blocking)?;
        return Ok(len);
    }

    env.chunk.validate()?;
    let result = params
        .prepare(env, req)
        .and_then(|()| params.process(env, src, req.dst));

    match result {
        Ok(()) => {
            params.clear_buffers(env, None)?;
            Ok(params.written)
        }
        Err(err) => {
            cprintln!(
                "[secure] Partition 0x{:08x} failed at block {}: 0x{:08x}",
                ph.prtn_id,
                params.block_num,
                u32::from(err)
            );
            match params.clear_buffers(env, Some(req.dst)) {
                Ok(()) => Err(err.with_buffer_cleared()),
                Err(_) => Err(err.with_clear_failed()),
            }
        }
    }
}
