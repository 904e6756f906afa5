/*++

Licensed under the Apache-2.0 license.

File Name:

   partition.rs

Abstract:

    File contains the partition encoder: splits partition data into
    secure chunks, encrypts it along a secure header key chain and links
    the chunks with a hash chain.

--*/

use crate::{ecc_key_slot, AuthConfig, EncryptionConfig, PdiGeneratorCrypto};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use xloader_image_types::*;
use zerocopy::AsBytes;

/// Media form of one partition
#[derive(Clone, Debug)]
pub struct EncodedPartition {
    /// Chunks as they appear on the boot device
    pub media: Vec<u8>,
    /// Chunk bodies without their hash-chain entries
    pub enc_len: usize,
    /// Plaintext length, padded
    pub unenc_len: usize,
    pub ac: Option<AuthCertificate>,
    /// Expected hash of the first chunk for checksum-only partitions
    pub checksum: Option<Sha3Digest>,
}

/// Certificate with both keys and the SPK signature filled in
pub(crate) fn certificate<C: PdiGeneratorCrypto>(
    crypto: &C,
    auth: &AuthConfig,
) -> anyhow::Result<AuthCertificate> {
    let mut ac = AuthCertificate {
        auth_hdr: AuthAlgorithm::EcdsaP384.auth_hdr(),
        spk_id: auth.spk_id,
        ..Default::default()
    };
    ac.ppk = ecc_key_slot(crypto, &auth.ppk)?;
    ac.spk = ecc_key_slot(crypto, &auth.spk)?;
    let digest = crypto.sha3_digest(&[ac.spk_hdr_bytes(), &ac.spk])?;
    let sig = crypto.ecdsa384_sign(&digest, &auth.ppk)?;
    ac.spk_signature[..sig.len()].copy_from_slice(&sig);
    Ok(ac)
}

/// Sign `data` with the certificate's SPK into its partition signature
pub(crate) fn sign_partition<C: PdiGeneratorCrypto>(
    crypto: &C,
    auth: &AuthConfig,
    ac: &mut AuthCertificate,
    data: &[u8],
) -> anyhow::Result<()> {
    let digest = crypto.sha3_digest(&[ac.signed_bytes(), data])?;
    let sig = crypto.ecdsa384_sign(&digest, &auth.spk)?;
    ac.partition_signature[..sig.len()].copy_from_slice(&sig);
    Ok(())
}

/// Encrypted first secure header: `ciphertext | tag`
pub(crate) fn secure_hdr0<C: PdiGeneratorCrypto>(
    crypto: &C,
    enc: &EncryptionConfig,
    aad: &[u8],
    next: &SecureHeader,
) -> anyhow::Result<Vec<u8>> {
    let mut out = next.as_bytes().to_vec();
    let tag = crypto.aes_gcm_encrypt(&enc.key, &iv_bytes(&enc.iv), aad, &mut out)?;
    out.extend_from_slice(&tag);
    Ok(out)
}

fn split(data: &[u8], piece: usize, last_max: usize) -> Vec<&[u8]> {
    let mut pieces = Vec::new();
    let mut rest = data;
    while rest.len() > last_max {
        let (head, tail) = rest.split_at(piece);
        pieces.push(head);
        rest = tail;
    }
    pieces.push(rest);
    pieces
}

fn pad(data: &[u8], align: usize) -> Vec<u8> {
    let mut out = data.to_vec();
    out.resize(data.len().div_ceil(align).max(1) * align, 0);
    out
}

/// Encrypt `pieces` along a key chain starting from the key source key.
fn encrypt_pieces<C: PdiGeneratorCrypto>(
    crypto: &C,
    enc: &EncryptionConfig,
    pieces: &[&[u8]],
) -> anyhow::Result<Vec<Vec<u8>>> {
    let mut rng = StdRng::seed_from_u64(enc.seed);
    let hdrs: Vec<SecureHeader> = pieces
        .iter()
        .map(|piece| {
            let mut sh = SecureHeader {
                next_len: (piece.len() / WORD_LEN) as u32,
                ..Default::default()
            };
            rng.fill(&mut sh.key);
            rng.fill(&mut sh.iv);
            sh
        })
        .collect();

    let mut bodies = Vec::with_capacity(pieces.len());
    for (idx, piece) in pieces.iter().enumerate() {
        let mut body = if idx == 0 {
            secure_hdr0(crypto, enc, &[], &hdrs[0])?
        } else {
            Vec::new()
        };
        let mut block = piece.to_vec();
        if let Some(next) = hdrs.get(idx + 1) {
            block.extend_from_slice(next.as_bytes());
        }
        let tag = crypto.aes_gcm_encrypt(&hdrs[idx].key, &hdrs[idx].iv, &[], &mut block)?;
        body.extend_from_slice(&block);
        body.extend_from_slice(&tag);
        bodies.push(body);
    }
    Ok(bodies)
}

/// Encode partition data for a loader configured with `chunk_size`.
///
/// # Arguments
///
/// * `crypto` - Generator crypto
/// * `data` - Partition plaintext
/// * `auth` - Certificate keys when the partition is authenticated
/// * `enc` - Encryption settings when the partition is encrypted
/// * `checksum` - Protect the partition with a SHA3 checksum
/// * `chunk_size` - Secure chunk size of the loader
pub fn encode_partition<C: PdiGeneratorCrypto>(
    crypto: &C,
    data: &[u8],
    auth: Option<&AuthConfig>,
    enc: Option<&EncryptionConfig>,
    checksum: bool,
    chunk_size: usize,
) -> anyhow::Result<EncodedPartition> {
    let hashed = auth.is_some() || checksum;
    let hash_len = if hashed { SHA3_DIGEST_BYTE_SIZE } else { 0 };
    if chunk_size % 64 != 0 || chunk_size < 4 * SECURE_HDR_TOTAL_BYTE_SIZE {
        anyhow::bail!("Unsupported chunk size 0x{:x}", chunk_size);
    }

    let (bodies, unenc_len) = match enc {
        Some(enc) => {
            let data = pad(data, 16);
            let piece = chunk_size - SECURE_HDR_TOTAL_BYTE_SIZE - hash_len;
            let pieces = split(&data, piece, piece);
            (encrypt_pieces(crypto, enc, &pieces)?, data.len())
        }
        None if hashed => {
            let data = pad(data, WORD_LEN);
            let pieces = split(&data, chunk_size - hash_len, chunk_size);
            (pieces.iter().map(|p| p.to_vec()).collect(), data.len())
        }
        None => {
            let data = pad(data, WORD_LEN);
            let len = data.len();
            (vec![data], len)
        }
    };
    let enc_len = bodies.iter().map(Vec::len).sum();

    // Chain from the back: every chunk but the last ends with the hash
    // of its successor
    let mut chunks: Vec<Vec<u8>> = Vec::with_capacity(bodies.len());
    for body in bodies.into_iter().rev() {
        let mut chunk = body;
        if let (true, Some(next)) = (hashed, chunks.last()) {
            chunk.extend_from_slice(&crypto.sha3_digest(&[next])?);
        }
        chunks.push(chunk);
    }
    chunks.reverse();

    let ac = match auth {
        Some(auth) => {
            let mut ac = certificate(crypto, auth)?;
            sign_partition(crypto, auth, &mut ac, &chunks[0])?;
            Some(ac)
        }
        None => None,
    };
    let checksum = if checksum && auth.is_none() {
        Some(crypto.sha3_digest(&[&chunks[0]])?)
    } else {
        None
    };

    Ok(EncodedPartition {
        media: chunks.concat(),
        enc_len,
        unenc_len,
        ac,
        checksum,
    })
}
