/*++

Licensed under the Apache-2.0 license.

File Name:

    metaheader.rs

Abstract:

    File contains the metaheader reader: the image header table and its
    optional data, the metaheader certificate, and the image and partition
    headers that follow, authenticated and decrypted when the table asks
    for it.

--*/

use crate::auth::data_auth;
use crate::env::{kat_gated, SecureEnv};
use crate::header::{
    read_image_header_table, read_image_headers, read_partition_headers,
    validate_image_partitions, DeviceIdentity,
};
use crate::key_select::resolve_key;
use crate::policy::PolicyChecker;
use crate::secure::{decrypt_block, decrypt_secure_hdr};
use xloader_drivers::memory_layout::{METAHDR_BUF_ORG, METAHDR_BUF_SIZE};
use xloader_drivers::{cprintln, CopyMode, KatStatus, KeySlot};
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::{
    AuthCertificate, ImageHeader, ImageHeaderTable, KeySource, PartitionHeader, AC_BYTE_SIZE,
    GCM_TAG_BYTE_SIZE, IHT_BYTE_SIZE, SECURE_HDR_TOTAL_BYTE_SIZE, SMAP_BUS_WIDTH_LEN, WORD_LEN,
};
use zerocopy::FromBytes;
use zeroize::Zeroize;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PdiKind {
    /// Boot PDI; its table sits at the boot header's metaheader offset
    Full,
    /// Table follows the SMAP width area
    Partial,
}

/// Validated metaheader of a PDI
#[derive(Debug, Clone)]
pub struct MetaHeader {
    pub kind: PdiKind,
    /// Media offset of the table relative to the PDI base
    pub iht_ofst: u64,
    pub iht: ImageHeaderTable,
    pub optional_data: Vec<u8>,
    pub img_hdrs: Vec<ImageHeader>,
    pub prtn_hdrs: Vec<PartitionHeader>,
    pub ac: Option<AuthCertificate>,
}

impl MetaHeader {
    /// Partition headers of image `idx`
    pub fn image_partitions(&self, idx: usize) -> &[PartitionHeader] {
        let Some(ih) = self.img_hdrs.get(idx) else {
            return &[];
        };
        let first = ih.first_prtn_hdr as usize;
        let end = first + ih.no_of_prtns as usize;
        self.prtn_hdrs.get(first..end).unwrap_or(&[])
    }
}

fn word_bytes(words: u32) -> u64 {
    u64::from(words) * WORD_LEN as u64
}

/// Reads the table and its optional data into the metaheader buffer.
fn read_iht(
    env: &mut SecureEnv,
    device_id: &DeviceIdentity,
    src: u64,
) -> LoaderResult<(ImageHeaderTable, Vec<u8>)> {
    env.device.copy(
        env.mem,
        src,
        METAHDR_BUF_ORG,
        IHT_BYTE_SIZE as u32,
        CopyMode::Blocking,
    )?;
    let iht = read_image_header_table(env.mem.slice_mut(METAHDR_BUF_ORG, IHT_BYTE_SIZE)?, device_id)?;

    let opt_len = word_bytes(iht.optional_data_len);
    if IHT_BYTE_SIZE as u64 + opt_len > METAHDR_BUF_SIZE {
        Err(LoaderError::PDI_OPTIONAL_DATA_LEN_INVALID)?;
    }
    let opt_addr = METAHDR_BUF_ORG + IHT_BYTE_SIZE as u64;
    if opt_len > 0 {
        env.device.copy(
            env.mem,
            src + IHT_BYTE_SIZE as u64,
            opt_addr,
            opt_len as u32,
            CopyMode::Blocking,
        )?;
    }
    let optional_data = env.mem.slice(opt_addr, opt_len as usize)?.to_vec();
    Ok((iht, optional_data))
}

/// Secure boot rules and the table signature
fn authenticate_iht(
    env: &mut SecureEnv,
    base: u64,
    kind: PdiKind,
    iht: &ImageHeaderTable,
    opt_len: usize,
) -> LoaderResult<Option<AuthCertificate>> {
    let bh_auth = env.is_bh_auth();
    PolicyChecker::new(env.fuses).validate_metaheader(bh_auth, iht)?;
    if kind == PdiKind::Full && iht.is_encrypted() && iht.enc_key_src != env.boot_header.enc_status {
        Err(LoaderError::POLICY_METAHDR_KEYSRC_MISMATCH)?;
    }
    if !iht.is_authenticated() {
        return Ok(None);
    }

    let scratch = env.chunk.base;
    env.device.copy(
        env.mem,
        base + word_bytes(iht.ac_offset),
        scratch,
        AC_BYTE_SIZE as u32,
        CopyMode::Blocking,
    )?;
    let ac = AuthCertificate::read_from(env.mem.slice(scratch, AC_BYTE_SIZE)?)
        .ok_or(LoaderError::PDI_HEADER_TRUNCATED)?;
    let digest = kat_gated(env.crypto, KatStatus::SHA3)?
        .sha3_digest(&[env.mem.slice(METAHDR_BUF_ORG, IHT_BYTE_SIZE + opt_len)?])?;
    data_auth(
        env.crypto,
        env.fuses,
        bh_auth,
        &ac,
        &digest,
        &ac.header_signature,
        LoaderError::SECURE_HDR_AUTH_FAIL,
    )?;
    Ok(Some(ac))
}

/// Reads the image and partition headers, authenticating and decrypting
/// them in the first chunk buffer.
fn read_secure_hdrs(
    env: &mut SecureEnv,
    base: u64,
    iht: &ImageHeaderTable,
    ac: Option<&AuthCertificate>,
    opt_len: usize,
) -> LoaderResult<(Vec<ImageHeader>, Vec<PartitionHeader>)> {
    let len = word_bytes(iht.total_hdr_len);
    if len > env.chunk.slot_size() {
        Err(LoaderError::SECURE_METAHDR_LEN_OVERFLOW)?;
    }
    let addr = env.chunk.slot(0);
    env.device.copy(
        env.mem,
        base + word_bytes(iht.img_hdr_addr),
        addr,
        len as u32,
        CopyMode::Blocking,
    )?;
    let mut len = len as usize;

    if let Some(ac) = ac {
        let digest = kat_gated(env.crypto, KatStatus::SHA3)?
            .sha3_digest(&[ac.signed_bytes(), env.mem.slice(addr, len)?])?;
        data_auth(
            env.crypto,
            env.fuses,
            env.boot_header.is_bh_auth(),
            ac,
            &digest,
            &ac.partition_signature,
            LoaderError::SECURE_HDR_AUTH_FAIL,
        )?;
    }

    let mut hdr_addr = addr;
    if iht.is_encrypted() {
        let src = KeySource::try_from(iht.enc_key_src)?;
        let key = resolve_key(env, src, &iht.kek_iv_bytes(), iht.puf_hd_in_bh())?;
        let aad = (METAHDR_BUF_ORG, IHT_BYTE_SIZE + opt_len);
        let mut sh = decrypt_secure_hdr(env, key, &iht.hdr_iv_bytes(), Some(aad), addr)?;
        let data_len = word_bytes(sh.next_len) as usize;
        let key_written = env.keys.write_key(KeySlot::KeyUpdate, &sh.key);
        let iv = sh.iv;
        sh.zeroize();
        key_written?;
        if data_len % 16 != 0 {
            Err(LoaderError::SECURE_ENC_DATA_NOT_ALIGNED)?;
        }
        if len != SECURE_HDR_TOTAL_BYTE_SIZE + data_len + GCM_TAG_BYTE_SIZE {
            Err(LoaderError::SECURE_CHUNK_LEN_INVALID)?;
        }
        hdr_addr = addr + SECURE_HDR_TOTAL_BYTE_SIZE as u64;
        decrypt_block(env, KeySlot::KeyUpdate, &iv, hdr_addr, data_len)?;
        len = data_len;
    }

    let prtn_ofst = iht
        .prtn_hdr_addr
        .checked_sub(iht.img_hdr_addr)
        .map(word_bytes)
        .ok_or(LoaderError::PDI_HEADER_TRUNCATED)? as usize;
    if prtn_ofst > len {
        Err(LoaderError::PDI_HEADER_TRUNCATED)?;
    }
    let region = env.mem.slice_mut(hdr_addr, len)?;
    let (img_region, prtn_region) = region.split_at_mut(prtn_ofst);
    let img_hdrs = read_image_headers(img_region, iht.no_of_imgs)?;
    let prtn_hdrs = read_partition_headers(prtn_region, iht.no_of_prtns)?;
    validate_image_partitions(iht, &img_hdrs, &prtn_hdrs)?;
    Ok((img_hdrs, prtn_hdrs))
}

fn clear_hdr_buffers(env: &mut SecureEnv) -> LoaderResult<()> {
    let len = env.chunk.slot_size().max(AC_BYTE_SIZE as u64).min(env.chunk.region_size);
    env.mem
        .clear(env.chunk.base, len as usize)
        .and(env.keys.clear_key(KeySlot::KeyUpdate))
}

/// Zeroes the chunk buffer after use, and the table buffer as well when
/// `result` is a failure.
fn with_cleared<T>(env: &mut SecureEnv, result: LoaderResult<T>) -> LoaderResult<T> {
    let mut cleared = clear_hdr_buffers(env);
    if result.is_err() {
        cleared = cleared.and(env.mem.clear(METAHDR_BUF_ORG, METAHDR_BUF_SIZE as usize));
    }
    match (result, cleared) {
        (Ok(val), Ok(())) => Ok(val),
        (Ok(_), Err(err)) => Err(err),
        (Err(err), Ok(())) => Err(err.with_buffer_cleared()),
        (Err(err), Err(_)) => Err(err.with_clear_failed()),
    }
}

/// Read and validate the metaheader of a PDI.
///
/// # Arguments
///
/// * `env` - Secure environment; for a full PDI its boot header is the
///   PDI's own
/// * `device_id` - Identity the table must target
/// * `base` - Media offset of the PDI
/// * `kind` - Full or partial PDI
pub fn read_metaheader(
    env: &mut SecureEnv,
    device_id: &DeviceIdentity,
    base: u64,
    kind: PdiKind,
) -> LoaderResult<MetaHeader> {
    env.chunk.validate()?;
    let iht_ofst = match kind {
        PdiKind::Full => u64::from(env.boot_header.meta_hdr_ofst),
        PdiKind::Partial => SMAP_BUS_WIDTH_LEN as u64,
    };
    let (iht, optional_data) = read_iht(env, device_id, base + iht_ofst)?;
    let opt_len = optional_data.len();

    let ac = authenticate_iht(env, base, kind, &iht, opt_len);
    let ac = with_cleared(env, ac)?;

    let hdrs = read_secure_hdrs(env, base, &iht, ac.as_ref(), opt_len);
    let (img_hdrs, prtn_hdrs) = with_cleared(env, hdrs)?;

    cprintln!(
        "[pdi] Metaheader 0x{:08x}: {} images, {} partitions",
        iht.pdi_id,
        iht.no_of_imgs,
        iht.no_of_prtns
    );
    Ok(MetaHeader {
        kind,
        iht_ofst,
        iht,
        optional_data,
        img_hdrs,
        prtn_hdrs,
        ac,
    })
}
