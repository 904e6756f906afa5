/*++

Licensed under the Apache-2.0 license.

File Name:

   lib.rs

Abstract:

    File contains data structures for the programmable device image (PDI).

--*/

#![cfg_attr(not(feature = "std"), no_std)]

mod auth;
mod ids;

pub use auth::*;
pub use ids::*;

use core::ops::Range;

use memoffset::{offset_of, span_of};
use xloader_error::{LoaderError, LoaderResult};
use zerocopy::{AsBytes, FromBytes};
use zeroize::Zeroize;

pub const WORD_LEN: usize = 4;
pub const SMAP_BUS_WIDTH_LEN: usize = 16;
pub const BH_WIDTH_DETECTION: u32 = 0xAA99_5566;
pub const BH_IMAGE_IDENT: u32 = 0x584C_4E58;
pub const BH_PUF_HD_LEN: usize = 1544;
pub const IHT_FPDI_IDENT: u32 = 0x4944_5046;
pub const IHT_PPDI_IDENT: u32 = 0x4944_5050;
pub const IHT_MIN_SECURE_VERSION: u32 = 0x0004_0000;
pub const IHT_MAX_IMGS: u32 = 32;
pub const IHT_MAX_PRTNS: u32 = 32;
pub const IHT_MAX_OPTIONAL_DATA_WORDS: u32 = 1024;
pub const IMG_NAME_LEN: usize = 16;
pub const SHA3_DIGEST_BYTE_SIZE: usize = 48;
pub const AES_KEY_BYTE_SIZE: usize = 32;
pub const AES_IV_BYTE_SIZE: usize = 12;
pub const GCM_TAG_BYTE_SIZE: usize = 16;
pub const SECURE_HDR_BYTE_SIZE: usize = 48;
pub const SECURE_HDR_TOTAL_BYTE_SIZE: usize = SECURE_HDR_BYTE_SIZE + GCM_TAG_BYTE_SIZE;
pub const MAX_HANDOFF_CPUS: usize = 10;
pub const INVALID_IMG_ID: u32 = 0;

pub const BOOT_HEADER_BYTE_SIZE: usize = core::mem::size_of::<BootHeader>();
pub const IHT_BYTE_SIZE: usize = core::mem::size_of::<ImageHeaderTable>();
pub const IH_BYTE_SIZE: usize = core::mem::size_of::<ImageHeader>();
pub const PH_BYTE_SIZE: usize = core::mem::size_of::<PartitionHeader>();

pub type AesKey = [u8; AES_KEY_BYTE_SIZE];
pub type AesIv = [u8; AES_IV_BYTE_SIZE];
pub type Sha3Digest = [u8; SHA3_DIGEST_BYTE_SIZE];

/// Boot header attribute: header authenticated by the boot header key
pub const BH_ATTR_AUTH_MASK: u32 = 0b11 << 14;
/// Boot header attribute: DPA counter-measure enable
pub const BH_ATTR_DPA_CM_MASK: u32 = 0b11 << 12;
/// Boot header attribute: PUF helper data stored in the boot header
pub const BH_ATTR_PUF_HD_MASK: u32 = 0b11 << 6;

pub const IHT_ATTR_BYPASS_SIREV: u32 = 1 << 0;
pub const IHT_ATTR_SBD_SHIFT: u32 = 6;
pub const IHT_ATTR_SBD_MASK: u32 = 0x3F << IHT_ATTR_SBD_SHIFT;
pub const IHT_ATTR_DPA_CM_MASK: u32 = 0b11 << 12;
pub const IHT_ATTR_PUF_HD_MASK: u32 = 0b11 << 14;
pub const IHT_ATTR_BYPASS_IDCODE: u32 = 1 << 16;

pub const IH_ATTR_DELAY_LOAD: u32 = 1 << 7;
pub const IH_ATTR_DELAY_HANDOFF: u32 = 1 << 8;

pub const PH_ATTR_DPA_CM_MASK: u32 = 0b11 << 23;
pub const PH_ATTR_PUF_HD_MASK: u32 = 0b11 << 16;
pub const PH_ATTR_CHECKSUM_SHIFT: u32 = 12;
pub const PH_ATTR_CHECKSUM_MASK: u32 = 0x7 << PH_ATTR_CHECKSUM_SHIFT;
pub const PH_ATTR_DSTN_CPU_SHIFT: u32 = 8;
pub const PH_ATTR_DSTN_CPU_MASK: u32 = 0xF << PH_ATTR_DSTN_CPU_SHIFT;
pub const PH_ATTR_DSTN_DEVICE_SHIFT: u32 = 4;
pub const PH_ATTR_DSTN_DEVICE_MASK: u32 = 0xF << PH_ATTR_DSTN_DEVICE_SHIFT;
pub const PH_ATTR_A32: u32 = 1 << 3;
pub const PH_ATTR_EL_SHIFT: u32 = 1;
pub const PH_ATTR_EL_MASK: u32 = 0b11 << PH_ATTR_EL_SHIFT;
pub const PH_ATTR_TZ: u32 = 1 << 0;

/// Computes the header checksum: bitwise NOT of the wrapping word sum.
///
/// # Arguments
///
/// * `bytes` - Covered bytes; a trailing partial word is ignored
pub fn header_checksum(bytes: &[u8]) -> u32 {
    !bytes
        .chunks_exact(WORD_LEN)
        .map(|w| u32::from_le_bytes([w[0], w[1], w[2], w[3]]))
        .fold(0u32, |acc, w| acc.wrapping_add(w))
}

/// Decodes a fixed-size header from the front of `bytes`, refusing short input.
pub fn read_header<T: FromBytes>(bytes: &[u8]) -> LoaderResult<T> {
    T::read_from_prefix(bytes).ok_or(LoaderError::PDI_HEADER_TRUNCATED)
}

/// Boot header of a full PDI
#[repr(C)]
#[derive(AsBytes, FromBytes, Debug, Clone, Copy, Eq, PartialEq, Zeroize)]
pub struct BootHeader {
    pub smap_bus_width: [u32; 4],
    pub width_detection: u32,
    pub image_ident: u32,
    /// Key source protecting the PLM, and therefore the metaheader
    pub enc_status: u32,
    pub data_prtn_ofst: u32,
    pub data_prtn_len: u32,
    pub total_data_prtn_len: u32,
    pub plm_len: u32,
    pub total_plm_len: u32,
    pub img_attrb: u32,
    pub black_key: [u32; 8],
    pub black_iv: [u32; 3],
    pub plm_sec_hdr_iv: [u32; 3],
    pub puf_shutter: u32,
    pub puf_chash: u32,
    pub puf_aux: u32,
    pub rsvd: [u32; 19],
    pub meta_hdr_ofst: u32,
    pub puf_hd: [u8; BH_PUF_HD_LEN],
    pub checksum: u32,
}

impl Default for BootHeader {
    fn default() -> Self {
        Self::new_zeroed()
    }
}

impl BootHeader {
    /// Returns the `Range<usize>` covered by the checksum
    pub fn checksum_range() -> Range<usize> {
        offset_of!(BootHeader, width_detection)..offset_of!(BootHeader, checksum)
    }

    pub fn calc_checksum(&self) -> u32 {
        header_checksum(&self.as_bytes()[Self::checksum_range()])
    }

    pub fn is_bh_auth(&self) -> bool {
        self.img_attrb & BH_ATTR_AUTH_MASK == BH_ATTR_AUTH_MASK
    }

    pub fn is_dpa_cm_enabled(&self) -> bool {
        self.img_attrb & BH_ATTR_DPA_CM_MASK == BH_ATTR_DPA_CM_MASK
    }

    pub fn black_key_bytes(&self) -> AesKey {
        let mut key = [0u8; AES_KEY_BYTE_SIZE];
        key.copy_from_slice(self.black_key.as_bytes());
        key
    }

    pub fn black_iv_bytes(&self) -> AesIv {
        iv_bytes(&self.black_iv)
    }
}

/// Image header table; the root directory of a PDI
#[repr(C)]
#[derive(AsBytes, FromBytes, Default, Debug, Clone, Copy, Eq, PartialEq, Zeroize)]
pub struct ImageHeaderTable {
    pub version: u32,
    pub no_of_imgs: u32,
    /// Word offset of the first image header
    pub img_hdr_addr: u32,
    pub no_of_prtns: u32,
    /// Word offset of the first partition header
    pub prtn_hdr_addr: u32,
    pub sbd_addr: u32,
    pub idcode: u32,
    pub attr: u32,
    pub pdi_id: u32,
    pub ident: u32,
    pub ext_idcode: u32,
    /// Length in words of the image and partition headers
    pub total_hdr_len: u32,
    pub hdr_iv: [u32; 3],
    pub enc_key_src: u32,
    /// Word offset of the metaheader certificate, zero when not authenticated
    pub ac_offset: u32,
    pub kek_iv: [u32; 3],
    pub optional_data_len: u32,
    pub rsvd: [u32; 10],
    pub checksum: u32,
}

impl ImageHeaderTable {
    pub fn checksum_range() -> Range<usize> {
        0..offset_of!(ImageHeaderTable, checksum)
    }

    pub fn calc_checksum(&self) -> u32 {
        header_checksum(&self.as_bytes()[Self::checksum_range()])
    }

    pub fn is_authenticated(&self) -> bool {
        self.ac_offset != 0
    }

    pub fn is_encrypted(&self) -> bool {
        self.enc_key_src != 0
    }

    pub fn sbd_mode(&self) -> u32 {
        (self.attr & IHT_ATTR_SBD_MASK) >> IHT_ATTR_SBD_SHIFT
    }

    pub fn is_dpa_cm_enabled(&self) -> bool {
        self.attr & IHT_ATTR_DPA_CM_MASK == IHT_ATTR_DPA_CM_MASK
    }

    pub fn puf_hd_in_bh(&self) -> bool {
        self.attr & IHT_ATTR_PUF_HD_MASK == IHT_ATTR_PUF_HD_MASK
    }

    pub fn hdr_iv_bytes(&self) -> AesIv {
        iv_bytes(&self.hdr_iv)
    }

    pub fn kek_iv_bytes(&self) -> AesIv {
        iv_bytes(&self.kek_iv)
    }
}

/// Image header
#[repr(C)]
#[derive(AsBytes, FromBytes, Default, Debug, Clone, Copy, Eq, PartialEq, Zeroize)]
pub struct ImageHeader {
    /// Index of the image's first partition header
    pub first_prtn_hdr: u32,
    pub no_of_prtns: u32,
    pub next_img_hdr: u32,
    pub rsvd: u32,
    pub img_attr: u32,
    pub img_name: [u8; IMG_NAME_LEN],
    pub img_id: u32,
    pub uid: u32,
    pub puid: u32,
    pub func_id: u32,
    pub copy_to_memory_addr_lo: u32,
    pub pcr_info: u32,
    pub checksum: u32,
}

impl ImageHeader {
    pub fn checksum_range() -> Range<usize> {
        0..offset_of!(ImageHeader, checksum)
    }

    pub fn calc_checksum(&self) -> u32 {
        header_checksum(&self.as_bytes()[Self::checksum_range()])
    }

    pub fn delay_load(&self) -> bool {
        self.img_attr & IH_ATTR_DELAY_LOAD != 0
    }

    pub fn delay_handoff(&self) -> bool {
        self.img_attr & IH_ATTR_DELAY_HANDOFF != 0
    }

    /// Image name up to the first NUL
    pub fn name(&self) -> &[u8] {
        let end = self
            .img_name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(IMG_NAME_LEN);
        &self.img_name[..end]
    }
}

/// Partition header
#[repr(C)]
#[derive(AsBytes, FromBytes, Default, Debug, Clone, Copy, Eq, PartialEq, Zeroize)]
pub struct PartitionHeader {
    pub enc_data_word_len: u32,
    pub unenc_data_word_len: u32,
    pub total_data_word_len: u32,
    pub next_prtn_ofst: u32,
    pub dst_exec_addr: u64,
    pub dst_load_addr: u64,
    pub data_word_ofst: u32,
    pub prtn_attr: u32,
    pub section_count: u32,
    pub checksum_word_ofst: u32,
    pub prtn_id: u32,
    pub auth_cert_word_ofst: u32,
    pub prtn_iv: [u32; 3],
    /// Key source of the partition, zero when not encrypted
    pub enc_status: u32,
    pub kek_iv: [u32; 3],
    pub enc_revoke_id: u32,
    pub rsvd: [u32; 9],
    pub checksum: u32,
}

impl PartitionHeader {
    pub fn checksum_range() -> Range<usize> {
        0..offset_of!(PartitionHeader, checksum)
    }

    /// Returns the `Range<usize>` holding the destination addresses
    pub fn dst_addr_range() -> Range<usize> {
        span_of!(PartitionHeader, dst_exec_addr..=dst_load_addr)
    }

    pub fn calc_checksum(&self) -> u32 {
        header_checksum(&self.as_bytes()[Self::checksum_range()])
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth_cert_word_ofst != 0
    }

    pub fn is_encrypted(&self) -> bool {
        self.enc_status != 0
    }

    pub fn checksum_type(&self) -> u32 {
        (self.prtn_attr & PH_ATTR_CHECKSUM_MASK) >> PH_ATTR_CHECKSUM_SHIFT
    }

    pub fn dstn_device(&self) -> PartitionDevice {
        PartitionDevice::from((self.prtn_attr & PH_ATTR_DSTN_DEVICE_MASK) >> PH_ATTR_DSTN_DEVICE_SHIFT)
    }

    pub fn dstn_cpu(&self) -> u32 {
        (self.prtn_attr & PH_ATTR_DSTN_CPU_MASK) >> PH_ATTR_DSTN_CPU_SHIFT
    }

    pub fn exception_level(&self) -> u32 {
        (self.prtn_attr & PH_ATTR_EL_MASK) >> PH_ATTR_EL_SHIFT
    }

    pub fn is_a32(&self) -> bool {
        self.prtn_attr & PH_ATTR_A32 != 0
    }

    pub fn is_trustzone(&self) -> bool {
        self.prtn_attr & PH_ATTR_TZ != 0
    }

    pub fn is_dpa_cm_enabled(&self) -> bool {
        self.prtn_attr & PH_ATTR_DPA_CM_MASK == PH_ATTR_DPA_CM_MASK
    }

    pub fn puf_hd_in_bh(&self) -> bool {
        self.prtn_attr & PH_ATTR_PUF_HD_MASK == PH_ATTR_PUF_HD_MASK
    }

    pub fn prtn_iv_bytes(&self) -> AesIv {
        iv_bytes(&self.prtn_iv)
    }

    pub fn kek_iv_bytes(&self) -> AesIv {
        iv_bytes(&self.kek_iv)
    }
}

/// Checksum algorithm selected by a partition header
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ChecksumType {
    None,
    Sha3,
}

impl ChecksumType {
    pub const SHA3_ENCODING: u32 = 3;
}

impl TryFrom<u32> for ChecksumType {
    type Error = LoaderError;

    fn try_from(val: u32) -> LoaderResult<Self> {
        match val {
            0 => Ok(ChecksumType::None),
            Self::SHA3_ENCODING => Ok(ChecksumType::Sha3),
            _ => Err(LoaderError::PDI_INVALID_CHECKSUM_TYPE),
        }
    }
}

/// Destination device of a partition
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PartitionDevice {
    None,
    Ps,
    Pl,
    Pmc,
    Other(u32),
}

impl From<u32> for PartitionDevice {
    fn from(val: u32) -> Self {
        match val {
            0 => PartitionDevice::None,
            1 => PartitionDevice::Ps,
            2 => PartitionDevice::Pl,
            3 => PartitionDevice::Pmc,
            other => PartitionDevice::Other(other),
        }
    }
}

impl From<PartitionDevice> for u32 {
    fn from(val: PartitionDevice) -> Self {
        match val {
            PartitionDevice::None => 0,
            PartitionDevice::Ps => 1,
            PartitionDevice::Pl => 2,
            PartitionDevice::Pmc => 3,
            PartitionDevice::Other(other) => other,
        }
    }
}

/// Plaintext of a secure header: key, IV and length of the next block
#[repr(C)]
#[derive(AsBytes, FromBytes, Default, Debug, Clone, Copy, Eq, PartialEq, Zeroize)]
pub struct SecureHeader {
    pub key: AesKey,
    pub iv: AesIv,
    /// Length in words of the next block, zero at the end of the chain
    pub next_len: u32,
}

/// One ATF hand-off entry
#[repr(C)]
#[derive(AsBytes, FromBytes, Default, Debug, Clone, Copy, Eq, PartialEq)]
pub struct AtfHandoffEntry {
    pub entry_point: u64,
    pub flags: u64,
}

impl AtfHandoffEntry {
    pub const FLAG_A32: u64 = 1 << 0;
    pub const FLAG_EL_SHIFT: u64 = 3;
    pub const FLAG_TZ: u64 = 1 << 5;
    pub const FLAG_CPU_SHIFT: u64 = 8;
}

/// ATF hand-off parameter table
#[repr(C)]
#[derive(AsBytes, FromBytes, Default, Debug, Clone, Copy, Eq, PartialEq)]
pub struct AtfHandoffParams {
    pub magic: [u8; 4],
    pub num_entries: u32,
    pub entries: [AtfHandoffEntry; MAX_HANDOFF_CPUS],
}

impl AtfHandoffParams {
    pub const MAGIC: [u8; 4] = *b"XLNX";
}

/// Wire form of one image info entry
#[repr(C)]
#[derive(AsBytes, FromBytes, Default, Debug, Clone, Copy, Eq, PartialEq)]
pub struct ImageInfoEntry {
    pub img_id: u32,
    pub uid: u32,
    pub puid: u32,
    pub func_id: u32,
}

/// IV bytes of three header words
pub fn iv_bytes(words: &[u32; 3]) -> AesIv {
    let mut iv = [0u8; AES_IV_BYTE_SIZE];
    iv.copy_from_slice(words.as_bytes());
    iv
}
