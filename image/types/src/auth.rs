/*++

Licensed under the Apache-2.0 license.

File Name:

   auth.rs

Abstract:

    File contains the authentication certificate and authenticated JTAG
    message layouts.

--*/

use core::ops::Range;

use memoffset::{offset_of, span_of};
use xloader_error::{LoaderError, LoaderResult};
use zerocopy::{AsBytes, FromBytes};
use zeroize::Zeroize;

pub const AC_USER_DATA_LEN: usize = 56;
pub const AC_KEY_SLOT_LEN: usize = 1040;
pub const AC_SIGNATURE_LEN: usize = 512;
pub const AC_BYTE_SIZE: usize = core::mem::size_of::<AuthCertificate>();
pub const PPK_EFUSE_HASH_LEN: usize = 32;
pub const RSA_4096_BYTE_SIZE: usize = 512;
pub const ECC_P384_BYTE_SIZE: usize = 48;
pub const ECC_P521_BYTE_SIZE: usize = 66;
pub const AUTH_JTAG_MSG_BYTE_SIZE: usize = core::mem::size_of::<AuthJtagMessage>();

/// Signature algorithm carried in bits [7:4] of the authentication header
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum AuthAlgorithm {
    EcdsaP384,
    Rsa4096,
    EcdsaP521,
}

impl AuthAlgorithm {
    const SHIFT: u32 = 4;
    const MASK: u32 = 0xF << Self::SHIFT;

    /// Decodes the algorithm from an authentication header word
    pub fn from_auth_hdr(auth_hdr: u32) -> LoaderResult<Self> {
        match (auth_hdr & Self::MASK) >> Self::SHIFT {
            0 => Ok(AuthAlgorithm::EcdsaP384),
            1 => Ok(AuthAlgorithm::Rsa4096),
            2 => Ok(AuthAlgorithm::EcdsaP521),
            _ => Err(LoaderError::SECURE_INVALID_AUTH_ALGO),
        }
    }

    /// Encodes the algorithm into an authentication header word
    pub fn auth_hdr(self) -> u32 {
        let val = match self {
            AuthAlgorithm::EcdsaP384 => 0,
            AuthAlgorithm::Rsa4096 => 1,
            AuthAlgorithm::EcdsaP521 => 2,
        };
        val << Self::SHIFT
    }

    /// Byte length of one ECDSA coordinate or scalar
    pub fn ecc_len(self) -> Option<usize> {
        match self {
            AuthAlgorithm::EcdsaP384 => Some(ECC_P384_BYTE_SIZE),
            AuthAlgorithm::EcdsaP521 => Some(ECC_P521_BYTE_SIZE),
            AuthAlgorithm::Rsa4096 => None,
        }
    }
}

/// Authentication certificate
///
/// Key slots hold either an RSA key (`modulus | modulus_ext | exponent`) or a
/// big-endian ECDSA point (`x | y`) at the front of the slot.
#[repr(C)]
#[derive(AsBytes, FromBytes, Debug, Clone, Copy, Eq, PartialEq, Zeroize)]
pub struct AuthCertificate {
    pub auth_hdr: u32,
    pub spk_id: u32,
    pub user_data: [u8; AC_USER_DATA_LEN],
    pub ppk: [u8; AC_KEY_SLOT_LEN],
    pub spk: [u8; AC_KEY_SLOT_LEN],
    pub spk_signature: [u8; AC_SIGNATURE_LEN],
    pub header_signature: [u8; AC_SIGNATURE_LEN],
    pub partition_signature: [u8; AC_SIGNATURE_LEN],
}

impl Default for AuthCertificate {
    fn default() -> Self {
        Self::new_zeroed()
    }
}

impl AuthCertificate {
    /// Returns the `Range<usize>` covered by the partition hash
    pub fn signed_range() -> Range<usize> {
        0..offset_of!(AuthCertificate, partition_signature)
    }

    /// Returns the `Range<usize>` of the SPK header fields signed with the SPK
    pub fn spk_hdr_range() -> Range<usize> {
        span_of!(AuthCertificate, auth_hdr..=spk_id)
    }

    pub fn algorithm(&self) -> LoaderResult<AuthAlgorithm> {
        AuthAlgorithm::from_auth_hdr(self.auth_hdr)
    }

    /// Bytes signed alongside the first block of partition data
    pub fn signed_bytes(&self) -> &[u8] {
        &self.as_bytes()[Self::signed_range()]
    }

    pub fn spk_hdr_bytes(&self) -> &[u8] {
        &self.as_bytes()[Self::spk_hdr_range()]
    }
}

/// RSA-4096 public key slot
#[repr(C)]
#[derive(AsBytes, FromBytes, Debug, Clone, Copy, Eq, PartialEq)]
pub struct RsaKeySlot {
    pub modulus: [u8; RSA_4096_BYTE_SIZE],
    pub modulus_ext: [u8; RSA_4096_BYTE_SIZE],
    pub exponent: u32,
    pub pad: [u32; 3],
}

/// Signed request to open the debug port
#[repr(C)]
#[derive(AsBytes, FromBytes, Debug, Clone, Copy, Eq, PartialEq, Zeroize)]
pub struct AuthJtagMessage {
    pub auth_hdr: u32,
    /// Revocation id in the low byte
    pub revoke_id_msg_type: u32,
    pub attrb: u32,
    pub dna: [u32; 4],
    /// Number of poll intervals JTAG stays enabled, zero selects the default
    pub jtag_enable_timeout: u32,
    pub rsvd: [u32; 5],
    pub ppk: [u8; AC_KEY_SLOT_LEN],
    pub enable_jtag_signature: [u8; AC_SIGNATURE_LEN],
}

impl Default for AuthJtagMessage {
    fn default() -> Self {
        Self::new_zeroed()
    }
}

impl AuthJtagMessage {
    pub const ATTR_DNA_CHECK: u32 = 1 << 0;
    pub const REVOKE_ID_MASK: u32 = 0xFF;

    /// Returns the `Range<usize>` of the signed authentication header
    pub fn signed_range() -> Range<usize> {
        0..offset_of!(AuthJtagMessage, ppk)
    }

    pub fn signed_bytes(&self) -> &[u8] {
        &self.as_bytes()[Self::signed_range()]
    }

    pub fn revoke_id(&self) -> u32 {
        self.revoke_id_msg_type & Self::REVOKE_ID_MASK
    }

    pub fn dna_check(&self) -> bool {
        self.attrb & Self::ATTR_DNA_CHECK != 0
    }
}
