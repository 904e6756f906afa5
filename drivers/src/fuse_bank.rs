/*++

Licensed under the Apache-2.0 license.

File Name:

    fuse_bank.rs

Abstract:

    File contains API for the eFuse bank consulted by the loader's
    security policy.

--*/

use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::{BH_PUF_HD_LEN, PPK_EFUSE_HASH_LEN};

pub const PPK_SLOT_COUNT: usize = 3;
pub const REVOCATION_ID_WORDS: usize = 8;
pub const MAX_REVOCATION_ID: u32 = (REVOCATION_ID_WORDS as u32 * 32) - 1;

bitflags::bitflags! {
    /// Security control eFuses
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct SecCtrl : u32 {
        /// Authenticated JTAG is disabled
        const AUTH_JTAG_DIS = 1 << 0;
        /// Every image must be encrypted with the eFuse black key
        const DEC_ONLY = 1 << 1;
        /// AES DPA counter-measures are disabled
        const DPA_CM_DIS = 1 << 2;
        /// Authenticated JTAG failures lock the port
        const AUTH_JTAG_LOCK_DIS = 1 << 3;
    }
}

bitflags::bitflags! {
    /// Per-slot PPK invalidation eFuses
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct PpkInvalid : u32 {
        const PPK0 = 1 << 0;
        const PPK1 = 1 << 1;
        const PPK2 = 1 << 2;
    }
}

impl PpkInvalid {
    pub fn slot(slot: usize) -> LoaderResult<Self> {
        match slot {
            0 => Ok(PpkInvalid::PPK0),
            1 => Ok(PpkInvalid::PPK1),
            2 => Ok(PpkInvalid::PPK2),
            _ => Err(LoaderError::POLICY_PPK_SLOT_INVALID),
        }
    }
}

/// eFuse contents relevant to secure loading
#[derive(Debug, Clone)]
pub struct FuseBank {
    pub ppk_hash: [[u8; PPK_EFUSE_HASH_LEN]; PPK_SLOT_COUNT],
    pub ppk_invalid: PpkInvalid,
    pub revoke_id: [u32; REVOCATION_ID_WORDS],
    pub sec_ctrl: SecCtrl,
    /// IV anchoring encrypt-only metaheaders
    pub metaheader_iv: [u32; 3],
    pub puf_hd: [u8; BH_PUF_HD_LEN],
    pub puf_chash: u32,
    pub puf_aux: u32,
    pub dna: [u32; 4],
}

impl Default for FuseBank {
    fn default() -> Self {
        Self {
            ppk_hash: [[0u8; PPK_EFUSE_HASH_LEN]; PPK_SLOT_COUNT],
            ppk_invalid: PpkInvalid::empty(),
            revoke_id: [0u32; REVOCATION_ID_WORDS],
            sec_ctrl: SecCtrl::empty(),
            metaheader_iv: [0u32; 3],
            puf_hd: [0u8; BH_PUF_HD_LEN],
            puf_chash: 0,
            puf_aux: 0,
            dna: [0u32; 4],
        }
    }
}

impl FuseBank {
    /// Get the programmed hash of a PPK slot.
    ///
    /// # Arguments
    ///
    /// * `slot` - PPK slot index
    ///
    /// # Returns
    ///
    /// * PPK hash eFuse row
    pub fn ppk_hash(&self, slot: usize) -> LoaderResult<&[u8; PPK_EFUSE_HASH_LEN]> {
        self.ppk_hash
            .get(slot)
            .ok_or(LoaderError::POLICY_PPK_SLOT_INVALID)
    }

    pub fn is_ppk_invalid(&self, slot: usize) -> LoaderResult<bool> {
        Ok(self.ppk_invalid.contains(PpkInvalid::slot(slot)?))
    }

    /// Returns true if every PPK slot carries its invalid bit
    pub fn all_ppk_invalid(&self) -> bool {
        self.ppk_invalid.is_all()
    }

    /// Get a 32-bit word of the revocation bitmap
    pub fn revocation_word(&self, idx: usize) -> LoaderResult<u32> {
        self.revoke_id
            .get(idx)
            .copied()
            .ok_or(LoaderError::POLICY_REVOKE_ID_OUT_OF_RANGE)
    }

    /// Programs the revocation bit of `id`
    pub fn revoke(&mut self, id: u32) -> LoaderResult<()> {
        if id > MAX_REVOCATION_ID {
            Err(LoaderError::POLICY_REVOKE_ID_OUT_OF_RANGE)?;
        }
        self.revoke_id[(id / 32) as usize] |= 1 << (id % 32);
        Ok(())
    }

    pub fn is_dec_only(&self) -> bool {
        self.sec_ctrl.contains(SecCtrl::DEC_ONLY)
    }

    pub fn is_dpa_cm_disabled(&self) -> bool {
        self.sec_ctrl.contains(SecCtrl::DPA_CM_DIS)
    }

    pub fn is_auth_jtag_disabled(&self) -> bool {
        self.sec_ctrl.contains(SecCtrl::AUTH_JTAG_DIS)
    }

    pub fn is_auth_jtag_lock_enabled(&self) -> bool {
        self.sec_ctrl.contains(SecCtrl::AUTH_JTAG_LOCK_DIS)
    }
}
