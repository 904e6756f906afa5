/*++

Licensed under the Apache-2.0 license.

File Name:

    policy.rs

Abstract:

    File contains the eFuse policy checks: PPK validity, revocation, IV
    anti-rollback, DPA counter-measure agreement and the secure boot mode
    rules for metaheaders and partitions.

--*/

use subtle::ConstantTimeEq;
use xloader_drivers::{cprintln, FuseBank, MAX_REVOCATION_ID, PPK_SLOT_COUNT, REVOCATION_ID_WORDS};
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::{ImageHeaderTable, KeySource, PartitionHeader, PPK_EFUSE_HASH_LEN};

/// Hardware root of trust modes derived from eFuses
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct HwRot {
    /// A PPK hash is programmed: authentication is compulsory
    pub asymmetric: bool,
    /// Decrypt-only is programmed: encryption is compulsory
    pub symmetric: bool,
}

pub struct PolicyChecker<'a> {
    fuses: &'a FuseBank,
}

impl<'a> PolicyChecker<'a> {
    pub fn new(fuses: &'a FuseBank) -> Self {
        Self { fuses }
    }

    /// Returns true if any PPK hash row is programmed
    pub fn check_non_zero_ppk(&self) -> bool {
        self.fuses
            .ppk_hash
            .iter()
            .any(|row| row.iter().any(|&b| b != 0))
    }

    pub fn hw_rot(&self) -> HwRot {
        HwRot {
            asymmetric: self.check_non_zero_ppk(),
            symmetric: self.fuses.is_dec_only(),
        }
    }

    /// Check a PPK hash against one eFuse slot.
    ///
    /// # Arguments
    ///
    /// * `slot` - PPK slot index
    /// * `hash` - Truncated SHA3-384 of the PPK from the certificate
    pub fn is_ppk_valid(&self, slot: usize, hash: &[u8]) -> LoaderResult<()> {
        if self.fuses.is_ppk_invalid(slot)? {
            Err(LoaderError::POLICY_PPK_INVALID_BIT_SET)?;
        }
        let row = self.fuses.ppk_hash(slot)?;
        if row.iter().all(|&b| b == 0) {
            Err(LoaderError::POLICY_PPK_HASH_ZERO)?;
        }
        let matches = hash
            .get(..PPK_EFUSE_HASH_LEN)
            .is_some_and(|hash| bool::from(row[..].ct_eq(hash)));
        if !matches {
            Err(LoaderError::POLICY_PPK_HASH_MISMATCH)?;
        }
        Ok(())
    }

    /// Selects the eFuse slot trusting a PPK.
    ///
    /// # Returns
    ///
    /// * Index of the first slot whose programmed hash matches `hash`
    pub fn select_ppk(&self, hash: &[u8]) -> LoaderResult<usize> {
        if self.fuses.all_ppk_invalid() {
            Err(LoaderError::POLICY_ALL_PPK_REVOKED)?;
        }
        let mut usable = false;
        for slot in 0..PPK_SLOT_COUNT {
            match self.is_ppk_valid(slot, hash) {
                Ok(()) => return Ok(slot),
                Err(LoaderError::POLICY_PPK_HASH_MISMATCH) => usable = true,
                Err(_) => {}
            }
        }
        if usable {
            Err(LoaderError::POLICY_PPK_HASH_MISMATCH)
        } else {
            Err(LoaderError::POLICY_ALL_PPK_INVALID)
        }
    }

    /// Check that `id` is in range and not revoked
    pub fn verify_revoke_id(&self, id: u32) -> LoaderResult<()> {
        if id > MAX_REVOCATION_ID {
            Err(LoaderError::POLICY_REVOKE_ID_OUT_OF_RANGE)?;
        }
        let mut all_revoked = true;
        for idx in 0..REVOCATION_ID_WORDS {
            all_revoked &= self.fuses.revocation_word(idx)? == u32::MAX;
        }
        if all_revoked {
            Err(LoaderError::POLICY_ALL_IDS_REVOKED)?;
        }
        let word = self.fuses.revocation_word((id / 32) as usize)?;
        if word & (1 << (id % 32)) != 0 {
            cprintln!("[policy] Revocation id {} is revoked", id);
            Err(LoaderError::POLICY_ID_REVOKED)?;
        }
        Ok(())
    }

    /// A header enabling DPA counter-measures must agree with the eFuse
    pub fn check_dpa_cm(&self, enabled: bool) -> LoaderResult<()> {
        if enabled == self.fuses.is_dpa_cm_disabled() {
            Err(LoaderError::POLICY_EFUSE_DPA_CM_MISMATCH)?;
        }
        Ok(())
    }

    fn check_auth_mode(&self, bh_auth: bool, authenticated: bool) -> LoaderResult<()> {
        let rot = self.hw_rot();
        if rot.asymmetric {
            if bh_auth {
                Err(LoaderError::POLICY_HWROT_BH_AUTH_NOT_ALLOWED)?;
            }
            if !authenticated {
                Err(LoaderError::POLICY_HWROT_EFUSE_AUTH_COMPULSORY)?;
            }
        } else if authenticated && !bh_auth {
            Err(LoaderError::POLICY_AUTH_EN_PPK_HASH_ZERO)?;
        }
        Ok(())
    }

    /// Secure boot mode rules for an image header table.
    ///
    /// # Arguments
    ///
    /// * `bh_auth` - Boot header authentication is in effect
    /// * `iht` - Validated image header table
    pub fn validate_metaheader(&self, bh_auth: bool, iht: &ImageHeaderTable) -> LoaderResult<()> {
        self.check_auth_mode(bh_auth, iht.is_authenticated())?;

        if self.fuses.is_dec_only() {
            if !iht.is_encrypted() {
                Err(LoaderError::POLICY_ENCONLY_ENC_COMPULSORY)?;
            }
            if iht.enc_key_src != KeySource::EFUSE_BLACK {
                Err(LoaderError::POLICY_ENC_ONLY_KEYSRC_ERR)?;
            }
            if iht.puf_hd_in_bh() {
                Err(LoaderError::POLICY_ENC_ONLY_PUFHD_LOC_ERR)?;
            }
            validate_iv_range(&iht.hdr_iv, &self.fuses.metaheader_iv)?;
        }
        if iht.is_encrypted() {
            self.check_dpa_cm(iht.is_dpa_cm_enabled())?;
        }
        Ok(())
    }

    /// Secure boot mode rules for a partition header
    pub fn validate_partition(&self, bh_auth: bool, ph: &PartitionHeader) -> LoaderResult<()> {
        self.check_auth_mode(bh_auth, ph.is_authenticated())?;

        if ph.checksum_type() != 0 && (ph.is_authenticated() || ph.is_encrypted()) {
            Err(LoaderError::SECURE_CHECKSUM_INVLD_WITH_AUTHDEC)?;
        }
        if self.fuses.is_dec_only() {
            if !ph.is_encrypted() {
                Err(LoaderError::POLICY_ENCONLY_ENC_COMPULSORY)?;
            }
            if KeySource::try_from(ph.enc_status)?.is_red_device_key() {
                Err(LoaderError::POLICY_PRTN_ENC_ONLY_KEYSRC)?;
            }
        }
        if ph.is_encrypted() {
            self.check_dpa_cm(ph.is_dpa_cm_enabled())?;
        }
        Ok(())
    }
}

/// Anti-rollback check of a 96-bit IV.
///
/// The first two words must equal the eFuse IV; the last word may only
/// grow.
///
/// # Arguments
///
/// * `header_iv` - IV words from the header
/// * `efuse_iv` - IV words programmed in eFuse
pub fn validate_iv_range(header_iv: &[u32; 3], efuse_iv: &[u32; 3]) -> LoaderResult<()> {
    if header_iv[..2] != efuse_iv[..2] || header_iv[2] < efuse_iv[2] {
        Err(LoaderError::POLICY_IV_RANGE)?;
    }
    Ok(())
}
