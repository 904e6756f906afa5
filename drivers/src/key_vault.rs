/*++

Licensed under the Apache-2.0 license.

File Name:

    key_vault.rs

Abstract:

    File contains API for the AES key registers.

--*/

use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::{AesKey, KeySource};
use zeroize::Zeroize;

/// AES key register
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySlot {
    /// Device key in eFuse
    Efuse,
    /// Device key in battery-backed RAM
    Bbram,
    EfuseUser0,
    EfuseUser1,
    /// Volatile user keys 0..7
    User(u8),
    /// Red key produced by unwrapping a black key source
    Decrypted(u8),
    /// Key carried by the previous secure header
    KeyUpdate,
    /// PUF-derived key-encrypting key
    PufKek,
}

const USER_KEY_COUNT: usize = 8;
const DEC_KEY_COUNT: usize = 5;
const SLOT_COUNT: usize = 4 + USER_KEY_COUNT + DEC_KEY_COUNT + 2;

impl KeySlot {
    fn index(self) -> LoaderResult<usize> {
        let idx = match self {
            KeySlot::Efuse => 0,
            KeySlot::Bbram => 1,
            KeySlot::EfuseUser0 => 2,
            KeySlot::EfuseUser1 => 3,
            KeySlot::User(n) if usize::from(n) < USER_KEY_COUNT => 4 + usize::from(n),
            KeySlot::Decrypted(n) if usize::from(n) < DEC_KEY_COUNT => {
                4 + USER_KEY_COUNT + usize::from(n)
            }
            KeySlot::KeyUpdate => SLOT_COUNT - 2,
            KeySlot::PufKek => SLOT_COUNT - 1,
            _ => Err(LoaderError::CRYPTO_AES_INVALID_KEY_SLOT)?,
        };
        Ok(idx)
    }

    /// Register holding the red key for a key source
    pub fn for_source(src: KeySource) -> Self {
        match src {
            KeySource::EfuseRed => KeySlot::Efuse,
            KeySource::BbramRed => KeySlot::Bbram,
            KeySource::EfuseUser0Red => KeySlot::EfuseUser0,
            KeySource::EfuseUser1Red => KeySlot::EfuseUser1,
            KeySource::User(n) => KeySlot::User(n),
            KeySource::EfuseBlack => KeySlot::Decrypted(0),
            KeySource::BbramBlack => KeySlot::Decrypted(1),
            KeySource::BootHeaderBlack => KeySlot::Decrypted(2),
            KeySource::EfuseUser0Black => KeySlot::Decrypted(3),
            KeySource::EfuseUser1Black => KeySlot::Decrypted(4),
        }
    }

    /// Register holding the wrapped form of a black key source
    pub fn black_source(src: KeySource) -> Option<Self> {
        match src {
            KeySource::EfuseBlack => Some(KeySlot::Efuse),
            KeySource::BbramBlack => Some(KeySlot::Bbram),
            KeySource::EfuseUser0Black => Some(KeySlot::EfuseUser0),
            KeySource::EfuseUser1Black => Some(KeySlot::EfuseUser1),
            _ => None,
        }
    }
}

/// AES key registers; contents are zeroized on clear and on drop
#[derive(Default)]
pub struct KeyVault {
    slots: [Option<AesKey>; SLOT_COUNT],
}

impl KeyVault {
    /// Write a key register.
    ///
    /// # Arguments
    ///
    /// * `slot` - Key register
    /// * `key` - Key value
    pub fn write_key(&mut self, slot: KeySlot, key: &AesKey) -> LoaderResult<()> {
        let idx = slot.index()?;
        self.clear_index(idx);
        self.slots[idx] = Some(*key);
        Ok(())
    }

    /// Read a key register.
    ///
    /// # Returns
    ///
    /// * `LoaderError::CRYPTO_AES_KEY_NOT_LOADED` for an empty register
    pub fn key(&self, slot: KeySlot) -> LoaderResult<&AesKey> {
        self.slots[slot.index()?]
            .as_ref()
            .ok_or(LoaderError::CRYPTO_AES_KEY_NOT_LOADED)
    }

    pub fn is_loaded(&self, slot: KeySlot) -> bool {
        matches!(slot.index(), Ok(idx) if self.slots[idx].is_some())
    }

    pub fn clear_key(&mut self, slot: KeySlot) -> LoaderResult<()> {
        let idx = slot.index()?;
        self.clear_index(idx);
        Ok(())
    }

    fn clear_index(&mut self, idx: usize) {
        if let Some(key) = self.slots[idx].as_mut() {
            key.zeroize();
        }
        self.slots[idx] = None;
    }
}

impl Drop for KeyVault {
    fn drop(&mut self) {
        for idx in 0..SLOT_COUNT {
            self.clear_index(idx);
        }
    }
}
