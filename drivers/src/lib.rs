/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the loader driver library.

--*/

mod aes_gcm;
pub mod boot_device;
mod crypto;
mod ecdsa;
mod fuse_bank;
mod key_vault;
pub mod memory;
pub mod memory_layout;
mod needs_kat;
pub mod printer;
mod puf;
mod rsa;
mod sha3;
pub mod wait;

pub use self::aes_gcm::{AesGcm, GcmTag};
pub use boot_device::{BootDevice, CopyMode};
pub use crypto::{CryptoAdapter, SoftCrypto};
pub use ecdsa::{EccCurve, EccPubKey, EccSignature, Ecdsa};
pub use fuse_bank::{
    FuseBank, PpkInvalid, SecCtrl, MAX_REVOCATION_ID, PPK_SLOT_COUNT, REVOCATION_ID_WORDS,
};
pub use key_vault::{KeySlot, KeyVault};
pub use memory::{MemoryRegion, SystemMemory};
pub use needs_kat::{KatStatus, NeedsKat};
pub use printer::{ErrorDisplay, HexBytes, Printer};
pub use puf::{Puf, PufHelperData};
pub use self::rsa::{Rsa, RsaPubKey};
pub use self::sha3::{Sha3, Sha3DigestOp};
pub use xloader_error::{LoaderError, LoaderResult};
