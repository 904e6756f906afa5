/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains API and macros used by the loader for error handling.

--*/
#![cfg_attr(not(feature = "std"), no_std)]
use core::convert::From;
use core::num::{NonZeroU32, TryFromIntError};

/// Loader Error Type
///
/// The low 30 bits carry the error code. The two upper bits record what
/// happened to memory the failing operation had touched.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LoaderError(pub NonZeroU32);

/// Outcome of the mandatory buffer clear on a failure path
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferState {
    /// Failure did not touch secret-bearing memory
    Untouched,

    /// Memory was zeroed and the zeroization verified
    Cleared,

    /// Zeroization itself failed; residual data may remain
    ClearFailed,
}

/// Macro to define error constants ensuring uniqueness
///
/// This macro takes a list of (name, value, doc) tuples and generates
/// constant definitions for each error code along with a reverse lookup.
#[macro_export]
macro_rules! define_error_constants {
    ($(($name:ident, $value:expr, $doc:expr)),* $(,)?) => {
        $(
            #[doc = $doc]
            pub const $name: LoaderError = LoaderError::new_const($value);
        )*

        /// Returns the name and description of a bare error code
        fn lookup(code: u32) -> Option<(&'static str, &'static str)> {
            $(
                if code == $value {
                    return Some((stringify!($name), $doc));
                }
            )*
            None
        }

        #[cfg(test)]
        /// Returns a vector of all defined error constants for testing uniqueness
        pub fn all_constants() -> Vec<(&'static str, u32)> {
            vec![
                $(
                    (stringify!($name), $value),
                )*
            ]
        }
    };
}

impl LoaderError {
    /// Set when the failing operation zeroed the memory it had written.
    pub const BUFFER_CLEARED_FLAG: u32 = 0x4000_0000;

    /// Set when zeroing the memory failed as well.
    pub const CLEAR_FAILED_FLAG: u32 = 0x8000_0000;

    const CODE_MASK: u32 = !(Self::BUFFER_CLEARED_FLAG | Self::CLEAR_FAILED_FLAG);

    /// Create a loader error; intended to only be used from const contexts, as we don't want
    /// runtime panics if val is zero. The preferred way to get a LoaderError from a u32 is to
    /// use `LoaderError::try_from()` from the `TryFrom` trait impl.
    const fn new_const(val: u32) -> Self {
        match NonZeroU32::new(val) {
            Some(val) => Self(val),
            None => panic!("LoaderError cannot be 0"),
        }
    }

    define_error_constants![
        // PDI structure
        (
            PDI_BH_WIDTH_DETECTION_INVALID,
            0x0001_0001,
            "PDI Error: boot header width detection word invalid"
        ),
        (
            PDI_BH_IDENT_INVALID,
            0x0001_0002,
            "PDI Error: boot header identification string invalid"
        ),
        (
            PDI_BH_CHECKSUM_FAIL,
            0x0001_0003,
            "PDI Error: boot header checksum mismatch"
        ),
        (
            PDI_IHT_CHECKSUM_FAIL,
            0x0001_0004,
            "PDI Error: image header table checksum mismatch"
        ),
        (
            PDI_IH_CHECKSUM_FAIL,
            0x0001_0005,
            "PDI Error: image header checksum mismatch"
        ),
        (
            PDI_PH_CHECKSUM_FAIL,
            0x0001_0006,
            "PDI Error: partition header checksum mismatch"
        ),
        (
            PDI_IHT_NUM_IMGS_INVALID,
            0x0001_0007,
            "PDI Error: number of images out of range"
        ),
        (
            PDI_IHT_NUM_PRTNS_INVALID,
            0x0001_0008,
            "PDI Error: number of partitions out of range"
        ),
        (
            PDI_IDCODE_MISMATCH,
            0x0001_0009,
            "PDI Error: IDCODE does not match the device"
        ),
        (
            PDI_EXT_IDCODE_MISMATCH,
            0x0001_000A,
            "PDI Error: extended IDCODE does not match the device"
        ),
        (
            PDI_IHT_IDENT_INVALID,
            0x0001_000B,
            "PDI Error: image header table identification string invalid"
        ),
        (
            PDI_HEADER_TRUNCATED,
            0x0001_000C,
            "PDI Error: header extends past the available bytes"
        ),
        (
            PDI_IMG_PRTN_COUNT_MISMATCH,
            0x0001_000D,
            "PDI Error: image references partitions outside the table"
        ),
        (
            PDI_PRTN_LEN_INCONSISTENT,
            0x0001_000E,
            "PDI Error: partition lengths disagree with encryption status"
        ),
        (
            PDI_INVALID_CHECKSUM_TYPE,
            0x0001_000F,
            "PDI Error: unsupported partition checksum type"
        ),
        (
            PDI_DELAY_ATTRB_INVALID,
            0x0001_0010,
            "PDI Error: delay load and delay hand-off both set"
        ),
        (
            PDI_METAHDR_VERSION_NOT_SECURE,
            0x0001_0011,
            "PDI Error: metaheader version too old for authentication or encryption"
        ),
        (
            PDI_PRTN_DATA_LEN_INVALID,
            0x0001_0012,
            "PDI Error: partition has no data"
        ),
        (
            PDI_OPTIONAL_DATA_LEN_INVALID,
            0x0001_0013,
            "PDI Error: optional data length out of range"
        ),
        // Crypto and known-answer tests
        (
            KAT_SHA3_DIGEST_MISMATCH,
            0x0002_0001,
            "KAT Error: SHA3-384 digest mismatch"
        ),
        (
            KAT_AES_GCM_DECRYPT_MISMATCH,
            0x0002_0002,
            "KAT Error: AES-GCM plaintext mismatch"
        ),
        (
            KAT_AES_GCM_TAG_MISMATCH,
            0x0002_0003,
            "KAT Error: AES-GCM tag mismatch"
        ),
        (
            KAT_RSA_ENCRYPT_MISMATCH,
            0x0002_0004,
            "KAT Error: RSA public encrypt mismatch"
        ),
        (
            KAT_ECDSA_P384_VERIFY_FAILURE,
            0x0002_0005,
            "KAT Error: ECDSA P-384 verify failure"
        ),
        (
            KAT_ECDSA_P521_VERIFY_FAILURE,
            0x0002_0006,
            "KAT Error: ECDSA P-521 verify failure"
        ),
        (
            KAT_NOT_RUN,
            0x0002_0007,
            "KAT Error: primitive used before its known-answer test"
        ),
        (
            CRYPTO_SHA3_INVALID_STATE,
            0x0002_0008,
            "Crypto Error: SHA3 operation in invalid state"
        ),
        (
            CRYPTO_AES_GCM_INVALID_STATE,
            0x0002_0009,
            "Crypto Error: AES-GCM operation in invalid state"
        ),
        (
            CRYPTO_AES_GCM_TAG_MISMATCH,
            0x0002_000A,
            "Crypto Error: AES-GCM tag mismatch"
        ),
        (
            CRYPTO_AES_INVALID_KEY_SLOT,
            0x0002_000B,
            "Crypto Error: AES key slot not supported"
        ),
        (
            CRYPTO_AES_KEY_NOT_LOADED,
            0x0002_000C,
            "Crypto Error: AES key slot is empty"
        ),
        (
            CRYPTO_RSA_INVALID_KEY,
            0x0002_000D,
            "Crypto Error: RSA public key invalid"
        ),
        (
            CRYPTO_RSA_PSS_VERIFY_FAILURE,
            0x0002_000E,
            "Crypto Error: RSA-PSS signature verify failure"
        ),
        (
            CRYPTO_ECDSA_INVALID_KEY,
            0x0002_000F,
            "Crypto Error: ECDSA public key not on curve"
        ),
        (
            CRYPTO_ECDSA_INVALID_SIGNATURE,
            0x0002_0010,
            "Crypto Error: ECDSA signature malformed"
        ),
        (
            CRYPTO_ECDSA_VERIFY_FAILURE,
            0x0002_0011,
            "Crypto Error: ECDSA signature verify failure"
        ),
        (
            CRYPTO_PUF_REGENERATION_FAILED,
            0x0002_0012,
            "Crypto Error: PUF regeneration failed"
        ),
        (
            CRYPTO_KEK_UNWRAP_FAILED,
            0x0002_0013,
            "Crypto Error: black key unwrap failed"
        ),
        (
            CRYPTO_AES_GCM_INVALID_LENGTH,
            0x0002_0014,
            "Crypto Error: AES-GCM length invalid"
        ),
        (
            CRYPTO_RSA_ENCRYPT_FAILURE,
            0x0002_0015,
            "Crypto Error: RSA public encrypt failure"
        ),
        // Boot devices
        (
            DEVICE_UNSUPPORTED_PDI_SRC,
            0x0003_0001,
            "Device Error: boot source not supported"
        ),
        (
            DEVICE_COPY_OUT_OF_RANGE,
            0x0003_0002,
            "Device Error: copy source outside the device"
        ),
        (
            DEVICE_NOT_INITIALIZED,
            0x0003_0003,
            "Device Error: device used before init"
        ),
        (
            DEVICE_NONBLOCKING_PENDING,
            0x0003_0004,
            "Device Error: non-blocking copy already in flight"
        ),
        (
            DEVICE_NO_PENDING_COPY,
            0x0003_0005,
            "Device Error: wait without an in-flight copy"
        ),
        (
            DEVICE_SBI_BACKWARD_SEEK,
            0x0003_0006,
            "Device Error: stream source cannot seek backwards"
        ),
        (
            DEVICE_QSPI24_ADDR_RANGE,
            0x0003_0007,
            "Device Error: address beyond 24-bit QSPI range"
        ),
        (
            DEVICE_SD_FILE_NOT_FOUND,
            0x0003_0008,
            "Device Error: boot file not found on card"
        ),
        (
            DEVICE_SD_CARD_NOT_DETECTED,
            0x0003_0009,
            "Device Error: card not detected"
        ),
        (
            DEVICE_USB_DFU_INCOMPLETE,
            0x0003_000A,
            "Device Error: DFU download did not complete"
        ),
        (
            DEVICE_IMG_STORE_PDI_NOT_FOUND,
            0x0003_000B,
            "Device Error: PDI id not present in image store"
        ),
        (
            DEVICE_WAIT_MISMATCH,
            0x0003_000C,
            "Device Error: wait target differs from in-flight copy"
        ),
        // eFuse policy
        (
            POLICY_ALL_PPK_REVOKED,
            0x0004_0001,
            "Policy Error: all PPK slots revoked"
        ),
        (
            POLICY_ALL_PPK_INVALID,
            0x0004_0002,
            "Policy Error: no valid PPK slot matches"
        ),
        (
            POLICY_PPK_INVALID_BIT_SET,
            0x0004_0003,
            "Policy Error: PPK slot invalidated"
        ),
        (
            POLICY_PPK_HASH_ZERO,
            0x0004_0004,
            "Policy Error: PPK slot not programmed"
        ),
        (
            POLICY_PPK_HASH_MISMATCH,
            0x0004_0005,
            "Policy Error: PPK hash mismatch"
        ),
        (
            POLICY_REVOKE_ID_OUT_OF_RANGE,
            0x0004_0006,
            "Policy Error: revocation id out of range"
        ),
        (
            POLICY_ALL_IDS_REVOKED,
            0x0004_0007,
            "Policy Error: all revocation ids revoked"
        ),
        (
            POLICY_ID_REVOKED,
            0x0004_0008,
            "Policy Error: revocation id revoked"
        ),
        (
            POLICY_IV_RANGE,
            0x0004_0009,
            "Policy Error: IV outside eFuse range"
        ),
        (
            POLICY_EFUSE_DPA_CM_MISMATCH,
            0x0004_000A,
            "Policy Error: DPA counter-measure configuration disagrees with eFuse"
        ),
        (
            POLICY_HWROT_EFUSE_AUTH_COMPULSORY,
            0x0004_000B,
            "Policy Error: authentication compulsory with PPK programmed"
        ),
        (
            POLICY_HWROT_BH_AUTH_NOT_ALLOWED,
            0x0004_000C,
            "Policy Error: boot header authentication with PPK programmed"
        ),
        (
            POLICY_AUTH_EN_PPK_HASH_ZERO,
            0x0004_000D,
            "Policy Error: authentication requested without PPK"
        ),
        (
            POLICY_ENCONLY_ENC_COMPULSORY,
            0x0004_000E,
            "Policy Error: encryption compulsory in encrypt-only mode"
        ),
        (
            POLICY_ENC_ONLY_KEYSRC_ERR,
            0x0004_000F,
            "Policy Error: encrypt-only metaheader must use eFuse black key"
        ),
        (
            POLICY_ENC_ONLY_PUFHD_LOC_ERR,
            0x0004_0010,
            "Policy Error: encrypt-only PUF helper data must come from eFuse"
        ),
        (
            POLICY_PRTN_ENC_ONLY_KEYSRC,
            0x0004_0011,
            "Policy Error: encrypt-only partition uses a red device key"
        ),
        (
            POLICY_METAHDR_KEYSRC_MISMATCH,
            0x0004_0012,
            "Policy Error: metaheader key source differs from PLM key source"
        ),
        (
            POLICY_PPK_SLOT_INVALID,
            0x0004_0013,
            "Policy Error: PPK slot index out of range"
        ),
        // Secure processing engine
        (
            SECURE_PRTN_HASH_COMPARE_FAIL,
            0x0005_0001,
            "Secure Error: partition hash chain mismatch"
        ),
        (
            SECURE_PRTN_AUTH_FAIL,
            0x0005_0002,
            "Secure Error: partition signature verify failure"
        ),
        (
            SECURE_SPK_SIGNATURE_FAIL,
            0x0005_0003,
            "Secure Error: SPK signature verify failure"
        ),
        (
            SECURE_HDR_AUTH_FAIL,
            0x0005_0004,
            "Secure Error: header signature verify failure"
        ),
        (
            SECURE_INVALID_AUTH_ALGO,
            0x0005_0005,
            "Secure Error: authentication algorithm not supported"
        ),
        (
            SECURE_CHECKSUM_INVLD_WITH_AUTHDEC,
            0x0005_0006,
            "Secure Error: checksum combined with authentication or encryption"
        ),
        (
            SECURE_DEC_INVALID_KEYSRC_SEL,
            0x0005_0007,
            "Secure Error: key source not supported"
        ),
        (
            SECURE_ENC_DATA_NOT_ALIGNED,
            0x0005_0008,
            "Secure Error: encrypted block length not 16-byte aligned"
        ),
        (
            SECURE_DATA_LEFT_FOR_DECRYPT,
            0x0005_0009,
            "Secure Error: key chain ended with data remaining"
        ),
        (
            SECURE_REM_DATA_SIZE_MISMATCH,
            0x0005_000A,
            "Secure Error: next block longer than remaining data"
        ),
        (
            SECURE_METAHDR_LEN_OVERFLOW,
            0x0005_000B,
            "Secure Error: secure headers larger than one chunk"
        ),
        (
            SECURE_CHUNK_LEN_INVALID,
            0x0005_000D,
            "Secure Error: chunk shorter than its overhead"
        ),
        (
            SECURE_GCM_TAG_MISMATCH,
            0x0005_000E,
            "Secure Error: secure header or block tag mismatch"
        ),
        (
            SECURE_CHUNK_SIZE_INVALID,
            0x0005_000F,
            "Secure Error: configured chunk size invalid"
        ),
        // Orchestrator
        (
            LOADER_IMG_ID_NOT_FOUND,
            0x0006_0001,
            "Loader Error: image id not found in any PDI"
        ),
        (
            LOADER_FUNCTION_ID_MISMATCH,
            0x0006_0002,
            "Loader Error: function id mismatch"
        ),
        (
            LOADER_DELAY_HANDOFF_LIST_FULL,
            0x0006_0003,
            "Loader Error: too many deferred hand-offs"
        ),
        (
            LOADER_IMAGE_INFO_TBL_FULL,
            0x0006_0004,
            "Loader Error: image info table full"
        ),
        (
            LOADER_INVALID_DEST_IMGINFOTBL_SIZE,
            0x0006_0005,
            "Loader Error: destination too small for image info table"
        ),
        (
            LOADER_IMG_PARENT_NOT_LOADED,
            0x0006_0006,
            "Loader Error: parent image not loaded"
        ),
        (
            LOADER_NUM_HANDOFF_CPUS_OVERFLOW,
            0x0006_0007,
            "Loader Error: too many hand-off entries"
        ),
        (
            LOADER_READBACK_BUFFER_OVERFLOW,
            0x0006_0008,
            "Loader Error: readback data exceeds buffer"
        ),
        (
            LOADER_SESSION_BUSY,
            0x0006_0009,
            "Loader Error: another load session is active"
        ),
        (
            LOADER_INVALID_SBD_MODE,
            0x0006_000A,
            "Loader Error: secondary boot device not supported"
        ),
        (
            LOADER_NO_VALID_IMG_FOUND,
            0x0006_000B,
            "Loader Error: no valid image info entry"
        ),
        (
            LOADER_INVALID_IMGID,
            0x0006_000C,
            "Loader Error: image id invalid"
        ),
        (
            LOADER_NO_PARTITIONS,
            0x0006_000D,
            "Loader Error: image has no partitions"
        ),
        // Authenticated JTAG
        (
            AUTH_JTAG_DISABLED,
            0x0007_0001,
            "Auth JTAG Error: disabled by eFuse"
        ),
        (
            AUTH_JTAG_EFUSE_AUTH_COMPULSORY,
            0x0007_0002,
            "Auth JTAG Error: no PPK programmed"
        ),
        (
            AUTH_JTAG_INVALID_DNA,
            0x0007_0003,
            "Auth JTAG Error: DNA mismatch"
        ),
        (
            AUTH_JTAG_SIGNATURE_FAIL,
            0x0007_0004,
            "Auth JTAG Error: enable signature verify failure"
        ),
        (
            AUTH_JTAG_LOCKOUT,
            0x0007_0005,
            "Auth JTAG Error: failure limit reached, locked out"
        ),
        (
            AUTH_JTAG_DAP_TIMEOUT_DISABLED,
            0x0007_0006,
            "Auth JTAG Error: enable timeout elapsed, debug disabled"
        ),
        // Commands and image store
        (CMD_INVALID, 0x0008_0001, "Command Error: unknown command id"),
        (
            CMD_ACCESS_DENIED,
            0x0008_0002,
            "Command Error: command requires a secure caller"
        ),
        (
            CMD_PAYLOAD_TOO_SHORT,
            0x0008_0003,
            "Command Error: payload shorter than required"
        ),
        (
            CMD_UNSUPPORTED_SUBSYSTEM_PDISRC,
            0x0008_0004,
            "Command Error: boot source not supported for subsystem PDI"
        ),
        (
            CMD_UNSUPPORTED_MULTIBOOT_FLASH_TYPE,
            0x0008_0005,
            "Command Error: multiboot flash type not supported"
        ),
        (
            CMD_UNSUPPORTED_MULTIBOOT_PDISRC,
            0x0008_0006,
            "Command Error: multiboot boot source not supported"
        ),
        (
            CMD_UNSUPPORTED_FILE_NUM,
            0x0008_0007,
            "Command Error: boot file number out of range"
        ),
        (
            CMD_UNSUPPORTED_MULTIBOOT_OFFSET,
            0x0008_0008,
            "Command Error: image location not a search-offset multiple"
        ),
        (
            CMD_PDI_IMG_STORE_CFG_NOT_SET,
            0x0008_0009,
            "Command Error: image store not configured"
        ),
        (
            CMD_PDI_IMG_STORE_FULL,
            0x0008_000A,
            "Command Error: image store full"
        ),
        (
            CMD_PDI_LIST_EMPTY,
            0x0008_000B,
            "Command Error: image store empty"
        ),
        (
            CMD_PDI_ADDR_NOT_FOUND,
            0x0008_000C,
            "Command Error: PDI id not present in image store"
        ),
        (
            CMD_INVALID_PDI_INPUT,
            0x0008_000D,
            "Command Error: source is neither a full nor a partial PDI"
        ),
        (
            CMD_INVALID_METAHEADER_SRC_ADDR,
            0x0008_000E,
            "Command Error: metaheader source address invalid"
        ),
        (
            CMD_INVALID_METAHEADER_OFFSET,
            0x0008_000F,
            "Command Error: metaheader offset invalid"
        ),
        (
            CMD_INVALID_METAHEADER_DEST_ADDR,
            0x0008_0010,
            "Command Error: metaheader destination address invalid"
        ),
        (
            CMD_INVALID_METAHDR_BUFF_SIZE,
            0x0008_0011,
            "Command Error: metaheader destination too small"
        ),
        (
            CMD_INVALID_HANDOFF_PARAM_DEST_SIZE,
            0x0008_0012,
            "Command Error: hand-off parameter destination too small"
        ),
        // Generic
        (TIMEOUT, 0x0009_0001, "Error: polling retry budget exhausted"),
        (
            MEMORY_OUT_OF_RANGE,
            0x0009_0002,
            "Error: address not backed by memory"
        ),
        (
            MEMORY_REGION_OVERLAP,
            0x0009_0003,
            "Error: memory regions overlap"
        ),
        (
            MEMORY_CLEAR_VERIFY_FAIL,
            0x0009_0004,
            "Error: memory did not read back as zero"
        ),
        (
            MEMORY_WRITE_PROTECTED,
            0x0009_0006,
            "Error: memory region is write protected"
        ),
    ];

    /// Returns the error code without the buffer-state flags
    pub fn code(&self) -> u32 {
        self.0.get() & Self::CODE_MASK
    }

    /// Returns this error marked as having cleared the memory it touched
    pub fn with_buffer_cleared(self) -> Self {
        self.with_flag(Self::BUFFER_CLEARED_FLAG)
    }

    /// Returns this error marked as having failed to clear the memory it touched
    pub fn with_clear_failed(self) -> Self {
        self.with_flag(Self::CLEAR_FAILED_FLAG)
    }

    fn with_flag(self, flag: u32) -> Self {
        match NonZeroU32::new(self.0.get() | flag) {
            Some(val) => Self(val),
            None => self,
        }
    }

    /// Returns what happened to the memory touched by the failing operation
    pub fn buffer_state(&self) -> BufferState {
        let val = self.0.get();
        if val & Self::CLEAR_FAILED_FLAG != 0 {
            BufferState::ClearFailed
        } else if val & Self::BUFFER_CLEARED_FLAG != 0 {
            BufferState::Cleared
        } else {
            BufferState::Untouched
        }
    }

    /// Returns true if the bare codes are equal, ignoring buffer-state flags
    pub fn same_code(&self, other: LoaderError) -> bool {
        self.code() == other.code()
    }

    /// Returns the constant name of the error code
    pub fn name(&self) -> &'static str {
        match Self::lookup(self.code()) {
            Some((name, _)) => name,
            None => "UNKNOWN",
        }
    }

    /// Returns the free-text diagnostic of the error code
    pub fn description(&self) -> &'static str {
        match Self::lookup(self.code()) {
            Some((_, doc)) => doc,
            None => "Unknown error",
        }
    }
}

impl core::fmt::Display for LoaderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "0x{:08x} {}", self.0.get(), self.description())?;
        match self.buffer_state() {
            BufferState::Untouched => Ok(()),
            BufferState::Cleared => write!(f, " (buffer cleared)"),
            BufferState::ClearFailed => write!(f, " (buffer clear failed)"),
        }
    }
}

impl From<core::num::NonZeroU32> for crate::LoaderError {
    fn from(val: core::num::NonZeroU32) -> Self {
        crate::LoaderError(val)
    }
}

impl From<LoaderError> for core::num::NonZeroU32 {
    fn from(val: LoaderError) -> Self {
        val.0
    }
}

impl From<LoaderError> for u32 {
    fn from(val: LoaderError) -> Self {
        core::num::NonZeroU32::from(val).get()
    }
}

impl TryFrom<u32> for LoaderError {
    type Error = TryFromIntError;
    fn try_from(val: u32) -> Result<Self, TryFromIntError> {
        match NonZeroU32::try_from(val) {
            Ok(val) => Ok(LoaderError(val)),
            Err(err) => Err(err),
        }
    }
}

pub type LoaderResult<T> = Result<T, LoaderError>;
