/*++

Licensed under the Apache-2.0 license.

File Name:

   ids.rs

Abstract:

    File contains on-media identifiers: key sources, boot sources,
    secondary boot device modes and image ids.

--*/

use xloader_error::{LoaderError, LoaderResult};

/// AES key source selector as encoded in headers
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum KeySource {
    EfuseRed,
    EfuseBlack,
    BbramRed,
    BbramBlack,
    BootHeaderBlack,
    EfuseUser0Red,
    EfuseUser0Black,
    EfuseUser1Red,
    EfuseUser1Black,
    User(u8),
}

impl KeySource {
    pub const EFUSE_RED: u32 = 0xA5C3_C5A3;
    pub const EFUSE_BLACK: u32 = 0xA5C3_C5A5;
    pub const BBRAM_RED: u32 = 0x3A5C_3C5A;
    pub const BBRAM_BLACK: u32 = 0x3A5C_3C59;
    pub const BH_BLACK: u32 = 0xA35C_7C53;
    pub const EFUSE_USR0_RED: u32 = 0x5C3C_A5A3;
    pub const EFUSE_USR0_BLACK: u32 = 0x5C3C_A5A5;
    pub const EFUSE_USR1_RED: u32 = 0xC3A5_C5A3;
    pub const EFUSE_USR1_BLACK: u32 = 0xC3A5_C5A5;
    pub const USER_KEYS: [u32; 8] = [
        0xC5C3_A5A3,
        0xC3A5_C5B3,
        0xC5C3_A5C3,
        0xC3A5_C5D3,
        0xC5C3_A5E3,
        0xC3A5_C5F3,
        0xC5C3_A5F5,
        0xC3A5_C5F5,
    ];

    /// True when the key is stored wrapped under the PUF KEK
    pub fn is_black(&self) -> bool {
        matches!(
            self,
            KeySource::EfuseBlack
                | KeySource::BbramBlack
                | KeySource::BootHeaderBlack
                | KeySource::EfuseUser0Black
                | KeySource::EfuseUser1Black
        )
    }

    /// Session bit recording that this black key was unwrapped already
    pub fn red_cache_bit(&self) -> Option<u32> {
        match self {
            KeySource::EfuseBlack => Some(0x01),
            KeySource::BbramBlack => Some(0x02),
            KeySource::BootHeaderBlack => Some(0x04),
            KeySource::EfuseUser0Black => Some(0x08),
            KeySource::EfuseUser1Black => Some(0x10),
            _ => None,
        }
    }

    /// True for the device key held in eFuse or BBRAM in red form
    pub fn is_red_device_key(&self) -> bool {
        matches!(self, KeySource::EfuseRed | KeySource::BbramRed)
    }
}

impl TryFrom<u32> for KeySource {
    type Error = LoaderError;

    fn try_from(val: u32) -> LoaderResult<Self> {
        let src = match val {
            Self::EFUSE_RED => KeySource::EfuseRed,
            Self::EFUSE_BLACK => KeySource::EfuseBlack,
            Self::BBRAM_RED => KeySource::BbramRed,
            Self::BBRAM_BLACK => KeySource::BbramBlack,
            Self::BH_BLACK => KeySource::BootHeaderBlack,
            Self::EFUSE_USR0_RED => KeySource::EfuseUser0Red,
            Self::EFUSE_USR0_BLACK => KeySource::EfuseUser0Black,
            Self::EFUSE_USR1_RED => KeySource::EfuseUser1Red,
            Self::EFUSE_USR1_BLACK => KeySource::EfuseUser1Black,
            other => match Self::USER_KEYS.iter().position(|&k| k == other) {
                Some(idx) => KeySource::User(idx as u8),
                None => Err(LoaderError::SECURE_DEC_INVALID_KEYSRC_SEL)?,
            },
        };
        Ok(src)
    }
}

impl From<KeySource> for u32 {
    fn from(val: KeySource) -> Self {
        match val {
            KeySource::EfuseRed => KeySource::EFUSE_RED,
            KeySource::EfuseBlack => KeySource::EFUSE_BLACK,
            KeySource::BbramRed => KeySource::BBRAM_RED,
            KeySource::BbramBlack => KeySource::BBRAM_BLACK,
            KeySource::BootHeaderBlack => KeySource::BH_BLACK,
            KeySource::EfuseUser0Red => KeySource::EFUSE_USR0_RED,
            KeySource::EfuseUser0Black => KeySource::EFUSE_USR0_BLACK,
            KeySource::EfuseUser1Red => KeySource::EFUSE_USR1_RED,
            KeySource::EfuseUser1Black => KeySource::EFUSE_USR1_BLACK,
            KeySource::User(idx) => KeySource::USER_KEYS[usize::from(idx & 0x7)],
        }
    }
}

/// Boot source of a PDI
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum PdiSrc {
    Jtag,
    Qspi24,
    Qspi32,
    Sd0,
    Sd1,
    Emmc,
    Usb,
    Ospi,
    Smap,
    Sd1Ls,
    Ddr,
    Sbi,
    Pcie,
    Emmc0,
    ImageStore,
}

impl PdiSrc {
    pub const SRC_MASK: u32 = 0xFF;

    /// True for sources that deliver a forward-only byte stream
    pub fn is_stream(&self) -> bool {
        matches!(self, PdiSrc::Jtag | PdiSrc::Smap | PdiSrc::Sbi | PdiSrc::Pcie)
    }

    pub fn is_sd(&self) -> bool {
        matches!(self, PdiSrc::Sd0 | PdiSrc::Sd1 | PdiSrc::Sd1Ls)
    }

    pub fn is_emmc(&self) -> bool {
        matches!(self, PdiSrc::Emmc | PdiSrc::Emmc0)
    }
}

impl TryFrom<u32> for PdiSrc {
    type Error = LoaderError;

    fn try_from(val: u32) -> LoaderResult<Self> {
        let src = match val & Self::SRC_MASK {
            0x0 => PdiSrc::Jtag,
            0x1 => PdiSrc::Qspi24,
            0x2 => PdiSrc::Qspi32,
            0x3 => PdiSrc::Sd0,
            0x5 => PdiSrc::Sd1,
            0x6 => PdiSrc::Emmc,
            0x7 => PdiSrc::Usb,
            0x8 => PdiSrc::Ospi,
            0xA => PdiSrc::Smap,
            0xE => PdiSrc::Sd1Ls,
            0xF => PdiSrc::Ddr,
            0x10 => PdiSrc::Sbi,
            0x11 => PdiSrc::Pcie,
            0x12 => PdiSrc::Emmc0,
            0x14 => PdiSrc::ImageStore,
            _ => Err(LoaderError::DEVICE_UNSUPPORTED_PDI_SRC)?,
        };
        Ok(src)
    }
}

impl From<PdiSrc> for u32 {
    fn from(val: PdiSrc) -> Self {
        match val {
            PdiSrc::Jtag => 0x0,
            PdiSrc::Qspi24 => 0x1,
            PdiSrc::Qspi32 => 0x2,
            PdiSrc::Sd0 => 0x3,
            PdiSrc::Sd1 => 0x5,
            PdiSrc::Emmc => 0x6,
            PdiSrc::Usb => 0x7,
            PdiSrc::Ospi => 0x8,
            PdiSrc::Smap => 0xA,
            PdiSrc::Sd1Ls => 0xE,
            PdiSrc::Ddr => 0xF,
            PdiSrc::Sbi => 0x10,
            PdiSrc::Pcie => 0x11,
            PdiSrc::Emmc0 => 0x12,
            PdiSrc::ImageStore => 0x14,
        }
    }
}

/// Access mode carried in the top nibble of an SD/eMMC boot source
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum RawBootMode {
    /// Mode follows the multiboot register
    #[default]
    Default,
    SdRaw,
    EmmcBp1,
    EmmcBp2,
    FileSystem,
}

impl RawBootMode {
    pub const MASK: u32 = 0xF000_0000;
    pub const SD_RAW: u32 = 0x7000_0000;
    pub const EMMC_BP1: u32 = 0x1000_0000;
    pub const EMMC_BP2: u32 = 0x2000_0000;
    pub const FILE_SYSTEM: u32 = 0xF000_0000;
}

impl From<u32> for RawBootMode {
    fn from(val: u32) -> Self {
        match val & Self::MASK {
            Self::SD_RAW => RawBootMode::SdRaw,
            Self::EMMC_BP1 => RawBootMode::EmmcBp1,
            Self::EMMC_BP2 => RawBootMode::EmmcBp2,
            Self::FILE_SYSTEM => RawBootMode::FileSystem,
            _ => RawBootMode::Default,
        }
    }
}

impl From<RawBootMode> for u32 {
    fn from(val: RawBootMode) -> Self {
        match val {
            RawBootMode::Default => 0,
            RawBootMode::SdRaw => RawBootMode::SD_RAW,
            RawBootMode::EmmcBp1 => RawBootMode::EMMC_BP1,
            RawBootMode::EmmcBp2 => RawBootMode::EMMC_BP2,
            RawBootMode::FileSystem => RawBootMode::FILE_SYSTEM,
        }
    }
}

/// Decodes a boot source word into the source and its raw-access mode
pub fn decode_pdi_src(val: u32) -> LoaderResult<(PdiSrc, RawBootMode)> {
    Ok((PdiSrc::try_from(val)?, RawBootMode::from(val)))
}

/// Secondary boot device named by the image header table
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SbdMode {
    Same,
    Device(PdiSrc, RawBootMode),
}

impl TryFrom<u32> for SbdMode {
    type Error = LoaderError;

    fn try_from(val: u32) -> LoaderResult<Self> {
        let mode = match val {
            0x0 => SbdMode::Same,
            0x1 => SbdMode::Device(PdiSrc::Qspi32, RawBootMode::Default),
            0x2 => SbdMode::Device(PdiSrc::Qspi24, RawBootMode::Default),
            0x3 => SbdMode::Device(PdiSrc::Sd0, RawBootMode::FileSystem),
            0x5 => SbdMode::Device(PdiSrc::Sd1, RawBootMode::FileSystem),
            0x7 => SbdMode::Device(PdiSrc::Emmc, RawBootMode::FileSystem),
            0x8 => SbdMode::Device(PdiSrc::Usb, RawBootMode::Default),
            0x9 => SbdMode::Device(PdiSrc::Ospi, RawBootMode::Default),
            0xA => SbdMode::Device(PdiSrc::Smap, RawBootMode::Default),
            0xB => SbdMode::Device(PdiSrc::Pcie, RawBootMode::Default),
            0xC => SbdMode::Device(PdiSrc::Sd0, RawBootMode::SdRaw),
            0xD => SbdMode::Device(PdiSrc::Sd1, RawBootMode::SdRaw),
            0xF => SbdMode::Device(PdiSrc::Emmc, RawBootMode::SdRaw),
            0x12 => SbdMode::Device(PdiSrc::ImageStore, RawBootMode::Default),
            _ => Err(LoaderError::LOADER_INVALID_SBD_MODE)?,
        };
        Ok(mode)
    }
}

/// Image id helpers
pub struct ImgId;

impl ImgId {
    pub const CLASS_SHIFT: u32 = 26;
    pub const CLASS_MASK: u32 = 0x3F << Self::CLASS_SHIFT;
    pub const SUBCLASS_SHIFT: u32 = 20;
    pub const SUBCLASS_MASK: u32 = 0x3F << Self::SUBCLASS_SHIFT;
    pub const SUBCLASS_PL: u32 = 0x7;
    pub const SUBCLASS_AIE: u32 = 0x2;

    pub fn class(img_id: u32) -> u32 {
        (img_id & Self::CLASS_MASK) >> Self::CLASS_SHIFT
    }

    pub fn subclass(img_id: u32) -> u32 {
        (img_id & Self::SUBCLASS_MASK) >> Self::SUBCLASS_SHIFT
    }

    /// True for reconfigurable (PL or AIE) images
    pub fn is_dfx(img_id: u32) -> bool {
        matches!(Self::subclass(img_id), Self::SUBCLASS_PL | Self::SUBCLASS_AIE)
    }
}
