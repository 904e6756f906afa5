/*++

Licensed under the Apache-2.0 license.

File Name:

    header.rs

Abstract:

    File contains the structural parsing of boot headers, image header
    tables, image headers and partition headers. Each structure is
    checksummed before it is accepted; a rejected structure is wiped from
    the buffer it was read from.

--*/

use xloader_drivers::cprintln;
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::*;
use zerocopy::FromBytes;

/// IDCODE bits holding the silicon revision
pub const IDCODE_SIREV_MASK: u32 = 0xF000_0000;

/// Identity of the device the loader runs on
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub idcode: u32,
    pub ext_idcode: u32,
    /// Legacy revision whose extended IDCODE reads as zero
    pub zero_ext_idcode_allowed: bool,
}

fn wipe_on_err<T>(buf: &mut [u8], len: usize, result: LoaderResult<T>) -> LoaderResult<T> {
    if result.is_err() {
        let end = len.min(buf.len());
        buf[..end].fill(0);
    }
    result
}

/// Read and validate a boot header.
///
/// # Arguments
///
/// * `buf` - Bytes copied from the start of a full PDI
pub fn read_boot_header(buf: &mut [u8]) -> LoaderResult<BootHeader> {
    let result = read_header::<BootHeader>(buf).and_then(|bh| {
        if bh.width_detection != BH_WIDTH_DETECTION {
            Err(LoaderError::PDI_BH_WIDTH_DETECTION_INVALID)?;
        }
        if bh.image_ident != BH_IMAGE_IDENT {
            Err(LoaderError::PDI_BH_IDENT_INVALID)?;
        }
        if bh.calc_checksum() != bh.checksum {
            Err(LoaderError::PDI_BH_CHECKSUM_FAIL)?;
        }
        Ok(bh)
    });
    wipe_on_err(buf, BOOT_HEADER_BYTE_SIZE, result)
}

fn check_idcode(iht: &ImageHeaderTable, device: &DeviceIdentity) -> LoaderResult<()> {
    if iht.attr & IHT_ATTR_BYPASS_IDCODE != 0 {
        return Ok(());
    }
    let mask = if iht.attr & IHT_ATTR_BYPASS_SIREV != 0 {
        !IDCODE_SIREV_MASK
    } else {
        u32::MAX
    };
    if iht.idcode & mask != device.idcode & mask {
        cprintln!(
            "[pdi] IDCODE 0x{:08x} does not match device 0x{:08x}",
            iht.idcode,
            device.idcode
        );
        Err(LoaderError::PDI_IDCODE_MISMATCH)?;
    }
    if device.ext_idcode == 0 {
        if !device.zero_ext_idcode_allowed {
            Err(LoaderError::PDI_EXT_IDCODE_MISMATCH)?;
        }
    } else if iht.ext_idcode != device.ext_idcode {
        Err(LoaderError::PDI_EXT_IDCODE_MISMATCH)?;
    }
    Ok(())
}

/// Read and validate an image header table.
///
/// On failure the table bytes in `buf` read as zero.
///
/// # Arguments
///
/// * `buf` - Buffer holding the table at offset zero
/// * `device` - Identity the table must target
pub fn read_image_header_table(
    buf: &mut [u8],
    device: &DeviceIdentity,
) -> LoaderResult<ImageHeaderTable> {
    let result = read_header::<ImageHeaderTable>(buf).and_then(|iht| {
        if iht.calc_checksum() != iht.checksum {
            Err(LoaderError::PDI_IHT_CHECKSUM_FAIL)?;
        }
        if iht.ident != IHT_FPDI_IDENT && iht.ident != IHT_PPDI_IDENT {
            Err(LoaderError::PDI_IHT_IDENT_INVALID)?;
        }
        if iht.no_of_imgs == 0 || iht.no_of_imgs > IHT_MAX_IMGS {
            Err(LoaderError::PDI_IHT_NUM_IMGS_INVALID)?;
        }
        if iht.no_of_prtns == 0 || iht.no_of_prtns > IHT_MAX_PRTNS {
            Err(LoaderError::PDI_IHT_NUM_PRTNS_INVALID)?;
        }
        if iht.optional_data_len > IHT_MAX_OPTIONAL_DATA_WORDS {
            Err(LoaderError::PDI_OPTIONAL_DATA_LEN_INVALID)?;
        }
        if (iht.is_authenticated() || iht.is_encrypted()) && iht.version < IHT_MIN_SECURE_VERSION {
            Err(LoaderError::PDI_METAHDR_VERSION_NOT_SECURE)?;
        }
        check_idcode(&iht, device)?;
        Ok(iht)
    });
    wipe_on_err(buf, IHT_BYTE_SIZE, result)
}

/// Read and validate `count` image headers laid out back to back
pub fn read_image_headers(buf: &mut [u8], count: u32) -> LoaderResult<Vec<ImageHeader>> {
    let len = count as usize * IH_BYTE_SIZE;
    let result = (|| -> LoaderResult<Vec<ImageHeader>> {
        let bytes = buf.get(..len).ok_or(LoaderError::PDI_HEADER_TRUNCATED)?;
        let mut hdrs = Vec::with_capacity(count as usize);
        for raw in bytes.chunks_exact(IH_BYTE_SIZE) {
            let ih = ImageHeader::read_from(raw).ok_or(LoaderError::PDI_HEADER_TRUNCATED)?;
            if ih.calc_checksum() != ih.checksum {
                Err(LoaderError::PDI_IH_CHECKSUM_FAIL)?;
            }
            if ih.delay_load() && ih.delay_handoff() {
                Err(LoaderError::PDI_DELAY_ATTRB_INVALID)?;
            }
            hdrs.push(ih);
        }
        Ok(hdrs)
    })();
    wipe_on_err(buf, len, result)
}

fn check_partition(ph: &PartitionHeader) -> LoaderResult<()> {
    if ph.calc_checksum() != ph.checksum {
        Err(LoaderError::PDI_PH_CHECKSUM_FAIL)?;
    }
    ChecksumType::try_from(ph.checksum_type())?;
    if ph.unenc_data_word_len == 0 {
        Err(LoaderError::PDI_PRTN_DATA_LEN_INVALID)?;
    }
    let enc = ph.enc_data_word_len;
    let unenc = ph.unenc_data_word_len;
    let consistent = if ph.is_encrypted() {
        enc >= unenc
    } else {
        enc == unenc
    };
    if !consistent || ph.total_data_word_len < enc {
        Err(LoaderError::PDI_PRTN_LEN_INCONSISTENT)?;
    }
    Ok(())
}

/// Read and validate `count` partition headers laid out back to back
pub fn read_partition_headers(buf: &mut [u8], count: u32) -> LoaderResult<Vec<PartitionHeader>> {
    let len = count as usize * PH_BYTE_SIZE;
    let result = (|| -> LoaderResult<Vec<PartitionHeader>> {
        let bytes = buf.get(..len).ok_or(LoaderError::PDI_HEADER_TRUNCATED)?;
        let mut hdrs = Vec::with_capacity(count as usize);
        for raw in bytes.chunks_exact(PH_BYTE_SIZE) {
            let ph = PartitionHeader::read_from(raw).ok_or(LoaderError::PDI_HEADER_TRUNCATED)?;
            check_partition(&ph)?;
            hdrs.push(ph);
        }
        Ok(hdrs)
    })();
    wipe_on_err(buf, len, result)
}

/// Every partition must belong to exactly one image
pub fn validate_image_partitions(
    iht: &ImageHeaderTable,
    imgs: &[ImageHeader],
    prtns: &[PartitionHeader],
) -> LoaderResult<()> {
    let mut expected_first = 0u32;
    for ih in imgs {
        if ih.first_prtn_hdr != expected_first {
            Err(LoaderError::PDI_IMG_PRTN_COUNT_MISMATCH)?;
        }
        expected_first = expected_first
            .checked_add(ih.no_of_prtns)
            .ok_or(LoaderError::PDI_IMG_PRTN_COUNT_MISMATCH)?;
    }
    if expected_first != iht.no_of_prtns || prtns.len() != iht.no_of_prtns as usize {
        Err(LoaderError::PDI_IMG_PRTN_COUNT_MISMATCH)?;
    }
    Ok(())
}
