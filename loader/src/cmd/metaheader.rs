/*++

Licensed under the Apache-2.0 license.

File Name:

    metaheader.rs

Abstract:

    File contains the EXTRACT_METAHEADER command. The headers of a PDI in
    memory are validated and copied out with their non-exportable words
    zeroed.

--*/

use super::{addr_arg, arg};
use crate::LoaderState;
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::{
    BootHeader, PdiSrc, BH_WIDTH_DETECTION, BOOT_HEADER_BYTE_SIZE, IHT_BYTE_SIZE, IHT_FPDI_IDENT,
    IHT_PPDI_IDENT, SMAP_BUS_WIDTH_LEN, WORD_LEN,
};
use xloader_image_verify::{read_boot_header, read_metaheader, MetaHeader, PdiKind};
use zerocopy::AsBytes;

/// Words of an image header table that may leave the device, one bit per word
pub const IHT_EXPORT_MASK: u32 = 0x0002_1F7F;
pub const IH_EXPORT_MASK: u32 = 0x0000_3FFB;
pub const PH_EXPORT_MASK: u32 = 0x0000_1DFF;

const IHT_IDENT_OFFSET: u64 = 0x24;

fn push_masked(out: &mut Vec<u8>, bytes: &[u8], mask: u32) {
    for (idx, word) in bytes.chunks_exact(WORD_LEN).enumerate() {
        if idx < 32 && mask & (1 << idx) != 0 {
            out.extend_from_slice(word);
        } else {
            out.extend_from_slice(&[0u8; WORD_LEN]);
        }
    }
}

pub struct ExtractMetaheaderCmd;
impl ExtractMetaheaderCmd {
    /// Tells a full PDI from a partial one by its first words
    fn detect(state: &LoaderState, src: u64) -> LoaderResult<(PdiKind, BootHeader)> {
        let width = state.mem.read_u32(src + SMAP_BUS_WIDTH_LEN as u64)?;
        if width == BH_WIDTH_DETECTION {
            if !state.mem.is_valid_range(src, BOOT_HEADER_BYTE_SIZE as u64) {
                Err(LoaderError::CMD_INVALID_METAHEADER_SRC_ADDR)?;
            }
            let mut buf = state.mem.slice(src, BOOT_HEADER_BYTE_SIZE)?.to_vec();
            let bh = read_boot_header(&mut buf)
                .map_err(|_| LoaderError::CMD_INVALID_METAHEADER_OFFSET)?;
            let iht = src + u64::from(bh.meta_hdr_ofst);
            if bh.meta_hdr_ofst == 0 || !state.mem.is_valid_range(iht, IHT_BYTE_SIZE as u64) {
                Err(LoaderError::CMD_INVALID_METAHEADER_OFFSET)?;
            }
            return Ok((PdiKind::Full, bh));
        }
        let ident = state
            .mem
            .read_u32(src + SMAP_BUS_WIDTH_LEN as u64 + IHT_IDENT_OFFSET)?;
        if ident == IHT_PPDI_IDENT || ident == IHT_FPDI_IDENT {
            return Ok((PdiKind::Partial, state.boot_header));
        }
        Err(LoaderError::CMD_INVALID_PDI_INPUT)
    }

    fn read(state: &mut LoaderState, src: u64) -> LoaderResult<MetaHeader> {
        let (kind, bh) = Self::detect(state, src)?;
        let retries = state.config.poll_retries;
        state.devices.get_mut(PdiSrc::Ddr)?.init(0, retries)?;
        let device_id = state.platform.device_identity();
        let meta = {
            let mut env = state.secure_env(PdiSrc::Ddr, &bh)?;
            read_metaheader(&mut env, &device_id, src, kind)
        };
        let release = state.devices.get_mut(PdiSrc::Ddr)?.release();
        let meta = meta?;
        release?;
        Ok(meta)
    }

    /// IHT, image headers and partition headers with private words zeroed
    fn export(meta: &MetaHeader) -> Vec<u8> {
        let mut out = Vec::new();
        push_masked(&mut out, meta.iht.as_bytes(), IHT_EXPORT_MASK);
        for ih in meta.img_hdrs.iter() {
            push_masked(&mut out, ih.as_bytes(), IH_EXPORT_MASK);
        }
        for ph in meta.prtn_hdrs.iter() {
            push_masked(&mut out, ph.as_bytes(), PH_EXPORT_MASK);
        }
        out
    }

    pub(crate) fn execute(state: &mut LoaderState, payload: &[u32]) -> LoaderResult<Vec<u32>> {
        let src = addr_arg(payload, 0)?;
        let dst = addr_arg(payload, 2)?;
        let dst_size = arg(payload, 4)?;
        let min_len = (SMAP_BUS_WIDTH_LEN + IHT_BYTE_SIZE) as u64;
        if !state.mem.is_valid_range(src, min_len) {
            Err(LoaderError::CMD_INVALID_METAHEADER_SRC_ADDR)?;
        }

        let meta = Self::read(state, src)?;
        let out = Self::export(&meta);
        if (dst_size as usize) < out.len() {
            Err(LoaderError::CMD_INVALID_METAHDR_BUFF_SIZE)?;
        }
        if !state.mem.is_valid_range(dst, out.len() as u64) {
            Err(LoaderError::CMD_INVALID_METAHEADER_DEST_ADDR)?;
        }
        state.mem.write(dst, &out)?;
        Ok(vec![out.len() as u32])
    }
}
