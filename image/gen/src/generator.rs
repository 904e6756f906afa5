/*++

Licensed under the Apache-2.0 license.

File Name:

   generator.rs

Abstract:

    File contains the PDI generator: lays out the boot header, the image
    header table, the metaheader certificate, the header region and the
    partitions, then signs and encrypts them.

--*/

use crate::partition::{certificate, secure_hdr0, sign_partition};
use crate::{encode_partition, EncodedPartition, PdiConfig, PdiGeneratorCrypto};
use anyhow::bail;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use xloader_image_types::*;
use zerocopy::{AsBytes, FromBytes};

/// SMAP bus width pattern at the front of every PDI
const SMAP_BUS_WIDTH: [u32; 4] = [0xDD00_0000, 0x4433_2211, 0x8877_6655, 0xCCBB_AA99];

const SECTION_ALIGN: usize = 64;

fn align(val: usize) -> usize {
    val.div_ceil(SECTION_ALIGN) * SECTION_ALIGN
}

fn words(bytes: usize) -> u32 {
    (bytes / WORD_LEN) as u32
}

/// Generated PDI along with the headers it carries
#[derive(Clone, Debug)]
pub struct GeneratedPdi {
    pub image: Vec<u8>,
    /// Offset of the image header table
    pub iht_ofst: usize,
    pub iht: ImageHeaderTable,
    pub img_hdrs: Vec<ImageHeader>,
    pub prtn_hdrs: Vec<PartitionHeader>,
    /// Offset of the image and partition header region
    pub hdr_ofst: usize,
    /// Offset of the data of each partition
    pub prtn_data_ofst: Vec<usize>,
}

struct PartitionPlacement {
    encoded: EncodedPartition,
    ac_ofst: Option<usize>,
    checksum_ofst: Option<usize>,
    data_ofst: usize,
}

/// PDI Generator
pub struct PdiGenerator<Crypto: PdiGeneratorCrypto> {
    crypto: Crypto,
}

impl<Crypto: PdiGeneratorCrypto> PdiGenerator<Crypto> {
    /// Create an instance `PdiGenerator`
    pub fn new(crypto: Crypto) -> Self {
        Self { crypto }
    }

    pub fn crypto(&self) -> &Crypto {
        &self.crypto
    }

    /// Generate a PDI
    ///
    /// # Arguments
    ///
    /// * `config` - PDI generator configuration
    ///
    /// # Returns
    ///
    /// * `GeneratedPdi` - Generated PDI
    pub fn generate(&self, config: &PdiConfig) -> anyhow::Result<GeneratedPdi> {
        let no_of_prtns: usize = config.images.iter().map(|img| img.partitions.len()).sum();
        if config.images.is_empty() || config.images.len() > IHT_MAX_IMGS as usize {
            bail!("Invalid image count {}", config.images.len());
        }
        if no_of_prtns == 0 || no_of_prtns > IHT_MAX_PRTNS as usize {
            bail!("Invalid partition count {}", no_of_prtns);
        }
        if config.optional_data.len() % WORD_LEN != 0 {
            bail!("Optional data must be word aligned");
        }

        // Sections
        let iht_ofst = if config.full {
            align(BOOT_HEADER_BYTE_SIZE)
        } else {
            SMAP_BUS_WIDTH_LEN
        };
        let mut cursor = align(iht_ofst + IHT_BYTE_SIZE + config.optional_data.len());
        let meta_ac_ofst = config.metaheader_auth.as_ref().map(|_| {
            let ofst = cursor;
            cursor = align(cursor + AC_BYTE_SIZE);
            ofst
        });
        let hdr_ofst = cursor;
        let plain_hdr_len = config.images.len() * IH_BYTE_SIZE + no_of_prtns * PH_BYTE_SIZE;
        let region_len = if config.metaheader_enc.is_some() {
            SECURE_HDR_TOTAL_BYTE_SIZE + plain_hdr_len + GCM_TAG_BYTE_SIZE
        } else {
            plain_hdr_len
        };
        if region_len > config.chunk_size + SECURE_HDR_TOTAL_BYTE_SIZE {
            bail!("Headers do not fit one secure chunk");
        }
        cursor = align(cursor + region_len);

        let mut placements = Vec::with_capacity(no_of_prtns);
        for prtn in config.images.iter().flat_map(|img| img.partitions.iter()) {
            let encoded = encode_partition(
                &self.crypto,
                &prtn.data,
                prtn.auth.as_ref(),
                prtn.enc.as_ref(),
                prtn.checksum,
                config.chunk_size,
            )?;
            let ac_ofst = encoded.ac.map(|_| {
                let ofst = cursor;
                cursor = align(cursor + AC_BYTE_SIZE);
                ofst
            });
            let checksum_ofst = encoded.checksum.map(|_| {
                let ofst = cursor;
                cursor = align(cursor + SHA3_DIGEST_BYTE_SIZE);
                ofst
            });
            let data_ofst = cursor;
            cursor = align(cursor + encoded.media.len());
            placements.push(PartitionPlacement {
                encoded,
                ac_ofst,
                checksum_ofst,
                data_ofst,
            });
        }
        let mut image = vec![0u8; cursor];

        // Headers
        let prtn_hdrs = self.partition_headers(config, &placements)?;
        let img_hdrs = Self::image_headers(config);
        let iht = Self::image_header_table(config, hdr_ofst, region_len, meta_ac_ofst);

        let mut iht_opt = iht.as_bytes().to_vec();
        iht_opt.extend_from_slice(&config.optional_data);

        let mut region: Vec<u8> = Vec::with_capacity(region_len);
        for ih in &img_hdrs {
            region.extend_from_slice(ih.as_bytes());
        }
        for ph in &prtn_hdrs {
            region.extend_from_slice(ph.as_bytes());
        }
        if let Some(enc) = &config.metaheader_enc {
            let mut rng = StdRng::seed_from_u64(enc.seed);
            let mut sh = SecureHeader {
                next_len: words(plain_hdr_len),
                ..Default::default()
            };
            rng.fill(&mut sh.key);
            rng.fill(&mut sh.iv);
            let mut out = secure_hdr0(&self.crypto, enc, &iht_opt, &sh)?;
            let tag = self.crypto.aes_gcm_encrypt(&sh.key, &sh.iv, &[], &mut region)?;
            out.extend_from_slice(&region);
            out.extend_from_slice(&tag);
            region = out;
        }

        if let (Some(auth), Some(ofst)) = (&config.metaheader_auth, meta_ac_ofst) {
            let mut ac = certificate(&self.crypto, auth)?;
            let digest = self.crypto.sha3_digest(&[&iht_opt])?;
            let sig = self.crypto.ecdsa384_sign(&digest, &auth.spk)?;
            ac.header_signature[..sig.len()].copy_from_slice(&sig);
            sign_partition(&self.crypto, auth, &mut ac, &region)?;
            image[ofst..ofst + AC_BYTE_SIZE].copy_from_slice(ac.as_bytes());
        }

        // Assembly
        image[..SMAP_BUS_WIDTH_LEN].copy_from_slice(SMAP_BUS_WIDTH.as_bytes());
        if config.full {
            let bh = Self::boot_header(config, iht_ofst)?;
            image[..BOOT_HEADER_BYTE_SIZE].copy_from_slice(bh.as_bytes());
        }
        image[iht_ofst..iht_ofst + iht_opt.len()].copy_from_slice(&iht_opt);
        image[hdr_ofst..hdr_ofst + region.len()].copy_from_slice(&region);
        for place in &placements {
            let media = &place.encoded.media;
            if let (Some(ac), Some(ofst)) = (&place.encoded.ac, place.ac_ofst) {
                image[ofst..ofst + AC_BYTE_SIZE].copy_from_slice(ac.as_bytes());
            }
            if let (Some(hash), Some(ofst)) = (&place.encoded.checksum, place.checksum_ofst) {
                image[ofst..ofst + SHA3_DIGEST_BYTE_SIZE].copy_from_slice(hash);
            }
            image[place.data_ofst..place.data_ofst + media.len()].copy_from_slice(media);
        }

        Ok(GeneratedPdi {
            image,
            iht_ofst,
            iht,
            img_hdrs,
            prtn_hdrs,
            hdr_ofst,
            prtn_data_ofst: placements.iter().map(|p| p.data_ofst).collect(),
        })
    }

    fn partition_headers(
        &self,
        config: &PdiConfig,
        placements: &[PartitionPlacement],
    ) -> anyhow::Result<Vec<PartitionHeader>> {
        let prtns = config.images.iter().flat_map(|img| img.partitions.iter());
        let mut hdrs = Vec::with_capacity(placements.len());
        for (prtn, place) in prtns.zip(placements) {
            let mut attr = (prtn.dst_cpu << PH_ATTR_DSTN_CPU_SHIFT) & PH_ATTR_DSTN_CPU_MASK;
            attr |= (prtn.dst_device << PH_ATTR_DSTN_DEVICE_SHIFT) & PH_ATTR_DSTN_DEVICE_MASK;
            attr |= (prtn.exception_level << PH_ATTR_EL_SHIFT) & PH_ATTR_EL_MASK;
            if prtn.a32 {
                attr |= PH_ATTR_A32;
            }
            if prtn.trustzone {
                attr |= PH_ATTR_TZ;
            }
            if place.checksum_ofst.is_some() {
                attr |= ChecksumType::SHA3_ENCODING << PH_ATTR_CHECKSUM_SHIFT;
            }
            let mut ph = PartitionHeader {
                enc_data_word_len: words(place.encoded.enc_len),
                unenc_data_word_len: words(place.encoded.unenc_len),
                total_data_word_len: words(place.encoded.media.len()),
                dst_exec_addr: prtn.exec_addr,
                dst_load_addr: prtn.load_addr,
                data_word_ofst: words(place.data_ofst),
                section_count: 1,
                checksum_word_ofst: place.checksum_ofst.map_or(0, words),
                prtn_id: prtn.prtn_id,
                auth_cert_word_ofst: place.ac_ofst.map_or(0, words),
                ..Default::default()
            };
            if let Some(enc) = &prtn.enc {
                if enc.key_src == 0 {
                    bail!("Encrypted partition 0x{:08x} without key source", prtn.prtn_id);
                }
                if enc.dpa_cm {
                    attr |= PH_ATTR_DPA_CM_MASK;
                }
                if enc.puf_hd_in_bh {
                    attr |= PH_ATTR_PUF_HD_MASK;
                }
                ph.prtn_iv = enc.iv;
                ph.enc_status = enc.key_src;
                ph.kek_iv = enc.kek_iv;
                ph.enc_revoke_id = enc.revoke_id;
            }
            ph.prtn_attr = attr;
            ph.checksum = ph.calc_checksum();
            hdrs.push(ph);
        }
        Ok(hdrs)
    }

    fn image_headers(config: &PdiConfig) -> Vec<ImageHeader> {
        let mut first_prtn_hdr = 0;
        config
            .images
            .iter()
            .map(|img| {
                let mut ih = ImageHeader {
                    first_prtn_hdr,
                    no_of_prtns: img.partitions.len() as u32,
                    img_id: img.img_id,
                    uid: img.uid,
                    puid: img.puid,
                    func_id: img.func_id,
                    ..Default::default()
                };
                let name = img.name.as_bytes();
                let len = name.len().min(IMG_NAME_LEN);
                ih.img_name[..len].copy_from_slice(&name[..len]);
                if img.delay_load {
                    ih.img_attr |= IH_ATTR_DELAY_LOAD;
                }
                if img.delay_handoff {
                    ih.img_attr |= IH_ATTR_DELAY_HANDOFF;
                }
                ih.checksum = ih.calc_checksum();
                first_prtn_hdr += ih.no_of_prtns;
                ih
            })
            .collect()
    }

    fn image_header_table(
        config: &PdiConfig,
        hdr_ofst: usize,
        region_len: usize,
        ac_ofst: Option<usize>,
    ) -> ImageHeaderTable {
        let no_of_prtns: usize = config.images.iter().map(|img| img.partitions.len()).sum();
        let mut attr = config.attr & !IHT_ATTR_SBD_MASK;
        attr |= (config.sbd_mode << IHT_ATTR_SBD_SHIFT) & IHT_ATTR_SBD_MASK;
        let mut iht = ImageHeaderTable {
            version: config.version,
            no_of_imgs: config.images.len() as u32,
            img_hdr_addr: words(hdr_ofst),
            no_of_prtns: no_of_prtns as u32,
            prtn_hdr_addr: words(hdr_ofst + config.images.len() * IH_BYTE_SIZE),
            sbd_addr: config.sbd_addr,
            idcode: config.idcode,
            pdi_id: config.pdi_id,
            ident: if config.full {
                IHT_FPDI_IDENT
            } else {
                IHT_PPDI_IDENT
            },
            ext_idcode: config.ext_idcode,
            total_hdr_len: words(region_len),
            ac_offset: ac_ofst.map_or(0, words),
            optional_data_len: words(config.optional_data.len()),
            ..Default::default()
        };
        if let Some(enc) = &config.metaheader_enc {
            if enc.dpa_cm {
                attr |= IHT_ATTR_DPA_CM_MASK;
            }
            if enc.puf_hd_in_bh {
                attr |= IHT_ATTR_PUF_HD_MASK;
            }
            iht.hdr_iv = enc.iv;
            iht.enc_key_src = enc.key_src;
            iht.kek_iv = enc.kek_iv;
        }
        iht.attr = attr;
        iht.checksum = iht.calc_checksum();
        iht
    }

    fn boot_header(config: &PdiConfig, iht_ofst: usize) -> anyhow::Result<BootHeader> {
        let cfg = &config.boot_header;
        let mut bh = BootHeader::new_zeroed();
        bh.smap_bus_width = SMAP_BUS_WIDTH;
        bh.width_detection = BH_WIDTH_DETECTION;
        bh.image_ident = BH_IMAGE_IDENT;
        bh.enc_status = match (&config.metaheader_enc, cfg.enc_status) {
            (Some(enc), 0) => enc.key_src,
            (_, status) => status,
        };
        if cfg.bh_auth {
            bh.img_attrb |= BH_ATTR_AUTH_MASK;
        }
        if cfg.dpa_cm {
            bh.img_attrb |= BH_ATTR_DPA_CM_MASK;
        }
        if cfg.puf_hd_in_bh {
            bh.img_attrb |= BH_ATTR_PUF_HD_MASK;
        }
        for (word, bytes) in bh.black_key.iter_mut().zip(cfg.black_key.chunks_exact(WORD_LEN)) {
            *word = u32::read_from(bytes).unwrap_or_default();
        }
        bh.black_iv = cfg.black_iv;
        bh.puf_chash = cfg.puf_chash;
        bh.puf_aux = cfg.puf_aux;
        if let Some(hd) = &cfg.puf_hd {
            if hd.len() > BH_PUF_HD_LEN {
                bail!("PUF helper data exceeds {} bytes", BH_PUF_HD_LEN);
            }
            bh.puf_hd[..hd.len()].copy_from_slice(hd);
        }
        bh.meta_hdr_ofst = iht_ofst as u32;
        bh.checksum = bh.calc_checksum();
        Ok(bh)
    }
}
