/*++

Licensed under the Apache-2.0 license.

File Name:

   lib.rs

Abstract:

    File contains data structures for the PDI generator used to build
    test images.

--*/

mod crypto;
mod generator;
mod partition;

pub use crypto::SoftGenCrypto;
pub use generator::{GeneratedPdi, PdiGenerator};
pub use partition::{encode_partition, EncodedPartition};

use xloader_image_types::*;

/// ECDSA P-384 private scalar, big-endian
pub type EccPrivKey = [u8; ECC_P384_BYTE_SIZE];

/// PDI Generator Crypto Trait
pub trait PdiGeneratorCrypto {
    /// Calculate SHA3-384 digest over the concatenation of `data`
    fn sha3_digest(&self, data: &[&[u8]]) -> anyhow::Result<Sha3Digest>;

    /// Public key `x | y` of a private key
    fn ecdsa384_pub_key(&self, priv_key: &EccPrivKey) -> anyhow::Result<[u8; 2 * ECC_P384_BYTE_SIZE]>;

    /// Calculate ECDSA signature `r | s` over a prehashed digest
    fn ecdsa384_sign(
        &self,
        digest: &Sha3Digest,
        priv_key: &EccPrivKey,
    ) -> anyhow::Result<[u8; 2 * ECC_P384_BYTE_SIZE]>;

    /// Encrypt `data` in place, returning the tag
    fn aes_gcm_encrypt(
        &self,
        key: &AesKey,
        iv: &AesIv,
        aad: &[u8],
        data: &mut [u8],
    ) -> anyhow::Result<[u8; GCM_TAG_BYTE_SIZE]>;
}

/// Keys of one authentication certificate
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub ppk: EccPrivKey,
    pub spk: EccPrivKey,
    pub spk_id: u32,
}

/// Encryption of the metaheader or of a partition
#[derive(Clone, Debug)]
pub struct EncryptionConfig {
    /// Key source selector written to the header
    pub key_src: u32,
    /// Red key behind the key source
    pub key: AesKey,
    /// IV of the first secure header
    pub iv: [u32; 3],
    /// IV the black key was wrapped under
    pub kek_iv: [u32; 3],
    pub revoke_id: u32,
    pub dpa_cm: bool,
    pub puf_hd_in_bh: bool,
    /// Seed of the per-block keys and IVs
    pub seed: u64,
}

impl EncryptionConfig {
    pub fn new(key_src: u32, key: AesKey) -> Self {
        Self {
            key_src,
            key,
            iv: [0x1122_3344, 0x5566_7788, 0x0000_0010],
            kek_iv: [0; 3],
            revoke_id: 0,
            dpa_cm: true,
            puf_hd_in_bh: false,
            seed: 0x5EED,
        }
    }
}

/// One partition of an image
#[derive(Clone, Debug, Default)]
pub struct PartitionConfig {
    pub data: Vec<u8>,
    pub load_addr: u64,
    pub exec_addr: u64,
    pub prtn_id: u32,
    pub dst_device: u32,
    pub dst_cpu: u32,
    pub exception_level: u32,
    pub a32: bool,
    pub trustzone: bool,
    pub auth: Option<AuthConfig>,
    pub enc: Option<EncryptionConfig>,
    pub checksum: bool,
}

/// One image of a PDI
#[derive(Clone, Debug, Default)]
pub struct ImageConfig {
    pub name: String,
    pub img_id: u32,
    pub uid: u32,
    pub puid: u32,
    pub func_id: u32,
    pub delay_load: bool,
    pub delay_handoff: bool,
    pub partitions: Vec<PartitionConfig>,
}

/// Boot header settings of a full PDI
#[derive(Clone, Debug, Default)]
pub struct BootHeaderConfig {
    pub bh_auth: bool,
    pub dpa_cm: bool,
    pub puf_hd_in_bh: bool,
    /// Key source of the boot loader, taken from the metaheader when zero
    pub enc_status: u32,
    pub black_key: AesKey,
    pub black_iv: [u32; 3],
    pub puf_hd: Option<Vec<u8>>,
    pub puf_chash: u32,
    pub puf_aux: u32,
}

/// PDI Generator Configuration
#[derive(Clone, Debug)]
pub struct PdiConfig {
    /// Full PDI with a boot header, or partial PDI
    pub full: bool,
    pub boot_header: BootHeaderConfig,
    pub version: u32,
    pub pdi_id: u32,
    pub idcode: u32,
    pub ext_idcode: u32,
    /// Extra table attribute bits such as the IDCODE bypasses
    pub attr: u32,
    pub sbd_mode: u32,
    pub sbd_addr: u32,
    /// Secure chunk size the loader is configured with
    pub chunk_size: usize,
    pub optional_data: Vec<u8>,
    pub metaheader_auth: Option<AuthConfig>,
    pub metaheader_enc: Option<EncryptionConfig>,
    pub images: Vec<ImageConfig>,
}

impl Default for PdiConfig {
    fn default() -> Self {
        Self {
            full: false,
            boot_header: BootHeaderConfig::default(),
            version: IHT_MIN_SECURE_VERSION,
            pdi_id: 0x0000_0001,
            idcode: 0,
            ext_idcode: 0,
            attr: IHT_ATTR_BYPASS_IDCODE,
            sbd_mode: 0,
            sbd_addr: 0,
            chunk_size: 0x8000,
            optional_data: Vec::new(),
            metaheader_auth: None,
            metaheader_enc: None,
            images: Vec::new(),
        }
    }
}

/// Public key slot of a certificate for `priv_key`
pub fn ecc_key_slot<C: PdiGeneratorCrypto>(
    crypto: &C,
    priv_key: &EccPrivKey,
) -> anyhow::Result<[u8; AC_KEY_SLOT_LEN]> {
    let mut slot = [0u8; AC_KEY_SLOT_LEN];
    let point = crypto.ecdsa384_pub_key(priv_key)?;
    slot[..point.len()].copy_from_slice(&point);
    Ok(slot)
}

/// Value programmed into a PPK hash eFuse row to trust `ppk`
pub fn ppk_hash<C: PdiGeneratorCrypto>(
    crypto: &C,
    ppk: &EccPrivKey,
) -> anyhow::Result<[u8; PPK_EFUSE_HASH_LEN]> {
    let digest = crypto.sha3_digest(&[&ecc_key_slot(crypto, ppk)?])?;
    let mut hash = [0u8; PPK_EFUSE_HASH_LEN];
    hash.copy_from_slice(&digest[..PPK_EFUSE_HASH_LEN]);
    Ok(hash)
}

/// Wrap a red key under the PUF KEK of a device.
///
/// # Arguments
///
/// * `crypto` - Generator crypto
/// * `puf_secret` - Device secret behind the PUF
/// * `syndrome` - PUF helper data
/// * `chash` - PUF CHASH word
/// * `aux` - PUF AUX word
/// * `iv` - Wrapping IV
/// * `red` - Key to wrap
pub fn wrap_black_key<C: PdiGeneratorCrypto>(
    crypto: &C,
    puf_secret: &AesKey,
    syndrome: &[u8],
    chash: u32,
    aux: u32,
    iv: &AesIv,
    red: &AesKey,
) -> anyhow::Result<AesKey> {
    let digest = crypto.sha3_digest(&[
        puf_secret,
        syndrome,
        &chash.to_le_bytes(),
        &aux.to_le_bytes(),
    ])?;
    let mut kek = [0u8; AES_KEY_BYTE_SIZE];
    kek.copy_from_slice(&digest[..AES_KEY_BYTE_SIZE]);
    let mut black = *red;
    crypto.aes_gcm_encrypt(&kek, iv, &[], &mut black)?;
    Ok(black)
}

/// Build a signed authenticated JTAG enable request
pub fn auth_jtag_message<C: PdiGeneratorCrypto>(
    crypto: &C,
    ppk: &EccPrivKey,
    revoke_id: u32,
    dna: Option<[u32; 4]>,
    timeout: u32,
) -> anyhow::Result<AuthJtagMessage> {
    let mut msg = AuthJtagMessage {
        auth_hdr: AuthAlgorithm::EcdsaP384.auth_hdr(),
        revoke_id_msg_type: revoke_id & AuthJtagMessage::REVOKE_ID_MASK,
        jtag_enable_timeout: timeout,
        ppk: ecc_key_slot(crypto, ppk)?,
        ..Default::default()
    };
    if let Some(dna) = dna {
        msg.attrb |= AuthJtagMessage::ATTR_DNA_CHECK;
        msg.dna = dna;
    }
    let digest = crypto.sha3_digest(&[msg.signed_bytes()])?;
    let sig = crypto.ecdsa384_sign(&digest, ppk)?;
    msg.enable_jtag_signature[..sig.len()].copy_from_slice(&sig);
    Ok(msg)
}
