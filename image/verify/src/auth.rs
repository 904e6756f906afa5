/*++

Licensed under the Apache-2.0 license.

File Name:

    auth.rs

Abstract:

    File contains the authentication chain: PPK selection against the
    eFuse rows, the SPK signature, SPK revocation and the final data
    signature.

--*/

use crate::env::kat_gated;
use crate::policy::PolicyChecker;
use xloader_drivers::{
    cprintln, CryptoAdapter, EccCurve, EccPubKey, EccSignature, FuseBank, KatStatus, NeedsKat,
    RsaPubKey,
};
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::{
    AuthAlgorithm, AuthCertificate, RsaKeySlot, PPK_EFUSE_HASH_LEN, RSA_4096_BYTE_SIZE,
};
use zerocopy::FromBytes;

/// Verify `sig` over `digest` with the public key stored in `key_slot`.
///
/// # Arguments
///
/// * `crypto` - KAT-gated crypto adapter
/// * `algo` - Algorithm selected by the authentication header
/// * `key_slot` - PPK or SPK slot of a certificate
/// * `digest` - SHA3-384 digest of the signed data
/// * `sig` - Signature slot
pub fn verify_signature(
    crypto: &mut NeedsKat<Box<dyn CryptoAdapter>>,
    algo: AuthAlgorithm,
    key_slot: &[u8],
    digest: &[u8],
    sig: &[u8],
) -> LoaderResult<()> {
    match algo {
        AuthAlgorithm::Rsa4096 => {
            let slot = RsaKeySlot::read_from_prefix(key_slot)
                .ok_or(LoaderError::CRYPTO_RSA_INVALID_KEY)?;
            let sig = sig
                .get(..RSA_4096_BYTE_SIZE)
                .ok_or(LoaderError::CRYPTO_RSA_PSS_VERIFY_FAILURE)?;
            let key = RsaPubKey {
                modulus: &slot.modulus,
                exponent: slot.exponent,
            };
            kat_gated(crypto, KatStatus::RSA)?.rsa_pss_verify(&key, digest, sig)
        }
        AuthAlgorithm::EcdsaP384 | AuthAlgorithm::EcdsaP521 => {
            let (curve, kat) = if algo == AuthAlgorithm::EcdsaP384 {
                (EccCurve::P384, KatStatus::ECDSA_P384)
            } else {
                (EccCurve::P521, KatStatus::ECDSA_P521)
            };
            let len = curve.size();
            let point = key_slot
                .get(..2 * len)
                .ok_or(LoaderError::CRYPTO_ECDSA_INVALID_KEY)?;
            let rs = sig
                .get(..2 * len)
                .ok_or(LoaderError::CRYPTO_ECDSA_VERIFY_FAILURE)?;
            let (x, y) = point.split_at(len);
            let (r, s) = rs.split_at(len);
            kat_gated(crypto, kat)?.ecdsa_verify(
                curve,
                &EccPubKey { x, y },
                digest,
                &EccSignature { r, s },
            )
        }
    }
}

/// Hash a PPK slot and select the eFuse slot that trusts it.
///
/// # Returns
///
/// * Index of the matching PPK slot
pub fn verify_ppk(
    crypto: &mut NeedsKat<Box<dyn CryptoAdapter>>,
    fuses: &FuseBank,
    ppk_slot: &[u8],
) -> LoaderResult<usize> {
    let hash = kat_gated(crypto, KatStatus::SHA3)?.sha3_digest(&[ppk_slot])?;
    PolicyChecker::new(fuses).select_ppk(&hash[..PPK_EFUSE_HASH_LEN])
}

/// Authenticate data through the certificate chain.
///
/// The PPK is checked against eFuses and the SPK id against the
/// revocation bitmap unless the device authenticates through the boot
/// header, in which case the PPK in the certificate is trusted as is.
///
/// # Arguments
///
/// * `crypto` - KAT-gated crypto adapter
/// * `fuses` - eFuse bank
/// * `bh_auth` - Boot header authentication is in effect
/// * `ac` - Authentication certificate
/// * `digest` - SHA3-384 digest of the signed data
/// * `sig` - Header or partition signature of `ac`
/// * `fail_err` - Error reported when the final signature does not verify
pub fn data_auth(
    crypto: &mut NeedsKat<Box<dyn CryptoAdapter>>,
    fuses: &FuseBank,
    bh_auth: bool,
    ac: &AuthCertificate,
    digest: &[u8],
    sig: &[u8],
    fail_err: LoaderError,
) -> LoaderResult<()> {
    let algo = ac.algorithm()?;

    if !bh_auth {
        verify_ppk(crypto, fuses, &ac.ppk)?;
    }

    let spk_digest =
        kat_gated(crypto, KatStatus::SHA3)?.sha3_digest(&[ac.spk_hdr_bytes(), &ac.spk])?;
    verify_signature(crypto, algo, &ac.ppk, &spk_digest, &ac.spk_signature).map_err(|_| {
        cprintln!("[auth] SPK signature verification failed");
        LoaderError::SECURE_SPK_SIGNATURE_FAIL
    })?;

    if !bh_auth {
        PolicyChecker::new(fuses).verify_revoke_id(ac.spk_id)?;
    }

    verify_signature(crypto, algo, &ac.spk, digest, sig).map_err(|_| fail_err)
}
