/*++

Licensed under the Apache-2.0 license.

File Name:

    key_select.rs

Abstract:

    File contains the key source resolution. Red sources name a loaded
    key register; black sources are unwrapped under the PUF KEK once per
    session and cached in a decrypted key register.

--*/

use crate::env::{kat_gated, SecureEnv};
use xloader_drivers::{cprintln, KatStatus, KeySlot, PufHelperData};
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::{AesIv, KeySource};
use zeroize::Zeroize;

/// Resolve the key register holding the red key of `src`.
///
/// # Arguments
///
/// * `env` - Secure environment
/// * `src` - Key source from a header
/// * `kek_iv` - IV the black key was wrapped under
/// * `puf_hd_in_bh` - PUF helper data lives in the boot header
///
/// # Returns
///
/// * Key register to decrypt with
pub fn resolve_key(
    env: &mut SecureEnv,
    src: KeySource,
    kek_iv: &AesIv,
    puf_hd_in_bh: bool,
) -> LoaderResult<KeySlot> {
    let slot = KeySlot::for_source(src);
    let Some(bit) = src.red_cache_bit() else {
        if !env.keys.is_loaded(slot) {
            Err(LoaderError::CRYPTO_AES_KEY_NOT_LOADED)?;
        }
        return Ok(slot);
    };

    if *env.red_key_cache & bit != 0 && env.keys.is_loaded(slot) {
        return Ok(slot);
    }

    let (mut black, iv) = match KeySlot::black_source(src) {
        Some(wrapped) => (*env.keys.key(wrapped)?, *kek_iv),
        None => (
            env.boot_header.black_key_bytes(),
            env.boot_header.black_iv_bytes(),
        ),
    };

    let helper = if puf_hd_in_bh {
        PufHelperData {
            syndrome: &env.boot_header.puf_hd,
            chash: env.boot_header.puf_chash,
            aux: env.boot_header.puf_aux,
        }
    } else {
        PufHelperData {
            syndrome: &env.fuses.puf_hd,
            chash: env.fuses.puf_chash,
            aux: env.fuses.puf_aux,
        }
    };

    let mut kek = kat_gated(env.crypto, KatStatus::SHA3)?.puf_regenerate(&helper)?;
    env.keys.write_key(KeySlot::PufKek, &kek)?;
    kek.zeroize();

    let result = kat_gated(env.crypto, KatStatus::AES_GCM).and_then(|aes| {
        let kek = env.keys.key(KeySlot::PufKek)?;
        let mut red = aes.aes_kek_unwrap(kek, &iv, &black)?;
        let written = env.keys.write_key(slot, &red);
        red.zeroize();
        written
    });
    black.zeroize();
    env.keys.clear_key(KeySlot::PufKek)?;
    result.map_err(|err| {
        cprintln!("[keys] Black key unwrap failed 0x{:08x}", u32::from(err));
        err
    })?;

    *env.red_key_cache |= bit;
    Ok(slot)
}
