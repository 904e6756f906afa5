/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains exports for the loader Known Answer Tests.

--*/

mod aes256gcm_kat;
mod ecdsa_kat;
mod rsa_kat;
mod sha3_kat;

pub use aes256gcm_kat::Aes256GcmKat;
pub use ecdsa_kat::{EcdsaP384Kat, EcdsaP521Kat};
pub use rsa_kat::Rsa4096Kat;
pub use sha3_kat::Sha3Kat;

use xloader_drivers::{cprintln, CryptoAdapter, KatStatus, NeedsKat};
use xloader_error::LoaderResult;

/// Run the known-answer test of every family in `kats` that has not passed
/// yet, in a fixed order. Stops at the first failure.
///
/// # Arguments
///
/// * `crypto` - KAT-gated crypto adapter
/// * `kats` - Families about to be used
pub fn run_kats(
    crypto: &mut NeedsKat<Box<dyn CryptoAdapter>>,
    kats: KatStatus,
) -> LoaderResult<()> {
    type Kat = fn(&mut dyn CryptoAdapter) -> LoaderResult<()>;
    let table: [(KatStatus, Kat); 5] = [
        (KatStatus::SHA3, |c| Sha3Kat::default().execute(c)),
        (KatStatus::AES_GCM, |c| Aes256GcmKat::default().execute(c)),
        (KatStatus::RSA, |c| Rsa4096Kat::default().execute(c)),
        (KatStatus::ECDSA_P384, |c| EcdsaP384Kat::default().execute(c)),
        (KatStatus::ECDSA_P521, |c| EcdsaP521Kat::default().execute(c)),
    ];

    for (family, kat) in table {
        if !kats.contains(family) || crypto.is_kat_run(family) {
            continue;
        }
        crypto.run_kat(family, |c| kat(c.as_mut()))?;
        cprintln!("[kat] 0x{:02x} passed", family.bits());
    }
    Ok(())
}
