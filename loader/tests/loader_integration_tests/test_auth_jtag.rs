// Licensed under the Apache-2.0 license

use crate::common::*;
use xloader::AuthJtag;
use xloader_drivers::memory_layout::AUTH_JTAG_DATA_ORG;
use xloader_drivers::{FuseBank, SecCtrl};
use xloader_error::LoaderError;
use xloader_image_gen::{auth_jtag_message, ppk_hash, EccPrivKey, SoftGenCrypto};
use xloader_image_types::{AuthJtagMessage, AUTH_JTAG_MSG_BYTE_SIZE};
use zerocopy::AsBytes;

fn ppk() -> EccPrivKey {
    let mut ppk = [0u8; 48];
    ppk[0] = 0x21;
    ppk[47] = 0x05;
    ppk
}

fn provisioned_fuses() -> FuseBank {
    let mut fuses = FuseBank::default();
    fuses.ppk_hash[0] = ppk_hash(&SoftGenCrypto::new(), &ppk()).unwrap();
    fuses
}

fn message(revoke_id: u32, dna: Option<[u32; 4]>, timeout: u32) -> AuthJtagMessage {
    auth_jtag_message(&SoftGenCrypto::new(), &ppk(), revoke_id, dna, timeout).unwrap()
}

fn bad_signature() -> AuthJtagMessage {
    let mut msg = message(0, None, 5);
    msg.enable_jtag_signature[0] ^= 0x01;
    msg
}

fn loader_with(fuses: FuseBank) -> TestLoader {
    Fixture {
        fuses,
        ..Default::default()
    }
    .build()
}

/// Places a request in the message buffer and raises the interrupt
fn request(loader: &TestLoader, msg: &AuthJtagMessage) {
    loader.write(AUTH_JTAG_DATA_ORG, msg.as_bytes());
    loader.log.lock().unwrap().jtag_irq = true;
}

fn debug_access(loader: &TestLoader) -> Option<bool> {
    loader.log.lock().unwrap().debug_access
}

#[test]
fn test_unlock_then_timeout() {
    let fuses = provisioned_fuses();
    assert!(AuthJtag::is_scheduled(&fuses));
    let loader = loader_with(fuses);

    request(&loader, &message(0, None, 3));
    loader.ctx.poll_auth_jtag().unwrap();
    assert_eq!(debug_access(&loader), Some(true));
    assert_eq!(
        loader.read(AUTH_JTAG_DATA_ORG, AUTH_JTAG_MSG_BYTE_SIZE),
        vec![0; AUTH_JTAG_MSG_BYTE_SIZE]
    );
    assert_eq!(loader.ctx.lock().unwrap().auth_jtag.remaining(), 3);

    loader.ctx.poll_auth_jtag().unwrap();
    loader.ctx.poll_auth_jtag().unwrap();
    assert_eq!(
        loader.ctx.poll_auth_jtag(),
        Err(LoaderError::AUTH_JTAG_DAP_TIMEOUT_DISABLED)
    );
    assert_eq!(debug_access(&loader), Some(false));

    // Closed port stays quiet
    loader.ctx.poll_auth_jtag().unwrap();
}

#[test]
fn test_zero_timeout_uses_default() {
    let loader = loader_with(provisioned_fuses());
    request(&loader, &message(0, None, 0));
    loader.ctx.poll_auth_jtag().unwrap();
    assert_eq!(
        loader.ctx.lock().unwrap().auth_jtag.remaining(),
        xloader::AUTH_JTAG_DEFAULT_TIMEOUT
    );
}

#[test]
fn test_dna_must_match() {
    let mut fuses = provisioned_fuses();
    fuses.dna = [0x10, 0x20, 0x30, 0x40];
    let loader = loader_with(fuses);

    request(&loader, &message(0, Some([1, 2, 3, 4]), 5));
    assert_eq!(
        loader.ctx.poll_auth_jtag(),
        Err(LoaderError::AUTH_JTAG_INVALID_DNA)
    );
    assert_eq!(debug_access(&loader), Some(false));

    request(&loader, &message(0, Some([0x10, 0x20, 0x30, 0x40]), 5));
    loader.ctx.poll_auth_jtag().unwrap();
    assert_eq!(debug_access(&loader), Some(true));
}

#[test]
fn test_repeated_failures_lock_out() {
    let loader = loader_with(provisioned_fuses());

    request(&loader, &bad_signature());
    assert_eq!(
        loader.ctx.poll_auth_jtag(),
        Err(LoaderError::AUTH_JTAG_SIGNATURE_FAIL)
    );
    request(&loader, &bad_signature());
    assert_eq!(
        loader.ctx.poll_auth_jtag(),
        Err(LoaderError::AUTH_JTAG_LOCKOUT)
    );

    // Even a valid request is refused once locked
    request(&loader, &message(0, None, 5));
    assert_eq!(
        loader.ctx.poll_auth_jtag(),
        Err(LoaderError::AUTH_JTAG_LOCKOUT)
    );
    assert_eq!(debug_access(&loader), Some(false));
    assert!(loader.ctx.lock().unwrap().auth_jtag.is_locked());
}

#[test]
fn test_lock_fuse_locks_on_first_failure() {
    let mut fuses = provisioned_fuses();
    fuses.sec_ctrl |= SecCtrl::AUTH_JTAG_LOCK_DIS;
    let loader = loader_with(fuses);

    request(&loader, &bad_signature());
    assert_eq!(
        loader.ctx.poll_auth_jtag(),
        Err(LoaderError::AUTH_JTAG_LOCKOUT)
    );
}

#[test]
fn test_disabled_by_fuse() {
    let mut fuses = provisioned_fuses();
    fuses.sec_ctrl |= SecCtrl::AUTH_JTAG_DIS;
    assert!(!AuthJtag::is_scheduled(&fuses));
    let loader = loader_with(fuses);

    request(&loader, &message(0, None, 5));
    assert_eq!(
        loader.ctx.poll_auth_jtag(),
        Err(LoaderError::AUTH_JTAG_DISABLED)
    );
}

#[test]
fn test_requires_provisioned_ppk() {
    assert!(!AuthJtag::is_scheduled(&FuseBank::default()));
    let loader = loader_with(FuseBank::default());

    request(&loader, &message(0, None, 5));
    assert_eq!(
        loader.ctx.poll_auth_jtag(),
        Err(LoaderError::AUTH_JTAG_EFUSE_AUTH_COMPULSORY)
    );
    assert_eq!(debug_access(&loader), Some(false));
}

#[test]
fn test_revoked_id_is_refused() {
    let mut fuses = provisioned_fuses();
    fuses.revoke(3).unwrap();
    let loader = loader_with(fuses);

    request(&loader, &message(3, None, 5));
    assert_eq!(
        loader.ctx.poll_auth_jtag(),
        Err(LoaderError::POLICY_ID_REVOKED)
    );
}

#[test]
fn test_unknown_ppk_is_refused() {
    let mut fuses = FuseBank::default();
    fuses.ppk_hash[0] = [0xA5; 32];
    let loader = loader_with(fuses);

    request(&loader, &message(0, None, 5));
    assert!(loader.ctx.poll_auth_jtag().is_err());
    assert_eq!(debug_access(&loader), Some(false));
}
