/*++

Licensed under the Apache-2.0 license.

File Name:

    auth_jtag.rs

Abstract:

    File contains the authenticated JTAG task. A signed request rooted in
    the eFuse PPK opens the debug port for a bounded number of polls.

--*/

use crate::LoaderState;
use xloader_drivers::memory_layout::AUTH_JTAG_DATA_ORG;
use xloader_drivers::{cprintln, ErrorDisplay, FuseBank, KatStatus};
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::{read_header, AuthAlgorithm, AuthJtagMessage, AUTH_JTAG_MSG_BYTE_SIZE};
use xloader_image_verify::{kat_gated, verify_ppk, verify_signature, PolicyChecker};
use zeroize::Zeroize;

/// Unlock state of the debug port
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuthJtag {
    failures: u32,
    enabled: bool,
    /// Polls left before the port closes again
    remaining: u32,
    locked: bool,
}

impl AuthJtag {
    pub fn new() -> Self {
        Self::default()
    }

    /// The task only runs on devices with eFuse authentication enabled
    pub fn is_scheduled(fuses: &FuseBank) -> bool {
        !fuses.is_auth_jtag_disabled() && PolicyChecker::new(fuses).check_non_zero_ppk()
    }

    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    fn enable(&mut self, timeout: u32) {
        self.enabled = true;
        self.remaining = timeout;
    }

    fn disable(&mut self) {
        self.enabled = false;
        self.remaining = 0;
    }

    /// Counts a failed attempt.
    ///
    /// # Returns
    ///
    /// * `true` once the attempts are used up and the task locks out
    fn record_failure(&mut self, max_attempts: u32, lock_fuse: bool) -> bool {
        self.failures = self.failures.saturating_add(1);
        self.disable();
        if self.failures > max_attempts || (lock_fuse && self.failures >= max_attempts) {
            self.locked = true;
        }
        self.locked
    }

    /// Counts down one poll of an open port.
    ///
    /// # Returns
    ///
    /// * `true` when the port has just timed out
    fn tick(&mut self) -> bool {
        if !self.enabled {
            return false;
        }
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.disable();
            return true;
        }
        false
    }
}

fn authenticate(state: &mut LoaderState, msg: &AuthJtagMessage) -> LoaderResult<u32> {
    if state.fuses.is_auth_jtag_disabled() {
        Err(LoaderError::AUTH_JTAG_DISABLED)?;
    }
    let policy = PolicyChecker::new(&state.fuses);
    if !policy.check_non_zero_ppk() {
        Err(LoaderError::AUTH_JTAG_EFUSE_AUTH_COMPULSORY)?;
    }
    verify_ppk(&mut state.crypto, &state.fuses, &msg.ppk)?;
    policy.verify_revoke_id(msg.revoke_id())?;
    if msg.dna_check() && msg.dna != state.fuses.dna {
        Err(LoaderError::AUTH_JTAG_INVALID_DNA)?;
    }

    let algo = AuthAlgorithm::from_auth_hdr(msg.auth_hdr)?;
    let digest = kat_gated(&mut state.crypto, KatStatus::SHA3)?.sha3_digest(&[msg.signed_bytes()])?;
    verify_signature(
        &mut state.crypto,
        algo,
        &msg.ppk,
        &digest,
        &msg.enable_jtag_signature,
    )
    .map_err(|_| LoaderError::AUTH_JTAG_SIGNATURE_FAIL)?;

    Ok(match msg.jtag_enable_timeout {
        0 => state.config.auth_jtag_default_timeout,
        timeout => timeout,
    })
}

fn handle_request(state: &mut LoaderState) -> LoaderResult<()> {
    let mut msg: AuthJtagMessage =
        read_header(state.mem.slice(AUTH_JTAG_DATA_ORG, AUTH_JTAG_MSG_BYTE_SIZE)?)?;
    let result = authenticate(state, &msg);
    msg.zeroize();
    state.mem.clear(AUTH_JTAG_DATA_ORG, AUTH_JTAG_MSG_BYTE_SIZE)?;

    match result {
        Ok(timeout) => {
            state.platform.set_debug_access(true);
            state.auth_jtag.enable(timeout);
            cprintln!("[auth-jtag] JTAG enabled for {} polls", timeout);
            Ok(())
        }
        Err(err) => {
            state.platform.set_debug_access(false);
            let lock_fuse = state.fuses.is_auth_jtag_lock_enabled();
            let max = state.config.auth_jtag_max_attempts;
            cprintln!("[auth-jtag] Request rejected: {}", ErrorDisplay(err));
            if state.auth_jtag.record_failure(max, lock_fuse) {
                cprintln!("[auth-jtag] Attempts exhausted, locked out");
                Err(LoaderError::AUTH_JTAG_LOCKOUT)?;
            }
            Err(err)
        }
    }
}

/// One run of the periodic task.
///
/// # Returns
///
/// * `LoaderError::AUTH_JTAG_LOCKOUT` once attempts are exhausted
/// * `LoaderError::AUTH_JTAG_DAP_TIMEOUT_DISABLED` when an open port times out
pub(crate) fn poll(state: &mut LoaderState) -> LoaderResult<()> {
    if state.auth_jtag.is_locked() {
        Err(LoaderError::AUTH_JTAG_LOCKOUT)?;
    }
    if !state.platform.take_auth_jtag_irq() {
        if state.auth_jtag.tick() {
            state.platform.set_debug_access(false);
            cprintln!("[auth-jtag] JTAG timed out");
            Err(LoaderError::AUTH_JTAG_DAP_TIMEOUT_DISABLED)?;
        }
        return Ok(());
    }
    handle_request(state)
}
