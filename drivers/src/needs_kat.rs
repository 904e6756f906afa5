/*++

Licensed under the Apache-2.0 license.

File Name:

    needs_kat.rs

Abstract:

    File contains a driver wrapper that checks if the known-answer tests of
    the required primitive families have run before returning the driver.

--*/

use xloader_error::{LoaderError, LoaderResult};

bitflags::bitflags! {
    /// Primitive families gated by a known-answer test
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
    pub struct KatStatus: u32 {
        const SHA3 = 1 << 0;
        const AES_GCM = 1 << 1;
        const RSA = 1 << 2;
        const ECDSA_P384 = 1 << 3;
        const ECDSA_P521 = 1 << 4;
    }
}

/// A wrapper around a driver that enforces KAT (Known Answer Test) execution
/// before allowing access to the underlying driver.
///
/// Families completed by the boot ROM are sticky and survive
/// [`NeedsKat::clear_session`].
pub struct NeedsKat<T> {
    driver: T,
    done: KatStatus,
    rom_done: KatStatus,
}

impl<T> NeedsKat<T> {
    /// Creates a new wrapper around a driver.
    ///
    /// # Arguments
    ///
    /// * `driver` - The driver instance to wrap
    /// * `rom_done` - Families whose KAT the boot ROM already ran
    pub const fn new(driver: T, rom_done: KatStatus) -> Self {
        Self {
            driver,
            done: rom_done,
            rom_done,
        }
    }

    /// Returns the driver if the KATs of every family in `kats` have run.
    ///
    /// # Returns
    ///
    /// * `LoaderError::KAT_NOT_RUN` if any required KAT is outstanding
    pub fn require(&mut self, kats: KatStatus) -> LoaderResult<&mut T> {
        if !self.done.contains(kats) {
            Err(LoaderError::KAT_NOT_RUN)?;
        }
        Ok(&mut self.driver)
    }

    /// Runs the KAT of `kat` unless it has already passed in this session.
    ///
    /// The closure receives the driver before the gate is open; it must
    /// perform the known-answer test and return `Ok(())` only if it passed.
    ///
    /// # Arguments
    ///
    /// * `kat` - Family being tested
    /// * `f` - Known-answer test
    pub fn run_kat<F>(&mut self, kat: KatStatus, f: F) -> LoaderResult<()>
    where
        F: FnOnce(&mut T) -> LoaderResult<()>,
    {
        if self.done.contains(kat) {
            return Ok(());
        }
        f(&mut self.driver)?;
        self.done |= kat;
        Ok(())
    }

    /// Returns whether the KAT of `kat` has passed.
    pub fn is_kat_run(&self, kat: KatStatus) -> bool {
        self.done.contains(kat)
    }

    /// Returns the families whose KAT has passed.
    pub fn status(&self) -> KatStatus {
        self.done
    }

    /// Forgets every KAT not run by the boot ROM.
    pub fn clear_session(&mut self) {
        self.done = self.rom_done;
    }
}
