/*++

Licensed under the Apache-2.0 license.

File Name:

    sha3.rs

Abstract:

    File contains API for SHA3-384 Cryptography operations

--*/

use sha3::{Digest, Sha3_384};
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::Sha3Digest;

#[derive(Default)]
pub struct Sha3 {}

impl Sha3 {
    pub fn new() -> Self {
        Self {}
    }

    /// Initialize multi-step SHA3-384 digest operation
    ///
    /// # Returns
    ///
    /// * `Sha3DigestOp` - Object representing the digest operation
    pub fn sha3_384_digest_init(&mut self) -> LoaderResult<Sha3DigestOp<'_>> {
        Ok(Sha3DigestOp {
            _sha3: self,
            hasher: Sha3_384::new(),
            state: Sha3DigestState::Init,
        })
    }

    /// Calculate the SHA3-384 digest over the concatenation of `parts`
    ///
    /// # Arguments
    ///
    /// * `parts` - Data to used to update the digest
    ///
    /// # Returns
    ///
    /// * `Sha3Digest` - 48-byte digest
    pub fn sha3_384_digest(&mut self, parts: &[&[u8]]) -> LoaderResult<Sha3Digest> {
        let mut op = self.sha3_384_digest_init()?;
        for part in parts {
            op.update(part)?;
        }
        op.finalize()
    }
}

/// SHA3 Digest state
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Sha3DigestState {
    /// Initial state
    Init,

    /// Pending state
    Pending,

    /// Final state
    Final,
}

/// Multi step SHA3 digest operation
pub struct Sha3DigestOp<'a> {
    /// SHA3 Engine
    _sha3: &'a mut Sha3,

    hasher: Sha3_384,

    /// State
    state: Sha3DigestState,
}

impl<'a> Sha3DigestOp<'a> {
    /// Update the digest with data
    ///
    /// # Arguments
    ///
    /// * `data` - Data to used to update the digest
    pub fn update(&mut self, data: &[u8]) -> LoaderResult<()> {
        if self.state == Sha3DigestState::Final {
            Err(LoaderError::CRYPTO_SHA3_INVALID_STATE)?;
        }
        self.hasher.update(data);
        self.state = Sha3DigestState::Pending;
        Ok(())
    }

    /// Finalize the digest operation
    pub fn finalize(&mut self) -> LoaderResult<Sha3Digest> {
        if self.state == Sha3DigestState::Final {
            Err(LoaderError::CRYPTO_SHA3_INVALID_STATE)?;
        }
        self.state = Sha3DigestState::Final;
        let mut digest = [0u8; 48];
        digest.copy_from_slice(&self.hasher.finalize_reset());
        Ok(digest)
    }
}
