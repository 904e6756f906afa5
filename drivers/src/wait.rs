/*++

Licensed under the Apache-2.0 license.

File Name:

    wait.rs

Abstract:

    File contains common functions to implement bounded wait routines.

--*/

use xloader_error::{LoaderError, LoaderResult};

/// Default number of polls before a wait gives up
pub const DEFAULT_POLL_RETRIES: u32 = 0x10_0000;

/// Polls `predicate` until it holds or `retries` polls have failed.
///
/// # Arguments
///
/// * `predicate` - Condition to poll
/// * `retries` - Maximum number of polls
///
/// # Returns
///
/// * `LoaderError::TIMEOUT` if the condition never held
pub fn until<F>(mut predicate: F, retries: u32) -> LoaderResult<()>
where
    F: FnMut() -> bool,
{
    for _ in 0..retries {
        if predicate() {
            return Ok(());
        }
    }
    Err(LoaderError::TIMEOUT)
}
