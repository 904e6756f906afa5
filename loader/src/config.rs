/*++

Licensed under the Apache-2.0 license.

File Name:

    config.rs

Abstract:

    File contains the integrator supplied loader configuration.

--*/

use xloader_drivers::memory_layout::{CHUNK_BUF_ORG, CHUNK_BUF_SIZE, SECURE_CHUNK_SIZE};
use xloader_drivers::wait::DEFAULT_POLL_RETRIES;
use xloader_drivers::KatStatus;
use xloader_image_types::MAX_HANDOFF_CPUS;
use xloader_image_verify::ChunkConfig;

/// Partial PDIs remembered for image restart
pub const MAX_RESTART_PDIS: usize = 10;
pub const IMAGE_INFO_CAPACITY: usize = 64;
pub const MAX_DELAYED_HANDOFFS: usize = 10;
pub const IMAGE_STORE_MAX_PDIS: usize = 5;
pub const AUTH_JTAG_MAX_ATTEMPTS: u32 = 1;
/// Poll intervals JTAG stays open when the request names no timeout
pub const AUTH_JTAG_DEFAULT_TIMEOUT: u32 = 1000;

#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Secure chunk buffers
    pub chunk: ChunkConfig,
    pub max_restart_pdis: usize,
    pub image_info_capacity: usize,
    pub max_delayed_handoffs: usize,
    /// Image store in DDR, not configured while `image_store_size` is zero
    pub image_store_base: u64,
    pub image_store_size: u64,
    pub image_store_max_pdis: usize,
    pub auth_jtag_max_attempts: u32,
    pub auth_jtag_default_timeout: u32,
    /// Bound of every device-ready poll
    pub poll_retries: u32,
    /// KATs the boot ROM completed before handing over
    pub rom_kats: KatStatus,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            chunk: ChunkConfig {
                base: CHUNK_BUF_ORG,
                region_size: CHUNK_BUF_SIZE,
                chunk_size: SECURE_CHUNK_SIZE,
            },
            max_restart_pdis: MAX_RESTART_PDIS,
            image_info_capacity: IMAGE_INFO_CAPACITY,
            max_delayed_handoffs: MAX_DELAYED_HANDOFFS,
            image_store_base: 0,
            image_store_size: 0,
            image_store_max_pdis: IMAGE_STORE_MAX_PDIS,
            auth_jtag_max_attempts: AUTH_JTAG_MAX_ATTEMPTS,
            auth_jtag_default_timeout: AUTH_JTAG_DEFAULT_TIMEOUT,
            poll_retries: DEFAULT_POLL_RETRIES,
            rom_kats: KatStatus::empty(),
        }
    }
}

impl LoaderConfig {
    /// ATF hand-off table entries
    pub const MAX_ATF_ENTRIES: usize = MAX_HANDOFF_CPUS;
}
