/*++

Licensed under the Apache-2.0 license.

File Name:

    lib.rs

Abstract:

    File contains the loader context: the state of one boot session and
    the entry points that load PDIs, restart images, serve commands and
    run the authenticated JTAG task.

--*/

mod auth_jtag;
mod cmd;
mod config;
mod device;
mod handoff;
mod image_info;
mod image_store;
mod orchestrator;
mod platform;
mod restart;
mod session;

pub use auth_jtag::AuthJtag;
pub use cmd::{CommandId, IHT_EXPORT_MASK, IH_EXPORT_MASK, PH_EXPORT_MASK};
pub use config::{
    LoaderConfig, AUTH_JTAG_DEFAULT_TIMEOUT, AUTH_JTAG_MAX_ATTEMPTS, IMAGE_INFO_CAPACITY,
    IMAGE_STORE_MAX_PDIS, MAX_DELAYED_HANDOFFS, MAX_RESTART_PDIS,
};
pub use device::DeviceTable;
pub use handoff::{image_handoffs, AtfHandoff, DelayedHandoffs};
pub use image_info::{ImageInfoTable, IMAGE_INFO_OVERFLOW};
pub use image_store::{ImageStore, StoredPdi};
pub use platform::{CpuHandoff, Platform};
pub use session::{PdiLocation, PdiSession, ReadbackTarget, RestartList};

use std::sync::{Mutex, MutexGuard, TryLockError};
use xloader_drivers::{
    cprintln, CryptoAdapter, ErrorDisplay, FuseBank, KeyVault, NeedsKat, SystemMemory,
};
use xloader_error::{LoaderError, LoaderResult};
use xloader_image_types::{BootHeader, PdiSrc};
use xloader_image_verify::{PdiKind, SecureEnv};
use zerocopy::FromBytes;

/// Hardware handed to the loader at start-up
pub struct LoaderResources {
    pub mem: SystemMemory,
    pub fuses: FuseBank,
    pub keys: KeyVault,
    pub crypto: Box<dyn CryptoAdapter>,
    pub devices: DeviceTable,
    pub platform: Box<dyn Platform>,
}

/// Where the last PDI load got to
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct LoadProgress {
    pub pdi_id: u32,
    pub img_idx: u32,
    pub prtn_idx: u32,
}

/// State of the boot session
pub struct LoaderState {
    pub config: LoaderConfig,
    pub mem: SystemMemory,
    pub fuses: FuseBank,
    pub keys: KeyVault,
    pub crypto: NeedsKat<Box<dyn CryptoAdapter>>,
    pub devices: DeviceTable,
    pub platform: Box<dyn Platform>,
    /// Black key sources unwrapped in this session
    pub red_key_cache: u32,
    /// Boot header of the boot PDI
    pub boot_header: BootHeader,
    pub boot_pdi: Option<PdiLocation>,
    pub restart: RestartList,
    pub image_info: ImageInfoTable,
    pub atf: AtfHandoff,
    pub image_store: ImageStore,
    pub auth_jtag: AuthJtag,
    /// Multiboot register
    pub multiboot: u32,
    pub progress: LoadProgress,
}

impl LoaderState {
    fn new(config: LoaderConfig, res: LoaderResources) -> Self {
        Self {
            crypto: NeedsKat::new(res.crypto, config.rom_kats),
            restart: RestartList::new(config.max_restart_pdis),
            image_info: ImageInfoTable::new(config.image_info_capacity),
            image_store: ImageStore::new(
                config.image_store_base,
                config.image_store_size,
                config.image_store_max_pdis,
            ),
            mem: res.mem,
            fuses: res.fuses,
            keys: res.keys,
            devices: res.devices,
            platform: res.platform,
            red_key_cache: 0,
            boot_header: BootHeader::new_zeroed(),
            boot_pdi: None,
            atf: AtfHandoff::new(),
            auth_jtag: AuthJtag::new(),
            multiboot: 0,
            progress: LoadProgress::default(),
            config,
        }
    }

    /// Secure environment over the device bound to `src`.
    ///
    /// # Arguments
    ///
    /// * `src` - Boot source the PDI is read from
    /// * `boot_header` - Boot header the PDI is checked against
    pub fn secure_env<'a>(
        &'a mut self,
        src: PdiSrc,
        boot_header: &'a BootHeader,
    ) -> LoaderResult<SecureEnv<'a>> {
        let device = self.devices.get_mut(src)?;
        Ok(SecureEnv {
            mem: &mut self.mem,
            device,
            crypto: &mut self.crypto,
            fuses: &self.fuses,
            keys: &mut self.keys,
            red_key_cache: &mut self.red_key_cache,
            boot_header,
            chunk: self.config.chunk,
        })
    }
}

/// Loader of one boot session.
///
/// All state sits behind a single lock; an operation that finds the
/// session in use fails with `LOADER_SESSION_BUSY` instead of waiting.
pub struct LoaderContext {
    state: Mutex<LoaderState>,
}

impl LoaderContext {
    pub fn new(config: LoaderConfig, res: LoaderResources) -> Self {
        Self {
            state: Mutex::new(LoaderState::new(config, res)),
        }
    }

    /// Take the session.
    ///
    /// # Returns
    ///
    /// * `LoaderError::LOADER_SESSION_BUSY` if another operation holds it,
    ///   or if an operation panicked part way and left the state suspect
    pub fn lock(&self) -> LoaderResult<MutexGuard<'_, LoaderState>> {
        match self.state.try_lock() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::Poisoned(_)) => {
                cprintln!("[xloader] Session state poisoned by an earlier panic");
                Err(LoaderError::LOADER_SESSION_BUSY)
            }
            Err(TryLockError::WouldBlock) => Err(LoaderError::LOADER_SESSION_BUSY),
        }
    }

    /// Load the boot PDI.
    ///
    /// # Arguments
    ///
    /// * `boot_mode` - Boot source with its raw-access mode nibble
    /// * `addr` - PDI address on the boot device
    pub fn load_boot_pdi(&self, boot_mode: u32, addr: u64) -> LoaderResult<()> {
        let mut state = self.lock()?;
        orchestrator::load(&mut state, boot_mode, addr, PdiKind::Full).map_err(|err| {
            cprintln!("[xloader] Boot PDI load failed: {}", ErrorDisplay(err));
            err
        })
    }

    /// Load a partial PDI.
    ///
    /// # Arguments
    ///
    /// * `src` - Boot source word
    /// * `addr` - PDI address, or the PDI id for the image store
    pub fn load_partial_pdi(&self, src: u32, addr: u64) -> LoaderResult<()> {
        let mut state = self.lock()?;
        orchestrator::load(&mut state, src, addr, PdiKind::Partial).map_err(|err| {
            cprintln!("[xloader] Partial PDI load failed: {}", ErrorDisplay(err));
            err
        })
    }

    /// Reload an image from a PDI loaded earlier in this session
    pub fn restart_image(&self, img_id: u32, func_id: Option<u32>) -> LoaderResult<()> {
        let mut state = self.lock()?;
        restart::restart_image(&mut state, img_id, func_id)
    }

    /// Periodic authenticated JTAG task
    pub fn poll_auth_jtag(&self) -> LoaderResult<()> {
        let mut state = self.lock()?;
        auth_jtag::poll(&mut state)
    }

    /// Execute a command.
    ///
    /// # Arguments
    ///
    /// * `cmd_id` - Command id
    /// * `payload` - Request words
    /// * `secure` - Request came from a secure requester
    ///
    /// # Returns
    ///
    /// * Response words, starting with the status
    pub fn handle_command(&self, cmd_id: u32, payload: &[u32], secure: bool) -> Vec<u32> {
        let result = self
            .lock()
            .and_then(|mut state| cmd::handle_command(&mut state, cmd_id, payload, secure));
        match result {
            Ok(mut resp) => {
                resp.insert(0, 0);
                resp
            }
            Err(err) => {
                cprintln!(
                    "[xloader] Command 0x{:x} failed: {}",
                    cmd_id,
                    ErrorDisplay(err)
                );
                vec![u32::from(err)]
            }
        }
    }
}
