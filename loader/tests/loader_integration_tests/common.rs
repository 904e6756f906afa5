// Licensed under the Apache-2.0 license

use std::sync::{Arc, Mutex};
use xloader::{CommandId, CpuHandoff, DeviceTable, LoaderConfig, LoaderContext, LoaderResources, Platform};
use xloader_drivers::memory_layout::DDR_ORG;
use xloader_drivers::{BootDevice, FuseBank, KeyVault, SoftCrypto, SystemMemory};
use xloader_error::LoaderError;
use xloader_image_gen::{
    GeneratedPdi, ImageConfig, PartitionConfig, PdiConfig, PdiGenerator, SoftGenCrypto,
};
use xloader_image_types::{ImgId, PdiSrc};
use xloader_image_verify::DeviceIdentity;

pub const PDI_BASE: u64 = DDR_ORG + 0x20_0000;
pub const PDI_BASE_2: u64 = DDR_ORG + 0x30_0000;
pub const LOAD_BASE: u64 = DDR_ORG + 0x10_0000;
pub const SCRATCH: u64 = DDR_ORG + 0x60_0000;
pub const IMAGE_STORE_BASE: u64 = DDR_ORG + 0x80_0000;
pub const IMAGE_STORE_SIZE: u64 = 0x40_0000;

pub const SRC_QSPI32: u32 = 0x2;
pub const SRC_SD0: u32 = 0x3;
pub const SRC_USB: u32 = 0x7;
pub const SRC_SMAP: u32 = 0xA;
pub const SRC_DDR: u32 = 0xF;
pub const SRC_IMAGE_STORE: u32 = 0x14;

pub const PS: u32 = 1;
pub const PL: u32 = 2;

pub const APU_IMG: u32 = 0x1C00_0001;
pub const RPU_IMG: u32 = 0x1C00_0002;
pub const PL_IMG: u32 = 0x1C00_0003 | (ImgId::SUBCLASS_PL << ImgId::SUBCLASS_SHIFT);

const PUF_SECRET: [u8; 32] = [0x5A; 32];

/// What the loader asked of the platform
#[derive(Default)]
pub struct PlatformLog {
    pub handoffs: Vec<CpuHandoff>,
    pub pl_errors: Vec<(u32, LoaderError)>,
    pub debug_access: Option<bool>,
    pub jtag_irq: bool,
}

#[derive(Clone, Default)]
pub struct MockPlatform {
    pub log: Arc<Mutex<PlatformLog>>,
}

impl Platform for MockPlatform {
    fn device_identity(&self) -> DeviceIdentity {
        DeviceIdentity::default()
    }

    fn handoff(&mut self, handoff: &CpuHandoff) {
        self.log.lock().unwrap().handoffs.push(*handoff);
    }

    fn pl_error(&mut self, img_id: u32, err: LoaderError) {
        self.log.lock().unwrap().pl_errors.push((img_id, err));
    }

    fn take_auth_jtag_irq(&mut self) -> bool {
        std::mem::take(&mut self.log.lock().unwrap().jtag_irq)
    }

    fn set_debug_access(&mut self, enabled: bool) {
        self.log.lock().unwrap().debug_access = Some(enabled);
    }
}

pub struct Fixture {
    pub config: LoaderConfig,
    pub mem: SystemMemory,
    pub fuses: FuseBank,
    pub devices: DeviceTable,
}

impl Default for Fixture {
    fn default() -> Self {
        Self {
            config: LoaderConfig {
                image_store_base: IMAGE_STORE_BASE,
                image_store_size: IMAGE_STORE_SIZE,
                ..Default::default()
            },
            mem: SystemMemory::with_default_layout(),
            fuses: FuseBank::default(),
            devices: DeviceTable::new(),
        }
    }
}

impl Fixture {
    pub fn with_pdi(mut self, addr: u64, pdi: &GeneratedPdi) -> Self {
        self.mem.write(addr, &pdi.image).unwrap();
        self
    }

    pub fn with_device(mut self, src: PdiSrc, device: Box<dyn BootDevice>) -> Self {
        self.devices.register(src, device);
        self
    }

    pub fn build(self) -> TestLoader {
        let platform = MockPlatform::default();
        let log = platform.log.clone();
        let ctx = LoaderContext::new(
            self.config,
            LoaderResources {
                mem: self.mem,
                fuses: self.fuses,
                keys: KeyVault::default(),
                crypto: Box::new(SoftCrypto::new(PUF_SECRET)),
                devices: self.devices,
                platform: Box::new(platform),
            },
        );
        TestLoader { ctx, log }
    }
}

pub struct TestLoader {
    pub ctx: LoaderContext,
    pub log: Arc<Mutex<PlatformLog>>,
}

impl TestLoader {
    pub fn handoffs(&self) -> Vec<CpuHandoff> {
        self.log.lock().unwrap().handoffs.clone()
    }

    pub fn handoff_cpus(&self) -> Vec<u32> {
        self.handoffs().iter().map(|h| h.cpu).collect()
    }

    pub fn pl_errors(&self) -> Vec<(u32, LoaderError)> {
        self.log.lock().unwrap().pl_errors.clone()
    }

    pub fn read(&self, addr: u64, len: usize) -> Vec<u8> {
        self.ctx.lock().unwrap().mem.slice(addr, len).unwrap().to_vec()
    }

    pub fn read_u32(&self, addr: u64) -> u32 {
        self.ctx.lock().unwrap().mem.read_u32(addr).unwrap()
    }

    pub fn write(&self, addr: u64, data: &[u8]) {
        self.ctx.lock().unwrap().mem.write(addr, data).unwrap();
    }

    pub fn clear(&self, addr: u64, len: usize) {
        self.ctx.lock().unwrap().mem.clear(addr, len).unwrap();
    }

    /// Secure requester
    pub fn cmd(&self, id: CommandId, payload: &[u32]) -> Vec<u32> {
        self.ctx.handle_command(id.0, payload, true)
    }
}

pub fn err_code(err: LoaderError) -> Vec<u32> {
    vec![u32::from(err)]
}

pub fn addr_words(addr: u64) -> [u32; 2] {
    [(addr >> 32) as u32, addr as u32]
}

pub fn partition(prtn_id: u32, load_addr: u64, dst_device: u32, dst_cpu: u32) -> PartitionConfig {
    PartitionConfig {
        data: vec![prtn_id as u8; 0x100],
        load_addr,
        exec_addr: load_addr,
        prtn_id,
        dst_device,
        dst_cpu,
        ..Default::default()
    }
}

pub fn image(img_id: u32, uid: u32, puid: u32, partitions: Vec<PartitionConfig>) -> ImageConfig {
    ImageConfig {
        name: format!("img_{:x}", img_id),
        img_id,
        uid,
        puid,
        func_id: img_id ^ 0xFFFF,
        partitions,
        ..Default::default()
    }
}

pub fn generate(config: &PdiConfig) -> GeneratedPdi {
    PdiGenerator::new(SoftGenCrypto::new()).generate(config).unwrap()
}

pub fn partial_pdi(pdi_id: u32, images: Vec<ImageConfig>) -> GeneratedPdi {
    generate(&PdiConfig {
        pdi_id,
        images,
        ..Default::default()
    })
}

pub fn full_pdi(pdi_id: u32, images: Vec<ImageConfig>) -> GeneratedPdi {
    generate(&PdiConfig {
        full: true,
        pdi_id,
        images,
        ..Default::default()
    })
}

/// APU image on CPU 1 followed by an RPU image on CPU 2
pub fn two_image_pdi(pdi_id: u32) -> GeneratedPdi {
    partial_pdi(
        pdi_id,
        vec![
            image(APU_IMG, 1, 0, vec![partition(0x11, LOAD_BASE, PS, 1)]),
            image(RPU_IMG, 2, 0, vec![partition(0x22, LOAD_BASE + 0x1000, PS, 2)]),
        ],
    )
}
