/*++
Licensed under the Apache-2.0 license.

File Name:

    memory_layout.rs

Abstract:

    The file contains the layout of memory. The constants defined
    in this file define the memory layout.

--*/

//
// Memory Addresses
//
pub const OCM_ORG: u64 = 0xFFFC_0000;
pub const PMC_RAM_ORG: u64 = 0xF200_0000;
pub const CHUNK_BUF_ORG: u64 = PMC_RAM_ORG;
pub const AUTH_JTAG_DATA_ORG: u64 = 0xF201_1000;
pub const METAHDR_BUF_ORG: u64 = 0xF201_2000;
pub const DDR_ORG: u64 = 0x0000_0000;
pub const PL_CFRAME_ORG: u64 = 0xF600_0000;

//
// Memory Sizes In Bytes
//
pub const OCM_SIZE: u64 = 256 * 1024;
pub const PMC_RAM_SIZE: u64 = 128 * 1024;
pub const DDR_SIZE: u64 = 16 * 1024 * 1024;
pub const PL_CFRAME_SIZE: u64 = 1024 * 1024;
/// Image header table and optional data
pub const METAHDR_BUF_SIZE: u64 = 0x2000;

//
// Secure chunk sizing
//
pub const SECURE_CHUNK_SIZE: u32 = 0x8000;
/// Extra room in a chunk slot for the leading secure header and its tag
pub const SECURE_CHUNK_OVERHEAD: u32 = 0x40;
pub const CHUNK_BUF_SIZE: u64 = 2 * (SECURE_CHUNK_SIZE as u64 + SECURE_CHUNK_OVERHEAD as u64);
