/*++

Licensed under the Apache-2.0 license.

File Name:

   lib.rs

Abstract:

    PDI verification library: structural parsing, eFuse policy, the
    authentication chain, key selection and the secure processing engine.

--*/

mod auth;
mod env;
mod header;
mod key_select;
mod metaheader;
mod policy;
mod secure;
#[cfg(test)]
mod test_env;
#[cfg(test)]
mod test_vectors;

pub use auth::{data_auth, verify_ppk, verify_signature};
pub use env::{kat_gated, ChunkConfig, SecureEnv};
pub use header::{
    read_boot_header, read_image_header_table, read_image_headers, read_partition_headers,
    validate_image_partitions, DeviceIdentity, IDCODE_SIREV_MASK,
};
pub use key_select::resolve_key;
pub use metaheader::{read_metaheader, MetaHeader, PdiKind};
pub use policy::{validate_iv_range, HwRot, PolicyChecker};
pub use secure::{load_partition, PartitionLoad, SecureParams};
