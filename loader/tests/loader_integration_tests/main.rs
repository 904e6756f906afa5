// Licensed under the Apache-2.0 license

mod common;
mod test_auth_jtag;
mod test_boot_devices;
mod test_commands;
mod test_image_store;
mod test_load;
mod test_restart;
