/*++

Licensed under the Apache-2.0 license.

File Name:

    rsa_kat.rs

Abstract:

    File contains the Known Answer Tests (KAT) for RSA-4096 public key
    operations.

--*/

use xloader_drivers::{CryptoAdapter, RsaPubKey};
use xloader_error::{LoaderError, LoaderResult};

const PUB_EXPONENT: u32 = 0x10001;

// Big-endian operands: EXPECTED_CT = DATA ^ 65537 mod MODULUS
const MODULUS: [u8; 512] = [
    0x96, 0xec, 0xab, 0x6d, 0xfc, 0xba, 0x7d, 0x09, 0xa5, 0x1a, 0x36, 0xf6,
    0x73, 0x57, 0x24, 0x77, 0xf4, 0xaf, 0x97, 0x61, 0x1a, 0xc1, 0x8b, 0x5a,
    0x2e, 0x2f, 0xb3, 0x5c, 0x2a, 0xf1, 0xf8, 0xad, 0xd2, 0x6f, 0x50, 0x16,
    0xb4, 0x83, 0xf4, 0xe6, 0x76, 0xde, 0x25, 0x3e, 0x31, 0x71, 0x94, 0x2e,
    0x03, 0x00, 0xbb, 0x6a, 0x01, 0x5b, 0xfc, 0x66, 0xe9, 0x7d, 0x1b, 0x40,
    0x21, 0x9c, 0x7f, 0x5e, 0xaa, 0x9e, 0xa1, 0x0f, 0x3b, 0x06, 0x82, 0xab,
    0x2f, 0x01, 0x16, 0x61, 0xb3, 0xc1, 0x6e, 0xd0, 0xe0, 0x5f, 0x6f, 0xf1,
    0x1e, 0x0c, 0x06, 0x71, 0xe2, 0x92, 0x1b, 0x67, 0xb0, 0x0c, 0x36, 0xd6,
    0x8c, 0x08, 0xd4, 0xa3, 0xdb, 0x96, 0xfd, 0x29, 0x09, 0x03, 0x5a, 0x90,
    0xe0, 0x9d, 0xff, 0x16, 0x3f, 0xd5, 0xbe, 0xb4, 0x31, 0x10, 0x83, 0x6a,
    0x56, 0x3e, 0x86, 0x7d, 0xc6, 0xb2, 0x76, 0x12, 0x23, 0x6b, 0xf1, 0x2e,
    0x82, 0x93, 0x36, 0xc4, 0xbb, 0x2b, 0xde, 0x73, 0x22, 0x4b, 0x5a, 0xd8,
    0xc3, 0x2a, 0x71, 0x99, 0x19, 0x94, 0xcf, 0xa4, 0x3d, 0x34, 0x3f, 0xc5,
    0xc3, 0x57, 0x14, 0x53, 0xd6, 0x51, 0x0d, 0xe9, 0x9f, 0x82, 0x36, 0xd8,
    0x2c, 0x61, 0x61, 0x44, 0xd5, 0x13, 0xfa, 0xa1, 0xd2, 0xee, 0xd2, 0x49,
    0x47, 0x33, 0x73, 0xc7, 0x03, 0x2e, 0x75, 0x0e, 0x22, 0xd0, 0xba, 0xa6,
    0x65, 0xef, 0xeb, 0x3b, 0x9b, 0xde, 0x82, 0x0c, 0xff, 0xe0, 0xff, 0x47,
    0x43, 0xfc, 0xfd, 0x47, 0x41, 0x44, 0x6b, 0x5d, 0xdd, 0x53, 0x59, 0xeb,
    0x07, 0xc6, 0x2f, 0x1b, 0xe5, 0x71, 0x2b, 0xed, 0x92, 0xfb, 0x1b, 0x7b,
    0xbc, 0x73, 0xc7, 0xae, 0x35, 0xe5, 0xdc, 0xbf, 0x4a, 0x3c, 0xab, 0x08,
    0x83, 0xdc, 0xbb, 0x36, 0xb7, 0xbc, 0x35, 0x88, 0xfb, 0x7d, 0xb6, 0x5c,
    0x23, 0x68, 0x2a, 0xf9, 0xeb, 0xab, 0x13, 0xa1, 0x07, 0xc5, 0xff, 0x51,
    0xc3, 0xde, 0x49, 0x1c, 0xce, 0x37, 0x1a, 0xc7, 0xc5, 0xa8, 0xb4, 0x8a,
    0x23, 0xe7, 0xfa, 0xa6, 0xc9, 0x78, 0x3c, 0xfb, 0xf1, 0x39, 0xe0, 0xa7,
    0x3d, 0x8d, 0xb0, 0x50, 0x20, 0xd1, 0xe8, 0x08, 0x6f, 0x95, 0x6d, 0x90,
    0x65, 0xa9, 0xd1, 0xac, 0xa9, 0x4e, 0x88, 0xa1, 0x84, 0xd3, 0xd0, 0x14,
    0x42, 0xc6, 0xbe, 0x65, 0x76, 0xee, 0x0b, 0xd8, 0x0b, 0x45, 0xec, 0x07,
    0x58, 0xb7, 0x26, 0x66, 0xed, 0x3d, 0x58, 0xb8, 0x20, 0xd5, 0xba, 0x18,
    0x97, 0x9e, 0x5e, 0xae, 0xb8, 0x07, 0x72, 0xec, 0x81, 0xc5, 0xf7, 0xe1,
    0xc4, 0xf5, 0x2f, 0xef, 0xa4, 0x98, 0xba, 0xee, 0x76, 0xce, 0x5d, 0x2d,
    0xf5, 0x9b, 0x7e, 0xa9, 0xea, 0x89, 0x5e, 0xfc, 0x98, 0x7c, 0x8a, 0xf8,
    0xde, 0x5b, 0x7e, 0x14, 0x60, 0x30, 0xfe, 0xa0, 0x1e, 0x01, 0x76, 0xa0,
    0x43, 0x21, 0x71, 0xa4, 0xe7, 0x81, 0x02, 0x65, 0x18, 0x73, 0x56, 0xcb,
    0x1d, 0x36, 0x48, 0x23, 0xc6, 0x4c, 0x75, 0xca, 0xa5, 0xe4, 0xaa, 0x58,
    0xa4, 0xde, 0xd6, 0x42, 0xc0, 0x5a, 0xcd, 0xf8, 0x90, 0x81, 0x2f, 0x9d,
    0x9c, 0x65, 0x06, 0x5e, 0xc0, 0x05, 0x28, 0xef, 0x89, 0x81, 0x23, 0x88,
    0x78, 0x96, 0x4e, 0x48, 0x78, 0xc2, 0x7b, 0xc9, 0xa1, 0x0b, 0x2f, 0x12,
    0xcc, 0x95, 0x17, 0xcb, 0x6e, 0x1d, 0x83, 0x76, 0xfd, 0xa9, 0x25, 0x13,
    0x6c, 0x53, 0x76, 0x83, 0xe2, 0xce, 0x3b, 0x9c, 0xe9, 0xa9, 0x27, 0x27,
    0xfe, 0x3c, 0xf8, 0x96, 0xf4, 0xe4, 0x36, 0x50, 0x3a, 0xc9, 0x6d, 0x11,
    0x5c, 0x2b, 0x53, 0x62, 0x4d, 0x66, 0x96, 0xed, 0x76, 0x63, 0x66, 0x2f,
    0x6d, 0xca, 0x7c, 0xe7, 0xa4, 0x26, 0x2d, 0xa7, 0x41, 0x53, 0x86, 0xa2,
    0x7e, 0x4d, 0x33, 0xc2, 0xcc, 0xdd, 0x52, 0x45,
];
const DATA: [u8; 512] = [
    0x86, 0x14, 0x57, 0xfb, 0x12, 0x90, 0x24, 0xe1, 0x08, 0x14, 0x76, 0x3e,
    0x70, 0xea, 0x20, 0x1a, 0x88, 0xf7, 0xc2, 0xfe, 0x94, 0x63, 0xd2, 0xb9,
    0xfa, 0xac, 0xed, 0x28, 0x9a, 0x27, 0x15, 0xf3, 0xe9, 0xef, 0xed, 0x14,
    0x05, 0xdc, 0x5d, 0x61, 0xe2, 0x41, 0xc5, 0x7c, 0xd5, 0xcb, 0xdf, 0xbe,
    0x32, 0x01, 0x34, 0x10, 0x2b, 0xb6, 0xd0, 0x12, 0x81, 0xf6, 0x0d, 0xda,
    0x34, 0xd4, 0x83, 0x14, 0x52, 0xb7, 0xc8, 0x1e, 0x5e, 0x66, 0xbe, 0x84,
    0x8e, 0x6d, 0x6b, 0xa3, 0xc3, 0xe9, 0x06, 0x32, 0x34, 0x93, 0x4e, 0x67,
    0x1e, 0x9a, 0x9c, 0x8a, 0x71, 0xa6, 0x00, 0x0c, 0xc4, 0x32, 0x92, 0xc9,
    0x32, 0xdd, 0xda, 0x4e, 0x23, 0x17, 0x2a, 0x77, 0x6c, 0xc2, 0x6a, 0x2d,
    0x5c, 0x59, 0x3a, 0x48, 0x81, 0x6f, 0x39, 0x52, 0x4e, 0xc9, 0xad, 0x11,
    0x9f, 0x95, 0x51, 0x1d, 0xb0, 0x31, 0xf0, 0x08, 0x8b, 0x73, 0x2f, 0x25,
    0x61, 0x07, 0x8a, 0x22, 0x28, 0x38, 0x94, 0x07, 0xf4, 0xc9, 0x4f, 0x6b,
    0x61, 0x00, 0xc4, 0x95, 0x31, 0x3b, 0x2e, 0xd1, 0xf7, 0x32, 0xae, 0xc4,
    0x0d, 0x44, 0xf5, 0x29, 0x95, 0x61, 0x19, 0x62, 0x63, 0xfb, 0x51, 0x12,
    0xf5, 0xcc, 0xc9, 0xf7, 0xa0, 0xc3, 0x9c, 0x38, 0xd8, 0x5f, 0xdb, 0x5f,
    0x9a, 0x25, 0x92, 0xec, 0xbb, 0x9d, 0xcd, 0x15, 0xf9, 0x61, 0xeb, 0x5c,
    0xe5, 0xef, 0x09, 0xc8, 0xc2, 0x9b, 0x4d, 0x16, 0x0e, 0xe5, 0x15, 0x80,
    0x5b, 0xcb, 0x4c, 0x2c, 0x9d, 0x4b, 0x97, 0x51, 0x3b, 0xd1, 0x93, 0xc5,
    0x2e, 0xa1, 0xd1, 0x12, 0x5e, 0xf1, 0x2d, 0xa1, 0x95, 0x24, 0x50, 0xb9,
    0x27, 0x6f, 0x60, 0xa7, 0xa3, 0xcc, 0x39, 0xca, 0xe0, 0xc5, 0xe1, 0xd1,
    0xdd, 0x10, 0x90, 0xf5, 0x14, 0x5f, 0xd8, 0xab, 0x36, 0x13, 0x3d, 0x38,
    0x6a, 0xb9, 0x3c, 0x00, 0x73, 0x26, 0x4e, 0xb4, 0x85, 0x0a, 0x01, 0xe5,
    0x2b, 0xa6, 0x30, 0xeb, 0xc3, 0x74, 0xc8, 0x5e, 0xa2, 0x71, 0xd0, 0x92,
    0x7f, 0x89, 0x77, 0x2a, 0xc5, 0x75, 0xd1, 0x33, 0xee, 0x62, 0x82, 0x7e,
    0x30, 0x4c, 0x7a, 0xdb, 0x2f, 0x30, 0x05, 0xb9, 0xb0, 0x11, 0xb2, 0x11,
    0xbf, 0x86, 0x76, 0xbe, 0xec, 0x10, 0xa3, 0xb4, 0x1f, 0x38, 0x60, 0x98,
    0x2f, 0xb6, 0xfd, 0x3f, 0x83, 0x30, 0x36, 0xa9, 0xca, 0xf6, 0x04, 0xc2,
    0xcd, 0x78, 0x4d, 0x52, 0x22, 0xef, 0x9d, 0xed, 0xad, 0x23, 0xe4, 0xb6,
    0x40, 0x22, 0xd7, 0xe2, 0x4a, 0x6c, 0x4f, 0xc5, 0xaa, 0x34, 0x75, 0xbc,
    0xac, 0x83, 0xc9, 0xb5, 0xe3, 0x5e, 0x90, 0x34, 0x10, 0x1b, 0x09, 0x1c,
    0xe5, 0x27, 0xba, 0xb5, 0x8f, 0x38, 0x46, 0x12, 0x4f, 0xf4, 0x8d, 0x63,
    0x9e, 0xaa, 0x28, 0x42, 0x56, 0xc3, 0x6e, 0xb2, 0xd4, 0xc1, 0x51, 0xaf,
    0x43, 0x33, 0xe9, 0x3f, 0x38, 0x6b, 0x41, 0x55, 0x6e, 0xdc, 0xdc, 0x7c,
    0xe6, 0xc6, 0x14, 0x45, 0x26, 0x5f, 0x52, 0xf4, 0x5b, 0x87, 0xd1, 0x71,
    0x41, 0xde, 0x1d, 0xb5, 0x0c, 0x35, 0x29, 0x5b, 0xb6, 0x24, 0x43, 0xfc,
    0xf3, 0x94, 0x37, 0x08, 0x94, 0x4c, 0x7f, 0xe1, 0x4f, 0xd4, 0xaa, 0xcf,
    0x1c, 0x5a, 0x78, 0xc7, 0x62, 0xb7, 0xc2, 0xd6, 0x0e, 0x88, 0x4f, 0x48,
    0x83, 0x03, 0xa8, 0x3e, 0xe1, 0xde, 0xa7, 0x1e, 0x31, 0xa2, 0x80, 0x6e,
    0xe4, 0x13, 0xae, 0x50, 0x14, 0xcd, 0x20, 0x49, 0xbc, 0x16, 0x43, 0x56,
    0xb0, 0xa7, 0x87, 0x67, 0x8b, 0xaa, 0xd0, 0x31, 0x27, 0x30, 0x2e, 0x5b,
    0x0c, 0xbd, 0x62, 0xb1, 0x8d, 0x0b, 0x4d, 0xef, 0xa6, 0x2f, 0x20, 0x3f,
    0x63, 0xaa, 0x00, 0xf7, 0x9e, 0x78, 0x46, 0x98, 0x74, 0x73, 0x18, 0x64,
    0x7e, 0x83, 0x81, 0xce, 0xc4, 0x4e, 0x27, 0xa1,
];
const EXPECTED_CT: [u8; 512] = [
    0x10, 0x7c, 0xc4, 0xc8, 0x66, 0x36, 0x56, 0x28, 0x4d, 0x50, 0x5c, 0x00,
    0x4d, 0xe1, 0xdc, 0xb5, 0x25, 0x1d, 0x93, 0x01, 0xd3, 0x6d, 0xbe, 0x40,
    0x60, 0x59, 0xd3, 0x17, 0x6a, 0xba, 0xf0, 0xd5, 0xc8, 0xbb, 0xd0, 0x58,
    0xbc, 0xeb, 0xbc, 0xd3, 0x9d, 0x7d, 0xe9, 0x4d, 0x4d, 0x55, 0x25, 0x30,
    0x39, 0x81, 0x3b, 0x7b, 0x35, 0xec, 0xf3, 0x55, 0x65, 0x9e, 0x4e, 0x8a,
    0x28, 0x80, 0xde, 0xe9, 0xa1, 0x12, 0x0c, 0x93, 0x7e, 0xb1, 0x04, 0xdd,
    0xba, 0x66, 0x0f, 0xf8, 0xc0, 0x74, 0xcc, 0x4e, 0x68, 0xb0, 0xf5, 0xff,
    0xb6, 0x07, 0xba, 0x3c, 0xda, 0x3f, 0x3e, 0x34, 0x60, 0x33, 0x51, 0x96,
    0xe6, 0xad, 0x8e, 0xbc, 0xd4, 0x9c, 0x7a, 0xc8, 0x0c, 0xa6, 0x49, 0x53,
    0x77, 0x8d, 0x02, 0xdb, 0xb0, 0x84, 0x59, 0x4c, 0xf3, 0x2e, 0xf2, 0xdf,
    0x23, 0x2b, 0x7e, 0x10, 0x77, 0xb1, 0x0e, 0x1e, 0x00, 0x8f, 0x9b, 0x2d,
    0x02, 0x85, 0x36, 0xc1, 0x9c, 0x9f, 0xba, 0x7d, 0x9e, 0x1c, 0x84, 0xa0,
    0x05, 0xec, 0xf1, 0x7d, 0x98, 0x0e, 0x6e, 0x8b, 0xa5, 0x4d, 0xcf, 0xa6,
    0x44, 0x3b, 0x41, 0x2f, 0x45, 0xf4, 0x9d, 0x4c, 0x2c, 0x87, 0x8d, 0xd2,
    0x64, 0x73, 0xc9, 0x01, 0x16, 0x26, 0xdc, 0xd0, 0xf2, 0xd1, 0x0b, 0x4d,
    0xe3, 0x35, 0xfa, 0x4f, 0x93, 0x87, 0xfb, 0x9b, 0x3a, 0x1b, 0x6f, 0x69,
    0xaa, 0x5c, 0xa7, 0x4e, 0x44, 0xe4, 0x0e, 0x9f, 0x3a, 0x60, 0xc6, 0x64,
    0xfe, 0x43, 0xab, 0xce, 0x1a, 0x13, 0x92, 0x74, 0x4e, 0xa3, 0x6a, 0x7e,
    0x31, 0x0e, 0x31, 0x0b, 0x57, 0xdc, 0xb2, 0x47, 0x1e, 0x5b, 0x58, 0xb5,
    0x75, 0x1b, 0xcd, 0xd5, 0x26, 0xaa, 0xca, 0xc6, 0x5e, 0x56, 0x6d, 0x80,
    0x03, 0xd6, 0xc9, 0x9a, 0xca, 0xa0, 0x9a, 0xd2, 0x0d, 0xa3, 0x2e, 0xee,
    0xdc, 0x8e, 0x86, 0x29, 0x1a, 0xb7, 0x49, 0x60, 0x25, 0xc8, 0xf4, 0xfc,
    0x53, 0x6f, 0x33, 0x52, 0xe8, 0x42, 0xb6, 0xe4, 0xe7, 0xe4, 0xab, 0xc3,
    0x78, 0xb4, 0xc5, 0x0e, 0xe8, 0x36, 0x00, 0xc3, 0x64, 0xa4, 0x5e, 0x83,
    0xe6, 0x8f, 0xac, 0x27, 0xa6, 0x2d, 0x55, 0xb0, 0xf8, 0x03, 0x54, 0xaa,
    0x33, 0xae, 0x9c, 0xc2, 0x8f, 0x90, 0x2d, 0x24, 0x5a, 0x8d, 0xbc, 0xf6,
    0x7a, 0xcd, 0x6e, 0x3d, 0x35, 0x82, 0x3f, 0x66, 0x2b, 0xd0, 0xd2, 0x0a,
    0x62, 0x5b, 0xc3, 0x94, 0xde, 0x59, 0x71, 0x64, 0xd4, 0xd4, 0xb4, 0xc8,
    0x9d, 0x79, 0xc7, 0xb9, 0x45, 0x4e, 0x87, 0x92, 0x03, 0x63, 0x07, 0xc1,
    0xb3, 0x20, 0x56, 0x09, 0xb7, 0x14, 0xa9, 0x54, 0x5e, 0x32, 0x78, 0x33,
    0x41, 0x68, 0xa4, 0x93, 0x0e, 0xc7, 0x8a, 0x6b, 0xd7, 0x5d, 0xee, 0x53,
    0x20, 0xe1, 0xbb, 0x26, 0x84, 0x01, 0x6f, 0x64, 0x66, 0xee, 0x56, 0xa5,
    0x7b, 0x73, 0xca, 0x17, 0x30, 0x4d, 0xc6, 0x75, 0x42, 0xe4, 0xa4, 0xff,
    0xb9, 0x63, 0x76, 0x10, 0x36, 0x8a, 0xcc, 0xd3, 0x19, 0x98, 0x1f, 0x3d,
    0x1f, 0x9f, 0xb8, 0x27, 0x58, 0xf5, 0xbd, 0x49, 0x03, 0x5a, 0x1d, 0x35,
    0xb5, 0x02, 0x40, 0x9e, 0x4e, 0xef, 0x84, 0xba, 0x8e, 0x26, 0x0e, 0x24,
    0xc3, 0x66, 0x7d, 0x6d, 0x0c, 0xee, 0x07, 0x59, 0xe3, 0x8b, 0x33, 0xf4,
    0xcc, 0xf7, 0xa0, 0x20, 0x33, 0x47, 0x87, 0x96, 0xa1, 0xe8, 0xdb, 0xaa,
    0xcd, 0xd3, 0x33, 0x71, 0xcc, 0x7a, 0x46, 0x7d, 0x6b, 0xdc, 0x0c, 0xee,
    0xba, 0x17, 0xac, 0x3b, 0xb0, 0xc9, 0x82, 0xc5, 0xd3, 0xcd, 0x86, 0x15,
    0x28, 0x02, 0xbd, 0x56, 0xbf, 0x60, 0xd7, 0x51, 0xd2, 0x39, 0x3d, 0x57,
    0x6d, 0x0f, 0x10, 0x83, 0x21, 0xb6, 0x8d, 0x57, 0x18, 0x82, 0xfd, 0xf6,
    0xcb, 0xbb, 0x62, 0x92, 0xcd, 0x81, 0x43, 0xe0,
];

#[derive(Default, Debug)]
pub struct Rsa4096Kat {}

impl Rsa4096Kat {
    /// This function executes the Known Answer Tests (aka KAT) for RSA-4096.
    ///
    /// # Arguments
    ///
    /// * `crypto` - Crypto adapter
    ///
    /// # Returns
    ///
    /// * `LoaderResult` - Result denoting the KAT outcome.
    pub fn execute(&self, crypto: &mut dyn CryptoAdapter) -> LoaderResult<()> {
        self.public_encrypt_kat(crypto)
    }

    fn public_encrypt_kat(&self, crypto: &mut dyn CryptoAdapter) -> LoaderResult<()> {
        let key = RsaPubKey {
            modulus: &MODULUS,
            exponent: PUB_EXPONENT,
        };
        let ct = crypto
            .rsa_public_encrypt(&key, &DATA)
            .map_err(|_| LoaderError::KAT_RSA_ENCRYPT_MISMATCH)?;

        if ct[..] != EXPECTED_CT[..] {
            Err(LoaderError::KAT_RSA_ENCRYPT_MISMATCH)?;
        }

        Ok(())
    }
}
