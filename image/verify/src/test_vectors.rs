/*++

Licensed under the Apache-2.0 license.

File Name:

    test_vectors.rs

Abstract:

    File contains RSA-4096 and ECDSA P-521 certificate material for the
    unit tests. Signatures are RSASSA-PSS (SHA3-384, 48 byte salt) and
    ECDSA over SHA3-384 digests, big-endian.

    The RSA key signs both its own slot (PPK = SPK) and the data digest.
    SPK digests cover `auth_hdr | spk_id = 3 | spk slot`; the data digest
    is 48 bytes of 0x42.

--*/

pub(crate) const RSA_MODULUS: [u8; 512] = [
    0xf1, 0xcf, 0x70, 0xd9, 0x67, 0x8e, 0x36, 0x2b, 0x48, 0x3a, 0x2a, 0x78,
    0x84, 0xda, 0x5a, 0x46, 0xa7, 0xa7, 0x5a, 0x5d, 0xa8, 0x00, 0x55, 0x69,
    0x4e, 0xf9, 0x5d, 0x30, 0xe6, 0xeb, 0x39, 0x59, 0xef, 0x5b, 0xc2, 0xe1,
    0x98, 0x43, 0x0c, 0xcc, 0xd5, 0x37, 0x60, 0x20, 0xb4, 0x01, 0x4c, 0x67,
    0xda, 0x75, 0x4e, 0x0a, 0xf5, 0xf7, 0x4c, 0x11, 0xef, 0xc6, 0x16, 0xdb,
    0x57, 0x4f, 0x08, 0xc2, 0x7b, 0x51, 0x8d, 0x58, 0x1d, 0x26, 0x8c, 0x71,
    0xd0, 0x67, 0x96, 0xd4, 0x4e, 0x7d, 0x7f, 0xa6, 0x64, 0xdc, 0x35, 0xe4,
    0xe4, 0x6e, 0xd9, 0x8d, 0x3e, 0x71, 0x2f, 0x90, 0x31, 0xa6, 0x1d, 0xa0,
    0xc6, 0x9b, 0x49, 0x58, 0xfc, 0x01, 0x65, 0x6d, 0x1d, 0xcf, 0x92, 0x7c,
    0x3e, 0x2e, 0x13, 0x95, 0x65, 0x0e, 0x72, 0x15, 0xb5, 0x6c, 0x37, 0x73,
    0xa5, 0x54, 0x0f, 0xdf, 0xb2, 0x30, 0xa2, 0x27, 0xa5, 0x2e, 0xb9, 0x25,
    0x6a, 0x82, 0xfb, 0x19, 0xab, 0x19, 0xcb, 0x36, 0xa6, 0xef, 0xc0, 0x89,
    0xa0, 0x3c, 0x23, 0xe5, 0xc8, 0xaa, 0xfe, 0x76, 0xbc, 0x08, 0x48, 0xcc,
    0xef, 0xc5, 0xce, 0xe2, 0x81, 0x9e, 0xe4, 0xa5, 0x0e, 0x82, 0x53, 0x1f,
    0x1b, 0x22, 0x76, 0x08, 0x3b, 0xcf, 0x2f, 0xfa, 0xb5, 0x8e, 0x30, 0x72,
    0x9a, 0x17, 0xad, 0x7c, 0x6b, 0x9b, 0x2e, 0xea, 0x83, 0xa9, 0x49, 0xc0,
    0xbc, 0xf4, 0xf0, 0x16, 0xdf, 0xc8, 0x46, 0xc5, 0xd5, 0x26, 0xce, 0xcb,
    0x85, 0x55, 0xac, 0x9b, 0x98, 0x6f, 0x1f, 0xcb, 0xa4, 0xfd, 0x10, 0xe2,
    0x74, 0x8d, 0xa5, 0x7c, 0x22, 0xee, 0x5d, 0x37, 0x98, 0x17, 0x65, 0x9f,
    0x7b, 0x35, 0xd0, 0x66, 0x31, 0xee, 0xeb, 0xdc, 0x1e, 0x5c, 0x1a, 0xbf,
    0x2d, 0x68, 0x7d, 0x02, 0xa1, 0x32, 0xd9, 0x2d, 0xd0, 0x48, 0xf5, 0x82,
    0x03, 0xec, 0x77, 0x13, 0xcb, 0x0e, 0xc1, 0x48, 0xde, 0xa3, 0xb3, 0x0d,
    0xb6, 0xcc, 0xa8, 0x90, 0xe3, 0x2d, 0x89, 0x80, 0x7f, 0x79, 0x69, 0xb2,
    0x69, 0x48, 0x60, 0x28, 0x89, 0x7c, 0x0c, 0xbe, 0x46, 0x37, 0x8a, 0x22,
    0x28, 0xe2, 0x2d, 0x89, 0x37, 0x35, 0x49, 0xaf, 0xe4, 0x0a, 0x70, 0x55,
    0x6f, 0xaa, 0x63, 0x44, 0xef, 0x7f, 0xf0, 0xfb, 0x88, 0x02, 0xa8, 0x7b,
    0xf7, 0x5a, 0xae, 0xcf, 0x8b, 0x90, 0x6d, 0x9b, 0x7e, 0x1a, 0x1f, 0x51,
    0x9c, 0xe1, 0xc0, 0xb1, 0x37, 0x15, 0x61, 0x21, 0x19, 0x52, 0x00, 0x03,
    0x8f, 0x03, 0x75, 0x65, 0x10, 0x56, 0xe4, 0x57, 0x0f, 0x38, 0x0b, 0x0e,
    0x3c, 0x6e, 0x7c, 0x65, 0x0b, 0x99, 0x73, 0x3e, 0x6b, 0x73, 0x88, 0xb4,
    0x6a, 0x26, 0xda, 0xc7, 0x27, 0x0a, 0x24, 0x1b, 0xa3, 0xc7, 0x88, 0x36,
    0x57, 0x54, 0x6d, 0x94, 0x85, 0x04, 0xd7, 0x26, 0x41, 0xd5, 0x95, 0xc1,
    0xd1, 0xd7, 0x66, 0xbe, 0x8e, 0xe8, 0x7d, 0x79, 0xf1, 0x72, 0x90, 0x31,
    0x22, 0x00, 0xdd, 0x8a, 0xa6, 0xe1, 0x06, 0xc9, 0x20, 0xb1, 0xc3, 0x2b,
    0x26, 0x2c, 0x16, 0xbc, 0x9e, 0xc7, 0xe9, 0xee, 0xd4, 0xab, 0xed, 0x90,
    0xb6, 0x10, 0x0d, 0xe8, 0xc0, 0xdf, 0xf8, 0x6f, 0xb6, 0xad, 0x02, 0x26,
    0xd4, 0xbb, 0xd7, 0x89, 0xd2, 0x65, 0xcb, 0x78, 0xbc, 0x31, 0x6f, 0xed,
    0xfd, 0x4e, 0xf4, 0x9f, 0x37, 0x3d, 0xb0, 0xb2, 0x30, 0x36, 0x2d, 0x8c,
    0x1f, 0xe1, 0x69, 0xb7, 0x70, 0xad, 0x63, 0x46, 0xea, 0xa5, 0x90, 0x90,
    0x2b, 0x22, 0xd8, 0x91, 0xaa, 0x8b, 0xb9, 0x02, 0x2a, 0x62, 0x2b, 0x8a,
    0xa6, 0x86, 0x47, 0xf8, 0xfe, 0x02, 0x2b, 0xce, 0x42, 0x23, 0x83, 0x7f,
    0x78, 0xae, 0xc0, 0x59, 0xb6, 0xe9, 0x74, 0xc7, 0x6d, 0xd6, 0x3a, 0x68,
    0x95, 0x7e, 0xa3, 0xd9, 0x43, 0xdb, 0xd5, 0xbd,
];

pub(crate) const RSA_SPK_SIGNATURE: [u8; 512] = [
    0x72, 0x4a, 0xa2, 0xeb, 0xd3, 0x04, 0xa1, 0x0b, 0x84, 0xed, 0x65, 0x05,
    0x84, 0xb6, 0xf6, 0x9b, 0x0d, 0xea, 0x2b, 0x6c, 0xbd, 0xa1, 0x79, 0x48,
    0xeb, 0x0e, 0x9a, 0x45, 0xa3, 0x65, 0xc3, 0x74, 0x32, 0xae, 0xcb, 0x32,
    0x9f, 0x48, 0xc8, 0xa4, 0xfd, 0x75, 0x14, 0xd5, 0x7a, 0x10, 0x1f, 0x96,
    0x5b, 0xa8, 0x06, 0x55, 0xdc, 0x1a, 0x22, 0x90, 0x10, 0x56, 0xeb, 0x06,
    0xbc, 0xfd, 0x1e, 0xc3, 0x29, 0x32, 0x36, 0xbd, 0xca, 0x7e, 0xb7, 0xef,
    0x66, 0x29, 0x14, 0xd8, 0x31, 0x9f, 0x40, 0x02, 0x35, 0x77, 0x55, 0xf4,
    0x82, 0x71, 0x82, 0xff, 0x9a, 0x62, 0x9b, 0x31, 0x1e, 0x71, 0xdb, 0xd6,
    0x25, 0x46, 0xa1, 0xcf, 0x47, 0x84, 0x01, 0x6e, 0xbd, 0x4e, 0x34, 0xca,
    0xd5, 0xf3, 0x1f, 0x6d, 0x46, 0xa9, 0xc8, 0xad, 0x2c, 0x36, 0x76, 0x77,
    0x63, 0x6d, 0x43, 0xe5, 0x06, 0x52, 0xae, 0x80, 0xa8, 0x76, 0x23, 0x96,
    0x20, 0xd1, 0xf7, 0x0a, 0xd8, 0x43, 0x32, 0xbd, 0x22, 0x12, 0x03, 0xb5,
    0xe6, 0x4d, 0xb2, 0xf9, 0x3a, 0x18, 0x9e, 0xc6, 0xef, 0xab, 0x12, 0x99,
    0x00, 0x58, 0x5c, 0x58, 0x02, 0x6d, 0xd5, 0xdc, 0xab, 0x32, 0xf1, 0x42,
    0xc2, 0x46, 0x84, 0x51, 0x60, 0x61, 0xda, 0x11, 0x46, 0x85, 0xaa, 0x68,
    0x4e, 0x04, 0x50, 0x12, 0x1e, 0x82, 0x8f, 0x7e, 0x6d, 0x29, 0x5f, 0x60,
    0xb8, 0xeb, 0x96, 0xa0, 0xc3, 0xe8, 0xa5, 0xaf, 0x04, 0x86, 0x61, 0x61,
    0x63, 0x9b, 0x91, 0x3e, 0x2f, 0xfa, 0x10, 0xba, 0xe4, 0x64, 0xb7, 0xaf,
    0x2e, 0xf9, 0xde, 0x45, 0x56, 0x29, 0x8c, 0xc0, 0x39, 0x51, 0x95, 0x68,
    0x6b, 0x23, 0x86, 0xde, 0x38, 0x4d, 0x5c, 0xe4, 0xa7, 0xcc, 0x5f, 0x3a,
    0xf8, 0xdf, 0x5b, 0x88, 0x48, 0x81, 0x8b, 0x14, 0xfd, 0x1f, 0x88, 0x5b,
    0x15, 0x94, 0xdb, 0xcb, 0x55, 0x7b, 0xbb, 0xd3, 0xab, 0x18, 0x71, 0x26,
    0x00, 0xb9, 0xaf, 0x6f, 0x09, 0xe7, 0xde, 0xd8, 0x85, 0xbc, 0x0b, 0x35,
    0x44, 0xaa, 0x19, 0x65, 0xac, 0xad, 0x1e, 0x42, 0x79, 0x7a, 0x62, 0xc5,
    0xf8, 0xfb, 0x77, 0x94, 0x44, 0xec, 0xd1, 0x55, 0xc5, 0x9a, 0x09, 0xf9,
    0x99, 0xc5, 0x41, 0x32, 0xcd, 0x36, 0x8b, 0xeb, 0xec, 0xfe, 0x39, 0x53,
    0x7a, 0x66, 0x04, 0xfc, 0x33, 0x63, 0x92, 0x8d, 0x87, 0x0f, 0xde, 0x6a,
    0xfb, 0x31, 0x9e, 0xac, 0xb0, 0xec, 0x50, 0xfd, 0x38, 0xd5, 0x53, 0xb0,
    0xaa, 0xa2, 0x7f, 0x95, 0x42, 0xaf, 0x04, 0xb2, 0x97, 0x5b, 0x86, 0xa1,
    0x16, 0x5f, 0x08, 0xe3, 0x13, 0xef, 0xd6, 0x81, 0xcb, 0xab, 0xc9, 0xd9,
    0xb7, 0xef, 0xf2, 0x05, 0x8b, 0x8d, 0xe8, 0x0e, 0x2b, 0x6a, 0x8b, 0x81,
    0xf3, 0xd5, 0x22, 0x1b, 0x68, 0x19, 0x4e, 0x2c, 0xd2, 0x8a, 0xe0, 0xfd,
    0xd4, 0x2e, 0x62, 0x7f, 0x93, 0xb8, 0x08, 0x9e, 0x14, 0x04, 0x69, 0xfc,
    0x1d, 0xf7, 0x4b, 0x50, 0xf7, 0x3d, 0x03, 0xaf, 0xa4, 0xde, 0x7e, 0x2b,
    0x36, 0x3b, 0x01, 0x25, 0xca, 0x82, 0x92, 0x7c, 0xc3, 0x3d, 0x6a, 0x26,
    0xcf, 0xb5, 0xe5, 0x8c, 0xac, 0x70, 0xad, 0x3d, 0x23, 0x6f, 0x95, 0x67,
    0xd0, 0x2c, 0x38, 0xfb, 0x1a, 0x42, 0xff, 0x6c, 0xd5, 0x57, 0xd4, 0x33,
    0xbf, 0xb3, 0xd0, 0x36, 0x8c, 0x9e, 0x7b, 0xee, 0x82, 0x2f, 0xbb, 0xb9,
    0x2a, 0x36, 0x77, 0x52, 0xce, 0x85, 0x79, 0x7a, 0x78, 0x4b, 0xad, 0x84,
    0xfe, 0x7e, 0xc6, 0x00, 0xcd, 0x03, 0xba, 0xdb, 0x27, 0x7a, 0xcc, 0xee,
    0xa3, 0x16, 0xed, 0x56, 0x37, 0xec, 0xc5, 0xaa, 0xd4, 0x0e, 0x50, 0x9c,
    0x90, 0x99, 0x22, 0x7f, 0xe6, 0xba, 0x99, 0xc2, 0x02, 0xc6, 0xdc, 0xb5,
    0xcd, 0xb3, 0x6c, 0xb1, 0xf6, 0x97, 0x2a, 0x8c,
];

pub(crate) const RSA_DATA_SIGNATURE: [u8; 512] = [
    0x28, 0xa9, 0x10, 0x32, 0x12, 0xe0, 0xaa, 0x1a, 0x84, 0xfd, 0xff, 0x56,
    0x06, 0x0c, 0x77, 0x4d, 0x26, 0x23, 0xcd, 0xd7, 0xee, 0x92, 0x20, 0xf3,
    0xf1, 0x66, 0x18, 0x9e, 0x05, 0x3f, 0x93, 0x43, 0xcb, 0xcf, 0xc8, 0x16,
    0xa6, 0x28, 0xda, 0xac, 0xa8, 0x51, 0xca, 0xb4, 0x95, 0x63, 0x77, 0x10,
    0xcc, 0x58, 0x3c, 0x22, 0xb4, 0xe9, 0x9c, 0x40, 0x0b, 0x49, 0xbc, 0x56,
    0xa6, 0xa5, 0xde, 0x53, 0xb5, 0xe5, 0x9a, 0x81, 0x6d, 0xe3, 0x96, 0x97,
    0x2e, 0xa0, 0x8d, 0x4d, 0x32, 0xc4, 0x3c, 0x4b, 0xd2, 0x96, 0xef, 0x3e,
    0xca, 0x48, 0x25, 0xd4, 0x3d, 0xba, 0x87, 0xea, 0x40, 0x86, 0x73, 0x35,
    0x72, 0xb7, 0xc7, 0x69, 0xec, 0xf5, 0xf1, 0xaf, 0x79, 0x4c, 0x47, 0xe5,
    0x4e, 0xfe, 0x7d, 0xeb, 0x31, 0xe9, 0x3f, 0x8a, 0xd0, 0x9c, 0x0c, 0x87,
    0xa1, 0xc8, 0x28, 0x5e, 0x08, 0x41, 0xa4, 0xf1, 0xfa, 0x91, 0x93, 0x96,
    0xb8, 0xe6, 0x2a, 0x2a, 0x0a, 0x99, 0x6f, 0xe9, 0xe3, 0x07, 0x99, 0x74,
    0x33, 0x7d, 0xee, 0x48, 0xa8, 0xb9, 0x06, 0xce, 0xba, 0x09, 0x8f, 0x84,
    0x57, 0xbb, 0x35, 0x66, 0x8c, 0x08, 0x68, 0x4a, 0x63, 0xd4, 0xc1, 0xd8,
    0x01, 0xb6, 0xfd, 0x4a, 0x56, 0xf7, 0x46, 0xeb, 0xce, 0xea, 0x8e, 0x54,
    0xf6, 0xc8, 0xa8, 0xac, 0xf6, 0xf1, 0x09, 0x7a, 0xab, 0x74, 0xdb, 0x3a,
    0x78, 0x69, 0xde, 0xfb, 0xe2, 0x78, 0xed, 0x0c, 0xfa, 0x3f, 0x6a, 0x11,
    0x5f, 0xd8, 0xcc, 0x69, 0xbb, 0x40, 0x18, 0x32, 0x62, 0x66, 0xb7, 0xb6,
    0x0f, 0xe2, 0xa3, 0xc2, 0x17, 0x18, 0x81, 0x36, 0xcb, 0x6e, 0xbf, 0xea,
    0x95, 0xe1, 0xe9, 0xe0, 0x8c, 0x64, 0x94, 0xb2, 0x05, 0x8a, 0xe3, 0xf6,
    0x0d, 0x7b, 0x7a, 0xb1, 0xf0, 0xc1, 0x98, 0x3e, 0xd5, 0x7d, 0x80, 0x36,
    0xa6, 0x88, 0x25, 0xbc, 0x4f, 0x75, 0x90, 0x7f, 0xa0, 0xb2, 0xa7, 0x76,
    0x6a, 0x29, 0x8a, 0xb8, 0xaa, 0x11, 0x6a, 0x84, 0x56, 0x48, 0xae, 0x30,
    0x3b, 0x86, 0x5e, 0xe6, 0xc6, 0x06, 0x8b, 0x98, 0x57, 0x09, 0x38, 0xf3,
    0x21, 0x67, 0xe0, 0x0d, 0x5f, 0x7b, 0x20, 0xba, 0xa5, 0xd3, 0x6c, 0x2c,
    0x20, 0x1e, 0x77, 0x55, 0x73, 0xa3, 0x83, 0x1a, 0xc9, 0x80, 0x4a, 0xf3,
    0x5a, 0x2b, 0x0b, 0xf1, 0x2f, 0xf5, 0x66, 0xbb, 0xb6, 0xfb, 0x23, 0xed,
    0x78, 0xfe, 0x91, 0xce, 0xae, 0x9f, 0xc1, 0xea, 0x9d, 0x51, 0x09, 0x9b,
    0x91, 0x8e, 0xf3, 0x90, 0x65, 0x41, 0xcb, 0x9e, 0x70, 0x90, 0xc3, 0x06,
    0xc8, 0xc9, 0xf9, 0xb7, 0x1c, 0x91, 0x89, 0x00, 0x56, 0xb2, 0x2c, 0x7a,
    0x80, 0x59, 0x5c, 0xe1, 0xe2, 0xc5, 0x7a, 0xac, 0xde, 0x32, 0x55, 0x2e,
    0xcf, 0xae, 0x24, 0x0c, 0xd3, 0xc8, 0x30, 0xba, 0x54, 0xe6, 0x86, 0x03,
    0xb0, 0xbb, 0x1a, 0x1e, 0xab, 0xa8, 0x8e, 0xeb, 0xdd, 0x78, 0x5a, 0xb8,
    0x55, 0xf3, 0x19, 0x94, 0xbf, 0xab, 0xf0, 0x9e, 0x22, 0x33, 0xee, 0xac,
    0xb7, 0x92, 0x7a, 0x66, 0xc7, 0xc5, 0x78, 0x5f, 0xf3, 0x93, 0x77, 0xc6,
    0x12, 0x6a, 0x12, 0x66, 0xdd, 0x9e, 0x50, 0xcb, 0xc4, 0xcf, 0x55, 0x92,
    0x37, 0x39, 0x2d, 0x40, 0xc2, 0xdb, 0xb3, 0xec, 0xd8, 0xac, 0x48, 0x6b,
    0x4c, 0x6e, 0x8e, 0x82, 0xc9, 0xfb, 0x29, 0x21, 0x84, 0xce, 0x26, 0x1c,
    0x98, 0xc8, 0xaf, 0x14, 0x7e, 0x2f, 0x24, 0x1d, 0x85, 0x89, 0x69, 0x92,
    0x15, 0x5c, 0x5e, 0x59, 0x49, 0x2b, 0x47, 0x60, 0xb9, 0xbc, 0x24, 0x72,
    0x3a, 0x87, 0xaa, 0x74, 0x39, 0x62, 0x77, 0xe7, 0xa8, 0xe1, 0x50, 0x05,
    0x91, 0x96, 0x6e, 0x21, 0xa4, 0x4e, 0x4e, 0xc0, 0xee, 0xba, 0x21, 0xad,
    0x8f, 0x06, 0x90, 0x0f, 0x07, 0x27, 0x19, 0x2e,
];

pub(crate) const P521_PPK: [u8; 132] = [
    0x00, 0xa3, 0xa5, 0x81, 0x8e, 0xf7, 0xcd, 0xb8, 0x0c, 0x63, 0x25, 0x28,
    0x96, 0x86, 0xaa, 0xcf, 0xea, 0x4d, 0x64, 0xba, 0x72, 0xd7, 0x30, 0x94,
    0xa1, 0x0c, 0x36, 0xb2, 0x1d, 0x3c, 0xdb, 0x96, 0xdc, 0xbd, 0x5a, 0xeb,
    0x62, 0xe0, 0xd7, 0xcf, 0x88, 0x57, 0x93, 0xff, 0x06, 0xca, 0xdf, 0xf3,
    0x38, 0x17, 0xcd, 0x8b, 0x6b, 0x7f, 0xbb, 0x40, 0xf4, 0x9a, 0x74, 0xbf,
    0xde, 0xcc, 0x90, 0x8c, 0x0f, 0xb9, 0x01, 0x50, 0x13, 0xd7, 0xea, 0x3e,
    0x5a, 0x5a, 0x09, 0x7a, 0x0f, 0x29, 0x81, 0x91, 0x0d, 0xc2, 0x56, 0x83,
    0x7e, 0x45, 0x3f, 0x4b, 0xaa, 0x61, 0x06, 0xd9, 0x27, 0xd4, 0x58, 0x9c,
    0xad, 0x5f, 0xae, 0x23, 0xe0, 0xb4, 0xea, 0xe6, 0x69, 0xb8, 0xca, 0x4f,
    0x6f, 0xd7, 0xc3, 0xfd, 0xf6, 0xf0, 0xd8, 0xb6, 0x62, 0x4c, 0xaa, 0x41,
    0xef, 0x54, 0x31, 0xa3, 0xa5, 0xa2, 0x80, 0x4a, 0x11, 0xd5, 0xe1, 0xa8,
];

pub(crate) const P521_SPK: [u8; 132] = [
    0x00, 0x0c, 0x7c, 0x66, 0x46, 0xa3, 0x1d, 0x0b, 0x8b, 0x3f, 0x83, 0x8a,
    0x2f, 0x1a, 0x8b, 0x78, 0x7d, 0x18, 0xaa, 0xb1, 0x6b, 0x11, 0x9f, 0xfd,
    0xa2, 0x5b, 0x37, 0x96, 0xe7, 0x56, 0xd9, 0xac, 0xa0, 0xa0, 0x55, 0x9f,
    0x57, 0x80, 0x86, 0x11, 0x68, 0x0d, 0x7f, 0x13, 0x70, 0xbd, 0xf4, 0xc8,
    0x73, 0xfd, 0xf4, 0xbc, 0xaf, 0xc0, 0x46, 0x10, 0x17, 0x5b, 0x28, 0xab,
    0x4d, 0x59, 0x64, 0x3b, 0xe4, 0xb6, 0x00, 0x47, 0xf5, 0x8c, 0x3d, 0x9c,
    0x06, 0xa1, 0x0d, 0xaf, 0x17, 0x3b, 0x40, 0x69, 0x74, 0xe6, 0x6c, 0xb3,
    0x96, 0x0c, 0xf5, 0x63, 0x6f, 0x3e, 0x60, 0xf3, 0x67, 0x85, 0x29, 0xc5,
    0xae, 0x0f, 0x78, 0x4d, 0x53, 0x4c, 0xfe, 0x1d, 0x83, 0x3d, 0x74, 0xdd,
    0x78, 0x6e, 0xfc, 0x5e, 0x15, 0xb5, 0x13, 0xf4, 0xe1, 0x0a, 0x2b, 0x9d,
    0xf5, 0x9c, 0x17, 0x94, 0x7a, 0x29, 0x1e, 0x8a, 0x07, 0xc6, 0x86, 0xaa,
];

pub(crate) const P521_SPK_SIGNATURE: [u8; 132] = [
    0x01, 0x39, 0x49, 0x4f, 0xe5, 0x36, 0x87, 0x2e, 0x99, 0xf3, 0xb4, 0x77,
    0x02, 0x41, 0xc7, 0x8f, 0xca, 0xd1, 0x13, 0x7b, 0xc6, 0x13, 0x42, 0xfa,
    0x25, 0xd9, 0x01, 0xb5, 0xb4, 0xcc, 0x9c, 0x26, 0x57, 0xc7, 0xdb, 0x78,
    0x85, 0x58, 0x76, 0x6c, 0x5c, 0xbe, 0xca, 0x02, 0xf2, 0x83, 0x8f, 0x90,
    0xdc, 0x42, 0x70, 0xf4, 0x22, 0x34, 0xba, 0xbb, 0x0e, 0x70, 0x1a, 0x62,
    0x0d, 0x5f, 0xa6, 0x3e, 0x19, 0x45, 0x00, 0xf1, 0x8e, 0xc6, 0xc3, 0x7e,
    0xd6, 0x3b, 0x22, 0xbe, 0xfc, 0xad, 0xac, 0x5b, 0x4c, 0x7c, 0x03, 0xe4,
    0x71, 0xb0, 0x0b, 0x1a, 0xff, 0x10, 0x3e, 0x5b, 0xa3, 0xfb, 0x3e, 0x19,
    0x3e, 0x2b, 0xeb, 0xe4, 0x7b, 0xc4, 0x60, 0x6c, 0x20, 0x4f, 0xd0, 0x6f,
    0xe9, 0x37, 0x41, 0x18, 0xfc, 0xce, 0xd2, 0x8a, 0xb1, 0x41, 0xa5, 0x8f,
    0xe2, 0x40, 0x26, 0x93, 0x3a, 0xa6, 0x83, 0xb3, 0xc5, 0x7e, 0xc9, 0x12,
];

pub(crate) const P521_DATA_SIGNATURE: [u8; 132] = [
    0x00, 0x07, 0x3f, 0x36, 0x13, 0x05, 0x47, 0x64, 0xcc, 0x6e, 0x2f, 0xc3,
    0xb9, 0x72, 0x82, 0xfe, 0xc6, 0x65, 0x4e, 0xe4, 0x93, 0x02, 0x40, 0xd6,
    0x06, 0xb2, 0xc0, 0x02, 0x25, 0x2a, 0x4c, 0xf2, 0x69, 0xef, 0x32, 0x1d,
    0xb1, 0x1f, 0x78, 0xbf, 0x9b, 0x52, 0x7c, 0x5f, 0xb5, 0xe4, 0x17, 0x5c,
    0xe8, 0xd3, 0x85, 0x37, 0xd9, 0xdd, 0x23, 0x21, 0x6b, 0x8a, 0xe2, 0xe3,
    0x7f, 0x61, 0xcc, 0x90, 0x36, 0xbe, 0x00, 0xcb, 0x19, 0x0a, 0x75, 0x22,
    0x92, 0x2a, 0xeb, 0xf8, 0xd9, 0xa3, 0xc0, 0xa4, 0x19, 0xd8, 0xf5, 0x9d,
    0x73, 0x8d, 0xa0, 0x0e, 0xe7, 0x5f, 0x80, 0x5f, 0x90, 0x18, 0x38, 0xd8,
    0x4c, 0x6d, 0xf6, 0x7e, 0x5b, 0x07, 0x9e, 0xc3, 0x73, 0xe6, 0xc2, 0xe1,
    0xc5, 0x35, 0x26, 0xf4, 0x3b, 0xc0, 0x87, 0xb3, 0xd4, 0x36, 0x2d, 0x24,
    0x8e, 0x35, 0x0a, 0x1b, 0x4b, 0x8c, 0xe9, 0xe7, 0x37, 0xd3, 0x4c, 0x98,
];
