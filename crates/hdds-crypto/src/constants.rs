// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Protocol constants for the built-in cryptographic plugin.
//!
//! Centralizes the RTPS security submessage ids, wire-format lengths, key
//! sizes, and DDS Security token literals so the transform and key-exchange
//! modules share a single source of truth.
//!
//! # References
//!
//! - RTPS v2.5 Sec.9.4.5.1.1 (secure submessage ids)
//! - OMG DDS Security v1.1 Sec.9.5.2 (AES-GCM-GMAC key material and tokens)

/// SEC_BODY submessage id (wraps encrypted content)
pub const RTPS_SUBMSG_SEC_BODY: u8 = 0x30;

/// SEC_PREFIX submessage id (carries the crypto header)
pub const RTPS_SUBMSG_SEC_PREFIX: u8 = 0x31;

/// SEC_POSTFIX submessage id (carries the crypto footer)
pub const RTPS_SUBMSG_SEC_POSTFIX: u8 = 0x32;

/// RTPS submessage header size (id + flags + octetsToNextHeader)
pub const SMHDR_SZ: usize = 4;

/// Endianness bit of the RTPS submessage flags octet (set = little-endian)
pub const FLAG_ENDIANNESS: u8 = 0x01;

/// Serialized crypto header length:
/// transformation_kind(4) + transformation_key_id(4) + session_id(4) +
/// initialization_vector_suffix(8)
pub const CRYPTO_HEADER_LENGTH: usize = 20;

/// Bytes prepended to encrypted content (u32 ciphertext length)
pub const CRYPTO_CONTENT_ADDED_LENGTH: usize = 4;

/// AES-256 key length
pub const KEY_LEN_BYTES: usize = 32;

/// AES block length
pub const BLOCK_LEN_BYTES: usize = 16;

/// AES blocks a single session key may cover before the session id rotates
pub const MAX_BLOCKS_PER_SESSION: u32 = 1024;

/// GCM initialization vector length (session_id || iv_suffix)
pub const IV_LEN: usize = 12;

/// GCM authentication tag length (the footer's common MAC)
pub const TAG_LEN: usize = 16;

/// HDDS vendor id; tags the volatile-endpoint placeholder key material
/// (never sent on the wire as a real transformation kind)
pub const VENDOR_ID: [u8; 2] = [0x01, 0xAA];

/// Token class id for the built-in transformation set
pub const CRYPTO_TOKEN_CLASS_ID: &str = "DDS:Crypto:AES_GCM_GMAC";

/// Name of the binary token property holding serialized key material
pub const TOKEN_KEYMAT_NAME: &str = "dds.cryp.keymat";

/// Registration property selecting the volatile-endpoint code path
pub const BUILTIN_ENDPOINT_NAME_PROPERTY: &str = "dds.sec.builtin_endpoint_name";

/// Property value naming the built-in volatile secure writer
pub const VOLATILE_WRITER_NAME: &str = "BuiltinParticipantVolatileMessageSecureWriter";

/// Property value naming the built-in volatile secure reader
pub const VOLATILE_READER_NAME: &str = "BuiltinParticipantVolatileMessageSecureReader";

/// Plugin endpoint attribute: submessage protection uses AES-GCM
/// (DDS Security v1.1 Sec.8.4.2.8)
pub const FLAG_IS_SUBMESSAGE_ENCRYPTED: u32 = 0x0000_0001;

/// Plugin endpoint attribute: payload protection uses AES-GCM
pub const FLAG_IS_PAYLOAD_ENCRYPTED: u32 = 0x0000_0002;
