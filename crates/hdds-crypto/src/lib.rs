// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in Cryptographic Plugin for DDS Security v1.1
//!
//! Implements the `DDS:Crypto:AES_GCM_GMAC` transformation set per OMG DDS
//! Security v1.1 Sec.8.5 (plugin model) and Sec.9.5 (built-in crypto):
//!
//! - **Key Factory** -- crypto handle registration for participants,
//!   datawriters and datareaders, including the built-in volatile secure
//!   endpoints whose keys are derived from the authentication handshake's
//!   shared secret
//! - **Key Exchange** -- conversion of key material to/from discovery-time
//!   crypto tokens
//! - **Transform** -- AES-256-GCM encryption and AES-256-GMAC origin
//!   authentication of serialized payloads and RTPS submessages, framed as
//!   SEC_PREFIX / SEC_BODY / SEC_POSTFIX per RTPS v2.5 Sec.9.6.2
//!
//! # Architecture
//!
//! ```text
//! CryptoPlugin
//! +-- Keystore        (handle -> key sequence / protection options / sessions)
//! +-- Session         (per-(handle, key-index) derived key + IV counter)
//! +-- Transform       (crypto header/footer codec, AEAD dispatch)
//! ```
//!
//! All three plugin roles share one keystore behind a single mutex; long
//! operations hold the lock for the duration of the transform (the plugin is
//! a passive library, callers own the threads).
//!
//! # Example
//!
//! ```no_run
//! use hdds_crypto::{
//!     CryptoKeyExchange, CryptoKeyFactory, CryptoPlugin, CryptoTransform,
//!     EndpointSecurityAttributes, ParticipantSecurityAttributes, SharedSecret,
//!     FLAG_IS_SUBMESSAGE_ENCRYPTED,
//! };
//!
//! struct HandshakeResult {
//!     c1: Vec<u8>,
//!     c2: Vec<u8>,
//!     secret: Vec<u8>,
//! }
//!
//! impl SharedSecret for HandshakeResult {
//!     fn challenge1(&self) -> &[u8] {
//!         &self.c1
//!     }
//!     fn challenge2(&self) -> &[u8] {
//!         &self.c2
//!     }
//!     fn shared_secret(&self) -> &[u8] {
//!         &self.secret
//!     }
//! }
//!
//! # fn main() -> Result<(), hdds_crypto::SecurityError> {
//! let secret = HandshakeResult {
//!     c1: vec![1; 32],
//!     c2: vec![2; 32],
//!     secret: vec![3; 32],
//! };
//!
//! let writer_side = CryptoPlugin::new();
//! let participant = writer_side.register_local_participant(
//!     1,
//!     1,
//!     &[],
//!     &ParticipantSecurityAttributes::default(),
//! )?;
//!
//! let attributes = EndpointSecurityAttributes {
//!     is_submessage_protected: true,
//!     plugin_endpoint_attributes: FLAG_IS_SUBMESSAGE_ENCRYPTED,
//!     ..Default::default()
//! };
//! let writer = writer_side.register_local_datawriter(participant, &[], &attributes)?;
//!
//! let remote_participant =
//!     writer_side.register_matched_remote_participant(participant, 2, 2, &secret)?;
//! let remote_reader =
//!     writer_side.register_matched_remote_datareader(writer, remote_participant, &secret, false)?;
//!
//! // Tokens travel to the peer via discovery; the peer installs them with
//! // set_remote_datawriter_crypto_tokens and can then decode our submessages.
//! let tokens = writer_side.create_local_datawriter_crypto_tokens(writer, remote_reader)?;
//!
//! let mut index = 0;
//! let encoded = writer_side.encode_datawriter_submessage(
//!     &[0x15, 0x01, 0x04, 0x00, 0xDE, 0xAD, 0xBE, 0xEF],
//!     writer,
//!     &[remote_reader],
//!     &mut index,
//! )?;
//! # let _ = (tokens, encoded);
//! # Ok(())
//! # }
//! ```
//!
//! # Scope
//!
//! RTPS-message-level protection and per-receiver origin authentication are
//! not implemented: `encode_rtps_message` / `decode_rtps_message` are
//! validated passthroughs and the crypto footer always carries an empty
//! receiver-specific MAC sequence.
//!
//! # References
//!
//! - [OMG DDS Security v1.1](https://www.omg.org/spec/DDS-SECURITY/1.1/) -- Sec.8.5, Sec.9.5
//! - [RTPS v2.5](https://www.omg.org/spec/DDSI-RTPS/2.5/) -- Sec.9.6.2 (secure submessages)
//! - [NIST SP 800-38D](https://nvlpubs.nist.gov/nistpubs/Legacy/SP/nistspecialpublication800-38d.pdf) -- GCM/GMAC

pub mod aes_gcm;
pub mod constants;
mod error;
mod key_exchange;
mod key_factory;
mod key_material;
mod keystore;
mod plugin;
mod ser;
mod session;
mod transform;
mod types;

pub use constants::{FLAG_IS_PAYLOAD_ENCRYPTED, FLAG_IS_SUBMESSAGE_ENCRYPTED};
pub use error::SecurityError;
pub use key_material::{
    CRYPTO_TRANSFORMATION_KIND_AES128_GCM, CRYPTO_TRANSFORMATION_KIND_AES128_GMAC,
    CRYPTO_TRANSFORMATION_KIND_AES256_GCM, CRYPTO_TRANSFORMATION_KIND_AES256_GMAC,
    TRANSFORM_KIND_INDEX,
};
pub use plugin::{CryptoKeyExchange, CryptoKeyFactory, CryptoPlugin, CryptoTransform};
pub use types::{
    BinaryProperty, CryptoToken, DatareaderCryptoHandle, DatawriterCryptoHandle,
    EndpointSecurityAttributes, IdentityHandle, ParticipantCryptoHandle,
    ParticipantSecurityAttributes, PermissionsHandle, Property, SecureSubmessageCategory,
    SharedSecret, HANDLE_NIL,
};

/// Result alias used across the plugin surface.
pub type SecurityResult<T> = Result<T, SecurityError>;
