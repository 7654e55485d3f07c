// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Handle, attribute, property, and token types of the plugin surface.
//!
//! These mirror the DDS Security v1.1 Sec.8.5 interface types consumed and
//! produced by the cryptographic plugin. Handles are opaque non-zero
//! integers minted by the keystore; zero is the nil sentinel.

/// Opaque crypto handle; non-zero once registered
pub type CryptoHandle = i32;

/// Nil handle sentinel
pub const HANDLE_NIL: CryptoHandle = 0;

/// Handle for a registered participant
pub type ParticipantCryptoHandle = CryptoHandle;
/// Handle for a registered datawriter
pub type DatawriterCryptoHandle = CryptoHandle;
/// Handle for a registered datareader
pub type DatareaderCryptoHandle = CryptoHandle;
/// Identity handle issued by the authentication plugin
pub type IdentityHandle = CryptoHandle;
/// Permissions handle issued by the access control plugin
pub type PermissionsHandle = CryptoHandle;

/// Participant security attributes consumed at registration
/// (DDS Security v1.1 Sec.8.4.2.4)
#[derive(Debug, Clone, Copy, Default)]
pub struct ParticipantSecurityAttributes {
    /// Whole-RTPS-message protection; unsupported by this plugin
    pub is_rtps_protected: bool,
}

/// Endpoint security attributes consumed at registration
/// (DDS Security v1.1 Sec.8.4.2.7)
#[derive(Debug, Clone, Copy, Default)]
pub struct EndpointSecurityAttributes {
    /// Protect datawriter/datareader submessages
    pub is_submessage_protected: bool,
    /// Protect serialized payloads (datawriters only)
    pub is_payload_protected: bool,
    /// Plugin attribute mask; see [`crate::FLAG_IS_SUBMESSAGE_ENCRYPTED`]
    /// and [`crate::FLAG_IS_PAYLOAD_ENCRYPTED`]
    pub plugin_endpoint_attributes: u32,
}

/// Name/value configuration property passed to registration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    /// Property name (only `dds.sec.builtin_endpoint_name` is recognized)
    pub name: String,
    /// Property value
    pub value: String,
}

/// Named binary property carried inside a crypto token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryProperty {
    /// Property name
    pub name: String,
    /// Opaque property bytes
    pub value: Vec<u8>,
    /// Whether discovery propagates the property to peers
    pub propagate: bool,
}

/// Crypto token exchanged via discovery (DDS Security v1.1 Sec.7.2.4)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CryptoToken {
    /// Token class id; `DDS:Crypto:AES_GCM_GMAC` for this plugin
    pub class_id: String,
    /// Binary properties; key material travels as `dds.cryp.keymat`
    pub binary_properties: Vec<BinaryProperty>,
}

/// Shared secret produced by the authentication handshake.
///
/// Input to the volatile-endpoint key derivation; both challenge values and
/// the secret must be identical on the two sides of a match.
pub trait SharedSecret {
    /// First handshake challenge
    fn challenge1(&self) -> &[u8];
    /// Second handshake challenge
    fn challenge2(&self) -> &[u8];
    /// The shared secret bytes
    fn shared_secret(&self) -> &[u8];
}

/// Classification of an inbound secure submessage, resolved by
/// `preprocess_secure_submsg` together with the originating entity handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecureSubmessageCategory {
    /// Submessage originated by the matched remote datawriter
    DatawriterSubmessage(DatawriterCryptoHandle),
    /// Submessage originated by the matched remote datareader
    DatareaderSubmessage(DatareaderCryptoHandle),
}
