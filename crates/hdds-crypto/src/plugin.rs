// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Cryptographic plugin facade and capability traits.
//!
//! The DDS Security crypto service exposes three logical roles -- key
//! factory, key exchange, transform -- with no behavioral reason to split
//! their state: all three operate on one keystore. A single `CryptoPlugin`
//! implements all three traits (OMG DDS Security v1.1 Sec.8.5.1).

use crate::error::SecurityError;
use crate::keystore::Keystore;
use crate::types::{
    CryptoToken, DatareaderCryptoHandle, DatawriterCryptoHandle, EndpointSecurityAttributes,
    IdentityHandle, ParticipantCryptoHandle, ParticipantSecurityAttributes, PermissionsHandle,
    Property, SecureSubmessageCategory, SharedSecret,
};
use parking_lot::Mutex;

/// The built-in `DDS:Crypto:AES_GCM_GMAC` plugin.
///
/// Passive and synchronous: callers own the threads, every operation
/// completes or fails without suspending. All shared state lives behind
/// one mutex acquired on entry to each operation.
pub struct CryptoPlugin {
    pub(crate) store: Mutex<Keystore>,
}

impl CryptoPlugin {
    /// Create a plugin instance with an empty keystore.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Mutex::new(Keystore::new()),
        }
    }
}

impl Default for CryptoPlugin {
    fn default() -> Self {
        Self::new()
    }
}

/// Crypto key factory role (DDS Security v1.1 Sec.8.5.1.7).
///
/// Mints crypto handles and creates/derives the key material bound to
/// them. Registration of the built-in participant-volatile-message secure
/// endpoints stores a placeholder; their real keys are derived from the
/// authentication shared secret when the remote side is matched.
pub trait CryptoKeyFactory {
    /// Register the local participant. No key material is stored (RTPS
    /// message protection is unsupported); returns a fresh handle.
    fn register_local_participant(
        &self,
        participant_identity: IdentityHandle,
        participant_permissions: PermissionsHandle,
        properties: &[Property],
        attributes: &ParticipantSecurityAttributes,
    ) -> Result<ParticipantCryptoHandle, SecurityError>;

    /// Register a matched remote participant; returns a fresh handle.
    fn register_matched_remote_participant(
        &self,
        local_participant_crypto: ParticipantCryptoHandle,
        remote_participant_identity: IdentityHandle,
        remote_participant_permissions: PermissionsHandle,
        shared_secret: &dyn SharedSecret,
    ) -> Result<ParticipantCryptoHandle, SecurityError>;

    /// Register a local datawriter, generating its submessage and/or
    /// payload keys per the endpoint attributes.
    fn register_local_datawriter(
        &self,
        participant_crypto: ParticipantCryptoHandle,
        properties: &[Property],
        attributes: &EndpointSecurityAttributes,
    ) -> Result<DatawriterCryptoHandle, SecurityError>;

    /// Register a remote datareader matched to a local datawriter.
    fn register_matched_remote_datareader(
        &self,
        local_datawriter_crypto: DatawriterCryptoHandle,
        remote_participant_crypto: ParticipantCryptoHandle,
        shared_secret: &dyn SharedSecret,
        relay_only: bool,
    ) -> Result<DatareaderCryptoHandle, SecurityError>;

    /// Register a local datareader, generating its submessage key per the
    /// endpoint attributes.
    fn register_local_datareader(
        &self,
        participant_crypto: ParticipantCryptoHandle,
        properties: &[Property],
        attributes: &EndpointSecurityAttributes,
    ) -> Result<DatareaderCryptoHandle, SecurityError>;

    /// Register a remote datawriter matched to a local datareader.
    fn register_matched_remote_datawriter(
        &self,
        local_datareader_crypto: DatareaderCryptoHandle,
        remote_participant_crypto: ParticipantCryptoHandle,
        shared_secret: &dyn SharedSecret,
    ) -> Result<DatawriterCryptoHandle, SecurityError>;

    /// Unregister a participant handle.
    fn unregister_participant(
        &self,
        participant_crypto: ParticipantCryptoHandle,
    ) -> Result<(), SecurityError>;

    /// Unregister a datawriter handle, purging its keys and sessions.
    fn unregister_datawriter(
        &self,
        datawriter_crypto: DatawriterCryptoHandle,
    ) -> Result<(), SecurityError>;

    /// Unregister a datareader handle, purging its keys and sessions.
    fn unregister_datareader(
        &self,
        datareader_crypto: DatareaderCryptoHandle,
    ) -> Result<(), SecurityError>;
}

/// Crypto key exchange role (DDS Security v1.1 Sec.8.5.1.8).
///
/// Converts locally held key sequences into discovery tokens and installs
/// token-carried key sequences for remote entities.
pub trait CryptoKeyExchange {
    /// Tokens carrying the local participant's key sequence (empty when
    /// the participant holds no keys).
    fn create_local_participant_crypto_tokens(
        &self,
        local_participant_crypto: ParticipantCryptoHandle,
        remote_participant_crypto: ParticipantCryptoHandle,
    ) -> Result<Vec<CryptoToken>, SecurityError>;

    /// Install a remote participant's key sequence from its tokens.
    fn set_remote_participant_crypto_tokens(
        &self,
        local_participant_crypto: ParticipantCryptoHandle,
        remote_participant_crypto: ParticipantCryptoHandle,
        remote_participant_tokens: &[CryptoToken],
    ) -> Result<(), SecurityError>;

    /// Tokens carrying a local datawriter's key sequence.
    fn create_local_datawriter_crypto_tokens(
        &self,
        local_datawriter_crypto: DatawriterCryptoHandle,
        remote_datareader_crypto: DatareaderCryptoHandle,
    ) -> Result<Vec<CryptoToken>, SecurityError>;

    /// Install a remote datawriter's key sequence from its tokens.
    fn set_remote_datawriter_crypto_tokens(
        &self,
        local_datareader_crypto: DatareaderCryptoHandle,
        remote_datawriter_crypto: DatawriterCryptoHandle,
        remote_datawriter_tokens: &[CryptoToken],
    ) -> Result<(), SecurityError>;

    /// Tokens carrying a local datareader's key sequence.
    fn create_local_datareader_crypto_tokens(
        &self,
        local_datareader_crypto: DatareaderCryptoHandle,
        remote_datawriter_crypto: DatawriterCryptoHandle,
    ) -> Result<Vec<CryptoToken>, SecurityError>;

    /// Install a remote datareader's key sequence from its tokens.
    fn set_remote_datareader_crypto_tokens(
        &self,
        local_datawriter_crypto: DatawriterCryptoHandle,
        remote_datareader_crypto: DatareaderCryptoHandle,
        remote_datareader_tokens: &[CryptoToken],
    ) -> Result<(), SecurityError>;

    /// Return tokens received from a peer. Nothing to release; accepts
    /// and discards.
    fn return_crypto_tokens(&self, crypto_tokens: &[CryptoToken]) -> Result<(), SecurityError>;
}

/// Crypto transform role (DDS Security v1.1 Sec.8.5.1.9).
///
/// Produces and consumes the SEC_PREFIX / SEC_BODY / SEC_POSTFIX wire
/// framing. Encode operations return the wire bytes; decode operations
/// return the recovered plaintext. Endpoints whose protection options are
/// off pass data through unchanged.
pub trait CryptoTransform {
    /// Encrypt (or pass through) a serialized payload for a datawriter.
    fn encode_serialized_payload(
        &self,
        plain_buffer: &[u8],
        sending_datawriter_crypto: DatawriterCryptoHandle,
    ) -> Result<Vec<u8>, SecurityError>;

    /// Protect a datawriter submessage. `receiving_index` is advanced to
    /// the list length on success (one encoding serves all receivers; the
    /// list may be empty to address all associated readers).
    fn encode_datawriter_submessage(
        &self,
        plain_rtps_submessage: &[u8],
        sending_datawriter_crypto: DatawriterCryptoHandle,
        receiving_datareader_crypto_list: &[DatareaderCryptoHandle],
        receiving_index: &mut i32,
    ) -> Result<Vec<u8>, SecurityError>;

    /// Protect a datareader submessage.
    fn encode_datareader_submessage(
        &self,
        plain_rtps_submessage: &[u8],
        sending_datareader_crypto: DatareaderCryptoHandle,
        receiving_datawriter_crypto_list: &[DatawriterCryptoHandle],
    ) -> Result<Vec<u8>, SecurityError>;

    /// RTPS message protection is not implemented: validates arguments,
    /// copies the input, and advances `receiving_index` by one.
    fn encode_rtps_message(
        &self,
        plain_rtps_message: &[u8],
        sending_participant_crypto: ParticipantCryptoHandle,
        receiving_participant_crypto_list: &[ParticipantCryptoHandle],
        receiving_index: &mut i32,
    ) -> Result<Vec<u8>, SecurityError>;

    /// Counterpart of `encode_rtps_message`: validated passthrough.
    fn decode_rtps_message(
        &self,
        encoded_rtps_message: &[u8],
        receiving_participant_crypto: ParticipantCryptoHandle,
        sending_participant_crypto: ParticipantCryptoHandle,
    ) -> Result<Vec<u8>, SecurityError>;

    /// Classify an inbound secure submessage: parse its crypto header and
    /// find the matching key among the sending participant's entities.
    fn preprocess_secure_submsg(
        &self,
        encoded_rtps_submessage: &[u8],
        receiving_participant_crypto: ParticipantCryptoHandle,
        sending_participant_crypto: ParticipantCryptoHandle,
    ) -> Result<SecureSubmessageCategory, SecurityError>;

    /// Recover the plaintext submessage sent by a remote datawriter.
    /// The receiving handle may be nil (origin auth not implemented).
    fn decode_datawriter_submessage(
        &self,
        encoded_rtps_submessage: &[u8],
        receiving_datareader_crypto: DatareaderCryptoHandle,
        sending_datawriter_crypto: DatawriterCryptoHandle,
    ) -> Result<Vec<u8>, SecurityError>;

    /// Recover the plaintext submessage sent by a remote datareader.
    fn decode_datareader_submessage(
        &self,
        encoded_rtps_submessage: &[u8],
        receiving_datawriter_crypto: DatawriterCryptoHandle,
        sending_datareader_crypto: DatareaderCryptoHandle,
    ) -> Result<Vec<u8>, SecurityError>;

    /// Recover a serialized payload encoded by a remote datawriter.
    fn decode_serialized_payload(
        &self,
        encoded_buffer: &[u8],
        receiving_datareader_crypto: DatareaderCryptoHandle,
        sending_datawriter_crypto: DatawriterCryptoHandle,
    ) -> Result<Vec<u8>, SecurityError>;
}
