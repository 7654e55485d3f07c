// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Shared fixtures for the crypto plugin integration tests.

#![allow(dead_code)]

use hdds_crypto::{
    CryptoKeyExchange, CryptoKeyFactory, CryptoPlugin, DatareaderCryptoHandle,
    DatawriterCryptoHandle, EndpointSecurityAttributes, ParticipantCryptoHandle,
    ParticipantSecurityAttributes, Property, SharedSecret, FLAG_IS_PAYLOAD_ENCRYPTED,
    FLAG_IS_SUBMESSAGE_ENCRYPTED,
};

/// Deterministic stand-in for the authentication handshake result.
pub struct TestSecret {
    pub c1: Vec<u8>,
    pub c2: Vec<u8>,
    pub secret: Vec<u8>,
}

impl TestSecret {
    pub fn new() -> Self {
        Self {
            c1: vec![0x11; 32],
            c2: vec![0x22; 32],
            secret: vec![0x33; 32],
        }
    }
}

impl SharedSecret for TestSecret {
    fn challenge1(&self) -> &[u8] {
        &self.c1
    }
    fn challenge2(&self) -> &[u8] {
        &self.c2
    }
    fn shared_secret(&self) -> &[u8] {
        &self.secret
    }
}

/// Endpoint attributes: submessage protection with AES-GCM.
pub fn submessage_encrypted() -> EndpointSecurityAttributes {
    EndpointSecurityAttributes {
        is_submessage_protected: true,
        is_payload_protected: false,
        plugin_endpoint_attributes: FLAG_IS_SUBMESSAGE_ENCRYPTED,
    }
}

/// Endpoint attributes: submessage protection with AES-GMAC (auth only).
pub fn submessage_authenticated() -> EndpointSecurityAttributes {
    EndpointSecurityAttributes {
        is_submessage_protected: true,
        is_payload_protected: false,
        plugin_endpoint_attributes: 0,
    }
}

/// Endpoint attributes: payload protection with AES-GCM.
pub fn payload_encrypted() -> EndpointSecurityAttributes {
    EndpointSecurityAttributes {
        is_submessage_protected: false,
        is_payload_protected: true,
        plugin_endpoint_attributes: FLAG_IS_PAYLOAD_ENCRYPTED,
    }
}

/// A writer plugin and a reader plugin wired together the way discovery
/// would wire two participants.
pub struct MatchedPair {
    pub writer_side: CryptoPlugin,
    pub reader_side: CryptoPlugin,
    /// Local datawriter handle on the writer side
    pub writer: DatawriterCryptoHandle,
    /// Local datareader handle on the reader side
    pub reader: DatareaderCryptoHandle,
    /// Writer side's handle for the matched remote reader
    pub remote_reader: DatareaderCryptoHandle,
    /// Reader side's handle for the matched remote writer
    pub remote_writer: DatawriterCryptoHandle,
    /// Local participant handles
    pub writer_participant: ParticipantCryptoHandle,
    pub reader_participant: ParticipantCryptoHandle,
    /// Writer side's handle for the reader's participant
    pub remote_reader_participant: ParticipantCryptoHandle,
    /// Reader side's handle for the writer's participant
    pub remote_writer_participant: ParticipantCryptoHandle,
}

/// Register both sides of a writer/reader match without exchanging tokens.
pub fn matched_pair_no_tokens(
    attributes: &EndpointSecurityAttributes,
    writer_properties: &[Property],
    reader_properties: &[Property],
) -> MatchedPair {
    let secret = TestSecret::new();
    let writer_side = CryptoPlugin::new();
    let reader_side = CryptoPlugin::new();
    let participant_attributes = ParticipantSecurityAttributes::default();

    let writer_participant = writer_side
        .register_local_participant(1, 1, &[], &participant_attributes)
        .unwrap();
    let writer = writer_side
        .register_local_datawriter(writer_participant, writer_properties, attributes)
        .unwrap();
    let remote_reader_participant = writer_side
        .register_matched_remote_participant(writer_participant, 2, 2, &secret)
        .unwrap();
    let remote_reader = writer_side
        .register_matched_remote_datareader(writer, remote_reader_participant, &secret, false)
        .unwrap();

    let reader_participant = reader_side
        .register_local_participant(3, 3, &[], &participant_attributes)
        .unwrap();
    let reader = reader_side
        .register_local_datareader(reader_participant, reader_properties, attributes)
        .unwrap();
    let remote_writer_participant = reader_side
        .register_matched_remote_participant(reader_participant, 4, 4, &secret)
        .unwrap();
    let remote_writer = reader_side
        .register_matched_remote_datawriter(reader, remote_writer_participant, &secret)
        .unwrap();

    MatchedPair {
        writer_side,
        reader_side,
        writer,
        reader,
        remote_reader,
        remote_writer,
        writer_participant,
        reader_participant,
        remote_reader_participant,
        remote_writer_participant,
    }
}

/// Register both sides and run the discovery-time token exchange in both
/// directions.
pub fn matched_pair(attributes: &EndpointSecurityAttributes) -> MatchedPair {
    let pair = matched_pair_no_tokens(attributes, &[], &[]);

    let writer_tokens = pair
        .writer_side
        .create_local_datawriter_crypto_tokens(pair.writer, pair.remote_reader)
        .unwrap();
    pair.reader_side
        .set_remote_datawriter_crypto_tokens(pair.reader, pair.remote_writer, &writer_tokens)
        .unwrap();

    let reader_tokens = pair
        .reader_side
        .create_local_datareader_crypto_tokens(pair.reader, pair.remote_writer)
        .unwrap();
    pair.writer_side
        .set_remote_datareader_crypto_tokens(pair.writer, pair.remote_reader, &reader_tokens)
        .unwrap();

    pair
}

/// A well-formed little-endian DATA-style submessage: 4-byte header with a
/// correct length field, 8 payload bytes.
pub fn sample_submessage() -> Vec<u8> {
    let mut submessage = vec![0x15, 0x01, 0x08, 0x00];
    submessage.extend_from_slice(&[0xAA, 0xBB, 0xCC, 0xDD, 0x01, 0x02, 0x03, 0x04]);
    submessage
}
