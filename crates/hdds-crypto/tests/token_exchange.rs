// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Discovery-time token exchange and the RTPS message passthrough surface.

mod common;

use common::{matched_pair, matched_pair_no_tokens, submessage_encrypted};
use hdds_crypto::{
    CryptoKeyExchange, CryptoToken, CryptoTransform, EndpointSecurityAttributes, SecurityError,
    FLAG_IS_PAYLOAD_ENCRYPTED, FLAG_IS_SUBMESSAGE_ENCRYPTED,
};

#[test]
fn test_token_count_tracks_key_sequence() {
    let pair = matched_pair_no_tokens(&submessage_encrypted(), &[], &[]);
    let tokens = pair
        .writer_side
        .create_local_datawriter_crypto_tokens(pair.writer, pair.remote_reader)
        .unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].class_id, "DDS:Crypto:AES_GCM_GMAC");
    assert_eq!(tokens[0].binary_properties[0].name, "dds.cryp.keymat");

    let both = EndpointSecurityAttributes {
        is_submessage_protected: true,
        is_payload_protected: true,
        plugin_endpoint_attributes: FLAG_IS_SUBMESSAGE_ENCRYPTED | FLAG_IS_PAYLOAD_ENCRYPTED,
    };
    let pair = matched_pair_no_tokens(&both, &[], &[]);
    let tokens = pair
        .writer_side
        .create_local_datawriter_crypto_tokens(pair.writer, pair.remote_reader)
        .unwrap();
    assert_eq!(tokens.len(), 2, "submessage key and payload key");
}

#[test]
fn test_unprotected_writer_yields_no_tokens() {
    let pair = matched_pair_no_tokens(&EndpointSecurityAttributes::default(), &[], &[]);
    let tokens = pair
        .writer_side
        .create_local_datawriter_crypto_tokens(pair.writer, pair.remote_reader)
        .unwrap();
    assert!(tokens.is_empty());
}

#[test]
fn test_decode_before_tokens_fails_after_tokens_succeeds() {
    let pair = matched_pair_no_tokens(&submessage_encrypted(), &[], &[]);
    let plain = [1, 2, 3, 4];

    let mut index = 0;
    let encoded = pair
        .writer_side
        .encode_datawriter_submessage(&plain, pair.writer, &[pair.remote_reader], &mut index)
        .unwrap();

    // No tokens installed yet: the remote writer handle has no keys, so
    // the submessage cannot be matched to a key by lookup either
    assert!(matches!(
        pair.reader_side.preprocess_secure_submsg(
            &encoded,
            pair.reader_participant,
            pair.remote_writer_participant,
        ),
        Err(SecurityError::KeyNotRegistered { .. })
    ));

    let tokens = pair
        .writer_side
        .create_local_datawriter_crypto_tokens(pair.writer, pair.remote_reader)
        .unwrap();
    pair.reader_side
        .set_remote_datawriter_crypto_tokens(pair.reader, pair.remote_writer, &tokens)
        .unwrap();

    let decoded = pair
        .reader_side
        .decode_datawriter_submessage(&encoded, pair.reader, pair.remote_writer)
        .unwrap();
    assert_eq!(decoded, plain.to_vec());
}

#[test]
fn test_foreign_tokens_are_skipped_not_fatal() {
    let pair = matched_pair_no_tokens(&submessage_encrypted(), &[], &[]);
    let mut tokens = pair
        .writer_side
        .create_local_datawriter_crypto_tokens(pair.writer, pair.remote_reader)
        .unwrap();
    tokens.insert(
        0,
        CryptoToken {
            class_id: "DDS:Crypto:Vendor_Extension".to_string(),
            binary_properties: Vec::new(),
        },
    );

    pair.reader_side
        .set_remote_datawriter_crypto_tokens(pair.reader, pair.remote_writer, &tokens)
        .unwrap();

    let plain = [5, 6, 7, 8];
    let mut index = 0;
    let encoded = pair
        .writer_side
        .encode_datawriter_submessage(&plain, pair.writer, &[pair.remote_reader], &mut index)
        .unwrap();
    let decoded = pair
        .reader_side
        .decode_datawriter_submessage(&encoded, pair.reader, pair.remote_writer)
        .unwrap();
    assert_eq!(decoded, plain.to_vec());
}

#[test]
fn test_return_crypto_tokens_is_noop() {
    let pair = matched_pair(&submessage_encrypted());
    let tokens = pair
        .writer_side
        .create_local_datawriter_crypto_tokens(pair.writer, pair.remote_reader)
        .unwrap();
    pair.writer_side.return_crypto_tokens(&tokens).unwrap();
}

#[test]
fn test_participant_tokens_empty_without_keys() {
    let pair = matched_pair(&submessage_encrypted());
    let tokens = pair
        .writer_side
        .create_local_participant_crypto_tokens(
            pair.writer_participant,
            pair.remote_reader_participant,
        )
        .unwrap();
    assert!(tokens.is_empty(), "participants hold no key material");
}

#[test]
fn test_rtps_message_passthrough() {
    let pair = matched_pair(&submessage_encrypted());
    let message = [0x52, 0x54, 0x50, 0x53, 0x02, 0x04, 0x01, 0xAA];

    let mut index = 0;
    let encoded = pair
        .writer_side
        .encode_rtps_message(
            &message,
            pair.writer_participant,
            &[pair.remote_reader_participant],
            &mut index,
        )
        .unwrap();
    assert_eq!(encoded, message.to_vec());
    assert_eq!(index, 1, "index advances past the handled receiver");

    let decoded = pair
        .reader_side
        .decode_rtps_message(
            &encoded,
            pair.reader_participant,
            pair.remote_writer_participant,
        )
        .unwrap();
    assert_eq!(decoded, message.to_vec());
}

#[test]
fn test_rtps_message_validation() {
    let pair = matched_pair(&submessage_encrypted());
    let message = [1u8, 2, 3];

    let mut index = 0;
    assert!(pair
        .writer_side
        .encode_rtps_message(&message, 0, &[pair.remote_reader_participant], &mut index)
        .is_err());
    assert!(pair
        .writer_side
        .encode_rtps_message(&message, pair.writer_participant, &[], &mut index)
        .is_err());

    let mut out_of_range = 7;
    assert!(pair
        .writer_side
        .encode_rtps_message(
            &message,
            pair.writer_participant,
            &[pair.remote_reader_participant],
            &mut out_of_range,
        )
        .is_err());
    assert_eq!(out_of_range, 7, "index must not advance on error");

    assert!(pair
        .reader_side
        .decode_rtps_message(&message, 0, pair.remote_writer_participant)
        .is_err());
}
