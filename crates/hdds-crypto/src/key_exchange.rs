// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Key exchange: key sequences to/from discovery crypto tokens.
//!
//! A token carries one serialized `KeyMaterial` in a binary property named
//! `dds.cryp.keymat` under class id `DDS:Crypto:AES_GCM_GMAC`. Conversion
//! is deliberately tolerant on the inbound side: tokens with a foreign
//! class id, a missing property, or an undecodable value are skipped, not
//! fatal, preserving forward compatibility with newer peers.

use crate::constants::{CRYPTO_TOKEN_CLASS_ID, TOKEN_KEYMAT_NAME};
use crate::error::SecurityError;
use crate::key_material::{deserialize_key_material, serialize_key_material, KeyMaterial};
use crate::plugin::{CryptoKeyExchange, CryptoPlugin};
use crate::types::{
    BinaryProperty, CryptoToken, DatareaderCryptoHandle, DatawriterCryptoHandle,
    ParticipantCryptoHandle, HANDLE_NIL,
};

/// One token per key material entry, in sequence order.
fn keys_to_tokens(keys: &[KeyMaterial]) -> Vec<CryptoToken> {
    keys.iter()
        .map(|key| CryptoToken {
            class_id: CRYPTO_TOKEN_CLASS_ID.to_string(),
            binary_properties: vec![BinaryProperty {
                name: TOKEN_KEYMAT_NAME.to_string(),
                value: serialize_key_material(key),
                propagate: true,
            }],
        })
        .collect()
}

/// Decode every recognizable token; skip the rest silently. Only the
/// first `dds.cryp.keymat` property of a token is considered.
fn tokens_to_keys(tokens: &[CryptoToken]) -> Vec<KeyMaterial> {
    let mut keys = Vec::new();
    for token in tokens {
        if token.class_id != CRYPTO_TOKEN_CLASS_ID {
            log::debug!(
                "[crypto] skipping token with unknown class id {:?}",
                token.class_id
            );
            continue;
        }
        if let Some(property) = token
            .binary_properties
            .iter()
            .find(|property| property.name == TOKEN_KEYMAT_NAME)
        {
            match deserialize_key_material(&property.value) {
                Ok(key) => keys.push(key),
                Err(err) => {
                    log::warn!("[crypto] skipping undecodable key material token: {}", err)
                }
            }
        }
    }
    keys
}

fn validate_pair(local: i32, remote: i32) -> Result<(), SecurityError> {
    if local == HANDLE_NIL {
        return Err(SecurityError::InvalidHandle(
            "nil local crypto handle".to_string(),
        ));
    }
    if remote == HANDLE_NIL {
        return Err(SecurityError::InvalidHandle(
            "nil remote crypto handle".to_string(),
        ));
    }
    Ok(())
}

impl CryptoPlugin {
    fn create_tokens(&self, local: i32, remote: i32) -> Result<Vec<CryptoToken>, SecurityError> {
        validate_pair(local, remote)?;
        let store = self.store.lock();
        // A handle without keys legitimately yields no tokens
        Ok(store
            .keys
            .get(&local)
            .map(|keys| keys_to_tokens(keys))
            .unwrap_or_default())
    }

    fn set_tokens(
        &self,
        local: i32,
        remote: i32,
        tokens: &[CryptoToken],
    ) -> Result<(), SecurityError> {
        validate_pair(local, remote)?;
        let mut store = self.store.lock();
        store.keys.insert(remote, tokens_to_keys(tokens));
        Ok(())
    }
}

impl CryptoKeyExchange for CryptoPlugin {
    fn create_local_participant_crypto_tokens(
        &self,
        local_participant_crypto: ParticipantCryptoHandle,
        remote_participant_crypto: ParticipantCryptoHandle,
    ) -> Result<Vec<CryptoToken>, SecurityError> {
        self.create_tokens(local_participant_crypto, remote_participant_crypto)
    }

    fn set_remote_participant_crypto_tokens(
        &self,
        local_participant_crypto: ParticipantCryptoHandle,
        remote_participant_crypto: ParticipantCryptoHandle,
        remote_participant_tokens: &[CryptoToken],
    ) -> Result<(), SecurityError> {
        self.set_tokens(
            local_participant_crypto,
            remote_participant_crypto,
            remote_participant_tokens,
        )
    }

    fn create_local_datawriter_crypto_tokens(
        &self,
        local_datawriter_crypto: DatawriterCryptoHandle,
        remote_datareader_crypto: DatareaderCryptoHandle,
    ) -> Result<Vec<CryptoToken>, SecurityError> {
        self.create_tokens(local_datawriter_crypto, remote_datareader_crypto)
    }

    fn set_remote_datawriter_crypto_tokens(
        &self,
        local_datareader_crypto: DatareaderCryptoHandle,
        remote_datawriter_crypto: DatawriterCryptoHandle,
        remote_datawriter_tokens: &[CryptoToken],
    ) -> Result<(), SecurityError> {
        self.set_tokens(
            local_datareader_crypto,
            remote_datawriter_crypto,
            remote_datawriter_tokens,
        )
    }

    fn create_local_datareader_crypto_tokens(
        &self,
        local_datareader_crypto: DatareaderCryptoHandle,
        remote_datawriter_crypto: DatawriterCryptoHandle,
    ) -> Result<Vec<CryptoToken>, SecurityError> {
        self.create_tokens(local_datareader_crypto, remote_datawriter_crypto)
    }

    fn set_remote_datareader_crypto_tokens(
        &self,
        local_datawriter_crypto: DatawriterCryptoHandle,
        remote_datareader_crypto: DatareaderCryptoHandle,
        remote_datareader_tokens: &[CryptoToken],
    ) -> Result<(), SecurityError> {
        self.set_tokens(
            local_datawriter_crypto,
            remote_datareader_crypto,
            remote_datareader_tokens,
        )
    }

    fn return_crypto_tokens(&self, _crypto_tokens: &[CryptoToken]) -> Result<(), SecurityError> {
        Ok(())
    }
}
