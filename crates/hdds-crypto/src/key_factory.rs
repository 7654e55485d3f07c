// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Key factory: registration and unregistration of crypto handles.
//!
//! Local endpoint registration generates random master keys according to
//! the endpoint's protection attributes. The built-in
//! participant-volatile-message secure endpoints are special-cased: they
//! store a placeholder at registration, and the real AES-256-GCM key is
//! derived from the authentication handshake's shared secret when the
//! remote side is matched (DDS Security v1.1 Sec.9.5.2.2):
//!
//! ```text
//! master_salt       = HMAC-SHA256(SHA256(c1 || "keyexchange salt" || c2), secret)
//! master_sender_key = HMAC-SHA256(SHA256(c2 || "key exchange key" || c1), secret)
//! ```
//!
//! Both sides of a match feed the same (c1, c2, secret) and derive the
//! same key, so volatile traffic needs no token exchange.

use crate::constants::{
    BUILTIN_ENDPOINT_NAME_PROPERTY, VOLATILE_READER_NAME, VOLATILE_WRITER_NAME,
};
use crate::error::SecurityError;
use crate::key_material::{
    is_volatile_placeholder, make_key, make_volatile_placeholder,
    CRYPTO_TRANSFORMATION_KIND_AES256_GCM, KeyMaterial,
};
use crate::keystore::{EntityCategory, Keystore, ProtectionOptions};
use crate::plugin::{CryptoKeyFactory, CryptoPlugin};
use crate::aes_gcm;
use crate::types::{
    DatareaderCryptoHandle, DatawriterCryptoHandle, EndpointSecurityAttributes, IdentityHandle,
    ParticipantCryptoHandle, ParticipantSecurityAttributes, PermissionsHandle, Property,
    SharedSecret, HANDLE_NIL,
};

const KX_SALT_COOKIE: &[u8; 16] = b"keyexchange salt";
const KX_KEY_COOKIE: &[u8; 16] = b"key exchange key";

/// True when the registration properties name one of the built-in
/// volatile secure endpoints.
fn is_builtin_volatile(properties: &[Property]) -> bool {
    for property in properties {
        if property.name == BUILTIN_ENDPOINT_NAME_PROPERTY {
            return property.value == VOLATILE_WRITER_NAME
                || property.value == VOLATILE_READER_NAME;
        }
    }
    false
}

/// Derive the volatile-endpoint key from the handshake shared secret.
fn make_volatile_key(shared_secret: &dyn SharedSecret) -> KeyMaterial {
    let c1 = shared_secret.challenge1();
    let c2 = shared_secret.challenge2();
    let secret = shared_secret.shared_secret();

    let salt_key = aes_gcm::sha256_concat(&[c1, KX_SALT_COOKIE, c2]);
    let master_salt = aes_gcm::hmac_sha256(&salt_key, &[secret]).to_vec();

    let key_key = aes_gcm::sha256_concat(&[c2, KX_KEY_COOKIE, c1]);
    let master_sender_key = aes_gcm::hmac_sha256(&key_key, &[secret]).to_vec();

    KeyMaterial {
        transformation_kind: [0, 0, 0, CRYPTO_TRANSFORMATION_KIND_AES256_GCM],
        master_salt,
        sender_key_id: [0; 4],
        master_sender_key,
        receiver_specific_key_id: [0; 4],
        master_receiver_specific_key: Vec::new(),
    }
}

/// Generate the key sequence for a local endpoint, honoring the
/// registration-time protection options. Table 70 of the DDS Security
/// spec fixes the ordering: submessage key first, payload key after it.
fn make_endpoint_keys(
    store: &mut Keystore,
    handle: i32,
    is_writer: bool,
    properties: &[Property],
    options: ProtectionOptions,
) -> Result<Vec<KeyMaterial>, SecurityError> {
    if is_builtin_volatile(properties) {
        return Ok(vec![make_volatile_placeholder()]);
    }

    let mut keys = Vec::new();
    let mut used_handle = false;
    if options.submessage {
        keys.push(make_key(handle as u32, options.submessage_encrypted)?);
        used_handle = true;
        log::debug!(
            "[crypto] created submessage key for local handle {}",
            handle
        );
    }
    if is_writer && options.payload {
        // A second key needs its own id from the handle space
        let key_id = if used_handle {
            store.allocate_handle() as u32
        } else {
            handle as u32
        };
        keys.push(make_key(key_id, options.payload_encrypted)?);
        log::debug!("[crypto] created payload key for local handle {}", handle);
    }
    Ok(keys)
}

/// Install keys for a matched remote endpoint. When the local peer is a
/// volatile placeholder the remote handle receives the derived volatile
/// key immediately; otherwise keys arrive later via token exchange.
fn register_remote_endpoint(
    store: &mut Keystore,
    local_handle: i32,
    remote_participant: ParticipantCryptoHandle,
    category: EntityCategory,
    shared_secret: &dyn SharedSecret,
) -> Result<i32, SecurityError> {
    let local_is_placeholder = {
        let local_keys = store.keys.get(&local_handle).ok_or_else(|| {
            SecurityError::InvalidHandle("unknown local endpoint handle".to_string())
        })?;
        local_keys.len() == 1 && is_volatile_placeholder(&local_keys[0])
    };

    let handle = store.allocate_handle();

    if local_is_placeholder {
        // Create a key from the shared secret and track it as if key
        // exchange had happened
        let key = make_volatile_key(shared_secret);
        if key.master_salt.is_empty() || key.master_sender_key.is_empty() {
            return Err(SecurityError::DerivationFailure);
        }
        log::debug!(
            "[crypto] derived volatile key for remote handle {}",
            handle
        );
        store.keys.insert(handle, vec![key]);
    }

    store.insert_entity(remote_participant, category, handle);
    let options = store.options(local_handle);
    store.encrypt_options.insert(handle, options);
    Ok(handle)
}

impl CryptoKeyFactory for CryptoPlugin {
    fn register_local_participant(
        &self,
        participant_identity: IdentityHandle,
        participant_permissions: PermissionsHandle,
        _properties: &[Property],
        attributes: &ParticipantSecurityAttributes,
    ) -> Result<ParticipantCryptoHandle, SecurityError> {
        if participant_identity == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil local participant identity".to_string(),
            ));
        }
        if participant_permissions == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil local permissions handle".to_string(),
            ));
        }
        if attributes.is_rtps_protected {
            return Err(SecurityError::UnsupportedFeature(
                "RTPS message protection".to_string(),
            ));
        }

        Ok(self.store.lock().allocate_handle())
    }

    fn register_matched_remote_participant(
        &self,
        local_participant_crypto: ParticipantCryptoHandle,
        remote_participant_identity: IdentityHandle,
        remote_participant_permissions: PermissionsHandle,
        _shared_secret: &dyn SharedSecret,
    ) -> Result<ParticipantCryptoHandle, SecurityError> {
        if local_participant_crypto == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil local participant crypto handle".to_string(),
            ));
        }
        if remote_participant_identity == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil remote participant identity".to_string(),
            ));
        }
        if remote_participant_permissions == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil remote permissions handle".to_string(),
            ));
        }

        Ok(self.store.lock().allocate_handle())
    }

    fn register_local_datawriter(
        &self,
        participant_crypto: ParticipantCryptoHandle,
        properties: &[Property],
        attributes: &EndpointSecurityAttributes,
    ) -> Result<DatawriterCryptoHandle, SecurityError> {
        if participant_crypto == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil participant crypto handle".to_string(),
            ));
        }

        let mut store = self.store.lock();
        let handle = store.allocate_handle();
        let options = ProtectionOptions::from_attributes(attributes);
        let keys = make_endpoint_keys(&mut store, handle, true, properties, options)?;
        store.keys.insert(handle, keys);
        store.insert_entity(
            participant_crypto,
            EntityCategory::DatawriterSubmessage,
            handle,
        );
        store.encrypt_options.insert(handle, options);
        Ok(handle)
    }

    fn register_matched_remote_datareader(
        &self,
        local_datawriter_crypto: DatawriterCryptoHandle,
        remote_participant_crypto: ParticipantCryptoHandle,
        shared_secret: &dyn SharedSecret,
        _relay_only: bool,
    ) -> Result<DatareaderCryptoHandle, SecurityError> {
        if local_datawriter_crypto == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil local datawriter crypto handle".to_string(),
            ));
        }
        if remote_participant_crypto == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil remote participant crypto handle".to_string(),
            ));
        }

        let mut store = self.store.lock();
        register_remote_endpoint(
            &mut store,
            local_datawriter_crypto,
            remote_participant_crypto,
            EntityCategory::DatareaderSubmessage,
            shared_secret,
        )
    }

    fn register_local_datareader(
        &self,
        participant_crypto: ParticipantCryptoHandle,
        properties: &[Property],
        attributes: &EndpointSecurityAttributes,
    ) -> Result<DatareaderCryptoHandle, SecurityError> {
        if participant_crypto == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil participant crypto handle".to_string(),
            ));
        }

        let mut store = self.store.lock();
        let handle = store.allocate_handle();
        let options = ProtectionOptions::from_attributes(attributes);
        let keys = make_endpoint_keys(&mut store, handle, false, properties, options)?;
        store.keys.insert(handle, keys);
        store.insert_entity(
            participant_crypto,
            EntityCategory::DatareaderSubmessage,
            handle,
        );
        store.encrypt_options.insert(handle, options);
        Ok(handle)
    }

    fn register_matched_remote_datawriter(
        &self,
        local_datareader_crypto: DatareaderCryptoHandle,
        remote_participant_crypto: ParticipantCryptoHandle,
        shared_secret: &dyn SharedSecret,
    ) -> Result<DatawriterCryptoHandle, SecurityError> {
        if local_datareader_crypto == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil local datareader crypto handle".to_string(),
            ));
        }
        if remote_participant_crypto == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil remote participant crypto handle".to_string(),
            ));
        }

        let mut store = self.store.lock();
        register_remote_endpoint(
            &mut store,
            local_datareader_crypto,
            remote_participant_crypto,
            EntityCategory::DatawriterSubmessage,
            shared_secret,
        )
    }

    fn unregister_participant(
        &self,
        participant_crypto: ParticipantCryptoHandle,
    ) -> Result<(), SecurityError> {
        if participant_crypto == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil participant crypto handle".to_string(),
            ));
        }
        // Participants own no key material in this plugin
        Ok(())
    }

    fn unregister_datawriter(
        &self,
        datawriter_crypto: DatawriterCryptoHandle,
    ) -> Result<(), SecurityError> {
        if datawriter_crypto == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil datawriter crypto handle".to_string(),
            ));
        }
        self.store.lock().clear_endpoint_data(datawriter_crypto);
        Ok(())
    }

    fn unregister_datareader(
        &self,
        datareader_crypto: DatareaderCryptoHandle,
    ) -> Result<(), SecurityError> {
        if datareader_crypto == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil datareader crypto handle".to_string(),
            ));
        }
        self.store.lock().clear_endpoint_data(datareader_crypto);
        Ok(())
    }
}
