// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Keystore: handle allocation and per-handle crypto state.
//!
//! One instance per plugin, guarded by a single mutex owned by
//! `CryptoPlugin`. Every public plugin operation acquires the lock on
//! entry; the maps here are only touched under it.
//!
//! State per the DDS Security plugin model:
//!
//! - `keys` -- handle -> ordered key material sequence. Local writers hold
//!   the submessage key at index 0 and the payload key after it; local
//!   readers hold the submessage key at index 0; remote entities hold their
//!   peer's sequence verbatim from token exchange.
//! - `encrypt_options` -- handle -> protection options reduced from the
//!   registration-time endpoint attributes.
//! - `participant_to_entity` -- reverse index from a participant handle to
//!   the endpoints originating from it; drives inbound lookup.
//! - `sessions` -- (handle, key-index) -> session state. Ordered so a
//!   handle's sessions can be purged as a range on unregister.

use crate::key_material::KeyMaterial;
use crate::session::Session;
use crate::types::{CryptoHandle, EndpointSecurityAttributes, ParticipantCryptoHandle};
use crate::{FLAG_IS_PAYLOAD_ENCRYPTED, FLAG_IS_SUBMESSAGE_ENCRYPTED};
use std::collections::{BTreeMap, HashMap};

/// Which side of the writer/reader pair an endpoint entry represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntityCategory {
    DatawriterSubmessage,
    DatareaderSubmessage,
}

/// Reverse-index entry: one endpoint originating from a participant.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EntityInfo {
    pub category: EntityCategory,
    pub handle: CryptoHandle,
}

/// Per-endpoint protection flags, reduced from the registration attributes.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ProtectionOptions {
    pub submessage: bool,
    pub payload: bool,
    pub submessage_encrypted: bool,
    pub payload_encrypted: bool,
}

impl ProtectionOptions {
    pub fn from_attributes(attributes: &EndpointSecurityAttributes) -> Self {
        Self {
            submessage: attributes.is_submessage_protected,
            payload: attributes.is_payload_protected,
            submessage_encrypted: attributes.plugin_endpoint_attributes
                & FLAG_IS_SUBMESSAGE_ENCRYPTED
                != 0,
            payload_encrypted: attributes.plugin_endpoint_attributes & FLAG_IS_PAYLOAD_ENCRYPTED
                != 0,
        }
    }
}

/// Plugin-wide crypto state. Not thread-safe on its own; always reached
/// through the `CryptoPlugin` mutex.
pub(crate) struct Keystore {
    pub keys: HashMap<CryptoHandle, Vec<KeyMaterial>>,
    pub encrypt_options: HashMap<CryptoHandle, ProtectionOptions>,
    pub participant_to_entity: HashMap<ParticipantCryptoHandle, Vec<EntityInfo>>,
    pub sessions: BTreeMap<(CryptoHandle, u32), Session>,
    next_handle: CryptoHandle,
}

impl Keystore {
    pub fn new() -> Self {
        Self {
            keys: HashMap::new(),
            encrypt_options: HashMap::new(),
            participant_to_entity: HashMap::new(),
            sessions: BTreeMap::new(),
            next_handle: 1,
        }
    }

    /// Mint the next handle. Handles are never nil and never reused for
    /// the life of the process (the counter wraps past nil only after
    /// 2^31 - 1 registrations).
    pub fn allocate_handle(&mut self) -> CryptoHandle {
        let handle = self.next_handle;
        self.next_handle = self.next_handle.wrapping_add(1);
        if self.next_handle <= 0 {
            self.next_handle = 1;
        }
        handle
    }

    /// Protection options for a handle; unknown handles read as all-false.
    pub fn options(&self, handle: CryptoHandle) -> ProtectionOptions {
        self.encrypt_options.get(&handle).copied().unwrap_or_default()
    }

    /// Record an endpoint under its owning (or matched remote) participant.
    pub fn insert_entity(
        &mut self,
        participant: ParticipantCryptoHandle,
        category: EntityCategory,
        handle: CryptoHandle,
    ) {
        self.participant_to_entity
            .entry(participant)
            .or_default()
            .push(EntityInfo { category, handle });
    }

    /// Drop every trace of an endpoint handle: keys, options, reverse-index
    /// entries, and all of its sessions.
    pub fn clear_endpoint_data(&mut self, handle: CryptoHandle) {
        self.keys.remove(&handle);
        self.encrypt_options.remove(&handle);

        for entities in self.participant_to_entity.values_mut() {
            entities.retain(|entity| entity.handle != handle);
        }

        let doomed: Vec<(CryptoHandle, u32)> = self
            .sessions
            .range((handle, 0)..=(handle, u32::MAX))
            .map(|(key, _)| *key)
            .collect();
        for key in doomed {
            self.sessions.remove(&key);
        }
    }
}
