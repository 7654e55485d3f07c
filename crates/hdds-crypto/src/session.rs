// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-(handle, key-index) session state machine.
//!
//! Each master key owns rotating sessions: a 4-byte session id and an
//! 8-byte IV suffix identify the session on the wire, and the session key
//! is derived from the master key as
//!
//! ```text
//! session_key = HMAC-SHA256(master_sender_key,
//!                           "SessionKey" || master_salt || session_id)
//! ```
//!
//! (cookie without a terminator, per DDS Security v1.1 Sec.9.5.3.3.2).
//!
//! A session covers at most [`MAX_BLOCKS_PER_SESSION`] AES blocks; the
//! block counter includes every message encrypted under the session key,
//! and the session id rotates before the budget would be exceeded. The
//! on-wire IV is `session_id || iv_suffix` and never repeats under one
//! session key: the suffix increments per message and is re-randomized on
//! every rotation.

use crate::aes_gcm;
use crate::constants::{BLOCK_LEN_BYTES, IV_LEN, MAX_BLOCKS_PER_SESSION};
use crate::error::SecurityError;
use crate::key_material::KeyMaterial;
use zeroize::Zeroize;

/// Session state for one (handle, key-index) pair.
///
/// Encoder sessions advance their own id/IV; decoder sessions adopt the
/// sender's session id from inbound crypto headers.
#[derive(Default)]
pub(crate) struct Session {
    id: [u8; 4],
    iv_suffix: [u8; 8],
    key: Vec<u8>,
    counter: u32,
}

impl Session {
    /// Start a fresh session: random id and IV suffix, derived key.
    fn create_key(&mut self, master: &KeyMaterial) -> Result<(), SecurityError> {
        aes_gcm::random_bytes(&mut self.id)?;
        aes_gcm::random_bytes(&mut self.iv_suffix)?;
        self.derive_key(master);
        self.counter = 0;
        Ok(())
    }

    /// Rotate to the next session id (big-endian u32 increment, wrapping),
    /// re-randomize the IV suffix, and re-derive the key.
    fn next_id(&mut self, master: &KeyMaterial) -> Result<(), SecurityError> {
        self.id = u32::from_be_bytes(self.id).wrapping_add(1).to_be_bytes();
        aes_gcm::random_bytes(&mut self.iv_suffix)?;
        self.derive_key(master);
        self.counter = 0;
        Ok(())
    }

    /// Advance the IV suffix: two stacked big-endian u32 counters, low
    /// word first with carry into the high word.
    fn inc_iv(&mut self) {
        let mut low = [0u8; 4];
        low.copy_from_slice(&self.iv_suffix[..4]);
        let low = u32::from_be_bytes(low).wrapping_add(1);
        self.iv_suffix[..4].copy_from_slice(&low.to_be_bytes());
        if low == 0 {
            let mut high = [0u8; 4];
            high.copy_from_slice(&self.iv_suffix[4..]);
            let high = u32::from_be_bytes(high).wrapping_add(1);
            self.iv_suffix[4..].copy_from_slice(&high.to_be_bytes());
        }
    }

    fn derive_key(&mut self, master: &KeyMaterial) {
        self.key.zeroize();
        self.key.clear();
        if master.master_sender_key.is_empty() {
            return;
        }
        let derived = aes_gcm::hmac_sha256(
            &master.master_sender_key,
            &[b"SessionKey", &master.master_salt, &self.id],
        );
        self.key.extend_from_slice(&derived);
    }

    /// Prepare this session for encrypting `plain_len` bytes: create the
    /// key on first use, rotate when the block budget would be exceeded,
    /// otherwise advance the IV.
    pub fn encode_setup(
        &mut self,
        master: &KeyMaterial,
        plain_len: usize,
    ) -> Result<(), SecurityError> {
        let blocks = plain_len.div_ceil(BLOCK_LEN_BYTES) as u32;

        if self.key.is_empty() {
            self.create_key(master)?;
            self.counter = blocks;
        } else if self.counter + blocks > MAX_BLOCKS_PER_SESSION {
            self.next_id(master)?;
            self.counter = blocks;
        } else {
            self.inc_iv();
            self.counter += blocks;
        }

        if self.key.is_empty() {
            return Err(SecurityError::DerivationFailure);
        }
        Ok(())
    }

    /// Session key for decoding a message under `session_id`, adopting the
    /// sender's id (and re-deriving) when it differs from the cached one.
    pub fn key_for(
        &mut self,
        master: &KeyMaterial,
        session_id: [u8; 4],
    ) -> Result<&[u8], SecurityError> {
        if self.key.is_empty() || self.id != session_id {
            self.id = session_id;
            self.derive_key(master);
        }
        if self.key.is_empty() {
            return Err(SecurityError::DerivationFailure);
        }
        Ok(&self.key)
    }

    /// Current session key; only valid after `encode_setup`.
    pub fn key(&self) -> Result<&[u8], SecurityError> {
        if self.key.is_empty() {
            return Err(SecurityError::DerivationFailure);
        }
        Ok(&self.key)
    }

    pub fn id(&self) -> [u8; 4] {
        self.id
    }

    pub fn iv_suffix(&self) -> [u8; 8] {
        self.iv_suffix
    }

    /// On-wire IV: `session_id || iv_suffix`, bit-compatible with the
    /// crypto header fields.
    pub fn iv(&self) -> [u8; IV_LEN] {
        let mut iv = [0u8; IV_LEN];
        iv[..4].copy_from_slice(&self.id);
        iv[4..].copy_from_slice(&self.iv_suffix);
        iv
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}
