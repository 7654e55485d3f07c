// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Security error types for the cryptographic plugin.
//!
//! Every public operation fails synchronously with one of these kinds; the
//! plugin never retries internally and never panics. On error no output
//! buffer is produced and receiver-list indices are left untouched.

use std::fmt;

/// Errors surfaced by the cryptographic plugin operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityError {
    /// Caller passed a nil handle, an unknown handle, or an invalid
    /// receiver-list argument
    InvalidHandle(String),

    /// Feature outside the built-in plugin's scope (RTPS protection,
    /// auth-only payload transformation)
    UnsupportedFeature(String),

    /// `transformation_kind` outside the recognized set
    KindUnrecognized(String),

    /// Inbound crypto header matched no registered key; carries the
    /// offending transformation kind and sender key id from the header
    KeyNotRegistered {
        /// `transformation_kind` from the unmatched crypto header
        kind: [u8; 4],
        /// `transformation_key_id` from the unmatched crypto header
        key_id: [u8; 4],
    },

    /// Underlying crypto library call failed (key setup, seal, open, RNG)
    CryptoBackend(String),

    /// AEAD authentication tag mismatch on decrypt or verify
    AuthFailure,

    /// Key derivation produced an empty key (e.g. empty master key
    /// material reached a transform)
    DerivationFailure,

    /// Truncated or malformed wire framing
    WireFormat(String),
}

impl fmt::Display for SecurityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidHandle(msg) => write!(f, "Invalid handle: {}", msg),
            Self::UnsupportedFeature(msg) => write!(f, "Unsupported feature: {}", msg),
            Self::KindUnrecognized(msg) => write!(f, "Transformation kind unrecognized: {}", msg),
            Self::KeyNotRegistered { kind, key_id } => write!(
                f,
                "Crypto key not registered (kind {:02x}{:02x}{:02x}{:02x}, key id {:02x}{:02x}{:02x}{:02x})",
                kind[0], kind[1], kind[2], kind[3], key_id[0], key_id[1], key_id[2], key_id[3]
            ),
            Self::CryptoBackend(msg) => write!(f, "Crypto backend failure: {}", msg),
            Self::AuthFailure => write!(f, "Authentication tag mismatch"),
            Self::DerivationFailure => write!(f, "Key derivation produced an empty key"),
            Self::WireFormat(msg) => write!(f, "Malformed wire framing: {}", msg),
        }
    }
}

impl std::error::Error for SecurityError {}
