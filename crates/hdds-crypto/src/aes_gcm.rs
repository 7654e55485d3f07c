// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! AES-256-GCM / AES-256-GMAC primitives for the built-in crypto plugin.
//!
//! Implements the authenticated transformations of OMG DDS Security v1.1
//! Sec.9.5.3 on top of the `ring` crate:
//!
//! - **AES-256-GCM** -- confidentiality plus a 128-bit authentication tag
//! - **AES-256-GMAC** -- authentication only, realized as GCM with the data
//!   passed as additional authenticated data and an empty plaintext, so the
//!   tag is computed without producing any ciphertext
//!
//! Also hosts the HMAC-SHA256 and SHA-256 helpers used for session and
//! volatile-endpoint key derivation, and the process CSPRNG wrapper.
//!
//! # Security Properties
//!
//! - Tag comparison is performed inside `ring` in constant time
//! - Nonces are built from the session id and IV suffix managed by the
//!   session state machine; the same (key, nonce) pair is never reused
//!
//! # References
//!
//! - [NIST SP 800-38D](https://nvlpubs.nist.gov/nistpubs/Legacy/SP/nistspecialpublication800-38d.pdf) -- GCM/GMAC specification
//! - [ring::aead](https://docs.rs/ring/latest/ring/aead/) -- Rust crypto library

use crate::constants::{IV_LEN, TAG_LEN};
use crate::error::SecurityError;
use ring::aead::{
    Aad, BoundKey, Nonce, NonceSequence, OpeningKey, SealingKey, UnboundKey, AES_256_GCM,
};
use ring::error::Unspecified;
use ring::rand::{SecureRandom, SystemRandom};
use ring::{digest, hmac};

/// Fill `buf` from the process CSPRNG.
///
/// A failing system RNG is a hard error; the plugin refuses to mint keys or
/// initialization vectors from anything predictable.
pub fn random_bytes(buf: &mut [u8]) -> Result<(), SecurityError> {
    SystemRandom::new()
        .fill(buf)
        .map_err(|_| SecurityError::CryptoBackend("SystemRandom fill failed".to_string()))
}

/// Encrypt with AES-256-GCM; returns ciphertext and the 16-byte tag.
///
/// No additional authenticated data is used on the encryption path: the
/// crypto header is carried in clear alongside the ciphertext and its
/// integrity comes from the IV binding (the header bytes *are* the IV).
pub fn encrypt_gcm(
    key: &[u8],
    iv: &[u8; IV_LEN],
    plaintext: &[u8],
) -> Result<(Vec<u8>, [u8; TAG_LEN]), SecurityError> {
    let mut sealing_key = new_sealing_key(key, iv)?;

    let mut in_out = plaintext.to_vec();
    sealing_key
        .seal_in_place_append_tag(Aad::empty(), &mut in_out)
        .map_err(|_| SecurityError::CryptoBackend("AES-256-GCM seal failed".to_string()))?;

    let tag_at = in_out.len() - TAG_LEN;
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&in_out[tag_at..]);
    in_out.truncate(tag_at);
    Ok((in_out, tag))
}

/// Decrypt AES-256-GCM ciphertext, verifying the detached tag.
///
/// # Errors
///
/// [`SecurityError::AuthFailure`] when the tag does not match the
/// ciphertext under this key and IV (tampered data, wrong key, wrong IV).
pub fn decrypt_gcm(
    key: &[u8],
    iv: &[u8; IV_LEN],
    ciphertext: &[u8],
    tag: &[u8; TAG_LEN],
) -> Result<Vec<u8>, SecurityError> {
    let mut opening_key = new_opening_key(key, iv)?;

    let mut in_out = Vec::with_capacity(ciphertext.len() + TAG_LEN);
    in_out.extend_from_slice(ciphertext);
    in_out.extend_from_slice(tag);

    let plaintext_len = opening_key
        .open_in_place(Aad::empty(), &mut in_out)
        .map_err(|_| SecurityError::AuthFailure)?
        .len();
    in_out.truncate(plaintext_len);
    Ok(in_out)
}

/// Compute an AES-256-GMAC tag over `data`.
pub fn gmac(key: &[u8], iv: &[u8; IV_LEN], data: &[u8]) -> Result<[u8; TAG_LEN], SecurityError> {
    let mut sealing_key = new_sealing_key(key, iv)?;

    // Empty plaintext: sealing appends exactly the tag
    let mut in_out: Vec<u8> = Vec::with_capacity(TAG_LEN);
    sealing_key
        .seal_in_place_append_tag(Aad::from(data), &mut in_out)
        .map_err(|_| SecurityError::CryptoBackend("AES-256-GMAC seal failed".to_string()))?;

    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(&in_out);
    Ok(tag)
}

/// Verify an AES-256-GMAC tag over `data`.
pub fn gmac_verify(
    key: &[u8],
    iv: &[u8; IV_LEN],
    data: &[u8],
    tag: &[u8; TAG_LEN],
) -> Result<(), SecurityError> {
    let mut opening_key = new_opening_key(key, iv)?;

    let mut in_out = tag.to_vec();
    opening_key
        .open_in_place(Aad::from(data), &mut in_out)
        .map_err(|_| SecurityError::AuthFailure)?;
    Ok(())
}

/// HMAC-SHA256 over the concatenation of `parts`, keyed by `key`.
pub fn hmac_sha256(key: &[u8], parts: &[&[u8]]) -> [u8; 32] {
    let key = hmac::Key::new(hmac::HMAC_SHA256, key);
    let mut ctx = hmac::Context::with_key(&key);
    for part in parts {
        ctx.update(part);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(ctx.sign().as_ref());
    out
}

/// SHA-256 over the concatenation of `parts`.
///
/// This is the `hash(sequence of octet sequences)` primitive referenced by
/// the volatile-endpoint key derivation; peers must agree on it bit-exactly.
pub fn sha256_concat(parts: &[&[u8]]) -> [u8; 32] {
    let mut ctx = digest::Context::new(&digest::SHA256);
    for part in parts {
        ctx.update(part);
    }
    let mut out = [0u8; 32];
    out.copy_from_slice(ctx.finish().as_ref());
    out
}

fn new_sealing_key(
    key: &[u8],
    iv: &[u8; IV_LEN],
) -> Result<SealingKey<FixedNonceSequence>, SecurityError> {
    let unbound_key = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| SecurityError::CryptoBackend("failed to create AES-256-GCM key".to_string()))?;
    Ok(SealingKey::new(unbound_key, FixedNonceSequence::new(*iv)))
}

fn new_opening_key(
    key: &[u8],
    iv: &[u8; IV_LEN],
) -> Result<OpeningKey<FixedNonceSequence>, SecurityError> {
    let unbound_key = UnboundKey::new(&AES_256_GCM, key)
        .map_err(|_| SecurityError::CryptoBackend("failed to create AES-256-GCM key".to_string()))?;
    Ok(OpeningKey::new(unbound_key, FixedNonceSequence::new(*iv)))
}

/// Fixed nonce sequence for ring's BoundKey API
///
/// ring requires a NonceSequence for key binding. The session state machine
/// manages nonces externally (one per message), so the sequence yields its
/// nonce exactly once and fails on any further advance.
struct FixedNonceSequence {
    nonce: Option<[u8; IV_LEN]>,
}

impl FixedNonceSequence {
    fn new(nonce: [u8; IV_LEN]) -> Self {
        Self { nonce: Some(nonce) }
    }
}

impl NonceSequence for FixedNonceSequence {
    fn advance(&mut self) -> Result<Nonce, Unspecified> {
        let nonce_bytes = self.nonce.take().ok_or(Unspecified)?;
        Nonce::try_assume_unique_for_key(&nonce_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: [u8; 32] = [0x42; 32];
    const IV: [u8; IV_LEN] = [0x24; IV_LEN];

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let plaintext = b"Hello, DDS Security!";
        let (ciphertext, tag) = encrypt_gcm(&KEY, &IV, plaintext).unwrap();
        assert_eq!(ciphertext.len(), plaintext.len());

        let decrypted = decrypt_gcm(&KEY, &IV, &ciphertext, &tag).unwrap();
        assert_eq!(plaintext.as_ref(), decrypted.as_slice());
    }

    #[test]
    fn test_decrypt_tampered_ciphertext_fails() {
        let (mut ciphertext, tag) = encrypt_gcm(&KEY, &IV, b"secret message").unwrap();
        ciphertext[3] ^= 0x01;
        assert_eq!(
            decrypt_gcm(&KEY, &IV, &ciphertext, &tag),
            Err(SecurityError::AuthFailure)
        );
    }

    #[test]
    fn test_decrypt_tampered_tag_fails() {
        let (ciphertext, mut tag) = encrypt_gcm(&KEY, &IV, b"secret message").unwrap();
        tag[TAG_LEN - 1] ^= 0x80;
        assert_eq!(
            decrypt_gcm(&KEY, &IV, &ciphertext, &tag),
            Err(SecurityError::AuthFailure)
        );
    }

    #[test]
    fn test_decrypt_wrong_key_fails() {
        let (ciphertext, tag) = encrypt_gcm(&KEY, &IV, b"secret").unwrap();
        let other_key = [0xFF; 32];
        assert_eq!(
            decrypt_gcm(&other_key, &IV, &ciphertext, &tag),
            Err(SecurityError::AuthFailure)
        );
    }

    #[test]
    fn test_decrypt_wrong_iv_fails() {
        let (ciphertext, tag) = encrypt_gcm(&KEY, &IV, b"secret").unwrap();
        let other_iv = [0x25; IV_LEN];
        assert_eq!(
            decrypt_gcm(&KEY, &other_iv, &ciphertext, &tag),
            Err(SecurityError::AuthFailure)
        );
    }

    #[test]
    fn test_gmac_verify_roundtrip() {
        let data = b"authenticated but not encrypted";
        let tag = gmac(&KEY, &IV, data).unwrap();
        gmac_verify(&KEY, &IV, data, &tag).unwrap();
    }

    #[test]
    fn test_gmac_tampered_data_fails() {
        let tag = gmac(&KEY, &IV, b"authentic data").unwrap();
        assert_eq!(
            gmac_verify(&KEY, &IV, b"authentic date", &tag),
            Err(SecurityError::AuthFailure)
        );
    }

    #[test]
    fn test_gmac_is_gcm_with_empty_plaintext() {
        // GMAC must be interoperable with a GCM implementation fed the data
        // as AAD; both views produce the same tag bytes.
        let data = b"aad-bound bytes";
        let tag = gmac(&KEY, &IV, data).unwrap();

        let mut sealing_key = new_sealing_key(&KEY, &IV).unwrap();
        let mut empty: Vec<u8> = Vec::new();
        sealing_key
            .seal_in_place_append_tag(Aad::from(data.as_ref()), &mut empty)
            .unwrap();
        assert_eq!(empty.as_slice(), tag.as_ref());
    }

    #[test]
    fn test_rejects_bad_key_length() {
        let short_key = [0u8; 16];
        assert!(encrypt_gcm(&short_key, &IV, b"data").is_err());
    }

    #[test]
    fn test_hmac_sha256_concatenation_equivalence() {
        // Split points must not affect the MAC
        let whole = hmac_sha256(b"key", &[b"SessionKeysaltid"]);
        let parts = hmac_sha256(b"key", &[b"SessionKey", b"salt", b"id"]);
        assert_eq!(whole, parts);
    }

    #[test]
    fn test_sha256_concat_matches_known_vector() {
        // SHA-256("abc") from FIPS 180-2
        let digest = sha256_concat(&[b"a", b"bc"]);
        assert_eq!(
            digest[..4],
            [0xBA, 0x78, 0x16, 0xBF],
            "SHA-256 prefix mismatch"
        );
    }

    #[test]
    fn test_random_bytes_distinct() {
        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        random_bytes(&mut a).unwrap();
        random_bytes(&mut b).unwrap();
        assert_ne!(a, b);
    }
}
