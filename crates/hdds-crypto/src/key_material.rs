// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! AES-GCM-GMAC key material: record, generation, and wire codec.
//!
//! `KeyMaterial` is the unit carried by crypto tokens and stored per handle
//! in the keystore. The wire form is canonical big-endian CDR, 4-byte
//! aligned, independent of the surrounding submessage endianness
//! (DDS Security v1.1 Sec.9.5.2).

use crate::aes_gcm;
use crate::constants::{KEY_LEN_BYTES, VENDOR_ID};
use crate::error::SecurityError;
use crate::ser::{Reader, Writer};
use zeroize::Zeroize;

/// Transformation kind selector byte: AES-128-GCM
pub const CRYPTO_TRANSFORMATION_KIND_AES128_GCM: u8 = 1;
/// Transformation kind selector byte: AES-256-GCM
pub const CRYPTO_TRANSFORMATION_KIND_AES256_GCM: u8 = 2;
/// Transformation kind selector byte: AES-128-GMAC
pub const CRYPTO_TRANSFORMATION_KIND_AES128_GMAC: u8 = 3;
/// Transformation kind selector byte: AES-256-GMAC
pub const CRYPTO_TRANSFORMATION_KIND_AES256_GMAC: u8 = 4;

/// Index of the selector byte within the 4-byte transformation kind
pub const TRANSFORM_KIND_INDEX: usize = 3;

/// Master key material for one transformation
/// (DDS Security v1.1 Sec.9.5.2.1.1)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    /// 4-byte transformation kind; selector in the last byte
    pub transformation_kind: [u8; 4],
    /// Salt mixed into session key derivation (32 bytes for generated keys)
    pub master_salt: Vec<u8>,
    /// Key id quoted in crypto headers produced under this key
    pub sender_key_id: [u8; 4],
    /// Master key from which session keys are derived
    pub master_sender_key: Vec<u8>,
    /// Receiver-specific key id; always zero (origin auth not implemented)
    pub receiver_specific_key_id: [u8; 4],
    /// Receiver-specific master key; always empty
    pub master_receiver_specific_key: Vec<u8>,
}

impl Drop for KeyMaterial {
    fn drop(&mut self) {
        self.master_salt.zeroize();
        self.master_sender_key.zeroize();
        self.master_receiver_specific_key.zeroize();
    }
}

/// True when the kind is a recognized GCM (encrypting) transformation that
/// this plugin implements.
pub(crate) fn encrypts(k: &KeyMaterial) -> bool {
    k.transformation_kind[..TRANSFORM_KIND_INDEX] == [0, 0, 0]
        && k.transformation_kind[TRANSFORM_KIND_INDEX] == CRYPTO_TRANSFORMATION_KIND_AES256_GCM
}

/// True when the kind is a recognized GMAC (authenticate-only)
/// transformation that this plugin implements.
pub(crate) fn authenticates(k: &KeyMaterial) -> bool {
    k.transformation_kind[..TRANSFORM_KIND_INDEX] == [0, 0, 0]
        && k.transformation_kind[TRANSFORM_KIND_INDEX] == CRYPTO_TRANSFORMATION_KIND_AES256_GMAC
}

/// Generate fresh key material for a locally registered endpoint.
///
/// `key_id` is the low 32 bits of the owning handle (or a freshly minted
/// handle for a second key), packed low byte first.
pub(crate) fn make_key(key_id: u32, encrypt: bool) -> Result<KeyMaterial, SecurityError> {
    let selector = if encrypt {
        CRYPTO_TRANSFORMATION_KIND_AES256_GCM
    } else {
        CRYPTO_TRANSFORMATION_KIND_AES256_GMAC
    };

    let mut master_salt = vec![0u8; KEY_LEN_BYTES];
    aes_gcm::random_bytes(&mut master_salt)?;
    let mut master_sender_key = vec![0u8; KEY_LEN_BYTES];
    aes_gcm::random_bytes(&mut master_sender_key)?;

    Ok(KeyMaterial {
        transformation_kind: [0, 0, 0, selector],
        master_salt,
        sender_key_id: key_id.to_le_bytes(),
        master_sender_key,
        receiver_specific_key_id: [0; 4],
        master_receiver_specific_key: Vec::new(),
    })
}

/// Sentinel key material identifying a local handle for a built-in
/// participant-volatile-message secure endpoint. Not a usable key; the real
/// key is derived from the shared secret when the remote side matches.
pub(crate) fn make_volatile_placeholder() -> KeyMaterial {
    KeyMaterial {
        transformation_kind: [VENDOR_ID[0], VENDOR_ID[1], 0, 1],
        master_salt: Vec::new(),
        sender_key_id: [0; 4],
        master_sender_key: Vec::new(),
        receiver_specific_key_id: [0; 4],
        master_receiver_specific_key: Vec::new(),
    }
}

/// True when the key material is the volatile-endpoint placeholder.
pub(crate) fn is_volatile_placeholder(k: &KeyMaterial) -> bool {
    k.transformation_kind == [VENDOR_ID[0], VENDOR_ID[1], 0, 1]
}

/// Serialize key material to its canonical big-endian CDR form.
pub(crate) fn serialize_key_material(k: &KeyMaterial) -> Vec<u8> {
    let mut w = Writer::with_capacity(
        4 + 4
            + k.master_salt.len()
            + 4
            + 4
            + k.master_sender_key.len()
            + 4
            + 4
            + k.master_receiver_specific_key.len()
            + 8,
    );
    w.write_bytes(&k.transformation_kind);
    write_octet_seq(&mut w, &k.master_salt);
    w.write_bytes(&k.sender_key_id);
    write_octet_seq(&mut w, &k.master_sender_key);
    w.write_bytes(&k.receiver_specific_key_id);
    write_octet_seq(&mut w, &k.master_receiver_specific_key);
    w.into_vec()
}

/// Deserialize key material from its canonical big-endian CDR form.
pub(crate) fn deserialize_key_material(bytes: &[u8]) -> Result<KeyMaterial, SecurityError> {
    let mut r = Reader::new(bytes);
    let transformation_kind = r.read_array::<4>()?;
    let master_salt = read_octet_seq(&mut r)?;
    let sender_key_id = r.read_array::<4>()?;
    let master_sender_key = read_octet_seq(&mut r)?;
    let receiver_specific_key_id = r.read_array::<4>()?;
    let master_receiver_specific_key = read_octet_seq(&mut r)?;

    Ok(KeyMaterial {
        transformation_kind,
        master_salt,
        sender_key_id,
        master_sender_key,
        receiver_specific_key_id,
        master_receiver_specific_key,
    })
}

fn write_octet_seq(w: &mut Writer, bytes: &[u8]) {
    w.align(4);
    w.write_u32_be(bytes.len() as u32);
    w.write_bytes(bytes);
}

fn read_octet_seq(r: &mut Reader<'_>) -> Result<Vec<u8>, SecurityError> {
    r.align(4)?;
    let len = r.read_u32_be()? as usize;
    Ok(r.read_bytes(len)?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_key_shape() {
        let key = make_key(0x1234_5678, true).unwrap();
        assert_eq!(key.transformation_kind, [0, 0, 0, 2]);
        assert_eq!(key.master_salt.len(), KEY_LEN_BYTES);
        assert_eq!(key.master_sender_key.len(), KEY_LEN_BYTES);
        assert_eq!(key.sender_key_id, [0x78, 0x56, 0x34, 0x12]);
        assert_eq!(key.receiver_specific_key_id, [0; 4]);
        assert!(key.master_receiver_specific_key.is_empty());
        assert!(encrypts(&key));
        assert!(!authenticates(&key));
    }

    #[test]
    fn test_make_key_gmac() {
        let key = make_key(7, false).unwrap();
        assert_eq!(key.transformation_kind, [0, 0, 0, 4]);
        assert!(authenticates(&key));
        assert!(!encrypts(&key));
    }

    #[test]
    fn test_keys_are_random() {
        let a = make_key(1, true).unwrap();
        let b = make_key(1, true).unwrap();
        assert_ne!(a.master_sender_key, b.master_sender_key);
        assert_ne!(a.master_salt, b.master_salt);
    }

    #[test]
    fn test_placeholder_detection() {
        let placeholder = make_volatile_placeholder();
        assert!(is_volatile_placeholder(&placeholder));
        assert!(!encrypts(&placeholder));
        assert!(!authenticates(&placeholder));

        let real = make_key(1, true).unwrap();
        assert!(!is_volatile_placeholder(&real));
    }

    #[test]
    fn test_codec_roundtrip() {
        let key = make_key(0xDEAD_BEEF, true).unwrap();
        let bytes = serialize_key_material(&key);
        let decoded = deserialize_key_material(&bytes).unwrap();
        assert_eq!(key, decoded);
    }

    #[test]
    fn test_codec_layout_generated_key() {
        // 32-byte salt and key: fixed 88-byte layout, everything 4-aligned
        let key = make_key(5, false).unwrap();
        let bytes = serialize_key_material(&key);
        assert_eq!(bytes.len(), 88);
        assert_eq!(&bytes[0..4], &[0, 0, 0, 4]);
        assert_eq!(&bytes[4..8], &(32u32).to_be_bytes());
        assert_eq!(&bytes[8..40], key.master_salt.as_slice());
        assert_eq!(&bytes[40..44], &key.sender_key_id);
        assert_eq!(&bytes[44..48], &(32u32).to_be_bytes());
        assert_eq!(&bytes[84..88], &0u32.to_be_bytes());
    }

    #[test]
    fn test_codec_roundtrip_unaligned_salt() {
        let key = KeyMaterial {
            transformation_kind: [0, 0, 0, 2],
            master_salt: vec![0xAA; 5],
            sender_key_id: [1, 2, 3, 4],
            master_sender_key: vec![0xBB; 32],
            receiver_specific_key_id: [0; 4],
            master_receiver_specific_key: Vec::new(),
        };
        let bytes = serialize_key_material(&key);
        let decoded = deserialize_key_material(&bytes).unwrap();
        assert_eq!(key, decoded);
    }

    #[test]
    fn test_deserialize_truncated_fails() {
        let key = make_key(1, true).unwrap();
        let bytes = serialize_key_material(&key);
        assert!(deserialize_key_material(&bytes[..bytes.len() - 5]).is_err());
        assert!(deserialize_key_material(&[]).is_err());
    }

    #[test]
    fn test_deserialize_oversized_length_fails() {
        let key = make_key(1, true).unwrap();
        let mut bytes = serialize_key_material(&key);
        // Inflate the salt length field past the buffer end
        bytes[4..8].copy_from_slice(&u32::MAX.to_be_bytes());
        assert!(deserialize_key_material(&bytes).is_err());
    }
}
