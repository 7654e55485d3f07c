// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Transform engine: secure submessage and payload encode/decode.
//!
//! Outbound, a protected submessage becomes three back-to-back
//! submessages (RTPS v2.5 Sec.9.6.2):
//!
//! ```text
//! SEC_PREFIX  | crypto header (20 bytes: kind, key id, session id, IV suffix)
//! SEC_BODY    | u32 length + ciphertext          (encrypting transforms only;
//!             |                                   auth-only emits the original
//!             |                                   submessage verbatim instead)
//! SEC_POSTFIX | crypto footer (16-byte common MAC, empty specific-MAC seq)
//! ```
//!
//! A protected payload is the same header/footer bracket without the
//! submessage wrappers. The crypto header and footer are always
//! big-endian; the generated SEC_* submessage headers use flags 0
//! (big-endian length). Inbound, submessage headers are read in their
//! flag-indicated endianness.
//!
//! The GCM IV is `session_id || iv_suffix` -- exactly the last 12 bytes of
//! the crypto header, so the header bytes authenticate themselves through
//! the tag.

use crate::aes_gcm;
use crate::constants::{
    CRYPTO_CONTENT_ADDED_LENGTH, CRYPTO_HEADER_LENGTH, FLAG_ENDIANNESS, IV_LEN,
    RTPS_SUBMSG_SEC_BODY, RTPS_SUBMSG_SEC_POSTFIX, RTPS_SUBMSG_SEC_PREFIX, SMHDR_SZ, TAG_LEN,
};
use crate::error::SecurityError;
use crate::key_material::{authenticates, encrypts, is_volatile_placeholder, KeyMaterial};
use crate::keystore::{EntityCategory, Keystore};
use crate::plugin::{CryptoPlugin, CryptoTransform};
use crate::ser::{Reader, Writer};
use crate::session::Session;
use crate::types::{
    CryptoHandle, DatareaderCryptoHandle, DatawriterCryptoHandle, ParticipantCryptoHandle,
    SecureSubmessageCategory, HANDLE_NIL,
};
use std::borrow::Cow;

/// Crypto header bracketing protected bytes
/// (DDS Security v1.1 Sec.9.5.2.3)
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CryptoHeader {
    pub transformation_kind: [u8; 4],
    pub transformation_key_id: [u8; 4],
    pub session_id: [u8; 4],
    pub initialization_vector_suffix: [u8; 8],
}

impl CryptoHeader {
    fn from_session(master: &KeyMaterial, session: &Session) -> Self {
        Self {
            transformation_kind: master.transformation_kind,
            transformation_key_id: master.sender_key_id,
            session_id: session.id(),
            initialization_vector_suffix: session.iv_suffix(),
        }
    }

    fn write(&self, w: &mut Writer) {
        w.write_bytes(&self.transformation_kind);
        w.write_bytes(&self.transformation_key_id);
        w.write_bytes(&self.session_id);
        w.write_bytes(&self.initialization_vector_suffix);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, SecurityError> {
        Ok(Self {
            transformation_kind: r.read_array::<4>()?,
            transformation_key_id: r.read_array::<4>()?,
            session_id: r.read_array::<4>()?,
            initialization_vector_suffix: r.read_array::<8>()?,
        })
    }

    fn iv(&self) -> [u8; IV_LEN] {
        let mut iv = [0u8; IV_LEN];
        iv[..4].copy_from_slice(&self.session_id);
        iv[4..].copy_from_slice(&self.initialization_vector_suffix);
        iv
    }
}

/// Crypto footer: the common MAC plus an empty receiver-specific MAC
/// sequence (origin authentication is not implemented)
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CryptoFooter {
    pub common_mac: [u8; TAG_LEN],
}

impl CryptoFooter {
    fn write(&self, w: &mut Writer) {
        w.write_bytes(&self.common_mac);
        w.align(4);
        w.write_u32_be(0);
    }

    fn read(r: &mut Reader<'_>) -> Result<Self, SecurityError> {
        let common_mac = r.read_array::<TAG_LEN>()?;
        r.align(4)?;
        let count = r.read_u32_be()? as usize;
        // We never emit receiver-specific MACs; skip any a peer sent
        // (key id + MAC = 20 bytes each)
        let span = count
            .checked_mul(20)
            .ok_or_else(|| SecurityError::WireFormat("oversized MAC sequence".to_string()))?;
        r.skip(span)?;
        Ok(Self { common_mac })
    }
}

/// Key/header match: equal transformation kind and sender key id.
fn matches(key: &KeyMaterial, header: &CryptoHeader) -> bool {
    key.transformation_kind == header.transformation_kind
        && key.sender_key_id == header.transformation_key_id
}

fn read_u16_flag(r: &mut Reader<'_>, flags: u8) -> Result<u16, SecurityError> {
    if flags & FLAG_ENDIANNESS != 0 {
        r.read_u16_le()
    } else {
        r.read_u16_be()
    }
}

fn kind_unrecognized(key: &KeyMaterial) -> SecurityError {
    let kind = key.transformation_kind;
    SecurityError::KindUnrecognized(format!(
        "{:02x}{:02x}{:02x}{:02x}",
        kind[0], kind[1], kind[2], kind[3]
    ))
}

/// Encrypt one message under the session owned by `master`.
fn encrypt(
    master: &KeyMaterial,
    session: &mut Session,
    plain: &[u8],
) -> Result<(CryptoHeader, Vec<u8>, CryptoFooter), SecurityError> {
    session.encode_setup(master, plain.len())?;
    let iv = session.iv();
    let (ciphertext, tag) = aes_gcm::encrypt_gcm(session.key()?, &iv, plain)?;
    Ok((
        CryptoHeader::from_session(master, session),
        ciphertext,
        CryptoFooter { common_mac: tag },
    ))
}

/// Authenticate one message under the session owned by `master` without
/// encrypting it.
fn authtag(
    master: &KeyMaterial,
    session: &mut Session,
    data: &[u8],
) -> Result<(CryptoHeader, CryptoFooter), SecurityError> {
    session.encode_setup(master, data.len())?;
    let iv = session.iv();
    let tag = aes_gcm::gmac(session.key()?, &iv, data)?;
    Ok((
        CryptoHeader::from_session(master, session),
        CryptoFooter { common_mac: tag },
    ))
}

/// An auth-only submessage is followed on the wire by SEC_POSTFIX, which
/// is illegal after a zero `octetsToNextHeader`; patch a zero length field
/// to the actual value. Operates on a copy, never in place.
fn patch_submessage_length(plain: &[u8]) -> Result<Cow<'_, [u8]>, SecurityError> {
    if plain.len() < SMHDR_SZ {
        return Err(SecurityError::WireFormat(
            "submessage shorter than its header".to_string(),
        ));
    }
    let little_endian = plain[1] & FLAG_ENDIANNESS != 0;
    let length = if little_endian {
        u16::from_le_bytes([plain[2], plain[3]])
    } else {
        u16::from_be_bytes([plain[2], plain[3]])
    };
    if length != 0 {
        return Ok(Cow::Borrowed(plain));
    }

    let actual = plain.len() - SMHDR_SZ;
    if actual > u16::MAX as usize {
        return Err(SecurityError::WireFormat(
            "submessage too long for a 16-bit length".to_string(),
        ));
    }
    let mut patched = plain.to_vec();
    let bytes = if little_endian {
        (actual as u16).to_le_bytes()
    } else {
        (actual as u16).to_be_bytes()
    };
    patched[2..4].copy_from_slice(&bytes);
    Ok(Cow::Owned(patched))
}

/// Shared submessage encode for the writer and reader paths.
///
/// A sender without key material passes its submessage through unchanged;
/// this is how unprotected endpoints coexist with protected ones.
fn encode_submessage(
    store: &mut Keystore,
    plain: &[u8],
    sender_handle: CryptoHandle,
) -> Result<Vec<u8>, SecurityError> {
    const SUBMSG_KEY_INDEX: u32 = 0;

    let keyseq = match store.keys.get(&sender_handle) {
        Some(keys) if !keys.is_empty() => keys,
        _ => return Ok(plain.to_vec()),
    };
    let master = &keyseq[SUBMSG_KEY_INDEX as usize];
    let session = store
        .sessions
        .entry((sender_handle, SUBMSG_KEY_INDEX))
        .or_default();

    let (header, body, footer, auth_only) = if encrypts(master) {
        let (header, ciphertext, footer) = encrypt(master, session, plain)?;
        (header, ciphertext, footer, false)
    } else if authenticates(master) {
        let data = patch_submessage_length(plain)?;
        let (header, footer) = authtag(master, session, &data)?;
        (header, data.into_owned(), footer, true)
    } else {
        return Err(kind_unrecognized(master));
    };

    let mut w = Writer::with_capacity(
        SMHDR_SZ + CRYPTO_HEADER_LENGTH + SMHDR_SZ + CRYPTO_CONTENT_ADDED_LENGTH + body.len() + 3
            + SMHDR_SZ + TAG_LEN + 4,
    );

    w.write_u8(RTPS_SUBMSG_SEC_PREFIX);
    w.write_u8(0);
    w.write_u16_be(CRYPTO_HEADER_LENGTH as u16);
    header.write(&mut w);

    if !auth_only {
        let body_len = CRYPTO_CONTENT_ADDED_LENGTH + body.len();
        let padded = (body_len + 3) & !3;
        if padded > u16::MAX as usize {
            return Err(SecurityError::WireFormat(
                "ciphertext too long for a 16-bit submessage length".to_string(),
            ));
        }
        w.write_u8(RTPS_SUBMSG_SEC_BODY);
        w.write_u8(0);
        w.write_u16_be(padded as u16);
        w.write_u32_be(body.len() as u32);
    }
    w.write_bytes(&body);
    w.align(4);

    w.write_u8(RTPS_SUBMSG_SEC_POSTFIX);
    w.write_u8(0);
    w.write_u16_be((TAG_LEN + 4) as u16);
    footer.write(&mut w);

    Ok(w.into_vec())
}

/// Shared submessage decode for the writer and reader paths.
fn decode_submessage(
    store: &mut Keystore,
    encoded: &[u8],
    sender_handle: CryptoHandle,
) -> Result<Vec<u8>, SecurityError> {
    let keyseq = match store.keys.get(&sender_handle) {
        Some(keys) if !keys.is_empty() => keys,
        // Mirror of the encode-side passthrough for unprotected senders
        _ => return Ok(encoded.to_vec()),
    };

    let mut r = Reader::new(encoded);
    // SEC_PREFIX carries the crypto header
    let _prefix_id = r.read_u8()?;
    let prefix_flags = r.read_u8()?;
    let prefix_octets = read_u16_flag(&mut r, prefix_flags)? as usize;
    let header = CryptoHeader::read(&mut r)?;
    let trailing = prefix_octets.checked_sub(CRYPTO_HEADER_LENGTH).ok_or_else(|| {
        SecurityError::WireFormat("SEC_PREFIX shorter than the crypto header".to_string())
    })?;
    r.skip(trailing)?;

    // Inner submessage: SEC_BODY when encrypted, the original otherwise
    let inner_start = r.offset();
    let _inner_id = r.read_u8()?;
    let inner_flags = r.read_u8()?;
    let inner_octets = read_u16_flag(&mut r, inner_flags)? as usize;
    let body_start = r.offset();

    // SEC_POSTFIX sits immediately after the inner submessage content
    let postfix_start = body_start + inner_octets;
    if postfix_start > encoded.len() {
        return Err(SecurityError::WireFormat(
            "inner submessage length exceeds the buffer".to_string(),
        ));
    }
    let mut postfix = Reader::new(&encoded[postfix_start..]);
    let _postfix_id = postfix.read_u8()?;
    let postfix_flags = postfix.read_u8()?;
    let _postfix_octets = read_u16_flag(&mut postfix, postfix_flags)?;
    let footer = CryptoFooter::read(&mut postfix)?;

    for (index, key) in keyseq.iter().enumerate() {
        if !matches(key, &header) {
            continue;
        }
        let session = store
            .sessions
            .entry((sender_handle, index as u32))
            .or_default();

        if encrypts(key) {
            let n = r.read_u32_be()? as usize;
            let ciphertext = r.read_bytes(n)?;
            let session_key = session.key_for(key, header.session_id)?;
            return aes_gcm::decrypt_gcm(session_key, &header.iv(), ciphertext, &footer.common_mac);
        } else if authenticates(key) {
            // The MAC covers the inner submessage header plus content
            let data = &encoded[inner_start..postfix_start];
            let session_key = session.key_for(key, header.session_id)?;
            aes_gcm::gmac_verify(session_key, &header.iv(), data, &footer.common_mac)?;
            return Ok(data.to_vec());
        } else {
            return Err(kind_unrecognized(key));
        }
    }

    Err(SecurityError::KeyNotRegistered {
        kind: header.transformation_kind,
        key_id: header.transformation_key_id,
    })
}

impl CryptoTransform for CryptoPlugin {
    fn encode_serialized_payload(
        &self,
        plain_buffer: &[u8],
        sending_datawriter_crypto: DatawriterCryptoHandle,
    ) -> Result<Vec<u8>, SecurityError> {
        if sending_datawriter_crypto == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil datawriter handle".to_string(),
            ));
        }

        let mut guard = self.store.lock();
        let store = &mut *guard;

        let options = store.options(sending_datawriter_crypto);
        let keyseq = match store.keys.get(&sending_datawriter_crypto) {
            Some(keys) => keys,
            None => return Ok(plain_buffer.to_vec()),
        };
        if !options.payload || keyseq.is_empty() {
            return Ok(plain_buffer.to_vec());
        }

        // The payload key sits after the submessage key when both exist
        let key_index = if keyseq.len() >= 2 { 1 } else { 0 };
        let master = &keyseq[key_index];
        let session = store
            .sessions
            .entry((sending_datawriter_crypto, key_index as u32))
            .or_default();

        if encrypts(master) {
            let (header, ciphertext, footer) = encrypt(master, session, plain_buffer)?;
            let mut w = Writer::with_capacity(
                CRYPTO_HEADER_LENGTH + CRYPTO_CONTENT_ADDED_LENGTH + ciphertext.len() + TAG_LEN + 8,
            );
            header.write(&mut w);
            w.write_u32_be(ciphertext.len() as u32);
            w.write_bytes(&ciphertext);
            footer.write(&mut w);
            Ok(w.into_vec())
        } else if authenticates(master) {
            let (header, footer) = authtag(master, session, plain_buffer)?;
            let mut w =
                Writer::with_capacity(CRYPTO_HEADER_LENGTH + plain_buffer.len() + TAG_LEN + 8);
            header.write(&mut w);
            w.write_bytes(plain_buffer);
            footer.write(&mut w);
            Ok(w.into_vec())
        } else {
            Err(kind_unrecognized(master))
        }
    }

    fn encode_datawriter_submessage(
        &self,
        plain_rtps_submessage: &[u8],
        sending_datawriter_crypto: DatawriterCryptoHandle,
        receiving_datareader_crypto_list: &[DatareaderCryptoHandle],
        receiving_index: &mut i32,
    ) -> Result<Vec<u8>, SecurityError> {
        if sending_datawriter_crypto == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil datawriter handle".to_string(),
            ));
        }
        if *receiving_index < 0 {
            return Err(SecurityError::InvalidHandle(
                "negative receiver list index".to_string(),
            ));
        }
        // An empty list is allowed: the writer addresses all associated
        // readers with one encoding
        let len = receiving_datareader_crypto_list.len() as i32;
        if len > 0 && *receiving_index >= len {
            return Err(SecurityError::InvalidHandle(
                "receiver list index too large".to_string(),
            ));
        }
        if receiving_datareader_crypto_list
            .iter()
            .any(|handle| *handle == HANDLE_NIL)
        {
            return Err(SecurityError::InvalidHandle(
                "nil datareader handle in receiver list".to_string(),
            ));
        }

        let mut guard = self.store.lock();
        let store = &mut *guard;

        if !store.options(sending_datawriter_crypto).submessage {
            *receiving_index = len;
            return Ok(plain_rtps_submessage.to_vec());
        }

        let mut encode_handle = sending_datawriter_crypto;
        if receiving_datareader_crypto_list.len() == 1 {
            if let Some(keys) = store.keys.get(&sending_datawriter_crypto) {
                // Volatile endpoints encode under the key derived for the
                // matched remote reader
                if keys.len() == 1 && is_volatile_placeholder(&keys[0]) {
                    encode_handle = receiving_datareader_crypto_list[0];
                }
            }
        }

        let encoded = encode_submessage(store, plain_rtps_submessage, encode_handle)?;
        *receiving_index = len;
        Ok(encoded)
    }

    fn encode_datareader_submessage(
        &self,
        plain_rtps_submessage: &[u8],
        sending_datareader_crypto: DatareaderCryptoHandle,
        receiving_datawriter_crypto_list: &[DatawriterCryptoHandle],
    ) -> Result<Vec<u8>, SecurityError> {
        if sending_datareader_crypto == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil datareader handle".to_string(),
            ));
        }
        if receiving_datawriter_crypto_list
            .iter()
            .any(|handle| *handle == HANDLE_NIL)
        {
            return Err(SecurityError::InvalidHandle(
                "nil datawriter handle in receiver list".to_string(),
            ));
        }

        let mut guard = self.store.lock();
        let store = &mut *guard;

        let mut encode_handle = sending_datareader_crypto;
        if receiving_datawriter_crypto_list.len() == 1 {
            if let Some(keys) = store.keys.get(&sending_datareader_crypto) {
                if keys.len() == 1 && is_volatile_placeholder(&keys[0]) {
                    encode_handle = receiving_datawriter_crypto_list[0];
                }
            }
        }

        encode_submessage(store, plain_rtps_submessage, encode_handle)
    }

    fn encode_rtps_message(
        &self,
        plain_rtps_message: &[u8],
        sending_participant_crypto: ParticipantCryptoHandle,
        receiving_participant_crypto_list: &[ParticipantCryptoHandle],
        receiving_index: &mut i32,
    ) -> Result<Vec<u8>, SecurityError> {
        if sending_participant_crypto == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil sending participant handle".to_string(),
            ));
        }
        if receiving_participant_crypto_list.is_empty() {
            return Err(SecurityError::InvalidHandle(
                "no receiving participants".to_string(),
            ));
        }

        let destination = if *receiving_index >= 0
            && (*receiving_index as usize) < receiving_participant_crypto_list.len()
        {
            receiving_participant_crypto_list[*receiving_index as usize]
        } else {
            HANDLE_NIL
        };
        if destination == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "invalid receiving participant handle".to_string(),
            ));
        }

        // RTPS message protection is not implemented; wrap the input back
        // into the output and advance past this receiver
        let encoded = plain_rtps_message.to_vec();
        *receiving_index += 1;
        Ok(encoded)
    }

    fn decode_rtps_message(
        &self,
        encoded_rtps_message: &[u8],
        receiving_participant_crypto: ParticipantCryptoHandle,
        sending_participant_crypto: ParticipantCryptoHandle,
    ) -> Result<Vec<u8>, SecurityError> {
        if receiving_participant_crypto == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil receiving participant handle".to_string(),
            ));
        }
        if sending_participant_crypto == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil sending participant handle".to_string(),
            ));
        }
        Ok(encoded_rtps_message.to_vec())
    }

    fn preprocess_secure_submsg(
        &self,
        encoded_rtps_submessage: &[u8],
        receiving_participant_crypto: ParticipantCryptoHandle,
        sending_participant_crypto: ParticipantCryptoHandle,
    ) -> Result<SecureSubmessageCategory, SecurityError> {
        if receiving_participant_crypto == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil receiving participant handle".to_string(),
            ));
        }
        if sending_participant_crypto == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil sending participant handle".to_string(),
            ));
        }

        let mut r = Reader::new(encoded_rtps_submessage);
        let _prefix_id = r.read_u8()?;
        let prefix_flags = r.read_u8()?;
        let _prefix_octets = read_u16_flag(&mut r, prefix_flags)?;
        let header = CryptoHeader::read(&mut r)?;

        let store = self.store.lock();
        if let Some(entities) = store.participant_to_entity.get(&sending_participant_crypto) {
            for entity in entities {
                let Some(keyseq) = store.keys.get(&entity.handle) else {
                    continue;
                };
                if keyseq.iter().any(|key| matches(key, &header)) {
                    log::debug!(
                        "[crypto] matched inbound crypto header to handle {}",
                        entity.handle
                    );
                    return Ok(match entity.category {
                        EntityCategory::DatawriterSubmessage => {
                            SecureSubmessageCategory::DatawriterSubmessage(entity.handle)
                        }
                        EntityCategory::DatareaderSubmessage => {
                            SecureSubmessageCategory::DatareaderSubmessage(entity.handle)
                        }
                    });
                }
            }
        }

        log::debug!(
            "[crypto] no key registered for inbound crypto header (participant {})",
            sending_participant_crypto
        );
        Err(SecurityError::KeyNotRegistered {
            kind: header.transformation_kind,
            key_id: header.transformation_key_id,
        })
    }

    fn decode_datawriter_submessage(
        &self,
        encoded_rtps_submessage: &[u8],
        _receiving_datareader_crypto: DatareaderCryptoHandle,
        sending_datawriter_crypto: DatawriterCryptoHandle,
    ) -> Result<Vec<u8>, SecurityError> {
        // The receiving handle may be nil: origin authentication is not
        // implemented, decoding only needs the sender's keys
        if sending_datawriter_crypto == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil datawriter handle".to_string(),
            ));
        }

        let mut guard = self.store.lock();
        decode_submessage(&mut guard, encoded_rtps_submessage, sending_datawriter_crypto)
    }

    fn decode_datareader_submessage(
        &self,
        encoded_rtps_submessage: &[u8],
        _receiving_datawriter_crypto: DatawriterCryptoHandle,
        sending_datareader_crypto: DatareaderCryptoHandle,
    ) -> Result<Vec<u8>, SecurityError> {
        if sending_datareader_crypto == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil datareader handle".to_string(),
            ));
        }

        let mut guard = self.store.lock();
        decode_submessage(&mut guard, encoded_rtps_submessage, sending_datareader_crypto)
    }

    fn decode_serialized_payload(
        &self,
        encoded_buffer: &[u8],
        _receiving_datareader_crypto: DatareaderCryptoHandle,
        sending_datawriter_crypto: DatawriterCryptoHandle,
    ) -> Result<Vec<u8>, SecurityError> {
        if sending_datawriter_crypto == HANDLE_NIL {
            return Err(SecurityError::InvalidHandle(
                "nil datawriter handle".to_string(),
            ));
        }

        let mut guard = self.store.lock();
        let store = &mut *guard;

        if !store.options(sending_datawriter_crypto).payload {
            // The sending datawriter isn't protecting payloads as far as
            // we know; return the input as plaintext
            return Ok(encoded_buffer.to_vec());
        }

        let mut r = Reader::new(encoded_buffer);
        let header = CryptoHeader::read(&mut r)?;

        let empty = Vec::new();
        let keyseq = store
            .keys
            .get(&sending_datawriter_crypto)
            .unwrap_or(&empty);
        for (index, key) in keyseq.iter().enumerate() {
            if !matches(key, &header) {
                continue;
            }
            let session = store
                .sessions
                .entry((sending_datawriter_crypto, index as u32))
                .or_default();

            if encrypts(key) {
                let n = r.read_u32_be()? as usize;
                let ciphertext = r.read_bytes(n)?;
                let footer = CryptoFooter::read(&mut r)?;
                let session_key = session.key_for(key, header.session_id)?;
                return aes_gcm::decrypt_gcm(
                    session_key,
                    &header.iv(),
                    ciphertext,
                    &footer.common_mac,
                );
            } else if authenticates(key) {
                return Err(SecurityError::UnsupportedFeature(
                    "auth-only payload transformation".to_string(),
                ));
            } else {
                return Err(kind_unrecognized(key));
            }
        }

        Err(SecurityError::KeyNotRegistered {
            kind: header.transformation_kind,
            key_id: header.transformation_key_id,
        })
    }
}
