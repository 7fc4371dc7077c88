//! crypto/aead.rs
//! AEAD codec over AES-256-GCM and ChaCha20-Poly1305.
//!
//! Design notes:
//! - Both ciphers use 32-byte keys and 12-byte nonces.
//! - Record layout: `len (u32 BE) || nonce (12) || ciphertext || tag (16)`,
//!   where `len` counts nonce, ciphertext and tag.
//! - Records are self-delimiting, so any number of them can be concatenated
//!   into one decrypt input.
//! - Nonces are random per message, so the codec holds no mutable state and
//!   is safe to share across connections.
//! - Tag verification fails closed (no partial plaintext).

use byteorder::{BigEndian, ByteOrder};
use rand::RngCore;

use crate::crypto::kdf::derive_key_32;
use crate::crypto::types::{
    Crypt, CryptoError, Method, KEY_LEN_32, MAX_RECORD_LEN, NONCE_LEN_12, RECORD_LEN_PREFIX, TAG_LEN,
};

use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Nonce as AesNonce};
use chacha20poly1305::{ChaCha20Poly1305, Nonce as ChaNonce};

/// Unified AEAD cipher selected by method.
#[derive(Clone)]
pub enum AeadImpl {
    AesGcm(Aes256Gcm),
    ChaCha(ChaCha20Poly1305),
}

impl AeadImpl {
    /// Construct from method and a raw 32-byte key.
    pub fn from_method_and_key(method: Method, key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != KEY_LEN_32 {
            return Err(CryptoError::InvalidKeyLen {
                expected: KEY_LEN_32,
                actual: key.len(),
            });
        }

        let bad_key = |_| CryptoError::InvalidKeyLen {
            expected: KEY_LEN_32,
            actual: key.len(),
        };

        match method {
            Method::Aes256Gcm => Ok(Self::AesGcm(Aes256Gcm::new_from_slice(key).map_err(bad_key)?)),
            Method::ChaCha20Poly1305 => Ok(Self::ChaCha(ChaCha20Poly1305::new_from_slice(key).map_err(bad_key)?)),
            other => Err(CryptoError::UnsupportedMethod { method_id: other.id() }),
        }
    }

    fn method(&self) -> Method {
        match self {
            AeadImpl::AesGcm(_) => Method::Aes256Gcm,
            AeadImpl::ChaCha(_) => Method::ChaCha20Poly1305,
        }
    }

    /// AEAD seal with an explicit nonce.
    pub fn seal(&self, nonce_12: &[u8; NONCE_LEN_12], plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        match self {
            AeadImpl::AesGcm(cipher) => cipher
                .encrypt(AesNonce::from_slice(nonce_12), plaintext)
                .map_err(|_| CryptoError::Failure("AES-GCM seal failed".into())),
            AeadImpl::ChaCha(cipher) => cipher
                .encrypt(ChaNonce::from_slice(nonce_12), plaintext)
                .map_err(|_| CryptoError::Failure("ChaCha20-Poly1305 seal failed".into())),
        }
    }

    /// AEAD open with an explicit nonce.
    pub fn open(&self, nonce_12: &[u8; NONCE_LEN_12], ciphertext_and_tag: &[u8]) -> Result<Vec<u8>, CryptoError> {
        if ciphertext_and_tag.len() < TAG_LEN {
            return Err(CryptoError::CiphertextTooShort {
                len: ciphertext_and_tag.len(),
                min: TAG_LEN,
            });
        }

        match self {
            AeadImpl::AesGcm(cipher) => cipher
                .decrypt(AesNonce::from_slice(nonce_12), ciphertext_and_tag)
                .map_err(|_| CryptoError::TagMismatch),
            AeadImpl::ChaCha(cipher) => cipher
                .decrypt(ChaNonce::from_slice(nonce_12), ciphertext_and_tag)
                .map_err(|_| CryptoError::TagMismatch),
        }
    }
}

/// Record body length declared at the head of `wire`; `None` until the
/// whole length header is present.
fn record_body_len(wire: &[u8]) -> Result<Option<usize>, CryptoError> {
    if wire.len() < RECORD_LEN_PREFIX {
        return Ok(None);
    }

    let len = BigEndian::read_u32(&wire[..RECORD_LEN_PREFIX]) as usize;
    let min = NONCE_LEN_12 + TAG_LEN;
    if len < min {
        return Err(CryptoError::CiphertextTooShort { len, min });
    }
    if len > MAX_RECORD_LEN {
        return Err(CryptoError::RecordTooLarge { len, max: MAX_RECORD_LEN });
    }
    Ok(Some(len))
}

/// Password-keyed AEAD codec.
#[derive(Clone)]
pub struct AeadCrypt {
    aead: AeadImpl,
}

impl AeadCrypt {
    /// Build from a password; the key is derived with HKDF-SHA256.
    pub fn new(method: Method, password: &[u8]) -> Result<Self, CryptoError> {
        let key = derive_key_32(password, method)?;
        Self::with_key(method, &key)
    }

    pub fn with_key(method: Method, key: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self { aead: AeadImpl::from_method_and_key(method, key)? })
    }
}

impl Crypt for AeadCrypt {
    fn method(&self) -> Method {
        self.aead.method()
    }

    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let body_len = NONCE_LEN_12 + plaintext.len() + TAG_LEN;
        if body_len > MAX_RECORD_LEN {
            return Err(CryptoError::RecordTooLarge { len: body_len, max: MAX_RECORD_LEN });
        }

        let mut nonce = [0u8; NONCE_LEN_12];
        rand::thread_rng().fill_bytes(&mut nonce);

        let sealed = self.aead.seal(&nonce, plaintext)?;

        let mut out = vec![0u8; RECORD_LEN_PREFIX];
        BigEndian::write_u32(&mut out, body_len as u32);
        out.reserve(body_len);
        out.extend_from_slice(&nonce);
        out.extend_from_slice(&sealed);
        Ok(out)
    }

    /// Open every record in `ciphertext` and concatenate the plaintexts.
    /// The input must end on a record boundary.
    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        let mut out = Vec::with_capacity(ciphertext.len());
        let mut rest = ciphertext;

        while !rest.is_empty() {
            let body_len = record_body_len(rest)?.ok_or(CryptoError::CiphertextTooShort {
                len: rest.len(),
                min: RECORD_LEN_PREFIX,
            })?;

            let record = &rest[RECORD_LEN_PREFIX..];
            if record.len() < body_len {
                return Err(CryptoError::CiphertextTooShort { len: record.len(), min: body_len });
            }

            let (body, tail) = record.split_at(body_len);
            let (nonce, sealed) = body.split_at(NONCE_LEN_12);
            let mut nonce_12 = [0u8; NONCE_LEN_12];
            nonce_12.copy_from_slice(nonce);

            out.extend_from_slice(&self.aead.open(&nonce_12, sealed)?);
            rest = tail;
        }

        Ok(out)
    }

    fn sealed_len(&self, wire: &[u8]) -> Result<usize, CryptoError> {
        let mut at = 0;
        while let Some(body_len) = record_body_len(&wire[at..])? {
            let end = at + RECORD_LEN_PREFIX + body_len;
            if end > wire.len() {
                break;
            }
            at = end;
        }
        Ok(at)
    }
}
