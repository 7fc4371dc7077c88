use std::fmt;
use std::str::FromStr;

use num_enum::TryFromPrimitive;

use crate::constants::method_ids;
use crate::utils::enum_name_or_hex;

/// Stable key length for every AEAD method.
pub const KEY_LEN_32: usize = 32;

/// Standard 12-byte nonce length for AES-GCM and ChaCha20-Poly1305.
pub const NONCE_LEN_12: usize = 12;

/// Fixed AEAD tag length (bytes).
pub const TAG_LEN: usize = 16;

/// Big-endian length header in front of every sealed record.
pub const RECORD_LEN_PREFIX: usize = 4;

/// Largest sealed record body (`nonce || ciphertext || tag`) accepted on
/// either side.
pub const MAX_RECORD_LEN: usize = 1 << 20;

/// Message codec used by connections.
///
/// Each call is independent. A codec that needs per-message state (a nonce
/// counter, say) keeps it inside itself; connections never mutate it, and a
/// listener shares one codec across every accepted connection.
///
/// Ciphertext arrives in whatever chunks the socket delivers. A codec whose
/// messages only decrypt whole reports their boundaries through
/// `sealed_len`; the connection buffers received bytes until that prefix is
/// non-empty and hands `decrypt` only whole messages, possibly several.
pub trait Crypt: Send + Sync {
    fn method(&self) -> Method;

    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError>;

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Length of the longest prefix of `wire` made of whole messages.
    /// Byte-wise codecs decrypt any prefix and keep this default.
    fn sealed_len(&self, wire: &[u8]) -> Result<usize, CryptoError> {
        Ok(wire.len())
    }
}

/// Codec method registry.
#[repr(u16)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive)]
pub enum Method {
    Plain            = method_ids::PLAIN,
    Aes256Gcm        = method_ids::AES256_GCM,
    ChaCha20Poly1305 = method_ids::CHACHA20_POLY1305,
}

impl Method {
    pub const fn name(self) -> &'static str {
        match self {
            Method::Plain => "plain",
            Method::Aes256Gcm => "aes-256-gcm",
            Method::ChaCha20Poly1305 => "chacha20-poly1305",
        }
    }

    pub const fn id(self) -> u16 {
        self as u16
    }

    /// Registry lookup by raw id.
    pub fn from_id(id: u16) -> Result<Self, CryptoError> {
        Method::try_from(id).map_err(|_| CryptoError::UnsupportedMethod { method_id: id })
    }

    /// Bytes added to every message by this method.
    pub const fn overhead(self) -> usize {
        match self {
            Method::Plain => 0,
            Method::Aes256Gcm | Method::ChaCha20Poly1305 => RECORD_LEN_PREFIX + NONCE_LEN_12 + TAG_LEN,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" => Ok(Method::Plain),
            "aes-256-gcm" => Ok(Method::Aes256Gcm),
            "chacha20-poly1305" => Ok(Method::ChaCha20Poly1305),
            _ => Err(CryptoError::UnknownMethod(s.to_string())),
        }
    }
}

#[derive(Debug)]
pub enum CryptoError {
    /// Method name not in the registry.
    UnknownMethod(String),

    /// Method id not in the registry.
    UnsupportedMethod { method_id: u16 },

    /// Invalid key length provided to cipher.
    InvalidKeyLen { expected: usize, actual: usize },

    /// Ciphertext cannot hold a record header, nonce and tag, or is cut
    /// short of its declared length.
    CiphertextTooShort { len: usize, min: usize },

    /// Record larger than `MAX_RECORD_LEN`.
    RecordTooLarge { len: usize, max: usize },

    /// AEAD tag mismatch (authentication failure).
    TagMismatch,

    /// General derivation or runtime error with context.
    Failure(String),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use CryptoError::*;
        match self {
            UnknownMethod(name) =>
                write!(f, "unknown method: {}", name),
            UnsupportedMethod { method_id } =>
                write!(f, "unsupported method: {}", enum_name_or_hex::<Method>(*method_id)),
            InvalidKeyLen { expected, actual } =>
                write!(f, "invalid key length: expected={}, actual={}", expected, actual),
            CiphertextTooShort { len, min } =>
                write!(f, "ciphertext too short: len={}, min={}", len, min),
            RecordTooLarge { len, max } =>
                write!(f, "record too large: len={}, max={}", len, max),
            TagMismatch =>
                write!(f, "AEAD tag mismatch"),
            Failure(msg) =>
                write!(f, "crypto failure: {}", msg),
        }
    }
}

impl std::error::Error for CryptoError {}
