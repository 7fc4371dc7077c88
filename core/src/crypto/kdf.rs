//! crypto/kdf.rs
//! HKDF-based key derivation from a shared password.
//!
//! Design:
//! - HKDF-Extract(salt, password) -> PRK
//! - HKDF-Expand(PRK, info || method id) -> key (32 bytes)
//!
//! Both peers derive the same key from the same password and method, so
//! no key exchange is needed. Binding the method id into `info` keeps keys
//! for different ciphers apart.

use hkdf::Hkdf;
use sha2::Sha256;

use crate::constants::kdf::{INFO, SALT};
use crate::crypto::types::{CryptoError, Method, KEY_LEN_32};

fn build_info(method: Method) -> Vec<u8> {
    let mut info = Vec::with_capacity(INFO.len() + 2);
    info.extend_from_slice(INFO);
    info.extend_from_slice(&method.id().to_le_bytes());
    info
}

/// Derive a 32-byte key for `method` from `password`.
///
/// Errors:
/// - Empty password returns `CryptoError::Failure`.
#[inline]
pub fn derive_key_32(password: &[u8], method: Method) -> Result<[u8; KEY_LEN_32], CryptoError> {
    if password.is_empty() {
        return Err(CryptoError::Failure("password must not be empty".into()));
    }

    let hk = Hkdf::<Sha256>::new(Some(SALT), password);
    let mut key = [0u8; KEY_LEN_32];
    hk.expand(&build_info(method), &mut key)
        .map_err(|_| CryptoError::Failure("HKDF expand failed (SHA-256)".into()))?;
    Ok(key)
}
