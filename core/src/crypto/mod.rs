//! Message codecs consumed by connections.

use std::sync::Arc;

pub mod types;
pub mod aead;
pub mod kdf;
pub mod plain;

pub use types::*;
pub use aead::*;
pub use kdf::*;
pub use plain::*;

/// Build a shareable codec for `method`. `password` is ignored by `plain`.
pub fn new_crypt(method: Method, password: &[u8]) -> Result<Arc<dyn Crypt>, CryptoError> {
    match method {
        Method::Plain => Ok(Arc::new(PlainCrypt)),
        Method::Aes256Gcm | Method::ChaCha20Poly1305 => Ok(Arc::new(AeadCrypt::new(method, password)?)),
    }
}
