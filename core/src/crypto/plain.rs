use crate::crypto::types::{Crypt, CryptoError, Method};

/// Identity codec: bytes pass through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainCrypt;

impl Crypt for PlainCrypt {
    fn method(&self) -> Method {
        Method::Plain
    }

    fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(plaintext.to_vec())
    }

    fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
        Ok(ciphertext.to_vec())
    }
}
