#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use pcapnet_core::crypto::{
        derive_key_32, new_crypt, AeadCrypt, AeadImpl, Crypt, CryptoError, Method, PlainCrypt,
        KEY_LEN_32, MAX_RECORD_LEN, NONCE_LEN_12, RECORD_LEN_PREFIX, TAG_LEN,
    };

    const PASSWORD: &[u8] = b"correct horse battery staple";

    // --- Method registry ---

    #[test]
    fn method_names_parse_case_insensitively() {
        assert_eq!("plain".parse::<Method>().unwrap(), Method::Plain);
        assert_eq!("AES-256-GCM".parse::<Method>().unwrap(), Method::Aes256Gcm);
        assert_eq!("ChaCha20-Poly1305".parse::<Method>().unwrap(), Method::ChaCha20Poly1305);
        assert!(matches!("rc4".parse::<Method>(), Err(CryptoError::UnknownMethod(m)) if m == "rc4"));
    }

    #[test]
    fn method_ids_round_trip_through_registry() {
        for m in [Method::Plain, Method::Aes256Gcm, Method::ChaCha20Poly1305] {
            assert_eq!(Method::from_id(m.id()).unwrap(), m);
            assert_eq!(m.to_string().parse::<Method>().unwrap(), m);
        }

        let err = Method::from_id(0x0042).unwrap_err();
        assert!(matches!(err, CryptoError::UnsupportedMethod { method_id: 0x0042 }));
        assert!(err.to_string().contains("0x0042"));
    }

    #[test]
    fn overhead_matches_layout() {
        assert_eq!(Method::Plain.overhead(), 0);
        assert_eq!(Method::Aes256Gcm.overhead(), RECORD_LEN_PREFIX + NONCE_LEN_12 + TAG_LEN);
        assert_eq!(Method::ChaCha20Poly1305.overhead(), 32);
    }

    // --- KDF ---

    #[test]
    fn kdf_is_deterministic_and_method_bound() {
        let a = derive_key_32(PASSWORD, Method::Aes256Gcm).unwrap();
        let b = derive_key_32(PASSWORD, Method::Aes256Gcm).unwrap();
        let c = derive_key_32(PASSWORD, Method::ChaCha20Poly1305).unwrap();
        let d = derive_key_32(b"another password", Method::Aes256Gcm).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert_eq!(a.len(), KEY_LEN_32);
    }

    #[test]
    fn kdf_rejects_empty_password() {
        assert!(matches!(derive_key_32(b"", Method::Aes256Gcm), Err(CryptoError::Failure(_))));
        assert!(new_crypt(Method::ChaCha20Poly1305, b"").is_err());
    }

    // --- Codecs ---

    #[test]
    fn plain_is_identity() {
        let c = PlainCrypt;
        assert_eq!(c.encrypt(b"abc").unwrap(), b"abc");
        assert_eq!(c.decrypt(b"abc").unwrap(), b"abc");
        assert_eq!(c.sealed_len(b"abc").unwrap(), 3);

        let shared = new_crypt(Method::Plain, b"").unwrap();
        assert_eq!(shared.method(), Method::Plain);
    }

    #[test]
    fn aead_round_trip_both_methods() {
        for m in [Method::Aes256Gcm, Method::ChaCha20Poly1305] {
            let c = new_crypt(m, PASSWORD).unwrap();
            let msg = b"datagram payload bytes";

            let ct = c.encrypt(msg).unwrap();
            assert_eq!(ct.len(), msg.len() + m.overhead());
            assert_eq!(ct[..RECORD_LEN_PREFIX], ((ct.len() - RECORD_LEN_PREFIX) as u32).to_be_bytes());
            assert_eq!(c.decrypt(&ct).unwrap(), msg);
            assert_eq!(c.method(), m);
        }
    }

    #[test]
    fn aead_nonces_differ_per_message() {
        let c = AeadCrypt::new(Method::Aes256Gcm, PASSWORD).unwrap();
        let a = c.encrypt(b"same").unwrap();
        let b = c.encrypt(b"same").unwrap();
        let nonce = RECORD_LEN_PREFIX..RECORD_LEN_PREFIX + NONCE_LEN_12;
        assert_ne!(a[nonce.clone()], b[nonce]);
    }

    #[test]
    fn aead_tamper_is_tag_mismatch() {
        let c = AeadCrypt::new(Method::ChaCha20Poly1305, PASSWORD).unwrap();
        let mut ct = c.encrypt(b"hello").unwrap();
        let last = ct.len() - 1;
        ct[last] ^= 0x01;

        assert!(matches!(c.decrypt(&ct), Err(CryptoError::TagMismatch)));
    }

    #[test]
    fn aead_wrong_password_is_tag_mismatch() {
        let a = AeadCrypt::new(Method::Aes256Gcm, PASSWORD).unwrap();
        let b = AeadCrypt::new(Method::Aes256Gcm, b"not it").unwrap();
        let ct = a.encrypt(b"secret").unwrap();

        assert!(matches!(b.decrypt(&ct), Err(CryptoError::TagMismatch)));
    }

    #[test]
    fn aead_short_input_is_rejected() {
        let c = AeadCrypt::new(Method::Aes256Gcm, PASSWORD).unwrap();
        assert!(matches!(
            c.decrypt(&[0u8; 3]),
            Err(CryptoError::CiphertextTooShort { len: 3, min: 4 })
        ));
        assert!(matches!(
            c.decrypt(&[0, 0, 0, 27]),
            Err(CryptoError::CiphertextTooShort { len: 27, min: 28 })
        ));

        let ct = c.encrypt(b"cut short").unwrap();
        assert!(matches!(
            c.decrypt(&ct[..ct.len() - 1]),
            Err(CryptoError::CiphertextTooShort { .. })
        ));
    }

    #[test]
    fn aead_oversized_record_is_rejected() {
        let c = AeadCrypt::new(Method::ChaCha20Poly1305, PASSWORD).unwrap();
        let header = ((MAX_RECORD_LEN + 1) as u32).to_be_bytes();

        assert!(matches!(c.sealed_len(&header), Err(CryptoError::RecordTooLarge { .. })));
        assert!(matches!(
            c.encrypt(&vec![0u8; MAX_RECORD_LEN]),
            Err(CryptoError::RecordTooLarge { .. })
        ));
    }

    #[test]
    fn aead_concatenated_records_decrypt_together() {
        let c = AeadCrypt::new(Method::Aes256Gcm, PASSWORD).unwrap();
        let wire = [c.encrypt(b"first").unwrap(), c.encrypt(b"").unwrap(), c.encrypt(b"third").unwrap()].concat();

        assert_eq!(c.decrypt(&wire).unwrap(), b"firstthird");
        assert_eq!(c.sealed_len(&wire).unwrap(), wire.len());
    }

    #[test]
    fn aead_sealed_len_stops_before_partial_record() {
        let c = AeadCrypt::new(Method::ChaCha20Poly1305, PASSWORD).unwrap();
        let first = c.encrypt(b"whole").unwrap();
        let second = c.encrypt(b"still arriving").unwrap();
        let mut wire = first.clone();
        wire.extend_from_slice(&second[..10]);

        assert_eq!(c.sealed_len(&wire).unwrap(), first.len());
        assert_eq!(c.sealed_len(&second[..2]).unwrap(), 0);
        assert_eq!(c.decrypt(&wire[..first.len()]).unwrap(), b"whole");
    }

    #[test]
    fn raw_key_length_is_checked() {
        assert!(matches!(
            AeadCrypt::with_key(Method::Aes256Gcm, &[0u8; 16]),
            Err(CryptoError::InvalidKeyLen { expected: 32, actual: 16 })
        ));
        assert!(matches!(
            AeadImpl::from_method_and_key(Method::Plain, &[0u8; 32]),
            Err(CryptoError::UnsupportedMethod { method_id: 0 })
        ));
    }

    proptest! {
        #[test]
        fn prop_aead_round_trip(data in proptest::collection::vec(any::<u8>(), 0..2048)) {
            for m in [Method::Aes256Gcm, Method::ChaCha20Poly1305] {
                let c = new_crypt(m, PASSWORD).unwrap();
                let ct = c.encrypt(&data).unwrap();
                prop_assert_eq!(c.decrypt(&ct).unwrap(), data.clone());
            }
        }

        #[test]
        fn prop_aead_records_survive_any_split(
            msgs in proptest::collection::vec(proptest::collection::vec(any::<u8>(), 0..300), 1..6),
            cut in any::<prop::sample::Index>(),
        ) {
            let c = new_crypt(Method::Aes256Gcm, PASSWORD).unwrap();
            let wire: Vec<u8> = msgs.iter().flat_map(|m| c.encrypt(m).unwrap()).collect();
            let at = cut.index(wire.len() + 1);

            let head = c.sealed_len(&wire[..at]).unwrap();
            let mut rest = wire[head..at].to_vec();
            rest.extend_from_slice(&wire[at..]);
            prop_assert_eq!(c.sealed_len(&rest).unwrap(), rest.len());

            let mut got = c.decrypt(&wire[..head]).unwrap();
            got.extend(c.decrypt(&rest).unwrap());
            prop_assert_eq!(got, msgs.concat());
        }
    }
}
