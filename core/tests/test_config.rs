#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pcapnet_core::config::{ConnOptions, TransportConfig};
    use pcapnet_core::crypto::Method;
    use pcapnet_core::types::Error;

    #[test]
    fn empty_json_takes_defaults() {
        let cfg = TransportConfig::from_json("{}").unwrap();
        assert_eq!(cfg, TransportConfig::default());
        assert_eq!(cfg.method().unwrap(), Method::Plain);
        assert_eq!(cfg.conn_options(), ConnOptions::default());
        assert_eq!(cfg.conn_options().stale_after, Duration::from_secs(30));
    }

    #[test]
    fn full_json_maps_to_options() {
        let cfg = TransportConfig::from_json(
            r#"{ "method": "chacha20-poly1305", "password": "pw", "stale_after_ms": 250,
                 "connect_timeout_ms": 1500, "nodelay": false }"#,
        )
        .unwrap();

        let opts = cfg.conn_options();
        assert_eq!(opts.stale_after, Duration::from_millis(250));
        assert_eq!(opts.connect_timeout, Some(Duration::from_millis(1500)));
        assert!(!opts.nodelay);
        assert_eq!(cfg.build_crypt().unwrap().method(), Method::ChaCha20Poly1305);
    }

    #[test]
    fn cipher_without_password_is_rejected() {
        let err = TransportConfig::from_json(r#"{ "method": "aes-256-gcm" }"#).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn zero_staleness_is_rejected() {
        let err = TransportConfig::from_json(r#"{ "stale_after_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn unknown_method_is_crypto_error() {
        let err = TransportConfig::from_json(r#"{ "method": "rot13" }"#).unwrap_err();
        assert!(matches!(err, Error::Crypto(_)));
        assert!(err.to_string().contains("rot13"));
    }

    #[test]
    fn malformed_json_is_json_error() {
        assert!(matches!(TransportConfig::from_json("{ method"), Err(Error::Json(_))));
    }
}
