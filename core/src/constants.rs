use std::time::Duration;

/// Network tag reported on connection errors.
pub const NETWORK: &str = "pcap";

/// Receive scratch capacity: the largest IP datagram, so the upper bound of
/// any single frame.
pub const MAX_DATAGRAM_LEN: usize = 65535;

/// How long a partial frame may stay buffered before the stream is deemed
/// desynchronized.
pub const DEFAULT_STALE_AFTER: Duration = Duration::from_secs(30);

/// Fixed IP header sizes used by frame boundary detection.
pub const IPV4_MIN_HEADER_LEN: usize = 20;
pub const IPV6_HEADER_LEN: usize = 40;

/// Codec method identifiers.
pub mod method_ids {
    pub const PLAIN: u16             = 0x0000;
    pub const AES256_GCM: u16        = 0x0001;
    pub const CHACHA20_POLY1305: u16 = 0x0002;
}

/// Key schedule domain separation for password-derived keys.
pub mod kdf {
    pub const SALT: &[u8] = b"pcapnet|kdf|salt|v1";
    pub const INFO: &[u8] = b"pcapnet|kdf|key|v1";
}
