//! Transport configuration.
//!
//! Loadable from JSON:
//!
//! ```json
//! { "method": "aes-256-gcm", "password": "secret", "stale_after_ms": 30000 }
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_STALE_AFTER;
use crate::crypto::{new_crypt, Crypt, Method};
use crate::types::Error;

fn default_method() -> String {
    Method::Plain.name().to_string()
}

fn default_stale_after_ms() -> u64 {
    DEFAULT_STALE_AFTER.as_millis() as u64
}

fn default_nodelay() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    #[serde(default = "default_method")]
    pub method: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_stale_after_ms")]
    pub stale_after_ms: u64,

    #[serde(default)]
    pub connect_timeout_ms: Option<u64>,

    #[serde(default = "default_nodelay")]
    pub nodelay: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            method: default_method(),
            password: String::new(),
            stale_after_ms: default_stale_after_ms(),
            connect_timeout_ms: None,
            nodelay: default_nodelay(),
        }
    }
}

impl TransportConfig {
    pub fn from_json(s: &str) -> Result<Self, Error> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn method(&self) -> Result<Method, Error> {
        Ok(self.method.parse::<Method>()?)
    }

    pub fn validate(&self) -> Result<(), Error> {
        let method = self.method()?;
        if method != Method::Plain && self.password.is_empty() {
            return Err(Error::Validation(format!("method {} requires a password", method)));
        }
        if self.stale_after_ms == 0 {
            return Err(Error::Validation("stale_after_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn build_crypt(&self) -> Result<Arc<dyn Crypt>, Error> {
        Ok(new_crypt(self.method()?, self.password.as_bytes())?)
    }

    pub fn conn_options(&self) -> ConnOptions {
        ConnOptions {
            stale_after: Duration::from_millis(self.stale_after_ms),
            connect_timeout: self.connect_timeout_ms.map(Duration::from_millis),
            nodelay: self.nodelay,
        }
    }
}

/// Per-connection knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnOptions {
    /// Staleness deadline handed to the frame extractor.
    pub stale_after: Duration,
    /// Dial timeout; `None` blocks until the OS gives up.
    pub connect_timeout: Option<Duration>,
    pub nodelay: bool,
}

impl Default for ConnOptions {
    fn default() -> Self {
        Self {
            stale_after: DEFAULT_STALE_AFTER,
            connect_timeout: None,
            nodelay: true,
        }
    }
}
