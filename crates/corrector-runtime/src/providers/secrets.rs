//! Upstream API key wrapper.
//!
//! The key is held in a [`SecretString`], zeroed on drop, and rendered as
//! `[REDACTED]` by `Debug` and `Display`. The only way to read it is
//! [`ApiKey::expose`], called where the `Authorization` header is built.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;

pub struct ApiKey(SecretString);

impl ApiKey {
    /// Wrap a key. Blank input yields `None`: a whitespace key is no key.
    pub fn parse(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Self(SecretString::from(raw)))
        }
    }

    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Copy into a fresh secret, for handing to a provider instance.
    pub fn duplicate(&self) -> Self {
        Self(SecretString::from(self.expose().to_string()))
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey([REDACTED])")
    }
}

impl fmt::Display for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}
