// Shared transport configuration for building reqwest::Client instances.
//
// The hub talks plain HTTP to every tablet; only the timeout and the
// optional device API key vary between deployments.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};

/// Header carrying the tablet API key.
pub const API_KEY_HEADER: &str = "X-Api-Key";

/// Shared transport configuration for building HTTP clients.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub api_key: Option<SecretString>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            api_key: None,
        }
    }
}

impl TransportConfig {
    /// Build a `reqwest::Client` from this config.
    ///
    /// When an API key is configured it is attached to every request as
    /// the `X-Api-Key` default header.
    pub fn build_client(&self) -> Result<reqwest::Client, crate::error::Error> {
        let mut headers = HeaderMap::new();
        if let Some(ref key) = self.api_key {
            let mut value = HeaderValue::from_str(key.expose_secret())
                .map_err(|e| crate::error::Error::ClientBuild(format!("invalid API key header: {e}")))?;
            value.set_sensitive(true);
            headers.insert(API_KEY_HEADER, value);
        }

        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("kioskhub/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(|e| crate::error::Error::ClientBuild(format!("failed to build HTTP client: {e}")))
    }

    /// Set the tablet API key.
    pub fn with_api_key(mut self, key: SecretString) -> Self {
        self.api_key = Some(key);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn unusable_api_key_is_a_client_build_error() {
        let transport =
            TransportConfig::default().with_api_key(SecretString::from("line\nbreak".to_owned()));
        assert!(matches!(
            transport.build_client(),
            Err(Error::ClientBuild(ref message)) if message.contains("API key")
        ));
    }

    #[test]
    fn plain_key_builds_a_client() {
        let transport =
            TransportConfig::default().with_api_key(SecretString::from("s3cret".to_owned()));
        assert!(transport.build_client().is_ok());
    }
}
