//! Service state and configuration.

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::representation::{RepresentationBuilder, RepresentationConfig};
use crate::store::{ReadGuard, ResourceStore};

/// Runtime configuration read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Bind host.
    pub host: String,
    /// Bind port.
    pub port: u16,
    /// Externally visible base URL; record IRIs are minted under it.
    pub public_base_url: String,
    /// `json` or `pretty`.
    pub log_format: String,
    /// Bound on store lock waits. `None` waits indefinitely.
    pub lock_timeout: Option<Duration>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            public_base_url: "http://localhost:8080".to_string(),
            log_format: "json".to_string(),
            lock_timeout: None,
        }
    }
}

impl ServiceConfig {
    /// Create configuration from environment variables.
    ///
    /// - `HOST` (default `0.0.0.0`)
    /// - `PORT` (default `8080`)
    /// - `PUBLIC_BASE_URL` (default `http://localhost:{PORT}`)
    /// - `LOG_FORMAT` (default `json`)
    /// - `LOCK_TIMEOUT_MS` (unset: wait indefinitely)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let port = lookup("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.port);
        let public_base_url = lookup("PUBLIC_BASE_URL")
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", port));

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port,
            public_base_url,
            log_format: lookup("LOG_FORMAT").unwrap_or(defaults.log_format),
            lock_timeout: lookup("LOCK_TIMEOUT_MS")
                .and_then(|s| s.parse().ok())
                .map(Duration::from_millis),
        }
    }

    /// Representation settings for this deployment.
    pub fn representation(&self) -> RepresentationConfig {
        RepresentationConfig::for_base(&self.public_base_url)
    }
}

/// Shared service state.
///
/// Contains the resource store and the representation builder.
#[derive(Debug, Clone)]
pub struct ServiceState {
    /// The record store.
    pub store: Arc<ResourceStore>,
    /// Output shaping.
    pub builder: Arc<RepresentationBuilder>,
}

impl ServiceState {
    /// Create service state from a store and a builder.
    pub fn new(store: ResourceStore, builder: RepresentationBuilder) -> Self {
        Self {
            store: Arc::new(store),
            builder: Arc::new(builder),
        }
    }

    /// Create service state for `config` with an empty store.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(
            ResourceStore::new().with_lock_timeout(config.lock_timeout),
            RepresentationBuilder::new(config.representation()),
        )
    }

    /// IRI of the served container.
    pub fn container_uri(&self) -> &str {
        &self.builder.config().container_uri
    }

    pub(crate) fn read(&self) -> Result<ReadGuard<'_>> {
        self.store.acquire_read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::from_lookup(lookup(&[]));
        assert_eq!(config, ServiceConfig::default());
    }

    #[test]
    fn test_base_url_follows_port() {
        let config = ServiceConfig::from_lookup(lookup(&[("PORT", "9000")]));
        assert_eq!(config.port, 9000);
        assert_eq!(config.public_base_url, "http://localhost:9000");
        assert_eq!(config.representation().container_uri, "http://localhost:9000/bugs");
    }

    #[test]
    fn test_overrides() {
        let config = ServiceConfig::from_lookup(lookup(&[
            ("HOST", "127.0.0.1"),
            ("PUBLIC_BASE_URL", "https://bugs.example.com"),
            ("LOG_FORMAT", "pretty"),
            ("LOCK_TIMEOUT_MS", "250"),
            ("PORT", "not-a-port"),
        ]));
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.public_base_url, "https://bugs.example.com");
        assert_eq!(config.log_format, "pretty");
        assert_eq!(config.lock_timeout, Some(Duration::from_millis(250)));
    }

    #[test]
    fn test_state_container_uri() {
        let state = ServiceState::from_config(&ServiceConfig::default());
        assert_eq!(state.container_uri(), "http://localhost:8080/bugs");
    }
}
