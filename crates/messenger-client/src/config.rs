//! Connection settings for the Messenger API.
//!
//! Every field has an environment-backed default so a client can be built
//! with zero arguments in a configured deployment:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `MESSENGER_API_TOKEN` | (none) |
//! | `MESSENGER_API_TRANSPORT` | `https` |
//! | `MESSENGER_API_DOMAIN` | `api.alterdesk.com` |
//! | `MESSENGER_API_VERSION` | `v1` |
//! | `MESSENGER_API_PORT` | `443` |
//! | `MESSENGER_DOWNLOAD_DIR` | `<tmp>/messenger-downloads` |

use std::path::PathBuf;

use url::Url;

use crate::error::{Error, Result};

pub const ENV_TOKEN: &str = "MESSENGER_API_TOKEN";
pub const ENV_PROTOCOL: &str = "MESSENGER_API_TRANSPORT";
pub const ENV_DOMAIN: &str = "MESSENGER_API_DOMAIN";
pub const ENV_VERSION: &str = "MESSENGER_API_VERSION";
pub const ENV_PORT: &str = "MESSENGER_API_PORT";
pub const ENV_DOWNLOAD_DIR: &str = "MESSENGER_DOWNLOAD_DIR";

pub const DEFAULT_PROTOCOL: &str = "https";
pub const DEFAULT_DOMAIN: &str = "api.alterdesk.com";
pub const DEFAULT_VERSION: &str = "v1";
pub const DEFAULT_PORT: u16 = 443;

/// Name of the directory created under the system temp dir for downloads.
const DOWNLOAD_DIR_NAME: &str = "messenger-downloads";

/// Connection configuration for a [`MessengerClient`](crate::MessengerClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Default bearer token.
    pub token: Option<String>,
    /// URL scheme (`https`, `http`).
    pub protocol: String,
    /// API host name.
    pub domain: String,
    /// API version path segment.
    pub version: String,
    /// TCP port.
    pub port: u16,
    /// Parent directory for per-download temporary folders.
    pub download_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            token: None,
            protocol: DEFAULT_PROTOCOL.to_string(),
            domain: DEFAULT_DOMAIN.to_string(),
            version: DEFAULT_VERSION.to_string(),
            port: DEFAULT_PORT,
            download_dir: default_download_dir(),
        }
    }
}

impl ClientConfig {
    /// Create a configuration with built-in defaults and no token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values count as unset. An unparseable port falls back to the
    /// default with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let port = match get(ENV_PORT) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "Invalid {}, using default", ENV_PORT);
                DEFAULT_PORT
            }),
            None => DEFAULT_PORT,
        };

        Self {
            token: get(ENV_TOKEN),
            protocol: get(ENV_PROTOCOL).unwrap_or(defaults.protocol),
            domain: get(ENV_DOMAIN).unwrap_or(defaults.domain),
            version: get(ENV_VERSION).unwrap_or(defaults.version),
            port,
            download_dir: get(ENV_DOWNLOAD_DIR)
                .map(PathBuf::from)
                .unwrap_or(defaults.download_dir),
        }
    }

    /// Whether a non-empty default token is configured.
    pub fn has_token(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.is_empty())
    }

    /// Derive the API root, e.g. `https://api.alterdesk.com/v1/`.
    pub fn base_url(&self) -> Result<Url> {
        let version = self.version.trim_matches('/');
        let raw = if version.is_empty() {
            format!("{}://{}:{}/", self.protocol, self.domain, self.port)
        } else {
            format!(
                "{}://{}:{}/{}/",
                self.protocol, self.domain, self.port, version
            )
        };
        let url = Url::parse(&raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::Config(format!("not a base URL: {}", raw)));
        }
        Ok(url)
    }
}

fn default_download_dir() -> PathBuf {
    std::env::temp_dir().join(DOWNLOAD_DIR_NAME)
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
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config.token, None);
        assert_eq!(config.protocol, "https");
        assert_eq!(config.domain, "api.alterdesk.com");
        assert_eq!(config.version, "v1");
        assert_eq!(config.port, 443);
        assert!(config.download_dir.ends_with("messenger-downloads"));
        assert!(!config.has_token());
    }

    #[test]
    fn test_environment_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            (ENV_TOKEN, "abc"),
            (ENV_PROTOCOL, "http"),
            (ENV_DOMAIN, "localhost"),
            (ENV_VERSION, "v2"),
            (ENV_PORT, "8080"),
            (ENV_DOWNLOAD_DIR, "/var/tmp/dl"),
        ]));
        assert_eq!(config.token.as_deref(), Some("abc"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.download_dir, PathBuf::from("/var/tmp/dl"));
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "http://localhost:8080/v2/"
        );
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config = ClientConfig::from_lookup(lookup(&[(ENV_TOKEN, ""), (ENV_DOMAIN, "  ")]));
        assert_eq!(config.token, None);
        assert_eq!(config.domain, DEFAULT_DOMAIN);
    }

    #[test]
    fn test_bad_port_falls_back() {
        let config = ClientConfig::from_lookup(lookup(&[(ENV_PORT, "https")]));
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn test_base_url_drops_default_port() {
        let config = ClientConfig::new();
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://api.alterdesk.com/v1/"
        );
    }
}
