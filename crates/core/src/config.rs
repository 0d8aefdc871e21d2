//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Seed demonstration data on first start when the database is empty.
    #[serde(default = "default_seed_demo_data")]
    pub seed_demo_data: bool,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_seed_demo_data() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            seed_demo_data: default_seed_demo_data(),
        }
    }
}

/// Metadata store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetadataConfig {
    /// SQLite database file path.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./data/helix.db")
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Authentication configuration.
///
/// The secret is required for server operation; there is no default on
/// purpose, so a deployment cannot accidentally run with a known key.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HMAC secret for signing tokens.
    /// WARNING: Prefer the HELIX_AUTH__SECRET env var over storing in config.
    pub secret: String,
    /// Access token lifetime in seconds.
    #[serde(default = "default_access_ttl_secs")]
    pub access_ttl_secs: u64,
    /// Refresh token lifetime in seconds.
    #[serde(default = "default_refresh_ttl_secs")]
    pub refresh_ttl_secs: u64,
}

fn default_access_ttl_secs() -> u64 {
    3600 // 1 hour
}

fn default_refresh_ttl_secs() -> u64 {
    2_592_000 // 30 days
}

impl AuthConfig {
    /// Create a test configuration with a fixed secret.
    ///
    /// **For testing only.** The secret is deterministic and public.
    pub fn for_testing() -> Self {
        Self {
            secret: "test-signing-secret".to_string(),
            access_ttl_secs: default_access_ttl_secs(),
            refresh_ttl_secs: default_refresh_ttl_secs(),
        }
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Metadata store configuration.
    #[serde(default)]
    pub metadata: MetadataConfig,
    /// Authentication configuration (required).
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Create a test configuration with sensible defaults.
    ///
    /// **For testing only.** Uses a local SQLite path and a fixed auth secret.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig::default(),
            metadata: MetadataConfig::default(),
            auth: AuthConfig::for_testing(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_config_defaults() {
        let json = r#"{"secret": "s"}"#;
        let config: AuthConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.access_ttl_secs, 3600);
        assert_eq!(config.refresh_ttl_secs, 2_592_000);
    }

    #[test]
    fn test_auth_config_requires_secret() {
        let json = r#"{}"#;
        assert!(serde_json::from_str::<AuthConfig>(json).is_err());
    }

    #[test]
    fn test_app_config_sections_default() {
        let json = r#"{"auth": {"secret": "s"}}"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert!(config.server.seed_demo_data);
        assert_eq!(config.metadata.path, PathBuf::from("./data/helix.db"));
    }
}
