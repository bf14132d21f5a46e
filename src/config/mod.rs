//! Configuration management for lazycloud
//!
//! Loaded once at startup; none of these settings are reloaded at runtime.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::{self, ResourceKind};
use crate::error::{ConfigError, Result};

/// Fallback endpoint when nothing is configured: the standard local
/// emulator address the original deployment targets.
const DEFAULT_ENDPOINT: &str = "http://localhost:4566";
const DEFAULT_REGION: &str = "us-east-1";
const DEFAULT_PROFILE: &str = "default";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Account identifier to browse
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<String>,

    /// Default region
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// Credential profile name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Provider gateway endpoint URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Cache tuning
    #[serde(default)]
    pub cache: CacheSettings,

    /// Per-kind TTL/deadline overrides
    #[serde(default)]
    pub kinds: HashMap<ResourceKind, KindSettings>,
}

/// Cache tuning knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Maximum number of cached entries
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

fn default_capacity() -> usize {
    cache::DEFAULT_CAPACITY
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

/// Per-kind freshness and deadline overrides
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct KindSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline_secs: Option<u64>,
}

impl Config {
    /// Get the default config file path (~/.lazycloud/config.yaml)
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or(ConfigError::Invalid(
            "Could not determine home directory".to_string(),
        ))?;

        Ok(home.join(".lazycloud").join("config.yaml"))
    }

    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(Self::default_path()?)
    }

    /// Load from an explicit path when given, else the default path
    pub fn load_at(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => Self::load_from(PathBuf::from(p)),
            None => Self::load(),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: PathBuf) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound.into());
        }

        let contents = std::fs::read_to_string(&path)?;
        let config: Config = serde_yaml::from_str(&contents).map_err(ConfigError::from)?;

        Ok(config)
    }

    /// Save configuration to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(Self::default_path()?)
    }

    /// Save configuration to a specific path
    pub fn save_to(&self, path: PathBuf) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents =
            serde_yaml::to_string(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;

        std::fs::write(&path, contents)?;

        // Config may reference private endpoints; keep it owner-only
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = std::fs::metadata(&path)?.permissions();
            perms.set_mode(0o600);
            std::fs::set_permissions(&path, perms)?;
        }

        Ok(())
    }

    /// Account identifier, required for any resource request
    pub fn require_account(&self) -> Result<&str> {
        self.account
            .as_deref()
            .ok_or_else(|| ConfigError::MissingAccount.into())
    }

    pub fn region(&self) -> &str {
        self.region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    pub fn profile(&self) -> &str {
        self.profile.as_deref().unwrap_or(DEFAULT_PROFILE)
    }

    /// Provider endpoint: environment overrides win over the config file,
    /// matching how the original resolves local emulator endpoints.
    pub fn endpoint(&self) -> String {
        std::env::var("LAZYCLOUD_ENDPOINT")
            .or_else(|_| std::env::var("AWS_ENDPOINT_URL"))
            .ok()
            .or_else(|| self.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
    }

    /// Freshness window for cached entries of a kind
    pub fn ttl_for(&self, kind: ResourceKind) -> Duration {
        self.kinds
            .get(&kind)
            .and_then(|k| k.ttl_secs)
            .map(Duration::from_secs)
            .unwrap_or_else(|| kind.default_ttl())
    }

    /// Fetch deadline for a kind
    pub fn deadline_for(&self, kind: ResourceKind) -> Duration {
        self.kinds
            .get(&kind)
            .and_then(|k| k.deadline_secs)
            .map(Duration::from_secs)
            .unwrap_or_else(|| kind.default_deadline())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.account.is_none());
        assert_eq!(config.region(), "us-east-1");
        assert_eq!(config.profile(), "default");
        assert_eq!(config.cache.capacity, cache::DEFAULT_CAPACITY);
    }

    #[test]
    fn test_require_account_missing() {
        let config = Config::default();
        assert!(config.require_account().is_err());
    }

    #[test]
    fn test_ttl_falls_back_to_kind_default() {
        let config = Config::default();
        assert_eq!(
            config.ttl_for(ResourceKind::Functions),
            ResourceKind::Functions.default_ttl()
        );
    }

    #[test]
    fn test_kind_overrides_apply() {
        let mut config = Config::default();
        config.kinds.insert(
            ResourceKind::Buckets,
            KindSettings {
                ttl_secs: Some(5),
                deadline_secs: Some(7),
            },
        );

        assert_eq!(config.ttl_for(ResourceKind::Buckets), Duration::from_secs(5));
        assert_eq!(
            config.deadline_for(ResourceKind::Buckets),
            Duration::from_secs(7)
        );
        // Other kinds untouched
        assert_eq!(
            config.deadline_for(ResourceKind::Functions),
            ResourceKind::Functions.default_deadline()
        );
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");

        let mut config = Config::default();
        config.account = Some("123456789012".to_string());
        config.region = Some("eu-west-1".to_string());
        config.save_to(path.clone()).unwrap();

        let loaded = Config::load_from(path).unwrap();
        assert_eq!(loaded.account.as_deref(), Some("123456789012"));
        assert_eq!(loaded.region(), "eu-west-1");
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = Config::load_from(dir.path().join("nope.yaml"));
        assert!(result.is_err());
    }
}
