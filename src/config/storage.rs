//! Conversation state storage configuration

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where conversation snapshots are kept
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Directory for the file backend
    #[serde(default = "default_path")]
    pub path: String,

    /// Connection URL for the redis backend
    pub redis_url: Option<String>,

    /// Key prefix for the redis backend
    pub redis_prefix: Option<String>,

    /// Expire idle conversations after this many seconds (redis only)
    pub ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    File,
    Redis,
}

impl StorageConfig {
    pub fn path(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }

    /// Validate storage configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.backend {
            StorageBackend::Memory => Ok(()),
            StorageBackend::File => {
                if self.path.trim().is_empty() {
                    return Err(ValidationError::MissingRequired("STORAGE__PATH"));
                }
                Ok(())
            }
            StorageBackend::Redis => {
                let url = self
                    .redis_url
                    .as_deref()
                    .filter(|url| !url.is_empty())
                    .ok_or(ValidationError::MissingRequired("STORAGE__REDIS_URL"))?;
                if !url.starts_with("redis://") && !url.starts_with("rediss://") {
                    return Err(ValidationError::InvalidRedisUrl);
                }
                Ok(())
            }
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: default_path(),
            redis_url: None,
            redis_prefix: None,
            ttl_secs: None,
        }
    }
}

fn default_path() -> String {
    "./data/conversations".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_defaults_to_memory() {
        let config = StorageConfig::default();
        assert_eq!(config.backend, StorageBackend::Memory);
        assert_eq!(config.path(), PathBuf::from("./data/conversations"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_redis_backend_requires_url() {
        let config = StorageConfig {
            backend: StorageBackend::Redis,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MissingRequired("STORAGE__REDIS_URL"))
        );
    }

    #[test]
    fn test_redis_url_scheme() {
        let mut config = StorageConfig {
            backend: StorageBackend::Redis,
            redis_url: Some("http://localhost:6379".to_string()),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidRedisUrl));

        config.redis_url = Some("rediss://cache.internal:6380".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_backend_requires_path() {
        let config = StorageConfig {
            backend: StorageBackend::File,
            path: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
