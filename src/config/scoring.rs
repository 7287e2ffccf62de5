//! Treatment scoring service configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Scoring service configuration
///
/// Without an endpoint the mock scorer is used, which is only allowed
/// outside production.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoringConfig {
    /// Scoring web service URL
    pub endpoint: Option<String>,

    /// Bearer key for the scoring service
    pub api_key: Option<Secret<String>>,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl ScoringConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if a real scoring service is configured
    pub fn has_endpoint(&self) -> bool {
        self.endpoint.as_ref().is_some_and(|e| !e.is_empty())
    }

    /// Validate scoring configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 120 {
            return Err(ValidationError::InvalidScoringTimeout);
        }

        let Some(endpoint) = self.endpoint.as_deref().filter(|e| !e.is_empty()) else {
            if *environment == Environment::Production {
                return Err(ValidationError::MissingRequired("SCORING__ENDPOINT"));
            }
            return Ok(());
        };

        if !endpoint.starts_with("https://") && !endpoint.starts_with("http://") {
            return Err(ValidationError::InvalidScoringEndpoint);
        }
        if *environment == Environment::Production && !endpoint.starts_with("https://") {
            return Err(ValidationError::ScoringEndpointMustBeHttps);
        }
        if !self
            .api_key
            .as_ref()
            .is_some_and(|key| !key.expose_secret().is_empty())
        {
            return Err(ValidationError::MissingRequired("SCORING__API_KEY"));
        }
        Ok(())
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    10
}

#[cfg(test)]
mod tests {
    use super::*;

    fn configured(endpoint: &str) -> ScoringConfig {
        ScoringConfig {
            endpoint: Some(endpoint.to_string()),
            api_key: Some(Secret::new("key".to_string())),
            ..Default::default()
        }
    }

    #[test]
    fn test_scoring_defaults() {
        let config = ScoringConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(!config.has_endpoint());
    }

    #[test]
    fn test_mock_scorer_allowed_in_development() {
        assert!(ScoringConfig::default()
            .validate(&Environment::Development)
            .is_ok());
    }

    #[test]
    fn test_production_requires_endpoint() {
        assert_eq!(
            ScoringConfig::default().validate(&Environment::Production),
            Err(ValidationError::MissingRequired("SCORING__ENDPOINT"))
        );
    }

    #[test]
    fn test_production_requires_https() {
        let config = configured("http://ml.example.com/score");
        assert!(config.validate(&Environment::Development).is_ok());
        assert_eq!(
            config.validate(&Environment::Production),
            Err(ValidationError::ScoringEndpointMustBeHttps)
        );
    }

    #[test]
    fn test_endpoint_requires_api_key() {
        let config = ScoringConfig {
            endpoint: Some("https://ml.example.com/score".to_string()),
            ..Default::default()
        };
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::MissingRequired("SCORING__API_KEY"))
        );
    }

    #[test]
    fn test_timeout_bounds() {
        let mut config = configured("https://ml.example.com/score");
        config.timeout_secs = 0;
        assert_eq!(
            config.validate(&Environment::Development),
            Err(ValidationError::InvalidScoringTimeout)
        );
    }
}
