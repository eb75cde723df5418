//! Workflow configuration.

use std::time::Duration;

use vidsight_gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};
use vidsight_media::THUMBNAIL_WIDTH;

/// Workflow configuration.
#[derive(Debug, Clone)]
pub struct WorkflowConfig {
    /// Credential authorizing the remote calls. An empty value surfaces as
    /// a failure at the first remote phase, not at construction.
    pub api_key: String,
    /// Generation model
    pub model: String,
    /// API base URL; overridable for tests and relays
    pub api_base: String,
    /// Optional retrieval proxy base for URL inputs
    pub proxy_base: Option<String>,
    /// Delay between readiness polls
    pub poll_interval: Duration,
    /// Optional ceiling on the total readiness wait. The observed service
    /// behavior is an unbounded wait; leave unset to match it.
    pub poll_deadline: Option<Duration>,
    /// Captured frame width in pixels
    pub thumbnail_width: u32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_BASE_URL.to_string(),
            proxy_base: None,
            poll_interval: Duration::from_secs(3),
            poll_deadline: None,
            thumbnail_width: THUMBNAIL_WIDTH,
        }
    }
}

impl WorkflowConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_key: std::env::var("GEMINI_API_KEY").unwrap_or_default(),
            model: std::env::var("VIDSIGHT_MODEL").unwrap_or(defaults.model),
            api_base: std::env::var("VIDSIGHT_API_BASE").unwrap_or(defaults.api_base),
            proxy_base: std::env::var("VIDSIGHT_PROXY_BASE")
                .ok()
                .filter(|s| !s.is_empty()),
            poll_interval: Duration::from_secs(
                std::env::var("VIDSIGHT_POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3),
            ),
            poll_deadline: std::env::var("VIDSIGHT_POLL_DEADLINE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs),
            thumbnail_width: std::env::var("VIDSIGHT_THUMBNAIL_WIDTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.thumbnail_width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_observed_behavior() {
        let config = WorkflowConfig::default();
        assert_eq!(config.poll_interval, Duration::from_secs(3));
        assert!(config.poll_deadline.is_none());
        assert!(config.proxy_base.is_none());
        assert_eq!(config.thumbnail_width, 480);
    }
}
