//! Generator configuration.

use std::path::PathBuf;
use std::time::Duration;

use vmotion_veo::DEFAULT_MODEL;

use crate::poll::{PollConfig, MAX_ATTEMPTS, POLL_INTERVAL};

/// Generator configuration.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Generation model
    pub model: String,
    /// Poll loop bounds
    pub poll: PollConfig,
    /// Directory receiving downloaded videos
    pub media_dir: PathBuf,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            poll: PollConfig::default(),
            media_dir: PathBuf::from(".vividmotion/videos"),
        }
    }
}

impl GeneratorConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            model: std::env::var("VEO_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            poll: PollConfig {
                interval: Duration::from_secs(
                    std::env::var("VMOTION_POLL_INTERVAL_SECS")
                        .ok()
                        .and_then(|s| s.parse().ok())
                        .unwrap_or(POLL_INTERVAL.as_secs()),
                ),
                max_attempts: std::env::var("VMOTION_MAX_POLL_ATTEMPTS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(MAX_ATTEMPTS),
            },
            media_dir: std::env::var("VMOTION_MEDIA_DIR")
                .map(PathBuf::from)
                .or_else(|_| {
                    std::env::var("VMOTION_DATA_DIR").map(|dir| PathBuf::from(dir).join("videos"))
                })
                .unwrap_or_else(|_| PathBuf::from(".vividmotion/videos")),
        }
    }

    pub fn with_media_dir(mut self, media_dir: impl Into<PathBuf>) -> Self {
        self.media_dir = media_dir.into();
        self
    }

    pub fn with_poll(mut self, poll: PollConfig) -> Self {
        self.poll = poll;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = GeneratorConfig::default();
        assert_eq!(config.model, "veo-3.1-fast-generate-preview");
        assert_eq!(config.poll.max_attempts, 60);
        assert_eq!(config.poll.interval, Duration::from_secs(10));
    }
}
