//! Generated video history records.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::{AspectRatio, GenerationConfig, Resolution};

/// Unique identifier for a generated video.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct VideoId(pub String);

impl VideoId {
    /// Generate a new random video ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for VideoId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for VideoId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One entry of the personal history of generated videos.
///
/// Created once a generation succeeds and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedVideoRecord {
    pub id: VideoId,
    /// Locally addressable video resource
    pub url: String,
    pub prompt: String,
    /// Creation time in milliseconds since the Unix epoch
    pub timestamp: i64,
    pub aspect_ratio: AspectRatio,
    pub resolution: Resolution,
}

impl GeneratedVideoRecord {
    /// Build the record for a successful generation.
    pub fn from_generation(config: &GenerationConfig, url: impl Into<String>) -> Self {
        Self {
            id: VideoId::new(),
            url: url.into(),
            prompt: config.prompt.clone(),
            timestamp: Utc::now().timestamp_millis(),
            aspect_ratio: config.aspect_ratio,
            resolution: config.resolution,
        }
    }

    /// Creation time as a UTC datetime.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }
}
