//! Output format definitions (aspect ratio and resolution).

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Aspect ratio of the generated video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum AspectRatio {
    /// Widescreen landscape (16:9)
    #[default]
    #[serde(rename = "16:9")]
    Landscape,
    /// Vertical portrait (9:16) for Shorts/Reels
    #[serde(rename = "9:16")]
    Portrait,
}

impl AspectRatio {
    pub const ALL: &'static [AspectRatio] = &[AspectRatio::Landscape, AspectRatio::Portrait];

    /// Wire representation used by the generation service.
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Landscape => "16:9",
            AspectRatio::Portrait => "9:16",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectRatio {
    type Err = FormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "16:9" => Ok(AspectRatio::Landscape),
            "9:16" => Ok(AspectRatio::Portrait),
            other => Err(FormatParseError::AspectRatio(other.to_string())),
        }
    }
}

/// Output resolution of the generated video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
pub enum Resolution {
    #[default]
    #[serde(rename = "720p")]
    Hd,
    #[serde(rename = "1080p")]
    FullHd,
}

impl Resolution {
    pub const ALL: &'static [Resolution] = &[Resolution::Hd, Resolution::FullHd];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::Hd => "720p",
            Resolution::FullHd => "1080p",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = FormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "720p" => Ok(Resolution::Hd),
            "1080p" => Ok(Resolution::FullHd),
            _ => Err(FormatParseError::Resolution(s.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatParseError {
    #[error("Unsupported aspect ratio: {0}, expected '16:9' or '9:16'")]
    AspectRatio(String),

    #[error("Unsupported resolution: {0}, expected '720p' or '1080p'")]
    Resolution(String),
}
