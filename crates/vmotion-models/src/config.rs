//! Generation request configuration.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{AspectRatio, Resolution};

/// Media type attached to every reference image sent for generation.
pub const REFERENCE_IMAGE_MIME_TYPE: &str = "image/png";

/// Errors raised while checking a generation request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Prompt must not be empty")]
    EmptyPrompt,

    #[error("Reference image has no payload")]
    EmptyReferenceImage,

    #[error("Reference image is not valid base64: {0}")]
    InvalidReferenceImage(String),
}

/// Encoded reference image, as produced by a browser `readAsDataURL`.
///
/// Usually a data URI (`data:image/png;base64,<payload>`), but a bare
/// base64 payload is accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct ReferenceImage(String);

impl ReferenceImage {
    /// Wrap an already encoded image string.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encode raw image bytes as a data URI.
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Self {
        Self(format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes)))
    }

    /// The encoded string as given.
    pub fn as_encoded(&self) -> &str {
        &self.0
    }

    /// Base64 payload: everything after the first comma, or the whole
    /// string when there is no data URI prefix.
    pub fn payload(&self) -> &str {
        match self.0.split_once(',') {
            Some((_, payload)) => payload,
            None => &self.0,
        }
    }

    /// Media type sent alongside the payload. Always PNG, regardless of the
    /// prefix, matching what the generation service is given.
    pub fn media_type(&self) -> &'static str {
        REFERENCE_IMAGE_MIME_TYPE
    }

    /// Decode the payload to raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, ConfigError> {
        STANDARD
            .decode(self.payload().trim())
            .map_err(|e| ConfigError::InvalidReferenceImage(e.to_string()))
    }
}

/// Everything needed to request one generated video.
///
/// Immutable once handed to the generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Text prompt describing the video
    pub prompt: String,

    /// Target aspect ratio
    #[serde(default)]
    pub aspect_ratio: AspectRatio,

    /// Target resolution
    #[serde(default)]
    pub resolution: Resolution,

    /// Optional first-frame reference image
    #[serde(default, rename = "image", skip_serializing_if = "Option::is_none")]
    pub reference_image: Option<ReferenceImage>,
}

impl GenerationConfig {
    /// Create a config with default format and no reference image.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            aspect_ratio: AspectRatio::default(),
            resolution: Resolution::default(),
            reference_image: None,
        }
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn with_reference_image(mut self, image: ReferenceImage) -> Self {
        self.reference_image = Some(image);
        self
    }

    /// Validate the request before submission.
    ///
    /// This is the caller's precondition; the generator itself does not
    /// re-check it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.prompt.trim().is_empty() {
            return Err(ConfigError::EmptyPrompt);
        }

        if let Some(image) = &self.reference_image {
            if image.payload().trim().is_empty() {
                return Err(ConfigError::EmptyReferenceImage);
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_drops_data_uri_prefix() {
        let image = ReferenceImage::from_encoded("data:image/jpeg;base64,QUJD");
        assert_eq!(image.payload(), "QUJD");
        assert_eq!(image.media_type(), "image/png");
    }

    #[test]
    fn test_payload_splits_on_first_comma_only() {
        let image = ReferenceImage::from_encoded("data:x,abc,def");
        assert_eq!(image.payload(), "abc,def");
    }

    #[test]
    fn test_payload_without_prefix_is_whole_string() {
        let image = ReferenceImage::from_encoded("QUJD");
        assert_eq!(image.payload(), "QUJD");
    }

    #[test]
    fn test_from_bytes_decodes_back() {
        let image = ReferenceImage::from_bytes(b"\x89PNG", "image/png");
        assert!(image.as_encoded().starts_with("data:image/png;base64,"));
        assert_eq!(image.decode().unwrap(), b"\x89PNG");
    }

    #[test]
    fn test_validate_rejects_blank_prompt() {
        assert_eq!(
            GenerationConfig::new("   ").validate(),
            Err(ConfigError::EmptyPrompt)
        );
        tokio_test::assert_ok!(GenerationConfig::new("a cat surfing").validate());
    }

    #[test]
    fn test_validate_rejects_empty_image_payload() {
        let config = GenerationConfig::new("a cat")
            .with_reference_image(ReferenceImage::from_encoded("data:image/png;base64,"));
        assert_eq!(config.validate(), Err(ConfigError::EmptyReferenceImage));
    }

    #[test]
    fn test_serde_uses_form_field_names() {
        let config = GenerationConfig::new("waves")
            .with_aspect_ratio(AspectRatio::Portrait)
            .with_resolution(Resolution::FullHd);
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["aspectRatio"], "9:16");
        assert_eq!(json["resolution"], "1080p");
        assert!(json.get("image").is_none());
    }
}
