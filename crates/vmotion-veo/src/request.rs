//! Generation request payload.

use serde::{Deserialize, Serialize};

use vmotion_models::{AspectRatio, Resolution};

/// First-frame reference image, already split from any data URI prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageInput {
    /// Base64 payload
    pub image_bytes: String,
    pub mime_type: String,
}

/// A single video generation request.
///
/// Fixed shape: the optional image is the only conditional part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRequest {
    pub model: String,
    pub prompt: String,
    pub resolution: Resolution,
    pub aspect_ratio: AspectRatio,
    pub number_of_videos: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<ImageInput>,
}
