//! Wire types for the long-running video generation REST API.

use serde::{Deserialize, Serialize};

use vmotion_models::{JobError, JobHandle};

use crate::request::VideoRequest;

// =============================================================================
// Requests
// =============================================================================

/// `models/{model}:predictLongRunning` request body.
#[derive(Debug, Serialize)]
pub struct PredictLongRunningRequest {
    pub instances: Vec<Instance>,
    pub parameters: Parameters,
}

#[derive(Debug, Serialize)]
pub struct Instance {
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<InlineImage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineImage {
    pub bytes_base64_encoded: String,
    pub mime_type: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameters {
    pub aspect_ratio: String,
    pub resolution: String,
    pub sample_count: u32,
}

impl From<&VideoRequest> for PredictLongRunningRequest {
    fn from(request: &VideoRequest) -> Self {
        Self {
            instances: vec![Instance {
                prompt: request.prompt.clone(),
                image: request.image.as_ref().map(|image| InlineImage {
                    bytes_base64_encoded: image.image_bytes.clone(),
                    mime_type: image.mime_type.clone(),
                }),
            }],
            parameters: Parameters {
                aspect_ratio: request.aspect_ratio.as_str().to_string(),
                resolution: request.resolution.as_str().to_string(),
                sample_count: request.number_of_videos,
            },
        }
    }
}

// =============================================================================
// Responses
// =============================================================================

/// A long-running operation as returned by submit and poll.
#[derive(Debug, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    pub response: Option<OperationResponse>,
    pub error: Option<Status>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationResponse {
    pub generate_video_response: Option<GenerateVideoResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateVideoResponse {
    #[serde(default)]
    pub generated_samples: Vec<GeneratedSample>,
}

#[derive(Debug, Deserialize)]
pub struct GeneratedSample {
    pub video: Option<VideoRef>,
}

#[derive(Debug, Deserialize)]
pub struct VideoRef {
    pub uri: Option<String>,
}

/// `google.rpc.Status`, used both inside operations and in error bodies.
#[derive(Debug, Deserialize)]
pub struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

/// Standard error body: `{"error": {...}}`.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: Status,
}

impl Operation {
    /// Locator of the first generated video, if any.
    pub fn first_video_uri(&self) -> Option<&str> {
        self.response
            .as_ref()?
            .generate_video_response
            .as_ref()?
            .generated_samples
            .first()?
            .video
            .as_ref()?
            .uri
            .as_deref()
            .filter(|uri| !uri.is_empty())
    }
}

impl From<Operation> for JobHandle {
    fn from(op: Operation) -> Self {
        let result_uri = op.first_video_uri().map(str::to_string);
        JobHandle {
            name: op.name,
            done: op.done,
            result_uri,
            error: op.error.map(|status| JobError {
                code: status.code,
                message: status.message,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_operation_maps_to_handle() {
        let body = r#"{
            "name": "models/veo/operations/op1",
            "done": true,
            "response": {
                "@type": "type.googleapis.com/google.ai.generativelanguage.v1beta.PredictLongRunningResponse",
                "generateVideoResponse": {
                    "generatedSamples": [
                        {"video": {"uri": "https://example.com/files/v1:download?alt=media"}}
                    ]
                }
            }
        }"#;
        let op: Operation = serde_json::from_str(body).unwrap();
        let job = JobHandle::from(op);
        assert!(job.done);
        assert_eq!(
            job.result_uri.as_deref(),
            Some("https://example.com/files/v1:download?alt=media")
        );
    }

    #[test]
    fn test_pending_operation_defaults_done_false() {
        let op: Operation = serde_json::from_str(r#"{"name": "op2"}"#).unwrap();
        let job = JobHandle::from(op);
        assert!(!job.done);
        assert!(job.result_uri.is_none());
        assert!(job.error.is_none());
    }

    #[test]
    fn test_done_without_samples_has_no_uri() {
        let body = r#"{"name":"op3","done":true,"response":{"generateVideoResponse":{}}}"#;
        let op: Operation = serde_json::from_str(body).unwrap();
        assert!(op.first_video_uri().is_none());
    }

    #[test]
    fn test_operation_error_is_carried() {
        let body = r#"{"name":"op4","done":true,"error":{"code":3,"message":"unsafe prompt"}}"#;
        let job = JobHandle::from(serde_json::from_str::<Operation>(body).unwrap());
        assert_eq!(job.error.unwrap().message, "unsafe prompt");
    }
}
