//! HTTP-level tests for the Veo client.

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vmotion_models::{ApiKey, AspectRatio, JobHandle, Resolution};

use crate::client::{VeoClient, VeoConfig};
use crate::error::VeoError;
use crate::request::{ImageInput, VideoRequest};
use crate::service::VideoJobService;

// =============================================================================
// Test Helpers
// =============================================================================

fn test_client(server: &MockServer) -> VeoClient {
    VeoClient::new(VeoConfig::default().with_base_url(server.uri())).unwrap()
}

fn test_request(image: Option<ImageInput>) -> VideoRequest {
    VideoRequest {
        model: "veo-test".to_string(),
        prompt: "a paper boat in the rain".to_string(),
        resolution: Resolution::FullHd,
        aspect_ratio: AspectRatio::Portrait,
        number_of_videos: 1,
        image,
    }
}

fn key() -> ApiKey {
    ApiKey::new("test-key")
}

// =============================================================================
// Submit
// =============================================================================

#[tokio::test]
async fn test_submit_sends_fixed_request_shape() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/veo-test:predictLongRunning"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"name": "models/veo-test/operations/op1"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let image = ImageInput {
        image_bytes: "QUJD".to_string(),
        mime_type: "image/png".to_string(),
    };
    let job = test_client(&server)
        .submit(&key(), &test_request(Some(image)))
        .await
        .unwrap();

    assert_eq!(job, JobHandle::pending("models/veo-test/operations/op1"));

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert_eq!(body["instances"][0]["prompt"], "a paper boat in the rain");
    assert_eq!(body["instances"][0]["image"]["bytesBase64Encoded"], "QUJD");
    assert_eq!(body["instances"][0]["image"]["mimeType"], "image/png");
    assert_eq!(body["parameters"]["aspectRatio"], "9:16");
    assert_eq!(body["parameters"]["resolution"], "1080p");
    assert_eq!(body["parameters"]["sampleCount"], 1);
}

#[tokio::test]
async fn test_submit_without_image_omits_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "op"})))
        .mount(&server)
        .await;

    test_client(&server)
        .submit(&key(), &test_request(None))
        .await
        .unwrap();

    let received = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&received[0].body).unwrap();
    assert!(body["instances"][0].get("image").is_none());
}

#[tokio::test]
async fn test_submit_error_carries_service_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {"code": 400, "message": "API key not valid.", "status": "INVALID_ARGUMENT"}
        })))
        .mount(&server)
        .await;

    let err = tokio_test::assert_err!(test_client(&server).submit(&key(), &test_request(None)).await);

    assert_eq!(err.http_status(), Some(400));
    assert_eq!(err.to_string(), "API key not valid. (HTTP 400)");
}

// =============================================================================
// Poll
// =============================================================================

#[tokio::test]
async fn test_poll_reads_completed_operation() {
    let server = MockServer::start().await;
    let video_uri = format!("{}/files/vid1:download?alt=media", server.uri());
    Mock::given(method("GET"))
        .and(path("/models/veo-test/operations/op1"))
        .and(header("x-goog-api-key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "name": "models/veo-test/operations/op1",
            "done": true,
            "response": {
                "generateVideoResponse": {
                    "generatedSamples": [{"video": {"uri": video_uri}}]
                }
            }
        })))
        .mount(&server)
        .await;

    let job = test_client(&server)
        .poll(&key(), &JobHandle::pending("models/veo-test/operations/op1"))
        .await
        .unwrap();

    assert!(job.done);
    assert_eq!(job.result_uri.as_deref(), Some(video_uri.as_str()));
}

#[tokio::test]
async fn test_poll_not_found_keeps_entity_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {"code": 404, "message": "Requested entity was not found.", "status": "NOT_FOUND"}
        })))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .poll(&key(), &JobHandle::pending("models/veo-test/operations/gone"))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("Requested entity was not found"));
}

#[tokio::test]
async fn test_poll_rejects_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = test_client(&server)
        .poll(&key(), &JobHandle::pending("op"))
        .await
        .unwrap_err();

    assert!(matches!(err, VeoError::InvalidResponse(_)));
}

// =============================================================================
// Artifact download
// =============================================================================

#[tokio::test]
async fn test_fetch_artifact_appends_key() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/files/vid1:download"))
        .and(query_param("alt", "media"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"MP4DATA".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let locator = format!("{}/files/vid1:download?alt=media", server.uri());
    let bytes = test_client(&server)
        .fetch_artifact(&key(), &locator)
        .await
        .unwrap();

    assert_eq!(bytes, b"MP4DATA");
}

#[tokio::test]
async fn test_fetch_artifact_http_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
        .mount(&server)
        .await;

    let locator = format!("{}/files/vid1:download?alt=media", server.uri());
    let err = test_client(&server)
        .fetch_artifact(&key(), &locator)
        .await
        .unwrap_err();

    assert_eq!(err.http_status(), Some(403));
}
