//! Job submission.

use tracing::{debug, info};

use vmotion_models::{ApiKey, GenerationConfig, JobHandle};
use vmotion_veo::{ImageInput, VideoJobService, VideoRequest};

use crate::error::{GenerationError, GenerationResult};
use crate::metrics::record_submission;

/// Videos requested per generation.
pub const VIDEOS_PER_REQUEST: u32 = 1;

/// Build the request payload for a config.
///
/// Resolution and aspect ratio are carried verbatim. A reference image is
/// reduced to its base64 payload and sent as the first frame.
pub fn build_request(model: &str, config: &GenerationConfig) -> VideoRequest {
    VideoRequest {
        model: model.to_string(),
        prompt: config.prompt.clone(),
        resolution: config.resolution,
        aspect_ratio: config.aspect_ratio,
        number_of_videos: VIDEOS_PER_REQUEST,
        image: config.reference_image.as_ref().map(|image| ImageInput {
            image_bytes: image.payload().to_string(),
            mime_type: image.media_type().to_string(),
        }),
    }
}

/// Issue the submit call. Failures are returned unchanged as
/// [`GenerationError::Submission`].
pub async fn submit_job<S>(
    service: &S,
    credential: &ApiKey,
    request: &VideoRequest,
) -> GenerationResult<JobHandle>
where
    S: VideoJobService + ?Sized,
{
    debug!(model = %request.model, "Submitting generation job");

    match service.submit(credential, request).await {
        Ok(job) => {
            record_submission(true);
            info!(job = %job.name, done = job.done, "Generation job accepted");
            Ok(job)
        }
        Err(e) => {
            record_submission(false);
            Err(GenerationError::Submission(e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vmotion_models::{AspectRatio, ReferenceImage, Resolution};

    #[test]
    fn test_build_request_without_image() {
        let config = GenerationConfig::new("a fox in snow")
            .with_aspect_ratio(AspectRatio::Portrait)
            .with_resolution(Resolution::FullHd);
        let request = build_request("veo-x", &config);

        assert_eq!(request.model, "veo-x");
        assert_eq!(request.prompt, "a fox in snow");
        assert_eq!(request.aspect_ratio, AspectRatio::Portrait);
        assert_eq!(request.resolution, Resolution::FullHd);
        assert_eq!(request.number_of_videos, 1);
        assert!(request.image.is_none());
    }

    #[test]
    fn test_build_request_strips_data_uri_prefix() {
        let config = GenerationConfig::new("p").with_reference_image(ReferenceImage::from_encoded(
            "data:image/jpeg;base64,/9j/4AAQ",
        ));
        let image = build_request("m", &config).image.unwrap();

        assert_eq!(image.image_bytes, "/9j/4AAQ");
        assert_eq!(image.mime_type, "image/png");
    }
}
