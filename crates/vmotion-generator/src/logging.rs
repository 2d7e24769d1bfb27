//! Structured generation logging.
//!
//! Every generation gets an id so its submit, poll and download lines can be
//! correlated across the log.

use std::time::Duration;

use tracing::{error, info, warn, Span};
use uuid::Uuid;

use vmotion_models::GenerationConfig;

use crate::error::GenerationError;
use crate::materializer::VideoResource;

/// Logger for one generation run.
#[derive(Debug, Clone)]
pub struct GenerationLogger {
    generation_id: String,
    model: String,
}

impl GenerationLogger {
    /// Create a logger with a fresh generation id.
    pub fn new(model: &str) -> Self {
        Self {
            generation_id: Uuid::new_v4().to_string(),
            model: model.to_string(),
        }
    }

    pub fn log_start(&self, config: &GenerationConfig) {
        info!(
            generation_id = %self.generation_id,
            model = %self.model,
            aspect_ratio = %config.aspect_ratio,
            resolution = %config.resolution,
            with_image = config.reference_image.is_some(),
            prompt_chars = config.prompt.chars().count(),
            "Generation started"
        );
    }

    /// Log one progress emission; tick 0 is the post-submission message.
    pub fn log_progress(&self, tick: usize, message: &str) {
        info!(
            generation_id = %self.generation_id,
            tick,
            "Generation progress: {}", message
        );
    }

    pub fn log_completion(&self, resource: &VideoResource, elapsed: Duration) {
        info!(
            generation_id = %self.generation_id,
            model = %self.model,
            path = %resource.path.display(),
            size_bytes = resource.size_bytes,
            elapsed_secs = elapsed.as_secs_f64(),
            "Generation completed"
        );
    }

    /// Log a failed run. Credential changes and cancellations are expected
    /// user-side events and log as warnings.
    pub fn log_failure(&self, err: &GenerationError, elapsed: Duration) {
        match err {
            GenerationError::CredentialInvalid { .. } | GenerationError::Cancelled => warn!(
                generation_id = %self.generation_id,
                kind = err.kind(),
                elapsed_secs = elapsed.as_secs_f64(),
                "Generation stopped: {}", err
            ),
            _ => error!(
                generation_id = %self.generation_id,
                model = %self.model,
                kind = err.kind(),
                elapsed_secs = elapsed.as_secs_f64(),
                "Generation failed: {}", err
            ),
        }
    }

    /// Span carrying the generation id, for instrumenting the whole run.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "generation",
            generation_id = %self.generation_id,
            model = %self.model
        )
    }
}
