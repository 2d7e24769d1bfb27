//! Remote job service contract.

use async_trait::async_trait;

use vmotion_models::{ApiKey, JobHandle};

use crate::error::VeoResult;
use crate::request::VideoRequest;

/// Operations the generator relies on.
///
/// The credential is passed into every call rather than captured at
/// construction, so a key swapped between calls takes effect immediately.
#[async_trait]
pub trait VideoJobService: Send + Sync {
    /// Start a generation job.
    async fn submit(&self, credential: &ApiKey, request: &VideoRequest) -> VeoResult<JobHandle>;

    /// Query the current state of a job.
    async fn poll(&self, credential: &ApiKey, job: &JobHandle) -> VeoResult<JobHandle>;

    /// Download the bytes behind an artifact locator.
    async fn fetch_artifact(&self, credential: &ApiKey, locator: &str) -> VeoResult<Vec<u8>>;
}
