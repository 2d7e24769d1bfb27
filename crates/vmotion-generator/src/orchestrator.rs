//! Generation orchestrator.
//!
//! Sequences submission, the poll loop and materialization for one config,
//! feeding the progress notifier at submission time and on every poll tick.
//! The first failure short-circuits the remaining stages.

use std::time::Instant;

use tracing::Instrument;

use vmotion_models::{ApiKey, GenerationConfig};
use vmotion_veo::VideoJobService;

use crate::cancel::CancelSignal;
use crate::clock::{Sleeper, TokioSleeper};
use crate::config::GeneratorConfig;
use crate::error::GenerationResult;
use crate::logging::GenerationLogger;
use crate::materializer::{materialize, MediaStore, VideoResource};
use crate::metrics::record_generation;
use crate::poll::CompletionWatcher;
use crate::progress::ProgressNotifier;
use crate::submission::{build_request, submit_job};

/// Runs video generations against a job service.
///
/// Holds no per-generation state; each call to [`generate`](Self::generate)
/// owns its job handle and progress cursor.
pub struct VideoGenerator<S, C = TokioSleeper> {
    service: S,
    sleeper: C,
    media: MediaStore,
    config: GeneratorConfig,
}

impl<S: VideoJobService> VideoGenerator<S, TokioSleeper> {
    pub fn new(service: S, config: GeneratorConfig) -> Self {
        Self::with_sleeper(service, TokioSleeper, config)
    }
}

impl<S, C> VideoGenerator<S, C>
where
    S: VideoJobService,
    C: Sleeper,
{
    /// Create a generator with a custom sleeper.
    pub fn with_sleeper(service: S, sleeper: C, config: GeneratorConfig) -> Self {
        let media = MediaStore::new(&config.media_dir);
        Self {
            service,
            sleeper,
            media,
            config,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    /// Generate one video.
    ///
    /// `on_progress` receives plain status lines: one right after the job is
    /// accepted and one per poll tick. A credential change mid-flight is
    /// reported as [`GenerationError::CredentialInvalid`](crate::GenerationError::CredentialInvalid)
    /// so the caller can ask for a new key.
    pub async fn generate<F>(
        &self,
        credential: &ApiKey,
        config: &GenerationConfig,
        on_progress: F,
    ) -> GenerationResult<VideoResource>
    where
        F: FnMut(&str) + Send,
    {
        self.generate_with_cancel(credential, config, on_progress, CancelSignal::none())
            .await
    }

    /// Like [`generate`](Self::generate), abandoning the run when `cancel` fires.
    pub async fn generate_with_cancel<F>(
        &self,
        credential: &ApiKey,
        config: &GenerationConfig,
        mut on_progress: F,
        mut cancel: CancelSignal,
    ) -> GenerationResult<VideoResource>
    where
        F: FnMut(&str) + Send,
    {
        let logger = GenerationLogger::new(&self.config.model);
        let span = logger.create_span();
        let start = Instant::now();

        let result = self
            .run(credential, config, &mut on_progress, &mut cancel, &logger)
            .instrument(span)
            .await;

        let elapsed = start.elapsed();
        match &result {
            Ok(resource) => {
                record_generation("success", elapsed.as_secs_f64());
                logger.log_completion(resource, elapsed);
            }
            Err(e) => {
                record_generation(e.kind(), elapsed.as_secs_f64());
                logger.log_failure(e, elapsed);
            }
        }

        result
    }

    async fn run<F>(
        &self,
        credential: &ApiKey,
        config: &GenerationConfig,
        on_progress: &mut F,
        cancel: &mut CancelSignal,
        logger: &GenerationLogger,
    ) -> GenerationResult<VideoResource>
    where
        F: FnMut(&str) + Send,
    {
        let request = build_request(&self.config.model, config);
        logger.log_start(config);

        let job = cancel
            .guard(submit_job(&self.service, credential, &request))
            .await??;

        let mut tick = 0usize;
        let mut report = |message: &str| {
            logger.log_progress(tick, message);
            tick += 1;
            on_progress(message);
        };

        let mut notifier = ProgressNotifier::new();
        notifier.advance(&mut report);

        let watcher = CompletionWatcher::new(&self.service, &self.sleeper, &self.config.poll);
        let job = watcher
            .watch(credential, job, &mut notifier, &mut report, cancel)
            .await
            .into_result()?;

        materialize(&self.service, &self.media, credential, &job, cancel).await
    }
}
