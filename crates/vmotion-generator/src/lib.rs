//! Video generation request lifecycle.
//!
//! This crate provides:
//! - Job submission against a [`vmotion_veo::VideoJobService`]
//! - Bounded polling with progress messages and credential-change detection
//! - Artifact download into a local media directory
//! - The [`VideoGenerator`] orchestrator tying the stages together

pub mod cancel;
pub mod classify;
pub mod clock;
pub mod config;
pub mod error;
pub mod logging;
pub mod materializer;
pub mod metrics;
pub mod orchestrator;
pub mod poll;
pub mod progress;
pub mod submission;

pub use cancel::CancelSignal;
pub use classify::{classify_poll_error, PollErrorKind, ENTITY_NOT_FOUND_MARKER};
pub use clock::{Sleeper, TokioSleeper};
pub use config::GeneratorConfig;
pub use error::{GenerationError, GenerationResult, TerminalOutcome};
pub use logging::GenerationLogger;
pub use materializer::{MediaStore, VideoResource};
pub use orchestrator::VideoGenerator;
pub use poll::{CompletionWatcher, PollConfig, PollOutcome, MAX_ATTEMPTS, POLL_INTERVAL};
pub use progress::{ProgressNotifier, PROGRESS_MESSAGES};
pub use submission::{build_request, submit_job, VIDEOS_PER_REQUEST};
