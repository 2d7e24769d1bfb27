//! Completion watcher: the poll loop over a submitted job.
//!
//! ```text
//! Submitted -> Polling -> Completed | TimedOut | CredentialInvalid | Failed
//! ```
//!
//! Each tick waits the fixed interval, emits one progress message, then
//! issues one status query whose result replaces the held handle.

use std::time::Duration;

use tracing::{debug, warn};

use vmotion_models::{ApiKey, JobHandle};
use vmotion_veo::{VeoError, VideoJobService};

use crate::cancel::CancelSignal;
use crate::classify::{classify_poll_error, PollErrorKind};
use crate::clock::Sleeper;
use crate::error::{GenerationError, GenerationResult};
use crate::metrics::record_poll_attempts;
use crate::progress::ProgressNotifier;

/// Fixed wait between status queries.
pub const POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Status queries allowed before giving up (10 minutes at the default interval).
pub const MAX_ATTEMPTS: u32 = 60;

/// Poll loop bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: POLL_INTERVAL,
            max_attempts: MAX_ATTEMPTS,
        }
    }
}

impl PollConfig {
    /// Worst-case time spent waiting, excluding call latency.
    pub fn budget(&self) -> Duration {
        self.interval.saturating_mul(self.max_attempts)
    }
}

/// Terminal state of the poll loop.
#[derive(Debug)]
pub enum PollOutcome {
    /// The job reported `done`.
    Completed { job: JobHandle, attempts: u32 },
    /// The attempt budget ran out first.
    TimedOut { attempts: u32 },
    /// A status query showed the job reference is gone.
    CredentialInvalid { message: String },
    /// A status query failed for any other reason.
    Failed(VeoError),
    Cancelled,
}

impl PollOutcome {
    /// Collapse into the completed handle or a classified error.
    pub fn into_result(self) -> GenerationResult<JobHandle> {
        match self {
            PollOutcome::Completed { job, .. } => Ok(job),
            PollOutcome::TimedOut { attempts } => Err(GenerationError::Timeout { attempts }),
            PollOutcome::CredentialInvalid { message } => {
                Err(GenerationError::CredentialInvalid { message })
            }
            PollOutcome::Failed(e) => Err(GenerationError::PollTransport(e)),
            PollOutcome::Cancelled => Err(GenerationError::Cancelled),
        }
    }
}

/// Drives one job to a terminal state.
///
/// Owns nothing shared: the handle is moved in and rewritten each tick.
pub struct CompletionWatcher<'a, S: ?Sized, C: ?Sized> {
    service: &'a S,
    sleeper: &'a C,
    config: &'a PollConfig,
}

impl<'a, S, C> CompletionWatcher<'a, S, C>
where
    S: VideoJobService + ?Sized,
    C: Sleeper + ?Sized,
{
    pub fn new(service: &'a S, sleeper: &'a C, config: &'a PollConfig) -> Self {
        Self {
            service,
            sleeper,
            config,
        }
    }

    /// Poll `job` until it is done, the budget runs out, or a query fails.
    pub async fn watch<F>(
        &self,
        credential: &ApiKey,
        mut job: JobHandle,
        notifier: &mut ProgressNotifier,
        on_progress: &mut F,
        cancel: &mut CancelSignal,
    ) -> PollOutcome
    where
        F: FnMut(&str) + Send + ?Sized,
    {
        let mut attempts = 0u32;

        while !job.done && attempts < self.config.max_attempts {
            if cancel.guard(self.sleeper.sleep(self.config.interval)).await.is_err() {
                return PollOutcome::Cancelled;
            }

            attempts += 1;
            notifier.advance(on_progress);

            let polled = match cancel.guard(self.service.poll(credential, &job)).await {
                Ok(polled) => polled,
                Err(_) => return PollOutcome::Cancelled,
            };

            match polled {
                Ok(next) => {
                    debug!(job = %next.name, attempt = attempts, done = next.done, "Polled job");
                    job = next;
                }
                Err(e) => {
                    record_poll_attempts(attempts);
                    return match classify_poll_error(&e) {
                        PollErrorKind::CredentialInvalid => {
                            warn!(job = %job.name, attempt = attempts, "Job reference no longer resolvable: {}", e);
                            PollOutcome::CredentialInvalid {
                                message: e.to_string(),
                            }
                        }
                        PollErrorKind::Transport => {
                            warn!(job = %job.name, attempt = attempts, "Status query failed: {}", e);
                            PollOutcome::Failed(e)
                        }
                    };
                }
            }
        }

        record_poll_attempts(attempts);

        if job.done {
            PollOutcome::Completed { job, attempts }
        } else {
            warn!(
                job = %job.name,
                attempts,
                budget_secs = self.config.budget().as_secs(),
                "Job did not finish within the poll budget"
            );
            PollOutcome::TimedOut { attempts }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_budget_is_ten_minutes() {
        let config = PollConfig::default();
        assert_eq!(config.max_attempts, 60);
        assert_eq!(config.interval, Duration::from_secs(10));
        assert_eq!(config.budget(), Duration::from_secs(600));
    }

    #[test]
    fn test_outcome_into_result() {
        let ok = PollOutcome::Completed {
            job: JobHandle::completed("op", "https://x/v"),
            attempts: 2,
        }
        .into_result()
        .unwrap();
        assert!(ok.done);

        assert!(matches!(
            PollOutcome::TimedOut { attempts: 60 }.into_result(),
            Err(GenerationError::Timeout { attempts: 60 })
        ));
        assert!(PollOutcome::CredentialInvalid {
            message: "x".to_string()
        }
        .into_result()
        .unwrap_err()
        .is_credential_invalid());
    }
}
