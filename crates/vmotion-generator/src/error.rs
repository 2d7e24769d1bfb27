//! Generation error taxonomy.

use thiserror::Error;

use vmotion_veo::VeoError;

use crate::materializer::VideoResource;

pub type GenerationResult<T> = Result<T, GenerationError>;

#[derive(Debug, Error)]
pub enum GenerationError {
    /// The submit call failed.
    #[error("{0}")]
    Submission(VeoError),

    /// A status query failed for a reason other than credential invalidation.
    #[error("{0}")]
    PollTransport(VeoError),

    /// The job reference can no longer be resolved, which means the access
    /// credential changed. The caller should ask for a new key.
    #[error("API key is no longer valid: {message}")]
    CredentialInvalid { message: String },

    #[error("Generation timed out. Please try again.")]
    Timeout { attempts: u32 },

    /// The job finished without an artifact locator. `provider_error` holds
    /// the error payload the service attached, if any.
    #[error("Could not retrieve video link.")]
    MissingResult { provider_error: Option<String> },

    #[error("Failed to download video: {0}")]
    Fetch(VeoError),

    #[error("Failed to store video: {0}")]
    Storage(#[from] std::io::Error),

    #[error("Generation cancelled")]
    Cancelled,
}

impl GenerationError {
    /// True when the caller must prompt for a new credential instead of
    /// showing the message.
    pub fn is_credential_invalid(&self) -> bool {
        matches!(self, GenerationError::CredentialInvalid { .. })
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, GenerationError::Timeout { .. })
    }

    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationError::Submission(_) => "submission",
            GenerationError::PollTransport(_) => "poll_transport",
            GenerationError::CredentialInvalid { .. } => "credential_invalid",
            GenerationError::Timeout { .. } => "timeout",
            GenerationError::MissingResult { .. } => "missing_result",
            GenerationError::Fetch(_) => "fetch",
            GenerationError::Storage(_) => "storage",
            GenerationError::Cancelled => "cancelled",
        }
    }
}

/// Mutually exclusive end states of one generation.
#[derive(Debug)]
pub enum TerminalOutcome {
    Success(VideoResource),
    Timeout,
    CredentialInvalid,
    Failure(String),
}

impl TerminalOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            TerminalOutcome::Success(_) => "success",
            TerminalOutcome::Timeout => "timeout",
            TerminalOutcome::CredentialInvalid => "credential_invalid",
            TerminalOutcome::Failure(_) => "failure",
        }
    }
}

impl From<GenerationResult<VideoResource>> for TerminalOutcome {
    fn from(result: GenerationResult<VideoResource>) -> Self {
        match result {
            Ok(resource) => TerminalOutcome::Success(resource),
            Err(GenerationError::Timeout { .. }) => TerminalOutcome::Timeout,
            Err(GenerationError::CredentialInvalid { .. }) => TerminalOutcome::CredentialInvalid,
            Err(e) => TerminalOutcome::Failure(e.to_string()),
        }
    }
}
