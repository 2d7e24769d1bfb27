//! Classification of status query failures.
//!
//! The only signal the service gives for an invalidated credential is the
//! wording of its not-found error, so the matching rule lives here alone.

use vmotion_veo::VeoError;

/// Substring of the service error raised when a job reference no longer
/// resolves under the current credential.
pub const ENTITY_NOT_FOUND_MARKER: &str = "Requested entity was not found";

/// How a failed status query should end the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollErrorKind {
    /// The job reference is unresolvable: the credential changed mid-flight.
    CredentialInvalid,
    /// Any other failure, reported as-is.
    Transport,
}

/// Classify a status query failure.
pub fn classify_poll_error(error: &VeoError) -> PollErrorKind {
    if is_entity_not_found(&error.to_string()) {
        PollErrorKind::CredentialInvalid
    } else {
        PollErrorKind::Transport
    }
}

fn is_entity_not_found(message: &str) -> bool {
    message.contains(ENTITY_NOT_FOUND_MARKER)
}
