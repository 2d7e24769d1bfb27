//! Remote generation job handle.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Error payload reported by the service for a finished job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct JobError {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.code != 0 {
            write!(f, "{} (code {})", self.message, self.code)
        } else {
            f.write_str(&self.message)
        }
    }
}

/// Snapshot of a long-running generation job.
///
/// Every status query returns a fresh handle that replaces the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct JobHandle {
    /// Opaque job reference issued by the service
    pub name: String,

    /// Whether the job has reached a terminal state
    #[serde(default)]
    pub done: bool,

    /// Locator of the generated artifact, once done
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_uri: Option<String>,

    /// Error payload, once done and failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JobError>,
}

impl JobHandle {
    /// Handle for a freshly submitted, still running job.
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: false,
            result_uri: None,
            error: None,
        }
    }

    /// Handle for a finished job with an artifact locator.
    pub fn completed(name: impl Into<String>, result_uri: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: true,
            result_uri: Some(result_uri.into()),
            error: None,
        }
    }

    /// Handle for a finished job that produced no artifact.
    pub fn failed(name: impl Into<String>, error: JobError) -> Self {
        Self {
            name: name.into(),
            done: true,
            result_uri: None,
            error: Some(error),
        }
    }

    pub fn is_done(&self) -> bool {
        self.done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_handle() {
        let job = JobHandle::pending("models/veo/operations/abc");
        assert!(!job.is_done());
        assert!(job.result_uri.is_none());
    }

    #[test]
    fn test_job_error_display() {
        let err = JobError {
            code: 3,
            message: "prompt rejected".to_string(),
        };
        assert_eq!(err.to_string(), "prompt rejected (code 3)");
    }
}
