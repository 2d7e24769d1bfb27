//! Generation service request metrics.

use metrics::{counter, histogram};

/// Metric name constants for consistency.
pub mod names {
    /// Total requests to the generation service by operation and status.
    pub const REQUESTS_TOTAL: &str = "veo_requests_total";

    /// Request latency in seconds by operation.
    pub const LATENCY_SECONDS: &str = "veo_latency_seconds";

    /// Bytes downloaded from artifact locators.
    pub const ARTIFACT_BYTES: &str = "veo_artifact_bytes";
}

/// Record metrics for a completed request.
pub fn record_request(operation: &str, status: u16, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "operation" => operation.to_string()
    )
    .record(latency_ms / 1000.0);
}

/// Record the size of a downloaded artifact.
pub fn record_artifact_bytes(len: usize) {
    histogram!(names::ARTIFACT_BYTES).record(len as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert!(names::REQUESTS_TOTAL.starts_with("veo_"));
        assert!(names::LATENCY_SECONDS.contains("latency"));
    }
}
