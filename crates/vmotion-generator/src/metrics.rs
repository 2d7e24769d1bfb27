//! Generation metrics.

use metrics::{counter, histogram};

pub mod names {
    /// Submit calls by result.
    pub const SUBMISSIONS_TOTAL: &str = "vmotion_submissions_total";

    /// Status queries issued per generation.
    pub const POLL_ATTEMPTS: &str = "vmotion_poll_attempts";

    /// Finished generations by terminal outcome.
    pub const GENERATIONS_TOTAL: &str = "vmotion_generations_total";

    /// End-to-end generation time in seconds.
    pub const GENERATION_SECONDS: &str = "vmotion_generation_seconds";
}

pub fn record_submission(accepted: bool) {
    counter!(
        names::SUBMISSIONS_TOTAL,
        "result" => if accepted { "accepted" } else { "rejected" }
    )
    .increment(1);
}

pub fn record_poll_attempts(attempts: u32) {
    histogram!(names::POLL_ATTEMPTS).record(attempts as f64);
}

pub fn record_generation(outcome: &'static str, elapsed_secs: f64) {
    counter!(names::GENERATIONS_TOTAL, "outcome" => outcome).increment(1);
    histogram!(names::GENERATION_SECONDS, "outcome" => outcome).record(elapsed_secs);
}
