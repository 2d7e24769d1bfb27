//! Human-readable progress messages.

/// Status lines shown while a video is being generated, in display order.
pub const PROGRESS_MESSAGES: [&str; 8] = [
    "Initializing neural engines...",
    "Analyzing visual descriptors...",
    "Synthesizing motion dynamics...",
    "Refining spatial consistency...",
    "Rendering cinematic textures...",
    "Color grading the sequences...",
    "Polishing final frames...",
    "Wrapping up high-fidelity pixels...",
];

/// Cycles through [`PROGRESS_MESSAGES`], one message per call.
///
/// Never exhausts and never resets during a generation.
#[derive(Debug, Default)]
pub struct ProgressNotifier {
    cursor: usize,
}

impl ProgressNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit the next message to `on_progress` and advance.
    pub fn advance<F>(&mut self, on_progress: &mut F)
    where
        F: FnMut(&str) + ?Sized,
    {
        let message = PROGRESS_MESSAGES[self.cursor % PROGRESS_MESSAGES.len()];
        self.cursor += 1;
        on_progress(message);
    }

    /// Number of messages emitted so far.
    pub fn emitted(&self) -> usize {
        self.cursor
    }
}
