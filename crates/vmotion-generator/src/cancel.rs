//! Cooperative cancellation of an in-flight generation.

use std::future::Future;

use tokio::sync::watch;

use crate::error::{GenerationError, GenerationResult};

/// Optional cancellation signal threaded through a generation.
///
/// Flipping the paired `watch::Sender<bool>` to `true` abandons whatever
/// wait or remote call is in progress. A dropped sender never cancels.
#[derive(Debug, Default)]
pub struct CancelSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelSignal {
    /// A signal that never fires.
    pub fn none() -> Self {
        Self { rx: None }
    }

    pub fn new(rx: watch::Receiver<bool>) -> Self {
        Self { rx: Some(rx) }
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().map(|rx| *rx.borrow()).unwrap_or(false)
    }

    /// Run `fut` unless cancellation is requested first.
    pub async fn guard<F: Future>(&mut self, fut: F) -> GenerationResult<F::Output> {
        let Some(rx) = self.rx.as_mut() else {
            return Ok(fut.await);
        };

        if *rx.borrow() {
            return Err(GenerationError::Cancelled);
        }

        tokio::select! {
            out = fut => Ok(out),
            _ = cancelled(rx) => Err(GenerationError::Cancelled),
        }
    }
}

impl From<watch::Receiver<bool>> for CancelSignal {
    fn from(rx: watch::Receiver<bool>) -> Self {
        Self::new(rx)
    }
}

async fn cancelled(rx: &mut watch::Receiver<bool>) {
    if rx.wait_for(|cancelled| *cancelled).await.is_err() {
        std::future::pending::<()>().await;
    }
}
