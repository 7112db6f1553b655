use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use super::service::SessionKey;

/// Delivered once the feedback delay elapses; tells the owner to advance
/// the session identified by `session` past question `question_index`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceSignal {
    pub session: SessionKey,
    pub question_index: usize,
}

/// Arms one-shot timers that emit `AdvanceSignal`s on a channel.
///
/// The receiving side is owned by whoever drives the event loop; a signal
/// is only a request, and the session decides whether it still applies.
#[derive(Debug, Clone)]
pub struct AdvanceScheduler {
    delay: Duration,
    tx: UnboundedSender<AdvanceSignal>,
}

impl AdvanceScheduler {
    #[must_use]
    pub fn new(delay: Duration) -> (Self, UnboundedReceiver<AdvanceSignal>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { delay, tx }, rx)
    }

    /// Start the countdown. Must be called inside a tokio runtime.
    #[must_use]
    pub fn arm(&self, signal: AdvanceSignal) -> PendingAdvance {
        let tx = self.tx.clone();
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the app is shutting down.
            let _ = tx.send(signal);
        });
        PendingAdvance {
            signal,
            handle: Some(handle),
        }
    }
}

/// A countdown in flight. Dropping it cancels the timer.
#[derive(Debug)]
pub struct PendingAdvance {
    signal: AdvanceSignal,
    handle: Option<JoinHandle<()>>,
}

impl PendingAdvance {
    #[must_use]
    pub fn signal(&self) -> AdvanceSignal {
        self.signal
    }

    /// Stop the countdown before it fires.
    pub fn cancel(mut self) {
        self.abort();
    }

    fn abort(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for PendingAdvance {
    fn drop(&mut self) {
        self.abort();
    }
}
