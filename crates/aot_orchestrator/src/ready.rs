//! The per-cycle completion signal.

use tokio::sync::watch;

/// How the most recent cycle ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The cycle completed without errors.
    Succeeded,
    /// The cycle ended with errors on the session.
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReadyState {
    NotStarted,
    Pending,
    Done(CycleOutcome),
}

/// Completion signal for the current cycle, observed through [`ReadyWaiter`]s.
///
/// Before the first cycle starts, waiters resolve immediately.
#[derive(Debug)]
pub struct ReadySignal {
    tx: watch::Sender<ReadyState>,
}

impl ReadySignal {
    /// Creates a signal with no cycle started.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(ReadyState::NotStarted);
        Self { tx }
    }

    /// Marks a cycle as in flight.
    pub fn begin(&self) {
        self.tx.send_replace(ReadyState::Pending);
    }

    /// Completes the in-flight cycle, waking every waiter.
    pub fn complete(&self, outcome: CycleOutcome) {
        self.tx.send_replace(ReadyState::Done(outcome));
    }

    /// A handle that resolves when no cycle is in flight.
    pub fn waiter(&self) -> ReadyWaiter {
        ReadyWaiter {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for ReadySignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Waits for the current cycle of a [`ReadySignal`]. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ReadyWaiter {
    rx: watch::Receiver<ReadyState>,
}

impl ReadyWaiter {
    /// Resolves once no cycle is in flight.
    ///
    /// Returns the last cycle's outcome, or `None` if no cycle has run. A
    /// dropped signal counts as a failed cycle.
    pub async fn wait(&mut self) -> Option<CycleOutcome> {
        match self.rx.wait_for(|s| *s != ReadyState::Pending).await {
            Ok(state) => match *state {
                ReadyState::Done(outcome) => Some(outcome),
                _ => None,
            },
            Err(_) => Some(CycleOutcome::Failed),
        }
    }
}
