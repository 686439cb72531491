//! Single-shot completion handle for method runs.
//!
//! A method receives a [`Completion`] and must fulfil it exactly once.
//! Fulfilling consumes the handle, so a second report cannot be expressed;
//! dropping it unfulfilled is detected by the waiting [`PendingRun`].

use std::time::Duration;

use thiserror::Error;
use tokio::sync::oneshot;
use tracing::{debug, error};

use crate::state::MethodState;

/// The outcome a method reports when its run settles.
#[derive(Debug, Clone, PartialEq)]
pub struct Settled {
    /// Human-readable outcome.
    pub value: String,
    /// Replacement state for the method; `None` keeps the state it ran with.
    pub next_state: Option<MethodState>,
}

/// A method dropped its completion without reporting an outcome.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("method {method_id} dropped its completion without reporting an outcome")]
pub struct Abandoned {
    /// The method whose run was abandoned.
    pub method_id: String,
}

/// Sending half handed to a method's `run`.
#[derive(Debug)]
pub struct Completion {
    method_id: String,
    sender: Option<oneshot::Sender<Settled>>,
}

/// Receiving half held by whoever invoked `run`.
#[derive(Debug)]
pub struct PendingRun {
    method_id: String,
    receiver: oneshot::Receiver<Settled>,
}

impl Completion {
    /// Creates a linked completion/pending pair for one run of `method_id`.
    #[must_use]
    pub fn channel(method_id: impl Into<String>) -> (Self, PendingRun) {
        let method_id = method_id.into();
        let (sender, receiver) = oneshot::channel();
        (
            Self {
                method_id: method_id.clone(),
                sender: Some(sender),
            },
            PendingRun {
                method_id,
                receiver,
            },
        )
    }

    /// The method this completion was issued for.
    #[must_use]
    pub fn method_id(&self) -> &str {
        &self.method_id
    }

    /// Reports the outcome now.
    pub fn complete(mut self, value: impl Into<String>, next_state: Option<MethodState>) {
        if let Some(sender) = self.sender.take() {
            let settled = Settled {
                value: value.into(),
                next_state,
            };
            if sender.send(settled).is_err() {
                debug!(method_id = %self.method_id, "run settled after its caller stopped waiting");
            }
        }
    }

    /// Reports the outcome once `delay` has elapsed.
    ///
    /// Settles immediately when `delay` is zero or no async runtime is
    /// available to wait on.
    pub fn complete_after(self, delay: Duration, value: String, next_state: Option<MethodState>) {
        if delay.is_zero() {
            self.complete(value, next_state);
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    tokio::time::sleep(delay).await;
                    self.complete(value, next_state);
                });
            }
            Err(_) => self.complete(value, next_state),
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if self.sender.is_some() {
            error!(
                method_id = %self.method_id,
                "completion dropped without an outcome; method contract violated"
            );
        }
    }
}

impl PendingRun {
    /// The method this run belongs to.
    #[must_use]
    pub fn method_id(&self) -> &str {
        &self.method_id
    }

    /// Waits for the method to report its outcome.
    ///
    /// # Errors
    ///
    /// Returns `Abandoned` if the completion was dropped unfulfilled.
    pub async fn settled(self) -> Result<Settled, Abandoned> {
        self.receiver.await.map_err(|_| Abandoned {
            method_id: self.method_id,
        })
    }
}
