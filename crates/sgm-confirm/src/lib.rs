//! Confirmation gate for destructive batch operations
//!
//! Generic two-phase protocol: a workflow proposes a destructive action and
//! blocks on [`Confirmation::wait`] while the operator-facing surface wires
//! the cloneable [`ConfirmationSignal`] to its confirm/cancel controls.
//! Exactly one terminal outcome is reached: a signal from the requester, or
//! expiry of the bounded wait. Signals from any other identity are rejected
//! without consuming the timeout; signals after a terminal state are no-ops.
//! Only the proposing workflow blocks; nothing global is held during the
//! wait.

use parking_lot::Mutex;
use sgm_directory::ActorId;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// Default bounded wait before a proposal expires
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Terminal outcome of a proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The requester confirmed; the caller may execute
    Confirmed,
    /// The requester cancelled
    Cancelled,
    /// The wait elapsed with no response; branches like `Cancelled` but is
    /// distinguished in the audit trail
    Expired,
}

impl Outcome {
    /// Whether the caller may proceed with the destructive action
    #[inline]
    #[must_use]
    pub fn is_confirmed(self) -> bool {
        matches!(self, Outcome::Confirmed)
    }
}

/// Why a signal was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SignalError {
    /// The signalling identity is not the requester
    #[error("only the requesting operator may respond")]
    NotRequester,
    /// A terminal outcome was already reached
    #[error("the proposal is already resolved")]
    AlreadyResolved,
}

struct Shared {
    requester: ActorId,
    sender: Mutex<Option<oneshot::Sender<Outcome>>>,
}

/// The proposing side: await the outcome
pub struct Confirmation {
    shared: Arc<Shared>,
    receiver: oneshot::Receiver<Outcome>,
    timeout: Duration,
}

/// The responding side: deliver confirm/cancel, cloneable per UI control
#[derive(Clone)]
pub struct ConfirmationSignal {
    shared: Arc<Shared>,
}

impl Confirmation {
    /// Propose a destructive action on behalf of `requester`
    ///
    /// Returns the waiting half and the signal half. The wait is bounded by
    /// `timeout`; pass [`DEFAULT_TIMEOUT`] unless the caller has a reason
    /// not to.
    #[must_use]
    pub fn propose(requester: ActorId, timeout: Duration) -> (Self, ConfirmationSignal) {
        let (sender, receiver) = oneshot::channel();
        let shared = Arc::new(Shared {
            requester,
            sender: Mutex::new(Some(sender)),
        });
        let confirmation = Self {
            shared: shared.clone(),
            receiver,
            timeout,
        };
        (confirmation, ConfirmationSignal { shared })
    }

    /// Block until a terminal outcome
    ///
    /// Resolves to `Expired` when the bounded wait elapses without a signal
    /// from the requester.
    pub async fn wait(self) -> Outcome {
        match tokio::time::timeout(self.timeout, self.receiver).await {
            Ok(Ok(outcome)) => {
                tracing::info!(requester = %self.shared.requester, ?outcome, "proposal resolved");
                outcome
            }
            Ok(Err(_)) | Err(_) => {
                // Seal the gate so late signals observe AlreadyResolved.
                self.shared.sender.lock().take();
                tracing::info!(requester = %self.shared.requester, "proposal expired");
                Outcome::Expired
            }
        }
    }
}

impl ConfirmationSignal {
    /// Deliver a confirm from `actor`
    ///
    /// # Errors
    /// `NotRequester` if `actor` did not propose; `AlreadyResolved` after a
    /// terminal outcome.
    pub fn confirm(&self, actor: ActorId) -> Result<(), SignalError> {
        self.send(actor, Outcome::Confirmed)
    }

    /// Deliver a cancel from `actor`
    ///
    /// # Errors
    /// Same as [`ConfirmationSignal::confirm`].
    pub fn cancel(&self, actor: ActorId) -> Result<(), SignalError> {
        self.send(actor, Outcome::Cancelled)
    }

    fn send(&self, actor: ActorId, outcome: Outcome) -> Result<(), SignalError> {
        if actor != self.shared.requester {
            tracing::warn!(%actor, requester = %self.shared.requester, "signal from non-requester rejected");
            return Err(SignalError::NotRequester);
        }
        let sender = self.shared.sender.lock().take();
        match sender {
            Some(sender) => sender.send(outcome).map_err(|_| SignalError::AlreadyResolved),
            None => Err(SignalError::AlreadyResolved),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUESTER: ActorId = ActorId(10);
    const STRANGER: ActorId = ActorId(99);

    #[tokio::test]
    async fn confirm_resolves() {
        let (confirmation, signal) = Confirmation::propose(REQUESTER, DEFAULT_TIMEOUT);
        signal.confirm(REQUESTER).unwrap();
        assert_eq!(confirmation.wait().await, Outcome::Confirmed);
    }

    #[tokio::test]
    async fn cancel_resolves() {
        let (confirmation, signal) = Confirmation::propose(REQUESTER, DEFAULT_TIMEOUT);
        signal.cancel(REQUESTER).unwrap();
        assert_eq!(confirmation.wait().await, Outcome::Cancelled);
    }

    #[tokio::test]
    async fn expires_without_signal() {
        let (confirmation, _signal) = Confirmation::propose(REQUESTER, Duration::from_millis(1));
        let outcome = confirmation.wait().await;
        assert_eq!(outcome, Outcome::Expired);
        assert!(!outcome.is_confirmed());
    }

    #[tokio::test]
    async fn stranger_is_rejected_without_resolving() {
        let (confirmation, signal) = Confirmation::propose(REQUESTER, DEFAULT_TIMEOUT);
        assert_eq!(signal.cancel(STRANGER), Err(SignalError::NotRequester));
        // The gate is still open for the requester.
        signal.confirm(REQUESTER).unwrap();
        assert_eq!(confirmation.wait().await, Outcome::Confirmed);
    }

    #[tokio::test]
    async fn second_signal_is_noop() {
        let (confirmation, signal) = Confirmation::propose(REQUESTER, DEFAULT_TIMEOUT);
        signal.confirm(REQUESTER).unwrap();
        assert_eq!(signal.cancel(REQUESTER), Err(SignalError::AlreadyResolved));
        assert_eq!(confirmation.wait().await, Outcome::Confirmed);
    }

    #[tokio::test]
    async fn signal_after_expiry_is_noop() {
        let (confirmation, signal) = Confirmation::propose(REQUESTER, Duration::from_millis(1));
        assert_eq!(confirmation.wait().await, Outcome::Expired);
        assert_eq!(signal.confirm(REQUESTER), Err(SignalError::AlreadyResolved));
    }
}
