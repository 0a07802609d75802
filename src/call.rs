//! Background calls a presentation layer can poll, cancel and join.

use crate::DeribitClient;
use crate::error::{Error, Result};
use std::future::Future;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Clone)]
pub enum CallState<T> {
    Idle,
    Pending,
    Done(Result<T>),
}

impl<T> CallState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, CallState::Pending)
    }

    pub fn is_done(&self) -> bool {
        matches!(self, CallState::Done(_))
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            CallState::Done(Ok(data)) => Some(data),
            _ => None,
        }
    }

    /// User-facing failure text, if the call failed.
    pub fn message(&self) -> Option<String> {
        match self {
            CallState::Done(Err(e)) => Some(e.to_string()),
            _ => None,
        }
    }
}

/// A call running on the tokio runtime.
///
/// Dropping the handle cancels the call.
#[derive(Debug)]
pub struct CallHandle<T> {
    state: watch::Receiver<CallState<T>>,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl<T> CallHandle<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Spawns `operation`, which ends as `Timeout` if it has not finished
    /// within `timeout`.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn<F>(operation: F, timeout: Duration) -> Self
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        let (tx, rx) = watch::channel(CallState::Pending);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let task = tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => Err(Error::Cancelled),
                result = tokio::time::timeout(timeout, operation) => {
                    result.unwrap_or_else(|_| Err(Error::Timeout(timeout)))
                }
            };
            if let Err(e) = &outcome {
                tracing::debug!(error = %e, "call finished with an error");
            }
            tx.send_replace(CallState::Done(outcome));
        });
        Self {
            state: rx,
            cancel,
            task,
        }
    }

    pub fn state(&self) -> CallState<T> {
        self.state.borrow().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    /// Receiver that observes every state change.
    pub fn watch(&self) -> watch::Receiver<CallState<T>> {
        self.state.clone()
    }

    /// Requests cancellation. No effect once the call has finished.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Waits for the call to finish and returns its outcome.
    pub async fn wait(mut self) -> Result<T> {
        let _ = (&mut self.task).await;
        match self.state() {
            CallState::Done(outcome) => outcome,
            // the task was aborted or panicked before reporting
            _ => Err(Error::Cancelled),
        }
    }
}

impl<T> Drop for CallHandle<T> {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// At most one call at a time, e.g. for one UI panel. Starting a new call
/// cancels the previous one.
#[derive(Debug)]
pub struct CallSlot<T> {
    current: Option<CallHandle<T>>,
}

impl<T> Default for CallSlot<T> {
    fn default() -> Self {
        Self { current: None }
    }
}

impl<T> CallSlot<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, handle: CallHandle<T>) {
        self.current = Some(handle);
    }

    pub fn state(&self) -> CallState<T> {
        self.current
            .as_ref()
            .map_or(CallState::Idle, CallHandle::state)
    }

    pub fn is_loading(&self) -> bool {
        self.current.as_ref().is_some_and(CallHandle::is_loading)
    }

    /// Cancels any running call and returns to `Idle`.
    pub fn clear(&mut self) {
        self.current = None;
    }
}

impl DeribitClient {
    /// Runs `operation` in the background under the configured call timeout.
    ///
    /// Panics unless called from within a tokio runtime. A GUI thread that
    /// does not run one must hold the guard returned by `Runtime::enter`.
    ///
    /// ```rust,ignore
    /// let c = client.clone();
    /// let handle = client.dispatch(async move { c.get_order_book("BTC-PERPETUAL", 10).await });
    /// ```
    pub fn dispatch<T, F>(&self, operation: F) -> CallHandle<T>
    where
        T: Clone + Send + Sync + 'static,
        F: Future<Output = Result<T>> + Send + 'static,
    {
        CallHandle::spawn(operation, self.config().call_timeout)
    }
}
