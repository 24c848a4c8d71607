//! Ctrl+C handling for long-running commands.
//!
//! Responsibilities:
//! - Provide a cloneable cancellation token fired by the SIGINT listener in `main`.
//! - Define the `Cancelled` error that command handlers return when the token
//!   fires, and the Unix-standard SIGINT exit code (130).
//!
//! Does NOT handle:
//! - Installing the signal listener (see `main`).
//! - Stopping a submitted batch (see `commands::batch`, which lets it finish).
//!
//! Invariants:
//! - Once cancelled, the token remains cancelled.
//! - `Cancelled` is only returned before a batch is submitted, so no write reached the provider.

use std::fmt;
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::Notify;

/// Standard Unix exit code for SIGINT: 128 + 2.
pub const SIGINT_EXIT_CODE: u8 = 130;

#[derive(Clone, Debug, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel the token (idempotent).
    pub fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            self.notify.notify_waiters();
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Resolve once the token is cancelled.
    ///
    /// The `notified()` future is created before the flag check so a cancel
    /// racing with this call is not missed.
    pub async fn cancelled(&self) {
        let notified = self.notify.notified();
        if self.is_cancelled() {
            return;
        }
        notified.await;
    }
}

/// Returned by handlers when the operator pressed Ctrl+C.
#[derive(Debug, Clone, Copy)]
pub struct Cancelled;

impl fmt::Display for Cancelled {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cancelled")
    }
}

impl std::error::Error for Cancelled {}

pub fn is_cancelled_error(err: &anyhow::Error) -> bool {
    err.is::<Cancelled>()
}

pub fn print_cancelled_message() {
    eprintln!("^C\nInterrupted. No changes were sent to the provider.");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancelled_resolves_after_cancel() {
        let token = CancellationToken::new();
        let waiter = token.clone();
        let handle = tokio::spawn(async move { waiter.cancelled().await });
        token.cancel();
        handle.await.unwrap();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_returns_immediately_when_already_cancelled() {
        let token = CancellationToken::new();
        token.cancel();
        token.cancel();
        token.cancelled().await;
    }

    #[test]
    fn test_is_cancelled_error() {
        assert!(is_cancelled_error(&anyhow::Error::from(Cancelled)));
        assert!(!is_cancelled_error(&anyhow::anyhow!("other")));
    }
}
