//! Bounded reply mailboxes and non-blocking delivery.
//!
//! Loops must never await a send: a loop that blocks on a full mailbox stops draining its own
//! inbox, and two loops blocked on each other deadlock. [`Mailbox::deliver`] and [`forward`] try
//! the slot first and hand the message to a detached task when it is full.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::messages::CompletionNotice;

/// Reply destination for [`CompletionNotice`]s.
#[derive(Debug, Clone)]
pub struct Mailbox {
    tx: mpsc::Sender<CompletionNotice>,
}

impl Mailbox {
    /// Create a mailbox with `depth` slots and its receiving end.
    pub fn channel(depth: usize) -> (Mailbox, mpsc::Receiver<CompletionNotice>) {
        let (tx, rx) = mpsc::channel(depth.max(1));
        (Mailbox { tx }, rx)
    }

    /// Deliver without waiting. Used by the loops.
    pub fn deliver(&self, notice: CompletionNotice) {
        forward(&self.tx, notice);
    }

    /// Deliver, waiting for a free slot. Returns `false` if the receiver is gone.
    pub async fn send(&self, notice: CompletionNotice) -> bool {
        self.tx.send(notice).await.is_ok()
    }

    /// `true` once the receiving end has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

impl From<mpsc::Sender<CompletionNotice>> for Mailbox {
    fn from(tx: mpsc::Sender<CompletionNotice>) -> Self {
        Mailbox { tx }
    }
}

/// Send `msg` on `tx` without blocking the caller.
///
/// Returns `false` only if the receiver is gone; a full channel is handed to a detached task.
pub(crate) fn forward<T>(tx: &mpsc::Sender<T>, msg: T) -> bool
where
    T: Send + std::fmt::Debug + 'static,
{
    match tx.try_send(msg) {
        Ok(()) => true,
        Err(TrySendError::Full(msg)) => {
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Err(err) = tx.send(msg).await {
                    tracing::debug!(msg = ?err.0, "receiver went away before delayed delivery");
                }
            });
            true
        }
        Err(TrySendError::Closed(msg)) => {
            tracing::debug!(?msg, "receiver went away, dropping message");
            false
        }
    }
}
