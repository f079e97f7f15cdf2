//! One-shot shutdown broadcast shared by the compile façade and both loops.

use std::sync::Arc;

use tokio::sync::watch;

/// Owner side of the shutdown flag. Cloning shares the same flag.
#[derive(Debug, Clone)]
pub struct Shutdown {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Raise the flag. Returns `true` only for the call that actually raised it.
    pub fn trigger(&self) -> bool {
        self.tx.send_if_modified(|raised| {
            if *raised {
                false
            } else {
                *raised = true;
                true
            }
        })
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// A receiver that can be awaited from a loop or subtask.
    pub fn signal(&self) -> ShutdownSignal {
        ShutdownSignal { rx: self.tx.subscribe() }
    }
}

/// Subscriber side of the shutdown flag.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl ShutdownSignal {
    pub fn is_triggered(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once the flag is raised. A dropped owner counts as shutdown.
    pub async fn wait(&mut self) {
        let _ = self.rx.wait_for(|raised| *raised).await;
    }
}
