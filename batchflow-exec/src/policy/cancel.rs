use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

/// Cooperative cancellation signal shared between clones.
///
/// Cancelling any clone wakes every task waiting in [`cancelled`](Self::cancelled).
#[derive(Debug, Clone)]
pub struct CancellationToken {
    state: Arc<CancellationState>,
}

#[derive(Debug)]
struct CancellationState {
    tx: watch::Sender<bool>,
    rx: watch::Receiver<bool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            state: Arc::new(CancellationState { tx, rx }),
        }
    }

    pub fn is_cancelled(&self) -> bool {
        *self.state.rx.borrow()
    }

    pub fn cancel(&self) {
        let _ = self.state.tx.send(true);
        debug!("cancellation requested");
    }

    /// Resolves once the token is cancelled. Returns immediately if it already is.
    pub async fn cancelled(&self) {
        let mut rx = self.state.rx.clone();
        while !*rx.borrow() {
            if rx.changed().await.is_err() {
                break;
            }
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}
