use tokio::sync::watch;
use tracing::info;

/// Cooperative stop signal for batch runs. Workers poll
/// [`CancellationToken::is_cancelled`] between entries; nothing is aborted
/// mid-call.
#[derive(Clone)]
pub struct CancellationToken {
    receiver: watch::Receiver<bool>,
}

pub struct CancelHandle {
    sender: watch::Sender<bool>,
}

impl CancellationToken {
    pub fn new() -> (CancelHandle, Self) {
        let (tx, rx) = watch::channel(false);
        (CancelHandle { sender: tx }, Self { receiver: rx })
    }

    /// A token that is never cancelled.
    pub fn never() -> Self {
        Self::default()
    }

    pub fn is_cancelled(&self) -> bool {
        *self.receiver.borrow()
    }

    pub async fn cancelled(&mut self) {
        while !*self.receiver.borrow() {
            if self.receiver.changed().await.is_err() {
                // Handle dropped without cancelling; never resolves.
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        let (_, rx) = watch::channel(false);
        Self { receiver: rx }
    }
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.sender.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.sender.borrow()
    }

    /// Cancels once the process receives Ctrl-C. The returned task can be
    /// aborted when the guarded work finishes first.
    pub fn cancel_on_ctrl_c(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                info!("Interrupt received, finishing in-flight entries");
                self.cancel();
            }
        })
    }
}
