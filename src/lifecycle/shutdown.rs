//! Shutdown coordination.
//!
//! The flag is latched: a server that subscribes after `trigger` still sees
//! it and stops immediately.

use tokio::sync::watch;

use crate::lifecycle::signals::shutdown_signal;

/// Owner of the process-wide stop flag.
pub struct Shutdown {
    tx: watch::Sender<bool>,
}

/// Receiving half handed to a server.
#[derive(Clone)]
pub struct ShutdownSignal {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx }
    }

    pub fn subscribe(&self) -> ShutdownSignal {
        ShutdownSignal {
            rx: self.tx.subscribe(),
        }
    }

    /// Raise the flag. Repeated calls are no-ops.
    pub fn trigger(&self) {
        self.tx.send_if_modified(|stopping| !std::mem::replace(stopping, true));
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// Raise the flag on Ctrl+C or SIGTERM. Consumes the coordinator; hand
    /// out subscriptions first.
    pub fn trigger_on_os_signal(self) {
        tokio::spawn(async move {
            shutdown_signal().await;
            self.trigger();
        });
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownSignal {
    /// Resolves once the flag is raised or the coordinator is gone.
    pub async fn wait(mut self) {
        let _ = self.rx.wait_for(|stopping| *stopping).await;
    }
}
