//! Server-wide shutdown notification for live connections.

use tokio::sync::watch;

/// Broadcasts a one-shot "shutting down" flag to every connection.
#[derive(Debug, Clone)]
pub struct ShutdownSignal {
    tx: watch::Sender<bool>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Tells every listener to close. Repeated calls are harmless.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// One connection's view of the shutdown flag.
#[derive(Debug)]
pub struct ShutdownListener {
    rx: watch::Receiver<bool>,
}

impl ShutdownListener {
    /// Resolves once shutdown has been triggered.
    ///
    /// If every `ShutdownSignal` is dropped without triggering, this never
    /// resolves.
    pub async fn wait(&mut self) {
        if self.rx.wait_for(|triggered| *triggered).await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn listener_wakes_on_trigger() {
        let signal = ShutdownSignal::new();
        let mut listener = signal.subscribe();

        signal.trigger();

        tokio::time::timeout(Duration::from_millis(100), listener.wait())
            .await
            .unwrap();
        assert!(signal.is_triggered());
    }

    #[tokio::test]
    async fn late_subscriber_sees_earlier_trigger() {
        let signal = ShutdownSignal::new();
        signal.trigger();

        let mut listener = signal.subscribe();
        tokio::time::timeout(Duration::from_millis(100), listener.wait())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn listener_waits_while_not_triggered() {
        let signal = ShutdownSignal::new();
        let mut listener = signal.subscribe();

        let result = tokio::time::timeout(Duration::from_millis(50), listener.wait()).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn dropped_signal_does_not_wake_listener() {
        let signal = ShutdownSignal::new();
        let mut listener = signal.subscribe();
        drop(signal);

        let result = tokio::time::timeout(Duration::from_millis(50), listener.wait()).await;
        assert!(result.is_err());
    }
}
