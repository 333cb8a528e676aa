use std::fmt::Debug;
use std::time::Duration;
use tokio::sync::mpsc;

pub(crate) fn discard_logger() -> slog::Logger {
    slog::Logger::root(slog::Discard, slog::o!())
}

/// Wraps a notification channel with timeouts, so a test fails instead of hanging when a
/// notification never arrives.
pub(crate) struct TestUtilReceiver<T> {
    rx: mpsc::UnboundedReceiver<T>,
    timeout: Duration,
}

impl<T: Debug> TestUtilReceiver<T> {
    pub(crate) fn new(rx: mpsc::UnboundedReceiver<T>) -> Self {
        TestUtilReceiver {
            rx,
            timeout: Duration::from_millis(10),
        }
    }

    pub(crate) async fn recv(&mut self) -> T {
        self.recv_with_sanity_timeout().await.expect("Expected value")
    }

    async fn recv_with_sanity_timeout(&mut self) -> Option<T> {
        tokio::time::timeout(Duration::from_secs(5), self.rx.recv())
            .await
            .expect("Unexpected timeout")
    }

    pub(crate) async fn assert_no_value(&mut self) {
        if let Ok(value) = tokio::time::timeout(self.timeout, self.rx.recv()).await {
            panic!("Expected no value, got {:?}", value);
        }
    }
}
