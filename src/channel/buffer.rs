use std::sync::Arc;

use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::config::Config;
use crate::error::PipeError;
use crate::record::ErrorRecord;

/// Bounded FIFO of error records shared by producers and the drain.
///
/// The wiring layer creates one buffer and hands clones of it to an
/// [`ErrorChannel`](super::ErrorChannel) and an [`ErrorDrain`](crate::drain::ErrorDrain).
/// Every clone refers to the same queue.
pub struct ErrorBuffer {
    config: Arc<Config>,
    sender: mpsc::Sender<ErrorRecord>,
    receiver: Arc<Mutex<mpsc::Receiver<ErrorRecord>>>,
    done: CancellationToken,
}

impl Clone for ErrorBuffer {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            sender: self.sender.clone(),
            receiver: self.receiver.clone(),
            done: self.done.clone(),
        }
    }
}

impl ErrorBuffer {
    pub fn new(config: Arc<Config>) -> Result<Self, PipeError> {
        if config.capacity == 0 {
            return Err(PipeError::invalid("capacity must be greater than zero"));
        }
        let (sender, receiver) = mpsc::channel(config.capacity);

        Ok(Self {
            config,
            sender,
            receiver: Arc::new(Mutex::new(receiver)),
            done: CancellationToken::new(),
        })
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, PipeError> {
        Self::new(Arc::new(Config::with_capacity(capacity)?))
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.sender.max_capacity()
    }

    /// Number of occupied slots, including slots reserved by in-flight inserts.
    pub fn len(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True once [`close`](Self::close) was called or the receiving end is gone.
    pub fn is_closed(&self) -> bool {
        self.done.is_cancelled() || self.sender.is_closed()
    }

    /// Stops accepting records.
    ///
    /// Records already buffered stay readable. Producers waiting for space return
    /// without inserting, and later reports are dropped.
    pub fn close(&self) {
        self.done.cancel();
        if let Ok(mut rx) = self.receiver.try_lock() {
            rx.close();
        }
        debug!(pending = self.len(), "error buffer closed");
    }

    /// Waits for the next record in FIFO order.
    ///
    /// Returns `None` once the buffer is closed and empty.
    pub async fn recv(&self) -> Option<ErrorRecord> {
        let mut rx = self.receiver.lock().await;
        tokio::select! {
            biased;
            _ = self.done.cancelled() => {
                rx.close();
                rx.recv().await
            }
            record = rx.recv() => record,
        }
    }

    /// Takes the next record if one is buffered, without waiting for producers.
    pub async fn try_recv(&self) -> Option<ErrorRecord> {
        let mut rx = self.receiver.lock().await;
        rx.try_recv().ok()
    }

    pub(crate) fn sender(&self) -> mpsc::Sender<ErrorRecord> {
        self.sender.clone()
    }

    pub(crate) fn done(&self) -> CancellationToken {
        self.done.clone()
    }
}

impl std::fmt::Debug for ErrorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ErrorBuffer")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channel::ErrorChannel;
    use std::time::Duration;
    use tokio::time::{sleep, timeout};

    #[tokio::test]
    async fn test_close_while_receiver_locked_releases_producers() {
        let buffer = ErrorBuffer::with_capacity(1).unwrap();
        let channel = ErrorChannel::new(&buffer).unwrap();
        let cancel = CancellationToken::new();
        channel.report_error(&cancel, "Fetcher", "kept").await.unwrap();

        let waiting = {
            let channel = channel.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move { channel.report_error(&cancel, "Fetcher", "lost").await })
        };
        sleep(Duration::from_millis(20)).await;
        assert!(!waiting.is_finished());

        let guard = buffer.receiver.lock().await;
        buffer.close();
        drop(guard);

        let result = timeout(Duration::from_millis(500), waiting).await;
        assert!(result.unwrap().unwrap().is_ok());
        assert!(buffer.is_closed());
        assert!(channel.is_closed());

        // Reports after the close are dropped, even with free space.
        assert_eq!(buffer.try_recv().await.unwrap().message(), Some("kept"));
        channel.report_error(&cancel, "Fetcher", "late").await.unwrap();
        assert!(buffer.is_empty());
        assert!(buffer.recv().await.is_none());
    }
}
