use std::error::Error;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::buffer::ErrorBuffer;
use crate::error::{PipeError, PipeResult};
use crate::record::{ErrorRecord, ProducerKind};

/// Producer side of an [`ErrorBuffer`].
///
/// Reporting never fails once a record is built. If the caller's token is
/// cancelled while waiting for space, or the drain has gone away, the record is
/// dropped and the call returns normally. Callers that need delivery guarantees
/// must track them themselves.
#[derive(Debug, Clone)]
pub struct ErrorChannel {
    pipe: mpsc::Sender<ErrorRecord>,
    closed: CancellationToken,
}

impl ErrorChannel {
    /// Attaches to a buffer created by the wiring layer.
    ///
    /// Fails with [`PipeError::InvalidArgument`] when the buffer is already closed.
    pub fn new(buffer: &ErrorBuffer) -> PipeResult<Self> {
        if buffer.is_closed() {
            return Err(PipeError::invalid("error buffer is closed"));
        }
        let mut channel = Self::from_sender(buffer.sender())?;
        channel.closed = buffer.done();
        Ok(channel)
    }

    /// Attaches to the sending half of an externally created bounded channel.
    pub fn from_sender(pipe: mpsc::Sender<ErrorRecord>) -> PipeResult<Self> {
        if pipe.is_closed() {
            return Err(PipeError::invalid("error buffer has no receiver"));
        }
        Ok(Self {
            pipe,
            closed: CancellationToken::new(),
        })
    }

    /// Whether the buffer was closed or its receiving side is gone. Records reported now are dropped.
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled() || self.pipe.is_closed()
    }

    pub async fn report_error<K>(
        &self,
        cancel: &CancellationToken,
        kind: K,
        message: impl Into<String>,
    ) -> PipeResult<()>
    where
        K: TryInto<ProducerKind>,
        K::Error: Into<PipeError>,
    {
        let record = ErrorRecord::new(kind, message)?;
        self.enqueue(cancel, record).await;
        Ok(())
    }

    pub async fn report_error_with_cause<K>(
        &self,
        cancel: &CancellationToken,
        kind: K,
        message: impl Into<String>,
        cause: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> PipeResult<()>
    where
        K: TryInto<ProducerKind>,
        K::Error: Into<PipeError>,
    {
        let record = ErrorRecord::with_cause(kind, message, cause)?;
        self.enqueue(cancel, record).await;
        Ok(())
    }

    pub async fn report_cause<K>(
        &self,
        cancel: &CancellationToken,
        kind: K,
        cause: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> PipeResult<()>
    where
        K: TryInto<ProducerKind>,
        K::Error: Into<PipeError>,
    {
        let record = ErrorRecord::from_cause(kind, cause)?;
        self.enqueue(cancel, record).await;
        Ok(())
    }

    /// Inserts a record at the tail, waiting while the buffer is full.
    ///
    /// Waiters acquire slots in arrival order. A token that is already cancelled,
    /// or becomes cancelled while waiting, drops the record. So does a closed buffer.
    pub async fn enqueue(&self, cancel: &CancellationToken, record: ErrorRecord) {
        let permit = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(
                    producer = %record.producer_kind(),
                    "producer cancelled while waiting for buffer space, record dropped"
                );
                return;
            }
            _ = self.closed.cancelled() => {
                debug!(
                    producer = %record.producer_kind(),
                    "error buffer closed, record dropped"
                );
                return;
            }
            permit = self.pipe.reserve() => permit,
        };

        match permit {
            Ok(permit) => permit.send(record),
            Err(_) => debug!(
                producer = %record.producer_kind(),
                "error buffer closed, record dropped"
            ),
        }
    }

    /// Thread variant of [`report_error`](Self::report_error).
    ///
    /// Parks the calling thread. Must not be called from inside an async context.
    pub fn blocking_report_error<K>(
        &self,
        cancel: &CancellationToken,
        kind: K,
        message: impl Into<String>,
    ) -> PipeResult<()>
    where
        K: TryInto<ProducerKind>,
        K::Error: Into<PipeError>,
    {
        let record = ErrorRecord::new(kind, message)?;
        self.blocking_enqueue(cancel, record);
        Ok(())
    }

    pub fn blocking_report_error_with_cause<K>(
        &self,
        cancel: &CancellationToken,
        kind: K,
        message: impl Into<String>,
        cause: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> PipeResult<()>
    where
        K: TryInto<ProducerKind>,
        K::Error: Into<PipeError>,
    {
        let record = ErrorRecord::with_cause(kind, message, cause)?;
        self.blocking_enqueue(cancel, record);
        Ok(())
    }

    pub fn blocking_report_cause<K>(
        &self,
        cancel: &CancellationToken,
        kind: K,
        cause: impl Into<Box<dyn Error + Send + Sync>>,
    ) -> PipeResult<()>
    where
        K: TryInto<ProducerKind>,
        K::Error: Into<PipeError>,
    {
        let record = ErrorRecord::from_cause(kind, cause)?;
        self.blocking_enqueue(cancel, record);
        Ok(())
    }

    /// Thread variant of [`enqueue`](Self::enqueue).
    pub fn blocking_enqueue(&self, cancel: &CancellationToken, record: ErrorRecord) {
        futures::executor::block_on(self.enqueue(cancel, record));
    }
}
