use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::sink::RecordSink;
use crate::channel::ErrorBuffer;
use crate::record::ErrorRecord;

/// Consumer side of an [`ErrorBuffer`].
///
/// Designed for a single drain per buffer. Several drains on clones of one buffer
/// still work, but they take turns on the receiver.
pub struct ErrorDrain {
    buffer: ErrorBuffer,
}

impl ErrorDrain {
    pub fn new(buffer: &ErrorBuffer) -> Self {
        Self {
            buffer: buffer.clone(),
        }
    }

    /// Next record in FIFO order, or `None` once the buffer is closed and empty.
    pub async fn recv(&self) -> Option<ErrorRecord> {
        self.buffer.recv().await
    }

    /// Hands records to `sink` until the buffer closes or `cancel` fires.
    ///
    /// On cancellation, records already buffered are flushed to the sink when the
    /// buffer's config asks for it. Sink failures are logged and skipped. Returns
    /// the number of records the sink accepted.
    pub async fn run<S>(&self, cancel: &CancellationToken, sink: S) -> usize
    where
        S: RecordSink,
    {
        let mut handled = 0;
        info!(capacity = self.buffer.capacity(), "error drain started");

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    info!(handled, "error drain cancelled");
                    if self.buffer.config().drain_on_cancel() {
                        handled += self.flush(cancel, &sink).await;
                    }
                    return handled;
                }

                record = self.buffer.recv() => {
                    match record {
                        Some(record) => {
                            if Self::dispatch(cancel, &sink, &record).await {
                                handled += 1;
                            }
                        }
                        None => {
                            info!(handled, "error buffer closed, drain finished");
                            return handled;
                        }
                    }
                }
            }
        }
    }

    async fn flush<S>(&self, cancel: &CancellationToken, sink: &S) -> usize
    where
        S: RecordSink,
    {
        let mut flushed = 0;
        while let Some(record) = self.buffer.try_recv().await {
            if Self::dispatch(cancel, sink, &record).await {
                flushed += 1;
            }
        }
        debug!(flushed, "flushed buffered records");
        flushed
    }

    async fn dispatch<S>(cancel: &CancellationToken, sink: &S, record: &ErrorRecord) -> bool
    where
        S: RecordSink,
    {
        match sink.handle(cancel, record).await {
            Ok(()) => true,
            Err(e) => {
                warn!(
                    producer = %record.producer_kind(),
                    error = %e,
                    "sink failed to handle error record"
                );
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "drain_test.rs"]
mod tests;
