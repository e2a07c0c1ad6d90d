// src/drain/sink.rs

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::error::PipeError;
use crate::record::ErrorRecord;

/// Destination for drained error records.
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn handle(&self, cancel: &CancellationToken, record: &ErrorRecord)
        -> Result<(), PipeError>;
}

#[async_trait]
impl<F, Fut> RecordSink for F
where
    F: Fn(&CancellationToken, &ErrorRecord) -> Fut + Send + Sync,
    Fut: std::future::Future<Output = Result<(), PipeError>> + Send,
{
    async fn handle(
        &self,
        ctx: &CancellationToken,
        record: &ErrorRecord,
    ) -> Result<(), PipeError> {
        self(ctx, record).await
    }
}

/// Emits every record as an `ERROR` level tracing event.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[async_trait]
impl RecordSink for TracingSink {
    async fn handle(
        &self,
        _cancel: &CancellationToken,
        record: &ErrorRecord,
    ) -> Result<(), PipeError> {
        error!(
            producer = %record.producer_kind(),
            message = record.message(),
            cause = record.cause().map(tracing::field::display),
            "producer reported an error"
        );
        Ok(())
    }
}
