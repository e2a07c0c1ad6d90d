//! A pool of task and thread producers reporting into one bounded error pipe.
//!
//! Run with: cargo run --example producer_pool

use error_pipe::channel::{ConfigBuilder, ErrorBuffer, ErrorChannel};
use error_pipe::drain::{ErrorDrain, TracingSink};
use error_pipe::record::ProducerKind;
use error_pipe::telemetry;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

struct Fetcher;
struct Indexer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();

    // Small capacity so producers feel backpressure
    let config = Arc::new(ConfigBuilder::default().capacity(4usize).build()?);
    let buffer = ErrorBuffer::new(config)?;
    let channel = ErrorChannel::new(&buffer)?;
    let drain = ErrorDrain::new(&buffer);
    let cancel = CancellationToken::new();

    let mut tasks = Vec::new();
    for worker in 0..3 {
        let channel = channel.clone();
        let cancel = cancel.clone();
        tasks.push(tokio::spawn(async move {
            for attempt in 0..5 {
                let cause = std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    format!("worker {} attempt {}", worker, attempt),
                );
                channel
                    .report_error_with_cause(&cancel, ProducerKind::of::<Fetcher>(), "fetch failed", cause)
                    .await?;
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
            Ok::<(), error_pipe::PipeError>(())
        }));
    }

    let thread_channel = channel.clone();
    let thread_cancel = cancel.clone();
    let indexer = std::thread::spawn(move || {
        for shard in 0..5 {
            thread_channel.blocking_report_error(
                &thread_cancel,
                ProducerKind::of::<Indexer>(),
                format!("shard {} rejected", shard),
            )?;
        }
        Ok::<(), error_pipe::PipeError>(())
    });

    let closer = {
        let buffer = buffer.clone();
        tokio::spawn(async move {
            for task in tasks {
                task.await??;
            }
            tokio::task::spawn_blocking(move || indexer.join())
                .await?
                .map_err(|_| "indexer thread panicked")??;
            buffer.close();
            Ok::<(), Box<dyn std::error::Error + Send + Sync>>(())
        })
    };

    let handled = drain.run(&cancel, TracingSink).await;
    closer.await?.map_err(|e| e as Box<dyn std::error::Error>)?;

    println!("\nDrained {} error records", handled);
    Ok(())
}
