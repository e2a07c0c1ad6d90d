use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use error_pipe::channel::{ErrorBuffer, ErrorChannel};
use error_pipe::drain::ErrorDrain;
use error_pipe::error::PipeError;
use error_pipe::record::ErrorRecord;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

const RECORDS_PER_PRODUCER: usize = 1000;

async fn run_pipe(capacity: usize, producers: usize) -> usize {
    let buffer = ErrorBuffer::with_capacity(capacity).unwrap();
    let channel = ErrorChannel::new(&buffer).unwrap();
    let drain = ErrorDrain::new(&buffer);
    let cancel = CancellationToken::new();
    let seen = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..producers)
        .map(|p| {
            let channel = channel.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                for i in 0..RECORDS_PER_PRODUCER {
                    channel
                        .report_error(&cancel, format!("Producer{}", p), format!("failure {}", i))
                        .await
                        .unwrap();
                }
            })
        })
        .collect();

    let closer = tokio::spawn(async move {
        for handle in handles {
            handle.await.unwrap();
        }
        buffer.close();
    });

    let counter = Arc::clone(&seen);
    let handled = drain
        .run(&cancel, move |_ctx: &CancellationToken, _record: &ErrorRecord| {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::Relaxed);
                Ok::<(), PipeError>(())
            }
        })
        .await;
    closer.await.unwrap();
    handled
}

fn bench_capacities(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_capacity");
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let producers = 4;

    for capacity in [1usize, 16, 256, 4096] {
        group.throughput(Throughput::Elements((producers * RECORDS_PER_PRODUCER) as u64));
        group.bench_with_input(
            BenchmarkId::new("capacity", capacity),
            &capacity,
            |b, &capacity| {
                b.to_async(&runtime).iter(|| run_pipe(capacity, producers));
            },
        );
    }

    group.finish();
}

fn bench_producer_counts(c: &mut Criterion) {
    let mut group = c.benchmark_group("producer_count");
    let runtime = tokio::runtime::Runtime::new().unwrap();
    group.sample_size(20);

    for producers in [1usize, 4, 16] {
        group.throughput(Throughput::Elements((producers * RECORDS_PER_PRODUCER) as u64));
        group.bench_with_input(
            BenchmarkId::new("producers", producers),
            &producers,
            |b, &producers| {
                b.to_async(&runtime).iter(|| run_pipe(256, producers));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_capacities, bench_producer_counts);
criterion_main!(benches);
