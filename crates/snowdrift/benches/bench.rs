use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use snowdrift::{
    AtomicIdGenerator, DEFAULT_EPOCH, IdGenStatus, IdGenerator, MonotonicClock, NodeId,
    SnowflakeGenerator, TimeSource,
};
use std::{
    sync::{Arc, Barrier},
    thread::scope,
    time::Instant,
};

#[derive(Clone, Copy)]
struct FixedMockTime {
    millis: u64,
}

impl TimeSource for FixedMockTime {
    fn current_millis(&self) -> u64 {
        self.millis
    }
}

// Number of IDs generated per benchmark iteration. One full millisecond's
// worth of sequence values, so a fixed clock never exhausts.
const TOTAL_IDS: usize = 4096;

fn fixed_time() -> FixedMockTime {
    FixedMockTime {
        millis: DEFAULT_EPOCH.as_millis() as u64 + 1,
    }
}

/// Benchmarks a hot-path generator where IDs are always `Ready`.
fn bench_generator<G, T>(c: &mut Criterion, group_name: &str, generator_factory: impl Fn() -> G)
where
    G: SnowflakeGenerator<T>,
    T: TimeSource,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                let generator = generator_factory();
                for _ in 0..TOTAL_IDS {
                    match generator.poll_id() {
                        Ok(IdGenStatus::Ready { id }) => {
                            black_box(id);
                        }
                        Ok(IdGenStatus::Pending { .. }) | Err(_) => unreachable!(),
                    }
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks the blocking path against a real clock, including the spin
/// once a millisecond's sequence runs out.
fn bench_generator_spin<G, T>(
    c: &mut Criterion,
    group_name: &str,
    generator_factory: impl Fn() -> G,
) where
    G: SnowflakeGenerator<T>,
    T: TimeSource,
{
    let mut group = c.benchmark_group(group_name);
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        let generator = generator_factory();
        b.iter_custom(|iters| {
            let start = Instant::now();

            for _ in 0..iters {
                for _ in 0..TOTAL_IDS {
                    black_box(generator.next_id().unwrap());
                }
            }

            start.elapsed()
        });
    });

    group.finish();
}

/// Benchmarks one generator shared across threads.
fn bench_generator_contended<G, T>(
    c: &mut Criterion,
    group_name: &str,
    generator_fn: impl Fn() -> G,
) where
    G: SnowflakeGenerator<T> + Send + Sync,
    T: TimeSource,
{
    let mut group = c.benchmark_group(group_name);
    let max_threads = num_cpus::get().clamp(1, 16);

    for thread_count in [1, 2, 4, 8, 16].into_iter().filter(|n| *n <= max_threads) {
        let ids_per_thread = TOTAL_IDS / thread_count;

        group.throughput(Throughput::Elements(TOTAL_IDS as u64));
        group.bench_function(format!("elems/{TOTAL_IDS}/threads/{thread_count}"), |b| {
            b.iter_custom(|iters| {
                let start = Instant::now();

                for _ in 0..iters {
                    let generator = Arc::new(generator_fn());
                    let barrier = Arc::new(Barrier::new(thread_count + 1));
                    scope(|s| {
                        for _ in 0..thread_count {
                            let generator = Arc::clone(&generator);
                            let barrier = Arc::clone(&barrier);
                            s.spawn(move || {
                                barrier.wait();
                                for _ in 0..ids_per_thread {
                                    black_box(generator.next_id().unwrap());
                                }
                            });
                        }
                        barrier.wait();
                    });
                }

                start.elapsed()
            });
        });
    }

    group.finish();
}

fn benchmark_mock_sequential_lock(c: &mut Criterion) {
    bench_generator::<IdGenerator<_>, _>(c, "mock/sequential/lock", || {
        IdGenerator::with_time(NodeId::default(), DEFAULT_EPOCH, fixed_time())
    });
}

fn benchmark_mock_sequential_atomic(c: &mut Criterion) {
    bench_generator::<AtomicIdGenerator<_>, _>(c, "mock/sequential/atomic", || {
        AtomicIdGenerator::with_time(NodeId::default(), DEFAULT_EPOCH, fixed_time())
    });
}

fn benchmark_mock_contended_lock(c: &mut Criterion) {
    bench_generator_contended::<IdGenerator<_>, _>(c, "mock/contended/lock", || {
        IdGenerator::with_time(NodeId::default(), DEFAULT_EPOCH, fixed_time())
    });
}

fn benchmark_mock_contended_atomic(c: &mut Criterion) {
    bench_generator_contended::<AtomicIdGenerator<_>, _>(c, "mock/contended/atomic", || {
        AtomicIdGenerator::with_time(NodeId::default(), DEFAULT_EPOCH, fixed_time())
    });
}

fn benchmark_mono_sequential_lock(c: &mut Criterion) {
    bench_generator_spin::<IdGenerator<_>, _>(c, "mono/sequential/lock", || {
        IdGenerator::with_time(NodeId::default(), DEFAULT_EPOCH, MonotonicClock::new())
    });
}

fn benchmark_mono_sequential_atomic(c: &mut Criterion) {
    bench_generator_spin::<AtomicIdGenerator<_>, _>(c, "mono/sequential/atomic", || {
        AtomicIdGenerator::with_time(NodeId::default(), DEFAULT_EPOCH, MonotonicClock::new())
    });
}

fn benchmark_mono_contended_lock(c: &mut Criterion) {
    let clock = MonotonicClock::new();
    bench_generator_contended::<IdGenerator<_>, _>(c, "mono/contended/lock", move || {
        IdGenerator::with_time(NodeId::default(), DEFAULT_EPOCH, clock.clone())
    });
}

fn benchmark_mono_contended_atomic(c: &mut Criterion) {
    let clock = MonotonicClock::new();
    bench_generator_contended::<AtomicIdGenerator<_>, _>(c, "mono/contended/atomic", move || {
        AtomicIdGenerator::with_time(NodeId::default(), DEFAULT_EPOCH, clock.clone())
    });
}

criterion_group!(
    benches,
    // Mock clock
    benchmark_mock_sequential_lock,
    benchmark_mock_sequential_atomic,
    benchmark_mock_contended_lock,
    benchmark_mock_contended_atomic,
    // Monotonic clock (spins on exhaustion)
    benchmark_mono_sequential_lock,
    benchmark_mono_sequential_atomic,
    benchmark_mono_contended_lock,
    benchmark_mono_contended_atomic,
);
criterion_main!(benches);
