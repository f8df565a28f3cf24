//! Criterion benchmarks for tracing-slf4j

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use std::sync::Arc;
use tracing_slf4j::core::log_level::{DEBUG, INFO};
use tracing_slf4j::prelude::*;

/// Sink that accepts and forgets everything.
struct NullSink;

impl LogSink for NullSink {
    fn emit(&self, record: &LogRecord) -> Result<()> {
        black_box(record);
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}

// ============================================================================
// Dispatch Benchmarks
// ============================================================================

fn bench_sync_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync_dispatch");
    group.throughput(Throughput::Elements(1));

    let null = Dispatcher::builder().sink(NullSink).build().unwrap();
    group.bench_function("null_sink", |b| {
        b.iter(|| null.dispatch(black_box(INFO), black_box("Info message")));
    });

    // no subscriber installed, so this measures the bridge plus tracing's fast path
    let tracing = Dispatcher::default();
    group.bench_function("tracing_sink", |b| {
        b.iter(|| tracing.dispatch(black_box(INFO), black_box("Info message")));
    });

    let filtered = Dispatcher::builder()
        .max_level(LogLevel::Info)
        .sink(NullSink)
        .build()
        .unwrap();
    group.bench_function("filtered", |b| {
        b.iter(|| filtered.dispatch(black_box(DEBUG), black_box("Debug message")));
    });

    let escaping = Dispatcher::builder()
        .escape_control_chars(true)
        .sink(NullSink)
        .build()
        .unwrap();
    group.bench_function("escaping", |b| {
        b.iter(|| escaping.dispatch(black_box(INFO), black_box("line one\nline two\tend")));
    });

    group.finish();
}

fn bench_async_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("async_dispatch");
    group.throughput(Throughput::Elements(1));

    let dispatcher = Dispatcher::builder()
        .sink(NullSink)
        .async_mode(10000)
        .overflow_policy(OverflowPolicy::Block)
        .build()
        .unwrap();

    group.bench_function("info", |b| {
        b.iter(|| dispatcher.dispatch(black_box(INFO), black_box("Info message")));
    });

    group.finish();
}

// ============================================================================
// Concurrent Dispatch Benchmarks
// ============================================================================

fn bench_concurrent_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_dispatch");

    let dispatcher = Arc::new(
        Dispatcher::builder()
            .sink(NullSink)
            .async_mode(10000)
            .overflow_policy(OverflowPolicy::Block)
            .build()
            .unwrap(),
    );

    group.bench_function("multi_thread_4", |b| {
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let dispatcher = Arc::clone(&dispatcher);
                    std::thread::spawn(move || {
                        dispatcher.dispatch(black_box(INFO), black_box("Concurrent message"));
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }
        });
    });

    group.finish();
}

// ============================================================================
// Factory Benchmarks
// ============================================================================

fn bench_logger_factory(c: &mut Criterion) {
    let mut group = c.benchmark_group("logger_factory");
    group.throughput(Throughput::Elements(1));

    let dispatcher = Arc::new(Dispatcher::builder().sink(NullSink).build().unwrap());
    let factory = TracingLoggerFactory::with_dispatcher(dispatcher);

    group.bench_function("get_logger", |b| {
        b.iter(|| black_box(factory.get_logger(black_box("com.example.Service"))));
    });

    let logger = factory.get_logger("com.example.Service");
    group.bench_function("logger_info", |b| {
        b.iter(|| logger.info(black_box("Info message")));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_sync_dispatch,
    bench_async_dispatch,
    bench_concurrent_dispatch,
    bench_logger_factory
);
criterion_main!(benches);
