//! Benchmarks for output formatters — CSV and JSON serialization.
//!
//! Measures throughput of formatting pre-generated records. Uses a
//! black-hole writer to isolate formatter cost from I/O.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Write;

use journeygen_core::generate::engine::execute_plan;
use journeygen_core::generate::plan::GenerationPlan;
use journeygen_core::journey::JourneyRecord;
use journeygen_core::output::{csv, json};
use journeygen_core::summary::{read_csv, summarize, JourneyObservation};

/// A writer that discards all output — isolates formatter cost from I/O.
struct NullWriter;

impl Write for NullWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

fn make_records(row_count: usize) -> Vec<JourneyRecord> {
    execute_plan(&GenerationPlan::new(row_count, 42).unwrap(), None).unwrap()
}

fn bench_csv_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("output/csv");

    for row_count in [100, 1000, 10_000] {
        let records = make_records(row_count);
        group.throughput(Throughput::Elements(row_count as u64));
        group.bench_with_input(BenchmarkId::new("rows", row_count), &records, |b, records| {
            b.iter(|| {
                let mut w = NullWriter;
                csv::write_csv(&mut w, records).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_json_output(c: &mut Criterion) {
    let mut group = c.benchmark_group("output/json");

    for row_count in [100, 1000, 10_000] {
        let records = make_records(row_count);
        group.throughput(Throughput::Elements(row_count as u64));
        group.bench_with_input(BenchmarkId::new("rows", row_count), &records, |b, records| {
            b.iter(|| {
                let mut w = NullWriter;
                json::write_json(&mut w, records).unwrap();
            });
        });
    }
    group.finish();
}

fn bench_read_and_summarize(c: &mut Criterion) {
    let mut group = c.benchmark_group("summary");
    let mut bytes = Vec::new();
    csv::write_csv(&mut bytes, &make_records(10_000)).unwrap();

    group.throughput(Throughput::Elements(10_000));
    group.bench_function("read_csv_10k", |b| {
        b.iter(|| read_csv(bytes.as_slice()).unwrap());
    });

    let observations: Vec<JourneyObservation> = read_csv(bytes.as_slice()).unwrap();
    group.bench_function("summarize_10k", |b| {
        b.iter(|| summarize(&observations));
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_csv_output,
    bench_json_output,
    bench_read_and_summarize
);
criterion_main!(benches);
