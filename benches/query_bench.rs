//! Benchmarks for the Sensorstats query path
//!
//! Run with: cargo bench

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sensorstats::dataset::{CsvLoader, Dataset, DatasetStore, Reading};
use sensorstats::query::{aggregate, normalize, QueryFilter, QueryService};

const LOCATIONS: [&str; 4] = ["lab", "roof", "office", "basement"];
const SENSORS: [&str; 3] = ["temperature", "humidity", "co2"];

fn create_test_readings(count: usize) -> Vec<Reading> {
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    (0..count)
        .map(|i| {
            Reading::new(
                base + Duration::minutes(i as i64),
                LOCATIONS[i % LOCATIONS.len()],
                SENSORS[i % SENSORS.len()],
                (i % 100) as f64 * 0.5,
            )
        })
        .collect()
}

fn bench_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate");

    for size in [1_000, 10_000, 100_000] {
        let dataset = Dataset::from_readings(create_test_readings(size));
        let query = normalize(
            &QueryFilter::new()
                .location("lab")
                .sensor("temperature")
                .start_date("2024-01-01T06:00:00"),
        )
        .unwrap();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &dataset, |b, dataset| {
            b.iter(|| aggregate(black_box(dataset), black_box(&query)))
        });
    }

    group.finish();
}

fn bench_service(c: &mut Criterion) {
    let mut group = c.benchmark_group("service");
    let readings = create_test_readings(100_000);

    group.bench_function("cache_hit", |b| {
        let service = QueryService::new(DatasetStore::loaded(Dataset::from_readings(
            readings.clone(),
        )));
        let filter = QueryFilter::new().location("Lab ").sensor("TEMPERATURE");
        service.execute(&filter).unwrap();

        b.iter(|| service.execute(black_box(&filter)).unwrap())
    });

    group.bench_function("normalize", |b| {
        let filter = QueryFilter::new()
            .location("  Lab ")
            .sensor("Temperature")
            .start_date("2024-01-01")
            .end_date("2024-02-01T12:30:00+02:00");

        b.iter(|| normalize(black_box(&filter)).unwrap())
    });

    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    let mut csv_data = String::from("timestamp,location,sensor,value\n");
    for reading in create_test_readings(10_000) {
        csv_data.push_str(&format!(
            "{},{},{},{}\n",
            reading.timestamp.format("%Y-%m-%d %H:%M:%S"),
            reading.location,
            reading.sensor,
            reading.value
        ));
    }

    group.throughput(Throughput::Elements(10_000));
    group.bench_function("csv_10000", |b| {
        let loader = CsvLoader::new();
        b.iter(|| loader.load_str(black_box(&csv_data)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_aggregate, bench_service, bench_load);
criterion_main!(benches);
