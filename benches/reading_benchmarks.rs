use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use pi_thermometer::{
    parse_report, CaptureStore, EmulatedReader, SensorReader, TemperatureReading,
};
use std::sync::Arc;

const REPORT: &str = "72 01 4b 46 7f ff 0e 10 57 : crc=57 YES\n\
                      72 01 4b 46 7f ff 0e 10 57 t=23125\n";

/// Benchmark parsing of raw one-wire reports
fn bench_parse_report(c: &mut Criterion) {
    c.bench_function("parse_report", |b| {
        b.iter(|| parse_report(REPORT, 0.5).expect("Should parse report"))
    });

    c.bench_function("parse_report_malformed", |b| {
        b.iter(|| parse_report("72 01 4b 46\n7f ff t=1\n", 0.0).is_err())
    });
}

/// Benchmark emulated measurement end to end
fn bench_emulated_measure(c: &mut Criterion) {
    let reader = EmulatedReader::default();
    c.bench_function("emulated_measure", |b| {
        b.iter(|| reader.measure().expect("Should measure"))
    });
}

/// Benchmark capture creation and listing against a temporary directory
fn bench_capture_store(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().expect("Should create tokio runtime");
    let dir = std::env::temp_dir().join(format!("pi_thermometer_bench_{}", std::process::id()));
    let store = Arc::new(CaptureStore::new(&dir));
    let reader: Arc<dyn SensorReader> = Arc::new(EmulatedReader::fixed(21.0, 0.0));

    c.bench_function("capture_create", |b| {
        b.to_async(&rt).iter(|| {
            let store = Arc::clone(&store);
            let reader = Arc::clone(&reader);
            async move { store.create("bench", reader).await.expect("Should create capture") }
        })
    });

    let mut group = c.benchmark_group("capture_list");
    for count in [10usize, 100, 1000].iter() {
        let thermometer = format!("list_{}", count);
        rt.block_on(async {
            for _ in 0..*count {
                store
                    .create(&thermometer, Arc::clone(&reader))
                    .await
                    .expect("Should create capture");
            }
        });
        group.bench_with_input(BenchmarkId::from_parameter(count), count, |b, _| {
            b.to_async(&rt).iter(|| async {
                store.list(&thermometer).await.expect("Should list captures")
            })
        });
    }
    group.finish();

    let _ = std::fs::remove_dir_all(&dir);
}

/// Benchmark reading display used for capture payloads
fn bench_reading_display(c: &mut Criterion) {
    let reading = TemperatureReading::from_millidegrees(23125, 0.5);
    c.bench_function("reading_to_string", |b| b.iter(|| reading.to_string()));
}

criterion_group!(
    benches,
    bench_parse_report,
    bench_emulated_measure,
    bench_capture_store,
    bench_reading_display
);
criterion_main!(benches);
