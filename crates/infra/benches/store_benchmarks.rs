use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use causaldb_core::{codec, Event, EventId};
use causaldb_infra::{EventLog, EventStore, InMemoryEventLog, LoadPolicy, StoreConfig};

fn sample_event(id: u32) -> Event {
    let parents = (id.saturating_sub(2)..id).filter(|&p| p > 0).map(EventId::new);
    Event::new(id, format!("payload for event {id}"), parents).unwrap()
}

fn file_store(dir: &tempfile::TempDir, sync: bool) -> EventStore {
    let config = StoreConfig::new(dir.path().join("bench.cdb")).with_sync_on_write(sync);
    EventStore::open(&config).unwrap()
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");
    let event = sample_event(42);
    let row = codec::encode(&event);

    group.bench_function("encode", |b| b.iter(|| codec::encode(black_box(&event))));
    group.bench_function("decode", |b| b.iter(|| codec::decode(black_box(&row)).unwrap()));
    group.finish();
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    group.throughput(Throughput::Elements(1));

    // Without fsync: measures encode + write + table push.
    group.bench_function("file_nosync", |b| {
        let dir = tempfile::tempdir().unwrap();
        let mut store = file_store(&dir, false);
        let mut id = 0u32;
        b.iter(|| {
            id = id.wrapping_add(1);
            store.insert(black_box(sample_event(id))).unwrap();
        });
    });

    group.sample_size(20);
    group.bench_function("file_sync", |b| {
        let dir = tempfile::tempdir().unwrap();
        let mut store = file_store(&dir, true);
        let mut id = 0u32;
        b.iter(|| {
            id = id.wrapping_add(1);
            store.insert(black_box(sample_event(id))).unwrap();
        });
    });

    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    for rows in [100u32, 1_000, 5_000] {
        let dir = tempfile::tempdir().unwrap();
        let mut store = file_store(&dir, false);
        for id in 1..=rows {
            store.insert(sample_event(id)).unwrap();
        }

        group.bench_with_input(BenchmarkId::new("table_hit", rows), &rows, |b, &rows| {
            b.iter(|| store.get(black_box(EventId::new(rows.min(1000)))).unwrap())
        });

        group.bench_with_input(BenchmarkId::new("file_scan_last", rows), &rows, |b, &rows| {
            b.iter(|| store.log_mut().find_by_id(black_box(EventId::new(rows))).unwrap())
        });
    }

    group.finish();
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_load");
    group.sample_size(20);

    let mut log = InMemoryEventLog::new();
    for id in 1..=1000u32 {
        log.append(&sample_event(id)).unwrap();
    }

    for policy in [LoadPolicy::ContiguousPrefix, LoadPolicy::FullScan] {
        group.bench_function(format!("{policy:?}"), |b| {
            b.iter(|| EventStore::with_log(log.clone(), 1000, black_box(policy)).unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_codec, bench_insert, bench_lookup, bench_load);
criterion_main!(benches);
