#![allow(missing_docs)]
//! Write and read throughput of the scalar codecs over arrays of values.

use core::time::Duration;

use chrono::{DateTime, TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use jsoncodec::{
    BigDecimal, JsonReader, JsonWriter, deserialize_date_time, deserialize_decimal,
    deserialize_double, deserialize_long, deserialize_uuid, serialize_date_time,
    serialize_decimal, serialize_double, serialize_long, serialize_uuid,
};
use uuid::Uuid;

const COUNT: usize = 10_000;

/// Deterministic pseudo-random sequence so runs are comparable.
fn lcg(seed: &mut u64) -> u64 {
    *seed = seed
        .wrapping_mul(6_364_136_223_846_793_005)
        .wrapping_add(1_442_695_040_888_963_407);
    *seed >> 11
}

fn write_array<T>(values: &[T], write: fn(&T, &mut JsonWriter)) -> Vec<u8> {
    let mut writer = JsonWriter::new();
    writer.write_byte(b'[');
    for (i, v) in values.iter().enumerate() {
        if i > 0 {
            writer.write_byte(b',');
        }
        write(v, &mut writer);
    }
    writer.write_byte(b']');
    writer.into_bytes()
}

fn read_array<T>(input: &[u8], read: fn(&mut JsonReader<'_>) -> jsoncodec::Result<T>) -> usize {
    let mut reader = JsonReader::new(input);
    let mut count = 0;
    // Opening bracket, then alternating value and separator.
    let _ = reader.next_token();
    while reader.next_token().is_ok() {
        if read(&mut reader).is_err() {
            break;
        }
        count += 1;
        if reader.next_token() != Ok(b',') {
            break;
        }
    }
    count
}

fn bench_group<T>(
    c: &mut Criterion,
    name: &str,
    values: &[T],
    write: fn(&T, &mut JsonWriter),
    read: fn(&mut JsonReader<'_>) -> jsoncodec::Result<T>,
) {
    let json = write_array(values, write);
    let mut group = c.benchmark_group(name);
    group.throughput(Throughput::Bytes(json.len() as u64));
    group.bench_with_input(BenchmarkId::new("write", COUNT), values, |b, values| {
        b.iter(|| black_box(write_array(values, write)));
    });
    group.bench_with_input(BenchmarkId::new("read", COUNT), &json, |b, json| {
        b.iter(|| black_box(read_array(json, read)));
    });
    group.finish();
}

#[allow(clippy::cast_possible_wrap, clippy::cast_precision_loss)]
fn bench_codecs(c: &mut Criterion) {
    let mut seed = 42;
    let longs: Vec<i64> = (0..COUNT).map(|_| lcg(&mut seed) as i64 - (1 << 52)).collect();
    let doubles: Vec<f64> = (0..COUNT)
        .map(|_| (lcg(&mut seed) % 1_000_000) as f64 / 1000.0)
        .collect();
    let decimals: Vec<BigDecimal> = (0..COUNT)
        .map(|_| BigDecimal::new((lcg(&mut seed) % 100_000_000).into(), 2))
        .collect();
    let uuids: Vec<Uuid> = (0..COUNT)
        .map(|_| Uuid::from_u64_pair(lcg(&mut seed), lcg(&mut seed)))
        .collect();
    let base = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
    let instants: Vec<DateTime<Utc>> = (0..COUNT)
        .map(|_| base + chrono::Duration::milliseconds((lcg(&mut seed) % 1_000_000_000_000) as i64))
        .collect();

    bench_group(c, "long", &longs, |v, w| serialize_long(*v, w), deserialize_long);
    bench_group(c, "double", &doubles, |v, w| serialize_double(*v, w), deserialize_double);
    bench_group(c, "decimal", &decimals, serialize_decimal, deserialize_decimal);
    bench_group(c, "uuid", &uuids, serialize_uuid, deserialize_uuid);
    bench_group(
        c,
        "date_time",
        &instants,
        serialize_date_time,
        |r| deserialize_date_time(r).map(|v| v.with_timezone(&Utc)),
    );
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(2))
            .measurement_time(Duration::from_secs(5));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_codecs }
criterion_main!(benches);
