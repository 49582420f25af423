//! Benchmarks for packed event codec throughput.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use evarr_core::buffer::{decode_mono_buffer, encode_mono_events, MonoIter};
use evarr_core::{mono, trigger, SynthConfig};

const NUM_EVENTS: usize = 1_000_000;

fn synthetic_buffer() -> Vec<u8> {
    let config = SynthConfig {
        count: NUM_EVENTS,
        dt: 1,
        width: 1280,
        height: 720,
    };
    config
        .words()
        .unwrap()
        .flat_map(|word| word.to_le_bytes())
        .collect()
}

fn word_benchmark(c: &mut Criterion) {
    let words: Vec<u64> = (0..NUM_EVENTS as u64)
        .map(|i| mono::encode(i % 2 == 0, (i % 1280) as u16, (i % 720) as u16, i as u32))
        .collect();

    let mut group = c.benchmark_group("decode_word");
    group.throughput(Throughput::Elements(words.len() as u64));

    group.bench_function("t_x_y_p", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for &word in &words {
                let (t, x, y, p) = mono::decode_t_x_y_p(black_box(word), 1_000_000);
                sum = sum.wrapping_add(t + x as u64 + y as u64 + p as u64);
            }
            black_box(sum)
        })
    });

    group.bench_function("t_only", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for &word in &words {
                sum = sum.wrapping_add(mono::decode_t(black_box(word), 1_000_000));
            }
            black_box(sum)
        })
    });

    group.bench_function("trigger_t_p", |b| {
        b.iter(|| {
            let mut sum = 0u64;
            for &word in &words {
                let (t, p) = trigger::decode_t_p(black_box(word), 1_000_000);
                sum = sum.wrapping_add(t + p as u64);
            }
            black_box(sum)
        })
    });

    group.finish();
}

fn buffer_benchmark(c: &mut Criterion) {
    let bytes = synthetic_buffer();

    let mut group = c.benchmark_group("decode_buffer");
    group.throughput(Throughput::Bytes(bytes.len() as u64));

    group.bench_function("collect_1m_events", |b| {
        b.iter(|| {
            let events = decode_mono_buffer(black_box(&bytes), 0).unwrap();
            black_box(events.len())
        })
    });

    group.bench_function("iterate_1m_events", |b| {
        b.iter(|| {
            let count = MonoIter::new(black_box(&bytes), 0)
                .unwrap()
                .filter(|event| event.polarity)
                .count();
            black_box(count)
        })
    });

    let events = decode_mono_buffer(&bytes, 0).unwrap();
    group.bench_function("encode_1m_events", |b| {
        b.iter(|| {
            let mut out = Vec::with_capacity(bytes.len());
            encode_mono_events(black_box(&events), 0, &mut out).unwrap();
            black_box(out.len())
        })
    });

    group.finish();
}

criterion_group!(benches, word_benchmark, buffer_benchmark);
criterion_main!(benches);
