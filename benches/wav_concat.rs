use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use dialogcast::audio::concat_wav;
use dialogcast::audio::wav::{self, WavFormat};
use std::hint::black_box;
use std::path::PathBuf;
use tempfile::TempDir;

/// Seconds of 24 kHz speech per synthesized batch, roughly
const CHUNK_SECONDS: u32 = 20;

/// Write `count` chunk files of tone-like samples.
fn write_chunks(dir: &TempDir, count: usize) -> Vec<PathBuf> {
    let format = WavFormat::pcm16(24000, 1);
    let samples_per_chunk = (format.sample_rate * CHUNK_SECONDS) as usize;

    (1..=count)
        .map(|i| {
            let samples: Vec<i16> = (0..samples_per_chunk)
                .map(|n| ((n * i) % 2000) as i16 - 1000)
                .collect();
            let path = dir.path().join(format!("bench_chunk_{i}.wav"));
            wav::write_file(&path, format, &samples).unwrap();
            path
        })
        .collect()
}

fn bench_concat(c: &mut Criterion) {
    let mut group = c.benchmark_group("concat_wav");
    group.sample_size(20);

    for count in [1usize, 4, 12] {
        let dir = TempDir::new().unwrap();
        let chunks = write_chunks(&dir, count);
        let output = dir.path().join("bench_combined.wav");
        let bytes: u64 = chunks
            .iter()
            .map(|p| std::fs::metadata(p).unwrap().len())
            .sum();

        group.throughput(Throughput::Bytes(bytes));
        group.bench_with_input(BenchmarkId::from_parameter(count), &chunks, |b, chunks| {
            b.iter(|| concat_wav(black_box(chunks), black_box(&output)).unwrap());
        });
    }

    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let format = WavFormat::pcm16(24000, 1);
    let samples = vec![1234i16; (format.sample_rate * CHUNK_SECONDS) as usize];
    let bytes = wav::encode(format, &samples).unwrap();

    c.bench_function("decode_chunk_bytes", |b| {
        b.iter(|| wav::decode_bytes(black_box(&bytes), "bench").unwrap());
    });
}

criterion_group!(benches, bench_concat, bench_decode);
criterion_main!(benches);
