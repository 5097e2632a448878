//! Benchmarks for frame selection and sampling.
//!
//! Run with: cargo bench

use std::fs;

use criterion::{BenchmarkId, Criterion};
use framepick::{SamplingConfig, sample_frames, select_indices};

fn benchmark_select_indices(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("select_indices");
    for total in [17usize, 1_000, 100_000] {
        group.bench_with_input(BenchmarkId::from_parameter(total), &total, |bencher, &total| {
            bencher.iter(|| select_indices(total, 8));
        });
    }
    group.finish();
}

fn benchmark_sample_directory(criterion: &mut Criterion) {
    let directory = match tempfile::tempdir() {
        Ok(directory) => directory,
        Err(error) => {
            eprintln!("Skipping benchmark: {error}");
            return;
        }
    };
    let image = image::RgbImage::from_fn(320, 240, |x, y| image::Rgb([x as u8, y as u8, 128]));
    for index in 0..120 {
        image
            .save(directory.path().join(format!("frame_{index:04}.jpg")))
            .unwrap();
    }
    // Unrelated files the directory scan has to skip.
    for index in 0..60 {
        fs::write(directory.path().join(format!("scene_{index:04}.jpg")), b"x").unwrap();
    }

    let mut group = criterion.benchmark_group("sample_frames");
    group.sample_size(30);

    group.bench_function("120 frames, 8 sampled", |bencher| {
        let config = SamplingConfig::new();
        bencher.iter(|| sample_frames(directory.path(), &config).unwrap());
    });

    group.bench_function("120 frames, 8 sampled with payload", |bencher| {
        let config = SamplingConfig::new().with_payload(true);
        bencher.iter(|| sample_frames(directory.path(), &config).unwrap());
    });

    group.bench_function("120 frames, all sampled", |bencher| {
        let config = SamplingConfig::new().with_sample_count(120);
        bencher.iter(|| sample_frames(directory.path(), &config).unwrap());
    });

    group.finish();
}

criterion::criterion_group!(benches, benchmark_select_indices, benchmark_sample_directory);
criterion::criterion_main!(benches);
