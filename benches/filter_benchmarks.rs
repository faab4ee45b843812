use brand_assets::filter::{
    clear_near_white, opaque_bounds, BackgroundFilter, ThresholdFilter, DEFAULT_WHITE_THRESHOLD,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{Rgba, RgbaImage};

const SIZES: [u32; 3] = [100, 400, 1024];

/// Near-white square with a dark centered mark covering a quarter of the area
fn logo_like(size: u32) -> RgbaImage {
    let mut image = RgbaImage::from_pixel(size, size, Rgba([248, 247, 250, 255]));
    let start = size / 4;
    let end = size - size / 4;
    for y in start..end {
        for x in start..end {
            image.put_pixel(x, y, Rgba([20, 60, 140, 255]));
        }
    }
    image
}

fn bench_clear_near_white(c: &mut Criterion) {
    let mut group = c.benchmark_group("clear_near_white");

    for size in SIZES {
        let image = logo_like(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &image, |b, image| {
            b.iter(|| {
                let mut working = image.clone();
                black_box(clear_near_white(&mut working, DEFAULT_WHITE_THRESHOLD))
            });
        });
    }

    group.finish();
}

fn bench_opaque_bounds(c: &mut Criterion) {
    let mut group = c.benchmark_group("opaque_bounds");

    for size in SIZES {
        let mut image = logo_like(size);
        clear_near_white(&mut image, DEFAULT_WHITE_THRESHOLD);
        group.bench_with_input(BenchmarkId::from_parameter(size), &image, |b, image| {
            b.iter(|| black_box(opaque_bounds(image)));
        });
    }

    group.finish();
}

fn bench_threshold_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("threshold_filter");
    let filter = ThresholdFilter::default();

    for size in SIZES {
        let image = logo_like(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &image, |b, image| {
            b.iter(|| black_box(filter.apply(image.clone())));
        });
    }

    // Worst case: nothing survives and the full image is scanned twice
    let blank = RgbaImage::from_pixel(1024, 1024, Rgba([255, 255, 255, 255]));
    group.bench_function("all_white_1024", |b| {
        b.iter(|| black_box(filter.apply(blank.clone())));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_clear_near_white,
    bench_opaque_bounds,
    bench_threshold_filter
);
criterion_main!(benches);
