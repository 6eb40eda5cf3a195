//! Benchmarks for the stipple pipeline.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use stipple::displace::{displace_buffer, noise_at, DisplaceParams};
use stipple::mapper::MergeRange;
use stipple::quantize::quantize_buffer;
use stipple::render::{render, QuantizeOptions, QuantizeTarget, RenderOptions};
use stipple::sampler::{sample, SamplerOptions, Strategy};
use stipple::types::{Colour, StopKind, StopSet};
use stipple::PixelBuffer;

/// A diagonal gradient buffer, enough tonal variety to keep quantization
/// and stop resolution honest.
fn gradient_buffer(size: u32) -> PixelBuffer {
    let mut buffer = PixelBuffer::filled(size, size, Colour::BLACK);
    for y in 0..size {
        for x in 0..size {
            let v = (((x + y) * 255) / (2 * size - 2).max(1)) as u8;
            buffer.set(x, y, Colour::rgb(v, v, v));
        }
    }
    buffer
}

fn ascii_stops() -> StopSet {
    let glyphs = ["@", "#", "+", ".", " "];
    let mut set = StopSet::new();
    for (i, glyph) in glyphs.iter().enumerate() {
        set.add(
            i as f32 * 25.0,
            StopKind::Character(glyph.to_string()),
            Colour::BLACK,
            None,
        );
    }
    set
}

// -- Sampling benchmarks --

fn bench_sampling(c: &mut Criterion) {
    let mut group = c.benchmark_group("sampling");
    let buffer = gradient_buffer(512);

    for strategy in [
        Strategy::Grid,
        Strategy::Random,
        Strategy::Stratified,
        Strategy::Jittered,
        Strategy::Poisson,
    ] {
        let options = SamplerOptions {
            cell_size: 8.0,
            strategy,
            ..Default::default()
        };
        group.bench_function(strategy.to_string(), |b| {
            b.iter(|| sample(black_box(&buffer), black_box(&options)))
        });
    }

    group.finish();
}

// -- Quantization benchmarks --

fn bench_quantize(c: &mut Criterion) {
    let mut group = c.benchmark_group("quantize");
    let buffer = gradient_buffer(512);

    group.bench_function("flat_4_levels", |b| {
        b.iter(|| {
            let mut work = buffer.clone();
            quantize_buffer(&mut work, 4, false);
            work
        })
    });

    group.bench_function("dither_2_levels", |b| {
        b.iter(|| {
            let mut work = buffer.clone();
            quantize_buffer(&mut work, 2, true);
            work
        })
    });

    group.finish();
}

// -- Displacement benchmarks --

fn bench_displace(c: &mut Criterion) {
    let mut group = c.benchmark_group("displace");
    let buffer = gradient_buffer(512);
    let params = DisplaceParams::default();

    group.bench_function("noise_at", |b| {
        b.iter(|| noise_at(black_box(171.0), black_box(313.0), &params, 512, 512))
    });

    group.bench_function("remap_512", |b| {
        b.iter(|| displace_buffer(black_box(&buffer), black_box(&params)))
    });

    group.finish();
}

// -- End-to-end benchmarks --

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let buffer = gradient_buffer(512);
    let stops = ascii_stops();

    let plain = RenderOptions {
        sampler: SamplerOptions {
            cell_size: 8.0,
            ..Default::default()
        },
        ..Default::default()
    };
    group.bench_function("grid_plain", |b| {
        b.iter(|| render(black_box(&buffer), black_box(&stops), black_box(&plain)))
    });

    let full = RenderOptions {
        sampler: SamplerOptions {
            cell_size: 8.0,
            ..Default::default()
        },
        quantize: Some(QuantizeOptions {
            levels: 4,
            dither: true,
            target: QuantizeTarget::Samples,
        }),
        displace: Some(DisplaceParams::default()),
        merge: Some(MergeRange { min: 2, max: 4 }),
        ..Default::default()
    };
    group.bench_function("grid_full", |b| {
        b.iter(|| render(black_box(&buffer), black_box(&stops), black_box(&full)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_sampling,
    bench_quantize,
    bench_displace,
    bench_pipeline
);
criterion_main!(benches);
