mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use geo_raster::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

const WIDTHS: [u32; 3] = [256, 512, 1024];

/// Builds a striped two-property raster: alternating bands of land and water,
/// eight columns wide, which keeps the run lists realistically short.
fn striped_bitmap(width: u32, height: u32) -> GeoBitmap {
    let land = ColorKey::from_rgb(0, 255, 0);
    let water = ColorKey::from_rgb(0, 0, 255);
    let pixels: Vec<ColorKey> = (0..width as usize * height as usize)
        .map(|i| {
            let x = (i as u32) % width;
            if (x / 8) % 2 == 0 {
                land
            } else {
                water
            }
        })
        .collect();
    let pixels = PixelBuffer::new(width, height, pixels).unwrap();
    let colors = vec![land, water];
    let table = ColorTable::new(colors.clone()).unwrap();
    GeoBitmap::encode("bench", &pixels, &table, &colors, EncodeOptions::default()).unwrap()
}

fn point_query_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries/property_at");
    for &width in &WIDTHS {
        let bitmap = striped_bitmap(width, width / 2);
        let position = bitmap.grid().cell_center(width / 3, width / 5);
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, _| {
            b.iter(|| black_box(bitmap.property_at(black_box(position))));
        });
    }
    group.finish();
}

fn random_position_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries/random_position");
    for &width in &WIDTHS {
        let bitmap = striped_bitmap(width, width / 2);
        let land = PropertyIndex::new(0).unwrap();
        let mut rng = StdRng::seed_from_u64(0xC0FFEE);
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, _| {
            b.iter(|| black_box(bitmap.random_position(land, &mut rng)));
        });
    }
    group.finish();
}

fn closest_match_benches(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries/closest_match");
    for &width in &WIDTHS {
        let bitmap = striped_bitmap(width, width / 2);
        let water = PropertyIndex::new(1);
        let over_water = bitmap.grid().cell_center(12, width / 4);
        group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, _| {
            b.iter(|| black_box(bitmap.closest_match(black_box(over_water), water)));
        });
    }
    group.finish();
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = point_query_benches, random_position_benches, closest_match_benches
}
criterion_main!(benches);
