//! Performance benchmarks for the CPU-bound pipeline stages
//!
//! Run with: `cargo bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use docsend_dl::pdf::{build_pdf, flatten, map_links, render_page, RenderedPage};
use docsend_dl::source::{LinkAnnotation, PageResult};
use image::{DynamicImage, Rgba, RgbaImage};

fn page_image(width: u32, height: u32) -> DynamicImage {
    let image = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, 128, ((x + y) % 256) as u8])
    });
    DynamicImage::ImageRgba8(image)
}

fn sample_links(count: usize) -> Vec<LinkAnnotation> {
    (0..count)
        .map(|i| LinkAnnotation {
            x: (i % 10) as f64 / 10.0,
            y: (i / 10) as f64 / 10.0,
            width: 0.05,
            height: 0.02,
            uri: if i % 2 == 0 {
                Some(format!("https://example.org/{}", i))
            } else {
                None
            },
            tracked_url: Some(format!("/r/{}", i)),
        })
        .collect()
}

/// Benchmark alpha flattening at typical slide resolutions
fn bench_flatten(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten");

    for (width, height) in [(1024, 768), (1920, 1080)] {
        let image = page_image(width, height);
        group.throughput(Throughput::Elements(width as u64 * height as u64));
        group.bench_with_input(
            BenchmarkId::new("rgba", format!("{}x{}", width, height)),
            &image,
            |b, image| {
                b.iter(|| flatten(black_box(image)));
            },
        );
    }

    group.finish();
}

/// Benchmark link mapping (should be trivial)
fn bench_map_links(c: &mut Criterion) {
    let links = sample_links(100);

    c.bench_function("map_links_100", |b| {
        b.iter(|| map_links(black_box(&links), 1920, 1080, "https://docsend.com"));
    });
}

/// Benchmark PDF assembly for decks of different sizes
fn bench_build_pdf(c: &mut Criterion) {
    let page = render_page(
        &PageResult {
            page: 1,
            image: page_image(1024, 768),
            links: sample_links(10),
        },
        "https://docsend.com",
    );

    let mut group = c.benchmark_group("build_pdf");
    group.sample_size(10);

    for count in [1usize, 10, 30] {
        let pages: Vec<RenderedPage> = (1..=count as u32)
            .map(|n| RenderedPage {
                page: n,
                ..page.clone()
            })
            .collect();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(
            BenchmarkId::new("pages", count),
            &pages,
            |b, pages| {
                b.iter(|| {
                    let mut doc = build_pdf(black_box(pages)).unwrap();
                    let mut out = Vec::new();
                    doc.save_to(&mut out).unwrap();
                    out
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_flatten, bench_map_links, bench_build_pdf);

criterion_main!(benches);
