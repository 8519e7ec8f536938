use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use label_fit::config::SizingPolicy;
use label_fit::layout::{fit_font, truncate, wrap};
use label_fit::{
    AnnularSector, AxisAlignedBox, FontSpec, GlyphTableMetrics, LabelRequest, Obstacle, Region,
    StyleConfig, layout_labels,
};
use std::f32::consts::PI;
use std::hint::black_box;

const WORDS: [&str; 8] = [
    "Revenue", "Operating", "margin", "North", "America", "growth", "Q3", "forecast",
];

fn label_text(i: usize, words: usize) -> String {
    (0..words)
        .map(|k| WORDS[(i * 7 + k * 3) % WORDS.len()])
        .collect::<Vec<_>>()
        .join(" ")
}

fn donut_requests(slices: usize) -> Vec<LabelRequest> {
    let span = 2.0 * PI / slices.max(1) as f32;
    (0..slices)
        .map(|i| {
            let sector = AnnularSector {
                cx: 300.0,
                cy: 300.0,
                inner_radius: 120.0,
                outer_radius: 240.0,
                start_angle: i as f32 * span,
                end_angle: (i + 1) as f32 * span,
            };
            let region = Region::Sector(sector);
            let anchor = region.preferred_anchor().to_point();
            LabelRequest::new(label_text(i, 2), region).with_obstacle(Obstacle::Circle {
                cx: anchor.x,
                cy: anchor.y,
                r: 10.0,
            })
        })
        .collect()
}

fn bar_requests(bars: usize) -> Vec<LabelRequest> {
    (0..bars)
        .map(|i| {
            let region = Region::Box(AxisAlignedBox::new(i as f32 * 40.0, 0.0, 36.0, 120.0));
            LabelRequest::new(label_text(i, 3), region).with_obstacle(Obstacle::Box {
                x: i as f32 * 40.0,
                y: 50.0,
                w: 36.0,
                h: 20.0,
            })
        })
        .collect()
}

fn bench_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("text");
    let font = FontSpec::new("sans-serif", 16.0, 400);
    let long = label_text(3, 24);
    group.bench_function("fit_font", |b| {
        b.iter(|| fit_font(black_box(&long), &font, 120.0, 6.0, &GlyphTableMetrics))
    });
    group.bench_function("truncate", |b| {
        b.iter(|| truncate(black_box(&long), &font, 120.0, "\u{2026}", &GlyphTableMetrics))
    });
    group.bench_function("wrap", |b| {
        b.iter(|| wrap(black_box(&long), &font, 120.0, &GlyphTableMetrics))
    });
    group.finish();
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout");
    let per_label = StyleConfig::default();
    let uniform = StyleConfig {
        sizing: SizingPolicy::Uniform,
        ..StyleConfig::default()
    };
    for slices in [4usize, 12, 48] {
        let requests = donut_requests(slices);
        group.bench_with_input(BenchmarkId::new("donut", slices), &requests, |b, data| {
            b.iter(|| layout_labels(black_box(data), &per_label, &GlyphTableMetrics))
        });
    }
    for bars in [8usize, 64] {
        let requests = bar_requests(bars);
        group.bench_with_input(BenchmarkId::new("bars_uniform", bars), &requests, |b, data| {
            b.iter(|| layout_labels(black_box(data), &uniform, &GlyphTableMetrics))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_text, bench_layout);
criterion_main!(benches);
