use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cylinder_preview::chart::data::{edges_from_reader, events_from_reader};
use cylinder_preview::chart::generate_chart;
use cylinder_preview::config::{ChartConfig, CylinderGeometryConfig, DisplayConfig};
use cylinder_preview::geometry::{cylinder_mesh, extrude_shape, ring_shape};

/// Benchmark: display shell at increasing radial resolution
fn bench_cylinder_mesh(c: &mut Criterion) {
    let display = DisplayConfig::default();
    let mut group = c.benchmark_group("cylinder_mesh");

    for segments in [64u32, 256, 1024] {
        let params = CylinderGeometryConfig {
            radial_segments: segments,
            ..display.geometry
        };
        group.bench_with_input(BenchmarkId::from_parameter(segments), &params, |b, params| {
            b.iter(|| black_box(cylinder_mesh(black_box(display.radius), black_box(display.height), params)))
        });
    }
    group.finish();
}

/// Benchmark: ring frame outline plus extrusion
fn bench_ring_extrusion(c: &mut Criterion) {
    let display = DisplayConfig::default();
    let inner = display.model.inner_radius(display.radius);
    let outer = display.model.outer_radius(display.radius);
    let mut group = c.benchmark_group("ring_extrusion");

    for segments in [32u32, 64, 256] {
        group.bench_with_input(BenchmarkId::from_parameter(segments), &segments, |b, &segments| {
            b.iter(|| {
                let shape = ring_shape(inner, outer, segments);
                black_box(extrude_shape(&shape, black_box(display.height)))
            })
        });
    }
    group.finish();
}

/// Synthetic event chain with a side branch every third event
fn synthetic_tables(count: usize) -> (String, String) {
    let mut events = String::from("ID,Date,World,Description,Characters,Important_Trigger,Death\n");
    let mut edges = String::from("Source,Target,Type,Description\n");
    for i in 0..count {
        let day = i % 28 + 1;
        let year = 2000 + i / 28;
        events.push_str(&format!("E{i},{day:02}-01-{year},Adam,Event number {i},,,\n"));
        if i > 0 {
            let parent = if i % 3 == 0 { i / 2 } else { i - 1 };
            edges.push_str(&format!("E{parent},E{i},arrow,\n"));
        }
    }
    (events, edges)
}

/// Benchmark: full chart generation (layout, SVG, raster and PNG encode)
fn bench_chart_generation(c: &mut Criterion) {
    let mut group = c.benchmark_group("chart_generation");
    group.sample_size(20);

    for count in [50usize, 200] {
        let (events, edges) = synthetic_tables(count);
        let events = events_from_reader(events.as_bytes()).unwrap();
        let edges = edges_from_reader(edges.as_bytes()).unwrap();
        let config = ChartConfig::default();

        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, _| {
            b.iter(|| black_box(generate_chart(&events, &edges, &config)))
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_cylinder_mesh,
    bench_ring_extrusion,
    bench_chart_generation,
);

criterion_main!(benches);
