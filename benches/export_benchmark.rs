//! LayerZip export benchmarks

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use image::Rgba;
use layerzip_lib::core::ExportSettings;
use layerzip_lib::export::{export_layer_zip, LayerTreeWalker};
use layerzip_lib::host::memory::MemoryDocument;
use std::path::Path;

/// `groups` groups of `layers_per_group` paint layers each
fn generate_document(groups: usize, layers_per_group: usize, dir: &Path) -> MemoryDocument {
    let mut doc = MemoryDocument::new(64, 64).with_file_name(dir.join("bench.kra"));
    for g in 0..groups {
        let group = doc.add_group(None, &format!("Group {}", g));
        for l in 0..layers_per_group {
            let shade = ((g * layers_per_group + l) % 255) as u8;
            let fill = doc.filled_rect((l as u32 % 64, 0, 8, 64), Rgba([shade, 0, 255 - shade, 255]));
            doc.add_paint_layer(Some(group), &format!("Layer {}", l), fill);
        }
    }
    doc
}

fn benchmark_tree_walk(c: &mut Criterion) {
    let mut group = c.benchmark_group("Tree Walk");
    let dir = std::env::temp_dir();

    for layers in [1, 4, 16].iter() {
        let mut doc = generate_document(2, *layers, &dir);
        group.bench_with_input(BenchmarkId::new("walk", layers), layers, |b, _| {
            b.iter(|| LayerTreeWalker::new(&mut doc, 64).walk_document())
        });
    }

    group.finish();
}

fn benchmark_layer_zip(c: &mut Criterion) {
    let mut group = c.benchmark_group("LayerZip Export");
    let dir = std::env::temp_dir().join("layerzip-bench");
    let _ = std::fs::create_dir_all(&dir);
    let settings = ExportSettings::default();

    let mut doc = generate_document(4, 4, &dir);
    group.bench_function("export_16_layers", |b| {
        b.iter(|| export_layer_zip(&mut doc, &settings))
    });

    group.finish();
}

criterion_group!(benches, benchmark_tree_walk, benchmark_layer_zip);
criterion_main!(benches);
