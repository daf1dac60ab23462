use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use kitti_api::catalog::{validate_change, CatalogNode, CatalogSnapshot, ItemKind};
use kitti_api::tree::coords::{rebuild, Rotation, Span};

// `categories` roots, each with `categories` sub-categories holding 10 products
fn catalog_entries(categories: i64) -> Vec<(i64, Option<i64>, ItemKind)> {
    let mut entries = Vec::new();
    let mut next = 1;
    for _ in 0..categories {
        let root = next;
        next += 1;
        entries.push((root, None, ItemKind::Category));
        for _ in 0..categories {
            let sub = next;
            next += 1;
            entries.push((sub, Some(root), ItemKind::Category));
            for _ in 0..10 {
                entries.push((next, Some(sub), ItemKind::Product));
                next += 1;
            }
        }
    }
    entries
}

fn rebuild_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("tree_rebuild");

    for size in [5_i64, 10, 20].iter() {
        let links: Vec<(i64, Option<i64>)> = catalog_entries(*size)
            .into_iter()
            .map(|(id, parent, _)| (id, parent))
            .collect();
        group.bench_with_input(BenchmarkId::from_parameter(links.len()), &links, |b, links| {
            b.iter(|| rebuild(black_box(links)));
        });
    }

    group.finish();
}

fn rotation_benchmark(c: &mut Criterion) {
    let rotation = Rotation::new(Span::new(2, 41), 900);
    c.bench_function("rotation_map_1000", |b| {
        b.iter(|| (1..=1000).map(|v| rotation.map(black_box(v))).sum::<i64>());
    });
}

fn validation_benchmark(c: &mut Criterion) {
    let snapshot = CatalogSnapshot::from_nodes(catalog_entries(20).into_iter().map(
        |(id, parent_id, kind)| CatalogNode {
            id,
            kind,
            subtype: None,
            parent_id,
            depth: 0,
        },
    ));

    c.bench_function("validate_root_subtree", |b| {
        b.iter(|| validate_change(black_box(1), &snapshot));
    });
}

criterion_group!(
    benches,
    rebuild_benchmark,
    rotation_benchmark,
    validation_benchmark
);
criterion_main!(benches);
