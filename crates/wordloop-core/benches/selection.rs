use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use wordloop_core::catalog::WordCatalog;
use wordloop_core::model::{CatalogEntry, Language};
use wordloop_core::selector::QuestionSelector;

fn catalog(size: usize) -> WordCatalog {
    let entries = (0..size)
        .map(|i| {
            CatalogEntry::new(
                format!("word{i}"),
                i.to_string(),
                (0..4).map(|n| format!("pkg/{i}/{n}.jpg")).collect(),
            )
        })
        .collect();
    WordCatalog::from_entries(entries, Language::English).unwrap()
}

fn bench_build_options(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_options");
    let selector = QuestionSelector::default();

    for size in [10, 1_000] {
        let catalog = catalog(size);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        group.bench_function(format!("catalog_{size}"), |b| {
            b.iter(|| selector.build_options(black_box("word3"), catalog.keys(), &mut rng))
        });
    }

    group.finish();
}

fn bench_render_options(c: &mut Criterion) {
    let selector = QuestionSelector::default();
    let catalog = catalog(100);
    let keys: Vec<String> = catalog.keys()[..3].to_vec();
    let mut rng = ChaCha8Rng::seed_from_u64(0);

    c.bench_function("render_options", |b| {
        b.iter(|| selector.render_options(black_box(&keys), &catalog, &mut rng))
    });
}

criterion_group!(benches, bench_build_options, bench_render_options);
criterion_main!(benches);
