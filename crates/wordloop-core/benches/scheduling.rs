use criterion::{black_box, criterion_group, criterion_main, Criterion};

use wordloop_core::mastery::MasteryTracker;
use wordloop_core::scheduler::ActivePoolScheduler;

fn sequence(size: usize) -> Vec<String> {
    (0..size).map(|i| format!("w{i}")).collect()
}

fn bench_active_pool(c: &mut Criterion) {
    let seq = sequence(2_000);
    let tracker = MasteryTracker::new(&seq);

    c.bench_function("active_pool", |b| {
        b.iter(|| ActivePoolScheduler::active_pool(black_box(&seq), black_box(40), 5, &tracker))
    });
}

fn bench_advance_through_mastered(c: &mut Criterion) {
    let seq = sequence(2_000);
    let mut tracker = MasteryTracker::new(&seq);
    // Everything but the last window is mastered.
    for key in &seq[..1_995] {
        for _ in 0..5 {
            tracker.on_answer(key, true, false);
        }
    }

    c.bench_function("advance_if_exhausted", |b| {
        b.iter(|| {
            let mut scheduler = ActivePoolScheduler::default();
            scheduler.advance_if_exhausted(black_box(&seq), &tracker)
        })
    });
}

criterion_group!(benches, bench_active_pool, bench_advance_through_mastered);
criterion_main!(benches);
