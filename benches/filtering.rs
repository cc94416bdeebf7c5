//! Benchmarks for sidebar filtering and previews.

use chrono::Utc;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use easynotes::search::filter_notes;
use easynotes::sidebar::entries;
use easynotes::store::{Note, NoteColor, NoteStore};

fn sample_notes(count: usize) -> Vec<Note> {
    (0..count)
        .map(|i| {
            Note::new(
                format!("# Note {i}\n\nSome **text** about topic {}", i % 17),
                NoteColor::WHITE,
                Utc::now(),
            )
        })
        .collect()
}

fn bench_filter(c: &mut Criterion) {
    let notes = sample_notes(1000);
    c.bench_function("filter_1000", |b| {
        b.iter(|| filter_notes(black_box(&notes), black_box("topic 3")))
    });
}

fn bench_entries(c: &mut Criterion) {
    let mut store = NoteStore::new();
    store.set_notes(sample_notes(1000));
    let now = Utc::now();
    c.bench_function("entries_1000", |b| b.iter(|| entries(black_box(&store), now)));
}

criterion_group!(benches, bench_filter, bench_entries);
criterion_main!(benches);
