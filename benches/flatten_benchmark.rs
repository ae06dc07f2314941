//! Flattening benchmarks.
//!
//! Collapsed subtrees contribute one row, so flattening a mostly folded sheet
//! should cost about as much as its visible rows, not its total size.
//!
//! Run with: cargo bench --bench flatten_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use evsheet::model::{EventDocument, EventsSheet, SheetDocument};
use evsheet::state::search::EventsSearcher;
use evsheet::state::selection::clear_selection;
use evsheet::state::unfolder::fold_all;
use evsheet::view_state::flatten::{build_event_rows, flatten};

/// `roots` roots, each holding 3 levels of 5 children.
fn generate_sheet(roots: usize) -> EventsSheet {
    fn subtree(depth: usize) -> EventDocument {
        let mut event = EventDocument::new("Standard").with_string(format!("depth {depth}"));
        if depth < 3 {
            for _ in 0..5 {
                event = event.with_sub_event(subtree(depth + 1));
            }
        }
        event
    }
    EventsSheet::from_document(&SheetDocument {
        events: (0..roots).map(|_| subtree(0)).collect(),
    })
}

fn bench_flatten_expanded(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten_expanded");
    for roots in [10, 100, 500] {
        let sheet = generate_sheet(roots);
        group.bench_with_input(BenchmarkId::from_parameter(roots), &sheet, |b, sheet| {
            b.iter(|| black_box(flatten(sheet, sheet.roots())));
        });
    }
    group.finish();
}

fn bench_flatten_folded(c: &mut Criterion) {
    let mut group = c.benchmark_group("flatten_folded");
    for roots in [10, 100, 500] {
        let mut sheet = generate_sheet(roots);
        fold_all(&mut sheet);
        group.bench_with_input(BenchmarkId::from_parameter(roots), &sheet, |b, sheet| {
            b.iter(|| black_box(flatten(sheet, sheet.roots())));
        });
    }
    group.finish();
}

fn bench_build_event_rows(c: &mut Criterion) {
    let sheet = generate_sheet(100);
    let selection = clear_selection();
    let searcher = EventsSearcher::new();
    c.bench_function("build_event_rows_100", |b| {
        b.iter(|| black_box(build_event_rows(&sheet, &selection, &searcher)));
    });
}

criterion_group!(
    benches,
    bench_flatten_expanded,
    bench_flatten_folded,
    bench_build_event_rows
);
criterion_main!(benches);
