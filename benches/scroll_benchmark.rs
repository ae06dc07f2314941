//! Scroll and row height benchmarks.
//!
//! Offsets come from a Fenwick tree, so locating the rows under the viewport
//! stays logarithmic in the row count.
//!
//! Run with: cargo bench --bench scroll_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use evsheet::view_state::height_index::HeightIndex;
use evsheet::view_state::row_height::FixedRowHeight;
use evsheet::view_state::virtual_list::{ScrollAlignment, VirtualList};

fn rendered_list(rows: usize) -> VirtualList {
    let mut list = VirtualList::new(40);
    list.recompute_row_heights(0, &FixedRowHeight { rows, height: 2 });
    list.mark_rendered();
    list
}

fn bench_visible_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("visible_range");
    for rows in [1_000, 10_000, 100_000] {
        let mut list = rendered_list(rows);
        list.scroll_to(list.max_scroll_top() / 2);
        group.bench_with_input(BenchmarkId::from_parameter(rows), &list, |b, list| {
            b.iter(|| black_box(list.visible_range()));
        });
    }
    group.finish();
}

fn bench_scroll_to_row(c: &mut Criterion) {
    let mut list = rendered_list(100_000);
    let mut row = 0;
    c.bench_function("scroll_to_row_center_100k", |b| {
        b.iter(|| {
            row = (row + 7_919) % 100_000;
            list.scroll_to_row(black_box(row), ScrollAlignment::Center);
            black_box(list.scroll_top())
        });
    });
}

fn bench_height_update(c: &mut Criterion) {
    let mut index = HeightIndex::from_heights(std::iter::repeat(1).take(100_000));
    let mut row = 0;
    c.bench_function("height_update_and_offset_100k", |b| {
        b.iter(|| {
            row = (row + 104_729) % 100_000;
            index.set(row, 1 + row % 3);
            black_box(index.offset_of(row))
        });
    });
}

fn bench_recompute_tail(c: &mut Criterion) {
    let mut list = rendered_list(100_000);
    c.bench_function("recompute_last_1000_rows_100k", |b| {
        b.iter(|| {
            list.recompute_row_heights(99_000, &FixedRowHeight { rows: 100_000, height: 2 });
            black_box(list.scroll_height())
        });
    });
}

criterion_group!(
    benches,
    bench_visible_range,
    bench_scroll_to_row,
    bench_height_update,
    bench_recompute_tail
);
criterion_main!(benches);
