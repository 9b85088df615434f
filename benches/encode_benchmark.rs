//! Benchmarks for token encoding and delta computation.
//!
//! Run with: cargo bench --bench encode_benchmark

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use razor_tokens::analysis::semantic::{
    SemanticRange, encode, minimal_token_edits, prefix_suffix_edits, TOKEN_STRIDE,
};
use std::hint::black_box;

/// `lines` lines of `<p class="x">` shaped ranges: eight tokens per line.
fn create_ranges(lines: u32) -> Vec<SemanticRange> {
    let mut ranges = Vec::with_capacity(lines as usize * 8);
    for line in 0..lines {
        let columns = [(0, 1, 11), (1, 2, 13), (3, 8, 14), (8, 9, 12)];
        for (start, end, token_type) in columns {
            ranges.push(SemanticRange::on_line(line, start, end, token_type, 0));
        }
        let columns = [(9, 10, 15), (10, 11, 16), (11, 12, 15), (12, 13, 11)];
        for (start, end, token_type) in columns {
            ranges.push(SemanticRange::on_line(line, start, end, token_type, 0));
        }
    }
    ranges
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");

    for lines in [100, 1_000, 10_000] {
        let ranges = create_ranges(lines);
        group.bench_with_input(BenchmarkId::new("lines", lines), &ranges, |b, ranges| {
            b.iter(|| black_box(encode(ranges).expect("sorted ranges")));
        });
    }

    group.finish();
}

/// Diff after an edit that changes one token's length in the middle of the document.
fn bench_delta(c: &mut Criterion) {
    let mut group = c.benchmark_group("delta");

    for lines in [1_000, 10_000] {
        let old = encode(&create_ranges(lines)).expect("sorted ranges");
        let mut new = old.as_slice().to_vec();
        let middle = (new.len() / TOKEN_STRIDE / 2) * TOKEN_STRIDE;
        new[middle + 2] += 3;

        group.bench_with_input(
            BenchmarkId::new("prefix_suffix", lines),
            &(old.clone(), new.clone()),
            |b, (old, new)| {
                b.iter(|| black_box(prefix_suffix_edits(old, new, TOKEN_STRIDE)));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("minimal", lines),
            &(old, new),
            |b, (old, new)| {
                b.iter(|| black_box(minimal_token_edits(old, new, 1_024).expect("aligned")));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_encode, bench_delta);
criterion_main!(benches);
