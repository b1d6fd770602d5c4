#[path = "common/page.rs"]
mod page;
#[path = "common/tier.rs"]
mod bench_tier;

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use indexmap::IndexMap;

use ocrgrid_core::params::{DEFAULT_GAP_TOLERANCE, DEFAULT_OVERLAP_THRESHOLD};
use ocrgrid_core::{
    ExtractParams, PatternRecord, PatternType, SearchPattern, extract, extract_batch,
    merge_fragments,
};

use bench_tier::{BenchTier, bench_seed, bench_tier, configure_group};
use page::form_page;

fn row_counts(tier: BenchTier) -> &'static [i32] {
    if tier == BenchTier::Quick {
        &[20, 70]
    } else {
        &[10, 20, 40, 70]
    }
}

fn record(keyword: &str, pattern_type: &str) -> PatternRecord {
    PatternRecord {
        keyword_or_coordinate: keyword.to_string(),
        pattern_type: pattern_type.to_string(),
        tolerance_x: Some(8),
        tolerance_y: Some(26),
        stop_words: vec!["L9".to_string()],
        regex_patterns: Vec::new(),
        parse_as_date: false,
    }
}

fn bench_single_field(c: &mut Criterion) {
    let tier = bench_tier();
    let seed = bench_seed();

    let mut group = c.benchmark_group("extract_single_field");
    configure_group(&mut group, tier);

    for &rows in row_counts(tier) {
        let doc = form_page(seed ^ rows as u64, rows);
        group.throughput(Throughput::Elements(doc.len() as u64));

        let column = SearchPattern::new("L0", PatternType::VerticalColumn).with_tolerance(8, 26);
        group.bench_with_input(BenchmarkId::new("vertical_column", rows), &doc, |b, doc| {
            b.iter(|| black_box(extract(doc, &column).grouped_words.len()))
        });

        let horizontal = SearchPattern::new("L1", PatternType::Horizontal)
            .with_tolerance(8, 10)
            .with_stop_words(["no-such-word"]);
        group.bench_with_input(BenchmarkId::new("horizontal", rows), &doc, |b, doc| {
            b.iter(|| black_box(extract(doc, &horizontal).grouped_words.len()))
        });

        let position =
            SearchPattern::new("200,70", PatternType::PositionBasedColumn).with_tolerance(8, 26);
        group.bench_with_input(BenchmarkId::new("position_column", rows), &doc, |b, doc| {
            b.iter(|| black_box(extract(doc, &position).grouped_words.len()))
        });
    }

    group.finish();
}

fn bench_batch(c: &mut Criterion) {
    let tier = bench_tier();
    let seed = bench_seed();

    let mut group = c.benchmark_group("extract_batch");
    configure_group(&mut group, tier);

    for &rows in row_counts(tier) {
        let doc = form_page(seed ^ 0xBA7C4, rows);
        let records: IndexMap<String, PatternRecord> = (0..rows)
            .map(|row| {
                let kind = if row % 2 == 0 { "VerticalColumn" } else { "Horizontal" };
                (format!("field_{row}"), record(&format!("L{row}"), kind))
            })
            .collect();
        let params = ExtractParams::default();

        group.throughput(Throughput::Elements(records.len() as u64));
        group.bench_with_input(BenchmarkId::new("fields", rows), &doc, |b, doc| {
            b.iter(|| black_box(extract_batch(doc, &records, &params).len()))
        });
    }

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let tier = bench_tier();
    let seed = bench_seed();

    let mut group = c.benchmark_group("merge_fragments");
    configure_group(&mut group, tier);

    for &rows in row_counts(tier) {
        let doc = form_page(seed ^ 0x3E26E, rows);
        group.throughput(Throughput::Elements(doc.len() as u64));
        group.bench_with_input(BenchmarkId::new("page", rows), &doc, |b, doc| {
            b.iter(|| {
                let merged = merge_fragments(doc, DEFAULT_GAP_TOLERANCE, DEFAULT_OVERLAP_THRESHOLD);
                black_box(merged.len())
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_field, bench_batch, bench_merge);
criterion_main!(benches);
