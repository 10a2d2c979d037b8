//! Benchmarks for retab reconstruction performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic invoice text mixing every line shape.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use retab::write::SpreadsheetWriter;

/// Creates synthetic invoice text with the given number of item lines.
fn create_invoice_text(item_count: usize) -> String {
    let mut text = String::new();
    text.push_str("INVOICE SUMMARY\n");
    text.push_str("CODE  LABEL  UNIT  QTY  PRICE  TOTAL\n\n");

    for i in 0..item_count {
        match i % 3 {
            0 => text.push_str(&format!(
                "A{}  Widget {}  pcs  {}  10,50€  {},50€\n",
                i,
                i,
                i % 7 + 1,
                (i % 7 + 1) * 10
            )),
            1 => text.push_str(&format!(
                "B{} Cable reel {} m {},5 1,20 € 3,00 €\n",
                i,
                i,
                i % 9 + 1
            )),
            _ => text.push_str(&format!("C{}\t{}\t25/12/2024\t1.234,56 €\n", i, i + 2200)),
        }
    }

    text.push_str("\nThank you for your business\n");
    text
}

/// Benchmark reconstruction at various sizes.
fn bench_reconstruct(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct");
    let reconstructor = retab::TableReconstructor::new();

    for item_count in [10, 100, 1000].iter() {
        let text = create_invoice_text(*item_count);

        group.bench_function(format!("{}_items", item_count), |b| {
            b.iter(|| reconstructor.reconstruct(black_box(&text)));
        });
    }

    group.finish();
}

/// Benchmark single-line classification.
fn bench_classify(c: &mut Criterion) {
    let classifier = retab::reconstruct::LineClassifier::new();

    c.bench_function("classify_pattern_line", |b| {
        b.iter(|| classifier.classify(black_box("B7 Cable reel m 2,5 1,20 € 3,00 €")));
    });

    c.bench_function("classify_heading", |b| {
        b.iter(|| classifier.classify(black_box("INVOICE SUMMARY")));
    });
}

/// Benchmark workbook writing.
fn bench_xlsx_write(c: &mut Criterion) {
    let table = retab::reconstruct_table(&create_invoice_text(500));
    let widths = retab::estimate_column_widths(&table);
    let writer = retab::XlsxWriter::new();

    c.bench_function("xlsx_write_500_items", |b| {
        b.iter(|| writer.write(black_box(&table), &widths).unwrap());
    });
}

criterion_group!(benches, bench_reconstruct, bench_classify, bench_xlsx_write);
criterion_main!(benches);
