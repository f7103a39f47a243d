//! Benchmarks for docmap extraction performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic block streams and DOCX packages.

use std::io::{Cursor, Write};

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use docmap::mapping::{FieldMapper, TitleHints};
use docmap::model::Block;
use docmap::schema::{Field, Schema};

/// Creates a block stream with the given number of headed sections.
fn create_blocks(section_count: usize) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(section_count * 5);
    for i in 0..section_count {
        blocks.push(Block::heading(1 + (i % 3) as u8, format!("Section {}", i)));
        for p in 0..3 {
            blocks.push(Block::paragraph(format!(
                "Paragraph {} of section {} with some benchmark text content.",
                p, i
            )));
        }
        if i % 4 == 0 {
            blocks.push(Block::table((0..5).map(|r| {
                (0..4).map(move |c| format!("r{}c{}", r, c))
            })));
        }
    }
    blocks
}

/// Creates a minimal synthetic DOCX with the given number of sections.
fn create_test_docx(section_count: usize) -> Vec<u8> {
    let mut body = String::new();
    for i in 0..section_count {
        body.push_str(&format!(
            r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Section {}</w:t></w:r></w:p>"#,
            i
        ));
        body.push_str(&format!(
            r#"<w:p><w:r><w:t>Benchmark paragraph for section {}.</w:t></w:r></w:p>"#,
            i
        ));
    }
    let xml = format!(
        r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    );

    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("word/document.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    writer.write_all(xml.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

/// Benchmark section extraction at various sizes.
fn bench_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extraction");

    for section_count in [10, 100, 1000].iter() {
        let blocks = create_blocks(*section_count);

        group.bench_function(format!("{}_sections", section_count), |b| {
            b.iter(|| docmap::extract(black_box(&blocks)));
        });
    }

    group.finish();
}

/// Benchmark DOCX reading.
fn bench_docx_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("docx_parsing");

    for section_count in [10, 100].iter() {
        let data = create_test_docx(*section_count);

        group.bench_function(format!("{}_sections", section_count), |b| {
            b.iter(|| docmap::parse_bytes(black_box(&data)).unwrap());
        });
    }

    group.finish();
}

/// Benchmark title-hint seeding.
fn bench_suggestion(c: &mut Criterion) {
    let sections = docmap::extract(&create_blocks(200));
    let fields: Vec<Field> = (0..50).map(|i| Field::new(format!("field_{}", i))).collect();
    let schema = Schema::new(fields).unwrap();
    let mut hints = TitleHints::new();
    for i in 0..50 {
        hints.insert(format!("field_{}", i), format!("section {}", i * 4));
    }
    let mapper = FieldMapper::new(schema, sections);

    c.bench_function("suggest_correspondence", |b| {
        b.iter(|| mapper.suggest_correspondence(black_box(&hints)));
    });
}

criterion_group!(benches, bench_extraction, bench_docx_parsing, bench_suggestion);
criterion_main!(benches);
