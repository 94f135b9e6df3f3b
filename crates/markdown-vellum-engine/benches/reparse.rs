use criterion::{criterion_group, criterion_main, Criterion};
use markdown_vellum_engine::{parse, parse_incremental, EditInfo};

fn generate_document(paragraphs: usize) -> String {
    let mut out = String::new();
    for i in 0..paragraphs {
        if i % 7 == 0 {
            out.push_str(&format!("## Section {i}\n\n"));
        }
        out.push_str(&format!(
            "Paragraph {i} with some *emphasis*, a [link](https://example.com/{i}) and `code`.\n\n"
        ));
    }
    out
}

fn bench_full_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("reparse");
    group.sample_size(30);

    for size in [10usize, 100] {
        let content = generate_document(size);
        group.bench_function(format!("full_{size}_blocks"), |b| {
            b.iter(|| {
                let doc = parse(std::hint::black_box(&content));
                std::hint::black_box(doc);
            });
        });
    }
    group.finish();
}

fn bench_incremental_edit(c: &mut Criterion) {
    let mut group = c.benchmark_group("reparse");
    group.sample_size(30);

    for size in [10usize, 100] {
        let content = generate_document(size);
        let doc = parse(&content);
        // One keystroke in the middle of the document.
        let pos = content.len() / 2;
        let edit = EditInfo::insert(pos, 1);
        let edited = format!("{}x{}", &content[..pos], &content[pos..]);
        group.bench_function(format!("incremental_{size}_blocks"), |b| {
            b.iter(|| {
                let updated = parse_incremental(
                    std::hint::black_box(&doc),
                    &content,
                    &edited,
                    edit,
                );
                std::hint::black_box(updated);
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_full_parse, bench_incremental_edit);
criterion_main!(benches);
