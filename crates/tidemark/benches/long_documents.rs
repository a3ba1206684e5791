use criterion::{criterion_group, criterion_main, Criterion};

use tidemark::{Buffer, Extensions, Html, HtmlFlags, Parser};

fn build_document(paragraphs: usize) -> String {
    let mut doc = String::new();
    for i in 0..paragraphs {
        doc.push_str("## Section header\n\n");
        doc.push_str("Some *emphasized* prose with a [link](http://example.com \"t\") and ");
        doc.push_str("`inline code`, plus ~~corrections~~ where needed.\n\n");
        doc.push_str("- first item\n- second item with **bold** text\n\n");
        if i % 4 == 0 {
            doc.push_str("> a quoted aside\n> spanning two lines\n\n");
            doc.push_str("```rust\nfn bench() -> usize { 42 }\n```\n\n");
        }
    }
    doc
}

fn long_documents(c: &mut Criterion) {
    let document = build_document(400);
    let extensions = Extensions::TABLES
        | Extensions::FENCED_CODE
        | Extensions::STRIKETHROUGH
        | Extensions::AUTOLINK;

    let mut group = c.benchmark_group("long documents");
    group.bench_function("render html", |b| {
        let mut parser = Parser::new(Html::new(HtmlFlags::empty()), extensions);
        b.iter(|| {
            let mut out = Buffer::with_capacity(document.len());
            parser.render(document.as_bytes(), &mut out);
            out.len()
        })
    });
    group.finish();
}

fn short_inlines(c: &mut Criterion) {
    let content = "*this ***has some* various things* that** [create multiple elements](while/inline 'but without') taking _too_ much ![effort] to parse, and should `be a decent` test` ``of ``whether this works quickly.";

    let mut group = c.benchmark_group("inlines");
    group.bench_function("render html", |b| {
        let mut parser = Parser::new(Html::new(HtmlFlags::empty()), Extensions::empty());
        b.iter(|| {
            let mut out = Buffer::with_capacity(256);
            parser.render(content.as_bytes(), &mut out);
            out.len()
        })
    });
    group.finish();
}

criterion_group!(benches, long_documents, short_inlines);
criterion_main!(benches);
