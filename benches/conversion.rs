//! Benchmarks for the two-pass conversion pipeline.
//!
//! Run with: cargo bench

use std::fmt::Write;

use criterion::{Criterion, criterion_group, criterion_main};

use db2html::{ConvertOptions, convert, preparse};

/// A synthetic book with nested sections, figures, footnotes and tables.
fn sample_document(chapters: usize) -> String {
    let mut doc = String::from(
        "<book><bookinfo><title>Bench</title><author><firstname>A</firstname>\
         <surname>B</surname></author></bookinfo>",
    );
    for c in 0..chapters {
        let _ = write!(doc, "<chapter id=\"c{c}\"><title>Chapter {c}</title>");
        for s in 0..8 {
            let _ = write!(
                doc,
                "<sect1 id=\"c{c}s{s}\"><title>Section {s}</title>\
                 <para>Some <emphasis>text</emphasis> with a <xref linkend=\"c0s0\"/> \
                 and a note<footnote><para>note {c}.{s}</para></footnote>.</para>\
                 <figure id=\"f{c}_{s}\"><title>Figure</title><graphic fileref=\"img\"/></figure>\
                 <sect2><title>Deeper</title><itemizedlist><listitem><para>one</para></listitem>\
                 <listitem><para>two &amp; three</para></listitem></itemizedlist>\
                 <informaltable><tbody><row><entry>a</entry><entry/></row></tbody></informaltable>\
                 </sect2></sect1>"
            );
        }
        doc.push_str("</chapter>");
    }
    doc.push_str("</book>");
    doc
}

fn bench_preparse(c: &mut Criterion) {
    let doc = sample_document(20);
    c.bench_function("preparse", |b| {
        b.iter(|| preparse(&doc).unwrap());
    });
}

fn bench_convert_full(c: &mut Criterion) {
    let doc = sample_document(20);
    let options = ConvertOptions::new("bench.xml");
    c.bench_function("convert_full", |b| {
        b.iter(|| convert(&doc, &options).unwrap());
    });
}

fn bench_convert_section(c: &mut Criterion) {
    let doc = sample_document(20);
    let options = ConvertOptions::new("bench.xml").with_target_section("c10s4");
    c.bench_function("convert_section", |b| {
        b.iter(|| convert(&doc, &options).unwrap());
    });
}

criterion_group!(
    benches,
    bench_preparse,
    bench_convert_full,
    bench_convert_section
);
criterion_main!(benches);
