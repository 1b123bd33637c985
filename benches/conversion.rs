//! Benchmarks for the HTML to LaTeX conversion pipeline.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use archtex::dom::parse_html;
use archtex::footnotes::build_index;
use archtex::latex::render;
use archtex::{Config, convert_html, convert_html_bytes};

const PAGE_BYTES: &[u8] = include_bytes!("../tests/fixtures/wage-labour.htm");

/// A long chapter: the fixture body repeated, with notes at the end.
fn long_chapter(sections: usize) -> String {
    let mut html = String::from("<html><body><div id=\"content\">");
    for i in 1..=sections {
        html.push_str(&format!(
            "<h3>Section {i}</h3><p>The capitalist buys labour power<a href=\"#n{i}\">[{i}]</a> \
             and the worker sells it; see also [{i}].</p>\
             <table><tr><td>First line {i}<br>Second line<br>Third line<br>Fourth line</td></tr></table>"
        ));
    }
    html.push_str("<h3>Notes</h3>");
    for i in 1..=sections {
        html.push_str(&format!(
            "<p><a name=\"n{i}\"></a>{i}. Note number {i} on the sale of labour power.</p>"
        ));
    }
    html.push_str("</div></body></html>");
    html
}

fn bench_parse(c: &mut Criterion) {
    let html = String::from_utf8_lossy(PAGE_BYTES).into_owned();
    c.bench_function("parse_html", |b| {
        b.iter(|| parse_html(&html));
    });
}

fn bench_build_index(c: &mut Criterion) {
    let html = long_chapter(200);
    let config = Config::default();
    c.bench_function("build_index_200_notes", |b| {
        b.iter(|| {
            let mut dom = parse_html(&html);
            build_index(&mut dom, &config)
        });
    });
}

fn bench_render(c: &mut Criterion) {
    let html = long_chapter(200);
    let dom = parse_html(&html);
    c.bench_function("render_200_sections", |b| {
        b.iter(|| render(&dom, dom.document(), ""));
    });
}

fn bench_convert(c: &mut Criterion) {
    let config = Config::default();
    c.bench_function("convert_page", |b| {
        b.iter(|| convert_html_bytes(PAGE_BYTES, "https://www.marxists.org/", &config));
    });

    let chapter = long_chapter(200);
    c.bench_function("convert_long_chapter", |b| {
        b.iter(|| convert_html(&chapter, "", &config));
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_build_index,
    bench_render,
    bench_convert
);
criterion_main!(benches);
