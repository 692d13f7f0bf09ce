use criterion::{criterion_group, criterion_main, Criterion};

use eml2pdf::export::layout::{layout_email, wrap_text, PageGeometry};
use eml2pdf::model::mail::{EmailHeaders, FlatEmailContent};
use eml2pdf::parser::html::html_to_text;

fn long_body() -> String {
    (0..2000)
        .map(|i| format!("Paragraph {i} keeps going well past the ninety character limit so that it wraps at least once."))
        .collect::<Vec<_>>()
        .join("\n")
}

fn bench_wrap(c: &mut Criterion) {
    let body = long_body();
    c.bench_function("wrap_long_body", |b| {
        b.iter(|| body.lines().map(|l| wrap_text(l, 90).len()).sum::<usize>())
    });
}

fn bench_layout(c: &mut Criterion) {
    let content = FlatEmailContent {
        headers: EmailHeaders {
            subject: "Quarterly report".into(),
            sender: "sender@example.com".into(),
            recipient: "to@example.com".into(),
            date: "Thu, 04 Jan 2024 10:00:00 +0000".into(),
        },
        body: long_body(),
    };
    let geometry = PageGeometry::default();

    c.bench_function("layout_long_email", |b| {
        b.iter(|| layout_email(&content, &[], &geometry).len())
    });
}

fn bench_html_to_text(c: &mut Criterion) {
    let html = format!(
        "<html><head><style>p {{ color: red; }}</style></head><body>{}</body></html>",
        (0..500)
            .map(|i| format!("<p>Item <b>{i}</b> of the newsletter</p>"))
            .collect::<String>()
    );
    c.bench_function("html_to_text_newsletter", |b| b.iter(|| html_to_text(&html)));
}

criterion_group!(benches, bench_wrap, bench_layout, bench_html_to_text);
criterion_main!(benches);
