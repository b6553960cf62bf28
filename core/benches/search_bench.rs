use criterion::{criterion_group, criterion_main, Criterion};

use bmx_core::tokenizer::{Analyzer, TextConfig, TextPipeline};
use bmx_core::Engine;

const SAMPLE: &str = "Lexical retrieval ranks a fixed document collection \
against a query using term frequencies, inverse document frequency, and \
entropy weights derived from how peaked each token's distribution is.";

fn bench_analyze(c: &mut Criterion) {
    let pipeline = TextPipeline::new(&TextConfig::default()).unwrap();
    c.bench_function("analyze_sample", |b| b.iter(|| pipeline.analyze(SAMPLE)));
}

fn bench_search(c: &mut Criterion) {
    let engine = Engine::new(&TextConfig::default()).unwrap();
    engine.add_many((0..500).map(|i| {
        let text = format!(
            "document {i} talks about retrieval ranking entropy weights \
and token number {} with some filler prose",
            i % 37
        );
        (i.to_string(), text)
    }));
    c.bench_function("search_top10", |b| {
        b.iter(|| engine.search("retrieval entropy ranking", 10).unwrap())
    });
}

criterion_group!(benches, bench_analyze, bench_search);
criterion_main!(benches);
