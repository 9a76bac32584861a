use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pmkb_bot::config::BotConfig;
use pmkb_bot::pmkb::{Gene, Interpretation, PrimarySite, TumorType, Variant};
use pmkb_bot::presentation::{FixedImage, PromptCatalog, ResultPresenter};
use pmkb_bot::RelevanceRanker;
use std::sync::Arc;

/// ランキングと表示処理のベンチマーク
///
/// 検索結果の件数に対するスケーリングを測定します。

const GENES: [&str; 5] = ["EGFR", "BRAF", "KRAS", "ALK", "IDH1"];

fn interpretations(count: usize) -> Vec<Interpretation> {
    (0..count)
        .map(|i| Interpretation {
            id: i as i64,
            gene: Some(Gene {
                id: (i % GENES.len()) as i64,
                name: GENES[i % GENES.len()].to_string(),
            }),
            text: format!("Interpretation text {}", i),
            tier: Some((i % 3 + 1) as i64),
            variants: (0..i % 4)
                .map(|v| Variant {
                    name: format!("V{}E", 600 + v),
                    ..Variant::default()
                })
                .collect(),
            tumor_types: vec![TumorType {
                id: 1,
                name: "Lung adenocarcinoma".to_string(),
            }],
            primary_sites: vec![PrimarySite {
                id: 1,
                name: "Lung".to_string(),
            }],
            ..Interpretation::default()
        })
        .collect()
}

fn bench_rank(c: &mut Criterion) {
    let ranker = RelevanceRanker::default();
    let mut group = c.benchmark_group("rank");

    for size in [10, 100, 1000].iter() {
        let items = interpretations(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.iter(|| ranker.rank(black_box(items), black_box("BRAF V601E lung")))
        });
    }

    group.finish();
}

fn bench_rank_and_present(c: &mut Criterion) {
    let ranker = RelevanceRanker::default();
    let presenter = ResultPresenter::from_config(&BotConfig::default(), Arc::new(PromptCatalog::default()))
        .with_images(Arc::new(FixedImage("http://localhost/card.jpg".to_string())));
    let mut group = c.benchmark_group("rank_and_present");

    for size in [10, 100, 1000].iter() {
        let items = interpretations(*size);
        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.iter(|| {
                let ranked = ranker.rank(black_box(items), "EGFR lung");
                presenter.present(&ranked, "EGFR lung")
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_rank, bench_rank_and_present);
criterion_main!(benches);
