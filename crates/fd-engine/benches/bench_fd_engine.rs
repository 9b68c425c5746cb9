use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fd_engine::{fingerprint, normalize, similarity, AutoReviewer, Corpus, DecisionCache, DuplicateDetector, Escalator};
use fd_core::SimilarityConfig;
use rand::seq::SliceRandom;
use rand::Rng;

const WORDS: &[&str] = &[
    "the", "government", "free", "vaccine", "message", "share", "friends", "news", "water",
    "hot", "flu", "cure", "city", "bus", "route", "phone", "claim", "rumor", "check", "real",
    "這是", "假消息", "請", "不要", "轉傳", "謠言", "查證",
];

fn random_text(rng: &mut impl Rng, words: usize) -> String {
    (0..words)
        .map(|_| *WORDS.choose(rng).unwrap())
        .collect::<Vec<_>>()
        .join(" ")
}

fn bench_fingerprint(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let short = normalize(&random_text(&mut rng, 10));
    let long = normalize(&random_text(&mut rng, 60));

    c.bench_function("fingerprint_short", |b| b.iter(|| black_box(fingerprint(black_box(&short)))));
    c.bench_function("fingerprint_long", |b| b.iter(|| black_box(fingerprint(black_box(&long)))));
    c.bench_function("similarity_long", |b| {
        b.iter(|| black_box(similarity(black_box(&long), black_box(&short))))
    });
}

fn bench_lookup(c: &mut Criterion) {
    let mut rng = rand::thread_rng();
    let mut corpus = Corpus::default();
    for i in 0..10_000u32 {
        let words = rng.gen_range(5..50);
        corpus.add(random_text(&mut rng, words), i);
    }
    let queries: Vec<String> = (0..100).map(|_| random_text(&mut rng, 20)).collect();

    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let mut detector = DuplicateDetector::new(
        SimilarityConfig::default(),
        Escalator::new(DecisionCache::in_memory(false), AutoReviewer::new(false)),
    );

    c.bench_function("find_duplicate_10k_corpus", |b| {
        b.iter(|| {
            for q in &queries {
                let found = runtime.block_on(detector.find_duplicate(&corpus, q)).unwrap();
                black_box(found);
            }
        })
    });
}

criterion_group!(benches, bench_fingerprint, bench_lookup);
criterion_main!(benches);
