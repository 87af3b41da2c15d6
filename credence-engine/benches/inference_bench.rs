//! Forward-pass benchmarks over implication chains of increasing length.

use criterion::{criterion_group, criterion_main, Criterion};

use credence_engine::{Evidence, InferenceEngine};

fn bench_chain_inference(c: &mut Criterion) {
    for len in [10usize, 50, 200] {
        let mut engine = InferenceEngine::new(test_fixtures::long_chain(len));
        let mut evidence = Evidence::new();
        evidence.insert("v0".to_string(), 1.0);

        c.bench_function(&format!("chain_inference_{len}"), |b| {
            b.iter(|| engine.run(&evidence, None));
        });
    }
}

fn bench_training(c: &mut Criterion) {
    use credence_engine::TrainingExample;

    let mut engine = InferenceEngine::new(test_fixtures::learnable_link());
    let mut inputs = Evidence::new();
    inputs.insert("input".to_string(), 1.0);
    let mut targets = Evidence::new();
    targets.insert("output".to_string(), 0.95);
    let data = [TrainingExample::new(inputs, targets)];

    c.bench_function("train_single_rule_epoch", |b| {
        b.iter(|| engine.train(&data, 1));
    });
}

criterion_group!(benches, bench_chain_inference, bench_training);
criterion_main!(benches);
