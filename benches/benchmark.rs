use criterion::{Criterion, criterion_group, criterion_main};
use gender_stats::{GenderClassifier, ModelConfig, TrainedModel, TrainingCorpus};

fn bench_train_builtin(c: &mut Criterion) {
    let corpus = TrainingCorpus::builtin().unwrap();

    c.bench_function("train builtin corpus", |b| {
        b.iter(|| {
            let _ = TrainedModel::train(&corpus, ModelConfig::default());
        })
    });
}

fn bench_predict_single(c: &mut Criterion) {
    let classifier = GenderClassifier::builtin().unwrap();

    c.bench_function("predict Samantha", |b| {
        b.iter(|| {
            let _ = classifier.predict_with_proba("Samantha");
        })
    });
}

fn bench_bulk_prediction(c: &mut Criterion) {
    let corpus = TrainingCorpus::builtin().unwrap();
    let classifier = GenderClassifier::train(&corpus, ModelConfig::default()).unwrap();
    let training: Vec<String> = corpus.iter().map(|(name, _)| name.to_string()).collect();
    let names: Vec<&String> = training.iter().cycle().take(10_000).collect();

    c.bench_function("bulk predict 10k names", |b| {
        b.iter(|| {
            for name in &names {
                let _ = classifier.classify(name.as_str());
            }
        });
    });
}

criterion_group!(
    benches,
    bench_train_builtin,
    bench_predict_single,
    bench_bulk_prediction
);
criterion_main!(benches);
