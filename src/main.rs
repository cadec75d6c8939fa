use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gender_stats::{
    CorpusFormat, GenderClassifier, GenderLabel, GenderStats, LabeledName, ModelConfig,
    TrainedModel, Trainer, TrainingCorpus, evaluate, first_name, train_test_split,
};
use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;

#[derive(Parser, Debug)]
#[command(version, about = "Estimate the gender split of contributor names.")]
struct Args {
    /// A MessagePack model written by `train`. Combined with --corpus, the model is
    /// retrained whenever the corpus file is newer.
    #[arg(long, global = true)]
    model: Option<PathBuf>,

    /// Train on this CSV instead of the built-in corpus
    #[arg(long, global = true)]
    corpus: Option<PathBuf>,

    /// The corpus has `name,male_count,female_count` rows instead of `name,gender`
    #[arg(long, global = true)]
    counts: bool,

    /// The character n-gram length [default: 3]. A loaded model keeps its own.
    #[arg(long, global = true)]
    ngram: Option<usize>,

    /// The additive smoothing constant [default: 1.0]. A loaded model keeps its own.
    #[arg(long, global = true)]
    smoothing: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the gender split of a list of display names, one per line
    Stats {
        /// Read names from this file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,

        /// Names predicted with a lower probability are counted as unknown
        #[arg(long, default_value = "0")]
        min_confidence: f64,
    },

    /// Classify names given as arguments, or interactively when none are given
    Predict { names: Vec<String> },

    /// Train a model and write it to a file
    Train {
        /// The file to write the trained model to
        #[arg(long)]
        output: PathBuf,
    },

    /// Measure holdout accuracy and list the most informative features
    Evaluate {
        /// The fraction of each class held out for testing
        #[arg(long, default_value = "0.2")]
        test_ratio: f64,

        /// Seed for the shuffle; random when omitted
        #[arg(long)]
        seed: Option<u64>,

        /// The number of features to show
        #[arg(long, default_value = "10")]
        top: usize,
    },
}

impl Args {
    fn config(&self) -> ModelConfig {
        let defaults = ModelConfig::default();
        ModelConfig::new()
            .with_ngram(self.ngram.unwrap_or(defaults.ngram))
            .with_smoothing(self.smoothing.unwrap_or(defaults.smoothing))
    }

    /// Explicit `--ngram`/`--smoothing` values that disagree with a loaded model.
    fn ignored_overrides(&self, loaded: &ModelConfig) -> Vec<String> {
        let mut ignored = vec![];
        if let Some(ngram) = self.ngram.filter(|&n| n != loaded.ngram) {
            ignored.push(format!("--ngram {ngram} (model uses {})", loaded.ngram));
        }
        if let Some(smoothing) = self.smoothing.filter(|&a| a != loaded.smoothing) {
            ignored.push(format!(
                "--smoothing {smoothing} (model uses {})",
                loaded.smoothing
            ));
        }
        ignored
    }

    fn format(&self) -> CorpusFormat {
        if self.counts {
            CorpusFormat::Counts
        } else {
            CorpusFormat::Labelled
        }
    }

    fn load_corpus(&self) -> Result<TrainingCorpus> {
        match &self.corpus {
            Some(path) => TrainingCorpus::load(path, self.format())
                .with_context(|| format!("failed to load corpus {path:?}")),
            None => Ok(TrainingCorpus::builtin()?),
        }
    }

    fn load_classifier(&self) -> Result<GenderClassifier> {
        let model = match (&self.model, &self.corpus) {
            (Some(model_path), Some(corpus_path)) => TrainedModel::load_or_train_if_stale(
                model_path,
                corpus_path,
                self.format(),
                self.config(),
            )
            .with_context(|| format!("failed to prepare model {model_path:?}"))?,
            (Some(model_path), None) => TrainedModel::load_from_file(model_path)
                .with_context(|| format!("failed to load model {model_path:?}"))?,
            (None, _) => TrainedModel::train(&self.load_corpus()?, self.config())?,
        };
        for ignored in self.ignored_overrides(model.config()) {
            warn!("ignoring {ignored}: settings come from the loaded model");
        }
        Ok(GenderClassifier::from_model(model))
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    match &args.command {
        Command::Stats {
            input,
            min_confidence,
        } => run_stats(&args, input.as_deref(), *min_confidence),
        Command::Predict { names } => run_predict(&args, names),
        Command::Train { output } => run_train(&args, output),
        Command::Evaluate {
            test_ratio,
            seed,
            top,
        } => run_evaluate(&args, *test_ratio, *seed, *top),
    }
}

fn run_stats(args: &Args, input: Option<&Path>, min_confidence: f64) -> Result<()> {
    let classifier = args.load_classifier()?;

    let reader: Box<dyn BufRead> = match input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open {path:?}"))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut names = vec![];
    for line in reader.lines() {
        names.push(first_name(Some(line?.as_str())));
    }
    info!("classifying {} names", names.len());

    let stats = GenderStats::collect(&classifier, names, min_confidence);
    print!("{stats}");
    Ok(())
}

fn print_prediction(classifier: &GenderClassifier, name: &str) {
    let (label, p_male, p_female) = classifier.predict_with_proba(name);
    println!(
        "{} is classified as {} (P_male = {:.2}%, P_female = {:.2}%)",
        name,
        label,
        p_male * 100.0,
        p_female * 100.0
    );
}

fn run_predict(args: &Args, names: &[String]) -> Result<()> {
    let classifier = args.load_classifier()?;

    if !names.is_empty() {
        for name in names {
            print_prediction(&classifier, name);
        }
        return Ok(());
    }

    let stdin = io::stdin();
    loop {
        print!("Enter a name to classify (or 'exit'): ");
        io::stdout().flush()?;
        let mut name = String::new();
        if stdin.read_line(&mut name)? == 0 {
            break;
        }
        let name = name.trim();

        if name.eq_ignore_ascii_case("exit") {
            break;
        }

        print_prediction(&classifier, name);
    }
    Ok(())
}

fn run_train(args: &Args, output: &Path) -> Result<()> {
    let corpus = args.load_corpus()?;
    let model = TrainedModel::train(&corpus, args.config())?;
    model
        .save_to_file(output)
        .with_context(|| format!("failed to save model to {output:?}"))?;
    println!(
        "Trained on {} names ({} features), saved to {:?}",
        corpus.len(),
        model.vocab_size(),
        output
    );
    Ok(())
}

fn run_evaluate(args: &Args, test_ratio: f64, seed: Option<u64>, top: usize) -> Result<()> {
    let corpus = args.load_corpus()?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let examples = corpus.examples();
    let (male, female): (Vec<LabeledName>, Vec<LabeledName>) = examples
        .into_iter()
        .partition(|e| e.label == GenderLabel::Male);

    let male_split = train_test_split(&male, test_ratio, &mut rng);
    let female_split = train_test_split(&female, test_ratio, &mut rng);

    let mut trainer = Trainer::new(args.config())?;
    trainer.add_examples(&male_split.train)?;
    trainer.add_examples(&female_split.train)?;
    let model = trainer.build()?;

    let train_set: Vec<LabeledName> = male_split
        .train
        .into_iter()
        .chain(female_split.train)
        .collect();
    let test_set: Vec<LabeledName> = male_split
        .test
        .into_iter()
        .chain(female_split.test)
        .collect();

    let train_eval = evaluate(&model, &train_set);
    let test_eval = evaluate(&model, &test_set);
    println!(
        "✅ Train accuracy: {:.2}% ({}/{})",
        train_eval.accuracy() * 100.0,
        train_eval.correct,
        train_eval.total
    );
    println!(
        "✅ Test accuracy: {:.2}% ({}/{})",
        test_eval.accuracy() * 100.0,
        test_eval.correct,
        test_eval.total
    );

    println!("Most Informative Features (smoothed log ratio):");
    for w in model.top_features(top) {
        println!(
            "{:>10} | male: {:>4}, female: {:>4}, favours {} by {:.2}",
            w.feature,
            w.male_count,
            w.female_count,
            w.favours(),
            w.log_ratio.abs()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_config_defaults_when_flags_omitted() {
        let args = parse(&["gender-stats", "predict", "Anna"]);
        assert_eq!(args.config(), ModelConfig::default());
        assert!(args.ignored_overrides(&ModelConfig::default()).is_empty());
    }

    #[test]
    fn test_flags_that_disagree_with_loaded_model_are_reported() {
        let args = parse(&[
            "gender-stats",
            "--model",
            "m.msgpack",
            "--ngram",
            "2",
            "predict",
            "Anna",
        ]);
        assert_eq!(args.config().ngram, 2);

        let ignored = args.ignored_overrides(&ModelConfig::default());
        assert_eq!(ignored, vec!["--ngram 2 (model uses 3)".to_string()]);

        let matching = ModelConfig::new().with_ngram(2);
        assert!(args.ignored_overrides(&matching).is_empty());
    }

    #[test]
    fn test_smoothing_override_is_reported() {
        let args = parse(&["gender-stats", "predict", "--smoothing", "0.5"]);
        let ignored = args.ignored_overrides(&ModelConfig::default());
        assert_eq!(ignored, vec!["--smoothing 0.5 (model uses 1)".to_string()]);
    }
}
