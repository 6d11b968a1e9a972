//! zh-similarity - similarity analysis for Chinese documents
//!
//! Documents come from positional arguments, `--file` paths (one document per
//! file) or stdin (one document per line).

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Instant;

use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use zh_text_similarity::logging;
use zh_text_similarity::{AnalyzerConfig, SimilarityError, SimilarityMethod, TextSimilarityAnalyzer};

/// Multi-method similarity for Chinese documents
#[derive(Parser, Debug)]
#[command(name = "zh-similarity")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// TOML configuration file
    #[arg(long, short, global = true, env = "ZH_SIMILARITY_CONFIG")]
    config: Option<PathBuf>,

    /// Emit JSON
    #[arg(long, global = true, conflicts_with = "cbor")]
    json: bool,

    /// Emit CBOR (binary)
    #[arg(long, global = true)]
    cbor: bool,

    /// Write the result to a file instead of stdout
    #[arg(long, short, global = true)]
    output: Option<PathBuf>,

    /// Debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Log level or filter (e.g. `info`, `zh_text_similarity=trace`)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Score every pair with all methods
    Analyze {
        #[command(flatten)]
        input: InputArgs,

        /// Print network edges above this score (human output)
        #[arg(long)]
        network_threshold: Option<f64>,
    },
    /// Most similar pairs by one method
    Rank {
        #[command(flatten)]
        input: InputArgs,

        /// semantic, tfidf, jaccard, word_overlap or edit_distance
        #[arg(long, short)]
        method: Option<SimilarityMethod>,

        #[arg(long, short = 'k')]
        top_k: Option<usize>,
    },
    /// Group documents around seeds (semantic or tfidf)
    Cluster {
        #[command(flatten)]
        input: InputArgs,

        #[arg(long, short)]
        method: Option<SimilarityMethod>,

        #[arg(long, short)]
        threshold: Option<f64>,
    },
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Document texts
    texts: Vec<String>,

    /// Read a document from a file (repeatable)
    #[arg(long = "file", short = 'f')]
    files: Vec<PathBuf>,

    /// Comma separated labels, one per document
    #[arg(long, value_delimiter = ',')]
    labels: Option<Vec<String>>,
}

fn main() -> ExitCode {
    let start = Instant::now();
    let cli = Cli::parse();

    if let Err(e) = logging::init_tracing(cli.verbose, cli.log_level.as_deref(), cli.log_json) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    let result = run(&cli);
    tracing::debug!(elapsed = ?start.elapsed(), "finished");

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            if cli.json {
                eprintln!("{}", e.to_json());
            } else {
                eprintln!("error: {}", e);
            }
            if e.is_precondition() {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: &Cli) -> Result<(), SimilarityError> {
    let config = match &cli.config {
        Some(path) => AnalyzerConfig::load(path)?,
        None => AnalyzerConfig::default(),
    };
    let defaults = config.defaults.clone();
    let analyzer = TextSimilarityAnalyzer::new(config)?;

    match &cli.command {
        Command::Analyze {
            input,
            network_threshold,
        } => {
            let (texts, labels) = read_input(input)?;
            let report = analyzer.comprehensive_similarity_analysis(&texts, labels.as_deref())?;
            if cli.json || cli.cbor {
                return emit(cli, &report);
            }
            let mut text = report.to_string();
            let threshold = network_threshold.unwrap_or(defaults.network_threshold);
            text.push_str(&format!("\nnetwork edges (> {:.3}):\n", threshold));
            for edge in report.network_edges(threshold) {
                text.push_str(&format!(
                    "  {} -- {}  {:.3}\n",
                    report.labels[edge.source], report.labels[edge.target], edge.weight
                ));
            }
            write_human(cli, &text)
        }
        Command::Rank {
            input,
            method,
            top_k,
        } => {
            let (texts, labels) = read_input(input)?;
            let pairs = analyzer.find_most_similar_pairs(
                &texts,
                labels.as_deref(),
                method.unwrap_or(defaults.method),
                top_k.unwrap_or(defaults.top_k),
            )?;
            if cli.json || cli.cbor {
                return emit(cli, &pairs);
            }
            let text: String = pairs
                .iter()
                .enumerate()
                .map(|(rank, pair)| format!("{:>3}. {}\n", rank + 1, pair))
                .collect();
            write_human(cli, &text)
        }
        Command::Cluster {
            input,
            method,
            threshold,
        } => {
            let (texts, labels) = read_input(input)?;
            let clusters = analyzer.cluster_similar_texts(
                &texts,
                labels.as_deref(),
                method.unwrap_or(defaults.method),
                threshold.unwrap_or(defaults.cluster_threshold),
            )?;
            if cli.json || cli.cbor {
                return emit(cli, &clusters);
            }
            let text: String = clusters
                .iter()
                .enumerate()
                .map(|(i, cluster)| format!("cluster {}: {}\n", i + 1, cluster))
                .collect();
            write_human(cli, &text)
        }
    }
}

/// Texts in argument order, then files, or stdin lines when neither is given
fn read_input(input: &InputArgs) -> Result<(Vec<String>, Option<Vec<String>>), SimilarityError> {
    let mut texts = input.texts.clone();
    for path in &input.files {
        texts.push(read_document(path)?);
    }
    if texts.is_empty() {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let line = line?;
            let line = line.trim();
            if !line.is_empty() {
                texts.push(line.to_string());
            }
        }
    }
    tracing::debug!(documents = texts.len(), "read input");
    Ok((texts, input.labels.clone()))
}

fn read_document(path: &Path) -> Result<String, SimilarityError> {
    let content = fs::read_to_string(path)?;
    Ok(content.trim().to_string())
}

fn emit<T: Serialize>(cli: &Cli, value: &T) -> Result<(), SimilarityError> {
    let bytes = if cli.cbor {
        serde_cbor::to_vec(value)?
    } else {
        let mut json = serde_json::to_vec_pretty(value)?;
        json.push(b'\n');
        json
    };
    write_bytes(cli, &bytes)
}

fn write_human(cli: &Cli, text: &str) -> Result<(), SimilarityError> {
    write_bytes(cli, text.as_bytes())
}

fn write_bytes(cli: &Cli, bytes: &[u8]) -> Result<(), SimilarityError> {
    match &cli.output {
        Some(path) => {
            fs::write(path, bytes)?;
            tracing::info!(path = %path.display(), "wrote result");
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_rank_arguments() {
        let cli = Cli::try_parse_from([
            "zh-similarity",
            "rank",
            "--method",
            "word_overlap",
            "-k",
            "3",
            "--labels",
            "a,b",
            "今天天氣很好",
            "今日天氣晴朗",
        ])
        .unwrap();
        match cli.command {
            Command::Rank {
                input,
                method,
                top_k,
            } => {
                assert_eq!(method, Some(SimilarityMethod::WordOverlap));
                assert_eq!(top_k, Some(3));
                assert_eq!(input.texts.len(), 2);
                assert_eq!(input.labels, Some(vec!["a".to_string(), "b".to_string()]));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn rejects_unknown_method() {
        let result = Cli::try_parse_from(["zh-similarity", "rank", "--method", "cosine", "x", "y"]);
        assert!(result.is_err());
    }
}
