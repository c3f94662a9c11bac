use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use cowarp_dissim::{Measure, pairwise};
use cowarp_io::{ExperimentName, ResultWriter, SignalReader};
use cowarp_warp::{
    BatchOutcome, CowConfig, DegeneratePolicy, FallbackPolicy, ReferenceStrategy, Segmentation,
    TerminalSample,
};

#[derive(Parser)]
#[command(name = "cowarp")]
#[command(about = "Correlation Optimized Warping of chromatographic and spectral profiles")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

#[derive(Subcommand)]
enum Command {
    /// Warp every signal in a CSV onto a common reference
    Align {
        /// Path to the input CSV file (`id,x0,...,xn`)
        #[arg(long)]
        data: PathBuf,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Reference strategy: "mean", "median", or "bestcorr"
        #[arg(long, default_value = "bestcorr")]
        reference: String,

        /// Points per segment for automatic segmentation
        #[arg(long, default_value_t = 15)]
        segment_size: usize,

        /// Explicit sample breakpoints, comma separated (overrides --segment-size)
        #[arg(long, value_delimiter = ',', requires = "reference_boundaries")]
        sample_boundaries: Option<Vec<usize>>,

        /// Explicit reference breakpoints, comma separated
        #[arg(long, value_delimiter = ',', requires = "sample_boundaries")]
        reference_boundaries: Option<Vec<usize>>,

        /// Maximum boundary displacement per segment
        #[arg(long, default_value_t = 3)]
        slack: usize,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Report infeasible samples instead of keeping them unaligned
        #[arg(long, default_value_t = false)]
        report_infeasible: bool,

        /// Use the true last sample value for the final output point
        #[arg(long, default_value_t = false)]
        exact_terminal: bool,

        /// Exclude zero-variance segment pairs from the search instead of scoring them 0
        #[arg(long, default_value_t = false)]
        reject_degenerate: bool,
    },

    /// Compute pairwise dissimilarities between every signal in a CSV
    Dissimilarity {
        /// Path to the input CSV file (`id,x0,...,xn`)
        #[arg(long)]
        data: PathBuf,

        /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
        #[arg(long)]
        experiment: String,

        /// Measure: "nominal", "ordinal", "presence", or "correlation"
        #[arg(long, default_value = "nominal")]
        measure: String,

        /// Output directory for result files
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct AlignOutput {
    experiment: String,
    reference: String,
    slack: usize,
    n_samples: usize,
    n_aligned: usize,
    n_fallback: usize,
    n_infeasible: usize,
    mean_score: Option<f64>,
    aligned_csv: PathBuf,
    report: PathBuf,
}

#[derive(Serialize)]
struct DissimilarityOutput {
    experiment: String,
    measure: &'static str,
    n_samples: usize,
    min: Option<f64>,
    max: Option<f64>,
    matrix: PathBuf,
}

fn parse_reference_strategy(s: &str) -> Result<ReferenceStrategy> {
    match s {
        "mean" => Ok(ReferenceStrategy::Mean),
        "median" => Ok(ReferenceStrategy::Median),
        "bestcorr" => Ok(ReferenceStrategy::BestCorrelation),
        other => anyhow::bail!("unknown reference strategy: {other} (expected mean, median, or bestcorr)"),
    }
}

fn parse_measure(s: &str) -> Result<Measure> {
    match s {
        "nominal" => Ok(Measure::Nominal),
        "ordinal" => Ok(Measure::Ordinal),
        "presence" => Ok(Measure::Presence),
        "correlation" => Ok(Measure::Correlation),
        other => anyhow::bail!(
            "unknown measure: {other} (expected nominal, ordinal, presence, or correlation)"
        ),
    }
}

fn build_segmentation(
    segment_size: usize,
    sample_boundaries: Option<Vec<usize>>,
    reference_boundaries: Option<Vec<usize>>,
) -> Result<Segmentation> {
    match (sample_boundaries, reference_boundaries) {
        (Some(sample), Some(reference)) => Ok(Segmentation::from_boundaries(&sample, &reference)
            .context("invalid segment boundaries")?),
        _ => Ok(Segmentation::Auto { segment_size }),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Align {
            data,
            experiment,
            reference,
            segment_size,
            sample_boundaries,
            reference_boundaries,
            slack,
            output_dir,
            report_infeasible,
            exact_terminal,
            reject_degenerate,
        } => {
            let strategy = parse_reference_strategy(&reference)?;
            let segmentation =
                build_segmentation(segment_size, sample_boundaries, reference_boundaries)?;
            let experiment_name = ExperimentName::new(experiment.clone())?;

            let dataset = SignalReader::new(&data)
                .read()
                .context("failed to read input CSV")?;

            let reference_signal = strategy
                .select_reference(&dataset.signals)
                .context("reference selection failed")?;

            let mut config = CowConfig::new(slack, segmentation)?;
            if exact_terminal {
                config = config.with_terminal_sample(TerminalSample::LastSample);
            }
            if report_infeasible {
                config = config.with_fallback(FallbackPolicy::Report);
            }
            if reject_degenerate {
                config = config.with_degenerate_policy(DegeneratePolicy::Reject);
            }

            let outcomes = config
                .align_batch(&dataset.signals, &reference_signal)
                .context("alignment failed")?;

            let writer = ResultWriter::new(&output_dir, experiment_name)?;
            let aligned_csv = writer.write_aligned(&dataset.sample_ids, &outcomes)?;
            let report = writer.write_alignment(
                &dataset.sample_ids,
                &outcomes,
                &reference_signal,
                &reference,
                &config,
            )?;

            let scores: Vec<f64> = outcomes
                .iter()
                .filter_map(|o| match o {
                    BatchOutcome::Aligned(aligned) => Some(aligned.score.value()),
                    _ => None,
                })
                .collect();
            let mean_score =
                (!scores.is_empty()).then(|| scores.iter().sum::<f64>() / scores.len() as f64);

            let output = AlignOutput {
                experiment,
                reference,
                slack,
                n_samples: outcomes.len(),
                n_aligned: scores.len(),
                n_fallback: outcomes
                    .iter()
                    .filter(|o| matches!(o, BatchOutcome::Fallback { .. }))
                    .count(),
                n_infeasible: outcomes
                    .iter()
                    .filter(|o| matches!(o, BatchOutcome::Infeasible { .. }))
                    .count(),
                mean_score,
                aligned_csv,
                report,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Dissimilarity {
            data,
            experiment,
            measure,
            output_dir,
        } => {
            let measure = parse_measure(&measure)?;
            let experiment_name = ExperimentName::new(experiment.clone())?;

            let dataset = SignalReader::new(&data)
                .read()
                .context("failed to read input CSV")?;

            let matrix = pairwise(&dataset.signals, measure)
                .context("dissimilarity computation failed")?;

            let writer = ResultWriter::new(&output_dir, experiment_name)?;
            let path = writer.write_dissimilarity(&dataset.sample_ids, &matrix)?;

            let values = || matrix.iter().map(|(_, _, d)| d);
            let output = DissimilarityOutput {
                experiment,
                measure: measure.name(),
                n_samples: matrix.len(),
                min: values().min_by(f64::total_cmp),
                max: values().max_by(f64::total_cmp),
                matrix: path,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}
