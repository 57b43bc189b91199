use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use tracing::{info, warn};

use crate::core::types::OutputFormat;
use crate::estimate::config::{EstimatorConfig, DEFAULT_MIN_MAPQ};
use crate::estimate::{build_model, estimate_distances};
use crate::parsing::histogram::load_histogram;
use crate::parsing::input::{open_reader, open_writer};
use crate::parsing::sam::read_header;
use crate::utils::validation::{check_seed_length, validate_config};

#[derive(Args)]
pub struct EstimateArgs {
    /// Distribution of fragment sizes (`value count` per line)
    #[arg(value_name = "HIST")]
    pub hist: PathBuf,

    /// Alignments between contigs, sorted by contig (SAM, optionally gzipped).
    /// Use '-' for stdin
    #[arg(value_name = "PAIR", default_value = "-")]
    pub pairs: PathBuf,

    /// k-mer size
    #[arg(short = 'k', long = "kmer", value_parser = clap::value_parser!(u32).range(1..))]
    pub kmer: u32,

    /// Minimum length of the seed contigs
    #[arg(short = 's', long = "seed-length", value_parser = clap::value_parser!(u32).range(1..))]
    pub seed_length: u32,

    /// Minimum number of pairs
    #[arg(short = 'n', long = "npairs", value_parser = clap::value_parser!(u32).range(1..))]
    pub npairs: u32,

    /// Ignore alignments with mapping quality less than this threshold
    #[arg(short = 'q', long = "min-mapq", default_value_t = DEFAULT_MIN_MAPQ)]
    pub min_mapq: u8,

    /// Write result to FILE instead of stdout
    #[arg(short = 'o', long = "out", value_name = "FILE")]
    pub out: Option<PathBuf>,

    /// Output overlaps in dot format
    #[arg(long)]
    pub dot: bool,

    /// Use N parallel threads
    #[arg(short = 'j', long = "threads", value_name = "N", default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub threads: u32,
}

impl EstimateArgs {
    fn config(&self) -> EstimatorConfig {
        let format = if self.dot {
            OutputFormat::Dot
        } else {
            OutputFormat::List
        };
        EstimatorConfig::new(self.kmer, self.seed_length, self.npairs)
            .with_min_mapq(self.min_mapq)
            .with_format(format)
    }
}

/// Execute the distance estimation
///
/// # Errors
///
/// Returns an error if an input cannot be read or parsed, the alignments are
/// not sorted by contig, or the output cannot be written.
#[allow(clippy::needless_pass_by_value)] // CLI entry point, values from clap
pub fn run(args: EstimateArgs) -> anyhow::Result<()> {
    let config = args.config();
    validate_config(&config)?;
    if let Some(warning) = check_seed_length(config.kmer, config.seed_length) {
        warn!("{warning}");
    }

    let reader = open_reader(&args.pairs)
        .with_context(|| format!("cannot open `{}'", args.pairs.display()))?;
    let (contigs, reader) = read_header(reader)
        .with_context(|| format!("cannot read the SAM header of `{}'", args.pairs.display()))?;
    info!("Read {} contig lengths", contigs.len());

    let hist = load_histogram(&args.hist)
        .with_context(|| format!("cannot load histogram `{}'", args.hist.display()))?;
    let model = build_model(&hist);
    let config = config.with_orientation(model.orientation);

    let mut out = open_writer(args.out.as_deref()).with_context(|| match &args.out {
        Some(path) => format!("cannot create `{}'", path.display()),
        None => "cannot open stdout".to_string(),
    })?;

    estimate_distances(
        reader,
        &contigs,
        &model.pdf,
        &config,
        &mut *out,
        args.threads as usize,
    )
    .with_context(|| format!("failed to estimate distances from `{}'", args.pairs.display()))?;

    Ok(())
}
