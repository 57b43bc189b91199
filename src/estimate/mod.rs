//! Distance estimation pipeline.
//!
//! - [`config`]: immutable run settings
//! - [`mle`]: maximum-likelihood search over candidate distances
//! - [`pair`]: per-contig grouping of alignments into neighbor estimates
//! - [`stream`]: lock-protected grouping of the sorted alignment stream
//! - [`output`]: list and dot rendering
//!
//! ## Threading
//!
//! [`estimate_distances`] starts a fixed number of workers that share one
//! [`AlignmentStream`]. Only reading the next batch and writing a finished
//! block of output are serialized. With more than one worker the order of
//! contigs in the output is not defined; the lines of one contig are always
//! written together.

pub mod config;
pub mod mle;
pub mod output;
pub mod pair;
pub mod stream;

use std::io::{self, BufRead, Write};
use std::thread;

use parking_lot::Mutex;
use thiserror::Error;
use tracing::{info, warn};

use crate::core::contig::ContigTable;
use crate::core::histogram::{Histogram, BARPLOT_WIDTH};
use crate::core::pdf::Pdf;
use crate::core::types::LibraryOrientation;
use crate::estimate::config::EstimatorConfig;
use crate::estimate::pair::ContigPairEstimator;
use crate::estimate::stream::{AlignmentStream, StreamError, StreamStats};

/// Share of each histogram tail discarded before building the model
pub const TRIM_FRACTION: f64 = 0.0001;

#[derive(Error, Debug)]
pub enum EstimateError {
    #[error(transparent)]
    Stream(#[from] StreamError),

    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

/// The fragment-size model and the library orientation it implies
#[derive(Debug, Clone)]
pub struct FragmentModel {
    pub pdf: Pdf,
    pub orientation: LibraryOrientation,
}

#[allow(clippy::cast_precision_loss)]
fn percent(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * part as f64 / total as f64
    }
}

/// Detect the library orientation, orient the histogram so fragment sizes
/// are positive, trim its tails, and build the probability model.
///
/// # Panics
///
/// Panics if no positive fragment sizes remain after orientation.
#[must_use]
pub fn build_model(hist: &Histogram) -> FragmentModel {
    let num_rf = hist.count(i32::MIN, 0);
    let num_fr = hist.count(1, i32::MAX);
    let total = hist.size();
    info!(
        "Mate orientation FR: {num_fr} ({:.3}%) RF: {num_rf} ({:.3}%)",
        percent(num_fr, total),
        percent(num_rf, total)
    );

    let orientation = LibraryOrientation::detect(hist);
    let oriented = if orientation.is_reverse_forward() {
        warn!("The mate pairs of this library are oriented reverse-forward (RF).");
        hist.negate()
    } else {
        hist.clone()
    };

    let trimmed = oriented.erase_negative().trim_fraction(TRIM_FRACTION);
    info!(
        "Stats mean: {:.4} median: {} sd: {:.4} n: {} min: {} max: {}",
        trimmed.mean(),
        trimmed.median(),
        trimmed.sd(),
        trimmed.size(),
        trimmed.minimum(),
        trimmed.maximum()
    );
    info!("{}", trimmed.barplot(BARPLOT_WIDTH));

    FragmentModel {
        pdf: Pdf::new(&trimmed),
        orientation,
    }
}

/// Estimate distances for every contig in `reader` and write them to `out`.
///
/// `reader` must be positioned after the SAM header. `config.orientation`
/// must already reflect the histogram.
///
/// # Errors
///
/// Returns `EstimateError::Stream` if the input is unsorted or unreadable,
/// or `EstimateError::Io` if the output cannot be written.
pub fn estimate_distances<R, W>(
    reader: R,
    contigs: &ContigTable,
    pdf: &Pdf,
    config: &EstimatorConfig,
    out: &mut W,
    threads: usize,
) -> Result<StreamStats, EstimateError>
where
    R: BufRead + Send,
    W: Write + Send + ?Sized,
{
    output::write_header(out, config)?;

    let stream = AlignmentStream::new(reader, contigs, config.min_mapq);
    let estimator = ContigPairEstimator::new(config, pdf, contigs);
    let out = Mutex::new(out);

    thread::scope(|scope| -> Result<(), EstimateError> {
        let mut workers = Vec::with_capacity(threads.max(1));
        for _ in 0..threads.max(1) {
            workers.push(scope.spawn(|| run_worker(&stream, &estimator, contigs, config, &out)));
        }

        let mut result = Ok(());
        for worker in workers {
            match worker.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    if result.is_ok() {
                        result = Err(e);
                    }
                }
                Err(payload) => std::panic::resume_unwind(payload),
            }
        }
        result
    })?;

    let out = out.into_inner();
    output::write_footer(out, config)?;
    out.flush()?;

    let stats = stream.stats();
    info!(
        "Read {} alignments, {} linked contigs, {} batches",
        stats.records, stats.admitted, stats.batches
    );
    Ok(stats)
}

fn run_worker<R, W>(
    stream: &AlignmentStream<'_, R>,
    estimator: &ContigPairEstimator<'_>,
    contigs: &ContigTable,
    config: &EstimatorConfig,
    out: &Mutex<&mut W>,
) -> Result<(), EstimateError>
where
    R: BufRead,
    W: Write + ?Sized,
{
    while let Some(batch) = stream.next_batch()? {
        let Some(estimates) = estimator.estimate_batch(&batch) else {
            continue;
        };
        let block = output::format_block(&estimates, contigs, config.format);
        if block.is_empty() {
            continue;
        }
        if let Err(e) = out.lock().write_all(block.as_bytes()) {
            stream.abort();
            return Err(e.into());
        }
    }
    Ok(())
}
