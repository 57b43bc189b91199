//! Text output of distance estimates.
//!
//! List format, one line per primary contig, the two strands separated by ` ;`:
//!
//! ```text
//! ctg1 ctg2+,-12,8,9.4 ctg7-,150,22,5.7 ; ctg3+,40,5,12.0
//! ```
//!
//! Dot format, one edge per estimate inside a `digraph`:
//!
//! ```text
//! digraph dist {
//! graph [k=31 s=200 n=5]
//! "ctg1+" -> "ctg2+" [d=-12 e=9.4 n=8]
//! }
//! ```

use std::fmt::Write as _;
use std::io::{self, Write};

use crate::core::contig::{ContigNode, ContigTable};
use crate::core::types::{Estimate, OutputFormat};
use crate::estimate::config::EstimatorConfig;
use crate::estimate::pair::BatchEstimates;

/// `NAME±,distance,pairs,sd`
fn write_list_estimate(out: &mut String, estimate: &Estimate, contigs: &ContigTable) {
    let _ = write!(
        out,
        "{},{},{},{:.1}",
        estimate.contig.display(contigs),
        estimate.distance,
        estimate.num_pairs,
        estimate.std_dev
    );
}

/// Render one primary contig's estimates as a single list line
#[must_use]
pub fn format_list(estimates: &BatchEstimates, contigs: &ContigTable) -> String {
    let mut out = String::from(contigs.name(estimates.contig));
    for (sense, group) in estimates.by_sense.iter().enumerate() {
        if sense == 1 {
            out.push_str(" ;");
        }
        for estimate in group {
            out.push(' ');
            write_list_estimate(&mut out, estimate, contigs);
        }
    }
    out.push('\n');
    out
}

/// Render one primary contig's estimates as dot edges.
///
/// Edges leaving the reverse strand of the primary contig point at the
/// reverse of the neighbor node.
#[must_use]
pub fn format_dot(estimates: &BatchEstimates, contigs: &ContigTable) -> String {
    let mut out = String::new();
    for (primary, estimate) in estimates.iter() {
        let target: ContigNode = if primary.sense {
            estimate.contig.flipped()
        } else {
            estimate.contig
        };
        let _ = writeln!(
            out,
            "\"{}\" -> \"{}\" [d={} e={:.1} n={}]",
            primary.display(contigs),
            target.display(contigs),
            estimate.distance,
            estimate.std_dev,
            estimate.num_pairs
        );
    }
    out
}

#[must_use]
pub fn format_block(
    estimates: &BatchEstimates,
    contigs: &ContigTable,
    format: OutputFormat,
) -> String {
    match format {
        OutputFormat::List => format_list(estimates, contigs),
        OutputFormat::Dot => format_dot(estimates, contigs),
    }
}

/// Write the opening of the output, if the format has one
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_header<W: Write + ?Sized>(out: &mut W, config: &EstimatorConfig) -> io::Result<()> {
    match config.format {
        OutputFormat::List => Ok(()),
        OutputFormat::Dot => write!(
            out,
            "digraph dist {{\ngraph [k={} s={} n={}]\n",
            config.kmer, config.seed_length, config.min_pairs
        ),
    }
}

/// Write the closing of the output, if the format has one
///
/// # Errors
///
/// Returns any error from the writer.
pub fn write_footer<W: Write + ?Sized>(out: &mut W, config: &EstimatorConfig) -> io::Result<()> {
    match config.format {
        OutputFormat::List => Ok(()),
        OutputFormat::Dot => writeln!(out, "}}"),
    }
}
