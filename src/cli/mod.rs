//! Command-line interface for distance-est.
//!
//! ## Usage
//!
//! ```text
//! # Estimate distances from a sorted SAM file
//! distance-est -k 31 -s 200 -n 10 frag.hist pairs.sam > pairs.dist
//!
//! # Read alignments from stdin, write a Graphviz graph, four threads
//! samtools view -h pairs.bam | distance-est -k 31 -s 200 -n 10 --dot -j 4 frag.hist -
//! ```

use clap::{ArgAction, Parser};

pub mod estimate;

#[derive(Parser)]
#[command(name = "distance-est")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Estimate distances between contigs using paired-end alignments")]
#[command(
    long_about = "distance-est estimates the gap (or overlap) between pairs of contigs.\n\nIt reads a fragment-size histogram and paired-end alignments sorted by contig, and reports for every contig the maximum-likelihood distance to each linked neighbor together with the number of supporting pairs and the expected standard deviation."
)]
pub struct Cli {
    #[command(flatten)]
    pub args: estimate::EstimateArgs,

    /// Display verbose output (repeat for more detail)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
