//! # distance-est
//!
//! Estimates the gap or overlap between pairs of contigs from paired-end
//! alignments and a fragment-size distribution. This is one stage of
//! scaffolding a genome assembly.
//!
//! For every contig long enough to be a seed, alignments whose mates land on
//! another contig are grouped by neighbor and strand. Each group yields the
//! maximum-likelihood distance under the empirical fragment-size model, the
//! number of distinct supporting pairs, and an expected standard deviation.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::fs::File;
//! use std::io::{self, BufReader};
//! use std::path::Path;
//!
//! use distance_est::estimate::{build_model, estimate_distances};
//! use distance_est::estimate::config::EstimatorConfig;
//! use distance_est::parsing::histogram::load_histogram;
//! use distance_est::parsing::sam::read_header;
//!
//! let reader = BufReader::new(File::open("pairs.sam").unwrap());
//! let (contigs, reader) = read_header(reader).unwrap();
//! let model = build_model(&load_histogram(Path::new("frag.hist")).unwrap());
//!
//! let config = EstimatorConfig::new(31, 200, 10).with_orientation(model.orientation);
//! let mut out = io::stdout();
//! estimate_distances(reader, &contigs, &model.pdf, &config, &mut out, 4).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Contigs, alignments, histograms, and the probability model
//! - [`estimate`]: Likelihood search, per-contig grouping, and the threaded pipeline
//! - [`parsing`]: SAM, histogram, and compressed-input readers
//! - [`cli`]: Command-line interface implementation

pub mod cli;
pub mod core;
pub mod estimate;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::contig::{ContigId, ContigNode, ContigTable};
pub use crate::core::histogram::Histogram;
pub use crate::core::pdf::Pdf;
pub use crate::core::types::*;
pub use crate::estimate::config::EstimatorConfig;
pub use crate::estimate::mle::MlEstimate;
