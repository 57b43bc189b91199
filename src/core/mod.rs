//! Core data types for contig distance estimation.
//!
//! - [`contig`]: contig ids, oriented nodes, and the frozen name/length table
//! - [`alignment`]: a paired-end alignment reduced to the fields estimation uses
//! - [`histogram`]: the empirical fragment-size distribution
//! - [`pdf`]: the probability model derived from a finalized histogram
//! - [`types`]: library orientation, output format, and estimate records

pub mod alignment;
pub mod contig;
pub mod histogram;
pub mod pdf;
pub mod types;
