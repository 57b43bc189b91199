use std::ops::RangeInclusive;

use crate::core::pdf::Pdf;
use crate::core::types::{LibraryOrientation, OutputFormat};

/// Default minimum mapping quality of an admitted alignment
pub const DEFAULT_MIN_MAPQ: u8 = 1;

/// Immutable settings shared by the aggregator and every estimator.
///
/// The library orientation is only known after the histogram has been
/// inspected; fill it in with [`EstimatorConfig::with_orientation`] before
/// handing the config to workers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EstimatorConfig {
    /// k-mer size of the assembly
    pub kmer: u32,
    /// Contigs shorter than this are never used as the primary contig
    pub seed_length: u32,
    /// Minimum number of distinct pairs supporting an estimate
    pub min_pairs: u32,
    /// Alignments with lower mapping quality are ignored
    pub min_mapq: u8,
    pub format: OutputFormat,
    pub orientation: LibraryOrientation,
}

impl EstimatorConfig {
    #[must_use]
    pub fn new(kmer: u32, seed_length: u32, min_pairs: u32) -> Self {
        Self {
            kmer,
            seed_length,
            min_pairs,
            min_mapq: DEFAULT_MIN_MAPQ,
            format: OutputFormat::List,
            orientation: LibraryOrientation::ForwardReverse,
        }
    }

    #[must_use]
    pub fn with_min_mapq(mut self, min_mapq: u8) -> Self {
        self.min_mapq = min_mapq;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    #[must_use]
    pub fn with_orientation(mut self, orientation: LibraryOrientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Candidate distances: adjacent contigs may overlap by up to k-1 bases,
    /// and no gap can exceed the largest fragment in the model
    #[must_use]
    pub fn search_range(&self, pdf: &Pdf) -> RangeInclusive<i32> {
        let low = 1 - i32::try_from(self.kmer).unwrap_or(i32::MAX);
        let high = i32::try_from(pdf.max_index()).unwrap_or(i32::MAX);
        low..=high
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::histogram::Histogram;

    #[test]
    fn test_builder() {
        let config = EstimatorConfig::new(31, 100, 5)
            .with_min_mapq(10)
            .with_format(OutputFormat::Dot)
            .with_orientation(LibraryOrientation::ReverseForward);
        assert_eq!(config.kmer, 31);
        assert_eq!(config.min_mapq, 10);
        assert_eq!(config.format, OutputFormat::Dot);
        assert!(config.orientation.is_reverse_forward());
        assert_eq!(EstimatorConfig::new(31, 100, 5).min_mapq, DEFAULT_MIN_MAPQ);
    }

    #[test]
    fn test_search_range() {
        let hist: Histogram = [(150, 2), (400, 1)].into_iter().collect();
        let pdf = Pdf::new(&hist);
        assert_eq!(EstimatorConfig::new(25, 50, 2).search_range(&pdf), -24..=400);
    }
}
