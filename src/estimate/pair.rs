use std::collections::BTreeMap;

use tracing::debug;

use crate::core::alignment::AlignmentRecord;
use crate::core::contig::{ContigId, ContigNode, ContigTable};
use crate::core::pdf::Pdf;
use crate::core::types::Estimate;
use crate::estimate::config::EstimatorConfig;
use crate::estimate::mle::{maximum_likelihood_estimate, MlEstimate};
use crate::estimate::stream::ContigBatch;

/// Estimates for one primary contig.
///
/// `by_sense[0]` holds the neighbors of the primary contig's forward strand,
/// `by_sense[1]` those of its reverse strand. Each list is ordered by
/// neighbor node.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchEstimates {
    pub contig: ContigId,
    pub by_sense: [Vec<Estimate>; 2],
}

impl BatchEstimates {
    /// Every estimate paired with the primary node it was made for
    pub fn iter(&self) -> impl Iterator<Item = (ContigNode, &Estimate)> + '_ {
        self.by_sense.iter().enumerate().flat_map(move |(sense, estimates)| {
            let node = ContigNode::new(self.contig, sense == 1);
            estimates.iter().map(move |e| (node, e))
        })
    }
}

/// Turns one primary contig's alignments into distance estimates
pub struct ContigPairEstimator<'a> {
    config: &'a EstimatorConfig,
    pdf: &'a Pdf,
    contigs: &'a ContigTable,
}

impl<'a> ContigPairEstimator<'a> {
    #[must_use]
    pub fn new(config: &'a EstimatorConfig, pdf: &'a Pdf, contigs: &'a ContigTable) -> Self {
        Self {
            config,
            pdf,
            contigs,
        }
    }

    /// Fragment endpoints as if the contig of `record` (length `len0`) and the
    /// contig of its mate (length `len1`) were adjacent with no gap.
    ///
    /// Reverse-strand reads are measured from the far end of their contig. In
    /// a reverse-forward library the mate's contig comes first.
    #[must_use]
    pub fn provisional_fragment(
        &self,
        record: &AlignmentRecord,
        len0: u32,
        len1: u32,
    ) -> (i64, i64) {
        let len0 = i64::from(len0);
        let len1 = i64::from(len1);
        let mut a0 = i64::from(record.target_at_query_start);
        let mut a1 = i64::from(record.mate_target_at_query_start);
        if record.is_reverse() {
            a0 = len0 - a0;
        }
        if !record.is_mate_reverse() {
            a1 = len1 - a1;
        }
        if self.config.orientation.is_reverse_forward() {
            (a1, len1 + a0)
        } else {
            (a0, len0 + a1)
        }
    }

    /// Estimate the distance between contigs of length `len0` and `len1`
    /// linked by `pairs`. Pairs producing the same fragment count once.
    #[must_use]
    pub fn estimate_distance(
        &self,
        len0: u32,
        len1: u32,
        pairs: &[&AlignmentRecord],
    ) -> MlEstimate {
        let mut fragments: Vec<(i64, i64)> = pairs
            .iter()
            .map(|record| self.provisional_fragment(record, len0, len1))
            .collect();
        fragments.sort_unstable();
        fragments.dedup();

        let samples: Vec<i32> = fragments
            .iter()
            .map(|&(start, end)| i32::try_from(end - start).unwrap_or(i32::MAX))
            .collect();

        maximum_likelihood_estimate(
            self.config.search_range(self.pdf),
            &samples,
            self.pdf,
            len0,
            len1,
            self.config,
        )
    }

    /// Estimate every neighbor of the batch's primary contig.
    ///
    /// Returns `None` when the primary contig is shorter than the seed
    /// length.
    #[must_use]
    pub fn estimate_batch(&self, batch: &ContigBatch) -> Option<BatchEstimates> {
        let len0 = self.contigs.length(batch.contig);
        if len0 < self.config.seed_length {
            return None;
        }

        let mut groups: [BTreeMap<ContigNode, Vec<&AlignmentRecord>>; 2] = Default::default();
        for record in &batch.records {
            let Some(mate) = record.mate_reference else {
                continue;
            };
            let node = ContigNode::new(mate, record.is_reverse() == record.is_mate_reverse());
            groups[usize::from(record.is_reverse())]
                .entry(node)
                .or_default()
                .push(record);
        }

        let rf = self.config.orientation.is_reverse_forward();
        let mut by_sense: [Vec<Estimate>; 2] = Default::default();
        for sense0 in [false, true] {
            let primary = ContigNode::new(batch.contig, sense0);
            for (&neighbor, pairs) in &groups[usize::from(sense0 ^ rf)] {
                if let Some(estimate) = self.estimate_neighbor(primary, neighbor, len0, pairs) {
                    by_sense[usize::from(sense0)].push(estimate);
                }
            }
        }

        Some(BatchEstimates {
            contig: batch.contig,
            by_sense,
        })
    }

    fn estimate_neighbor(
        &self,
        primary: ContigNode,
        neighbor: ContigNode,
        len0: u32,
        pairs: &[&AlignmentRecord],
    ) -> Option<Estimate> {
        if pairs.len() < self.config.min_pairs as usize {
            return None;
        }

        let len1 = self.contigs.length(neighbor.id);
        match self.estimate_distance(len0, len1, pairs) {
            MlEstimate::Distance {
                distance,
                num_pairs,
            } => Some(Estimate {
                contig: neighbor,
                distance,
                num_pairs,
                std_dev: self.pdf.sample_std_dev(num_pairs),
            }),
            MlEstimate::InsufficientPairs { num_pairs } => {
                debug!(
                    "warning: {},{} {num_pairs} of {} pairs fit the expected distribution",
                    primary.display(self.contigs),
                    neighbor.display(self.contigs),
                    pairs.len()
                );
                None
            }
            MlEstimate::NoFeasibleOffset => {
                debug!(
                    "warning: {},{} 0 of {} pairs fit the expected distribution",
                    primary.display(self.contigs),
                    neighbor.display(self.contigs),
                    pairs.len()
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::contig::ContigTableBuilder;
    use crate::core::histogram::Histogram;
    use crate::core::types::LibraryOrientation;
    use noodles::sam::alignment::record::Flags;

    const PAIRED: u16 = 0x1;
    const REVERSE: u16 = 0x10;
    const MATE_REVERSE: u16 = 0x20;

    fn table() -> ContigTable {
        let mut builder = ContigTableBuilder::new();
        builder.insert("a", 100);
        builder.insert("b", 100);
        builder.insert("c", 30);
        builder.freeze()
    }

    fn pdf() -> Pdf {
        let hist: Histogram = [(300, 1), (310, 2), (320, 1)].into_iter().collect();
        Pdf::new(&hist)
    }

    fn record(
        flags: u16,
        reference: u32,
        mate: u32,
        target: i32,
        mate_target: i32,
    ) -> AlignmentRecord {
        AlignmentRecord {
            name: String::new(),
            flags: Flags::from(flags),
            reference: Some(ContigId(reference)),
            mate_reference: Some(ContigId(mate)),
            mapping_quality: 60,
            target_at_query_start: target,
            mate_target_at_query_start: mate_target,
        }
    }

    #[test]
    fn test_provisional_fragment_orientations() {
        let table = table();
        let pdf = pdf();
        let fr = EstimatorConfig::new(20, 40, 2);
        let rf = fr.clone().with_orientation(LibraryOrientation::ReverseForward);
        let fr_estimator = ContigPairEstimator::new(&fr, &pdf, &table);
        let rf_estimator = ContigPairEstimator::new(&rf, &pdf, &table);

        // forward read, reverse mate: both measured as-is
        let r = record(PAIRED | MATE_REVERSE, 0, 1, 10, 60);
        assert_eq!(fr_estimator.provisional_fragment(&r, 100, 100), (10, 160));
        assert_eq!(rf_estimator.provisional_fragment(&r, 100, 100), (60, 110));

        // reverse read, forward mate: both measured from the far end
        let r = record(PAIRED | REVERSE, 0, 1, 90, 20);
        assert_eq!(fr_estimator.provisional_fragment(&r, 100, 100), (10, 180));
        assert_eq!(rf_estimator.provisional_fragment(&r, 100, 100), (80, 110));

        // both forward
        let r = record(PAIRED, 0, 1, 5, 30);
        assert_eq!(fr_estimator.provisional_fragment(&r, 100, 80), (5, 150));

        // both reverse
        let r = record(PAIRED | REVERSE | MATE_REVERSE, 0, 1, 95, 40);
        assert_eq!(fr_estimator.provisional_fragment(&r, 100, 80), (5, 140));
    }

    #[test]
    fn test_duplicate_fragments_count_once() {
        let table = table();
        let pdf = pdf();
        let config = EstimatorConfig::new(20, 40, 2);
        let estimator = ContigPairEstimator::new(&config, &pdf, &table);

        let r1 = record(PAIRED | MATE_REVERSE, 0, 1, 10, 60);
        let r2 = record(PAIRED | MATE_REVERSE, 0, 1, 10, 60);
        assert_eq!(
            estimator.estimate_distance(100, 100, &[&r1, &r2]),
            MlEstimate::InsufficientPairs { num_pairs: 1 }
        );
    }

    #[test]
    fn test_estimate_batch_groups_by_orientation() {
        let table = table();
        let pdf = pdf();
        let config = EstimatorConfig::new(20, 40, 2);
        let estimator = ContigPairEstimator::new(&config, &pdf, &table);

        // provisional sizes 305, 308, 312
        let batch = ContigBatch {
            contig: ContigId(0),
            records: vec![
                record(PAIRED | MATE_REVERSE, 0, 1, 95, 300),
                record(PAIRED | MATE_REVERSE, 0, 1, 92, 300),
                record(PAIRED | MATE_REVERSE, 0, 1, 88, 300),
                // reverse read with reverse mate links a- to b-, below the pair minimum
                record(PAIRED | REVERSE | MATE_REVERSE, 0, 1, 40, 50),
            ],
        };

        let estimates = estimator.estimate_batch(&batch).unwrap();
        assert_eq!(estimates.contig, ContigId(0));
        assert_eq!(estimates.by_sense[0].len(), 1);
        assert!(estimates.by_sense[1].is_empty());

        let estimate = estimates.by_sense[0][0];
        assert_eq!(estimate.contig, ContigNode::new(ContigId(1), false));
        assert_eq!(estimate.num_pairs, 3);
        assert!(estimate.distance >= -19 && estimate.distance <= 320);
        assert!((estimate.std_dev - pdf.sample_std_dev(3)).abs() < 1e-12);
    }

    #[test]
    fn test_short_primary_contig_is_skipped() {
        let table = table();
        let pdf = pdf();
        let config = EstimatorConfig::new(20, 40, 1);
        let estimator = ContigPairEstimator::new(&config, &pdf, &table);
        let batch = ContigBatch {
            contig: ContigId(2),
            records: vec![record(PAIRED | MATE_REVERSE, 2, 0, 5, 300)],
        };
        assert!(estimator.estimate_batch(&batch).is_none());
    }
}
