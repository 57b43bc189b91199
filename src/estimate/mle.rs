//! Maximum-likelihood distance between two contigs.
//!
//! Each sample is a provisional fragment size: the size the fragment would
//! have if the two contigs were adjacent with no gap. Shifting every sample by
//! a candidate distance `theta` gives the implied true fragment sizes, whose
//! likelihood is scored against the empirical [`Pdf`].
//!
//! Fragments can only be observed if they fit on the two contigs, so the
//! model is renormalized for each `theta` by a window function of the contig
//! lengths.

use std::ops::RangeInclusive;

use crate::core::pdf::Pdf;
use crate::estimate::config::EstimatorConfig;

/// Result of a distance search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MlEstimate {
    /// Most likely distance, with the number of distinct pairs behind it
    Distance { distance: i32, num_pairs: u32 },
    /// Fewer distinct pairs than the configured minimum
    InsufficientPairs { num_pairs: u32 },
    /// No candidate distance places any pair on an observed fragment size
    NoFeasibleOffset,
}

/// Relative number of positions at which a fragment of a given size can span
/// the junction of contigs of length `x1 <= x2`
#[derive(Debug, Clone, Copy)]
struct WindowFunction {
    x1: i64,
    x2: i64,
    x3: i64,
}

impl WindowFunction {
    fn new(len0: i64, len1: i64) -> Self {
        let (x1, x2) = if len0 <= len1 {
            (len0, len1)
        } else {
            (len1, len0)
        };
        let x1 = x1.max(1);
        let x2 = x2.max(1);
        Self {
            x1,
            x2,
            x3: x1 + x2,
        }
    }

    #[allow(clippy::cast_precision_loss)]
    fn eval(&self, x: i64) -> f64 {
        let positions = if x <= 0 {
            1
        } else if x < self.x1 {
            x
        } else if x < self.x2 {
            self.x1
        } else if x < self.x3 {
            self.x3 - x
        } else {
            1
        };
        positions as f64 / self.x1 as f64
    }
}

/// Sum of log probabilities of the shifted samples, and how many of them
/// land on an observed fragment size
fn log_likelihood(theta: i32, samples: &[i32], pdf: &Pdf) -> (f64, u32) {
    let mut likelihood = 0.0;
    let mut fitted = 0;
    for &sample in samples {
        let x = i64::from(sample) + i64::from(theta);
        likelihood += pdf.p(x).ln();
        if pdf.is_observed(x) {
            fitted += 1;
        }
    }
    (likelihood, fitted)
}

/// Normalizing constant of the PDF restricted by the window at `theta`
fn normalizing_constant(theta: i32, pdf: &Pdf, window: &WindowFunction) -> f64 {
    let max = i64::try_from(pdf.max_index()).unwrap_or(i64::MAX);
    (0..=max)
        .map(|i| pdf.p(i) * window.eval(i - i64::from(theta)))
        .sum()
}

/// Return the distance in `range` that maximizes the likelihood of `samples`.
///
/// `len0` and `len1` are the contig lengths. Alignments cannot start within
/// the last k-1 bases of a contig, so both are shortened by k-1 first. Ties
/// keep the smallest distance.
#[must_use]
pub fn maximum_likelihood_estimate(
    range: RangeInclusive<i32>,
    samples: &[i32],
    pdf: &Pdf,
    len0: u32,
    len1: u32,
    config: &EstimatorConfig,
) -> MlEstimate {
    let num_pairs = u32::try_from(samples.len()).unwrap_or(u32::MAX);
    if num_pairs < config.min_pairs || samples.is_empty() {
        return MlEstimate::InsufficientPairs { num_pairs };
    }

    let unalignable = i64::from(config.kmer.saturating_sub(1));
    let window = WindowFunction::new(
        i64::from(len0) - unalignable,
        i64::from(len1) - unalignable,
    );

    let mut best: Option<(f64, i32)> = None;
    for theta in range {
        let (mut likelihood, fitted) = log_likelihood(theta, samples, pdf);
        if fitted == 0 {
            continue;
        }
        likelihood -= f64::from(fitted) * normalizing_constant(theta, pdf, &window).ln();
        if best.map_or(true, |(best_likelihood, _)| likelihood > best_likelihood) {
            best = Some((likelihood, theta));
        }
    }

    match best {
        Some((_, distance)) => MlEstimate::Distance {
            distance,
            num_pairs,
        },
        None => MlEstimate::NoFeasibleOffset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::histogram::Histogram;

    fn peaked_pdf() -> Pdf {
        let hist: Histogram = [(290, 100), (295, 500), (300, 1000), (305, 500), (310, 100)]
            .into_iter()
            .collect();
        Pdf::new(&hist)
    }

    #[test]
    fn test_window_function() {
        let window = WindowFunction::new(300, 100);
        assert!((window.eval(-5) - 0.01).abs() < 1e-12);
        assert!((window.eval(0) - 0.01).abs() < 1e-12);
        assert!((window.eval(50) - 0.5).abs() < 1e-12);
        assert!((window.eval(200) - 1.0).abs() < 1e-12);
        assert!((window.eval(350) - 0.5).abs() < 1e-12);
        assert!((window.eval(400) - 0.01).abs() < 1e-12);
        assert!((window.eval(1000) - 0.01).abs() < 1e-12);
    }

    #[test]
    fn test_recovers_peak_offset() {
        let pdf = peaked_pdf();
        let config = EstimatorConfig::new(25, 100, 2);
        let samples = vec![250; 5];
        let estimate = maximum_likelihood_estimate(
            config.search_range(&pdf),
            &samples,
            &pdf,
            500,
            500,
            &config,
        );
        assert_eq!(
            estimate,
            MlEstimate::Distance {
                distance: 50,
                num_pairs: 5
            }
        );
    }

    #[test]
    fn test_negative_distance_is_an_overlap() {
        let pdf = peaked_pdf();
        let config = EstimatorConfig::new(25, 100, 2);
        let samples = vec![310; 3];
        let estimate = maximum_likelihood_estimate(
            config.search_range(&pdf),
            &samples,
            &pdf,
            1000,
            800,
            &config,
        );
        assert_eq!(
            estimate,
            MlEstimate::Distance {
                distance: -10,
                num_pairs: 3
            }
        );
    }

    #[test]
    fn test_too_few_pairs() {
        let pdf = peaked_pdf();
        let config = EstimatorConfig::new(25, 100, 4);
        for samples in [vec![], vec![250, 250, 250], vec![1, 2, 3]] {
            let estimate = maximum_likelihood_estimate(
                config.search_range(&pdf),
                &samples,
                &pdf,
                500,
                500,
                &config,
            );
            assert!(matches!(estimate, MlEstimate::InsufficientPairs { .. }));
        }
    }

    #[test]
    fn test_no_feasible_offset() {
        let pdf = peaked_pdf();
        let config = EstimatorConfig::new(25, 100, 2);
        let samples = vec![10_000, 10_050];
        let estimate = maximum_likelihood_estimate(
            config.search_range(&pdf),
            &samples,
            &pdf,
            500,
            500,
            &config,
        );
        assert_eq!(estimate, MlEstimate::NoFeasibleOffset);
    }
}
