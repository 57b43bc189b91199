use crate::core::histogram::Histogram;

/// Probability mass function of fragment sizes built from a trimmed,
/// non-negative [`Histogram`].
///
/// The table is dense over `0..=max_index`. Sizes that were never observed
/// get the floor probability `1 / total`, as does anything outside the table.
/// The mean and standard deviation are those of the histogram itself.
#[derive(Debug, Clone)]
pub struct Pdf {
    dist: Vec<f64>,
    observed: Vec<bool>,
    max_index: usize,
    min_p: f64,
    mean: f64,
    std_dev: f64,
}

impl Pdf {
    /// # Panics
    ///
    /// Panics if the histogram is empty or holds a negative value.
    #[must_use]
    pub fn new(hist: &Histogram) -> Self {
        assert!(!hist.is_empty(), "cannot build a PDF from an empty histogram");
        assert!(hist.minimum() >= 0, "PDF histogram has negative values");

        let max_index = usize::try_from(hist.maximum()).unwrap_or(0);
        #[allow(clippy::cast_precision_loss)]
        let total = hist.size() as f64;
        let min_p = 1.0 / total;

        let mut dist = vec![min_p; max_index + 1];
        let mut observed = vec![false; max_index + 1];
        for (value, count) in hist.iter() {
            let i = usize::try_from(value).unwrap_or(0);
            #[allow(clippy::cast_precision_loss)]
            {
                dist[i] = count as f64 / total;
            }
            observed[i] = true;
        }

        Self {
            dist,
            observed,
            max_index,
            min_p,
            mean: hist.mean(),
            std_dev: hist.sd(),
        }
    }

    /// Largest fragment size with observed mass
    #[must_use]
    pub fn max_index(&self) -> usize {
        self.max_index
    }

    /// Probability of a fragment of size `x`
    #[must_use]
    pub fn p(&self, x: i64) -> f64 {
        usize::try_from(x)
            .ok()
            .and_then(|i| self.dist.get(i))
            .copied()
            .unwrap_or(self.min_p)
    }

    /// Whether a fragment of size `x` was seen in the source histogram
    #[must_use]
    pub fn is_observed(&self, x: i64) -> bool {
        usize::try_from(x)
            .ok()
            .and_then(|i| self.observed.get(i))
            .copied()
            .unwrap_or(false)
    }

    #[must_use]
    pub fn min_p(&self) -> f64 {
        self.min_p
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    #[must_use]
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }

    /// Expected standard deviation of a distance estimated from `n` pairs
    #[must_use]
    pub fn sample_std_dev(&self, n: u32) -> f64 {
        if n == 0 {
            return self.std_dev;
        }
        self.std_dev / f64::from(n).sqrt()
    }
}
