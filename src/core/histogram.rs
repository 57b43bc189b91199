//! Empirical fragment-size distribution.
//!
//! A [`Histogram`] maps a signed fragment size to the number of times it was
//! observed. Negative sizes are produced by reverse-forward oriented mate
//! pairs. All transforms return a new histogram.

use std::collections::BTreeMap;

/// Characters used by [`Histogram::barplot`], from empty to full
const BAR_LEVELS: &[u8] = b" .:-=+*#%@";

/// Default number of columns in a barplot
pub const BARPLOT_WIDTH: usize = 100;

#[inline]
fn count_to_f64(count: u64) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Histogram {
    counts: BTreeMap<i32, u64>,
}

impl Histogram {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `count` observations of `value`
    pub fn insert(&mut self, value: i32, count: u64) {
        if count > 0 {
            *self.counts.entry(value).or_insert(0) += count;
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Total number of observations
    #[must_use]
    pub fn size(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of observations with a value in `[low, high]`
    #[must_use]
    pub fn count(&self, low: i32, high: i32) -> u64 {
        if low > high {
            return 0;
        }
        self.counts.range(low..=high).map(|(_, &n)| n).sum()
    }

    /// Number of observations of exactly `value`
    #[must_use]
    pub fn get(&self, value: i32) -> u64 {
        self.counts.get(&value).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i32, u64)> + '_ {
        self.counts.iter().map(|(&k, &v)| (k, v))
    }

    /// Smallest observed value, or 0 when empty
    #[must_use]
    pub fn minimum(&self) -> i32 {
        self.counts.keys().next().copied().unwrap_or(0)
    }

    /// Largest observed value, or 0 when empty
    #[must_use]
    pub fn maximum(&self) -> i32 {
        self.counts.keys().next_back().copied().unwrap_or(0)
    }

    #[must_use]
    pub fn mean(&self) -> f64 {
        let n = self.size();
        if n == 0 {
            return 0.0;
        }
        let sum: f64 = self
            .iter()
            .map(|(k, v)| f64::from(k) * count_to_f64(v))
            .sum();
        sum / count_to_f64(n)
    }

    #[must_use]
    pub fn variance(&self) -> f64 {
        let n = self.size();
        if n == 0 {
            return 0.0;
        }
        let mean = self.mean();
        let sum: f64 = self
            .iter()
            .map(|(k, v)| {
                let d = f64::from(k) - mean;
                d * d * count_to_f64(v)
            })
            .sum();
        sum / count_to_f64(n)
    }

    #[must_use]
    pub fn sd(&self) -> f64 {
        self.variance().sqrt()
    }

    /// Smallest value such that at least fraction `p` of observations are
    /// less than or equal to it
    #[must_use]
    pub fn percentile(&self, p: f64) -> i32 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let target = (p * count_to_f64(self.size())).ceil() as u64;
        let mut seen = 0;
        for (value, count) in self.iter() {
            seen += count;
            if seen >= target {
                return value;
            }
        }
        self.maximum()
    }

    #[must_use]
    pub fn median(&self) -> i32 {
        self.percentile(0.5)
    }

    /// Flip the sign of every value
    #[must_use]
    pub fn negate(&self) -> Self {
        Self {
            counts: self.counts.iter().map(|(&k, &v)| (-k, v)).collect(),
        }
    }

    /// Drop every value below zero
    #[must_use]
    pub fn erase_negative(mut self) -> Self {
        self.counts = self.counts.split_off(&0);
        self
    }

    /// Trim `fraction / 2` of the observations from each tail.
    ///
    /// A value is kept when any part of its mass lies inside the central
    /// `1 - fraction` of the cumulative distribution, so at least that share of
    /// the data remains.
    ///
    /// # Panics
    ///
    /// Panics if `fraction` is outside `[0, 1]`.
    #[must_use]
    pub fn trim_fraction(&self, fraction: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&fraction),
            "trim fraction {fraction} is outside [0, 1]"
        );
        let low_cutoff = fraction / 2.0;
        let high_cutoff = 1.0 - fraction / 2.0;
        let n = count_to_f64(self.size());

        let mut trimmed = Self::new();
        let mut cumulative = 0.0;
        for (value, count) in self.iter() {
            let next = cumulative + count_to_f64(count) / n;
            if next > low_cutoff && cumulative < high_cutoff {
                trimmed.insert(value, count);
            }
            cumulative = next;
        }
        trimmed
    }

    /// Render the histogram as a single line of `width` columns whose glyph
    /// density follows the count in each bucket
    #[must_use]
    pub fn barplot(&self, width: usize) -> String {
        if self.is_empty() || width == 0 {
            return String::new();
        }
        let min = i64::from(self.minimum());
        let span = i64::from(self.maximum()) - min + 1;
        #[allow(clippy::cast_possible_wrap)]
        let columns = span.min(width as i64);

        let mut buckets = vec![0u64; usize::try_from(columns).unwrap_or(1)];
        for (value, count) in self.iter() {
            let offset = i64::from(value) - min;
            let bucket = usize::try_from(offset * columns / span).unwrap_or(0);
            buckets[bucket] += count;
        }

        let peak = buckets.iter().copied().max().unwrap_or(0).max(1);
        let top = BAR_LEVELS.len() - 1;
        buckets
            .iter()
            .map(|&count| {
                #[allow(clippy::cast_possible_truncation)]
                let level = ((u128::from(count) * top as u128).div_ceil(u128::from(peak))) as usize;
                char::from(BAR_LEVELS[level.min(top)])
            })
            .collect()
    }
}

impl FromIterator<(i32, u64)> for Histogram {
    fn from_iter<T: IntoIterator<Item = (i32, u64)>>(iter: T) -> Self {
        let mut hist = Self::new();
        for (value, count) in iter {
            hist.insert(value, count);
        }
        hist
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skewed() -> Histogram {
        [
            (-40, 2),
            (180, 5),
            (190, 20),
            (200, 60),
            (210, 20),
            (220, 5),
            (400, 3),
            (900, 1),
        ]
        .into_iter()
        .collect()
    }

    fn right_tailed() -> Histogram {
        [
            (180, 5),
            (190, 20),
            (200, 60),
            (210, 20),
            (220, 5),
            (300, 4),
            (500, 2),
            (900, 1),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_summary_statistics() {
        let hist: Histogram = [(300, 1), (310, 2), (320, 1)].into_iter().collect();
        assert_eq!(hist.size(), 4);
        assert_eq!(hist.minimum(), 300);
        assert_eq!(hist.maximum(), 320);
        assert_eq!(hist.median(), 310);
        assert!((hist.mean() - 310.0).abs() < 1e-9);
        assert!((hist.sd() - 50f64.sqrt()).abs() < 1e-9);
        assert_eq!(hist.count(305, 320), 3);
        assert_eq!(hist.count(320, 300), 0);
    }

    #[test]
    fn test_insert_accumulates() {
        let mut hist = Histogram::new();
        hist.insert(5, 2);
        hist.insert(5, 3);
        hist.insert(6, 0);
        assert_eq!(hist.get(5), 5);
        assert_eq!(hist.get(6), 0);
        assert_eq!(hist.size(), 5);
    }

    #[test]
    fn test_negate_twice_is_identity() {
        let hist = skewed();
        let negated = hist.negate();
        assert_eq!(negated.get(40), 2);
        assert_eq!(negated.get(-200), 60);
        assert_eq!(negated.negate(), hist);
    }

    #[test]
    fn test_erase_negative() {
        let hist = skewed().negate().erase_negative();
        assert_eq!(hist.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec![40]);

        let hist = skewed().erase_negative();
        assert!(hist.iter().all(|(k, _)| k >= 0));
        assert_eq!(hist.size(), skewed().size() - 2);
    }

    #[test]
    fn test_trim_fraction_shrinks() {
        let hist = right_tailed();
        assert_eq!(hist.trim_fraction(0.0), hist);
        for f in [0.01, 0.05, 0.1, 0.3] {
            assert!(hist.trim_fraction(f).size() <= hist.size());
        }
        let trimmed = hist.trim_fraction(0.05);
        assert_eq!(trimmed.minimum(), 180);
        assert_eq!(trimmed.maximum(), 500);
    }

    #[test]
    fn test_trim_moves_mean_toward_median() {
        let hist = right_tailed();
        let median = f64::from(hist.median());
        let mut last = (hist.mean() - median).abs();
        for f in [0.02, 0.05, 0.1, 0.2, 0.4] {
            let distance = (hist.trim_fraction(f).mean() - median).abs();
            assert!(distance <= last, "f={f}: {distance} > {last}");
            last = distance;
        }
    }

    #[test]
    fn test_barplot() {
        let hist: Histogram = [(0, 1), (1, 9), (2, 0), (3, 3)].into_iter().collect();
        let plot = hist.barplot(BARPLOT_WIDTH);
        assert_eq!(plot, ".@ -");
        assert!(Histogram::new().barplot(10).is_empty());
    }
}
