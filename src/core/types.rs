use std::fmt;

use crate::core::contig::ContigNode;
use crate::core::histogram::Histogram;

/// Relative orientation of the two reads of a mate pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LibraryOrientation {
    /// Forward-reverse: reads point toward each other
    #[default]
    ForwardReverse,
    /// Reverse-forward: reads point away from each other
    ReverseForward,
}

impl LibraryOrientation {
    /// Pick the orientation supported by the majority of observed fragment
    /// sizes. Negative sizes come from reverse-forward pairs.
    #[must_use]
    pub fn detect(hist: &Histogram) -> Self {
        let num_rf = hist.count(i32::MIN, 0);
        let num_fr = hist.count(1, i32::MAX);
        if num_fr < num_rf {
            Self::ReverseForward
        } else {
            Self::ForwardReverse
        }
    }

    #[must_use]
    pub fn is_reverse_forward(self) -> bool {
        matches!(self, Self::ReverseForward)
    }
}

impl fmt::Display for LibraryOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ForwardReverse => write!(f, "FR"),
            Self::ReverseForward => write!(f, "RF"),
        }
    }
}

/// How estimates are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One line per primary contig listing every linked neighbor
    #[default]
    List,
    /// One Graphviz edge per estimate
    Dot,
}

/// Estimated distance from a primary contig to one neighbor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub contig: ContigNode,
    pub distance: i32,
    pub num_pairs: u32,
    pub std_dev: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_orientation() {
        let fr: Histogram = [(-5, 1), (250, 40), (260, 10)].into_iter().collect();
        assert_eq!(
            LibraryOrientation::detect(&fr),
            LibraryOrientation::ForwardReverse
        );

        let rf: Histogram = [(-2000, 30), (-1900, 12), (0, 3), (300, 8)]
            .into_iter()
            .collect();
        let orientation = LibraryOrientation::detect(&rf);
        assert_eq!(orientation, LibraryOrientation::ReverseForward);
        assert!(orientation.is_reverse_forward());
        assert_eq!(orientation.to_string(), "RF");
    }

    #[test]
    fn test_tie_is_forward_reverse() {
        let hist: Histogram = [(-100, 5), (100, 5)].into_iter().collect();
        assert_eq!(
            LibraryOrientation::detect(&hist),
            LibraryOrientation::ForwardReverse
        );
    }
}
