//! Centralized validation of run settings.

use crate::estimate::config::EstimatorConfig;

/// Missing or malformed run settings
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing -k,--kmer option")]
    MissingKmer,
    #[error("missing -s,--seed-length option")]
    MissingSeedLength,
    #[error("missing -n,--npairs option")]
    MissingPairs,
}

/// Check that every required threshold of `config` is set.
///
/// # Errors
///
/// Returns the first missing option as a `ValidationError`.
pub fn validate_config(config: &EstimatorConfig) -> Result<(), ValidationError> {
    if config.kmer == 0 {
        return Err(ValidationError::MissingKmer);
    }
    if config.seed_length == 0 {
        return Err(ValidationError::MissingSeedLength);
    }
    if config.min_pairs == 0 {
        return Err(ValidationError::MissingPairs);
    }
    Ok(())
}

/// Seeds shorter than two k-mers rarely anchor reliable estimates.
/// Returns a warning message, or None if the seed length is reasonable.
#[must_use]
pub fn check_seed_length(kmer: u32, seed_length: u32) -> Option<String> {
    if u64::from(seed_length) < 2 * u64::from(kmer) {
        Some(format!(
            "the seed-length should be at least twice k: k={kmer}, s={seed_length}"
        ))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_config() {
        assert!(validate_config(&EstimatorConfig::new(31, 100, 5)).is_ok());
        assert_eq!(
            validate_config(&EstimatorConfig::new(0, 100, 5)),
            Err(ValidationError::MissingKmer)
        );
        assert_eq!(
            validate_config(&EstimatorConfig::new(31, 0, 5)),
            Err(ValidationError::MissingSeedLength)
        );
        assert_eq!(
            validate_config(&EstimatorConfig::new(31, 100, 0)),
            Err(ValidationError::MissingPairs)
        );
    }

    #[test]
    fn test_check_seed_length() {
        assert!(check_seed_length(31, 62).is_none());
        assert!(check_seed_length(31, 200).is_none());
        let warning = check_seed_length(31, 50).unwrap();
        assert!(warning.contains("k=31, s=50"));
    }
}
