use std::io::BufRead;
use std::path::Path;

use thiserror::Error;

use crate::core::histogram::Histogram;
use crate::parsing::input::open_reader;

#[derive(Error, Debug)]
pub enum HistogramError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid histogram line {line}: '{text}'")]
    InvalidLine { line: usize, text: String },

    #[error("the histogram `{0}' is empty")]
    Empty(String),
}

/// Load a fragment-size histogram from a file of `value count` lines
///
/// # Errors
///
/// Returns `HistogramError::Io` if the file cannot be read,
/// `HistogramError::InvalidLine` for malformed lines, or
/// `HistogramError::Empty` if no observations are found.
pub fn load_histogram(path: &Path) -> Result<Histogram, HistogramError> {
    let hist = read_histogram(open_reader(path)?)?;
    if hist.is_empty() {
        return Err(HistogramError::Empty(path.display().to_string()));
    }
    Ok(hist)
}

/// Parse `value count` pairs separated by whitespace.
///
/// Blank lines and `#` comments are skipped. Repeated values accumulate.
///
/// # Errors
///
/// Returns `HistogramError::InvalidLine` if a line does not hold exactly
/// an integer value and a non-negative count.
pub fn read_histogram<R: BufRead>(reader: R) -> Result<Histogram, HistogramError> {
    let mut hist = Histogram::new();
    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let invalid = || HistogramError::InvalidLine {
            line: i + 1,
            text: text.to_string(),
        };

        let mut fields = text.split_whitespace();
        let value: i32 = fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(invalid)?;
        let count: u64 = fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(invalid)?;
        if fields.next().is_some() {
            return Err(invalid());
        }
        hist.insert(value, count);
    }
    Ok(hist)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_read_histogram() {
        let text = "# fragment sizes\n-12\t2\n300 1\n310\t2\n\n320\t1\n310\t1\n";
        let hist = read_histogram(Cursor::new(text)).unwrap();
        assert_eq!(hist.size(), 7);
        assert_eq!(hist.get(310), 3);
        assert_eq!(hist.get(-12), 2);
    }

    #[test]
    fn test_read_histogram_invalid() {
        for text in ["300\n", "abc 4\n", "300 -1\n", "300 1 2\n"] {
            let result = read_histogram(Cursor::new(text));
            assert!(
                matches!(result, Err(HistogramError::InvalidLine { line: 1, .. })),
                "{text:?}"
            );
        }
    }

    #[test]
    fn test_load_empty_histogram() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.hist");
        std::fs::write(&path, "# nothing\n").unwrap();
        assert!(matches!(
            load_histogram(&path),
            Err(HistogramError::Empty(_))
        ));
    }
}
