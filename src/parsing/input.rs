//! Opening input and output streams.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flate2::read::MultiGzDecoder;

/// Check if the path is a gzipped file
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz") || path_str.ends_with(".bgz")
}

/// Whether `path` names standard input/output
pub fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Open `path` for buffered reading. `-` reads standard input; `.gz` and
/// `.bgz` files are decompressed.
///
/// # Errors
///
/// Returns an error if the file cannot be opened.
pub fn open_reader(path: &Path) -> io::Result<Box<dyn BufRead + Send>> {
    if is_stdio(path) {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path)?;
    if is_gzipped(path) {
        Ok(Box::new(BufReader::new(MultiGzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Open `path` for buffered writing, or standard output when `None` or `-`.
///
/// # Errors
///
/// Returns an error if the file cannot be created.
pub fn open_writer(path: Option<&Path>) -> io::Result<Box<dyn Write + Send>> {
    match path {
        Some(p) if !is_stdio(p) => Ok(Box::new(BufWriter::new(File::create(p)?))),
        _ => Ok(Box::new(BufWriter::new(io::stdout()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Read;

    #[test]
    fn test_is_gzipped() {
        assert!(is_gzipped(Path::new("pairs.sam.gz")));
        assert!(is_gzipped(Path::new("PAIRS.SAM.BGZ")));
        assert!(!is_gzipped(Path::new("pairs.sam")));
        assert!(is_stdio(Path::new("-")));
    }

    #[test]
    fn test_open_gzipped_reader() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hist.txt.gz");
        let mut encoder = GzEncoder::new(File::create(&path).unwrap(), Compression::default());
        encoder.write_all(b"100\t3\n").unwrap();
        encoder.finish().unwrap();

        let mut text = String::new();
        open_reader(&path).unwrap().read_to_string(&mut text).unwrap();
        assert_eq!(text, "100\t3\n");
    }

    #[test]
    fn test_open_missing_file() {
        assert!(open_reader(Path::new("/nonexistent/pairs.sam")).is_err());
    }
}
