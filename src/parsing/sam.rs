use std::io::BufRead;

use noodles::sam;
use noodles::sam::alignment::record::Flags;
use thiserror::Error;

use crate::core::alignment::AlignmentRecord;
use crate::core::contig::{ContigId, ContigTable, ContigTableBuilder};

/// Number of mandatory SAM columns
const MANDATORY_FIELDS: usize = 11;

#[derive(Error, Debug)]
pub enum ParseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid SAM record: {0}")]
    InvalidFormat(String),

    #[error("noodles error: {0}")]
    Noodles(String),

    #[error("No @SQ records in the SAM header")]
    NoContigs,

    #[error("Contig `{0}' is not listed in the SAM header")]
    UnknownContig(String),
}

/// Read the SAM header from `reader` and build the locked contig table.
///
/// On return the reader is positioned at the first alignment line.
///
/// # Errors
///
/// Returns `ParseError::Noodles` if the header is malformed, or
/// `ParseError::NoContigs` if it has no `@SQ` lines.
pub fn read_header<R: BufRead>(reader: R) -> Result<(ContigTable, R), ParseError> {
    let mut reader = sam::io::Reader::new(reader);

    let header = reader
        .read_header()
        .map_err(|e| ParseError::Noodles(e.to_string()))?;

    let mut builder = ContigTableBuilder::new();
    for (name, map) in header.reference_sequences() {
        let length = u32::try_from(map.length().get()).map_err(|_| {
            ParseError::InvalidFormat(format!("contig `{name}' is too long"))
        })?;
        builder.insert(name.to_string(), length);
    }

    if builder.is_empty() {
        return Err(ParseError::NoContigs);
    }

    Ok((builder.freeze(), reader.into_inner()))
}

/// Clipping and span of one CIGAR string
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct CigarSummary {
    leading_clip: u32,
    trailing_clip: u32,
    reference_span: u32,
    query_length: u32,
}

impl CigarSummary {
    fn parse(cigar: &str) -> Result<Self, ParseError> {
        let mut summary = Self::default();
        if cigar == "*" {
            return Ok(summary);
        }

        let mut len: u32 = 0;
        let mut seen_aligned = false;
        let mut has_digits = false;
        for c in cigar.chars() {
            if let Some(d) = c.to_digit(10) {
                len = len
                    .checked_mul(10)
                    .and_then(|l| l.checked_add(d))
                    .ok_or_else(|| ParseError::InvalidFormat(format!("CIGAR `{cigar}'")))?;
                has_digits = true;
                continue;
            }
            if !has_digits {
                return Err(ParseError::InvalidFormat(format!("CIGAR `{cigar}'")));
            }
            match c {
                'S' | 'H' => {
                    if seen_aligned {
                        summary.trailing_clip += len;
                    } else {
                        summary.leading_clip += len;
                    }
                    if c == 'S' {
                        summary.query_length += len;
                    }
                }
                'M' | '=' | 'X' => {
                    seen_aligned = true;
                    summary.reference_span += len;
                    summary.query_length += len;
                }
                'I' => {
                    seen_aligned = true;
                    summary.query_length += len;
                }
                'D' | 'N' => {
                    seen_aligned = true;
                    summary.reference_span += len;
                }
                'P' => {}
                _ => return Err(ParseError::InvalidFormat(format!("CIGAR `{cigar}'"))),
            }
            len = 0;
            has_digits = false;
        }
        if has_digits {
            return Err(ParseError::InvalidFormat(format!("CIGAR `{cigar}'")));
        }
        Ok(summary)
    }

    /// Position of the first read base, extrapolated from an alignment
    /// starting at the 0-based `pos`
    fn target_at_query_start(self, pos: i64, reverse: bool) -> i64 {
        if reverse {
            pos + i64::from(self.reference_span) + i64::from(self.trailing_clip)
        } else {
            pos - i64::from(self.leading_clip)
        }
    }
}

fn resolve(name: &str, table: &ContigTable) -> Result<Option<ContigId>, ParseError> {
    if name == "*" {
        return Ok(None);
    }
    table
        .get(name)
        .map(Some)
        .ok_or_else(|| ParseError::UnknownContig(name.to_string()))
}

fn parse_field<T: std::str::FromStr>(value: &str, what: &str) -> Result<T, ParseError> {
    value
        .parse()
        .map_err(|_| ParseError::InvalidFormat(format!("invalid {what} `{value}'")))
}

fn to_i32(value: i64) -> Result<i32, ParseError> {
    i32::try_from(value)
        .map_err(|_| ParseError::InvalidFormat(format!("position {value} out of range")))
}

/// Parse one tab-separated SAM alignment line.
///
/// # Errors
///
/// Returns `ParseError::InvalidFormat` for missing or malformed columns, or
/// `ParseError::UnknownContig` if a reference name is not in `table`.
pub fn parse_record(line: &str, table: &ContigTable) -> Result<AlignmentRecord, ParseError> {
    let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
    if fields.len() < MANDATORY_FIELDS {
        return Err(ParseError::InvalidFormat(format!(
            "expected at least {MANDATORY_FIELDS} fields, found {}",
            fields.len()
        )));
    }

    let flags = Flags::from(parse_field::<u16>(fields[1], "flag")?);
    let reference = resolve(fields[2], table)?;
    let pos: i64 = parse_field(fields[3], "position")?;
    let mapping_quality: u8 = parse_field(fields[4], "mapping quality")?;
    let cigar = CigarSummary::parse(fields[5])?;
    let mate_reference = match fields[6] {
        "=" => reference,
        name => resolve(name, table)?,
    };
    let mate_pos: i64 = parse_field(fields[7], "mate position")?;

    // Without the mate's CIGAR, assume it is unclipped and as long as this read
    let mate_cigar = match fields[MANDATORY_FIELDS..]
        .iter()
        .find_map(|tag| tag.strip_prefix("MC:Z:"))
    {
        Some(mc) => CigarSummary::parse(mc)?,
        None => {
            let length = if cigar.query_length > 0 || fields[9] == "*" {
                cigar.query_length
            } else {
                u32::try_from(fields[9].len()).unwrap_or(u32::MAX)
            };
            CigarSummary {
                reference_span: length,
                query_length: length,
                ..CigarSummary::default()
            }
        }
    };

    let target_at_query_start =
        to_i32(cigar.target_at_query_start((pos - 1).max(0), flags.is_reverse_complemented()))?;
    let mate_target_at_query_start = to_i32(mate_cigar.target_at_query_start(
        (mate_pos - 1).max(0),
        flags.is_mate_reverse_complemented(),
    ))?;

    Ok(AlignmentRecord {
        name: fields[0].to_string(),
        flags,
        reference,
        mate_reference,
        mapping_quality,
        target_at_query_start,
        mate_target_at_query_start,
    })
}
