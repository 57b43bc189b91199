//! Groups a sorted alignment stream into per-contig batches.
//!
//! Workers share one [`AlignmentStream`]. Reading and classifying records
//! happens under a lock; the completed batch is moved out to the caller, who
//! estimates it without holding the lock.
//!
//! Input must be sorted by primary contig. A contig whose run has ended may
//! not appear again, which is checked with one flag per contig.

use std::io::BufRead;

use parking_lot::Mutex;
use thiserror::Error;

use crate::core::alignment::AlignmentRecord;
use crate::core::contig::{ContigId, ContigTable};
use crate::parsing::sam::{parse_record, ParseError};

#[derive(Error, Debug)]
pub enum StreamError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {source}")]
    Parse {
        line: u64,
        #[source]
        source: ParseError,
    },

    #[error("input must be sorted: `{0}'")]
    Unsorted(String),
}

/// All admitted alignments of one primary contig
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContigBatch {
    pub contig: ContigId,
    pub records: Vec<AlignmentRecord>,
}

/// Counters reported once the stream is drained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    /// Alignment lines read
    pub records: u64,
    /// Records that passed the admissibility filters
    pub admitted: u64,
    /// Batches handed to workers
    pub batches: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    /// Accumulating records of the current primary contig
    ReadingBatch,
    /// The current batch is complete and waiting to be handed out
    FlushingBatch,
    Done,
}

struct StreamInner<R> {
    reader: R,
    line: String,
    line_number: u64,
    state: StreamState,
    /// Records of the batch being accumulated
    pending: Vec<AlignmentRecord>,
    /// Completed batch, set in `FlushingBatch`
    ready: Option<ContigBatch>,
    seen: Vec<bool>,
    stats: StreamStats,
}

/// Shared, lock-protected cursor over a sorted alignment stream
pub struct AlignmentStream<'a, R> {
    inner: Mutex<StreamInner<R>>,
    contigs: &'a ContigTable,
    min_mapq: u8,
}

impl<'a, R: BufRead> AlignmentStream<'a, R> {
    /// `reader` must be positioned after the SAM header
    pub fn new(reader: R, contigs: &'a ContigTable, min_mapq: u8) -> Self {
        Self {
            inner: Mutex::new(StreamInner {
                reader,
                line: String::new(),
                line_number: 0,
                state: StreamState::ReadingBatch,
                pending: Vec::new(),
                ready: None,
                seen: vec![false; contigs.len()],
                stats: StreamStats::default(),
            }),
            contigs,
            min_mapq,
        }
    }

    /// Take the next complete batch, or `None` once the stream is exhausted.
    ///
    /// # Errors
    ///
    /// Returns `StreamError::Unsorted` if a contig reappears after its batch
    /// was closed, or an I/O or parse error. The stream is finished after any
    /// error.
    pub fn next_batch(&self) -> Result<Option<ContigBatch>, StreamError> {
        let mut inner = self.inner.lock();
        let result = inner.next_batch(self.contigs, self.min_mapq);
        if result.is_err() {
            inner.state = StreamState::Done;
        }
        result
    }

    /// Stop handing out batches
    pub fn abort(&self) {
        self.inner.lock().state = StreamState::Done;
    }

    #[must_use]
    pub fn stats(&self) -> StreamStats {
        self.inner.lock().stats
    }
}

impl<R: BufRead> StreamInner<R> {
    fn next_batch(
        &mut self,
        contigs: &ContigTable,
        min_mapq: u8,
    ) -> Result<Option<ContigBatch>, StreamError> {
        loop {
            match self.state {
                StreamState::Done => return Ok(None),
                StreamState::FlushingBatch => {
                    self.state = StreamState::ReadingBatch;
                    if let Some(batch) = self.ready.take() {
                        self.stats.batches += 1;
                        return Ok(Some(batch));
                    }
                }
                StreamState::ReadingBatch => {
                    let Some(record) = self.read_admitted(contigs, min_mapq)? else {
                        self.state = StreamState::Done;
                        let last = self.take_pending();
                        if last.is_some() {
                            self.stats.batches += 1;
                        }
                        return Ok(last);
                    };

                    let Some(contig) = record.reference else {
                        continue;
                    };
                    let current = self.pending.first().and_then(|r| r.reference);
                    if current == Some(contig) {
                        self.pending.push(record);
                        continue;
                    }

                    if self.seen[contig.index()] {
                        return Err(StreamError::Unsorted(contigs.name(contig).to_string()));
                    }
                    self.seen[contig.index()] = true;

                    self.ready = self.take_pending();
                    self.pending.push(record);
                    self.state = StreamState::FlushingBatch;
                }
            }
        }
    }

    fn take_pending(&mut self) -> Option<ContigBatch> {
        let contig = self.pending.first()?.reference?;
        Some(ContigBatch {
            contig,
            records: std::mem::take(&mut self.pending),
        })
    }

    /// Read records until one passes the filters, or the stream ends
    fn read_admitted(
        &mut self,
        contigs: &ContigTable,
        min_mapq: u8,
    ) -> Result<Option<AlignmentRecord>, StreamError> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_number += 1;
            if self.line.trim().is_empty() {
                continue;
            }
            self.stats.records += 1;

            let mut record = parse_record(&self.line, contigs).map_err(|source| {
                StreamError::Parse {
                    line: self.line_number,
                    source,
                }
            })?;
            if !is_admissible(&record, min_mapq) {
                continue;
            }
            record.clear_payload();
            self.stats.admitted += 1;
            return Ok(Some(record));
        }
    }
}

/// Whether `record` can link its contig to a different contig
#[must_use]
pub fn is_admissible(record: &AlignmentRecord, min_mapq: u8) -> bool {
    !record.is_unmapped()
        && !record.is_mate_unmapped()
        && record.is_paired()
        && record.reference.is_some()
        && record.mate_reference.is_some()
        && record.reference != record.mate_reference
        && record.mapping_quality >= min_mapq
}
