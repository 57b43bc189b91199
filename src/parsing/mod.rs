//! Readers for the estimator's inputs.
//!
//! - **SAM**: the `@SQ` header block becomes the locked contig table; each
//!   alignment line becomes an [`AlignmentRecord`](crate::core::alignment::AlignmentRecord)
//! - **Histogram**: `value count` lines describing the fragment-size distribution
//! - **Input**: plain, gzip-compressed, or standard-input streams
//!
//! ## Supported Tags
//!
//! | Tag | Description | Required |
//! |-----|-------------|----------|
//! | SN  | Sequence name (`@SQ`) | Yes |
//! | LN  | Sequence length (`@SQ`) | Yes |
//! | MC  | Mate CIGAR (alignment line) | No |

pub mod histogram;
pub mod input;
pub mod sam;
