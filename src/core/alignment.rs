use noodles::sam::alignment::record::Flags;

use crate::core::contig::ContigId;

/// One end of a paired-end alignment, reduced to what distance estimation
/// needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentRecord {
    /// Read name, dropped once the record is admitted into a batch
    pub name: String,

    pub flags: Flags,

    /// Contig this end aligned to (`None` for `*`)
    pub reference: Option<ContigId>,

    /// Contig the mate aligned to (`None` for `*`)
    pub mate_reference: Option<ContigId>,

    pub mapping_quality: u8,

    /// 0-based position on the contig where the first base of the read
    /// would fall, extrapolated through clipping
    pub target_at_query_start: i32,

    /// Same as `target_at_query_start`, for the mate
    pub mate_target_at_query_start: i32,
}

impl AlignmentRecord {
    #[must_use]
    pub fn is_paired(&self) -> bool {
        self.flags.is_segmented()
    }

    #[must_use]
    pub fn is_unmapped(&self) -> bool {
        self.flags.is_unmapped()
    }

    #[must_use]
    pub fn is_mate_unmapped(&self) -> bool {
        self.flags.is_mate_unmapped()
    }

    #[must_use]
    pub fn is_reverse(&self) -> bool {
        self.flags.is_reverse_complemented()
    }

    #[must_use]
    pub fn is_mate_reverse(&self) -> bool {
        self.flags.is_mate_reverse_complemented()
    }

    /// Release fields that are not needed after filtering
    pub fn clear_payload(&mut self) {
        self.name = String::new();
    }
}
