use std::fmt::{self, Display};

use crate::models::region::GenomicRegions;

/// SAM flag bits used by the segment filters.
pub mod flags {
    pub const PAIRED: u16 = 0x1;
    pub const PROPER_PAIR: u16 = 0x2;
    pub const UNMAPPED: u16 = 0x4;
    pub const MATE_UNMAPPED: u16 = 0x8;
    pub const REVERSE: u16 = 0x10;
    pub const MATE_REVERSE: u16 = 0x20;
    pub const FIRST_SEGMENT: u16 = 0x40;
    pub const LAST_SEGMENT: u16 = 0x80;
    pub const SECONDARY: u16 = 0x100;
    pub const QC_FAIL: u16 = 0x200;
    pub const DUPLICATE: u16 = 0x400;
    pub const SUPPLEMENTARY: u16 = 0x800;
}

/// Either read one or read two of a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReadOrder {
    One,
    Two,
}

impl ReadOrder {
    pub fn mate(&self) -> ReadOrder {
        match self {
            ReadOrder::One => ReadOrder::Two,
            ReadOrder::Two => ReadOrder::One,
        }
    }
}

impl Display for ReadOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadOrder::One => write!(f, "ONE"),
            ReadOrder::Two => write!(f, "TWO"),
        }
    }
}

///
/// The alignment payload carried by a [PlacedSegment]. The callers never
/// look inside it except for flags and mapping quality; it is what tells
/// two alignments of the same read apart, and what gets exported.
///
/// Positions are 1-based. A missing mapping quality counts as 0; sources
/// that read 255 ("unavailable") keep it as 255. `tags` holds the optional
/// fields in SAM text form (`SA:Z:chr14,105600100,+,60M40S,60,0;`).
///
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AlignmentRecord {
    pub flags: u16,
    pub reference_name: Option<String>,
    pub position: Option<u32>,
    pub mapping_quality: Option<u8>,
    pub cigar: String,
    pub mate_reference_name: Option<String>,
    pub mate_position: Option<u32>,
    pub template_length: i32,
    pub sequence: String,
    pub quality_scores: String,
    pub tags: Vec<String>,
}

impl AlignmentRecord {
    pub fn has_flag(&self, flag: u16) -> bool {
        self.flags & flag != 0
    }

    pub fn is_supplementary(&self) -> bool {
        self.has_flag(flags::SUPPLEMENTARY)
    }

    pub fn is_first_segment(&self) -> bool {
        self.has_flag(flags::FIRST_SEGMENT)
    }

    pub fn mapping_quality_or_zero(&self) -> u8 {
        self.mapping_quality.unwrap_or(0)
    }

    /// The optional field with the two-letter `tag`, in SAM text form
    pub fn tag(&self, tag: &str) -> Option<&str> {
        self.tags
            .iter()
            .map(String::as_str)
            .find(|field| field.len() > 2 && field.starts_with(tag) && field.as_bytes()[2] == b':')
    }
}

///
/// A placed segment: one alignment of one read, remembered together with the
/// set of query regions it was retrieved under. `location` is NOT the
/// alignment's own coordinates.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlacedSegment {
    pub read_name: String,
    pub location: GenomicRegions,
    pub read_order: ReadOrder,
    pub content: AlignmentRecord,
}

impl PlacedSegment {
    pub fn new(read_name: impl Into<String>, location: GenomicRegions, read_order: ReadOrder) -> Self {
        PlacedSegment {
            read_name: read_name.into(),
            location,
            read_order,
            content: AlignmentRecord::default(),
        }
    }

    pub fn with_content(mut self, content: AlignmentRecord) -> Self {
        self.content = content;
        self
    }
}
