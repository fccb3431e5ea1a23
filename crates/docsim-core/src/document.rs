//! Document and comparison data model.
//!
//! These are plain value objects: the ingestion layer builds [`Document`]s,
//! the comparator returns [`ComparisonResult`]s, and nothing here is mutated
//! once produced.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A document handed to the comparator by an ingestion collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Document {
    /// Opaque identifier, unique within one comparison run.
    pub id: String,
    /// Display name (usually the file name).
    pub name: String,
    /// MIME type or bare file extension (`text/x-python`, `py`, `report.docx`).
    pub mime_or_ext: String,
    /// Size of the original file in bytes.
    pub size: u64,
    /// Extracted plain text. Empty when extraction failed upstream.
    pub content: String,
}

impl Document {
    /// Create a document from its parts.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        mime_or_ext: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let content = content.into();
        Self {
            id: id.into(),
            name: name.into(),
            mime_or_ext: mime_or_ext.into(),
            size: content.len() as u64,
            content,
        }
    }

    /// Lowercased extension derived from the declared type, falling back to the name.
    ///
    /// `text/javascript` yields `javascript`, `main.rs` yields `rs`.
    pub fn extension(&self) -> String {
        let declared = declared_extension(&self.mime_or_ext);
        if declared.is_empty() {
            declared_extension(&self.name)
        } else {
            declared
        }
    }

    /// Lowercased extension of the display name, if it has one.
    ///
    /// `src/app.py` yields `py`; `README` yields `None`.
    pub fn name_extension(&self) -> Option<String> {
        let base = self.name.rsplit(['/', '\\']).next().unwrap_or_default();
        base.rsplit_once('.')
            .map(|(_, ext)| ext.trim().to_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// Reduce a MIME type, path, or extension to a lowercase extension key.
pub(crate) fn declared_extension(declared: &str) -> String {
    let last = declared.rsplit('/').next().unwrap_or_default();
    let ext = last.rsplit_once('.').map_or(last, |(_, ext)| ext);
    ext.trim().to_lowercase()
}

/// A matched region shared by two documents.
///
/// Offsets are char (Unicode scalar) indices into the original `content` of
/// each document, half-open: `[a_start, a_end)` and `[b_start, b_end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct MatchSpan {
    /// Start offset in document A.
    pub a_start: usize,
    /// End offset (exclusive) in document A.
    pub a_end: usize,
    /// Start offset in document B.
    pub b_start: usize,
    /// End offset (exclusive) in document B.
    pub b_end: usize,
}

impl MatchSpan {
    /// Number of chars covered on side A.
    pub const fn len_a(&self) -> usize {
        self.a_end - self.a_start
    }

    /// Number of chars covered on side B.
    pub const fn len_b(&self) -> usize {
        self.b_end - self.b_start
    }

    /// Whether the two spans intersect on side A or on side B.
    pub const fn overlaps(&self, other: &Self) -> bool {
        let on_a = self.a_start < other.a_end && other.a_start < self.a_end;
        let on_b = self.b_start < other.b_end && other.b_start < self.b_end;
        on_a || on_b
    }

    /// The `(start, end)` pair for one side.
    pub const fn range(&self, side: Side) -> (usize, usize) {
        match side {
            Side::A => (self.a_start, self.a_end),
            Side::B => (self.b_start, self.b_end),
        }
    }
}

/// Outcome of comparing one unordered pair of documents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ComparisonResult {
    /// Deterministic id of the form `pair-{i}-{j}` (input indices).
    pub id: String,
    /// Id of the first document of the pair.
    pub document_a_id: String,
    /// Id of the second document of the pair.
    pub document_b_id: String,
    /// Blended similarity in `[0, 100]`, rounded to two decimals.
    pub similarity_percentage: f64,
    /// Non-overlapping spans ordered by `a_start`.
    pub matches: Vec<MatchSpan>,
}

impl ComparisonResult {
    /// Coarse band for display.
    pub fn band(&self) -> SimilarityBand {
        SimilarityBand::from_percentage(self.similarity_percentage)
    }
}

/// Coarse similarity classification used when presenting results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum SimilarityBand {
    /// 70% and above.
    High,
    /// 40% up to 70%.
    Medium,
    /// Below 40%.
    Low,
}

impl SimilarityBand {
    /// Classify a similarity percentage.
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 70.0 {
            Self::High
        } else if percentage >= 40.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Returns the band name as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl std::fmt::Display for SimilarityBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which document of a pair a span offset refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The first document (`a_*` offsets).
    A,
    /// The second document (`b_*` offsets).
    B,
}

/// A contiguous slice of a document, flagged when it belongs to a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    /// The text of this segment.
    pub text: &'a str,
    /// 1-based index of the match this segment belongs to, if any.
    pub match_number: Option<usize>,
}

/// Split `content` into plain and matched segments for one side of a result.
///
/// Spans are visited in the order given. On side B the spans are not sorted,
/// so a span starting before the previous one ended is clipped to keep the
/// segments disjoint; spans clipped to nothing are skipped.
pub fn highlight_segments<'a>(
    content: &'a str,
    matches: &[MatchSpan],
    side: Side,
) -> Vec<Segment<'a>> {
    // Byte offset for every char index, plus the end of the string.
    let boundaries: Vec<usize> = content
        .char_indices()
        .map(|(byte, _)| byte)
        .chain(std::iter::once(content.len()))
        .collect();
    let char_len = boundaries.len() - 1;
    let byte_at = |idx: usize| boundaries[idx.min(char_len)];

    let mut segments = Vec::new();
    let mut cursor = 0usize;

    for (idx, span) in matches.iter().enumerate() {
        let (start, end) = span.range(side);
        let start = start.max(cursor).min(char_len);
        let end = end.min(char_len);
        if end <= start {
            continue;
        }
        if start > cursor {
            segments.push(Segment {
                text: &content[byte_at(cursor)..byte_at(start)],
                match_number: None,
            });
        }
        segments.push(Segment {
            text: &content[byte_at(start)..byte_at(end)],
            match_number: Some(idx + 1),
        });
        cursor = end;
    }

    if cursor < char_len {
        segments.push(Segment {
            text: &content[byte_at(cursor)..],
            match_number: None,
        });
    }

    segments
}
