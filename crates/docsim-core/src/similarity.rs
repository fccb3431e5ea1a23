//! Similarity scoring.
//!
//! The percentage is a heuristic blend of two terms:
//!
//! - matched coverage: chars of text A covered by match spans, over the char
//!   length of text A (so the score is deliberately asymmetric);
//! - word-set Jaccard overlap of the two texts.
//!
//! The blend weights default to 0.7 / 0.3. They are tunables, not derived
//! constants.

use std::collections::HashSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::document::MatchSpan;

/// Weights applied to the matched-coverage and Jaccard terms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct BlendWeights {
    /// Weight of the matched-coverage percentage.
    pub matched: f64,
    /// Weight of the Jaccard percentage.
    pub jaccard: f64,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            matched: 0.7,
            jaccard: 0.3,
        }
    }
}

/// Lowercased, whitespace-separated word set.
pub fn word_set(text: &str) -> HashSet<String> {
    text.split_whitespace().map(str::to_lowercase).collect()
}

/// Jaccard index of the word sets of two texts, in `[0, 1]`.
///
/// Two texts without any words score 0.
pub fn jaccard_similarity(text_a: &str, text_b: &str) -> f64 {
    let set_a = word_set(text_a);
    let set_b = word_set(text_b);

    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Percentage of text A covered by the given spans.
pub fn matched_ratio(text_a: &str, matches: &[MatchSpan]) -> f64 {
    let matched: usize = matches.iter().map(MatchSpan::len_a).sum();
    let length = text_a.chars().count().max(1);
    matched as f64 / length as f64 * 100.0
}

/// Blend a coverage percentage and a Jaccard index into a final percentage.
///
/// The result is clamped to `[0, 100]` and rounded to two decimals.
pub fn blend(matched_percentage: f64, jaccard: f64, weights: &BlendWeights) -> f64 {
    let raw = matched_percentage.mul_add(weights.matched, jaccard * 100.0 * weights.jaccard);
    round2(raw.clamp(0.0, 100.0))
}

/// Similarity percentage of two texts given the spans found between them.
pub fn similarity_percentage(
    text_a: &str,
    text_b: &str,
    matches: &[MatchSpan],
    weights: &BlendWeights,
) -> f64 {
    blend(
        matched_ratio(text_a, matches),
        jaccard_similarity(text_a, text_b),
        weights,
    )
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
