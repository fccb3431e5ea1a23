//! Shared-substring discovery between two texts.
//!
//! The scan walks text A left to right. At each cursor it takes the
//! `min_length` chars starting there as an anchor, looks up the leftmost
//! occurrence of the anchor in text B, and greedily extends the run while both
//! texts agree. A hit moves the cursor past the claimed region; a miss moves
//! it by one char.
//!
//! Raw hits never overlap on side A but can claim the same region of B, so
//! [`filter_overlapping_matches`] keeps the longest spans that are disjoint on
//! both sides.
//!
//! Offsets are char indices. Anchor lookups go through an index of the
//! leftmost position of every window of B, which yields the same boundaries as
//! a literal left-to-right substring search.

use std::collections::HashMap;

use crate::document::MatchSpan;

/// Find non-overlapping shared substrings of at least `min_length` chars.
///
/// Returned spans are disjoint on both sides and ordered by `a_start`.
/// A `min_length` of zero is treated as one.
#[tracing::instrument(skip(text_a, text_b), fields(len_a = text_a.len(), len_b = text_b.len()))]
pub fn find_matches(text_a: &str, text_b: &str, min_length: usize) -> Vec<MatchSpan> {
    let a: Vec<char> = text_a.chars().collect();
    let b: Vec<char> = text_b.chars().collect();

    let raw = find_raw_matches(&a, &b, min_length);
    let raw_count = raw.len();
    let filtered = filter_overlapping_matches(raw);

    tracing::debug!(
        raw = raw_count,
        kept = filtered.len(),
        "match discovery finished"
    );
    filtered
}

/// Run the anchor scan over char slices, returning spans in discovery order.
pub fn find_raw_matches(a: &[char], b: &[char], min_length: usize) -> Vec<MatchSpan> {
    let min_length = min_length.max(1);
    if a.len() < min_length || b.len() < min_length {
        return Vec::new();
    }

    let index = AnchorIndex::build(b, min_length);
    let mut spans = Vec::new();
    let mut i = 0;

    while i + min_length <= a.len() {
        let Some(j) = index.leftmost(&a[i..i + min_length]) else {
            i += 1;
            continue;
        };

        let mut k = min_length;
        while i + k < a.len() && j + k < b.len() && a[i + k] == b[j + k] {
            k += 1;
        }

        spans.push(MatchSpan {
            a_start: i,
            a_end: i + k,
            b_start: j,
            b_end: j + k,
        });
        i += k;
    }

    spans
}

/// Keep the longest spans that overlap no previously kept span on either side.
///
/// Spans are considered longest first (by side-A length); equal lengths keep
/// discovery order. The survivors are returned ordered by `a_start`.
pub fn filter_overlapping_matches(mut matches: Vec<MatchSpan>) -> Vec<MatchSpan> {
    if matches.len() <= 1 {
        return matches;
    }

    // Stable sort: ties stay in discovery order.
    matches.sort_by(|x, y| y.len_a().cmp(&x.len_a()));

    let mut kept: Vec<MatchSpan> = Vec::with_capacity(matches.len());
    for candidate in matches {
        if !kept.iter().any(|k| k.overlaps(&candidate)) {
            kept.push(candidate);
        }
    }

    kept.sort_by_key(|m| m.a_start);
    kept
}

/// Leftmost start position of every `width`-char window of a text.
struct AnchorIndex<'a> {
    positions: HashMap<&'a [char], usize>,
}

impl<'a> AnchorIndex<'a> {
    fn build(text: &'a [char], width: usize) -> Self {
        let mut positions = HashMap::with_capacity(text.len().saturating_sub(width) + 1);
        for (pos, window) in text.windows(width).enumerate() {
            positions.entry(window).or_insert(pos);
        }
        Self { positions }
    }

    fn leftmost(&self, anchor: &[char]) -> Option<usize> {
        self.positions.get(anchor).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(a_start: usize, a_end: usize, b_start: usize, b_end: usize) -> MatchSpan {
        MatchSpan {
            a_start,
            a_end,
            b_start,
            b_end,
        }
    }

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn slice(text: &str, start: usize, end: usize) -> String {
        text.chars().skip(start).take(end - start).collect()
    }

    fn assert_disjoint(matches: &[MatchSpan]) {
        for (i, x) in matches.iter().enumerate() {
            for y in &matches[i + 1..] {
                assert!(!x.overlaps(y), "{x:?} overlaps {y:?}");
            }
        }
    }

    #[test]
    fn short_inputs_yield_nothing() {
        assert!(find_matches("short", "short text here", 10).is_empty());
        assert!(find_matches("long enough text", "tiny", 10).is_empty());
        assert!(find_matches("", "", 10).is_empty());
    }

    #[test]
    fn identical_texts_match_entirely() {
        let text = "the quick brown fox jumps over the lazy dog";
        let matches = find_matches(text, text, 10);
        let len = text.chars().count();
        assert_eq!(matches, vec![span(0, len, 0, len)]);
    }

    #[test]
    fn quick_brown_fox_example() {
        let a = "the quick brown fox jumps over the lazy dog";
        let b = "a quick brown fox jumps over a lazy dog";
        let matches = find_matches(a, b, 10);
        assert_eq!(matches.len(), 1);
        let m = matches[0];
        assert_eq!(slice(a, m.a_start, m.a_end), " quick brown fox jumps over ");
        assert_eq!(slice(b, m.b_start, m.b_end), " quick brown fox jumps over ");
    }

    #[test]
    fn disjoint_texts_have_no_matches() {
        let matches = find_matches(
            "alpha beta gamma delta epsilon",
            "zulu yankee xray whiskey victor",
            10,
        );
        assert!(matches.is_empty());
    }

    #[test]
    fn run_is_extended_past_the_anchor() {
        let a = "xxxx shared region of text yyyy";
        let b = "zz shared region of text qq";
        let matches = find_matches(a, b, 8);
        assert_eq!(matches.len(), 1);
        let m = matches[0];
        assert_eq!(slice(a, m.a_start, m.a_end), " shared region of text ");
        assert_eq!(m.len_a(), m.len_b());
    }

    #[test]
    fn anchor_uses_leftmost_occurrence_in_b() {
        let a = "0123456789";
        let b = "..0123456789..0123456789";
        let matches = find_matches(a, b, 5);
        assert_eq!(matches, vec![span(0, 10, 2, 12)]);
    }

    #[test]
    fn repeated_region_in_a_is_claimed_once_in_b() {
        // Both copies in A anchor to the single copy in B; only one survives.
        let a = "abcdefghij---abcdefghij";
        let b = "abcdefghij";
        let raw = find_raw_matches(&chars(a), &chars(b), 5);
        assert_eq!(raw.len(), 2);
        let matches = find_matches(a, b, 5);
        assert_eq!(matches, vec![span(0, 10, 0, 10)]);
    }

    #[test]
    fn results_are_disjoint_and_sorted() {
        let a = "one two three four five six seven eight nine ten one two three four";
        let b = "seven eight nine ten one two three four five six";
        let matches = find_matches(a, b, 6);
        assert!(!matches.is_empty());
        assert_disjoint(&matches);
        assert!(matches.windows(2).all(|w| w[0].a_start <= w[1].a_start));
        for m in &matches {
            assert!(m.len_a() >= 6);
            assert_eq!(slice(a, m.a_start, m.a_end), slice(b, m.b_start, m.b_end));
        }
    }

    #[test]
    fn multibyte_offsets_are_char_based() {
        let a = "ééé common phrase here";
        let b = "common phrase here ü";
        let matches = find_matches(a, b, 10);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].a_start, 4);
        assert_eq!(matches[0].b_start, 0);
    }

    #[test]
    fn zero_min_length_is_treated_as_one() {
        let matches = find_matches("ab", "b", 0);
        assert_eq!(matches, vec![span(1, 2, 0, 1)]);
    }

    #[test]
    fn filter_prefers_longer_spans() {
        let raw = vec![span(0, 10, 0, 10), span(20, 40, 5, 25), span(50, 55, 30, 35)];
        let kept = filter_overlapping_matches(raw);
        assert_eq!(kept, vec![span(20, 40, 5, 25), span(50, 55, 30, 35)]);
    }

    #[test]
    fn filter_ties_keep_discovery_order() {
        let raw = vec![span(0, 10, 100, 110), span(30, 40, 105, 115)];
        let kept = filter_overlapping_matches(raw);
        assert_eq!(kept, vec![span(0, 10, 100, 110)]);
    }

    #[test]
    fn filter_treats_touching_spans_as_disjoint() {
        let raw = vec![span(0, 10, 0, 10), span(10, 20, 10, 20)];
        assert_eq!(filter_overlapping_matches(raw.clone()), raw);
    }

    #[test]
    fn filter_output_is_sorted_by_a_start() {
        let raw = vec![span(40, 45, 0, 5), span(0, 20, 10, 30)];
        let kept = filter_overlapping_matches(raw);
        assert_eq!(kept, vec![span(0, 20, 10, 30), span(40, 45, 0, 5)]);
    }
}
