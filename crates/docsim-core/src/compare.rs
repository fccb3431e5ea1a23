//! Pairwise comparison of a document set.
//!
//! Every unordered pair `(i, j)` with `i < j` is compared once, in input
//! order. Pairs are independent; with [`CompareSettings::parallel`] they are
//! dispatched onto the rayon pool and collected back in enumeration order, so
//! the output is identical either way.
//!
//! Match spans are always found on the original content. When either side of a
//! pair looks like source code, both sides are normalized and the normalized
//! text feeds the word-overlap term only.

use std::collections::BTreeMap;

use rayon::prelude::*;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::document::{ComparisonResult, Document};
use crate::error::{CompareError, CompareResult};
use crate::matching::find_matches;
use crate::normalize::{
    CommentStyle, comment_style, default_code_extensions, default_comment_syntax,
    is_code_content, normalize_code,
};
use crate::similarity::{BlendWeights, blend, jaccard_similarity, matched_ratio};

/// Default minimum match length, in chars.
pub const DEFAULT_MIN_MATCH_LENGTH: usize = 20;

/// Tunables for [`compare_all`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct CompareSettings {
    /// Shortest shared run, in chars, reported as a match.
    pub min_match_length: usize,
    /// Blend of matched coverage and word overlap.
    pub weights: BlendWeights,
    /// Extensions that always mark a document as code.
    pub code_extensions: Vec<String>,
    /// Language key (extension, MIME subtype or name) to comment family.
    pub comment_syntax: BTreeMap<String, CommentStyle>,
    /// Compare pairs on the rayon thread pool.
    pub parallel: bool,
}

impl Default for CompareSettings {
    fn default() -> Self {
        Self {
            min_match_length: DEFAULT_MIN_MATCH_LENGTH,
            weights: BlendWeights::default(),
            code_extensions: default_code_extensions(),
            comment_syntax: default_comment_syntax(),
            parallel: true,
        }
    }
}

impl CompareSettings {
    /// Override the minimum match length.
    #[must_use]
    pub fn with_min_match_length(mut self, min_match_length: usize) -> Self {
        self.min_match_length = min_match_length;
        self
    }

    /// Enable or disable parallel pair comparison.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

/// Compare every unordered pair of `documents`.
///
/// Results are ordered by `(i, j)`: outer index first, then inner.
///
/// # Errors
///
/// Returns [`CompareError::InsufficientInput`] when fewer than two documents
/// are supplied.
#[tracing::instrument(skip_all, fields(documents = documents.len(), parallel = settings.parallel))]
pub fn compare_all(
    documents: &[Document],
    settings: &CompareSettings,
) -> CompareResult<Vec<ComparisonResult>> {
    if documents.len() < 2 {
        return Err(CompareError::InsufficientInput {
            provided: documents.len(),
        });
    }

    let pairs: Vec<(usize, usize)> = (0..documents.len())
        .flat_map(|i| (i + 1..documents.len()).map(move |j| (i, j)))
        .collect();

    let compare =
        |&(i, j): &(usize, usize)| compare_pair(i, j, &documents[i], &documents[j], settings);
    let results: Vec<ComparisonResult> = if settings.parallel {
        pairs.par_iter().map(compare).collect()
    } else {
        pairs.iter().map(compare).collect()
    };

    tracing::info!(pairs = results.len(), "comparison finished");
    Ok(results)
}

/// Compare a single pair. `i` and `j` only feed the result id.
#[tracing::instrument(skip(a, b, settings), fields(a = %a.id, b = %b.id))]
pub fn compare_pair(
    i: usize,
    j: usize,
    a: &Document,
    b: &Document,
    settings: &CompareSettings,
) -> ComparisonResult {
    let code_like = is_code_document(a, &settings.code_extensions)
        || is_code_document(b, &settings.code_extensions);

    let matches = find_matches(&a.content, &b.content, settings.min_match_length);

    let jaccard = if code_like {
        let lang_a = language_key(a, &settings.comment_syntax);
        let lang_b = language_key(b, &settings.comment_syntax);
        let norm_a = normalize_code(&a.content, &lang_a, &settings.comment_syntax);
        let norm_b = normalize_code(&b.content, &lang_b, &settings.comment_syntax);
        jaccard_similarity(&norm_a, &norm_b)
    } else {
        jaccard_similarity(&a.content, &b.content)
    };

    let similarity_percentage = blend(
        matched_ratio(&a.content, &matches),
        jaccard,
        &settings.weights,
    );

    tracing::debug!(
        code_like,
        matches = matches.len(),
        similarity = similarity_percentage,
        "pair compared"
    );

    ComparisonResult {
        id: format!("pair-{i}-{j}"),
        document_a_id: a.id.clone(),
        document_b_id: b.id.clone(),
        similarity_percentage,
        matches,
    }
}

/// Code by declared type, by file name, or by content.
fn is_code_document(doc: &Document, code_extensions: &[String]) -> bool {
    let by_name = doc
        .name_extension()
        .is_some_and(|ext| code_extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)));
    by_name || is_code_content(&doc.content, &doc.extension(), code_extensions)
}

/// Key for comment stripping: the declared type when it names a comment
/// family, otherwise the file name's extension.
fn language_key(doc: &Document, comment_syntax: &BTreeMap<String, CommentStyle>) -> String {
    let declared = doc.extension();
    if comment_style(&declared, comment_syntax).is_some() {
        return declared;
    }
    doc.name_extension()
        .filter(|ext| comment_style(ext, comment_syntax).is_some())
        .unwrap_or(declared)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, ext: &str, content: &str) -> Document {
        Document::new(id, format!("{id}.{ext}"), ext, content)
    }

    const SHARED: &str = "the shared passage appears verbatim in both of these documents";

    fn sample_set() -> Vec<Document> {
        vec![
            doc("a", "txt", SHARED),
            doc(
                "b",
                "txt",
                &format!("{SHARED} followed by a long tail of entirely unrelated words here"),
            ),
            doc("c", "txt", "completely different vocabulary with nothing in common"),
        ]
    }

    #[test]
    fn fewer_than_two_documents_is_an_error() {
        let settings = CompareSettings::default();
        assert_eq!(
            compare_all(&[], &settings),
            Err(CompareError::InsufficientInput { provided: 0 })
        );
        assert_eq!(
            compare_all(&[doc("a", "txt", "alone")], &settings),
            Err(CompareError::InsufficientInput { provided: 1 })
        );
    }

    #[test]
    fn pairs_are_enumerated_in_input_order() {
        let results = compare_all(&sample_set(), &CompareSettings::default()).unwrap();
        let ids: Vec<_> = results.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["pair-0-1", "pair-0-2", "pair-1-2"]);
        assert_eq!(results[1].document_a_id, "a");
        assert_eq!(results[1].document_b_id, "c");
    }

    #[test]
    fn repeated_runs_are_identical() {
        let docs = sample_set();
        let settings = CompareSettings::default();
        let first = serde_json::to_string(&compare_all(&docs, &settings).unwrap()).unwrap();
        let second = serde_json::to_string(&compare_all(&docs, &settings).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let docs = sample_set();
        let parallel = compare_all(&docs, &CompareSettings::default()).unwrap();
        let sequential =
            compare_all(&docs, &CompareSettings::default().with_parallel(false)).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn score_is_intentionally_asymmetric() {
        // Coverage is measured against the first document of the pair, so a
        // short text contained in a long one scores higher in that direction.
        let docs = sample_set();
        let settings = CompareSettings::default();
        let forward = compare_all(&docs[..2], &settings).unwrap();
        let reversed = compare_all(&[docs[1].clone(), docs[0].clone()], &settings).unwrap();
        assert!(
            forward[0].similarity_percentage > reversed[0].similarity_percentage,
            "{} should exceed {}",
            forward[0].similarity_percentage,
            reversed[0].similarity_percentage
        );
    }

    #[test]
    fn identical_content_scores_100() {
        let docs = [doc("x", "txt", SHARED), doc("y", "txt", SHARED)];
        let results = compare_all(&docs, &CompareSettings::default()).unwrap();
        assert_eq!(results[0].similarity_percentage, 100.0);
        assert_eq!(results[0].matches.len(), 1);
    }

    #[test]
    fn disjoint_content_scores_zero() {
        let docs = [
            doc("x", "txt", "alpha beta gamma delta epsilon zeta eta theta"),
            doc("y", "txt", "one two three four five six seven eight nine"),
        ];
        let results = compare_all(&docs, &CompareSettings::default()).unwrap();
        assert_eq!(results[0].similarity_percentage, 0.0);
        assert!(results[0].matches.is_empty());
    }

    #[test]
    fn quick_brown_fox_with_short_matches() {
        let docs = [
            doc("a", "txt", "the quick brown fox jumps over the lazy dog"),
            doc("b", "txt", "a quick brown fox jumps over a lazy dog"),
        ];
        let settings = CompareSettings::default().with_min_match_length(10);
        let results = compare_all(&docs, &settings).unwrap();
        assert!(!results[0].matches.is_empty());
        assert!(results[0].similarity_percentage > 0.0);
    }

    #[test]
    fn matches_never_overlap() {
        let docs = sample_set();
        let settings = CompareSettings::default().with_min_match_length(5);
        for result in compare_all(&docs, &settings).unwrap() {
            for (i, x) in result.matches.iter().enumerate() {
                for y in &result.matches[i + 1..] {
                    assert!(!x.overlaps(y), "{} has overlapping spans", result.id);
                }
            }
        }
    }

    #[test]
    fn code_comments_do_not_count_towards_word_overlap() {
        let a = "int total = 0; // running sum of every value seen so far";
        let b = "int total = 0; /* completely other remark */";
        let as_code = [doc("a", "c", a), doc("b", "c", b)];
        let as_text = [doc("a", "txt", a), doc("b", "txt", b)];
        let settings = CompareSettings::default();
        let code = compare_all(&as_code, &settings).unwrap();
        let text = compare_all(&as_text, &settings).unwrap();
        assert!(code[0].similarity_percentage > text[0].similarity_percentage);
        // Spans still point into the original content.
        assert_eq!(code[0].matches, text[0].matches);
    }

    #[test]
    fn file_name_marks_code_when_mime_subtype_is_unknown() {
        let a = "total = 0 # running sum of every value seen so far";
        let b = "total = 0 # a different remark";
        let settings = CompareSettings::default();

        let as_code = [
            Document::new("a", "app.py", "text/x-script", a),
            Document::new("b", "lib.py", "text/x-script", b),
        ];
        let as_text = [
            Document::new("a", "app.txt", "text/plain", a),
            Document::new("b", "lib.txt", "text/plain", b),
        ];
        assert!(is_code_document(&as_code[0], &settings.code_extensions));
        assert!(!is_code_document(&as_text[0], &settings.code_extensions));
        assert_eq!(language_key(&as_code[0], &settings.comment_syntax), "py");

        let code = compare_all(&as_code, &settings).unwrap();
        let text = compare_all(&as_text, &settings).unwrap();
        assert!(code[0].similarity_percentage > text[0].similarity_percentage);
    }

    #[test]
    fn settings_deserialize_with_defaults() {
        let settings: CompareSettings =
            serde_yaml::from_str("min_match_length: 12\nweights:\n  matched: 0.5\n").unwrap();
        assert_eq!(settings.min_match_length, 12);
        assert_eq!(settings.weights.matched, 0.5);
        assert_eq!(settings.weights.jaccard, 0.3);
        assert!(settings.parallel);
        assert_eq!(settings.comment_syntax.get("py"), Some(&CommentStyle::Python));
    }
}
