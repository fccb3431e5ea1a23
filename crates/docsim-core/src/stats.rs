//! Lexical and statistical features of a single text.
//!
//! Every function here is total: empty or degenerate input yields zero rather
//! than an error, with `max(x, 1)` denominators throughout.
//!
//! Two word notions are in play. "Tokens" are `\b\w+\b` matches and drive
//! vocabulary, word-length and ratio features. Whitespace-separated words drive
//! the filler ratio and the trigram repetition check.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::word_lists::FIRST_PERSON_PRONOUNS;

/// Word tokens.
static WORD_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b\w+\b").expect("valid regex"));

/// Sentence terminators.
static SENTENCE_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[.!?]+").expect("valid regex"));

/// Variance at which the normalized sentence-length variance saturates.
const VARIANCE_SCALE: f64 = 25.0;

/// Raw feature values computed from one text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TextStats {
    /// Unique tokens over total tokens (case-folded).
    pub vocab_diversity: f64,
    /// Population variance of sentence word counts, over 25, capped at 1.
    pub sentence_length_variance: f64,
    /// Filler occurrences over whitespace word count.
    pub filler_word_ratio: f64,
    /// Distinct repeated word trigrams over possible trigram positions.
    pub repetition_score: f64,
    /// Mean token length in chars.
    pub average_word_length: f64,
    /// Average token length over 10, capped at 1.
    pub formality_score: f64,
    /// First-person pronouns over tokens, times 20.
    pub personal_anecdote_score: f64,
    /// Technical terms over tokens, times 10.
    pub technical_term_consistency: f64,
    /// Transition words per sentence.
    pub transition_score: f64,
    /// Number of word tokens.
    pub word_count: usize,
    /// Number of non-blank sentences.
    pub sentence_count: usize,
}

/// Compiled filler, technical and transition patterns.
///
/// Build once per set of word lists and reuse it across texts.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    fillers: Vec<Regex>,
    technical: Option<Regex>,
    transitions: Option<Regex>,
}

impl Vocabulary {
    /// Compile the given lists. Blank entries are skipped; entries that fail
    /// to compile are logged and skipped.
    pub fn new(
        filler_words: &[String],
        technical_terms: &[String],
        transition_words: &[String],
    ) -> Self {
        let fillers = filler_words
            .iter()
            .filter(|w| !w.trim().is_empty())
            .filter_map(|w| {
                compile(
                    &format!(r"(?i)\b{}\b", regex::escape(w)),
                    "filler pattern rejected",
                )
            })
            .collect();

        Self {
            fillers,
            technical: term_pattern(technical_terms),
            transitions: term_pattern(transition_words),
        }
    }

    /// Whole-word filler occurrences, each list entry counted on its own.
    pub fn filler_count(&self, text: &str) -> usize {
        self.fillers.iter().map(|re| re.find_iter(text).count()).sum()
    }

    /// Technical-term occurrences.
    pub fn technical_count(&self, text: &str) -> usize {
        self.technical.as_ref().map_or(0, |re| re.find_iter(text).count())
    }

    /// Transition-word occurrences.
    pub fn transition_count(&self, text: &str) -> usize {
        self.transitions.as_ref().map_or(0, |re| re.find_iter(text).count())
    }
}

fn compile(pattern: &str, message: &'static str) -> Option<Regex> {
    match Regex::new(pattern) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(error = %e, "{message}");
            None
        }
    }
}

/// One case-insensitive whole-word alternation, so a position counts once.
fn term_pattern(terms: &[String]) -> Option<Regex> {
    let alternatives: Vec<String> = terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| regex::escape(t))
        .collect();
    if alternatives.is_empty() {
        return None;
    }
    compile(
        &format!(r"(?i)\b(?:{})\b", alternatives.join("|")),
        "term pattern rejected",
    )
}

impl TextStats {
    /// Compute all features for `text` with the given vocabularies.
    pub fn compute(
        text: &str,
        filler_words: &[String],
        technical_terms: &[String],
        transition_words: &[String],
    ) -> Self {
        let vocabulary = Vocabulary::new(filler_words, technical_terms, transition_words);
        Self::compute_with(text, &vocabulary)
    }

    /// Compute all features for `text` with precompiled patterns.
    #[tracing::instrument(skip_all, fields(text_len = text.len()))]
    pub fn compute_with(text: &str, vocabulary: &Vocabulary) -> Self {
        let tokens = word_tokens(text);
        let sentences = split_sentences(text);
        let token_count = tokens.len().max(1) as f64;
        let average_word_length = average_word_length(&tokens);

        let pronouns = tokens
            .iter()
            .filter(|t| FIRST_PERSON_PRONOUNS.contains(&t.to_lowercase().as_str()))
            .count();
        let fillers = vocabulary.filler_count(text);
        let technical = vocabulary.technical_count(text);
        let transitions = vocabulary.transition_count(text);

        Self {
            vocab_diversity: vocab_diversity(&tokens),
            sentence_length_variance: sentence_length_variance(&sentences),
            filler_word_ratio: fillers as f64 / text.split_whitespace().count().max(1) as f64,
            repetition_score: repetition_score(text),
            average_word_length,
            formality_score: (average_word_length / 10.0).min(1.0),
            personal_anecdote_score: pronouns as f64 / token_count * 20.0,
            technical_term_consistency: technical as f64 / token_count * 10.0,
            transition_score: transitions as f64 / sentences.len().max(1) as f64,
            word_count: tokens.len(),
            sentence_count: sentences.len(),
        }
    }
}

/// `\b\w+\b` tokens in document order.
pub fn word_tokens(text: &str) -> Vec<&str> {
    WORD_TOKEN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Split on runs of `.`, `!` and `?`, dropping blank segments.
pub fn split_sentences(text: &str) -> Vec<&str> {
    SENTENCE_BREAK
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// Unique case-folded tokens over total tokens.
pub fn vocab_diversity(tokens: &[&str]) -> f64 {
    let unique: HashSet<String> = tokens.iter().map(|t| t.to_lowercase()).collect();
    unique.len() as f64 / tokens.len().max(1) as f64
}

/// Normalized population variance of per-sentence word counts.
///
/// Zero or one sentence has no variance.
pub fn sentence_length_variance(sentences: &[&str]) -> f64 {
    if sentences.len() <= 1 {
        return 0.0;
    }

    let lengths: Vec<f64> = sentences
        .iter()
        .map(|s| s.split_whitespace().count() as f64)
        .collect();
    let n = lengths.len() as f64;
    let mean = lengths.iter().sum::<f64>() / n;
    let variance = lengths.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / n;

    (variance / VARIANCE_SCALE).min(1.0)
}

/// Whole-word filler occurrences over whitespace word count.
///
/// Each list entry is counted on its own, so overlapping entries both count.
pub fn filler_word_ratio(text: &str, filler_words: &[String]) -> f64 {
    let count = Vocabulary::new(filler_words, &[], &[]).filler_count(text);
    count as f64 / text.split_whitespace().count().max(1) as f64
}

/// Share of word-trigram positions whose trigram occurs more than once.
///
/// Counts distinct repeated trigrams, divided by `max(1, words - 2)`.
pub fn repetition_score(text: &str) -> f64 {
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower.split_whitespace().collect();

    let mut counts: HashMap<&[&str], usize> = HashMap::new();
    for trigram in words.windows(3) {
        *counts.entry(trigram).or_insert(0) += 1;
    }

    let repeated = counts.values().filter(|&&c| c > 1).count();
    repeated as f64 / words.len().saturating_sub(2).max(1) as f64
}

/// Mean token length in chars.
pub fn average_word_length(tokens: &[&str]) -> f64 {
    let total: usize = tokens.iter().map(|t| t.chars().count()).sum();
    total as f64 / tokens.len().max(1) as f64
}

/// Case-insensitive whole-word occurrences of any listed term.
///
/// Terms are matched as one alternation, so a position is counted at most once.
pub fn count_terms(text: &str, terms: &[String]) -> usize {
    term_pattern(terms).map_or(0, |re| re.find_iter(text).count())
}
