//! AI-likelihood scoring.
//!
//! Each [`FeatureKey`] turns one [`TextStats`] value into a present/absent
//! judgment with a confidence in `[0, 100]`. The aggregate score sums
//! `confidence / 100 * weight * 100` over present features and is clamped to
//! `[0, 100]`. Weights need not sum to one.
//!
//! Threshold comparisons are strict; label cutoffs are inclusive lower bounds.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, AnalysisResult};
use crate::stats::{TextStats, Vocabulary};
use crate::word_lists::{FILLER_WORDS, TECHNICAL_TERMS, TRANSITION_WORDS};

/// Default minimum trimmed length, in chars, accepted by [`analyze_text`].
pub const DEFAULT_MIN_TEXT_CHARS: usize = 50;

/// The fixed set of scored features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKey {
    /// Repeated word trigrams.
    RepetitivePatterns,
    /// Vocabulary diversity outside the typical band.
    VocabularyDiversity,
    /// Long average word length.
    FormalStructure,
    /// Few first-person pronouns.
    LackOfPersonalAnecdotes,
    /// Uniform sentence lengths.
    SentenceLengthVariance,
    /// Few filler words.
    LowFillerWords,
    /// Frequent stock transitions.
    PredictableTransitions,
    /// Dense technical vocabulary.
    TechnicalTerms,
}

impl FeatureKey {
    /// All features, in report order.
    pub const ALL: [Self; 8] = [
        Self::RepetitivePatterns,
        Self::VocabularyDiversity,
        Self::FormalStructure,
        Self::LackOfPersonalAnecdotes,
        Self::SentenceLengthVariance,
        Self::LowFillerWords,
        Self::PredictableTransitions,
        Self::TechnicalTerms,
    ];

    /// Human-readable feature name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::RepetitivePatterns => "Repetitive patterns",
            Self::VocabularyDiversity => "Unusual vocabulary diversity",
            Self::FormalStructure => "Overly formal structure",
            Self::LackOfPersonalAnecdotes => "Lack of personal anecdotes",
            Self::SentenceLengthVariance => "Statistical sentence length variance",
            Self::LowFillerWords => "Low presence of filler words",
            Self::PredictableTransitions => "Predictable transitions",
            Self::TechnicalTerms => "Technical term consistency",
        }
    }
}

/// Per-feature weight table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FeatureWeights {
    /// Weight of [`FeatureKey::RepetitivePatterns`].
    pub repetitive_patterns: f64,
    /// Weight of [`FeatureKey::VocabularyDiversity`].
    pub vocabulary_diversity: f64,
    /// Weight of [`FeatureKey::FormalStructure`].
    pub formal_structure: f64,
    /// Weight of [`FeatureKey::LackOfPersonalAnecdotes`].
    pub lack_of_personal_anecdotes: f64,
    /// Weight of [`FeatureKey::SentenceLengthVariance`].
    pub sentence_length_variance: f64,
    /// Weight of [`FeatureKey::LowFillerWords`].
    pub low_filler_words: f64,
    /// Weight of [`FeatureKey::PredictableTransitions`].
    pub predictable_transitions: f64,
    /// Weight of [`FeatureKey::TechnicalTerms`].
    pub technical_terms: f64,
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            repetitive_patterns: 0.15,
            vocabulary_diversity: 0.15,
            formal_structure: 0.1,
            lack_of_personal_anecdotes: 0.1,
            sentence_length_variance: 0.1,
            low_filler_words: 0.1,
            predictable_transitions: 0.1,
            technical_terms: 0.05,
        }
    }
}

impl FeatureWeights {
    /// Weight for one feature.
    pub const fn get(&self, key: FeatureKey) -> f64 {
        match key {
            FeatureKey::RepetitivePatterns => self.repetitive_patterns,
            FeatureKey::VocabularyDiversity => self.vocabulary_diversity,
            FeatureKey::FormalStructure => self.formal_structure,
            FeatureKey::LackOfPersonalAnecdotes => self.lack_of_personal_anecdotes,
            FeatureKey::SentenceLengthVariance => self.sentence_length_variance,
            FeatureKey::LowFillerWords => self.low_filler_words,
            FeatureKey::PredictableTransitions => self.predictable_transitions,
            FeatureKey::TechnicalTerms => self.technical_terms,
        }
    }
}

/// Present/absent thresholds. All comparisons are strict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct FeatureThresholds {
    /// Repetition score above which the feature is present.
    pub repetition_above: f64,
    /// Vocabulary diversity above which the feature is present.
    pub vocab_diversity_above: f64,
    /// Vocabulary diversity below which the feature is present.
    pub vocab_diversity_below: f64,
    /// Formality score above which the feature is present.
    pub formality_above: f64,
    /// Personal-anecdote score below which the feature is present.
    pub personal_anecdote_below: f64,
    /// Normalized sentence variance below which the feature is present.
    pub sentence_variance_below: f64,
    /// Filler ratio below which the feature is present.
    pub filler_ratio_below: f64,
    /// Transitions per sentence above which the feature is present.
    pub transitions_above: f64,
    /// Technical-term consistency above which the feature is present.
    pub technical_terms_above: f64,
}

impl Default for FeatureThresholds {
    fn default() -> Self {
        Self {
            repetition_above: 0.1,
            vocab_diversity_above: 0.7,
            vocab_diversity_below: 0.4,
            formality_above: 0.65,
            personal_anecdote_below: 0.2,
            sentence_variance_below: 0.4,
            filler_ratio_below: 0.01,
            transitions_above: 0.2,
            technical_terms_above: 0.3,
        }
    }
}

/// Inclusive lower bounds of the four upper likelihood labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct LabelCutoffs {
    /// Lower bound of "Very likely AI-generated".
    pub very_likely_ai: f64,
    /// Lower bound of "Likely AI-generated".
    pub likely_ai: f64,
    /// Lower bound of "Possibly AI-generated".
    pub possibly_ai: f64,
    /// Lower bound of "Likely human-written"; anything lower is "Very likely human-written".
    pub likely_human: f64,
}

impl Default for LabelCutoffs {
    fn default() -> Self {
        Self {
            very_likely_ai: 75.0,
            likely_ai: 60.0,
            possibly_ai: 40.0,
            likely_human: 25.0,
        }
    }
}

/// Categorical verdict derived from the aggregate score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[allow(missing_docs)]
pub enum Likelihood {
    #[serde(rename = "Very likely AI-generated")]
    VeryLikelyAi,
    #[serde(rename = "Likely AI-generated")]
    LikelyAi,
    #[serde(rename = "Possibly AI-generated")]
    PossiblyAi,
    #[serde(rename = "Likely human-written")]
    LikelyHuman,
    #[serde(rename = "Very likely human-written")]
    VeryLikelyHuman,
}

impl Likelihood {
    /// Map a score onto a label using inclusive lower bounds.
    pub fn classify(score: f64, cutoffs: &LabelCutoffs) -> Self {
        if score >= cutoffs.very_likely_ai {
            Self::VeryLikelyAi
        } else if score >= cutoffs.likely_ai {
            Self::LikelyAi
        } else if score >= cutoffs.possibly_ai {
            Self::PossiblyAi
        } else if score >= cutoffs.likely_human {
            Self::LikelyHuman
        } else {
            Self::VeryLikelyHuman
        }
    }

    /// Returns the label text.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::VeryLikelyAi => "Very likely AI-generated",
            Self::LikelyAi => "Likely AI-generated",
            Self::PossiblyAi => "Possibly AI-generated",
            Self::LikelyHuman => "Likely human-written",
            Self::VeryLikelyHuman => "Very likely human-written",
        }
    }

    /// Whether the label leans towards machine-generated text.
    pub const fn leans_ai(&self) -> bool {
        matches!(self, Self::VeryLikelyAi | Self::LikelyAi | Self::PossiblyAi)
    }
}

impl std::fmt::Display for Likelihood {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One feature's judgment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FeatureScore {
    /// Which feature this is.
    pub key: FeatureKey,
    /// Display name.
    pub name: String,
    /// Whether the feature fired.
    pub present: bool,
    /// Confidence in `[0, 100]`.
    pub confidence: f64,
}

/// Full report for one analyzed text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AiAnalysis {
    /// Aggregate score in `[0, 100]`.
    pub score: f64,
    /// Label for the score.
    pub likelihood: Likelihood,
    /// Per-feature judgments, in [`FeatureKey::ALL`] order.
    pub features: Vec<FeatureScore>,
    /// Raw statistics the judgments were derived from.
    pub stats: TextStats,
}

/// Tunables for [`analyze_text`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct DetectorSettings {
    /// Shortest trimmed text, in chars, accepted by [`analyze_text`].
    pub min_text_chars: usize,
    /// Filler words and phrases.
    pub filler_words: Vec<String>,
    /// Technical vocabulary.
    pub technical_terms: Vec<String>,
    /// Transition words and phrases.
    pub transition_words: Vec<String>,
    /// Per-feature weights.
    pub weights: FeatureWeights,
    /// Per-feature thresholds.
    pub thresholds: FeatureThresholds,
    /// Label cutoffs.
    pub cutoffs: LabelCutoffs,
}

impl Default for DetectorSettings {
    fn default() -> Self {
        let owned = |list: &[&str]| list.iter().map(|s| (*s).to_string()).collect();
        Self {
            min_text_chars: DEFAULT_MIN_TEXT_CHARS,
            filler_words: owned(FILLER_WORDS),
            technical_terms: owned(TECHNICAL_TERMS),
            transition_words: owned(TRANSITION_WORDS),
            weights: FeatureWeights::default(),
            thresholds: FeatureThresholds::default(),
            cutoffs: LabelCutoffs::default(),
        }
    }
}

/// Judge every feature from precomputed statistics.
pub fn evaluate_features(stats: &TextStats, thresholds: &FeatureThresholds) -> Vec<FeatureScore> {
    FeatureKey::ALL
        .iter()
        .map(|&key| {
            let (present, confidence) = judge(key, stats, thresholds);
            FeatureScore {
                key,
                name: key.name().to_string(),
                present,
                confidence: confidence.clamp(0.0, 100.0),
            }
        })
        .collect()
}

fn judge(key: FeatureKey, s: &TextStats, t: &FeatureThresholds) -> (bool, f64) {
    match key {
        FeatureKey::RepetitivePatterns => {
            (s.repetition_score > t.repetition_above, s.repetition_score * 100.0)
        }
        FeatureKey::VocabularyDiversity => (
            s.vocab_diversity > t.vocab_diversity_above
                || s.vocab_diversity < t.vocab_diversity_below,
            (s.vocab_diversity - 0.55).abs() * 200.0,
        ),
        FeatureKey::FormalStructure => {
            (s.formality_score > t.formality_above, s.formality_score * 100.0)
        }
        FeatureKey::LackOfPersonalAnecdotes => (
            s.personal_anecdote_score < t.personal_anecdote_below,
            (1.0 - s.personal_anecdote_score) * 100.0,
        ),
        FeatureKey::SentenceLengthVariance => (
            s.sentence_length_variance < t.sentence_variance_below,
            (1.0 - s.sentence_length_variance) * 100.0,
        ),
        FeatureKey::LowFillerWords => (
            s.filler_word_ratio < t.filler_ratio_below,
            1.0 - s.filler_word_ratio * 100.0,
        ),
        FeatureKey::PredictableTransitions => {
            (s.transition_score > t.transitions_above, s.transition_score * 100.0)
        }
        FeatureKey::TechnicalTerms => (
            s.technical_term_consistency > t.technical_terms_above,
            s.technical_term_consistency * 100.0,
        ),
    }
}

/// Weighted sum over present features, clamped to `[0, 100]`.
pub fn aggregate_score(features: &[FeatureScore], weights: &FeatureWeights) -> f64 {
    let raw: f64 = features
        .iter()
        .filter(|f| f.present)
        .map(|f| f.confidence / 100.0 * weights.get(f.key) * 100.0)
        .sum();
    raw.clamp(0.0, 100.0)
}

/// Detector with its vocabulary patterns compiled once.
#[derive(Debug, Clone)]
pub struct AiLikelihoodScorer {
    settings: DetectorSettings,
    vocabulary: Vocabulary,
}

impl AiLikelihoodScorer {
    /// Compile the vocabularies of `settings`.
    pub fn new(settings: DetectorSettings) -> Self {
        let vocabulary = Vocabulary::new(
            &settings.filler_words,
            &settings.technical_terms,
            &settings.transition_words,
        );
        Self {
            settings,
            vocabulary,
        }
    }

    /// Settings this scorer was built from.
    pub const fn settings(&self) -> &DetectorSettings {
        &self.settings
    }

    /// Score any text, including empty text, without the length guard.
    #[tracing::instrument(skip_all, fields(text_len = text.len()))]
    pub fn score(&self, text: &str) -> AiAnalysis {
        let stats = TextStats::compute_with(text, &self.vocabulary);
        let features = evaluate_features(&stats, &self.settings.thresholds);
        let score = aggregate_score(&features, &self.settings.weights);
        let likelihood = Likelihood::classify(score, &self.settings.cutoffs);

        tracing::debug!(
            score,
            likelihood = likelihood.as_str(),
            present = features.iter().filter(|f| f.present).count(),
            "text scored"
        );

        AiAnalysis {
            score,
            likelihood,
            features,
            stats,
        }
    }

    /// Score trimmed text after enforcing the minimum length.
    ///
    /// # Errors
    ///
    /// [`AnalysisError::EmptyInput`] for blank text and
    /// [`AnalysisError::TextTooShort`] below `min_text_chars`.
    pub fn analyze(&self, text: &str) -> AnalysisResult<AiAnalysis> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }
        let length = trimmed.chars().count();
        if length < self.settings.min_text_chars {
            return Err(AnalysisError::TextTooShort {
                length,
                minimum: self.settings.min_text_chars,
            });
        }
        Ok(self.score(trimmed))
    }
}

/// Score any text once. See [`AiLikelihoodScorer::score`].
pub fn score_text(text: &str, settings: &DetectorSettings) -> AiAnalysis {
    AiLikelihoodScorer::new(settings.clone()).score(text)
}

/// Analyze one text. See [`AiLikelihoodScorer::analyze`].
///
/// # Errors
///
/// [`AnalysisError::EmptyInput`] for blank text and
/// [`AnalysisError::TextTooShort`] below `settings.min_text_chars`.
pub fn analyze_text(text: &str, settings: &DetectorSettings) -> AnalysisResult<AiAnalysis> {
    AiLikelihoodScorer::new(settings.clone()).analyze(text)
}
