//! Core library for docsim.
//!
//! Two independent engines live here:
//!
//! - pairwise document similarity: [`compare::compare_all`] finds shared
//!   substrings between every pair of documents and blends match coverage with
//!   word overlap into a percentage;
//! - AI-likelihood scoring: [`detector::analyze_text`] turns lexical statistics
//!   into a weighted 0-100 score and a categorical label.
//!
//! Both are pure and synchronous. Nothing is persisted between calls.
//!
//! # Modules
//!
//! - [`document`] - Documents, match spans, results and highlight segments
//! - [`matching`] - Shared-substring discovery and overlap filtering
//! - [`normalize`] - Code detection and comment stripping
//! - [`similarity`] - Coverage and Jaccard blending
//! - [`compare`] - Pair enumeration
//! - [`stats`] - Text statistics
//! - [`detector`] - AI-likelihood scoring
//! - [`markdown`] - Markdown-to-prose reduction
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use docsim_core::{CompareSettings, Document, compare_all};
//!
//! let docs = [
//!     Document::new("a", "a.txt", "txt", "the quick brown fox jumps over the lazy dog"),
//!     Document::new("b", "b.txt", "txt", "a quick brown fox jumps over a lazy dog"),
//! ];
//! let settings = CompareSettings::default().with_min_match_length(10);
//! let results = compare_all(&docs, &settings).unwrap();
//! assert!(results[0].similarity_percentage > 0.0);
//! ```
#![deny(unsafe_code)]

pub mod compare;
pub mod config;
pub mod detector;
pub mod document;
pub mod error;
pub mod markdown;
pub mod matching;
pub mod normalize;
pub mod similarity;
pub mod stats;
pub mod word_lists;

pub use compare::{CompareSettings, compare_all};
pub use config::{Config, ConfigLoader, ConfigSources, LogLevel};
pub use detector::{
    AiAnalysis, AiLikelihoodScorer, DetectorSettings, Likelihood, analyze_text, score_text,
};
pub use document::{ComparisonResult, Document, MatchSpan, SimilarityBand};
pub use error::{AnalysisError, CompareError, ConfigError, ConfigResult};
pub use matching::find_matches;

/// Default per-file input limit for ingestion (5 MiB).
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
