//! Compare command: pairwise similarity across files.

use std::collections::HashMap;

use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use clap::Args;
use docsim_core::{ComparisonResult, Document, SimilarityBand, compare_all};
use docsim_core::config::Config;
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use super::{excerpt, load_documents};

/// Longest excerpt printed per match.
const EXCERPT_CHARS: usize = 60;

/// Arguments for the `compare` subcommand.
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Files to compare (at least two).
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<Utf8PathBuf>,

    /// Minimum shared substring length, in characters.
    #[arg(long, value_name = "N")]
    pub min_match_length: Option<usize>,

    /// Fail if any pair is more similar than this percentage.
    #[arg(long, value_name = "PCT")]
    pub max_similarity: Option<f64>,

    /// List every matched region with an excerpt.
    #[arg(long)]
    pub matches: bool,

    /// Compare pairs one at a time instead of in parallel.
    #[arg(long)]
    pub sequential: bool,
}

/// Document metadata echoed in JSON output.
#[derive(Serialize)]
struct DocumentSummary<'a> {
    id: &'a str,
    name: &'a str,
    mime_or_ext: &'a str,
    size: u64,
    chars: usize,
}

impl<'a> From<&'a Document> for DocumentSummary<'a> {
    fn from(doc: &'a Document) -> Self {
        Self {
            id: &doc.id,
            name: &doc.name,
            mime_or_ext: &doc.mime_or_ext,
            size: doc.size,
            chars: doc.content.chars().count(),
        }
    }
}

#[derive(Serialize)]
struct CompareReport<'a> {
    documents: Vec<DocumentSummary<'a>>,
    results: &'a [ComparisonResult],
}

/// Compare every pair of the given files.
#[instrument(name = "cmd_compare", skip_all, fields(files = args.files.len()))]
pub fn cmd_compare(
    args: CompareArgs,
    global_json: bool,
    show_progress: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(
        min_match_length = ?args.min_match_length,
        max_similarity = ?args.max_similarity,
        sequential = args.sequential,
        "executing compare command"
    );

    let documents = load_documents(&args.files, max_input_bytes, show_progress)?;

    let mut settings = config.compare.clone();
    if let Some(min) = args.min_match_length {
        settings = settings.with_min_match_length(min);
    }
    if args.sequential {
        settings = settings.with_parallel(false);
    }

    let results = compare_all(&documents, &settings).context("comparison failed")?;
    let names: HashMap<&str, &str> = documents
        .iter()
        .map(|d| (d.id.as_str(), d.name.as_str()))
        .collect();
    let name_of = |id: &str| names.get(id).copied().unwrap_or("?").to_string();

    if global_json {
        let report = CompareReport {
            documents: documents.iter().map(DocumentSummary::from).collect(),
            results: &results,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        let by_id: HashMap<&str, &Document> =
            documents.iter().map(|d| (d.id.as_str(), d)).collect();
        for result in &results {
            print_result(result, &name_of);
            if args.matches
                && let Some(doc_a) = by_id.get(result.document_a_id.as_str())
            {
                for (n, span) in result.matches.iter().enumerate() {
                    println!(
                        "    {} a[{}..{}] b[{}..{}] {:?}",
                        format!("#{}", n + 1).dimmed(),
                        span.a_start,
                        span.a_end,
                        span.b_start,
                        span.b_end,
                        excerpt(&doc_a.content, span.a_start, span.a_end, EXCERPT_CHARS),
                    );
                }
            }
        }
    }

    let max_similarity = args.max_similarity.or(config.max_similarity);
    if let Some(max) = max_similarity {
        if let Some(worst) = results
            .iter()
            .filter(|r| r.similarity_percentage > max)
            .max_by(|a, b| a.similarity_percentage.total_cmp(&b.similarity_percentage))
        {
            bail!(
                "{} and {} are {:.1}% similar (max: {:.1}%)",
                name_of(&worst.document_a_id),
                name_of(&worst.document_b_id),
                worst.similarity_percentage,
                max,
            );
        }
        if !global_json {
            println!(
                "{} {} pairs at or below {:.1}% similarity",
                "PASS:".green(),
                results.len(),
                max
            );
        }
    }

    Ok(())
}

fn print_result(result: &ComparisonResult, name_of: &impl Fn(&str) -> String) {
    let pct = format!("{:>6.1}%", result.similarity_percentage);
    let band = result.band();
    let pct = match band {
        SimilarityBand::High => pct.red().bold().to_string(),
        SimilarityBand::Medium => pct.yellow().to_string(),
        SimilarityBand::Low => pct.green().to_string(),
    };
    println!(
        "{pct} {} {} <-> {} ({} matches)",
        format!("[{band}]").dimmed(),
        name_of(&result.document_a_id),
        name_of(&result.document_b_id),
        result.matches.len(),
    );
}
