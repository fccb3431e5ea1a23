//! Highlight command: show where two files overlap.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use docsim_core::config::Config;
use docsim_core::document::{Segment, Side, highlight_segments};
use docsim_core::{Document, compare_all};
use owo_colors::OwoColorize;
use serde::Serialize;
use tracing::{debug, instrument};

use super::load_documents;

/// Arguments for the `highlight` subcommand.
#[derive(Args, Debug)]
pub struct HighlightArgs {
    /// First file.
    pub first: Utf8PathBuf,

    /// Second file.
    pub second: Utf8PathBuf,

    /// Minimum shared substring length, in characters.
    #[arg(long, value_name = "N")]
    pub min_match_length: Option<usize>,
}

#[derive(Serialize)]
struct SegmentOut<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    match_number: Option<usize>,
}

#[derive(Serialize)]
struct SideOut<'a> {
    name: &'a str,
    segments: Vec<SegmentOut<'a>>,
}

#[derive(Serialize)]
struct HighlightReport<'a> {
    similarity_percentage: f64,
    a: SideOut<'a>,
    b: SideOut<'a>,
}

fn side_out<'a>(doc: &'a Document, segments: &[Segment<'a>]) -> SideOut<'a> {
    SideOut {
        name: &doc.name,
        segments: segments
            .iter()
            .map(|s| SegmentOut {
                text: s.text,
                match_number: s.match_number,
            })
            .collect(),
    }
}

/// Print both files with their shared regions emphasised.
#[instrument(name = "cmd_highlight", skip_all, fields(first = %args.first, second = %args.second))]
pub fn cmd_highlight(
    args: HighlightArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(min_match_length = ?args.min_match_length, "executing highlight command");

    let paths = [args.first, args.second];
    let documents = load_documents(&paths, max_input_bytes, false)?;

    let mut settings = config.compare.clone().with_parallel(false);
    if let Some(min) = args.min_match_length {
        settings = settings.with_min_match_length(min);
    }
    let results = compare_all(&documents, &settings).context("comparison failed")?;
    let Some(result) = results.first() else {
        return Ok(());
    };
    let (doc_a, doc_b) = (&documents[0], &documents[1]);

    let segments_a = highlight_segments(&doc_a.content, &result.matches, Side::A);
    let segments_b = highlight_segments(&doc_b.content, &result.matches, Side::B);

    if global_json {
        let report = HighlightReport {
            similarity_percentage: result.similarity_percentage,
            a: side_out(doc_a, &segments_a),
            b: side_out(doc_b, &segments_b),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} <-> {}: {:.1}% similar, {} matches",
        doc_a.name.bold(),
        doc_b.name.bold(),
        result.similarity_percentage,
        result.matches.len()
    );
    for (doc, segments) in [(doc_a, &segments_a), (doc_b, &segments_b)] {
        println!();
        println!("{}", doc.name.bold().underline());
        println!("{}", render(segments));
    }

    Ok(())
}

/// Render segments with matched text emphasised and tagged with its match number.
fn render(segments: &[Segment<'_>]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment.match_number {
            Some(n) => {
                out.push_str(&format!("[{n}]").dimmed().to_string());
                out.push_str(&segment.text.black().on_yellow().to_string());
            }
            None => out.push_str(segment.text),
        }
    }
    out
}
