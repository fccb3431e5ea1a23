//! Command implementations.

use camino::Utf8PathBuf;
use docsim_core::Document;
use indicatif::{ProgressBar, ProgressStyle};

use crate::ingest;

pub mod compare;
pub mod detect;
pub mod highlight;
pub mod info;
#[cfg(feature = "mcp")]
pub mod serve;

/// Ingest every path in order, assigning positional ids.
///
/// A progress bar is drawn on stderr when `show_progress` is set; indicatif
/// hides it on its own when stderr is not a terminal.
pub fn load_documents(
    paths: &[Utf8PathBuf],
    max_bytes: Option<usize>,
    show_progress: bool,
) -> anyhow::Result<Vec<Document>> {
    let progress = if show_progress {
        let pb = ProgressBar::new(paths.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:30.cyan/blue}] {pos}/{len} {msg}")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut documents = Vec::with_capacity(paths.len());
    for (index, path) in paths.iter().enumerate() {
        if let Some(ref pb) = progress {
            pb.set_message(path.to_string());
        }
        documents.push(ingest::load_document(path, index, max_bytes)?);
        if let Some(ref pb) = progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }
    Ok(documents)
}

/// Up to `max_chars` characters of `content` starting at char `start`, on one line.
pub fn excerpt(content: &str, start: usize, end: usize, max_chars: usize) -> String {
    let len = end.saturating_sub(start);
    let text: String = content
        .chars()
        .skip(start)
        .take(len.min(max_chars))
        .map(|c| if c.is_whitespace() { ' ' } else { c })
        .collect();
    if len > max_chars {
        format!("{text}...")
    } else {
        text
    }
}
