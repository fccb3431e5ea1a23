//! Detect command: AI-likelihood scoring for a single file.

use anyhow::{Context, bail};
use camino::Utf8PathBuf;
use clap::Args;
use docsim_core::analyze_text;
use docsim_core::config::Config;
use docsim_core::markdown::{is_markdown, markdown_to_prose};
use owo_colors::OwoColorize;
use tracing::{debug, instrument};

use crate::ingest;

/// Arguments for the `detect` subcommand.
#[derive(Args, Debug)]
pub struct DetectArgs {
    /// File to score.
    pub file: Utf8PathBuf,

    /// Fail if the score exceeds this value (0-100).
    #[arg(long, value_name = "S")]
    pub max_score: Option<f64>,
}

/// Score how likely a file's prose is machine-generated.
#[instrument(name = "cmd_detect", skip_all, fields(file = %args.file))]
pub fn cmd_detect(
    args: DetectArgs,
    global_json: bool,
    config: &Config,
    max_input_bytes: Option<usize>,
) -> anyhow::Result<()> {
    debug!(file = %args.file, max_score = ?args.max_score, "executing detect command");

    let document = ingest::load_document(&args.file, 0, max_input_bytes)?;
    let text = if is_markdown(&document.name) {
        markdown_to_prose(&document.content)
    } else {
        document.content
    };

    let analysis = analyze_text(&text, &config.detector)
        .with_context(|| format!("cannot score {}", args.file))?;
    let max_score = args.max_score.or(config.max_ai_score);

    if global_json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        let label = if analysis.likelihood.leans_ai() {
            analysis.likelihood.as_str().red().to_string()
        } else {
            analysis.likelihood.as_str().green().to_string()
        };
        println!("{} {:.1}/100 {label}", args.file.bold(), analysis.score);
        for feature in &analysis.features {
            let mark = if feature.present {
                "yes".yellow().to_string()
            } else {
                "no".dimmed().to_string()
            };
            println!("  {:<28} {mark:>3}  {:>5.1}%", feature.name, feature.confidence);
        }
        println!(
            "  {}",
            format!(
                "{} words, {} sentences",
                analysis.stats.word_count, analysis.stats.sentence_count
            )
            .dimmed()
        );
    }

    if let Some(max) = max_score {
        if analysis.score > max {
            bail!(
                "{} scores {:.1} (max: {:.1}): {}",
                args.file,
                analysis.score,
                max,
                analysis.likelihood
            );
        }
        if !global_json {
            println!(
                "{} {} scores {:.1} (max: {:.1})",
                "PASS:".green(),
                args.file,
                analysis.score,
                max
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CHATTY: &str = "I went to the market yesterday and honestly it was kind of a mess. \
        My brother said we should just grab tacos, so we did! Basically we ate way too much. \
        Then I got home and my cat had knocked over a plant, which, I mean, classic.";

    fn write(dir: &TempDir, name: &str, text: &str) -> Utf8PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, text).unwrap();
        Utf8PathBuf::try_from(path).unwrap()
    }

    #[test]
    fn scores_a_text_file() {
        let tmp = TempDir::new().unwrap();
        let args = DetectArgs {
            file: write(&tmp, "story.txt", CHATTY),
            max_score: Some(100.0),
        };
        assert!(cmd_detect(args, false, &Config::default(), None).is_ok());
    }

    #[test]
    fn short_text_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let args = DetectArgs {
            file: write(&tmp, "short.txt", "too short"),
            max_score: None,
        };
        let err = cmd_detect(args, true, &Config::default(), None).unwrap_err();
        assert!(format!("{err:#}").contains("too short"));
    }

    #[test]
    fn gate_fails_above_maximum() {
        let tmp = TempDir::new().unwrap();
        let args = DetectArgs {
            file: write(&tmp, "story.txt", CHATTY),
            max_score: Some(-1.0),
        };
        let err = cmd_detect(args, true, &Config::default(), None).unwrap_err();
        assert!(err.to_string().contains("max: -1.0"));
    }

    #[test]
    fn markdown_is_reduced_before_scoring() {
        let tmp = TempDir::new().unwrap();
        let md = format!("# Heading\n\n```\ncode block\n```\n\n{CHATTY}\n");
        let args = DetectArgs {
            file: write(&tmp, "post.md", &md),
            max_score: None,
        };
        assert!(cmd_detect(args, true, &Config::default(), None).is_ok());
    }
}
