//! File ingestion: turn paths into [`Document`]s.
//!
//! PDF text comes from `pdf-extract`, DOCX text from `word/document.xml`
//! inside the zip container. Everything else is read as UTF-8, lossily.
//! Extraction problems never fail ingestion: the document is kept with empty
//! content and a warning is logged. Missing or oversize files are errors.

use std::fs::File;
use std::io::Read;

use anyhow::{Context, bail};
use camino::Utf8Path;
use docsim_core::Document;
use quick_xml::Reader;
use quick_xml::events::Event;
use zip::ZipArchive;

/// Declared type for files without an extension.
const PLAIN_TEXT: &str = "text/plain";

/// Load one file as the `index`-th (0-based) document of a run.
///
/// # Errors
///
/// Fails when the file cannot be read or exceeds `max_bytes`.
#[tracing::instrument(skip_all, fields(path = %path, index = index))]
pub fn load_document(
    path: &Utf8Path,
    index: usize,
    max_bytes: Option<usize>,
) -> anyhow::Result<Document> {
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    let size = metadata.len();
    if let Some(max) = max_bytes
        && size > max as u64
    {
        bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
    }

    let ext = path.extension().map(str::to_lowercase);
    let content = match ext.as_deref() {
        Some("pdf") => extracted(path, extract_pdf(path)),
        Some("docx") => extracted(path, extract_docx(path)),
        _ => {
            let bytes = std::fs::read(path.as_std_path())
                .with_context(|| format!("failed to read {path}"))?;
            String::from_utf8_lossy(&bytes).into_owned()
        }
    };

    tracing::debug!(bytes = size, chars = content.chars().count(), "document loaded");

    Ok(Document {
        id: format!("doc-{}", index + 1),
        name: path.file_name().unwrap_or(path.as_str()).to_string(),
        mime_or_ext: ext.unwrap_or_else(|| PLAIN_TEXT.to_string()),
        size,
        content,
    })
}

fn extracted(path: &Utf8Path, result: anyhow::Result<String>) -> String {
    result.unwrap_or_else(|e| {
        tracing::warn!(path = %path, error = %format!("{e:#}"), "text extraction failed; using empty content");
        String::new()
    })
}

fn extract_pdf(path: &Utf8Path) -> anyhow::Result<String> {
    let bytes = std::fs::read(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    // pdf-extract panics on some malformed files.
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(&bytes)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(anyhow::anyhow!("PDF extraction failed: {e}")),
        Err(_) => bail!("PDF extraction panicked"),
    }
}

fn extract_docx(path: &Utf8Path) -> anyhow::Result<String> {
    let file = File::open(path.as_std_path()).with_context(|| format!("failed to open {path}"))?;
    let mut archive = ZipArchive::new(file).context("not a zip container")?;
    let mut entry = archive
        .by_name("word/document.xml")
        .context("missing word/document.xml")?;
    let mut xml = String::new();
    entry
        .read_to_string(&mut xml)
        .context("failed to read word/document.xml")?;
    docx_xml_to_text(&xml)
}

/// Flatten WordprocessingML to text: one line per paragraph, with breaks and
/// tabs preserved.
pub fn docx_xml_to_text(xml: &str) -> anyhow::Result<String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut out = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) if local_name(e.name().as_ref()) == b"t" => in_text_run = true,
            Ok(Event::End(e)) => match local_name(e.name().as_ref()) {
                b"t" => in_text_run = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Ok(Event::Empty(e)) => match local_name(e.name().as_ref()) {
                b"br" | b"cr" => out.push('\n'),
                b"tab" => out.push('\t'),
                _ => {}
            },
            Ok(Event::Text(t)) if in_text_run => {
                out.push_str(&String::from_utf8_lossy(t.as_ref()));
            }
            Ok(Event::GeneralRef(r)) if in_text_run => {
                if let Some(c) = resolve_entity(r.as_ref()) {
                    out.push(c);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => bail!("malformed document XML at byte {}: {e}", reader.error_position()),
            _ => {}
        }
        buf.clear();
    }

    Ok(out.trim_end().to_string())
}

/// Resolve a predefined or numeric XML entity name (without `&` and `;`).
fn resolve_entity(name: &[u8]) -> Option<char> {
    match name {
        b"amp" => Some('&'),
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"quot" => Some('"'),
        b"apos" => Some('\''),
        [b'#', b'x' | b'X', hex @ ..] => u32::from_str_radix(std::str::from_utf8(hex).ok()?, 16)
            .ok()
            .and_then(char::from_u32),
        [b'#', dec @ ..] => std::str::from_utf8(dec)
            .ok()?
            .parse()
            .ok()
            .and_then(char::from_u32),
        _ => None,
    }
}

fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map_or(name, |i| &name[i + 1..])
}
