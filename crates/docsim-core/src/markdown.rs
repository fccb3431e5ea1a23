//! Markdown reduction for text scoring.
//!
//! The detector's sentence split only sees `.`, `!` and `?`, so a list item or
//! a paragraph without terminal punctuation would otherwise run into the next
//! block. [`markdown_to_prose`] drops non-prose blocks and closes every kept
//! block as a sentence.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};

/// File extensions treated as markdown.
const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mdown", "mkd"];

/// Whether a file name or extension denotes markdown.
pub fn is_markdown(name_or_ext: &str) -> bool {
    let ext = name_or_ext
        .rsplit_once('.')
        .map_or(name_or_ext, |(_, ext)| ext);
    MARKDOWN_EXTENSIONS
        .iter()
        .any(|m| m.eq_ignore_ascii_case(ext))
}

/// Reduce markdown to sentence-terminated prose.
///
/// Code, headings, tables, HTML and frontmatter are dropped. Link and emphasis
/// text is kept without markup. Each paragraph, list item or blockquote
/// paragraph ends up as its own line, with a `.` appended when it lacks
/// terminal punctuation.
#[tracing::instrument(skip_all, fields(input_len = text.len()))]
pub fn markdown_to_prose(text: &str) -> String {
    let body = without_frontmatter(text);
    let parser = Parser::new_ext(body, Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH);

    let mut out = String::with_capacity(body.len());
    let mut block = String::new();
    let mut skip_depth: usize = 0;

    for event in parser {
        match event {
            Event::Start(Tag::CodeBlock(_) | Tag::Heading { .. } | Tag::Table(_)) => {
                skip_depth += 1;
            }
            Event::End(TagEnd::CodeBlock | TagEnd::Heading(_) | TagEnd::Table) => {
                skip_depth = skip_depth.saturating_sub(1);
            }
            Event::Text(t) if skip_depth == 0 => block.push_str(&t),
            Event::SoftBreak | Event::HardBreak if skip_depth == 0 => block.push(' '),
            Event::End(TagEnd::Paragraph | TagEnd::Item) if skip_depth == 0 => {
                close_block(&mut block, &mut out);
            }
            _ => {}
        }
    }
    close_block(&mut block, &mut out);

    out.truncate(out.trim_end().len());
    out
}

/// Move a finished block into the output as one terminated line.
fn close_block(block: &mut String, out: &mut String) {
    let sentence = block.trim();
    if !sentence.is_empty() {
        out.push_str(sentence);
        if !sentence.ends_with(['.', '!', '?']) {
            out.push('.');
        }
        out.push('\n');
    }
    block.clear();
}

/// Body of the document after a leading `---` frontmatter block, if any.
fn without_frontmatter(text: &str) -> &str {
    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return text;
    };
    if first.trim_end() != "---" {
        return text;
    }

    let mut offset = first.len();
    for line in lines {
        offset += line.len();
        if line.trim_end() == "---" {
            return &text[offset..];
        }
    }
    text
}
