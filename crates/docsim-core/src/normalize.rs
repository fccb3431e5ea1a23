//! Source-code detection and normalization.
//!
//! Code is recognised either by a whitelisted extension or by structural
//! signatures in the content. Normalization strips the comment syntax of the
//! declared language and collapses whitespace so that formatting and comments
//! do not count towards word overlap.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::{Regex, RegexSet};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::document::declared_extension;
use crate::word_lists::{C_FAMILY_LANGUAGES, CODE_EXTENSIONS, HTML_LANGUAGES, PYTHON_LANGUAGES};

/// Comment syntax family of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum CommentStyle {
    /// `// line` and `/* block */` comments.
    CFamily,
    /// `# line` comments and triple-quoted blocks.
    Python,
    /// `<!-- block -->` comments.
    Html,
}

/// Structural signatures of source code.
static CODE_SIGNATURES: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSet::new([
        r"function\s+\w+\s*\(.*\)\s*\{",
        r"class\s+\w+",
        r"import\s+.*from",
        r"const\s+\w+\s*=",
        r"if\s*\(.*\)\s*\{",
        r"for\s*\(.*\)\s*\{",
        r"while\s*\(.*\)\s*\{",
        r"def\s+\w+\s*\(.*\):",
        r"public\s+class",
    ])
    .expect("valid regex set")
});

static C_LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)//.*$").expect("valid regex"));

static C_BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid regex"));

static HASH_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)#.*$").expect("valid regex"));

static TRIPLE_QUOTED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)["']{3}.*?["']{3}"#).expect("valid regex"));

static HTML_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid regex"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

/// Default extension whitelist for code detection.
pub fn default_code_extensions() -> Vec<String> {
    CODE_EXTENSIONS.iter().map(|e| (*e).to_string()).collect()
}

/// Default language-key to comment-family table.
pub fn default_comment_syntax() -> BTreeMap<String, CommentStyle> {
    let families = [
        (C_FAMILY_LANGUAGES, CommentStyle::CFamily),
        (PYTHON_LANGUAGES, CommentStyle::Python),
        (HTML_LANGUAGES, CommentStyle::Html),
    ];
    families
        .into_iter()
        .flat_map(|(keys, style)| keys.iter().map(move |k| ((*k).to_string(), style)))
        .collect()
}

/// Whether `content` should be treated as source code.
///
/// `declared` may be a MIME type, file name, or bare extension. The extension
/// whitelist is consulted first, then the structural signatures.
pub fn is_code_content(content: &str, declared: &str, code_extensions: &[String]) -> bool {
    let ext = declared_extension(declared);
    if !ext.is_empty() && code_extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)) {
        return true;
    }
    CODE_SIGNATURES.is_match(content)
}

/// Look up the comment family for a declared language or extension.
pub fn comment_style(
    declared: &str,
    comment_syntax: &BTreeMap<String, CommentStyle>,
) -> Option<CommentStyle> {
    let raw = declared.trim().to_lowercase();
    comment_syntax
        .get(&raw)
        .or_else(|| comment_syntax.get(&declared_extension(&raw)))
        .copied()
}

/// Strip comments for the declared language and collapse whitespace.
///
/// Unknown languages only have their whitespace collapsed.
#[tracing::instrument(skip(code, comment_syntax), fields(code_len = code.len()))]
pub fn normalize_code(
    code: &str,
    declared: &str,
    comment_syntax: &BTreeMap<String, CommentStyle>,
) -> String {
    let stripped = match comment_style(declared, comment_syntax) {
        Some(CommentStyle::CFamily) => {
            let no_line = C_LINE_COMMENT.replace_all(code, "");
            C_BLOCK_COMMENT.replace_all(&no_line, "").into_owned()
        }
        Some(CommentStyle::Python) => {
            let no_line = HASH_COMMENT.replace_all(code, "");
            TRIPLE_QUOTED.replace_all(&no_line, "").into_owned()
        }
        Some(CommentStyle::Html) => HTML_COMMENT.replace_all(code, "").into_owned(),
        None => code.to_string(),
    };

    WHITESPACE_RUN
        .replace_all(&stripped, " ")
        .trim()
        .to_string()
}
