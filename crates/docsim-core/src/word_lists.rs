//! Default vocabulary lists and lookup tables.
//!
//! These seed the overridable settings in [`crate::config`]; the scoring code
//! never reads them directly.

/// Filler words and phrases counted as whole words (case-insensitive).
pub const FILLER_WORDS: &[&str] = &[
    "um",
    "uh",
    "like",
    "actually",
    "basically",
    "literally",
    "you know",
    "sort of",
    "kind of",
    "i mean",
    "anyway",
    "so",
];

/// Technical vocabulary whose steady use reads as machine-written.
pub const TECHNICAL_TERMS: &[&str] = &[
    "algorithm",
    "data",
    "system",
    "function",
    "process",
    "analysis",
    "framework",
    "methodology",
    "implementation",
    "interface",
];

/// Stock transition words and phrases.
pub const TRANSITION_WORDS: &[&str] = &[
    "however",
    "therefore",
    "furthermore",
    "consequently",
    "thus",
    "moreover",
    "additionally",
    "in conclusion",
    "as a result",
];

/// First-person pronouns signalling personal anecdotes.
pub const FIRST_PERSON_PRONOUNS: &[&str] = &["i", "me", "my", "mine", "myself"];

/// File extensions always treated as source code.
pub const CODE_EXTENSIONS: &[&str] = &[
    "js", "ts", "jsx", "tsx", "py", "java", "c", "cpp", "cs", "php", "go", "rb", "html", "css",
];

/// Language keys stripped of `//` and `/* */` comments.
pub const C_FAMILY_LANGUAGES: &[&str] = &[
    "javascript",
    "js",
    "jsx",
    "typescript",
    "ts",
    "tsx",
    "java",
    "c",
    "cpp",
    "c++",
    "csharp",
    "c#",
    "cs",
];

/// Language keys stripped of `#` comments and triple-quoted blocks.
pub const PYTHON_LANGUAGES: &[&str] = &["python", "py", "x-python"];

/// Language keys stripped of `<!-- -->` comments.
pub const HTML_LANGUAGES: &[&str] = &["html", "htm"];
