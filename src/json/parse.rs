//! Purpose: Provide the internal runtime JSON decode entrypoints.
//! Exports: `from_slice`, `ParseFailureCategory`, `categorize_error`, `hint_for_error`.
//! Role: Parser boundary that centralizes serde_json usage details for loader inputs.
//! Invariants: Category labels are stable; callers put them in user-facing hints.
//! Notes: Error mapping is done by callsites so domain context stays explicit.

use serde::de::DeserializeOwned;
use serde_json::error::Category;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ParseFailureCategory {
    Syntax,
    Eof,
    Shape,
    DepthLimit,
    Io,
}

impl ParseFailureCategory {
    pub(crate) fn label(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::Eof => "eof",
            ParseFailureCategory::Shape => "shape",
            ParseFailureCategory::DepthLimit => "depth-limit",
            ParseFailureCategory::Io => "io",
        }
    }
}

pub(crate) fn from_slice<T: DeserializeOwned>(input: &[u8]) -> Result<T, serde_json::Error> {
    serde_json::from_slice(input)
}

pub(crate) fn categorize_error(err: &serde_json::Error) -> ParseFailureCategory {
    if err.to_string().contains("recursion limit exceeded") {
        return ParseFailureCategory::DepthLimit;
    }
    match err.classify() {
        Category::Io => ParseFailureCategory::Io,
        Category::Syntax => ParseFailureCategory::Syntax,
        Category::Data => ParseFailureCategory::Shape,
        Category::Eof => ParseFailureCategory::Eof,
    }
}

pub(crate) fn hint_for_error(err: &serde_json::Error, context: &str) -> String {
    format!(
        "parse category: {}; line {}, column {}; context: {context}",
        categorize_error(err).label(),
        err.line(),
        err.column()
    )
}
