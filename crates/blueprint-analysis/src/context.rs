//! Completion context classification.
//!
//! Classification is line-local and pattern based: it only looks at the text between the start
//! of the line and the cursor. The language has no nested expressions within a line, so a
//! tokenizer is not needed; [`ContextClassifier`] is the seam for swapping one in later.

use crate::error::{AnalysisError, AnalysisResult};
use crate::line_index::{CoordinateConverter, Position};
use blueprint_lang::KeywordCategory;
use regex::Regex;
use std::sync::LazyLock;

static AFTER_COLON: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":\s*$").unwrap());
static TYPE_POSITION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":\s*\w*$").unwrap());

/// A completion context; several may apply to the same prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompletionContext {
    /// Empty or whitespace-only prefix: a new declaration may start here.
    LineStart,
    /// The prefix ends with a colon (plus optional whitespace).
    AfterColon,
    /// The prefix ends with a colon, optional whitespace and a partial word.
    TypePosition,
    /// Applies everywhere.
    Always,
}

impl CompletionContext {
    /// Catalog categories contributing candidates in this context, in emission order.
    pub fn categories(self) -> &'static [KeywordCategory] {
        match self {
            CompletionContext::LineStart => &[KeywordCategory::Declarations],
            CompletionContext::AfterColon => {
                &[KeywordCategory::Properties, KeywordCategory::Actions]
            }
            CompletionContext::TypePosition => &[KeywordCategory::Types],
            CompletionContext::Always => &[KeywordCategory::Modifiers],
        }
    }
}

/// Decides which completion contexts apply to a line prefix.
pub trait ContextClassifier {
    /// Classify `prefix` (the line text up to the cursor).
    ///
    /// Implementations must return contexts in the order LineStart, AfterColon, TypePosition,
    /// Always, and include every one that matches.
    fn classify(&self, prefix: &str) -> Vec<CompletionContext>;
}

/// The default, regex-based classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternClassifier;

impl ContextClassifier for PatternClassifier {
    fn classify(&self, prefix: &str) -> Vec<CompletionContext> {
        let mut contexts = Vec::with_capacity(4);

        if prefix.trim().is_empty() {
            contexts.push(CompletionContext::LineStart);
        }
        if AFTER_COLON.is_match(prefix) {
            contexts.push(CompletionContext::AfterColon);
        }
        if TYPE_POSITION.is_match(prefix) {
            contexts.push(CompletionContext::TypePosition);
        }
        contexts.push(CompletionContext::Always);

        log::trace!("classified {prefix:?} as {contexts:?}");
        contexts
    }
}

/// The part of `line_text` before the cursor at `position`.
///
/// Fails with [`AnalysisError::InvalidPosition`] when the column is past the end of the line or
/// splits a surrogate pair.
pub fn prefix_at(line_text: &str, position: Position) -> AnalysisResult<&str> {
    let byte = CoordinateConverter::utf16_to_byte(line_text, position.character as usize)
        .ok_or(AnalysisError::InvalidPosition {
            line: position.line,
            character: position.character,
        })?;
    Ok(&line_text[..byte])
}
