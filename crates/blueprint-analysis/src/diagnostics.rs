//! Structural diagnostics.
//!
//! The scanner checks one rule: a declaration header whose name has several words must quote
//! the name. Lines are classified independently; anything that is not a declaration header is
//! skipped. Results are always the complete set for the document.

use crate::line_index::{CoordinateConverter, LineIndex, Position, Range};
use blueprint_lang::is_declaration_keyword;
use regex::Regex;
use std::sync::LazyLock;

/// Value of [`Diagnostic::source`] for everything this engine reports.
pub const DIAGNOSTIC_SOURCE: &str = "blueprint";

/// Diagnostic code for unquoted multi-word declaration names.
pub const MULTI_WORD_NAME: &str = "multi-word-name";

/// `<indent><word><ws><name>:<ws>`. The name runs up to the trailing colon, so whitespace
/// before the colon is part of it.
static DECLARATION_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(\w+)\s+(.+?):\s*$").unwrap());

/// Diagnostic severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticSeverity {
    /// Error diagnostics.
    Error,
    /// Warning diagnostics.
    Warning,
    /// Informational diagnostics.
    Information,
    /// Hint diagnostics.
    Hint,
}

/// A positioned diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity.
    pub severity: DiagnosticSeverity,
    /// Affected range (UTF-16 columns).
    pub range: Range,
    /// Human-readable message.
    pub message: String,
    /// Always [`DIAGNOSTIC_SOURCE`].
    pub source: &'static str,
    /// Stable rule identifier.
    pub code: Option<&'static str>,
}

/// A declaration header found on a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct DeclarationHeader<'a> {
    keyword: &'a str,
    name: &'a str,
    /// Byte offset of `name` in the line.
    name_start: usize,
}

fn match_declaration_header(line: &str) -> Option<DeclarationHeader<'_>> {
    let caps = DECLARATION_HEADER.captures(line)?;
    let keyword = caps.get(1).filter(|word| is_declaration_keyword(word.as_str()))?;
    let name = caps.get(2)?;
    Some(DeclarationHeader {
        keyword: keyword.as_str(),
        name: name.as_str(),
        name_start: name.start(),
    })
}

fn check_line(line_number: usize, line: &str) -> Option<Diagnostic> {
    let header = match_declaration_header(line)?;
    // Only a space between words counts; whitespace before the colon does not.
    if !header.name.trim_end().contains(' ') || header.name.starts_with('"') {
        return None;
    }

    let start = CoordinateConverter::byte_to_utf16(line, header.name_start);
    let end = start + CoordinateConverter::utf16_len(header.name);
    let line_number = line_number as u32;

    Some(Diagnostic {
        severity: DiagnosticSeverity::Warning,
        range: Range::new(
            Position::new(line_number, start as u32),
            Position::new(line_number, end as u32),
        ),
        message: format!(
            "Multi-word `{}` names should be quoted: `{}`",
            header.keyword, header.name
        ),
        source: DIAGNOSTIC_SOURCE,
        code: Some(MULTI_WORD_NAME),
    })
}

/// Scan every line of a document.
pub fn scan(line_index: &LineIndex) -> Vec<Diagnostic> {
    line_index
        .lines()
        .enumerate()
        .filter_map(|(line_number, line)| check_line(line_number, &line))
        .collect()
}

/// Convenience wrapper around [`scan`] for raw text.
pub fn scan_text(text: &str) -> Vec<Diagnostic> {
    scan(&LineIndex::from_text(text))
}
