//! Document store.
//!
//! Owns the live text of every open document, keyed by uri. Edits arrive as ordered
//! range-replacement batches (LSP `contentChanges` semantics) and are applied atomically.
//!
//! Every successful mutation queues the uri for re-validation; [`DocumentStore::drain_pending`]
//! hands the queue to whoever publishes diagnostics.

use crate::error::{AnalysisError, AnalysisResult};
use crate::line_index::{LineIndex, Range};
use std::collections::{HashMap, VecDeque};

/// A single content change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentChange {
    /// Range to replace, evaluated against the text produced by the preceding changes of the
    /// same batch. `None` replaces the whole document.
    pub range: Option<Range>,
    /// Replacement text (may contain line breaks).
    pub text: String,
}

impl ContentChange {
    /// A change replacing `range` with `text`.
    pub fn replace(range: Range, text: impl Into<String>) -> Self {
        Self {
            range: Some(range),
            text: text.into(),
        }
    }

    /// A change replacing the whole document.
    pub fn full(text: impl Into<String>) -> Self {
        Self {
            range: None,
            text: text.into(),
        }
    }
}

/// An open document.
#[derive(Debug, Clone)]
pub struct Document {
    uri: String,
    version: i32,
    text: LineIndex,
}

impl Document {
    fn new(uri: String, text: &str, version: i32) -> Self {
        Self {
            uri,
            version,
            text: LineIndex::from_text(text),
        }
    }

    /// Document uri.
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Version of the last accepted open/edit.
    pub fn version(&self) -> i32 {
        self.version
    }

    /// Full current text.
    pub fn text(&self) -> String {
        self.text.get_text()
    }

    /// Line index over the current text.
    pub fn line_index(&self) -> &LineIndex {
        &self.text
    }

    /// Number of lines.
    pub fn line_count(&self) -> usize {
        self.text.line_count()
    }

    /// Text of line `line`, without its terminator.
    pub fn line(&self, line: usize) -> Option<String> {
        self.text.get_line_text(line)
    }
}

/// Apply `changes` in order to a copy of `text`.
fn apply_changes(text: &LineIndex, changes: &[ContentChange]) -> AnalysisResult<LineIndex> {
    let mut next = text.clone();
    for change in changes {
        match change.range {
            Some(range) => {
                let a = next.char_offset(range.start)?;
                let b = next.char_offset(range.end)?;
                next.replace(a.min(b), a.max(b), &change.text);
            }
            None => next = LineIndex::from_text(&change.text),
        }
    }
    Ok(next)
}

/// All open documents plus the pending re-validation queue.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: HashMap<String, Document>,
    pending: VecDeque<String>,
}

impl DocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a document.
    ///
    /// A uri that is already open is rejected with [`AnalysisError::DuplicateDocument`]; the
    /// existing document is left untouched.
    pub fn open(&mut self, uri: &str, text: &str, version: i32) -> AnalysisResult<()> {
        if self.documents.contains_key(uri) {
            return Err(AnalysisError::DuplicateDocument(uri.to_string()));
        }

        self.documents
            .insert(uri.to_string(), Document::new(uri.to_string(), text, version));
        log::debug!("opened {uri} at version {version}");
        self.schedule_validation(uri);
        Ok(())
    }

    /// Apply a batch of changes and move the document to `new_version`.
    ///
    /// The batch is all-or-nothing: if any change names an invalid position, neither text nor
    /// version changes.
    pub fn apply_edit(
        &mut self,
        uri: &str,
        changes: &[ContentChange],
        new_version: i32,
    ) -> AnalysisResult<()> {
        let document = self
            .documents
            .get_mut(uri)
            .ok_or_else(|| AnalysisError::UnknownDocument(uri.to_string()))?;

        if new_version <= document.version {
            return Err(AnalysisError::StaleVersion {
                uri: uri.to_string(),
                current: document.version,
                requested: new_version,
            });
        }

        document.text = apply_changes(&document.text, changes)?;
        document.version = new_version;
        log::debug!(
            "applied {} change(s) to {uri}, now at version {new_version}",
            changes.len()
        );

        self.schedule_validation(uri);
        Ok(())
    }

    /// Stop tracking a document. Closing an unknown uri is a no-op.
    pub fn close(&mut self, uri: &str) {
        if self.documents.remove(uri).is_some() {
            log::debug!("closed {uri}");
            self.schedule_validation(uri);
        }
    }

    /// Look up an open document.
    pub fn get(&self, uri: &str) -> AnalysisResult<&Document> {
        self.documents
            .get(uri)
            .ok_or_else(|| AnalysisError::UnknownDocument(uri.to_string()))
    }

    /// Take all uris queued for re-validation, in the order they were first queued.
    pub fn drain_pending(&mut self) -> Vec<String> {
        self.pending.drain(..).collect()
    }

    /// Queue every open document for re-validation (sorted by uri).
    pub fn schedule_all(&mut self) {
        let mut uris: Vec<String> = self.documents.keys().cloned().collect();
        uris.sort();
        for uri in uris {
            self.schedule_validation(&uri);
        }
    }

    fn schedule_validation(&mut self, uri: &str) {
        if !self.pending.iter().any(|queued| queued == uri) {
            self.pending.push_back(uri.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line_index::Position;

    fn range(sl: u32, sc: u32, el: u32, ec: u32) -> Range {
        Range::new(Position::new(sl, sc), Position::new(el, ec))
    }

    #[test]
    fn test_open_rejects_duplicates() {
        let mut store = DocumentStore::new();
        store.open("file:///a.bp", "app \"A\":", 1).unwrap();

        let err = store.open("file:///a.bp", "other", 5).unwrap_err();
        assert_eq!(err, AnalysisError::DuplicateDocument("file:///a.bp".into()));

        let doc = store.get("file:///a.bp").unwrap();
        assert_eq!(doc.text(), "app \"A\":");
        assert_eq!(doc.version(), 1);
    }

    #[test]
    fn test_changes_apply_in_order() {
        let mut store = DocumentStore::new();
        store.open("u", "model User:\n", 1).unwrap();

        // The second change addresses the text produced by the first.
        let changes = vec![
            ContentChange::replace(range(0, 6, 0, 6), "\""),
            ContentChange::replace(range(0, 11, 0, 11), "\""),
        ];
        store.apply_edit("u", &changes, 2).unwrap();

        assert_eq!(store.get("u").unwrap().text(), "model \"User\":\n");
    }

    #[test]
    fn test_full_replacement_change() {
        let mut store = DocumentStore::new();
        store.open("u", "old", 1).unwrap();
        store
            .apply_edit("u", &[ContentChange::full("page Home:")], 2)
            .unwrap();
        assert_eq!(store.get("u").unwrap().text(), "page Home:");
    }

    #[test]
    fn test_stale_version_rejected() {
        let mut store = DocumentStore::new();
        store.open("u", "abc", 3).unwrap();

        let err = store
            .apply_edit("u", &[ContentChange::full("x")], 3)
            .unwrap_err();
        assert_eq!(
            err,
            AnalysisError::StaleVersion {
                uri: "u".into(),
                current: 3,
                requested: 3
            }
        );
        assert_eq!(store.get("u").unwrap().text(), "abc");
    }

    #[test]
    fn test_failed_batch_is_atomic() {
        let mut store = DocumentStore::new();
        store.open("u", "abc", 1).unwrap();

        let changes = vec![
            ContentChange::replace(range(0, 0, 0, 0), "x"),
            ContentChange::replace(range(5, 0, 5, 0), "y"),
        ];
        assert!(matches!(
            store.apply_edit("u", &changes, 2),
            Err(AnalysisError::InvalidPosition { line: 5, .. })
        ));

        let doc = store.get("u").unwrap();
        assert_eq!(doc.text(), "abc");
        assert_eq!(doc.version(), 1);
    }

    #[test]
    fn test_edit_unknown_document() {
        let mut store = DocumentStore::new();
        assert_eq!(
            store.apply_edit("nope", &[], 1),
            Err(AnalysisError::UnknownDocument("nope".into()))
        );
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut store = DocumentStore::new();
        store.open("u", "", 1).unwrap();
        store.close("u");
        store.close("u");
        assert!(store.get("u").is_err());
    }

    #[test]
    fn test_mutations_schedule_validation() {
        let mut store = DocumentStore::new();
        store.open("a", "", 1).unwrap();
        store.open("b", "", 1).unwrap();
        store.apply_edit("a", &[ContentChange::full("x")], 2).unwrap();
        assert_eq!(store.drain_pending(), vec!["a", "b"]);

        store.close("b");
        store.close("missing");
        assert_eq!(store.drain_pending(), vec!["b"]);
        assert!(store.drain_pending().is_empty());
    }

    #[test]
    fn test_rejected_operations_do_not_schedule() {
        let mut store = DocumentStore::new();
        store.open("a", "", 1).unwrap();
        store.drain_pending();

        let _ = store.open("a", "", 1);
        let _ = store.apply_edit("a", &[], 1);
        assert!(store.drain_pending().is_empty());
    }
}
