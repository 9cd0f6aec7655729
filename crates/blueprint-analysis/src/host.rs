//! The analysis host: single owner of all engine state.
//!
//! All operations take `&self`/`&mut self` and run to completion, so callers get strict
//! arrival-order processing by calling them sequentially. Document mutations queue the uri for
//! re-validation; [`AnalysisHost::publish_pending`] runs those validations and hands complete
//! diagnostic sets to a [`DiagnosticsSink`].

use crate::completion::{self, CompletionCandidate};
use crate::config::AnalysisConfig;
use crate::context::{ContextClassifier, PatternClassifier};
use crate::diagnostics::{self, Diagnostic};
use crate::documents::{ContentChange, Document, DocumentStore};
use crate::error::AnalysisResult;
use crate::line_index::Position;

/// Receives the outcome of each validation pass.
pub trait DiagnosticsSink {
    /// Publish the complete diagnostic set for `uri`, replacing anything published before.
    ///
    /// `version` is the document version the set was computed for, or `None` when the document
    /// has been closed (in which case `diagnostics` is empty).
    fn publish_diagnostics(
        &mut self,
        uri: &str,
        version: Option<i32>,
        diagnostics: Vec<Diagnostic>,
    );
}

impl DiagnosticsSink for Vec<(String, Option<i32>, Vec<Diagnostic>)> {
    fn publish_diagnostics(
        &mut self,
        uri: &str,
        version: Option<i32>,
        diagnostics: Vec<Diagnostic>,
    ) {
        self.push((uri.to_string(), version, diagnostics));
    }
}

/// Owns the document store, configuration and context classifier.
pub struct AnalysisHost {
    documents: DocumentStore,
    config: AnalysisConfig,
    classifier: Box<dyn ContextClassifier>,
}

impl Default for AnalysisHost {
    fn default() -> Self {
        Self::new(AnalysisConfig::default())
    }
}

impl AnalysisHost {
    /// Create a host using the pattern-based classifier.
    pub fn new(config: AnalysisConfig) -> Self {
        Self::with_classifier(config, Box::new(PatternClassifier))
    }

    /// Create a host with a custom context classifier.
    pub fn with_classifier(
        config: AnalysisConfig,
        classifier: Box<dyn ContextClassifier>,
    ) -> Self {
        Self {
            documents: DocumentStore::new(),
            config,
            classifier,
        }
    }

    /// Current configuration.
    pub fn config(&self) -> AnalysisConfig {
        self.config
    }

    /// Replace the configuration. Open documents are queued for re-validation, since
    /// `diagnostics_enabled` may have changed.
    pub fn set_config(&mut self, config: AnalysisConfig) {
        self.config = config;
        self.documents.schedule_all();
    }

    /// `documentOpened`.
    pub fn open_document(&mut self, uri: &str, text: &str, version: i32) -> AnalysisResult<()> {
        self.documents.open(uri, text, version)
    }

    /// `documentChanged`.
    pub fn change_document(
        &mut self,
        uri: &str,
        changes: &[ContentChange],
        new_version: i32,
    ) -> AnalysisResult<()> {
        self.documents.apply_edit(uri, changes, new_version)
    }

    /// `documentClosed`. A no-op for unknown uris.
    pub fn close_document(&mut self, uri: &str) {
        self.documents.close(uri);
    }

    /// Snapshot access to an open document.
    pub fn document(&self, uri: &str) -> AnalysisResult<&Document> {
        self.documents.get(uri)
    }

    /// `completionRequested`.
    pub fn completions(
        &self,
        uri: &str,
        position: Position,
    ) -> AnalysisResult<Vec<CompletionCandidate>> {
        let document = self.documents.get(uri)?;
        completion::completions(
            self.classifier.as_ref(),
            document.line_index(),
            position,
            self.config.snippet_support,
        )
    }

    /// `completionItemResolveRequested`.
    pub fn resolve_completion(&self, candidate: CompletionCandidate) -> CompletionCandidate {
        completion::resolve(candidate)
    }

    /// Full rescan of an open document.
    pub fn validate(&self, uri: &str) -> AnalysisResult<Vec<Diagnostic>> {
        let document = self.documents.get(uri)?;
        if !self.config.diagnostics_enabled {
            return Ok(Vec::new());
        }
        Ok(diagnostics::scan(document.line_index()))
    }

    /// Validate every queued uri and publish the results.
    ///
    /// Closed documents get an empty set so previously published markers are cleared.
    /// Returns the number of sets published.
    pub fn publish_pending(&mut self, sink: &mut dyn DiagnosticsSink) -> usize {
        let pending = self.documents.drain_pending();
        for uri in &pending {
            match self.documents.get(uri) {
                Ok(document) => {
                    let version = document.version();
                    let diagnostics = self.validate(uri).unwrap_or_default();
                    log::debug!(
                        "validated {uri} at version {version}: {} diagnostic(s)",
                        diagnostics.len()
                    );
                    sink.publish_diagnostics(uri, Some(version), diagnostics);
                }
                Err(_) => sink.publish_diagnostics(uri, None, Vec::new()),
            }
        }
        pending.len()
    }
}
