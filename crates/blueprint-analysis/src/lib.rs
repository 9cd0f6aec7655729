#![warn(missing_docs)]
//! Blueprint Analysis - in-process text analysis engine for Blueprint documents
//!
//! # Overview
//!
//! `blueprint-analysis` tracks the live text of open documents and answers two kinds of
//! questions about it:
//!
//! - **Completion**: which catalog keywords fit at a cursor position
//! - **Diagnostics**: which declaration headers break the naming convention
//!
//! It is protocol-agnostic: positions are UTF-16 line/column pairs (as used by LSP), but no
//! wire types appear in the API. `blueprint-lsp` adapts it to JSON-RPC.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  AnalysisHost (+ DiagnosticsSink)           │  ← Public API
//! ├──────────────────────┬──────────────────────┤
//! │  Completion Engine   │  Diagnostic Scanner  │  ← Features
//! ├──────────────────────┤                      │
//! │  Context Classifier  │                      │
//! ├──────────────────────┴──────────────────────┤
//! │  Document Store                             │  ← Versioned text
//! ├─────────────────────────────────────────────┤
//! │  Line Index (Rope + UTF-16 conversion)      │  ← Line access
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use blueprint_analysis::{AnalysisHost, Diagnostic, Position};
//!
//! let mut host = AnalysisHost::default();
//! host.open_document("file:///shop.bp", "model Order Item:\n", 1).unwrap();
//!
//! let mut published: Vec<(String, Option<i32>, Vec<Diagnostic>)> = Vec::new();
//! host.publish_pending(&mut published);
//! assert_eq!(published[0].2.len(), 1);
//!
//! let items = host
//!     .completions("file:///shop.bp", Position::new(1, 0))
//!     .unwrap();
//! assert!(items.iter().any(|item| item.label == "model"));
//! ```
//!
//! # Module Description
//!
//! - [`line_index`] - rope-backed line index and UTF-16 coordinate conversion
//! - [`documents`] - versioned document store with ordered, atomic edit batches
//! - [`context`] - line-prefix completion context classification
//! - [`completion`] - keyword candidates and resolve
//! - [`diagnostics`] - declaration-header naming scanner
//! - [`host`] - owner of all engine state

pub mod completion;
pub mod config;
pub mod context;
pub mod diagnostics;
pub mod documents;
mod error;
pub mod host;
pub mod line_index;

pub use blueprint_lang::{self as lang, KeywordCategory};
pub use completion::CompletionCandidate;
pub use config::{AnalysisConfig, AnalysisOptions};
pub use context::{CompletionContext, ContextClassifier, PatternClassifier};
pub use diagnostics::{DIAGNOSTIC_SOURCE, Diagnostic, DiagnosticSeverity};
pub use documents::{ContentChange, Document, DocumentStore};
pub use error::{AnalysisError, AnalysisResult};
pub use host::{AnalysisHost, DiagnosticsSink};
pub use line_index::{CoordinateConverter, LineIndex, Position, Range};
