use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced by the analysis engine.
///
/// None of these are fatal: the protocol layer turns them into empty results.
pub enum AnalysisError {
    #[error("unknown document: {0}")]
    /// The uri is not tracked by the document store.
    UnknownDocument(String),

    #[error("invalid position: line {line}, character {character}")]
    /// A position names a line or character outside the current text.
    InvalidPosition {
        /// Zero-based line.
        line: u32,
        /// Zero-based UTF-16 column.
        character: u32,
    },

    #[error("stale version for {uri}: current {current}, requested {requested}")]
    /// An edit carried a version that does not exceed the current one.
    StaleVersion {
        /// Document uri.
        uri: String,
        /// Version currently stored.
        current: i32,
        /// Version carried by the rejected edit.
        requested: i32,
    },

    #[error("document already open: {0}")]
    /// `open` was called for a uri that is already tracked.
    DuplicateDocument(String),
}

/// Result alias used throughout the crate.
pub type AnalysisResult<T> = Result<T, AnalysisError>;
