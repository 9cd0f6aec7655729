#![warn(missing_docs)]
//! `blueprint-lang` - static, data-only description of the Blueprint language surface.
//!
//! This crate intentionally stays dependency-free. It provides the categorized keyword catalog
//! used by the analysis engine (completion, declaration-header detection) and by hosts that
//! generate syntax-highlighting grammars, plus a small [`LanguageConfig`] describing how a host
//! should register the language.

mod catalog;

pub use catalog::{
    KeywordCategory, catalog, category_detail, category_of, is_declaration_keyword,
    keyword_documentation, keywords,
};

/// Host-facing registration data for the language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageConfig {
    /// LSP `languageId`.
    pub language_id: &'static str,
    /// Characters that should trigger completion automatically.
    pub completion_trigger_characters: &'static [&'static str],
}

impl LanguageConfig {
    /// The configuration for Blueprint documents.
    pub const fn blueprint() -> Self {
        Self {
            language_id: "blueprint",
            completion_trigger_characters: &[":"],
        }
    }

    /// Returns `true` if an LSP `languageId` names this language.
    pub fn matches_language_id(&self, language_id: &str) -> bool {
        self.language_id == language_id
    }
}

impl Default for LanguageConfig {
    fn default() -> Self {
        Self::blueprint()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_config() {
        let config = LanguageConfig::default();
        assert!(config.matches_language_id("blueprint"));
        assert!(!config.matches_language_id("yaml"));
        assert_eq!(config.completion_trigger_characters, &[":"]);
    }
}
