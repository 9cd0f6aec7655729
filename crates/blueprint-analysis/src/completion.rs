//! Keyword completion.
//!
//! Candidates come straight from the catalog: each classified context maps to catalog
//! categories, and every keyword of those categories becomes one candidate, in catalog order.
//! No filtering, ranking or deduplication happens here; hosts filter by the typed word.

use crate::context::{CompletionContext, ContextClassifier, prefix_at};
use crate::error::{AnalysisError, AnalysisResult};
use crate::line_index::{LineIndex, Position};
use blueprint_lang::{
    KeywordCategory, category_detail, category_of, keyword_documentation, keywords,
};

/// A completion candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionCandidate {
    /// Label shown in the completion list (the keyword).
    pub label: String,
    /// Catalog category the keyword came from.
    pub category: KeywordCategory,
    /// Short description.
    pub detail: String,
    /// Long-form documentation, filled in by [`resolve`].
    pub documentation: Option<String>,
    /// Text to insert; a snippet template when `is_snippet_template` is set.
    pub insert_text: String,
    /// Whether `insert_text` uses snippet placeholder syntax (`${1:Name}`).
    pub is_snippet_template: bool,
}

/// Placeholder used in a declaration template.
fn declaration_placeholder(keyword: &str) -> &'static str {
    match keyword {
        "app" => "ProjectName",
        _ => "Name",
    }
}

fn candidate(keyword: &str, category: KeywordCategory, snippets: bool) -> CompletionCandidate {
    let (insert_text, is_snippet_template) = match category {
        KeywordCategory::Declarations => {
            let placeholder = declaration_placeholder(keyword);
            if snippets {
                (format!("{keyword} \"${{1:{placeholder}}}\":"), true)
            } else {
                (format!("{keyword} \"{placeholder}\":"), false)
            }
        }
        _ => (keyword.to_string(), false),
    };

    CompletionCandidate {
        label: keyword.to_string(),
        category,
        detail: category_detail(category).to_string(),
        documentation: None,
        insert_text,
        is_snippet_template,
    }
}

/// Candidates for a set of contexts, in context order then catalog order.
pub fn candidates_for(contexts: &[CompletionContext], snippets: bool) -> Vec<CompletionCandidate> {
    contexts
        .iter()
        .flat_map(|context| context.categories())
        .flat_map(|&category| {
            keywords(category)
                .iter()
                .map(move |keyword| candidate(keyword, category, snippets))
        })
        .collect()
}

/// Compute completion candidates at `position` in the document described by `line_index`.
///
/// Fails with [`AnalysisError::InvalidPosition`] if the line does not exist or the column lies
/// outside it.
pub fn completions(
    classifier: &dyn ContextClassifier,
    line_index: &LineIndex,
    position: Position,
    snippets: bool,
) -> AnalysisResult<Vec<CompletionCandidate>> {
    let line_text = line_index.get_line_text(position.line as usize).ok_or(
        AnalysisError::InvalidPosition {
            line: position.line,
            character: position.character,
        },
    )?;
    let prefix = prefix_at(&line_text, position)?;
    let contexts = classifier.classify(prefix);

    Ok(candidates_for(&contexts, snippets))
}

/// Enrich a candidate with its keyword documentation.
///
/// Only reads the static catalog. Candidates whose label is not a keyword of their category are
/// returned unchanged.
pub fn resolve(mut candidate: CompletionCandidate) -> CompletionCandidate {
    if category_of(&candidate.label) != Some(candidate.category) {
        return candidate;
    }

    if let Some(doc) = keyword_documentation(&candidate.label) {
        candidate.documentation = Some(doc.to_string());
    }
    candidate.detail = format!("{} keyword", category_detail(candidate.category));
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::PatternClassifier;

    fn labels(candidates: &[CompletionCandidate]) -> Vec<&str> {
        candidates.iter().map(|c| c.label.as_str()).collect()
    }

    #[test]
    fn test_declaration_templates() {
        let candidates = candidates_for(&[CompletionContext::LineStart], true);

        let app = &candidates[0];
        assert_eq!(app.label, "app");
        assert_eq!(app.insert_text, "app \"${1:ProjectName}\":");
        assert!(app.is_snippet_template);

        let model = candidates.iter().find(|c| c.label == "model").unwrap();
        assert_eq!(model.insert_text, "model \"${1:Name}\":");
    }

    #[test]
    fn test_plain_text_templates_without_snippets() {
        let candidates = candidates_for(&[CompletionContext::LineStart], false);
        assert_eq!(candidates[0].insert_text, "app \"ProjectName\":");
        assert!(candidates.iter().all(|c| !c.is_snippet_template));
    }

    #[test]
    fn test_union_order() {
        let index = LineIndex::from_text("  title:");
        let candidates =
            completions(&PatternClassifier, &index, Position::new(0, 8), true).unwrap();

        let expected: Vec<&str> = keywords(KeywordCategory::Properties)
            .iter()
            .chain(keywords(KeywordCategory::Actions))
            .chain(keywords(KeywordCategory::Types))
            .chain(keywords(KeywordCategory::Modifiers))
            .copied()
            .collect();
        assert_eq!(labels(&candidates), expected);
    }

    #[test]
    fn test_non_declarations_insert_bare_keyword() {
        let candidates = candidates_for(&[CompletionContext::Always], true);
        for c in candidates {
            assert_eq!(c.insert_text, c.label);
            assert!(!c.is_snippet_template);
            assert_eq!(c.category, KeywordCategory::Modifiers);
        }
    }

    #[test]
    fn test_resolve_adds_documentation() {
        let model = candidate("model", KeywordCategory::Declarations, true);
        let resolved = resolve(model.clone());

        assert_eq!(resolved.label, model.label);
        assert_eq!(resolved.insert_text, model.insert_text);
        assert_eq!(resolved.detail, "declaration keyword");
        assert_eq!(
            resolved.documentation.as_deref(),
            keyword_documentation("model")
        );
    }

    #[test]
    fn test_resolve_leaves_foreign_items_alone() {
        let mut foreign = candidate("model", KeywordCategory::Declarations, true);
        foreign.label = "customThing".to_string();
        assert_eq!(resolve(foreign.clone()), foreign);

        // Right label, wrong category.
        let mut mismatched = candidate("title", KeywordCategory::Properties, true);
        mismatched.category = KeywordCategory::Types;
        assert_eq!(resolve(mismatched.clone()), mismatched);
    }
}
