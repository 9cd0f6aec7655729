use blueprint_analysis::lang::keywords;
use blueprint_analysis::{AnalysisError, AnalysisHost, KeywordCategory, Position};

const URI: &str = "file:///project/main.bp";

fn host_with(text: &str) -> AnalysisHost {
    let mut host = AnalysisHost::default();
    host.open_document(URI, text, 1).unwrap();
    host
}

fn labels_of(host: &AnalysisHost, position: Position) -> Vec<String> {
    host.completions(URI, position)
        .unwrap()
        .into_iter()
        .map(|item| item.label)
        .collect()
}

#[test]
fn test_empty_line_offers_every_declaration() {
    let host = host_with("app \"Shop\":\n\n");
    let items = host.completions(URI, Position::new(1, 0)).unwrap();

    for keyword in keywords(KeywordCategory::Declarations) {
        assert!(
            items
                .iter()
                .any(|item| item.label == *keyword && item.category == KeywordCategory::Declarations),
            "missing declaration {keyword}"
        );
    }

    let app = items.iter().find(|item| item.label == "app").unwrap();
    let page = items.iter().find(|item| item.label == "page").unwrap();
    assert!(app.insert_text.contains("${1:ProjectName}"));
    assert!(page.insert_text.contains("${1:Name}"));
    assert!(!page.insert_text.contains("ProjectName"));
}

#[test]
fn test_modifiers_are_always_offered() {
    let host = host_with("model User:\n  email: String re\n  ???");
    let positions = [
        Position::new(0, 0),
        Position::new(0, 5),
        Position::new(0, 11),
        Position::new(1, 17),
        Position::new(2, 5),
    ];

    for position in positions {
        let labels = labels_of(&host, position);
        for modifier in keywords(KeywordCategory::Modifiers) {
            assert!(
                labels.iter().any(|label| label == modifier),
                "missing modifier {modifier} at {position:?}"
            );
        }
    }
}

#[test]
fn test_after_colon_offers_properties_actions_and_types() {
    let host = host_with("page Home:\n  title: ");
    let items = host.completions(URI, Position::new(1, 9)).unwrap();

    let categories: Vec<KeywordCategory> = items.iter().map(|item| item.category).collect();
    assert!(categories.contains(&KeywordCategory::Properties));
    assert!(categories.contains(&KeywordCategory::Actions));
    assert!(categories.contains(&KeywordCategory::Types));
    assert!(!categories.contains(&KeywordCategory::Declarations));
    assert!(!categories.contains(&KeywordCategory::Control));

    let expected_len = keywords(KeywordCategory::Properties).len()
        + keywords(KeywordCategory::Actions).len()
        + keywords(KeywordCategory::Types).len()
        + keywords(KeywordCategory::Modifiers).len();
    assert_eq!(items.len(), expected_len);
}

#[test]
fn test_type_position_mid_word() {
    let host = host_with("model User:\n  email: Em");
    let items = host.completions(URI, Position::new(1, 11)).unwrap();

    assert!(items.iter().any(|item| item.label == "Email"));
    assert!(!items.iter().any(|item| item.category == KeywordCategory::Properties));
}

#[test]
fn test_line_past_end_is_invalid_position() {
    let host = host_with("app \"Shop\":");
    assert_eq!(
        host.completions(URI, Position::new(7, 0)),
        Err(AnalysisError::InvalidPosition {
            line: 7,
            character: 0
        })
    );
}

#[test]
fn test_character_past_end_is_invalid_position() {
    let host = host_with("app");
    assert!(matches!(
        host.completions(URI, Position::new(0, 4)),
        Err(AnalysisError::InvalidPosition { .. })
    ));
}

#[test]
fn test_unknown_document() {
    let host = AnalysisHost::default();
    assert_eq!(
        host.completions("file:///missing.bp", Position::new(0, 0)),
        Err(AnalysisError::UnknownDocument("file:///missing.bp".into()))
    );
}

#[test]
fn test_completion_sees_latest_edit() {
    use blueprint_analysis::{ContentChange, Range};

    let mut host = host_with("model User:\n");
    host.change_document(
        URI,
        &[ContentChange::replace(
            Range::new(Position::new(1, 0), Position::new(1, 0)),
            "  id: ",
        )],
        2,
    )
    .unwrap();

    let labels = labels_of(&host, Position::new(1, 6));
    assert!(labels.iter().any(|label| label == "Uuid"));
}

#[test]
fn test_resolve_enriches_detail() {
    let host = host_with("");
    let item = host
        .completions(URI, Position::new(0, 0))
        .unwrap()
        .into_iter()
        .find(|item| item.label == "workflow")
        .unwrap();
    assert!(item.documentation.is_none());

    let resolved = host.resolve_completion(item.clone());
    assert_eq!(resolved.label, item.label);
    assert_eq!(resolved.insert_text, item.insert_text);
    assert!(resolved.documentation.is_some());
    assert_ne!(resolved.detail, item.detail);
}

#[test]
fn test_plain_text_declarations_without_snippet_support() {
    use blueprint_analysis::AnalysisConfig;

    let mut host = AnalysisHost::new(AnalysisConfig::default().with_snippet_support(false));
    host.open_document(URI, "", 1).unwrap();

    let app = host
        .completions(URI, Position::new(0, 0))
        .unwrap()
        .into_iter()
        .find(|item| item.label == "app")
        .unwrap();
    assert_eq!(app.insert_text, "app \"ProjectName\":");
    assert!(!app.is_snippet_template);
}

/// Treats every prefix as a property slot.
struct PropertiesEverywhere;

impl blueprint_analysis::ContextClassifier for PropertiesEverywhere {
    fn classify(&self, _prefix: &str) -> Vec<blueprint_analysis::CompletionContext> {
        vec![blueprint_analysis::CompletionContext::AfterColon]
    }
}

#[test]
fn test_host_uses_custom_classifier() {
    use blueprint_analysis::AnalysisConfig;

    let mut host =
        AnalysisHost::with_classifier(AnalysisConfig::default(), Box::new(PropertiesEverywhere));
    host.open_document(URI, "\n", 1).unwrap();

    let items = host.completions(URI, Position::new(0, 0)).unwrap();
    let expected_len =
        keywords(KeywordCategory::Properties).len() + keywords(KeywordCategory::Actions).len();
    assert_eq!(items.len(), expected_len);
    assert!(items.iter().all(|item| matches!(
        item.category,
        KeywordCategory::Properties | KeywordCategory::Actions
    )));
    assert!(!items.iter().any(|item| item.label == "app"));
}
