//! The keyword catalog.
//!
//! Categories are disjoint and their keyword order is significant: completion emits candidates
//! in catalog order.

/// A keyword category of the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeywordCategory {
    /// Top-level declaration keywords (`app`, `model`, ...).
    Declarations,
    /// Built-in field types.
    Types,
    /// Field and declaration modifiers.
    Modifiers,
    /// Action verbs usable in property values.
    Actions,
    /// Control-flow keywords.
    Control,
    /// Property names used inside declaration bodies.
    Properties,
}

impl KeywordCategory {
    /// All categories, in canonical order.
    pub const ALL: [KeywordCategory; 6] = [
        KeywordCategory::Declarations,
        KeywordCategory::Types,
        KeywordCategory::Modifiers,
        KeywordCategory::Actions,
        KeywordCategory::Control,
        KeywordCategory::Properties,
    ];

    /// Lower-case category name.
    pub const fn name(self) -> &'static str {
        match self {
            KeywordCategory::Declarations => "declarations",
            KeywordCategory::Types => "types",
            KeywordCategory::Modifiers => "modifiers",
            KeywordCategory::Actions => "actions",
            KeywordCategory::Control => "control",
            KeywordCategory::Properties => "properties",
        }
    }

    /// Inverse of [`KeywordCategory::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.name() == name)
    }
}

const DECLARATIONS: &[&str] = &[
    "app",
    "page",
    "model",
    "component",
    "service",
    "workflow",
    "route",
    "job",
];

const TYPES: &[&str] = &[
    "String", "Int", "Float", "Boolean", "Date", "DateTime", "Json", "Uuid", "Email", "Url",
];

const MODIFIERS: &[&str] = &[
    "required", "optional", "unique", "primary", "indexed", "default", "readonly", "private",
];

const ACTIONS: &[&str] = &[
    "create", "update", "delete", "fetch", "navigate", "submit", "validate", "notify",
];

const CONTROL: &[&str] = &["if", "else", "for", "each", "when", "match", "return"];

const PROPERTIES: &[&str] = &[
    "title",
    "description",
    "path",
    "layout",
    "fields",
    "auth",
    "theme",
    "version",
    "icon",
    "entity",
    "schedule",
];

/// Keywords of `category`, in catalog order.
pub const fn keywords(category: KeywordCategory) -> &'static [&'static str] {
    match category {
        KeywordCategory::Declarations => DECLARATIONS,
        KeywordCategory::Types => TYPES,
        KeywordCategory::Modifiers => MODIFIERS,
        KeywordCategory::Actions => ACTIONS,
        KeywordCategory::Control => CONTROL,
        KeywordCategory::Properties => PROPERTIES,
    }
}

/// Iterate the whole catalog in canonical category order.
///
/// Hosts use this to build highlighting grammars; the analysis engine uses [`keywords`].
pub fn catalog() -> impl Iterator<Item = (KeywordCategory, &'static [&'static str])> {
    KeywordCategory::ALL
        .into_iter()
        .map(|category| (category, keywords(category)))
}

/// Find the category a keyword belongs to (case-sensitive).
pub fn category_of(keyword: &str) -> Option<KeywordCategory> {
    catalog()
        .find(|(_, words)| words.contains(&keyword))
        .map(|(category, _)| category)
}

/// Returns `true` if `word` starts a declaration header.
pub fn is_declaration_keyword(word: &str) -> bool {
    DECLARATIONS.contains(&word)
}

/// Short human-readable description of a category, used as completion `detail`.
pub const fn category_detail(category: KeywordCategory) -> &'static str {
    match category {
        KeywordCategory::Declarations => "declaration",
        KeywordCategory::Types => "type",
        KeywordCategory::Modifiers => "modifier",
        KeywordCategory::Actions => "action",
        KeywordCategory::Control => "control flow",
        KeywordCategory::Properties => "property",
    }
}

/// Long-form documentation for a catalog keyword.
pub fn keyword_documentation(keyword: &str) -> Option<&'static str> {
    let doc = match keyword {
        // declarations
        "app" => "Declares the application root. Exactly one `app` block names the project.",
        "page" => "Declares a page reachable by the application's router.",
        "model" => "Declares a persisted data model and its fields.",
        "component" => "Declares a reusable UI component.",
        "service" => "Declares a backend service exposing operations.",
        "workflow" => "Declares a multi-step workflow composed of actions.",
        "route" => "Declares a route binding a path to a page.",
        "job" => "Declares a background job, optionally on a schedule.",

        // types
        "String" => "UTF-8 text value.",
        "Int" => "Signed integer value.",
        "Float" => "Floating point value.",
        "Boolean" => "`true` or `false`.",
        "Date" => "Calendar date without a time component.",
        "DateTime" => "Date and time with timezone.",
        "Json" => "Arbitrary structured JSON value.",
        "Uuid" => "Universally unique identifier.",
        "Email" => "Text value validated as an email address.",
        "Url" => "Text value validated as a URL.",

        // modifiers
        "required" => "The field must be present.",
        "optional" => "The field may be omitted.",
        "unique" => "No two records may share this value.",
        "primary" => "The field is the model's primary key.",
        "indexed" => "The field is indexed for lookups.",
        "default" => "Supplies a default value when none is given.",
        "readonly" => "The value cannot be changed after creation.",
        "private" => "The member is not exposed outside its declaration.",

        // actions
        "create" => "Creates a new record.",
        "update" => "Updates an existing record.",
        "delete" => "Deletes a record.",
        "fetch" => "Loads records or remote data.",
        "navigate" => "Navigates to another page.",
        "submit" => "Submits the current form.",
        "validate" => "Validates input against the model's rules.",
        "notify" => "Sends a notification to the user.",

        // control
        "if" => "Conditional branch.",
        "else" => "Alternative branch of an `if`.",
        "for" => "Iterates over a collection.",
        "each" => "Binds the current element inside a `for` loop.",
        "when" => "Guards a block on a condition or event.",
        "match" => "Selects a branch by value.",
        "return" => "Returns a value from the enclosing block.",

        // properties
        "title" => "Human-readable title.",
        "description" => "Longer description text.",
        "path" => "URL path of a page or route.",
        "layout" => "Layout used to render a page.",
        "fields" => "Field list of a model or form.",
        "auth" => "Authentication requirement.",
        "theme" => "Visual theme of the application.",
        "version" => "Version string of the application or service.",
        "icon" => "Icon shown for the element.",
        "entity" => "Model the element operates on.",
        "schedule" => "Cron-style schedule of a job.",

        _ => return None,
    };
    Some(doc)
}
