//! Conversions between LSP JSON payloads and `blueprint-analysis` types.
//!
//! Everything works on raw [`serde_json::Value`]s. Parsing helpers return
//! [`ProtocolError::InvalidParams`] when a required field is missing or has the wrong type.

use crate::error::{ProtocolError, ProtocolResult};
use blueprint_analysis::{
    CompletionCandidate, ContentChange, Diagnostic, DiagnosticSeverity, KeywordCategory, Position,
    Range,
};
use blueprint_lang::{LanguageConfig, category_detail, category_of};
use serde_json::{Map, Value, json};

/// Invalid JSON was received.
pub const PARSE_ERROR: i64 = -32700;
/// The message is not a valid request object, or the request is not allowed in this state.
pub const INVALID_REQUEST: i64 = -32600;
/// The method does not exist.
pub const METHOD_NOT_FOUND: i64 = -32601;
/// Invalid method parameters.
pub const INVALID_PARAMS: i64 = -32602;
/// A request arrived before `initialize`.
pub const SERVER_NOT_INITIALIZED: i64 = -32002;

/// LSP `TextDocumentSyncKind.Incremental`.
pub const SYNC_INCREMENTAL: u64 = 2;

const INSERT_TEXT_FORMAT_PLAIN: u64 = 1;
const INSERT_TEXT_FORMAT_SNIPPET: u64 = 2;

fn invalid(message: impl Into<String>) -> ProtocolError {
    ProtocolError::InvalidParams(message.into())
}

fn field<'a>(value: &'a Value, name: &str) -> ProtocolResult<&'a Value> {
    value
        .get(name)
        .ok_or_else(|| invalid(format!("missing `{name}`")))
}

fn str_field<'a>(value: &'a Value, name: &str) -> ProtocolResult<&'a str> {
    field(value, name)?
        .as_str()
        .ok_or_else(|| invalid(format!("`{name}` must be a string")))
}

fn i32_field(value: &Value, name: &str) -> ProtocolResult<i32> {
    field(value, name)?
        .as_i64()
        .and_then(|v| i32::try_from(v).ok())
        .ok_or_else(|| invalid(format!("`{name}` must be a 32-bit integer")))
}

fn u32_field(value: &Value, name: &str) -> ProtocolResult<u32> {
    field(value, name)?
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .ok_or_else(|| invalid(format!("`{name}` must be an unsigned 32-bit integer")))
}

/// Parse an LSP `Position`.
pub fn position_from_value(value: &Value) -> ProtocolResult<Position> {
    Ok(Position::new(
        u32_field(value, "line")?,
        u32_field(value, "character")?,
    ))
}

/// Parse an LSP `Range`.
pub fn range_from_value(value: &Value) -> ProtocolResult<Range> {
    Ok(Range::new(
        position_from_value(field(value, "start")?)?,
        position_from_value(field(value, "end")?)?,
    ))
}

/// Serialize a position.
pub fn position_to_value(position: Position) -> Value {
    json!({ "line": position.line, "character": position.character })
}

/// Serialize a range.
pub fn range_to_value(range: Range) -> Value {
    json!({
        "start": position_to_value(range.start),
        "end": position_to_value(range.end),
    })
}

/// Parse one entry of `contentChanges`. A missing or null `range` means full replacement.
pub fn content_change_from_value(value: &Value) -> ProtocolResult<ContentChange> {
    let text = str_field(value, "text")?;
    match value.get("range") {
        None | Some(Value::Null) => Ok(ContentChange::full(text)),
        Some(range) => Ok(ContentChange::replace(range_from_value(range)?, text)),
    }
}

/// `textDocument/didOpen` params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DidOpenParams {
    /// Document uri.
    pub uri: String,
    /// Initial text.
    pub text: String,
    /// Initial version.
    pub version: i32,
    /// Client-reported `languageId`, if any.
    pub language_id: Option<String>,
}

impl DidOpenParams {
    /// Parse from the notification params.
    pub fn from_value(params: &Value) -> ProtocolResult<Self> {
        let item = field(params, "textDocument")?;
        Ok(Self {
            uri: str_field(item, "uri")?.to_string(),
            text: str_field(item, "text")?.to_string(),
            version: i32_field(item, "version")?,
            language_id: item
                .get("languageId")
                .and_then(Value::as_str)
                .map(str::to_string),
        })
    }
}

/// `textDocument/didChange` params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DidChangeParams {
    /// Document uri.
    pub uri: String,
    /// Version after the changes.
    pub version: i32,
    /// Ordered content changes.
    pub changes: Vec<ContentChange>,
}

impl DidChangeParams {
    /// Parse from the notification params.
    pub fn from_value(params: &Value) -> ProtocolResult<Self> {
        let document = field(params, "textDocument")?;
        let changes = field(params, "contentChanges")?
            .as_array()
            .ok_or_else(|| invalid("`contentChanges` must be an array"))?
            .iter()
            .map(content_change_from_value)
            .collect::<ProtocolResult<Vec<_>>>()?;

        Ok(Self {
            uri: str_field(document, "uri")?.to_string(),
            version: i32_field(document, "version")?,
            changes,
        })
    }
}

/// `textDocument.uri` of `didClose` (and any other text document params).
pub fn text_document_uri(params: &Value) -> ProtocolResult<String> {
    Ok(str_field(field(params, "textDocument")?, "uri")?.to_string())
}

/// `textDocument/completion` params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionParams {
    /// Document uri.
    pub uri: String,
    /// Cursor position.
    pub position: Position,
}

impl CompletionParams {
    /// Parse from the request params.
    pub fn from_value(params: &Value) -> ProtocolResult<Self> {
        Ok(Self {
            uri: text_document_uri(params)?,
            position: position_from_value(field(params, "position")?)?,
        })
    }
}

/// Client `textDocument.completion.completionItem.snippetSupport`, if declared.
pub fn client_snippet_support(capabilities: &Value) -> Option<bool> {
    capabilities
        .pointer("/textDocument/completion/completionItem/snippetSupport")
        .and_then(Value::as_bool)
}

/// The `initialize` result advertising this server's capabilities.
pub fn initialize_result(language: &LanguageConfig) -> Value {
    json!({
        "capabilities": {
            "textDocumentSync": {
                "openClose": true,
                "change": SYNC_INCREMENTAL,
            },
            "completionProvider": {
                "triggerCharacters": language.completion_trigger_characters,
                "resolveProvider": true,
            },
        },
        "serverInfo": {
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
        },
    })
}

/// LSP `DiagnosticSeverity` number.
pub fn severity_to_u64(severity: DiagnosticSeverity) -> u64 {
    match severity {
        DiagnosticSeverity::Error => 1,
        DiagnosticSeverity::Warning => 2,
        DiagnosticSeverity::Information => 3,
        DiagnosticSeverity::Hint => 4,
    }
}

/// Serialize a diagnostic.
pub fn diagnostic_to_value(diagnostic: &Diagnostic) -> Value {
    let mut obj = Map::new();
    obj.insert("range".to_string(), range_to_value(diagnostic.range));
    obj.insert(
        "severity".to_string(),
        Value::Number(severity_to_u64(diagnostic.severity).into()),
    );
    if let Some(code) = diagnostic.code {
        obj.insert("code".to_string(), Value::String(code.to_string()));
    }
    obj.insert(
        "source".to_string(),
        Value::String(diagnostic.source.to_string()),
    );
    obj.insert(
        "message".to_string(),
        Value::String(diagnostic.message.clone()),
    );
    Value::Object(obj)
}

/// `textDocument/publishDiagnostics` params. `version` is omitted when `None`.
pub fn publish_diagnostics_params(
    uri: &str,
    version: Option<i32>,
    diagnostics: &[Diagnostic],
) -> Value {
    let mut obj = Map::new();
    obj.insert("uri".to_string(), Value::String(uri.to_string()));
    if let Some(version) = version {
        obj.insert("version".to_string(), Value::Number(version.into()));
    }
    obj.insert(
        "diagnostics".to_string(),
        Value::Array(diagnostics.iter().map(diagnostic_to_value).collect()),
    );
    Value::Object(obj)
}

/// LSP `CompletionItemKind` for a keyword category.
pub fn completion_item_kind(category: KeywordCategory) -> u64 {
    match category {
        KeywordCategory::Declarations => 7,
        KeywordCategory::Types => 22,
        KeywordCategory::Modifiers | KeywordCategory::Control => 14,
        KeywordCategory::Actions => 3,
        KeywordCategory::Properties => 10,
    }
}

fn markdown(value: &str) -> Value {
    json!({ "kind": "markdown", "value": value })
}

/// Serialize a candidate as a `CompletionItem`. `index` is its position in the response.
pub fn completion_item_to_value(candidate: &CompletionCandidate, index: usize) -> Value {
    let mut obj = Map::new();
    obj.insert("label".to_string(), Value::String(candidate.label.clone()));
    obj.insert(
        "kind".to_string(),
        Value::Number(completion_item_kind(candidate.category).into()),
    );
    obj.insert("detail".to_string(), Value::String(candidate.detail.clone()));
    if let Some(doc) = &candidate.documentation {
        obj.insert("documentation".to_string(), markdown(doc));
    }
    obj.insert(
        "insertText".to_string(),
        Value::String(candidate.insert_text.clone()),
    );
    let format = if candidate.is_snippet_template {
        INSERT_TEXT_FORMAT_SNIPPET
    } else {
        INSERT_TEXT_FORMAT_PLAIN
    };
    obj.insert("insertTextFormat".to_string(), Value::Number(format.into()));
    obj.insert(
        "sortText".to_string(),
        Value::String(format!("{index:04}")),
    );
    obj.insert(
        "data".to_string(),
        json!({ "category": candidate.category.name() }),
    );
    Value::Object(obj)
}

/// Rebuild a candidate from a `CompletionItem`.
///
/// The category comes from `data.category` as written by [`completion_item_to_value`]. Items
/// whose `data` was dropped fall back to the catalog category of their label.
pub fn completion_item_from_value(item: &Value) -> ProtocolResult<CompletionCandidate> {
    let label = str_field(item, "label")?.to_string();
    let category = item
        .pointer("/data/category")
        .and_then(Value::as_str)
        .and_then(KeywordCategory::from_name)
        .or_else(|| category_of(&label))
        .ok_or_else(|| invalid(format!("`{label}` is not a catalog keyword")))?;

    let documentation = match item.get("documentation") {
        Some(Value::String(doc)) => Some(doc.clone()),
        Some(markup) => markup
            .get("value")
            .and_then(Value::as_str)
            .map(str::to_string),
        None => None,
    };

    Ok(CompletionCandidate {
        insert_text: item
            .get("insertText")
            .and_then(Value::as_str)
            .unwrap_or(&label)
            .to_string(),
        is_snippet_template: item.get("insertTextFormat").and_then(Value::as_u64)
            == Some(INSERT_TEXT_FORMAT_SNIPPET),
        detail: item
            .get("detail")
            .and_then(Value::as_str)
            .unwrap_or(category_detail(category))
            .to_string(),
        documentation,
        label,
        category,
    })
}

/// Copy the resolved `detail` and `documentation` onto the client's original item, keeping every
/// other field the client sent back.
pub fn resolved_completion_item(item: &Value, resolved: &CompletionCandidate) -> Value {
    let mut obj = item.as_object().cloned().unwrap_or_default();
    obj.insert("detail".to_string(), Value::String(resolved.detail.clone()));
    if let Some(doc) = &resolved.documentation {
        obj.insert("documentation".to_string(), markdown(doc));
    }
    Value::Object(obj)
}

/// Build a JSON-RPC notification.
pub fn json_rpc_notification(method: &str, params: Value) -> Value {
    let mut obj = Map::new();
    obj.insert("jsonrpc".to_string(), Value::String("2.0".to_string()));
    obj.insert("method".to_string(), Value::String(method.to_string()));
    obj.insert("params".to_string(), params);
    Value::Object(obj)
}

/// Build a successful JSON-RPC response. `id` is echoed verbatim (number or string).
pub fn json_rpc_response(id: Value, result: Value) -> Value {
    let mut obj = Map::new();
    obj.insert("jsonrpc".to_string(), Value::String("2.0".to_string()));
    obj.insert("id".to_string(), id);
    obj.insert("result".to_string(), result);
    Value::Object(obj)
}

/// Build a JSON-RPC error response.
pub fn json_rpc_error_response(id: Value, code: i64, message: impl Into<String>) -> Value {
    let mut error = Map::new();
    error.insert("code".to_string(), Value::Number(code.into()));
    error.insert("message".to_string(), Value::String(message.into()));

    let mut obj = Map::new();
    obj.insert("jsonrpc".to_string(), Value::String("2.0".to_string()));
    obj.insert("id".to_string(), id);
    obj.insert("error".to_string(), Value::Object(error));
    Value::Object(obj)
}
