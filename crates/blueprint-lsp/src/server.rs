//! Single-threaded request dispatcher.
//!
//! Messages are handled strictly in arrival order. Each document notification is followed by a
//! `textDocument/publishDiagnostics` for every uri it queued for validation.

use crate::error::{ProtocolError, ProtocolResult};
use crate::protocol::{
    CompletionParams, DidChangeParams, DidOpenParams, INVALID_PARAMS, INVALID_REQUEST,
    METHOD_NOT_FOUND, PARSE_ERROR, SERVER_NOT_INITIALIZED, client_snippet_support,
    completion_item_from_value, completion_item_to_value, initialize_result,
    json_rpc_error_response, json_rpc_notification, json_rpc_response,
    publish_diagnostics_params, resolved_completion_item, text_document_uri,
};
use crate::transport::{read_message, write_message};
use blueprint_analysis::{
    AnalysisConfig, AnalysisHost, AnalysisOptions, AnalysisResult, Diagnostic, DiagnosticsSink,
};
use blueprint_lang::LanguageConfig;
use serde_json::Value;
use std::io::{BufRead, Write};

/// Lifecycle state of the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    /// Waiting for `initialize`.
    Uninitialized,
    /// Serving requests.
    Running,
    /// `shutdown` received; only `exit` is meaningful now.
    ShuttingDown,
}

/// Collects `publishDiagnostics` notifications produced by a validation pass.
#[derive(Default)]
struct PublishQueue(Vec<Value>);

impl DiagnosticsSink for PublishQueue {
    fn publish_diagnostics(
        &mut self,
        uri: &str,
        version: Option<i32>,
        diagnostics: Vec<Diagnostic>,
    ) {
        self.0.push(json_rpc_notification(
            "textDocument/publishDiagnostics",
            publish_diagnostics_params(uri, version, &diagnostics),
        ));
    }
}

/// A Blueprint language server writing responses to `W`.
pub struct Server<W: Write> {
    host: AnalysisHost,
    language: LanguageConfig,
    writer: W,
    state: ServerState,
    exit_requested: bool,
}

impl<W: Write> Server<W> {
    /// Create a server that writes framed messages to `writer`.
    pub fn new(writer: W) -> Self {
        Self {
            host: AnalysisHost::default(),
            language: LanguageConfig::blueprint(),
            writer,
            state: ServerState::Uninitialized,
            exit_requested: false,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> ServerState {
        self.state
    }

    /// The analysis host.
    pub fn host(&self) -> &AnalysisHost {
        &self.host
    }

    /// Whether `exit` has been received.
    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Mutable access to the writer.
    pub fn writer_mut(&mut self) -> &mut W {
        &mut self.writer
    }

    /// Consume the server and return its writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    /// Serve messages from `reader` until `exit` or end of input.
    ///
    /// Returns `true` when the session ended cleanly (`shutdown` was received before the end).
    pub fn run<R: BufRead>(&mut self, reader: &mut R) -> ProtocolResult<bool> {
        while !self.exit_requested {
            match read_message(reader) {
                Ok(Some(message)) => self.handle_message(&message)?,
                Ok(None) => {
                    log::info!("input closed");
                    break;
                }
                Err(ProtocolError::Json(err)) => {
                    log::warn!("dropping malformed message: {err}");
                    self.send(json_rpc_error_response(
                        Value::Null,
                        PARSE_ERROR,
                        err.to_string(),
                    ))?;
                }
                Err(err) => return Err(err),
            }
        }
        Ok(self.state == ServerState::ShuttingDown)
    }

    /// Handle one decoded message. Only write failures are returned as errors.
    pub fn handle_message(&mut self, message: &Value) -> ProtocolResult<()> {
        let method = message.get("method").and_then(Value::as_str);
        let id = message.get("id").cloned();

        match (method, id) {
            (Some(method), Some(id)) => self.handle_request(method, id, params_of(message)),
            (Some(method), None) => self.handle_notification(method, params_of(message)),
            (None, Some(_)) if is_response(message) => {
                log::debug!("ignoring response from client");
                Ok(())
            }
            _ => {
                log::warn!("invalid message: {message}");
                self.send(json_rpc_error_response(
                    Value::Null,
                    INVALID_REQUEST,
                    "not a JSON-RPC request or notification",
                ))
            }
        }
    }

    fn handle_request(&mut self, method: &str, id: Value, params: &Value) -> ProtocolResult<()> {
        log::debug!("request {method} ({id})");

        match (self.state, method) {
            (ServerState::Uninitialized, "initialize") => {
                let result = self.initialize(params);
                self.send(json_rpc_response(id, result))
            }
            (ServerState::Uninitialized, _) => self.send(json_rpc_error_response(
                id,
                SERVER_NOT_INITIALIZED,
                "server not initialized",
            )),
            (ServerState::ShuttingDown, _) => self.send(json_rpc_error_response(
                id,
                INVALID_REQUEST,
                "server is shutting down",
            )),
            (ServerState::Running, "initialize") => self.send(json_rpc_error_response(
                id,
                INVALID_REQUEST,
                "server already initialized",
            )),
            (ServerState::Running, "shutdown") => {
                self.state = ServerState::ShuttingDown;
                self.send(json_rpc_response(id, Value::Null))
            }
            (ServerState::Running, "textDocument/completion") => {
                match CompletionParams::from_value(params) {
                    Ok(params) => {
                        let items = self.completion(&params);
                        self.send(json_rpc_response(id, items))
                    }
                    Err(err) => self.invalid_params(id, method, err),
                }
            }
            (ServerState::Running, "completionItem/resolve") => {
                let item = match completion_item_from_value(params) {
                    Ok(candidate) => {
                        let resolved = self.host.resolve_completion(candidate);
                        resolved_completion_item(params, &resolved)
                    }
                    // Resolve only enriches; anything it cannot place goes back unchanged.
                    Err(err) => {
                        log::debug!("{method}: {err}");
                        params.clone()
                    }
                };
                self.send(json_rpc_response(id, item))
            }
            (ServerState::Running, _) => self.send(json_rpc_error_response(
                id,
                METHOD_NOT_FOUND,
                format!("unknown method `{method}`"),
            )),
        }
    }

    fn handle_notification(&mut self, method: &str, params: &Value) -> ProtocolResult<()> {
        log::debug!("notification {method}");

        if method == "exit" {
            self.exit_requested = true;
            return Ok(());
        }
        if self.state != ServerState::Running {
            log::debug!("ignoring {method} in state {:?}", self.state);
            return Ok(());
        }

        let outcome = match method {
            "initialized" => {
                log::info!("client initialized");
                return Ok(());
            }
            "textDocument/didOpen" => DidOpenParams::from_value(params).map(|params| {
                if let Some(language_id) = &params.language_id
                    && !self.language.matches_language_id(language_id)
                {
                    log::warn!("{} opened as `{language_id}`", params.uri);
                }
                self.host
                    .open_document(&params.uri, &params.text, params.version)
            }),
            "textDocument/didChange" => DidChangeParams::from_value(params).map(|params| {
                self.host
                    .change_document(&params.uri, &params.changes, params.version)
            }),
            "textDocument/didClose" => text_document_uri(params).map(|uri| {
                self.host.close_document(&uri);
                Ok(())
            }),
            "workspace/didChangeConfiguration" => {
                self.change_configuration(params);
                Ok(Ok(()))
            }
            _ => {
                log::debug!("ignoring notification {method}");
                return Ok(());
            }
        };

        log_rejected(method, outcome);
        self.publish_pending()
    }

    fn initialize(&mut self, params: &Value) -> Value {
        let snippets = params
            .get("capabilities")
            .and_then(client_snippet_support)
            .unwrap_or(false);
        let mut config = AnalysisConfig::default().with_snippet_support(snippets);

        if let Some(options) = params.get("initializationOptions").filter(|v| !v.is_null()) {
            config = apply_options(config, options);
        }

        log::info!("initialized with {config:?}");
        self.host.set_config(config);
        self.state = ServerState::Running;
        initialize_result(&self.language)
    }

    fn change_configuration(&mut self, params: &Value) {
        if let Some(settings) = params
            .pointer("/settings/blueprint")
            .filter(|v| !v.is_null())
        {
            let config = apply_options(self.host.config(), settings);
            log::info!("configuration changed: {config:?}");
            self.host.set_config(config);
        }
    }

    fn completion(&self, params: &CompletionParams) -> Value {
        match self.host.completions(&params.uri, params.position) {
            Ok(candidates) => Value::Array(
                candidates
                    .iter()
                    .enumerate()
                    .map(|(index, candidate)| completion_item_to_value(candidate, index))
                    .collect(),
            ),
            Err(err) => {
                log::warn!("completion failed: {err}");
                Value::Array(Vec::new())
            }
        }
    }

    fn publish_pending(&mut self) -> ProtocolResult<()> {
        let mut queue = PublishQueue::default();
        self.host.publish_pending(&mut queue);
        for notification in queue.0 {
            self.send(notification)?;
        }
        Ok(())
    }

    fn invalid_params(&mut self, id: Value, method: &str, err: ProtocolError) -> ProtocolResult<()> {
        log::warn!("{method}: {err}");
        self.send(json_rpc_error_response(id, INVALID_PARAMS, err.to_string()))
    }

    fn send(&mut self, message: Value) -> ProtocolResult<()> {
        write_message(&mut self.writer, &message)
    }
}

fn is_response(message: &Value) -> bool {
    message.get("result").is_some() || message.get("error").is_some()
}

static NULL: Value = Value::Null;

fn params_of(message: &Value) -> &Value {
    message.get("params").unwrap_or(&NULL)
}

fn apply_options(config: AnalysisConfig, options: &Value) -> AnalysisConfig {
    match serde_json::from_value::<AnalysisOptions>(options.clone()) {
        Ok(options) => config.merged(&options),
        Err(err) => {
            log::warn!("ignoring invalid options {options}: {err}");
            config
        }
    }
}

fn log_rejected(method: &str, outcome: ProtocolResult<AnalysisResult<()>>) {
    match outcome {
        Ok(Ok(())) => {}
        Ok(Err(err)) => log::warn!("{method} rejected: {err}"),
        Err(err) => log::warn!("{method}: {err}"),
    }
}
