#![warn(missing_docs)]
//! `blueprint-lsp` - Language Server Protocol adapter for `blueprint-analysis`.
//!
//! The crate is thin glue: [`transport`] frames JSON-RPC messages over any byte stream,
//! [`protocol`] converts between LSP JSON and analysis types, and [`Server`] dispatches
//! messages to an [`blueprint_analysis::AnalysisHost`] in arrival order.
//!
//! ```rust
//! use blueprint_lsp::Server;
//! use serde_json::json;
//!
//! let mut server = Server::new(Vec::new());
//! server
//!     .handle_message(&json!({"jsonrpc": "2.0", "id": 1, "method": "initialize", "params": {}}))
//!     .unwrap();
//! assert!(String::from_utf8(server.into_writer()).unwrap().contains("completionProvider"));
//! ```

mod error;
pub mod protocol;
pub mod server;
pub mod transport;

pub use error::{ProtocolError, ProtocolResult};
pub use server::{Server, ServerState};
pub use transport::{read_message, write_message};
