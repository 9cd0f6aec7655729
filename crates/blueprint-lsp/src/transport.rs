//! JSON-RPC/LSP stdio framing.
//!
//! Messages are JSON values framed by HTTP-like headers:
//!
//! ```text
//! Content-Length: <n>\r\n
//! \r\n
//! <n bytes of UTF-8 JSON>
//! ```

use crate::error::{ProtocolError, ProtocolResult};
use serde_json::Value;
use std::io::{BufRead, Write};

/// Largest accepted message body, in bytes.
pub const MAX_CONTENT_LENGTH: usize = 64 * 1024 * 1024;

/// Write a single framed message to `writer` and flush it.
pub fn write_message<W: Write>(writer: &mut W, value: &Value) -> ProtocolResult<()> {
    let body = serde_json::to_vec(value)?;

    write!(writer, "Content-Length: {}\r\n\r\n", body.len())?;
    writer.write_all(&body)?;
    writer.flush()?;
    Ok(())
}

/// Read a single framed message from `reader`.
///
/// Returns `Ok(None)` on clean EOF before any header line.
pub fn read_message<R: BufRead>(reader: &mut R) -> ProtocolResult<Option<Value>> {
    let mut content_length: Option<usize> = None;
    let mut line = String::new();

    loop {
        line.clear();
        let read = reader.read_line(&mut line)?;
        if read == 0 {
            return Ok(None);
        }

        let trimmed = line.trim_end_matches(['\r', '\n']);
        if trimmed.is_empty() {
            break;
        }

        // Other headers (Content-Type) are accepted and ignored.
        if let Some((name, rest)) = trimmed.split_once(':')
            && name.trim().eq_ignore_ascii_case("Content-Length")
        {
            content_length = rest.trim().parse::<usize>().ok();
        }
    }

    let len = content_length.ok_or(ProtocolError::MissingContentLength)?;
    if len > MAX_CONTENT_LENGTH {
        return Err(ProtocolError::MessageTooLarge(len));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body)?;

    Ok(Some(serde_json::from_slice(&body)?))
}
