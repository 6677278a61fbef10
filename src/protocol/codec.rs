//! Protocol codec
//!
//! Line framing and the small field grammars shared by the reply parsers.
//!
//! ## Line Framing
//! ```text
//! outgoing:  <text>\r\n
//! incoming:  <text>\r\n   or   <text>\n
//! ```
//!
//! End of stream is reported as `None`, which is never confused with an
//! empty line (`Some("")`).

use std::io::{BufRead, Read, Write};

use crate::error::{ProtocolViolation, Result};

/// Line that terminates a multi-line body
pub const TERMINATOR: &str = ".";

/// Longest incoming line accepted (1 MiB)
pub const MAX_LINE_LENGTH: usize = 1024 * 1024;

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read one line from a stream, stripping the trailing CRLF or LF.
///
/// Returns `Ok(None)` when the peer has closed the stream and no bytes are
/// pending. A final unterminated line is still returned.
pub fn read_line<R: BufRead>(reader: &mut R) -> Result<Option<String>> {
    let mut buf = Vec::new();
    let limit = (MAX_LINE_LENGTH + 2) as u64;
    let read = reader.by_ref().take(limit).read_until(b'\n', &mut buf)?;

    if read == 0 {
        return Ok(None);
    }

    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    } else if read as u64 == limit {
        return Err(ProtocolViolation::LineTooLong {
            limit: MAX_LINE_LENGTH,
        }
        .into());
    }

    if buf.len() > MAX_LINE_LENGTH {
        return Err(ProtocolViolation::LineTooLong {
            limit: MAX_LINE_LENGTH,
        }
        .into());
    }

    Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
}

/// Write one line followed by CRLF and flush immediately
pub fn write_line<W: Write>(writer: &mut W, line: &str) -> Result<()> {
    writer.write_all(line.as_bytes())?;
    writer.write_all(b"\r\n")?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Field grammars
// =============================================================================

/// Whether a line is the body terminator (exactly `.`)
pub fn is_terminator(line: &str) -> bool {
    line == TERMINATOR
}

/// Remove every `"` character.
///
/// This is not quote-aware unescaping; a description containing an escaped
/// quote loses it.
pub fn strip_quotes(field: &str) -> String {
    field.chars().filter(|&c| c != '"').collect()
}

/// Split a `<identifier> "<text>"` line on its first space.
///
/// Returns the identifier and the remainder with quotes stripped, or `None`
/// when the line has no space at all.
pub fn split_record(line: &str) -> Option<(&str, String)> {
    let (identifier, rest) = line.split_once(' ')?;
    Some((identifier, strip_quotes(rest)))
}

/// Split text into whitespace-separated tokens, honouring double quotes.
///
/// A quoted token may contain spaces; inside quotes a backslash escapes the
/// next character. An unterminated quote runs to the end of the text.
pub fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = text.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }
        let Some(&first) = chars.peek() else {
            break;
        };

        let mut token = String::new();
        if first == '"' {
            chars.next();
            while let Some(c) = chars.next() {
                match c {
                    '"' => break,
                    '\\' => {
                        if let Some(escaped) = chars.next() {
                            token.push(escaped);
                        }
                    }
                    _ => token.push(c),
                }
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_whitespace() {
                    break;
                }
                token.push(c);
                chars.next();
            }
        }
        tokens.push(token);
    }

    tokens
}
