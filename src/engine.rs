//! Reply Engine
//!
//! The one request/reply cycle every command shares.
//!
//! ## Responsibilities
//! - Send the command line
//! - Classify the first status line against a per-command [`StatusTable`]
//! - Feed body lines to a [`ReplyHandler`] up to each `.` terminator
//! - Check the closing `250` status
//!
//! ## Cycle
//! ```text
//!  send ──► status ──┬─ Empty ───────────────────────────► default result
//!                    ├─ Reject ──────────────────────────► DictError::Rejected
//!                    ├─ unknown / missing ───────────────► UnexpectedStatus
//!                    └─ Body ──► lines.. "." (xN) ──► 250 ─► handler result
//! ```

use crate::error::{DictError, ProtocolViolation, Result};
use crate::network::LineTransport;
use crate::protocol::{codes, is_terminator, Command, StatusLine};

// =============================================================================
// Status tables
// =============================================================================

/// What a status code means for a particular command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// A body follows the status line
    Body,

    /// Nothing was found; return an empty result without reading further
    Empty,

    /// A server refusal that fails the call
    Reject,
}

/// Maps the status codes a command may produce to their meaning
///
/// Codes missing from the table are protocol violations.
#[derive(Debug, Clone, Copy)]
pub struct StatusTable {
    entries: &'static [(u16, Disposition)],
}

impl StatusTable {
    pub const fn new(entries: &'static [(u16, Disposition)]) -> Self {
        Self { entries }
    }

    pub fn lookup(&self, code: u16) -> Option<Disposition> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, disposition)| *disposition)
    }
}

// =============================================================================
// Handlers
// =============================================================================

/// Consumes the body of one reply and builds its result
pub trait ReplyHandler {
    /// Result type; `Default` is the benign-empty result
    type Output: Default;

    /// Inspect the body-bearing status line.
    ///
    /// Returns how many `.`-terminated blocks follow it.
    fn begin(&mut self, _status: &StatusLine) -> Result<usize> {
        Ok(1)
    }

    /// Consume one body line (never the terminator)
    fn line(&mut self, line: String) -> Result<()>;

    /// Called after each block's terminator
    fn end_block(&mut self) -> Result<()> {
        Ok(())
    }

    /// Produce the result once the closing status has been verified
    fn finish(self) -> Self::Output;
}

// =============================================================================
// Exchange
// =============================================================================

/// Run one command through the request/reply cycle.
///
/// A benign-empty status returns `H::Output::default()` without touching the
/// stream again. Any failure aborts the whole call; no partial result leaks.
pub fn exchange<T, H>(
    transport: &mut T,
    command: &Command,
    table: &StatusTable,
    mut handler: H,
) -> Result<H::Output>
where
    T: LineTransport + ?Sized,
    H: ReplyHandler,
{
    // Step 1: Send
    let line = command.encode()?;
    tracing::trace!(command = %line, "sending command");
    transport.write_line(&line)?;

    // Step 2: Classify the first status line
    let raw = transport.read_line()?;
    tracing::trace!(verb = command.verb(), status = ?raw, "received status");

    let status = raw
        .as_deref()
        .and_then(StatusLine::parse)
        .ok_or_else(|| ProtocolViolation::UnexpectedStatus { raw: raw.clone() })?;

    match table.lookup(status.code) {
        Some(Disposition::Body) => {}
        Some(Disposition::Empty) => {
            tracing::debug!(verb = command.verb(), code = status.code, "empty result");
            return Ok(H::Output::default());
        }
        Some(Disposition::Reject) => {
            return Err(DictError::Rejected {
                code: status.code,
                message: status.text,
            });
        }
        None => return Err(ProtocolViolation::UnexpectedStatus { raw }.into()),
    }

    // Step 3: Body blocks
    let blocks = handler.begin(&status)?;
    for _ in 0..blocks {
        read_block(transport, &mut handler)?;
        handler.end_block()?;
    }

    // Step 4: Closing status
    expect_completion(transport)?;

    // Step 5: Result
    Ok(handler.finish())
}

/// Feed lines to the handler up to and excluding the next terminator
fn read_block<T, H>(transport: &mut T, handler: &mut H) -> Result<()>
where
    T: LineTransport + ?Sized,
    H: ReplyHandler,
{
    loop {
        match transport.read_line()? {
            Some(line) if is_terminator(&line) => return Ok(()),
            Some(line) => handler.line(line)?,
            None => return Err(ProtocolViolation::PrematureEof.into()),
        }
    }
}

/// Require the closing `250` status line
fn expect_completion<T>(transport: &mut T) -> Result<()>
where
    T: LineTransport + ?Sized,
{
    let raw = transport.read_line()?;
    match raw {
        Some(ref line) if line.starts_with(&codes::OK.to_string()) => Ok(()),
        _ => Err(ProtocolViolation::UnexpectedEnding { raw }.into()),
    }
}
