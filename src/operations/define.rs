//! DEFINE reply grammar
//!
//! ```text
//! 150 <n> definitions retrieved
//! 151 <word> <database> <description>   ┐
//! body line                              │ repeated n times
//! .                                      ┘
//! 250 ok
//! ```
//!
//! A body line that is a lone `.` cannot be told apart from the record
//! terminator; well-formed servers never send one.

use crate::engine::{Disposition, ReplyHandler, StatusTable};
use crate::error::{ProtocolViolation, Result};
use crate::model::Definition;
use crate::protocol::{codes, tokenize, StatusLine};

pub const DEFINE_STATUS: StatusTable = StatusTable::new(&[
    (codes::DEFINITIONS_FOLLOW, Disposition::Body),
    (codes::INVALID_DATABASE, Disposition::Empty),
    (codes::NO_MATCH, Disposition::Empty),
]);

/// Collects the definition records of one DEFINE reply
pub struct DefineHandler {
    /// Word the caller asked about; becomes every definition's headword
    word: String,

    /// Record being filled, `None` until its 151 header arrives
    current: Option<Definition>,

    definitions: Vec<Definition>,
}

impl DefineHandler {
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            current: None,
            definitions: Vec::new(),
        }
    }

    fn start_record(&self, line: &str) -> Result<Definition> {
        let malformed = || ProtocolViolation::MalformedRecord(line.to_string());

        let header = StatusLine::parse(line)
            .filter(|status| status.is(codes::DEFINITION))
            .ok_or_else(malformed)?;

        // <word> <database> <description>
        let database = tokenize(&header.text)
            .into_iter()
            .nth(1)
            .ok_or_else(malformed)?;

        Ok(Definition::new(self.word.clone(), database))
    }
}

impl ReplyHandler for DefineHandler {
    type Output = Vec<Definition>;

    fn begin(&mut self, status: &StatusLine) -> Result<usize> {
        let count = status
            .text
            .split_whitespace()
            .next()
            .and_then(|n| n.parse::<usize>().ok())
            .ok_or_else(|| ProtocolViolation::UnexpectedStatus {
                raw: Some(format!("{} {}", status.code, status.text)),
            })?;

        self.definitions.reserve(count.min(64));
        Ok(count)
    }

    fn line(&mut self, line: String) -> Result<()> {
        if let Some(definition) = self.current.as_mut() {
            definition.push_line(line);
            return Ok(());
        }

        let record = self.start_record(&line)?;
        self.current = Some(record);
        Ok(())
    }

    fn end_block(&mut self) -> Result<()> {
        // A record needs at least its header line
        let definition = self
            .current
            .take()
            .ok_or_else(|| ProtocolViolation::MalformedRecord(".".to_string()))?;
        self.definitions.push(definition);
        Ok(())
    }

    fn finish(self) -> Self::Output {
        self.definitions
    }
}
