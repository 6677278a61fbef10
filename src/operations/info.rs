//! SHOW INFO reply grammar
//!
//! The body is free text; every line is kept and newline-terminated.

use crate::engine::{Disposition, ReplyHandler, StatusTable};
use crate::error::Result;
use crate::protocol::codes;

/// An unknown database is a hard failure here, since the caller named it
pub const SHOW_INFO_STATUS: StatusTable = StatusTable::new(&[
    (codes::INFO_FOLLOWS, Disposition::Body),
    (codes::INVALID_DATABASE, Disposition::Reject),
]);

#[derive(Default)]
pub struct InfoHandler {
    text: String,
}

impl InfoHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReplyHandler for InfoHandler {
    type Output = String;

    fn line(&mut self, line: String) -> Result<()> {
        self.text.push_str(&line);
        self.text.push('\n');
        Ok(())
    }

    fn finish(self) -> Self::Output {
        self.text
    }
}
