//! Command definitions
//!
//! Represents the commands a client sends and renders them to wire text.

use crate::error::{DictError, Result};

/// Longest command line a server must accept, CRLF included (RFC 2229 §2.2)
pub const MAX_COMMAND_LENGTH: usize = 1024;

/// A client command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Look up definitions of a word
    Define { database: String, word: String },

    /// Look up headwords matching a word under a strategy
    Match {
        database: String,
        strategy: String,
        word: String,
    },

    /// List the databases the server offers
    ShowDatabases,

    /// List the matching strategies the server offers
    ShowStrategies,

    /// Fetch the description of one database
    ShowInfo { database: String },

    /// End the session
    Quit,
}

impl Command {
    pub fn define(database: impl Into<String>, word: impl Into<String>) -> Self {
        Command::Define {
            database: database.into(),
            word: word.into(),
        }
    }

    pub fn matching(
        database: impl Into<String>,
        strategy: impl Into<String>,
        word: impl Into<String>,
    ) -> Self {
        Command::Match {
            database: database.into(),
            strategy: strategy.into(),
            word: word.into(),
        }
    }

    pub fn show_info(database: impl Into<String>) -> Self {
        Command::ShowInfo {
            database: database.into(),
        }
    }

    /// The command verb, for logging
    pub fn verb(&self) -> &'static str {
        match self {
            Command::Define { .. } => "DEFINE",
            Command::Match { .. } => "MATCH",
            Command::ShowDatabases => "SHOW DB",
            Command::ShowStrategies => "SHOW STRAT",
            Command::ShowInfo { .. } => "SHOW INFO",
            Command::Quit => "QUIT",
        }
    }

    /// Render the command line, without the trailing CRLF.
    ///
    /// Arguments containing whitespace or quote characters are wrapped in
    /// double quotes. Empty arguments, arguments containing CR/LF, and lines
    /// longer than [`MAX_COMMAND_LENGTH`] are rejected.
    pub fn encode(&self) -> Result<String> {
        let args: Vec<&str> = match self {
            Command::Define { database, word } => vec![database.as_str(), word.as_str()],
            Command::Match {
                database,
                strategy,
                word,
            } => vec![database.as_str(), strategy.as_str(), word.as_str()],
            Command::ShowInfo { database } => vec![database.as_str()],
            Command::ShowDatabases | Command::ShowStrategies | Command::Quit => Vec::new(),
        };

        let mut line = self.verb().to_string();
        for arg in args {
            line.push(' ');
            line.push_str(&encode_argument(arg)?);
        }

        if line.len() + 2 > MAX_COMMAND_LENGTH {
            return Err(DictError::InvalidArgument(format!(
                "{} command is {} bytes (max {})",
                self.verb(),
                line.len() + 2,
                MAX_COMMAND_LENGTH
            )));
        }

        Ok(line)
    }
}

/// Quote an argument if it would not survive as a bare atom
fn encode_argument(arg: &str) -> Result<String> {
    if arg.is_empty() {
        return Err(DictError::InvalidArgument(
            "empty command argument".to_string(),
        ));
    }
    if arg.contains(['\r', '\n']) {
        return Err(DictError::InvalidArgument(format!(
            "argument {:?} contains a line break",
            arg
        )));
    }

    let needs_quotes = arg
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, '"' | '\'' | '\\'));
    if !needs_quotes {
        return Ok(arg.to_string());
    }

    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for c in arg.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    Ok(quoted)
}
