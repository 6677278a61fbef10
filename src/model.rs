//! Reply value types
//!
//! Plain values produced by the command operations. None of them outlive
//! the call that built them except by being handed to the caller.

use std::collections::HashSet;

use serde::Serialize;

// =============================================================================
// Descriptors
// =============================================================================

/// A dictionary database offered by the server
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Database {
    name: String,
    description: String,
}

impl Database {
    /// Query every database
    pub const ALL: &'static str = "*";

    /// Query databases in order, stopping at the first one with a hit
    pub const FIRST_MATCH: &'static str = "!";

    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl AsRef<str> for Database {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

/// A word matching strategy offered by the server
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MatchingStrategy {
    name: String,
    description: String,
}

impl MatchingStrategy {
    /// The server's default strategy
    pub const DEFAULT: &'static str = ".";

    pub const EXACT: &'static str = "exact";

    pub const PREFIX: &'static str = "prefix";

    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

impl AsRef<str> for MatchingStrategy {
    fn as_ref(&self) -> &str {
        &self.name
    }
}

// =============================================================================
// Definitions
// =============================================================================

/// One definition of a headword, taken from a single database
///
/// Two definitions may share a headword; they are told apart by
/// `source_database`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Definition {
    headword: String,
    source_database: String,
    body: Vec<String>,
}

impl Definition {
    pub fn new(headword: impl Into<String>, source_database: impl Into<String>) -> Self {
        Self {
            headword: headword.into(),
            source_database: source_database.into(),
            body: Vec::new(),
        }
    }

    pub(crate) fn push_line(&mut self, line: String) {
        self.body.push(line);
    }

    pub fn headword(&self) -> &str {
        &self.headword
    }

    pub fn source_database(&self) -> &str {
        &self.source_database
    }

    /// Body lines exactly as received
    pub fn body(&self) -> &[String] {
        &self.body
    }

    /// Body joined with `\n`
    pub fn text(&self) -> String {
        self.body.join("\n")
    }
}

// =============================================================================
// Matches
// =============================================================================

/// A matched word together with the database that reported it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct MatchEntry {
    pub database: String,
    pub word: String,
}

/// Insertion-ordered, deduplicated set of matched headwords
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Matches {
    words: Vec<String>,

    #[serde(skip)]
    seen: HashSet<String>,
}

impl Matches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a word, returning false if it was already present
    pub fn insert(&mut self, word: impl Into<String>) -> bool {
        let word = word.into();
        if self.seen.contains(&word) {
            return false;
        }
        self.seen.insert(word.clone());
        self.words.push(word);
        true
    }

    pub fn contains(&self, word: &str) -> bool {
        self.seen.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterate in first-seen order
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.words.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.words
    }

    pub fn into_vec(self) -> Vec<String> {
        self.words
    }
}

impl<'a> IntoIterator for &'a Matches {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}

impl IntoIterator for Matches {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.into_iter()
    }
}

impl<S: Into<String>> FromIterator<S> for Matches {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut matches = Matches::new();
        for word in iter {
            matches.insert(word);
        }
        matches
    }
}
