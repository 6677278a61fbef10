//! List reply grammars
//!
//! MATCH, SHOW DB and SHOW STRAT bodies share one line shape:
//!
//! ```text
//! <identifier> "<text>"
//! ```
//!
//! Each line is split on its first space and the remainder has its quotes
//! stripped. Lines without a space are skipped.

use std::collections::{BTreeMap, HashSet};

use crate::engine::{Disposition, ReplyHandler, StatusTable};
use crate::error::Result;
use crate::model::{Database, MatchEntry, Matches, MatchingStrategy};
use crate::protocol::{codes, split_record};

pub const MATCH_STATUS: StatusTable = StatusTable::new(&[
    (codes::MATCHES_FOLLOW, Disposition::Body),
    (codes::INVALID_DATABASE, Disposition::Empty),
    (codes::INVALID_STRATEGY, Disposition::Empty),
    (codes::NO_MATCH, Disposition::Empty),
]);

pub const SHOW_DB_STATUS: StatusTable = StatusTable::new(&[
    (codes::DATABASES_FOLLOW, Disposition::Body),
    (codes::NO_DATABASES, Disposition::Empty),
]);

pub const SHOW_STRAT_STATUS: StatusTable = StatusTable::new(&[
    (codes::STRATEGIES_FOLLOW, Disposition::Body),
    (codes::NO_STRATEGIES, Disposition::Empty),
]);

// =============================================================================
// MATCH
// =============================================================================

/// Collects matched words, discarding the database column
#[derive(Default)]
pub struct MatchHandler {
    matches: Matches,
}

impl MatchHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReplyHandler for MatchHandler {
    type Output = Matches;

    fn line(&mut self, line: String) -> Result<()> {
        if let Some((_database, word)) = split_record(&line) {
            self.matches.insert(word);
        }
        Ok(())
    }

    fn finish(self) -> Self::Output {
        self.matches
    }
}

/// Collects `(database, word)` pairs, deduplicated, in wire order
#[derive(Default)]
pub struct MatchEntryHandler {
    entries: Vec<MatchEntry>,
    seen: HashSet<MatchEntry>,
}

impl MatchEntryHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReplyHandler for MatchEntryHandler {
    type Output = Vec<MatchEntry>;

    fn line(&mut self, line: String) -> Result<()> {
        if let Some((database, word)) = split_record(&line) {
            let entry = MatchEntry {
                database: database.to_string(),
                word,
            };
            if self.seen.insert(entry.clone()) {
                self.entries.push(entry);
            }
        }
        Ok(())
    }

    fn finish(self) -> Self::Output {
        self.entries
    }
}

// =============================================================================
// SHOW DB
// =============================================================================

/// Builds the database map; a repeated name replaces the earlier entry
#[derive(Default)]
pub struct DatabaseListHandler {
    databases: BTreeMap<String, Database>,
}

impl DatabaseListHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReplyHandler for DatabaseListHandler {
    type Output = BTreeMap<String, Database>;

    fn line(&mut self, line: String) -> Result<()> {
        if let Some((name, description)) = split_record(&line) {
            self.databases
                .insert(name.to_string(), Database::new(name, description));
        }
        Ok(())
    }

    fn finish(self) -> Self::Output {
        self.databases
    }
}

// =============================================================================
// SHOW STRAT
// =============================================================================

/// Builds the strategy list in wire order, dropping exact duplicates
#[derive(Default)]
pub struct StrategyListHandler {
    strategies: Vec<MatchingStrategy>,
    seen: HashSet<MatchingStrategy>,
}

impl StrategyListHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ReplyHandler for StrategyListHandler {
    type Output = Vec<MatchingStrategy>;

    fn line(&mut self, line: String) -> Result<()> {
        if let Some((name, description)) = split_record(&line) {
            let strategy = MatchingStrategy::new(name, description);
            if self.seen.insert(strategy.clone()) {
                self.strategies.push(strategy);
            }
        }
        Ok(())
    }

    fn finish(self) -> Self::Output {
        self.strategies
    }
}
