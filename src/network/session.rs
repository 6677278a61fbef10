//! Client Session
//!
//! One greeted connection to a DICT server and the commands it can run.

use std::collections::BTreeMap;

use parking_lot::Mutex;

use crate::config::{ClientConfig, DEFAULT_PORT};
use crate::engine::exchange;
use crate::error::{DictError, ProtocolViolation, Result};
use crate::model::{Database, Definition, MatchEntry, Matches, MatchingStrategy};
use crate::operations::{
    DatabaseListHandler, DefineHandler, InfoHandler, MatchEntryHandler, MatchHandler,
    StrategyListHandler, DEFINE_STATUS, MATCH_STATUS, SHOW_DB_STATUS, SHOW_INFO_STATUS,
    SHOW_STRAT_STATUS,
};
use crate::protocol::{codes, Command, StatusLine};

use super::transport::{LineTransport, TcpTransport};

/// A live session with a DICT server
///
/// ## Concurrency Model
///
/// The protocol has no request identifiers, so a session runs one command at
/// a time. Every operation holds `transport` for its whole send-then-read
/// cycle; callers on other threads wait their turn.
///
/// After `close()` the transport is gone and every command fails with
/// [`DictError::SessionClosed`]. After a fatal error (see
/// [`DictError::is_fatal`]) the session stays open but should not be reused.
pub struct Session<T: LineTransport = TcpTransport> {
    /// `None` once closed
    transport: Mutex<Option<T>>,

    /// Greeting line sent by the server
    banner: String,
}

impl Session<TcpTransport> {
    /// Connect to `host:port` and perform the greeting handshake
    pub fn open(host: &str, port: u16) -> Result<Self> {
        let config = ClientConfig::builder().host(host).port(port).build();
        Self::open_with_config(&config)
    }

    /// Connect to `host` on the default DICT port (2628)
    pub fn open_default(host: &str) -> Result<Self> {
        Self::open(host, DEFAULT_PORT)
    }

    /// Connect using a full client configuration
    pub fn open_with_config(config: &ClientConfig) -> Result<Self> {
        let transport = TcpTransport::connect(config)?;
        tracing::debug!("Connection established to {}", transport.peer_addr());
        Self::handshake(transport)
    }
}

impl<T: LineTransport> Session<T> {
    /// Read and check the server greeting on an already connected transport.
    ///
    /// The greeting must be a `220` status line. On failure the transport is
    /// shut down before the error is returned.
    pub fn handshake(mut transport: T) -> Result<Self> {
        let greeting = match transport.read_line() {
            Ok(line) => line,
            Err(e) => {
                let _ = transport.shutdown();
                return Err(e);
            }
        };

        let accepted = greeting
            .as_deref()
            .and_then(StatusLine::parse)
            .is_some_and(|status| status.is(codes::GREETING));

        match greeting {
            Some(banner) if accepted => {
                tracing::debug!("Server greeting: {}", banner);
                Ok(Self {
                    transport: Mutex::new(Some(transport)),
                    banner,
                })
            }
            raw => {
                let _ = transport.shutdown();
                Err(ProtocolViolation::UnexpectedGreeting { raw }.into())
            }
        }
    }

    /// The server's greeting line
    pub fn banner(&self) -> &str {
        &self.banner
    }

    /// Whether `close()` has run
    pub fn is_closed(&self) -> bool {
        self.transport.lock().is_none()
    }

    // =========================================================================
    // Raw line access
    // =========================================================================

    /// Send one raw line (CRLF appended, flushed immediately)
    pub fn send_line(&self, text: &str) -> Result<()> {
        self.with_transport(|transport| transport.write_line(text))
    }

    /// Read one raw line; `None` when the server closed the connection
    pub fn read_line(&self) -> Result<Option<String>> {
        self.with_transport(|transport| transport.read_line())
    }

    // =========================================================================
    // Commands
    // =========================================================================

    /// All definitions of `word` in `database`.
    ///
    /// `database` may be a name, [`Database::ALL`] or
    /// [`Database::FIRST_MATCH`]. An unknown database or a word without
    /// definitions yields an empty list.
    pub fn define(&self, word: &str, database: impl AsRef<str>) -> Result<Vec<Definition>> {
        let command = Command::define(database.as_ref(), word);
        self.run(&command, |transport| {
            exchange(transport, &command, &DEFINE_STATUS, DefineHandler::new(word))
        })
    }

    /// Headwords matching `word` under `strategy` in `database`.
    ///
    /// Unknown databases or strategies, and no matches, yield an empty set.
    pub fn match_words(
        &self,
        word: &str,
        strategy: impl AsRef<str>,
        database: impl AsRef<str>,
    ) -> Result<Matches> {
        let command = Command::matching(database.as_ref(), strategy.as_ref(), word);
        self.run(&command, |transport| {
            exchange(transport, &command, &MATCH_STATUS, MatchHandler::new())
        })
    }

    /// Like [`Session::match_words`] but keeps the database of each match
    pub fn match_entries(
        &self,
        word: &str,
        strategy: impl AsRef<str>,
        database: impl AsRef<str>,
    ) -> Result<Vec<MatchEntry>> {
        let command = Command::matching(database.as_ref(), strategy.as_ref(), word);
        self.run(&command, |transport| {
            exchange(transport, &command, &MATCH_STATUS, MatchEntryHandler::new())
        })
    }

    /// Databases offered by the server, keyed by name
    pub fn list_databases(&self) -> Result<BTreeMap<String, Database>> {
        let command = Command::ShowDatabases;
        self.run(&command, |transport| {
            exchange(transport, &command, &SHOW_DB_STATUS, DatabaseListHandler::new())
        })
    }

    /// Matching strategies offered by the server, in server order
    pub fn list_strategies(&self) -> Result<Vec<MatchingStrategy>> {
        let command = Command::ShowStrategies;
        self.run(&command, |transport| {
            exchange(transport, &command, &SHOW_STRAT_STATUS, StrategyListHandler::new())
        })
    }

    /// Free-text description of one database.
    ///
    /// Unlike the other commands, an unknown database is an error
    /// ([`DictError::Rejected`] with code 550).
    pub fn database_info(&self, database: impl AsRef<str>) -> Result<String> {
        let command = Command::show_info(database.as_ref());
        self.run(&command, |transport| {
            exchange(transport, &command, &SHOW_INFO_STATUS, InfoHandler::new())
        })
    }

    // =========================================================================
    // Teardown
    // =========================================================================

    /// Send `QUIT` and release the connection.
    ///
    /// Never fails: teardown errors are logged and dropped. Closing twice is a
    /// no-op.
    pub fn close(&self) {
        let Some(mut transport) = self.transport.lock().take() else {
            return;
        };

        match quit(&mut transport) {
            Ok(Some(reply)) if StatusLine::parse(&reply).is_some_and(|s| s.is(codes::BYE)) => {
                tracing::debug!("QUIT acknowledged: {}", reply)
            }
            Ok(reply) => tracing::debug!("Unexpected QUIT reply: {:?}", reply),
            Err(e) => tracing::debug!("QUIT failed during close: {}", e),
        }
        if let Err(e) = transport.shutdown() {
            tracing::debug!("Shutdown failed during close: {}", e);
        }
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn with_transport<R>(&self, f: impl FnOnce(&mut T) -> Result<R>) -> Result<R> {
        let mut guard = self.transport.lock();
        let transport = guard.as_mut().ok_or(DictError::SessionClosed)?;
        f(transport)
    }

    fn run<R>(&self, command: &Command, f: impl FnOnce(&mut T) -> Result<R>) -> Result<R> {
        let result = self.with_transport(f);
        if let Err(ref e) = result {
            if e.is_fatal() {
                tracing::warn!("{} failed, session is no longer usable: {}", command.verb(), e);
            } else {
                tracing::debug!("{} failed: {}", command.verb(), e);
            }
        }
        result
    }
}

impl<T: LineTransport> Drop for Session<T> {
    fn drop(&mut self) {
        self.close();
    }
}

fn quit<T: LineTransport>(transport: &mut T) -> Result<Option<String>> {
    transport.write_line(&Command::Quit.encode()?)?;
    transport.read_line()
}
