//! # AtlasDict
//!
//! A synchronous client for DICT dictionary servers (RFC 2229) with:
//! - Greeting handshake and best-effort `QUIT` teardown
//! - One shared request/reply engine for every command
//! - Typed results for definitions, matches, databases, strategies and info
//! - "Nothing found" replies returned as empty results, not errors
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Session                              │
//! │     define / match_words / list_databases / ... / close      │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  one command at a time (Mutex)
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                     Reply Engine                             │
//! │      send → status → body lines .. "." → 250                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ Operations  │          │  Transport  │
//!   │ (grammars)  │          │ (CRLF lines)│
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │     TCP     │
//!                           └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use atlasdict::{Database, Session};
//!
//! let session = Session::open_default("dict.org")?;
//! for definition in session.define("parrot", Database::ALL)? {
//!     println!("{}: {}", definition.source_database(), definition.text());
//! }
//! session.close();
//! # Ok::<(), atlasdict::DictError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod model;
pub mod protocol;
pub mod network;
pub mod engine;
pub mod operations;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ConnectFailure, DictError, ProtocolViolation, Result};
pub use config::{ClientConfig, DEFAULT_PORT};
pub use model::{Database, Definition, MatchEntry, Matches, MatchingStrategy};
pub use network::{LineChannel, LineTransport, Session, TcpTransport};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of AtlasDict
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
