//! Protocol Module
//!
//! Defines the DICT wire protocol (RFC 2229) as seen from a client.
//!
//! ## Protocol Format (text, line oriented)
//!
//! ### Request Format
//! ```text
//! <VERB> <arg> <arg> ...\r\n
//! ```
//!
//! ### Commands
//! - `DEFINE <database> <word>`
//! - `MATCH <database> <strategy> <word>`
//! - `SHOW DB`
//! - `SHOW STRAT`
//! - `SHOW INFO <database>`
//! - `QUIT`
//!
//! ### Reply Format
//! ```text
//! ┌─────────────────────────┐
//! │ <code> <text>           │  status line
//! ├─────────────────────────┤
//! │ body line               │  only for body-bearing codes
//! │ ...                     │
//! │ .                       │  terminator
//! ├─────────────────────────┤
//! │ 250 <text>              │  closing status
//! └─────────────────────────┘
//! ```
//!
//! ### Status Codes
//! - 1xx: body follows (110, 111, 112, 150, 151, 152)
//! - 2xx: completion (220 greeting, 221 bye, 250 ok)
//! - 5xx: refusals (550 bad database, 551 bad strategy, 552 no match,
//!   554 no databases, 555 no strategies)

mod command;
mod status;
mod codec;

pub use command::{Command, MAX_COMMAND_LENGTH};
pub use status::{codes, StatusLine};
pub use codec::{
    is_terminator, read_line, split_record, strip_quotes, tokenize, write_line,
    MAX_LINE_LENGTH, TERMINATOR,
};
