//! Network Module
//!
//! Line transports and the client session built on them.
//!
//! ## Architecture
//! - `LineTransport`: read/write/shutdown of CRLF-framed lines
//! - `TcpTransport`: the transport used against real servers
//! - `Session`: greeting handshake, one command at a time, QUIT on close

mod transport;
mod session;

pub use transport::{LineChannel, LineTransport, TcpTransport};
pub use session::Session;
