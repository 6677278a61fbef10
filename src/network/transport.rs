//! Line Transport
//!
//! The duplex line stream the protocol engine talks through.

use std::io::{BufRead, BufReader, BufWriter, Write};
use std::net::{Shutdown, SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::config::ClientConfig;
use crate::error::{ConnectFailure, DictError, Result};
use crate::protocol::{read_line, write_line};

/// A reliable, ordered stream of text lines
///
/// Implementations strip line terminators on read and append CRLF on write.
pub trait LineTransport: Send {
    /// Next line, or `None` once the peer has closed the stream
    fn read_line(&mut self) -> Result<Option<String>>;

    /// Write one line and flush it
    fn write_line(&mut self, line: &str) -> Result<()>;

    /// Release the underlying connection
    fn shutdown(&mut self) -> Result<()>;
}

impl<T: LineTransport + ?Sized> LineTransport for Box<T> {
    fn read_line(&mut self) -> Result<Option<String>> {
        (**self).read_line()
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        (**self).write_line(line)
    }

    fn shutdown(&mut self) -> Result<()> {
        (**self).shutdown()
    }
}

// =============================================================================
// Generic reader/writer pair
// =============================================================================

/// Line transport over any buffered reader and writer
///
/// Useful on its own for in-memory streams; [`TcpTransport`] wraps one.
pub struct LineChannel<R, W> {
    reader: R,
    writer: W,
}

impl<R: BufRead, W: Write> LineChannel<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn reader(&self) -> &R {
        &self.reader
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R, W> LineTransport for LineChannel<R, W>
where
    R: BufRead + Send,
    W: Write + Send,
{
    fn read_line(&mut self) -> Result<Option<String>> {
        read_line(&mut self.reader)
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        write_line(&mut self.writer, line)
    }

    fn shutdown(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

// =============================================================================
// TCP
// =============================================================================

/// Line transport over a TCP connection
pub struct TcpTransport {
    /// Buffered halves of the same stream
    channel: LineChannel<BufReader<TcpStream>, BufWriter<TcpStream>>,

    /// Peer address for logging
    peer_addr: String,
}

impl TcpTransport {
    /// Connect to the server named by `config`.
    ///
    /// One attempt per resolved address; the first success wins. Failures are
    /// classified into [`ConnectFailure`] reasons.
    pub fn connect(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let addrs: Vec<SocketAddr> = (config.host.as_str(), config.port)
            .to_socket_addrs()
            .map_err(|e| {
                DictError::connection(
                    ConnectFailure::UnresolvedHost,
                    format!("{}:{}: {}", config.host, config.port, e),
                )
            })?
            .collect();

        if addrs.is_empty() {
            return Err(DictError::connection(
                ConnectFailure::UnresolvedHost,
                format!("{}:{}: no addresses found", config.host, config.port),
            ));
        }

        let stream = if config.connect_timeout_ms > 0 {
            connect_with_timeout(&addrs, Duration::from_millis(config.connect_timeout_ms))
        } else {
            TcpStream::connect(&addrs[..])
        }
        .map_err(|e| classify_connect_error(config, e))?;

        let transport = Self::from_stream(stream)?;
        transport.set_timeouts(config.read_timeout_ms, config.write_timeout_ms)?;
        Ok(transport)
    }

    /// Wrap an already connected stream
    pub fn from_stream(stream: TcpStream) -> Result<Self> {
        let peer_addr = stream
            .peer_addr()
            .map(|a| a.to_string())
            .unwrap_or_else(|_| "unknown".to_string());

        // Disable Nagle's algorithm; every command is a single small write
        stream.set_nodelay(true)?;

        let read_stream = stream.try_clone()?;
        let write_stream = stream;

        Ok(Self {
            channel: LineChannel::new(BufReader::new(read_stream), BufWriter::new(write_stream)),
            peer_addr,
        })
    }

    /// Configure read/write timeouts (0 leaves the stream blocking)
    pub fn set_timeouts(&self, read_ms: u64, write_ms: u64) -> Result<()> {
        let read_stream = self.channel.reader().get_ref();
        let write_stream = self.channel.writer().get_ref();

        if read_ms > 0 {
            read_stream.set_read_timeout(Some(Duration::from_millis(read_ms)))?;
        }
        if write_ms > 0 {
            write_stream.set_write_timeout(Some(Duration::from_millis(write_ms)))?;
        }

        Ok(())
    }

    /// Get the peer address string
    pub fn peer_addr(&self) -> &str {
        &self.peer_addr
    }
}

impl LineTransport for TcpTransport {
    fn read_line(&mut self) -> Result<Option<String>> {
        self.channel.read_line()
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        self.channel.write_line(line)
    }

    fn shutdown(&mut self) -> Result<()> {
        let flushed = self.channel.shutdown();
        self.channel.writer().get_ref().shutdown(Shutdown::Both)?;
        flushed
    }
}

fn connect_with_timeout(addrs: &[SocketAddr], timeout: Duration) -> std::io::Result<TcpStream> {
    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect_timeout(addr, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }
    Err(last_err.unwrap_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::AddrNotAvailable, "no addresses to connect to")
    }))
}

fn classify_connect_error(config: &ClientConfig, err: std::io::Error) -> DictError {
    let reason = ConnectFailure::from(err.kind());
    DictError::connection(reason, format!("{}:{}: {}", config.host, config.port, err))
}
