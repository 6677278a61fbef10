//! Shared test helpers
//!
//! - `ScriptedTransport`: an in-memory transport replaying a canned reply
//! - `FakeServer`: a one-connection DICT server on a loopback port

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Cursor, Write};
use std::net::TcpListener;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use atlasdict::{LineChannel, LineTransport, Result, Session};
use crossbeam::channel::{unbounded, Receiver};
use parking_lot::Mutex;

pub const GREETING: &str = "220 test server ready <auth.mime> <100@test>\r\n";

// =============================================================================
// Scripted transport
// =============================================================================

/// What a `ScriptedTransport` saw, readable after the transport moved away
#[derive(Clone, Default)]
pub struct Probe {
    state: Arc<Mutex<ProbeState>>,
}

#[derive(Default)]
struct ProbeState {
    sent: Vec<String>,
    reads: usize,
    shutdowns: usize,
}

impl Probe {
    /// Lines written by the client, without CRLF
    pub fn sent(&self) -> Vec<String> {
        self.state.lock().sent.clone()
    }

    /// Number of `read_line` calls, including ones that hit end of stream
    pub fn reads(&self) -> usize {
        self.state.lock().reads
    }

    pub fn shutdowns(&self) -> usize {
        self.state.lock().shutdowns
    }
}

/// Replays `script` as the server side of the conversation
pub struct ScriptedTransport {
    channel: LineChannel<Cursor<Vec<u8>>, Vec<u8>>,
    probe: Probe,
    fail_writes: bool,
}

impl ScriptedTransport {
    pub fn new(script: &str) -> (Self, Probe) {
        let probe = Probe::default();
        let transport = Self {
            channel: LineChannel::new(Cursor::new(script.as_bytes().to_vec()), Vec::new()),
            probe: probe.clone(),
            fail_writes: false,
        };
        (transport, probe)
    }

    /// A transport whose writes fail as if the peer had gone away
    pub fn with_broken_writes(script: &str) -> (Self, Probe) {
        let (mut transport, probe) = Self::new(script);
        transport.fail_writes = true;
        (transport, probe)
    }
}

impl LineTransport for ScriptedTransport {
    fn read_line(&mut self) -> Result<Option<String>> {
        self.probe.state.lock().reads += 1;
        self.channel.read_line()
    }

    fn write_line(&mut self, line: &str) -> Result<()> {
        if self.fail_writes {
            return Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "peer gone").into());
        }
        self.probe.state.lock().sent.push(line.to_string());
        self.channel.write_line(line)
    }

    fn shutdown(&mut self) -> Result<()> {
        self.probe.state.lock().shutdowns += 1;
        Ok(())
    }
}

/// A greeted session whose server will answer with `reply`
pub fn session_with(reply: &str) -> (Session<ScriptedTransport>, Probe) {
    let (transport, probe) = ScriptedTransport::new(&format!("{}{}", GREETING, reply));
    let session = Session::handshake(transport).expect("handshake");
    (session, probe)
}

// =============================================================================
// Fake TCP server
// =============================================================================

/// Loopback DICT server accepting a single connection
pub struct FakeServer {
    pub port: u16,

    /// Every command line received, in order
    pub commands: Receiver<String>,

    handle: Option<JoinHandle<()>>,
}

impl FakeServer {
    /// Start a server that greets with `greeting` and answers each command
    /// with `respond(command)`; `QUIT` gets `221 bye` and ends the session.
    pub fn start<F>(greeting: &'static str, respond: F) -> Self
    where
        F: Fn(&str) -> String + Send + 'static,
    {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().expect("local addr").port();
        let (tx, rx) = unbounded();

        let handle = thread::spawn(move || {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
            let mut writer = stream;
            if writer.write_all(greeting.as_bytes()).is_err() {
                return;
            }

            let mut line = String::new();
            loop {
                line.clear();
                match reader.read_line(&mut line) {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {}
                }
                let command = line.trim_end_matches(['\r', '\n']).to_string();
                let _ = tx.send(command.clone());

                if command == "QUIT" {
                    let _ = writer.write_all(b"221 bye\r\n");
                    break;
                }
                if writer.write_all(respond(&command).as_bytes()).is_err() {
                    break;
                }
            }
        });

        Self {
            port,
            commands: rx,
            handle: Some(handle),
        }
    }

    /// Wait for the connection to finish and return every command received
    pub fn finish(mut self) -> Vec<String> {
        if let Some(handle) = self.handle.take() {
            handle.join().expect("server thread");
        }
        self.commands.try_iter().collect()
    }
}
