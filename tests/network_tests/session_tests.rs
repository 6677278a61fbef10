//! Session Tests
//!
//! Handshake, command serialisation and teardown over a scripted transport.

#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;
use std::thread;

use atlasdict::{Database, DictError, MatchingStrategy, ProtocolViolation, Session};
use common::{session_with, ScriptedTransport, GREETING};

// =============================================================================
// Handshake Tests
// =============================================================================

#[test]
fn test_handshake_accepts_220() {
    let (transport, probe) = ScriptedTransport::new(GREETING);
    let session = Session::handshake(transport).unwrap();

    assert!(session.banner().starts_with("220 test server ready"));
    assert!(!session.is_closed());
    assert_eq!(probe.reads(), 1);
    assert!(probe.sent().is_empty());
}

#[test]
fn test_handshake_rejects_other_status() {
    let (transport, probe) = ScriptedTransport::new("530 access denied\r\n");
    let err = Session::handshake(transport).err().unwrap();

    match err {
        DictError::Protocol(ProtocolViolation::UnexpectedGreeting { raw }) => {
            assert_eq!(raw.as_deref(), Some("530 access denied"))
        }
        other => panic!("Expected UnexpectedGreeting, got {:?}", other),
    }
    assert_eq!(probe.shutdowns(), 1);
}

#[test]
fn test_handshake_rejects_missing_greeting() {
    let (transport, _probe) = ScriptedTransport::new("");
    let err = Session::handshake(transport).err().unwrap();
    assert!(matches!(
        err,
        DictError::Protocol(ProtocolViolation::UnexpectedGreeting { raw: None })
    ));
}

#[test]
fn test_handshake_rejects_garbage() {
    let (transport, _probe) = ScriptedTransport::new("SSH-2.0-OpenSSH_9.6\r\n");
    assert!(Session::handshake(transport).is_err());
}

// =============================================================================
// End-to-end Scenarios
// =============================================================================

#[test]
fn test_define_scenario() {
    let (session, probe) = session_with(
        "150 1 definitions found\r\n\
         151 hello dbA \"Database A\"\r\n\
         line one\r\n\
         line two\r\n\
         .\r\n\
         250 ok\r\n",
    );

    let defs = session.define("hello", Database::ALL).unwrap();
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].headword(), "hello");
    assert_eq!(defs[0].source_database(), "dbA");
    assert_eq!(defs[0].body(), ["line one", "line two"]);
    assert_eq!(probe.sent(), vec!["DEFINE * hello"]);
}

#[test]
fn test_define_no_match_scenario() {
    let (session, probe) = session_with("552 no match\r\n");

    let defs = session.define("zzyzx", Database::ALL).unwrap();
    assert!(defs.is_empty());
    // greeting + status, nothing else
    assert_eq!(probe.reads(), 2);
}

#[test]
fn test_show_db_scenario() {
    let (session, probe) = session_with(
        "110 2 databases present\r\n\
         dbA \"Database A\"\r\n\
         dbB \"Database B\"\r\n\
         .\r\n\
         250 ok\r\n",
    );

    let dbs = session.list_databases().unwrap();
    let names: Vec<&str> = dbs.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["dbA", "dbB"]);
    assert_eq!(dbs["dbA"].description(), "Database A");
    assert_eq!(dbs["dbB"].description(), "Database B");
    assert_eq!(probe.sent(), vec!["SHOW DB"]);
}

#[test]
fn test_match_scenario() {
    let (session, probe) = session_with(
        "152 2 matches found\r\n\
         dbA \"foo\"\r\n\
         dbA \"foobar\"\r\n\
         .\r\n\
         250 ok\r\n",
    );

    let matches = session
        .match_words("foo", MatchingStrategy::EXACT, Database::ALL)
        .unwrap();
    assert_eq!(matches.into_vec(), vec!["foo", "foobar"]);
    assert_eq!(probe.sent(), vec!["MATCH * exact foo"]);
}

#[test]
fn test_descriptors_as_arguments() {
    let (session, probe) = session_with(
        "152 1 matches found\r\nwn \"parrot\"\r\n.\r\n250 ok\r\n\
         112 information follows\r\nabout wn\r\n.\r\n250 ok\r\n",
    );
    let wn = Database::new("wn", "WordNet");
    let prefix = MatchingStrategy::new("prefix", "Match prefixes");

    let entries = session.match_entries("par", &prefix, &wn).unwrap();
    assert_eq!(entries[0].database, "wn");
    assert_eq!(entries[0].word, "parrot");

    let info = session.database_info(&wn).unwrap();
    assert_eq!(info, "about wn\n");

    assert_eq!(probe.sent(), vec!["MATCH wn prefix par", "SHOW INFO wn"]);
}

#[test]
fn test_sequence_of_commands_on_one_session() {
    let (session, probe) = session_with(
        "111 2 strategies present\r\n\
         exact \"Match headwords exactly\"\r\n\
         prefix \"Match prefixes\"\r\n\
         .\r\n\
         250 ok\r\n\
         554 No databases present\r\n\
         552 no match\r\n",
    );

    assert_eq!(session.list_strategies().unwrap().len(), 2);
    assert!(session.list_databases().unwrap().is_empty());
    assert!(session.define("x", "!").unwrap().is_empty());
    assert_eq!(probe.sent(), vec!["SHOW STRAT", "SHOW DB", "DEFINE ! x"]);
}

#[test]
fn test_rejection_leaves_session_usable() {
    let (session, _probe) = session_with(
        "550 invalid database\r\n\
         112 information follows\r\n\
         text\r\n\
         .\r\n\
         250 ok\r\n",
    );

    let err = session.database_info("nope").unwrap_err();
    assert!(err.is_invalid_database());

    let info = session.database_info("wn").unwrap();
    assert_eq!(info, "text\n");
}

#[test]
fn test_write_failure_surfaces_as_io_error() {
    let (transport, _probe) = ScriptedTransport::with_broken_writes(GREETING);
    let session = Session::handshake(transport).unwrap();

    let err = session.list_databases().unwrap_err();
    assert!(matches!(err, DictError::Io(_)));
    assert!(err.is_fatal());
}

#[test]
fn test_raw_line_access() {
    let (session, probe) = session_with("110 1 databases present\r\n\r\n");

    session.send_line("SHOW DB").unwrap();
    assert_eq!(
        session.read_line().unwrap(),
        Some("110 1 databases present".to_string())
    );
    assert_eq!(session.read_line().unwrap(), Some(String::new()));
    assert_eq!(session.read_line().unwrap(), None);
    assert_eq!(probe.sent(), vec!["SHOW DB"]);
}

// =============================================================================
// Teardown Tests
// =============================================================================

#[test]
fn test_close_sends_quit_once() {
    let (session, probe) = session_with("221 bye\r\n");

    session.close();
    session.close();

    assert!(session.is_closed());
    assert_eq!(probe.sent(), vec!["QUIT"]);
    assert_eq!(probe.shutdowns(), 1);
}

#[test]
fn test_close_swallows_errors() {
    let (transport, probe) = ScriptedTransport::with_broken_writes(GREETING);
    let session = Session::handshake(transport).unwrap();

    session.close();
    session.close();

    assert!(session.is_closed());
    assert_eq!(probe.shutdowns(), 1);
}

#[test]
fn test_close_without_quit_reply() {
    // Server hangs up without answering QUIT
    let (session, probe) = session_with("");
    session.close();
    assert_eq!(probe.sent(), vec!["QUIT"]);
}

#[test]
fn test_close_tolerates_non_bye_reply() {
    // Anything other than 221 is logged and ignored; only one line is read
    let (session, probe) = session_with("500 unknown command\r\n221 late bye\r\n");
    session.close();

    assert!(session.is_closed());
    assert_eq!(probe.sent(), vec!["QUIT"]);
    assert_eq!(probe.reads(), 2);
    assert_eq!(probe.shutdowns(), 1);
}

#[test]
fn test_commands_after_close_fail() {
    let (session, probe) = session_with("221 bye\r\n");
    session.close();

    assert!(matches!(
        session.define("x", Database::ALL),
        Err(DictError::SessionClosed)
    ));
    assert!(matches!(
        session.list_strategies(),
        Err(DictError::SessionClosed)
    ));
    assert!(matches!(
        session.send_line("SHOW DB"),
        Err(DictError::SessionClosed)
    ));
    assert!(matches!(session.read_line(), Err(DictError::SessionClosed)));
    assert_eq!(probe.sent(), vec!["QUIT"]);
}

#[test]
fn test_drop_closes_session() {
    let (session, probe) = session_with("221 bye\r\n");
    drop(session);

    assert_eq!(probe.sent(), vec!["QUIT"]);
    assert_eq!(probe.shutdowns(), 1);
}

// =============================================================================
// Concurrency Tests
// =============================================================================

#[test]
fn test_concurrent_callers_are_serialised() {
    const CALLERS: usize = 8;

    let reply = "110 1 databases present\r\nwn \"WordNet\"\r\n.\r\n250 ok\r\n".repeat(CALLERS);
    let (session, probe) = session_with(&reply);
    let session = Arc::new(session);

    let handles: Vec<_> = (0..CALLERS)
        .map(|_| {
            let session = Arc::clone(&session);
            thread::spawn(move || session.list_databases().unwrap())
        })
        .collect();

    for handle in handles {
        let dbs = handle.join().unwrap();
        assert_eq!(dbs.len(), 1);
        assert_eq!(dbs["wn"].description(), "WordNet");
    }
    assert_eq!(probe.sent().len(), CALLERS);
}
