//! JSON-lines chat backend over a scripted dialog host.
//!
//! The chat front-end drives sessions through stdin/stdout, one JSON object
//! per line:
//! - Commands (client → backend): `{"cmd": "start"}`,
//!   `{"cmd": "send_input", "text": "..."}`, `{"cmd": "cancel"}`
//! - Events (backend → client): `{"event": "response", ...}`,
//!   `{"event": "failure", ...}`, plus `{"event": "notice", ...}` for
//!   client-side mistakes that never reach the automaton.

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::unbounded;
use serde_json::json;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use ussdchat::config::AppConfig;
use ussdchat::sim::{MenuScript, ScriptedHost};
use ussdchat::{
    init_logging, init_tracing, log_debug, ForegroundKeeper, SessionAutomaton, SessionCommand,
    SessionError, SessionEvent,
};

/// Played when no --script is given: a minimal UPI-style flow.
const DEMO_SCRIPT: &str = r#"
screens:
  - body:
      - "Welcome to UPI"
      - "1. Send money"
      - "2. Check balance"
    input: true
    buttons: ["Send", "Cancel"]
  - body:
      - "Enter amount:"
    input: true
    buttons: ["Send", "Cancel"]
  - body:
      - "Payment successful"
    buttons: ["OK"]
"#;

/// Desktop stand-in for the screen-overlay helper: there is no dialog to
/// cover, so keeping the app foregrounded reduces to a log line.
struct LogKeeper;

impl ForegroundKeeper for LogKeeper {
    fn start(&self) {
        log_debug("foreground keeper started");
    }

    fn stop(&self) {
        log_debug("foreground keeper stopped");
    }
}

fn emit_line(value: &impl serde::Serialize) {
    if let Ok(json) = serde_json::to_string(value) {
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{json}");
        let _ = stdout.flush();
    }
}

fn main() -> Result<()> {
    let config = AppConfig::parse();
    config.validate()?;
    init_logging(&config);
    init_tracing(&config);

    let script = match &config.script {
        Some(path) => MenuScript::load(path)?,
        None => MenuScript::from_yaml(DEMO_SCRIPT).context("built-in demo script")?,
    };
    let host = Arc::new(ScriptedHost::new(script));

    let (event_tx, event_rx) = unbounded();
    let (automaton, handle) = SessionAutomaton::new(
        Arc::clone(&host),
        LogKeeper,
        Arc::clone(&host),
        config.session_options(),
        event_tx,
    );
    host.attach(handle.clone());

    let runner = thread::spawn(move || automaton.run());

    // Mirrors the session-active flag the chat UI keeps, so commands sent
    // outside a session get a notice instead of being silently dropped.
    let session_active = Arc::new(AtomicBool::new(false));
    let writer_active = Arc::clone(&session_active);
    let writer = thread::spawn(move || {
        for event in event_rx {
            match &event {
                SessionEvent::Response { terminal: true, .. }
                | SessionEvent::Failure {
                    reason: SessionError::DialogNotFound,
                    ..
                } => writer_active.store(false, Ordering::SeqCst),
                _ => {}
            }
            emit_line(&event);
        }
    });

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(_) => break,
        };
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let command = match serde_json::from_str::<SessionCommand>(trimmed) {
            Ok(command) => command,
            Err(err) => {
                emit_line(&json!({
                    "event": "notice",
                    "message": format!("Invalid command: {err}"),
                }));
                continue;
            }
        };
        match &command {
            SessionCommand::Start => {
                session_active.store(true, Ordering::SeqCst);
            }
            SessionCommand::DeliverInput { .. } | SessionCommand::Cancel => {
                if !session_active.load(Ordering::SeqCst) {
                    emit_line(&json!({
                        "event": "notice",
                        "message": "No active session. Send {\"cmd\":\"start\"} first.",
                    }));
                    continue;
                }
            }
        }
        handle.command(command);
    }

    log_debug("stdin closed, shutting down");
    handle.shutdown();
    let _ = runner.join();
    let _ = writer.join();
    Ok(())
}
