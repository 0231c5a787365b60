//! The session automaton: a single-threaded state machine that serializes
//! surface-change notifications and collaborator commands into one queue and
//! owns every piece of per-session state (dedup cursor, foreground keeper,
//! state transitions).

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use std::thread;
use std::time::Duration;

use crate::classify;
use crate::controls;
use crate::host::{DialTrigger, ForegroundKeeper, SurfaceHost};
use crate::logging::{log_debug, log_debug_content};
use crate::transcript;
use crate::tree::UiNode;

use super::protocol::{SessionCommand, SessionError, SessionEvent};

/// Label priority when advancing after input delivery; a second pass with
/// [`ADVANCE_FALLBACK_LABELS`] runs when the first finds nothing to click.
pub(crate) const ADVANCE_LABELS: &[&str] = &["Send", "Reply", "OK"];
pub(crate) const ADVANCE_FALLBACK_LABELS: &[&str] = &["OK", "Send", "Reply"];

/// Best-effort acknowledgement of a terminal dialog.
pub(crate) const DISMISS_LABELS: &[&str] = &["OK", "Cancel", "Dismiss"];

/// User-initiated abort prefers an explicit cancel over a bare acknowledge.
pub(crate) const CANCEL_LABELS: &[&str] = &["Cancel", "Dismiss", "OK"];

const CANCELLED_NOTICE: &str = "Session cancelled by user.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Active,
    Ending,
}

/// Everything that can reach the automaton, multiplexed into one channel so
/// processing is strictly serialized.
#[derive(Debug)]
pub(crate) enum AutomatonInput {
    Command(SessionCommand),
    /// The host surface changed; the automaton re-queries the snapshot when
    /// it gets around to processing this, never before.
    SurfaceChanged,
    Shutdown,
}

/// Cloneable producer side of the automaton queue. Hosts use it to report
/// surface changes; the collaborator uses it to submit commands.
#[derive(Clone)]
pub struct SessionHandle {
    tx: Sender<AutomatonInput>,
}

impl SessionHandle {
    pub fn command(&self, command: SessionCommand) -> bool {
        self.tx.send(AutomatonInput::Command(command)).is_ok()
    }

    pub fn surface_changed(&self) -> bool {
        self.tx.send(AutomatonInput::SurfaceChanged).is_ok()
    }

    /// Asks the run loop to exit. An active session is torn down first.
    pub fn shutdown(&self) {
        let _ = self.tx.send(AutomatonInput::Shutdown);
    }
}

#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// Service code handed to the dial trigger on start.
    pub dial_code: String,
    /// Bounded snapshot lookup on start: attempts before giving up.
    pub snapshot_attempts: u32,
    pub snapshot_retry: Duration,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            dial_code: "*99#".to_string(),
            snapshot_attempts: 20,
            snapshot_retry: Duration::from_millis(50),
        }
    }
}

pub struct SessionAutomaton<H, K, D>
where
    H: SurfaceHost,
    K: ForegroundKeeper,
    D: DialTrigger,
{
    host: H,
    keeper: K,
    dialer: D,
    opts: SessionOptions,
    state: SessionState,
    /// Dedup cursor: last transcript published for the current session.
    last_transcript: String,
    events: Sender<SessionEvent>,
    inputs: Receiver<AutomatonInput>,
}

impl<H, K, D> SessionAutomaton<H, K, D>
where
    H: SurfaceHost,
    K: ForegroundKeeper,
    D: DialTrigger,
{
    pub fn new(
        host: H,
        keeper: K,
        dialer: D,
        opts: SessionOptions,
        events: Sender<SessionEvent>,
    ) -> (Self, SessionHandle) {
        let (tx, rx) = unbounded();
        let automaton = Self {
            host,
            keeper,
            dialer,
            opts,
            state: SessionState::Idle,
            last_transcript: String::new(),
            events,
            inputs: rx,
        };
        (automaton, SessionHandle { tx })
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Consumes inputs until shutdown or until every handle is dropped.
    pub fn run(mut self) {
        log_debug("session automaton running");
        loop {
            let Ok(input) = self.inputs.recv() else {
                break;
            };
            if self.step(input) {
                break;
            }
        }
        if self.state != SessionState::Idle {
            self.finish_session();
        }
        log_debug("session automaton exiting");
    }

    /// Processes one input; returns true when the loop should exit.
    pub(crate) fn step(&mut self, input: AutomatonInput) -> bool {
        if matches!(input, AutomatonInput::Shutdown) {
            return true;
        }
        self.dispatch(input);
        if self.state == SessionState::Ending {
            // Drain whatever is already queued before tearing down, so a
            // burst of stale surface notifications cannot revive a session
            // whose terminal decision is final.
            loop {
                match self.inputs.try_recv() {
                    Ok(AutomatonInput::Shutdown) => return true,
                    Ok(extra) => self.dispatch(extra),
                    Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
                }
            }
            self.finish_session();
        }
        false
    }

    pub(crate) fn dispatch(&mut self, input: AutomatonInput) {
        match input {
            AutomatonInput::Command(SessionCommand::Start) => self.on_start(),
            AutomatonInput::Command(SessionCommand::DeliverInput { text }) => {
                self.on_deliver_input(&text);
            }
            AutomatonInput::Command(SessionCommand::Cancel) => self.on_cancel(),
            AutomatonInput::SurfaceChanged => self.on_surface_changed(),
            AutomatonInput::Shutdown => {}
        }
    }

    fn on_start(&mut self) {
        if self.state != SessionState::Idle {
            log_debug("start ignored: session already in progress");
            return;
        }
        // Keeper goes up before the dial so the dialog is covered from the
        // moment it appears.
        self.keeper.start();
        if let Err(err) = self.dialer.dial(&self.opts.dial_code) {
            log_debug(&format!("dial trigger failed: {err:#}"));
            self.keeper.stop();
            self.emit(SessionEvent::failure(SessionError::HostActionFailed));
            return;
        }
        if self.await_snapshot().is_none() {
            self.keeper.stop();
            self.emit(SessionEvent::failure(SessionError::DialogNotFound));
            return;
        }
        self.last_transcript.clear();
        self.set_state(SessionState::Active);
        // The dialog that just appeared counts as the first surface change;
        // the host's own notification for it dedups to a no-op.
        self.on_surface_changed();
    }

    fn on_surface_changed(&mut self) {
        if self.state != SessionState::Active {
            return;
        }
        let Some(root) = self.host.current_snapshot() else {
            log_debug("surface changed but no snapshot; dialog gone");
            return;
        };
        let text = transcript::extract(&root);
        if text.is_empty() || text == self.last_transcript {
            return;
        }
        let terminal = classify::is_terminal(&root);
        if terminal && !controls::activate(&self.host, &root, DISMISS_LABELS) {
            // Best effort only; the OS reaps unacknowledged dialogs itself.
            log_debug(&format!("auto-dismiss: {}", SessionError::ActivationFailed));
        }
        log_debug_content(&format!("response ({} bytes, terminal={terminal})", text.len()));
        self.emit(SessionEvent::Response {
            text: text.clone(),
            terminal,
        });
        self.last_transcript = text;
        if terminal {
            self.set_state(SessionState::Ending);
        }
    }

    fn on_deliver_input(&mut self, text: &str) {
        if self.state != SessionState::Active {
            log_debug("input ignored: no active session");
            return;
        }
        let Some(root) = self.host.current_snapshot() else {
            self.emit(SessionEvent::failure(SessionError::DialogNotFound));
            self.set_state(SessionState::Ending);
            return;
        };
        if !controls::set_input(&self.host, &root, text) {
            // The user can retype; the dialog is still up, so the session
            // stays active.
            self.emit(SessionEvent::failure(SessionError::InputFieldNotFound));
            return;
        }
        if !controls::activate(&self.host, &root, ADVANCE_LABELS)
            && !controls::activate(&self.host, &root, ADVANCE_FALLBACK_LABELS)
        {
            log_debug(&format!("advance: {}", SessionError::ActivationFailed));
        }
        // Whatever the dialog shows next is the answer to this input, even
        // if it renders the same text again.
        self.last_transcript.clear();
    }

    fn on_cancel(&mut self) {
        if self.state == SessionState::Idle {
            log_debug("cancel ignored: no active session");
            return;
        }
        match self.host.current_snapshot() {
            Some(root) => {
                if !controls::activate(&self.host, &root, CANCEL_LABELS)
                    && !self.host.navigate_back()
                {
                    log_debug("cancel fallback failed; dialog may already be gone");
                }
            }
            None => {
                let _ = self.host.navigate_back();
            }
        }
        self.emit(SessionEvent::Response {
            text: CANCELLED_NOTICE.to_string(),
            terminal: true,
        });
        self.set_state(SessionState::Ending);
    }

    fn finish_session(&mut self) {
        self.keeper.stop();
        self.last_transcript.clear();
        self.set_state(SessionState::Idle);
    }

    /// Bounded, non-blocking lookup: the dialog either shows up within the
    /// configured attempts or the start fails fast.
    fn await_snapshot(&self) -> Option<UiNode> {
        for attempt in 0..self.opts.snapshot_attempts {
            if let Some(root) = self.host.current_snapshot() {
                return Some(root);
            }
            if attempt + 1 < self.opts.snapshot_attempts {
                thread::sleep(self.opts.snapshot_retry);
            }
        }
        None
    }

    fn set_state(&mut self, next: SessionState) {
        if self.state != next {
            tracing::debug!(from = ?self.state, to = ?next, "session state");
            log_debug(&format!("session state {:?} -> {next:?}", self.state));
            self.state = next;
        }
    }

    fn emit(&self, event: SessionEvent) {
        if self.events.send(event).is_err() {
            log_debug("event bus disconnected; dropping event");
        }
    }
}
