//! Wire types of the session bus.
//!
//! A closed set of command and event variants, serialized as JSON objects
//! with a `"cmd"` / `"event"` tag field for type discrimination. The chat
//! collaborator never sees automaton internals, only these.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Commands (collaborator → automaton)
// ============================================================================

/// Inbound requests to the session automaton, processed strictly in arrival
/// order, at most one in flight.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "cmd")]
pub enum SessionCommand {
    /// Open a new session by dialling the configured service code.
    #[serde(rename = "start")]
    Start,

    /// Type `text` into the dialog and press the send control.
    #[serde(rename = "send_input")]
    DeliverInput { text: String },

    /// Abort the session, dismissing the dialog if one is up.
    #[serde(rename = "cancel")]
    Cancel,
}

// ============================================================================
// Events (automaton → collaborator)
// ============================================================================

/// Outbound notifications, published at most once per distinct observed
/// transcript per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event")]
pub enum SessionEvent {
    /// One screen of menu text. `terminal` marks the session as concluded;
    /// the collaborator ends its own bookkeeping on it.
    #[serde(rename = "response")]
    Response { text: String, terminal: bool },

    /// A session-level fault, rendered to the user as a distinct message.
    #[serde(rename = "failure")]
    Failure {
        reason: SessionError,
        message: String,
    },
}

impl SessionEvent {
    pub fn failure(reason: SessionError) -> Self {
        SessionEvent::Failure {
            reason,
            message: reason.to_string(),
        }
    }
}

/// Session failure taxonomy.
///
/// `ActivationFailed` is the one non-fatal member: missed best-effort clicks
/// are logged rather than published, because a back-navigation fallback
/// always exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum SessionError {
    #[error("no dialog surface is currently on screen")]
    DialogNotFound,
    #[error("the current dialog has no input field")]
    InputFieldNotFound,
    #[error("no control matched any offered label")]
    ActivationFailed,
    #[error("the host rejected the requested action")]
    HostActionFailed,
}
