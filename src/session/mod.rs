//! Session automaton and its command/event bus.
//!
//! Architecture:
//! - One input queue: surface-change notifications and collaborator commands
//!   are multiplexed into a single channel and consumed one at a time, so the
//!   automaton's state and dedup cursor have a single writer.
//! - Typed bus: the collaborator talks [`SessionCommand`] in and
//!   [`SessionEvent`] out; both serialize as tagged JSON objects.
//! - The automaton owns the foreground keeper and the dial trigger for the
//!   whole session lifetime; no other component touches them.

mod automaton;
mod protocol;


pub use automaton::{SessionAutomaton, SessionHandle, SessionOptions, SessionState};
pub use protocol::{SessionCommand, SessionError, SessionEvent};
