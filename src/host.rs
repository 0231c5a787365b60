//! Trait seams to the external host surface.
//!
//! The core never touches a live OS dialog directly. Everything it needs is
//! behind three narrow traits: querying the current snapshot and acting on
//! nodes ([`SurfaceHost`]), keeping the driving application foregrounded
//! while a session runs ([`ForegroundKeeper`]), and firing the outbound
//! session initiation ([`DialTrigger`]).

use std::sync::Arc;

use crate::tree::{NodeId, UiNode};

/// Per-node action requests forwarded to the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeAction {
    Focus,
    /// Set-text with an empty value; issued before every real set so stale
    /// dialog prefill cannot leak into the submitted input.
    Clear,
    SetText(String),
    Click,
}

/// The externally rendered dialog surface.
///
/// `current_snapshot` may return `None` at any time; the OS can dismiss the
/// dialog between any two calls. Implementations must not block.
pub trait SurfaceHost {
    fn current_snapshot(&self) -> Option<UiNode>;

    /// Performs an action on the live node behind `node`. Returns whether the
    /// host reported success.
    fn perform(&self, node: NodeId, action: NodeAction) -> bool;

    /// Generic back-navigation, used as a last resort when no cancel control
    /// can be located.
    fn navigate_back(&self) -> bool;
}

/// Lifecycle of the helper that keeps the chat application in front of the
/// dialog. `start`/`stop` are idempotent; the automaton is the only caller.
pub trait ForegroundKeeper {
    fn start(&self);
    fn stop(&self);
}

/// Fires the outbound dial that opens a session. Invoked exactly once per
/// `Idle -> Active` transition.
pub trait DialTrigger {
    fn dial(&self, code: &str) -> anyhow::Result<()>;
}

impl<H: SurfaceHost + ?Sized> SurfaceHost for Arc<H> {
    fn current_snapshot(&self) -> Option<UiNode> {
        (**self).current_snapshot()
    }

    fn perform(&self, node: NodeId, action: NodeAction) -> bool {
        (**self).perform(node, action)
    }

    fn navigate_back(&self) -> bool {
        (**self).navigate_back()
    }
}

impl<K: ForegroundKeeper + ?Sized> ForegroundKeeper for Arc<K> {
    fn start(&self) {
        (**self).start();
    }

    fn stop(&self) {
        (**self).stop();
    }
}

impl<D: DialTrigger + ?Sized> DialTrigger for Arc<D> {
    fn dial(&self, code: &str) -> anyhow::Result<()> {
        (**self).dial(code)
    }
}
