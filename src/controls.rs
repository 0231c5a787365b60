//! Locating and driving controls inside a dialog snapshot.
//!
//! Both operations are pre-order searches returning on the first match, so
//! tie-breaks between equally plausible nodes are deterministic even though
//! callers never observe the order directly.

use crate::host::{NodeAction, SurfaceHost};
use crate::logging::log_debug;
use crate::transcript::is_control;
use crate::tree::{is_input_role, UiNode};

/// Fills the first text-input field in the tree: focus, clear, then set.
///
/// Returns whether the final set-text action reported success. Returns false
/// without touching the host when the tree has no input-capable node; the
/// caller maps that to its input-not-found failure.
pub fn set_input<H: SurfaceHost>(host: &H, root: &UiNode, value: &str) -> bool {
    let Some(field) = root.walk().find(|node| is_input_role(&node.role)) else {
        return false;
    };
    host.perform(field.id, NodeAction::Focus);
    host.perform(field.id, NodeAction::Clear);
    let ok = host.perform(field.id, NodeAction::SetText(value.to_string()));
    log_debug(&format!("set input on node {}: ok={ok}", field.id));
    ok
}

/// Clicks the first control matching any of `labels`, honoring label priority.
///
/// Each label gets a full pass over the tree before the next one is tried, so
/// a caller asking for `["Send", "OK"]` always gets "Send" when both exist,
/// regardless of which appears first in the tree. Label matching is a
/// case-insensitive substring test; candidates are control nodes per the
/// transcript predicate plus anything independently clickable.
pub fn activate<H: SurfaceHost>(host: &H, root: &UiNode, labels: &[&str]) -> bool {
    for label in labels {
        let needle = label.to_ascii_lowercase();
        let found = root.walk().find(|node| {
            (is_control(node) || node.clickable)
                && node
                    .text
                    .as_deref()
                    .is_some_and(|text| text.to_ascii_lowercase().contains(&needle))
        });
        if let Some(node) = found {
            let clicked = host.perform(node.id, NodeAction::Click);
            log_debug(&format!("clicked {label:?} on node {}: ok={clicked}", node.id));
            return clicked;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeId;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingHost {
        performed: Mutex<Vec<(NodeId, NodeAction)>>,
        reject_set_text: bool,
    }

    impl RecordingHost {
        fn actions(&self) -> Vec<(NodeId, NodeAction)> {
            self.performed.lock().unwrap().clone()
        }
    }

    impl SurfaceHost for RecordingHost {
        fn current_snapshot(&self) -> Option<UiNode> {
            None
        }

        fn perform(&self, node: NodeId, action: NodeAction) -> bool {
            let ok = !(self.reject_set_text && matches!(action, NodeAction::SetText(_)));
            self.performed.lock().unwrap().push((node, action));
            ok
        }

        fn navigate_back(&self) -> bool {
            false
        }
    }

    fn prompt_dialog() -> UiNode {
        UiNode::new("android.widget.FrameLayout")
            .with_id(1)
            .child(
                UiNode::new("android.widget.TextView")
                    .with_id(2)
                    .with_text("Enter amount:"),
            )
            .child(UiNode::new("android.widget.EditText").with_id(3))
            .child(
                UiNode::new("android.widget.Button")
                    .with_id(4)
                    .with_text("OK")
                    .clickable(),
            )
            .child(
                UiNode::new("android.widget.Button")
                    .with_id(5)
                    .with_text("Send")
                    .clickable(),
            )
    }

    #[test]
    fn set_input_focuses_clears_then_sets() {
        let host = RecordingHost::default();
        assert!(set_input(&host, &prompt_dialog(), "100"));
        assert_eq!(
            host.actions(),
            vec![
                (3, NodeAction::Focus),
                (3, NodeAction::Clear),
                (3, NodeAction::SetText("100".to_string())),
            ]
        );
    }

    #[test]
    fn set_input_without_field_is_silent() {
        let host = RecordingHost::default();
        let tree = UiNode::new("android.widget.FrameLayout")
            .child(UiNode::new("android.widget.Button").with_id(9).with_text("OK"));
        assert!(!set_input(&host, &tree, "100"));
        assert!(host.actions().is_empty());
    }

    #[test]
    fn set_input_reports_host_set_text_result() {
        let host = RecordingHost {
            reject_set_text: true,
            ..RecordingHost::default()
        };
        assert!(!set_input(&host, &prompt_dialog(), "100"));
    }

    #[test]
    fn activate_prefers_label_order_over_tree_order() {
        // "OK" sits before "Send" in the tree; label priority must win.
        let host = RecordingHost::default();
        assert!(activate(&host, &prompt_dialog(), &["Send", "OK"]));
        assert_eq!(host.actions(), vec![(5, NodeAction::Click)]);
    }

    #[test]
    fn activate_tries_every_label_before_giving_up() {
        let host = RecordingHost::default();
        assert!(activate(&host, &prompt_dialog(), &["Reply", "Accept", "OK"]));
        assert_eq!(host.actions(), vec![(4, NodeAction::Click)]);
    }

    #[test]
    fn activate_matches_label_substring_case_insensitively() {
        let host = RecordingHost::default();
        let tree = UiNode::new("android.widget.FrameLayout").child(
            UiNode::new("android.widget.Button")
                .with_id(7)
                .with_text("SEND ▸"),
        );
        assert!(activate(&host, &tree, &["Send"]));
        assert_eq!(host.actions(), vec![(7, NodeAction::Click)]);
    }

    #[test]
    fn activate_accepts_clickable_non_button_nodes() {
        let host = RecordingHost::default();
        let tree = UiNode::new("android.widget.FrameLayout").child(
            UiNode::new("android.widget.TextView")
                .with_id(8)
                .with_text("Dismiss notification")
                .clickable(),
        );
        assert!(activate(&host, &tree, &["Dismiss"]));
    }

    #[test]
    fn activate_with_no_match_reports_failure() {
        let host = RecordingHost::default();
        assert!(!activate(&host, &prompt_dialog(), &["Accept", "Continue"]));
        assert!(host.actions().is_empty());
    }
}
