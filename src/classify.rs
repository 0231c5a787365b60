//! Terminal-vs-interactive classification of a dialog snapshot.
//!
//! A dialog that keeps an input field or an explicit send/reply control is
//! mid-session; one that offers only acknowledgement controls has nothing
//! further to ask. This is a structural heuristic with no protocol guarantee
//! behind it, and a conflicting layout (input field next to a lone "OK") is
//! resolved in favor of "still interactive".

use crate::transcript::is_control;
use crate::tree::{is_input_role, UiNode};

pub fn has_input_field(root: &UiNode) -> bool {
    root.walk().any(|node| is_input_role(&node.role))
}

/// True when any control node's text contains "send" or "reply". Substring
/// match on purpose: vendors append suffixes and icon glyphs to these labels.
pub fn has_send_affordance(root: &UiNode) -> bool {
    root.walk().any(|node| {
        is_control(node)
            && node.text.as_deref().is_some_and(|text| {
                let lower = text.to_ascii_lowercase();
                lower.contains("send") || lower.contains("reply")
            })
    })
}

pub fn is_terminal(root: &UiNode) -> bool {
    !has_input_field(root) && !has_send_affordance(root)
}
