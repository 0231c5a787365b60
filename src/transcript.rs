//! Transcript extraction from a dialog snapshot.
//!
//! Walks the captured tree and reassembles the menu text the user would have
//! read, skipping button labels so the transcript carries content only. The
//! control predicate defined here is the single source of truth for "is this
//! node a button" and is reused by the classifier and the activator.

use crate::tree::{is_button_role, UiNode};

/// Header artifact some vendors render above the menu body.
pub(crate) const NOISE_TOKEN: &str = "USSD";

/// Labels that mark a node as a UI affordance even when its role is not
/// button-like (some vendors expose buttons as plain clickable text views).
const AFFORDANCE_WORDS: &[&str] = &["send", "cancel", "ok", "reply", "dismiss"];

/// A node is a control when its role is button-like or its whole text is one
/// of the known affordance words.
pub fn is_control(node: &UiNode) -> bool {
    if is_button_role(&node.role) {
        return true;
    }
    match node.text.as_deref() {
        Some(text) => {
            let trimmed = text.trim();
            AFFORDANCE_WORDS
                .iter()
                .any(|word| trimmed.eq_ignore_ascii_case(word))
        }
        None => false,
    }
}

/// Extracts the normalized transcript of a snapshot.
///
/// Pure over the tree value: two snapshots with the same ordered content text
/// produce byte-identical transcripts regardless of control-node differences,
/// which is what the session automaton's dedup cursor relies on.
pub fn extract(root: &UiNode) -> String {
    let mut lines: Vec<String> = Vec::new();
    collect(root, &mut lines);

    let mut cleaned: Vec<&str> = Vec::new();
    let stripped: Vec<String> = lines
        .iter()
        .flat_map(|line| line.split('\n'))
        .map(|line| line.replace(NOISE_TOKEN, ""))
        .collect();
    for line in &stripped {
        let line = line.trim();
        if !line.is_empty() {
            cleaned.push(line);
        }
    }
    cleaned.join("\n")
}

fn collect(node: &UiNode, lines: &mut Vec<String>) {
    if let Some(text) = node.text.as_deref() {
        if !is_control(node) {
            push_line(lines, text);
        }
    } else if let Some(description) = node.description.as_deref() {
        // Accessible description stands in for text only when the node has no
        // text of its own.
        push_line(lines, description);
    }
    // Menu text can be split across sibling and ancestor layers, so recursion
    // never stops at a node that already contributed a line.
    for child in &node.children {
        collect(child, lines);
    }
}

fn push_line(lines: &mut Vec<String>, raw: &str) {
    // Vendors sometimes expose the same label twice in adjacent nodes; keep
    // only the first.
    if lines.last().is_some_and(|prev| prev.trim() == raw.trim()) {
        return;
    }
    lines.push(raw.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> UiNode {
        UiNode::new("android.widget.FrameLayout")
            .child(UiNode::new("android.widget.TextView").with_text("USSD"))
            .child(UiNode::new("android.widget.TextView").with_text("1. Check balance"))
            .child(UiNode::new("android.widget.TextView").with_text("2. Send money"))
            .child(UiNode::new("android.widget.EditText"))
            .child(
                UiNode::new("android.widget.Button")
                    .with_text("Send")
                    .clickable(),
            )
            .child(
                UiNode::new("android.widget.Button")
                    .with_text("Cancel")
                    .clickable(),
            )
    }

    #[test]
    fn skips_control_labels_and_noise_header() {
        assert_eq!(extract(&menu()), "1. Check balance\n2. Send money");
    }

    #[test]
    fn control_content_does_not_affect_transcript() {
        let with_other_buttons = UiNode::new("android.widget.FrameLayout")
            .child(UiNode::new("android.widget.TextView").with_text("1. Check balance"))
            .child(UiNode::new("android.widget.TextView").with_text("2. Send money"))
            .child(
                UiNode::new("android.widget.Button")
                    .with_text("Dismiss")
                    .clickable(),
            );
        assert_eq!(extract(&menu()), extract(&with_other_buttons));
    }

    #[test]
    fn controls_only_tree_yields_empty_transcript() {
        let tree = UiNode::new("android.widget.FrameLayout")
            .child(UiNode::new("android.widget.Button").with_text("OK"))
            .child(UiNode::new("android.widget.Button").with_text("Cancel"));
        assert_eq!(extract(&tree), "");
    }

    #[test]
    fn affordance_word_as_plain_text_is_a_control() {
        let tree = UiNode::new("android.widget.FrameLayout")
            .child(UiNode::new("android.widget.TextView").with_text(" OK "))
            .child(UiNode::new("android.widget.TextView").with_text("Done."));
        assert_eq!(extract(&tree), "Done.");
    }

    #[test]
    fn description_fallback_when_text_absent() {
        let tree = UiNode::new("android.widget.FrameLayout")
            .child(UiNode::new("android.view.View").with_description("Enter PIN"))
            .child(
                UiNode::new("android.view.View")
                    .with_text("Enter amount")
                    .with_description("amount field hint"),
            );
        // The second node has competing text, so its description is ignored.
        assert_eq!(extract(&tree), "Enter PIN\nEnter amount");
    }

    #[test]
    fn adjacent_duplicate_lines_collapse() {
        let tree = UiNode::new("android.widget.FrameLayout")
            .child(UiNode::new("android.widget.TextView").with_text("Balance: 42.00"))
            .child(UiNode::new("android.widget.TextView").with_text(" Balance: 42.00 "));
        assert_eq!(extract(&tree), "Balance: 42.00");
    }

    #[test]
    fn multiline_text_is_split_and_trimmed() {
        let tree = UiNode::new("android.widget.FrameLayout").child(
            UiNode::new("android.widget.TextView").with_text("  Welcome \n\n  1. Accounts  "),
        );
        assert_eq!(extract(&tree), "Welcome\n1. Accounts");
    }

    #[test]
    fn noise_token_inside_a_line_is_removed() {
        let tree = UiNode::new("android.widget.FrameLayout")
            .child(UiNode::new("android.widget.TextView").with_text("USSD code running"));
        assert_eq!(extract(&tree), "code running");
    }
}
