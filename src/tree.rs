//! Owned snapshot model of the host-rendered dialog tree.
//!
//! The live dialog belongs to the host OS; we never hold references into it.
//! Each observed change is captured wholesale into a `UiNode` value tree and
//! discarded after processing, so there is no per-node lifetime bookkeeping.

/// Opaque handle the host assigns to a live node at capture time. Actions
/// performed through [`crate::host::SurfaceHost`] address nodes by this id.
pub type NodeId = u64;

/// One element of a captured dialog tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiNode {
    pub id: NodeId,
    /// Vendor class/role tag, e.g. `android.widget.Button`.
    pub role: String,
    pub text: Option<String>,
    pub description: Option<String>,
    pub clickable: bool,
    pub children: Vec<UiNode>,
}

impl UiNode {
    pub fn new(role: impl Into<String>) -> Self {
        Self {
            id: 0,
            role: role.into(),
            text: None,
            description: None,
            clickable: false,
            children: Vec::new(),
        }
    }

    pub fn with_id(mut self, id: NodeId) -> Self {
        self.id = id;
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn clickable(mut self) -> Self {
        self.clickable = true;
        self
    }

    pub fn child(mut self, node: UiNode) -> Self {
        self.children.push(node);
        self
    }

    /// Depth-first pre-order traversal, left to right. Every tree consumer in
    /// this crate (extractor, classifier, locator) shares this order so that
    /// "first match" means the same node everywhere.
    pub fn walk(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }
}

pub struct PreOrder<'a> {
    stack: Vec<&'a UiNode>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a UiNode;

    fn next(&mut self) -> Option<&'a UiNode> {
        let node = self.stack.pop()?;
        for child in node.children.iter().rev() {
            self.stack.push(child);
        }
        Some(node)
    }
}

/// Vendors subclass and rename their widgets, so role checks are substring
/// matches rather than exact class names.
pub fn is_button_role(role: &str) -> bool {
    role.to_ascii_lowercase().contains("button")
}

pub fn is_input_role(role: &str) -> bool {
    role.to_ascii_lowercase().contains("edittext")
}
