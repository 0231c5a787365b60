//! Scripted dialog host.
//!
//! A deterministic in-process stand-in for the live telecom dialog, driven by
//! a YAML menu script of ordered screens. The binary uses it as its demo
//! surface and the integration tests use it to replay whole menu flows
//! without an OS host.

use anyhow::{ensure, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Mutex;

use crate::host::{DialTrigger, NodeAction, SurfaceHost};
use crate::logging::{log_debug, log_debug_content};
use crate::session::SessionHandle;
use crate::tree::{is_button_role, is_input_role, NodeId, UiNode};

/// An ordered menu flow. Each send-ish click advances to the next screen; a
/// click on the last screen closes the dialog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MenuScript {
    pub screens: Vec<ScreenSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScreenSpec {
    /// Menu body lines, one text node each.
    pub body: Vec<String>,
    /// Whether the screen renders a text-input field.
    #[serde(default)]
    pub input: bool,
    /// Button labels, in render order.
    #[serde(default)]
    pub buttons: Vec<String>,
}

impl MenuScript {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let script: MenuScript = serde_yaml::from_str(text).context("invalid menu script")?;
        ensure!(!script.screens.is_empty(), "menu script has no screens");
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read menu script {}", path.display()))?;
        Self::from_yaml(&text)
    }
}

struct HostState {
    index: usize,
    present: bool,
    pending_input: Option<String>,
    typed: Vec<String>,
}

pub struct ScriptedHost {
    script: MenuScript,
    state: Mutex<HostState>,
    notifier: Mutex<Option<SessionHandle>>,
}

impl ScriptedHost {
    pub fn new(script: MenuScript) -> Self {
        Self {
            script,
            state: Mutex::new(HostState {
                index: 0,
                present: false,
                pending_input: None,
                typed: Vec::new(),
            }),
            notifier: Mutex::new(None),
        }
    }

    /// Wires surface-change notifications to the automaton queue. Must be
    /// called before the first dial.
    pub fn attach(&self, handle: SessionHandle) {
        *self.notifier.lock().unwrap() = Some(handle);
    }

    /// Values submitted through the input field so far, in order.
    pub fn typed(&self) -> Vec<String> {
        self.state.lock().unwrap().typed.clone()
    }

    fn notify(&self) {
        if let Some(handle) = self.notifier.lock().unwrap().as_ref() {
            handle.surface_changed();
        }
    }

    fn screen(&self, index: usize) -> Option<UiNode> {
        build_screen(&self.script, index)
    }
}

impl SurfaceHost for ScriptedHost {
    fn current_snapshot(&self) -> Option<UiNode> {
        let state = self.state.lock().unwrap();
        if state.present {
            self.screen(state.index)
        } else {
            None
        }
    }

    fn perform(&self, node: NodeId, action: NodeAction) -> bool {
        let mut state = self.state.lock().unwrap();
        if !state.present {
            return false;
        }
        let Some(root) = self.screen(state.index) else {
            return false;
        };
        let Some(target) = root.walk().find(|n| n.id == node) else {
            return false;
        };
        match action {
            NodeAction::Focus => is_input_role(&target.role),
            NodeAction::Clear => {
                if !is_input_role(&target.role) {
                    return false;
                }
                state.pending_input = Some(String::new());
                true
            }
            NodeAction::SetText(value) => {
                if !is_input_role(&target.role) {
                    return false;
                }
                state.pending_input = Some(value);
                true
            }
            NodeAction::Click => {
                if !(target.clickable || is_button_role(&target.role)) {
                    return false;
                }
                let label = target.text.as_deref().unwrap_or("").to_ascii_lowercase();
                let last_screen = state.index + 1 >= self.script.screens.len();
                if label.contains("cancel") || label.contains("dismiss") || last_screen {
                    state.present = false;
                    log_debug("scripted dialog closed");
                } else {
                    if let Some(value) = state.pending_input.take() {
                        log_debug_content(&format!("script input: {value}"));
                        state.typed.push(value);
                    }
                    state.index += 1;
                    drop(state);
                    self.notify();
                }
                true
            }
        }
    }

    fn navigate_back(&self) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.present {
            state.present = false;
            true
        } else {
            false
        }
    }
}

impl DialTrigger for ScriptedHost {
    fn dial(&self, code: &str) -> Result<()> {
        {
            let mut state = self.state.lock().unwrap();
            state.index = 0;
            state.present = true;
            state.pending_input = None;
            state.typed.clear();
        }
        log_debug_content(&format!("scripted dial: {code}"));
        self.notify();
        Ok(())
    }
}

fn build_screen(script: &MenuScript, index: usize) -> Option<UiNode> {
    let screen = script.screens.get(index)?;
    let base = (index as NodeId + 1) * 100;
    let mut root = UiNode::new("android.widget.FrameLayout").with_id(base);
    let mut next = base + 1;
    for line in &screen.body {
        root = root.child(
            UiNode::new("android.widget.TextView")
                .with_id(next)
                .with_text(line),
        );
        next += 1;
    }
    if screen.input {
        root = root.child(UiNode::new("android.widget.EditText").with_id(next));
        next += 1;
    }
    for label in &screen.buttons {
        root = root.child(
            UiNode::new("android.widget.Button")
                .with_id(next)
                .with_text(label)
                .clickable(),
        );
        next += 1;
    }
    Some(root)
}
