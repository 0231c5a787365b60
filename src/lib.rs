pub mod classify;
pub mod config;
pub mod controls;
pub mod host;
pub mod logging;
pub mod session;
pub mod sim;
pub mod telemetry;
pub mod transcript;
pub mod tree;

pub use host::{DialTrigger, ForegroundKeeper, NodeAction, SurfaceHost};
pub use logging::{init_logging, log_debug, log_debug_content};
pub use session::{
    SessionAutomaton, SessionCommand, SessionError, SessionEvent, SessionHandle, SessionOptions,
    SessionState,
};
pub use telemetry::init_tracing;
pub use tree::{NodeId, UiNode};
