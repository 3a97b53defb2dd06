//! Agent loop, session surface and events.

pub mod events;
pub mod runner;
pub mod session;

pub use events::{AgentEvent, EventSink, RunId};
pub use runner::{AgentLoop, RunSummary};
pub use session::AgentSession;
