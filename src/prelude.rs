//! Convenience re-exports for common use.

pub use crate::agent::{AgentEvent, AgentLoop, AgentSession, EventSink, RunSummary};
pub use crate::config::{AgentSettings, SessionConfig, SessionConfigUpdate, SessionHandle};
pub use crate::conversation::{ConversationStore, ErrorTurnPolicy};
pub use crate::error::{ParleyError, Result};
pub use crate::provider::{ProviderId, ProviderRegistry};
pub use crate::tools::{ToolCatalog, ToolExecutor};
pub use crate::types::{Role, ToolCall, Turn};
