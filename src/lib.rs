//! Parley: a conversational agent loop over several LLM providers.
//!
//! Normalizes the OpenAI, Anthropic, Google and OpenAI-compatible (aipipe)
//! wire formats into one conversation model and dispatches model-requested
//! tool calls until the model stops asking for tools.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use parley::prelude::*;
//!
//! # async fn example() -> parley::error::Result<()> {
//! let agent = AgentLoop::new(ProviderRegistry::from_env())
//!     .with_event_sink(Arc::new(|event| println!("{event:?}")));
//! let session = AgentSession::new(agent, SessionConfig::from_env()?);
//! session.submit_user_message("What is 2+2?").await?;
//! # Ok(())
//! # }
//! ```

pub mod agent;
pub mod config;
pub mod conversation;
pub mod error;
pub mod prelude;
pub mod provider;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
