//! Error classification and recovery hints.

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Authentication,
    RateLimit,
    Network,
    Timeout,
    Server,
    Provider,
    Configuration,
    ToolExecution,
    RoundLimit,
    Cancelled,
    Unknown,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    RetryWithBackoff,
    CheckCredentials,
    CheckConfiguration,
    IncreaseTimeout,
    CheckToolImplementation,
    RaiseRoundLimit,
    ContactSupport,
    None,
}

impl RecoverySuggestion {
    /// Short hint for terminal output.
    pub fn hint(self) -> Option<&'static str> {
        match self {
            Self::RetryWithBackoff => Some("try again in a moment"),
            Self::CheckCredentials => Some("check the API key for this provider"),
            Self::CheckConfiguration => Some("check provider, model and endpoint settings"),
            Self::IncreaseTimeout => Some("raise the tool timeout"),
            Self::CheckToolImplementation => Some("check the tool backend"),
            Self::RaiseRoundLimit => Some("raise max_rounds or simplify the request"),
            Self::ContactSupport => Some("the request or response was rejected"),
            Self::None => None,
        }
    }
}
