//! Tool catalog, capabilities and execution.

pub mod capability;
pub mod catalog;
pub mod executor;

pub use capability::{
    ChartRenderer, CodeEvaluator, ExpressionEvaluator, SearchBackend, StubChart, StubSearch,
};
pub use catalog::{ParamType, ToolCatalog, ToolDefinition, ToolParameter};
pub use executor::{ToolExecutor, UNKNOWN_TOOL};
