//! Tools namespace: core definitions plus concrete tool builders.

mod core; // core definitions: ToolDefinition, ToolParametersBuilder
mod widget; // widget factory tool

pub use self::core::{ToolDefinition, ToolHandler, ToolParametersBuilder};
pub use self::widget::build_create_widget_tool;
