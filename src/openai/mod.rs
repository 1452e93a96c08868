//! OpenAI連携のモジュール

pub mod call_tool;
pub mod tools;

// 代表的な公開APIを再エクスポート
pub use call_tool::{
    multi_step_tool_answer,
    multi_step_tool_answer_blocking,
    propose_tool_call,
    propose_tool_call_blocking,
    resolve_and_execute_tool_call,
    MultiStepAnswer,
    ToolCallDecision,
    ToolResolution,
};
pub use tools::{
    build_create_widget_tool,
    ToolDefinition,
    ToolHandler,
    ToolParametersBuilder,
};
