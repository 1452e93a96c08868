use std::sync::Arc;

use color_eyre::Result;
use serde_json::{json, Value};

use crate::openai::tools::{ToolDefinition, ToolParametersBuilder};
use crate::widget::{create_widget, CreateWidgetOutcome, WidgetColor, WidgetType};

/// ウィジェット作成ツールの定義を作る。
///
/// スキーマの enum 制約はあくまでモデルへのヒントで、実際の検証は
/// `create_widget` 側が生文字列に対して行う（モデルは自由テキスト由来の
/// JSON を返すため、スキーマ通りの値が来る保証はない）。
/// 返却形式: 成功時は WidgetDetails の JSON、色が無効なら { "error": string }。
/// どちらも Ok で返す（無効色は会話で説明すべき通常の結果であり、失敗ではない）。
pub fn build_create_widget_tool() -> ToolDefinition {
    let type_names: Vec<&str> = WidgetType::ALL.iter().map(|t| t.as_str()).collect();
    let color_names: Vec<&str> = WidgetColor::ALL.iter().map(|c| c.as_str()).collect();

    let parameters = ToolParametersBuilder::new_object()
        .add_string_enum(
            "widgetType",
            Some("The type of widget to be created"),
            &type_names,
        )
        .add_string_enum_array(
            "widgetColors",
            Some("The colors of the widget to be created"),
            &color_names,
        )
        .required("widgetType")
        .required("widgetColors")
        .additional_properties(false)
        .build();

    ToolDefinition::new(
        "create_widget",
        "Creates a new widget of the specified type and colors",
        parameters,
        Arc::new(create_widget_impl),
    )
}

/// クロージャから分離した実装本体（テスト・再利用しやすくするため）。
fn create_widget_impl(args: &Value) -> Result<Value> {
    // widgetType は閉じた列挙のどれか。欠落や未知値はツール引数の不正であり、
    // 色エラーの分類とは別物なので handler エラーとして返す。
    let widget_type = args
        .get("widgetType")
        .and_then(|v| v.as_str())
        .and_then(WidgetType::parse)
        .ok_or_else(|| color_eyre::eyre::eyre!("Invalid or missing 'widgetType' parameter"))?;

    // widgetColors は生文字列のまま工場へ渡す（検証はそちらの責務）
    let widget_colors: Vec<String> = args
        .get("widgetColors")
        .and_then(|v| v.as_array())
        .ok_or_else(|| color_eyre::eyre::eyre!("Invalid or missing 'widgetColors' parameter"))?
        .iter()
        .map(|v| {
            v.as_str()
                .map(|s| s.to_string())
                .ok_or_else(|| color_eyre::eyre::eyre!("'widgetColors' entries must be strings"))
        })
        .collect::<Result<_>>()?;

    match create_widget(widget_type, &widget_colors) {
        CreateWidgetOutcome::Created(details) => Ok(serde_json::to_value(details)?),
        CreateWidgetOutcome::Rejected(message) => Ok(json!({ "error": message })),
    }
}
