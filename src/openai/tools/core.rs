use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};
use color_eyre::Result;
use serde_json::{json, Map, Value};
use std::sync::Arc;

/// ランタイムで実行するツール関数の型。
/// 引数(JSON)を受け取り、結果(JSON)を返す。
pub type ToolHandler = Arc<dyn Fn(&Value) -> Result<Value> + Send + Sync + 'static>;

/// OpenAI function calling に渡すメタデータと実行ハンドラをまとめた定義。
/// 非同期が必要になったら `ToolHandler` を futures を返す型に差し替える拡張が可能。
#[derive(Clone)]
pub struct ToolDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub parameters: Value, // JSON Schema
    pub strict: bool,
    handler: ToolHandler,
}

impl std::fmt::Debug for ToolDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .field("strict", &self.strict)
            .finish()
    }
}

impl ToolDefinition {
    /// 新規作成
    pub fn new(
        name: &'static str,
        description: &'static str,
        parameters: Value,
        handler: ToolHandler,
    ) -> Self {
        Self { name, description, parameters, strict: false, handler }
    }

    /// strict フラグを設定（OpenAI の strict function 呼び出しモード用）
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// OpenAI SDK の `FunctionObject` に変換
    pub fn function_object(&self) -> FunctionObject {
        FunctionObject {
            name: self.name.to_string(),
            description: Some(self.description.to_string()),
            parameters: Some(self.parameters.clone()),
            strict: Some(self.strict),
        }
    }

    /// ChatCompletionTool 形式（APIへ渡す vector 用）
    pub fn as_chat_tool(&self) -> ChatCompletionTool {
        ChatCompletionTool {
            r#type: ChatCompletionToolType::Function,
            function: self.function_object(),
        }
    }

    /// ツールを実行
    pub fn execute(&self, args: &Value) -> Result<Value> {
        (self.handler)(args)
    }
}

/// `type: object` の JSON Schema を組み立てる小さなビルダー。
/// スキーマを json! マクロで都度手書きせず、ツール定義側の記述を揃えるためのもの。
#[derive(Debug, Clone)]
pub struct ToolParametersBuilder {
    properties: Map<String, Value>,
    required: Vec<String>,
    additional_properties: Option<bool>,
}

impl ToolParametersBuilder {
    /// 空の object スキーマから開始
    pub fn new_object() -> Self {
        Self { properties: Map::new(), required: Vec::new(), additional_properties: None }
    }

    /// string プロパティを追加
    pub fn add_string(mut self, name: &str, description: Option<&str>) -> Self {
        let mut prop = json!({ "type": "string" });
        if let Some(d) = description {
            prop["description"] = json!(d);
        }
        self.properties.insert(name.to_string(), prop);
        self
    }

    /// enum 制約つき string プロパティを追加
    pub fn add_string_enum(mut self, name: &str, description: Option<&str>, values: &[&str]) -> Self {
        let mut prop = json!({ "type": "string", "enum": values });
        if let Some(d) = description {
            prop["description"] = json!(d);
        }
        self.properties.insert(name.to_string(), prop);
        self
    }

    /// enum 制約つき string の配列プロパティを追加
    pub fn add_string_enum_array(
        mut self,
        name: &str,
        description: Option<&str>,
        values: &[&str],
    ) -> Self {
        let mut prop = json!({
            "type": "array",
            "items": { "type": "string", "enum": values }
        });
        if let Some(d) = description {
            prop["description"] = json!(d);
        }
        self.properties.insert(name.to_string(), prop);
        self
    }

    /// required に追加
    pub fn required(mut self, name: &str) -> Self {
        self.required.push(name.to_string());
        self
    }

    /// additionalProperties を設定
    pub fn additional_properties(mut self, allowed: bool) -> Self {
        self.additional_properties = Some(allowed);
        self
    }

    /// スキーマ(Value)を生成
    pub fn build(self) -> Value {
        let mut schema = json!({
            "type": "object",
            "properties": Value::Object(self.properties),
            "required": self.required,
        });
        if let Some(ap) = self.additional_properties {
            schema["additionalProperties"] = json!(ap);
        }
        schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_definition_executes_closure() -> Result<()> {
        let tool = ToolDefinition::new(
            "echo_keys",
            "Return number of keys in object",
            ToolParametersBuilder::new_object().build(),
            Arc::new(|v| {
                let obj = v
                    .get("payload")
                    .and_then(|p| p.as_object())
                    .ok_or_else(|| color_eyre::eyre::eyre!("missing payload object"))?;
                Ok(json!({ "len": obj.len() }))
            }),
        );

        let args = json!({"payload": {"a": 1, "b": 2}});
        let out = tool.execute(&args)?;
        assert_eq!(out["len"], 2);

        // Chat tool conversion sanity check
        let chat_tool = tool.as_chat_tool();
        assert_eq!(chat_tool.function.name, "echo_keys");
        Ok(())
    }

    #[test]
    fn builder_emits_enum_and_array_schema() {
        let schema = ToolParametersBuilder::new_object()
            .add_string_enum("kind", Some("kind of thing"), &["A", "B"])
            .add_string_enum_array("tags", None, &["x", "y"])
            .required("kind")
            .additional_properties(false)
            .build();

        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"]["kind"]["enum"][1], "B");
        assert_eq!(schema["properties"]["kind"]["description"], "kind of thing");
        assert_eq!(schema["properties"]["tags"]["items"]["enum"][0], "x");
        assert_eq!(schema["required"][0], "kind");
        assert_eq!(schema["additionalProperties"], false);
    }
}
