//! アプリケーション設定

/// アプリケーション設定
pub struct Config {
    /// OpenAI APIモデル名
    pub model: String,
    /// 最大トークン数
    pub max_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            // NOTE: Keep in sync with tests (tests/config_tests.rs).
            max_tokens: 2000,
        }
    }
}

impl Config {
    /// 新しい設定インスタンスを作成
    pub fn new() -> Self {
        Self::default()
    }
}
