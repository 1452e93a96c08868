use serde::{Deserialize, Serialize};
use std::fmt;

/// ウィジェットの種別。閉じた列挙で、この 2 種類のみ。
/// モデルとのやり取りはシンボル名の文字列で行うため serde はデフォルト表現
/// （variant 名そのまま）を使う。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetType {
    Useful,
    Decorative,
}

impl WidgetType {
    /// 宣言順の全 variant
    pub const ALL: [WidgetType; 2] = [WidgetType::Useful, WidgetType::Decorative];

    /// シンボル名
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetType::Useful => "Useful",
            WidgetType::Decorative => "Decorative",
        }
    }

    /// ツールスキーマに載せる説明文（検証には使わない）
    pub fn description(&self) -> &'static str {
        match self {
            WidgetType::Useful => "A widget that is useful.",
            WidgetType::Decorative => "A widget that is decorative.",
        }
    }

    /// 信頼できない文字列からのパース（モデル出力由来の値を想定）
    pub fn parse(s: &str) -> Option<WidgetType> {
        Self::ALL.iter().copied().find(|t| t.as_str() == s)
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ウィジェットの色。Red / Green / Blue のみの閉じた集合。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WidgetColor {
    Red,
    Green,
    Blue,
}

impl WidgetColor {
    /// 宣言順の全 variant（エラーメッセージの列挙順にも使う）
    pub const ALL: [WidgetColor; 3] = [WidgetColor::Red, WidgetColor::Green, WidgetColor::Blue];

    /// シンボル名
    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetColor::Red => "Red",
            WidgetColor::Green => "Green",
            WidgetColor::Blue => "Blue",
        }
    }

    /// ツールスキーマに載せる説明文（検証には使わない）
    pub fn description(&self) -> &'static str {
        match self {
            WidgetColor::Red => "Use when creating a red item.",
            WidgetColor::Green => "Use when creating a green item.",
            WidgetColor::Blue => "Use when creating a blue item.",
        }
    }

    /// 明示的に宣言された表示名。現状は未宣言（= シンボル名へフォールバック）だが、
    /// 表示名とシンボル名が分岐するケースを想定して仕組みとして分けてある。
    fn declared_display_name(&self) -> Option<&'static str> {
        None
    }

    /// 表示名の解決: 宣言があればそれ、なければシンボル名。純関数で失敗しない。
    pub fn display_name(&self) -> &'static str {
        self.declared_display_name().unwrap_or_else(|| self.as_str())
    }

    /// 信頼できない文字列からのパース。閉集合のメンバーでなければ None。
    pub fn parse(s: &str) -> Option<WidgetColor> {
        Self::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

impl fmt::Display for WidgetColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
