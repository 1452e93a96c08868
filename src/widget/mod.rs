//! ウィジェット工場のドメインモジュール
//!
//! 閉じた列挙型（種別・色）と、色検証つきのウィジェット生成ロジックをまとめる。
//! OpenAI ツール連携そのものは `crate::openai` 側にあり、ここは純粋なロジックのみ。

mod types;
mod factory;

pub use types::{WidgetColor, WidgetType};
pub use factory::{create_widget, CreateWidgetOutcome, WidgetDetails};
