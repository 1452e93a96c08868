use serde::Serialize;
use uuid::Uuid;

use super::{WidgetColor, WidgetType};

/// 生成されたウィジェットの詳細。1 回のツール呼び出しの戻り値としてのみ存在し、
/// 永続化しない。シリアル番号以外のアイデンティティは持たない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WidgetDetails {
    pub serial_number: String,
    pub widget_type: WidgetType,
    pub colors: Vec<WidgetColor>,
}

/// `create_widget` の結果。拒否は例外ではなく通常の戻り値
/// （モデルがメッセージを読んで会話で説明する想定）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateWidgetOutcome {
    Created(WidgetDetails),
    Rejected(String),
}

impl CreateWidgetOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, CreateWidgetOutcome::Created(_))
    }
}

/// 指定された種別と色でウィジェットを 1 つ作る。
///
/// 色はモデル（自由テキスト→JSON）由来の信頼できない文字列として受け取り、
/// 閉集合 `WidgetColor::ALL` に対して 1 件ずつ検証し直す。
/// - 無効な色が 1 つでもあれば `Rejected`: 無効な生文字列の列挙と、
///   利用可能色の表示名一覧（宣言順、カンマ区切り）を含むメッセージ。
/// - 全て有効なら `Created`: 表示名をハイフンで連結（入力順・重複保持）し、
///   `{種別}-{連結色名}-{UUIDv4}` のシリアル番号を振る。呼び出しごとに独立で、
///   状態は一切持たない。
pub fn create_widget(widget_type: WidgetType, widget_colors: &[String]) -> CreateWidgetOutcome {
    // 有効/無効に振り分け（順序は入力どおり）
    let mut valid: Vec<WidgetColor> = Vec::with_capacity(widget_colors.len());
    let mut invalid: Vec<&str> = Vec::new();
    for raw in widget_colors {
        match WidgetColor::parse(raw) {
            Some(c) => valid.push(c),
            None => invalid.push(raw),
        }
    }

    if !invalid.is_empty() {
        let available = WidgetColor::ALL
            .iter()
            .map(|c| c.display_name())
            .collect::<Vec<_>>()
            .join(", ");
        return CreateWidgetOutcome::Rejected(format!(
            "The color(s) {} are not available. Please choose from the available colors: {}.",
            invalid.join(", "),
            available,
        ));
    }

    let joined = valid
        .iter()
        .map(|c| c.display_name())
        .collect::<Vec<_>>()
        .join("-");
    let serial_number = format!("{widget_type}-{joined}-{}", Uuid::new_v4());

    CreateWidgetOutcome::Created(WidgetDetails {
        serial_number,
        widget_type,
        colors: valid,
    })
}
