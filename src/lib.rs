
// 同階層のファイルをモジュールとしてインポート
pub mod config;
pub mod openai;
pub mod widget; // widget domain (enums + factory logic)

pub use config::Config;
pub use widget::{create_widget, CreateWidgetOutcome, WidgetColor, WidgetDetails, WidgetType};

// Ensure .env is loaded for tests before anything else runs in the test process.
#[cfg(test)]
#[ctor::ctor]
fn load_dotenv_for_tests() {
    let _ = dotenvy::dotenv();
}
