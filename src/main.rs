//! Widget factory demo: let the model invoke the `create_widget` tool
//! automatically from natural-language prompts.
use widget_factory::config::Config;
use widget_factory::openai::{build_create_widget_tool, multi_step_tool_answer_blocking};

fn main() -> color_eyre::Result<()> {
    // Load .env if present and install pretty error reports
    let _ = dotenvy::dotenv();
    color_eyre::install()?;

    // stdout への簡易ロガー（RUST_LOG で制御）
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let tools = vec![build_create_widget_tool()];
    let config = Config::new();

    // lime / scarlet / maroon+navy はどれもサポート外の色。モデルが近い色に
    // 丸めるか、ツールのエラーメッセージを会話で説明するかを観察するデモ。
    let prompts = [
        "Create a handy lime colored widget for me.",
        "Create a beautiful scarlet colored widget for me.",
        "Create an attractive maroon and navy colored widget for me.",
    ];

    for prompt in prompts {
        tracing::info!(target: "demo", prompt, "sending_prompt");
        let answer = multi_step_tool_answer_blocking(prompt, &tools, &config, Some(5))?;
        println!("> {prompt}\n{}\n", answer.final_answer);
    }
    Ok(())
}
