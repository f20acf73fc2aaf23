//! Current Events - 时事问答智能体
//!
//! 入口：加载 .env 与配置、初始化日志、装配问询流水线，并运行交互式命令行。

use anyhow::Context;
use current_events::{config::load_config, create_pipeline, observability, shell::run_shell};
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env 不存在时忽略
    let _ = dotenvy::dotenv();

    observability::init();

    let cfg = load_config(None).context("Failed to load config")?;
    let pipeline = create_pipeline(&cfg).context("Failed to create pipeline")?;

    let handled = run_shell(
        &pipeline,
        &cfg.app.quit_token,
        &cfg.app.prompt,
        BufReader::new(tokio::io::stdin()),
        tokio::io::stdout(),
    )
    .await
    .context("Shell run failed")?;

    tracing::info!(handled, "session finished");
    Ok(())
}
