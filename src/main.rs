use std::process::ExitCode;

use anyhow::Result;
use robot_order_bot::utils::logging;
use robot_order_bot::{App, Config};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logging::init(&config.output_log_file)?;

    // 初始化并运行应用
    let app = App::initialize(config).await?;
    let summary = app.run().await;

    Ok(ExitCode::from(summary.exit_code()))
}
