//! 应用入口 - 编排层
//!
//! 持有浏览器，组装基于 Chrome 的下单机器人

use anyhow::Result;
use chromiumoxide::Browser;

use crate::browser;
use crate::config::Config;
use crate::infrastructure::{ChromePage, ChromePdfRenderer};
use crate::orchestrator::run_loop::{OrderRobot, RunSummary};
use crate::utils::logging;

/// 应用主结构
pub struct App {
    _browser: Browser,
    robot: OrderRobot<ChromePage, ChromePdfRenderer>,
}

impl App {
    /// 初始化应用：连接或启动浏览器
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::log_startup(&config);

        let session = browser::open_session(&config).await?;
        let page = ChromePage::new(session.page, config.slowmo);
        let renderer = ChromePdfRenderer::new(session.print_page);

        Ok(Self {
            _browser: session.browser,
            robot: OrderRobot::new(config, page, renderer),
        })
    }

    /// 运行应用主逻辑并输出统计
    pub async fn run(&self) -> RunSummary {
        let summary = self.robot.run().await;
        logging::print_final_stats(&summary, &self.robot.config().output_log_file);
        summary
    }
}
