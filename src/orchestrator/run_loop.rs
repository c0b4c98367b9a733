//! 订单循环 - 编排层
//!
//! ## 职责
//!
//! 按顺序处理订单列表，每个订单之后无条件执行恢复动作。
//!
//! ## 核心功能
//!
//! 1. **打开站点**：导航到下单页并关闭弹窗
//! 2. **加载订单**：下载订单文件并解析（只下载一次）
//! 3. **逐个处理**：委托 `OrderFlow` 处理单个订单，错误只记录不传播
//! 4. **恢复**：回到表单 → 关闭弹窗 → 等待页面稳定
//! 5. **打包**：循环结束后打包所有收据
//!
//! 回到表单的按钮找不到时，立即打包已有收据并重新打开下单页；
//! 重新打开也失败则视为会话丢失，剩余订单不再尝试。

use tokio::time::sleep;
use tracing::{error, info, warn};

use crate::config::Config;
use crate::infrastructure::{HtmlRenderer, PageDriver};
use crate::models::OrderRecord;
use crate::services::{archiver, navigation, read_orders, ArchiveReport, OrderFetcher};
use crate::utils::logging;
use crate::workflow::{OrderCtx, OrderFlow, OrderOutcome};

/// 单个订单之后的恢复结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recovery {
    /// 通过 "Order another robot" 回到了表单
    Returned,
    /// 按钮不存在，已打包并重新打开下单页
    Reloaded,
    /// 无法回到下单页，本次运行结束
    SessionLost,
}

/// 运行统计
#[derive(Debug, Default)]
pub struct RunSummary {
    /// 订单总数
    pub total: usize,
    pub completed: usize,
    /// 成功嵌入截图的订单数
    pub merged: usize,
    pub failed: usize,
    /// 会话丢失后没有尝试的订单数
    pub not_attempted: usize,
    pub fetch_failed: bool,
    pub site_unreachable: bool,
    pub session_lost: bool,
    /// 最后一次打包的结果
    pub archive: Option<ArchiveReport>,
}

impl RunSummary {
    /// 实际执行了处理流程的订单数
    pub fn attempted(&self) -> usize {
        self.completed + self.failed
    }

    /// 进程退出码
    ///
    /// - `0`: 全部订单完成
    /// - `1`: 有订单失败或未尝试
    /// - `2`: 无法打开站点或下载订单文件
    pub fn exit_code(&self) -> u8 {
        if self.fetch_failed || self.site_unreachable {
            2
        } else if self.failed > 0 || self.not_attempted > 0 {
            1
        } else {
            0
        }
    }
}

/// 下单机器人
///
/// 持有唯一的页面会话，所有组件调用都经由这里传入页面
pub struct OrderRobot<P, R> {
    config: Config,
    page: P,
    renderer: R,
    fetcher: OrderFetcher,
    flow: OrderFlow,
}

impl<P: PageDriver, R: HtmlRenderer> OrderRobot<P, R> {
    pub fn new(config: Config, page: P, renderer: R) -> Self {
        Self {
            fetcher: OrderFetcher::new(config.timeouts.download),
            flow: OrderFlow::new(&config),
            config,
            page,
            renderer,
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// 完整运行：打开站点 → 下载订单 → 逐个处理 → 打包
    pub async fn run(&self) -> RunSummary {
        if let Err(e) = navigation::open_order_website(
            &self.page,
            &self.config.order_site_url,
            self.config.timeouts.overlay,
        )
        .await
        {
            error!("❌ 无法打开下单页: {}", e);
            return RunSummary {
                site_unreachable: true,
                ..Default::default()
            };
        }

        let orders_path = match self
            .fetcher
            .download(&self.config.orders_csv_url, &self.config.orders_csv_path())
            .await
        {
            Ok(path) => path,
            Err(_) => {
                error!("❌ 没有订单文件，本次运行不处理任何订单");
                return RunSummary {
                    fetch_failed: true,
                    archive: self.archive_receipts(),
                    ..Default::default()
                };
            }
        };

        let orders = read_orders(&orders_path);
        let summary = self.process_orders(&orders).await;
        info!("Done: processing Orders :)");
        summary
    }

    /// 顺序处理订单列表，结束后打包收据
    pub async fn process_orders(&self, orders: &[OrderRecord]) -> RunSummary {
        let total = orders.len();
        let mut summary = RunSummary {
            total,
            ..Default::default()
        };
        logging::log_orders_loaded(total);

        for (index, order) in orders.iter().enumerate() {
            let ctx = OrderCtx::new(&self.config, order, index + 1, total);
            logging::log_order_start(&ctx, order);

            match self.flow.run(&self.page, &self.renderer, order, &ctx).await {
                OrderOutcome::Completed { merged } => {
                    summary.completed += 1;
                    if merged {
                        summary.merged += 1;
                    }
                    info!("{} ✅ 订单完成", ctx);
                }
                OrderOutcome::Failed(e) => {
                    summary.failed += 1;
                    warn!("{} 订单已放弃: {}", ctx, e);
                }
            }

            match self.recover(&ctx, &mut summary).await {
                Recovery::Returned | Recovery::Reloaded => {}
                Recovery::SessionLost => {
                    summary.session_lost = true;
                    summary.not_attempted = total - (index + 1);
                    error!(
                        "{} ❌ 会话丢失，剩余 {} 个订单不再处理",
                        ctx, summary.not_attempted
                    );
                    return summary;
                }
            }
        }

        summary.archive = self.archive_receipts();
        summary
    }

    /// 无论订单成败都执行：回到表单 → 关闭弹窗 → 等待页面稳定
    async fn recover(&self, ctx: &OrderCtx, summary: &mut RunSummary) -> Recovery {
        let recovery = match navigation::return_to_order_form(
            &self.page,
            self.config.timeouts.order_another,
        )
        .await
        {
            Ok(()) => Recovery::Returned,
            Err(e) => {
                warn!("{} 无法回到下单表单: {}", ctx, e);
                summary.archive = self.archive_receipts();

                match self.page.goto(&self.config.order_site_url).await {
                    Ok(()) => {
                        info!("{} 🔄 已重新打开下单页", ctx);
                        Recovery::Reloaded
                    }
                    Err(e) => {
                        error!("{} 重新打开下单页失败: {}", ctx, e);
                        return Recovery::SessionLost;
                    }
                }
            }
        };

        navigation::close_annoying_modal(&self.page, self.config.timeouts.overlay).await;
        if !self.config.settle_delay.is_zero() {
            sleep(self.config.settle_delay).await;
        }
        recovery
    }

    /// 打包收据目录，可以单独调用
    pub fn archive_receipts(&self) -> Option<ArchiveReport> {
        archiver::archive_receipts(&self.config.receipts_dir(), &self.config.archive_path)
    }
}
