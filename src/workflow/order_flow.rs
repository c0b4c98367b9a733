//! 订单处理流程 - 流程层
//!
//! 核心职责：定义"一个订单"的完整处理流程
//!
//! 流程顺序：
//! 1. 填写并提交表单
//! 2. 保存收据 PDF + 截图
//! 3. 把截图嵌入收据（两者都存在时）
//!
//! 恢复动作（回到表单、关闭弹窗）由编排层负责

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::infrastructure::{HtmlRenderer, PageDriver};
use crate::models::OrderRecord;
use crate::services::{embed_screenshot_to_receipt, FormDriver, FormState, ReceiptCapturer};
use crate::workflow::order_ctx::OrderCtx;

/// 单个订单的处理结果
#[derive(Debug)]
pub enum OrderOutcome {
    /// 收据已保存，`merged` 表示截图是否成功嵌入
    Completed { merged: bool },
    /// 订单被放弃
    Failed(AppError),
}

/// 订单处理流程
///
/// - 编排表单、收据、合并三个步骤
/// - 不持有页面资源
/// - 任何错误都转成 [`OrderOutcome::Failed`]，不会向上传播
pub struct OrderFlow {
    form_driver: FormDriver,
    receipt_capturer: ReceiptCapturer,
}

impl OrderFlow {
    pub fn new(config: &Config) -> Self {
        Self {
            form_driver: FormDriver::new(&config.timeouts),
            receipt_capturer: ReceiptCapturer::new(config.timeouts.receipt),
        }
    }

    pub async fn run<P, R>(
        &self,
        page: &P,
        renderer: &R,
        order: &OrderRecord,
        ctx: &OrderCtx,
    ) -> OrderOutcome
    where
        P: PageDriver + ?Sized,
        R: HtmlRenderer + ?Sized,
    {
        // ========== 1. 表单 ==========
        if let Err(e) = self.form_driver.fill_and_submit(page, order).await {
            error!("{} ❌ 表单处理失败: {}", ctx, e);
            return OrderOutcome::Failed(e.into());
        }

        // ========== 2. 收据与截图 ==========
        let capture = self
            .receipt_capturer
            .capture(page, renderer, &ctx.receipt_path, &ctx.screenshot_path)
            .await;

        let receipt = match capture.receipt {
            Ok(path) => path,
            Err(e) => {
                error!("{} ❌ 没有拿到收据，跳过合并: {}", ctx, e);
                return OrderOutcome::Failed(e.into());
            }
        };
        info!("{} ✓ 状态: {}", ctx, FormState::Confirmed);

        // ========== 3. 合并 ==========
        let screenshot = match capture.screenshot {
            Ok(path) => path,
            Err(e) => {
                warn!("{} ⚠️ 没有截图，收据未嵌入截图: {}", ctx, e);
                return OrderOutcome::Completed { merged: false };
            }
        };

        match embed_screenshot_to_receipt(&screenshot, &receipt) {
            Ok(()) => OrderOutcome::Completed { merged: true },
            Err(e) => {
                warn!("{} ⚠️ 截图嵌入失败，保留原收据: {}", ctx, e);
                OrderOutcome::Completed { merged: false }
            }
        }
    }
}
