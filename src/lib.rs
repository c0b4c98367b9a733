//! # Robot Order Bot
//!
//! 自动在 RobotSpareBin 网店下单的 Rust 应用程序：
//! 下载订单表，逐个填写表单下单，保存收据 PDF 与截图，
//! 把截图嵌入收据，最后把所有收据打包为 `receipts.zip`。
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page），只暴露能力
//! - `PageDriver` - 导航、等待、点击、填写、截图
//! - `HtmlRenderer` - HTML 片段打印为 PDF
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"，只处理单个订单
//! - `OrderFetcher` / `read_orders` - 下载与解析订单表
//! - `FormDriver` - 填写并提交表单
//! - `ReceiptCapturer` - 收据 PDF 与截图
//! - `embed_screenshot_to_receipt` - 截图嵌入收据
//! - `archive_receipts` - 打包收据
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个订单"的完整处理流程
//! - `OrderCtx` - 上下文封装（订单号 + 产物路径）
//! - `OrderFlow` - 流程编排（表单 → 收据 → 合并）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/run_loop` - 订单循环与恢复策略
//! - `orchestrator/app` - 浏览器资源与应用入口

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;

pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::{Config, Timeouts};
pub use error::{AppError, AppResult};
pub use infrastructure::{HtmlRenderer, PageDriver, Selector};
pub use models::OrderRecord;
pub use orchestrator::{App, OrderRobot, Recovery, RunSummary};
pub use workflow::{OrderCtx, OrderFlow, OrderOutcome};
