/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::models::OrderRecord;
use crate::orchestrator::RunSummary;
use crate::workflow::OrderCtx;

/// 初始化日志：终端输出 + 追加写入运行日志文件
///
/// 日志级别由 `RUST_LOG` 控制，默认 `info`
pub fn init(log_file_path: &Path) -> Result<()> {
    init_log_file(log_file_path)?;
    let log_file = OpenOptions::new().append(true).open(log_file_path)?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(log_file)))
        .try_init()?;
    Ok(())
}

/// 初始化日志文件，写入带时间的表头
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &Path) -> Result<()> {
    if let Some(parent) = log_file_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let log_header = format!(
        "{}\n机器人下单日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 机器人订单处理");
    info!("🌐 下单页: {}", config.order_site_url);
    info!("📄 订单文件: {}", config.orders_csv_url);
    info!("{}", "=".repeat(60));
}

pub fn log_orders_loaded(total: usize) {
    info!("✓ 共 {} 个订单待处理", total);
    info!("💡 订单将逐个顺序处理\n");
}

/// 记录订单开始处理
pub fn log_order_start(ctx: &OrderCtx, order: &OrderRecord) {
    info!("\n{} {}", ctx, "─".repeat(30));
    info!("{} Order: {}", ctx, order);
}

/// 打印最终统计信息
///
/// # 参数
/// - `summary`: 运行统计
/// - `log_file_path`: 日志文件路径
pub fn print_final_stats(summary: &RunSummary, log_file_path: &Path) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    if summary.fetch_failed {
        info!("❌ 订单文件下载失败，未处理任何订单");
    }
    info!("✅ 成功: {}/{} (嵌入截图 {})", summary.completed, summary.total, summary.merged);
    info!("❌ 失败: {}", summary.failed);
    if summary.not_attempted > 0 {
        info!("⏭️ 未尝试: {}", summary.not_attempted);
    }
    if let Some(archive) = &summary.archive {
        info!("🗜️ 压缩包: {} ({} 个收据)", archive.path.display(), archive.entries.len());
    }
    info!("{}", "=".repeat(60));
    info!("\n日志已保存至: {}", log_file_path.display());
}
