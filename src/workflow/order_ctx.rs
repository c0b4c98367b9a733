//! 订单处理上下文
//!
//! 封装"正在处理第几个订单、产物写到哪里"这一信息

use std::fmt::Display;
use std::path::PathBuf;

use crate::config::Config;
use crate::models::OrderRecord;

/// 订单处理上下文
#[derive(Debug, Clone)]
pub struct OrderCtx {
    /// 订单在列表中的序号（从1开始，仅用于日志显示）
    pub order_index: usize,
    /// 订单总数
    pub total: usize,
    pub order_number: String,
    /// 收据 PDF 路径
    pub receipt_path: PathBuf,
    /// 截图路径
    pub screenshot_path: PathBuf,
}

impl OrderCtx {
    pub fn new(config: &Config, order: &OrderRecord, order_index: usize, total: usize) -> Self {
        let stem = order.file_stem();
        Self {
            order_index,
            total,
            order_number: order.order_number.clone(),
            receipt_path: config
                .receipts_dir()
                .join(format!("order_{}_results.pdf", stem)),
            screenshot_path: config
                .screenshots_dir()
                .join(format!("order_{}_summary.png", stem)),
        }
    }
}

impl Display for OrderCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[订单 #{} {}/{}]",
            self.order_number, self.order_index, self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_paths_are_keyed_by_order_number() {
        let config = Config::default();
        let order = OrderRecord {
            order_number: "7".to_string(),
            head: "1".to_string(),
            body: "1".to_string(),
            legs: "1".to_string(),
            address: "a".to_string(),
        };

        let ctx = OrderCtx::new(&config, &order, 3, 10);

        assert_eq!(
            ctx.receipt_path,
            PathBuf::from("output/receipts/order_7_results.pdf")
        );
        assert_eq!(
            ctx.screenshot_path,
            PathBuf::from("output/screenshots/order_7_summary.png")
        );
        assert_eq!(ctx.to_string(), "[订单 #7 3/10]");
    }
}
