use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// 文件名中不允许出现的字符
static UNSAFE_FILE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9_-]").expect("valid regex"));

/// 订单表中的一行
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    #[serde(rename = "Order number")]
    pub order_number: String,
    /// 头部型号（下拉框 value）
    #[serde(rename = "Head")]
    pub head: String,
    /// 身体型号（单选框 value）
    #[serde(rename = "Body")]
    pub body: String,
    /// 腿部零件编号
    #[serde(rename = "Legs")]
    pub legs: String,
    #[serde(rename = "Address")]
    pub address: String,
}

impl OrderRecord {
    /// 用于生成截图和收据文件名的订单号
    ///
    /// 订单号来自远程文件，非法字符替换为 `_`，防止写出输出目录
    pub fn file_stem(&self) -> String {
        let stem = UNSAFE_FILE_CHARS.replace_all(self.order_number.trim(), "_");
        if stem.is_empty() {
            "unknown".to_string()
        } else {
            stem.into_owned()
        }
    }
}

impl fmt::Display for OrderRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order number={} Head={} Body={} Legs={} Address={}",
            self.order_number, self.head, self.body, self.legs, self.address
        )
    }
}
