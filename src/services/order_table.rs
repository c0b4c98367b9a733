//! 订单表读取服务 - 业务能力层

use std::path::Path;

use csv::{ReaderBuilder, Trim};
use tracing::{info, warn};

use crate::error::TableError;
use crate::models::OrderRecord;

/// 解析订单 CSV（UTF-8，逗号分隔，首行为表头），按文件顺序返回订单
pub fn parse_orders(path: &Path) -> Result<Vec<OrderRecord>, TableError> {
    let csv_err = |source| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(b',')
        .trim(Trim::All)
        .from_path(path)
        .map_err(csv_err)?;

    reader
        .deserialize::<OrderRecord>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_err)
}

/// 读取订单表
///
/// 解析失败时记录日志并返回空列表，本次运行不处理任何订单
pub fn read_orders(path: &Path) -> Vec<OrderRecord> {
    match parse_orders(path) {
        Ok(orders) => {
            info!("✓ 读取到 {} 个订单", orders.len());
            orders
        }
        Err(e) => {
            warn!("读取订单表失败: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_reads_rows_in_file_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        fs::write(
            &path,
            "Order number,Head,Body,Legs,Address\n\
             1,1,2,3,Address 123\n\
             2,4,5,6,\"Street 7, Flat 2\"\n",
        )
        .unwrap();

        let orders = read_orders(&path);

        assert_eq!(orders.len(), 2);
        assert_eq!(orders[0].order_number, "1");
        assert_eq!(orders[0].legs, "3");
        assert_eq!(orders[1].order_number, "2");
        assert_eq!(orders[1].address, "Street 7, Flat 2");
    }

    #[test]
    fn test_missing_column_yields_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.csv");
        fs::write(&path, "Order number,Head\n1,1\n").unwrap();

        assert!(parse_orders(&path).is_err());
        assert!(read_orders(&path).is_empty());
    }

    #[test]
    fn test_missing_file_yields_empty_list() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_orders(&dir.path().join("nope.csv")).is_empty());
    }
}
