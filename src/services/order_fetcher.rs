//! 订单文件下载服务 - 业务能力层
//!
//! 只负责把远程订单文件原样保存到工作目录，不解析内容

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use tokio::fs;
use tracing::{error, info};

use crate::error::FetchError;

/// 订单文件下载服务
///
/// 订单文件只允许由本服务在本次运行中下载，不接受外部提供的文件。
/// 失败时不重试。
pub struct OrderFetcher {
    client: Client,
    timeout: Duration,
}

impl OrderFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: Client::new(),
            timeout,
        }
    }

    /// 下载订单文件并写入 `destination`（存在则覆盖）
    ///
    /// # 返回
    /// 返回写入的文件路径
    pub async fn download(&self, url: &str, destination: &Path) -> Result<PathBuf, FetchError> {
        info!("📥 正在下载订单文件: {}", url);

        let result = self.fetch_bytes(url).await;
        let bytes = match result {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("下载订单文件失败: {}", e);
                return Err(e);
            }
        };

        if let Err(source) = write_file(destination, &bytes).await {
            let e = FetchError::Write {
                path: destination.to_path_buf(),
                source,
            };
            error!("保存订单文件失败: {}", e);
            return Err(e);
        }

        info!(
            "✓ 订单文件已保存: {} ({} 字节)",
            destination.display(),
            bytes.len()
        );
        Ok(destination.to_path_buf())
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let request_err = |source| FetchError::Request {
            url: url.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(request_err)?;

        let bytes = response.bytes().await.map_err(request_err)?;
        Ok(bytes.to_vec())
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }
    fs::write(path, bytes).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unreachable_host_is_request_error() {
        let dir = tempfile::tempdir().unwrap();
        let destination = dir.path().join("orders.csv");
        let fetcher = OrderFetcher::new(Duration::from_secs(2));

        // 端口 9 (discard) 在本机上通常没有监听
        let result = fetcher
            .download("http://127.0.0.1:9/orders.csv", &destination)
            .await;

        assert!(matches!(result, Err(FetchError::Request { .. })));
        assert!(!destination.exists());
    }
}
