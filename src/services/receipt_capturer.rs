//! 收据截取服务 - 业务能力层
//!
//! 把页面上的收据渲染为 PDF，并单独截一张整页截图。两者互不影响。

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::fs;
use tracing::{info, warn};

use crate::error::CaptureError;
use crate::infrastructure::{HtmlRenderer, PageDriver, Selector};

/// 截取结果，两项分别成功或失败
#[derive(Debug)]
pub struct CaptureOutcome {
    pub receipt: Result<PathBuf, CaptureError>,
    pub screenshot: Result<PathBuf, CaptureError>,
}

/// 收据区域选择器
pub fn receipt_selector() -> Selector {
    Selector::css("#receipt")
}

/// 收据截取服务
pub struct ReceiptCapturer {
    receipt_timeout: Duration,
}

impl ReceiptCapturer {
    pub fn new(receipt_timeout: Duration) -> Self {
        Self { receipt_timeout }
    }

    /// 保存收据 PDF 和截图
    pub async fn capture<P, R>(
        &self,
        page: &P,
        renderer: &R,
        receipt_path: &Path,
        screenshot_path: &Path,
    ) -> CaptureOutcome
    where
        P: PageDriver + ?Sized,
        R: HtmlRenderer + ?Sized,
    {
        let receipt = self.store_receipt_as_pdf(page, renderer, receipt_path).await;
        if let Err(e) = &receipt {
            warn!("保存收据 PDF 失败: {}", e);
        }

        let screenshot = self.screenshot_robot(page, screenshot_path).await;
        if let Err(e) = &screenshot {
            warn!("截图失败: {}", e);
        }

        CaptureOutcome {
            receipt,
            screenshot,
        }
    }

    /// 等待收据出现，提取其 HTML 并渲染为 PDF
    pub async fn store_receipt_as_pdf<P, R>(
        &self,
        page: &P,
        renderer: &R,
        receipt_path: &Path,
    ) -> Result<PathBuf, CaptureError>
    where
        P: PageDriver + ?Sized,
        R: HtmlRenderer + ?Sized,
    {
        let selector = receipt_selector();
        page.wait_for(&selector, self.receipt_timeout)
            .await
            .map_err(CaptureError::ReceiptMissing)?;
        let receipt_html = page
            .inner_html(&selector)
            .await
            .map_err(CaptureError::ReceiptMissing)?;

        ensure_parent(receipt_path).await?;
        renderer
            .render_pdf(&receipt_html, receipt_path)
            .await
            .map_err(CaptureError::Render)?;

        info!("🧾 收据已保存: {}", receipt_path.display());
        Ok(receipt_path.to_path_buf())
    }

    /// 整页截图
    pub async fn screenshot_robot<P: PageDriver + ?Sized>(
        &self,
        page: &P,
        screenshot_path: &Path,
    ) -> Result<PathBuf, CaptureError> {
        ensure_parent(screenshot_path).await?;
        page.screenshot(screenshot_path)
            .await
            .map_err(CaptureError::Screenshot)?;

        info!("📸 截图已保存: {}", screenshot_path.display());
        Ok(screenshot_path.to_path_buf())
    }
}

async fn ensure_parent(path: &Path) -> Result<(), CaptureError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| CaptureError::Io {
                    path: parent.to_path_buf(),
                    source,
                })
        }
        _ => Ok(()),
    }
}
